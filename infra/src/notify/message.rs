//! Verification message templates

use std::time::Duration;

use cs_core::Channel;
use cs_shared::VerificationConfig;

const PRODUCT_NAME: &str = "ChangeSentinel";

/// Rendered content for one code delivery
#[derive(Clone, PartialEq, Eq)]
pub struct VerificationMessage {
    pub code: String,
    pub expires_in_minutes: u64,
}

impl VerificationMessage {
    pub fn new(code: impl Into<String>, expires_in: Duration) -> Self {
        Self {
            code: code.into(),
            expires_in_minutes: whole_minutes(expires_in),
        }
    }

    pub fn sms_body(&self) -> String {
        format!(
            "Your {} verification code is: {}. This code expires in {}.",
            PRODUCT_NAME,
            self.code,
            self.expiry_phrase()
        )
    }

    pub fn email_subject(&self) -> String {
        format!("Your {} verification code", PRODUCT_NAME)
    }

    pub fn email_text(&self) -> String {
        format!(
            "Your {} verification code is: {}\n\nThis code expires in {}. \
             If you did not request it, you can ignore this email.",
            PRODUCT_NAME,
            self.code,
            self.expiry_phrase()
        )
    }

    pub fn email_html(&self) -> String {
        format!(
            r#"<!DOCTYPE html>
<html>
<body style="font-family: Arial, sans-serif; color: #1f2937;">
  <h2>{product} verification</h2>
  <p>Use the code below to finish signing in:</p>
  <p style="font-size: 28px; font-weight: bold; letter-spacing: 6px;">{code}</p>
  <p>This code expires in {expiry}. If you did not request it, you can ignore this email.</p>
</body>
</html>"#,
            product = PRODUCT_NAME,
            code = self.code,
            expiry = self.expiry_phrase()
        )
    }

    fn expiry_phrase(&self) -> String {
        match self.expires_in_minutes {
            1 => "1 minute".to_string(),
            minutes => format!("{} minutes", minutes),
        }
    }
}

// Keep codes out of debug output
impl std::fmt::Debug for VerificationMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationMessage")
            .field("code", &"******")
            .field("expires_in_minutes", &self.expires_in_minutes)
            .finish()
    }
}

/// Per-channel lifetimes quoted in outgoing messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageTemplates {
    sms_ttl: Duration,
    email_ttl: Duration,
}

impl MessageTemplates {
    pub fn new(sms_ttl: Duration, email_ttl: Duration) -> Self {
        Self { sms_ttl, email_ttl }
    }

    pub fn from_config(config: &VerificationConfig) -> Self {
        Self::new(config.sms_code_ttl(), config.email_code_ttl())
    }

    pub fn message_for(&self, channel: Channel, code: &str) -> VerificationMessage {
        let ttl = match channel {
            Channel::Sms => self.sms_ttl,
            Channel::Email => self.email_ttl,
        };
        VerificationMessage::new(code, ttl)
    }
}

impl Default for MessageTemplates {
    fn default() -> Self {
        Self::from_config(&VerificationConfig::default())
    }
}

// Rounded up so a 90 second code is not advertised as lasting one minute
fn whole_minutes(duration: Duration) -> u64 {
    duration.as_secs().div_ceil(60).max(1)
}
