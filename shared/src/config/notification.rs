//! Notification provider configuration
//!
//! Selects which provider delivers codes for each channel and carries the
//! provider credentials. A provider that is selected but lacks credentials is a
//! [`ConfigError`]; there is no silent fallback to the mock providers.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{env_opt, env_parse, env_required, ConfigError};
use crate::utils::email::is_valid_email;
use crate::utils::phone::is_valid_international_phone;

/// SMS delivery provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SmsProvider {
    Twilio,
    Msg91,
    /// Console output for development
    Mock,
    /// SMS issuance is refused
    Disabled,
}

impl std::str::FromStr for SmsProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "twilio" => Ok(SmsProvider::Twilio),
            "msg91" => Ok(SmsProvider::Msg91),
            "mock" => Ok(SmsProvider::Mock),
            "disabled" | "none" => Ok(SmsProvider::Disabled),
            _ => Err(format!("Unknown SMS provider: {}", s)),
        }
    }
}

/// Email delivery provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailProvider {
    SendGrid,
    /// Console output for development
    Mock,
    /// Email issuance is refused
    Disabled,
}

impl std::str::FromStr for EmailProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sendgrid" => Ok(EmailProvider::SendGrid),
            "mock" => Ok(EmailProvider::Mock),
            "disabled" | "none" => Ok(EmailProvider::Disabled),
            _ => Err(format!("Unknown email provider: {}", s)),
        }
    }
}

/// Twilio account credentials
#[derive(Clone, Deserialize, Serialize)]
pub struct TwilioCredentials {
    /// Twilio Account SID
    pub account_sid: String,
    /// Twilio Auth Token
    #[serde(skip_serializing, default)]
    pub auth_token: String,
    /// From phone number (must be a Twilio number, E.164)
    pub from_number: String,
    /// Maximum send attempts for one message
    pub max_retries: u32,
    /// Initial retry delay in milliseconds, doubled on each retry
    pub retry_delay_ms: u64,
}

impl TwilioCredentials {
    pub fn from_env() -> Result<Self, ConfigError> {
        let from_number = env_required("TWILIO_PHONE_NUMBER")?;
        if !is_valid_international_phone(&from_number) {
            return Err(ConfigError::invalid(
                "TWILIO_PHONE_NUMBER",
                "must be in E.164 format (starting with '+')",
            ));
        }

        Ok(Self {
            account_sid: env_required("TWILIO_ACCOUNT_SID")?,
            auth_token: env_required("TWILIO_AUTH_TOKEN")?,
            from_number,
            max_retries: env_parse("TWILIO_MAX_RETRIES", 3)?,
            retry_delay_ms: env_parse("TWILIO_RETRY_DELAY_MS", 1000)?,
        })
    }
}

impl fmt::Debug for TwilioCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwilioCredentials")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"<redacted>")
            .field("from_number", &self.from_number)
            .field("max_retries", &self.max_retries)
            .field("retry_delay_ms", &self.retry_delay_ms)
            .finish()
    }
}

/// MSG91 credentials
#[derive(Clone, Deserialize, Serialize)]
pub struct Msg91Credentials {
    #[serde(skip_serializing, default)]
    pub auth_key: String,
    /// Optional DLT template for the OTP message
    pub template_id: Option<String>,
    /// API base URL, overridable for sandboxes
    pub base_url: String,
}

impl Msg91Credentials {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            auth_key: env_required("MSG91_AUTH_KEY")?,
            template_id: env_opt("MSG91_TEMPLATE_ID"),
            base_url: env_opt("MSG91_BASE_URL")
                .unwrap_or_else(|| "https://control.msg91.com".to_string()),
        })
    }
}

impl fmt::Debug for Msg91Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Msg91Credentials")
            .field("auth_key", &"<redacted>")
            .field("template_id", &self.template_id)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// SendGrid credentials
#[derive(Clone, Deserialize, Serialize)]
pub struct SendGridCredentials {
    #[serde(skip_serializing, default)]
    pub api_key: String,
    /// Verified sender address
    pub sender_email: String,
    /// Display name of the sender
    pub sender_name: String,
    /// API base URL, overridable for sandboxes
    pub base_url: String,
}

impl SendGridCredentials {
    pub fn from_env() -> Result<Self, ConfigError> {
        let sender_email = env_required("SENDER_EMAIL")?;
        if !is_valid_email(&sender_email) {
            return Err(ConfigError::invalid("SENDER_EMAIL", "not a valid email address"));
        }

        Ok(Self {
            api_key: env_required("SENDGRID_API_KEY")?,
            sender_email,
            sender_name: env_opt("SENDER_NAME").unwrap_or_else(|| "ChangeSentinel".to_string()),
            base_url: env_opt("SENDGRID_BASE_URL")
                .unwrap_or_else(|| "https://api.sendgrid.com".to_string()),
        })
    }
}

impl fmt::Debug for SendGridCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SendGridCredentials")
            .field("api_key", &"<redacted>")
            .field("sender_email", &self.sender_email)
            .field("sender_name", &self.sender_name)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Provider selection and credentials for both delivery channels
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotificationConfig {
    pub sms_provider: SmsProvider,
    pub email_provider: EmailProvider,
    #[serde(default)]
    pub twilio: Option<TwilioCredentials>,
    #[serde(default)]
    pub msg91: Option<Msg91Credentials>,
    #[serde(default)]
    pub sendgrid: Option<SendGridCredentials>,
}

impl NotificationConfig {
    /// Both channels delivered by the console mocks
    pub fn mock() -> Self {
        Self {
            sms_provider: SmsProvider::Mock,
            email_provider: EmailProvider::Mock,
            twilio: None,
            msg91: None,
            sendgrid: None,
        }
    }

    /// Load from `SMS_PROVIDER` / `EMAIL_PROVIDER` (default `mock`) and the
    /// credentials of whichever providers are selected
    pub fn from_env() -> Result<Self, ConfigError> {
        let sms_provider: SmsProvider = env_parse("SMS_PROVIDER", SmsProvider::Mock)?;
        let email_provider: EmailProvider = env_parse("EMAIL_PROVIDER", EmailProvider::Mock)?;

        let config = Self {
            sms_provider,
            email_provider,
            twilio: match sms_provider {
                SmsProvider::Twilio => Some(TwilioCredentials::from_env()?),
                _ => None,
            },
            msg91: match sms_provider {
                SmsProvider::Msg91 => Some(Msg91Credentials::from_env()?),
                _ => None,
            },
            sendgrid: match email_provider {
                EmailProvider::SendGrid => Some(SendGridCredentials::from_env()?),
                _ => None,
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Ensure every selected provider has its credentials
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sms_provider == SmsProvider::Disabled
            && self.email_provider == EmailProvider::Disabled
        {
            return Err(ConfigError::invalid(
                "SMS_PROVIDER/EMAIL_PROVIDER",
                "at least one delivery channel must be enabled",
            ));
        }
        if self.sms_provider == SmsProvider::Twilio && self.twilio.is_none() {
            return Err(ConfigError::missing("TWILIO_ACCOUNT_SID"));
        }
        if self.sms_provider == SmsProvider::Msg91 && self.msg91.is_none() {
            return Err(ConfigError::missing("MSG91_AUTH_KEY"));
        }
        if self.email_provider == EmailProvider::SendGrid && self.sendgrid.is_none() {
            return Err(ConfigError::missing("SENDGRID_API_KEY"));
        }
        Ok(())
    }

    pub fn uses_mock_provider(&self) -> bool {
        self.sms_provider == SmsProvider::Mock || self.email_provider == EmailProvider::Mock
    }
}
