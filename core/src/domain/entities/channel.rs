//! Delivery channel over which a verification code reaches its subject.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Notification channel used to deliver a code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Text message to a phone number
    Sms,
    /// Email to a mailbox
    Email,
}

impl Channel {
    /// Lowercase name as used on the wire and in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Sms => "sms",
            Channel::Email => "email",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sms" | "phone" => Ok(Channel::Sms),
            "email" | "mail" => Ok(Channel::Email),
            other => Err(format!("Unknown channel: {}", other)),
        }
    }
}
