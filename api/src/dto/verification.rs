use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use cs_core::{Channel, IssueReceipt};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendCodeRequest {
    /// E.164 phone number ("+15551234567") or email address
    #[validate(length(min = 3, max = 254))]
    pub identifier: String,

    /// "sms" or "email"; inferred from the identifier when omitted
    #[serde(default)]
    pub channel: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyCodeRequest {
    #[validate(length(min = 3, max = 254))]
    pub identifier: String,

    /// 6-digit verification code
    #[validate(length(equal = 6, message = "Verification code must be 6 digits"))]
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendCodeResponse {
    pub channel: Channel,
    pub expires_at: DateTime<Utc>,
    pub expires_in: i64,  // seconds until the code stops verifying
    pub resend_after: i64, // seconds until can resend
}

impl SendCodeResponse {
    pub fn from_receipt(receipt: &IssueReceipt, now: DateTime<Utc>) -> Self {
        Self {
            channel: receipt.channel,
            expires_at: receipt.expires_at,
            expires_in: receipt.expires_at.signed_duration_since(now).num_seconds().max(0),
            resend_after: receipt
                .next_resend_at
                .signed_duration_since(now)
                .num_seconds()
                .max(0),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyCodeResponse {
    pub verified: bool,
}
