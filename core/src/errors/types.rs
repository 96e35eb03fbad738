//! Error types for issuing, delivering and verifying codes
//!
//! Every failure carries its own variant so callers can give distinct
//! guidance. Nothing here collapses into a generic "invalid code".

use std::time::Duration;

use cs_shared::{error_codes, ErrorResponse, IntoErrorResponse};
use thiserror::Error;

use crate::domain::entities::Channel;

/// Verification failures, all correctable by the subject
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeError {
    /// Never issued, already consumed, replaced by a newer code or swept
    #[error("No verification code found. Please request a new code")]
    NotFound,

    /// Present but past its expiry; the record is removed on this check
    #[error("Verification code expired. Please request a new code")]
    Expired,

    /// Present and live but a different code; the record stays usable
    #[error("Invalid verification code")]
    Mismatch,
}

impl CodeError {
    pub fn error_code(&self) -> &'static str {
        match self {
            CodeError::NotFound => error_codes::VERIFICATION_CODE_NOT_FOUND,
            CodeError::Expired => error_codes::VERIFICATION_CODE_EXPIRED,
            CodeError::Mismatch => error_codes::VERIFICATION_CODE_INVALID,
        }
    }
}

impl IntoErrorResponse for CodeError {
    fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse::new(self.error_code(), self.to_string())
    }
}

/// Downstream notification failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SendError {
    #[error("Invalid destination: {reason}")]
    InvalidDestination { reason: String },

    #[error("{channel} delivery is not configured")]
    ChannelUnavailable { channel: Channel },

    #[error("{provider} rejected the message: {message}")]
    Rejected { provider: String, message: String },

    #[error("{provider} transport failure: {message}")]
    Transport { provider: String, message: String },

    #[error("Delivery did not complete within {} seconds", .after.as_secs())]
    Timeout { after: Duration },
}

impl SendError {
    pub fn rejected(provider: impl Into<String>, message: impl Into<String>) -> Self {
        SendError::Rejected {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn transport(provider: impl Into<String>, message: impl Into<String>) -> Self {
        SendError::Transport {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Whether a provider may succeed on a second attempt
    pub fn is_retryable(&self) -> bool {
        matches!(self, SendError::Transport { .. } | SendError::Timeout { .. })
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            SendError::InvalidDestination { .. } => error_codes::IDENTIFIER_INVALID,
            SendError::ChannelUnavailable { .. } => error_codes::CHANNEL_UNAVAILABLE,
            SendError::Rejected { .. } | SendError::Transport { .. } => {
                error_codes::DELIVERY_FAILED
            }
            SendError::Timeout { .. } => error_codes::DELIVERY_TIMEOUT,
        }
    }
}

/// Issuance failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IssueError {
    /// A code was issued to this identifier less than one cooldown ago
    #[error("Please wait {} seconds before requesting a new code", .retry_after.as_secs())]
    Throttled { retry_after: Duration },

    /// The code was stored but the channel did not accept it
    #[error("Failed to deliver verification code: {0}")]
    Delivery(#[from] SendError),
}

impl IssueError {
    pub fn error_code(&self) -> &'static str {
        match self {
            IssueError::Throttled { .. } => error_codes::RATE_LIMIT_EXCEEDED,
            IssueError::Delivery(err) => err.error_code(),
        }
    }

    /// Seconds until a resend is accepted, for throttled requests
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            IssueError::Throttled { retry_after } => Some(*retry_after),
            IssueError::Delivery(_) => None,
        }
    }
}

impl IntoErrorResponse for IssueError {
    fn to_error_response(&self) -> ErrorResponse {
        let response = ErrorResponse::new(self.error_code(), self.to_string());
        match self {
            IssueError::Throttled { retry_after } => {
                response.add_detail("retry_after", retry_after.as_secs())
            }
            IssueError::Delivery(_) => response,
        }
    }
}
