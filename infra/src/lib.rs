//! # Infrastructure Layer
//!
//! This crate implements the delivery side of the ChangeSentinel verification
//! flow. It provides concrete SMS and email providers and the
//! [`notify::ChannelRouter`] that exposes them to the core as a single
//! `NotificationChannel`.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **SMS**: Twilio, MSG91 and a console mock
//! - **Email**: SendGrid and a console mock
//! - **Notify**: message templates and per-channel routing
//!
//! ## Features
//!
//! - `twilio-sms`: Enable the Twilio SMS provider (default)

use cs_core::errors::SendError;

/// SMS service module - External SMS providers
pub mod sms;

/// Email service module - External email providers
pub mod email;

/// Routing of verification codes to the configured providers
pub mod notify;

pub use notify::{create_notification_channel, ChannelRouter, MessageTemplates};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Destination the provider cannot deliver to
    #[error("Invalid destination: {0}")]
    InvalidDestination(String),

    /// Provider answered but refused the message
    #[error("Provider rejected request: {0}")]
    Rejected(String),

    /// SMS service error
    #[error("SMS service error: {0}")]
    Sms(String),

    /// Email service error
    #[error("Email service error: {0}")]
    Email(String),
}

impl InfrastructureError {
    /// Translate into the core's delivery error, tagged with the provider
    pub fn into_send_error(self, provider: &str) -> SendError {
        match self {
            InfrastructureError::InvalidDestination(reason) => {
                SendError::InvalidDestination { reason }
            }
            InfrastructureError::Rejected(message) | InfrastructureError::Config(message) => {
                SendError::rejected(provider, message)
            }
            InfrastructureError::Http(err) => SendError::transport(provider, err.to_string()),
            InfrastructureError::Sms(message) | InfrastructureError::Email(message) => {
                SendError::transport(provider, message)
            }
        }
    }
}
