//! Email Service Interface

use async_trait::async_trait;

use crate::notify::message::VerificationMessage;
use crate::InfrastructureError;

pub use cs_shared::email::{is_valid_email, mask_email};

/// Email service trait for delivering verification codes
#[async_trait]
pub trait EmailService: Send + Sync {
    /// Deliver a verification code to a mailbox
    ///
    /// # Returns
    ///
    /// * `Ok(message_id)` - Provider identifier for the sent message
    /// * `Err(InfrastructureError)` - If sending fails
    async fn send_verification_email(
        &self,
        to: &str,
        message: &VerificationMessage,
    ) -> Result<String, InfrastructureError>;

    /// Get the service provider name (e.g., "SendGrid", "Mock")
    fn provider_name(&self) -> &str;
}
