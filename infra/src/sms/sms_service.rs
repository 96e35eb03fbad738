//! SMS Service Interface
//!
//! Defines the trait for SMS providers that deliver verification codes.

use async_trait::async_trait;
use phonenumber::{Mode, PhoneNumber};

use crate::notify::message::VerificationMessage;
use crate::InfrastructureError;

pub use cs_shared::phone::{is_valid_international_phone, mask_phone_number};

/// SMS service trait for delivering verification codes
///
/// Implementations include:
/// - Twilio Messages API
/// - MSG91 OTP API
/// - Mock implementation for development
#[async_trait]
pub trait SmsService: Send + Sync {
    /// Deliver a verification code to a phone number
    ///
    /// # Arguments
    ///
    /// * `phone_number` - The recipient's phone number (E.164 format)
    /// * `message` - The code and the lifetime to quote
    ///
    /// # Returns
    ///
    /// * `Ok(message_id)` - Provider identifier for the sent message
    /// * `Err(InfrastructureError)` - If sending fails
    async fn send_verification_code(
        &self,
        phone_number: &str,
        message: &VerificationMessage,
    ) -> Result<String, InfrastructureError>;

    /// Get the service provider name (e.g., "Twilio", "MSG91", "Mock")
    fn provider_name(&self) -> &str;
}

/// Parse and re-format a phone number as E.164
///
/// Numbers must carry their country code; no default region is assumed.
pub fn to_e164(phone: &str) -> Result<String, InfrastructureError> {
    if !is_valid_international_phone(phone) {
        return Err(InfrastructureError::InvalidDestination(format!(
            "Phone number must be in E.164 format (e.g., +14155552671), got {}",
            mask_phone_number(phone)
        )));
    }

    phone
        .parse::<PhoneNumber>()
        .map(|parsed| parsed.format().mode(Mode::E164).to_string())
        .map_err(|e| {
            InfrastructureError::InvalidDestination(format!("Invalid phone number format: {}", e))
        })
}
