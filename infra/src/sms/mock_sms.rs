//! Mock SMS Service Implementation
//!
//! A mock implementation of the SMS service for development and testing.
//! This implementation logs SMS messages to the console instead of sending them.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use super::sms_service::{is_valid_international_phone, mask_phone_number, SmsService};
use crate::notify::message::VerificationMessage;
use crate::InfrastructureError;

/// Mock SMS service for development and testing
///
/// This implementation:
/// - Prints messages to the console
/// - Validates phone numbers
/// - Generates mock message IDs
/// - Tracks message count for testing
#[derive(Clone)]
pub struct MockSmsService {
    /// Counter for tracking number of messages sent
    message_count: Arc<AtomicU64>,
    /// Whether to simulate failures (for testing)
    simulate_failure: bool,
    /// Whether to print messages to console
    console_output: bool,
}

impl MockSmsService {
    /// Create a new mock SMS service
    pub fn new() -> Self {
        Self::with_options(true, false)
    }

    /// Create a mock service with configurable options
    pub fn with_options(console_output: bool, simulate_failure: bool) -> Self {
        Self {
            message_count: Arc::new(AtomicU64::new(0)),
            simulate_failure,
            console_output,
        }
    }

    /// Get the total number of messages sent
    pub fn get_message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }
}

impl Default for MockSmsService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SmsService for MockSmsService {
    async fn send_verification_code(
        &self,
        phone_number: &str,
        message: &VerificationMessage,
    ) -> Result<String, InfrastructureError> {
        if !is_valid_international_phone(phone_number) {
            return Err(InfrastructureError::InvalidDestination(format!(
                "Invalid phone number format: {}",
                mask_phone_number(phone_number)
            )));
        }

        if self.simulate_failure {
            warn!(
                "Mock SMS service simulating failure for phone: {}",
                mask_phone_number(phone_number)
            );
            return Err(InfrastructureError::Sms(
                "Simulated SMS sending failure".to_string(),
            ));
        }

        let message_id = format!("mock_{}", Uuid::new_v4());
        let count = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;
        let masked_phone = mask_phone_number(phone_number);

        if self.console_output {
            // Development only: the full message, code included
            println!("\n{}", "=".repeat(60));
            println!("MOCK SMS SERVICE - MESSAGE #{}", count);
            println!("{}", "=".repeat(60));
            println!("To: {}", phone_number);
            println!("Message ID: {}", message_id);
            println!("Content: {}", message.sms_body());
            println!("{}\n", "=".repeat(60));
        }

        info!(
            target: "sms_service",
            provider = "mock",
            phone = %masked_phone,
            message_id = %message_id,
            "SMS sent successfully (mock)"
        );

        Ok(message_id)
    }

    fn provider_name(&self) -> &str {
        "Mock"
    }
}
