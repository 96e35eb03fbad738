//! Mock Email Service Implementation
//!
//! Prints verification emails to the console instead of sending them.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use super::email_service::{is_valid_email, mask_email, EmailService};
use crate::notify::message::VerificationMessage;
use crate::InfrastructureError;

/// Mock email service for development and testing
#[derive(Clone)]
pub struct MockEmailService {
    message_count: Arc<AtomicU64>,
    simulate_failure: bool,
    console_output: bool,
}

impl MockEmailService {
    pub fn new() -> Self {
        Self::with_options(true, false)
    }

    pub fn with_options(console_output: bool, simulate_failure: bool) -> Self {
        Self {
            message_count: Arc::new(AtomicU64::new(0)),
            simulate_failure,
            console_output,
        }
    }

    pub fn get_message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }
}

impl Default for MockEmailService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmailService for MockEmailService {
    async fn send_verification_email(
        &self,
        to: &str,
        message: &VerificationMessage,
    ) -> Result<String, InfrastructureError> {
        if !is_valid_email(to) {
            return Err(InfrastructureError::InvalidDestination(format!(
                "Invalid email address: {}",
                mask_email(to)
            )));
        }

        if self.simulate_failure {
            warn!("Mock email service simulating failure for {}", mask_email(to));
            return Err(InfrastructureError::Email(
                "Simulated email sending failure".to_string(),
            ));
        }

        let message_id = format!("mock_{}", Uuid::new_v4());
        let count = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;

        if self.console_output {
            println!("\n{}", "=".repeat(60));
            println!("MOCK EMAIL SERVICE - MESSAGE #{}", count);
            println!("{}", "=".repeat(60));
            println!("To: {}", to);
            println!("Subject: {}", message.email_subject());
            println!("Message ID: {}", message_id);
            println!("{}", message.email_text());
            println!("{}\n", "=".repeat(60));
        }

        info!(
            target: "email_service",
            provider = "mock",
            email = %mask_email(to),
            message_id = %message_id,
            "Email sent successfully (mock)"
        );

        Ok(message_id)
    }

    fn provider_name(&self) -> &str {
        "Mock"
    }
}
