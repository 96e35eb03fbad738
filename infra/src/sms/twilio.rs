//! Twilio SMS Service Implementation
//!
//! Sends verification codes through the Twilio Messages API.
//!
//! ## Features
//!
//! - E.164 validation before any request is made
//! - Retry with exponential backoff on rate limits and server errors
//! - Phone number masking in logs

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use twilio::{Client, OutboundMessage};

use cs_shared::config::TwilioCredentials;

use super::sms_service::{mask_phone_number, to_e164, SmsService};
use crate::notify::message::VerificationMessage;
use crate::InfrastructureError;

/// Twilio limit for a single message body
const MAX_BODY_LENGTH: usize = 1600;

/// Twilio SMS service implementation
pub struct TwilioSmsService {
    client: Client,
    credentials: TwilioCredentials,
}

impl TwilioSmsService {
    /// Create a new Twilio SMS service
    pub fn new(credentials: TwilioCredentials) -> Result<Self, InfrastructureError> {
        if credentials.account_sid.is_empty() || credentials.auth_token.is_empty() {
            return Err(InfrastructureError::Config(
                "Twilio account SID and auth token are required".to_string(),
            ));
        }
        let from_number = to_e164(&credentials.from_number).map_err(|_| {
            InfrastructureError::Config(
                "TWILIO_PHONE_NUMBER must be in E.164 format (starting with '+')".to_string(),
            )
        })?;

        let client = Client::new(&credentials.account_sid, &credentials.auth_token);

        info!(
            "Twilio SMS service initialized with from number: {}",
            mask_phone_number(&from_number)
        );

        Ok(Self {
            client,
            credentials: TwilioCredentials {
                from_number,
                ..credentials
            },
        })
    }

    /// Send SMS with retry logic
    async fn send_with_retry(&self, to: &str, body: &str) -> Result<String, InfrastructureError> {
        let max_attempts = self.credentials.max_retries.max(1);
        let mut attempts = 0;
        let mut delay = Duration::from_millis(self.credentials.retry_delay_ms);

        loop {
            attempts += 1;

            debug!(
                "Sending SMS attempt {}/{} to {}",
                attempts,
                max_attempts,
                mask_phone_number(to)
            );

            let msg = OutboundMessage::new(&self.credentials.from_number, to, body);

            match self.client.send_message(msg).await {
                Ok(response) => {
                    info!(
                        "SMS sent successfully to {} with SID: {}",
                        mask_phone_number(to),
                        response.sid
                    );
                    return Ok(response.sid);
                }
                Err(e) => {
                    let error_msg = e.to_string();
                    error!(
                        "Failed to send SMS (attempt {}/{}): {}",
                        attempts, max_attempts, error_msg
                    );

                    if classify_failure(&error_msg) == FailureKind::Permanent {
                        return Err(InfrastructureError::Rejected(error_msg));
                    }
                    if attempts >= max_attempts {
                        return Err(InfrastructureError::Sms(format!(
                            "Failed to send SMS after {} attempts: {}",
                            max_attempts, error_msg
                        )));
                    }

                    warn!("Retrying Twilio request after {:?}", delay);
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
            }
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum FailureKind {
    Retryable,
    Permanent,
}

// The Twilio client only exposes errors as text
fn classify_failure(error_msg: &str) -> FailureKind {
    let lower = error_msg.to_lowercase();
    let server_side = ["429", "500", "502", "503", "504", "rate", "timed out", "connection"];
    if server_side.iter().any(|marker| lower.contains(marker)) {
        return FailureKind::Retryable;
    }
    if ["400", "401", "403", "404", "invalid", "unverified"]
        .iter()
        .any(|marker| lower.contains(marker))
    {
        return FailureKind::Permanent;
    }
    FailureKind::Retryable
}

#[async_trait]
impl SmsService for TwilioSmsService {
    async fn send_verification_code(
        &self,
        phone_number: &str,
        message: &VerificationMessage,
    ) -> Result<String, InfrastructureError> {
        let normalized_phone = to_e164(phone_number)?;
        let body = message.sms_body();

        if body.len() > MAX_BODY_LENGTH {
            return Err(InfrastructureError::Rejected(format!(
                "Message exceeds maximum length of {} characters",
                MAX_BODY_LENGTH
            )));
        }

        info!(
            "Sending SMS to {} via Twilio (message length: {} chars)",
            mask_phone_number(&normalized_phone),
            body.len()
        );

        self.send_with_retry(&normalized_phone, &body).await
    }

    fn provider_name(&self) -> &str {
        "Twilio"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials(from_number: &str) -> TwilioCredentials {
        TwilioCredentials {
            account_sid: "ACtest".to_string(),
            auth_token: "test_token".to_string(),
            from_number: from_number.to_string(),
            max_retries: 3,
            retry_delay_ms: 1000,
        }
    }

    #[test]
    fn test_new_normalizes_sender() {
        let service = TwilioSmsService::new(credentials("+1 415 555 2671")).unwrap();
        assert_eq!(service.credentials.from_number, "+14155552671");
        assert_eq!(service.provider_name(), "Twilio");
    }

    #[test]
    fn test_new_rejects_bad_sender() {
        let err = TwilioSmsService::new(credentials("4155552671")).err().unwrap();
        assert!(err.to_string().contains("E.164 format"));
    }

    #[test]
    fn test_classify_failure() {
        assert_eq!(classify_failure("HTTP 429 Too Many Requests"), FailureKind::Retryable);
        assert_eq!(classify_failure("503 Service Unavailable"), FailureKind::Retryable);
        assert_eq!(
            classify_failure("400: The 'To' number is not a valid phone number"),
            FailureKind::Permanent
        );
        assert_eq!(classify_failure("something odd"), FailureKind::Retryable);
    }

    #[tokio::test]
    async fn test_rejects_destination_without_country_code() {
        let service = TwilioSmsService::new(credentials("+14155552671")).unwrap();
        let message = VerificationMessage::new("123456", Duration::from_secs(600));

        let err = service
            .send_verification_code("4155550000", &message)
            .await
            .unwrap_err();
        assert!(matches!(err, InfrastructureError::InvalidDestination(_)));
    }
}
