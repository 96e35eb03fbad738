//! SendGrid Email Service Implementation
//!
//! Sends verification emails through the SendGrid v3 Mail Send API.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{error, info};

use cs_shared::config::SendGridCredentials;

use super::email_service::{is_valid_email, mask_email, EmailService};
use crate::notify::message::VerificationMessage;
use crate::InfrastructureError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// SendGrid email service implementation
pub struct SendGridEmailService {
    client: Client,
    credentials: SendGridCredentials,
}

impl SendGridEmailService {
    pub fn new(credentials: SendGridCredentials) -> Result<Self, InfrastructureError> {
        if credentials.api_key.is_empty() {
            return Err(InfrastructureError::Config(
                "SENDGRID_API_KEY is required".to_string(),
            ));
        }
        if !is_valid_email(&credentials.sender_email) {
            return Err(InfrastructureError::Config(
                "SENDER_EMAIL must be a valid email address".to_string(),
            ));
        }

        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        info!(
            "SendGrid email service initialized with sender: {}",
            mask_email(&credentials.sender_email)
        );

        Ok(Self {
            client,
            credentials,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v3/mail/send", self.credentials.base_url.trim_end_matches('/'))
    }

    fn payload(&self, to: &str, message: &VerificationMessage) -> Value {
        json!({
            "personalizations": [{
                "to": [{ "email": to }],
            }],
            "from": {
                "email": self.credentials.sender_email,
                "name": self.credentials.sender_name,
            },
            "subject": message.email_subject(),
            "content": [
                { "type": "text/plain", "value": message.email_text() },
                { "type": "text/html", "value": message.email_html() },
            ],
        })
    }
}

#[async_trait]
impl EmailService for SendGridEmailService {
    async fn send_verification_email(
        &self,
        to: &str,
        message: &VerificationMessage,
    ) -> Result<String, InfrastructureError> {
        let masked = mask_email(to);
        if !is_valid_email(to) {
            return Err(InfrastructureError::InvalidDestination(format!(
                "Invalid email address: {}",
                masked
            )));
        }

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.credentials.api_key)
            .header("Content-Type", "application/json")
            .json(&self.payload(to, message))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let message_id = response
                .headers()
                .get("X-Message-Id")
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
                .unwrap_or_else(|| format!("sendgrid_{}", uuid::Uuid::new_v4()));

            info!(email = %masked, message_id = %message_id, "Email sent successfully via SendGrid");
            return Ok(message_id);
        }

        let body = response.text().await.unwrap_or_default();
        error!(email = %masked, status = %status, "SendGrid request failed");
        if status.is_server_error() || status.as_u16() == 429 {
            Err(InfrastructureError::Email(format!(
                "SendGrid returned {}: {}",
                status, body
            )))
        } else {
            Err(InfrastructureError::Rejected(format!(
                "SendGrid returned {}: {}",
                status, body
            )))
        }
    }

    fn provider_name(&self) -> &str {
        "SendGrid"
    }
}
