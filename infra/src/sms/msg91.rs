//! MSG91 SMS Service Implementation
//!
//! Delivers codes through the MSG91 v5 OTP endpoint. The code is generated
//! by the core and handed to MSG91 as the `otp` value, so MSG91 only renders
//! and sends it.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{error, info};

use cs_shared::config::Msg91Credentials;

use super::sms_service::{mask_phone_number, to_e164, SmsService};
use crate::notify::message::VerificationMessage;
use crate::InfrastructureError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Body returned by the OTP endpoint
#[derive(Debug, Deserialize)]
struct Msg91Response {
    #[serde(rename = "type")]
    kind: Option<String>,
    request_id: Option<String>,
    message: Option<String>,
}

/// MSG91 SMS service implementation
pub struct Msg91SmsService {
    client: Client,
    credentials: Msg91Credentials,
}

impl Msg91SmsService {
    pub fn new(credentials: Msg91Credentials) -> Result<Self, InfrastructureError> {
        if credentials.auth_key.is_empty() {
            return Err(InfrastructureError::Config(
                "MSG91_AUTH_KEY is required".to_string(),
            ));
        }

        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        info!("MSG91 SMS service initialized");

        Ok(Self {
            client,
            credentials,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/api/v5/otp", self.credentials.base_url.trim_end_matches('/'))
    }

    /// Query parameters for one OTP request
    fn query(&self, mobile: &str, message: &VerificationMessage) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("authkey", self.credentials.auth_key.clone()),
            ("mobile", mobile.to_string()),
            ("otp", message.code.clone()),
            ("otp_expiry", message.expires_in_minutes.to_string()),
        ];
        if let Some(template_id) = &self.credentials.template_id {
            query.push(("template_id", template_id.clone()));
        }
        query
    }
}

/// MSG91 expects the number as digits with country code and no `+`
fn mobile_param(e164: &str) -> String {
    e164.trim_start_matches('+').to_string()
}

fn interpret_response(body: Msg91Response) -> Result<String, InfrastructureError> {
    let rejected = |message: Option<String>| {
        InfrastructureError::Rejected(
            message.unwrap_or_else(|| "MSG91 did not accept the request".to_string()),
        )
    };

    if body.kind.as_deref() == Some("error") {
        return Err(rejected(body.message));
    }
    match body.request_id {
        Some(request_id) => Ok(request_id),
        None if body.kind.as_deref() == Some("success") => {
            Ok(format!("msg91_{}", uuid::Uuid::new_v4()))
        }
        None => Err(rejected(body.message)),
    }
}

#[async_trait]
impl SmsService for Msg91SmsService {
    async fn send_verification_code(
        &self,
        phone_number: &str,
        message: &VerificationMessage,
    ) -> Result<String, InfrastructureError> {
        let normalized_phone = to_e164(phone_number)?;
        let masked = mask_phone_number(&normalized_phone);

        let response = self
            .client
            .post(self.endpoint())
            .query(&self.query(&mobile_param(&normalized_phone), message))
            .json(&serde_json::json!({}))
            .send()
            .await?;

        let status = response.status();
        if status.is_server_error() {
            error!(phone = %masked, status = %status, "MSG91 server error");
            return Err(InfrastructureError::Sms(format!("MSG91 returned {}", status)));
        }

        let body: Msg91Response = response.json().await?;
        if status.is_client_error() {
            error!(phone = %masked, status = %status, "MSG91 rejected request");
            return Err(InfrastructureError::Rejected(
                body.message.unwrap_or_else(|| status.to_string()),
            ));
        }

        let request_id = interpret_response(body)?;
        info!(phone = %masked, request_id = %request_id, "SMS sent successfully via MSG91");
        Ok(request_id)
    }

    fn provider_name(&self) -> &str {
        "MSG91"
    }
}
