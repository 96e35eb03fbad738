//! SMS Service Module
//!
//! SMS providers for delivering verification codes, plus a console mock for
//! development.
//!
//! ## Features
//!
//! - **SMS Service Trait**: Common interface for all SMS providers
//! - **Mock Implementation**: Console output for development
//! - **Twilio Support**: Production SMS via the Twilio API
//! - **MSG91 Support**: OTP delivery via the MSG91 v5 API
//! - **Phone Number Validation**: E.164 format validation

use std::sync::Arc;

use cs_shared::config::{NotificationConfig, SmsProvider};

use crate::InfrastructureError;

pub mod mock_sms;
pub mod msg91;
pub mod sms_service;

// Twilio SMS service (feature-gated)
#[cfg(feature = "twilio-sms")]
pub mod twilio;

// Re-export commonly used types
pub use mock_sms::MockSmsService;
pub use msg91::Msg91SmsService;
pub use sms_service::{mask_phone_number, to_e164, SmsService};

#[cfg(feature = "twilio-sms")]
pub use twilio::TwilioSmsService;

#[cfg(test)]
mod tests;

/// Create the SMS service selected by configuration
///
/// # Returns
///
/// * `Ok(None)` - SMS delivery is disabled
/// * `Ok(Some(service))` - The configured provider
/// * `Err(InfrastructureError)` - Credentials are missing or invalid
pub fn create_sms_service(
    config: &NotificationConfig,
) -> Result<Option<Arc<dyn SmsService>>, InfrastructureError> {
    let service: Arc<dyn SmsService> = match config.sms_provider {
        SmsProvider::Disabled => {
            tracing::warn!("SMS delivery is disabled");
            return Ok(None);
        }
        SmsProvider::Mock => Arc::new(MockSmsService::new()),
        SmsProvider::Twilio => {
            let credentials = config.twilio.clone().ok_or_else(|| {
                InfrastructureError::Config("Twilio credentials are not configured".to_string())
            })?;
            twilio_service(credentials)?
        }
        SmsProvider::Msg91 => {
            let credentials = config.msg91.clone().ok_or_else(|| {
                InfrastructureError::Config("MSG91 credentials are not configured".to_string())
            })?;
            Arc::new(Msg91SmsService::new(credentials)?)
        }
    };

    tracing::info!(provider = service.provider_name(), "SMS service ready");
    Ok(Some(service))
}

#[cfg(feature = "twilio-sms")]
fn twilio_service(
    credentials: cs_shared::config::TwilioCredentials,
) -> Result<Arc<dyn SmsService>, InfrastructureError> {
    Ok(Arc::new(TwilioSmsService::new(credentials)?))
}

#[cfg(not(feature = "twilio-sms"))]
fn twilio_service(
    _credentials: cs_shared::config::TwilioCredentials,
) -> Result<Arc<dyn SmsService>, InfrastructureError> {
    Err(InfrastructureError::Config(
        "SMS_PROVIDER=twilio requires the twilio-sms feature".to_string(),
    ))
}
