//! Email Service Module
//!
//! Email providers for delivering verification codes: SendGrid for
//! production and a console mock for development.

use std::sync::Arc;

use cs_shared::config::{EmailProvider, NotificationConfig};

use crate::InfrastructureError;

pub mod email_service;
pub mod mock_email;
pub mod sendgrid;

pub use email_service::EmailService;
pub use mock_email::MockEmailService;
pub use sendgrid::SendGridEmailService;

/// Create the email service selected by configuration
///
/// Returns `Ok(None)` when email delivery is disabled.
pub fn create_email_service(
    config: &NotificationConfig,
) -> Result<Option<Arc<dyn EmailService>>, InfrastructureError> {
    let service: Arc<dyn EmailService> = match config.email_provider {
        EmailProvider::Disabled => {
            tracing::warn!("Email delivery is disabled");
            return Ok(None);
        }
        EmailProvider::Mock => Arc::new(MockEmailService::new()),
        EmailProvider::SendGrid => {
            let credentials = config.sendgrid.clone().ok_or_else(|| {
                InfrastructureError::Config("SendGrid credentials are not configured".to_string())
            })?;
            Arc::new(SendGridEmailService::new(credentials)?)
        }
    };

    tracing::info!(provider = service.provider_name(), "Email service ready");
    Ok(Some(service))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_email_service() {
        let service = create_email_service(&NotificationConfig::mock()).unwrap().unwrap();
        assert_eq!(service.provider_name(), "Mock");

        let disabled = NotificationConfig {
            email_provider: EmailProvider::Disabled,
            ..NotificationConfig::mock()
        };
        assert!(create_email_service(&disabled).unwrap().is_none());

        let missing = NotificationConfig {
            email_provider: EmailProvider::SendGrid,
            ..NotificationConfig::mock()
        };
        assert!(create_email_service(&missing).is_err());
    }
}
