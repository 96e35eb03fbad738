//! Routing of verification codes to the configured providers
//!
//! [`ChannelRouter`] is the single `NotificationChannel` the core sees. It
//! picks the SMS or email provider by channel, renders the message and maps
//! provider failures onto `SendError`.

use async_trait::async_trait;
use std::sync::Arc;

use cs_core::{Channel, NotificationChannel, SendError};
use cs_shared::{NotificationConfig, VerificationConfig};

use crate::email::{create_email_service, EmailService};
use crate::sms::{create_sms_service, SmsService};
use crate::InfrastructureError;

pub mod message;

pub use message::{MessageTemplates, VerificationMessage};

/// Dispatches codes to the provider configured for each channel
#[derive(Clone)]
pub struct ChannelRouter {
    sms: Option<Arc<dyn SmsService>>,
    email: Option<Arc<dyn EmailService>>,
    templates: MessageTemplates,
}

impl ChannelRouter {
    pub fn new(
        sms: Option<Arc<dyn SmsService>>,
        email: Option<Arc<dyn EmailService>>,
        templates: MessageTemplates,
    ) -> Self {
        Self {
            sms,
            email,
            templates,
        }
    }

    pub fn sms_provider(&self) -> Option<&str> {
        self.sms.as_deref().map(|service| service.provider_name())
    }

    pub fn email_provider(&self) -> Option<&str> {
        self.email.as_deref().map(|service| service.provider_name())
    }
}

#[async_trait]
impl NotificationChannel for ChannelRouter {
    async fn send(
        &self,
        destination: &str,
        code: &str,
        channel: Channel,
    ) -> Result<String, SendError> {
        let message = self.templates.message_for(channel, code);

        match channel {
            Channel::Sms => {
                let service = self
                    .sms
                    .as_ref()
                    .ok_or(SendError::ChannelUnavailable { channel })?;
                service
                    .send_verification_code(destination, &message)
                    .await
                    .map_err(|e| e.into_send_error(service.provider_name()))
            }
            Channel::Email => {
                let service = self
                    .email
                    .as_ref()
                    .ok_or(SendError::ChannelUnavailable { channel })?;
                service
                    .send_verification_email(destination, &message)
                    .await
                    .map_err(|e| e.into_send_error(service.provider_name()))
            }
        }
    }

    fn supports(&self, channel: Channel) -> bool {
        match channel {
            Channel::Sms => self.sms.is_some(),
            Channel::Email => self.email.is_some(),
        }
    }
}

/// Build the router for the configured providers
///
/// Missing or invalid credentials fail here, at startup, rather than on the
/// first request.
pub fn create_notification_channel(
    notification: &NotificationConfig,
    verification: &VerificationConfig,
) -> Result<ChannelRouter, InfrastructureError> {
    let sms = create_sms_service(notification)?;
    let email = create_email_service(notification)?;

    if sms.is_none() && email.is_none() {
        return Err(InfrastructureError::Config(
            "at least one delivery channel must be enabled".to_string(),
        ));
    }

    Ok(ChannelRouter::new(
        sms,
        email,
        MessageTemplates::from_config(verification),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::email::MockEmailService;
    use crate::sms::MockSmsService;
    use cs_shared::config::{EmailProvider, SmsProvider};

    fn router(sms: Option<MockSmsService>, email: Option<MockEmailService>) -> ChannelRouter {
        ChannelRouter::new(
            sms.map(|s| Arc::new(s) as Arc<dyn SmsService>),
            email.map(|e| Arc::new(e) as Arc<dyn EmailService>),
            MessageTemplates::default(),
        )
    }

    #[tokio::test]
    async fn test_routes_by_channel() {
        let sms = MockSmsService::with_options(false, false);
        let email = MockEmailService::with_options(false, false);
        let router = router(Some(sms.clone()), Some(email.clone()));

        router.send("+14155552671", "123456", Channel::Sms).await.unwrap();
        router.send("jane@example.com", "123456", Channel::Email).await.unwrap();

        assert_eq!(sms.get_message_count(), 1);
        assert_eq!(email.get_message_count(), 1);
        assert_eq!(router.sms_provider(), Some("Mock"));
    }

    #[tokio::test]
    async fn test_missing_channel_is_unavailable() {
        let router = router(Some(MockSmsService::with_options(false, false)), None);

        assert!(router.supports(Channel::Sms));
        assert!(!router.supports(Channel::Email));
        let err = router
            .send("jane@example.com", "123456", Channel::Email)
            .await
            .unwrap_err();
        assert_eq!(err, SendError::ChannelUnavailable { channel: Channel::Email });
    }

    #[tokio::test]
    async fn test_provider_errors_are_mapped() {
        let router = router(Some(MockSmsService::with_options(false, true)), None);

        let err = router.send("+14155552671", "123456", Channel::Sms).await.unwrap_err();
        assert!(matches!(err, SendError::Transport { ref provider, .. } if provider == "Mock"));

        let err = router.send("not-a-phone", "123456", Channel::Sms).await.unwrap_err();
        assert!(matches!(err, SendError::InvalidDestination { .. }));
    }

    #[test]
    fn test_create_notification_channel() {
        let verification = VerificationConfig::default();

        let router = create_notification_channel(&NotificationConfig::mock(), &verification).unwrap();
        assert_eq!(router.email_provider(), Some("Mock"));

        let none = NotificationConfig {
            sms_provider: SmsProvider::Disabled,
            email_provider: EmailProvider::Disabled,
            ..NotificationConfig::mock()
        };
        assert!(create_notification_channel(&none, &verification).is_err());
    }
}
