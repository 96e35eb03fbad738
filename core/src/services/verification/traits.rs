//! Trait for notification delivery integration

use async_trait::async_trait;

use crate::domain::entities::Channel;
use crate::errors::SendError;

/// Delivers a code to its subject over SMS or email
///
/// Implemented outside the core (provider gateways, console mocks). The
/// service bounds every call with its dispatch timeout.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Send `code` to `destination`, returning the provider message id
    async fn send(&self, destination: &str, code: &str, channel: Channel)
        -> Result<String, SendError>;

    /// Whether this sender can deliver over `channel` at all
    fn supports(&self, _channel: Channel) -> bool {
        true
    }
}
