//! Types for verification service results

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::Channel;

/// Result of issuing a verification code
///
/// Deliberately carries no code: the only copy leaves through the
/// notification channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueReceipt {
    /// Channel the code was dispatched over
    pub channel: Channel,
    /// When the issued code stops verifying
    pub expires_at: DateTime<Utc>,
    /// When the identifier can request another code
    pub next_resend_at: DateTime<Utc>,
    /// The message ID from the provider
    pub message_id: String,
}
