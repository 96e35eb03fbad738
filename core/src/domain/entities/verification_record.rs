//! Issued verification code awaiting consumption.

use chrono::{DateTime, Utc};
use constant_time_eq::constant_time_eq;
use std::fmt;

use super::channel::Channel;

/// Length of the verification code
pub const CODE_LENGTH: usize = 6;

/// Number of distinct codes (`000000` through `999999`)
pub const CODE_SPACE: u32 = 1_000_000;

/// The single live code for one identifier
///
/// Records are never marked as used. A consumed, expired or replaced code is
/// simply no longer in the store.
#[derive(Clone, PartialEq, Eq)]
pub struct VerificationRecord {
    /// Normalized phone number or email address
    pub identifier: String,

    /// The 6-digit code
    pub code: String,

    /// Channel the code was dispatched over
    pub channel: Channel,

    /// Timestamp when the code was stored
    pub issued_at: DateTime<Utc>,

    /// Timestamp from which the code is dead
    pub expires_at: DateTime<Utc>,
}

impl VerificationRecord {
    pub fn new(
        identifier: impl Into<String>,
        code: impl Into<String>,
        channel: Channel,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            code: code.into(),
            channel,
            issued_at,
            expires_at,
        }
    }

    /// A record is dead once `now` reaches `expires_at`, whether or not it has
    /// been swept yet
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Compare a submitted code in constant time
    pub fn matches(&self, submitted: &str) -> bool {
        constant_time_eq(self.code.as_bytes(), submitted.as_bytes())
    }

    /// Time left before expiry, `None` once expired
    pub fn remaining_at(&self, now: DateTime<Utc>) -> Option<std::time::Duration> {
        if self.is_expired_at(now) {
            return None;
        }
        (self.expires_at - now).to_std().ok()
    }
}

// The code never appears in debug output or logs.
impl fmt::Debug for VerificationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerificationRecord")
            .field("identifier", &self.identifier)
            .field("code", &"******")
            .field("channel", &self.channel)
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
