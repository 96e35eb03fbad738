//! Per-identifier resend cooldown

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;

use super::clock::{add_std_duration, Clock};

/// Outcome of a reservation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reservation {
    /// Issuance may proceed; the cooldown now runs from `reserved_at`
    Granted { reserved_at: DateTime<Utc> },
    /// Too soon after the previous issuance
    Denied { retry_after: Duration },
}

impl Reservation {
    pub fn is_granted(&self) -> bool {
        matches!(self, Reservation::Granted { .. })
    }
}

/// Rejects a second issuance for the same identifier within the cooldown
///
/// The check and the timestamp update happen under one shard lock, so two
/// concurrent requests for one identifier cannot both be granted.
pub struct ResendThrottle {
    last_issued: DashMap<String, DateTime<Utc>>,
    cooldown: Duration,
    clock: Arc<dyn Clock>,
}

impl ResendThrottle {
    pub fn new(cooldown: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            last_issued: DashMap::new(),
            cooldown,
            clock,
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Reserve an issuance slot for `identifier`
    ///
    /// `retry_after` on denial is rounded up to whole seconds so a client
    /// that waits exactly that long is accepted.
    pub fn reserve(&self, identifier: &str) -> Reservation {
        let now = self.clock.now();
        if self.cooldown.is_zero() {
            return Reservation::Granted { reserved_at: now };
        }

        match self.last_issued.entry(identifier.to_owned()) {
            Entry::Occupied(mut entry) => {
                let elapsed = (now - *entry.get()).to_std().unwrap_or(Duration::ZERO);
                if elapsed < self.cooldown {
                    Reservation::Denied {
                        retry_after: round_up_to_seconds(self.cooldown - elapsed),
                    }
                } else {
                    entry.insert(now);
                    Reservation::Granted { reserved_at: now }
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(now);
                Reservation::Granted { reserved_at: now }
            }
        }
    }

    pub fn try_reserve(&self, identifier: &str) -> bool {
        self.reserve(identifier).is_granted()
    }

    /// Forget the last issuance so the next request is accepted immediately
    pub fn release(&self, identifier: &str) {
        self.last_issued.remove(identifier);
    }

    /// Undo one granted reservation
    ///
    /// A no-op when a later reservation has since replaced it, so a slow
    /// failure cannot clear a newer issuance's cooldown.
    pub fn cancel(&self, identifier: &str, reserved_at: DateTime<Utc>) -> bool {
        self.last_issued
            .remove_if(identifier, |_, issued| *issued == reserved_at)
            .is_some()
    }

    /// When `identifier` may next be issued a code
    pub fn next_allowed_at(&self, identifier: &str) -> Option<DateTime<Utc>> {
        self.last_issued
            .get(identifier)
            .map(|issued| add_std_duration(*issued, self.cooldown))
    }

    /// Drop entries whose cooldown has elapsed
    pub fn sweep_elapsed(&self) -> usize {
        let now = self.clock.now();
        let cooldown = self.cooldown;
        let mut removed = 0;
        self.last_issued.retain(|_, issued| {
            let keep = add_std_duration(*issued, cooldown) > now;
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    pub fn len(&self) -> usize {
        self.last_issued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_issued.is_empty()
    }
}

fn round_up_to_seconds(duration: Duration) -> Duration {
    let secs = duration.as_secs() + u64::from(duration.subsec_nanos() > 0);
    Duration::from_secs(secs)
}
