//! In-memory store holding at most one live code per identifier

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;

use super::clock::{add_std_duration, Clock};
use crate::domain::entities::{Channel, VerificationRecord};
use crate::errors::CodeError;

/// Identifier -> live verification record
///
/// Every mutation of one identifier's record happens under that key's shard
/// lock, so a code can be consumed at most once even when verifications race.
pub struct CodeStore {
    records: DashMap<String, VerificationRecord>,
    clock: Arc<dyn Clock>,
}

impl CodeStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            records: DashMap::new(),
            clock,
        }
    }

    /// Store `code` for `identifier`, replacing whatever was there
    ///
    /// A replaced code is unverifiable from this point on, even if its own
    /// lifetime had not run out.
    ///
    /// # Returns
    ///
    /// The expiry instant of the new record
    pub fn put(
        &self,
        identifier: &str,
        code: impl Into<String>,
        channel: Channel,
        ttl: Duration,
    ) -> DateTime<Utc> {
        let issued_at = self.clock.now();
        let expires_at = add_std_duration(issued_at, ttl);
        let record = VerificationRecord::new(identifier, code, channel, issued_at, expires_at);
        self.records.insert(identifier.to_owned(), record);
        expires_at
    }

    /// Check `submitted` against the live code and remove it on success
    ///
    /// * absent -> `NotFound`
    /// * expired -> record removed, `Expired`
    /// * wrong code -> record kept, `Mismatch`
    /// * right code -> record removed, `Ok`
    pub fn consume(&self, identifier: &str, submitted: &str) -> Result<(), CodeError> {
        let now = self.clock.now();
        match self.records.entry(identifier.to_owned()) {
            Entry::Vacant(_) => Err(CodeError::NotFound),
            Entry::Occupied(entry) => {
                if entry.get().is_expired_at(now) {
                    entry.remove();
                    return Err(CodeError::Expired);
                }
                if !entry.get().matches(submitted) {
                    return Err(CodeError::Mismatch);
                }
                entry.remove();
                Ok(())
            }
        }
    }

    /// Drop the record for `identifier`; true if one was present
    pub fn invalidate(&self, identifier: &str) -> bool {
        self.records.remove(identifier).is_some()
    }

    /// Remove every record whose expiry has passed
    ///
    /// # Returns
    ///
    /// Number of records removed
    pub fn sweep_expired(&self) -> usize {
        let now = self.clock.now();
        let mut removed = 0;
        self.records.retain(|_, record| {
            let keep = !record.is_expired_at(now);
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    /// Time left on the live code for `identifier`, if any
    pub fn expires_in(&self, identifier: &str) -> Option<Duration> {
        let now = self.clock.now();
        self.records
            .get(identifier)
            .and_then(|record| record.remaining_at(now))
    }

    /// Records currently held, including expired ones not yet swept
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
