//! Main verification service implementation

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use cs_shared::identifier::mask_identifier;

use crate::domain::entities::Channel;
use crate::errors::{CodeError, IssueError, SendError};

use super::clock::{add_std_duration, Clock, SystemClock};
use super::config::VerificationServiceConfig;
use super::generator::{CodeGenerator, SecureCodeGenerator};
use super::store::CodeStore;
use super::sweeper::{ExpirySweeper, SweeperHandle};
use super::throttle::{Reservation, ResendThrottle};
use super::traits::NotificationChannel;
use super::types::IssueReceipt;

/// Issues one-time codes and verifies them
///
/// Callers pass identifiers already normalized; the service treats them as
/// opaque keys.
pub struct VerificationService<N: NotificationChannel + ?Sized> {
    /// Delivery of codes to their subjects
    notifier: Arc<N>,
    /// Live codes by identifier
    store: Arc<CodeStore>,
    /// Resend cooldown by identifier
    throttle: Arc<ResendThrottle>,
    generator: Arc<dyn CodeGenerator>,
    clock: Arc<dyn Clock>,
    /// Service configuration
    config: VerificationServiceConfig,
}

impl<N: NotificationChannel + ?Sized> VerificationService<N> {
    /// Create a service backed by the system clock and the OS random source
    ///
    /// # Arguments
    ///
    /// * `notifier` - Channel implementation that delivers codes
    /// * `config` - Service configuration
    pub fn new(notifier: Arc<N>, config: VerificationServiceConfig) -> Self {
        Self::with_components(
            notifier,
            config,
            Arc::new(SystemClock),
            Arc::new(SecureCodeGenerator),
        )
    }

    /// Create a service with an explicit clock and code generator
    pub fn with_components(
        notifier: Arc<N>,
        config: VerificationServiceConfig,
        clock: Arc<dyn Clock>,
        generator: Arc<dyn CodeGenerator>,
    ) -> Self {
        let store = Arc::new(CodeStore::new(clock.clone()));
        let throttle = Arc::new(ResendThrottle::new(config.resend_cooldown, clock.clone()));

        Self {
            notifier,
            store,
            throttle,
            generator,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &VerificationServiceConfig {
        &self.config
    }

    /// Issue a fresh code for `identifier` and dispatch it to `destination`
    ///
    /// This method:
    /// 1. Rejects channels the notifier cannot serve
    /// 2. Reserves a resend slot, failing with `Throttled` inside the cooldown
    /// 3. Stores a new code, replacing any earlier one
    /// 4. Sends it within the dispatch timeout
    ///
    /// A failed or timed-out send leaves the stored code in place and releases
    /// the resend slot so the caller may retry at once.
    pub async fn issue(
        &self,
        identifier: &str,
        destination: &str,
        channel: Channel,
    ) -> Result<IssueReceipt, IssueError> {
        let masked = mask_identifier(identifier);

        if !self.notifier.supports(channel) {
            tracing::warn!(
                identifier = %masked,
                channel = %channel,
                event = "otp_channel_unavailable",
                "Requested channel is not configured"
            );
            return Err(SendError::ChannelUnavailable { channel }.into());
        }

        let reserved_at = match self.throttle.reserve(identifier) {
            Reservation::Granted { reserved_at } => reserved_at,
            Reservation::Denied { retry_after } => {
                tracing::warn!(
                    identifier = %masked,
                    retry_after_seconds = retry_after.as_secs(),
                    event = "otp_resend_throttled",
                    "Verification code requested inside resend cooldown"
                );
                return Err(IssueError::Throttled { retry_after });
            }
        };

        let code = self.generator.generate();
        let expires_at = self
            .store
            .put(identifier, code.as_str(), channel, self.config.code_ttl_for(channel));

        tracing::info!(
            identifier = %masked,
            channel = %channel,
            expires_at = %expires_at,
            event = "otp_generated",
            "Stored new verification code"
        );

        match self.dispatch(destination, &code, channel).await {
            Ok(message_id) => {
                tracing::info!(
                    identifier = %masked,
                    channel = %channel,
                    message_id = %message_id,
                    event = "otp_dispatched",
                    "Verification code dispatched"
                );

                Ok(IssueReceipt {
                    channel,
                    expires_at,
                    next_resend_at: add_std_duration(reserved_at, self.config.resend_cooldown),
                    message_id,
                })
            }
            Err(err) => {
                self.throttle.cancel(identifier, reserved_at);
                tracing::error!(
                    identifier = %masked,
                    channel = %channel,
                    error = %err,
                    event = "otp_dispatch_failed",
                    "Failed to dispatch verification code"
                );
                Err(IssueError::Delivery(err))
            }
        }
    }

    /// Verify `submitted` against the live code for `identifier`
    ///
    /// Success consumes the code. A mismatch leaves it usable until expiry;
    /// attempts are not counted.
    pub async fn verify(&self, identifier: &str, submitted: &str) -> Result<(), CodeError> {
        let outcome = self.store.consume(identifier, submitted);
        let masked = mask_identifier(identifier);

        match outcome {
            Ok(()) => tracing::info!(
                identifier = %masked,
                event = "otp_verified_success",
                "Verification code verified"
            ),
            Err(err) => tracing::warn!(
                identifier = %masked,
                reason = err.error_code(),
                event = "otp_verification_failed",
                "Verification code rejected"
            ),
        }

        outcome
    }

    /// Drop any live code for `identifier` and clear its cooldown
    pub fn invalidate(&self, identifier: &str) -> bool {
        self.throttle.release(identifier);
        let removed = self.store.invalidate(identifier);
        if removed {
            tracing::info!(
                identifier = %mask_identifier(identifier),
                event = "otp_invalidated",
                "Verification code invalidated"
            );
        }
        removed
    }

    /// Current time on the service's clock
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Number of records held, including expired ones not yet swept
    pub fn active_codes(&self) -> usize {
        self.store.len()
    }

    /// Time left on the live code for `identifier`
    pub fn expires_in(&self, identifier: &str) -> Option<Duration> {
        self.store.expires_in(identifier)
    }

    /// Run one sweep pass now
    pub fn sweep_expired(&self) -> usize {
        self.throttle.sweep_elapsed();
        self.store.sweep_expired()
    }

    /// Start the background sweep on the current tokio runtime
    ///
    /// Returns a disabled handle when the sweeper is turned off in config.
    /// The task ends when the handle is dropped or the service is dropped.
    pub fn start_sweeper(&self) -> SweeperHandle {
        if !self.config.sweeper_enabled {
            tracing::warn!("Expiry sweeper is disabled");
            return SweeperHandle::disabled();
        }

        ExpirySweeper::new(&self.store, &self.throttle, self.config.sweep_interval).start()
    }

    async fn dispatch(
        &self,
        destination: &str,
        code: &str,
        channel: Channel,
    ) -> Result<String, SendError> {
        let timeout = self.config.dispatch_timeout;
        match tokio::time::timeout(timeout, self.notifier.send(destination, code, channel)).await {
            Ok(result) => result,
            Err(_) => Err(SendError::Timeout { after: timeout }),
        }
    }
}
