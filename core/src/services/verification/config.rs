//! Configuration for the verification service

use std::time::Duration;

use cs_shared::config::verification::{
    DEFAULT_CODE_TTL_SECONDS, DEFAULT_DISPATCH_TIMEOUT_SECONDS, DEFAULT_RESEND_COOLDOWN_SECONDS,
    DEFAULT_SWEEP_INTERVAL_SECONDS,
};
use cs_shared::VerificationConfig;

use crate::domain::entities::Channel;

/// Configuration for the verification service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationServiceConfig {
    /// Lifetime of codes delivered by SMS
    pub sms_code_ttl: Duration,
    /// Lifetime of codes delivered by email
    pub email_code_ttl: Duration,
    /// Minimum time between two issuances for one identifier (zero disables)
    pub resend_cooldown: Duration,
    /// How often the background sweep runs
    pub sweep_interval: Duration,
    /// Whether `start_sweeper` spawns a task at all
    pub sweeper_enabled: bool,
    /// Upper bound on one `NotificationChannel::send`
    pub dispatch_timeout: Duration,
}

impl Default for VerificationServiceConfig {
    fn default() -> Self {
        Self {
            sms_code_ttl: Duration::from_secs(DEFAULT_CODE_TTL_SECONDS),
            email_code_ttl: Duration::from_secs(DEFAULT_CODE_TTL_SECONDS),
            resend_cooldown: Duration::from_secs(DEFAULT_RESEND_COOLDOWN_SECONDS),
            sweep_interval: Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECONDS),
            sweeper_enabled: true,
            dispatch_timeout: Duration::from_secs(DEFAULT_DISPATCH_TIMEOUT_SECONDS),
        }
    }
}

impl VerificationServiceConfig {
    /// Same lifetime for every channel
    pub fn with_code_ttl(mut self, ttl: Duration) -> Self {
        self.sms_code_ttl = ttl;
        self.email_code_ttl = ttl;
        self
    }

    pub fn with_resend_cooldown(mut self, cooldown: Duration) -> Self {
        self.resend_cooldown = cooldown;
        self
    }

    pub fn with_dispatch_timeout(mut self, timeout: Duration) -> Self {
        self.dispatch_timeout = timeout;
        self
    }

    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    pub fn code_ttl_for(&self, channel: Channel) -> Duration {
        match channel {
            Channel::Sms => self.sms_code_ttl,
            Channel::Email => self.email_code_ttl,
        }
    }
}

impl From<&VerificationConfig> for VerificationServiceConfig {
    fn from(config: &VerificationConfig) -> Self {
        Self {
            sms_code_ttl: config.sms_code_ttl(),
            email_code_ttl: config.email_code_ttl(),
            resend_cooldown: config.resend_cooldown(),
            sweep_interval: config.sweep_interval(),
            sweeper_enabled: config.sweeper_enabled,
            dispatch_timeout: config.dispatch_timeout(),
        }
    }
}
