//! Verification code lifecycle configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{env_parse, env_parse_opt, ConfigError};

/// Default code lifetime: 10 minutes
pub const DEFAULT_CODE_TTL_SECONDS: u64 = 600;

/// Default minimum interval between two issuances for one identifier
pub const DEFAULT_RESEND_COOLDOWN_SECONDS: u64 = 60;

/// Default interval of the background expiry sweep
pub const DEFAULT_SWEEP_INTERVAL_SECONDS: u64 = 60;

/// Default upper bound on a single notification dispatch
pub const DEFAULT_DISPATCH_TIMEOUT_SECONDS: u64 = 10;

/// Configuration for issuing and validating one-time codes
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct VerificationConfig {
    /// Lifetime of a code when no channel-specific override is set
    pub code_ttl_seconds: u64,

    /// Lifetime override for codes delivered by SMS
    #[serde(default)]
    pub sms_code_ttl_seconds: Option<u64>,

    /// Lifetime override for codes delivered by email
    #[serde(default)]
    pub email_code_ttl_seconds: Option<u64>,

    /// Minimum seconds between code resend requests (0 disables the throttle)
    pub resend_cooldown_seconds: u64,

    /// How often expired codes are reclaimed
    pub sweep_interval_seconds: u64,

    /// Whether the background sweep runs at all
    #[serde(default = "default_sweeper_enabled")]
    pub sweeper_enabled: bool,

    /// Timeout applied to each notification dispatch
    pub dispatch_timeout_seconds: u64,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            code_ttl_seconds: DEFAULT_CODE_TTL_SECONDS,
            sms_code_ttl_seconds: None,
            email_code_ttl_seconds: None,
            resend_cooldown_seconds: DEFAULT_RESEND_COOLDOWN_SECONDS,
            sweep_interval_seconds: DEFAULT_SWEEP_INTERVAL_SECONDS,
            sweeper_enabled: default_sweeper_enabled(),
            dispatch_timeout_seconds: DEFAULT_DISPATCH_TIMEOUT_SECONDS,
        }
    }
}

impl VerificationConfig {
    /// Load from `CODE_TTL_SECONDS`, `SMS_CODE_TTL_SECONDS`, `EMAIL_CODE_TTL_SECONDS`,
    /// `RESEND_COOLDOWN_SECONDS`, `SWEEP_INTERVAL_SECONDS`, `SWEEPER_ENABLED` and
    /// `DISPATCH_TIMEOUT_SECONDS`
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            code_ttl_seconds: env_parse("CODE_TTL_SECONDS", DEFAULT_CODE_TTL_SECONDS)?,
            sms_code_ttl_seconds: env_parse_opt("SMS_CODE_TTL_SECONDS")?,
            email_code_ttl_seconds: env_parse_opt("EMAIL_CODE_TTL_SECONDS")?,
            resend_cooldown_seconds: env_parse(
                "RESEND_COOLDOWN_SECONDS",
                DEFAULT_RESEND_COOLDOWN_SECONDS,
            )?,
            sweep_interval_seconds: env_parse(
                "SWEEP_INTERVAL_SECONDS",
                DEFAULT_SWEEP_INTERVAL_SECONDS,
            )?,
            sweeper_enabled: env_parse("SWEEPER_ENABLED", default_sweeper_enabled())?,
            dispatch_timeout_seconds: env_parse(
                "DISPATCH_TIMEOUT_SECONDS",
                DEFAULT_DISPATCH_TIMEOUT_SECONDS,
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make codes unusable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.code_ttl_seconds == 0 {
            return Err(ConfigError::invalid("CODE_TTL_SECONDS", "must be greater than zero"));
        }
        if self.sms_code_ttl_seconds == Some(0) {
            return Err(ConfigError::invalid("SMS_CODE_TTL_SECONDS", "must be greater than zero"));
        }
        if self.email_code_ttl_seconds == Some(0) {
            return Err(ConfigError::invalid("EMAIL_CODE_TTL_SECONDS", "must be greater than zero"));
        }
        if self.sweep_interval_seconds == 0 {
            return Err(ConfigError::invalid("SWEEP_INTERVAL_SECONDS", "must be greater than zero"));
        }
        if self.dispatch_timeout_seconds == 0 {
            return Err(ConfigError::invalid("DISPATCH_TIMEOUT_SECONDS", "must be greater than zero"));
        }
        Ok(())
    }

    pub fn code_ttl(&self) -> Duration {
        Duration::from_secs(self.code_ttl_seconds)
    }

    pub fn sms_code_ttl(&self) -> Duration {
        Duration::from_secs(self.sms_code_ttl_seconds.unwrap_or(self.code_ttl_seconds))
    }

    pub fn email_code_ttl(&self) -> Duration {
        Duration::from_secs(self.email_code_ttl_seconds.unwrap_or(self.code_ttl_seconds))
    }

    pub fn resend_cooldown(&self) -> Duration {
        Duration::from_secs(self.resend_cooldown_seconds)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_seconds)
    }

    pub fn dispatch_timeout(&self) -> Duration {
        Duration::from_secs(self.dispatch_timeout_seconds)
    }
}

fn default_sweeper_enabled() -> bool {
    true
}
