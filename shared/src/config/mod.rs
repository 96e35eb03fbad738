//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `environment` - Environment detection and logging configuration
//! - `notification` - SMS and email provider selection and credentials
//! - `server` - HTTP server and CORS configuration
//! - `verification` - Code lifetime, resend cooldown and sweeping
//!
//! Every section is loaded from process environment variables. Callers are
//! expected to load a `.env` file (if any) before calling [`AppConfig::from_env`].

pub mod environment;
pub mod notification;
pub mod server;
pub mod verification;

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use thiserror::Error;

// Re-export commonly used types
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use notification::{
    EmailProvider, Msg91Credentials, NotificationConfig, SendGridCredentials, SmsProvider,
    TwilioCredentials,
};
pub use server::{CorsConfig, ServerConfig};
pub use verification::VerificationConfig;

/// Configuration errors are fatal: they are raised at startup and never retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration: {key}")]
    Missing { key: String },

    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: String, reason: String },
}

impl ConfigError {
    pub fn missing(key: impl Into<String>) -> Self {
        Self::Missing { key: key.into() }
    }

    pub fn invalid(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Verification code lifecycle configuration
    pub verification: VerificationConfig,

    /// Notification provider configuration
    pub notification: NotificationConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = Environment::from_env();
        let config = Self {
            environment,
            server: ServerConfig::from_env()?,
            verification: VerificationConfig::from_env()?,
            notification: NotificationConfig::from_env()?,
            logging: LoggingConfig::from_env(environment)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check cross-section invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.verification.validate()?;
        self.notification.validate()?;
        if self.environment.is_production() && self.notification.uses_mock_provider() {
            return Err(ConfigError::invalid(
                "SMS_PROVIDER/EMAIL_PROVIDER",
                "mock providers are not allowed in production",
            ));
        }
        Ok(())
    }
}

/// Read an optional, non-empty environment variable
pub(crate) fn env_opt(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Read a required, non-empty environment variable
pub(crate) fn env_required(key: &str) -> Result<String, ConfigError> {
    env_opt(key).ok_or_else(|| ConfigError::missing(key))
}

/// Parse an environment variable, falling back to `default` only when it is unset
pub(crate) fn env_parse<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env_opt(key) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|e| ConfigError::invalid(key, e.to_string())),
        None => Ok(default),
    }
}

/// Parse an optional environment variable
pub(crate) fn env_parse_opt<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_opt(key)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| ConfigError::invalid(key, e.to_string()))
        })
        .transpose()
}
