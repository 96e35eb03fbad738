//! Shared utilities and common types for the ChangeSentinel server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types loaded from the environment
//! - Error and response envelopes for the HTTP layer
//! - Identifier utilities (phone and email normalization, validation, masking)

pub mod config;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, ConfigError, CorsConfig, EmailProvider, Environment, LogFormat, LoggingConfig,
    NotificationConfig, ServerConfig, SmsProvider, VerificationConfig,
};
pub use errors::{error_codes, ApiResult, ErrorResponse, IntoErrorResponse};
pub use types::{ApiResponse, HealthResponse};
pub use utils::{email, identifier, phone};
