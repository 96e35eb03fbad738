//! # ChangeSentinel Core
//!
//! Verification code lifecycle engine for the ChangeSentinel backend.
//! This crate owns the domain entities, the in-memory code store, the resend
//! throttle, the expiry sweeper and the service that ties them to a
//! notification channel.

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use services::*;
