//! Verification service module for one-time passcode authentication
//!
//! This module provides the complete code lifecycle:
//! - Code generation from the OS random source
//! - A concurrent store with single-use consumption and lazy expiry
//! - A per-identifier resend cooldown
//! - A background sweep that reclaims expired records
//! - Dispatch through a pluggable notification channel

mod clock;
mod config;
mod generator;
mod service;
mod store;
mod sweeper;
mod throttle;
mod traits;
mod types;

#[cfg(test)]
mod tests;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::VerificationServiceConfig;
pub use generator::{CodeGenerator, SecureCodeGenerator};
pub use service::VerificationService;
pub use store::CodeStore;
pub use sweeper::{ExpirySweeper, SweepReport, SweeperHandle};
pub use throttle::{Reservation, ResendThrottle};
pub use traits::NotificationChannel;
pub use types::IssueReceipt;
