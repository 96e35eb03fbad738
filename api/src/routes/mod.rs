//! Route handlers
//!
//! - `health` - liveness and active verification count
//! - `verification` - issuing and checking one-time codes

pub mod health;
pub mod verification;
