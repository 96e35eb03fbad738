//! Type definitions shared by the HTTP layer
//!
//! - `response` - API response wrappers and health checks

pub mod response;

pub use response::{ApiResponse, HealthResponse, HealthStatus};
