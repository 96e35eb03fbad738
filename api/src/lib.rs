//! HTTP surface of the ChangeSentinel verification backend
//!
//! Exposes code issuance and verification over actix-web. The binary in
//! `main.rs` wires configuration, providers and the core service together;
//! everything here is also used directly by the integration tests.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod telemetry;

pub use app::{create_app, AppState, SharedVerificationService};
