//! Request and response bodies of the HTTP API

pub mod verification;

pub use verification::{SendCodeRequest, SendCodeResponse, VerifyCodeRequest, VerifyCodeResponse};
