//! Domain-specific error types and error handling.

mod types;


// Re-export all error types
pub use types::{CodeError, IssueError, SendError};

/// Result of a verification attempt
pub type VerifyResult = Result<(), CodeError>;
