//! Domain entities representing core business objects.

pub mod channel;
pub mod verification_record;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use channel::Channel;
pub use verification_record::{VerificationRecord, CODE_LENGTH, CODE_SPACE};
