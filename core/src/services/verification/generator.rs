//! Verification code generation

use rand::{rngs::OsRng, Rng};

use crate::domain::entities::verification_record::{CODE_LENGTH, CODE_SPACE};

/// Produces codes for new issuances
pub trait CodeGenerator: Send + Sync {
    /// A fresh `CODE_LENGTH`-digit decimal string
    fn generate(&self) -> String;
}

/// Uniform 6-digit codes drawn from the operating system CSPRNG
#[derive(Debug, Clone, Copy, Default)]
pub struct SecureCodeGenerator;

impl CodeGenerator for SecureCodeGenerator {
    fn generate(&self) -> String {
        // gen_range rejects out-of-range samples, so every code is equally likely
        let value: u32 = OsRng.gen_range(0..CODE_SPACE);
        format!("{:0width$}", value, width = CODE_LENGTH)
    }
}
