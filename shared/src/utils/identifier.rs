//! Verification identifiers
//!
//! An identifier is either an E.164 phone number or an email address. The core
//! treats identifiers as opaque keys, so every caller must run raw input
//! through [`normalize_identifier`] first: otherwise `+1 555 123 4567` and
//! `+15551234567` would hold two independent codes.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::email::{is_valid_email, mask_email, normalize_email};
use super::phone::{is_valid_international_phone, mask_phone_number, normalize_phone_number};

/// Shape of an identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierKind {
    Phone,
    Email,
}

impl IdentifierKind {
    /// Guess the kind from raw input: anything containing `@` is an email
    pub fn detect(raw: &str) -> Self {
        if raw.contains('@') {
            IdentifierKind::Email
        } else {
            IdentifierKind::Phone
        }
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentifierKind::Phone => write!(f, "phone"),
            IdentifierKind::Email => write!(f, "email"),
        }
    }
}

/// Why raw input could not be turned into an identifier
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
    #[error("Identifier is required")]
    Empty,

    #[error("Phone number must include country code (e.g., +1234567890)")]
    InvalidPhone,

    #[error("Invalid email address")]
    InvalidEmail,
}

/// A validated, normalized identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    value: String,
    kind: IdentifierKind,
}

impl Identifier {
    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn kind(&self) -> IdentifierKind {
        self.kind
    }

    pub fn into_string(self) -> String {
        self.value
    }

    /// Log-safe rendering
    pub fn masked(&self) -> String {
        mask_identifier(&self.value)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Validate and normalize raw caller input
pub fn normalize_identifier(raw: &str) -> Result<Identifier, IdentifierError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(IdentifierError::Empty);
    }

    match IdentifierKind::detect(trimmed) {
        IdentifierKind::Email => {
            if !is_valid_email(trimmed) {
                return Err(IdentifierError::InvalidEmail);
            }
            Ok(Identifier {
                value: normalize_email(trimmed),
                kind: IdentifierKind::Email,
            })
        }
        IdentifierKind::Phone => {
            let normalized = normalize_phone_number(trimmed);
            if !is_valid_international_phone(&normalized) {
                return Err(IdentifierError::InvalidPhone);
            }
            Ok(Identifier {
                value: normalized,
                kind: IdentifierKind::Phone,
            })
        }
    }
}

/// Mask any identifier for logging
pub fn mask_identifier(identifier: &str) -> String {
    match IdentifierKind::detect(identifier) {
        IdentifierKind::Email => mask_email(identifier),
        IdentifierKind::Phone => mask_phone_number(identifier),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_phone_identifier() {
        let id = normalize_identifier(" +1 (555) 123-4567 ").unwrap();
        assert_eq!(id.as_str(), "+15551234567");
        assert_eq!(id.kind(), IdentifierKind::Phone);
        assert_eq!(id.masked(), "+15****4567");
    }

    #[test]
    fn test_normalize_email_identifier() {
        let id = normalize_identifier("Jane@Example.com").unwrap();
        assert_eq!(id.as_str(), "jane@example.com");
        assert_eq!(id.kind(), IdentifierKind::Email);
        assert_eq!(id.masked(), "j***@example.com");
    }

    #[test]
    fn test_rejects_bad_input() {
        assert_eq!(normalize_identifier("   "), Err(IdentifierError::Empty));
        assert_eq!(normalize_identifier("5551234567"), Err(IdentifierError::InvalidPhone));
        assert_eq!(normalize_identifier("jane@"), Err(IdentifierError::InvalidEmail));
    }

    #[test]
    fn test_equivalent_inputs_share_a_key() {
        let a = normalize_identifier("+1 555 123 4567").unwrap();
        let b = normalize_identifier("+15551234567").unwrap();
        assert_eq!(a, b);
    }
}
