//! Common utility functions

pub mod email;
pub mod identifier;
pub mod phone;

// Re-export commonly used utilities
pub use email::{is_valid_email, mask_email, normalize_email};
pub use identifier::{
    mask_identifier, normalize_identifier, Identifier, IdentifierError, IdentifierKind,
};
pub use phone::{is_valid_international_phone, mask_phone_number, normalize_phone_number};
