//! Verification route handlers
//!
//! - Issuing a code (`send_code`)
//! - Checking a code (`verify_code`)

pub mod send_code;
pub mod verify_code;

pub use send_code::send_code;
pub use verify_code::verify_code;

use cs_core::Channel;
use cs_shared::identifier::{Identifier, IdentifierKind};

use crate::handlers::error::ApiError;

/// Pick the delivery channel: the requested one when it fits the identifier,
/// otherwise the one implied by its shape
pub(crate) fn resolve_channel(
    identifier: &Identifier,
    requested: Option<&str>,
) -> Result<Channel, ApiError> {
    let inferred = match identifier.kind() {
        IdentifierKind::Phone => Channel::Sms,
        IdentifierKind::Email => Channel::Email,
    };

    let Some(raw) = requested else {
        return Ok(inferred);
    };

    let channel: Channel = raw.parse().map_err(ApiError::BadRequest)?;
    if channel != inferred {
        return Err(ApiError::BadRequest(format!(
            "Cannot deliver {} to a {} identifier",
            channel,
            identifier.kind()
        )));
    }
    Ok(channel)
}
