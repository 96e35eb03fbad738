pub mod error;

pub use error::{json_config, ApiError};
