//! Serialization module.
//!
//! Decouples tree traversal from text formatting: nodes call into the
//! [`Serializer`] interface during a depth-first walk and the registered
//! implementation owns every formatting decision. Currently supports JSON.

pub mod json;
pub mod traits;

pub use json::JsonSerializer;
pub use traits::Serializer;

use crate::error::{ConfigError, Result};

/// Mimetype served by [`JsonSerializer`].
pub const JSON_MIMETYPE: &str = "application/json";

/// Looks up the serializer registered for a mimetype.
///
/// The returned serializer writes into `out`; `indent_delta` of zero means
/// fully compact output.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownMimetype`] when no serializer is
/// registered for `mimetype`.
pub fn for_mimetype<'a>(
    mimetype: &str,
    out: &'a mut String,
    indent_delta: usize,
) -> Result<Box<dyn Serializer + 'a>> {
    match mimetype {
        JSON_MIMETYPE => Ok(Box::new(JsonSerializer::new(out, indent_delta))),
        other => Err(ConfigError::UnknownMimetype(other.to_string())),
    }
}
