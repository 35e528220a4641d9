//! Error types and result definitions for configuration trees.

use thiserror::Error;

/// Convenience alias for results produced by this crate.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors raised while parsing paths or schemas, mutating trees, or
/// loading and saving configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A path string could not be parsed into segments.
    #[error("invalid path {path:?}: bad segment {segment:?}")]
    InvalidPath {
        /// The full path string as given by the caller.
        path: String,
        /// The segment that failed to parse.
        segment: String,
    },

    /// A schema fragment is structurally unusable.
    #[error("invalid schema at {path:?}: {reason}")]
    InvalidSchema {
        /// Dotted location of the offending fragment inside the schema.
        path: String,
        /// What is wrong with the fragment.
        reason: String,
    },

    /// `set()` was invoked on a node whose schema marks it read-only, or
    /// on a structural (object/array) node.
    #[error("cannot set read-only node at {path:?}")]
    ReadOnly {
        /// Dotted location of the node.
        path: String,
    },

    /// A write targeted a path that resolves to neither a node nor an
    /// `additionalProperties` slot.
    #[error("no configuration slot at {path:?}")]
    UnknownPath {
        /// The path as given by the caller.
        path: String,
    },

    /// The schema or a config file failed to parse as JSON.
    #[error("invalid config file {path}: {source}")]
    InvalidConfig {
        /// Display form of the file path.
        path: String,
        /// The underlying JSON parse error.
        #[source]
        source: serde_json::Error,
    },

    /// The requested serialization mimetype has no registered serializer.
    #[error("no serializer registered for mimetype {0:?}")]
    UnknownMimetype(String),

    /// Filesystem failure while loading or saving.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
