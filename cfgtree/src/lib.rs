//! # cfgtree
//!
//! Schema-driven configuration trees with path addressing and layered
//! fallbacks.
//!
//! cfgtree takes a JSON-Schema-like description plus a raw JSON value and
//! builds a live, strongly-shaped configuration tree: path-addressed reads
//! and writes (`apps[0].root`), multi-layer fallback (project config over a
//! global config over schema defaults), dirty-state propagation, aliasing
//! of deprecated keys, and round-trip serialization with a stable on-disk
//! format.
//!
//! ## Features
//!
//! - JSON Schema driven construction: `type`, `properties`, `items`,
//!   `additionalProperties`, `default`, `readOnly`
//! - Dotted/bracketed path addressing for get, set, delete, and type
//!   queries
//! - Any number of fallback layers, consulted in order while a value is
//!   unset
//! - Total, silent type coercion on write (string, boolean, number,
//!   integer)
//! - Schema generation from Rust types via
//!   [schemars](https://docs.rs/schemars)
//! - Pluggable serializer interface with an exact-format JSON
//!   implementation
//!
//! ## Quick Start
//!
//! ```rust
//! use cfgtree::{ConfigTree, SchemaFragment};
//! use serde_json::json;
//!
//! let schema = SchemaFragment::parse(&json!({
//!     "type": "object",
//!     "properties": {
//!         "name": { "type": "string" },
//!         "port": { "type": "number", "default": 4200 }
//!     }
//! }))
//! .unwrap();
//!
//! let mut tree = ConfigTree::build(&schema, Some(&json!({ "name": "app" })), &[]);
//! assert_eq!(tree.get_by_path("name").unwrap(), Some(json!("app")));
//! assert_eq!(tree.get_by_path("port").unwrap(), Some(json!(4200)));
//!
//! tree.set_by_path("port", &json!("8080")).unwrap();
//! assert_eq!(tree.get_by_path("port").unwrap(), Some(json!(8080)));
//! ```
//!
//! ## Modules
//!
//! - [`config_file`] - File-backed configuration loading and persistence
//! - [`error`] - Error types and result definitions
//! - [`path`] - Dotted path parsing
//! - [`schema`] - Schema fragment parsing
//! - [`serializer`] - Output format interface and JSON implementation
//! - [`tree`] - Tree construction and path operations

/// File-backed configuration loading and persistence.
pub mod config_file;

/// Error types and result definitions.
pub mod error;

/// Dotted path parsing.
pub mod path;

/// Schema fragment parsing.
pub mod schema;

/// Output format interface and JSON implementation.
pub mod serializer;

/// Tree construction and path operations.
pub mod tree;

pub use config_file::ConfigFile;
pub use error::{ConfigError, Result};
pub use path::Segment;
pub use schema::{SchemaFragment, SchemaType};
pub use serializer::{JSON_MIMETYPE, JsonSerializer, Serializer};
pub use tree::{ConfigTree, NodeId};
