//! Schema fragment parsing.
//!
//! Configuration trees are described by a JSON-Schema-like document using
//! the fields `type`, `properties`, `items`, `additionalProperties`,
//! `default`, and `readOnly`. [`SchemaFragment`] is the parsed form of one
//! such fragment; parsing is recursive and fails fast on fragments a tree
//! could not be built from.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigError, Result};

/// Hard cap on `$ref` indirections while parsing one fragment chain.
const MAX_REF_DEPTH: usize = 64;

/// Value category a schema fragment describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    /// Structural node with named properties.
    Object,
    /// Structural node with indexed elements.
    Array,
    /// String leaf.
    String,
    /// Boolean leaf.
    Boolean,
    /// Floating-point number leaf.
    Number,
    /// Integer leaf (numeric coercion followed by floor).
    Integer,
}

impl SchemaType {
    /// The schema `type` string for this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaType::Object => "object",
            SchemaType::Array => "array",
            SchemaType::String => "string",
            SchemaType::Boolean => "boolean",
            SchemaType::Number => "number",
            SchemaType::Integer => "integer",
        }
    }

    /// Whether this category is a leaf (non-structural) node.
    pub fn is_leaf(&self) -> bool {
        !matches!(self, SchemaType::Object | SchemaType::Array)
    }
}

impl std::fmt::Display for SchemaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed schema fragment.
#[derive(Debug, Clone)]
pub struct SchemaFragment {
    /// Value category of nodes built from this fragment.
    pub kind: SchemaType,
    /// Child fragments in declaration order. Object fragments only.
    pub properties: Vec<(String, SchemaFragment)>,
    /// Element fragment shared by every array item. Array fragments only.
    pub items: Option<Box<SchemaFragment>>,
    /// Whether an object accepts keys with no declared fragment.
    pub additional_properties: bool,
    /// Default value. Leaves only.
    pub default: Option<Value>,
    /// Whether writes through `set()` are rejected.
    pub read_only: bool,
}

impl SchemaFragment {
    /// Parse a schema document rooted at `value`.
    ///
    /// `$ref` entries are resolved against the document's `$defs` or
    /// `definitions` table.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSchema`] for fragments a tree cannot
    /// be built from: non-object fragments, missing or unsupported `type`,
    /// object fragments with neither `properties` nor
    /// `additionalProperties: true`, array fragments without `items`, and
    /// unresolvable `$ref`s.
    pub fn parse(value: &Value) -> Result<Self> {
        Self::parse_fragment(value, value, "", 0)
    }

    /// Generate a fragment from a Rust type's derived JSON schema.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSchema`] when the generated schema
    /// uses constructs outside the supported subset.
    pub fn from_type<T: JsonSchema>() -> Result<Self> {
        let schema = schemars::schema_for!(T);
        let value = serde_json::to_value(&schema).map_err(|e| ConfigError::InvalidSchema {
            path: String::new(),
            reason: format!("schema generation failed: {e}"),
        })?;
        Self::parse(&value)
    }

    fn parse_fragment(value: &Value, root: &Value, path: &str, depth: usize) -> Result<Self> {
        let invalid = |reason: String| ConfigError::InvalidSchema {
            path: path.to_string(),
            reason,
        };

        if depth > MAX_REF_DEPTH {
            return Err(invalid("$ref chain too deep".to_string()));
        }

        let Some(obj) = value.as_object() else {
            return Err(invalid("fragment is not an object".to_string()));
        };

        if let Some(Value::String(reference)) = obj.get("$ref") {
            let target = resolve_ref(root, reference)
                .ok_or_else(|| invalid(format!("unresolved $ref {reference:?}")))?;
            return Self::parse_fragment(target, root, path, depth + 1);
        }

        let kind = parse_type(obj.get("type"), path)?;
        let read_only = matches!(obj.get("readOnly"), Some(Value::Bool(true)));

        match kind {
            SchemaType::Object => {
                let additional_properties =
                    matches!(obj.get("additionalProperties"), Some(Value::Bool(true)));
                let mut properties = Vec::new();
                if let Some(Value::Object(map)) = obj.get("properties") {
                    for (key, child) in map {
                        let child_path = if path.is_empty() {
                            key.clone()
                        } else {
                            format!("{path}.{key}")
                        };
                        let fragment = Self::parse_fragment(child, root, &child_path, depth)?;
                        properties.push((key.clone(), fragment));
                    }
                } else if !additional_properties {
                    return Err(invalid(
                        "object fragment needs properties or additionalProperties".to_string(),
                    ));
                }
                Ok(SchemaFragment {
                    kind,
                    properties,
                    items: None,
                    additional_properties,
                    default: None,
                    read_only,
                })
            }
            SchemaType::Array => {
                let Some(items) = obj.get("items") else {
                    return Err(invalid("array fragment needs items".to_string()));
                };
                let item_path = format!("{path}[]");
                let fragment = Self::parse_fragment(items, root, &item_path, depth)?;
                Ok(SchemaFragment {
                    kind,
                    properties: Vec::new(),
                    items: Some(Box::new(fragment)),
                    additional_properties: false,
                    default: None,
                    read_only,
                })
            }
            _ => Ok(SchemaFragment {
                kind,
                properties: Vec::new(),
                items: None,
                additional_properties: false,
                default: obj.get("default").cloned(),
                read_only,
            }),
        }
    }
}

/// Parse the `type` field, accepting the first non-`"null"` entry of a
/// type array (what derived schemas emit for optional fields).
fn parse_type(value: Option<&Value>, path: &str) -> Result<SchemaType> {
    let invalid = |reason: String| ConfigError::InvalidSchema {
        path: path.to_string(),
        reason,
    };

    let name = match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(entries)) => entries
            .iter()
            .filter_map(|e| e.as_str())
            .find(|s| *s != "null")
            .map(String::from)
            .ok_or_else(|| invalid("type list has no usable entry".to_string()))?,
        Some(other) => return Err(invalid(format!("type must be a string, got {other}"))),
        None => return Err(invalid("missing type".to_string())),
    };

    serde_json::from_value(Value::String(name.clone()))
        .map_err(|_| invalid(format!("unsupported type {name:?}")))
}

/// Resolve a `#/...` reference against the schema document root.
fn resolve_ref<'a>(root: &'a Value, reference: &str) -> Option<&'a Value> {
    let pointer = reference.strip_prefix('#')?;
    let mut current = root;
    for token in pointer.split('/').filter(|t| !t.is_empty()) {
        current = current.get(token)?;
    }
    Some(current)
}
