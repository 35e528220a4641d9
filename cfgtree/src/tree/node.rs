//! Node storage and leaf value coercion.

use serde_json::{Map, Value};

use crate::schema::SchemaType;

/// Index of a node inside its owning [`crate::tree::ConfigTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(pub(crate) usize);

/// Runtime counterpart of a schema fragment bound to a value.
///
/// Nodes never own each other; `parent` and `forward` are arena indices,
/// so dropping the arena frees the whole graph without cycle-breaking.
#[derive(Debug)]
pub(crate) struct Node {
    /// Key or index under the parent; empty for a layer root.
    pub(crate) name: String,
    pub(crate) parent: Option<NodeId>,
    /// Same-shaped node in the next fallback layer, consulted by leaf
    /// reads while this node is undefined.
    pub(crate) forward: Option<NodeId>,
    /// True once a value has been explicitly set or loaded.
    pub(crate) defined: bool,
    /// True once this node was explicitly mutated after construction.
    pub(crate) dirty: bool,
    pub(crate) read_only: bool,
    pub(crate) kind: NodeKind,
}

/// Per-kind node payload. The kind never changes after construction.
#[derive(Debug)]
pub(crate) enum NodeKind {
    Object {
        /// Schema-declared children in declaration order.
        children: Vec<(String, NodeId)>,
        /// Untyped key bag; present only when the schema fragment allows
        /// `additionalProperties`.
        extra: Option<Map<String, Value>>,
    },
    Array {
        items: Vec<NodeId>,
    },
    String {
        value: Option<std::string::String>,
        default: Option<std::string::String>,
    },
    Boolean {
        value: Option<bool>,
        default: Option<bool>,
    },
    /// Number and Integer store `f64` so the total, silent coercion rules
    /// (non-numeric input becomes NaN) stay representable.
    Number {
        value: Option<f64>,
        default: Option<f64>,
    },
    Integer {
        value: Option<f64>,
        default: Option<f64>,
    },
}

impl NodeKind {
    pub(crate) fn schema_type(&self) -> SchemaType {
        match self {
            NodeKind::Object { .. } => SchemaType::Object,
            NodeKind::Array { .. } => SchemaType::Array,
            NodeKind::String { .. } => SchemaType::String,
            NodeKind::Boolean { .. } => SchemaType::Boolean,
            NodeKind::Number { .. } => SchemaType::Number,
            NodeKind::Integer { .. } => SchemaType::Integer,
        }
    }
}

/// Stringify coercion: strings pass through, scalars use their display
/// form, containers collapse to compact JSON text.
pub(crate) fn coerce_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// Numeric coercion. Total: non-numeric strings coerce to NaN, the empty
/// string to zero, booleans to one/zero, null to zero, containers to NaN.
pub(crate) fn coerce_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().unwrap_or(f64::NAN)
            }
        }
        Value::Bool(true) => 1.0,
        Value::Bool(false) => 0.0,
        Value::Null => 0.0,
        Value::Array(_) | Value::Object(_) => f64::NAN,
    }
}

/// Truthiness coercion: false, zero, NaN, the empty string, and null are
/// falsy; everything else, containers included, is truthy.
pub(crate) fn coerce_boolean(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Null => false,
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Render a stored numeric value as JSON. Integral values come back as
/// integers, non-finite values as null.
pub(crate) fn number_to_value(value: f64) -> Value {
    if !value.is_finite() {
        return Value::Null;
    }
    if value.fract() == 0.0 && value >= i64::MIN as f64 && value <= i64::MAX as f64 {
        return Value::Number(serde_json::Number::from(value as i64));
    }
    serde_json::Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}
