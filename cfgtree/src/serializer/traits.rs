//! Serialization interface definitions.
//!
//! Defines the standard interface that all output formats must implement.

use serde_json::Value;

/// Serialization interface trait.
///
/// Nodes drive a depth-first traversal and call these operations in
/// document order; implementations own all formatting state. Container
/// operations take a callback that emits the container's children, so a
/// format can wrap, indent, and separate them however it needs to.
pub trait Serializer {
    /// Called once before the root value is emitted.
    fn start(&mut self);

    /// Called once after the root value has been emitted.
    fn end(&mut self);

    /// Emits an object whose properties are produced by `body`.
    fn object(&mut self, body: &mut dyn FnMut(&mut dyn Serializer));

    /// Emits one named property inside an object; `body` produces the
    /// value.
    fn property(&mut self, name: &str, body: &mut dyn FnMut(&mut dyn Serializer));

    /// Emits an array whose elements are produced by `body`.
    fn array(&mut self, body: &mut dyn FnMut(&mut dyn Serializer));

    /// Emits a string leaf value.
    fn output_string(&mut self, value: &str);

    /// Emits a numeric leaf value.
    fn output_number(&mut self, value: f64);

    /// Emits a boolean leaf value.
    fn output_boolean(&mut self, value: bool);

    /// Emits an untyped value, e.g. from an `additionalProperties` bag.
    fn output_value(&mut self, value: &Value);
}
