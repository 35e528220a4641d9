//! JSON output implementation.
//!
//! Reproduces the persisted configuration file format exactly: children
//! separated by commas, one value per line at `indent_delta` spaces per
//! depth level, property values on the property's own line, empty
//! containers inline, and a single trailing newline when pretty-printing.
//! An `indent_delta` of zero produces fully compact output with no added
//! whitespace.

use serde_json::Value;

use crate::serializer::traits::Serializer;

/// One open container (or property slot) on the output stack.
struct Frame {
    /// No child has been emitted into this container yet.
    empty: bool,
    /// The next value belongs to a property and supplies its own
    /// separation, so comma/indent handling is suppressed.
    in_property: bool,
}

/// Streaming JSON writer driven by node traversal.
pub struct JsonSerializer<'a> {
    out: &'a mut String,
    indent_delta: usize,
    stack: Vec<Frame>,
}

impl<'a> JsonSerializer<'a> {
    /// Creates a serializer writing into `out`.
    pub fn new(out: &'a mut String, indent_delta: usize) -> Self {
        Self {
            out,
            indent_delta,
            stack: Vec::new(),
        }
    }

    /// Bookkeeping shared by every emitted value: comma after a previous
    /// sibling, then a fresh indented line, unless the value is a
    /// property's value.
    fn will_output_value(&mut self) {
        let Some(top) = self.stack.last_mut() else {
            return;
        };
        let was_empty = std::mem::replace(&mut top.empty, false);
        if top.in_property {
            return;
        }
        if !was_empty {
            self.out.push(',');
        }
        self.newline_indent();
    }

    fn newline_indent(&mut self) {
        if self.indent_delta == 0 {
            return;
        }
        self.out.push('\n');
        for _ in 0..self.stack.len() * self.indent_delta {
            self.out.push(' ');
        }
    }

    fn quote(name: &str) -> String {
        Value::String(name.to_string()).to_string()
    }

    fn format_number(value: f64) -> String {
        if !value.is_finite() {
            return "null".to_string();
        }
        if value.fract() == 0.0 && value >= i64::MIN as f64 && value <= i64::MAX as f64 {
            return (value as i64).to_string();
        }
        value.to_string()
    }
}

impl Serializer for JsonSerializer<'_> {
    fn start(&mut self) {}

    fn end(&mut self) {
        if self.indent_delta != 0 {
            self.out.push('\n');
        }
    }

    fn object(&mut self, body: &mut dyn FnMut(&mut dyn Serializer)) {
        self.will_output_value();
        self.out.push('{');
        self.stack.push(Frame {
            empty: true,
            in_property: false,
        });
        body(self);
        let emitted = self.stack.pop().map(|frame| !frame.empty).unwrap_or(false);
        if emitted {
            self.newline_indent();
        }
        self.out.push('}');
    }

    fn property(&mut self, name: &str, body: &mut dyn FnMut(&mut dyn Serializer)) {
        self.will_output_value();
        self.out.push_str(&Self::quote(name));
        self.out.push_str(": ");
        if let Some(top) = self.stack.last_mut() {
            top.in_property = true;
        }
        body(self);
        if let Some(top) = self.stack.last_mut() {
            top.in_property = false;
        }
    }

    fn array(&mut self, body: &mut dyn FnMut(&mut dyn Serializer)) {
        self.will_output_value();
        self.out.push('[');
        self.stack.push(Frame {
            empty: true,
            in_property: false,
        });
        body(self);
        let emitted = self.stack.pop().map(|frame| !frame.empty).unwrap_or(false);
        if emitted {
            self.newline_indent();
        }
        self.out.push(']');
    }

    fn output_string(&mut self, value: &str) {
        self.will_output_value();
        let quoted = Self::quote(value);
        self.out.push_str(&quoted);
    }

    fn output_number(&mut self, value: f64) {
        self.will_output_value();
        let text = Self::format_number(value);
        self.out.push_str(&text);
    }

    fn output_boolean(&mut self, value: bool) {
        self.will_output_value();
        self.out.push_str(if value { "true" } else { "false" });
    }

    fn output_value(&mut self, value: &Value) {
        match value {
            Value::Null => {
                self.will_output_value();
                self.out.push_str("null");
            }
            Value::Bool(flag) => self.output_boolean(*flag),
            Value::Number(number) => {
                // the source text representation round-trips exactly
                self.will_output_value();
                let text = number.to_string();
                self.out.push_str(&text);
            }
            Value::String(text) => self.output_string(text),
            Value::Array(elements) => self.array(&mut |serializer| {
                for element in elements {
                    serializer.output_value(element);
                }
            }),
            Value::Object(map) => self.object(&mut |serializer| {
                for (key, entry) in map {
                    serializer.property(key, &mut |serializer| serializer.output_value(entry));
                }
            }),
        }
    }
}
