//! Configuration tree construction and path operations.
//!
//! A [`ConfigTree`] is the runtime counterpart of a schema bound to a JSON
//! value: one strongly-shaped node per schema fragment, supporting
//! path-addressed reads and writes, multi-layer fallback, dirty-state
//! propagation, and serialization.
//!
//! All nodes of one tree, fallback layers included, live in a single arena
//! indexed by [`NodeId`]; parent and forward links are indices rather than
//! owning references, so dropping the tree frees everything.

mod node;

use log::trace;
use serde_json::{Map, Value};

pub use node::NodeId;
use node::{Node, NodeKind, coerce_boolean, coerce_number, coerce_string, number_to_value};

use crate::error::{ConfigError, Result};
use crate::path::{self, Segment};
use crate::schema::{SchemaFragment, SchemaType};
use crate::serializer::{Serializer, for_mimetype};

/// A live configuration tree built from a schema and a raw JSON value.
#[derive(Debug)]
pub struct ConfigTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl ConfigTree {
    /// Build a tree for `schema` bound to `value`.
    ///
    /// Each entry of `fallbacks` becomes one forward layer: layers are
    /// built back to front in the same arena so that every node can
    /// forward to its counterpart in the next layer. Leaf reads walk at
    /// most `fallbacks.len()` forward hops.
    pub fn build(schema: &SchemaFragment, value: Option<&Value>, fallbacks: &[Value]) -> Self {
        let mut nodes = Vec::new();
        let mut forward = None;
        for layer in fallbacks.iter().rev() {
            forward = Some(build_node(&mut nodes, schema, "", Some(layer), None, forward));
        }
        let root = build_node(&mut nodes, schema, "", value, None, forward);
        trace!(
            "built configuration tree: {} nodes across {} layers",
            nodes.len(),
            fallbacks.len() + 1
        );
        ConfigTree { nodes, root }
    }

    /// The root node of the primary layer.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Resolve a path to a node, if one exists.
    ///
    /// Absence is not an error: `Ok(None)` lets callers decide fallback
    /// behavior, e.g. writing into an `additionalProperties` bag.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPath`] for malformed path strings.
    pub fn resolve(&self, path: &str) -> Result<Option<NodeId>> {
        let segments = path::parse(path)?;
        Ok(self.find(&segments))
    }

    /// Top-level schema property names, in declaration order.
    pub fn keys(&self) -> Vec<&str> {
        match &self.nodes[self.root.0].kind {
            NodeKind::Object { children, .. } => {
                children.iter().map(|(key, _)| key.as_str()).collect()
            }
            _ => Vec::new(),
        }
    }

    /// Whether any node in the primary layer has been mutated.
    pub fn dirty(&self) -> bool {
        self.nodes[self.root.0].dirty
    }

    /// Whether the given node has been mutated (directly or via a
    /// descendant).
    pub fn is_dirty(&self, id: NodeId) -> bool {
        self.nodes[id.0].dirty
    }

    /// Effective value of a node.
    ///
    /// Containers return their live value bag only once defined
    /// (distinguishing "never loaded" from "loaded as empty"); leaves
    /// resolve own value, then the forward chain, then the schema default.
    pub fn get(&self, id: NodeId) -> Option<Value> {
        let defined = self.nodes[id.0].defined;
        match &self.nodes[id.0].kind {
            NodeKind::Object { children, extra } => {
                if !defined {
                    return None;
                }
                let mut map = Map::new();
                for (key, child) in children {
                    if self.nodes[child.0].defined {
                        if let Some(value) = self.get(*child) {
                            map.insert(key.clone(), value);
                        }
                    }
                }
                if let Some(bag) = extra {
                    for (key, value) in bag {
                        map.insert(key.clone(), value.clone());
                    }
                }
                Some(Value::Object(map))
            }
            NodeKind::Array { items } => {
                if !defined {
                    return None;
                }
                Some(Value::Array(
                    items.iter().filter_map(|item| self.get(*item)).collect(),
                ))
            }
            _ => self.leaf_value(id),
        }
    }

    /// Coerce `value` to the node's declared type and store it.
    ///
    /// Marks the node dirty and defined, and propagates both up through
    /// every ancestor.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadOnly`] for structural nodes and leaves
    /// whose schema fragment marks them read-only.
    pub fn set(&mut self, id: NodeId, value: &Value) -> Result<()> {
        if self.nodes[id.0].read_only {
            return Err(ConfigError::ReadOnly {
                path: self.path_of(id),
            });
        }
        match &mut self.nodes[id.0].kind {
            NodeKind::String { value: slot, .. } => *slot = Some(coerce_string(value)),
            NodeKind::Boolean { value: slot, .. } => *slot = Some(coerce_boolean(value)),
            NodeKind::Number { value: slot, .. } => *slot = Some(coerce_number(value)),
            NodeKind::Integer { value: slot, .. } => *slot = Some(coerce_number(value).floor()),
            // containers are always read-only and rejected above
            NodeKind::Object { .. } | NodeKind::Array { .. } => {}
        }
        self.mark_dirty(id);
        Ok(())
    }

    /// Clear a node's stored value and mark it undefined.
    ///
    /// The node keeps its slot under the parent; only the value goes away.
    /// Ancestors are marked dirty so a subsequent save persists the
    /// removal.
    pub fn delete(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent {
            self.mark_dirty(parent);
        }
        let node = &mut self.nodes[id.0];
        node.defined = false;
        match &mut node.kind {
            NodeKind::Object { extra, .. } => {
                if let Some(bag) = extra {
                    bag.clear();
                }
            }
            NodeKind::Array { items } => items.clear(),
            NodeKind::String { value, .. } => *value = None,
            NodeKind::Boolean { value, .. } => *value = None,
            NodeKind::Number { value, .. } | NodeKind::Integer { value, .. } => *value = None,
        }
    }

    /// Effective value at a path; `Ok(None)` when nothing is addressable
    /// there.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPath`] for malformed path strings.
    pub fn get_by_path(&self, path: &str) -> Result<Option<Value>> {
        let segments = path::parse(path)?;
        if let Some(id) = self.find(&segments) {
            return Ok(self.get(id));
        }
        Ok(self.bag_entry(&segments).cloned())
    }

    /// Write `value` at a path.
    ///
    /// When the path names no schema node but its parent is an object
    /// allowing `additionalProperties`, the value is stored verbatim in
    /// that object's untyped bag.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidPath`] for malformed paths,
    /// [`ConfigError::ReadOnly`] for read-only nodes, and
    /// [`ConfigError::UnknownPath`] when no slot exists for the path.
    pub fn set_by_path(&mut self, path: &str, value: &Value) -> Result<()> {
        let segments = path::parse(path)?;
        if let Some(id) = self.find(&segments) {
            return self.set(id, value);
        }
        if let Some((Segment::Key(key), parents)) = segments.split_last() {
            if let Some(parent) = self.find(parents) {
                if let NodeKind::Object {
                    extra: Some(bag), ..
                } = &mut self.nodes[parent.0].kind
                {
                    bag.insert(key.clone(), value.clone());
                    self.mark_dirty(parent);
                    return Ok(());
                }
            }
        }
        Err(ConfigError::UnknownPath {
            path: path.to_string(),
        })
    }

    /// Clear the value at a path. Unresolvable paths are a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPath`] for malformed path strings.
    pub fn delete_by_path(&mut self, path: &str) -> Result<()> {
        let segments = path::parse(path)?;
        if let Some(id) = self.find(&segments) {
            self.delete(id);
            return Ok(());
        }
        if let Some((Segment::Key(key), parents)) = segments.split_last() {
            if let Some(parent) = self.find(parents) {
                if let NodeKind::Object {
                    extra: Some(bag), ..
                } = &mut self.nodes[parent.0].kind
                {
                    if bag.remove(key).is_some() {
                        self.mark_dirty(parent);
                    }
                }
            }
        }
        Ok(())
    }

    /// Declared type of the node at a path; `None` when the path resolves
    /// to no node (untyped bag entries included).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPath`] for malformed path strings.
    pub fn type_of(&self, path: &str) -> Result<Option<SchemaType>> {
        let segments = path::parse(path)?;
        Ok(self
            .find(&segments)
            .map(|id| self.nodes[id.0].kind.schema_type()))
    }

    /// Whether a value has been explicitly set or loaded at a path.
    ///
    /// Distinct from [`get_by_path`](Self::get_by_path) returning a value:
    /// a leaf covered only by a fallback layer or a schema default is not
    /// defined.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPath`] for malformed path strings.
    pub fn is_defined(&self, path: &str) -> Result<bool> {
        let segments = path::parse(path)?;
        if let Some(id) = self.find(&segments) {
            return Ok(self.nodes[id.0].defined);
        }
        Ok(self.bag_entry(&segments).is_some())
    }

    /// Serialize the tree through the serializer registered for
    /// `mimetype`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownMimetype`] when no serializer is
    /// registered for `mimetype`.
    pub fn serialize(&self, mimetype: &str, indent_delta: usize) -> Result<String> {
        let mut out = String::new();
        {
            let mut serializer = for_mimetype(mimetype, &mut out, indent_delta)?;
            serializer.start();
            self.write_node(self.root, &mut *serializer);
            serializer.end();
        }
        Ok(out)
    }

    /// Dotted path of a node, rebuilt from parent links. Diagnostics only.
    pub fn path_of(&self, id: NodeId) -> String {
        let mut parts = Vec::new();
        let mut current = Some(id);
        while let Some(index) = current {
            let node = &self.nodes[index.0];
            if let Some(parent) = node.parent {
                match self.nodes[parent.0].kind {
                    NodeKind::Array { .. } => parts.push(format!("[{}]", node.name)),
                    _ => parts.push(node.name.clone()),
                }
            }
            current = node.parent;
        }
        parts.reverse();
        let mut out = String::new();
        for part in parts {
            if !part.starts_with('[') && !out.is_empty() {
                out.push('.');
            }
            out.push_str(&part);
        }
        out
    }

    fn find(&self, segments: &[Segment]) -> Option<NodeId> {
        let mut current = self.root;
        for segment in segments {
            current = match (&self.nodes[current.0].kind, segment) {
                (NodeKind::Object { children, .. }, Segment::Key(key)) => {
                    children.iter().find(|(k, _)| k == key).map(|(_, id)| *id)?
                }
                (NodeKind::Array { items }, Segment::Index(index)) => items.get(*index).copied()?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Untyped bag entry addressed by the final segment of `segments`.
    fn bag_entry(&self, segments: &[Segment]) -> Option<&Value> {
        let (last, parents) = segments.split_last()?;
        let Segment::Key(key) = last else { return None };
        let parent = self.find(parents)?;
        match &self.nodes[parent.0].kind {
            NodeKind::Object {
                extra: Some(bag), ..
            } => bag.get(key),
            _ => None,
        }
    }

    fn leaf_value(&self, id: NodeId) -> Option<Value> {
        let node = &self.nodes[id.0];
        if node.defined {
            return own_leaf_value(&node.kind);
        }
        if let Some(forward) = node.forward {
            if let Some(value) = self.leaf_value(forward) {
                return Some(value);
            }
        }
        default_leaf_value(&node.kind)
    }

    fn mark_dirty(&mut self, id: NodeId) {
        let mut current = Some(id);
        while let Some(index) = current {
            let node = &mut self.nodes[index.0];
            node.defined = true;
            if node.dirty {
                break;
            }
            node.dirty = true;
            current = node.parent;
        }
    }

    fn write_node(&self, id: NodeId, serializer: &mut dyn Serializer) {
        match &self.nodes[id.0].kind {
            NodeKind::Object { children, extra } => {
                serializer.object(&mut |serializer| {
                    for (key, child) in children {
                        if self.nodes[child.0].defined {
                            serializer
                                .property(key, &mut |serializer| self.write_node(*child, serializer));
                        }
                    }
                    if let Some(bag) = extra {
                        for (key, value) in bag {
                            serializer.property(key, &mut |serializer| serializer.output_value(value));
                        }
                    }
                });
            }
            NodeKind::Array { items } => {
                serializer.array(&mut |serializer| {
                    for item in items {
                        if self.nodes[item.0].defined {
                            self.write_node(*item, serializer);
                        }
                    }
                });
            }
            NodeKind::String { value, .. } => match value {
                Some(text) => serializer.output_string(text),
                None => serializer.output_value(&Value::Null),
            },
            NodeKind::Boolean { value, .. } => match value {
                Some(flag) => serializer.output_boolean(*flag),
                None => serializer.output_value(&Value::Null),
            },
            NodeKind::Number { value, .. } | NodeKind::Integer { value, .. } => match value {
                Some(number) => serializer.output_number(*number),
                None => serializer.output_value(&Value::Null),
            },
        }
    }
}

fn own_leaf_value(kind: &NodeKind) -> Option<Value> {
    match kind {
        NodeKind::String { value, .. } => value.clone().map(Value::String),
        NodeKind::Boolean { value, .. } => value.map(Value::Bool),
        NodeKind::Number { value, .. } | NodeKind::Integer { value, .. } => {
            value.map(number_to_value)
        }
        _ => None,
    }
}

fn default_leaf_value(kind: &NodeKind) -> Option<Value> {
    match kind {
        NodeKind::String { default, .. } => default.clone().map(Value::String),
        NodeKind::Boolean { default, .. } => default.map(Value::Bool),
        NodeKind::Number { default, .. } | NodeKind::Integer { default, .. } => {
            default.map(number_to_value)
        }
        _ => None,
    }
}

fn build_node(
    nodes: &mut Vec<Node>,
    schema: &SchemaFragment,
    name: &str,
    value: Option<&Value>,
    parent: Option<NodeId>,
    forward: Option<NodeId>,
) -> NodeId {
    let id = NodeId(nodes.len());
    nodes.push(Node {
        name: name.to_string(),
        parent,
        forward,
        defined: value.is_some(),
        dirty: false,
        read_only: !schema.kind.is_leaf() || schema.read_only,
        // placeholder until the children below exist
        kind: NodeKind::Array { items: Vec::new() },
    });

    let kind = match schema.kind {
        SchemaType::Object => {
            let mut children = Vec::with_capacity(schema.properties.len());
            for (key, child_schema) in &schema.properties {
                let child_value = value.and_then(|v| v.get(key));
                let child_forward = forward.and_then(|f| object_child(nodes, f, key));
                let child = build_node(nodes, child_schema, key, child_value, Some(id), child_forward);
                children.push((key.clone(), child));
            }
            let extra = schema.additional_properties.then(|| {
                let mut bag = Map::new();
                if let Some(Value::Object(map)) = value {
                    for (key, entry) in map {
                        if !schema.properties.iter().any(|(k, _)| k == key) {
                            bag.insert(key.clone(), entry.clone());
                        }
                    }
                }
                bag
            });
            NodeKind::Object { children, extra }
        }
        SchemaType::Array => {
            let mut items = Vec::new();
            if let (Some(item_schema), Some(Value::Array(elements))) = (&schema.items, value) {
                for (index, element) in elements.iter().enumerate() {
                    let child_forward = forward.and_then(|f| array_item(nodes, f, index));
                    let child = build_node(
                        nodes,
                        item_schema,
                        &index.to_string(),
                        Some(element),
                        Some(id),
                        child_forward,
                    );
                    items.push(child);
                }
            }
            NodeKind::Array { items }
        }
        SchemaType::String => NodeKind::String {
            value: value.map(coerce_string),
            default: schema.default.as_ref().map(coerce_string),
        },
        SchemaType::Boolean => NodeKind::Boolean {
            value: value.map(coerce_boolean),
            default: schema.default.as_ref().map(coerce_boolean),
        },
        SchemaType::Number => NodeKind::Number {
            value: value.map(coerce_number),
            default: schema.default.as_ref().map(coerce_number),
        },
        SchemaType::Integer => NodeKind::Integer {
            value: value.map(|v| coerce_number(v).floor()),
            default: schema.default.as_ref().map(|v| coerce_number(v).floor()),
        },
    };
    nodes[id.0].kind = kind;
    id
}

fn object_child(nodes: &[Node], id: NodeId, key: &str) -> Option<NodeId> {
    match &nodes[id.0].kind {
        NodeKind::Object { children, .. } => {
            children.iter().find(|(k, _)| k == key).map(|(_, id)| *id)
        }
        _ => None,
    }
}

fn array_item(nodes: &[Node], id: NodeId, index: usize) -> Option<NodeId> {
    match &nodes[id.0].kind {
        NodeKind::Array { items } => items.get(index).copied(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn app_schema() -> SchemaFragment {
        SchemaFragment::parse(&json!({
            "type": "object",
            "properties": {
                "name": { "type": "string" },
                "port": { "type": "number", "default": 4200 },
                "strict": { "type": "boolean" }
            }
        }))
        .unwrap()
    }

    #[test]
    fn reads_loaded_values_and_schema_defaults() {
        let schema = app_schema();
        let tree = ConfigTree::build(&schema, Some(&json!({ "name": "app" })), &[]);

        assert_eq!(tree.get_by_path("name").unwrap(), Some(json!("app")));
        assert_eq!(tree.get_by_path("port").unwrap(), Some(json!(4200)));
        assert!(!tree.is_defined("port").unwrap());
        assert!(tree.is_defined("name").unwrap());
        assert_eq!(tree.get_by_path("strict").unwrap(), None);
        assert_eq!(tree.get_by_path("missing").unwrap(), None);
    }

    #[test]
    fn set_coerces_to_declared_type() {
        let schema = app_schema();
        let mut tree = ConfigTree::build(&schema, None, &[]);

        tree.set_by_path("port", &json!("8080")).unwrap();
        assert_eq!(tree.get_by_path("port").unwrap(), Some(json!(8080)));

        tree.set_by_path("name", &json!(42)).unwrap();
        assert_eq!(tree.get_by_path("name").unwrap(), Some(json!("42")));

        tree.set_by_path("strict", &json!("")).unwrap();
        assert_eq!(tree.get_by_path("strict").unwrap(), Some(json!(false)));
    }

    #[test]
    fn coercion_is_idempotent() {
        let schema = app_schema();
        let mut tree = ConfigTree::build(&schema, None, &[]);

        tree.set_by_path("port", &json!("8080")).unwrap();
        let once = tree.get_by_path("port").unwrap().unwrap();
        tree.set_by_path("port", &once).unwrap();
        assert_eq!(tree.get_by_path("port").unwrap(), Some(once));
    }

    #[test]
    fn non_numeric_input_serializes_as_null() {
        let schema = app_schema();
        let mut tree = ConfigTree::build(&schema, None, &[]);
        tree.set_by_path("port", &json!("not-a-port")).unwrap();
        assert_eq!(tree.get_by_path("port").unwrap(), Some(Value::Null));
        let text = tree.serialize("application/json", 0).unwrap();
        assert_eq!(text, r#"{"port": null}"#);
    }

    #[test]
    fn integers_floor_on_write() {
        let schema = SchemaFragment::parse(&json!({
            "type": "object",
            "properties": { "count": { "type": "integer" } }
        }))
        .unwrap();
        let mut tree = ConfigTree::build(&schema, None, &[]);
        tree.set_by_path("count", &json!(3.7)).unwrap();
        assert_eq!(tree.get_by_path("count").unwrap(), Some(json!(3)));
    }

    #[test]
    fn structural_and_read_only_nodes_reject_writes() {
        let schema = SchemaFragment::parse(&json!({
            "type": "object",
            "properties": {
                "cli": {
                    "type": "object",
                    "properties": { "pinned": { "type": "string", "readOnly": true } }
                }
            }
        }))
        .unwrap();
        let mut tree = ConfigTree::build(&schema, None, &[]);

        assert!(matches!(
            tree.set_by_path("cli", &json!({})),
            Err(ConfigError::ReadOnly { .. })
        ));
        let err = tree.set_by_path("cli.pinned", &json!("x")).unwrap_err();
        match err {
            ConfigError::ReadOnly { path } => assert_eq!(path, "cli.pinned"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn dirty_propagates_to_every_ancestor() {
        let schema = SchemaFragment::parse(&json!({
            "type": "object",
            "properties": {
                "cli": {
                    "type": "object",
                    "properties": {
                        "warnings": {
                            "type": "object",
                            "properties": { "versionMismatch": { "type": "boolean" } }
                        }
                    }
                }
            }
        }))
        .unwrap();
        let mut tree = ConfigTree::build(&schema, None, &[]);
        assert!(!tree.dirty());

        tree.set_by_path("cli.warnings.versionMismatch", &json!(false))
            .unwrap();
        assert!(tree.dirty());
        let cli = tree.resolve("cli").unwrap().unwrap();
        let warnings = tree.resolve("cli.warnings").unwrap().unwrap();
        assert!(tree.is_dirty(cli));
        assert!(tree.is_dirty(warnings));
        assert!(tree.is_defined("cli").unwrap());

        // repeating the write on an already-dirty chain must not error
        tree.set_by_path("cli.warnings.versionMismatch", &json!(true))
            .unwrap();
    }

    #[test]
    fn delete_falls_back_to_the_schema_default() {
        let schema = app_schema();
        let mut tree = ConfigTree::build(&schema, Some(&json!({ "port": 9999, "name": "x" })), &[]);

        tree.delete_by_path("port").unwrap();
        assert_eq!(tree.get_by_path("port").unwrap(), Some(json!(4200)));
        assert!(!tree.is_defined("port").unwrap());

        tree.delete_by_path("name").unwrap();
        assert_eq!(tree.get_by_path("name").unwrap(), None);
    }

    #[test]
    fn fallback_layer_answers_until_overridden() {
        let schema = app_schema();
        let mut tree = ConfigTree::build(
            &schema,
            Some(&json!({ "name": "app" })),
            &[json!({ "port": 5555 })],
        );

        assert_eq!(tree.get_by_path("port").unwrap(), Some(json!(5555)));
        tree.set_by_path("port", &json!(7777)).unwrap();
        assert_eq!(tree.get_by_path("port").unwrap(), Some(json!(7777)));
    }

    #[test]
    fn fallback_chain_walks_multiple_layers() {
        let schema = app_schema();
        let tree = ConfigTree::build(
            &schema,
            None,
            &[json!({ "name": "near" }), json!({ "name": "far", "port": 1 })],
        );

        assert_eq!(tree.get_by_path("name").unwrap(), Some(json!("near")));
        assert_eq!(tree.get_by_path("port").unwrap(), Some(json!(1)));
    }

    #[test]
    fn array_elements_are_addressable_by_index() {
        let schema = SchemaFragment::parse(&json!({
            "type": "object",
            "properties": {
                "apps": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": { "root": { "type": "string" } }
                    }
                }
            }
        }))
        .unwrap();
        let mut tree = ConfigTree::build(
            &schema,
            Some(&json!({ "apps": [{ "root": "src" }, { "root": "lib" }] })),
            &[],
        );

        assert_eq!(tree.get_by_path("apps[1].root").unwrap(), Some(json!("lib")));
        tree.set_by_path("apps[0].root", &json!("web")).unwrap();
        assert_eq!(tree.get_by_path("apps[0].root").unwrap(), Some(json!("web")));
        assert_eq!(tree.get_by_path("apps[7].root").unwrap(), None);
        assert_eq!(
            tree.type_of("apps").unwrap(),
            Some(SchemaType::Array)
        );
    }

    #[test]
    fn open_objects_accept_untyped_keys() {
        let schema = SchemaFragment::parse(&json!({
            "type": "object",
            "properties": {
                "defaults": { "type": "object", "additionalProperties": true }
            }
        }))
        .unwrap();
        let mut tree = ConfigTree::build(&schema, Some(&json!({ "defaults": { "x": 1 } })), &[]);

        assert_eq!(tree.get_by_path("defaults.x").unwrap(), Some(json!(1)));
        tree.set_by_path("defaults.y", &json!(2)).unwrap();
        assert_eq!(tree.get_by_path("defaults.y").unwrap(), Some(json!(2)));
        assert!(tree.is_defined("defaults.y").unwrap());
        assert_eq!(tree.type_of("defaults.y").unwrap(), None);

        tree.delete_by_path("defaults.y").unwrap();
        assert_eq!(tree.get_by_path("defaults.y").unwrap(), None);
    }

    #[test]
    fn closed_objects_reject_unknown_keys() {
        let schema = app_schema();
        let mut tree = ConfigTree::build(&schema, None, &[]);
        assert!(matches!(
            tree.set_by_path("nope", &json!(1)),
            Err(ConfigError::UnknownPath { .. })
        ));
    }

    #[test]
    fn empty_path_addresses_the_root() {
        let schema = app_schema();
        let tree = ConfigTree::build(&schema, Some(&json!({ "name": "app" })), &[]);
        assert_eq!(
            tree.get_by_path("").unwrap(),
            Some(json!({ "name": "app" }))
        );
        assert_eq!(tree.keys(), vec!["name", "port", "strict"]);
    }

    #[test]
    fn serialization_omits_undefined_properties() {
        let schema = SchemaFragment::parse(&json!({
            "type": "object",
            "properties": {
                "a": { "type": "string" },
                "b": { "type": "string" }
            }
        }))
        .unwrap();
        let mut tree = ConfigTree::build(&schema, None, &[]);
        tree.set_by_path("a", &json!("value")).unwrap();

        let text = tree.serialize("application/json", 0).unwrap();
        assert_eq!(text, r#"{"a": "value"}"#);
    }

    #[test]
    fn unknown_mimetype_is_rejected() {
        let schema = app_schema();
        let tree = ConfigTree::build(&schema, None, &[]);
        assert!(matches!(
            tree.serialize("application/toml", 2),
            Err(ConfigError::UnknownMimetype(_))
        ));
    }
}
