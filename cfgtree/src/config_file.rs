//! Configuration file loading and persistence.
//!
//! [`ConfigFile`] binds a [`ConfigTree`] to an on-disk JSON file: it loads
//! the schema, the config value, and any number of fallback layers, and it
//! writes the serialized tree back. Nothing else in the crate touches the
//! filesystem.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use log::debug;
use serde_json::Value;

use crate::error::{ConfigError, Result};
use crate::path::{self, Segment};
use crate::schema::{SchemaFragment, SchemaType};
use crate::serializer::JSON_MIMETYPE;
use crate::tree::ConfigTree;

/// Indent width used when writing configuration files.
const INDENT_DELTA: usize = 2;

/// A schema-backed configuration file bound to an on-disk path.
#[derive(Debug)]
pub struct ConfigFile {
    path: PathBuf,
    tree: ConfigTree,
    /// The config value exactly as loaded, consulted by [`alias`](Self::alias).
    raw: Value,
}

impl ConfigFile {
    /// Load a configuration file against a schema file.
    ///
    /// The schema must exist and parse. A missing or empty config file
    /// yields an empty tree. Fallback files that do not exist are skipped;
    /// existing ones are loaded as forward layers in the given order.
    ///
    /// # Errors
    ///
    /// Fails with [`ConfigError::InvalidConfig`] when the schema, the
    /// config, or an existing fallback file contains malformed JSON, and
    /// with [`ConfigError::InvalidSchema`] when the schema is structurally
    /// unusable. No partially-built state is returned.
    pub fn from_path(
        schema_path: &Path,
        config_path: &Path,
        fallback_paths: &[PathBuf],
    ) -> anyhow::Result<Self> {
        let Some(schema_value) = read_json(schema_path)
            .with_context(|| format!("failed to load schema {}", schema_path.display()))?
        else {
            bail!("schema file {} is empty", schema_path.display());
        };
        let schema = SchemaFragment::parse(&schema_value)?;

        let raw = if config_path.exists() {
            read_json(config_path)
                .with_context(|| format!("failed to load config {}", config_path.display()))?
        } else {
            debug!(
                "config file {} does not exist, starting empty",
                config_path.display()
            );
            None
        };

        let mut fallbacks = Vec::new();
        for fallback in fallback_paths {
            if !fallback.exists() {
                debug!("skipping missing fallback config {}", fallback.display());
                continue;
            }
            if let Some(value) = read_json(fallback)
                .with_context(|| format!("failed to load fallback config {}", fallback.display()))?
            {
                fallbacks.push(value);
            }
        }

        let tree = ConfigTree::build(&schema, raw.as_ref(), &fallbacks);
        debug!(
            "loaded configuration {} with {} fallback layer(s)",
            config_path.display(),
            fallbacks.len()
        );
        Ok(Self {
            path: config_path.to_path_buf(),
            tree,
            raw: raw.unwrap_or(Value::Null),
        })
    }

    /// The config file path this instance was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The underlying configuration tree.
    pub fn tree(&self) -> &ConfigTree {
        &self.tree
    }

    /// Whether any value has been mutated since loading.
    pub fn dirty(&self) -> bool {
        self.tree.dirty()
    }

    /// Effective value at a path; `Ok(None)` when nothing is addressable
    /// there.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPath`] for malformed path strings.
    pub fn get(&self, path: &str) -> Result<Option<Value>> {
        self.tree.get_by_path(path)
    }

    /// Write a value at a path, coerced to the declared type.
    ///
    /// # Errors
    ///
    /// See [`ConfigTree::set_by_path`].
    pub fn set(&mut self, path: &str, value: &Value) -> Result<()> {
        self.tree.set_by_path(path, value)
    }

    /// Whether a value has been explicitly set or loaded at a path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPath`] for malformed path strings.
    pub fn is_defined(&self, path: &str) -> Result<bool> {
        self.tree.is_defined(path)
    }

    /// Declared type at a path, `None` when no schema node exists there.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPath`] for malformed path strings.
    pub fn type_of(&self, path: &str) -> Result<Option<SchemaType>> {
        self.tree.type_of(path)
    }

    /// Clear the value at a path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPath`] for malformed path strings.
    pub fn delete(&mut self, path: &str) -> Result<()> {
        self.tree.delete_by_path(path)
    }

    /// Migrate a deprecated key: copy the raw value found at
    /// `destination` into the node at `source`.
    ///
    /// The destination is resolved against the config value exactly as it
    /// was loaded, not against schema nodes. The copy happens only when
    /// the destination holds a value *and* the source node is still
    /// undefined, so a value already set at the new location is never
    /// clobbered. Returns whether a value was copied; on `false` nothing
    /// is mutated.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPath`] for malformed path strings and
    /// [`ConfigError::ReadOnly`] when the source node rejects writes.
    pub fn alias(&mut self, source: &str, destination: &str) -> Result<bool> {
        let Some(node) = self.tree.resolve(source)? else {
            return Ok(false);
        };
        if self.tree.is_defined(source)? {
            return Ok(false);
        }
        let Some(value) = raw_lookup(&self.raw, destination)? else {
            return Ok(false);
        };
        let value = value.clone();
        self.tree.set(node, &value)?;
        Ok(true)
    }

    /// Serialize the tree to the persisted JSON format.
    ///
    /// # Errors
    ///
    /// See [`ConfigTree::serialize`].
    pub fn serialize(&self) -> Result<String> {
        self.tree.serialize(JSON_MIMETYPE, INDENT_DELTA)
    }

    /// Serialize and write back to the path this instance was loaded
    /// from, fully overwriting prior contents.
    ///
    /// # Errors
    ///
    /// Fails when serialization or the write fails; the file is only
    /// touched after a fully successful serialize pass.
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&self.path)
    }

    /// Serialize and write to an explicit path.
    ///
    /// # Errors
    ///
    /// Fails when serialization or the write fails.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        let text = self.serialize()?;
        fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))?;
        debug!("saved configuration to {}", path.display());
        Ok(())
    }
}

/// Read and parse one JSON file. `Ok(None)` for blank files.
fn read_json(path: &Path) -> Result<Option<Value>> {
    let text = fs::read_to_string(path)?;
    if text.trim().is_empty() {
        return Ok(None);
    }
    let value = serde_json::from_str(&text).map_err(|source| ConfigError::InvalidConfig {
        path: path.display().to_string(),
        source,
    })?;
    Ok(Some(value))
}

/// Walk a raw JSON value by parsed path segments.
fn raw_lookup<'a>(value: &'a Value, path: &str) -> Result<Option<&'a Value>> {
    let segments = path::parse(path)?;
    let mut current = value;
    for segment in &segments {
        let next = match segment {
            Segment::Key(key) => current.get(key.as_str()),
            Segment::Index(index) => current.get(*index),
        };
        match next {
            Some(child) => current = child,
            None => return Ok(None),
        }
    }
    Ok(Some(current))
}
