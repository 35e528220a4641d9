//! Dotted path parsing.
//!
//! Paths address nodes inside a configuration tree with dot-separated keys
//! and optional bracket indices, e.g. `apps[0].root` or
//! `cli.warnings.versionMismatch`. The parser is a pure string-to-segment
//! transformation with no schema knowledge; resolution against a tree lives
//! on [`crate::tree::ConfigTree`].

use std::fmt;

use crate::error::{ConfigError, Result};

/// One step of a parsed configuration path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Object property key.
    Key(String),
    /// Array element index.
    Index(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => write!(f, "{key}"),
            Segment::Index(index) => write!(f, "[{index}]"),
        }
    }
}

/// Parse a dotted path with optional bracket indices into segments.
///
/// Segments are separated by `.`; any segment may be followed by one or
/// more `[n]` groups which become additional [`Segment::Index`] entries.
/// Empty segments produced by leading, trailing, or doubled dots are
/// dropped, so the empty path parses to an empty segment list.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidPath`] when a bracket group does not
/// close, its content is not an unsigned integer, or text follows a
/// closing bracket inside the same segment.
pub fn parse(path: &str) -> Result<Vec<Segment>> {
    let invalid = |segment: &str| ConfigError::InvalidPath {
        path: path.to_string(),
        segment: segment.to_string(),
    };

    let mut segments = Vec::new();
    for part in path.split('.') {
        if part.is_empty() {
            continue;
        }
        let (head, mut rest) = match part.find('[') {
            Some(pos) => (&part[..pos], &part[pos..]),
            None => (part, ""),
        };
        if !head.is_empty() {
            segments.push(Segment::Key(head.to_string()));
        }
        while !rest.is_empty() {
            let Some(body) = rest.strip_prefix('[') else {
                return Err(invalid(part));
            };
            let Some(close) = body.find(']') else {
                return Err(invalid(part));
            };
            let index = body[..close]
                .trim()
                .parse::<usize>()
                .map_err(|_| invalid(part))?;
            segments.push(Segment::Index(index));
            rest = &body[close + 1..];
        }
    }
    Ok(segments)
}
