//! Configuration document tree
//!
//! The packet-forwarder configuration is a JSON object, optionally annotated
//! with `/* ... */` comments. Key order is preserved so a saved document
//! diffs cleanly against the original.

use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::path::Path;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{DocumentError, MergeError};

/// Dotted path to a node of the document (e.g. `SX1301_conf.radio_0`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPath(Vec<String>);

impl KeyPath {
    /// Create a path from its segments
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Path segments, outermost first
    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

/// Name of a node's type, for error messages
pub(crate) fn node_kind(node: Option<&Value>) -> &'static str {
    match node {
        None => "nothing",
        Some(Value::Null) => "null",
        Some(Value::Bool(_)) => "bool",
        Some(Value::Number(_)) => "number",
        Some(Value::String(_)) => "string",
        Some(Value::Array(_)) => "array",
        Some(Value::Object(_)) => "object",
    }
}

/// Remove `/* ... */` comments
///
/// Comments are matched within a single line, from the first `/*` to the last
/// `*/` on that line. Multi-line comments are left alone.
pub fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&strip_line_comment(line));
    }
    out
}

fn strip_line_comment(line: &str) -> Cow<'_, str> {
    let Some(start) = line.find("/*") else {
        return Cow::Borrowed(line);
    };
    match line[start + 2..].rfind("*/") {
        Some(offset) => {
            let end = start + 2 + offset + 2;
            Cow::Owned(format!("{}{}", &line[..start], &line[end..]))
        }
        None => Cow::Borrowed(line),
    }
}

/// A packet-forwarder configuration document
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigDocument {
    root: Map<String, Value>,
}

impl ConfigDocument {
    /// Parse a document, stripping comments first
    pub fn parse(text: &str) -> Result<Self, DocumentError> {
        let stripped = strip_comments(text);
        let value: Value = serde_json::from_str(&stripped).map_err(DocumentError::Parse)?;
        Self::from_value(value)
    }

    /// Wrap an already parsed JSON value; the root must be an object
    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            other => Err(DocumentError::NotAnObject(node_kind(Some(&other)))),
        }
    }

    /// Load a document from disk
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        debug!("Loading packet-forwarder configuration from {}", path.display());
        let text = fs::read_to_string(path).map_err(|source| DocumentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Serialize the document as pretty-printed JSON
    pub fn to_string_pretty(&self) -> Result<String, DocumentError> {
        let mut text = serde_json::to_string_pretty(&self.root).map_err(DocumentError::Serialize)?;
        text.push('\n');
        Ok(text)
    }

    /// Save the document
    ///
    /// The document is written to a sibling temporary file which then
    /// replaces `path`, so readers never observe a half-written file.
    pub fn save(&self, path: &Path) -> Result<(), DocumentError> {
        let text = self.to_string_pretty()?;

        let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
        tmp_name.push(".tmp");
        let tmp_path = path.with_file_name(tmp_name);

        let write_err = |source: std::io::Error| DocumentError::Write {
            path: path.to_path_buf(),
            source,
        };
        fs::write(&tmp_path, text).map_err(write_err)?;
        if let Err(source) = fs::rename(&tmp_path, path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(write_err(source));
        }

        debug!("Saved packet-forwarder configuration to {}", path.display());
        Ok(())
    }

    /// Root mapping
    pub fn root(&self) -> &Map<String, Value> {
        &self.root
    }

    /// Look up a node by path
    pub fn get(&self, path: &KeyPath) -> Option<&Value> {
        let (first, rest) = path.segments().split_first()?;
        rest.iter()
            .try_fold(self.root.get(first)?, |node, segment| node.get(segment))
    }

    /// Mutable mapping node at `path`
    ///
    /// Fails if any node along the path is absent or not an object.
    pub fn mapping_mut(&mut self, path: &KeyPath) -> Result<&mut Map<String, Value>, MergeError> {
        let mut current = &mut self.root;
        for segment in path.segments() {
            match current.get_mut(segment) {
                Some(Value::Object(map)) => current = map,
                other => {
                    return Err(MergeError::MissingOrMalformedPath {
                        path: path.clone(),
                        found: node_kind(other.as_deref()),
                    })
                }
            }
        }
        Ok(current)
    }
}
