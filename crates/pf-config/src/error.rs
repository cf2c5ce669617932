//! Error types for configuration handling

use std::path::PathBuf;

use thiserror::Error;

use crate::document::KeyPath;

/// Errors loading or saving a configuration document
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Failed to read the document from disk
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Document is not valid JSON once comments are stripped
    #[error("failed to parse configuration: {0}")]
    Parse(#[source] serde_json::Error),

    /// Document root is not a JSON object
    #[error("configuration root must be an object, got {0}")]
    NotAnObject(&'static str),

    /// Failed to serialize the document
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Failed to write the document to disk
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors applying a radio plan to a document
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MergeError {
    /// Expected mapping node is absent or of another type
    #[error("expected {path} to be an object, got {found}")]
    MissingOrMalformedPath { path: KeyPath, found: &'static str },
}

/// Errors parsing a gateway identifier
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayIdError {
    /// Wrong number of hex digits
    #[error("gateway ID must be 16 hex digits, got {0}")]
    InvalidLength(usize),

    /// Non-hex character
    #[error("invalid gateway ID: {0}")]
    InvalidHex(String),
}
