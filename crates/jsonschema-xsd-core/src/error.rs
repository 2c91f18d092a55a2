//! Error types for schema conversion.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable, machine-readable error codes.
///
/// Variant names and their serialized `snake_case` strings are part of the
/// public contract and must not change across versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ErrorCode {
    /// JSON (de)serialization error.
    JsonParseError,
    /// Malformed keyword value, invalid XML name or namespace prefix.
    SchemaError,
    /// Maximum nesting depth exceeded while synthesizing types.
    RecursionDepthExceeded,
    /// Keywords left over after every applicable handler ran.
    UnsupportedSchema,
    /// A recognized but unimplemented XSD construct was selected.
    UnsupportedConstruct,
    /// A `$ref` does not name a `$defs`/`definitions` entry.
    InvalidReference,
    /// The root schema is neither an inline type nor a reference wrapper.
    InvalidRootShape,
}

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("JSON (de)serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Schema error at {path}: {message}")]
    SchemaError { path: String, message: String },

    #[error("Recursion depth exceeded at {path} (max: {max_depth})")]
    RecursionDepthExceeded { path: String, max_depth: usize },

    #[error("Unhandled keyword(s) in JSON Schema at {path}: '{}'", keywords.join("', '"))]
    UnsupportedSchema { path: String, keywords: Vec<String> },

    #[error("Unsupported construct at {path}: {construct}")]
    UnsupportedConstruct { path: String, construct: String },

    #[error("Invalid reference at {path}: '{reference}' must point to a definition in $defs/definitions")]
    InvalidReference { path: String, reference: String },

    #[error("Invalid root shape: {message}")]
    InvalidRootShape { message: String },
}

impl ConvertError {
    /// Returns the stable error code for this error variant.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            ConvertError::JsonError(_) => ErrorCode::JsonParseError,
            ConvertError::SchemaError { .. } => ErrorCode::SchemaError,
            ConvertError::RecursionDepthExceeded { .. } => ErrorCode::RecursionDepthExceeded,
            ConvertError::UnsupportedSchema { .. } => ErrorCode::UnsupportedSchema,
            ConvertError::UnsupportedConstruct { .. } => ErrorCode::UnsupportedConstruct,
            ConvertError::InvalidReference { .. } => ErrorCode::InvalidReference,
            ConvertError::InvalidRootShape { .. } => ErrorCode::InvalidRootShape,
        }
    }

    /// Returns the schema path context, if available.
    ///
    /// Returns `None` for `JsonError` and `InvalidRootShape` (no path context).
    pub fn path(&self) -> Option<&str> {
        match self {
            ConvertError::JsonError(_) => None,
            ConvertError::SchemaError { path, .. } => Some(path),
            ConvertError::RecursionDepthExceeded { path, .. } => Some(path),
            ConvertError::UnsupportedSchema { path, .. } => Some(path),
            ConvertError::UnsupportedConstruct { path, .. } => Some(path),
            ConvertError::InvalidReference { path, .. } => Some(path),
            ConvertError::InvalidRootShape { .. } => None,
        }
    }

    /// Produces a structured JSON error.
    ///
    /// Format: `{"code": "...", "message": "...", "path": "..." | null}`
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "code": self.error_code(),
            "message": self.to_string(),
            "path": self.path(),
        })
    }

    pub(crate) fn schema(path: impl ToString, message: impl Into<String>) -> Self {
        ConvertError::SchemaError {
            path: path.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn unsupported_construct(path: impl ToString, construct: impl Into<String>) -> Self {
        ConvertError::UnsupportedConstruct {
            path: path.to_string(),
            construct: construct.into(),
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
