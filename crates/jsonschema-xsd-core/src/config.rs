//! Configuration for schema conversion.

use serde::{Deserialize, Serialize};

/// Options for schema conversion.
///
/// ## Serialization Format
///
/// Fields are serialized in `kebab-case` (e.g., `max-depth`,
/// `strict-schema-attributes`) so options can be read from config files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ConvertOptions {
    /// Maximum subschema nesting depth the type synthesizer will descend
    /// into (stack overflow guard). Default: 50.
    pub max_depth: usize,
    /// Fail on unrecognized names inside `@xsdSchemaAttributes` instead of
    /// ignoring them with a warning. Default: false.
    pub strict_schema_attributes: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            max_depth: 50,
            strict_schema_attributes: false,
        }
    }
}
