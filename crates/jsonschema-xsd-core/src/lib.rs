//! # jsonschema-xsd-core
//!
//! Converts a JSON Schema document carrying XML extension keywords
//! (`@xsdNamespaces`, `@xsdSchemaAttributes`, `@xsdAttribute`) into an XML
//! Schema (XSD) document.
//!
//! The conversion is driven by an external classification oracle: a
//! [`TypeClassifier`] that reports, for each schema location, which XSD shapes
//! the node is compatible with, the name of the top-level message element, and
//! whether the root schema defines that message inline.
//!
//! ```
//! use jsonschema_xsd_core::{convert, to_xsd_string, CompatibleXsdType, ConvertOptions, XsdMetadata};
//! use serde_json::json;
//!
//! let schema = json!({
//!     "properties": { "name": { "type": "string" } },
//!     "required": ["name"]
//! });
//! let metadata = XsdMetadata::new("Person", true)
//!     .with_types("#", [CompatibleXsdType::ComplexType])
//!     .with_types("#/properties/name", [CompatibleXsdType::SimpleType]);
//!
//! let xsd = convert(&schema, &metadata, &ConvertOptions::default()).unwrap();
//! let text = to_xsd_string(&xsd).unwrap();
//! assert!(text.contains(r#"<xsd:element name="name" type="xsd:string"/>"#));
//! ```

pub mod config;
pub mod converter;
pub mod error;
pub mod keyword;
pub mod metadata;
pub mod pointer;
pub mod schema;
pub mod work_list;
pub mod writer;
pub mod xsd;

pub use config::ConvertOptions;
pub use converter::{ConversionState, Converter};
pub use error::{ConvertError, ErrorCode};
pub use metadata::{CompatibleTypes, CompatibleXsdType, TypeClassifier, XsdMetadata};
pub use pointer::SchemaPointer;
pub use schema::JsonSchema;
pub use writer::{to_xsd_string, write_xsd};
pub use xsd::XsdSchema;

use serde_json::Value;

/// Parse `schema` and convert it to an XSD tree.
///
/// # Errors
///
/// Returns [`ConvertError`] if the schema is malformed, uses constructs that
/// have no XSD rendering, or leaves keywords unconsumed.
pub fn convert<C: TypeClassifier + ?Sized>(
    schema: &Value,
    classifier: &C,
    options: &ConvertOptions,
) -> Result<XsdSchema, ConvertError> {
    let schema = JsonSchema::from_value(schema)?;
    convert_schema(&schema, classifier, options)
}

/// Convert an already-parsed schema.
pub fn convert_schema<C: TypeClassifier + ?Sized>(
    schema: &JsonSchema,
    classifier: &C,
    options: &ConvertOptions,
) -> Result<XsdSchema, ConvertError> {
    tracing::debug!(
        message = classifier.message_name(),
        inline_root = classifier.has_inline_root(),
        "converting schema"
    );
    Converter::new(schema, classifier, options).convert()
}

/// Parse schema text and convert it, as one step.
///
/// # Errors
///
/// Returns [`ConvertError::JsonError`] when `text` is not valid JSON.
pub fn convert_str<C: TypeClassifier + ?Sized>(
    text: &str,
    classifier: &C,
    options: &ConvertOptions,
) -> Result<XsdSchema, ConvertError> {
    let value: Value = serde_json::from_str(text)?;
    convert(&value, classifier, options)
}
