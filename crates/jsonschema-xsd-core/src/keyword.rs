//! Supported JSON Schema keywords.
//!
//! Every keyword the converter understands is a variant of [`Keyword`];
//! anything else is kept as [`Keyword::Unknown`] so it reaches the
//! exhaustiveness check instead of disappearing. [`KeywordKind`] is the
//! payload-free tag used for work-list bookkeeping.

use std::fmt;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::ConvertError;
use crate::pointer::SchemaPointer;
use crate::schema::JsonSchema;

/// Extension keyword declaring XML namespaces (`prefix → uri`).
pub const XSD_NAMESPACES: &str = "@xsdNamespaces";
/// Extension keyword carrying document-level XSD attributes.
pub const XSD_SCHEMA_ATTRIBUTES: &str = "@xsdSchemaAttributes";
/// Extension keyword rendering a property as an XML attribute.
pub const XSD_ATTRIBUTE: &str = "@xsdAttribute";

/// JSON primitive named by the `type` keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    String,
    Integer,
    Number,
    Boolean,
    Object,
    Array,
    Null,
}

impl ValueType {
    fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "string" => ValueType::String,
            "integer" => ValueType::Integer,
            "number" => ValueType::Number,
            "boolean" => ValueType::Boolean,
            "object" => ValueType::Object,
            "array" => ValueType::Array,
            "null" => ValueType::Null,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Integer => "integer",
            ValueType::Number => "number",
            ValueType::Boolean => "boolean",
            ValueType::Object => "object",
            ValueType::Array => "array",
            ValueType::Null => "null",
        }
    }

    /// Built-in XSD primitive this JSON type maps to, if any.
    ///
    /// `object`, `array` and `null` have no simple-type counterpart.
    pub fn xsd_primitive(&self) -> Option<&'static str> {
        match self {
            ValueType::String => Some("string"),
            ValueType::Integer => Some("integer"),
            ValueType::Number => Some("decimal"),
            ValueType::Boolean => Some("boolean"),
            ValueType::Object | ValueType::Array | ValueType::Null => None,
        }
    }
}

/// Payload-free keyword tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordKind {
    Schema,
    Id,
    Type,
    Defs,
    Definitions,
    Info,
    OneOf,
    AnyOf,
    AllOf,
    Properties,
    Required,
    Ref,
    XsdNamespaces,
    XsdSchemaAttributes,
    XsdAttribute,
    Unknown,
}

/// A single keyword instance with its parsed payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Keyword {
    Schema(String),
    Id(String),
    Type(Vec<ValueType>),
    Defs(IndexMap<String, JsonSchema>),
    Definitions(IndexMap<String, JsonSchema>),
    Info(IndexMap<String, Value>),
    OneOf(Vec<JsonSchema>),
    AnyOf(Vec<JsonSchema>),
    AllOf(Vec<JsonSchema>),
    Properties(IndexMap<String, JsonSchema>),
    Required(Vec<String>),
    Ref(String),
    XsdNamespaces(IndexMap<String, String>),
    XsdSchemaAttributes(IndexMap<String, String>),
    XsdAttribute(bool),
    Unknown { name: String, value: Value },
}

impl Keyword {
    pub fn kind(&self) -> KeywordKind {
        match self {
            Keyword::Schema(_) => KeywordKind::Schema,
            Keyword::Id(_) => KeywordKind::Id,
            Keyword::Type(_) => KeywordKind::Type,
            Keyword::Defs(_) => KeywordKind::Defs,
            Keyword::Definitions(_) => KeywordKind::Definitions,
            Keyword::Info(_) => KeywordKind::Info,
            Keyword::OneOf(_) => KeywordKind::OneOf,
            Keyword::AnyOf(_) => KeywordKind::AnyOf,
            Keyword::AllOf(_) => KeywordKind::AllOf,
            Keyword::Properties(_) => KeywordKind::Properties,
            Keyword::Required(_) => KeywordKind::Required,
            Keyword::Ref(_) => KeywordKind::Ref,
            Keyword::XsdNamespaces(_) => KeywordKind::XsdNamespaces,
            Keyword::XsdSchemaAttributes(_) => KeywordKind::XsdSchemaAttributes,
            Keyword::XsdAttribute(_) => KeywordKind::XsdAttribute,
            Keyword::Unknown { .. } => KeywordKind::Unknown,
        }
    }

    /// The keyword as spelled in the source schema.
    pub fn name(&self) -> &str {
        match self {
            Keyword::Schema(_) => "$schema",
            Keyword::Id(_) => "$id",
            Keyword::Type(_) => "type",
            Keyword::Defs(_) => "$defs",
            Keyword::Definitions(_) => "definitions",
            Keyword::Info(_) => "info",
            Keyword::OneOf(_) => "oneOf",
            Keyword::AnyOf(_) => "anyOf",
            Keyword::AllOf(_) => "allOf",
            Keyword::Properties(_) => "properties",
            Keyword::Required(_) => "required",
            Keyword::Ref(_) => "$ref",
            Keyword::XsdNamespaces(_) => XSD_NAMESPACES,
            Keyword::XsdSchemaAttributes(_) => XSD_SCHEMA_ATTRIBUTES,
            Keyword::XsdAttribute(_) => XSD_ATTRIBUTE,
            Keyword::Unknown { name, .. } => name,
        }
    }

    /// Parse one `name: value` pair of a schema object.
    ///
    /// `path` is the pointer of the schema object owning the keyword.
    pub(crate) fn parse(
        name: &str,
        value: &Value,
        path: &SchemaPointer,
    ) -> Result<Self, ConvertError> {
        let here = path.combine(&[name]);
        let keyword = match name {
            "$schema" => Keyword::Schema(expect_str(value, &here)?),
            "$id" => Keyword::Id(expect_str(value, &here)?),
            "$ref" => Keyword::Ref(expect_str(value, &here)?),
            "type" => Keyword::Type(parse_type(value, &here)?),
            "$defs" => Keyword::Defs(parse_schema_map(value, &here)?),
            "definitions" => Keyword::Definitions(parse_schema_map(value, &here)?),
            "properties" => Keyword::Properties(parse_schema_map(value, &here)?),
            "oneOf" => Keyword::OneOf(parse_schema_array(value, &here)?),
            "anyOf" => Keyword::AnyOf(parse_schema_array(value, &here)?),
            "allOf" => Keyword::AllOf(parse_schema_array(value, &here)?),
            "required" => Keyword::Required(parse_string_array(value, &here)?),
            "info" => Keyword::Info(
                expect_object(value, &here)?
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
            ),
            XSD_NAMESPACES => Keyword::XsdNamespaces(parse_string_map(value, &here)?),
            XSD_SCHEMA_ATTRIBUTES => {
                Keyword::XsdSchemaAttributes(parse_string_map(value, &here)?)
            }
            XSD_ATTRIBUTE => Keyword::XsdAttribute(
                value
                    .as_bool()
                    .ok_or_else(|| ConvertError::schema(&here, "expected a boolean"))?,
            ),
            _ => Keyword::Unknown {
                name: name.to_string(),
                value: value.clone(),
            },
        };
        Ok(keyword)
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Payload parsing helpers
// ---------------------------------------------------------------------------

fn expect_str(value: &Value, path: &SchemaPointer) -> Result<String, ConvertError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ConvertError::schema(path, "expected a string"))
}

fn expect_object<'a>(
    value: &'a Value,
    path: &SchemaPointer,
) -> Result<&'a Map<String, Value>, ConvertError> {
    value
        .as_object()
        .ok_or_else(|| ConvertError::schema(path, "expected an object"))
}

fn parse_type(value: &Value, path: &SchemaPointer) -> Result<Vec<ValueType>, ConvertError> {
    let names: Vec<&str> = match value {
        Value::String(s) => vec![s.as_str()],
        Value::Array(items) if items.is_empty() => {
            return Err(ConvertError::schema(path, "type must name at least one value type"));
        }
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .ok_or_else(|| ConvertError::schema(path, "type entries must be strings"))
            })
            .collect::<Result<_, _>>()?,
        _ => return Err(ConvertError::schema(path, "expected a string or array of strings")),
    };

    names
        .into_iter()
        .map(|name| {
            ValueType::parse(name)
                .ok_or_else(|| ConvertError::schema(path, format!("unknown type '{name}'")))
        })
        .collect()
}

fn parse_schema_map(
    value: &Value,
    path: &SchemaPointer,
) -> Result<IndexMap<String, JsonSchema>, ConvertError> {
    let mut map = IndexMap::new();
    for (name, sub) in expect_object(value, path)? {
        let child = JsonSchema::parse_at(sub, &path.combine(&[name.as_str()]))?;
        map.insert(name.clone(), child);
    }
    Ok(map)
}

fn parse_schema_array(value: &Value, path: &SchemaPointer) -> Result<Vec<JsonSchema>, ConvertError> {
    let items = value
        .as_array()
        .ok_or_else(|| ConvertError::schema(path, "expected an array of schemas"))?;
    items
        .iter()
        .enumerate()
        .map(|(i, sub)| JsonSchema::parse_at(sub, &path.combine(&[i.to_string().as_str()])))
        .collect()
}

fn parse_string_array(value: &Value, path: &SchemaPointer) -> Result<Vec<String>, ConvertError> {
    let items = value
        .as_array()
        .ok_or_else(|| ConvertError::schema(path, "expected an array of strings"))?;
    items
        .iter()
        .map(|item| expect_str(item, path))
        .collect()
}

fn parse_string_map(
    value: &Value,
    path: &SchemaPointer,
) -> Result<IndexMap<String, String>, ConvertError> {
    expect_object(value, path)?
        .iter()
        .map(|(k, v)| Ok((k.clone(), expect_str(v, &path.combine(&[k.as_str()]))?)))
        .collect()
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(name: &str, value: Value) -> Result<Keyword, ConvertError> {
        Keyword::parse(name, &value, &SchemaPointer::root())
    }

    #[test]
    fn test_type_string_and_array_forms() {
        assert_eq!(
            parse("type", json!("string")).unwrap(),
            Keyword::Type(vec![ValueType::String])
        );
        assert_eq!(
            parse("type", json!(["integer", "null"])).unwrap(),
            Keyword::Type(vec![ValueType::Integer, ValueType::Null])
        );
    }

    #[test]
    fn test_empty_type_array_is_schema_error() {
        let err = parse("type", json!([])).unwrap_err();
        assert!(matches!(err, ConvertError::SchemaError { .. }));
        assert_eq!(err.path(), Some("#/type"));
    }

    #[test]
    fn test_unknown_type_name_is_schema_error() {
        let err = parse("type", json!("decimal")).unwrap_err();
        assert_eq!(err.path(), Some("#/type"));
    }

    #[test]
    fn test_required_must_be_string_array() {
        assert!(parse("required", json!("name")).is_err());
        assert!(parse("required", json!([1])).is_err());
        assert_eq!(
            parse("required", json!(["a", "b"])).unwrap(),
            Keyword::Required(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn test_unrecognized_keyword_is_kept() {
        let kw = parse("minLength", json!(3)).unwrap();
        assert_eq!(kw.kind(), KeywordKind::Unknown);
        assert_eq!(kw.name(), "minLength");
    }

    #[test]
    fn test_namespace_map_preserves_order() {
        let kw = parse(
            XSD_NAMESPACES,
            json!({ "z": "urn:z", "a": "urn:a" }),
        )
        .unwrap();
        let Keyword::XsdNamespaces(map) = kw else {
            panic!("expected namespaces keyword");
        };
        assert_eq!(map.keys().collect::<Vec<_>>(), ["z", "a"]);
    }

    #[test]
    fn test_nested_error_path_points_at_child() {
        let err = parse("properties", json!({ "a": { "type": 5 } })).unwrap_err();
        assert_eq!(err.path(), Some("#/properties/a/type"));
    }

    #[test]
    fn test_primitive_table() {
        assert_eq!(ValueType::String.xsd_primitive(), Some("string"));
        assert_eq!(ValueType::Integer.xsd_primitive(), Some("integer"));
        assert_eq!(ValueType::Number.xsd_primitive(), Some("decimal"));
        assert_eq!(ValueType::Boolean.xsd_primitive(), Some("boolean"));
        assert_eq!(ValueType::Object.xsd_primitive(), None);
    }
}
