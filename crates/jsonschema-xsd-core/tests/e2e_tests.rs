//! End-to-end integration tests that run the converter and the XSD writer
//! against the shared fixture schemas and the reference scenarios.

use jsonschema_xsd_core::metadata::CompatibleXsdType::*;
use jsonschema_xsd_core::xsd::{QualifiedName, XsdItem};
use jsonschema_xsd_core::{
    convert, to_xsd_string, ConvertError, ConvertOptions, ErrorCode, XsdMetadata, XsdSchema,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;

// ── Helpers ─────────────────────────────────────────────────────────────────

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../tests/schemas");

fn fixture_names() -> Vec<&'static str> {
    vec!["person", "order", "recursive"]
}

fn load_json<T: serde::de::DeserializeOwned>(file: &str) -> T {
    let path = Path::new(FIXTURES_DIR).join(file);
    let content = fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {file}: {e}"));
    serde_json::from_str(&content).unwrap_or_else(|e| panic!("Failed to parse fixture {file}: {e}"))
}

fn load_fixture(name: &str) -> (Value, XsdMetadata) {
    (
        load_json(&format!("{name}.schema.json")),
        load_json(&format!("{name}.metadata.json")),
    )
}

fn convert_fixture(name: &str) -> XsdSchema {
    let (schema, metadata) = load_fixture(name);
    convert(&schema, &metadata, &ConvertOptions::default())
        .unwrap_or_else(|e| panic!("{name} failed to convert: {e}"))
}

fn root_elements(xsd: &XsdSchema) -> usize {
    xsd.items
        .iter()
        .filter(|item| matches!(item, XsdItem::Element(_)))
        .count()
}

// ── Fixtures ────────────────────────────────────────────────────────────────

#[test]
fn test_e2e_all_fixtures_have_one_root() {
    for name in fixture_names() {
        let xsd = convert_fixture(name);
        assert_eq!(root_elements(&xsd), 1, "{name}");
    }
}

#[test]
fn test_e2e_person_golden() {
    let expected = fs::read_to_string(Path::new(FIXTURES_DIR).join("person.xsd")).unwrap();
    assert_eq!(to_xsd_string(&convert_fixture("person")).unwrap(), expected);
}

#[test]
fn test_e2e_order_reference_root() {
    let xsd = convert_fixture("order");

    let root = xsd.root_element().unwrap();
    assert_eq!(root.name, "Order");
    assert_eq!(root.type_name, Some(QualifiedName::local("Order")));

    let order = xsd.complex_type("Order").unwrap();
    assert_eq!(order.attributes.len(), 1);
    assert!(order.attributes[0].required);

    let elements = &order.sequence.as_ref().unwrap().elements;
    let names: Vec<_> = elements.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["paid", "line"]);
    assert_eq!(elements[0].min_occurs, Some(0));
    assert_eq!(elements[1].min_occurs, None);
    assert_eq!(elements[1].type_name, Some(QualifiedName::local("Line")));

    assert_eq!(
        xsd.simple_type("Price").unwrap().restriction_base,
        QualifiedName::xsd("decimal")
    );
}

#[test]
fn test_e2e_recursive_definition() {
    let xsd = convert_fixture("recursive");
    let node = xsd.complex_type("Node").unwrap();
    let next = node
        .sequence
        .as_ref()
        .unwrap()
        .elements
        .iter()
        .find(|e| e.name == "next")
        .unwrap();
    assert_eq!(next.type_name, Some(QualifiedName::local("Node")));

    let text = to_xsd_string(&xsd).unwrap();
    assert!(text.contains("<xsd:complexType name=\"Node\">"));
    assert!(text.contains("<xsd:attribute name=\"label\" type=\"xsd:string\"/>"));
}

#[test]
fn test_e2e_idempotent() {
    for name in fixture_names() {
        assert_eq!(convert_fixture(name), convert_fixture(name), "{name}");
    }
}

// ── Scenarios ───────────────────────────────────────────────────────────────

#[test]
fn test_scenario_inline_complex_root() {
    let schema = json!({
        "type": "object",
        "properties": { "name": { "type": "string" } },
        "required": ["name"]
    });
    let metadata = XsdMetadata::new("Root", true)
        .with_types("#", [ComplexType])
        .with_types("#/properties/name", [SimpleType]);

    let xsd = convert(&schema, &metadata, &ConvertOptions::default()).unwrap();

    assert_eq!(root_elements(&xsd), 1);
    let root = xsd.root_element().unwrap();
    assert_eq!(root.name, "Root");
    let complex_type = root.complex_type.as_ref().unwrap();
    let elements = &complex_type.sequence.as_ref().unwrap().elements;
    assert_eq!(elements.len(), 1);
    assert_eq!(elements[0].name, "name");
    assert_eq!(elements[0].min_occurs, None);
    assert_eq!(elements[0].type_name, Some(QualifiedName::xsd("string")));
}

#[test]
fn test_scenario_reference_root() {
    let schema = json!({
        "$defs": { "Age": { "type": "integer" } },
        "allOf": [{ "$ref": "#/$defs/Age" }]
    });
    let metadata = XsdMetadata::new("Root", false).with_types("#/$defs/Age", [SimpleType]);

    let xsd = convert(&schema, &metadata, &ConvertOptions::default()).unwrap();

    let root = xsd.root_element().unwrap();
    assert_eq!(root.type_name, Some(QualifiedName::local("Age")));
    assert!(root.complex_type.is_none());
    assert!(xsd.complex_type("Root").is_none());
}

#[test]
fn test_scenario_derived_content_is_unsupported() {
    let schema = json!({
        "type": "object",
        "properties": { "name": { "type": "string" } }
    });
    let metadata = XsdMetadata::new("Root", true)
        .with_types("#", [ComplexType, ComplexContentExtension])
        .with_types("#/properties/name", [SimpleType]);

    let err = convert(&schema, &metadata, &ConvertOptions::default()).unwrap_err();
    assert_eq!(err.error_code(), ErrorCode::UnsupportedConstruct);
}

#[test]
fn test_scenario_leftover_keyword() {
    let schema = json!({
        "type": "object",
        "properties": { "name": { "type": "string" } },
        "additionalProperties": false
    });
    let metadata = XsdMetadata::new("Root", true)
        .with_types("#", [ComplexType])
        .with_types("#/properties/name", [SimpleType]);

    let err = convert(&schema, &metadata, &ConvertOptions::default()).unwrap_err();
    match err {
        ConvertError::UnsupportedSchema { path, keywords } => {
            assert_eq!(path, "#");
            assert_eq!(keywords, vec!["additionalProperties".to_string()]);
        }
        other => panic!("expected UnsupportedSchema, got {other:?}"),
    }
}

// ── Error Reporting ─────────────────────────────────────────────────────────

#[test]
fn test_error_json_has_stable_code() {
    let schema = json!({ "type": "null" });
    let metadata = XsdMetadata::new("Root", true).with_types("#", [SimpleType]);
    let err = convert(&schema, &metadata, &ConvertOptions::default()).unwrap_err();
    let json = err.to_json();
    assert_eq!(json["code"], "unsupported_construct");
    assert_eq!(json["path"], "#");
}

#[test]
fn test_depth_limit_applies_to_nested_properties() {
    let schema = json!({
        "properties": {
            "a": { "properties": { "b": { "properties": {} } } }
        }
    });
    let metadata = XsdMetadata::new("Root", true)
        .with_types("#", [ComplexType])
        .with_types("#/properties/a", [ComplexType])
        .with_types("#/properties/a/properties/b", [ComplexType]);

    assert!(convert(&schema, &metadata, &ConvertOptions::default()).is_ok());

    let shallow = ConvertOptions {
        max_depth: 1,
        ..ConvertOptions::default()
    };
    let err = convert(&schema, &metadata, &shallow).unwrap_err();
    assert_eq!(err.error_code(), ErrorCode::RecursionDepthExceeded);
}
