//! `$defs` / `definitions` → named top-level XSD types.

use indexmap::IndexMap;

use super::types::SchemaNode;
use super::{check_ncname, Converter};
use crate::error::ConvertError;
use crate::keyword::{Keyword, KeywordKind};
use crate::metadata::TypeClassifier;
use crate::pointer::SchemaPointer;
use crate::schema::JsonSchema;
use crate::xsd::{QualifiedName, XsdItem, XsdSimpleType};

const CONTAINERS: [&str; 2] = ["$defs", "definitions"];

impl<C: TypeClassifier + ?Sized> Converter<'_, C> {
    /// Both containers are handled identically; `container` is the keyword
    /// name used to build child pointers.
    pub(super) fn handle_definitions(
        &mut self,
        container: &str,
        definitions: &IndexMap<String, JsonSchema>,
    ) -> Result<(), ConvertError> {
        let container_path = SchemaPointer::root().combine(&[container]);

        for (name, definition) in definitions {
            let pointer = container_path.combine(&[name.as_str()]);
            check_ncname(name, &pointer)?;
            if self.xsd.complex_type(name).is_some() || self.xsd.simple_type(name).is_some() {
                return Err(ConvertError::schema(
                    &pointer,
                    format!("type '{name}' is defined more than once"),
                ));
            }

            let converted = self.convert_subschema(&pointer, definition, 1)?;
            if converted.as_attribute {
                return Err(ConvertError::unsupported_construct(
                    &pointer,
                    "@xsdAttribute on a definition",
                ));
            }

            let item = match converted.node {
                SchemaNode::Complex(mut complex_type) => {
                    complex_type.name = Some(name.clone());
                    XsdItem::ComplexType(complex_type)
                }
                SchemaNode::Simple(Some(base)) => {
                    self.check_simple_base(name, &base, &pointer)?;
                    XsdItem::SimpleType(XsdSimpleType {
                        name: name.clone(),
                        restriction_base: base,
                    })
                }
                SchemaNode::Simple(None) => {
                    return Err(ConvertError::unsupported_construct(
                        &pointer,
                        "simple definition without $ref or type",
                    ));
                }
            };

            tracing::debug!(path = %pointer, "resolved definition");
            self.xsd.items.push(item);
        }
        Ok(())
    }

    /// A named simpleType restricts either a built-in primitive or another
    /// simple definition. Local bases are followed until a built-in is
    /// reached; a chain that comes back to `name` is a cycle.
    fn check_simple_base(
        &self,
        name: &str,
        base: &QualifiedName,
        pointer: &SchemaPointer,
    ) -> Result<(), ConvertError> {
        let mut chain = vec![name.to_string()];
        let mut current = base.clone();

        while current.namespace.is_none() {
            if chain.contains(&current.name) {
                chain.push(current.name);
                return Err(ConvertError::unsupported_construct(
                    pointer,
                    format!("simple type derivation cycle {}", chain.join(" -> ")),
                ));
            }
            let Some((target, definition)) = self.find_definition(&current.name) else {
                return Ok(());
            };

            let types = self.classifier.compatible_types(&target);
            if types.is_complex() || !types.is_simple() {
                return Err(ConvertError::unsupported_construct(
                    pointer,
                    format!(
                        "simple type '{name}' cannot restrict '{}', which is not a simple type",
                        current.name
                    ),
                ));
            }

            // Only a `$ref` base continues the chain; `type` ends at a built-in.
            let next = match definition.get(KeywordKind::Ref) {
                Some(Keyword::Ref(reference)) => {
                    self.type_name_from_reference(reference, &target).ok()
                }
                _ => None,
            };
            let Some(next) = next else {
                return Ok(());
            };
            chain.push(std::mem::replace(&mut current, next).name);
        }
        Ok(())
    }

    fn find_definition(&self, name: &str) -> Option<(SchemaPointer, &JsonSchema)> {
        CONTAINERS.into_iter().find_map(|container| {
            self.schema
                .definition(container, name)
                .map(|definition| (SchemaPointer::root().combine(&[container, name]), definition))
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::metadata::{CompatibleXsdType::*, XsdMetadata};
    use crate::xsd::QualifiedName;
    use crate::{convert, ConvertError, ConvertOptions};
    use serde_json::json;

    fn age_root_meta() -> XsdMetadata {
        XsdMetadata::new("Root", false)
    }

    #[test]
    fn test_simple_and_complex_definitions() {
        let schema = json!({
            "$defs": {
                "Age": { "type": "integer" },
                "Person": {
                    "type": "object",
                    "properties": { "age": { "$ref": "#/$defs/Age" } },
                    "required": ["age"]
                }
            },
            "oneOf": [{ "$ref": "#/$defs/Person" }]
        });
        let meta = age_root_meta()
            .with_types("#/$defs/Age", [SimpleType])
            .with_types("#/$defs/Person", [ComplexType])
            .with_types("#/$defs/Person/properties/age", [SimpleType]);

        let xsd = convert(&schema, &meta, &ConvertOptions::default()).unwrap();

        let age = xsd.simple_type("Age").unwrap();
        assert_eq!(age.restriction_base, QualifiedName::xsd("integer"));

        let person = xsd.complex_type("Person").unwrap();
        let element = &person.sequence.as_ref().unwrap().elements[0];
        assert_eq!(element.type_name, Some(QualifiedName::local("Age")));
        assert_eq!(element.min_occurs, None);
    }

    #[test]
    fn test_legacy_definitions_container() {
        let schema = json!({
            "definitions": { "Code": { "type": "string" } },
            "allOf": [{ "$ref": "#/definitions/Code" }]
        });
        let meta = age_root_meta().with_types("#/definitions/Code", [SimpleType]);
        let xsd = convert(&schema, &meta, &ConvertOptions::default()).unwrap();
        assert!(xsd.simple_type("Code").is_some());
        assert_eq!(
            xsd.root_element().unwrap().type_name,
            Some(QualifiedName::local("Code"))
        );
    }

    #[test]
    fn test_self_reference_resolves_by_name() {
        let schema = json!({
            "$defs": {
                "Node": {
                    "properties": { "next": { "$ref": "#/$defs/Node" } }
                }
            },
            "anyOf": [{ "$ref": "#/$defs/Node" }]
        });
        let meta = age_root_meta()
            .with_types("#/$defs/Node", [ComplexType])
            .with_types("#/$defs/Node/properties/next", [SimpleType]);
        let xsd = convert(&schema, &meta, &ConvertOptions::default()).unwrap();
        let node = xsd.complex_type("Node").unwrap();
        let next = &node.sequence.as_ref().unwrap().elements[0];
        assert_eq!(next.type_name, Some(QualifiedName::local("Node")));
    }

    #[test]
    fn test_duplicate_name_across_containers_fails() {
        let schema = json!({
            "$defs": { "A": { "type": "string" } },
            "definitions": { "A": { "type": "string" } },
            "allOf": [{ "$ref": "#/$defs/A" }]
        });
        let meta = age_root_meta()
            .with_types("#/$defs/A", [SimpleType])
            .with_types("#/definitions/A", [SimpleType]);
        let err = convert(&schema, &meta, &ConvertOptions::default()).unwrap_err();
        assert_eq!(err.path(), Some("#/definitions/A"));
    }

    #[test]
    fn test_simple_definition_restricting_complex_definition_fails() {
        let schema = json!({
            "$defs": {
                "Person": { "properties": { "n": { "type": "string" } } },
                "Alias": { "$ref": "#/$defs/Person" }
            },
            "allOf": [{ "$ref": "#/$defs/Alias" }]
        });
        let meta = age_root_meta()
            .with_types("#/$defs/Person", [ComplexType])
            .with_types("#/$defs/Person/properties/n", [SimpleType])
            .with_types("#/$defs/Alias", [SimpleType]);
        let err = convert(&schema, &meta, &ConvertOptions::default()).unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedConstruct { .. }));
        assert_eq!(err.path(), Some("#/$defs/Alias"));
    }

    #[test]
    fn test_simple_definition_referencing_itself_fails() {
        let schema = json!({
            "$defs": { "A": { "$ref": "#/$defs/A" } },
            "allOf": [{ "$ref": "#/$defs/A" }]
        });
        let meta = age_root_meta().with_types("#/$defs/A", [SimpleType]);
        let err = convert(&schema, &meta, &ConvertOptions::default()).unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedConstruct { .. }));
        assert_eq!(err.path(), Some("#/$defs/A"));
    }

    #[test]
    fn test_simple_definition_cycle_fails() {
        let schema = json!({
            "$defs": {
                "A": { "$ref": "#/definitions/B" }
            },
            "definitions": {
                "B": { "$ref": "#/$defs/A" }
            },
            "allOf": [{ "$ref": "#/$defs/A" }]
        });
        let meta = age_root_meta()
            .with_types("#/$defs/A", [SimpleType])
            .with_types("#/definitions/B", [SimpleType]);
        let err = convert(&schema, &meta, &ConvertOptions::default()).unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedConstruct { .. }));
        assert!(err.to_string().contains("A -> B -> A"), "{err}");
    }

    #[test]
    fn test_simple_definition_chain_to_primitive() {
        let schema = json!({
            "$defs": {
                "Code": { "$ref": "#/$defs/ShortText" },
                "ShortText": { "type": "string" }
            },
            "allOf": [{ "$ref": "#/$defs/Code" }]
        });
        let meta = age_root_meta()
            .with_types("#/$defs/Code", [SimpleType])
            .with_types("#/$defs/ShortText", [SimpleType]);
        let xsd = convert(&schema, &meta, &ConvertOptions::default()).unwrap();
        assert_eq!(
            xsd.simple_type("Code").unwrap().restriction_base,
            QualifiedName::local("ShortText")
        );
    }

    #[test]
    fn test_untyped_simple_definition_fails() {
        let schema = json!({
            "$defs": { "Anything": {} },
            "allOf": [{ "$ref": "#/$defs/Anything" }]
        });
        let meta = age_root_meta().with_types("#/$defs/Anything", [SimpleType]);
        let err = convert(&schema, &meta, &ConvertOptions::default()).unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedConstruct { .. }));
    }
}
