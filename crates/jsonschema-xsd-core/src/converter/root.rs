//! The single top-level message element.

use super::{check_ncname, Converter};
use crate::error::ConvertError;
use crate::keyword::{Keyword, KeywordKind};
use crate::metadata::TypeClassifier;
use crate::pointer::SchemaPointer;
use crate::work_list::WorkList;
use crate::xsd::{QualifiedName, XsdElement, XsdItem};

impl<C: TypeClassifier + ?Sized> Converter<'_, C> {
    /// Build the root element named after the classifier's message name.
    ///
    /// Inline roots are synthesized from the root work-list; otherwise the
    /// root must be a single-branch combinator wrapping one `$ref`.
    pub(super) fn handle_root_message(
        &mut self,
        keywords: &mut WorkList<Keyword>,
    ) -> Result<(), ConvertError> {
        let pointer = SchemaPointer::root();
        let name = self.classifier.message_name().to_string();
        check_ncname(&name, &pointer)?;

        let mut root = XsdElement {
            name,
            ..XsdElement::default()
        };

        if self.classifier.has_inline_root() {
            if let Some(combinator) = self.root_combinators().next() {
                return Err(ConvertError::unsupported_construct(
                    &pointer,
                    format!("{} on an inline root", combinator.name()),
                ));
            }

            self.enter(&pointer, 0)?;
            let types = self.classifier.compatible_types(&pointer);
            if types.is_complex() {
                let complex_type = self.build_complex_type(keywords, &pointer, &types, 0)?;
                root.complex_type = Some(Box::new(complex_type));
            } else if types.is_simple() {
                root.type_name = self.build_simple_type(keywords, &pointer, &types)?;
            } else {
                return Err(ConvertError::InvalidRootShape {
                    message: "schema has an inline root, but it is not defined as a valid \
                              SimpleType or ComplexType"
                        .to_string(),
                });
            }
        } else {
            root.type_name = Some(self.root_reference_type_name()?);
        }

        tracing::debug!(root = %root.name, "root message built");
        self.xsd.items.push(XsdItem::Element(root));
        Ok(())
    }

    fn root_combinators(&self) -> impl Iterator<Item = &Keyword> + '_ {
        self.schema
            .keywords()
            .iter()
            .filter(|kw| matches!(kw, Keyword::AllOf(_) | Keyword::AnyOf(_) | Keyword::OneOf(_)))
    }

    fn root_reference_type_name(&self) -> Result<QualifiedName, ConvertError> {
        let shape_error = |message: String| ConvertError::InvalidRootShape { message };

        if self.schema.get(KeywordKind::Properties).is_some() {
            return Err(shape_error(
                "a root that wraps a $ref cannot also declare properties".to_string(),
            ));
        }

        let mut combinators = self.root_combinators();
        let wrapper = combinators.next().ok_or_else(|| {
            shape_error("expected an allOf/anyOf/oneOf wrapping a single $ref".to_string())
        })?;
        if let Some(extra) = combinators.next() {
            return Err(shape_error(format!(
                "expected one combinator at the root, found both {} and {}",
                wrapper.name(),
                extra.name()
            )));
        }

        let branches = match wrapper {
            Keyword::AllOf(b) | Keyword::AnyOf(b) | Keyword::OneOf(b) => b,
            _ => return Err(shape_error("root combinator expected".to_string())),
        };
        let [branch] = branches.as_slice() else {
            return Err(shape_error(format!(
                "{} must have exactly one branch, found {}",
                wrapper.name(),
                branches.len()
            )));
        };

        let branch_pointer = SchemaPointer::root().combine(&[wrapper.name(), "0"]);
        match branch.keywords() {
            [Keyword::Ref(reference)] => self.type_name_from_reference(reference, &branch_pointer),
            _ => Err(shape_error(format!(
                "{branch_pointer} must contain only a $ref"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::metadata::{CompatibleXsdType::*, XsdMetadata};
    use crate::xsd::QualifiedName;
    use crate::{convert, ConvertError, ConvertOptions};
    use serde_json::{json, Value};

    fn reference_root(root: Value) -> Result<crate::XsdSchema, ConvertError> {
        let mut schema = json!({ "$defs": { "Age": { "type": "integer" } } });
        schema
            .as_object_mut()
            .unwrap()
            .extend(root.as_object().unwrap().clone());
        let meta = XsdMetadata::new("Melding", false).with_types("#/$defs/Age", [SimpleType]);
        convert(&schema, &meta, &ConvertOptions::default())
    }

    #[test]
    fn test_reference_root_for_each_combinator() {
        for combinator in ["allOf", "anyOf", "oneOf"] {
            let xsd = reference_root(json!({ combinator: [{ "$ref": "#/$defs/Age" }] })).unwrap();
            let root = xsd.root_element().unwrap();
            assert_eq!(root.name, "Melding");
            assert_eq!(root.type_name, Some(QualifiedName::local("Age")));
            assert!(root.complex_type.is_none());
        }
    }

    #[test]
    fn test_reference_root_with_two_branches_fails() {
        let err = reference_root(json!({
            "allOf": [{ "$ref": "#/$defs/Age" }, { "$ref": "#/$defs/Age" }]
        }))
        .unwrap_err();
        assert!(matches!(err, ConvertError::InvalidRootShape { .. }));
    }

    #[test]
    fn test_reference_root_without_ref_fails() {
        let err = reference_root(json!({ "oneOf": [{ "type": "string" }] })).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidRootShape { .. }));
    }

    #[test]
    fn test_reference_root_with_bad_ref_fails_as_reference() {
        let err = reference_root(json!({ "oneOf": [{ "$ref": "#/properties/x" }] })).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidReference { .. }));
        assert_eq!(err.path(), Some("#/oneOf/0"));
    }

    #[test]
    fn test_reference_root_without_combinator_fails() {
        let err = reference_root(json!({})).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidRootShape { .. }));
    }

    #[test]
    fn test_inline_root_without_shape_fails() {
        let schema = json!({ "properties": {} });
        let meta = XsdMetadata::new("Root", true);
        let err = convert(&schema, &meta, &ConvertOptions::default()).unwrap_err();
        assert!(err.to_string().contains("not defined as a valid"));
    }

    #[test]
    fn test_inline_simple_root() {
        let schema = json!({ "type": "boolean" });
        let meta = XsdMetadata::new("Flag", true).with_types("#", [SimpleType]);
        let xsd = convert(&schema, &meta, &ConvertOptions::default()).unwrap();
        assert_eq!(
            xsd.root_element().unwrap().type_name,
            Some(QualifiedName::xsd("boolean"))
        );
    }

    #[test]
    fn test_inline_root_rejects_combinators() {
        let schema = json!({
            "properties": {},
            "allOf": [{ "properties": {} }]
        });
        let meta = XsdMetadata::new("Root", true).with_types("#", [ComplexType]);
        let err = convert(&schema, &meta, &ConvertOptions::default()).unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedConstruct { .. }));
    }

    #[test]
    fn test_invalid_message_name_fails() {
        let schema = json!({ "type": "string" });
        let meta = XsdMetadata::new("not valid", true).with_types("#", [SimpleType]);
        let err = convert(&schema, &meta, &ConvertOptions::default()).unwrap_err();
        assert!(matches!(err, ConvertError::SchemaError { .. }));
    }
}
