//! Type synthesizer: subschema → simple or complex XSD node.
//!
//! Shape selection follows the classifier. Complex nodes check the four
//! derived-content shapes first (restriction/extension of complex or simple
//! content), all of which are refused; only the plain complex type is built.
//! Simple nodes likewise refuse lists and restrictions and build the plain
//! form from `$ref` or `type`.

use super::{check_ncname, ensure_drained, mark_document_keywords, Converter};
use crate::error::ConvertError;
use crate::keyword::{Keyword, ValueType, XSD_NAMESPACES};
use crate::metadata::{CompatibleTypes, CompatibleXsdType, TypeClassifier};
use crate::pointer::SchemaPointer;
use crate::schema::JsonSchema;
use crate::work_list::WorkList;
use crate::xsd::{QualifiedName, XsdAttribute, XsdComplexType, XsdElement, XsdSequence};

/// Synthesized node, before it is named by its parent.
#[derive(Debug)]
pub(super) enum SchemaNode {
    Complex(XsdComplexType),
    /// Type name of the simple content; `None` when the node declares no type.
    Simple(Option<QualifiedName>),
}

#[derive(Debug)]
pub(super) struct Converted {
    pub node: SchemaNode,
    /// Set by `@xsdAttribute: true`.
    pub as_attribute: bool,
}

const COMPLEX_DERIVATIONS: [CompatibleXsdType; 4] = [
    CompatibleXsdType::ComplexContentRestriction,
    CompatibleXsdType::ComplexContentExtension,
    CompatibleXsdType::SimpleContentRestriction,
    CompatibleXsdType::SimpleContentExtension,
];

const SIMPLE_DERIVATIONS: [CompatibleXsdType; 2] = [
    CompatibleXsdType::SimpleTypeList,
    CompatibleXsdType::SimpleTypeRestriction,
];

impl<C: TypeClassifier + ?Sized> Converter<'_, C> {
    /// Convert a nested subschema with its own work-list, which must be
    /// drained on return.
    pub(super) fn convert_subschema(
        &mut self,
        pointer: &SchemaPointer,
        schema: &JsonSchema,
        depth: usize,
    ) -> Result<Converted, ConvertError> {
        self.enter(pointer, depth)?;

        let mut keywords = schema.work_list();
        mark_document_keywords(&mut keywords);
        let as_attribute = keywords.pull_xsd_attribute().unwrap_or(false);

        let types = self.classifier.compatible_types(pointer);
        let node = if types.is_complex() {
            if as_attribute {
                return Err(ConvertError::unsupported_construct(
                    pointer,
                    "@xsdAttribute on a complex type",
                ));
            }
            SchemaNode::Complex(self.build_complex_type(&mut keywords, pointer, &types, depth)?)
        } else if types.is_simple() {
            SchemaNode::Simple(self.build_simple_type(&mut keywords, pointer, &types)?)
        } else {
            return Err(ConvertError::unsupported_construct(
                pointer,
                "no compatible XSD type shape",
            ));
        };

        ensure_drained(&keywords, pointer)?;
        Ok(Converted { node, as_attribute })
    }

    pub(super) fn build_complex_type(
        &mut self,
        keywords: &mut WorkList<Keyword>,
        pointer: &SchemaPointer,
        types: &CompatibleTypes,
        depth: usize,
    ) -> Result<XsdComplexType, ConvertError> {
        if let Some(shape) = COMPLEX_DERIVATIONS.into_iter().find(|s| types.contains(*s)) {
            return Err(ConvertError::unsupported_construct(
                pointer,
                format!("{shape:?} is not implemented"),
            ));
        }

        // Plain complex type; `type` may only restate `object`.
        if let Some(declared) = keywords.pull_type() {
            if declared != [ValueType::Object] {
                let names: Vec<&str> = declared.iter().map(ValueType::as_str).collect();
                return Err(ConvertError::unsupported_construct(
                    pointer,
                    format!("type [{}] on a complex type", names.join(", ")),
                ));
            }
        }
        let required = keywords.pull_required().unwrap_or_default();
        let properties = keywords.pull_properties().unwrap_or_default();

        if let Some(missing) = required.iter().find(|name| !properties.contains_key(*name)) {
            return Err(ConvertError::schema(
                pointer.combine(&["required"]),
                format!("required property '{missing}' is not declared in properties"),
            ));
        }

        let mut complex_type = XsdComplexType::default();
        let mut sequence = XsdSequence::default();

        for (name, property) in &properties {
            let child = pointer.combine(&["properties", name.as_str()]);
            check_ncname(name, &child)?;
            let is_required = required.contains(name);

            let converted = self.convert_subschema(&child, property, depth + 1)?;
            match converted.node {
                SchemaNode::Simple(type_name) if converted.as_attribute => {
                    complex_type.attributes.push(XsdAttribute {
                        name: name.clone(),
                        type_name,
                        required: is_required,
                    });
                }
                node => sequence.elements.push(named_element(name, node, is_required)),
            }
        }

        if !sequence.elements.is_empty() {
            complex_type.sequence = Some(sequence);
        }
        Ok(complex_type)
    }

    pub(super) fn build_simple_type(
        &mut self,
        keywords: &mut WorkList<Keyword>,
        pointer: &SchemaPointer,
        types: &CompatibleTypes,
    ) -> Result<Option<QualifiedName>, ConvertError> {
        if let Some(shape) = SIMPLE_DERIVATIONS.into_iter().find(|s| types.contains(*s)) {
            return Err(ConvertError::unsupported_construct(
                pointer,
                format!("{shape:?} is not implemented"),
            ));
        }

        match (keywords.pull_ref(), keywords.pull_type()) {
            (Some(_), Some(_)) => Err(ConvertError::unsupported_construct(
                pointer,
                "$ref combined with type",
            )),
            (Some(reference), None) => self.type_name_from_reference(&reference, pointer).map(Some),
            (None, Some(declared)) => type_name_from_type_keyword(&declared, pointer).map(Some),
            (None, None) => Ok(None),
        }
    }

    /// Resolve `#/$defs/<name>` or `#/definitions/<name>` to a type name.
    pub(super) fn type_name_from_reference(
        &self,
        reference: &str,
        at: &SchemaPointer,
    ) -> Result<QualifiedName, ConvertError> {
        let invalid = || ConvertError::InvalidReference {
            path: at.to_string(),
            reference: reference.to_string(),
        };

        // Only same-document fragments can name a generated type.
        if !reference.starts_with('#') {
            return Err(invalid());
        }
        let target = SchemaPointer::parse(reference).ok_or_else(invalid)?;
        let name = match target.segments() {
            [container, name]
                if (container == "$defs" || container == "definitions")
                    && self.schema.has_definition(container, name) =>
            {
                name
            }
            _ => return Err(invalid()),
        };

        // Generated types live in no namespace and are written unprefixed,
        // which a bound default namespace would capture.
        if let Some(uri) = self.xsd.namespace_for("") {
            return Err(ConvertError::schema(
                SchemaPointer::root().combine(&[XSD_NAMESPACES]),
                format!(
                    "'{reference}' at {at} needs an unprefixed type name, \
                     but the default namespace is bound to '{uri}'"
                ),
            ));
        }
        Ok(QualifiedName::local(name.clone()))
    }
}

/// Map a `type` keyword to its built-in XSD primitive.
pub(crate) fn type_name_from_type_keyword(
    declared: &[ValueType],
    at: &SchemaPointer,
) -> Result<QualifiedName, ConvertError> {
    let [single] = declared else {
        return Err(ConvertError::unsupported_construct(
            at,
            "type must have exactly one value",
        ));
    };
    single.xsd_primitive().map(QualifiedName::xsd).ok_or_else(|| {
        ConvertError::unsupported_construct(
            at,
            format!("type '{}' has no XSD primitive mapping", single.as_str()),
        )
    })
}

fn named_element(name: &str, node: SchemaNode, is_required: bool) -> XsdElement {
    let mut element = XsdElement {
        name: name.to_string(),
        min_occurs: (!is_required).then_some(0),
        ..XsdElement::default()
    };
    match node {
        SchemaNode::Complex(complex_type) => element.complex_type = Some(Box::new(complex_type)),
        SchemaNode::Simple(type_name) => element.type_name = type_name,
    }
    element
}
