//! Document-level handling: `@xsdSchemaAttributes`, `@xsdNamespaces`, `info`.

use indexmap::IndexMap;
use serde_json::Value;

use super::{check_ncname, Converter};
use crate::error::ConvertError;
use crate::keyword::{Keyword, KeywordKind, XSD_NAMESPACES, XSD_SCHEMA_ATTRIBUTES};
use crate::metadata::TypeClassifier;
use crate::pointer::SchemaPointer;
use crate::xsd::{
    DerivationMethod, FixedAttribute, XsdAnnotation, XsdDocumentation, XsdForm, XsdItem,
    XML_SCHEMA_INSTANCE_NAMESPACE, XML_SCHEMA_NAMESPACE,
};

/// Prefixes forced into every output document.
const BUILT_IN_NAMESPACES: [(&str, &str); 2] = [
    ("xsd", XML_SCHEMA_NAMESPACE),
    ("xsi", XML_SCHEMA_INSTANCE_NAMESPACE),
];

impl<C: TypeClassifier + ?Sized> Converter<'_, C> {
    pub(super) fn apply_schema_attributes(&mut self) -> Result<(), ConvertError> {
        let Some(Keyword::XsdSchemaAttributes(attributes)) =
            self.schema.get(KeywordKind::XsdSchemaAttributes)
        else {
            return Ok(());
        };

        let path = SchemaPointer::root().combine(&[XSD_SCHEMA_ATTRIBUTES]);
        for (name, value) in attributes {
            let at = path.combine(&[name.as_str()]);
            match name.as_str() {
                "AttributeFormDefault" => {
                    self.xsd.attribute_form_default = Some(parse_form(value, &at)?);
                }
                "ElementFormDefault" => {
                    self.xsd.element_form_default = Some(parse_form(value, &at)?);
                }
                "BlockDefault" => {
                    self.xsd.block_default = Some(parse_derivation(
                        value,
                        &at,
                        DerivationMethod::allowed_in_block_default,
                    )?);
                }
                "FinalDefault" => {
                    self.xsd.final_default = Some(parse_derivation(
                        value,
                        &at,
                        DerivationMethod::allowed_in_final_default,
                    )?);
                }
                other if self.options.strict_schema_attributes => {
                    return Err(ConvertError::schema(
                        &at,
                        format!("unknown schema attribute '{other}'"),
                    ));
                }
                other => {
                    tracing::warn!(attribute = other, "ignoring unknown XSD schema attribute");
                }
            }
        }
        Ok(())
    }

    pub(super) fn apply_namespaces(&mut self) -> Result<(), ConvertError> {
        let path = SchemaPointer::root().combine(&[XSD_NAMESPACES]);
        let mut namespaces: Vec<(String, String)> = Vec::new();

        if let Some(Keyword::XsdNamespaces(declared)) = self.schema.get(KeywordKind::XsdNamespaces)
        {
            for (prefix, uri) in declared {
                // The empty prefix declares the default namespace.
                if !prefix.is_empty() {
                    check_ncname(prefix, &path.combine(&[prefix.as_str()]))?;
                }
                namespaces.push((prefix.clone(), uri.clone()));
            }
        }

        for (prefix, uri) in BUILT_IN_NAMESPACES {
            if namespaces.iter().any(|(_, bound)| bound == uri) {
                continue;
            }
            if let Some((_, bound)) = namespaces.iter().find(|(p, _)| p == prefix) {
                return Err(ConvertError::schema(
                    &path,
                    format!("prefix '{prefix}' is bound to '{bound}' and cannot also name '{uri}'"),
                ));
            }
            namespaces.push((prefix.to_string(), uri.to_string()));
        }

        tracing::debug!(count = namespaces.len(), "namespaces applied");
        self.xsd.namespaces = namespaces;
        Ok(())
    }

    pub(super) fn handle_info(&mut self, info: &IndexMap<String, Value>) -> Result<(), ConvertError> {
        let path = SchemaPointer::root().combine(&["info"]);
        let markup = info
            .iter()
            .map(|(name, value)| {
                let fixed = value.as_str().ok_or_else(|| {
                    ConvertError::schema(path.combine(&[name.as_str()]), "info values must be strings")
                })?;
                Ok(FixedAttribute {
                    name: name.clone(),
                    fixed: fixed.to_string(),
                })
            })
            .collect::<Result<Vec<_>, ConvertError>>()?;

        self.xsd.items.push(XsdItem::Annotation(XsdAnnotation {
            documentation: vec![XsdDocumentation { markup }],
        }));
        Ok(())
    }
}

fn parse_form(value: &str, at: &SchemaPointer) -> Result<XsdForm, ConvertError> {
    XsdForm::parse(value)
        .ok_or_else(|| ConvertError::schema(at, format!("'{value}' is not a valid form")))
}

fn parse_derivation(
    value: &str,
    at: &SchemaPointer,
    allowed: fn(&DerivationMethod) -> bool,
) -> Result<Vec<DerivationMethod>, ConvertError> {
    DerivationMethod::parse_set(value)
        .filter(|set| set.iter().all(allowed))
        .ok_or_else(|| {
            ConvertError::schema(at, format!("'{value}' is not a valid derivation method set"))
        })
}
