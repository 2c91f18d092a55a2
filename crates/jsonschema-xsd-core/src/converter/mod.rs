//! JSON Schema → XSD conversion.
//!
//! A [`Converter`] runs once per document:
//!
//! `Start → AttributesApplied → NamespacesApplied → DispatchingKeywords →
//! RootBuilt → Done`, with `Failed` reachable from every state.
//!
//! Each stage lives in its own submodule:
//! - `schema_attributes`: document-level attributes, namespaces, `info`
//! - `definitions`: `$defs` / `definitions` → named top-level types
//! - `types`: the recursive type synthesizer
//! - `root`: the single top-level message element

mod definitions;
mod root;
mod schema_attributes;
mod types;

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::config::ConvertOptions;
use crate::error::ConvertError;
use crate::keyword::{Keyword, KeywordKind};
use crate::metadata::TypeClassifier;
use crate::pointer::SchemaPointer;
use crate::schema::JsonSchema;
use crate::work_list::WorkList;
use crate::xsd::XsdSchema;

/// Progress of a single conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionState {
    Start,
    AttributesApplied,
    NamespacesApplied,
    DispatchingKeywords,
    RootBuilt,
    Done,
    Failed,
}

/// Converts one schema document into an [`XsdSchema`].
pub struct Converter<'a, C: TypeClassifier + ?Sized> {
    schema: &'a JsonSchema,
    classifier: &'a C,
    options: &'a ConvertOptions,
    xsd: XsdSchema,
    visited: HashSet<SchemaPointer>,
    state: ConversionState,
}

impl<'a, C: TypeClassifier + ?Sized> Converter<'a, C> {
    pub fn new(schema: &'a JsonSchema, classifier: &'a C, options: &'a ConvertOptions) -> Self {
        Self {
            schema,
            classifier,
            options,
            xsd: XsdSchema::default(),
            visited: HashSet::new(),
            state: ConversionState::Start,
        }
    }

    pub fn state(&self) -> ConversionState {
        self.state
    }

    /// Run the conversion. Either the complete tree is returned or nothing.
    pub fn convert(&mut self) -> Result<XsdSchema, ConvertError> {
        if self.state != ConversionState::Start {
            return Err(ConvertError::schema(
                SchemaPointer::root(),
                "converter instances are single-use",
            ));
        }

        match self.run() {
            Ok(()) => {
                self.transition(ConversionState::Done);
                Ok(std::mem::take(&mut self.xsd))
            }
            Err(err) => {
                self.transition(ConversionState::Failed);
                tracing::debug!(error = %err, "conversion failed");
                self.xsd = XsdSchema::default();
                Err(err)
            }
        }
    }

    fn run(&mut self) -> Result<(), ConvertError> {
        self.apply_schema_attributes()?;
        self.transition(ConversionState::AttributesApplied);

        self.apply_namespaces()?;
        self.transition(ConversionState::NamespacesApplied);

        let schema = self.schema;
        let mut keywords = schema.work_list();
        mark_document_keywords(&mut keywords);
        keywords.mark_handled(KeywordKind::Type);

        self.transition(ConversionState::DispatchingKeywords);
        let mut root_built = false;

        // Iterate the source order once; handlers may consume later keywords
        // (the inline root pulls `required`/`properties`), so re-check each.
        for keyword in schema.keywords() {
            if !keywords.is_pending(keyword.kind()) {
                continue;
            }

            match keyword {
                Keyword::Schema(_)
                | Keyword::Id(_)
                | Keyword::Type(_)
                | Keyword::XsdNamespaces(_)
                | Keyword::XsdSchemaAttributes(_) => {}
                Keyword::Info(info) => {
                    keywords.mark_handled(KeywordKind::Info);
                    self.handle_info(info)?;
                }
                Keyword::Defs(defs) | Keyword::Definitions(defs) => {
                    keywords.mark_handled(keyword.kind());
                    self.handle_definitions(keyword.name(), defs)?;
                }
                Keyword::OneOf(_)
                | Keyword::AnyOf(_)
                | Keyword::AllOf(_)
                | Keyword::Properties(_) => {
                    keywords.mark_handled(keyword.kind());
                    if !root_built {
                        self.handle_root_message(&mut keywords)?;
                        root_built = true;
                    }
                }
                // Left pending: consumed by the root builder or reported below.
                Keyword::Required(_)
                | Keyword::Ref(_)
                | Keyword::XsdAttribute(_)
                | Keyword::Unknown { .. } => {}
            }
        }

        if !root_built {
            if !self.classifier.has_inline_root() {
                return Err(ConvertError::InvalidRootShape {
                    message: "expected an allOf/anyOf/oneOf wrapping a single $ref".to_string(),
                });
            }
            self.handle_root_message(&mut keywords)?;
        }
        self.transition(ConversionState::RootBuilt);

        ensure_drained(&keywords, &SchemaPointer::root())
    }

    fn transition(&mut self, next: ConversionState) {
        tracing::debug!(from = ?self.state, to = ?next, "conversion state");
        self.state = next;
    }

    /// Record a visit to `pointer`, enforcing the depth budget and the
    /// visit-once rule.
    fn enter(&mut self, pointer: &SchemaPointer, depth: usize) -> Result<(), ConvertError> {
        if depth > self.options.max_depth {
            return Err(ConvertError::RecursionDepthExceeded {
                path: pointer.to_string(),
                max_depth: self.options.max_depth,
            });
        }
        if !self.visited.insert(pointer.clone()) {
            return Err(ConvertError::schema(pointer, "subschema visited more than once"));
        }
        tracing::debug!(path = %pointer, depth, "synthesizing subschema");
        Ok(())
    }
}

/// Keywords read once at document level and ignored at every node.
fn mark_document_keywords(keywords: &mut WorkList<Keyword>) {
    keywords.mark_handled(KeywordKind::Schema);
    keywords.mark_handled(KeywordKind::Id);
    keywords.mark_handled(KeywordKind::XsdNamespaces);
    keywords.mark_handled(KeywordKind::XsdSchemaAttributes);
}

fn ensure_drained(keywords: &WorkList<Keyword>, pointer: &SchemaPointer) -> Result<(), ConvertError> {
    let leftover = keywords.unhandled_names();
    if leftover.is_empty() {
        return Ok(());
    }
    Err(ConvertError::UnsupportedSchema {
        path: pointer.to_string(),
        keywords: leftover,
    })
}

/// XML names (element, attribute, type) must be NCNames.
fn check_ncname(name: &str, pointer: &SchemaPointer) -> Result<(), ConvertError> {
    static NCNAME: OnceLock<Regex> = OnceLock::new();
    let re = NCNAME.get_or_init(|| {
        Regex::new(r"^[\p{L}_][\p{L}\p{N}._\-]*$").expect("NCName pattern is valid")
    });
    if re.is_match(name) {
        Ok(())
    } else {
        Err(ConvertError::schema(
            pointer,
            format!("'{name}' is not a valid XML name"),
        ))
    }
}
