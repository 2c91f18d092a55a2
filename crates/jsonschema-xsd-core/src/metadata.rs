//! Type-compatibility classification.
//!
//! The converter does not decide on its own whether a subschema becomes a
//! simple or a complex XSD type; it asks a [`TypeClassifier`]. [`XsdMetadata`]
//! is the precomputed-table implementation, deserializable from JSON:
//!
//! ```json
//! {
//!   "message-name": "Root",
//!   "has-inline-root": true,
//!   "compatible-types": {
//!     "#": ["ComplexType"],
//!     "#/properties/name": ["SimpleType"]
//!   }
//! }
//! ```

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::pointer::SchemaPointer;

/// XSD structural category a subschema can be rendered as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CompatibleXsdType {
    ComplexType,
    SimpleType,
    SimpleTypeList,
    SimpleTypeRestriction,
    ComplexContentRestriction,
    ComplexContentExtension,
    SimpleContentRestriction,
    SimpleContentExtension,
}

/// Set of shapes a single pointer is compatible with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompatibleTypes(BTreeSet<CompatibleXsdType>);

impl CompatibleTypes {
    pub fn contains(&self, shape: CompatibleXsdType) -> bool {
        self.0.contains(&shape)
    }

    /// Renders as a complex type (plain or derived by content).
    pub fn is_complex(&self) -> bool {
        use CompatibleXsdType::*;
        [
            ComplexType,
            ComplexContentRestriction,
            ComplexContentExtension,
            SimpleContentRestriction,
            SimpleContentExtension,
        ]
        .into_iter()
        .any(|shape| self.contains(shape))
    }

    /// Renders as a simple type (plain, list or restriction).
    pub fn is_simple(&self) -> bool {
        use CompatibleXsdType::*;
        [SimpleType, SimpleTypeList, SimpleTypeRestriction]
            .into_iter()
            .any(|shape| self.contains(shape))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<CompatibleXsdType> for CompatibleTypes {
    fn from_iter<I: IntoIterator<Item = CompatibleXsdType>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Capability answering shape questions for a schema document.
pub trait TypeClassifier {
    /// Shapes compatible with the subschema at `pointer`; empty when unknown.
    fn compatible_types(&self, pointer: &SchemaPointer) -> CompatibleTypes;

    /// Name of the single top-level XML element.
    fn message_name(&self) -> &str;

    /// Whether the root schema defines its type inline rather than wrapping
    /// a single `$ref`.
    fn has_inline_root(&self) -> bool;
}

impl<C: TypeClassifier + ?Sized> TypeClassifier for &C {
    fn compatible_types(&self, pointer: &SchemaPointer) -> CompatibleTypes {
        (**self).compatible_types(pointer)
    }

    fn message_name(&self) -> &str {
        (**self).message_name()
    }

    fn has_inline_root(&self) -> bool {
        (**self).has_inline_root()
    }
}

/// Precomputed classification table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct XsdMetadata {
    pub message_name: String,
    #[serde(default)]
    pub has_inline_root: bool,
    #[serde(default)]
    pub compatible_types: HashMap<SchemaPointer, CompatibleTypes>,
}

impl XsdMetadata {
    pub fn new(message_name: impl Into<String>, has_inline_root: bool) -> Self {
        Self {
            message_name: message_name.into(),
            has_inline_root,
            compatible_types: HashMap::new(),
        }
    }

    /// Builder-style registration of the shapes for one pointer.
    ///
    /// # Panics
    /// Panics if `pointer` is not a JSON pointer.
    pub fn with_types(
        mut self,
        pointer: &str,
        shapes: impl IntoIterator<Item = CompatibleXsdType>,
    ) -> Self {
        self.insert(
            SchemaPointer::parse(pointer)
                .unwrap_or_else(|| panic!("'{pointer}' is not a JSON pointer")),
            shapes,
        );
        self
    }

    pub fn insert(
        &mut self,
        pointer: SchemaPointer,
        shapes: impl IntoIterator<Item = CompatibleXsdType>,
    ) {
        self.compatible_types
            .insert(pointer, shapes.into_iter().collect());
    }
}

impl TypeClassifier for XsdMetadata {
    fn compatible_types(&self, pointer: &SchemaPointer) -> CompatibleTypes {
        self.compatible_types
            .get(pointer)
            .cloned()
            .unwrap_or_default()
    }

    fn message_name(&self) -> &str {
        &self.message_name
    }

    fn has_inline_root(&self) -> bool {
        self.has_inline_root
    }
}
