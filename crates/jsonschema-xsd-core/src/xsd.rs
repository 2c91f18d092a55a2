//! XML Schema output tree.
//!
//! Every node has exactly one owner; cross-references between types are
//! expressed with [`QualifiedName`]s, never by sharing nodes.

use std::fmt;

use serde::Serialize;

/// `http://www.w3.org/2001/XMLSchema`
pub const XML_SCHEMA_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";
/// `http://www.w3.org/2001/XMLSchema-instance`
pub const XML_SCHEMA_INSTANCE_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// A (namespace, local name) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QualifiedName {
    pub namespace: Option<String>,
    pub name: String,
}

impl QualifiedName {
    /// A name in no namespace (references to generated definitions).
    pub fn local(name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            name: name.into(),
        }
    }

    /// A built-in XML Schema type such as `xsd:string`.
    pub fn xsd(name: impl Into<String>) -> Self {
        Self {
            namespace: Some(XML_SCHEMA_NAMESPACE.to_string()),
            name: name.into(),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{ns}}}{}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// `attributeFormDefault` / `elementFormDefault` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum XsdForm {
    None,
    Qualified,
    Unqualified,
}

impl XsdForm {
    /// Case-insensitive parse.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "none" => Some(XsdForm::None),
            "qualified" => Some(XsdForm::Qualified),
            "unqualified" => Some(XsdForm::Unqualified),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            XsdForm::None => "none",
            XsdForm::Qualified => "qualified",
            XsdForm::Unqualified => "unqualified",
        }
    }
}

/// One member of a `blockDefault` / `finalDefault` set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DerivationMethod {
    Empty,
    Substitution,
    Extension,
    Restriction,
    List,
    Union,
    All,
}

impl DerivationMethod {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "empty" => Some(DerivationMethod::Empty),
            "substitution" => Some(DerivationMethod::Substitution),
            "extension" => Some(DerivationMethod::Extension),
            "restriction" => Some(DerivationMethod::Restriction),
            "list" => Some(DerivationMethod::List),
            "union" => Some(DerivationMethod::Union),
            "all" => Some(DerivationMethod::All),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DerivationMethod::Empty => "",
            DerivationMethod::Substitution => "substitution",
            DerivationMethod::Extension => "extension",
            DerivationMethod::Restriction => "restriction",
            DerivationMethod::List => "list",
            DerivationMethod::Union => "union",
            DerivationMethod::All => "#all",
        }
    }

    /// Parse a comma-separated set, e.g. `"Extension, Restriction"`.
    ///
    /// `#all` cannot be combined with other methods.
    pub fn parse_set(value: &str) -> Option<Vec<Self>> {
        let mut set: Vec<Self> = value
            .split(',')
            .map(Self::parse)
            .collect::<Option<_>>()?;
        set.sort();
        set.dedup();
        if set.contains(&DerivationMethod::All) && set.len() > 1 {
            return None;
        }
        Some(set)
    }

    /// Members of `blockDefault`: `#all` or substitution, extension, restriction.
    pub fn allowed_in_block_default(&self) -> bool {
        !matches!(self, DerivationMethod::List | DerivationMethod::Union)
    }

    /// Members of `finalDefault`: `#all` or extension, restriction, list, union.
    pub fn allowed_in_final_default(&self) -> bool {
        !matches!(self, DerivationMethod::Substitution)
    }
}

/// Root of the output document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct XsdSchema {
    /// `(prefix, uri)` pairs in declaration order; prefixes are unique.
    pub namespaces: Vec<(String, String)>,
    pub attribute_form_default: Option<XsdForm>,
    pub element_form_default: Option<XsdForm>,
    pub block_default: Option<Vec<DerivationMethod>>,
    pub final_default: Option<Vec<DerivationMethod>>,
    pub items: Vec<XsdItem>,
}

impl XsdSchema {
    pub fn prefix_for(&self, namespace: &str) -> Option<&str> {
        self.namespaces
            .iter()
            .find(|(_, uri)| uri == namespace)
            .map(|(prefix, _)| prefix.as_str())
    }

    pub fn namespace_for(&self, prefix: &str) -> Option<&str> {
        self.namespaces
            .iter()
            .find(|(p, _)| p == prefix)
            .map(|(_, uri)| uri.as_str())
    }

    /// The single top-level element.
    pub fn root_element(&self) -> Option<&XsdElement> {
        self.items.iter().find_map(|item| match item {
            XsdItem::Element(el) => Some(el),
            _ => None,
        })
    }

    pub fn complex_type(&self, name: &str) -> Option<&XsdComplexType> {
        self.items.iter().find_map(|item| match item {
            XsdItem::ComplexType(ct) if ct.name.as_deref() == Some(name) => Some(ct),
            _ => None,
        })
    }

    pub fn simple_type(&self, name: &str) -> Option<&XsdSimpleType> {
        self.items.iter().find_map(|item| match item {
            XsdItem::SimpleType(st) if st.name == name => Some(st),
            _ => None,
        })
    }

    pub fn annotation(&self) -> Option<&XsdAnnotation> {
        self.items.iter().find_map(|item| match item {
            XsdItem::Annotation(a) => Some(a),
            _ => None,
        })
    }
}

/// Top-level schema item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum XsdItem {
    Annotation(XsdAnnotation),
    Element(XsdElement),
    ComplexType(XsdComplexType),
    SimpleType(XsdSimpleType),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct XsdAnnotation {
    pub documentation: Vec<XsdDocumentation>,
}

/// Documentation markup: one `<xsd:attribute name=".." fixed=".."/>` per entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct XsdDocumentation {
    pub markup: Vec<FixedAttribute>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FixedAttribute {
    pub name: String,
    pub fixed: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct XsdElement {
    pub name: String,
    /// `Some(0)` for optional elements; `None` leaves the XSD default of 1.
    pub min_occurs: Option<u32>,
    pub type_name: Option<QualifiedName>,
    /// Anonymous inline type; mutually exclusive with `type_name`.
    pub complex_type: Option<Box<XsdComplexType>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct XsdAttribute {
    pub name: String,
    pub type_name: Option<QualifiedName>,
    /// Attributes are optional unless marked `use="required"`.
    pub required: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct XsdComplexType {
    /// `None` for anonymous types nested in an element.
    pub name: Option<String>,
    pub sequence: Option<XsdSequence>,
    pub attributes: Vec<XsdAttribute>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct XsdSequence {
    pub elements: Vec<XsdElement>,
}

/// Named simple type restricting a base type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XsdSimpleType {
    pub name: String,
    pub restriction_base: QualifiedName,
}
