//! XSD text rendering.
//!
//! Produces an indented document with an XML declaration. Elements of the
//! XML Schema vocabulary use whatever prefix the document binds to the XML
//! Schema namespace; qualified type names are rendered with the prefix bound
//! to their namespace.

use std::io::{self, Write};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;

use crate::xsd::{
    DerivationMethod, QualifiedName, XsdAnnotation, XsdAttribute, XsdComplexType, XsdElement,
    XsdForm, XsdItem, XsdSchema, XsdSimpleType, XML_SCHEMA_NAMESPACE,
};

const INDENT_SIZE: usize = 2;

/// Render `schema` as XSD text.
pub fn to_xsd_string(schema: &XsdSchema) -> io::Result<String> {
    let mut buf = Vec::new();
    write_xsd(schema, &mut buf)?;
    String::from_utf8(buf).map_err(io::Error::other)
}

/// Write `schema` as XSD text to `out`, terminated by a newline.
pub fn write_xsd<W: Write>(schema: &XsdSchema, out: W) -> io::Result<()> {
    let mut writer = XsdWriter::new(schema, out);
    writer.write_schema()?;
    writer.xml.get_mut().write_all(b"\n")
}

struct XsdWriter<'a, W: Write> {
    schema: &'a XsdSchema,
    /// `"xsd:"`, or empty when the XML Schema namespace is the default.
    tag_prefix: String,
    xml: Writer<W>,
}

impl<'a, W: Write> XsdWriter<'a, W> {
    fn new(schema: &'a XsdSchema, out: W) -> Self {
        let tag_prefix = match schema.prefix_for(XML_SCHEMA_NAMESPACE) {
            Some("") | None => String::new(),
            Some(prefix) => format!("{prefix}:"),
        };
        Self {
            schema,
            tag_prefix,
            xml: Writer::new_with_indent(out, b' ', INDENT_SIZE),
        }
    }

    fn write_schema(&mut self) -> io::Result<()> {
        self.emit(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

        let schema = self.schema;
        let mut root = self.start("schema");
        for (prefix, uri) in &schema.namespaces {
            let name = match prefix.as_str() {
                "" => "xmlns".to_string(),
                prefix => format!("xmlns:{prefix}"),
            };
            root.push_attribute((name.as_str(), uri.as_str()));
        }
        // `None` leaves the XSD default in place.
        if let Some(form) = schema.attribute_form_default.filter(|f| *f != XsdForm::None) {
            root.push_attribute(("attributeFormDefault", form.as_str()));
        }
        if let Some(form) = schema.element_form_default.filter(|f| *f != XsdForm::None) {
            root.push_attribute(("elementFormDefault", form.as_str()));
        }
        if let Some(set) = &schema.block_default {
            root.push_attribute(("blockDefault", derivation_list(set).as_str()));
        }
        if let Some(set) = &schema.final_default {
            root.push_attribute(("finalDefault", derivation_list(set).as_str()));
        }

        if schema.items.is_empty() {
            return self.emit(Event::Empty(root));
        }

        self.emit(Event::Start(root))?;
        for item in &schema.items {
            match item {
                XsdItem::Annotation(annotation) => self.write_annotation(annotation)?,
                XsdItem::Element(element) => self.write_element(element)?,
                XsdItem::ComplexType(complex_type) => self.write_complex_type(complex_type)?,
                XsdItem::SimpleType(simple_type) => self.write_simple_type(simple_type)?,
            }
        }
        self.end("schema")
    }

    fn write_annotation(&mut self, annotation: &XsdAnnotation) -> io::Result<()> {
        self.emit(Event::Start(self.start("annotation")))?;
        for documentation in &annotation.documentation {
            self.emit(Event::Start(self.start("documentation")))?;
            for entry in &documentation.markup {
                let mut attribute = self.start("attribute");
                attribute.push_attribute(("name", entry.name.as_str()));
                attribute.push_attribute(("fixed", entry.fixed.as_str()));
                self.emit(Event::Empty(attribute))?;
            }
            self.end("documentation")?;
        }
        self.end("annotation")
    }

    fn write_element(&mut self, element: &XsdElement) -> io::Result<()> {
        let mut tag = self.start("element");
        tag.push_attribute(("name", element.name.as_str()));
        if let Some(min) = element.min_occurs {
            tag.push_attribute(("minOccurs", min.to_string().as_str()));
        }
        if let Some(type_name) = &element.type_name {
            tag.push_attribute(("type", self.qualified(type_name).as_str()));
        }

        match &element.complex_type {
            Some(complex_type) => {
                self.emit(Event::Start(tag))?;
                self.write_complex_type(complex_type)?;
                self.end("element")
            }
            None => self.emit(Event::Empty(tag)),
        }
    }

    fn write_attribute(&mut self, attribute: &XsdAttribute) -> io::Result<()> {
        let mut tag = self.start("attribute");
        tag.push_attribute(("name", attribute.name.as_str()));
        if let Some(type_name) = &attribute.type_name {
            tag.push_attribute(("type", self.qualified(type_name).as_str()));
        }
        if attribute.required {
            tag.push_attribute(("use", "required"));
        }
        self.emit(Event::Empty(tag))
    }

    fn write_complex_type(&mut self, complex_type: &XsdComplexType) -> io::Result<()> {
        let mut tag = self.start("complexType");
        if let Some(name) = &complex_type.name {
            tag.push_attribute(("name", name.as_str()));
        }

        if complex_type.sequence.is_none() && complex_type.attributes.is_empty() {
            return self.emit(Event::Empty(tag));
        }

        self.emit(Event::Start(tag))?;
        if let Some(sequence) = &complex_type.sequence {
            self.emit(Event::Start(self.start("sequence")))?;
            for element in &sequence.elements {
                self.write_element(element)?;
            }
            self.end("sequence")?;
        }
        for attribute in &complex_type.attributes {
            self.write_attribute(attribute)?;
        }
        self.end("complexType")
    }

    fn write_simple_type(&mut self, simple_type: &XsdSimpleType) -> io::Result<()> {
        let mut tag = self.start("simpleType");
        tag.push_attribute(("name", simple_type.name.as_str()));
        self.emit(Event::Start(tag))?;

        let mut restriction = self.start("restriction");
        restriction.push_attribute(("base", self.qualified(&simple_type.restriction_base).as_str()));
        self.emit(Event::Empty(restriction))?;

        self.end("simpleType")
    }

    // -----------------------------------------------------------------------
    // Low-level output
    // -----------------------------------------------------------------------

    fn qualified(&self, name: &QualifiedName) -> String {
        let prefix = name
            .namespace
            .as_deref()
            .and_then(|ns| self.schema.prefix_for(ns));
        match prefix {
            Some(prefix) if !prefix.is_empty() => format!("{prefix}:{}", name.name),
            _ => name.name.clone(),
        }
    }

    fn start(&self, local: &str) -> BytesStart<'static> {
        BytesStart::new(format!("{}{local}", self.tag_prefix))
    }

    fn end(&mut self, local: &str) -> io::Result<()> {
        let tag = BytesEnd::new(format!("{}{local}", self.tag_prefix));
        self.emit(Event::End(tag))
    }

    fn emit(&mut self, event: Event<'_>) -> io::Result<()> {
        self.xml.write_event(event).map_err(io::Error::other)
    }
}

fn derivation_list(set: &[DerivationMethod]) -> String {
    set.iter()
        .map(DerivationMethod::as_str)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
