//! XML event model for the batch API.
//!
//! Ein `XmlEvent` entspricht genau einem Aufruf am [`StreamWriter`]; die
//! Event-Folge wird in [`encode`](crate::encoder::encode) bzw. vom XML-Frontend
//! unverändert durchgereicht.

use std::io::Write;
use std::rc::Rc;

use crate::writer::StreamWriter;
use crate::Result;

/// Name of a start or empty element.
///
/// Ein leerer Prefix mit gesetzter URI wird beim Schreiben des Tags über den
/// Namespace-Kontext aufgelöst.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementContent {
    pub prefix: Rc<str>,
    pub namespace_uri: Rc<str>,
    pub local_name: Rc<str>,
}

/// Attribute name and value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeContent {
    pub prefix: Rc<str>,
    pub namespace_uri: Rc<str>,
    pub local_name: Rc<str>,
    pub value: Rc<str>,
}

/// Namespace declaration; an empty prefix declares the default namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NsContent {
    pub prefix: Rc<str>,
    pub uri: Rc<str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PiContent {
    pub target: Rc<str>,
    pub data: Rc<str>,
}

/// One writer call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlEvent {
    StartDocument,
    EndDocument,
    StartElement(ElementContent),
    EmptyElement(ElementContent),
    EndElement,
    Attribute(AttributeContent),
    Namespace(NsContent),
    Characters(Rc<str>),
    CData(Rc<str>),
    Comment(Rc<str>),
    ProcessingInstruction(PiContent),
    /// Raw octets, written as base64-algorithm chunk.
    Octets(Rc<[u8]>),
    /// Wird nicht unterstützt; Schreiben liefert `Error::Unsupported`.
    DocType(Rc<str>),
    /// Wird nicht unterstützt; Schreiben liefert `Error::Unsupported`.
    EntityReference(Rc<str>),
}

impl ElementContent {
    pub fn local(local_name: &str) -> Self {
        Self::new("", "", local_name)
    }

    pub fn new(prefix: &str, namespace_uri: &str, local_name: &str) -> Self {
        Self {
            prefix: prefix.into(),
            namespace_uri: namespace_uri.into(),
            local_name: local_name.into(),
        }
    }
}

impl XmlEvent {
    pub fn start_element(local_name: &str) -> Self {
        Self::StartElement(ElementContent::local(local_name))
    }

    pub fn start_element_ns(namespace_uri: &str, local_name: &str) -> Self {
        Self::StartElement(ElementContent::new("", namespace_uri, local_name))
    }

    pub fn start_element_prefixed(prefix: &str, local_name: &str, namespace_uri: &str) -> Self {
        Self::StartElement(ElementContent::new(prefix, namespace_uri, local_name))
    }

    pub fn empty_element(local_name: &str) -> Self {
        Self::EmptyElement(ElementContent::local(local_name))
    }

    pub fn attribute(local_name: &str, value: &str) -> Self {
        Self::attribute_prefixed("", "", local_name, value)
    }

    /// Attribute whose prefix is resolved from the namespace context.
    pub fn attribute_ns(namespace_uri: &str, local_name: &str, value: &str) -> Self {
        Self::attribute_prefixed("", namespace_uri, local_name, value)
    }

    pub fn attribute_prefixed(prefix: &str, namespace_uri: &str, local_name: &str, value: &str) -> Self {
        Self::Attribute(AttributeContent {
            prefix: prefix.into(),
            namespace_uri: namespace_uri.into(),
            local_name: local_name.into(),
            value: value.into(),
        })
    }

    pub fn namespace(prefix: &str, uri: &str) -> Self {
        Self::Namespace(NsContent { prefix: prefix.into(), uri: uri.into() })
    }

    pub fn default_namespace(uri: &str) -> Self {
        Self::namespace("", uri)
    }

    pub fn characters(text: &str) -> Self {
        Self::Characters(text.into())
    }

    pub fn comment(text: &str) -> Self {
        Self::Comment(text.into())
    }

    pub fn processing_instruction(target: &str, data: &str) -> Self {
        Self::ProcessingInstruction(PiContent { target: target.into(), data: data.into() })
    }
}

impl<W: Write> StreamWriter<W> {
    /// Dispatches one event to the matching writer call.
    pub fn write_event(&mut self, event: &XmlEvent) -> Result<()> {
        match event {
            XmlEvent::StartDocument => self.write_start_document(),
            XmlEvent::EndDocument => self.write_end_document(),
            XmlEvent::StartElement(e) => {
                self.write_start_element_prefixed(&e.prefix, &e.local_name, &e.namespace_uri)
            }
            XmlEvent::EmptyElement(e) => {
                self.write_empty_element_prefixed(&e.prefix, &e.local_name, &e.namespace_uri)
            }
            XmlEvent::EndElement => self.write_end_element(),
            XmlEvent::Attribute(a) if a.prefix.is_empty() && !a.namespace_uri.is_empty() => {
                self.write_attribute_ns(&a.namespace_uri, &a.local_name, &a.value)
            }
            XmlEvent::Attribute(a) => {
                self.write_attribute_prefixed(&a.prefix, &a.namespace_uri, &a.local_name, &a.value)
            }
            XmlEvent::Namespace(ns) => self.write_namespace(&ns.prefix, &ns.uri),
            XmlEvent::Characters(text) => self.write_characters(text),
            XmlEvent::CData(text) => self.write_cdata(text),
            XmlEvent::Comment(text) => self.write_comment(text),
            XmlEvent::ProcessingInstruction(pi) => {
                self.write_processing_instruction_with_data(&pi.target, &pi.data)
            }
            XmlEvent::Octets(data) => self.write_octets(data),
            XmlEvent::DocType(dtd) => self.write_dtd(dtd),
            XmlEvent::EntityReference(name) => self.write_entity_ref(name),
        }
    }
}
