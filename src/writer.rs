//! Event-style Fast Infoset writer.
//!
//! `StreamWriter` nimmt StAX-artige Aufrufe entgegen, sammelt Attribute und
//! Namespace-Deklarationen des offenen Start-Tags und schreibt den Tag erst,
//! wenn das nächste Item feststeht. Ausgabe geht über einen Octet-Buffer, der
//! ab [`FLUSH_THRESHOLD`] in den Sink geleert wird.
//!
//! # Beispiel
//!
//! ```
//! use erfi::StreamWriter;
//!
//! let mut w = StreamWriter::new(Vec::new());
//! w.write_start_document().unwrap();
//! w.write_start_element("greeting").unwrap();
//! w.write_attribute("lang", "en").unwrap();
//! w.write_characters("Hello").unwrap();
//! w.write_end_document().unwrap();
//! let bytes = w.into_inner().unwrap();
//! assert_eq!(&bytes[..5], &[0xE0, 0x00, 0x00, 0x01, 0x00]);
//! ```

use std::io::Write;

use log::{debug, trace};

use crate::constants::*;
use crate::encoder::pending::{
    PendingElement, StagedAttribute, StagedNamespace, StartTagState, TagEvent,
};
use crate::encoder::{Encoder, EncoderConfig};
use crate::namespace::NamespaceContext;
use crate::options::SerializerOptions;
use crate::{Error, Result};

/// Schwellenwert für periodisches Flushing in den Sink.
pub const FLUSH_THRESHOLD: usize = 64 * 1024;

/// Prüft auf Whitespace-only Text (Space, Tab, CR, LF).
fn is_whitespace(text: &str) -> bool {
    text.bytes().all(|b| matches!(b, b' ' | b'\t' | b'\r' | b'\n'))
}

/// Fast Infoset writer over any [`Write`] sink. Not thread-safe.
pub struct StreamWriter<W: Write> {
    pub(crate) encoder: Encoder,
    sink: W,
    state: StartTagState,
    pending: PendingElement,
    attributes: Vec<StagedAttribute>,
    namespaces: Vec<StagedNamespace>,
    namespace_context: NamespaceContext,
    /// Anzahl offener Elemente (inkl. eines noch nicht geschriebenen Empty-Elements).
    depth: usize,
}

impl<W: Write> StreamWriter<W> {
    /// Writer with default options and no XML declaration.
    pub fn new(sink: W) -> Self {
        Self::with_config(sink, SerializerOptions::default(), EncoderConfig::default())
    }

    pub fn with_options(sink: W, options: SerializerOptions) -> Self {
        Self::with_config(sink, options, EncoderConfig::default())
    }

    pub fn with_config(sink: W, options: SerializerOptions, config: EncoderConfig) -> Self {
        Self {
            encoder: Encoder::new(options, config),
            sink,
            state: StartTagState::Closed,
            pending: PendingElement::default(),
            attributes: Vec::new(),
            namespaces: Vec::new(),
            namespace_context: NamespaceContext::new(),
            depth: 0,
        }
    }

    pub fn options(&self) -> &SerializerOptions {
        self.encoder.options()
    }

    pub fn encoder(&self) -> &Encoder {
        &self.encoder
    }

    pub fn namespace_context(&self) -> &NamespaceContext {
        &self.namespace_context
    }

    /// Number of open elements.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn sink(&self) -> &W {
        &self.sink
    }

    pub(crate) fn state(&self) -> StartTagState {
        self.state
    }

    // --- Document ---

    /// Starts a new document: resets the session, writes header and
    /// document options.
    pub fn write_start_document(&mut self) -> Result<()> {
        self.reset();
        self.encoder.encode_header();
        self.encoder.encode_initial_vocabulary();
        debug!("start document");
        self.maybe_drain()
    }

    /// Closes all open elements, terminates the document and flushes the sink.
    pub fn write_end_document(&mut self) -> Result<()> {
        if self.state.is_open() {
            self.flush_start_tag(false)?;
        }
        if self.depth > 0 {
            debug!("end document closes {} open elements", self.depth);
        }
        while self.depth > 0 {
            self.write_end_element()?;
        }
        self.encoder.encode_document_termination();
        self.flush()?;
        debug!(
            "end document: {} element names, {} attribute names",
            self.encoder.vocabulary.element_name.len(),
            self.encoder.vocabulary.attribute_name.len()
        );
        Ok(())
    }

    // --- Elements ---

    pub fn write_start_element(&mut self, local_name: &str) -> Result<()> {
        self.start_element("", "", local_name, false)
    }

    /// Prefix wird beim Schreiben des Tags aus dem Namespace-Kontext bestimmt.
    pub fn write_start_element_ns(&mut self, namespace_uri: &str, local_name: &str) -> Result<()> {
        self.start_element("", namespace_uri, local_name, false)
    }

    pub fn write_start_element_prefixed(
        &mut self,
        prefix: &str,
        local_name: &str,
        namespace_uri: &str,
    ) -> Result<()> {
        self.start_element(prefix, namespace_uri, local_name, false)
    }

    pub fn write_empty_element(&mut self, local_name: &str) -> Result<()> {
        self.start_element("", "", local_name, true)
    }

    pub fn write_empty_element_ns(&mut self, namespace_uri: &str, local_name: &str) -> Result<()> {
        self.start_element("", namespace_uri, local_name, true)
    }

    pub fn write_empty_element_prefixed(
        &mut self,
        prefix: &str,
        local_name: &str,
        namespace_uri: &str,
    ) -> Result<()> {
        self.start_element(prefix, namespace_uri, local_name, true)
    }

    fn start_element(
        &mut self,
        prefix: &str,
        namespace_uri: &str,
        local_name: &str,
        is_empty: bool,
    ) -> Result<()> {
        self.flush_start_tag(true)?;
        self.transition(TagEvent::Open, "start element")?;
        self.depth += 1;
        self.pending.set(prefix, namespace_uri, local_name, is_empty);
        Ok(())
    }

    pub fn write_end_element(&mut self) -> Result<()> {
        if self.state.is_open() {
            self.flush_start_tag(false)?;
        }
        if self.depth == 0 {
            return Err(Error::usage("end element without open element"));
        }
        self.namespace_context.end_scope(self.depth)?;
        self.depth -= 1;
        self.encoder.encode_element_termination();
        self.maybe_drain()
    }

    // --- Attributes & Namespaces ---

    pub fn write_attribute(&mut self, local_name: &str, value: &str) -> Result<()> {
        self.stage_attribute("", "", local_name, value)
    }

    /// Attribute in `namespace_uri`; the prefix must be bound to a non-default prefix.
    pub fn write_attribute_ns(
        &mut self,
        namespace_uri: &str,
        local_name: &str,
        value: &str,
    ) -> Result<()> {
        self.ensure_open("attribute")?;
        if namespace_uri == XMLNS_NAMESPACE_NAME {
            return self.write_xmlns_attribute(local_name, value);
        }
        if namespace_uri.is_empty() {
            return self.stage_attribute("", "", local_name, value);
        }
        let prefix = self
            .namespace_context
            .get_non_default_prefix(namespace_uri)
            .ok_or_else(|| Error::UnresolvedNamespace(namespace_uri.to_string()))?
            .to_string();
        self.stage_attribute(&prefix, namespace_uri, local_name, value)
    }

    pub fn write_attribute_prefixed(
        &mut self,
        prefix: &str,
        namespace_uri: &str,
        local_name: &str,
        value: &str,
    ) -> Result<()> {
        self.ensure_open("attribute")?;
        if namespace_uri == XMLNS_NAMESPACE_NAME || prefix == XMLNS_NAMESPACE_PREFIX {
            return self.write_xmlns_attribute(local_name, value);
        }
        self.stage_attribute(prefix, namespace_uri, local_name, value)
    }

    /// `xmlns` und `xmlns:p` als Attribut werden zu Namespace-Deklarationen.
    fn write_xmlns_attribute(&mut self, local_name: &str, value: &str) -> Result<()> {
        if local_name == XMLNS_NAMESPACE_PREFIX {
            self.write_default_namespace(value)
        } else {
            self.write_namespace(local_name, value)
        }
    }

    fn stage_attribute(
        &mut self,
        prefix: &str,
        namespace_uri: &str,
        local_name: &str,
        value: &str,
    ) -> Result<()> {
        self.transition(TagEvent::Stage, "attribute")?;
        self.attributes.push(StagedAttribute {
            namespace_uri: namespace_uri.to_string(),
            prefix: prefix.to_string(),
            local_name: local_name.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }

    /// Declares `prefix` on the open start tag. An empty prefix or `xmlns`
    /// declares the default namespace.
    pub fn write_namespace(&mut self, prefix: &str, namespace_uri: &str) -> Result<()> {
        if prefix.is_empty() || prefix == XMLNS_NAMESPACE_PREFIX {
            return self.write_default_namespace(namespace_uri);
        }
        self.transition(TagEvent::Stage, "namespace")?;
        self.namespaces.push(StagedNamespace {
            prefix: prefix.to_string(),
            uri: namespace_uri.to_string(),
        });
        self.namespace_context.declare_prefix(self.depth, prefix, namespace_uri);
        Ok(())
    }

    pub fn write_default_namespace(&mut self, namespace_uri: &str) -> Result<()> {
        self.transition(TagEvent::Stage, "default namespace")?;
        self.namespaces.push(StagedNamespace {
            prefix: String::new(),
            uri: namespace_uri.to_string(),
        });
        self.namespace_context.declare_prefix(self.depth, "", namespace_uri);
        Ok(())
    }

    /// Binds a prefix without writing a declaration.
    pub fn set_prefix(&mut self, prefix: &str, namespace_uri: &str) {
        self.namespace_context.declare_prefix(self.depth, prefix, namespace_uri);
    }

    pub fn set_default_namespace(&mut self, namespace_uri: &str) {
        self.set_prefix("", namespace_uri);
    }

    pub fn get_prefix(&self, namespace_uri: &str) -> Option<&str> {
        self.namespace_context.get_prefix(namespace_uri)
    }

    // --- Content ---

    /// Text content. Empty text, and whitespace-only text when configured,
    /// is dropped.
    pub fn write_characters(&mut self, text: &str) -> Result<()> {
        if text.is_empty() || self.skips_whitespace(text) {
            return Ok(());
        }
        self.flush_start_tag(true)?;
        self.encoder.encode_characters(text)?;
        self.maybe_drain()
    }

    /// Like [`write_characters`](Self::write_characters) for a buffer the
    /// caller no longer needs; a new chunk table entry takes it over.
    pub fn write_characters_owned(&mut self, text: String) -> Result<()> {
        if text.is_empty() || self.skips_whitespace(&text) {
            return Ok(());
        }
        self.flush_start_tag(true)?;
        self.encoder.encode_characters_owned(text)?;
        self.maybe_drain()
    }

    pub fn write_characters_chars(&mut self, text: &[char]) -> Result<()> {
        self.write_characters_owned(text.iter().collect())
    }

    pub fn write_cdata(&mut self, text: &str) -> Result<()> {
        if text.is_empty() || self.skips_whitespace(text) {
            return Ok(());
        }
        self.flush_start_tag(true)?;
        self.encoder.encode_cdata(text)?;
        self.maybe_drain()
    }

    pub fn write_comment(&mut self, text: &str) -> Result<()> {
        if self.options().ignore_comments() {
            return Ok(());
        }
        self.flush_start_tag(true)?;
        self.encoder.encode_comment(text)?;
        self.maybe_drain()
    }

    /// Owned variant of [`write_comment`](Self::write_comment).
    pub fn write_comment_owned(&mut self, text: String) -> Result<()> {
        if self.options().ignore_comments() {
            return Ok(());
        }
        self.flush_start_tag(true)?;
        self.encoder.encode_comment_owned(text)?;
        self.maybe_drain()
    }

    pub fn write_processing_instruction(&mut self, target: &str) -> Result<()> {
        self.write_processing_instruction_with_data(target, "")
    }

    pub fn write_processing_instruction_with_data(&mut self, target: &str, data: &str) -> Result<()> {
        if self.options().ignore_processing_instructions() {
            return Ok(());
        }
        self.flush_start_tag(true)?;
        self.encoder.encode_processing_instruction(target, data)?;
        self.maybe_drain()
    }

    /// Raw octets as a base64-algorithm chunk.
    pub fn write_octets(&mut self, data: &[u8]) -> Result<()> {
        if data.is_empty() {
            return Ok(());
        }
        self.flush_start_tag(true)?;
        self.encoder.encode_octets(data)?;
        self.maybe_drain()
    }

    pub fn write_dtd(&mut self, _dtd: &str) -> Result<()> {
        Err(Error::Unsupported("DTD writing"))
    }

    pub fn write_entity_ref(&mut self, _name: &str) -> Result<()> {
        Err(Error::Unsupported("entity reference writing"))
    }

    // --- Sink ---

    /// Forwards buffered octets to the sink and flushes it.
    pub fn flush(&mut self) -> Result<()> {
        self.encoder.drain_to(&mut self.sink)?;
        self.sink.flush()?;
        Ok(())
    }

    /// Flushes and resets the session state.
    pub fn close(&mut self) -> Result<()> {
        self.ensure_unmarked()?;
        self.flush()?;
        self.reset();
        Ok(())
    }

    /// Flushes and returns the sink.
    pub fn into_inner(mut self) -> Result<W> {
        self.ensure_unmarked()?;
        self.flush()?;
        Ok(self.sink)
    }

    // --- Intern ---

    fn reset(&mut self) {
        self.encoder.reset();
        self.state = StartTagState::Closed;
        self.attributes.clear();
        self.namespaces.clear();
        self.namespace_context.reset();
        self.depth = 0;
    }

    /// Eine offene Low-Level-Mark hält Octets im Buffer zurück.
    fn ensure_unmarked(&self) -> Result<()> {
        if self.encoder.writer.has_mark() {
            return Err(Error::usage("low-level start tag still open"));
        }
        Ok(())
    }

    fn skips_whitespace(&self, text: &str) -> bool {
        self.options().ignore_whitespace_text() && is_whitespace(text)
    }

    fn transition(&mut self, event: TagEvent, what: &'static str) -> Result<()> {
        self.state = self
            .state
            .next(event)
            .ok_or_else(|| Error::usage(format!("{what} outside of a start tag")))?;
        Ok(())
    }

    fn ensure_open(&self, what: &'static str) -> Result<()> {
        if self.state.is_open() {
            Ok(())
        } else {
            Err(Error::usage(format!("{what} outside of a start tag")))
        }
    }

    /// Schreibt eine offene Terminierung und, falls vorhanden, den gepufferten
    /// Start-Tag samt Namespaces und Attributen.
    pub(crate) fn flush_start_tag(&mut self, terminate_after: bool) -> Result<()> {
        self.encoder.encode_termination();
        if !self.state.is_open() {
            return Ok(());
        }
        self.transition(TagEvent::Flush, "flush")?;

        let mut b = ELEMENT;
        if !self.attributes.is_empty() {
            b |= ELEMENT_ATTRIBUTE_FLAG;
        }
        if !self.namespaces.is_empty() {
            self.encoder.writer.write(b | ELEMENT_NAMESPACES_FLAG);
            for ns in &self.namespaces {
                self.encoder.encode_namespace_attribute(&ns.prefix, &ns.uri)?;
            }
            self.encoder.writer.write(TERMINATOR);
            b = 0;
        }

        // Element-Namespace erst jetzt auflösen: Deklarationen des Tags gelten schon
        let mut prefix: &str = &self.pending.prefix;
        let mut namespace_uri: &str = &self.pending.namespace_uri;
        if prefix.is_empty() {
            if namespace_uri.is_empty() {
                namespace_uri = self.namespace_context.default_namespace();
            } else if let Some(p) = self.namespace_context.get_prefix(namespace_uri) {
                prefix = p;
            }
        }
        self.encoder
            .encode_element_qname(b, prefix, namespace_uri, &self.pending.local_name)?;

        for attr in &self.attributes {
            self.encoder
                .encode_attribute_qname(&attr.prefix, &attr.namespace_uri, &attr.local_name)?;
            self.encoder.encode_attribute_value(&attr.value)?;
        }
        if !self.attributes.is_empty() {
            self.encoder.defer_attributes_termination();
        }
        self.attributes.clear();
        self.namespaces.clear();

        if self.pending.is_empty {
            self.encoder.encode_element_termination();
            self.namespace_context.end_scope(self.depth)?;
            self.depth -= 1;
        }
        if terminate_after {
            self.encoder.encode_termination();
        }
        trace!("start tag '{}' written", self.pending.local_name);
        Ok(())
    }

    pub(crate) fn maybe_drain(&mut self) -> Result<()> {
        if self.encoder.buf_len() >= FLUSH_THRESHOLD {
            trace!("draining {} octets", self.encoder.buf_len());
            self.encoder.drain_to(&mut self.sink)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: [u8; 5] = [0xE0, 0x00, 0x00, 0x01, 0x00];

    fn body(bytes: &[u8]) -> &[u8] {
        assert_eq!(&bytes[..5], &HEADER);
        &bytes[5..]
    }

    #[test]
    fn empty_root() {
        let mut w = StreamWriter::new(Vec::new());
        w.write_start_document().unwrap();
        w.write_empty_element("r").unwrap();
        w.write_end_document().unwrap();
        let out = w.into_inner().unwrap();
        // Literal qname 0x3C, local name "r", dann FF (r + Dokument)
        assert_eq!(body(&out), &[0x3C, 0x00, b'r', 0xFF]);
    }

    #[test]
    fn attribute_outside_start_tag_is_usage_error() {
        let mut w = StreamWriter::new(Vec::new());
        w.write_start_document().unwrap();
        assert!(matches!(w.write_attribute("a", "1"), Err(Error::Usage(_))));
        assert!(matches!(w.write_namespace("p", "urn:p"), Err(Error::Usage(_))));
        w.write_start_element("r").unwrap();
        w.write_characters("x").unwrap();
        assert!(matches!(w.write_attribute("a", "1"), Err(Error::Usage(_))));
    }

    #[test]
    fn end_element_without_open_element() {
        let mut w = StreamWriter::new(Vec::new());
        w.write_start_document().unwrap();
        assert!(matches!(w.write_end_element(), Err(Error::Usage(_))));
    }

    #[test]
    fn unresolved_attribute_namespace() {
        let mut w = StreamWriter::new(Vec::new());
        w.write_start_document().unwrap();
        w.write_start_element("r").unwrap();
        let err = w.write_attribute_ns("urn:none", "a", "1").unwrap_err();
        assert_eq!(err, Error::UnresolvedNamespace("urn:none".into()));
    }

    #[test]
    fn dtd_and_entity_ref_are_unsupported() {
        let mut w = StreamWriter::new(Vec::new());
        assert!(matches!(w.write_dtd("<!DOCTYPE r>"), Err(Error::Unsupported(_))));
        assert!(matches!(w.write_entity_ref("amp"), Err(Error::Unsupported(_))));
    }

    #[test]
    fn state_follows_staging() {
        let mut w = StreamWriter::new(Vec::new());
        w.write_start_document().unwrap();
        assert_eq!(w.state(), StartTagState::Closed);
        w.write_start_element("r").unwrap();
        assert_eq!(w.state(), StartTagState::OpenNoContent);
        w.write_attribute("a", "1").unwrap();
        assert_eq!(w.state(), StartTagState::OpenWithPending);
        w.write_comment("c").unwrap();
        assert_eq!(w.state(), StartTagState::Closed);
    }

    #[test]
    fn whitespace_filter() {
        let opts = SerializerOptions::default().with_ignore_whitespace_text();
        let mut w = StreamWriter::with_options(Vec::new(), opts);
        w.write_start_document().unwrap();
        w.write_start_element("r").unwrap();
        w.write_characters(" \n\t").unwrap();
        // Tag bleibt offen, weil der Text verworfen wurde
        assert_eq!(w.state(), StartTagState::OpenNoContent);
        w.write_end_document().unwrap();
        let out = w.into_inner().unwrap();
        assert_eq!(body(&out), &[0x3C, 0x00, b'r', 0xFF]);
    }

    #[test]
    fn ignored_comment_and_pi_leave_tag_open() {
        let opts = SerializerOptions::default()
            .with_ignore_comments()
            .with_ignore_processing_instructions();
        let mut w = StreamWriter::with_options(Vec::new(), opts);
        w.write_start_document().unwrap();
        w.write_start_element("r").unwrap();
        w.write_comment("c").unwrap();
        w.write_processing_instruction_with_data("t", "d").unwrap();
        assert!(w.state().is_open());
    }

    #[test]
    fn xml_declaration_prefix() {
        let mut w = StreamWriter::with_config(
            Vec::new(),
            SerializerOptions::default(),
            EncoderConfig::with_xml_declaration(),
        );
        w.write_start_document().unwrap();
        w.write_end_document().unwrap();
        let out = w.into_inner().unwrap();
        assert!(out.starts_with(XML_DECLARATION));
        assert_eq!(&out[XML_DECLARATION.len()..], &[0xE0, 0x00, 0x00, 0x01, 0x00, 0xF0]);
    }

    #[test]
    fn is_whitespace_detects_only_xml_whitespace() {
        assert!(is_whitespace(" \r\n\t"));
        assert!(!is_whitespace(" a "));
        assert!(!is_whitespace("\u{a0}"));
    }

    /// Volle Chunk-Tabelle: neue Texte werden Literale ohne Add-Flag,
    /// vorhandene bleiben indiziert.
    #[test]
    fn full_chunk_table_falls_back_to_literals() {
        let mut w = StreamWriter::new(Vec::new());
        w.encoder.vocabulary.character_content_chunk.set_index_limit(2);
        w.write_start_document().unwrap();
        w.write_start_element("r").unwrap();
        for text in ["a", "b", "c", "c", "a"] {
            w.write_characters(text).unwrap();
        }
        w.write_end_document().unwrap();
        let out = w.into_inner().unwrap();
        assert_eq!(
            body(&out),
            &[0x3C, 0x00, b'r', 0x90, b'a', 0x90, b'b', 0x80, b'c', 0x80, b'c', 0xA0, 0xFF]
        );
    }

    #[test]
    fn full_attribute_value_and_comment_tables_fall_back() {
        let mut w = StreamWriter::new(Vec::new());
        w.encoder.vocabulary.attribute_value.set_index_limit(1);
        w.encoder.vocabulary.other_string.set_index_limit(1);
        w.write_start_document().unwrap();
        w.write_start_element("r").unwrap();
        w.write_attribute("a", "x").unwrap();
        w.write_attribute("b", "y").unwrap();
        w.write_attribute("c", "x").unwrap();
        w.write_comment_owned("k".to_string()).unwrap();
        w.write_comment("l").unwrap();
        w.write_comment_owned("k".to_string()).unwrap();
        w.write_end_document().unwrap();
        let out = w.into_inner().unwrap();
        assert_eq!(
            body(&out),
            &[
                0x7C, 0x00, b'r',
                0x78, 0x00, b'a', 0x40, b'x',
                0x78, 0x00, b'b', 0x00, b'y',
                0x78, 0x00, b'c', 0x80,
                0xF0,
                0xE2, 0x40, b'k',
                0xE2, 0x00, b'l',
                0xE2, 0x80,
                0xFF,
            ]
        );
    }

    #[test]
    fn open_mark_blocks_into_inner_and_close() {
        let mut w = StreamWriter::new(Vec::new());
        w.write_start_document().unwrap();
        w.encoder.writer.mark();
        assert!(matches!(w.close(), Err(Error::Usage(_))));
        assert!(matches!(w.into_inner(), Err(Error::Usage(_))));
    }
}
