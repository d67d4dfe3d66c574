//! Low-level indexed writer.
//!
//! Für Aufrufer, die Vocabulary-Indizes selbst verwalten (z. B. generierter
//! Binding-Code). Die Operationen schreiben direkt in den Octet-Buffer des
//! [`StreamWriter`]; Element-Header werden über die Mark nachträglich mit dem
//! Attribut-Flag versehen.
//!
//! Ablauf für `<e a="v">text</e>`:
//!
//! ```
//! use erfi::{LowLevelWriter, StreamWriter};
//! use erfi::constants::ELEMENT;
//!
//! let mut w = StreamWriter::new(Vec::new());
//! w.write_start_document().unwrap();
//! w.initiate_low_level_writing().unwrap();
//! w.write_low_level_termination_and_mark();
//! if !w.write_low_level_start_element(ELEMENT, "", "", "e").unwrap() {
//!     // Name war neu; Literal wurde geschrieben
//! }
//! w.write_low_level_start_attributes();
//! w.write_low_level_attribute("", "", "a").unwrap();
//! w.write_low_level_attribute_value("v").unwrap();
//! w.write_low_level_end_start_element();
//! w.write_low_level_text("text").unwrap();
//! w.write_low_level_end_element().unwrap();
//! w.write_end_document().unwrap();
//! ```

use std::io::Write;

use crate::constants::*;
use crate::integer;
use crate::writer::StreamWriter;
use crate::Result;

/// Indexed write operations sharing the encoder state of a [`StreamWriter`].
pub trait LowLevelWriter {
    /// Flushes a pending start tag of the event-style API.
    fn initiate_low_level_writing(&mut self) -> Result<()>;

    fn next_element_index(&self) -> u32;

    fn next_attribute_index(&self) -> u32;

    /// Index of `local_name` in the local name table, if present.
    fn local_name_index(&self, local_name: &str) -> Option<u32>;

    fn next_local_name_index(&self) -> u32;

    /// Writes a pending terminator and marks the position of the next
    /// element header.
    fn write_low_level_termination_and_mark(&mut self);

    /// Element header with a known element name index. `element_type`
    /// carries the first two bits.
    fn write_low_level_start_element_indexed(&mut self, element_type: u8, index: u32) -> Result<()>;

    /// Element header by name. Returns `true` if the name was indexed,
    /// `false` if it was new and written as literal.
    fn write_low_level_start_element(
        &mut self,
        element_type: u8,
        prefix: &str,
        namespace_uri: &str,
        local_name: &str,
    ) -> Result<bool>;

    fn write_low_level_start_namespaces(&mut self);

    fn write_low_level_namespace(&mut self, prefix: &str, namespace_uri: &str) -> Result<()>;

    fn write_low_level_end_namespaces(&mut self);

    /// Sets the attribute flag on the marked element header.
    fn write_low_level_start_attributes(&mut self);

    fn write_low_level_attribute_indexed(&mut self, index: u32) -> Result<()>;

    /// Attribute name. Returns `true` if indexed.
    fn write_low_level_attribute(
        &mut self,
        prefix: &str,
        namespace_uri: &str,
        local_name: &str,
    ) -> Result<bool>;

    fn write_low_level_attribute_value(&mut self, value: &str) -> Result<()>;

    /// Literal qualified name with the local name as UTF-8 octets.
    /// `name_type` is the full first octet (element or attribute literal).
    fn write_low_level_start_name_literal(
        &mut self,
        name_type: u8,
        prefix: &str,
        namespace_uri: &str,
        utf8_local_name: &[u8],
    ) -> Result<()>;

    /// Literal qualified name with a local name index.
    fn write_low_level_start_name_literal_indexed(
        &mut self,
        name_type: u8,
        prefix: &str,
        namespace_uri: &str,
        local_name_index: u32,
    ) -> Result<()>;

    fn write_low_level_end_start_element(&mut self);

    fn write_low_level_end_element(&mut self) -> Result<()>;

    fn write_low_level_text(&mut self, text: &str) -> Result<()>;

    fn write_low_level_octets(&mut self, data: &[u8]) -> Result<()>;
}

impl<W: Write> LowLevelWriter for StreamWriter<W> {
    fn initiate_low_level_writing(&mut self) -> Result<()> {
        self.flush_start_tag(false)
    }

    fn next_element_index(&self) -> u32 {
        self.encoder.vocabulary.element_name.next_index()
    }

    fn next_attribute_index(&self) -> u32 {
        self.encoder.vocabulary.attribute_name.next_index()
    }

    fn local_name_index(&self, local_name: &str) -> Option<u32> {
        self.encoder.vocabulary.local_name.get(local_name)
    }

    fn next_local_name_index(&self) -> u32 {
        self.encoder.vocabulary.local_name.next_index()
    }

    fn write_low_level_termination_and_mark(&mut self) {
        self.encoder.encode_termination();
        self.encoder.writer.mark();
    }

    fn write_low_level_start_element_indexed(&mut self, element_type: u8, index: u32) -> Result<()> {
        integer::write_on_third_bit(&mut self.encoder.writer, element_type, index)
    }

    fn write_low_level_start_element(
        &mut self,
        element_type: u8,
        prefix: &str,
        namespace_uri: &str,
        local_name: &str,
    ) -> Result<bool> {
        let indexed =
            self.encoder
                .encode_element_index(element_type, prefix, namespace_uri, local_name)?;
        if !indexed {
            self.encoder.encode_literal_qname(
                element_type | ELEMENT_LITERAL_QNAME_FLAG,
                prefix,
                namespace_uri,
                local_name,
            )?;
        }
        Ok(indexed)
    }

    fn write_low_level_start_namespaces(&mut self) {
        self.encoder.writer.write(ELEMENT | ELEMENT_NAMESPACES_FLAG);
    }

    fn write_low_level_namespace(&mut self, prefix: &str, namespace_uri: &str) -> Result<()> {
        self.encoder.encode_namespace_attribute(prefix, namespace_uri)
    }

    fn write_low_level_end_namespaces(&mut self) {
        self.encoder.writer.write(TERMINATOR);
    }

    fn write_low_level_start_attributes(&mut self) {
        self.encoder.writer.patch_mark(ELEMENT_ATTRIBUTE_FLAG);
    }

    fn write_low_level_attribute_indexed(&mut self, index: u32) -> Result<()> {
        integer::write_on_second_bit_first_bit_zero(&mut self.encoder.writer, index)
    }

    fn write_low_level_attribute(
        &mut self,
        prefix: &str,
        namespace_uri: &str,
        local_name: &str,
    ) -> Result<bool> {
        let indexed = self
            .encoder
            .encode_attribute_index(prefix, namespace_uri, local_name)?;
        if !indexed {
            self.encoder.encode_literal_qname(
                ATTRIBUTE_LITERAL_QNAME_FLAG,
                prefix,
                namespace_uri,
                local_name,
            )?;
        }
        Ok(indexed)
    }

    fn write_low_level_attribute_value(&mut self, value: &str) -> Result<()> {
        self.encoder.encode_attribute_value(value)
    }

    fn write_low_level_start_name_literal(
        &mut self,
        name_type: u8,
        prefix: &str,
        namespace_uri: &str,
        utf8_local_name: &[u8],
    ) -> Result<()> {
        self.encoder
            .encode_literal_qname_utf8(name_type, prefix, namespace_uri, utf8_local_name)
    }

    fn write_low_level_start_name_literal_indexed(
        &mut self,
        name_type: u8,
        prefix: &str,
        namespace_uri: &str,
        local_name_index: u32,
    ) -> Result<()> {
        self.encoder
            .encode_literal_qname_indexed(name_type, prefix, namespace_uri, local_name_index)
    }

    fn write_low_level_end_start_element(&mut self) {
        if self.encoder.writer.has_mark() {
            self.encoder.writer.reset_mark();
        } else {
            // Attributliste terminieren
            self.encoder.defer_attributes_termination();
        }
    }

    fn write_low_level_end_element(&mut self) -> Result<()> {
        self.encoder.encode_element_termination();
        self.maybe_drain()
    }

    fn write_low_level_text(&mut self, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        self.encoder.encode_termination();
        self.encoder.encode_characters(text)?;
        self.maybe_drain()
    }

    fn write_low_level_octets(&mut self, data: &[u8]) -> Result<()> {
        if data.is_empty() {
            return Ok(());
        }
        self.encoder.encode_termination();
        self.encoder.encode_octets(data)?;
        self.maybe_drain()
    }
}
