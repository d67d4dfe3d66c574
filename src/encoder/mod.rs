//! Fast Infoset encoder core (X.891 Annex C).
//!
//! Der Encoder kennt keine Start-Tag-Logik; er schreibt einzelne Information
//! Items in einen Octet-Buffer und verwaltet die Vocabulary sowie die
//! verzögerte Terminierung offener Listen. Die Event-Zustandsmaschine sitzt
//! darüber im [`StreamWriter`](crate::StreamWriter).
//!
//! # Beispiel
//!
//! ```
//! use erfi::encoder::encode;
//! use erfi::event::XmlEvent;
//! use erfi::SerializerOptions;
//!
//! let events = vec![
//!     XmlEvent::StartDocument,
//!     XmlEvent::start_element("root"),
//!     XmlEvent::EndElement,
//!     XmlEvent::EndDocument,
//! ];
//! let bytes = encode(&events, &SerializerOptions::default()).unwrap();
//! assert_eq!(&bytes[..4], &[0xE0, 0x00, 0x00, 0x01]);
//! ```

mod config;
pub(crate) mod pending;
mod qname;
pub(crate) mod value;

pub use config::EncoderConfig;

use std::io::Write;

use crate::constants::*;
use crate::error::Result;
use crate::event::XmlEvent;
use crate::octets::OctetWriter;
use crate::options::SerializerOptions;
use crate::vocabulary::SerializerVocabulary;
use crate::writer::StreamWriter;

use value::{character_chunk_access, write_algorithm_chunk, write_identifying_string,
    write_non_identifying_string_on_first_bit, write_non_identifying_string_on_first_bit_owned};

/// Verzögerte Terminierung.
///
/// Ein Terminator wird erst geschrieben, wenn feststeht, ob ihm ein zweiter
/// folgt; zwei Terminatoren teilen sich dann das Octet 0xFF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Termination {
    #[default]
    None,
    /// 0xF0 pending.
    Single,
    /// 0xFF pending.
    Double,
}

impl Termination {
    pub fn octet(self) -> Option<u8> {
        match self {
            Self::None => None,
            Self::Single => Some(TERMINATOR),
            Self::Double => Some(DOUBLE_TERMINATOR),
        }
    }
}

/// Octet-level encoder with its per-document vocabulary.
pub struct Encoder {
    /// Output-Buffer; wird vom StreamWriter in den Sink geleert.
    pub(crate) writer: OctetWriter,
    /// Vocabulary der aktuellen Dokument-Session.
    pub(crate) vocabulary: SerializerVocabulary,
    options: SerializerOptions,
    config: EncoderConfig,
    termination: Termination,
}

impl Encoder {
    pub fn new(options: SerializerOptions, config: EncoderConfig) -> Self {
        Self {
            writer: OctetWriter::new(),
            vocabulary: SerializerVocabulary::new(),
            options,
            config,
            termination: Termination::None,
        }
    }

    pub fn options(&self) -> &SerializerOptions {
        &self.options
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    pub fn vocabulary(&self) -> &SerializerVocabulary {
        &self.vocabulary
    }

    /// Currently deferred terminator.
    pub fn termination(&self) -> Termination {
        self.termination
    }

    /// Gibt die aktuelle Buffer-Größe in Bytes zurück (für Flush-Schwellenwerte).
    pub fn buf_len(&self) -> usize {
        self.writer.buf_len()
    }

    /// Drops the deferred terminator and the mark. Buffered octets stay.
    pub fn reset(&mut self) {
        self.termination = Termination::None;
        self.writer.reset_mark();
    }

    /// Optional XML declaration plus identification and version.
    pub fn encode_header(&mut self) {
        if self.config.xml_declaration {
            self.writer.write_bytes(XML_DECLARATION);
        }
        self.writer.write_bytes(&BINARY_HEADER);
    }

    /// Resets the vocabulary and writes the document options octet.
    pub fn encode_initial_vocabulary(&mut self) {
        self.vocabulary.clear();
        self.writer.write(DOCUMENT_NO_OPTIONS);
    }

    /// Terminates the children of the document.
    pub fn encode_document_termination(&mut self) {
        self.encode_element_termination();
        self.encode_termination();
    }

    /// Defers the terminator of an element's children.
    pub fn encode_element_termination(&mut self) {
        self.termination = match self.termination {
            Termination::Single => Termination::Double,
            Termination::Double => {
                self.writer.write(DOUBLE_TERMINATOR);
                Termination::Single
            }
            Termination::None => Termination::Single,
        };
    }

    /// Writes the deferred terminator, if any.
    pub fn encode_termination(&mut self) {
        if let Some(octet) = self.termination.octet() {
            self.writer.write(octet);
        }
        self.termination = Termination::None;
    }

    /// Defers the terminator of an attribute list.
    pub(crate) fn defer_attributes_termination(&mut self) {
        self.termination = Termination::Single;
    }

    /// Namespace attribute item (C.12).
    pub fn encode_namespace_attribute(&mut self, prefix: &str, uri: &str) -> Result<()> {
        let mut b = NAMESPACE_ATTRIBUTE;
        if !prefix.is_empty() {
            b |= NAMESPACE_ATTRIBUTE_PREFIX_FLAG;
        }
        if !uri.is_empty() {
            b |= NAMESPACE_ATTRIBUTE_NAME_FLAG;
        }
        self.writer.write(b);
        if !prefix.is_empty() {
            write_identifying_string(&mut self.writer, &mut self.vocabulary.prefix, prefix)?;
        }
        if !uri.is_empty() {
            write_identifying_string(&mut self.writer, &mut self.vocabulary.namespace_name, uri)?;
        }
        Ok(())
    }

    /// Character chunk; empty text writes nothing.
    pub fn encode_characters(&mut self, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        self.encode_character_chunk(text)
    }

    /// Like [`encode_characters`](Self::encode_characters); a new table
    /// entry takes over `text` without copying.
    pub fn encode_characters_owned(&mut self, text: String) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        self.encode_character_chunk_owned(text)
    }

    /// CDATA section as `cdata` encoding-algorithm chunk.
    pub fn encode_cdata(&mut self, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        write_algorithm_chunk(&mut self.writer, ENCODING_ALGORITHM_CDATA, text.as_bytes())
    }

    /// Raw octets as `base64` encoding-algorithm chunk.
    pub fn encode_octets(&mut self, data: &[u8]) -> Result<()> {
        if data.is_empty() {
            return Ok(());
        }
        write_algorithm_chunk(&mut self.writer, ENCODING_ALGORITHM_BASE64, data)
    }

    /// Comment item (C.8).
    pub fn encode_comment(&mut self, text: &str) -> Result<()> {
        self.writer.write(COMMENT);
        let access = character_chunk_access(&self.options, &self.vocabulary.other_string, text);
        write_non_identifying_string_on_first_bit(
            &mut self.writer,
            &mut self.vocabulary.other_string,
            text,
            access,
        )
    }

    pub fn encode_comment_owned(&mut self, text: String) -> Result<()> {
        self.writer.write(COMMENT);
        let access = character_chunk_access(&self.options, &self.vocabulary.other_string, &text);
        write_non_identifying_string_on_first_bit_owned(
            &mut self.writer,
            &mut self.vocabulary.other_string,
            text,
            access,
        )
    }

    /// Processing instruction item (C.5).
    pub fn encode_processing_instruction(&mut self, target: &str, data: &str) -> Result<()> {
        self.writer.write(PROCESSING_INSTRUCTION);
        write_identifying_string(&mut self.writer, &mut self.vocabulary.other_ncname, target)?;
        let access = character_chunk_access(&self.options, &self.vocabulary.other_string, data);
        write_non_identifying_string_on_first_bit(
            &mut self.writer,
            &mut self.vocabulary.other_string,
            data,
            access,
        )
    }

    /// Draint den Buffer in den Sink; bei gesetzter Mark passiert nichts.
    pub fn drain_to(&mut self, sink: &mut impl Write) -> Result<()> {
        self.writer.drain_to(sink)?;
        Ok(())
    }

    /// Finalises the encoder and returns the buffered octets.
    pub fn into_vec(self) -> Vec<u8> {
        self.writer.into_vec()
    }
}

// ============================================================================
// High-Level API
// ============================================================================

/// Encodes an event sequence to a Fast Infoset document.
pub fn encode(events: &[XmlEvent], options: &SerializerOptions) -> Result<Vec<u8>> {
    encode_with_config(events, options, EncoderConfig::default())
}

/// Encodes an event sequence with explicit header configuration.
pub fn encode_with_config(
    events: &[XmlEvent],
    options: &SerializerOptions,
    config: EncoderConfig,
) -> Result<Vec<u8>> {
    options.validate()?;
    let mut writer = StreamWriter::with_config(Vec::new(), options.clone(), config);
    for event in events {
        writer.write_event(event)?;
    }
    writer.into_inner()
}
