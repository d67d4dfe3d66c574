//! Streaming XML → Fast Infoset mit begrenztem Speicherverbrauch
//! (kein vollständiges Einlesen der XML-Eingabe).
//!
//! Der Octet-Buffer des Writers wird ab [`FLUSH_THRESHOLD`] in den Sink
//! geleert; die Vocabulary wächst weiterhin mit dem Dokument.

use std::io::{Read, Write};
use std::path::Path;

use crate::encoder::EncoderConfig;
use crate::options::SerializerOptions;
use crate::writer::StreamWriter;
use crate::xml::emit_xml_events;
use crate::{Error, Result};

pub use crate::writer::FLUSH_THRESHOLD;

/// Encodiert XML streaming zu Fast Infoset.
pub fn encode_xml_stream(
    xml_reader: impl Read,
    fi_writer: impl Write,
    options: &SerializerOptions,
) -> Result<()> {
    encode_xml_stream_with_config(xml_reader, fi_writer, options, EncoderConfig::default())
}

/// Encodiert XML streaming mit expliziter Header-Konfiguration.
pub fn encode_xml_stream_with_config(
    xml_reader: impl Read,
    fi_writer: impl Write,
    options: &SerializerOptions,
    config: EncoderConfig,
) -> Result<()> {
    options.validate()?;
    let mut writer = StreamWriter::with_config(fi_writer, options.clone(), config);
    emit_xml_events(xml_reader, |event| writer.write_event(&event))?;
    writer.flush()
}

/// Encodiert eine XML-Datei streaming zu einer Fast-Infoset-Datei.
pub fn encode_xml_file(
    xml_path: &Path,
    fi_path: &Path,
    options: &SerializerOptions,
    config: EncoderConfig,
) -> Result<()> {
    let xml_file = std::fs::File::open(xml_path)
        .map_err(|e| Error::IoError(format!("XML-Datei oeffnen: {e}")))?;
    let fi_file = std::fs::File::create(fi_path)
        .map_err(|e| Error::IoError(format!("FI-Datei erstellen: {e}")))?;
    let fi_writer = std::io::BufWriter::new(fi_file);
    encode_xml_stream_with_config(xml_file, fi_writer, options, config)
}
