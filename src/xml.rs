//! XML parsing to writer events.
//!
//! Uses quick-xml to turn XML text into [`XmlEvent`]s for the writer.

use crate::error::Error;
use crate::event::XmlEvent;
use crate::options::SerializerOptions;
use crate::Result;
use std::path::Path;

mod emit;
pub(crate) use emit::emit_xml_events;

/// Parse XML from a string into writer events.
pub fn parse_xml_events_from_str(xml: &str) -> Result<Vec<XmlEvent>> {
    let mut events = Vec::new();
    emit_xml_events(xml.as_bytes(), |event| {
        events.push(event);
        Ok(())
    })?;
    Ok(events)
}

/// Parse an XML file into writer events.
pub fn parse_xml_events(path: &Path) -> Result<Vec<XmlEvent>> {
    let file = std::fs::File::open(path)
        .map_err(|e| Error::XmlParseError(format!("read XML: {e}")))?;
    let mut events = Vec::new();
    emit_xml_events(file, |event| {
        events.push(event);
        Ok(())
    })?;
    Ok(events)
}

/// Encodes XML text to a Fast Infoset document.
pub fn encode_xml_str(xml: &str, options: &SerializerOptions) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    crate::streaming::encode_xml_stream(xml.as_bytes(), &mut out, options)?;
    Ok(out)
}
