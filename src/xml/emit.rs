use crate::error::Error;
use crate::event::XmlEvent;
use crate::Result;
use log::debug;
use memchr::memchr;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::name::{QName as XmlQName, ResolveResult};
use quick_xml::reader::NsReader;
use std::borrow::Cow;

/// Liest XML und ruft `emit` für jedes Event in Writer-Reihenfolge auf:
/// Start-Tag, Namespace-Deklarationen, Attribute.
pub(crate) fn emit_xml_events(
    xml_reader: impl std::io::Read,
    mut emit: impl FnMut(XmlEvent) -> Result<()>,
) -> Result<()> {
    let mut reader = NsReader::from_reader(std::io::BufReader::new(xml_reader));
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut depth: usize = 0;
    // Text-Coalescing: gepufferter Text wird vor jedem anderen Event geflusht.
    let mut pending_ch: Option<String> = None;

    emit(XmlEvent::StartDocument)?;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                flush_pending_ch(&mut pending_ch, &mut emit)?;
                emit_start(&reader, e, false, &mut emit)?;
                depth = depth.saturating_add(1);
            }
            Ok(Event::Empty(e)) => {
                flush_pending_ch(&mut pending_ch, &mut emit)?;
                emit_start(&reader, e, true, &mut emit)?;
            }
            Ok(Event::End(_e)) => {
                flush_pending_ch(&mut pending_ch, &mut emit)?;
                depth = depth.checked_sub(1).ok_or_else(|| {
                    Error::XmlParseError("unerwartetes End-Element bei depth=0".to_string())
                })?;
                emit(XmlEvent::EndElement)?;
            }
            Ok(Event::Text(e)) => {
                if let Some(value) = decode_text(e)? {
                    push_text(&mut pending_ch, depth, value)?;
                }
            }
            Ok(Event::CData(e)) => {
                flush_pending_ch(&mut pending_ch, &mut emit)?;
                let text = decode_text_bytes(&e.into_inner())?;
                if depth == 0 {
                    return Err(Error::XmlParseError(
                        "CDATA section outside root element".to_string(),
                    ));
                }
                emit(XmlEvent::CData(text.into()))?;
            }
            Ok(Event::Comment(e)) => {
                flush_pending_ch(&mut pending_ch, &mut emit)?;
                let text = decode_text_bytes(e.as_ref())?;
                emit(XmlEvent::Comment(text.into()))?;
            }
            Ok(Event::PI(e)) => {
                flush_pending_ch(&mut pending_ch, &mut emit)?;
                let target = decode_text_bytes(e.target())?;
                // S zwischen Target und Data ist Separator, nicht Teil der Daten
                let data = decode_text_bytes(e.content())?;
                emit(XmlEvent::processing_instruction(&target, data.trim_start()))?;
            }
            Ok(Event::DocType(_)) => {
                debug!("DOCTYPE ignored");
            }
            Ok(Event::GeneralRef(e)) => {
                let ref_name = decode_text_bytes(e.as_ref())?;
                if ref_name.starts_with('#') {
                    let ch = resolve_char_reference(&ref_name).ok_or_else(|| {
                        Error::XmlParseError(format!("invalid character reference &{ref_name};"))
                    })?;
                    push_text(&mut pending_ch, depth, ch.to_string())?;
                } else if let Some(resolved) = resolve_predefined_entity(&ref_name) {
                    push_text(&mut pending_ch, depth, resolved.to_string())?;
                } else {
                    // Nicht-vordefinierte Entities landen beim Writer (Unsupported)
                    flush_pending_ch(&mut pending_ch, &mut emit)?;
                    emit(XmlEvent::EntityReference(ref_name.into()))?;
                }
            }
            Ok(Event::Decl(_d)) => {
                // StartDocument already emitted.
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlParseError(format!(
                    "parse XML error at {:?}: {e}",
                    reader.buffer_position()
                )));
            }
        }

        buf.clear();
    }

    if depth != 0 {
        return Err(Error::XmlParseError(format!("{depth} unclosed elements at end of input")));
    }
    flush_pending_ch(&mut pending_ch, &mut emit)?;
    emit(XmlEvent::EndDocument)?;
    Ok(())
}

/// Text ausserhalb des Root-Elements darf nur Whitespace sein und entfällt.
fn push_text(pending_ch: &mut Option<String>, depth: usize, value: String) -> Result<()> {
    if depth == 0 {
        if !value.trim().is_empty() {
            return Err(Error::XmlParseError(
                "character data outside root element".to_string(),
            ));
        }
        return Ok(());
    }
    match pending_ch {
        Some(existing) => existing.push_str(&value),
        None => *pending_ch = Some(value),
    }
    Ok(())
}

fn flush_pending_ch(
    pending_ch: &mut Option<String>,
    emit: &mut impl FnMut(XmlEvent) -> Result<()>,
) -> Result<()> {
    if let Some(text) = pending_ch.take() {
        emit(XmlEvent::Characters(text.into()))?;
    }
    Ok(())
}

fn emit_start(
    reader: &NsReader<impl std::io::BufRead>,
    e: BytesStart<'_>,
    is_empty: bool,
    emit: &mut impl FnMut(XmlEvent) -> Result<()>,
) -> Result<()> {
    let (uri, local, prefix) = resolve_element_qname(reader, e.name())?;
    let prefix = prefix.unwrap_or_default();
    emit(if is_empty {
        XmlEvent::EmptyElement(crate::event::ElementContent::new(&prefix, &uri, &local))
    } else {
        XmlEvent::start_element_prefixed(&prefix, &local, &uri)
    })?;

    // Deklarationen vor Attributen: Attribut-Prefixe müssen schon gebunden sein
    let mut attrs: Vec<XmlEvent> = Vec::with_capacity(8);
    for attr in e.attributes().with_checks(false) {
        let attr = attr.map_err(|er| Error::XmlParseError(er.to_string()))?;
        let key = attr.key.as_ref();
        let raw = std::str::from_utf8(attr.value.as_ref())
            .map_err(|er| Error::XmlParseError(er.to_string()))?;
        let value = unescape_attr_value(raw)?;
        let value = normalize_line_endings(value.as_ref());

        if key == b"xmlns" {
            emit(XmlEvent::default_namespace(&value))?;
            continue;
        }
        if let Some(ns_prefix) = key.strip_prefix(b"xmlns:") {
            let ns_prefix = decode_text_bytes(ns_prefix)?;
            emit(XmlEvent::namespace(&ns_prefix, &value))?;
            continue;
        }

        let (attr_uri, attr_local, attr_prefix) = resolve_attribute_qname(reader, attr.key)?;
        attrs.push(XmlEvent::attribute_prefixed(
            attr_prefix.as_deref().unwrap_or(""),
            &attr_uri,
            &attr_local,
            &value,
        ));
    }
    for attr in attrs {
        emit(attr)?;
    }
    Ok(())
}

fn resolve_element_qname(
    reader: &NsReader<impl std::io::BufRead>,
    name: XmlQName<'_>,
) -> Result<(String, String, Option<String>)> {
    let (ns, local) = reader.resolver().resolve_element(name);
    let uri = resolve_to_uri(ns)?;
    let local_name = decode_text_bytes(local.as_ref())?;
    let prefix = split_prefix(name.as_ref()).map(decode_text_bytes).transpose()?;
    Ok((uri, local_name, prefix))
}

fn resolve_attribute_qname(
    reader: &NsReader<impl std::io::BufRead>,
    name: XmlQName<'_>,
) -> Result<(String, String, Option<String>)> {
    let (ns, local) = reader.resolver().resolve_attribute(name);
    let uri = resolve_to_uri(ns)?;
    let local_name = decode_text_bytes(local.as_ref())?;
    let prefix = split_prefix(name.as_ref()).map(decode_text_bytes).transpose()?;
    Ok((uri, local_name, prefix))
}

fn resolve_to_uri(ns: ResolveResult<'_>) -> Result<String> {
    match ns {
        ResolveResult::Bound(ns) => decode_text_bytes(ns.as_ref()),
        ResolveResult::Unbound => Ok(String::new()),
        ResolveResult::Unknown(p) => Err(Error::XmlParseError(format!(
            "unknown namespace prefix '{}'",
            String::from_utf8_lossy(&p)
        ))),
    }
}

/// Löst vordefinierte Entities und Zeichenreferenzen in Attributwerten auf.
fn unescape_attr_value(value: &str) -> Result<Cow<'_, str>> {
    let bytes = value.as_bytes();
    let Some(mut amp) = memchr(b'&', bytes) else {
        return Ok(Cow::Borrowed(value));
    };

    let mut out = String::with_capacity(value.len());
    let mut pos = 0;
    loop {
        out.push_str(&value[pos..amp]);
        let after = &bytes[amp + 1..];
        let Some(rel_semi) = memchr(b';', after) else {
            return Err(Error::XmlParseError(format!("unterminated reference in '{value}'")));
        };
        let semi = amp + 1 + rel_semi;
        let name = &value[amp + 1..semi];
        if name.starts_with('#') {
            let ch = resolve_char_reference(name).ok_or_else(|| {
                Error::XmlParseError(format!("invalid character reference &{name};"))
            })?;
            out.push(ch);
        } else if let Some(predef) = resolve_predefined_entity(name) {
            out.push_str(predef);
        } else {
            return Err(Error::Unsupported("entity reference in attribute value"));
        }
        pos = semi + 1;
        match memchr(b'&', &bytes[pos..]) {
            Some(rel) => amp = pos + rel,
            None => {
                out.push_str(&value[pos..]);
                break;
            }
        }
    }
    Ok(Cow::Owned(out))
}

/// XML 1.0 Sec. 2.11: \r\n -> \n, alleinstehende \r -> \n
fn normalize_line_endings(s: &str) -> Cow<'_, str> {
    if memchr(b'\r', s.as_bytes()).is_none() {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\r' {
            if matches!(chars.peek(), Some('\n')) {
                chars.next();
            }
            out.push('\n');
        } else {
            out.push(ch);
        }
    }
    Cow::Owned(out)
}

fn decode_text(e: BytesText<'_>) -> Result<Option<String>> {
    let text = decode_text_bytes(&e)?;
    if text.is_empty() { Ok(None) } else { Ok(Some(text)) }
}

fn decode_text_bytes(bytes: &[u8]) -> Result<String> {
    let s = std::str::from_utf8(bytes).map_err(|er| Error::XmlParseError(er.to_string()))?;
    Ok(normalize_line_endings(s).into_owned())
}

fn split_prefix(name: &[u8]) -> Option<&[u8]> {
    let pos = memchr(b':', name)?;
    Some(&name[..pos])
}

/// Loest eine XML-Zeichenreferenz auf.
///
/// Eingabe: `#49` (dezimal) oder `#x31` (hexadezimal), ohne `&` und `;`.
fn resolve_char_reference(ref_name: &str) -> Option<char> {
    let digits = ref_name.strip_prefix('#')?;
    let code_point = if let Some(hex) = digits.strip_prefix('x') {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        digits.parse::<u32>().ok()?
    };
    char::from_u32(code_point)
}
