//! Round-Trip-Tests: XML → erfi → Fast Infoset → Test-Reader.
//!
//! Die decodierte Struktur (Elemente, Attribute in Reihenfolge, Text,
//! Kommentare, PIs) wird gegen roxmltree als unabhaengigen Parser geprueft.

use erfi::{SerializerOptions, encode_xml_str};

include!("common/fi_reader.rs");

fn assert_round_trip(xml: &str) {
    let bytes = encode_xml_str(xml, &SerializerOptions::default()).unwrap();
    let decoded = decode_fi(&bytes);
    assert_eq!(
        structural(&decoded),
        structural_from_roxmltree(xml),
        "Round-Trip weicht ab fuer: {xml}"
    );
}

// ============================================================================
// Struktur
// ============================================================================

#[test]
fn empty_root() {
    assert_round_trip("<r/>");
}

#[test]
fn nested_elements_and_text() {
    assert_round_trip("<doc><p>Hallo Welt</p><p>Zweiter <b>fetter</b> Absatz</p></doc>");
}

#[test]
fn deep_nesting_closes_correctly() {
    let mut xml = String::new();
    for i in 0..50 {
        xml.push_str(&format!("<l{i}>"));
    }
    xml.push('x');
    for i in (0..50).rev() {
        xml.push_str(&format!("</l{i}>"));
    }
    assert_round_trip(&xml);
}

#[test]
fn empty_siblings() {
    assert_round_trip("<r><a/><b/><a/><c></c></r>");
}

#[test]
fn attributes_keep_order() {
    assert_round_trip(r#"<r z="1" a="2" m="3"><c a="2" z="9"/></r>"#);
}

#[test]
fn empty_attribute_value() {
    assert_round_trip(r#"<r a=""/>"#);
}

#[test]
fn mixed_content_with_comments_and_pis() {
    assert_round_trip("<!--vorher--><?app go?><r>a<!--c-->b<?t d?>c</r><!--nachher-->");
}

#[test]
fn entities_and_char_refs() {
    assert_round_trip(r#"<r a="&lt;&#x41;&amp;">x &gt; y &#169;</r>"#);
}

#[test]
fn non_ascii_text_and_names() {
    assert_round_trip(r#"<größe einheit="µm">Ærøskøbing 東京</größe>"#);
}

#[test]
fn whitespace_text_preserved_by_default() {
    assert_round_trip("<r>\n  <a/>\n  <b> </b>\n</r>");
}

#[test]
fn long_text_and_values() {
    let long = "y".repeat(5000);
    assert_round_trip(&format!(r#"<r v="{long}">{long}</r>"#));
}

// ============================================================================
// Namespaces
// ============================================================================

#[test]
fn default_namespace() {
    assert_round_trip(r#"<r xmlns="urn:d"><c/><c xmlns=""/></r>"#);
}

#[test]
fn prefixed_namespaces_and_attributes() {
    assert_round_trip(
        r#"<p:r xmlns:p="urn:p" xmlns:q="urn:q" q:a="1" b="2"><q:c p:x="y"/></p:r>"#,
    );
}

#[test]
fn xml_namespace_attribute() {
    assert_round_trip(r#"<r xml:lang="de"><t xml:space="preserve"> </t></r>"#);
}

#[test]
fn namespace_declarations_and_prefixes_decoded() {
    let xml = r#"<p:r xmlns:p="urn:p" p:a="1"><p:c/></p:r>"#;
    let bytes = encode_xml_str(xml, &SerializerOptions::default()).unwrap();
    let events = decode_fi(&bytes);
    assert_eq!(
        events,
        vec![
            FiEvent::Namespace { prefix: "p".into(), uri: "urn:p".into() },
            FiEvent::StartElement { prefix: "p".into(), ns: "urn:p".into(), local: "r".into() },
            FiEvent::Attribute {
                prefix: "p".into(),
                ns: "urn:p".into(),
                local: "a".into(),
                value: "1".into(),
            },
            FiEvent::StartElement { prefix: "p".into(), ns: "urn:p".into(), local: "c".into() },
            FiEvent::EndElement,
            FiEvent::EndElement,
        ]
    );
}

#[test]
fn redeclared_prefix_in_child() {
    assert_round_trip(r#"<p:r xmlns:p="urn:1"><p:c xmlns:p="urn:2"><p:d/></p:c><p:e/></p:r>"#);
}

// ============================================================================
// Optionen
// ============================================================================

#[test]
fn ignore_options_filter_items() {
    let xml = "<r>\n  <!--c--><?t d?><a>x</a>\n</r>";
    let opts = SerializerOptions::default()
        .with_ignore_comments()
        .with_ignore_processing_instructions()
        .with_ignore_whitespace_text();
    let bytes = encode_xml_str(xml, &opts).unwrap();
    assert_eq!(
        structural(&decode_fi(&bytes)),
        vec!["SE {}r", "SE {}a", "CH x", "EE", "EE"]
    );
}

#[test]
fn cdata_section_round_trip() {
    let xml = "<r><![CDATA[<kein>&markup]]></r>";
    let bytes = encode_xml_str(xml, &SerializerOptions::default()).unwrap();
    assert_eq!(
        decode_fi(&bytes),
        vec![
            FiEvent::StartElement { prefix: String::new(), ns: String::new(), local: "r".into() },
            FiEvent::CData("<kein>&markup".into()),
            FiEvent::EndElement,
        ]
    );
}

#[test]
fn many_distinct_names_use_medium_indices() {
    // > 32 Element-Namen: Indizes auf dem dritten Bit brauchen zwei Octets
    let mut xml = String::from("<r>");
    for round in 0..2 {
        for i in 0..100 {
            xml.push_str(&format!("<e{i} a{i}=\"v{round}\"/>"));
        }
    }
    xml.push_str("</r>");
    assert_round_trip(&xml);
}

#[test]
fn many_repeated_texts_use_medium_chunk_indices() {
    let mut xml = String::from("<r>");
    for _ in 0..2 {
        for i in 0..40 {
            xml.push_str(&format!("<t>text {i}</t>"));
        }
    }
    xml.push_str("</r>");
    assert_round_trip(&xml);
}
