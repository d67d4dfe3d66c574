// Minimaler Fast-Infoset-Reader fuer Round-Trip-Tests.
//
// Wird per `include!` eingebunden. Versteht genau das, was erfi schreibt:
// Dokument ohne Initial Vocabulary, UTF-8-Literale, Indizes, cdata/base64-
// Algorithmus-Chunks. Panics bei allem anderen.

const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

#[derive(Debug, Clone, PartialEq, Eq)]
enum FiEvent {
    StartElement { prefix: String, ns: String, local: String },
    EndElement,
    Namespace { prefix: String, uri: String },
    Attribute { prefix: String, ns: String, local: String, value: String },
    Characters(String),
    CData(String),
    Octets(Vec<u8>),
    Comment(String),
    Pi { target: String, data: String },
}

#[derive(Debug, Clone)]
struct FiName {
    prefix: String,
    ns: String,
    local: String,
}

#[derive(Clone, Copy)]
enum Table {
    Prefix,
    NamespaceName,
    LocalName,
    OtherNcname,
    AttributeValue,
    OtherString,
    Chunk,
}

/// Ergebnis eines Decodes: Events plus Statistik ueber Namens-Kodierung.
struct FiDocument {
    events: Vec<FiEvent>,
    /// Element-Namen als Literal (`true`) oder Index (`false`), in Reihenfolge.
    element_name_literals: Vec<bool>,
    attribute_name_literals: Vec<bool>,
    /// Attributwerte: `true` wenn als Index referenziert.
    attribute_value_indexed: Vec<bool>,
}

struct FiReader<'a> {
    data: &'a [u8],
    pos: usize,
    prefixes: Vec<String>,
    namespaces: Vec<String>,
    local_names: Vec<String>,
    other_ncnames: Vec<String>,
    attribute_values: Vec<String>,
    other_strings: Vec<String>,
    chunks: Vec<String>,
    element_names: Vec<FiName>,
    attribute_names: Vec<FiName>,
    double_pending: bool,
    doc: FiDocument,
}

/// Decodiert ein vollstaendiges Dokument.
fn decode_fi(data: &[u8]) -> Vec<FiEvent> {
    decode_fi_document(data).events
}

fn decode_fi_document(data: &[u8]) -> FiDocument {
    let mut data = data;
    if data.starts_with(b"<?xml") {
        let end = data.windows(2).position(|w| w == b"?>").expect("Ende der XML-Deklaration");
        data = &data[end + 2..];
    }
    assert_eq!(&data[..4], &[0xE0, 0x00, 0x00, 0x01], "Header");
    assert_eq!(data[4], 0x00, "Dokument-Optionen");
    let mut r = FiReader::new(&data[5..]);
    r.read_children();
    assert!(!r.double_pending, "ueberzaehliger Terminator");
    assert_eq!(r.pos, r.data.len(), "Octets nach Dokumentende");
    r.doc
}

impl<'a> FiReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            prefixes: vec!["xml".to_string()],
            namespaces: vec![XML_NS.to_string()],
            local_names: Vec::new(),
            other_ncnames: Vec::new(),
            attribute_values: Vec::new(),
            other_strings: Vec::new(),
            chunks: Vec::new(),
            element_names: Vec::new(),
            attribute_names: Vec::new(),
            double_pending: false,
            doc: FiDocument {
                events: Vec::new(),
                element_name_literals: Vec::new(),
                attribute_name_literals: Vec::new(),
                attribute_value_indexed: Vec::new(),
            },
        }
    }

    fn table(&mut self, t: Table) -> &mut Vec<String> {
        match t {
            Table::Prefix => &mut self.prefixes,
            Table::NamespaceName => &mut self.namespaces,
            Table::LocalName => &mut self.local_names,
            Table::OtherNcname => &mut self.other_ncnames,
            Table::AttributeValue => &mut self.attribute_values,
            Table::OtherString => &mut self.other_strings,
            Table::Chunk => &mut self.chunks,
        }
    }

    fn read(&mut self) -> u8 {
        let b = *self.data.get(self.pos).expect("unerwartetes Ende");
        self.pos += 1;
        b
    }

    fn peek(&self) -> u8 {
        *self.data.get(self.pos).expect("unerwartetes Ende")
    }

    fn take(&mut self, n: usize) -> Vec<u8> {
        let out = self.data[self.pos..self.pos + n].to_vec();
        self.pos += n;
        out
    }

    fn utf8(&mut self, n: usize) -> String {
        String::from_utf8(self.take(n)).expect("UTF-8")
    }

    fn u16(&mut self) -> usize {
        ((self.read() as usize) << 8) | self.read() as usize
    }

    fn u24(&mut self) -> usize {
        ((self.read() as usize) << 16) | self.u16()
    }

    fn u32(&mut self) -> usize {
        (self.u16() << 16) | self.u16()
    }

    // --- Integer ---

    fn second_bit(&mut self, b: u8) -> usize {
        let b = b & 0x7F;
        if b & 0x40 == 0 {
            b as usize + 1
        } else if b & 0x60 == 0x40 {
            ((((b & 0x1F) as usize) << 8) | self.read() as usize) + 65
        } else {
            ((((b & 0x0F) as usize) << 16) | self.u16()) + 8257
        }
    }

    fn third_bit(&mut self, b: u8) -> usize {
        let b = b & 0x3F;
        if b & 0x20 == 0 {
            (b & 0x1F) as usize + 1
        } else if b & 0x38 == 0x20 {
            ((((b & 0x07) as usize) << 8) | self.read() as usize) + 33
        } else if b & 0x38 == 0x28 {
            ((((b & 0x07) as usize) << 16) | self.u16()) + 2081
        } else {
            self.u24() + 526_369
        }
    }

    fn fourth_bit(&mut self, b: u8) -> usize {
        let b = b & 0x1F;
        if b & 0x10 == 0 {
            (b & 0x0F) as usize + 1
        } else if b & 0x1C == 0x10 {
            ((((b & 0x03) as usize) << 8) | self.read() as usize) + 17
        } else if b & 0x1C == 0x14 {
            ((((b & 0x03) as usize) << 16) | self.u16()) + 1041
        } else {
            self.u24() + 263_185
        }
    }

    fn length_second_bit(&mut self, b: u8) -> usize {
        if b & 0x40 == 0 {
            (b & 0x3F) as usize + 1
        } else if b & 0x60 == 0x40 {
            self.read() as usize + 65
        } else {
            self.u32() + 321
        }
    }

    fn length_fifth_bit(&mut self, b: u8) -> usize {
        if b & 0x08 == 0 {
            (b & 0x07) as usize + 1
        } else if b & 0x0C == 0x08 {
            self.read() as usize + 9
        } else {
            self.u32() + 265
        }
    }

    fn length_seventh_bit(&mut self, b: u8) -> usize {
        match b & 0x03 {
            0 | 1 => (b & 0x01) as usize + 1,
            2 => self.read() as usize + 3,
            _ => self.u32() + 259,
        }
    }

    // --- Strings ---

    fn identifying(&mut self, t: Table) -> String {
        let b = self.read();
        if b & 0x80 != 0 {
            let idx = self.second_bit(b);
            return self.table(t)[idx - 1].clone();
        }
        let len = self.length_second_bit(b);
        let s = self.utf8(len);
        self.table(t).push(s.clone());
        s
    }

    /// Non-identifying string on the first bit; liefert (Wert, war Index).
    fn non_identifying(&mut self, t: Table) -> (String, bool) {
        let b = self.read();
        if b == 0xFF {
            return (String::new(), false);
        }
        if b & 0x80 != 0 {
            let idx = self.second_bit(b);
            return (self.table(t)[idx - 1].clone(), true);
        }
        assert_eq!(b & 0x30, 0, "nur UTF-8");
        let add = b & 0x40 != 0;
        let len = self.length_fifth_bit(b);
        let s = self.utf8(len);
        if add {
            self.table(t).push(s.clone());
        }
        (s, false)
    }

    fn literal_qname(&mut self, flags: u8) -> FiName {
        let prefix = if flags & 0x02 != 0 { self.identifying(Table::Prefix) } else { String::new() };
        let ns = if flags & 0x01 != 0 {
            self.identifying(Table::NamespaceName)
        } else {
            String::new()
        };
        let local = self.identifying(Table::LocalName);
        FiName { prefix, ns, local }
    }

    // --- Items ---

    fn read_children(&mut self) {
        loop {
            if self.double_pending {
                self.double_pending = false;
                return;
            }
            match self.peek() {
                0xF0 => {
                    self.pos += 1;
                    return;
                }
                0xFF => {
                    self.pos += 1;
                    self.double_pending = true;
                    return;
                }
                0xE1 => {
                    self.pos += 1;
                    let target = self.identifying(Table::OtherNcname);
                    let (data, _) = self.non_identifying(Table::OtherString);
                    self.doc.events.push(FiEvent::Pi { target, data });
                }
                0xE2 => {
                    self.pos += 1;
                    let (text, _) = self.non_identifying(Table::OtherString);
                    self.doc.events.push(FiEvent::Comment(text));
                }
                b if b & 0x80 == 0 => self.read_element(),
                b if b & 0xC0 == 0x80 => self.read_chunk(),
                b => panic!("unerwartetes Octet {b:#04x} an Position {}", self.pos),
            }
        }
    }

    fn read_element(&mut self) {
        let b = self.read();
        let has_attributes = b & 0x40 != 0;
        let q = if b & 0x3C == 0x38 {
            loop {
                let nb = self.read();
                if nb == 0xF0 {
                    break;
                }
                assert_eq!(nb & 0xFC, 0xCC, "Namespace-Attribut erwartet");
                let prefix = if nb & 0x02 != 0 { self.identifying(Table::Prefix) } else { String::new() };
                let uri = if nb & 0x01 != 0 {
                    self.identifying(Table::NamespaceName)
                } else {
                    String::new()
                };
                self.doc.events.push(FiEvent::Namespace { prefix, uri });
            }
            self.read()
        } else {
            b
        };

        let name = if q & 0x3C == 0x3C {
            let name = self.literal_qname(q & 0x03);
            self.element_names.push(name.clone());
            self.doc.element_name_literals.push(true);
            name
        } else {
            let idx = self.third_bit(q);
            self.doc.element_name_literals.push(false);
            self.element_names[idx - 1].clone()
        };
        self.doc.events.push(FiEvent::StartElement {
            prefix: name.prefix,
            ns: name.ns,
            local: name.local,
        });

        if has_attributes {
            loop {
                match self.peek() {
                    0xF0 => {
                        self.pos += 1;
                        break;
                    }
                    0xFF => {
                        // Attribute und Kinder zugleich beendet
                        self.pos += 1;
                        self.doc.events.push(FiEvent::EndElement);
                        return;
                    }
                    _ => self.read_attribute(),
                }
            }
        }
        self.read_children();
        self.doc.events.push(FiEvent::EndElement);
    }

    fn read_attribute(&mut self) {
        let b = self.read();
        let name = if b & 0xFC == 0x78 {
            let name = self.literal_qname(b & 0x03);
            self.attribute_names.push(name.clone());
            self.doc.attribute_name_literals.push(true);
            name
        } else {
            let idx = self.second_bit(b);
            self.doc.attribute_name_literals.push(false);
            self.attribute_names[idx - 1].clone()
        };
        let (value, indexed) = self.non_identifying(Table::AttributeValue);
        self.doc.attribute_value_indexed.push(indexed);
        self.doc.events.push(FiEvent::Attribute {
            prefix: name.prefix,
            ns: name.ns,
            local: name.local,
            value,
        });
    }

    fn read_chunk(&mut self) {
        let b = self.read();
        if b & 0x20 != 0 {
            let idx = self.fourth_bit(b);
            let text = self.chunks[idx - 1].clone();
            self.doc.events.push(FiEvent::Characters(text));
        } else if b & 0x0C == 0x0C {
            let b2 = self.read();
            let algorithm = ((b & 0x03) << 6) | (b2 >> 2);
            let len = self.length_seventh_bit(b2);
            let data = self.take(len);
            let event = match algorithm {
                9 => FiEvent::CData(String::from_utf8(data).expect("UTF-8")),
                1 => FiEvent::Octets(data),
                other => panic!("unbekannter Algorithmus {other}"),
            };
            self.doc.events.push(event);
        } else {
            assert_eq!(b & 0x0C, 0, "nur UTF-8");
            let add = b & 0x10 != 0;
            let len = self.length_seventh_bit(b);
            let text = self.utf8(len);
            if add {
                self.chunks.push(text.clone());
            }
            self.doc.events.push(FiEvent::Characters(text));
        }
    }
}

/// Projektion ohne Prefixe und Namespace-Deklarationen; CDATA zaehlt als Text.
fn structural(events: &[FiEvent]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for e in events {
        let line = match e {
            FiEvent::StartElement { ns, local, .. } => format!("SE {{{ns}}}{local}"),
            FiEvent::EndElement => "EE".to_string(),
            FiEvent::Namespace { .. } => continue,
            FiEvent::Attribute { ns, local, value, .. } => format!("AT {{{ns}}}{local}={value}"),
            FiEvent::Characters(t) | FiEvent::CData(t) => {
                // Benachbarter Text wird zusammengefasst
                if let Some(last) = out.last_mut()
                    && last.starts_with("CH ")
                {
                    last.push_str(t);
                    continue;
                }
                format!("CH {t}")
            }
            FiEvent::Octets(d) => format!("OC {d:?}"),
            FiEvent::Comment(t) => format!("CM {t}"),
            FiEvent::Pi { target, data } => format!("PI {target} {data}"),
        };
        out.push(line);
    }
    out
}

/// Erwartete Projektion aus einem unabhaengigen XML-Parser.
fn structural_from_roxmltree(xml: &str) -> Vec<String> {
    fn walk(node: roxmltree::Node<'_, '_>, out: &mut Vec<String>) {
        match node.node_type() {
            roxmltree::NodeType::Element => {
                let tag = node.tag_name();
                out.push(format!("SE {{{}}}{}", tag.namespace().unwrap_or(""), tag.name()));
                for a in node.attributes() {
                    out.push(format!("AT {{{}}}{}={}", a.namespace().unwrap_or(""), a.name(), a.value()));
                }
                for child in node.children() {
                    walk(child, out);
                }
                out.push("EE".to_string());
            }
            roxmltree::NodeType::Text => {
                let t = node.text().unwrap_or("");
                if let Some(last) = out.last_mut()
                    && last.starts_with("CH ")
                {
                    last.push_str(t);
                } else {
                    out.push(format!("CH {t}"));
                }
            }
            roxmltree::NodeType::Comment => {
                out.push(format!("CM {}", node.text().unwrap_or("")));
            }
            roxmltree::NodeType::PI => {
                if let Some(pi) = node.pi() {
                    out.push(format!("PI {} {}", pi.target, pi.value.unwrap_or("")));
                }
            }
            roxmltree::NodeType::Root => {}
        }
    }

    let doc = roxmltree::Document::parse(xml).expect("XML parsen");
    let mut out = Vec::new();
    for child in doc.root().children() {
        // Text auf Dokument-Ebene gibt es nicht
        if child.is_text() {
            continue;
        }
        walk(child, &mut out);
    }
    out
}
