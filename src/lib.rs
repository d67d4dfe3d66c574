//! erfi – Fast Infoset (ITU-T X.891) stream serializer
//!
//! # Beispiel
//!
//! ```
//! use erfi::{StreamWriter, SerializerOptions};
//!
//! let mut w = StreamWriter::with_options(Vec::new(), SerializerOptions::default());
//! w.write_start_document().unwrap();
//! w.write_start_element("greeting").unwrap();
//! w.write_characters("Hello").unwrap();
//! w.write_end_element().unwrap();
//! w.write_end_document().unwrap();
//! let bytes = w.into_inner().unwrap();
//!
//! // Identifikation + Version, Dokument ohne Optionen
//! assert_eq!(&bytes[..5], &[0xE0, 0x00, 0x00, 0x01, 0x00]);
//! // Zwei Terminatoren (Element + Dokument) teilen sich 0xFF
//! assert_eq!(bytes.last(), Some(&0xFF));
//! ```
//!
//! XML-Text direkt:
//!
//! ```
//! let bytes = erfi::encode_xml_str("<a><b/></a>", &erfi::SerializerOptions::default()).unwrap();
//! assert_eq!(&bytes[..4], &[0xE0, 0x00, 0x00, 0x01]);
//! ```

pub mod constants;
pub mod encoder;
pub mod error;
pub mod event;
pub mod integer;
pub mod low_level;
pub mod namespace;
pub mod octets;
pub mod options;
pub mod qname;
pub mod streaming;
pub mod vocabulary;
pub mod writer;
pub mod xml;

pub use error::{Error, Result};

/// HashMap mit ahash (schnell, nicht DoS-resistent; nur für interne Tabellen).
/// Nutzt hashbrown direkt für die raw_entry API.
pub(crate) type FastHashMap<K, V> = hashbrown::HashMap<K, V, ahash::RandomState>;

/// IndexMap mit ahash (deterministische Iteration + schnelles Hashing).
pub(crate) type FastIndexMap<K, V> = indexmap::IndexMap<K, V, ahash::RandomState>;

// Public API: Writer
pub use low_level::LowLevelWriter;
pub use writer::StreamWriter;

// Public API: Events
pub use event::{AttributeContent, ElementContent, NsContent, PiContent, XmlEvent};

// Public API: Options
pub use encoder::{EncoderConfig, Termination, encode, encode_with_config};
pub use options::SerializerOptions;

// Public API: Types
pub use namespace::NamespaceContext;
pub use qname::QualifiedName;
pub use vocabulary::SerializerVocabulary;

// Public API: XML/Streaming
pub use streaming::{encode_xml_file, encode_xml_stream, encode_xml_stream_with_config};
pub use xml::{encode_xml_str, parse_xml_events, parse_xml_events_from_str};
