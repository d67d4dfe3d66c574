//! Octet-level constants of the Fast Infoset binary format (ITU-T X.891).
//!
//! Bits are numbered from the most significant bit of an octet ("first bit")
//! to the least significant ("eighth bit"). A constant named `*_2ND_BIT_*`
//! belongs to a field that starts at the second bit of the current octet.

/// Identification (`E0 00`) and version (`00 01`) at the start of every document.
pub const BINARY_HEADER: [u8; 4] = [0xE0, 0x00, 0x00, 0x01];

/// Optionale XML-Deklaration vor dem binären Header.
pub const XML_DECLARATION: &[u8] = b"<?xml encoding='finf'?>";

/// Document options octet without initial vocabulary and optional components.
pub const DOCUMENT_NO_OPTIONS: u8 = 0x00;

// --- Terminierung ---

/// Closes an attribute list, a namespace list or a child list.
pub const TERMINATOR: u8 = 0xF0;
/// Two terminators packed into one octet.
pub const DOUBLE_TERMINATOR: u8 = 0xFF;

// --- Element Information Item ---

pub const ELEMENT: u8 = 0x00;
pub const ELEMENT_ATTRIBUTE_FLAG: u8 = 0x40;
pub const ELEMENT_NAMESPACES_FLAG: u8 = 0x38;
pub const ELEMENT_LITERAL_QNAME_FLAG: u8 = 0x3C;

// --- Namespace Attribute Information Item ---

pub const NAMESPACE_ATTRIBUTE: u8 = 0xCC;
pub const NAMESPACE_ATTRIBUTE_PREFIX_FLAG: u8 = 0x02;
pub const NAMESPACE_ATTRIBUTE_NAME_FLAG: u8 = 0x01;

// --- Attribute Information Item ---

pub const ATTRIBUTE_LITERAL_QNAME_FLAG: u8 = 0x78;

// --- Literal qualified name ---

pub const LITERAL_QNAME_PREFIX_FLAG: u8 = 0x02;
pub const LITERAL_QNAME_NAMESPACE_NAME_FLAG: u8 = 0x01;

// --- Character Information Item (character chunk) ---

pub const CHARACTER_CHUNK: u8 = 0x80;
pub const CHARACTER_CHUNK_ADD_TO_TABLE_FLAG: u8 = 0x10;
pub const CHARACTER_CHUNK_INDEX_FLAG: u8 = 0x20;
pub const CHARACTER_CHUNK_ENCODING_ALGORITHM_FLAG: u8 = 0x0C;

// --- Non-identifying string on the first bit ---

pub const NISTRING_INDEX_FLAG: u8 = 0x80;
pub const NISTRING_ADD_TO_TABLE_FLAG: u8 = 0x40;
/// Empty string: index flag followed by seven one bits.
pub const NISTRING_EMPTY: u8 = 0xFF;

// --- Sonstige Information Items ---

pub const PROCESSING_INSTRUCTION: u8 = 0xE1;
pub const COMMENT: u8 = 0xE2;

// --- Built-in encoding algorithms (Index = Tabellen-ID - 1) ---

pub const ENCODING_ALGORITHM_BASE64: u8 = 1;
pub const ENCODING_ALGORITHM_CDATA: u8 = 9;

// --- Integers starting on the second bit ---

pub const INTEGER_2ND_BIT_SMALL_LIMIT: u32 = 64;
pub const INTEGER_2ND_BIT_MEDIUM_LIMIT: u32 = 8256;
pub const INTEGER_2ND_BIT_LARGE_LIMIT: u32 = 1 << 20;
pub const INTEGER_2ND_BIT_MEDIUM_FLAG: u8 = 0x40;
pub const INTEGER_2ND_BIT_LARGE_FLAG: u8 = 0x60;

// --- Integers starting on the third bit ---

pub const INTEGER_3RD_BIT_SMALL_LIMIT: u32 = 32;
pub const INTEGER_3RD_BIT_MEDIUM_LIMIT: u32 = 2080;
pub const INTEGER_3RD_BIT_LARGE_LIMIT: u32 = 526_368;
pub const INTEGER_3RD_BIT_MEDIUM_FLAG: u8 = 0x20;
pub const INTEGER_3RD_BIT_LARGE_FLAG: u8 = 0x28;
pub const INTEGER_3RD_BIT_LARGE_LARGE_FLAG: u8 = 0x30;

// --- Integers starting on the fourth bit ---

pub const INTEGER_4TH_BIT_SMALL_LIMIT: u32 = 16;
pub const INTEGER_4TH_BIT_MEDIUM_LIMIT: u32 = 1040;
pub const INTEGER_4TH_BIT_LARGE_LIMIT: u32 = 263_184;
pub const INTEGER_4TH_BIT_MEDIUM_FLAG: u8 = 0x10;
pub const INTEGER_4TH_BIT_LARGE_FLAG: u8 = 0x14;
pub const INTEGER_4TH_BIT_LARGE_LARGE_FLAG: u8 = 0x18;

/// Largest index any vocabulary table may hand out.
pub const INTEGER_MAXIMUM: u32 = 1 << 20;

// --- Octet string lengths ---

pub const OCTET_STRING_LENGTH_2ND_BIT_SMALL_LIMIT: u32 = 65;
pub const OCTET_STRING_LENGTH_2ND_BIT_MEDIUM_LIMIT: u32 = 321;
pub const OCTET_STRING_LENGTH_2ND_BIT_MEDIUM_FLAG: u8 = 0x40;
pub const OCTET_STRING_LENGTH_2ND_BIT_LARGE_FLAG: u8 = 0x60;

pub const OCTET_STRING_LENGTH_5TH_BIT_SMALL_LIMIT: u32 = 9;
pub const OCTET_STRING_LENGTH_5TH_BIT_MEDIUM_LIMIT: u32 = 265;
pub const OCTET_STRING_LENGTH_5TH_BIT_MEDIUM_FLAG: u8 = 0x08;
pub const OCTET_STRING_LENGTH_5TH_BIT_LARGE_FLAG: u8 = 0x0C;

pub const OCTET_STRING_LENGTH_7TH_BIT_SMALL_LIMIT: u32 = 3;
pub const OCTET_STRING_LENGTH_7TH_BIT_MEDIUM_LIMIT: u32 = 259;
pub const OCTET_STRING_LENGTH_7TH_BIT_MEDIUM_FLAG: u8 = 0x02;
pub const OCTET_STRING_LENGTH_7TH_BIT_LARGE_FLAG: u8 = 0x03;

// --- Well-known names ---

pub const XML_NAMESPACE_PREFIX: &str = "xml";
pub const XML_NAMESPACE_NAME: &str = "http://www.w3.org/XML/1998/namespace";
pub const XMLNS_NAMESPACE_PREFIX: &str = "xmlns";
pub const XMLNS_NAMESPACE_NAME: &str = "http://www.w3.org/2000/xmlns/";
