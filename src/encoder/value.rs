//! String encodings: identifying strings (C.13), non-identifying strings on
//! the first and third bit (C.14, C.15) and encoding-algorithm chunks.

use crate::constants::*;
use crate::encoder::Encoder;
use crate::integer;
use crate::octets::OctetWriter;
use crate::options::SerializerOptions;
use crate::vocabulary::{Obtained, StringIndexMap};
use crate::Result;

/// How a non-identifying string may use its vocabulary table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TableAccess {
    /// Length outside the limits: always literal, no lookup.
    Literal,
    /// Table is full: reuse an existing index, never add.
    Lookup,
    /// Lookup and add on a miss.
    Obtain,
}

impl TableAccess {
    /// `can_add` covers the memory limit and the index range of the table.
    fn new(length_matches: bool, can_add: bool) -> Self {
        match (length_matches, can_add) {
            (false, _) => Self::Literal,
            (true, false) => Self::Lookup,
            (true, true) => Self::Obtain,
        }
    }
}

/// Zeichenanzahl; ASCII ohne Iteration.
#[inline]
pub(crate) fn char_len(s: &str) -> usize {
    if s.is_ascii() { s.len() } else { s.chars().count() }
}

pub(crate) fn attribute_value_access(
    options: &SerializerOptions,
    map: &StringIndexMap,
    value: &str,
) -> TableAccess {
    let len = char_len(value);
    TableAccess::new(
        options.attribute_value_length_matches(len),
        !map.is_full() && options.can_add_attribute_value(map.total_characters(), len),
    )
}

/// Character chunks, comments and PI data share the chunk limits; the
/// memory limit is applied per table.
pub(crate) fn character_chunk_access(
    options: &SerializerOptions,
    map: &StringIndexMap,
    text: &str,
) -> TableAccess {
    let len = char_len(text);
    TableAccess::new(
        options.character_chunk_length_matches(len),
        !map.is_full() && options.can_add_character_chunk(map.total_characters(), len),
    )
}

/// Returns `(index hit, added to table)`.
fn resolve(map: &mut StringIndexMap, s: &str, access: TableAccess) -> Result<(Option<u32>, bool)> {
    Ok(match access {
        TableAccess::Literal => (None, false),
        TableAccess::Lookup => (map.get(s), false),
        TableAccess::Obtain => (map.obtain_index(s)?, true),
    })
}

/// Length-prefixed UTF-8 literal, length on the second bit.
pub(crate) fn write_octet_string_on_second_bit(w: &mut OctetWriter, bytes: &[u8]) -> Result<()> {
    integer::write_length_on_second_bit(w, bytes.len())?;
    w.write_bytes(bytes);
    Ok(())
}

/// Identifying string: index on a hit, literal (registered) on a miss.
pub(crate) fn write_identifying_string(
    w: &mut OctetWriter,
    map: &mut StringIndexMap,
    s: &str,
) -> Result<()> {
    match map.obtain_index(s)? {
        Some(index) => integer::write_on_second_bit_first_bit_one(w, index),
        None => write_octet_string_on_second_bit(w, s.as_bytes()),
    }
}

/// Non-identifying string on the first bit (attribute values, comments, PI data).
pub(crate) fn write_non_identifying_string_on_first_bit(
    w: &mut OctetWriter,
    map: &mut StringIndexMap,
    s: &str,
    access: TableAccess,
) -> Result<()> {
    if s.is_empty() {
        w.write(NISTRING_EMPTY);
        return Ok(());
    }
    let (hit, added) = resolve(map, s, access)?;
    if let Some(index) = hit {
        return integer::write_on_second_bit_first_bit_one(w, index);
    }
    let b = if added { NISTRING_ADD_TO_TABLE_FLAG } else { 0 };
    integer::write_length_on_fifth_bit(w, b, s.len())?;
    w.write_bytes(s.as_bytes());
    Ok(())
}

/// Owned variant of [`write_non_identifying_string_on_first_bit`]; a new
/// table entry takes over the buffer.
pub(crate) fn write_non_identifying_string_on_first_bit_owned(
    w: &mut OctetWriter,
    map: &mut StringIndexMap,
    s: String,
    access: TableAccess,
) -> Result<()> {
    if s.is_empty() || access != TableAccess::Obtain {
        return write_non_identifying_string_on_first_bit(w, map, &s, access);
    }
    match map.obtain_index_owned(s.into_boxed_str())? {
        Obtained::Index(index) => integer::write_on_second_bit_first_bit_one(w, index),
        Obtained::Added(stored) => {
            integer::write_length_on_fifth_bit(w, NISTRING_ADD_TO_TABLE_FLAG, stored.len())?;
            w.write_bytes(stored.as_bytes());
            Ok(())
        }
    }
}

/// Character chunk on the third bit; `text` must not be empty.
pub(crate) fn write_character_chunk(
    w: &mut OctetWriter,
    map: &mut StringIndexMap,
    text: &str,
    access: TableAccess,
) -> Result<()> {
    let (hit, added) = resolve(map, text, access)?;
    if let Some(index) = hit {
        return integer::write_on_fourth_bit(
            w,
            CHARACTER_CHUNK | CHARACTER_CHUNK_INDEX_FLAG,
            index,
        );
    }
    let b = if added {
        CHARACTER_CHUNK | CHARACTER_CHUNK_ADD_TO_TABLE_FLAG
    } else {
        CHARACTER_CHUNK
    };
    integer::write_length_on_seventh_bit(w, b, text.len())?;
    w.write_bytes(text.as_bytes());
    Ok(())
}

/// Owned variant of [`write_character_chunk`].
pub(crate) fn write_character_chunk_owned(
    w: &mut OctetWriter,
    map: &mut StringIndexMap,
    text: String,
    access: TableAccess,
) -> Result<()> {
    if access != TableAccess::Obtain {
        return write_character_chunk(w, map, &text, access);
    }
    match map.obtain_index_owned(text.into_boxed_str())? {
        Obtained::Index(index) => integer::write_on_fourth_bit(
            w,
            CHARACTER_CHUNK | CHARACTER_CHUNK_INDEX_FLAG,
            index,
        ),
        Obtained::Added(stored) => {
            integer::write_length_on_seventh_bit(
                w,
                CHARACTER_CHUNK | CHARACTER_CHUNK_ADD_TO_TABLE_FLAG,
                stored.len(),
            )?;
            w.write_bytes(stored.as_bytes());
            Ok(())
        }
    }
}

/// Character chunk carrying `data` under a built-in encoding algorithm.
pub(crate) fn write_algorithm_chunk(w: &mut OctetWriter, algorithm: u8, data: &[u8]) -> Result<()> {
    // Obere zwei Bits der Algorithmus-ID im ersten Octet, untere sechs im zweiten
    w.write(CHARACTER_CHUNK | CHARACTER_CHUNK_ENCODING_ALGORITHM_FLAG | ((algorithm & 0xC0) >> 6));
    integer::write_length_on_seventh_bit(w, (algorithm & 0x3F) << 2, data.len())?;
    w.write_bytes(data);
    Ok(())
}

impl Encoder {
    /// Attribute value as non-identifying string on the first bit.
    pub fn encode_attribute_value(&mut self, value: &str) -> Result<()> {
        let access = attribute_value_access(&self.options, &self.vocabulary.attribute_value, value);
        write_non_identifying_string_on_first_bit(
            &mut self.writer,
            &mut self.vocabulary.attribute_value,
            value,
            access,
        )
    }

    /// Text as UTF-8 character chunk, indexed when eligible.
    pub(crate) fn encode_character_chunk(&mut self, text: &str) -> Result<()> {
        let access = character_chunk_access(
            &self.options,
            &self.vocabulary.character_content_chunk,
            text,
        );
        write_character_chunk(
            &mut self.writer,
            &mut self.vocabulary.character_content_chunk,
            text,
            access,
        )
    }

    /// Owned variant of [`encode_character_chunk`](Self::encode_character_chunk).
    pub(crate) fn encode_character_chunk_owned(&mut self, text: String) -> Result<()> {
        let access = character_chunk_access(
            &self.options,
            &self.vocabulary.character_content_chunk,
            &text,
        );
        write_character_chunk_owned(
            &mut self.writer,
            &mut self.vocabulary.character_content_chunk,
            text,
            access,
        )
    }
}
