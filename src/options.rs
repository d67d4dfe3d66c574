//! Serializer options.
//!
//! Controls which information items are dropped and which strings are
//! eligible for the attribute value, character chunk and other string tables.
//!
//! # Beispiel
//!
//! ```
//! use erfi::SerializerOptions;
//!
//! let opts = SerializerOptions::default()
//!     .with_ignore_comments()
//!     .with_max_attribute_value_size(64);
//!
//! assert!(opts.ignore_comments());
//! assert_eq!(opts.max_attribute_value_size(), 64);
//! assert_eq!(opts.max_character_content_chunk_size(), 32);
//! ```

use crate::{Error, Result};

/// Default upper bound (characters) for indexed attribute values and chunks.
pub const DEFAULT_MAX_VALUE_SIZE: usize = 32;

/// Options of a [`StreamWriter`](crate::StreamWriter) session.
///
/// Sizes are counted in characters. Memory limits bound the total number of
/// characters a table may hold; once reached, values are still looked up but
/// no longer added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializerOptions {
    pub(crate) ignore_comments: bool,
    pub(crate) ignore_processing_instructions: bool,
    pub(crate) ignore_whitespace_text: bool,
    pub(crate) min_attribute_value_size: usize,
    pub(crate) max_attribute_value_size: usize,
    pub(crate) attribute_value_map_memory_limit: usize,
    pub(crate) min_character_content_chunk_size: usize,
    pub(crate) max_character_content_chunk_size: usize,
    pub(crate) character_content_chunk_map_memory_limit: usize,
}

impl Default for SerializerOptions {
    fn default() -> Self {
        Self {
            ignore_comments: false,
            ignore_processing_instructions: false,
            ignore_whitespace_text: false,
            min_attribute_value_size: 0,
            max_attribute_value_size: DEFAULT_MAX_VALUE_SIZE,
            attribute_value_map_memory_limit: usize::MAX,
            min_character_content_chunk_size: 0,
            max_character_content_chunk_size: DEFAULT_MAX_VALUE_SIZE,
            character_content_chunk_map_memory_limit: usize::MAX,
        }
    }
}

impl SerializerOptions {
    // --- Getter ---

    /// Comments are dropped.
    pub fn ignore_comments(&self) -> bool { self.ignore_comments }
    /// Processing instructions are dropped.
    pub fn ignore_processing_instructions(&self) -> bool { self.ignore_processing_instructions }
    /// Whitespace-only text is dropped.
    pub fn ignore_whitespace_text(&self) -> bool { self.ignore_whitespace_text }
    pub fn min_attribute_value_size(&self) -> usize { self.min_attribute_value_size }
    pub fn max_attribute_value_size(&self) -> usize { self.max_attribute_value_size }
    pub fn attribute_value_map_memory_limit(&self) -> usize { self.attribute_value_map_memory_limit }
    pub fn min_character_content_chunk_size(&self) -> usize { self.min_character_content_chunk_size }
    pub fn max_character_content_chunk_size(&self) -> usize { self.max_character_content_chunk_size }
    pub fn character_content_chunk_map_memory_limit(&self) -> usize { self.character_content_chunk_map_memory_limit }

    // --- Builder-Setter (Fluent API) ---

    /// Kommentare verwerfen.
    pub fn with_ignore_comments(mut self) -> Self { self.ignore_comments = true; self }
    /// Processing Instructions verwerfen.
    pub fn with_ignore_processing_instructions(mut self) -> Self { self.ignore_processing_instructions = true; self }
    /// Whitespace-only Text verwerfen.
    pub fn with_ignore_whitespace_text(mut self) -> Self { self.ignore_whitespace_text = true; self }
    pub fn with_min_attribute_value_size(mut self, size: usize) -> Self { self.min_attribute_value_size = size; self }
    pub fn with_max_attribute_value_size(mut self, size: usize) -> Self { self.max_attribute_value_size = size; self }
    pub fn with_attribute_value_map_memory_limit(mut self, chars: usize) -> Self { self.attribute_value_map_memory_limit = chars; self }
    pub fn with_min_character_content_chunk_size(mut self, size: usize) -> Self { self.min_character_content_chunk_size = size; self }
    pub fn with_max_character_content_chunk_size(mut self, size: usize) -> Self { self.max_character_content_chunk_size = size; self }
    pub fn with_character_content_chunk_map_memory_limit(mut self, chars: usize) -> Self { self.character_content_chunk_map_memory_limit = chars; self }

    // --- Mutable Setter ---

    pub fn set_ignore_comments(&mut self, val: bool) { self.ignore_comments = val; }
    pub fn set_ignore_processing_instructions(&mut self, val: bool) { self.ignore_processing_instructions = val; }
    pub fn set_ignore_whitespace_text(&mut self, val: bool) { self.ignore_whitespace_text = val; }
    pub fn set_max_attribute_value_size(&mut self, size: usize) { self.max_attribute_value_size = size; }
    pub fn set_max_character_content_chunk_size(&mut self, size: usize) { self.max_character_content_chunk_size = size; }

    /// Rejects inverted size ranges.
    ///
    /// # Errors
    ///
    /// `Error::Usage` if a minimum size exceeds its maximum.
    pub fn validate(&self) -> Result<()> {
        if self.min_attribute_value_size > self.max_attribute_value_size {
            return Err(Error::usage(format!(
                "min attribute value size {} exceeds max {}",
                self.min_attribute_value_size, self.max_attribute_value_size
            )));
        }
        if self.min_character_content_chunk_size > self.max_character_content_chunk_size {
            return Err(Error::usage(format!(
                "min character chunk size {} exceeds max {}",
                self.min_character_content_chunk_size, self.max_character_content_chunk_size
            )));
        }
        Ok(())
    }

    /// Attributwert-Länge liegt im Index-Bereich (Grenzen inklusive).
    #[inline]
    pub(crate) fn attribute_value_length_matches(&self, len: usize) -> bool {
        len >= self.min_attribute_value_size && len <= self.max_attribute_value_size
    }

    /// Tabelle darf `len` weitere Zeichen aufnehmen.
    #[inline]
    pub(crate) fn can_add_attribute_value(&self, total: usize, len: usize) -> bool {
        total.saturating_add(len) < self.attribute_value_map_memory_limit
    }

    /// Chunk-Länge liegt im Index-Bereich (Grenzen inklusive).
    #[inline]
    pub(crate) fn character_chunk_length_matches(&self, len: usize) -> bool {
        len >= self.min_character_content_chunk_size && len <= self.max_character_content_chunk_size
    }

    #[inline]
    pub(crate) fn can_add_character_chunk(&self, total: usize, len: usize) -> bool {
        total.saturating_add(len) < self.character_content_chunk_map_memory_limit
    }
}
