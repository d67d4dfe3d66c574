//! Serializer vocabulary (X.891 Section 8).
//!
//! Eine Vocabulary pro Dokument-Session. Werte-Tabellen sind flache
//! String→Index Maps, Namens-Tabellen zweistufig (local name → Bucket von
//! QualifiedNames). Indizes beginnen bei 1, sind dicht und in
//! Einfügereihenfolge vergeben; 0 wird nie vergeben.
//!
//! Lifecycle: `clear()` am Dokumentanfang, danach wächst jede Tabelle nur.

use std::rc::Rc;

use crate::constants::{INTEGER_MAXIMUM, XML_NAMESPACE_NAME, XML_NAMESPACE_PREFIX};
use crate::qname::QualifiedName;
use crate::{Error, FastHashMap, FastIndexMap, Result};

/// Flat string → index table.
///
/// Der Map-Wert ist die Zeichenanzahl des Eintrags; die Summe wird für die
/// Memory-Limits der Attribute-Value- und Chunk-Tabellen gebraucht.
#[derive(Debug, Clone)]
pub struct StringIndexMap {
    entries: FastIndexMap<Box<str>, usize>,
    total_characters: usize,
    /// Größter vergebbarer Index.
    index_limit: u32,
}

/// Result of [`StringIndexMap::obtain_index_owned`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Obtained<'a> {
    /// Key was present under this index.
    Index(u32),
    /// Key was moved into the table; the stored key is returned for the literal.
    Added(&'a str),
}

impl Default for StringIndexMap {
    fn default() -> Self {
        Self {
            entries: FastIndexMap::default(),
            total_characters: 0,
            index_limit: INTEGER_MAXIMUM,
        }
    }
}

impl StringIndexMap {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn set_index_limit(&mut self, limit: u32) {
        self.index_limit = limit;
    }

    fn with_builtin(values: &[&str]) -> Self {
        let mut map = Self::new();
        for v in values {
            map.insert(v);
        }
        map
    }

    fn insert(&mut self, key: &str) {
        let chars = key.chars().count();
        self.entries.insert(key.into(), chars);
        self.total_characters += chars;
    }

    /// Returns the index of `key`, registering it on a miss.
    ///
    /// `Ok(None)` means the key was just added and must be encoded literally.
    pub fn obtain_index(&mut self, key: &str) -> Result<Option<u32>> {
        if let Some(index) = self.get(key) {
            return Ok(Some(index));
        }
        self.check_capacity()?;
        self.insert(key);
        Ok(None)
    }

    /// Like [`obtain_index`](Self::obtain_index), but moves `key` into the
    /// table on a miss instead of copying it.
    pub fn obtain_index_owned(&mut self, key: Box<str>) -> Result<Obtained<'_>> {
        if let Some(index) = self.get(&key) {
            return Ok(Obtained::Index(index));
        }
        self.check_capacity()?;
        let chars = key.chars().count();
        self.total_characters += chars;
        let (i, _) = self.entries.insert_full(key, chars);
        Ok(Obtained::Added(self.entries.get_index(i).map_or("", |(k, _)| &**k)))
    }

    /// Kein weiterer Index vergebbar.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.next_index() > self.index_limit
    }

    fn check_capacity(&self) -> Result<()> {
        if self.is_full() {
            return Err(Error::IntegerOverflow(u64::from(self.next_index())));
        }
        Ok(())
    }

    /// Lookup ohne Registrierung.
    #[inline]
    pub fn get(&self, key: &str) -> Option<u32> {
        self.entries.get_index_of(key).map(|i| i as u32 + 1)
    }

    /// Index the next registered key receives.
    pub fn next_index(&self) -> u32 {
        self.entries.len() as u32 + 1
    }

    /// Key stored under `index` (1-based).
    pub fn key(&self, index: u32) -> Option<&str> {
        let i = index.checked_sub(1)? as usize;
        self.entries.get_index(i).map(|(k, _)| &**k)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Summe der Zeichen aller Einträge.
    pub fn total_characters(&self) -> usize {
        self.total_characters
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.total_characters = 0;
    }
}

/// Two-level name table: local name → bucket of qualified names.
#[derive(Debug, Clone)]
pub struct QualifiedNameMap {
    buckets: FastHashMap<Rc<str>, Vec<QualifiedName>>,
    next_index: u32,
}

/// Bucket handle returned by [`QualifiedNameMap::obtain_entry`].
pub struct NameEntry<'a> {
    local_name: Rc<str>,
    names: &'a mut Vec<QualifiedName>,
    next_index: &'a mut u32,
}

impl NameEntry<'_> {
    /// Sucht im Bucket nach (prefix, namespace).
    #[inline]
    pub fn find(&self, prefix: &str, namespace_uri: &str) -> Option<u32> {
        self.names
            .iter()
            .find(|q| q.matches(prefix, namespace_uri))
            .map(|q| q.index)
    }

    /// Appends a new name with the next table index and returns that index.
    pub fn add(&mut self, prefix: &str, namespace_uri: &str) -> Result<u32> {
        let index = *self.next_index;
        if index > INTEGER_MAXIMUM {
            return Err(Error::IntegerOverflow(u64::from(index)));
        }
        self.names.push(QualifiedName {
            prefix: prefix.into(),
            namespace_uri: namespace_uri.into(),
            local_name: Rc::clone(&self.local_name),
            index,
        });
        *self.next_index += 1;
        Ok(index)
    }

    /// Anzahl der Namen im Bucket.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl QualifiedNameMap {
    pub fn new() -> Self {
        Self {
            buckets: FastHashMap::default(),
            next_index: 1,
        }
    }

    /// Bucket for `local_name`, created empty on first access.
    pub fn obtain_entry(&mut self, local_name: &str) -> NameEntry<'_> {
        let (key, names) = self
            .buckets
            .raw_entry_mut()
            .from_key(local_name)
            .or_insert_with(|| (Rc::from(local_name), Vec::new()));
        NameEntry {
            local_name: Rc::clone(key),
            names,
            next_index: &mut self.next_index,
        }
    }

    /// Lookup ohne Registrierung.
    pub fn get(&self, prefix: &str, namespace_uri: &str, local_name: &str) -> Option<u32> {
        self.buckets
            .get(local_name)?
            .iter()
            .find(|q| q.matches(prefix, namespace_uri))
            .map(|q| q.index)
    }

    pub fn next_index(&self) -> u32 {
        self.next_index
    }

    /// Anzahl aller registrierten Namen.
    pub fn len(&self) -> usize {
        self.next_index as usize - 1
    }

    pub fn is_empty(&self) -> bool {
        self.next_index == 1
    }

    pub fn clear(&mut self) {
        self.buckets.clear();
        self.next_index = 1;
    }
}

impl Default for QualifiedNameMap {
    fn default() -> Self {
        Self::new()
    }
}

/// All vocabulary tables an encoder session writes to.
#[derive(Debug, Clone)]
pub struct SerializerVocabulary {
    pub prefix: StringIndexMap,
    pub namespace_name: StringIndexMap,
    pub local_name: StringIndexMap,
    pub other_ncname: StringIndexMap,
    pub attribute_value: StringIndexMap,
    pub other_string: StringIndexMap,
    pub character_content_chunk: StringIndexMap,
    pub element_name: QualifiedNameMap,
    pub attribute_name: QualifiedNameMap,
}

impl SerializerVocabulary {
    /// Creates a vocabulary holding only the built-in `xml` entries.
    pub fn new() -> Self {
        Self {
            prefix: StringIndexMap::with_builtin(&[XML_NAMESPACE_PREFIX]),
            namespace_name: StringIndexMap::with_builtin(&[XML_NAMESPACE_NAME]),
            local_name: StringIndexMap::new(),
            other_ncname: StringIndexMap::new(),
            attribute_value: StringIndexMap::new(),
            other_string: StringIndexMap::new(),
            character_content_chunk: StringIndexMap::new(),
            element_name: QualifiedNameMap::new(),
            attribute_name: QualifiedNameMap::new(),
        }
    }

    /// Setzt alle Tabellen auf den Anfangszustand zurück (Built-ins bleiben).
    pub fn clear(&mut self) {
        self.prefix.clear();
        self.prefix.insert(XML_NAMESPACE_PREFIX);
        self.namespace_name.clear();
        self.namespace_name.insert(XML_NAMESPACE_NAME);
        self.local_name.clear();
        self.other_ncname.clear();
        self.attribute_value.clear();
        self.other_string.clear();
        self.character_content_chunk.clear();
        self.element_name.clear();
        self.attribute_name.clear();
    }
}

impl Default for SerializerVocabulary {
    fn default() -> Self {
        Self::new()
    }
}
