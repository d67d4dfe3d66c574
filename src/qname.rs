//! Qualified names as stored in the element and attribute name tables.
//!
//! Im Gegensatz zu reinen Namespace-Vergleichen ist die Identität hier das
//! Tripel (prefix, namespace URI, local name): `p:a` und `q:a` im selben
//! Namespace sind zwei verschiedene Tabelleneinträge, weil der Prefix mit
//! kodiert wird.

use std::fmt;
use std::rc::Rc;

/// A qualified name with its vocabulary index.
///
/// `index` is 0 until the name is registered in a name table. `PartialEq`
/// ignores the index.
#[derive(Clone)]
pub struct QualifiedName {
    pub prefix: Rc<str>,
    pub namespace_uri: Rc<str>,
    pub local_name: Rc<str>,
    pub index: u32,
}

impl QualifiedName {
    /// Creates an unregistered name.
    pub fn new(
        prefix: impl Into<Rc<str>>,
        namespace_uri: impl Into<Rc<str>>,
        local_name: impl Into<Rc<str>>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            namespace_uri: namespace_uri.into(),
            local_name: local_name.into(),
            index: 0,
        }
    }

    /// Creates a name without prefix and namespace.
    pub fn local(local_name: impl Into<Rc<str>>) -> Self {
        Self::new("", "", local_name)
    }

    /// Vergleicht Prefix und Namespace gegen einen Bucket-Eintrag (local name
    /// ist im Bucket bereits gleich).
    #[inline]
    pub fn matches(&self, prefix: &str, namespace_uri: &str) -> bool {
        &*self.prefix == prefix && &*self.namespace_uri == namespace_uri
    }

    pub fn has_prefix(&self) -> bool {
        !self.prefix.is_empty()
    }

    pub fn has_namespace(&self) -> bool {
        !self.namespace_uri.is_empty()
    }
}

impl PartialEq for QualifiedName {
    fn eq(&self, other: &Self) -> bool {
        self.local_name == other.local_name
            && self.prefix == other.prefix
            && self.namespace_uri == other.namespace_uri
    }
}

impl Eq for QualifiedName {}

impl fmt::Debug for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QualifiedName({self}, index={})", self.index)
    }
}

/// `{uri}prefix:local` notation.
impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.namespace_uri.is_empty() {
            write!(f, "{{{}}}", self.namespace_uri)?;
        }
        if !self.prefix.is_empty() {
            write!(f, "{}:", self.prefix)?;
        }
        write!(f, "{}", self.local_name)
    }
}
