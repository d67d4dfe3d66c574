//! Namespace context stack.
//!
//! Bindings liegen flach in einem Vec, Frames sind Startpositionen darin.
//! Ein Frame wird nur für Tiefen angelegt, die tatsächlich etwas deklarieren;
//! `has_pushed[depth]` hält fest, welche Tiefe beim Schließen poppen muss.
//! Der Dokument-Frame (Tiefe 0) existiert immer.

use std::rc::Rc;

use crate::constants::{
    XML_NAMESPACE_NAME, XML_NAMESPACE_PREFIX, XMLNS_NAMESPACE_NAME, XMLNS_NAMESPACE_PREFIX,
};
use crate::{Error, Result};

#[derive(Debug, Clone, Default)]
pub struct NamespaceContext {
    bindings: Vec<(Rc<str>, Rc<str>)>,
    frame_starts: Vec<usize>,
    has_pushed: Vec<bool>,
}

impl NamespaceContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a new scope frame.
    pub fn push_context(&mut self) {
        self.frame_starts.push(self.bindings.len());
    }

    /// Closes the innermost scope frame.
    pub fn pop_context(&mut self) -> Result<()> {
        match self.frame_starts.pop() {
            Some(start) => {
                self.bindings.truncate(start);
                Ok(())
            }
            None => Err(Error::usage("namespace context underflow")),
        }
    }

    /// Binds `prefix` to `uri` in the scope of the element at `depth`.
    ///
    /// Die erste Deklaration einer Tiefe > 0 öffnet den Frame. Auf
    /// Dokumentebene wird ohne Frame gebunden.
    pub fn declare_prefix(&mut self, depth: usize, prefix: &str, uri: &str) {
        if depth > 0 && !self.has_pushed(depth) {
            self.push_context();
            if self.has_pushed.len() <= depth {
                self.has_pushed.resize(depth + 1, false);
            }
            self.has_pushed[depth] = true;
        }
        self.bindings.push((prefix.into(), uri.into()));
    }

    /// Schließt den Frame der Tiefe, falls diese einen geöffnet hat.
    pub fn end_scope(&mut self, depth: usize) -> Result<()> {
        if self.has_pushed(depth) {
            self.has_pushed[depth] = false;
            self.pop_context()?;
        }
        Ok(())
    }

    pub fn has_pushed(&self, depth: usize) -> bool {
        self.has_pushed.get(depth).copied().unwrap_or(false)
    }

    /// Number of open frames (document scope excluded).
    pub fn frame_count(&self) -> usize {
        self.frame_starts.len()
    }

    /// URI bound to `prefix`, innermost binding first.
    pub fn get_namespace_uri(&self, prefix: &str) -> Option<&str> {
        match prefix {
            XML_NAMESPACE_PREFIX => return Some(XML_NAMESPACE_NAME),
            XMLNS_NAMESPACE_PREFIX => return Some(XMLNS_NAMESPACE_NAME),
            _ => {}
        }
        self.bindings
            .iter()
            .rev()
            .find(|(p, _)| &**p == prefix)
            .map(|(_, u)| &**u)
    }

    /// Default namespace in scope; `""` when none is declared.
    pub fn default_namespace(&self) -> &str {
        self.get_namespace_uri("").unwrap_or("")
    }

    /// A prefix currently bound to `uri`, default prefix included.
    pub fn get_prefix(&self, uri: &str) -> Option<&str> {
        self.find_prefix(uri, true)
    }

    /// Like [`get_prefix`](Self::get_prefix) but never returns the default prefix.
    pub fn get_non_default_prefix(&self, uri: &str) -> Option<&str> {
        self.find_prefix(uri, false)
    }

    fn find_prefix(&self, uri: &str, allow_default: bool) -> Option<&str> {
        match uri {
            XML_NAMESPACE_NAME => return Some(XML_NAMESPACE_PREFIX),
            XMLNS_NAMESPACE_NAME => return Some(XMLNS_NAMESPACE_PREFIX),
            _ => {}
        }
        // Kandidat nur gültig, wenn der Prefix nicht weiter innen umgebunden wurde.
        self.bindings
            .iter()
            .rev()
            .filter(|(p, u)| &**u == uri && (allow_default || !p.is_empty()))
            .map(|(p, _)| &**p)
            .find(|p| self.get_namespace_uri(p) == Some(uri))
    }

    /// Drops all bindings and frames; capacity is kept.
    pub fn reset(&mut self) {
        self.bindings.clear();
        self.frame_starts.clear();
        self.has_pushed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xml_prefix_is_always_bound() {
        let ns = NamespaceContext::new();
        assert_eq!(ns.get_namespace_uri("xml"), Some(XML_NAMESPACE_NAME));
        assert_eq!(ns.get_prefix(XML_NAMESPACE_NAME), Some("xml"));
        assert_eq!(ns.get_non_default_prefix(XML_NAMESPACE_NAME), Some("xml"));
        assert_eq!(ns.get_namespace_uri("p"), None);
    }

    #[test]
    fn document_level_declaration_does_not_push() {
        let mut ns = NamespaceContext::new();
        ns.declare_prefix(0, "p", "urn:p");
        assert_eq!(ns.frame_count(), 0);
        assert_eq!(ns.get_prefix("urn:p"), Some("p"));
    }

    #[test]
    fn first_declaration_per_depth_pushes_once() {
        let mut ns = NamespaceContext::new();
        ns.declare_prefix(1, "a", "urn:a");
        ns.declare_prefix(1, "b", "urn:b");
        assert_eq!(ns.frame_count(), 1);
        assert!(ns.has_pushed(1));
        ns.declare_prefix(2, "c", "urn:c");
        assert_eq!(ns.frame_count(), 2);

        ns.end_scope(2).unwrap();
        assert_eq!(ns.get_prefix("urn:c"), None);
        assert_eq!(ns.get_prefix("urn:b"), Some("b"));
        ns.end_scope(1).unwrap();
        assert_eq!(ns.frame_count(), 0);
        assert_eq!(ns.get_prefix("urn:a"), None);
    }

    #[test]
    fn end_scope_without_push_is_noop() {
        let mut ns = NamespaceContext::new();
        ns.declare_prefix(1, "a", "urn:a");
        ns.end_scope(2).unwrap();
        assert_eq!(ns.frame_count(), 1);
    }

    #[test]
    fn pop_underflow_is_usage_error() {
        let mut ns = NamespaceContext::new();
        assert!(matches!(ns.pop_context(), Err(Error::Usage(_))));
    }

    #[test]
    fn inner_binding_shadows_outer() {
        let mut ns = NamespaceContext::new();
        ns.declare_prefix(1, "p", "urn:outer");
        ns.declare_prefix(2, "p", "urn:inner");
        assert_eq!(ns.get_namespace_uri("p"), Some("urn:inner"));
        // p ist umgebunden, also hat urn:outer keinen Prefix mehr
        assert_eq!(ns.get_prefix("urn:outer"), None);
        ns.end_scope(2).unwrap();
        assert_eq!(ns.get_prefix("urn:outer"), Some("p"));
    }

    #[test]
    fn non_default_prefix_skips_default_binding() {
        let mut ns = NamespaceContext::new();
        ns.declare_prefix(1, "a", "urn:x");
        ns.declare_prefix(2, "", "urn:x");
        assert_eq!(ns.get_prefix("urn:x"), Some(""));
        assert_eq!(ns.get_non_default_prefix("urn:x"), Some("a"));
        assert_eq!(ns.default_namespace(), "urn:x");
    }

    #[test]
    fn reset_clears_everything() {
        let mut ns = NamespaceContext::new();
        ns.declare_prefix(0, "", "urn:d");
        ns.declare_prefix(3, "a", "urn:a");
        ns.reset();
        assert_eq!(ns.default_namespace(), "");
        assert!(!ns.has_pushed(3));
        assert_eq!(ns.frame_count(), 0);
    }
}
