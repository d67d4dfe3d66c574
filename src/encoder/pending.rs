//! Staging between start element and the flush of its start tag.

/// Zustand des aktuellen Start-Tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum StartTagState {
    /// No start tag open; content goes straight to the encoder.
    #[default]
    Closed,
    /// Start tag open, nothing staged yet.
    OpenNoContent,
    /// Start tag open with staged attributes or namespace declarations.
    OpenWithPending,
}

/// Input of the state transition function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TagEvent {
    /// Start or empty element.
    Open,
    /// Attribute, namespace or default namespace.
    Stage,
    /// Anything that forces the start tag out.
    Flush,
}

impl StartTagState {
    /// Folgezustand; `None` wenn das Event im Zustand nicht erlaubt ist.
    pub(crate) fn next(self, event: TagEvent) -> Option<Self> {
        match (self, event) {
            (_, TagEvent::Open) => Some(Self::OpenNoContent),
            (Self::Closed, TagEvent::Stage) => None,
            (_, TagEvent::Stage) => Some(Self::OpenWithPending),
            (_, TagEvent::Flush) => Some(Self::Closed),
        }
    }

    pub(crate) fn is_open(self) -> bool {
        self != Self::Closed
    }
}

/// Element whose start tag has not been written yet.
#[derive(Debug, Clone, Default)]
pub(crate) struct PendingElement {
    pub(crate) prefix: String,
    pub(crate) namespace_uri: String,
    pub(crate) local_name: String,
    pub(crate) is_empty: bool,
}

impl PendingElement {
    /// Überschreibt den Eintrag, Kapazität der Strings bleibt erhalten.
    pub(crate) fn set(&mut self, prefix: &str, namespace_uri: &str, local_name: &str, is_empty: bool) {
        self.prefix.clear();
        self.prefix.push_str(prefix);
        self.namespace_uri.clear();
        self.namespace_uri.push_str(namespace_uri);
        self.local_name.clear();
        self.local_name.push_str(local_name);
        self.is_empty = is_empty;
    }
}

#[derive(Debug, Clone)]
pub(crate) struct StagedAttribute {
    pub(crate) namespace_uri: String,
    pub(crate) prefix: String,
    pub(crate) local_name: String,
    pub(crate) value: String,
}

#[derive(Debug, Clone)]
pub(crate) struct StagedNamespace {
    pub(crate) prefix: String,
    pub(crate) uri: String,
}
