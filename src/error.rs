//! Central error types for the Fast Infoset serializer.
//!
//! Vocabulary lookups and buffer growth never fail; only sink I/O and the
//! usage checks of the stream writer produce errors.

use core::fmt;
use std::borrow::Cow;

/// All error conditions of the serializer.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// A writer call arrived in a state where it is not allowed, e.g. an
    /// attribute outside of an open start tag.
    Usage(Cow<'static, str>),
    /// An attribute references a namespace URI without a non-default prefix
    /// in scope.
    UnresolvedNamespace(String),
    /// The feature is not implemented (DTD, entity references).
    Unsupported(&'static str),
    /// A vocabulary index or length exceeds the representable range (X.891: 2^20).
    IntegerOverflow(u64),
    /// XML parsing failed.
    XmlParseError(String),
    /// Der Sink hat einen Schreibvorgang abgelehnt.
    IoError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Usage(msg) => {
                if msg.is_empty() {
                    write!(f, "invalid writer state")
                } else {
                    write!(f, "invalid writer state: {msg}")
                }
            }
            Self::UnresolvedNamespace(uri) => {
                write!(f, "namespace URI '{uri}' is not bound to a prefix")
            }
            Self::Unsupported(feature) => write!(f, "{feature} is not supported"),
            Self::IntegerOverflow(value) => {
                write!(f, "integer {value} exceeds the maximum of 1048576 (X.891)")
            }
            Self::XmlParseError(msg) => write!(f, "XML parse error: {msg}"),
            Self::IoError(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::IoError(e.to_string())
    }
}

impl Error {
    /// Erstellt einen `Usage` Fehler mit Nachricht.
    pub fn usage(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Usage(msg.into())
    }
}

/// A convenience `Result` type alias using [`Error`].
pub type Result<T> = core::result::Result<T, Error>;
