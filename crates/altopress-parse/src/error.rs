//! Error types for the XML reading layer.
//!
//! Uses [`thiserror`] for ergonomic error derivation. Provides
//! [`ParseError`] that wraps XML-level failures and converts to
//! [`AltoError`] for unified handling across the library.

use altopress_core::AltoError;
use thiserror::Error;

/// Error type for METS/ALTO reading operations.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The stream is not well-formed XML.
    #[error("XML error: {0}")]
    Xml(#[from] roxmltree::Error),

    /// The stream is not valid UTF-8.
    #[error("encoding error: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// The XML is well-formed but lacks required structure.
    #[error("missing structure: {0}")]
    MissingStructure(String),

    /// Error reading the underlying stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ParseError> for AltoError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::Io(e) => AltoError::Io(e.to_string()),
            other => AltoError::MalformedDocument(other.to_string()),
        }
    }
}
