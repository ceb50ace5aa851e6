//! Error types for altopress.
//!
//! Provides [`AltoError`], the taxonomy shared by every layer of the
//! library. Fatal errors are scoped to the unit they describe: a malformed
//! document fails that document, never the whole archive.

use std::fmt;

/// Error taxonomy for archive traversal and matching.
///
/// Missing optional metadata (a title, a date, a single area's article
/// mapping) is never an error — it resolves to `None` or an empty
/// collection. These variants cover the conditions that genuinely stop an
/// operation.
#[derive(Debug, Clone, PartialEq)]
pub enum AltoError {
    /// An archive or page file does not exist. Fatal for that unit.
    SourceNotFound(String),
    /// Neither the document pattern nor the page pattern matched anything
    /// in the archive listing. The archive is unusable.
    MalformedArchive(String),
    /// METS failed to parse or lacks required structure. Fatal for that
    /// document only; other documents in the archive remain readable.
    MalformedDocument(String),
    /// A text block id maps to more than one element where exactly one is
    /// required. Surfaced to the caller, never silently resolved.
    StructuralInconsistency(String),
    /// An unknown fuzzy method name or invalid matcher argument.
    Configuration(String),
    /// I/O error reading archive data.
    Io(String),
}

impl fmt::Display for AltoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AltoError::SourceNotFound(path) => write!(f, "source not found: {path}"),
            AltoError::MalformedArchive(msg) => write!(f, "malformed archive: {msg}"),
            AltoError::MalformedDocument(msg) => write!(f, "malformed document: {msg}"),
            AltoError::StructuralInconsistency(msg) => {
                write!(f, "structural inconsistency: {msg}")
            }
            AltoError::Configuration(msg) => write!(f, "configuration error: {msg}"),
            AltoError::Io(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

impl std::error::Error for AltoError {}

impl From<std::io::Error> for AltoError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => AltoError::SourceNotFound(err.to_string()),
            _ => AltoError::Io(err.to_string()),
        }
    }
}
