//! altopress: a navigable object model over METS/ALTO digitized archives.
//!
//! Digitized newspaper and book collections arrive as METS metadata files
//! (one per document) plus ALTO OCR files (one per page). This crate
//! resolves the three independently-encoded METS structures — the physical
//! structural map, the logical structural map, and the structural links —
//! into one consistent graph: archive → document → page → area/text block
//! → token, with coordinate-aware accessors and a fuzzy/regex token
//! matcher on top.
//!
//! All parsing is pull-based: opening an [`Archive`] reads only the file
//! listing, opening a [`Document`] parses only its METS stream, and a page
//! is parsed the first time it is needed, then memoized for the lifetime
//! of the owning document.
//!
//! # Example
//!
//! ```ignore
//! let archive = Archive::open("path/to/issue")?;
//! for document in archive.documents() {
//!     let document = document?;
//!     for article in document.articles()? {
//!         for part in &article.parts {
//!             let hits = part.textblock.matches(&["parliment"], &MatchOptions::default())?;
//!         }
//!     }
//! }
//! ```

mod archive;
mod area;
mod document;
mod family;
mod page;
mod source;
mod textblock;

pub use altopress_core::{
    AltoError, FuzzMethod, IdentityBackend, LanguageBackend, MatchOptions, Rect, Token,
    normalize, parse_year,
};
pub use altopress_parse::{Graphic, OcrString};
pub use archive::{Archive, Documents, EntryInfo};
pub use area::Area;
pub use document::{Article, ArticlePart, Document, PartCoord};
pub use family::ArchiveFamily;
pub use page::Page;
pub use source::Source;
pub use textblock::{Navigation, TextBlock, TokenMatch};
