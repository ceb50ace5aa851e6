//! altopress-parse: METS and ALTO XML readers.
//!
//! Turns raw XML bytes into plain data records consumed by the altopress
//! object model: [`MetsDocument`] for the structural/metadata side and
//! [`AltoPage`] for per-page OCR content. Namespace handling is lenient —
//! elements are matched by local name, with the namespace checked only when
//! one is declared — because archive families differ in whether they
//! namespace their ALTO files at all.

mod alto;
mod error;
mod mets;

pub use alto::{AltoPage, Graphic, OcrString, RawTextBlock, parse_alto, parse_alto_bytes};
pub use error::ParseError;
pub use mets::{
    AreaRecord, LinkGroup, Locator, MetsDocument, PhysicalPage, clean_locator_id, parse_mets,
    parse_mets_bytes,
};
