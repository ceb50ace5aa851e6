//! Page: one parsed ALTO stream.

use altopress_core::{AltoError, Rect};
use altopress_parse::{AltoPage, Graphic, OcrString, parse_alto_bytes};

use crate::area::Area;
use crate::document::Document;
use crate::textblock::TextBlock;

/// One page of a document: ALTO geometry, OCR content, and the text
/// blocks found on it, in source order.
///
/// The ALTO stream is parsed once at construction; a page is otherwise
/// plain data with no I/O of its own.
#[derive(Debug, Clone)]
pub struct Page {
    code: String,
    document_code: String,
    alto: AltoPage,
    textblocks: Vec<TextBlock>,
}

impl Page {
    pub(crate) fn from_bytes(
        bytes: &[u8],
        archive_path: &str,
        document_code: &str,
        code: &str,
    ) -> Result<Self, AltoError> {
        let alto = parse_alto_bytes(bytes).map_err(AltoError::from)?;
        let textblocks = alto
            .blocks
            .iter()
            .map(|raw| {
                TextBlock::from_raw(
                    raw,
                    archive_path,
                    document_code,
                    code,
                    alto.width,
                    alto.height,
                )
            })
            .collect();
        Ok(Self {
            code: code.to_string(),
            document_code: document_code.to_string(),
            alto,
            textblocks,
        })
    }

    /// Identifier for this page within its archive.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Code of the owning document.
    pub fn document_code(&self) -> &str {
        &self.document_code
    }

    /// Page width in pixels; zero when the source attribute was missing
    /// or invalid.
    pub fn width(&self) -> i32 {
        self.alto.width
    }

    /// Page height in pixels; zero when the source attribute was missing
    /// or invalid.
    pub fn height(&self) -> i32 {
        self.alto.height
    }

    /// Page-level OCR confidence; zero when missing or invalid.
    pub fn confidence(&self) -> f64 {
        self.alto.confidence
    }

    /// The full page rectangle.
    pub fn rect(&self) -> Rect {
        Rect::new(0, 0, self.alto.width, self.alto.height)
    }

    /// Text blocks in source order.
    pub fn textblocks(&self) -> &[TextBlock] {
        &self.textblocks
    }

    /// Ids of the text blocks on this page, in source order.
    pub fn textblock_ids(&self) -> impl Iterator<Item = &str> {
        self.textblocks.iter().map(|tb| tb.id())
    }

    /// Raw OCR string records on the page, in document order.
    pub fn strings(&self) -> impl Iterator<Item = &OcrString> {
        self.alto.blocks.iter().flat_map(|block| block.strings.iter())
    }

    /// Words on the page, in document order.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.textblocks.iter().flat_map(|tb| tb.words())
    }

    /// All words joined with single spaces.
    pub fn content(&self) -> String {
        self.words().collect::<Vec<_>>().join(" ")
    }

    /// Word confidences as written. Independently lengthed from
    /// [`Page::words`]: OCR engines may omit `WC`, so the two sequences
    /// must not be zipped positionally without a length check.
    pub fn word_confidences(&self) -> impl Iterator<Item = &str> {
        self.textblocks
            .iter()
            .flat_map(|tb| tb.word_confidences().iter().map(String::as_str))
    }

    /// Character confidences as written.
    pub fn character_confidences(&self) -> impl Iterator<Item = &str> {
        self.textblocks
            .iter()
            .flat_map(|tb| tb.character_confidences().iter().map(String::as_str))
    }

    /// Graphical elements on the page.
    pub fn graphics(&self) -> &[Graphic] {
        &self.alto.graphics
    }

    /// The areas of this page from the owning document's physical
    /// structural map.
    ///
    /// # Errors
    ///
    /// Propagates [`AltoError::MalformedDocument`] from the structural
    /// walk.
    pub fn areas(&self, document: &Document<'_>) -> Result<Vec<Area>, AltoError> {
        document.areas_on_page(&self.code)
    }

    /// The text block with the given id, if any.
    ///
    /// # Errors
    ///
    /// Returns [`AltoError::StructuralInconsistency`] if more than one
    /// block on the page carries the id — a corruption case that must be
    /// surfaced, not silently resolved.
    pub fn textblock_by_id(&self, id: &str) -> Result<Option<&TextBlock>, AltoError> {
        let mut found = None;
        for tb in &self.textblocks {
            if tb.id() == id {
                if found.is_some() {
                    return Err(AltoError::StructuralInconsistency(format!(
                        "text block id {id} appears more than once on page {}",
                        self.code
                    )));
                }
                found = Some(tb);
            }
        }
        Ok(found)
    }
}
