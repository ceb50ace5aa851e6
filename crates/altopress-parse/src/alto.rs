//! ALTO reader: per-page OCR geometry, strings, and text blocks.
//!
//! ALTO attribute parsing is deliberately forgiving: a batch run over
//! millions of scanned pages must not die on one page whose OCR engine
//! omitted `WC` or emitted a garbled `WIDTH`. Numeric attributes fall back
//! to zero, and confidence values are kept as raw strings alongside parsed
//! views.

use roxmltree::{Document, Node};
use tracing::debug;

use crate::error::ParseError;

/// One ALTO `String` element: a recognized word with position and
/// confidence attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct OcrString {
    /// Recognized text (`CONTENT`).
    pub content: String,
    /// `HPOS`, zero when missing or invalid.
    pub x: i32,
    /// `VPOS`, zero when missing or invalid.
    pub y: i32,
    /// `WIDTH`, zero when missing or invalid.
    pub width: i32,
    /// `HEIGHT`, zero when missing or invalid.
    pub height: i32,
    /// Word confidence (`WC`) as written, `None` when the engine omitted it.
    pub word_confidence: Option<String>,
    /// Character confidences (`CC`) as written.
    pub character_confidence: Option<String>,
}

/// One ALTO `TextBlock` element with its strings in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTextBlock {
    pub id: Option<String>,
    pub strings: Vec<OcrString>,
}

/// One ALTO `GraphicalElement`.
#[derive(Debug, Clone, PartialEq)]
pub struct Graphic {
    pub id: Option<String>,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Everything read from one ALTO page stream.
#[derive(Debug, Clone, PartialEq)]
pub struct AltoPage {
    /// Page width in pixels (`WIDTH`), zero when missing or invalid.
    pub width: i32,
    /// Page height in pixels (`HEIGHT`), zero when missing or invalid.
    pub height: i32,
    /// Page-level OCR confidence (`PC`), zero when missing or invalid.
    pub confidence: f64,
    /// Text blocks in document order.
    pub blocks: Vec<RawTextBlock>,
    /// Graphical elements in document order.
    pub graphics: Vec<Graphic>,
}

/// Parse one ALTO page stream from raw bytes.
///
/// # Errors
///
/// Returns [`ParseError::Encoding`] if the bytes are not UTF-8, otherwise
/// as [`parse_alto`].
pub fn parse_alto_bytes(bytes: &[u8]) -> Result<AltoPage, ParseError> {
    parse_alto(std::str::from_utf8(bytes)?)
}

/// Parse one ALTO page stream.
///
/// # Errors
///
/// Returns [`ParseError::Xml`] if the stream is not well-formed, and
/// [`ParseError::MissingStructure`] if it contains no `Page` element (the
/// stream is well-formed XML but not ALTO).
pub fn parse_alto(xml: &str) -> Result<AltoPage, ParseError> {
    let doc = Document::parse(xml)?;
    let root = doc.root_element();

    let page = root
        .descendants()
        .find(|n| n.is_element() && n.tag_name().name() == "Page")
        .ok_or_else(|| ParseError::MissingStructure("no Page element".to_string()))?;

    let width = int_attribute(&page, "WIDTH");
    let height = int_attribute(&page, "HEIGHT");
    let confidence = page
        .attribute("PC")
        .and_then(|pc| pc.parse().ok())
        .unwrap_or_else(|| {
            debug!("page confidence missing or invalid, defaulting to 0");
            0.0
        });

    let blocks = root
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "TextBlock")
        .map(|block| RawTextBlock {
            id: block.attribute("ID").map(str::to_string),
            strings: block
                .descendants()
                .filter(|n| n.is_element() && n.tag_name().name() == "String")
                .map(|s| parse_string(&s))
                .collect(),
        })
        .collect();

    let graphics = root
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "GraphicalElement")
        .map(|g| Graphic {
            id: g.attribute("ID").map(str::to_string),
            x: int_attribute(&g, "HPOS"),
            y: int_attribute(&g, "VPOS"),
            width: int_attribute(&g, "WIDTH"),
            height: int_attribute(&g, "HEIGHT"),
        })
        .collect();

    Ok(AltoPage {
        width,
        height,
        confidence,
        blocks,
        graphics,
    })
}

fn int_attribute(node: &Node, name: &str) -> i32 {
    node.attribute(name)
        .and_then(|value| value.parse().ok())
        .unwrap_or(0)
}

fn parse_string(node: &Node) -> OcrString {
    OcrString {
        content: node.attribute("CONTENT").unwrap_or_default().to_string(),
        x: int_attribute(node, "HPOS"),
        y: int_attribute(node, "VPOS"),
        width: int_attribute(node, "WIDTH"),
        height: int_attribute(node, "HEIGHT"),
        word_confidence: node.attribute("WC").map(str::to_string),
        character_confidence: node.attribute("CC").map(str::to_string),
    }
}
