//! METS reader: MODS scalars, structural maps, and structural links.
//!
//! A METS file describes one document. Three independently-encoded
//! sections matter to the object model: the physical structMap (pages and
//! their areas with coordinates), the logical structMap (articles), and
//! structLink (which areas compose which article). This module extracts
//! all three into plain records in one parse; resolution into a graph
//! happens in the altopress facade.

use roxmltree::{Document, Node};
use tracing::debug;

use crate::error::ParseError;

pub(crate) const METS_NS: &str = "http://www.loc.gov/METS/";
pub(crate) const MODS_NS: &str = "http://www.loc.gov/mods/v3";
pub(crate) const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

/// Everything read from one METS stream.
#[derive(Debug, Clone, Default)]
pub struct MetsDocument {
    pub title: Option<String>,
    pub publisher: Option<String>,
    pub place: Option<String>,
    pub date: Option<String>,
    pub identifier: Option<String>,
    /// Pages of the physical structMap, in source order.
    pub physical_pages: Vec<PhysicalPage>,
    /// Ids of ARTICLE divisions in the logical structMap, in source order.
    pub article_ids: Vec<String>,
    /// structLink groups, in source order. The first locator of a group is
    /// the article; the rest are its areas, in link order.
    pub link_groups: Vec<LinkGroup>,
}

/// One `div[@TYPE="page"]` of the physical structMap.
#[derive(Debug, Clone)]
pub struct PhysicalPage {
    pub id: Option<String>,
    pub order: Option<String>,
    /// Area divisions nested under this page, in source order.
    pub areas: Vec<AreaRecord>,
}

/// One area division with its file-pointer coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaRecord {
    pub id: String,
    pub area_type: Option<String>,
    pub category: Option<String>,
    /// FILEID of the file-pointer child (the page image reference).
    pub image_ref: Option<String>,
    /// Coordinate shape, e.g. `"RECT"`.
    pub coord_type: Option<String>,
    /// Comma-separated coordinate string, e.g. `"1220,5,2893,221"`.
    pub coords: Option<String>,
}

/// One `smLinkGrp` of structLink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkGroup {
    pub locators: Vec<Locator>,
}

/// One `smLocatorLink`: a cleaned id plus its freeform page-area label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    /// Locator id with the leading `#` (or any non-alphanumeric prefix)
    /// stripped.
    pub id: String,
    /// Freeform page/area label, e.g. `"page1 area3"`.
    pub page_part: Option<String>,
    pub link_type: Option<String>,
}

/// Strip non-alphanumeric leading characters from a locator id.
///
/// structLink locators reference ids as URI fragments (`#pa0001001`); the
/// structural maps use the bare id.
pub fn clean_locator_id(id: &str) -> &str {
    id.trim_start_matches(|c: char| !c.is_ascii_alphanumeric())
}

/// Parse one METS stream from raw bytes.
///
/// # Errors
///
/// Returns [`ParseError::Encoding`] if the bytes are not UTF-8, otherwise
/// as [`parse_mets`].
pub fn parse_mets_bytes(bytes: &[u8]) -> Result<MetsDocument, ParseError> {
    parse_mets(std::str::from_utf8(bytes)?)
}

/// Parse one METS stream.
///
/// Absent metadata fields and absent structural sections yield `None` or
/// empty collections — only a stream that is not well-formed XML fails.
///
/// # Errors
///
/// Returns [`ParseError::Xml`] if the stream is not well-formed.
pub fn parse_mets(xml: &str) -> Result<MetsDocument, ParseError> {
    let doc = Document::parse(xml)?;
    let root = doc.root_element();

    let mets = MetsDocument {
        title: mods_text(&root, "title"),
        publisher: mods_text(&root, "publisher"),
        place: mods_text(&root, "placeTerm"),
        date: mods_text(&root, "dateIssued"),
        identifier: mods_text(&root, "identifier"),
        physical_pages: parse_physical_map(&root),
        article_ids: parse_logical_map(&root),
        link_groups: parse_struct_link(&root),
    };
    Ok(mets)
}

/// Match an element by local name, checking the namespace only when the
/// document declares one.
fn is_elem(node: &Node, ns: &str, local: &str) -> bool {
    node.is_element()
        && node.tag_name().name() == local
        && node.tag_name().namespace().is_none_or(|n| n == ns)
}

/// First text content of a MODS element anywhere in the tree.
fn mods_text(root: &Node, local: &str) -> Option<String> {
    root.descendants()
        .find(|n| is_elem(n, MODS_NS, local))
        .and_then(|n| n.text())
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

fn struct_map_of_type<'a, 'input>(root: &Node<'a, 'input>, map_type: &str) -> Option<Node<'a, 'input>> {
    root.descendants().find(|n| {
        is_elem(n, METS_NS, "structMap") && n.attribute("TYPE") == Some(map_type)
    })
}

fn parse_physical_map(root: &Node) -> Vec<PhysicalPage> {
    let Some(map) = struct_map_of_type(root, "PHYSICAL") else {
        debug!("no PHYSICAL structMap in METS");
        return Vec::new();
    };

    map.descendants()
        .filter(|n| is_elem(n, METS_NS, "div") && n.attribute("TYPE") == Some("page"))
        .map(|page_div| PhysicalPage {
            id: page_div.attribute("ID").map(str::to_string),
            order: page_div.attribute("ORDER").map(str::to_string),
            areas: page_div
                .children()
                .filter(|n| is_elem(n, METS_NS, "div"))
                .filter_map(|area_div| parse_area(&area_div))
                .collect(),
        })
        .collect()
}

fn parse_area(area_div: &Node) -> Option<AreaRecord> {
    let id = area_div.attribute("ID")?.to_string();

    // The coordinates live on the area child of the division's file
    // pointer: div -> fptr -> area[@FILEID @SHAPE @COORDS].
    let pointer = area_div
        .children()
        .find(|n| is_elem(n, METS_NS, "fptr"))
        .and_then(|fptr| fptr.children().find(|n| is_elem(n, METS_NS, "area")));

    let (image_ref, coord_type, coords) = match pointer {
        Some(p) => (
            p.attribute("FILEID").map(str::to_string),
            p.attribute("SHAPE").map(str::to_string),
            p.attribute("COORDS").map(str::to_string),
        ),
        None => (None, None, None),
    };

    Some(AreaRecord {
        id,
        area_type: area_div.attribute("TYPE").map(str::to_string),
        category: area_div.attribute("CATEGORY").map(str::to_string),
        image_ref,
        coord_type,
        coords,
    })
}

fn parse_logical_map(root: &Node) -> Vec<String> {
    let Some(map) = struct_map_of_type(root, "LOGICAL") else {
        debug!("no LOGICAL structMap in METS");
        return Vec::new();
    };

    map.descendants()
        .filter(|n| is_elem(n, METS_NS, "div") && n.attribute("TYPE") == Some("ARTICLE"))
        .filter_map(|div| div.attribute("ID").map(str::to_string))
        .collect()
}

fn parse_struct_link(root: &Node) -> Vec<LinkGroup> {
    let Some(link) = root
        .descendants()
        .find(|n| is_elem(n, METS_NS, "structLink"))
    else {
        return Vec::new();
    };

    link.children()
        .filter(|n| is_elem(n, METS_NS, "smLinkGrp"))
        .map(|group| LinkGroup {
            locators: group
                .children()
                .filter(|n| is_elem(n, METS_NS, "smLocatorLink"))
                .filter_map(|n| parse_locator(&n))
                .collect(),
        })
        .filter(|group| !group.locators.is_empty())
        .collect()
}

fn parse_locator(node: &Node) -> Option<Locator> {
    let raw_id = node
        .attribute((XLINK_NS, "href"))
        .or_else(|| node.attribute("href"))?;
    Some(Locator {
        id: clean_locator_id(raw_id).to_string(),
        page_part: node
            .attribute((XLINK_NS, "label"))
            .or_else(|| node.attribute("label"))
            .map(str::to_string),
        link_type: node
            .attribute((XLINK_NS, "type"))
            .or_else(|| node.attribute("type"))
            .map(str::to_string),
    })
}
