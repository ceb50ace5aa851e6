//! Area: one rectangular division of a page in the physical structMap.

use altopress_core::{AltoError, Rect};
use altopress_parse::AreaRecord;
use tracing::debug;

use crate::page::Page;
use crate::textblock::TextBlock;

/// A rectangle on a page tied to one structural-map entry.
///
/// Areas are re-derivable from the document's METS, so two instances for
/// the same id may coexist; equality is by id, not identity. An area whose
/// id never appears in structLink has no article — that is observed data,
/// not an error.
#[derive(Debug, Clone)]
pub struct Area {
    id: String,
    area_type: Option<String>,
    category: Option<String>,
    page_code: String,
    image_ref: Option<String>,
    shape: Option<String>,
    rect: Rect,
    article_id: Option<String>,
    page_part: Option<String>,
}

impl Area {
    pub(crate) fn from_record(
        record: &AreaRecord,
        page_code: &str,
        article_id: Option<&str>,
        page_part: Option<&str>,
    ) -> Result<Self, AltoError> {
        let coords = record.coords.as_deref().ok_or_else(|| {
            AltoError::MalformedDocument(format!("area {} has no coordinates", record.id))
        })?;
        let rect = Rect::from_coord_string(coords)?;

        if article_id.is_none() {
            debug!(area = %record.id, "area has no structural link to an article");
        }

        Ok(Self {
            id: record.id.clone(),
            area_type: record.area_type.clone(),
            category: record.category.clone(),
            page_code: page_code.to_string(),
            image_ref: record.image_ref.clone(),
            shape: record.coord_type.clone(),
            rect,
            article_id: article_id.map(str::to_string),
            page_part: page_part.map(str::to_string),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Structural type of the division (e.g. `"body"`).
    pub fn area_type(&self) -> Option<&str> {
        self.area_type.as_deref()
    }

    /// Structural category of the division (e.g. `"text"`).
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Code of the page this area sits on.
    pub fn page_code(&self) -> &str {
        &self.page_code
    }

    /// FILEID of the page image this area crops from.
    pub fn image_ref(&self) -> Option<&str> {
        self.image_ref.as_deref()
    }

    /// Coordinate shape, e.g. `"RECT"`.
    pub fn shape(&self) -> Option<&str> {
        self.shape.as_deref()
    }

    /// The area rectangle on its page.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn width(&self) -> i32 {
        self.rect.width()
    }

    pub fn height(&self) -> i32 {
        self.rect.height()
    }

    pub fn x(&self) -> i32 {
        self.rect.x()
    }

    pub fn y(&self) -> i32 {
        self.rect.y()
    }

    /// Id of the article this area belongs to; `None` when no structural
    /// link references the area.
    pub fn article_id(&self) -> Option<&str> {
        self.article_id.as_deref()
    }

    /// Freeform page/area label from structLink, e.g. `"page1 area3"`.
    pub fn page_part(&self) -> Option<&str> {
        self.page_part.as_deref()
    }

    /// The text block on `page` with this area's id.
    ///
    /// # Errors
    ///
    /// Returns [`AltoError::StructuralInconsistency`] if more than one
    /// block shares the id.
    pub fn textblock<'p>(&self, page: &'p Page) -> Result<Option<&'p TextBlock>, AltoError> {
        page.textblock_by_id(&self.id)
    }
}

impl PartialEq for Area {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Area {}
