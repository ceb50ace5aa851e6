//! Document: one METS stream resolved into a navigable structure.
//!
//! Three independently-encoded METS sections are folded into one graph
//! here. The physical structMap gives pages and their areas with
//! coordinates; the logical structMap gives the authoritative article id
//! set; structLink ties the two together. The derived lookups are built in
//! a single pass over one parse, so the forward map (article → areas) and
//! the inverse map (area → article) can never drift apart.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use altopress_core::{AltoError, MatchOptions, page_code_key, parse_year};
use altopress_parse::{Graphic, MetsDocument, OcrString, PhysicalPage, parse_mets_bytes};
use tracing::{debug, warn};

use crate::archive::Archive;
use crate::area::Area;
use crate::page::Page;
use crate::textblock::{TextBlock, TokenMatch};

/// Ids in the logical structMap that carry this prefix are articles;
/// anything else (physical-only placeholders, pictures) is excluded.
const ARTICLE_ID_PREFIX: &str = "art";

/// Shape and coordinate string of one physical-map area, exactly as
/// written in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartCoord {
    pub shape: Option<String>,
    pub coords: Option<String>,
}

/// Derived lookups over the structural sections. Built once, immutable,
/// and safe to recompute: a second build from the same METS yields the
/// same value.
#[derive(Debug, Default)]
struct Structure {
    /// area id → shape + coordinate string, from the physical structMap.
    parts_coord: BTreeMap<String, PartCoord>,
    /// article id → area ids in link order, from structLink.
    locators: BTreeMap<String, Vec<String>>,
    /// area id → article id; the exact inverse of `locators`.
    article_lookup: BTreeMap<String, String>,
    /// area id → freeform page/area label, from structLink.
    page_parts: BTreeMap<String, String>,
}

impl Structure {
    fn from_mets(mets: &MetsDocument) -> Self {
        let mut structure = Structure::default();

        for page in &mets.physical_pages {
            for area in &page.areas {
                structure.parts_coord.insert(
                    area.id.clone(),
                    PartCoord {
                        shape: area.coord_type.clone(),
                        coords: area.coords.clone(),
                    },
                );
            }
        }

        // Forward and inverse maps from the same pass over the same
        // parse, so they are inverses by construction.
        for group in &mets.link_groups {
            let mut locators = group.locators.iter();
            let Some(first) = locators.next() else {
                continue;
            };
            let article_id = first.id.clone();
            if let Some(label) = &first.page_part {
                structure.page_parts.insert(first.id.clone(), label.clone());
            }

            let mut area_ids = Vec::new();
            for locator in locators {
                if structure.article_lookup.contains_key(&locator.id) {
                    warn!(
                        area = %locator.id,
                        article = %article_id,
                        "area already linked to another article, keeping the first link"
                    );
                    continue;
                }
                if let Some(label) = &locator.page_part {
                    structure.page_parts.insert(locator.id.clone(), label.clone());
                }
                structure
                    .article_lookup
                    .insert(locator.id.clone(), article_id.clone());
                area_ids.push(locator.id.clone());
            }
            structure.locators.insert(article_id, area_ids);
        }

        structure
    }
}

/// One article resolved out of the structural sections: its areas paired
/// with their text blocks, in structLink order.
#[derive(Debug, Clone)]
pub struct Article {
    pub id: String,
    pub parts: Vec<ArticlePart>,
}

/// One area of an article together with the text block that carries its
/// OCR content. The text block is annotated with the area's shape,
/// coordinates, and page-part label.
#[derive(Debug, Clone)]
pub struct ArticlePart {
    pub area: Area,
    pub textblock: TextBlock,
}

/// One document of an archive: parsed METS metadata plus lazily loaded
/// pages and derived structure.
///
/// The METS stream is parsed once at construction. Structure, pages, and
/// articles are computed on first access and memoized behind
/// compute-once cells — `None` in a cell unambiguously means "not yet
/// computed"; a computed-but-empty collection is a valid value and is
/// cached as such.
#[derive(Debug)]
pub struct Document<'a> {
    archive: &'a Archive,
    code: String,
    mets: MetsDocument,
    article_ids: Vec<String>,
    year: Option<i32>,
    years: Vec<i32>,
    page_codes: Vec<String>,
    structure: OnceLock<Structure>,
    pages: OnceLock<Vec<Page>>,
    articles: OnceLock<Vec<Article>>,
}

impl<'a> Document<'a> {
    pub(crate) fn open(archive: &'a Archive, code: &str) -> Result<Self, AltoError> {
        let bytes = archive.open_document(code)?;
        let mets = parse_mets_bytes(&bytes).map_err(AltoError::from)?;

        let article_ids = mets
            .article_ids
            .iter()
            .filter(|id| id.starts_with(ARTICLE_ID_PREFIX))
            .cloned()
            .collect();

        // Date fields are free text; the place string sometimes embeds a
        // year as well.
        let mut years = Vec::new();
        if let Some(date) = &mets.date {
            years.extend(parse_year(date));
        }
        if let Some(place) = &mets.place {
            years.extend(parse_year(place));
        }
        years.sort_unstable();
        years.dedup();
        let year = years.first().copied();

        let page_codes = archive
            .page_codes(code)
            .unwrap_or_default()
            .into_iter()
            .map(str::to_string)
            .collect();

        Ok(Self {
            archive,
            code: code.to_string(),
            mets,
            article_ids,
            year,
            years,
            page_codes,
            structure: OnceLock::new(),
            pages: OnceLock::new(),
            articles: OnceLock::new(),
        })
    }

    /// The archive this document belongs to.
    pub fn archive(&self) -> &'a Archive {
        self.archive
    }

    /// Identifier for this document within its archive.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Document type tag (`"newspaper"` or `"book"`, by archive family).
    pub fn document_type(&self) -> &'static str {
        self.archive.family().document_type()
    }

    pub fn title(&self) -> Option<&str> {
        self.mets.title.as_deref()
    }

    pub fn publisher(&self) -> Option<&str> {
        self.mets.publisher.as_deref()
    }

    pub fn place(&self) -> Option<&str> {
        self.mets.place.as_deref()
    }

    /// Date of issue as written in the source.
    pub fn date(&self) -> Option<&str> {
        self.mets.date.as_deref()
    }

    pub fn identifier(&self) -> Option<&str> {
        self.mets.identifier.as_deref()
    }

    /// Canonical publication year: the earliest year found in the date
    /// and place text. `None` exactly when [`Document::years`] is empty.
    pub fn year(&self) -> Option<i32> {
        self.year
    }

    /// All years found in the date and place text, sorted and deduped.
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    /// Page codes in numeric order.
    pub fn page_codes(&self) -> &[String] {
        &self.page_codes
    }

    pub fn page_count(&self) -> usize {
        self.page_codes.len()
    }

    /// Ids of the articles in the logical structMap, in source order.
    pub fn article_ids(&self) -> &[String] {
        &self.article_ids
    }

    pub fn article_count(&self) -> usize {
        self.article_ids.len()
    }

    fn structure(&self) -> &Structure {
        self.structure
            .get_or_init(|| Structure::from_mets(&self.mets))
    }

    /// area id → shape and coordinate string, from the physical
    /// structMap.
    pub fn parts_coord(&self) -> &BTreeMap<String, PartCoord> {
        &self.structure().parts_coord
    }

    /// article id → area ids in link order, from structLink.
    pub fn locators(&self) -> &BTreeMap<String, Vec<String>> {
        &self.structure().locators
    }

    /// area id → article id: the exact inverse of [`Document::locators`].
    pub fn article_id_lookup(&self) -> &BTreeMap<String, String> {
        &self.structure().article_lookup
    }

    /// area id → freeform page/area label, from structLink.
    pub fn page_parts(&self) -> &BTreeMap<String, String> {
        &self.structure().page_parts
    }

    /// Open one page by code. The page is parsed fresh on every call; use
    /// [`Document::pages`] for the memoized set.
    ///
    /// # Errors
    ///
    /// Returns [`AltoError::SourceNotFound`] for an unknown page code and
    /// [`AltoError::MalformedDocument`] if the page stream is not ALTO.
    pub fn page(&self, code: &str) -> Result<Page, AltoError> {
        let bytes = self.archive.open_page(&self.code, code)?;
        Page::from_bytes(
            &bytes,
            &self.archive.path().display().to_string(),
            &self.code,
            code,
        )
    }

    /// All pages in page-code order, parsed on first call and memoized
    /// for the lifetime of the document.
    ///
    /// # Errors
    ///
    /// Propagates the first page that fails to open or parse.
    pub fn pages(&self) -> Result<&[Page], AltoError> {
        if let Some(pages) = self.pages.get() {
            return Ok(pages);
        }
        let mut loaded = Vec::with_capacity(self.page_codes.len());
        for code in &self.page_codes {
            loaded.push(self.page(code)?);
        }
        Ok(self.pages.get_or_init(|| loaded))
    }

    /// Map a physical structMap page division to an archive page code:
    /// by its ORDER attribute when one matches numerically, by position
    /// otherwise.
    fn physical_page_code(&self, index: usize, page: &PhysicalPage) -> Option<&str> {
        if let Some(order) = &page.order {
            let key = page_code_key(order);
            if let Some(code) = self
                .page_codes
                .iter()
                .find(|code| page_code_key(code) == key)
            {
                return Some(code);
            }
        }
        self.page_codes.get(index).map(String::as_str)
    }

    /// All areas of the physical structMap, in source order, with their
    /// article ids and page-part labels resolved.
    ///
    /// Areas are re-derived on every call; they are cheap and carry no
    /// parsed page content.
    ///
    /// # Errors
    ///
    /// Returns [`AltoError::MalformedDocument`] if an area lacks
    /// coordinates or its coordinate string does not parse.
    pub fn areas(&self) -> Result<Vec<Area>, AltoError> {
        self.areas_filtered(None)
    }

    /// Areas restricted to one page code.
    ///
    /// # Errors
    ///
    /// As [`Document::areas`].
    pub fn areas_on_page(&self, page_code: &str) -> Result<Vec<Area>, AltoError> {
        self.areas_filtered(Some(page_code))
    }

    fn areas_filtered(&self, selected: Option<&str>) -> Result<Vec<Area>, AltoError> {
        let structure = self.structure();
        let mut areas = Vec::new();
        for (index, physical) in self.mets.physical_pages.iter().enumerate() {
            let Some(page_code) = self.physical_page_code(index, physical) else {
                debug!(
                    document = %self.code,
                    index, "physical page division with no matching page code"
                );
                continue;
            };
            if selected.is_some_and(|code| code != page_code) {
                continue;
            }
            for record in &physical.areas {
                areas.push(Area::from_record(
                    record,
                    page_code,
                    structure.article_lookup.get(&record.id).map(String::as_str),
                    structure.page_parts.get(&record.id).map(String::as_str),
                )?);
            }
        }
        Ok(areas)
    }

    /// Articles resolved out of the structural sections: for each article
    /// id, its areas in structLink order, each paired with the text block
    /// of the same id on the area's page and annotated with the area's
    /// shape, coordinates, and page-part label.
    ///
    /// Articles whose areas resolve to no text block are omitted, as are
    /// areas that never appear in the physical structMap.
    ///
    /// # Errors
    ///
    /// Propagates page loading/parsing errors and
    /// [`AltoError::StructuralInconsistency`] from duplicate block ids.
    pub fn articles(&self) -> Result<&[Article], AltoError> {
        if let Some(articles) = self.articles.get() {
            return Ok(articles);
        }
        let built = self.build_articles()?;
        Ok(self.articles.get_or_init(|| built))
    }

    /// One article by id.
    ///
    /// # Errors
    ///
    /// As [`Document::articles`].
    pub fn article(&self, article_id: &str) -> Result<Option<&Article>, AltoError> {
        Ok(self
            .articles()?
            .iter()
            .find(|article| article.id == article_id))
    }

    fn build_articles(&self) -> Result<Vec<Article>, AltoError> {
        let structure = self.structure();
        let areas = self.areas()?;
        let pages = self.pages()?;

        let mut articles = Vec::new();
        for article_id in &self.article_ids {
            let Some(area_ids) = structure.locators.get(article_id) else {
                debug!(article = %article_id, "article has no structLink group");
                continue;
            };

            let mut parts = Vec::new();
            for area_id in area_ids {
                if !structure.parts_coord.contains_key(area_id) {
                    debug!(area = %area_id, "linked area missing from physical structMap");
                    continue;
                }
                let Some(area) = areas.iter().find(|a| a.id() == area_id) else {
                    continue;
                };
                let Some(page) = pages.iter().find(|p| p.code() == area.page_code()) else {
                    continue;
                };
                let Some(block) = page.textblock_by_id(area_id)? else {
                    debug!(area = %area_id, page = %area.page_code(), "no text block for area");
                    continue;
                };
                let mut textblock = block.clone();
                textblock.annotate(
                    area.shape().map(str::to_string),
                    Some(area.rect()),
                    area.page_part().map(str::to_string),
                );
                parts.push(ArticlePart {
                    area: area.clone(),
                    textblock,
                });
            }

            if !parts.is_empty() {
                articles.push(Article {
                    id: article_id.clone(),
                    parts,
                });
            }
        }
        Ok(articles)
    }

    /// Text blocks across all pages, in page then source order.
    ///
    /// # Errors
    ///
    /// As [`Document::pages`].
    pub fn textblocks(&self) -> Result<impl Iterator<Item = &TextBlock>, AltoError> {
        Ok(self.pages()?.iter().flat_map(|page| page.textblocks().iter()))
    }

    /// Words across all pages, in document order.
    ///
    /// # Errors
    ///
    /// As [`Document::pages`].
    pub fn words(&self) -> Result<impl Iterator<Item = &str>, AltoError> {
        Ok(self.pages()?.iter().flat_map(|page| page.words()))
    }

    /// Raw OCR string records across all pages, in document order.
    ///
    /// # Errors
    ///
    /// As [`Document::pages`].
    pub fn strings(&self) -> Result<impl Iterator<Item = &OcrString>, AltoError> {
        Ok(self.pages()?.iter().flat_map(|page| page.strings()))
    }

    /// Word confidences across all pages, as written.
    ///
    /// # Errors
    ///
    /// As [`Document::pages`].
    pub fn word_confidences(&self) -> Result<impl Iterator<Item = &str>, AltoError> {
        Ok(self.pages()?.iter().flat_map(|page| page.word_confidences()))
    }

    /// Character confidences across all pages, as written.
    ///
    /// # Errors
    ///
    /// As [`Document::pages`].
    pub fn character_confidences(&self) -> Result<impl Iterator<Item = &str>, AltoError> {
        Ok(self
            .pages()?
            .iter()
            .flat_map(|page| page.character_confidences()))
    }

    /// Graphical elements across all pages.
    ///
    /// # Errors
    ///
    /// As [`Document::pages`].
    pub fn graphics(&self) -> Result<impl Iterator<Item = &Graphic>, AltoError> {
        Ok(self.pages()?.iter().flat_map(|page| page.graphics().iter()))
    }

    /// Run the token matcher over every text block of every page and
    /// concatenate the results.
    ///
    /// # Errors
    ///
    /// As [`Document::pages`] and
    /// [`TextBlock::matches`](crate::TextBlock::matches).
    pub fn matches(
        &self,
        queries: &[&str],
        opts: &MatchOptions,
    ) -> Result<Vec<TokenMatch<'_>>, AltoError> {
        let mut all = Vec::new();
        for page in self.pages()? {
            for textblock in page.textblocks() {
                all.extend(textblock.matches(queries, opts)?);
            }
        }
        Ok(all)
    }
}
