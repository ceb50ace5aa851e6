//! Archive: the listing-level view of a METS/ALTO collection.

use std::path::{Path, PathBuf};

use altopress_core::{AltoError, page_code_key};
use tracing::{debug, warn};

use crate::document::Document;
use crate::family::ArchiveFamily;
use crate::source::Source;

pub use crate::source::EntryInfo;

/// Image extensions probed by [`Archive::image_path`].
const IMAGE_EXTENSIONS: [&str; 6] = [".jp2", ".jpg", ".jpeg", ".png", ".tif", ".tiff"];

#[derive(Debug, Clone)]
struct PageEntry {
    code: String,
    entry_name: String,
}

#[derive(Debug, Clone)]
struct DocumentEntry {
    code: String,
    entry_name: String,
    pages: Vec<PageEntry>,
}

/// An opened archive: an immutable table of document codes, each with its
/// numerically-sorted page codes and the resolved entry names behind them.
///
/// Opening an archive reads only the file listing. Documents and pages are
/// constructed on demand and never cached at this level, so distinct
/// archives are fully independent of each other.
#[derive(Debug)]
pub struct Archive {
    source: Source,
    family: &'static ArchiveFamily,
    documents: Vec<DocumentEntry>,
}

impl Archive {
    /// Open an archive, probing every known [`ArchiveFamily`] against the
    /// listing and keeping the first that matches a metadata file.
    ///
    /// # Errors
    ///
    /// Returns [`AltoError::SourceNotFound`] if the path does not exist
    /// and [`AltoError::MalformedArchive`] if no family's patterns match
    /// anything in the listing.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AltoError> {
        let source = Source::open(path)?;
        let entries = source.entries()?;
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();

        let family = ArchiveFamily::all()
            .into_iter()
            .find(|family| names.iter().any(|name| family.document_match(name).is_some()))
            .ok_or_else(|| {
                AltoError::MalformedArchive(format!(
                    "{}: no document metadata matched any archive family",
                    source.path().display()
                ))
            })?;
        debug!(family = family.name(), "archive family selected");

        Self::build(source, family)
    }

    /// Open an archive with a fixed family instead of probing.
    ///
    /// # Errors
    ///
    /// As [`Archive::open`]; [`AltoError::MalformedArchive`] if neither of
    /// the family's patterns matches any entry.
    pub fn open_with_family(
        path: impl AsRef<Path>,
        family: &'static ArchiveFamily,
    ) -> Result<Self, AltoError> {
        let source = Source::open(path)?;
        Self::build(source, family)
    }

    fn build(source: Source, family: &'static ArchiveFamily) -> Result<Self, AltoError> {
        let entries = source.entries()?;

        // One pass for metadata files, preserving listing order, then one
        // pass grouping page files under their document code.
        let mut documents: Vec<DocumentEntry> = Vec::new();
        for entry in &entries {
            if let Some(code) = family.document_match(&entry.name) {
                documents.push(DocumentEntry {
                    code,
                    entry_name: entry.name.clone(),
                    pages: Vec::new(),
                });
            }
        }

        let mut matched_pages = false;
        for entry in &entries {
            if let Some((document_code, page_code)) = family.page_match(&entry.name) {
                matched_pages = true;
                match documents.iter_mut().find(|d| d.code == document_code) {
                    Some(document) => document.pages.push(PageEntry {
                        code: page_code,
                        entry_name: entry.name.clone(),
                    }),
                    None => warn!(
                        entry = %entry.name,
                        %document_code,
                        "page file without matching metadata file"
                    ),
                }
            }
        }

        if documents.is_empty() && !matched_pages {
            return Err(AltoError::MalformedArchive(format!(
                "{}: family {} matched no documents and no pages",
                source.path().display(),
                family.name()
            )));
        }

        for document in &mut documents {
            document.pages.sort_by_key(|page| page_code_key(&page.code));
        }

        Ok(Self {
            source,
            family,
            documents,
        })
    }

    /// The archive root path.
    pub fn path(&self) -> &Path {
        self.source.path()
    }

    /// The archive family this archive was opened as.
    pub fn family(&self) -> &'static ArchiveFamily {
        self.family
    }

    /// Number of documents in the archive.
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Document codes in listing order.
    pub fn document_codes(&self) -> impl Iterator<Item = &str> {
        self.documents.iter().map(|d| d.code.as_str())
    }

    /// Page codes of one document, numerically sorted. `None` for an
    /// unknown document code.
    pub fn page_codes(&self, document_code: &str) -> Option<Vec<&str>> {
        self.entry(document_code)
            .map(|d| d.pages.iter().map(|p| p.code.as_str()).collect())
    }

    /// Open a document by position in the code table.
    ///
    /// # Errors
    ///
    /// Returns [`AltoError::SourceNotFound`] for an out-of-range index and
    /// any error from parsing the document's METS stream.
    pub fn document(&self, index: usize) -> Result<Document<'_>, AltoError> {
        let entry = self.documents.get(index).ok_or_else(|| {
            AltoError::SourceNotFound(format!(
                "document index {index} out of range ({} documents)",
                self.documents.len()
            ))
        })?;
        Document::open(self, &entry.code)
    }

    /// Open a document by code.
    ///
    /// # Errors
    ///
    /// Returns [`AltoError::SourceNotFound`] for an unknown code and any
    /// error from parsing the document's METS stream.
    pub fn document_by_code(&self, code: &str) -> Result<Document<'_>, AltoError> {
        if self.entry(code).is_none() {
            return Err(AltoError::SourceNotFound(format!(
                "no document {code} in {}",
                self.path().display()
            )));
        }
        Document::open(self, code)
    }

    /// Iterate over documents lazily. The iterator is restartable: it
    /// re-derives from the immutable code table, not from the filesystem.
    pub fn documents(&self) -> Documents<'_> {
        Documents {
            archive: self,
            current: 0,
        }
    }

    /// Listing info for a document's metadata file.
    pub fn document_info(&self, document_code: &str) -> Result<Option<EntryInfo>, AltoError> {
        match self.entry(document_code) {
            Some(entry) => self.source.entry_info(&entry.entry_name),
            None => Ok(None),
        }
    }

    /// Listing info for one page file.
    pub fn page_info(
        &self,
        document_code: &str,
        page_code: &str,
    ) -> Result<Option<EntryInfo>, AltoError> {
        match self.page_entry(document_code, page_code) {
            Some(page) => self.source.entry_info(&page.entry_name),
            None => Ok(None),
        }
    }

    /// Path to the page image corresponding to a page file, probing the
    /// known image extensions next to it. Only meaningful for directory
    /// archives; the image itself is opened by an external collaborator.
    ///
    /// # Errors
    ///
    /// Returns [`AltoError::StructuralInconsistency`] if more than one
    /// candidate image exists for the page.
    pub fn image_path(
        &self,
        document_code: &str,
        page_code: &str,
    ) -> Result<Option<PathBuf>, AltoError> {
        let Some(page) = self.page_entry(document_code, page_code) else {
            return Ok(None);
        };
        let stem = page.entry_name.trim_end_matches(".xml");

        let candidates: Vec<PathBuf> = IMAGE_EXTENSIONS
            .iter()
            .map(|ext| self.path().join(format!("{stem}{ext}")))
            .filter(|p| p.is_file())
            .collect();

        match candidates.len() {
            0 => Ok(None),
            1 => Ok(candidates.into_iter().next()),
            _ => Err(AltoError::StructuralInconsistency(format!(
                "multiple candidate images for page {page_code} of {document_code}"
            ))),
        }
    }

    pub(crate) fn open_document(&self, document_code: &str) -> Result<Vec<u8>, AltoError> {
        let entry = self.entry(document_code).ok_or_else(|| {
            AltoError::SourceNotFound(format!(
                "no document {document_code} in {}",
                self.path().display()
            ))
        })?;
        self.source.read(&entry.entry_name)
    }

    pub(crate) fn open_page(
        &self,
        document_code: &str,
        page_code: &str,
    ) -> Result<Vec<u8>, AltoError> {
        let page = self.page_entry(document_code, page_code).ok_or_else(|| {
            AltoError::SourceNotFound(format!(
                "no page {page_code} in document {document_code} of {}",
                self.path().display()
            ))
        })?;
        self.source.read(&page.entry_name)
    }

    fn entry(&self, document_code: &str) -> Option<&DocumentEntry> {
        self.documents.iter().find(|d| d.code == document_code)
    }

    fn page_entry(&self, document_code: &str, page_code: &str) -> Option<&PageEntry> {
        self.entry(document_code)?
            .pages
            .iter()
            .find(|p| p.code == page_code)
    }
}

/// Iterator over an archive's documents, opening each on demand.
///
/// Created by [`Archive::documents()`]. Yielded documents are not retained
/// by the iterator — the caller owns each value.
pub struct Documents<'a> {
    archive: &'a Archive,
    current: usize,
}

impl<'a> Iterator for Documents<'a> {
    type Item = Result<Document<'a>, AltoError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current >= self.archive.document_count() {
            return None;
        }
        let result = self.archive.document(self.current);
        self.current += 1;
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.archive.document_count() - self.current;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Documents<'_> {}
