//! Archive family naming conventions.
//!
//! The only thing that varies between archive families is how filenames
//! encode document and page codes, so a family is a data record of two
//! compiled patterns — not a trait to subclass. `Archive::open` probes the
//! families in order against the listing and keeps the first that matches.

use std::sync::OnceLock;

use regex::Regex;

/// A filename convention: one pattern selecting the metadata file per
/// document and one selecting page files.
///
/// The document pattern captures `(document_code)`; the page pattern
/// captures `(document_code, page_code)` with page codes of the form
/// `[0-9]+(_[0-9]+)*`.
#[derive(Debug)]
pub struct ArchiveFamily {
    name: &'static str,
    document_type: &'static str,
    document_pattern: Regex,
    page_pattern: Regex,
}

impl ArchiveFamily {
    /// Newspaper archives: `<doc>_mets.xml` / `<doc>_<page>.xml`, where
    /// the document code is itself `<id>_<date>`.
    pub fn newspapers() -> &'static ArchiveFamily {
        static FAMILY: OnceLock<ArchiveFamily> = OnceLock::new();
        FAMILY.get_or_init(|| ArchiveFamily {
            name: "newspapers",
            document_type: "newspaper",
            document_pattern: compiled(r"^([0-9]+_[0-9]+)_mets\.xml$"),
            page_pattern: compiled(r"^([0-9]+_[0-9]+)_([0-9]+(?:_[0-9]+)*)\.xml$"),
        })
    }

    /// Book archives: `<doc>_metadata.xml` / `ALTO/<doc>_<page>.xml`.
    pub fn books() -> &'static ArchiveFamily {
        static FAMILY: OnceLock<ArchiveFamily> = OnceLock::new();
        FAMILY.get_or_init(|| ArchiveFamily {
            name: "books",
            document_type: "book",
            document_pattern: compiled(r"^([0-9]+)_metadata\.xml$"),
            page_pattern: compiled(r"^ALTO/([0-9]+)_([0-9]+(?:_[0-9]+)*)\.xml$"),
        })
    }

    /// Library digitization archives: `<doc>[-_]met<suffix>.xml` /
    /// case-insensitive `alto/<doc><sep><page>.xml`.
    pub fn library() -> &'static ArchiveFamily {
        static FAMILY: OnceLock<ArchiveFamily> = OnceLock::new();
        FAMILY.get_or_init(|| ArchiveFamily {
            name: "library",
            document_type: "book",
            document_pattern: compiled(r"^([0-9]+)[-_]met[a-zA-Z]*\.xml$"),
            page_pattern: compiled(r"(?i)^alto/([0-9]+)[^a-zA-Z0-9]([0-9]+)\.xml$"),
        })
    }

    /// Every known family, in probe order.
    pub fn all() -> [&'static ArchiveFamily; 3] {
        [Self::newspapers(), Self::books(), Self::library()]
    }

    /// Resolve a family by its configuration name.
    pub fn by_name(name: &str) -> Option<&'static ArchiveFamily> {
        Self::all().into_iter().find(|family| family.name == name)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type tag stamped on documents of this family.
    pub fn document_type(&self) -> &'static str {
        self.document_type
    }

    /// Match an entry name as a document metadata file, capturing the
    /// document code.
    pub fn document_match(&self, entry_name: &str) -> Option<String> {
        self.document_pattern
            .captures(entry_name)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// Match an entry name as a page file, capturing document and page
    /// codes.
    pub fn page_match(&self, entry_name: &str) -> Option<(String, String)> {
        self.page_pattern.captures(entry_name).and_then(|caps| {
            Some((caps.get(1)?.as_str().to_string(), caps.get(2)?.as_str().to_string()))
        })
    }
}

fn compiled(pattern: &str) -> Regex {
    Regex::new(pattern).expect("family pattern compiles")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newspapers_matches_mets_and_pages() {
        let family = ArchiveFamily::newspapers();
        assert_eq!(
            family.document_match("0000164_18470101_mets.xml").as_deref(),
            Some("0000164_18470101")
        );
        assert_eq!(
            family.page_match("0000164_18470101_0001.xml"),
            Some(("0000164_18470101".to_string(), "0001".to_string()))
        );
        // The metadata file must not be taken for a page.
        assert_eq!(family.page_match("0000164_18470101_mets.xml"), None);
    }

    #[test]
    fn books_matches_alto_subdirectory_pages() {
        let family = ArchiveFamily::books();
        assert_eq!(
            family.document_match("104598986_metadata.xml").as_deref(),
            Some("104598986")
        );
        assert_eq!(
            family.page_match("ALTO/104598986_000001.xml"),
            Some(("104598986".to_string(), "000001".to_string()))
        );
        assert_eq!(family.page_match("104598986_000001.xml"), None);
    }

    #[test]
    fn library_matches_flexible_metadata_names() {
        let family = ArchiveFamily::library();
        assert_eq!(
            family.document_match("104598986-mets.xml").as_deref(),
            Some("104598986")
        );
        assert_eq!(
            family.document_match("104598986_metsHdr.xml").as_deref(),
            Some("104598986")
        );
        assert_eq!(
            family.page_match("alto/104598986-000001.xml"),
            Some(("104598986".to_string(), "000001".to_string()))
        );
        assert_eq!(
            family.page_match("Alto/104598986.000001.xml"),
            Some(("104598986".to_string(), "000001".to_string()))
        );
    }

    #[test]
    fn multi_segment_page_codes_match() {
        let family = ArchiveFamily::newspapers();
        assert_eq!(
            family.page_match("0000164_18470101_0001_002.xml"),
            Some(("0000164_18470101".to_string(), "0001_002".to_string()))
        );
    }

    #[test]
    fn by_name_resolves_each_family() {
        for family in ArchiveFamily::all() {
            assert!(ArchiveFamily::by_name(family.name()).is_some());
        }
        assert!(ArchiveFamily::by_name("unknown").is_none());
    }
}
