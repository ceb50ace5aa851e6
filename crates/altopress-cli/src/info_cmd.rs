use std::path::Path;

use altopress::{Archive, ArchiveFamily};
use serde_json::json;

/// List the archive's documents with their metadata as JSON lines.
pub fn run(archive_path: &Path, family: Option<&str>) -> Result<(), i32> {
    let archive = open_archive(archive_path, family)?;

    for document in archive.documents() {
        let document = match document {
            Ok(document) => document,
            Err(err) => {
                eprintln!("error: {err}");
                continue;
            }
        };
        let row = json!({
            "code": document.code(),
            "type": document.document_type(),
            "title": document.title(),
            "publisher": document.publisher(),
            "place": document.place(),
            "date": document.date(),
            "identifier": document.identifier(),
            "year": document.year(),
            "years": document.years(),
            "pages": document.page_count(),
            "articles": document.article_count(),
        });
        println!("{row}");
    }
    Ok(())
}

pub fn open_archive(path: &Path, family: Option<&str>) -> Result<Archive, i32> {
    let result = match family {
        Some(name) => {
            let family = ArchiveFamily::by_name(name).ok_or_else(|| {
                eprintln!("error: unknown archive family: {name}");
                2
            })?;
            Archive::open_with_family(path, family)
        }
        None => Archive::open(path),
    };
    result.map_err(|err| {
        eprintln!("error: {err}");
        1
    })
}
