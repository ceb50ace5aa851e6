use std::path::Path;

use altopress::Document;
use serde_json::json;

use crate::info_cmd::open_archive;

/// Dump resolved articles as JSON lines, one per article.
pub fn run(archive_path: &Path, document_code: Option<&str>) -> Result<(), i32> {
    let archive = open_archive(archive_path, None)?;

    let documents: Vec<Document<'_>> = match document_code {
        Some(code) => vec![archive.document_by_code(code).map_err(|err| {
            eprintln!("error: {err}");
            1
        })?],
        None => archive
            .documents()
            .filter_map(|document| match document {
                Ok(document) => Some(document),
                Err(err) => {
                    eprintln!("error: {err}");
                    None
                }
            })
            .collect(),
    };

    for document in &documents {
        let articles = match document.articles() {
            Ok(articles) => articles,
            Err(err) => {
                eprintln!("error: {}: {err}", document.code());
                continue;
            }
        };
        for article in articles {
            let parts: Vec<_> = article
                .parts
                .iter()
                .map(|part| {
                    let rect = part.area.rect();
                    json!({
                        "area": part.area.id(),
                        "page": part.area.page_code(),
                        "page_part": part.area.page_part(),
                        "shape": part.area.shape(),
                        "coords": [rect.x0, rect.y0, rect.x1, rect.y1],
                        "content": part.textblock.content(),
                    })
                })
                .collect();
            let row = json!({
                "document": document.code(),
                "article": article.id,
                "parts": parts,
            });
            println!("{row}");
        }
    }
    Ok(())
}
