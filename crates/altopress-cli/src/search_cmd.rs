use std::path::Path;

use altopress::{FuzzMethod, MatchOptions};
use serde_json::json;

use crate::info_cmd::open_archive;

/// Match tokens across every text block of the archive, one JSON line per
/// match.
pub fn run(
    archive_path: &Path,
    queries: &[String],
    method: &str,
    min_ratio: f64,
    regex: bool,
    all_results: bool,
) -> Result<(), i32> {
    let fuzz_method = FuzzMethod::from_name(method).map_err(|err| {
        eprintln!("error: {err}");
        2
    })?;
    let opts = MatchOptions {
        fuzz_method,
        min_ratio,
        regex,
        all_results,
        ..MatchOptions::default()
    };
    let query_refs: Vec<&str> = queries.iter().map(String::as_str).collect();

    let archive = open_archive(archive_path, None)?;
    for document in archive.documents() {
        let document = match document {
            Ok(document) => document,
            Err(err) => {
                eprintln!("error: {err}");
                continue;
            }
        };
        let matches = match document.matches(&query_refs, &opts) {
            Ok(matches) => matches,
            Err(err) => {
                eprintln!("error: {}: {err}", document.code());
                continue;
            }
        };
        for m in matches {
            let row = json!({
                "document": m.navigation.document_code,
                "page": m.navigation.page_code,
                "textblock": m.navigation.textblock_id,
                "index": m.index,
                "x": m.x,
                "y": m.y,
                "width": m.width,
                "height": m.height,
                "token": m.token,
                "score": m.score,
            });
            println!("{row}");
        }
    }
    Ok(())
}
