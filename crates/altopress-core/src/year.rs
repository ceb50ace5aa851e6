//! Publication-year derivation from free-text date and place fields.

use std::sync::OnceLock;

use regex::Regex;

/// Strict `CCYY-MM-DD` (or `CCYY/MM/DD`) date at the start of the text.
fn standard_date() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^1[6-9]\d{2}(-|/)(0[1-9]|1[0-2])(-|/)(0[1-9]|[12]\d|3[01])")
            .expect("standard date pattern compiles")
    })
}

/// A 4-digit year from 1600 to 1999.
fn long_year() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"1[6-9]\d\d").expect("long year pattern compiles"))
}

/// A 2-digit number.
fn short_year() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d\d").expect("short year pattern compiles"))
}

/// Extract years of form 16xx to 19xx from free text.
///
/// Catalogue date fields are rarely a clean date: `"1862, [1861]"`,
/// `"1847 [1846, 47]"`, and `"1873-80"` all occur. Two rules apply:
///
/// - If the text begins with a strict `CCYY-MM-DD` date, only that 4-digit
///   year is returned.
/// - Otherwise the text is split on each 4-digit year; any 2-digit number
///   in the run of text following a year is expanded with that year's
///   century prefix (`"1873-80"` yields 1873 and 1880).
///
/// The result is sorted and deduplicated. Text containing no year yields an
/// empty list; this function never fails.
///
/// ```
/// use altopress_core::parse_year;
///
/// assert_eq!(parse_year("1862, [1861]"), vec![1861, 1862]);
/// assert_eq!(parse_year("1847 [1846, 47]"), vec![1846, 1847]);
/// assert_eq!(parse_year("1873-80"), vec![1873, 1880]);
/// assert_eq!(parse_year("1870-09-01"), vec![1870]);
/// ```
pub fn parse_year(text: &str) -> Vec<i32> {
    if standard_date().is_match(text) {
        if let Ok(year) = text[0..4].parse() {
            return vec![year];
        }
    }

    let mut results: Vec<i32> = Vec::new();
    let matches: Vec<_> = long_year().find_iter(text).collect();
    for (i, year_match) in matches.iter().enumerate() {
        let year_text = year_match.as_str();
        if let Ok(year) = year_text.parse() {
            results.push(year);
        }

        // The run of text between this year and the next carries any
        // century-relative 2-digit years ("1847 [.., 47]" -> 1847).
        let rest_end = matches
            .get(i + 1)
            .map(|next| next.start())
            .unwrap_or(text.len());
        let rest = &text[year_match.end()..rest_end];
        let century = &year_text[0..2];
        for short in short_year().find_iter(rest) {
            if let Ok(expanded) = format!("{century}{}", short.as_str()).parse() {
                results.push(expanded);
            }
        }
    }

    results.sort_unstable();
    results.dedup();
    results
}
