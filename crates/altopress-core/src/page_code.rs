//! Numeric-aware ordering for page codes.

/// Sort key for a page code of the form `[0-9]+(_[0-9]+)*`.
///
/// Splits the code on `_` and parses each segment as an integer, so that
/// sorting by this key gives natural numeric order: `"2"` sorts before
/// `"10"`, and `"123_4"` before `"123_10"`. Non-numeric segments (which a
/// well-formed listing never produces) are skipped rather than panicking.
pub fn page_code_key(page_code: &str) -> Vec<u64> {
    page_code
        .split('_')
        .filter_map(|segment| segment.parse().ok())
        .collect()
}
