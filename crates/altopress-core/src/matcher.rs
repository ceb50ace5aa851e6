//! Options controlling the token matcher.

use crate::fuzzy::FuzzMethod;

/// Matches below this score are dropped unless `all_results` is set.
pub const DEFAULT_MIN_RATIO: f64 = 85.0;

/// Options controlling token matching behavior.
///
/// Defaults mirror the batch-query posture: full word preparation, the
/// token-set fuzzy method, a minimum ratio of 85, and results sorted by
/// score descending.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchOptions {
    /// Lowercase and strip non-letters before comparing (default: `true`).
    pub normalise: bool,
    /// Keep digits when normalizing (default: `true`).
    pub include_numbers: bool,
    /// Run the language backend's lemmatizer (default: `true`).
    pub lemmatise: bool,
    /// Run the language backend's stemmer (default: `true`).
    pub stem: bool,
    /// Fuzzy method used when `regex` is off (default: token-set ratio).
    pub fuzz_method: FuzzMethod,
    /// Minimum fuzzy score to keep a match (default: 85).
    pub min_ratio: f64,
    /// Keep every scored token instead of filtering (default: `false`).
    pub all_results: bool,
    /// Sort results before returning them (default: `true`).
    pub sort_results: bool,
    /// Sort by score descending (default: `true`). Regex-mode results sort
    /// by full tuple order instead, since their score is binary.
    pub sort_reverse: bool,
    /// Attach a reference to the owning text block to each match
    /// (default: `false`).
    pub add_textblock: bool,
    /// Treat each query as a case-insensitive regular expression scored
    /// 100/0 instead of fuzzily (default: `false`).
    pub regex: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            normalise: true,
            include_numbers: true,
            lemmatise: true,
            stem: true,
            fuzz_method: FuzzMethod::default(),
            min_ratio: DEFAULT_MIN_RATIO,
            all_results: false,
            sort_results: true,
            sort_reverse: true,
            add_textblock: false,
            regex: false,
        }
    }
}
