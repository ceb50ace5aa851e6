//! Fuzzy string scoring on a 0–100 scale.
//!
//! Four methods in the fuzzywuzzy family, built on `strsim`'s normalized
//! Levenshtein similarity: plain ratio, partial (best-window) ratio,
//! token-sort ratio, and token-set ratio.

use std::collections::BTreeSet;

use crate::error::AltoError;

/// Fuzzy comparison method used by the token matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FuzzMethod {
    /// Normalized edit-distance similarity of the whole strings.
    Ratio,
    /// Best [`ratio`] of the shorter string against every same-length
    /// window of the longer one.
    PartialRatio,
    /// [`ratio`] after whitespace-splitting and alphabetically sorting the
    /// tokens of both strings.
    TokenSortRatio,
    /// Set-based comparison tolerant of extra tokens on either side. The
    /// default: it is the most forgiving of OCR word-order noise.
    #[default]
    TokenSetRatio,
}

impl FuzzMethod {
    /// Resolve a method from its configuration name.
    ///
    /// # Errors
    ///
    /// Returns [`AltoError::Configuration`] for an unknown name.
    pub fn from_name(name: &str) -> Result<Self, AltoError> {
        match name {
            "ratio" => Ok(FuzzMethod::Ratio),
            "partial_ratio" => Ok(FuzzMethod::PartialRatio),
            "token_sort_ratio" => Ok(FuzzMethod::TokenSortRatio),
            "token_set_ratio" => Ok(FuzzMethod::TokenSetRatio),
            other => Err(AltoError::Configuration(format!(
                "unknown fuzzy method: {other}"
            ))),
        }
    }

    /// The configuration name of this method.
    pub fn name(&self) -> &'static str {
        match self {
            FuzzMethod::Ratio => "ratio",
            FuzzMethod::PartialRatio => "partial_ratio",
            FuzzMethod::TokenSortRatio => "token_sort_ratio",
            FuzzMethod::TokenSetRatio => "token_set_ratio",
        }
    }

    /// Score two strings with this method, in `0.0..=100.0`.
    pub fn score(&self, a: &str, b: &str) -> f64 {
        match self {
            FuzzMethod::Ratio => ratio(a, b),
            FuzzMethod::PartialRatio => partial_ratio(a, b),
            FuzzMethod::TokenSortRatio => token_sort_ratio(a, b),
            FuzzMethod::TokenSetRatio => token_set_ratio(a, b),
        }
    }
}

/// Normalized Levenshtein similarity scaled to `0.0..=100.0`.
pub fn ratio(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b) * 100.0
}

/// Best [`ratio`] of the shorter string against every window of the longer
/// string with the same character length.
///
/// An empty shorter string scores 100 against anything.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let (short, long) = if a_chars.len() <= b_chars.len() {
        (&a_chars, &b_chars)
    } else {
        (&b_chars, &a_chars)
    };
    if short.is_empty() {
        return 100.0;
    }

    let needle: String = short.iter().collect();
    let mut best: f64 = 0.0;
    for window in long.windows(short.len()) {
        let haystack: String = window.iter().collect();
        best = best.max(ratio(&needle, &haystack));
        if best >= 100.0 {
            break;
        }
    }
    best
}

fn sorted_tokens(text: &str) -> Vec<&str> {
    let mut tokens: Vec<&str> = text.split_whitespace().collect();
    tokens.sort_unstable();
    tokens
}

/// [`ratio`] over the whitespace tokens of both strings, sorted.
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio(&sorted_tokens(a).join(" "), &sorted_tokens(b).join(" "))
}

/// Set-based ratio: compares the shared tokens against each side's full
/// token set, taking the best of the three pairings.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let set_a: BTreeSet<&str> = a.split_whitespace().collect();
    let set_b: BTreeSet<&str> = b.split_whitespace().collect();

    let intersection: Vec<&str> = set_a.intersection(&set_b).copied().collect();
    let only_a: Vec<&str> = set_a.difference(&set_b).copied().collect();
    let only_b: Vec<&str> = set_b.difference(&set_a).copied().collect();

    let base = intersection.join(" ");
    let combined_a = join_nonempty(&base, &only_a.join(" "));
    let combined_b = join_nonempty(&base, &only_b.join(" "));

    ratio(&base, &combined_a)
        .max(ratio(&base, &combined_b))
        .max(ratio(&combined_a, &combined_b))
}

fn join_nonempty(left: &str, right: &str) -> String {
    match (left.is_empty(), right.is_empty()) {
        (true, _) => right.to_string(),
        (_, true) => left.to_string(),
        _ => format!("{left} {right}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_name_resolves_all_methods() {
        assert_eq!(FuzzMethod::from_name("ratio").unwrap(), FuzzMethod::Ratio);
        assert_eq!(
            FuzzMethod::from_name("partial_ratio").unwrap(),
            FuzzMethod::PartialRatio
        );
        assert_eq!(
            FuzzMethod::from_name("token_sort_ratio").unwrap(),
            FuzzMethod::TokenSortRatio
        );
        assert_eq!(
            FuzzMethod::from_name("token_set_ratio").unwrap(),
            FuzzMethod::TokenSetRatio
        );
    }

    #[test]
    fn from_name_rejects_unknown_method() {
        let err = FuzzMethod::from_name("sorta_ratio").unwrap_err();
        assert!(matches!(err, AltoError::Configuration(_)));
        assert!(err.to_string().contains("sorta_ratio"));
    }

    #[test]
    fn name_round_trips() {
        for method in [
            FuzzMethod::Ratio,
            FuzzMethod::PartialRatio,
            FuzzMethod::TokenSortRatio,
            FuzzMethod::TokenSetRatio,
        ] {
            assert_eq!(FuzzMethod::from_name(method.name()).unwrap(), method);
        }
    }

    #[test]
    fn ratio_identical_is_100() {
        assert_eq!(ratio("parliament", "parliament"), 100.0);
    }

    #[test]
    fn ratio_disjoint_is_0() {
        assert_eq!(ratio("abc", "xyz"), 0.0);
    }

    #[test]
    fn ratio_close_misspelling_scores_high() {
        // One deletion out of ten characters.
        assert!(ratio("parliament", "parliment") >= 85.0);
    }

    #[test]
    fn partial_ratio_finds_substring() {
        assert_eq!(partial_ratio("lia", "parliament"), 100.0);
    }

    #[test]
    fn partial_ratio_is_symmetric_in_argument_order() {
        assert_eq!(
            partial_ratio("lia", "parliament"),
            partial_ratio("parliament", "lia")
        );
    }

    #[test]
    fn token_sort_ignores_word_order() {
        assert_eq!(
            token_sort_ratio("evening courant", "courant evening"),
            100.0
        );
    }

    #[test]
    fn token_set_tolerates_extra_tokens() {
        assert_eq!(
            token_set_ratio("courant", "the edinburgh evening courant"),
            100.0
        );
    }

    #[test]
    fn token_set_of_disjoint_sets_is_low() {
        assert!(token_set_ratio("alpha beta", "gamma delta") < 50.0);
    }

    #[test]
    fn default_method_is_token_set() {
        assert_eq!(FuzzMethod::default(), FuzzMethod::TokenSetRatio);
    }

    #[test]
    fn scores_are_bounded() {
        for method in [
            FuzzMethod::Ratio,
            FuzzMethod::PartialRatio,
            FuzzMethod::TokenSortRatio,
            FuzzMethod::TokenSetRatio,
        ] {
            let score = method.score("parliment", "Parliament house");
            assert!((0.0..=100.0).contains(&score), "{method:?} => {score}");
        }
    }
}
