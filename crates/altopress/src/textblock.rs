//! TextBlock: the OCR text container for one structural area.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::sync::OnceLock;

use altopress_core::{
    AltoError, IdentityBackend, LanguageBackend, MatchOptions, Rect, Token, preprocess_word,
    tokens_bounding_box,
};
use altopress_parse::RawTextBlock;
use regex::RegexBuilder;

/// Where a match was found: enough to re-open the exact text block from
/// nothing but the result row.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Navigation {
    pub archive: String,
    pub document_code: String,
    pub page_code: String,
    pub textblock_id: String,
}

/// One matcher result row.
#[derive(Debug, Clone)]
pub struct TokenMatch<'a> {
    pub navigation: Navigation,
    /// Index of the token within the block.
    pub index: usize,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    /// The original (unprocessed) token text.
    pub token: String,
    /// Regex mode: 100 or 0. Fuzzy mode: the configured method's score.
    pub score: f64,
    /// The owning block, when requested via
    /// [`MatchOptions::add_textblock`].
    pub textblock: Option<&'a TextBlock>,
}

/// The OCR text of one structural area: raw tokens in document order plus
/// the derived views queries traverse.
///
/// A block is immutable after construction except for lazily memoized
/// derived views. The structural annotations (`shape`, `coords`,
/// `page_area`) are attached when the block is resolved into an article
/// via [`Document::articles`](crate::Document::articles).
#[derive(Debug, Clone)]
pub struct TextBlock {
    id: String,
    navigation: Navigation,
    page_width: i32,
    page_height: i32,
    tokens: Vec<Token>,
    word_confidences: Vec<String>,
    character_confidences: Vec<String>,
    shape: Option<String>,
    coords: Option<Rect>,
    page_area: Option<String>,
    bounding_box: OnceLock<Rect>,
}

impl TextBlock {
    pub(crate) fn from_raw(
        raw: &RawTextBlock,
        archive: &str,
        document_code: &str,
        page_code: &str,
        page_width: i32,
        page_height: i32,
    ) -> Self {
        let id = raw.id.clone().unwrap_or_default();
        let tokens = raw
            .strings
            .iter()
            .map(|s| Token::new(s.x, s.y, s.width, s.height, s.content.clone()))
            .collect();
        // WC/CC are independently optional per string; the confidence
        // sequences are NOT the same length as the token list.
        let word_confidences = raw
            .strings
            .iter()
            .filter_map(|s| s.word_confidence.clone())
            .collect();
        let character_confidences = raw
            .strings
            .iter()
            .filter_map(|s| s.character_confidence.clone())
            .collect();

        Self {
            id,
            navigation: Navigation {
                archive: archive.to_string(),
                document_code: document_code.to_string(),
                page_code: page_code.to_string(),
                textblock_id: raw.id.clone().unwrap_or_default(),
            },
            page_width,
            page_height,
            tokens,
            word_confidences,
            character_confidences,
            shape: None,
            coords: None,
            page_area: None,
            bounding_box: OnceLock::new(),
        }
    }

    /// The block's `ID` attribute; empty for blocks the OCR engine left
    /// unidentified (those can never resolve to an area).
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn navigation(&self) -> &Navigation {
        &self.navigation
    }

    /// Raw tokens in document order.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Words in document order.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(|t| t.content.as_str())
    }

    /// All words joined with single spaces.
    pub fn content(&self) -> String {
        self.words().collect::<Vec<_>>().join(" ")
    }

    /// Word confidences as written in the source.
    pub fn word_confidences(&self) -> &[String] {
        &self.word_confidences
    }

    /// Character confidences as written in the source.
    pub fn character_confidences(&self) -> &[String] {
        &self.character_confidences
    }

    /// Word confidences that parse as floats; non-numeric values are left
    /// out rather than failing.
    pub fn parsed_word_confidences(&self) -> Vec<f64> {
        self.word_confidences
            .iter()
            .filter_map(|wc| wc.parse().ok())
            .collect()
    }

    /// Coordinate shape from the structural map, once resolved into an
    /// article.
    pub fn shape(&self) -> Option<&str> {
        self.shape.as_deref()
    }

    /// Area rectangle from the structural map, once resolved into an
    /// article.
    pub fn coords(&self) -> Option<Rect> {
        self.coords
    }

    /// Freeform page/area label from structLink, once resolved into an
    /// article.
    pub fn page_area(&self) -> Option<&str> {
        self.page_area.as_deref()
    }

    pub(crate) fn annotate(&mut self, shape: Option<String>, coords: Option<Rect>, page_area: Option<String>) {
        self.shape = shape;
        self.coords = coords;
        self.page_area = page_area;
    }

    /// Tight bounding box over all tokens.
    ///
    /// A block with zero tokens degenerates to the full page rectangle;
    /// that fallback is part of the contract, not an error.
    pub fn bounding_box(&self) -> Rect {
        *self.bounding_box.get_or_init(|| {
            tokens_bounding_box(&self.tokens)
                .unwrap_or_else(|| Rect::new(0, 0, self.page_width, self.page_height))
        })
    }

    /// Tokens with their content run through the word-preparation
    /// pipeline: normalization, lemmatization, stemming, in that order,
    /// each stage toggled by the options.
    pub fn process_tokens(&self, opts: &MatchOptions, backend: &dyn LanguageBackend) -> Vec<Token> {
        self.tokens
            .iter()
            .map(|token| {
                Token::new(
                    token.x,
                    token.y,
                    token.width,
                    token.height,
                    preprocess_word(
                        &token.content,
                        opts.normalise,
                        opts.include_numbers,
                        opts.lemmatise,
                        opts.stem,
                        backend,
                    ),
                )
            })
            .collect()
    }

    /// Match query strings against this block's tokens with the identity
    /// language backend.
    ///
    /// See [`TextBlock::matches_with`] for behavior and errors.
    pub fn matches(
        &self,
        queries: &[&str],
        opts: &MatchOptions,
    ) -> Result<Vec<TokenMatch<'_>>, AltoError> {
        self.matches_with(queries, opts, &IdentityBackend)
    }

    /// Match query strings against this block's tokens.
    ///
    /// Every token is prepared via [`TextBlock::process_tokens`], then
    /// scored against each (deduplicated) query: in regex mode a
    /// case-insensitive pattern found anywhere in the processed token
    /// scores 100, otherwise 0; in fuzzy mode the configured method
    /// scores 0–100. Results are filtered and sorted per the options.
    /// The matcher is pure: identical calls return identical, order-stable
    /// results.
    ///
    /// # Errors
    ///
    /// Returns [`AltoError::Configuration`] if a regex query fails to
    /// compile.
    pub fn matches_with(
        &self,
        queries: &[&str],
        opts: &MatchOptions,
        backend: &dyn LanguageBackend,
    ) -> Result<Vec<TokenMatch<'_>>, AltoError> {
        // Dedupe into a deterministic order.
        let queries: Vec<&str> = queries
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let processed = self.process_tokens(opts, backend);
        let mut results: Vec<TokenMatch<'_>> = Vec::new();

        for query in queries {
            let pattern = if opts.regex {
                Some(
                    RegexBuilder::new(query)
                        .case_insensitive(true)
                        .build()
                        .map_err(|e| {
                            AltoError::Configuration(format!("invalid regex {query:?}: {e}"))
                        })?,
                )
            } else {
                None
            };

            for (index, (token, original)) in processed.iter().zip(&self.tokens).enumerate() {
                let score = match &pattern {
                    Some(re) => {
                        if re.is_match(&token.content) {
                            100.0
                        } else {
                            0.0
                        }
                    }
                    None => opts.fuzz_method.score(&token.content, query),
                };

                let keep = opts.all_results
                    || (opts.regex && score > 0.0)
                    || (!opts.regex && score >= opts.min_ratio);
                if keep {
                    results.push(TokenMatch {
                        navigation: self.navigation.clone(),
                        index,
                        x: original.x,
                        y: original.y,
                        width: original.width,
                        height: original.height,
                        token: original.content.clone(),
                        score,
                        textblock: opts.add_textblock.then_some(self),
                    });
                }
            }
        }

        if opts.sort_results {
            if opts.regex {
                // Regex scores are binary, so order by the full result
                // tuple instead of by score.
                results.sort_by(|a, b| {
                    let key = |m: &TokenMatch<'_>| {
                        (m.index, m.x, m.y, m.width, m.height, m.token.clone())
                    };
                    let ordering = key(a).cmp(&key(b));
                    if opts.sort_reverse {
                        ordering.reverse()
                    } else {
                        ordering
                    }
                });
            } else {
                results.sort_by(|a, b| {
                    let ordering = a.score.partial_cmp(&b.score).unwrap_or(Ordering::Equal);
                    if opts.sort_reverse {
                        ordering.reverse()
                    } else {
                        ordering
                    }
                });
            }
        }

        Ok(results)
    }
}
