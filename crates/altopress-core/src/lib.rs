//! altopress-core: XML-backend-independent data types and algorithms.
//!
//! This crate provides the foundational types (Rect, Token, match options)
//! and algorithms (year derivation, page-code ordering, word normalization,
//! fuzzy scoring) used by altopress. It depends only on `regex` and `strsim`.

mod error;
mod fuzzy;
mod geometry;
mod matcher;
mod normalize;
mod page_code;
mod token;
mod year;

pub use error::AltoError;
pub use fuzzy::{FuzzMethod, partial_ratio, ratio, token_set_ratio, token_sort_ratio};
pub use geometry::Rect;
pub use matcher::{DEFAULT_MIN_RATIO, MatchOptions};
pub use normalize::{IdentityBackend, LanguageBackend, normalize, preprocess_word};
pub use page_code::page_code_key;
pub use token::{Token, tokens_bounding_box};
pub use year::parse_year;
