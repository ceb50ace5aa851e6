//! OCR tokens: positioned words extracted from ALTO string elements.

use crate::geometry::Rect;

/// One OCR string element: a word with its position on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    /// Horizontal position of the left edge (ALTO `HPOS`), in pixels.
    pub x: i32,
    /// Vertical position of the top edge (ALTO `VPOS`), in pixels.
    pub y: i32,
    /// Width in pixels (ALTO `WIDTH`).
    pub width: i32,
    /// Height in pixels (ALTO `HEIGHT`).
    pub height: i32,
    /// The recognized text (ALTO `CONTENT`).
    pub content: String,
}

impl Token {
    pub fn new(x: i32, y: i32, width: i32, height: i32, content: impl Into<String>) -> Self {
        Self {
            x,
            y,
            width,
            height,
            content: content.into(),
        }
    }

    /// The token's rectangle on the page.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }
}

/// Tight bounding box over a slice of tokens.
///
/// Returns `None` for an empty slice; callers that own the page fall back
/// to the full page rectangle in that case.
pub fn tokens_bounding_box(tokens: &[Token]) -> Option<Rect> {
    let mut iter = tokens.iter();
    let first = iter.next()?.rect();
    Some(iter.fold(first, |acc, token| acc.union(&token.rect())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_spans_width_and_height() {
        let token = Token::new(100, 200, 50, 20, "word");
        assert_eq!(token.rect(), Rect::new(100, 200, 150, 220));
    }

    #[test]
    fn bounding_box_of_empty_slice_is_none() {
        assert_eq!(tokens_bounding_box(&[]), None);
    }

    #[test]
    fn bounding_box_of_single_token_is_its_rect() {
        let tokens = vec![Token::new(10, 20, 30, 40, "a")];
        assert_eq!(tokens_bounding_box(&tokens), Some(Rect::new(10, 20, 40, 60)));
    }

    #[test]
    fn bounding_box_covers_all_tokens() {
        let tokens = vec![
            Token::new(100, 50, 40, 20, "first"),
            Token::new(10, 60, 30, 25, "second"),
            Token::new(200, 40, 60, 30, "third"),
        ];
        let bbox = tokens_bounding_box(&tokens).unwrap();
        for token in &tokens {
            assert!(bbox.x0 <= token.x);
            assert!(bbox.y0 <= token.y);
            assert!(bbox.x1 >= token.x + token.width);
            assert!(bbox.y1 >= token.y + token.height);
        }
        assert_eq!(bbox, Rect::new(10, 40, 260, 85));
    }
}
