//! Word extraction at the cursor

use crate::host::DocumentView;
use crate::types::WordToken;

/// Characters read before the cursor on the first pass
pub const DEFAULT_LOOKBACK_CHARS: usize = 20;

/// Word characters are ASCII letters, digits and underscore
pub fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// The longest run of word characters at the end of `text`
pub fn trailing_word(text: &str) -> Option<&str> {
    let start = text
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_word_char(*c))
        .last()
        .map(|(i, _)| i)?;
    Some(&text[start..])
}

/// Locate the word ending at `cursor`, given the text that immediately precedes it
pub fn extract_word(text_before: &str, cursor: usize) -> Option<WordToken> {
    let word = trailing_word(text_before)?;
    let start = cursor.checked_sub(word.chars().count())?;
    Some(WordToken::new(word, start, cursor))
}

/// Reads the live document and extracts the token under a collapsed cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordExtractor {
    lookback: usize,
}

impl WordExtractor {
    pub fn new(lookback: usize) -> Self {
        Self {
            lookback: lookback.max(1),
        }
    }

    pub fn lookback(&self) -> usize {
        self.lookback
    }

    /// The token ending at the cursor, if any
    ///
    /// A non-collapsed selection or a cursor outside the document yields `None`.
    /// When the whole lookback window is word characters the window keeps
    /// growing, so a long token is never cut short.
    pub fn current_word<V: DocumentView + ?Sized>(&self, view: &V) -> Option<WordToken> {
        let selection = view.selection();
        if !selection.is_empty() {
            return None;
        }
        let cursor = selection.from;
        if cursor == 0 || cursor > view.content_len() {
            return None;
        }

        let mut window = self.lookback;
        loop {
            let start = cursor.saturating_sub(window);
            let token = extract_word(&view.text_between(start, cursor), cursor)?;
            if token.start() > start || start == 0 {
                return Some(token);
            }
            window = window.saturating_mul(2);
        }
    }
}

impl Default for WordExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_LOOKBACK_CHARS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{PlainDocument, Selection};

    #[test]
    fn test_trailing_word() {
        assert_eq!(trailing_word("the Sagi"), Some("Sagi"));
        assert_eq!(trailing_word("snake_case_1"), Some("snake_case_1"));
        assert_eq!(trailing_word("ends with space "), None);
        assert_eq!(trailing_word("L1."), None);
        assert_eq!(trailing_word(""), None);
    }

    #[test]
    fn test_non_ascii_letters_are_boundaries() {
        assert_eq!(trailing_word("caféx"), Some("x"));
    }

    #[test]
    fn test_extract_word_offsets() {
        let token = extract_word("MRI spine Sagi", 14).unwrap();
        assert_eq!(token, WordToken::new("Sagi", 10, 14));
    }

    #[test]
    fn test_extract_word_rejects_inconsistent_cursor() {
        assert_eq!(extract_word("Sagittal", 3), None);
    }

    #[test]
    fn test_current_word_at_cursor() {
        let doc = PlainDocument::new("MRI spine Sagi");
        let token = WordExtractor::default().current_word(&doc).unwrap();
        assert_eq!(token, WordToken::new("Sagi", 10, 14));
    }

    #[test]
    fn test_cursor_mid_word_takes_preceding_part() {
        let doc = PlainDocument::new("Sagittal").with_selection(Selection::cursor(4));
        let token = WordExtractor::default().current_word(&doc).unwrap();
        assert_eq!(token, WordToken::new("Sagi", 0, 4));
    }

    #[test]
    fn test_no_token_cases() {
        let extractor = WordExtractor::default();
        assert_eq!(extractor.current_word(&PlainDocument::new("")), None);
        assert_eq!(extractor.current_word(&PlainDocument::new("word ")), None);
        assert_eq!(
            extractor.current_word(&PlainDocument::new("word").with_selection(Selection::cursor(0))),
            None
        );
        assert_eq!(
            extractor.current_word(&PlainDocument::new("word").with_selection(Selection::range(1, 4))),
            None
        );
    }

    #[test]
    fn test_long_token_grows_window() {
        let word = "Supercalifragilisticexpialidocious";
        let doc = PlainDocument::new(format!("a {}", word));
        let token = WordExtractor::new(4).current_word(&doc).unwrap();
        assert_eq!(token.word, word);
        assert_eq!(token.start(), 2);
        assert_eq!(token.end(), 2 + word.len());
    }

    #[test]
    fn test_token_at_document_start_fills_window() {
        let doc = PlainDocument::new("abcd");
        let token = WordExtractor::new(4).current_word(&doc).unwrap();
        assert_eq!(token, WordToken::new("abcd", 0, 4));
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let doc = PlainDocument::new("Anterior wedge compr");
        let extractor = WordExtractor::default();
        assert_eq!(extractor.current_word(&doc), extractor.current_word(&doc));
    }
}
