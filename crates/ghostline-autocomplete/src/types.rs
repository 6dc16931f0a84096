//! Core data model: tokens, anchors, suggestion state and transitions
//!
//! All offsets are character offsets into the plain-text document.

use crate::error::{AutocompleteError, AutocompleteResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Document span of a typed token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Anchor {
    pub start: usize,
    pub end: usize,
}

impl Anchor {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of characters covered by the anchor
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// The word run ending at the cursor
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WordToken {
    /// The word characters themselves
    pub word: String,
    /// Where the word sits in the document
    pub anchor: Anchor,
}

impl WordToken {
    pub fn new(word: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            word: word.into(),
            anchor: Anchor::new(start, end),
        }
    }

    pub fn start(&self) -> usize {
        self.anchor.start
    }

    pub fn end(&self) -> usize {
        self.anchor.end
    }
}

/// A fetch that has been scheduled or issued, identified by the token it was issued for
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PendingFetch {
    pub token: WordToken,
}

impl PendingFetch {
    pub fn new(token: WordToken) -> Self {
        Self { token }
    }

    pub fn word(&self) -> &str {
        &self.token.word
    }

    /// Whether the live cursor context is still the one this fetch was issued for
    pub fn is_current(&self, live: Option<&WordToken>) -> bool {
        live == Some(&self.token)
    }
}

/// Case-insensitive prefix test, compared character by character
pub fn starts_with_ignore_case(candidate: &str, prefix: &str) -> bool {
    let mut candidate_chars = candidate.chars();
    prefix.chars().all(|p| match candidate_chars.next() {
        Some(c) => c.to_lowercase().eq(p.to_lowercase()),
        None => false,
    })
}

/// A suggestion currently attached to the editor
///
/// Only constructible through [`ActiveSuggestion::new`], which enforces that the
/// suggestion is case-insensitively prefixed by the query and that the anchor
/// spans exactly the query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveSuggestion {
    query: String,
    suggestion: String,
    anchor: Anchor,
}

impl ActiveSuggestion {
    pub fn new(
        query: impl Into<String>,
        suggestion: impl Into<String>,
        anchor: Anchor,
    ) -> AutocompleteResult<Self> {
        let query = query.into();
        let suggestion = suggestion.into();

        if query.is_empty() {
            return Err(AutocompleteError::InvalidSuggestion(
                "query cannot be empty".to_string(),
            ));
        }
        if !starts_with_ignore_case(&suggestion, &query) {
            return Err(AutocompleteError::InvalidSuggestion(format!(
                "'{}' does not start with '{}'",
                suggestion, query
            )));
        }
        if anchor.start > anchor.end || anchor.len() != query.chars().count() {
            return Err(AutocompleteError::InvalidSuggestion(format!(
                "anchor {} does not span query '{}'",
                anchor, query
            )));
        }

        Ok(Self {
            query,
            suggestion,
            anchor,
        })
    }

    /// Build a suggestion answering `token`
    pub fn for_token(token: &WordToken, suggestion: impl Into<String>) -> AutocompleteResult<Self> {
        Self::new(token.word.clone(), suggestion, token.anchor)
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn suggestion(&self) -> &str {
        &self.suggestion
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    /// The untyped remainder of the suggestion
    pub fn suffix(&self) -> &str {
        let typed = self.query.chars().count();
        let split = self
            .suggestion
            .char_indices()
            .nth(typed)
            .map(|(i, _)| i)
            .unwrap_or(self.suggestion.len());
        &self.suggestion[split..]
    }

    /// Whether this suggestion answers exactly `token`
    pub fn answers(&self, token: &WordToken) -> bool {
        self.query == token.word && self.anchor == token.anchor
    }
}

/// The plugin-local suggestion record: either empty or fully populated
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionState(Option<ActiveSuggestion>);

impl SuggestionState {
    pub fn empty() -> Self {
        Self(None)
    }

    pub fn active(suggestion: ActiveSuggestion) -> Self {
        Self(Some(suggestion))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    pub fn get(&self) -> Option<&ActiveSuggestion> {
        self.0.as_ref()
    }

    pub fn query(&self) -> Option<&str> {
        self.0.as_ref().map(ActiveSuggestion::query)
    }

    pub fn suggestion(&self) -> Option<&str> {
        self.0.as_ref().map(ActiveSuggestion::suggestion)
    }

    pub fn anchor(&self) -> Option<Anchor> {
        self.0.as_ref().map(ActiveSuggestion::anchor)
    }

    /// Whether the recorded suggestion was computed for exactly `token`
    ///
    /// An empty state matches only an absent token.
    pub fn matches_token(&self, token: Option<&WordToken>) -> bool {
        match (&self.0, token) {
            (None, None) => true,
            (Some(active), Some(token)) => active.answers(token),
            _ => false,
        }
    }
}

/// An explicit state-transition event carried alongside a transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Replace the state with a suggestion
    Set(ActiveSuggestion),
    /// Reset to empty
    Clear,
}

impl Transition {
    /// The state this transition produces
    pub fn into_state(self) -> SuggestionState {
        match self {
            Transition::Set(active) => SuggestionState::active(active),
            Transition::Clear => SuggestionState::empty(),
        }
    }

    /// Whether applying this transition to `state` would change nothing
    pub fn is_noop_for(&self, state: &SuggestionState) -> bool {
        match self {
            Transition::Set(active) => state.get() == Some(active),
            Transition::Clear => state.is_empty(),
        }
    }
}
