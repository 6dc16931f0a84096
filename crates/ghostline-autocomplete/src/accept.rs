//! Accepting the displayed suggestion

use crate::host::{Selection, Transaction};
use crate::types::{SuggestionState, Transition};

/// Result of offering a key press to the plugin
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The plugin consumed the key; the host must dispatch the transaction and
    /// suppress its default key behavior
    Handled(Transaction),
    /// Not ours; the host runs its default behavior
    PassThrough,
}

impl KeyOutcome {
    pub fn is_handled(&self) -> bool {
        matches!(self, KeyOutcome::Handled(_))
    }
}

/// Build the transaction that materializes the ghost text, if accepting is valid
///
/// Valid only with a collapsed selection sitting exactly at the suggestion's
/// anchor end and a non-empty suffix. The insertion and the state reset travel
/// in one transaction.
pub fn accept_suggestion(state: &SuggestionState, selection: Selection) -> Option<Transaction> {
    let active = state.get()?;
    let at = active.anchor().end;
    if !selection.is_empty() || selection.from != at {
        return None;
    }

    let suffix = active.suffix();
    if suffix.is_empty() {
        return None;
    }

    Some(
        Transaction::new()
            .insert(at, suffix)
            .with_selection(Selection::cursor(at + suffix.chars().count()))
            .with_meta(Transition::Clear),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ActiveSuggestion, Anchor};

    fn suggested(query: &str, suggestion: &str, start: usize) -> SuggestionState {
        let anchor = Anchor::new(start, start + query.len());
        SuggestionState::active(ActiveSuggestion::new(query, suggestion, anchor).unwrap())
    }

    #[test]
    fn test_accept_inserts_suffix_and_clears() {
        let tr = accept_suggestion(&suggested("Sagi", "Sagittal", 10), Selection::cursor(14)).unwrap();

        assert_eq!(tr.edits().len(), 1);
        assert_eq!(tr.edits()[0].from, 14);
        assert_eq!(tr.edits()[0].text, "ttal");
        assert_eq!(tr.selection(), Some(Selection::cursor(18)));
        assert_eq!(tr.meta(), Some(&Transition::Clear));
    }

    #[test]
    fn test_no_accept_without_suggestion() {
        assert_eq!(accept_suggestion(&SuggestionState::empty(), Selection::cursor(3)), None);
    }

    #[test]
    fn test_no_accept_away_from_anchor() {
        let state = suggested("Sagi", "Sagittal", 10);
        assert_eq!(accept_suggestion(&state, Selection::cursor(13)), None);
        assert_eq!(accept_suggestion(&state, Selection::range(10, 14)), None);
    }

    #[test]
    fn test_no_accept_when_nothing_to_insert() {
        let state = suggested("Sagittal", "SAGITTAL", 0);
        assert_eq!(accept_suggestion(&state, Selection::cursor(8)), None);
    }

    #[test]
    fn test_key_outcome_is_handled() {
        assert!(KeyOutcome::Handled(Transaction::new()).is_handled());
        assert!(!KeyOutcome::PassThrough.is_handled());
    }
}
