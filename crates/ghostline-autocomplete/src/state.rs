//! Plugin-local suggestion state store

use crate::host::{Selection, Transaction};
use crate::types::SuggestionState;
use tracing::trace;

/// Owns the authoritative [`SuggestionState`]
///
/// The only way to change the state is [`SuggestionStore::apply`]: a transaction
/// carrying a transition replaces the state wholesale, while any other edit or
/// selection move resets it.
#[derive(Debug, Clone, Default)]
pub struct SuggestionStore {
    state: SuggestionState,
}

impl SuggestionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SuggestionState {
        &self.state
    }

    /// Fold one transaction into the state; returns `true` if the state changed
    pub fn apply(&mut self, tr: &Transaction, before: Selection, after: Selection) -> bool {
        let next = if let Some(transition) = tr.meta() {
            transition.clone().into_state()
        } else if tr.doc_changed() || before != after {
            SuggestionState::empty()
        } else {
            return false;
        };

        if next == self.state {
            return false;
        }
        trace!(
            query = ?next.query(),
            suggestion = ?next.suggestion(),
            "Suggestion state replaced"
        );
        self.state = next;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ActiveSuggestion, Anchor, Transition};

    fn sagittal() -> ActiveSuggestion {
        ActiveSuggestion::new("Sagi", "Sagittal", Anchor::new(10, 14)).unwrap()
    }

    fn with_suggestion() -> SuggestionStore {
        let mut store = SuggestionStore::new();
        let cursor = Selection::cursor(14);
        store.apply(&Transaction::transition(Transition::Set(sagittal())), cursor, cursor);
        store
    }

    #[test]
    fn test_starts_empty() {
        assert!(SuggestionStore::new().state().is_empty());
    }

    #[test]
    fn test_transition_replaces_state() {
        let store = with_suggestion();
        assert_eq!(store.state().suggestion(), Some("Sagittal"));
        assert_eq!(store.state().anchor(), Some(Anchor::new(10, 14)));
    }

    #[test]
    fn test_doc_change_resets() {
        let mut store = with_suggestion();
        let tr = Transaction::new().insert(14, "t");
        assert!(store.apply(&tr, Selection::cursor(14), Selection::cursor(15)));
        assert!(store.state().is_empty());
    }

    #[test]
    fn test_selection_move_resets() {
        let mut store = with_suggestion();
        assert!(store.apply(&Transaction::new(), Selection::cursor(14), Selection::cursor(3)));
        assert!(store.state().is_empty());
    }

    #[test]
    fn test_unrelated_transaction_keeps_state() {
        let mut store = with_suggestion();
        let cursor = Selection::cursor(14);
        assert!(!store.apply(&Transaction::new(), cursor, cursor));
        assert_eq!(store.state().query(), Some("Sagi"));
    }

    #[test]
    fn test_transition_wins_over_doc_change() {
        let mut store = with_suggestion();
        let tr = Transaction::new()
            .insert(14, "ttal")
            .with_meta(Transition::Clear);
        assert!(store.apply(&tr, Selection::cursor(14), Selection::cursor(18)));
        assert!(store.state().is_empty());

        let tr = Transaction::new()
            .insert(0, "x")
            .with_meta(Transition::Set(sagittal()));
        store.apply(&tr, Selection::cursor(14), Selection::cursor(15));
        assert_eq!(store.state().suggestion(), Some("Sagittal"));
    }
}
