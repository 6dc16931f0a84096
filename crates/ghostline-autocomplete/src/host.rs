//! Host editing surface boundary
//!
//! The engine never owns a document. It reads the host through [`DocumentView`]
//! and asks the host to apply [`Transaction`]s. A transaction may carry a typed
//! [`Transition`] in its metadata slot, which is how suggestion state changes
//! travel without being mistaken for ordinary edits.
//!
//! [`MemoryEditor`] is a plain-text host that wires the whole contract together.
//! It backs the CLI and the end-to-end tests.

use crate::decoration::DecorationSet;
use crate::keybind::KeyCombo;
use crate::plugin::AutocompletePlugin;
use crate::scheduler::AutocompleteEvent;
use crate::types::{SuggestionState, Transition};
use std::time::Duration;
use tracing::trace;

/// A selection range; collapsed when `from == to`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Selection {
    pub from: usize,
    pub to: usize,
}

impl Selection {
    /// Build a range selection; endpoints may be given in either order
    pub fn range(a: usize, b: usize) -> Self {
        Self {
            from: a.min(b),
            to: a.max(b),
        }
    }

    /// A collapsed selection at `pos`
    pub fn cursor(pos: usize) -> Self {
        Self { from: pos, to: pos }
    }

    pub fn is_empty(&self) -> bool {
        self.from == self.to
    }

    fn map_through(self, edit: &TextEdit) -> Self {
        Self {
            from: edit.map_pos(self.from),
            to: edit.map_pos(self.to),
        }
    }

    fn clamp(self, len: usize) -> Self {
        Self::range(self.from.min(len), self.to.min(len))
    }
}

/// Replace `[from, to)` with `text`; an insertion when `from == to`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub from: usize,
    pub to: usize,
    pub text: String,
}

impl TextEdit {
    pub fn is_noop(&self) -> bool {
        self.from == self.to && self.text.is_empty()
    }

    /// Positions at or after an insertion point move past the inserted text
    fn map_pos(&self, pos: usize) -> usize {
        let inserted = self.text.chars().count();
        if pos < self.from {
            pos
        } else if pos >= self.to {
            pos - (self.to - self.from) + inserted
        } else {
            self.from + inserted
        }
    }
}

/// An atomic change to the host document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transaction {
    edits: Vec<TextEdit>,
    selection: Option<Selection>,
    meta: Option<Transition>,
}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transaction that only carries a state transition
    pub fn transition(transition: Transition) -> Self {
        Self::new().with_meta(transition)
    }

    pub fn insert(self, at: usize, text: impl Into<String>) -> Self {
        self.replace(at, at, text)
    }

    pub fn delete(self, from: usize, to: usize) -> Self {
        self.replace(from, to, "")
    }

    pub fn replace(mut self, from: usize, to: usize, text: impl Into<String>) -> Self {
        let from_to = Selection::range(from, to);
        self.edits.push(TextEdit {
            from: from_to.from,
            to: from_to.to,
            text: text.into(),
        });
        self
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = Some(selection);
        self
    }

    pub fn with_meta(mut self, transition: Transition) -> Self {
        self.meta = Some(transition);
        self
    }

    pub fn edits(&self) -> &[TextEdit] {
        &self.edits
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn meta(&self) -> Option<&Transition> {
        self.meta.as_ref()
    }

    pub fn doc_changed(&self) -> bool {
        self.edits.iter().any(|edit| !edit.is_noop())
    }
}

/// Read access to the host's live document
pub trait DocumentView {
    /// Current selection
    fn selection(&self) -> Selection;

    /// Plain text in `[from, to)`; out-of-range bounds are clamped
    fn text_between(&self, from: usize, to: usize) -> String;

    /// Document length in characters
    fn content_len(&self) -> usize;
}

/// A plain-text document with a selection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlainDocument {
    text: String,
    selection: Selection,
}

impl PlainDocument {
    /// A document with the cursor at the end of `text`
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let end = text.chars().count();
        Self {
            text,
            selection: Selection::cursor(end),
        }
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection.clamp(self.content_len());
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    fn byte_offset(&self, pos: usize) -> usize {
        self.text
            .char_indices()
            .nth(pos)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    /// Apply a transaction's edits and selection
    pub fn apply(&mut self, tr: &Transaction) {
        for edit in tr.edits() {
            let len = self.content_len();
            let edit = TextEdit {
                from: edit.from.min(len),
                to: edit.to.min(len),
                text: edit.text.clone(),
            };
            let start = self.byte_offset(edit.from);
            let end = self.byte_offset(edit.to);
            self.text.replace_range(start..end, &edit.text);
            self.selection = self.selection.map_through(&edit);
        }
        if let Some(selection) = tr.selection() {
            self.selection = selection;
        }
        self.selection = self.selection.clamp(self.content_len());
    }
}

impl DocumentView for PlainDocument {
    fn selection(&self) -> Selection {
        self.selection
    }

    fn text_between(&self, from: usize, to: usize) -> String {
        let to = to.min(self.content_len());
        if from >= to {
            return String::new();
        }
        self.text.chars().skip(from).take(to - from).collect()
    }

    fn content_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// An in-memory editing surface running the autocomplete plugin
pub struct MemoryEditor {
    document: PlainDocument,
    plugin: AutocompletePlugin,
}

impl MemoryEditor {
    pub fn new(plugin: AutocompletePlugin) -> Self {
        Self::with_document(plugin, PlainDocument::default())
    }

    pub fn with_document(plugin: AutocompletePlugin, document: PlainDocument) -> Self {
        Self { document, plugin }
    }

    pub fn text(&self) -> &str {
        self.document.text()
    }

    pub fn selection(&self) -> Selection {
        self.document.selection()
    }

    pub fn document(&self) -> &PlainDocument {
        &self.document
    }

    pub fn plugin(&self) -> &AutocompletePlugin {
        &self.plugin
    }

    pub fn state(&self) -> &SuggestionState {
        self.plugin.state()
    }

    pub fn decorations(&self) -> DecorationSet {
        self.plugin.decorations()
    }

    /// Apply a transaction, then let the plugin observe the result
    ///
    /// Follow-up transactions requested by the plugin are applied in turn.
    pub fn dispatch(&mut self, tr: Transaction) {
        let mut next = Some(tr);
        while let Some(tr) = next.take() {
            let before = self.document.selection();
            self.document.apply(&tr);
            let after = self.document.selection();
            trace!(
                doc_changed = tr.doc_changed(),
                has_meta = tr.meta().is_some(),
                "Applied transaction"
            );
            self.plugin.apply_transaction(&tr, before, after);
            next = self.plugin.view_update(&self.document);
        }
    }

    /// Replace the selection with `text`, leaving the cursor after it
    pub fn type_text(&mut self, text: &str) {
        let selection = self.document.selection();
        let end = selection.from + text.chars().count();
        let tr = Transaction::new()
            .replace(selection.from, selection.to, text)
            .with_selection(Selection::cursor(end));
        self.dispatch(tr);
    }

    /// Delete the selection, or the character before the cursor
    pub fn backspace(&mut self) {
        let selection = self.document.selection();
        let tr = if !selection.is_empty() {
            Transaction::new().delete(selection.from, selection.to)
        } else if selection.from > 0 {
            Transaction::new().delete(selection.from - 1, selection.from)
        } else {
            return;
        };
        self.dispatch(tr);
    }

    pub fn set_selection(&mut self, selection: Selection) {
        self.dispatch(Transaction::new().with_selection(selection));
    }

    pub fn move_cursor(&mut self, pos: usize) {
        self.set_selection(Selection::cursor(pos));
    }

    /// Offer a key press to the plugin; `true` when the plugin handled it
    pub fn press_key(&mut self, key: &KeyCombo) -> bool {
        match self.plugin.handle_key(key, &self.document) {
            crate::accept::KeyOutcome::Handled(tr) => {
                self.dispatch(tr);
                true
            }
            crate::accept::KeyOutcome::PassThrough => false,
        }
    }

    /// Wait for the next plugin event and apply it
    pub async fn process_next_event(&mut self) -> bool {
        let Some(event) = self.plugin.next_event().await else {
            return false;
        };
        self.handle_event(event);
        true
    }

    /// Process events until none arrives within `idle`; returns how many were handled
    pub async fn settle(&mut self, idle: Duration) -> usize {
        let mut handled = 0;
        loop {
            let event = match tokio::time::timeout(idle, self.plugin.next_event()).await {
                Ok(Some(event)) => event,
                _ => break,
            };
            self.handle_event(event);
            handled += 1;
        }
        handled
    }

    fn handle_event(&mut self, event: AutocompleteEvent) {
        if let Some(tr) = self.plugin.handle_event(event, &self.document) {
            self.dispatch(tr);
        }
    }
}
