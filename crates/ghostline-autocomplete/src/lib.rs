//! Ghostline Autocomplete Engine
//!
//! Inline "ghost text" autocomplete for rich-text editing surfaces. As the user
//! types, the engine finds the word ending at the cursor, waits for typing to
//! pause, asks a [`SuggestionFetcher`] for candidates and overlays the untyped
//! remainder of the best candidate as a non-editable decoration. A single key
//! (Tab by default) turns the ghost text into real text.
//!
//! # Architecture
//!
//! 1. **Word extraction** ([`word`]): the `[A-Za-z0-9_]+` run ending at a
//!    collapsed cursor, with its document offsets
//! 2. **Debounce** ([`scheduler`]): one live timer, replaced on every keystroke
//! 3. **Fetching** ([`fetcher`]): HTTP or in-process candidate sources; failures
//!    collapse to "no suggestion"
//! 4. **State** ([`state`], [`types`]): an all-or-nothing suggestion record,
//!    changed only by typed [`Transition`]s or reset by edits and cursor moves
//! 5. **Rendering** ([`decoration`]): the suffix as an inline overlay
//! 6. **Acceptance** ([`accept`]): inserts the suffix and clears state in one
//!    transaction
//!
//! The [`AutocompletePlugin`] orchestrates these against any host implementing
//! [`DocumentView`]; [`MemoryEditor`] is a ready-made plain-text host.
//!
//! # Staleness
//!
//! A fetch is applied only if the token at the cursor is still exactly the one
//! it was issued for. Late responses for superseded tokens are dropped.
//!
//! # Example
//!
//! ```ignore
//! use ghostline_autocomplete::*;
//! use std::sync::Arc;
//!
//! let source = Arc::new(StaticSuggestionSource::new(["Sagittal", "Sagittarius"]));
//! let plugin = AutocompletePlugin::new(AutocompleteConfig::default(), source)?;
//! let mut editor = MemoryEditor::new(plugin);
//!
//! editor.type_text("Sagi");
//! editor.settle(std::time::Duration::from_millis(500)).await;
//! assert_eq!(editor.decorations().first().unwrap().text, "ttal");
//!
//! editor.press_key(&KeyCombo::default());
//! assert_eq!(editor.text(), "Sagittal");
//! ```
pub mod accept;
pub mod config;
pub mod decoration;
pub mod error;
pub mod fetcher;
pub mod host;
pub mod keybind;
pub mod plugin;
pub mod scheduler;
pub mod state;
pub mod types;
pub mod word;

pub use accept::{accept_suggestion, KeyOutcome};
pub use config::{AutocompleteConfig, ConfigFormat, ConfigLoader, EndpointConfig};
pub use decoration::{render_decorations, DecorationSet, InlineDecoration, DEFAULT_GHOST_CLASS};
pub use error::{AutocompleteError, AutocompleteResult, KeyParseError};
pub use fetcher::{
    best_candidate, resolve_suggestion, CredentialProvider, HttpSuggestionFetcher,
    StaticCredential, StaticSuggestionSource, SuggestionFetcher, SuggestionResponse,
};
pub use host::{DocumentView, MemoryEditor, PlainDocument, Selection, TextEdit, Transaction};
pub use keybind::{Key, KeyCombo, Modifier};
pub use plugin::AutocompletePlugin;
pub use scheduler::{AutocompleteEvent, DebounceScheduler};
pub use state::SuggestionStore;
pub use types::{
    starts_with_ignore_case, ActiveSuggestion, Anchor, PendingFetch, SuggestionState, Transition,
    WordToken,
};
pub use word::{extract_word, WordExtractor, DEFAULT_LOOKBACK_CHARS};
