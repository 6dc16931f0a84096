//! The autocomplete plugin
//!
//! [`AutocompletePlugin`] ties the pipeline together:
//!
//! ```text
//! observation ─▶ WordExtractor ─▶ DebounceScheduler ─▶ SuggestionFetcher
//!                                                          │
//!       DecorationSet ◀── SuggestionStore ◀── Transition ◀─┘
//! ```
//!
//! The host drives it from a single event loop:
//!
//! 1. For every transaction: [`apply_transaction`](AutocompletePlugin::apply_transaction),
//!    then [`view_update`](AutocompletePlugin::view_update)
//! 2. For every event from [`next_event`](AutocompletePlugin::next_event):
//!    [`handle_event`](AutocompletePlugin::handle_event)
//! 3. For key presses: [`handle_key`](AutocompletePlugin::handle_key)
//!
//! Every `Transaction` these methods return must be dispatched by the host.
//!
//! Fetches run as spawned tasks, but a result only reaches the state after the
//! live cursor context is checked again, so a slow response for an old token
//! can never overwrite a newer one.

use crate::accept::{accept_suggestion, KeyOutcome};
use crate::config::AutocompleteConfig;
use crate::decoration::{render_decorations, DecorationSet};
use crate::error::{AutocompleteError, AutocompleteResult};
use crate::fetcher::{resolve_suggestion, SuggestionFetcher};
use crate::host::{DocumentView, Selection, Transaction};
use crate::keybind::KeyCombo;
use crate::scheduler::{AutocompleteEvent, DebounceScheduler};
use crate::state::SuggestionStore;
use crate::types::{ActiveSuggestion, PendingFetch, SuggestionState, Transition, WordToken};
use crate::word::WordExtractor;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Inline autocomplete for one editing surface
pub struct AutocompletePlugin {
    config: AutocompleteConfig,
    extractor: WordExtractor,
    store: SuggestionStore,
    scheduler: DebounceScheduler,
    fetcher: Arc<dyn SuggestionFetcher>,
    runtime: Handle,
    events_tx: mpsc::UnboundedSender<AutocompleteEvent>,
    events_rx: mpsc::UnboundedReceiver<AutocompleteEvent>,
}

impl AutocompletePlugin {
    /// Create a plugin bound to the current tokio runtime
    ///
    /// # Errors
    ///
    /// Returns [`AutocompleteError::NoRuntime`] outside a runtime and a
    /// configuration error if `config` does not validate.
    pub fn new(
        config: AutocompleteConfig,
        fetcher: Arc<dyn SuggestionFetcher>,
    ) -> AutocompleteResult<Self> {
        let runtime = Handle::try_current().map_err(|_| AutocompleteError::NoRuntime)?;
        Self::with_runtime(config, fetcher, runtime)
    }

    /// Create a plugin that spawns its timers and fetches on `runtime`
    pub fn with_runtime(
        config: AutocompleteConfig,
        fetcher: Arc<dyn SuggestionFetcher>,
        runtime: Handle,
    ) -> AutocompleteResult<Self> {
        config.validate()?;

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let scheduler = DebounceScheduler::new(config.debounce(), runtime.clone(), events_tx.clone());

        Ok(Self {
            extractor: WordExtractor::new(config.lookback_chars),
            store: SuggestionStore::new(),
            scheduler,
            fetcher,
            runtime,
            events_tx,
            events_rx,
            config,
        })
    }

    pub fn config(&self) -> &AutocompleteConfig {
        &self.config
    }

    pub fn state(&self) -> &SuggestionState {
        self.store.state()
    }

    /// Whether a debounce timer is waiting to fire
    pub fn is_debouncing(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// Ghost text for the current state
    pub fn decorations(&self) -> DecorationSet {
        render_decorations(self.store.state(), &self.config.ghost_class)
    }

    /// Fold a transaction the host has just applied into the suggestion state
    pub fn apply_transaction(&mut self, tr: &Transaction, before: Selection, after: Selection) {
        self.store.apply(tr, before, after);
    }

    /// React to the document/selection the host now shows
    ///
    /// Schedules a fetch when the token at the cursor differs from the one the
    /// current suggestion answers. Returns a clearing transaction when there is
    /// no token but a suggestion is still recorded.
    pub fn view_update<V: DocumentView + ?Sized>(&mut self, view: &V) -> Option<Transaction> {
        match self.extractor.current_word(view) {
            Some(token) => {
                if self.store.state().get().is_some_and(|active| active.answers(&token)) {
                    return None;
                }
                self.scheduler.schedule(PendingFetch::new(token));
                None
            }
            None => {
                self.scheduler.cancel();
                self.clear_unless_answers(None)
            }
        }
    }

    /// Apply a timer or fetch event against the live document
    pub fn handle_event<V: DocumentView + ?Sized>(
        &mut self,
        event: AutocompleteEvent,
        view: &V,
    ) -> Option<Transaction> {
        let live = self.extractor.current_word(view);

        match event {
            AutocompleteEvent::DebounceElapsed { timer, fetch } => {
                if !self.scheduler.finish(timer) {
                    // Replaced or cancelled after this event was queued
                    return None;
                }
                if fetch.is_current(live.as_ref()) {
                    self.spawn_fetch(fetch);
                    None
                } else {
                    debug!("Debounced token '{}' is no longer at the cursor", fetch.word());
                    self.clear_unless_answers(live.as_ref())
                }
            }
            AutocompleteEvent::FetchResolved { fetch, suggestion } => {
                if !fetch.is_current(live.as_ref()) {
                    debug!("Discarding stale suggestion for '{}'", fetch.word());
                    return self.clear_unless_answers(live.as_ref());
                }

                let transition = match suggestion {
                    Some(candidate) => match ActiveSuggestion::for_token(&fetch.token, candidate) {
                        Ok(active) => Transition::Set(active),
                        Err(e) => {
                            warn!("Ignoring suggestion for '{}': {}", fetch.word(), e);
                            Transition::Clear
                        }
                    },
                    None => Transition::Clear,
                };

                if transition.is_noop_for(self.store.state()) {
                    None
                } else {
                    Some(Transaction::transition(transition))
                }
            }
        }
    }

    /// Offer a key press; the accept key is consumed only when it inserts text
    pub fn handle_key<V: DocumentView + ?Sized>(&mut self, key: &KeyCombo, view: &V) -> KeyOutcome {
        if !key.matches(&self.config.accept_key) {
            return KeyOutcome::PassThrough;
        }

        match accept_suggestion(self.store.state(), view.selection()) {
            Some(tr) => {
                debug!(
                    "Accepting suggestion {:?}",
                    self.store.state().suggestion()
                );
                KeyOutcome::Handled(tr)
            }
            None => KeyOutcome::PassThrough,
        }
    }

    /// Wait for the next timer or fetch event
    pub async fn next_event(&mut self) -> Option<AutocompleteEvent> {
        self.events_rx.recv().await
    }

    /// Take an already-delivered event without waiting
    pub fn try_next_event(&mut self) -> Option<AutocompleteEvent> {
        self.events_rx.try_recv().ok()
    }

    fn spawn_fetch(&self, fetch: PendingFetch) {
        debug!("Fetching suggestions for '{}'", fetch.word());

        let fetcher = Arc::clone(&self.fetcher);
        let events = self.events_tx.clone();
        self.runtime.spawn(async move {
            let suggestion = resolve_suggestion(fetcher.as_ref(), fetch.word()).await;
            // Receiver gone means the plugin was dropped
            let _ = events.send(AutocompleteEvent::FetchResolved { fetch, suggestion });
        });
    }

    /// Clear a recorded suggestion unless it answers the live token
    fn clear_unless_answers(&self, live: Option<&WordToken>) -> Option<Transaction> {
        let state = self.store.state();
        if state.is_empty() || state.matches_token(live) {
            None
        } else {
            Some(Transaction::transition(Transition::Clear))
        }
    }
}
