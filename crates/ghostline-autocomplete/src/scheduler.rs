//! Debounced fetch scheduling
//!
//! Each qualifying observation replaces the single live timer. When the timer
//! survives the idle delay it posts [`AutocompleteEvent::DebounceElapsed`] on the
//! plugin's channel; the host loop picks it up and the plugin decides whether
//! the fetch is still wanted.

use crate::types::PendingFetch;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::trace;

/// Messages posted back to the host's event loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutocompleteEvent {
    /// The idle delay for `fetch` elapsed on the timer numbered `timer`
    DebounceElapsed { timer: u64, fetch: PendingFetch },
    /// A fetch finished; `suggestion` is the best candidate, if any
    FetchResolved {
        fetch: PendingFetch,
        suggestion: Option<String>,
    },
}

struct ScheduledTimer {
    id: u64,
    fetch: PendingFetch,
    handle: JoinHandle<()>,
}

/// Holds at most one live debounce timer
pub struct DebounceScheduler {
    delay: Duration,
    runtime: Handle,
    events: mpsc::UnboundedSender<AutocompleteEvent>,
    timer: Option<ScheduledTimer>,
    next_id: u64,
}

impl DebounceScheduler {
    pub fn new(
        delay: Duration,
        runtime: Handle,
        events: mpsc::UnboundedSender<AutocompleteEvent>,
    ) -> Self {
        Self {
            delay,
            runtime,
            events,
            timer: None,
            next_id: 0,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replace any live timer with one for `fetch`
    pub fn schedule(&mut self, fetch: PendingFetch) {
        self.cancel();

        self.next_id = self.next_id.wrapping_add(1);
        let id = self.next_id;
        let delay = self.delay;
        let events = self.events.clone();
        let fired = fetch.clone();
        let handle = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver gone means the plugin was dropped
            let _ = events.send(AutocompleteEvent::DebounceElapsed {
                timer: id,
                fetch: fired,
            });
        });

        trace!(timer = id, word = fetch.word(), "Debounce timer scheduled");
        self.timer = Some(ScheduledTimer { id, fetch, handle });
    }

    /// Abort the live timer; returns `true` if one was pending
    pub fn cancel(&mut self) -> bool {
        match self.timer.take() {
            Some(timer) => {
                timer.handle.abort();
                trace!(word = timer.fetch.word(), "Debounce timer cancelled");
                true
            }
            None => false,
        }
    }

    /// Retire the live timer if `timer` names it
    ///
    /// An event can already sit in the channel when its timer is aborted or
    /// replaced. Such an event returns `false` and must be ignored.
    pub fn finish(&mut self, timer: u64) -> bool {
        match &self.timer {
            Some(live) if live.id == timer => {
                self.timer = None;
                true
            }
            _ => {
                trace!(timer, "Superseded debounce event ignored");
                false
            }
        }
    }

    /// The fetch the live timer was scheduled for
    pub fn pending(&self) -> Option<&PendingFetch> {
        self.timer.as_ref().map(|timer| &timer.fetch)
    }

    pub fn is_pending(&self) -> bool {
        self.timer.is_some()
    }
}

impl Drop for DebounceScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}
