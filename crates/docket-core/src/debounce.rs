//! Debounced saving of a case's situation and facts.

use std::{
    future::Future,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use log::debug;
use tokio::task::AbortHandle;

use crate::{
    error::Result,
    sync::{SyncChannel, SyncTracker},
};

/// Quiet period after the last edit before the context is sent.
pub const CONTEXT_DEBOUNCE: Duration = Duration::from_millis(1000);

/// Coalesces context edits into one `PUT /cases/{id}/context`.
///
/// Every [`ContextSaver::schedule`] call discards the save still waiting from
/// the previous call, so a burst of edits produces a single request carrying
/// the last state. A save whose quiet period has already passed is in flight
/// and always runs to completion. Outcomes are published on
/// [`SyncChannel::Context`], and [`SyncTracker::flush`] waits for every save.
#[derive(Clone)]
pub struct ContextSaver {
    tracker: SyncTracker,
    delay: Duration,
    slot: Arc<Mutex<Slot>>,
}

/// The most recent save. `waiting` is cleared once that save starts sending.
#[derive(Default)]
struct Slot {
    generation: u64,
    waiting: Option<AbortHandle>,
}

impl ContextSaver {
    pub fn new(tracker: SyncTracker) -> Self {
        Self::with_delay(tracker, CONTEXT_DEBOUNCE)
    }

    pub fn with_delay(tracker: SyncTracker, delay: Duration) -> Self {
        Self {
            tracker,
            delay,
            slot: Arc::default(),
        }
    }

    /// The tracker saves are reported to.
    pub fn tracker(&self) -> SyncTracker {
        self.tracker.clone()
    }

    /// Schedules a save, replacing any save not yet sent.
    ///
    /// `write` is only polled once the quiet period has passed without a
    /// newer call.
    pub fn schedule<F>(&self, write: F)
    where
        F: Future<Output = Result<()>> + Send + 'static,
    {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        slot.generation += 1;
        if let Some(previous) = slot.waiting.take() {
            debug!("Superseding pending context save");
            previous.abort();
        }

        let generation = slot.generation;
        let shared = Arc::clone(&self.slot);
        let tracker = self.tracker.clone();
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            {
                let mut slot = shared.lock().unwrap_or_else(PoisonError::into_inner);
                if slot.generation != generation {
                    return;
                }
                // From here on the save can no longer be aborted.
                slot.waiting = None;
            }
            // Outcome is published on the context channel.
            let _ = tracker.track(SyncChannel::Context, write).await;
        });
        slot.waiting = Some(handle.abort_handle());
        drop(slot);

        self.tracker.register(handle);
    }
}
