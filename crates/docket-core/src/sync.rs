//! Observable background persistence.
//!
//! Writes that should not hold up the user (progress updates, context saves)
//! run as spawned tasks. Their outcome is published on a
//! `tokio::sync::watch` channel per [`SyncChannel`], so a caller can report a
//! failed save instead of losing it, and [`SyncTracker::flush`] waits for
//! everything still in flight.

use std::{
    fmt,
    future::Future,
    sync::{Arc, Mutex, PoisonError},
};

use log::{debug, warn};
use tokio::{sync::watch, task::JoinHandle};

use crate::error::Result;

/// Outcome of the most recent write on a channel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SyncState {
    /// Nothing has been written yet
    #[default]
    Idle,
    InFlight,
    Synced,
    /// The last write failed; local state was kept
    Failed(String),
}

impl SyncState {
    pub fn is_failed(&self) -> bool {
        matches!(self, SyncState::Failed(_))
    }
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncState::Idle => write!(f, "idle"),
            SyncState::InFlight => write!(f, "in flight"),
            SyncState::Synced => write!(f, "synced"),
            SyncState::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Kinds of background write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncChannel {
    Progress,
    Context,
}

impl fmt::Display for SyncChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncChannel::Progress => write!(f, "progress"),
            SyncChannel::Context => write!(f, "context"),
        }
    }
}

struct Inner {
    progress: watch::Sender<SyncState>,
    context: watch::Sender<SyncState>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

/// Publishes the state of background writes. Clones share state.
#[derive(Clone)]
pub struct SyncTracker {
    inner: Arc<Inner>,
}

impl Default for SyncTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncTracker {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                progress: watch::Sender::new(SyncState::Idle),
                context: watch::Sender::new(SyncState::Idle),
                tasks: Mutex::new(Vec::new()),
            }),
        }
    }

    fn sender(&self, channel: SyncChannel) -> &watch::Sender<SyncState> {
        match channel {
            SyncChannel::Progress => &self.inner.progress,
            SyncChannel::Context => &self.inner.context,
        }
    }

    /// Current state of a channel.
    pub fn state(&self, channel: SyncChannel) -> SyncState {
        self.sender(channel).borrow().clone()
    }

    /// Receiver that observes every future state change of a channel.
    pub fn subscribe(&self, channel: SyncChannel) -> watch::Receiver<SyncState> {
        self.sender(channel).subscribe()
    }

    fn publish(&self, channel: SyncChannel, state: SyncState) {
        self.sender(channel).send_replace(state);
    }

    /// Runs a write and publishes its outcome.
    ///
    /// Failures are logged and published, then returned to the caller.
    pub async fn track<F>(&self, channel: SyncChannel, write: F) -> Result<()>
    where
        F: Future<Output = Result<()>>,
    {
        self.publish(channel, SyncState::InFlight);
        match write.await {
            Ok(()) => {
                debug!("{channel} write synced");
                self.publish(channel, SyncState::Synced);
                Ok(())
            }
            Err(e) => {
                warn!("{channel} write failed: {e}");
                self.publish(channel, SyncState::Failed(e.to_string()));
                Err(e)
            }
        }
    }

    /// Runs a write in the background; its outcome is only published.
    pub fn spawn<F>(&self, channel: SyncChannel, write: F)
    where
        F: Future<Output = Result<()>> + Send + 'static,
    {
        let tracker = self.clone();
        let handle = tokio::spawn(async move {
            // The outcome lives on the watch channel.
            let _ = tracker.track(channel, write).await;
        });
        self.register(handle);
    }

    /// Adds a task for [`SyncTracker::flush`] to wait on.
    pub fn register(&self, handle: JoinHandle<()>) {
        let mut tasks = self
            .inner
            .tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        tasks.retain(|task| !task.is_finished());
        tasks.push(handle);
    }

    /// Waits for every registered task, including ones registered while
    /// waiting.
    pub async fn flush(&self) {
        loop {
            let tasks: Vec<JoinHandle<()>> = {
                let mut guard = self
                    .inner
                    .tasks
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);
                std::mem::take(&mut *guard)
            };
            if tasks.is_empty() {
                return;
            }
            for task in tasks {
                if let Err(e) = task.await {
                    if !e.is_cancelled() {
                        warn!("Background write task failed: {e}");
                    }
                }
            }
        }
    }

    /// Channels whose last write failed, with the reason.
    pub fn failures(&self) -> Vec<(SyncChannel, String)> {
        [SyncChannel::Progress, SyncChannel::Context]
            .into_iter()
            .filter_map(|channel| match self.state(channel) {
                SyncState::Failed(reason) => Some((channel, reason)),
                _ => None,
            })
            .collect()
    }
}
