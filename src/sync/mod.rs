//! Keeps a local copy of a live session in step with the server.
//!
//! [`LiveSessionSync`] is either idle (no session id) or polling. While polling it
//! fetches the record right away and then every [`POLL_INTERVAL`], and publishes
//! the result through a `watch` channel only when it differs from what was seen
//! last. Writes go straight upstream; the writer sees its own change on the next
//! poll, never earlier.
//!
//! Read and write failures never stop the loop. They are logged and counted in
//! [`SyncHealth`] so a caller can notice a server that stays unreachable.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use serde_json::{Map, Value};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::models::live_session::{sanitize_patch, LiveSession};

pub mod accessor;

pub use accessor::{AccessError, HttpLiveSessionAccessor, LiveSessionAccessor};

pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncHealth {
    /// Failed reads or writes since the last successful poll.
    pub consecutive_failures: u32,
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SyncState {
    pub session_id: Option<String>,
    pub snapshot: Option<LiveSession>,
    /// True from activation until the first poll settles.
    pub loading: bool,
    /// Incremented once per observed change of `snapshot`.
    pub revision: u64,
    pub health: SyncHealth,
    generation: u64,
}

pub struct LiveSessionSync<A: LiveSessionAccessor> {
    accessor: Arc<A>,
    state: Arc<watch::Sender<SyncState>>,
    poller: Option<JoinHandle<()>>,
    interval: Duration,
}

impl<A: LiveSessionAccessor> LiveSessionSync<A> {
    pub fn new(accessor: Arc<A>) -> Self {
        Self::with_interval(accessor, POLL_INTERVAL)
    }

    pub fn with_interval(accessor: Arc<A>, interval: Duration) -> Self {
        let (state, _) = watch::channel(SyncState::default());
        Self {
            accessor,
            state: Arc::new(state),
            poller: None,
            interval,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SyncState> {
        self.state.subscribe()
    }

    /// Copy of the current state.
    pub fn state(&self) -> SyncState {
        self.state.borrow().clone()
    }

    /// Points the synchronizer at `session_id`, or idles it with `None`.
    ///
    /// Any previous poller is stopped and the snapshot cleared before the new one
    /// starts. Re-activating the id already being polled does nothing.
    pub fn activate(&mut self, session_id: Option<String>) {
        let current = self.state.borrow().session_id.clone();
        if current == session_id && (session_id.is_none() || self.poller.is_some()) {
            return;
        }

        if let Some(poller) = self.poller.take() {
            poller.abort();
        }

        let mut generation = 0;
        self.state.send_modify(|state| {
            state.generation += 1;
            generation = state.generation;
            state.session_id = session_id.clone();
            state.snapshot = None;
            state.loading = session_id.is_some();
            state.health = SyncHealth::default();
        });

        match session_id {
            Some(id) => {
                debug!("Polling live session {} every {:?}", id, self.interval);
                self.poller = Some(tokio::spawn(poll_loop(
                    Arc::clone(&self.accessor),
                    Arc::clone(&self.state),
                    id,
                    generation,
                    self.interval,
                )));
            }
            None => debug!("Live session sync idle"),
        }
    }

    pub fn deactivate(&mut self) {
        self.activate(None);
    }

    /// Sends a partial update upstream. Identity and timestamp keys are dropped.
    ///
    /// Local state is left alone; the change shows up on the next poll.
    pub async fn update(&self, patch: Map<String, Value>) {
        let (session_id, generation) = {
            let state = self.state.borrow();
            (state.session_id.clone(), state.generation)
        };
        let Some(id) = session_id else {
            warn!("Ignoring live session update while idle");
            return;
        };

        if let Err(e) = self
            .accessor
            .update_live_session(&id, sanitize_patch(patch))
            .await
        {
            warn!("Failed to update live session {}: {}", id, e);
            self.state.send_if_modified(|state| {
                if state.generation != generation {
                    return false;
                }
                state.health.consecutive_failures += 1;
                state.health.last_error = Some(e.to_string());
                true
            });
        }
    }
}

impl<A: LiveSessionAccessor> Drop for LiveSessionSync<A> {
    fn drop(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.abort();
        }
    }
}

async fn poll_loop<A: LiveSessionAccessor>(
    accessor: Arc<A>,
    state: Arc<watch::Sender<SyncState>>,
    id: String,
    generation: u64,
    period: Duration,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        // First tick completes immediately.
        ticker.tick().await;
        let result = accessor.get_live_session(&id).await;
        if let Err(e) = &result {
            warn!("Failed to poll live session {}: {}", id, e);
        }
        apply_poll_result(&state, generation, result);
    }
}

/// Folds one poll into the state. Results from an older generation are dropped.
/// Returns whether subscribers were notified.
fn apply_poll_result(
    state: &watch::Sender<SyncState>,
    generation: u64,
    result: Result<LiveSession, AccessError>,
) -> bool {
    state.send_if_modified(|state| {
        if state.generation != generation {
            return false;
        }

        let mut notify = false;
        if state.loading {
            state.loading = false;
            notify = true;
        }

        match result {
            Ok(session) => {
                if state.health != SyncHealth::default() {
                    state.health = SyncHealth::default();
                    notify = true;
                }
                if state.snapshot.as_ref() != Some(&session) {
                    state.snapshot = Some(session);
                    state.revision += 1;
                    notify = true;
                }
            }
            Err(e) => {
                state.health.consecutive_failures += 1;
                state.health.last_error = Some(e.to_string());
                notify = true;
            }
        }
        notify
    })
}
