// Camera status polling
//
// StatusPoller runs one background task per watched camera: an immediate
// status check, then one check per interval until stopped. The latest result
// is published on a watch channel.
//
// Each poll stands alone: a failed poll sets `error` and clears `status`,
// so a view never shows a stale status next to a fresh error.
//
// Stopping (explicitly or by dropping the handle) prevents further polls.
// A request that is already in flight runs to completion; it is not aborted.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::camera::CameraStatusReport;
use crate::client::BackendClient;

/// Latest polling result for one camera
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollState {
    /// Last successful report; `None` before the first success and after a failure
    pub status: Option<CameraStatusReport>,
    /// Message of the last failed poll; cleared when a new poll starts
    pub error: Option<String>,
    /// A request is in flight
    pub is_loading: bool,
    /// Number of completed polls
    pub polls: u64,
}

/// Shortest interval a poller will run at; shorter requests are raised to it
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Spawns status polling tasks
pub struct StatusPoller;

impl StatusPoller {
    /// Start polling `camera_id` every `interval`, beginning immediately
    ///
    /// An interval below [`MIN_POLL_INTERVAL`] (including zero) is raised to it.
    pub fn spawn(
        client: Arc<dyn BackendClient>,
        camera_id: Uuid,
        interval: Duration,
    ) -> PollerHandle {
        if interval < MIN_POLL_INTERVAL {
            warn!(
                camera_id = %camera_id,
                requested_ms = interval.as_millis() as u64,
                "Poll interval too short; using minimum"
            );
        }
        let interval = interval.max(MIN_POLL_INTERVAL);
        let (state_tx, state_rx) = watch::channel(PollState::default());
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let refresh = Arc::new(Notify::new());
        let refresh_signal = Arc::clone(&refresh);

        debug!(camera_id = %camera_id, interval_ms = interval.as_millis() as u64, "Starting status poller");

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = shutdown_rx.changed() => {
                        debug!(camera_id = %camera_id, "Status poller: shutdown requested");
                        break;
                    }
                    _ = refresh_signal.notified() => {
                        ticker.reset();
                    }
                    _ = ticker.tick() => {}
                }

                poll_once(client.as_ref(), camera_id, &state_tx).await;
            }

            debug!(camera_id = %camera_id, "Status poller exited");
        });

        PollerHandle {
            camera_id,
            state_rx,
            shutdown_tx,
            refresh,
            task: Some(task),
        }
    }
}

async fn poll_once(
    client: &dyn BackendClient,
    camera_id: Uuid,
    state_tx: &watch::Sender<PollState>,
) {
    state_tx.send_modify(|state| {
        state.is_loading = true;
        state.error = None;
    });

    let result = client.check_status(camera_id).await;

    state_tx.send_modify(|state| {
        match result {
            Ok(report) => {
                state.status = Some(report);
                state.error = None;
            }
            Err(e) => {
                warn!(camera_id = %camera_id, error = %e, "Camera status check failed");
                state.status = None;
                state.error = Some(e.to_string());
            }
        }
        state.is_loading = false;
        state.polls += 1;
    });
}

/// Owns a running poller. Dropping the handle stops polling.
pub struct PollerHandle {
    camera_id: Uuid,
    state_rx: watch::Receiver<PollState>,
    shutdown_tx: watch::Sender<bool>,
    refresh: Arc<Notify>,
    task: Option<JoinHandle<()>>,
}

impl PollerHandle {
    pub fn camera_id(&self) -> Uuid {
        self.camera_id
    }

    /// Current state
    pub fn state(&self) -> PollState {
        self.state_rx.borrow().clone()
    }

    /// A receiver for observing state changes
    pub fn subscribe(&self) -> watch::Receiver<PollState> {
        self.state_rx.clone()
    }

    /// Wait until `count` polls have completed and return the state at that point
    ///
    /// Returns `None` if the poller stopped first.
    pub async fn wait_for_polls(&mut self, count: u64) -> Option<PollState> {
        loop {
            {
                let state = self.state_rx.borrow_and_update();
                if state.polls >= count {
                    return Some(state.clone());
                }
            }
            if self.state_rx.changed().await.is_err() {
                return None;
            }
        }
    }

    /// Check now instead of waiting for the next tick
    pub fn refresh(&self) {
        self.refresh.notify_one();
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop polling and wait for the task to exit (after any in-flight poll)
    pub async fn stop(mut self) {
        let _ = self.shutdown_tx.send(true);
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(camera_id = %self.camera_id, error = %e, "Status poller task failed");
            }
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        if self.task.is_some() {
            let _ = self.shutdown_tx.send(true);
        }
    }
}
