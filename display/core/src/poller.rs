//! Background Poll Worker
//!
//! Runs a [`Source`] on its own tokio task so a slow source never stalls
//! input handling or rendering. Requests and results each travel over a
//! single-slot channel and the worker refuses a second request while one is
//! outstanding, so at most one poll is ever in flight.
//!
//! ```text
//!   event loop ──request──▶ [slot] ──▶ worker task ──poll()──▶ Source
//!   event loop ◀──outcome── [slot] ◀──┘
//! ```

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::source::{Poll, Source, SourceError};

/// Result of one background poll
#[derive(Debug)]
pub enum PollOutcome {
    /// The source answered
    Ready(Poll),
    /// The poll exceeded the configured timeout and was cancelled
    TimedOut,
    /// The source returned an error
    Failed(SourceError),
}

/// Handle to the background poll task
pub struct PollWorker {
    requests: mpsc::Sender<()>,
    outcomes: mpsc::Receiver<PollOutcome>,
    in_flight: bool,
    handle: JoinHandle<()>,
}

impl PollWorker {
    /// Move `source` onto a background task
    ///
    /// With a `timeout`, a poll that takes longer is dropped and reported as
    /// [`PollOutcome::TimedOut`].
    pub fn spawn<S>(mut source: S, timeout: Option<Duration>) -> Self
    where
        S: Source + 'static,
    {
        let (request_tx, mut request_rx) = mpsc::channel::<()>(1);
        let (outcome_tx, outcome_rx) = mpsc::channel::<PollOutcome>(1);

        let handle = tokio::spawn(async move {
            while request_rx.recv().await.is_some() {
                let outcome = match timeout {
                    Some(limit) => match tokio::time::timeout(limit, source.poll()).await {
                        Ok(result) => into_outcome(result),
                        Err(_) => {
                            warn!(source = source.name(), timeout_ms = limit.as_millis() as u64, "Poll timed out");
                            PollOutcome::TimedOut
                        }
                    },
                    None => into_outcome(source.poll().await),
                };

                if outcome_tx.send(outcome).await.is_err() {
                    break;
                }
            }
            debug!(source = source.name(), "Poll worker stopped");
        });

        Self {
            requests: request_tx,
            outcomes: outcome_rx,
            in_flight: false,
            handle,
        }
    }

    /// Ask for a poll
    ///
    /// Returns `false` when a poll is already in flight or the worker has
    /// stopped; nothing is queued in that case.
    pub fn request(&mut self) -> bool {
        if self.in_flight {
            return false;
        }
        match self.requests.try_send(()) {
            Ok(()) => {
                self.in_flight = true;
                true
            }
            Err(_) => false,
        }
    }

    /// Whether a poll has been requested and not yet collected
    #[must_use]
    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Wait for the outstanding poll
    ///
    /// Cancel-safe, so it can sit in a `select!`. Returns `None` once the
    /// worker has stopped.
    pub async fn next(&mut self) -> Option<PollOutcome> {
        let outcome = self.outcomes.recv().await;
        self.in_flight = false;
        outcome
    }

    /// Request a poll and wait for it
    pub async fn poll_once(&mut self) -> Option<PollOutcome> {
        if !self.request() && !self.in_flight {
            return None;
        }
        self.next().await
    }
}

impl Drop for PollWorker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn into_outcome(result: Result<Poll, SourceError>) -> PollOutcome {
    match result {
        Ok(poll) => PollOutcome::Ready(poll),
        Err(e) => PollOutcome::Failed(e),
    }
}
