//! Tick Schedule
//!
//! A re-armable one-shot timer on the tokio clock. There is a single
//! deadline slot, so arming always replaces whatever was pending and at most
//! one tick can be armed. Disarming is just clearing the slot.

use std::time::Duration;

use tokio::time::Instant;

/// At-most-one pending tick
#[derive(Clone, Debug, Default)]
pub struct TickSchedule {
    deadline: Option<Instant>,
}

impl TickSchedule {
    /// Create a disarmed schedule
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the next tick `delay` from now, replacing any pending one
    pub fn arm(&mut self, delay: Duration) {
        self.deadline = Some(Instant::now() + delay);
    }

    /// Drop the pending tick, if any
    pub fn disarm(&mut self) {
        self.deadline = None;
    }

    /// Whether a tick is pending
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// When the pending tick fires
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Resolve when the pending tick is due; never resolves when disarmed
    ///
    /// Does not consume the deadline: the caller disarms (or re-arms) once it
    /// starts running the tick. Cancel-safe.
    pub async fn wait(&self) {
        match self.deadline {
            Some(deadline) => tokio::time::sleep_until(deadline).await,
            None => std::future::pending().await,
        }
    }
}
