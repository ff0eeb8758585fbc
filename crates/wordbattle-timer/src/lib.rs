//! Per-turn deadline timer for Word Battle rooms.
//!
//! A room has at most one live deadline: the one for the current turn.
//! [`TurnTimer`] holds it together with the token of the turn it belongs
//! to. Re-arming replaces the old deadline outright, so a turn that ended
//! early can never time out later.
//!
//! # Integration
//!
//! The timer sits inside a room actor's `tokio::select!` loop:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(cmd) = cmd_rx.recv() => { /* apply the action */ }
//!         token = timer.expired() => {
//!             let events = room.on_timeout(token);
//!             dispatch(events);
//!         }
//!     }
//!     timer.sync(room.deadline().map(|d| (d.token, d.duration)));
//! }
//! ```
//!
//! While disarmed, [`TurnTimer::expired`] pends forever, so `select!`
//! only ever wakes for commands.

use std::time::Duration;

use tokio::time::{self, Instant};
use tracing::trace;

/// One cancellable deadline keyed by a turn token `K`.
#[derive(Debug)]
pub struct TurnTimer<K> {
    armed: Option<(K, Instant)>,
    fired: u64,
}

impl<K: Clone + PartialEq + std::fmt::Debug> TurnTimer<K> {
    /// Creates a disarmed timer.
    pub fn new() -> Self {
        Self {
            armed: None,
            fired: 0,
        }
    }

    /// Arms the deadline for `token`, `after` from now. Any previous
    /// deadline is dropped.
    pub fn arm(&mut self, token: K, after: Duration) {
        trace!(?token, after_ms = after.as_millis() as u64, "deadline armed");
        self.armed = Some((token, Instant::now() + after));
    }

    /// Drops the deadline, if any.
    pub fn disarm(&mut self) {
        if let Some((token, _)) = self.armed.take() {
            trace!(?token, "deadline disarmed");
        }
    }

    /// Brings the timer in line with the deadline the room wants.
    ///
    /// Re-arms only when the token changes, so syncing after an action
    /// that did not end the turn leaves the running clock alone.
    pub fn sync(&mut self, wanted: Option<(K, Duration)>) {
        match wanted {
            Some((token, after)) => {
                if self.token() != Some(&token) {
                    self.arm(token, after);
                }
            }
            None => self.disarm(),
        }
    }

    /// Token of the armed deadline.
    pub fn token(&self) -> Option<&K> {
        self.armed.as_ref().map(|(token, _)| token)
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Time left before the deadline. Zero when disarmed or overdue.
    pub fn remaining(&self) -> Duration {
        self.armed
            .as_ref()
            .map(|(_, at)| at.saturating_duration_since(Instant::now()))
            .unwrap_or(Duration::ZERO)
    }

    /// How many deadlines have elapsed over the timer's lifetime.
    pub fn fired(&self) -> u64 {
        self.fired
    }

    /// Resolves with the token once the armed deadline passes, and
    /// disarms.
    ///
    /// Cancel-safe: dropping the future before it resolves leaves the
    /// deadline armed.
    pub async fn expired(&mut self) -> K {
        let Some((_, at)) = self.armed else {
            return std::future::pending().await;
        };

        time::sleep_until(at).await;

        self.fired += 1;
        match self.armed.take() {
            Some((token, _)) => {
                trace!(?token, "deadline elapsed");
                token
            }
            None => std::future::pending().await,
        }
    }
}

impl<K: Clone + PartialEq + std::fmt::Debug> Default for TurnTimer<K> {
    fn default() -> Self {
        Self::new()
    }
}
