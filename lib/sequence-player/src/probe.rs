//! One-shot "wait for the duration, then act" plumbing.
//!
//! Importing a file of unknown length must not act on the previously
//! loaded file's duration: the new value only exists once the backend
//! reports [`BackendEvent::DurationKnown`], exactly once per load.

use crate::backend::{BackendEvent, MediaBackend};
use crossbeam::channel::RecvTimeoutError;
use std::time::{Duration, Instant};

/// A latch that accepts the first value offered and refuses the rest.
///
/// Replaces the subscribe-then-disconnect-inside-the-handler pattern
/// around one-shot media events: after the first [`SingleShot::fire`]
/// the latch is spent and later fires are no-ops.
#[derive(Debug, Default)]
pub struct SingleShot<T> {
    value: Option<T>,
    spent: bool,
}

impl<T> SingleShot<T> {
    pub fn new() -> Self {
        Self {
            value: None,
            spent: false,
        }
    }

    /// Offer a value. Accepted (and `true`) on the first call only.
    pub fn fire(&mut self, value: T) -> bool {
        if self.spent {
            return false;
        }
        self.value = Some(value);
        self.spent = true;
        true
    }

    pub fn is_spent(&self) -> bool {
        self.spent
    }

    /// The captured value, if anything fired yet.
    pub fn take(&mut self) -> Option<T> {
        self.value.take()
    }
}

/// Load `path` and block until the backend reports its duration.
///
/// Events from the file being unloaded (positions, in particular) are
/// discarded while waiting. `None` on timeout, on a backend error, or
/// on a disconnected event channel.
pub fn probe_duration<B: MediaBackend>(
    backend: &mut B,
    path: &str,
    timeout: Duration,
) -> Option<u64> {
    let events = backend.events();
    backend.load(path);

    let mut shot = SingleShot::new();
    let deadline = Instant::now() + timeout;
    while !shot.is_spent() {
        let now = Instant::now();
        if now >= deadline {
            log::warn!("probing {path} timed out");
            return None;
        }
        match events.recv_timeout(deadline - now) {
            Ok(BackendEvent::DurationKnown(ms)) => {
                shot.fire(ms);
            }
            Ok(BackendEvent::Error(message)) => {
                log::warn!("probing {path} failed: {message}");
                return None;
            }
            Ok(BackendEvent::PositionChanged(_)) => continue,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                log::warn!("probing {path} timed out");
                return None;
            }
        }
    }
    shot.take()
}
