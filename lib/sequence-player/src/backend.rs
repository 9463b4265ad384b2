//! The single-file media backend seam.

use crossbeam::channel::Receiver;

/// Notifications a backend publishes while loading and playing.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendEvent {
    /// The loaded file's duration became known, in ms. `load` completes
    /// asynchronously; this event is the only way to observe the new
    /// duration.
    DurationKnown(u64),

    /// Playback position in ms from the start of the loaded *file*, not
    /// from the clip's in-point.
    PositionChanged(u64),

    /// A user-visible failure (file missing, decoder error, ...).
    Error(String),
}

/// One loaded media file at a time, millisecond positions relative to
/// that file.
///
/// `load` is fire-and-forget: completion arrives on the event channel,
/// never as a return value. There is no cancellation; loading again
/// while a load is in flight replaces the pending target (last write
/// wins). A `seek_ms` issued right after `load` queues against the
/// incoming file.
pub trait MediaBackend {
    fn load(&mut self, path: &str);
    fn play(&mut self);
    fn pause(&mut self);
    fn stop(&mut self);
    fn seek_ms(&mut self, ms: u64);
    fn set_volume(&mut self, volume: f32);
    fn position_ms(&self) -> u64;
    fn duration_ms(&self) -> u64;

    /// Clone of the backend's notification channel.
    fn events(&self) -> Receiver<BackendEvent>;
}
