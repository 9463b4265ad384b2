//! The sequence playback driver.

use crate::backend::{BackendEvent, MediaBackend};
use crossbeam::channel::{Receiver, Sender, unbounded};
use timeline::Clip;

/// Auto-advance window, in milliseconds: a position this close to the
/// current clip's global end hands playback to the next clip.
pub const ADVANCE_MARGIN_MS: u64 = 2;

/// Notifications republished by [`SequencePlayer`], in global time.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    /// Global position, ms from sequence start.
    PositionChanged(u64),

    /// Total sequence duration, ms.
    DurationChanged(u64),

    /// Backend failure surfaced to the user; player state is unchanged.
    Error(String),
}

/// Stateful wrapper presenting a clip sequence as one video.
///
/// Holds a snapshot of the clip list and its global ms boundaries;
/// [`SequencePlayer::rebuild`] must be called whenever the authoritative
/// clip list changes, since every mutation invalidates indices and
/// boundaries.
pub struct SequencePlayer<B: MediaBackend> {
    backend: B,
    backend_events: Receiver<BackendEvent>,
    clips: Vec<Clip>,
    boundaries_ms: Vec<(u64, u64)>,
    total_ms: u64,
    current: Option<usize>,
    /// Re-entrancy guard: suppresses position feedback while a
    /// programmatic load+seek is in flight. Stale positions from the
    /// clip being unloaded are dropped, never queued.
    loading: bool,
    subscribers: Vec<Sender<PlayerEvent>>,
}

impl<B: MediaBackend> SequencePlayer<B> {
    pub fn new(backend: B) -> Self {
        let backend_events = backend.events();
        Self {
            backend,
            backend_events,
            clips: Vec::new(),
            boundaries_ms: Vec::new(),
            total_ms: 0,
            current: None,
            loading: false,
            subscribers: Vec::new(),
        }
    }

    /// Register a listener; drop the receiver to unsubscribe.
    pub fn subscribe(&mut self) -> Receiver<PlayerEvent> {
        let (sender, receiver) = unbounded();
        self.subscribers.push(sender);
        receiver
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn total_ms(&self) -> u64 {
        self.total_ms
    }

    /// Index of the clip currently loaded in the backend.
    pub fn current_clip(&self) -> Option<usize> {
        self.current
    }

    fn emit(&mut self, event: PlayerEvent) {
        self.subscribers.retain(|s| s.send(event.clone()).is_ok());
    }

    // ----- transport -----

    pub fn play(&mut self) {
        self.backend.play();
    }

    pub fn pause(&mut self) {
        self.backend.pause();
    }

    pub fn stop(&mut self) {
        self.backend.stop();
        self.seek_ms(0);
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.backend.set_volume(volume);
    }

    /// Seek to a global position, clamped to `[0, total]`. Loads the
    /// owning clip's file if it is not the one already loaded.
    pub fn seek_ms(&mut self, global_ms: u64) {
        if self.clips.is_empty() {
            self.emit(PlayerEvent::PositionChanged(0));
            return;
        }
        let g = global_ms.min(self.total_ms);
        let (idx, local_ms) = self.locate_ms(g);
        self.switch_if_needed(idx, local_ms);
        self.emit(PlayerEvent::PositionChanged(g));
    }

    /// Best-effort global position between notifications, clamped to
    /// the current clip's end.
    pub fn position_ms(&self) -> u64 {
        let Some(idx) = self.current else {
            return 0;
        };
        let Some(&(start, end)) = self.boundaries_ms.get(idx) else {
            return 0;
        };
        (start + self.backend.position_ms()).min(end)
    }

    // ----- clip list tracking -----

    /// Recompute boundaries from the authoritative clip list.
    ///
    /// Republishes the total duration; an emptied list resets the
    /// loaded-clip index and the published position.
    pub fn rebuild(&mut self, clips: &[Clip]) {
        self.clips = clips.to_vec();
        self.boundaries_ms.clear();

        let mut acc = 0u64;
        for clip in &self.clips {
            let dur_ms = (clip.effective_duration() * 1000.0) as u64;
            self.boundaries_ms.push((acc, acc + dur_ms));
            acc += dur_ms;
        }
        self.total_ms = acc;
        self.emit(PlayerEvent::DurationChanged(acc));

        if self.clips.is_empty() {
            self.current = None;
            self.emit(PlayerEvent::PositionChanged(0));
        }
    }

    /// `(clip index, offset from the clip's start)` for a global ms
    /// position. Callers guarantee a non-empty list.
    fn locate_ms(&self, global_ms: u64) -> (usize, u64) {
        let last = self.boundaries_ms.len() - 1;
        for (i, &(start, end)) in self.boundaries_ms.iter().enumerate() {
            if (start <= global_ms && global_ms < end) || (global_ms == end && i == last) {
                return (i, global_ms - start);
            }
        }
        (last, 0)
    }

    /// Load a new file when the target clip differs from the loaded
    /// one, then seek inside the source (`in_ms + local_ms`); a plain
    /// seek otherwise.
    fn switch_if_needed(&mut self, idx: usize, local_ms: u64) {
        let Some(clip) = self.clips.get(idx) else {
            return;
        };
        let in_ms = (clip.in_s * 1000.0) as u64;
        let target_ms = in_ms + local_ms;

        if self.current != Some(idx) {
            self.current = Some(idx);
            self.loading = true;
            self.backend.load(&clip.path);
            self.backend.seek_ms(target_ms);
            // Positions emitted for the outgoing clip must not leak into
            // the global stream: dropped here, never queued.
            while let Ok(event) = self.backend_events.try_recv() {
                match event {
                    BackendEvent::PositionChanged(ms) => {
                        log::debug!("dropping stale position {ms}ms");
                    }
                    other => self.handle_backend_event(other),
                }
            }
            self.loading = false;
        } else {
            self.backend.seek_ms(target_ms);
        }
    }

    // ----- backend feedback -----

    /// Drain pending backend notifications.
    pub fn pump_events(&mut self) {
        while let Ok(event) = self.backend_events.try_recv() {
            self.handle_backend_event(event);
        }
    }

    pub fn handle_backend_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::PositionChanged(local_abs_ms) => {
                self.on_backend_position_changed(local_abs_ms);
            }
            BackendEvent::DurationKnown(ms) => {
                // Sequence durations come from the clip model, not the
                // backend; import-time probing uses `probe_duration`.
                log::debug!("backend duration known: {ms}ms");
            }
            BackendEvent::Error(message) => {
                log::warn!("media backend error: {message}");
                self.backend.pause();
                self.emit(PlayerEvent::Error(message));
            }
        }
    }

    /// Fold a backend position (ms from the start of the source file)
    /// into the global position stream, crossing clip boundaries.
    fn on_backend_position_changed(&mut self, local_abs_ms: u64) {
        if self.loading {
            return;
        }
        let Some(idx) = self.current else {
            return;
        };
        let Some(&(start_g, end_g)) = self.boundaries_ms.get(idx) else {
            return;
        };
        let Some(clip) = self.clips.get(idx) else {
            return;
        };

        let in_ms = (clip.in_s * 1000.0) as u64;
        let local_rel_ms = local_abs_ms.saturating_sub(in_ms);
        let g = start_g + local_rel_ms;
        self.emit(PlayerEvent::PositionChanged(g.min(self.total_ms)));

        // Hand over to the next clip just before the boundary so
        // playback crosses it without a stall or a doubled frame.
        if g + ADVANCE_MARGIN_MS >= end_g {
            let next = idx + 1;
            if next < self.clips.len() {
                self.switch_if_needed(next, 0);
            } else {
                self.backend.pause();
            }
        }
    }
}
