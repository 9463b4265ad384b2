//! The mutation engine.
//!
//! One [`Session`] is the single authoritative owner of a [`Project`];
//! every mutation goes through `&mut self` and leaves the sequence
//! contiguous (no gaps, no overlaps, no retained zero-length clips).
//! Readers borrow the project and must re-read after any mutation,
//! since indices and boundaries shift.

use crate::clip::{Clip, ImageOverlay, TextOverlay};
use crate::locate::{Location, clip_bounds, locate};
use crate::project::Project;
use crate::tolerance::EDGE_EPS_S;
use crossbeam::channel::{Receiver, Sender, unbounded};

/// Change notifications published by a [`Session`].
///
/// Every clip mutation emits `ClipsChanged` then `ProjectChanged`;
/// overlay and filter edits emit `OverlaysChanged`/`ProjectChanged`.
/// After `ClipsChanged` all previously computed indices and boundaries
/// are invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    ClipsChanged,
    OverlaysChanged,
    ProjectChanged,
}

pub struct Session {
    project: Project,
    subscribers: Vec<Sender<SessionEvent>>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self::with_project(Project::default())
    }

    pub fn with_project(project: Project) -> Self {
        Self {
            project,
            subscribers: Vec::new(),
        }
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    /// Register a listener; drop the receiver to unsubscribe.
    pub fn subscribe(&mut self) -> Receiver<SessionEvent> {
        let (sender, receiver) = unbounded();
        self.subscribers.push(sender);
        receiver
    }

    fn emit(&mut self, event: SessionEvent) {
        self.subscribers.retain(|s| s.send(event).is_ok());
    }

    fn emit_clips_changed(&mut self) {
        self.emit(SessionEvent::ClipsChanged);
        self.emit(SessionEvent::ProjectChanged);
    }

    fn emit_overlays_changed(&mut self) {
        self.emit(SessionEvent::OverlaysChanged);
        self.emit(SessionEvent::ProjectChanged);
    }

    // ----- read side -----

    /// Total sequence length in seconds.
    pub fn total_duration_s(&self) -> f64 {
        self.project.total_duration_s()
    }

    /// Fresh cumulative `(start, end)` bounds; never cached across a
    /// mutation.
    pub fn clip_bounds(&self) -> Vec<(f64, f64)> {
        clip_bounds(&self.project.clips)
    }

    /// Resolve a global timestamp against the current clip list.
    pub fn locate(&self, t_s: f64) -> Option<Location> {
        locate(&self.project.clips, t_s)
    }

    // ----- clip mutations -----

    /// Replace the whole sequence with a single clip.
    pub fn set_clip(&mut self, path: impl Into<String>, duration_s: f64) {
        let dur = duration_s.max(0.1);
        self.project.clips = vec![
            Clip::new(path)
                .with_out_s(dur)
                .with_duration_s(dur),
        ];
        self.emit_clips_changed();
    }

    /// Append a clip at the end of the sequence.
    pub fn add_clip(&mut self, clip: Clip) {
        self.project.clips.push(clip);
        self.emit_clips_changed();
    }

    /// Append a trimmed segment of `path` at the end of the sequence.
    pub fn add_video_clip(
        &mut self,
        path: impl Into<String>,
        in_s: f64,
        out_s: f64,
        duration: f64,
    ) -> Clip {
        let dur = if duration > 0.0 {
            duration
        } else {
            (out_s - in_s).max(0.0)
        };
        let clip = Clip::new(path)
            .with_in_s(in_s)
            .with_out_s(in_s + dur)
            .with_duration_s(dur);
        self.project.clips.push(clip.clone());
        self.emit_clips_changed();
        clip
    }

    /// Unconditional removal; downstream boundaries shift.
    pub fn remove_clip_at(&mut self, idx: usize) {
        if idx < self.project.clips.len() {
            self.project.clips.remove(idx);
            self.emit_clips_changed();
        }
    }

    /// Split clip `idx` in two at `local_s` seconds from its own start.
    ///
    /// Refuses out-of-range indices and cuts within [`EDGE_EPS_S`] of
    /// either edge: neither half may come out zero-length. The two
    /// halves partition the source range exactly and keep the same
    /// path. Returns whether the split happened.
    pub fn split_clip_at(&mut self, idx: usize, local_s: f64) -> bool {
        let clips = &mut self.project.clips;
        let Some(clip) = clips.get_mut(idx) else {
            return false;
        };

        let dur = clip.effective_duration();
        let cut = local_s.clamp(0.0, dur);
        if cut < EDGE_EPS_S || cut > dur - EDGE_EPS_S {
            return false;
        }

        let mut right = clip.clone();
        clip.duration_s = cut;
        clip.out_s = clip.in_s + cut;
        right.in_s = clip.out_s;
        right.duration_s = dur - cut;
        right.out_s = right.in_s + right.duration_s;
        clips.insert(idx + 1, right);

        self.emit_clips_changed();
        true
    }

    /// Remove the clip at `old_idx` and reinsert it at `new_idx`
    /// (clamped). Every boundary after the affected range moves.
    pub fn move_clip(&mut self, old_idx: usize, new_idx: usize) {
        if old_idx >= self.project.clips.len() {
            return;
        }
        let clip = self.project.clips.remove(old_idx);
        let new_idx = new_idx.min(self.project.clips.len());
        self.project.clips.insert(new_idx, clip);
        self.emit_clips_changed();
    }

    /// Insert a new clip so that it begins at global time `start_s`.
    ///
    /// A `start_s` on an existing boundary inserts between clips; one
    /// strictly inside a clip splits it first and drops the new clip
    /// between the halves; one past the end appends.
    pub fn add_clip_at(
        &mut self,
        path: impl Into<String>,
        start_s: f64,
        duration_s: f64,
    ) -> Clip {
        let start_s = start_s.max(0.0);
        let duration_s = duration_s.max(0.0);
        let new_clip = Clip::new(path)
            .with_out_s(duration_s)
            .with_duration_s(duration_s);

        let Some(at) = self.locate(start_s) else {
            // Empty sequence.
            self.project.clips.push(new_clip.clone());
            self.emit_clips_changed();
            return new_clip;
        };

        let dur = self.project.clips[at.index].effective_duration();
        if at.local_s < EDGE_EPS_S {
            self.project.clips.insert(at.index, new_clip.clone());
        } else if (at.local_s - dur).abs() < EDGE_EPS_S {
            // Clip end; also the past-the-end case resolved to the tail.
            self.project.clips.insert(at.index + 1, new_clip.clone());
        } else if self.split_clip_at(at.index, at.local_s) {
            self.project.clips.insert(at.index + 1, new_clip.clone());
        } else {
            // Split refused only on degenerate input.
            log::warn!("add_clip_at: split at {start_s:.6}s refused, appending");
            self.project.clips.push(new_clip.clone());
        }

        self.emit_clips_changed();
        new_clip
    }

    /// Remove the global interval `[a, b)` and close the gap.
    ///
    /// Splits at both edges so no clip straddles the interval, then
    /// drains the contiguous index range fully covered by it. The
    /// second split resolves against the post-split list: the first
    /// split shifts indices and offsets. A sub-epsilon interval is a
    /// silent no-op.
    pub fn delete_segment(&mut self, start_s: f64, end_s: f64) {
        let a = start_s.min(end_s);
        let b = start_s.max(end_s);
        if b - a <= 0.0 {
            return;
        }

        if let Some(at) = self.locate(a) {
            self.split_clip_at(at.index, at.local_s);
        }
        if let Some(at) = self.locate(b) {
            self.split_clip_at(at.index, at.local_s);
        }

        let bounds = self.clip_bounds();
        let mut covered = bounds
            .iter()
            .enumerate()
            .filter(|(_, (s, e))| *s >= a - EDGE_EPS_S && *e <= b + EDGE_EPS_S)
            .map(|(i, _)| i);

        let Some(first) = covered.next() else {
            log::debug!("delete_segment: nothing covered by [{a:.6}, {b:.6}]");
            return;
        };
        let last = covered.last().unwrap_or(first);

        self.project.clips.drain(first..=last);
        self.emit_clips_changed();
    }

    // ----- project-level mutations -----

    /// Install a freshly loaded project as the authoritative one.
    pub fn replace_project(&mut self, project: Project) {
        self.project = project;
        self.emit(SessionEvent::ClipsChanged);
        self.emit(SessionEvent::OverlaysChanged);
        self.emit(SessionEvent::ProjectChanged);
    }

    /// Rename the project; blank names are ignored.
    pub fn set_project_name(&mut self, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        self.project.name = name.to_string();
        self.emit(SessionEvent::ProjectChanged);
    }

    /// Update only the filter fields given as `Some`.
    pub fn set_filters(
        &mut self,
        brightness: Option<f32>,
        contrast: Option<f32>,
        saturation: Option<f32>,
        vignette: Option<bool>,
    ) {
        let filters = &mut self.project.filters;
        if let Some(v) = brightness {
            filters.brightness = v;
        }
        if let Some(v) = contrast {
            filters.contrast = v;
        }
        if let Some(v) = saturation {
            filters.saturation = v;
        }
        if let Some(v) = vignette {
            filters.vignette = v;
        }
        self.emit(SessionEvent::ProjectChanged);
    }

    pub fn add_text_overlay(&mut self, overlay: TextOverlay) {
        self.project.text_overlays.push(overlay);
        self.emit_overlays_changed();
    }

    pub fn remove_last_text_overlay(&mut self) {
        if self.project.text_overlays.pop().is_some() {
            self.emit_overlays_changed();
        }
    }

    pub fn update_last_overlay_text(&mut self, text: impl Into<String>) {
        let Some(overlay) = self.project.text_overlays.last_mut() else {
            return;
        };
        overlay.text = text.into();
        self.emit_overlays_changed();
    }

    /// Move the last overlay's start, dragging the end along if needed.
    pub fn set_last_overlay_start(&mut self, start_s: f64) {
        let Some(overlay) = self.project.text_overlays.last_mut() else {
            return;
        };
        overlay.start = start_s.max(0.0);
        if overlay.end < overlay.start {
            overlay.end = overlay.start;
        }
        self.emit_overlays_changed();
    }

    /// Move the last overlay's end, dragging the start along if needed.
    pub fn set_last_overlay_end(&mut self, end_s: f64) {
        let Some(overlay) = self.project.text_overlays.last_mut() else {
            return;
        };
        overlay.end = end_s.max(0.0);
        if overlay.end < overlay.start {
            overlay.start = overlay.end;
        }
        self.emit_overlays_changed();
    }

    pub fn add_image_overlay(&mut self, path: impl Into<String>, start_s: f64, duration_s: f64) {
        self.project.image_overlays.push(ImageOverlay {
            path: path.into(),
            start: start_s,
            end: start_s + duration_s,
            ..ImageOverlay::default()
        });
        self.emit_overlays_changed();
    }

    pub fn remove_last_image_overlay(&mut self) {
        if self.project.image_overlays.pop().is_some() {
            self.emit_overlays_changed();
        }
    }
}
