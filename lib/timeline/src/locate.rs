//! The boundary resolver: global time to (clip, local offset).
//!
//! Pure functions over a clip slice. Nothing here caches: every
//! mutation invalidates all previously computed boundaries, so callers
//! recompute instead of holding on to results.

use crate::clip::Clip;
use crate::tolerance::{EDGE_EPS_S, SCAN_EPS_S};

/// Where a global timestamp landed on the sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub index: usize,
    /// Offset from the owning clip's own start, in seconds.
    pub local_s: f64,
}

/// Cumulative `(start, end)` global bounds for each clip, in seconds.
pub fn clip_bounds(clips: &[Clip]) -> Vec<(f64, f64)> {
    let mut bounds = Vec::with_capacity(clips.len());
    let mut acc = 0.0;
    for clip in clips {
        let end = acc + clip.effective_duration();
        bounds.push((acc, end));
        acc = end;
    }
    bounds
}

/// Map a global timestamp to the clip owning it.
///
/// Left-inclusive, right-exclusive, except that the last clip also
/// accepts its right edge so callers can seek to the very end of the
/// sequence; anything further past the end clamps to end-of-last-clip.
/// `None` for an empty sequence or a negative timestamp.
pub fn locate(clips: &[Clip], t_s: f64) -> Option<Location> {
    if clips.is_empty() || t_s < 0.0 {
        return None;
    }

    let last = clips.len() - 1;
    let mut acc = 0.0;
    for (i, clip) in clips.iter().enumerate() {
        let dur = clip.effective_duration();
        let (start, end) = (acc, acc + dur);
        let in_span = (start - SCAN_EPS_S) <= t_s && t_s < (end - SCAN_EPS_S);
        let at_last_edge = i == last && (t_s - end).abs() < EDGE_EPS_S;
        if in_span || at_last_edge {
            return Some(Location {
                index: i,
                local_s: (t_s - start).clamp(0.0, dur),
            });
        }
        acc = end;
    }

    // Past the end: point at the end of the last clip.
    Some(Location {
        index: last,
        local_s: clips[last].effective_duration(),
    })
}
