//! Read-only projection of the clip list for a timeline view.

use crate::clip::Clip;

/// Default fill color for clip blocks in the timeline view.
pub const ITEM_COLOR: &str = "#7fb3ff";

/// One renderable block in the timeline view.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineItem {
    pub start_s: f64,
    pub duration_s: f64,
    pub label: String,
    pub color: String,
}

/// Project the clip list into display items, back to back from global
/// time zero. Zero-length clips produce no item.
pub fn timeline_items(clips: &[Clip]) -> Vec<TimelineItem> {
    let mut items = Vec::with_capacity(clips.len());
    let mut acc = 0.0;
    for clip in clips {
        let dur = clip.effective_duration();
        if dur <= 0.0 {
            continue;
        }
        items.push(TimelineItem {
            start_s: acc,
            duration_s: dur,
            label: clip.path.clone(),
            color: ITEM_COLOR.to_string(),
        });
        acc += dur;
    }
    items
}

/// Total sequence length in whole milliseconds.
pub fn total_sequence_duration_ms(clips: &[Clip]) -> u64 {
    let total_s: f64 = clips.iter().map(Clip::effective_duration).sum();
    (total_s * 1000.0) as u64
}
