//! Timeline core of a non-linear video sequence editor.
//!
//! A sequence is one ordered list of [`Clip`]s laid out back to back:
//! insertion order is temporal order, clip 0 starts at global time 0,
//! and there are no gaps and no overlaps. The crate provides the data
//! model, the global-time to clip-local-time resolver ([`locate`]), the
//! mutation engine ([`Session`]) and the read-only projection consumed
//! by a timeline view ([`timeline_items`]).

pub mod clip;
pub mod items;
pub mod locate;
pub mod project;
pub mod session;
pub mod tolerance;

pub use clip::{Clip, Filters, ImageOverlay, TextOverlay};
pub use items::{TimelineItem, timeline_items, total_sequence_duration_ms};
pub use locate::{Location, clip_bounds, locate};
pub use project::Project;
pub use session::{Session, SessionEvent};
pub use tolerance::{EDGE_EPS_S, SCAN_EPS_S};
