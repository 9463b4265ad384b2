use crate::clip::{Clip, Filters, ImageOverlay, TextOverlay};
use derivative::Derivative;
use serde::{Deserialize, Serialize};

/// Aggregate root: everything a saved project contains.
///
/// The clip list is the timeline; its order is temporal order. The
/// remaining fields are read by external collaborators (exporter,
/// overlay canvas, settings UI).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Derivative)]
#[derivative(Default)]
pub struct Project {
    #[derivative(Default(value = "\"New project\".to_string()"))]
    pub name: String,

    #[derivative(Default(value = "(1920, 1080)"))]
    pub resolution: (u32, u32),

    #[derivative(Default(value = "30.0"))]
    pub fps: f32,

    #[derivative(Default(value = "\"exports/output.mp4\".to_string()"))]
    pub output: String,

    #[derivative(Default(value = "true"))]
    pub audio_normalize: bool,

    #[serde(default)]
    pub clips: Vec<Clip>,

    #[serde(default)]
    pub text_overlays: Vec<TextOverlay>,

    #[serde(default)]
    pub image_overlays: Vec<ImageOverlay>,

    #[serde(default)]
    pub filters: Filters,

    #[serde(default)]
    pub imported_assets: Vec<String>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Total sequence length in seconds.
    pub fn total_duration_s(&self) -> f64 {
        self.clips.iter().map(Clip::effective_duration).sum()
    }

    /// Rejects a zero-sized frame; returns whether the value was taken.
    pub fn set_resolution(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            log::warn!("rejected resolution {width}x{height}");
            return false;
        }
        self.resolution = (width, height);
        true
    }

    /// Rejects a non-positive frame rate; returns whether the value was
    /// taken.
    pub fn set_fps(&mut self, fps: f32) -> bool {
        if fps <= 0.0 {
            log::warn!("rejected fps {fps}");
            return false;
        }
        self.fps = fps;
        true
    }
}
