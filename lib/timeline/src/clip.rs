use derivative::Derivative;
use derive_setters::Setters;
use serde::{Deserialize, Serialize};

/// One media segment on the timeline.
///
/// `in_s`/`out_s` are entry/exit points inside the source file, in
/// seconds. `duration_s` is the authoritative length of the segment on
/// the timeline; when it is zero the source range is used instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Setters)]
#[setters(prefix = "with_")]
pub struct Clip {
    pub path: String,

    #[serde(default)]
    pub in_s: f64,

    #[serde(default)]
    pub out_s: f64,

    #[serde(default)]
    pub duration_s: f64,
}

impl Clip {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            in_s: 0.0,
            out_s: 0.0,
            duration_s: 0.0,
        }
    }

    /// Effective length on the timeline in seconds: `duration_s` when
    /// positive, otherwise the source range, never negative.
    pub fn effective_duration(&self) -> f64 {
        if self.duration_s > 0.0 {
            return self.duration_s;
        }
        (self.out_s - self.in_s).max(0.0)
    }
}

/// Text block rendered over the video for a global time range.
///
/// `x`/`y` are layout expressions understood by the render engine, not
/// pixel values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Derivative)]
#[derivative(Default)]
pub struct TextOverlay {
    #[derivative(Default(value = "\"Title\".to_string()"))]
    pub text: String,

    #[derivative(Default(value = "\"(w-text_w)/2\".to_string()"))]
    pub x: String,

    #[derivative(Default(value = "\"h*0.1\".to_string()"))]
    pub y: String,

    #[derivative(Default(value = "48"))]
    pub fontsize: u32,

    #[derivative(Default(value = "\"white\".to_string()"))]
    pub fontcolor: String,

    #[serde(rename = "box")]
    #[derivative(Default(value = "true"))]
    pub box_enabled: bool,

    #[derivative(Default(value = "\"black@0.5\".to_string()"))]
    pub boxcolor: String,

    #[derivative(Default(value = "10"))]
    pub boxborderw: u32,

    #[derivative(Default(value = "0.5"))]
    pub start: f64,

    #[derivative(Default(value = "4.5"))]
    pub end: f64,

    #[serde(default)]
    pub fontfile: Option<String>,
}

/// Image rendered over the video; position and size are normalized to
/// the frame (0..1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Derivative)]
#[derivative(Default)]
pub struct ImageOverlay {
    pub path: String,

    #[derivative(Default(value = "0.5"))]
    pub x: f64,

    #[derivative(Default(value = "0.5"))]
    pub y: f64,

    #[derivative(Default(value = "0.25"))]
    pub w: f64,

    #[derivative(Default(value = "0.25"))]
    pub h: f64,

    #[derivative(Default(value = "0.0"))]
    pub start: f64,

    #[derivative(Default(value = "3.0"))]
    pub end: f64,

    #[derivative(Default(value = "1.0"))]
    pub opacity: f64,
}

/// Color corrections applied to the whole sequence at export time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Derivative)]
#[derivative(Default)]
pub struct Filters {
    /// -1..+1, clamped by the exporter.
    #[derivative(Default(value = "0.0"))]
    pub brightness: f32,

    /// 0..3
    #[derivative(Default(value = "1.0"))]
    pub contrast: f32,

    /// 0..3
    #[derivative(Default(value = "1.0"))]
    pub saturation: f32,

    #[derivative(Default(value = "false"))]
    pub vignette: bool,
}
