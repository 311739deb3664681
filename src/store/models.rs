use crate::tracking::{NormalizedPoint, SubjectId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Column order of a persisted annotation file. Loading requires an exact match.
pub const ANNOTATION_COLUMNS: [&str; 10] = [
    "vidname",
    "action",
    "player_id",
    "start_time_s",
    "stop_time_s",
    "start_frame",
    "stop_frame",
    "frame_coords",
    "x_raw",
    "y_raw",
];

/// Bounds of the on-screen video area in widget pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayRegion {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl DisplayRegion {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Strictly inside; clicks on the border are ignored.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.x1 < x && x < self.x2 && self.y1 < y && y < self.y2
    }

    pub fn normalize(&self, x: i32, y: i32) -> NormalizedPoint {
        let width = f64::from(self.x2 - self.x1);
        let height = f64::from(self.y2 - self.y1);
        NormalizedPoint::new(
            f64::from(x - self.x1) / width,
            f64::from(y - self.y1) / height,
        )
    }
}

impl fmt::Display for DisplayRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.x1, self.y1, self.x2, self.y2)
    }
}

/// Where the user clicked when picking the subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClickProvenance {
    pub region: DisplayRegion,
    pub x: i32,
    pub y: i32,
}

/// A committed annotation, one row of `annotations/<stem>.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    #[serde(rename = "vidname")]
    pub video_name: String,
    #[serde(rename = "action")]
    pub action_label: String,
    #[serde(rename = "player_id")]
    pub subject_id: SubjectId,
    #[serde(rename = "start_time_s")]
    pub start_time_seconds: u64,
    #[serde(rename = "stop_time_s")]
    pub stop_time_seconds: u64,
    pub start_frame: u64,
    pub stop_frame: u64,
    /// Display region at click time, kept as text for inspection only.
    #[serde(rename = "frame_coords")]
    pub click_frame_geometry: String,
    #[serde(rename = "x_raw")]
    pub click_x: i32,
    #[serde(rename = "y_raw")]
    pub click_y: i32,
}

impl AnnotationRecord {
    /// `action, player_id, start, stop` as shown in the annotation list.
    pub fn display_string(&self) -> String {
        format!(
            "{}, {}, {}, {}",
            self.action_label, self.subject_id, self.start_time_seconds, self.stop_time_seconds
        )
    }
}
