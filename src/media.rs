use crate::error::{Error, Result};
use std::path::Path;

/// Read-only view of the external video player.
pub trait Playback {
    fn position_ms(&self) -> u64;
    fn duration_ms(&self) -> u64;
    fn is_video_available(&self) -> bool {
        true
    }
}

/// Properties of a loaded video, as reported by the media backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoProperties {
    pub fps: f64,
    pub frame_count: u64,
    pub width: f64,
    pub height: f64,
}

impl VideoProperties {
    pub fn new(fps: f64, frame_count: u64, width: f64, height: f64) -> Result<Self> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(fps) {
            return Err(Error::Data(format!("fps must be positive, got {}", fps)));
        }
        if !positive(width) || !positive(height) {
            return Err(Error::Data(format!(
                "video dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        Ok(Self {
            fps,
            frame_count,
            width,
            height,
        })
    }
}

/// Source of [`VideoProperties`] for a video file.
pub trait VideoProbe {
    fn probe(&self, video_path: &Path) -> Result<VideoProperties>;
}

/// Reports the same properties for every video.
#[derive(Debug, Clone, Copy)]
pub struct FixedProbe(pub VideoProperties);

impl VideoProbe for FixedProbe {
    fn probe(&self, _video_path: &Path) -> Result<VideoProperties> {
        Ok(self.0)
    }
}

/// A paused player parked at a fixed position.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticPlayback {
    pub position_ms: u64,
    pub duration_ms: u64,
}

impl StaticPlayback {
    pub fn at(position_ms: u64, duration_ms: u64) -> Self {
        Self {
            position_ms,
            duration_ms,
        }
    }
}

impl Playback for StaticPlayback {
    fn position_ms(&self) -> u64 {
        self.position_ms
    }

    fn duration_ms(&self) -> u64 {
        self.duration_ms
    }
}
