//! Conversions between playback positions (milliseconds), `MM:SS` display
//! text, whole seconds and frame indices.

use crate::error::{Error, Result};

/// Arrow-key seek distance used by the player controls.
pub const SEEK_STEP_MS: u64 = 500;

/// Render a position as `MM:SS`, truncating to whole seconds.
///
/// Minutes are not wrapped into hours, so positions past 99:59 produce a
/// minute field wider than two digits.
pub fn to_display(ms: u64) -> String {
    let time_seconds = ms / 1000;
    let mins = time_seconds / 60;
    let secs = time_seconds - mins * 60;
    format!("{:02}:{:02}", mins, secs)
}

/// Parse `MM:SS` text back into whole seconds.
pub fn from_display(text: &str) -> Result<u64> {
    let fields: Vec<&str> = text.split(':').collect();
    if fields.len() != 2 {
        return Err(Error::Format(format!(
            "expected MM:SS, got '{}' ({} field(s))",
            text,
            fields.len()
        )));
    }

    let parse_field = |field: &str| {
        field
            .trim()
            .parse::<u64>()
            .map_err(|_| Error::Format(format!("'{}' is not an integer in '{}'", field, text)))
    };

    let mins = parse_field(fields[0])?;
    let secs = parse_field(fields[1])?;
    mins.checked_mul(60)
        .and_then(|m| m.checked_add(secs))
        .ok_or_else(|| Error::Format(format!("'{}' is out of range", text)))
}

/// Parse `MM:SS` text into a position in milliseconds.
pub fn display_to_ms(text: &str) -> Result<u64> {
    from_display(text)?
        .checked_mul(1000)
        .ok_or_else(|| Error::Format(format!("'{}' is out of range", text)))
}

/// Zero-based frame index shown at `position_ms`.
pub fn frame_of(position_ms: u64, fps: f64) -> u64 {
    ((position_ms as f64 / 1000.0) * fps).floor() as u64
}

/// Duration of one frame in whole milliseconds.
fn frame_step_ms(fps: f64) -> u64 {
    (1000.0 / fps) as u64
}

pub fn step_forward(position_ms: u64, fps: f64) -> u64 {
    position_ms + frame_step_ms(fps)
}

pub fn step_back(position_ms: u64, fps: f64) -> u64 {
    position_ms.saturating_sub(frame_step_ms(fps))
}

/// Player status line: `curr / duration || frame / frame_count`.
pub fn elapsed_text(position_ms: u64, duration_ms: u64, fps: f64, frame_count: u64) -> String {
    format!(
        "{}  /  {}  ||  {}  /  {}",
        to_display(position_ms),
        to_display(duration_ms),
        frame_of(position_ms, fps),
        frame_count
    )
}
