//! Timeline display helpers.
//!
//! The engine never draws the timeline; it only owns the display flag toggled
//! by the display key and the text formatting of frame positions.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_FPS;

/// How frame positions are shown on the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimelineDisplay {
    /// Plain 0-based frame numbers
    #[default]
    #[serde(rename = "frames")]
    Frames,
    /// Timecode rendered from the configured pattern
    #[serde(rename = "time")]
    Timecode,
}

impl TimelineDisplay {
    /// The other display mode.
    pub fn toggled(self) -> Self {
        match self {
            TimelineDisplay::Frames => TimelineDisplay::Timecode,
            TimelineDisplay::Timecode => TimelineDisplay::Frames,
        }
    }
}

/// Format a frame position for display.
pub fn format_frame(frame: usize, fps: f64, display: TimelineDisplay, pattern: &str) -> String {
    match display {
        TimelineDisplay::Frames => frame.to_string(),
        TimelineDisplay::Timecode => format_timecode(frame, fps, pattern),
    }
}

/// Render `frame` as a timecode.
///
/// `hh`, `mm`, `ss` and `ff` in `pattern` are replaced by zero-padded hours,
/// minutes, seconds and the frame within the current second. A non-positive
/// `fps` falls back to 30.
pub fn format_timecode(frame: usize, fps: f64, pattern: &str) -> String {
    let fps = if fps > 0.0 { fps } else { DEFAULT_FPS };
    let frames_per_second = (fps.round() as usize).max(1);

    let total_seconds = (frame as f64 / fps) as u64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    let frames = frame % frames_per_second;

    pattern
        .to_lowercase()
        .replace("hh", &format!("{hours:02}"))
        .replace("mm", &format!("{minutes:02}"))
        .replace("ss", &format!("{seconds:02}"))
        .replace("ff", &format!("{frames:02}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle() {
        assert_eq!(TimelineDisplay::Frames.toggled(), TimelineDisplay::Timecode);
        assert_eq!(TimelineDisplay::Timecode.toggled(), TimelineDisplay::Frames);
    }

    #[test]
    fn test_format_frames() {
        assert_eq!(format_frame(42, 30.0, TimelineDisplay::Frames, "hh:mm:ss:ff"), "42");
    }

    #[test]
    fn test_format_timecode() {
        assert_eq!(format_timecode(0, 30.0, "hh:mm:ss:ff"), "00:00:00:00");
        assert_eq!(format_timecode(95, 30.0, "hh:mm:ss:ff"), "00:00:03:05");
        assert_eq!(format_timecode(30 * 3661 + 7, 30.0, "HH:MM:SS:FF"), "01:01:01:07");
        assert_eq!(format_timecode(61, 25.0, "mm:ss.ff"), "00:02.11");
    }

    #[test]
    fn test_format_timecode_bad_fps() {
        assert_eq!(format_timecode(45, 0.0, "ss:ff"), "01:15");
    }

    #[test]
    fn test_display_serde_names() {
        assert_eq!(serde_json::to_string(&TimelineDisplay::Timecode).unwrap(), "\"time\"");
        let display: TimelineDisplay = serde_json::from_str("\"frames\"").unwrap();
        assert_eq!(display, TimelineDisplay::Frames);
    }
}
