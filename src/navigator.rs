//! Frame navigator seam.
//!
//! The engine never decodes video. It talks to a [`FrameNavigator`] that
//! knows the frame count, the current position, and whether autonomous
//! playback is running. All positions it reports are already clamped to
//! `[0, frame_count)`.

use crate::constants::DEFAULT_FPS;

/// Collaborator that owns the playback position of one video.
pub trait FrameNavigator {
    /// Total frames in the video.
    fn frame_count(&self) -> usize;

    /// Current frame index.
    fn current_frame(&self) -> usize;

    /// Move to `frame`, clamped to the valid range. Returns the frame landed on.
    fn seek(&mut self, frame: usize) -> usize;

    /// Start or stop time-driven playback.
    fn set_playing(&mut self, playing: bool);

    /// Whether time-driven playback is running.
    fn is_playing(&self) -> bool;

    /// Frames per second, used for timecode display and durations.
    fn fps(&self) -> f64 {
        DEFAULT_FPS
    }

    /// Move by `delta` frames, clamped to the valid range. Returns the frame landed on.
    fn step(&mut self, delta: i64) -> usize {
        let count = self.frame_count();
        if count == 0 {
            return self.seek(0);
        }
        let last = (count - 1) as i64;
        let target = (self.current_frame() as i64).saturating_add(delta).clamp(0, last);
        self.seek(target as usize)
    }

    /// Whether the current frame is the last one.
    fn at_last_frame(&self) -> bool {
        self.current_frame() + 1 >= self.frame_count()
    }
}

/// In-memory navigator with no media behind it.
///
/// Used by the headless binary and tests; a GUI host would implement
/// [`FrameNavigator`] over its decoder instead.
#[derive(Debug, Clone, PartialEq)]
pub struct VirtualNavigator {
    frame_count: usize,
    current: usize,
    fps: f64,
    playing: bool,
}

impl VirtualNavigator {
    /// Create a navigator positioned at frame 0.
    pub fn new(frame_count: usize) -> Self {
        Self {
            frame_count,
            current: 0,
            fps: DEFAULT_FPS,
            playing: false,
        }
    }

    /// Set the frame rate. Non-positive values fall back to 30 fps.
    pub fn with_fps(mut self, fps: f64) -> Self {
        self.fps = if fps > 0.0 { fps } else { DEFAULT_FPS };
        self
    }
}

impl FrameNavigator for VirtualNavigator {
    fn frame_count(&self) -> usize {
        self.frame_count
    }

    fn current_frame(&self) -> usize {
        self.current
    }

    fn seek(&mut self, frame: usize) -> usize {
        self.current = frame.min(self.frame_count.saturating_sub(1));
        self.current
    }

    fn set_playing(&mut self, playing: bool) {
        self.playing = playing && self.frame_count > 0;
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn fps(&self) -> f64 {
        self.fps
    }
}
