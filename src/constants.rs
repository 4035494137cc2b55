//! Global constants for the frametag engine

/// Color used for labels without an explicit color and for unlabeled frames
pub const DEFAULT_LABEL_COLOR: [u8; 3] = [0xAA, 0xAA, 0xAA];

/// Frame rate assumed when the navigator cannot report a positive one
pub const DEFAULT_FPS: f64 = 30.0;

/// Delay before a held label key labels the current frame in scroll mode
pub const DEFAULT_LABEL_DELAY_MS: u64 = 80;

/// Hold duration after which a label key starts auto-advancing
pub const DEFAULT_LONG_PRESS_THRESHOLD_MS: u64 = 1500;

/// Interval between auto-advance steps while a label key is held
pub const DEFAULT_AUTO_LABEL_INTERVAL_MS: u64 = 33;

/// Interval between frames during autonomous playback
pub const DEFAULT_PLAYBACK_INTERVAL_MS: u64 = 33;

/// Frames moved per scroll tick
pub const DEFAULT_WHEEL_STEP: u32 = 1;

/// Multiplier applied to the scroll step while the fast modifier is held
pub const DEFAULT_WHEEL_FAST_MULTIPLIER: u32 = 1;

/// Timecode pattern used when the timeline shows time instead of frame numbers
pub const DEFAULT_TIMECODE_FORMAT: &str = "hh:mm:ss:ff";

/// Number of tick marks drawn along the timeline
pub const DEFAULT_TIMELINE_DIVISIONS: u32 = 10;

/// Maximum number of undo steps kept per video
pub const DEFAULT_UNDO_HISTORY: usize = 100;

/// Suffix appended to the video stem to name its label record
pub const RECORD_SUFFIX: &str = "_labels.csv";
