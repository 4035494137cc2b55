//! frametag - keyboard-driven frame labeling for video
//!
//! Assigns one label per video frame from tap, hold, and scroll input, and
//! keeps the result in a per-video `<stem>_labels.csv` frame table. Video
//! decoding and drawing stay with the host, which talks to the engine
//! through the [`navigator::FrameNavigator`] trait and receives
//! [`input::Notice`] values back.

pub mod annotation;
pub mod color_utils;
pub mod config;
pub mod constants;
pub mod format;
pub mod gap_fill;
pub mod input;
pub mod keybindings;
pub mod model;
pub mod navigator;
pub mod script;
pub mod session;
pub mod stats;
pub mod timeline;
pub mod undo;

pub use annotation::{AnnotationError, AnnotationStore, LabelChange};
pub use config::{AppConfig, Config, ConfigError};
pub use gap_fill::{FilledGap, GapFillError, fill_gap};
pub use input::{EditContext, InputEvent, InputMachine, InputMode, Notice};
pub use model::{LabelDef, LabelSchema, Span};
pub use navigator::{FrameNavigator, VirtualNavigator};
pub use session::Session;
