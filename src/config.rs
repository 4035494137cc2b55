//! Configuration file support for frametag.
//!
//! The configuration is a JSON document defining the label schema (tokens,
//! colors, groups, shortcut keys), application keybindings, and timing and
//! scroll parameters. It is loaded once at startup and validated into an
//! immutable [`Config`]; any error here is fatal and blocks annotation.

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};

use crate::color_utils::{parse_hex_color, to_hex_color};
use crate::constants::{
    DEFAULT_AUTO_LABEL_INTERVAL_MS, DEFAULT_LABEL_COLOR, DEFAULT_LABEL_DELAY_MS,
    DEFAULT_LONG_PRESS_THRESHOLD_MS, DEFAULT_PLAYBACK_INTERVAL_MS, DEFAULT_TIMECODE_FORMAT,
    DEFAULT_TIMELINE_DIVISIONS, DEFAULT_UNDO_HISTORY, DEFAULT_WHEEL_FAST_MULTIPLIER,
    DEFAULT_WHEEL_STEP,
};
use crate::format::UnknownLabelPolicy;
use crate::keybindings::{AppAction, Key, KeyBindings};
use crate::model::{LabelDef, LabelSchema};
use crate::timeline::TimelineDisplay;

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Get the display name for this log level.
    pub fn name(&self) -> &'static str {
        match self {
            LogLevel::Error => "Error",
            LogLevel::Warn => "Warn",
            LogLevel::Info => "Info",
            LogLevel::Debug => "Debug",
            LogLevel::Trace => "Trace",
        }
    }

    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Configuration document as written on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version of the configuration file format
    #[serde(default = "current_version")]
    pub version: u32,

    /// Application name (for identification)
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// User preferences
    #[serde(default)]
    pub preferences: UserPreferences,

    /// Label definitions keyed by shortcut key
    #[serde(deserialize_with = "unique_keys")]
    pub labels: BTreeMap<String, LabelConfig>,

    /// Application actions keyed by key
    #[serde(default = "default_app_keys", deserialize_with = "unique_keys")]
    pub app_keys: BTreeMap<String, AppAction>,

    /// Scroll wheel stepping
    #[serde(default)]
    pub mouse: MouseConfig,

    /// Hold and playback timing
    #[serde(default)]
    pub timings: TimingsConfig,

    /// Timeline display options
    #[serde(default)]
    pub timeline: TimelineConfig,
}

fn current_version() -> u32 {
    CONFIG_VERSION
}

fn default_app_name() -> String {
    "frametag".to_string()
}

fn default_app_keys() -> BTreeMap<String, AppAction> {
    [
        ("left", AppAction::PrevFrame),
        ("right", AppAction::NextFrame),
        ("space", AppAction::TogglePlay),
        ("M", AppAction::ToggleMode),
        ("F", AppAction::Fillin),
        ("T", AppAction::ToggleDisplayFormat),
        ("X", AppAction::ClearLabel),
        ("Z", AppAction::Undo),
        ("Y", AppAction::Redo),
        ("W", AppAction::Save),
    ]
    .into_iter()
    .map(|(k, a)| (k.to_string(), a))
    .collect()
}

fn default_labels() -> BTreeMap<String, LabelConfig> {
    [
        ("1", "no", "gaze", [224, 90, 90]),
        ("2", "see", "gaze", [90, 224, 122]),
        ("3", "video_L", "video", [90, 138, 224]),
        ("4", "video_R", "video", [224, 195, 90]),
    ]
    .into_iter()
    .map(|(key, name, group, color)| {
        (
            key.to_string(),
            LabelConfig {
                name: name.to_string(),
                group: group.to_string(),
                color: to_hex_color(color),
            },
        )
    })
    .collect()
}

/// Deserialize a JSON object into a map, rejecting repeated keys instead of
/// silently keeping the last one.
fn unique_keys<'de, D, V>(deserializer: D) -> Result<BTreeMap<String, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    struct UniqueKeys<V>(PhantomData<V>);

    impl<'de, V: Deserialize<'de>> Visitor<'de> for UniqueKeys<V> {
        type Value = BTreeMap<String, V>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an object with unique keys")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut map = BTreeMap::new();
            while let Some((key, value)) = access.next_entry::<String, V>()? {
                if map.contains_key(&key) {
                    return Err(de::Error::custom(format!("duplicate key '{key}'")));
                }
                map.insert(key, value);
            }
            Ok(map)
        }
    }

    deserializer.deserialize_map(UniqueKeys(PhantomData))
}

/// User preferences section of the config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPreferences {
    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Auto-save timing
    #[serde(default)]
    pub autosave: AutoSaveConfig,

    /// What to do with record rows whose label is not in the schema
    #[serde(default)]
    pub unknown_labels: UnknownLabelPolicy,

    /// Maximum number of undo steps kept per video
    #[serde(default = "default_undo_history")]
    pub undo_history: usize,
}

fn default_undo_history() -> usize {
    DEFAULT_UNDO_HISTORY
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            autosave: AutoSaveConfig::default(),
            unknown_labels: UnknownLabelPolicy::default(),
            undo_history: default_undo_history(),
        }
    }
}

/// Auto-save section of the preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoSaveConfig {
    /// Whether edits are saved automatically
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Quiet period after the last edit before saving
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Minimum time between two automatic saves
    #[serde(default = "default_save_interval_ms")]
    pub interval_ms: u64,
}

fn default_true() -> bool {
    true
}

fn default_debounce_ms() -> u64 {
    5_000
}

fn default_save_interval_ms() -> u64 {
    60_000
}

impl Default for AutoSaveConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            debounce_ms: default_debounce_ms(),
            interval_ms: default_save_interval_ms(),
        }
    }
}

/// A label entry in the config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelConfig {
    /// Token written to the label record
    pub name: String,
    /// Display group
    #[serde(default)]
    pub group: String,
    /// `#RRGGBB` display color
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_color() -> String {
    to_hex_color(DEFAULT_LABEL_COLOR)
}

/// Mouse section of the config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MouseConfig {
    /// Frames moved per scroll tick
    #[serde(default = "default_wheel_step")]
    pub wheel_step: u32,
    /// Step multiplier while the fast modifier is held
    #[serde(default = "default_wheel_fast_multiplier")]
    pub wheel_fast_multiplier: u32,
}

fn default_wheel_step() -> u32 {
    DEFAULT_WHEEL_STEP
}

fn default_wheel_fast_multiplier() -> u32 {
    DEFAULT_WHEEL_FAST_MULTIPLIER
}

impl Default for MouseConfig {
    fn default() -> Self {
        Self {
            wheel_step: default_wheel_step(),
            wheel_fast_multiplier: default_wheel_fast_multiplier(),
        }
    }
}

/// Timings section of the config, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingsConfig {
    /// Delay before a held key labels the current frame in scroll mode
    #[serde(default = "default_label_delay_ms")]
    pub label_delay_ms: u64,
    /// Hold duration that starts auto-advance
    #[serde(default = "default_long_press_threshold_ms")]
    pub long_press_threshold_ms: u64,
    /// Interval between auto-advance steps
    #[serde(default = "default_auto_label_interval_ms")]
    pub auto_label_interval_ms: u64,
    /// Interval between frames during playback
    #[serde(default = "default_playback_interval_ms")]
    pub playback_interval_ms: u64,
}

fn default_label_delay_ms() -> u64 {
    DEFAULT_LABEL_DELAY_MS
}

fn default_long_press_threshold_ms() -> u64 {
    DEFAULT_LONG_PRESS_THRESHOLD_MS
}

fn default_auto_label_interval_ms() -> u64 {
    DEFAULT_AUTO_LABEL_INTERVAL_MS
}

fn default_playback_interval_ms() -> u64 {
    DEFAULT_PLAYBACK_INTERVAL_MS
}

impl Default for TimingsConfig {
    fn default() -> Self {
        Self {
            label_delay_ms: default_label_delay_ms(),
            long_press_threshold_ms: default_long_press_threshold_ms(),
            auto_label_interval_ms: default_auto_label_interval_ms(),
            playback_interval_ms: default_playback_interval_ms(),
        }
    }
}

/// Timeline section of the config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineConfig {
    /// Timecode pattern using `hh`, `mm`, `ss`, and `ff`
    #[serde(default = "default_timecode_format")]
    pub format: String,
    /// Number of tick marks along the timeline
    #[serde(default = "default_divisions")]
    pub divisions: u32,
    /// Initial display mode
    #[serde(default)]
    pub display: TimelineDisplay,
}

fn default_timecode_format() -> String {
    DEFAULT_TIMECODE_FORMAT.to_string()
}

fn default_divisions() -> u32 {
    DEFAULT_TIMELINE_DIVISIONS
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            format: default_timecode_format(),
            divisions: default_divisions(),
            display: TimelineDisplay::default(),
        }
    }
}

/// Validated hold and playback timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// Delay before a held key labels the current frame in scroll mode
    pub label_delay: Duration,
    /// Hold duration that starts auto-advance
    pub hold_threshold: Duration,
    /// Interval between auto-advance steps, never zero
    pub auto_advance_interval: Duration,
    /// Interval between playback frames, never zero
    pub playback_interval: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Timings::from(&TimingsConfig::default())
    }
}

impl From<&TimingsConfig> for Timings {
    fn from(config: &TimingsConfig) -> Self {
        Self {
            label_delay: Duration::from_millis(config.label_delay_ms),
            hold_threshold: Duration::from_millis(config.long_press_threshold_ms),
            auto_advance_interval: Duration::from_millis(
                at_least_one("auto_label_interval_ms", config.auto_label_interval_ms),
            ),
            playback_interval: Duration::from_millis(
                at_least_one("playback_interval_ms", config.playback_interval_ms),
            ),
        }
    }
}

/// Validated scroll stepping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseSettings {
    /// Frames per scroll tick, at least 1
    pub step: u32,
    /// Fast-modifier multiplier, at least 1
    pub fast_multiplier: u32,
}

impl Default for MouseSettings {
    fn default() -> Self {
        MouseSettings::from(&MouseConfig::default())
    }
}

impl From<&MouseConfig> for MouseSettings {
    fn from(config: &MouseConfig) -> Self {
        Self {
            step: at_least_one("wheel_step", config.wheel_step.into()) as u32,
            fast_multiplier: at_least_one(
                "wheel_fast_multiplier",
                config.wheel_fast_multiplier.into(),
            ) as u32,
        }
    }
}

fn at_least_one(field: &str, value: u64) -> u64 {
    if value == 0 {
        log::warn!("Config value {field} must be at least 1, using 1");
        1
    } else {
        value
    }
}

/// Validated timeline options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineSettings {
    /// Timecode pattern
    pub pattern: String,
    /// Number of tick marks, at least 1
    pub divisions: u32,
    /// Initial display mode
    pub display: TimelineDisplay,
}

/// Validated, immutable session configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Label schema shared by every store in the session
    pub schema: Arc<LabelSchema>,
    /// Application keybindings
    pub bindings: KeyBindings,
    /// Hold and playback timing
    pub timings: Timings,
    /// Scroll stepping
    pub mouse: MouseSettings,
    /// Timeline display options
    pub timeline: TimelineSettings,
    /// Auto-save timing
    pub autosave: AutoSaveConfig,
    /// Handling of unknown labels when loading a record
    pub unknown_labels: UnknownLabelPolicy,
    /// Maximum number of undo steps
    pub undo_history: usize,
    /// Log verbosity
    pub log_level: LogLevel,
}

impl AppConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            app_name: default_app_name(),
            preferences: UserPreferences::default(),
            labels: default_labels(),
            app_keys: default_app_keys(),
            mouse: MouseConfig::default(),
            timings: TimingsConfig::default(),
            timeline: TimelineConfig::default(),
        }
    }

    /// Validate the document and build the immutable session configuration.
    ///
    /// Fails if a key cannot be parsed, a label token is empty or reserved,
    /// a color is malformed, a shortcut key is used twice, or an application
    /// key collides with a label shortcut.
    pub fn build(&self) -> Result<Config, ConfigError> {
        let mut bindings = KeyBindings::new();
        for (key, action) in &self.app_keys {
            bindings.bind(key.parse()?, *action)?;
        }

        let mut labels = Vec::with_capacity(self.labels.len());
        for (key, label) in &self.labels {
            let key: Key = key.parse()?;
            if let Some(action) = bindings.key_conflict(key) {
                return Err(ConfigError::KeyConflict {
                    key: key.to_string(),
                    first: action.to_string(),
                    second: format!("label '{}'", label.name),
                });
            }
            let color = parse_hex_color(&label.color)?;
            labels.push(LabelDef::new(&label.name, &label.group, color, key));
        }
        let schema = LabelSchema::new(labels)?;

        log::debug!(
            "Built config: {} labels, {} app keys",
            schema.len(),
            bindings.len()
        );

        Ok(Config {
            schema: Arc::new(schema),
            bindings,
            timings: Timings::from(&self.timings),
            mouse: MouseSettings::from(&self.mouse),
            timeline: TimelineSettings {
                pattern: self.timeline.format.clone(),
                divisions: self.timeline.divisions.max(1),
                display: self.timeline.display,
            },
            autosave: self.preferences.autosave,
            unknown_labels: self.preferences.unknown_labels,
            undo_history: self.preferences.undo_history,
            log_level: self.preferences.log_level,
        })
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        Ok(config)
    }

    /// Get the default filename for the config file.
    pub fn default_filename() -> &'static str {
        "frametag-config.json"
    }

    /// Get the default config file path.
    pub fn default_path() -> Option<PathBuf> {
        // Try to use XDG config directory, fall back to home directory
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("frametag").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home_dir| {
                home_dir
                    .join(".config")
                    .join("frametag")
                    .join(Self::default_filename())
            })
        }
    }

    /// Load configuration from a file.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Try to load configuration from the default path.
    ///
    /// Returns `Ok(None)` if no config file exists there. A file that exists
    /// but cannot be read or parsed is an error.
    pub fn load_from_default_path() -> Result<Option<Self>, ConfigError> {
        let Some(path) = Self::default_path() else {
            return Ok(None);
        };
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return Ok(None);
        }
        Self::load_from_path(&path).map(Some)
    }

    /// Save configuration to a file, creating parent directories if needed.
    pub fn save_to_path(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = self.to_json()?;
        std::fs::write(path, json)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A label has an empty token
    #[error("Label bound to key '{key}' has an empty name")]
    EmptyToken { key: String },

    /// A label token contains characters the label record cannot hold
    #[error("Label name {0:?} contains leading/trailing whitespace or a reserved character")]
    InvalidToken(String),

    /// Two labels share a token
    #[error("Label name '{0}' is defined more than once")]
    DuplicateToken(String),

    /// Two labels share a shortcut key
    #[error("Key '{key}' is assigned to both '{first}' and '{second}'")]
    DuplicateShortcut {
        key: String,
        first: String,
        second: String,
    },

    /// A key is bound to two different things
    #[error("Key '{key}' is used by both {first} and {second}")]
    KeyConflict {
        key: String,
        first: String,
        second: String,
    },

    /// A key name could not be parsed
    #[error("Unknown key name {0:?}")]
    InvalidKey(String),

    /// A color is not a `#RRGGBB` string
    #[error("Invalid color {0:?}, expected #RRGGBB")]
    InvalidColor(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_builds() {
        let config = AppConfig::default().build().unwrap();
        assert_eq!(config.schema.len(), 4);
        assert_eq!(
            config.schema.lookup_by_key(Key::Char('4')).unwrap().token,
            "video_R"
        );
        assert_eq!(
            config.bindings.action_for_key(Key::Char('M')),
            Some(AppAction::ToggleMode)
        );
        assert_eq!(config.timings.hold_threshold, Duration::from_millis(1500));
        assert_eq!(config.mouse.step, 1);
    }

    #[test]
    fn test_json_roundtrip() {
        let original = AppConfig::default();
        let json = original.to_json().unwrap();
        let loaded = AppConfig::from_json(&json).unwrap();
        assert_eq!(loaded.labels, original.labels);
        assert_eq!(loaded.app_keys, original.app_keys);
        assert_eq!(loaded.timings, original.timings);
    }

    #[test]
    fn test_minimal_document_uses_defaults() {
        let json = r##"{
            "labels": {
                "a": { "name": "no", "group": "gaze", "color": "#FF0000" },
                "s": { "name": "see" }
            }
        }"##;
        let config = AppConfig::from_json(json).unwrap().build().unwrap();
        assert_eq!(config.schema.lookup_by_key(Key::Char('A')).unwrap().token, "no");
        assert_eq!(
            config.schema.get("see").unwrap().color,
            DEFAULT_LABEL_COLOR
        );
        assert_eq!(
            config.bindings.action_for_key(Key::Left),
            Some(AppAction::PrevFrame)
        );
        assert_eq!(config.unknown_labels, UnknownLabelPolicy::ClearAndWarn);
    }

    #[test]
    fn test_original_style_sections() {
        let json = r##"{
            "labels": { "1": { "name": "no", "group": "g", "color": "#112233" } },
            "app_keys": { "m": "toggle_mode", "f": "fillin", "left": "prev_frame" },
            "mouse": { "wheel_step": 0, "wheel_fast_multiplier": 5 },
            "timings": { "long_press_threshold_ms": 500, "auto_label_interval_ms": 0 },
            "timeline": { "format": "mm:ss", "display": "time" }
        }"##;
        let config = AppConfig::from_json(json).unwrap().build().unwrap();
        assert_eq!(config.mouse.step, 1);
        assert_eq!(config.mouse.fast_multiplier, 5);
        assert_eq!(config.timings.hold_threshold, Duration::from_millis(500));
        assert_eq!(config.timings.auto_advance_interval, Duration::from_millis(1));
        assert_eq!(config.timeline.display, TimelineDisplay::Timecode);
        assert_eq!(config.bindings.len(), 3);
    }

    #[test]
    fn test_case_insensitive_duplicate_shortcut() {
        let json = r#"{
            "labels": {
                "a": { "name": "no" },
                "A": { "name": "see" }
            }
        }"#;
        let err = AppConfig::from_json(json).unwrap().build().unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateShortcut { .. }));
    }

    #[test]
    fn test_repeated_json_key_rejected() {
        let json = r#"{
            "labels": {
                "a": { "name": "no" },
                "a": { "name": "see" }
            }
        }"#;
        assert!(matches!(
            AppConfig::from_json(json),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_label_key_collides_with_app_key() {
        let json = r#"{
            "labels": { "f": { "name": "no" } }
        }"#;
        let err = AppConfig::from_json(json).unwrap().build().unwrap_err();
        assert!(matches!(err, ConfigError::KeyConflict { ref key, .. } if key == "F"));
    }

    #[test]
    fn test_malformed_color_and_empty_token() {
        let bad_color = r#"{ "labels": { "1": { "name": "no", "color": "red" } } }"#;
        assert!(matches!(
            AppConfig::from_json(bad_color).unwrap().build(),
            Err(ConfigError::InvalidColor(_))
        ));

        let empty = r#"{ "labels": { "1": { "name": "" } } }"#;
        assert!(matches!(
            AppConfig::from_json(empty).unwrap().build(),
            Err(ConfigError::EmptyToken { .. })
        ));
    }

    #[test]
    fn test_version_too_new() {
        let json = format!(r#"{{ "version": {}, "labels": {{}} }}"#, CONFIG_VERSION + 1);
        assert!(matches!(
            AppConfig::from_json(&json),
            Err(ConfigError::VersionTooNew { .. })
        ));
    }

    #[test]
    fn test_save_and_load_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(AppConfig::default_filename());
        AppConfig::default().save_to_path(&path).unwrap();
        let loaded = AppConfig::load_from_path(&path).unwrap();
        assert_eq!(loaded.labels.len(), 4);
    }

    #[test]
    fn test_log_level_filter() {
        assert_eq!(LogLevel::default().to_level_filter(), log::LevelFilter::Info);
        assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
    }
}
