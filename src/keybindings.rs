//! Keys and application keybindings.
//!
//! Keys are written in the configuration either as a single character
//! (case-insensitive, normalized to upper case) or by name (`left`, `space`, ...).
//! Application actions and label shortcuts share one key space; conflicts are
//! rejected when the configuration is built.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// A keyboard key as seen by the input state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Printable character key, always upper case for letters
    Char(char),
    Left,
    Right,
    Up,
    Down,
    Space,
    Enter,
    Tab,
    Backspace,
    Delete,
    Escape,
    Home,
    End,
}

impl Key {
    /// Named keys paired with their configuration spelling.
    const NAMED: &'static [(&'static str, Key)] = &[
        ("left", Key::Left),
        ("right", Key::Right),
        ("up", Key::Up),
        ("down", Key::Down),
        ("space", Key::Space),
        ("enter", Key::Enter),
        ("tab", Key::Tab),
        ("backspace", Key::Backspace),
        ("delete", Key::Delete),
        ("escape", Key::Escape),
        ("home", Key::Home),
        ("end", Key::End),
    ];

    /// Build a character key, normalizing letters to upper case.
    pub fn char(c: char) -> Self {
        Key::Char(c.to_ascii_uppercase())
    }
}

impl FromStr for Key {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == " " {
            return Ok(Key::Space);
        }
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Ok(Key::char(c));
        }

        let lower = trimmed.to_ascii_lowercase();
        Key::NAMED
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|(_, key)| *key)
            .ok_or_else(|| ConfigError::InvalidKey(s.to_string()))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{c}"),
            named => {
                let name = Key::NAMED
                    .iter()
                    .find(|(_, key)| key == named)
                    .map_or("?", |(name, _)| name);
                f.write_str(name)
            }
        }
    }
}

/// Application actions that can be bound to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppAction {
    /// Step one frame back
    PrevFrame,
    /// Step one frame forward
    NextFrame,
    /// Start or stop autonomous playback
    TogglePlay,
    /// Switch between default and scroll input modes
    ToggleMode,
    /// Fill the unlabeled run under the cursor
    Fillin,
    /// Switch the timeline between frame numbers and timecode
    ToggleDisplayFormat,
    /// Remove the label at the current frame
    ClearLabel,
    /// Undo the last label edit
    Undo,
    /// Redo the last undone label edit
    Redo,
    /// Write the label record to disk
    Save,
}

impl AppAction {
    /// Get the display name for this action.
    pub fn name(&self) -> &'static str {
        match self {
            AppAction::PrevFrame => "Previous frame",
            AppAction::NextFrame => "Next frame",
            AppAction::TogglePlay => "Play / pause",
            AppAction::ToggleMode => "Toggle input mode",
            AppAction::Fillin => "Fill gap",
            AppAction::ToggleDisplayFormat => "Toggle frame / timecode",
            AppAction::ClearLabel => "Clear label",
            AppAction::Undo => "Undo",
            AppAction::Redo => "Redo",
            AppAction::Save => "Save",
        }
    }
}

/// Keybinding table for application actions.
#[derive(Debug, Clone, Default)]
pub struct KeyBindings {
    actions: HashMap<Key, AppAction>,
}

impl KeyBindings {
    /// Create an empty binding table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `key` to `action`.
    ///
    /// Fails if the key is already bound to a different action.
    pub fn bind(&mut self, key: Key, action: AppAction) -> Result<(), ConfigError> {
        if let Some(existing) = self.actions.get(&key) {
            if *existing != action {
                return Err(ConfigError::KeyConflict {
                    key: key.to_string(),
                    first: existing.name().to_string(),
                    second: action.name().to_string(),
                });
            }
        }
        self.actions.insert(key, action);
        Ok(())
    }

    /// Get the action that corresponds to a key press, if any.
    pub fn action_for_key(&self, key: Key) -> Option<AppAction> {
        self.actions.get(&key).copied()
    }

    /// Get a key bound to `action`, if any.
    ///
    /// When several keys are bound to the same action the lowest one in
    /// display order is returned so the result is stable.
    pub fn key_for_action(&self, action: AppAction) -> Option<Key> {
        self.actions
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|(k, _)| *k)
            .min_by_key(|k| k.to_string())
    }

    /// Check if a key is already used by any binding.
    /// Returns a description of what it's used for, if anything.
    pub fn key_conflict(&self, key: Key) -> Option<&'static str> {
        self.actions.get(&key).map(AppAction::name)
    }

    /// Iterate over all bindings.
    pub fn iter(&self) -> impl Iterator<Item = (Key, AppAction)> + '_ {
        self.actions.iter().map(|(k, a)| (*k, *a))
    }

    /// Number of bound keys.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether no keys are bound.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
