//! Label schema: the set of label tokens a session may assign.
//!
//! The schema is built once from the configuration and never mutated. All
//! label identity checks go through it, so reconfiguring labels only needs a
//! config edit.

use std::collections::HashMap;

use crate::config::ConfigError;
use crate::constants::DEFAULT_LABEL_COLOR;
use crate::keybindings::Key;

/// Characters that may not appear in a token because the label record is a
/// plain comma-separated table.
const RESERVED_TOKEN_CHARS: &[char] = &[',', '"', '\n', '\r'];

/// A label definition: token, display color, group, and shortcut key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelDef {
    /// Unique token written to the label record
    pub token: String,
    /// RGB color for timeline display
    pub color: [u8; 3],
    /// Free-form category used only for display grouping
    pub group: String,
    /// Shortcut key that assigns this label
    pub key: Key,
}

impl LabelDef {
    /// Create a new label definition.
    pub fn new(token: &str, group: &str, color: [u8; 3], key: Key) -> Self {
        Self {
            token: token.to_string(),
            color,
            group: group.to_string(),
            key,
        }
    }
}

/// Immutable lookup table of label definitions.
#[derive(Debug, Clone, Default)]
pub struct LabelSchema {
    labels: Vec<LabelDef>,
    by_key: HashMap<Key, usize>,
    by_token: HashMap<String, usize>,
}

impl LabelSchema {
    /// Build a schema, rejecting empty or reserved tokens, duplicate tokens,
    /// and duplicate shortcut keys.
    pub fn new(labels: Vec<LabelDef>) -> Result<Self, ConfigError> {
        let mut by_key = HashMap::with_capacity(labels.len());
        let mut by_token = HashMap::with_capacity(labels.len());

        for (index, label) in labels.iter().enumerate() {
            if label.token.trim().is_empty() {
                return Err(ConfigError::EmptyToken {
                    key: label.key.to_string(),
                });
            }
            if label.token.trim() != label.token || label.token.contains(RESERVED_TOKEN_CHARS) {
                return Err(ConfigError::InvalidToken(label.token.clone()));
            }
            if let Some(&other) = by_key.get(&label.key) {
                let other: &LabelDef = &labels[other];
                return Err(ConfigError::DuplicateShortcut {
                    key: label.key.to_string(),
                    first: other.token.clone(),
                    second: label.token.clone(),
                });
            }
            if by_token.contains_key(&label.token) {
                return Err(ConfigError::DuplicateToken(label.token.clone()));
            }
            by_key.insert(label.key, index);
            by_token.insert(label.token.clone(), index);
        }

        Ok(Self {
            labels,
            by_key,
            by_token,
        })
    }

    /// Resolve a shortcut key to its label definition.
    pub fn lookup_by_key(&self, key: Key) -> Option<&LabelDef> {
        self.by_key.get(&key).map(|&i| &self.labels[i])
    }

    /// Resolve a token to its label definition.
    pub fn get(&self, token: &str) -> Option<&LabelDef> {
        self.by_token.get(token).map(|&i| &self.labels[i])
    }

    /// Whether `token` is a label in this schema.
    pub fn contains(&self, token: &str) -> bool {
        self.by_token.contains_key(token)
    }

    /// Display color for a token, falling back to the default color.
    pub fn color_for(&self, token: &str) -> [u8; 3] {
        self.get(token).map_or(DEFAULT_LABEL_COLOR, |l| l.color)
    }

    /// All label definitions in configuration order.
    pub fn labels(&self) -> &[LabelDef] {
        &self.labels
    }

    /// Number of labels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the schema has no labels.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<LabelDef> {
        vec![
            LabelDef::new("no", "gaze", [200, 60, 60], Key::Char('1')),
            LabelDef::new("see", "gaze", [60, 200, 60], Key::Char('2')),
            LabelDef::new("video_L", "video", [60, 60, 200], Key::Char('3')),
        ]
    }

    #[test]
    fn test_lookup() {
        let schema = LabelSchema::new(sample()).unwrap();
        assert_eq!(schema.len(), 3);
        assert_eq!(schema.lookup_by_key(Key::Char('2')).unwrap().token, "see");
        assert!(schema.lookup_by_key(Key::Char('9')).is_none());
        assert_eq!(schema.get("video_L").unwrap().group, "video");
        assert!(schema.contains("no"));
        assert!(!schema.contains("NO"));
        assert_eq!(schema.color_for("missing"), DEFAULT_LABEL_COLOR);
    }

    #[test]
    fn test_duplicate_shortcut_rejected() {
        let mut labels = sample();
        labels.push(LabelDef::new("other", "", [0, 0, 0], Key::Char('1')));
        assert!(matches!(
            LabelSchema::new(labels),
            Err(ConfigError::DuplicateShortcut { .. })
        ));
    }

    #[test]
    fn test_duplicate_token_rejected() {
        let mut labels = sample();
        labels.push(LabelDef::new("no", "", [0, 0, 0], Key::Char('9')));
        assert!(matches!(
            LabelSchema::new(labels),
            Err(ConfigError::DuplicateToken(t)) if t == "no"
        ));
    }

    #[test]
    fn test_empty_and_reserved_tokens_rejected() {
        let empty = vec![LabelDef::new("  ", "", [0, 0, 0], Key::Char('1'))];
        assert!(matches!(
            LabelSchema::new(empty),
            Err(ConfigError::EmptyToken { .. })
        ));

        for bad in ["a,b", "quo\"te", " padded"] {
            let labels = vec![LabelDef::new(bad, "", [0, 0, 0], Key::Char('1'))];
            assert!(
                matches!(LabelSchema::new(labels), Err(ConfigError::InvalidToken(_))),
                "{bad:?} should be rejected"
            );
        }
    }
}
