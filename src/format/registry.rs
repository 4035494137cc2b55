//! Format registry for discovering record formats and locating record files.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::constants::RECORD_SUFFIX;
use crate::format::formats::{FrameTableFormat, LegacySparseFormat};
use crate::format::traits::RecordFormat;

/// Registry of available record formats.
///
/// The frame table is always present and is the only format records are
/// written in. Other formats are consulted when reading.
pub struct FormatRegistry {
    native: FrameTableFormat,
    formats: HashMap<&'static str, Box<dyn RecordFormat>>,
}

impl FormatRegistry {
    /// Create a new registry with all built-in formats registered.
    pub fn new() -> Self {
        let mut registry = Self {
            native: FrameTableFormat,
            formats: HashMap::new(),
        };

        registry.register(Box::new(LegacySparseFormat));

        registry
    }

    /// Register a format implementation.
    pub fn register(&mut self, format: Box<dyn RecordFormat>) {
        self.formats.insert(format.id(), format);
    }

    /// Get a format by its ID.
    pub fn get(&self, id: &str) -> Option<&dyn RecordFormat> {
        if id == self.native.id() {
            return Some(&self.native);
        }
        self.formats.get(id).map(|f| f.as_ref())
    }

    /// Get all format IDs, native first.
    pub fn ids(&self) -> Vec<&'static str> {
        let mut ids: Vec<&'static str> = self.formats.keys().copied().collect();
        ids.sort_unstable();
        ids.insert(0, self.native.id());
        ids
    }

    /// Get the native frame table format.
    pub fn native(&self) -> &dyn RecordFormat {
        &self.native
    }

    /// Pick the format whose header matches the first line of `text`.
    pub fn detect(&self, text: &str) -> Option<&dyn RecordFormat> {
        let header = text.lines().next()?;
        if self.native.matches_header(header) {
            return Some(&self.native);
        }
        let mut others: Vec<&dyn RecordFormat> = self.formats.values().map(|f| f.as_ref()).collect();
        others.sort_unstable_by_key(|f| f.id());
        others.into_iter().find(|f| f.matches_header(header))
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Record file for a video: `<video stem>_labels.csv` next to the video.
pub fn record_path(video: &Path) -> PathBuf {
    let stem = video
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "video".to_string());
    let name = format!("{stem}{RECORD_SUFFIX}");
    match video.parent() {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}
