//! Trait definitions for label record format implementations.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::annotation::AnnotationStore;
use crate::format::error::FormatError;
use crate::model::LabelSchema;

/// Trait for label record import/export implementations.
///
/// Each format converts between an [`AnnotationStore`] and the text of a
/// record file. `save` and `load` add file handling on top of `encode` and
/// `decode`.
pub trait RecordFormat: Send + Sync {
    /// Unique identifier for this format (e.g., "frame_table").
    fn id(&self) -> &'static str;

    /// Human-readable name for display.
    fn display_name(&self) -> &'static str;

    /// Whether `header` (the first line of a record) belongs to this format.
    fn matches_header(&self, header: &str) -> bool;

    /// Whether this format can be written.
    fn supports_export(&self) -> bool;

    /// Render a store as record text.
    fn encode(&self, store: &AnnotationStore) -> Result<String, FormatError>;

    /// Parse record text into a store for a video with `frame_count` frames.
    fn decode(
        &self,
        text: &str,
        schema: &Arc<LabelSchema>,
        frame_count: usize,
        options: &LoadOptions,
    ) -> Result<LoadResult, FormatError>;

    /// Write a store to `path`, fully replacing any previous record.
    ///
    /// The text is written to a sibling temporary file first and then renamed
    /// over the target, so a failed save leaves the old record intact.
    fn save(&self, store: &AnnotationStore, path: &Path) -> Result<SaveResult, FormatError> {
        log::info!("Saving {} record to {:?}", self.display_name(), path);

        let text = self.encode(store)?;
        let mut tmp_name = path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        std::fs::write(&tmp_path, text.as_bytes())?;
        if let Err(e) = std::fs::rename(&tmp_path, path) {
            // Rename failed, drop the temp file and report the rename error
            let _ = std::fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        let result = SaveResult {
            path: path.to_path_buf(),
            rows_written: store.frame_count(),
            labeled_rows: store.labeled_count(),
        };
        log::info!(
            "Saved {} rows ({} labeled) to {:?}",
            result.rows_written,
            result.labeled_rows,
            path
        );
        Ok(result)
    }

    /// Read and parse the record at `path`.
    fn load(
        &self,
        path: &Path,
        schema: &Arc<LabelSchema>,
        frame_count: usize,
        options: &LoadOptions,
    ) -> Result<LoadResult, FormatError> {
        log::info!("Loading {} record from {:?}", self.display_name(), path);

        let text = std::fs::read_to_string(path)?;
        let result = self.decode(&text, schema, frame_count, options)?;

        log::info!(
            "Loaded {} labeled frames of {} ({} warnings)",
            result.store.labeled_count(),
            frame_count,
            result.warnings.len()
        );
        Ok(result)
    }
}

/// What to do with a record row whose label is not in the current schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownLabelPolicy {
    /// Fail the whole load
    Reject,
    /// Leave the frame unlabeled and report a warning
    #[default]
    ClearAndWarn,
}

/// Options for load operations.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Handling of labels missing from the schema
    pub unknown_labels: UnknownLabelPolicy,
}

impl LoadOptions {
    /// Create new load options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the unknown-label policy.
    pub fn unknown_labels(mut self, policy: UnknownLabelPolicy) -> Self {
        self.unknown_labels = policy;
        self
    }

    /// Apply the unknown-label policy to a row.
    ///
    /// Returns an error under [`UnknownLabelPolicy::Reject`], otherwise
    /// records a warning and lets the caller leave the frame unlabeled.
    pub(crate) fn handle_unknown_label(
        &self,
        line: usize,
        frame: usize,
        token: &str,
        warnings: &mut Vec<FormatWarning>,
    ) -> Result<(), FormatError> {
        match self.unknown_labels {
            UnknownLabelPolicy::Reject => Err(FormatError::UnknownLabel {
                line,
                token: token.to_string(),
            }),
            UnknownLabelPolicy::ClearAndWarn => {
                log::warn!(
                    "Line {}: label '{}' is not in the schema, frame {} left unlabeled",
                    line,
                    token,
                    frame
                );
                warnings.push(
                    FormatWarning::warning(format!(
                        "Unknown label '{token}' on frame {frame}, left unlabeled"
                    ))
                    .with_line(line),
                );
                Ok(())
            }
        }
    }
}

/// Result of a load operation.
#[derive(Debug)]
pub struct LoadResult {
    /// The loaded store
    pub store: AnnotationStore,
    /// Warnings generated while loading
    pub warnings: Vec<FormatWarning>,
}

/// Result of a save operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveResult {
    /// File that was written
    pub path: PathBuf,
    /// Number of rows written (the video's frame count)
    pub rows_written: usize,
    /// Number of rows carrying a label
    pub labeled_rows: usize,
}

/// Warning generated during format conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatWarning {
    /// 1-based line this warning relates to (if applicable).
    pub line: Option<usize>,

    /// Human-readable warning message.
    pub message: String,

    /// Severity level of the warning.
    pub severity: WarningSeverity,
}

impl FormatWarning {
    /// Create a new warning.
    pub fn new(message: impl Into<String>, severity: WarningSeverity) -> Self {
        Self {
            line: None,
            message: message.into(),
            severity,
        }
    }

    /// Create an info-level warning.
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, WarningSeverity::Info)
    }

    /// Create a warning-level warning.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, WarningSeverity::Warning)
    }

    /// Create an error-level warning.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, WarningSeverity::Error)
    }

    /// Set the line this warning relates to.
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

/// Severity level for format warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningSeverity {
    /// Informational message, not a problem.
    Info,
    /// Warning that something was skipped or modified.
    Warning,
    /// Error that may affect data integrity.
    Error,
}
