//! Legacy sparse record import.
//!
//! Older records list only labeled frames, one per row, under a header naming
//! a `frame` column and a label column called `mode`, `tag`, or `name`
//! (checked in that order). A `group` column may be present; it is ignored
//! since the group comes from the schema.
//!
//! ```text
//! frame,mode,group
//! 12,see,gaze
//! 13,see,gaze
//! ```
//!
//! Rows with an empty label are skipped. Frames not mentioned stay unlabeled.
//! This format is read-only: records are always rewritten as frame tables.

use std::sync::Arc;

use crate::annotation::AnnotationStore;
use crate::format::error::FormatError;
use crate::format::traits::{FormatWarning, LoadOptions, LoadResult, RecordFormat};
use crate::model::LabelSchema;

/// Label column names, in lookup priority order.
const LABEL_COLUMNS: [&str; 3] = ["mode", "tag", "name"];

/// Legacy sparse record format (import only).
pub struct LegacySparseFormat;

/// Column positions resolved from the header.
struct Columns {
    frame: usize,
    label: usize,
    width: usize,
}

fn split_header(header: &str) -> Vec<String> {
    header
        .trim()
        .trim_start_matches('\u{feff}')
        .split(',')
        .map(|c| c.trim().to_ascii_lowercase())
        .collect()
}

fn resolve_columns(header: &str) -> Option<Columns> {
    let names = split_header(header);
    let frame = names.iter().position(|n| n == "frame")?;
    let label = LABEL_COLUMNS
        .iter()
        .find_map(|wanted| names.iter().position(|n| n == wanted))?;
    Some(Columns {
        frame,
        label,
        width: names.len(),
    })
}

impl RecordFormat for LegacySparseFormat {
    fn id(&self) -> &'static str {
        "legacy_sparse"
    }

    fn display_name(&self) -> &'static str {
        "Legacy sparse (CSV)"
    }

    fn matches_header(&self, header: &str) -> bool {
        resolve_columns(header).is_some()
    }

    fn supports_export(&self) -> bool {
        false
    }

    fn encode(&self, _store: &AnnotationStore) -> Result<String, FormatError> {
        Err(FormatError::UnsupportedOperation(
            "legacy sparse records are import only".to_string(),
        ))
    }

    fn decode(
        &self,
        text: &str,
        schema: &Arc<LabelSchema>,
        frame_count: usize,
        options: &LoadOptions,
    ) -> Result<LoadResult, FormatError> {
        let mut lines = text.lines().enumerate().map(|(i, l)| (i + 1, l));

        let columns = lines
            .next()
            .and_then(|(_, header)| resolve_columns(header))
            .ok_or_else(|| FormatError::MissingHeader {
                expected: "frame,mode[,group]".to_string(),
            })?;

        let mut store = AnnotationStore::new(Arc::clone(schema), frame_count);
        let mut warnings = Vec::new();

        for (line, row) in lines {
            if row.trim().is_empty() {
                continue;
            }

            let fields: Vec<&str> = row.split(',').map(str::trim).collect();
            if fields.len() < columns.width {
                log::debug!(
                    "Line {}: {} fields, header has {}",
                    line,
                    fields.len(),
                    columns.width
                );
            }

            let token = fields.get(columns.label).copied().unwrap_or("");
            if token.is_empty() {
                continue;
            }

            let raw_frame = fields.get(columns.frame).copied().unwrap_or("");
            let frame: usize = raw_frame.parse().map_err(|_| {
                FormatError::invalid_row(line, format!("invalid frame index '{raw_frame}'"))
            })?;
            if frame >= frame_count {
                return Err(FormatError::FrameOutOfRange {
                    line,
                    frame,
                    frame_count,
                });
            }

            if !schema.contains(token) {
                options.handle_unknown_label(line, frame, token, &mut warnings)?;
                continue;
            }

            if let Some(previous) = store.get_label(frame) {
                warnings.push(
                    FormatWarning::warning(format!(
                        "Frame {frame} listed again, '{previous}' replaced by '{token}'"
                    ))
                    .with_line(line),
                );
            }
            store
                .set_label(frame, token)
                .map_err(|e| FormatError::invalid_row(line, e.to_string()))?;
        }

        warnings.push(FormatWarning::info(
            "Imported a legacy sparse record, it will be rewritten as a frame table on save",
        ));

        // Store stays dirty so the next save rewrites the record as a frame table
        Ok(LoadResult { store, warnings })
    }
}
