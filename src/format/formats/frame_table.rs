//! Canonical frame table format.
//!
//! A comma-separated table with the header `frame_index,label` and exactly
//! one row per frame, in ascending order starting at 0. Unlabeled frames are
//! written with an empty label rather than omitted, so the row count alone
//! tells the frame count the record was written for.
//!
//! ```text
//! frame_index,label
//! 0,
//! 1,no
//! 2,no
//! ```

use std::sync::Arc;

use crate::annotation::AnnotationStore;
use crate::format::error::FormatError;
use crate::format::traits::{LoadOptions, LoadResult, RecordFormat};
use crate::model::LabelSchema;

/// Header line of the frame table.
pub const FRAME_TABLE_HEADER: &str = "frame_index,label";

/// Canonical frame table format.
pub struct FrameTableFormat;

impl RecordFormat for FrameTableFormat {
    fn id(&self) -> &'static str {
        "frame_table"
    }

    fn display_name(&self) -> &'static str {
        "Frame table (CSV)"
    }

    fn matches_header(&self, header: &str) -> bool {
        header.trim().trim_start_matches('\u{feff}') == FRAME_TABLE_HEADER
    }

    fn supports_export(&self) -> bool {
        true
    }

    fn encode(&self, store: &AnnotationStore) -> Result<String, FormatError> {
        let mut out = String::with_capacity(FRAME_TABLE_HEADER.len() + 1 + store.frame_count() * 8);
        out.push_str(FRAME_TABLE_HEADER);
        out.push('\n');

        for frame in 0..store.frame_count() {
            out.push_str(&frame.to_string());
            out.push(',');
            if let Some(token) = store.get_label(frame) {
                out.push_str(token);
            }
            out.push('\n');
        }

        Ok(out)
    }

    fn decode(
        &self,
        text: &str,
        schema: &Arc<LabelSchema>,
        frame_count: usize,
        options: &LoadOptions,
    ) -> Result<LoadResult, FormatError> {
        let mut lines = text.lines().enumerate().map(|(i, l)| (i + 1, l));

        match lines.next() {
            Some((_, header)) if self.matches_header(header) => {}
            _ => {
                return Err(FormatError::MissingHeader {
                    expected: FRAME_TABLE_HEADER.to_string(),
                });
            }
        }

        let rows: Vec<(usize, &str)> = lines.filter(|(_, l)| !l.trim().is_empty()).collect();
        if rows.len() != frame_count {
            return Err(FormatError::FrameCountMismatch {
                expected: frame_count,
                found: rows.len(),
            });
        }

        let mut store = AnnotationStore::new(Arc::clone(schema), frame_count);
        let mut warnings = Vec::new();
        let mut previous: Option<usize> = None;

        for (expected, (line, row)) in rows.into_iter().enumerate() {
            let (index, label) = row
                .split_once(',')
                .ok_or_else(|| FormatError::invalid_row(line, "expected 'frame_index,label'"))?;
            let frame: usize = index.trim().parse().map_err(|_| {
                FormatError::invalid_row(line, format!("invalid frame index '{}'", index.trim()))
            })?;

            if frame >= frame_count {
                return Err(FormatError::FrameOutOfRange {
                    line,
                    frame,
                    frame_count,
                });
            }
            if previous == Some(frame) {
                return Err(FormatError::DuplicateFrame { line, frame });
            }
            if frame != expected {
                return Err(FormatError::OutOfOrder {
                    line,
                    expected,
                    found: frame,
                });
            }
            previous = Some(frame);

            let token = label.trim();
            if token.is_empty() {
                continue;
            }
            if schema.contains(token) {
                store
                    .set_label(frame, token)
                    .map_err(|e| FormatError::invalid_row(line, e.to_string()))?;
            } else {
                options.handle_unknown_label(line, frame, token, &mut warnings)?;
            }
        }

        // A freshly loaded store matches its record
        store.clear_dirty();
        Ok(LoadResult { store, warnings })
    }
}
