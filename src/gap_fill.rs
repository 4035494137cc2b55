//! Gap-fill: label an unlabeled run bounded by two equal labels.
//!
//! Gap-fill never guesses between two different candidate labels and never
//! extrapolates from a single bound. When it fails, the store is untouched.

use crate::annotation::{AnnotationError, AnnotationStore, LabelChange};

/// Reasons a gap-fill request did not label anything.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GapFillError {
    /// The frame is already labeled, so there is no gap to fill
    #[error("Frame {frame} is already labeled, nothing to fill")]
    AlreadyLabeled { frame: usize },

    /// The run is not bounded on both sides by the same label
    #[error(
        "Cannot fill frames {start}..={end}: labels before ({}) and after ({}) must match",
        .before.as_deref().unwrap_or("video start"),
        .after.as_deref().unwrap_or("video end")
    )]
    AmbiguousGap {
        start: usize,
        end: usize,
        before: Option<String>,
        after: Option<String>,
    },

    /// The store rejected the request
    #[error(transparent)]
    Annotation(#[from] AnnotationError),
}

/// A successfully filled run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilledGap {
    /// First filled frame
    pub start: usize,
    /// Last filled frame (inclusive)
    pub end: usize,
    /// Label written to every frame of the run
    pub token: String,
    /// Per-frame changes, in ascending frame order
    pub changes: Vec<LabelChange>,
}

/// Fill the unlabeled run containing `frame` with the label that bounds it
/// on both sides.
pub fn fill_gap(store: &mut AnnotationStore, frame: usize) -> Result<FilledGap, GapFillError> {
    if frame >= store.frame_count() {
        return Err(AnnotationError::OutOfRange {
            frame,
            frame_count: store.frame_count(),
        }
        .into());
    }

    let Some((start, end)) = store.first_unlabeled_run_containing(frame) else {
        return Err(GapFillError::AlreadyLabeled { frame });
    };

    let before = start.checked_sub(1).and_then(|f| store.get_label(f));
    let after = end
        .checked_add(1)
        .filter(|&f| f < store.frame_count())
        .and_then(|f| store.get_label(f));

    let token = match (before, after) {
        (Some(b), Some(a)) if a == b => b.to_string(),
        _ => {
            return Err(GapFillError::AmbiguousGap {
                start,
                end,
                before: before.map(str::to_string),
                after: after.map(str::to_string),
            });
        }
    };

    let changes = store.set_range(start..=end, &token)?;
    log::info!(
        "Filled frames {}..={} with '{}' ({} frames)",
        start,
        end,
        token,
        changes.len()
    );

    Ok(FilledGap {
        start,
        end,
        token,
        changes,
    })
}
