//! Frame annotation store.
//!
//! This module provides the per-video mapping from frame index to label token:
//! - Sparse label storage (unlabeled frames have no entry)
//! - Span materialization for timeline rendering
//! - Unlabeled-run queries used by gap-fill
//! - Change records used by undo/redo

use std::cell::OnceCell;
use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::sync::Arc;

use crate::model::{LabelSchema, Span};

/// Errors raised by store mutations.
///
/// The frame navigator clamps positions before events reach the store, so
/// `OutOfRange` indicates a collaborator contract violation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnnotationError {
    /// Frame index outside `[0, frame_count)`
    #[error("Frame {frame} is out of range (video has {frame_count} frames)")]
    OutOfRange { frame: usize, frame_count: usize },

    /// Token not present in the label schema
    #[error("Label '{0}' is not defined in the label schema")]
    UnknownLabel(String),
}

/// One frame's label before and after a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelChange {
    /// Frame that changed
    pub frame: usize,
    /// Label before the change
    pub before: Option<String>,
    /// Label after the change
    pub after: Option<String>,
}

impl LabelChange {
    /// The change that reverts this one.
    pub fn inverted(&self) -> Self {
        Self {
            frame: self.frame,
            before: self.after.clone(),
            after: self.before.clone(),
        }
    }
}

/// Storage for the labels of a single video.
#[derive(Debug, Clone)]
pub struct AnnotationStore {
    /// Schema every stored token must belong to.
    schema: Arc<LabelSchema>,
    /// Total frames in the video, fixed at creation.
    frame_count: usize,
    /// Labels keyed by frame index.
    labels: BTreeMap<usize, String>,
    /// Span sequence, rebuilt lazily after a mutation.
    spans: OnceCell<Vec<Span>>,
    /// Set on every mutation, cleared after a save.
    dirty: bool,
}

impl AnnotationStore {
    /// Create an empty store for a video with `frame_count` frames.
    pub fn new(schema: Arc<LabelSchema>, frame_count: usize) -> Self {
        Self {
            schema,
            frame_count,
            labels: BTreeMap::new(),
            spans: OnceCell::new(),
            dirty: false,
        }
    }

    /// Total frames in the video.
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// The label schema this store validates against.
    pub fn schema(&self) -> &Arc<LabelSchema> {
        &self.schema
    }

    /// Check if there are unsaved changes.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag (call after saving).
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    fn invalidate(&mut self) {
        self.spans.take();
        self.dirty = true;
    }

    fn check_frame(&self, frame: usize) -> Result<(), AnnotationError> {
        if frame < self.frame_count {
            Ok(())
        } else {
            Err(AnnotationError::OutOfRange {
                frame,
                frame_count: self.frame_count,
            })
        }
    }

    fn check_token(&self, token: &str) -> Result<(), AnnotationError> {
        if self.schema.contains(token) {
            Ok(())
        } else {
            Err(AnnotationError::UnknownLabel(token.to_string()))
        }
    }

    /// Label `frame` with `token`, overwriting any existing label.
    ///
    /// Returns the previous label.
    pub fn set_label(&mut self, frame: usize, token: &str) -> Result<Option<String>, AnnotationError> {
        self.check_frame(frame)?;
        self.check_token(token)?;

        let previous = self.labels.insert(frame, token.to_string());
        if previous.as_deref() != Some(token) {
            self.invalidate();
        }
        Ok(previous)
    }

    /// Remove the label at `frame`. No-op if already unlabeled.
    ///
    /// Returns the removed label.
    pub fn clear_label(&mut self, frame: usize) -> Result<Option<String>, AnnotationError> {
        self.check_frame(frame)?;

        let previous = self.labels.remove(&frame);
        if previous.is_some() {
            self.invalidate();
        }
        Ok(previous)
    }

    /// Get the label at `frame`, if any.
    pub fn get_label(&self, frame: usize) -> Option<&str> {
        self.labels.get(&frame).map(String::as_str)
    }

    /// Label every frame in `range` with `token`.
    ///
    /// All frames and the token are validated before anything is written,
    /// so either the whole range is set or nothing is. Returns the changes
    /// for frames whose label actually changed.
    pub fn set_range(
        &mut self,
        range: RangeInclusive<usize>,
        token: &str,
    ) -> Result<Vec<LabelChange>, AnnotationError> {
        if range.is_empty() {
            return Ok(Vec::new());
        }
        self.check_frame(*range.end())?;
        self.check_token(token)?;

        let mut changes = Vec::new();
        for frame in range {
            let before = self.labels.insert(frame, token.to_string());
            if before.as_deref() != Some(token) {
                changes.push(LabelChange {
                    frame,
                    before,
                    after: Some(token.to_string()),
                });
            }
        }
        if !changes.is_empty() {
            self.invalidate();
        }
        Ok(changes)
    }

    /// Apply a recorded change, writing its `after` value.
    ///
    /// Used by undo/redo; the `after` token is validated like any other write.
    pub fn apply_change(&mut self, change: &LabelChange) -> Result<(), AnnotationError> {
        match &change.after {
            Some(token) => self.set_label(change.frame, token).map(|_| ()),
            None => self.clear_label(change.frame).map(|_| ()),
        }
    }

    /// Ordered spans partitioning `[0, frame_count)`.
    ///
    /// Consecutive frames with equal labels are coalesced; each unlabeled run
    /// is its own span. The sequence is cached until the next mutation.
    pub fn spans(&self) -> &[Span] {
        self.spans.get_or_init(|| self.compute_spans())
    }

    fn compute_spans(&self) -> Vec<Span> {
        let mut spans: Vec<Span> = Vec::new();
        let mut next = 0;

        for (&frame, token) in &self.labels {
            if frame > next {
                spans.push(Span::new(None, next, frame - 1));
            }
            match spans.last_mut() {
                Some(last) if last.end + 1 == frame && last.label.as_deref() == Some(token) => {
                    last.end = frame;
                }
                _ => spans.push(Span::new(Some(token), frame, frame)),
            }
            next = frame + 1;
        }
        if next < self.frame_count {
            spans.push(Span::new(None, next, self.frame_count - 1));
        }

        spans
    }

    /// The maximal unlabeled run containing `frame`, as `(start, end_inclusive)`.
    ///
    /// Returns `None` if `frame` is labeled or out of range.
    pub fn first_unlabeled_run_containing(&self, frame: usize) -> Option<(usize, usize)> {
        if frame >= self.frame_count || self.labels.contains_key(&frame) {
            return None;
        }

        let start = self
            .labels
            .range(..frame)
            .next_back()
            .map_or(0, |(&f, _)| f + 1);
        let end = self
            .labels
            .range(frame + 1..)
            .next()
            .map_or(self.frame_count - 1, |(&f, _)| f - 1);

        Some((start, end))
    }

    /// Iterate over labeled frames in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.labels.iter().map(|(&f, t)| (f, t.as_str()))
    }

    /// Number of labeled frames.
    pub fn labeled_count(&self) -> usize {
        self.labels.len()
    }

    /// Whether no frame is labeled.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
