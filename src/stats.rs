//! Per-label frame counts and durations.

use std::collections::BTreeMap;

use crate::annotation::AnnotationStore;
use crate::constants::DEFAULT_FPS;

/// Frame counts per label token for one store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelStats {
    /// Frames per token, sorted by token
    pub counts: BTreeMap<String, usize>,
    /// Labeled frames in total
    pub total: usize,
}

impl LabelStats {
    /// Count the labeled frames of `store`.
    pub fn from_store(store: &AnnotationStore) -> Self {
        let mut counts = BTreeMap::new();
        for (_, token) in store.iter() {
            *counts.entry(token.to_string()).or_insert(0) += 1;
        }
        Self {
            total: store.labeled_count(),
            counts,
        }
    }

    /// Whether nothing is labeled.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Duration of `frames` frames in milliseconds, rounded.
    pub fn duration_ms(frames: usize, fps: f64) -> u64 {
        let fps = if fps > 0.0 { fps } else { DEFAULT_FPS };
        (frames as f64 * 1000.0 / fps).round() as u64
    }

    /// Aligned report lines, one per token followed by a total.
    ///
    /// ```text
    /// no    : 12 -> 400 (msec)
    /// see   :  3 -> 100 (msec)
    /// Total : 15 -> 500 (msec)
    /// ```
    pub fn lines(&self, fps: f64) -> Vec<String> {
        if self.is_empty() {
            return vec!["(no labeled frames)".to_string()];
        }

        const TOTAL: &str = "Total";
        let name_width = self
            .counts
            .keys()
            .map(|k| k.chars().count())
            .max()
            .unwrap_or(0)
            .max(TOTAL.len());
        let frames_width = self.total.to_string().len();
        let ms_width = Self::duration_ms(self.total, fps).to_string().len();

        let row = |name: &str, frames: usize| {
            format!(
                "{name:<name_width$} : {frames:>frames_width$} -> {ms:>ms_width$} (msec)",
                ms = Self::duration_ms(frames, fps)
            )
        };

        let mut lines: Vec<String> = self
            .counts
            .iter()
            .map(|(token, &frames)| row(token, frames))
            .collect();
        lines.push(row(TOTAL, self.total));
        lines
    }
}
