//! Spans: maximal runs of frames sharing one label.

/// A contiguous run of frames carrying the same label, or all unlabeled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    /// Label token, `None` for an unlabeled run
    pub label: Option<String>,
    /// First frame of the run
    pub start: usize,
    /// Last frame of the run (inclusive)
    pub end: usize,
}

impl Span {
    /// Create a new span covering `start..=end`.
    pub fn new(label: Option<&str>, start: usize, end: usize) -> Self {
        Self {
            label: label.map(str::to_string),
            start,
            end,
        }
    }

    /// Number of frames in the span.
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Spans always cover at least one frame.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether `frame` lies inside the span.
    pub fn contains(&self, frame: usize) -> bool {
        (self.start..=self.end).contains(&frame)
    }

    /// Whether the span is an unlabeled run.
    pub fn is_unlabeled(&self) -> bool {
        self.label.is_none()
    }
}
