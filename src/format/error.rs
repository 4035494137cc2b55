//! Error types for label record operations.

use thiserror::Error;

/// Errors that can occur while reading or writing a label record.
#[derive(Error, Debug)]
pub enum FormatError {
    /// I/O error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid format structure or content
    #[error("Invalid format: {message}")]
    InvalidFormat {
        /// Description of the format error
        message: String,
    },

    /// The first line is not a recognized header
    #[error("Missing or unrecognized header, expected '{expected}'")]
    MissingHeader {
        /// Header the format expects
        expected: String,
    },

    /// A row could not be parsed
    #[error("Line {line}: {message}")]
    InvalidRow {
        /// 1-based line number
        line: usize,
        /// Description of the problem
        message: String,
    },

    /// Row count differs from the video's frame count
    #[error("Record has {found} rows but the video has {expected} frames")]
    FrameCountMismatch {
        /// Frame count reported for the video
        expected: usize,
        /// Rows found in the record
        found: usize,
    },

    /// A frame index appears twice
    #[error("Line {line}: frame {frame} appears more than once")]
    DuplicateFrame {
        /// 1-based line number
        line: usize,
        /// The repeated frame index
        frame: usize,
    },

    /// Frame indices are not strictly ascending and contiguous
    #[error("Line {line}: expected frame {expected}, found {found}")]
    OutOfOrder {
        /// 1-based line number
        line: usize,
        /// Frame index that should appear on this line
        expected: usize,
        /// Frame index actually found
        found: usize,
    },

    /// A frame index is outside the video
    #[error("Line {line}: frame {frame} is out of range (video has {frame_count} frames)")]
    FrameOutOfRange {
        /// 1-based line number
        line: usize,
        /// The offending frame index
        frame: usize,
        /// Frame count reported for the video
        frame_count: usize,
    },

    /// A label is not defined in the current schema
    #[error("Line {line}: label '{token}' is not defined in the label schema")]
    UnknownLabel {
        /// 1-based line number
        line: usize,
        /// The unknown token
        token: String,
    },

    /// Operation not supported by this format
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),
}

impl FormatError {
    /// Create an invalid format error with a message.
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    /// Create an invalid row error.
    pub fn invalid_row(line: usize, message: impl Into<String>) -> Self {
        Self::InvalidRow {
            line,
            message: message.into(),
        }
    }
}
