//! Tests for the frame table format.

use std::sync::Arc;

use crate::annotation::AnnotationStore;
use crate::format::error::FormatError;
use crate::format::formats::{FRAME_TABLE_HEADER, FrameTableFormat};
use crate::format::traits::{LoadOptions, RecordFormat, UnknownLabelPolicy, WarningSeverity};
use crate::keybindings::Key;
use crate::model::{LabelDef, LabelSchema};

fn schema() -> Arc<LabelSchema> {
    Arc::new(
        LabelSchema::new(vec![
            LabelDef::new("no", "gaze", [0, 0, 0], Key::Char('1')),
            LabelDef::new("see", "gaze", [255, 0, 0], Key::Char('2')),
        ])
        .unwrap(),
    )
}

fn decode(text: &str, frame_count: usize) -> Result<crate::format::LoadResult, FormatError> {
    FrameTableFormat.decode(text, &schema(), frame_count, &LoadOptions::default())
}

#[test]
fn test_frame_table_metadata() {
    let format = FrameTableFormat;

    assert_eq!(format.id(), "frame_table");
    assert_eq!(format.display_name(), "Frame table (CSV)");
    assert!(format.supports_export());
    assert!(format.matches_header("frame_index,label"));
    assert!(format.matches_header("\u{feff}frame_index,label\r"));
    assert!(!format.matches_header("frame,mode,group"));
}

#[test]
fn test_encode_writes_every_frame() {
    let mut store = AnnotationStore::new(schema(), 4);
    store.set_label(1, "no").unwrap();
    store.set_label(2, "see").unwrap();

    let text = FrameTableFormat.encode(&store).unwrap();
    assert_eq!(text, "frame_index,label\n0,\n1,no\n2,see\n3,\n");
}

#[test]
fn test_encode_empty_video_is_header_only() {
    let store = AnnotationStore::new(schema(), 0);
    let text = FrameTableFormat.encode(&store).unwrap();
    assert_eq!(text, format!("{FRAME_TABLE_HEADER}\n"));
}

#[test]
fn test_decode_valid_table() {
    let result = decode("frame_index,label\n0,\n1,no\n2,no\n3,see\n", 4).unwrap();
    let store = result.store;

    assert!(result.warnings.is_empty());
    assert_eq!(store.get_label(0), None);
    assert_eq!(store.get_label(1), Some("no"));
    assert_eq!(store.get_label(3), Some("see"));
    assert_eq!(store.labeled_count(), 3);
    assert!(!store.is_dirty());
}

#[test]
fn test_decode_accepts_crlf_and_trailing_blank_lines() {
    let result = decode("frame_index,label\r\n0,no\r\n1,\r\n\r\n", 2).unwrap();
    assert_eq!(result.store.get_label(0), Some("no"));
    assert_eq!(result.store.get_label(1), None);
}

#[test]
fn test_decode_missing_header() {
    let err = decode("0,no\n1,no\n", 2).unwrap_err();
    assert!(matches!(err, FormatError::MissingHeader { .. }));

    let err = decode("", 0).unwrap_err();
    assert!(matches!(err, FormatError::MissingHeader { .. }));
}

#[test]
fn test_decode_row_count_mismatch() {
    let err = decode("frame_index,label\n0,\n1,\n", 3).unwrap_err();
    assert!(matches!(
        err,
        FormatError::FrameCountMismatch {
            expected: 3,
            found: 2
        }
    ));
}

#[test]
fn test_decode_duplicate_frame() {
    let err = decode("frame_index,label\n0,\n0,no\n", 2).unwrap_err();
    assert!(matches!(err, FormatError::DuplicateFrame { line: 3, frame: 0 }));
}

#[test]
fn test_decode_out_of_order() {
    let err = decode("frame_index,label\n1,\n0,\n", 2).unwrap_err();
    assert!(matches!(
        err,
        FormatError::OutOfOrder {
            line: 2,
            expected: 0,
            found: 1
        }
    ));
}

#[test]
fn test_decode_frame_out_of_range() {
    let err = decode("frame_index,label\n0,\n5,\n", 2).unwrap_err();
    assert!(matches!(
        err,
        FormatError::FrameOutOfRange {
            line: 3,
            frame: 5,
            frame_count: 2
        }
    ));
}

#[test]
fn test_decode_malformed_rows() {
    let err = decode("frame_index,label\nzero,no\n", 1).unwrap_err();
    assert!(matches!(err, FormatError::InvalidRow { line: 2, .. }));

    let err = decode("frame_index,label\n0\n", 1).unwrap_err();
    assert!(matches!(err, FormatError::InvalidRow { line: 2, .. }));
}

#[test]
fn test_decode_unknown_label_clears_and_warns() {
    let result = decode("frame_index,label\n0,no\n1,blink\n2,see\n", 3).unwrap();

    assert_eq!(result.store.get_label(1), None);
    assert_eq!(result.store.get_label(2), Some("see"));
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].line, Some(3));
    assert_eq!(result.warnings[0].severity, WarningSeverity::Warning);
    assert!(result.warnings[0].message.contains("blink"));
}

#[test]
fn test_decode_unknown_label_rejected() {
    let options = LoadOptions::new().unknown_labels(UnknownLabelPolicy::Reject);
    let err = FrameTableFormat
        .decode("frame_index,label\n0,blink\n", &schema(), 1, &options)
        .unwrap_err();

    match err {
        FormatError::UnknownLabel { line, token } => {
            assert_eq!(line, 2);
            assert_eq!(token, "blink");
        }
        other => panic!("unexpected error: {other}"),
    }
}
