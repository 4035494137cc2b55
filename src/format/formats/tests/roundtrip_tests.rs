//! Save/load round trips through the file system.

use std::sync::Arc;

use crate::annotation::AnnotationStore;
use crate::format::error::FormatError;
use crate::format::formats::{FrameTableFormat, LegacySparseFormat};
use crate::format::registry::FormatRegistry;
use crate::format::traits::{LoadOptions, RecordFormat};
use crate::keybindings::Key;
use crate::model::{LabelDef, LabelSchema};

fn schema() -> Arc<LabelSchema> {
    Arc::new(
        LabelSchema::new(vec![
            LabelDef::new("no", "gaze", [0, 0, 0], Key::Char('1')),
            LabelDef::new("see", "gaze", [255, 0, 0], Key::Char('2')),
            LabelDef::new("video_L", "video", [0, 255, 0], Key::Char('3')),
        ])
        .unwrap(),
    )
}

fn labeled_store() -> AnnotationStore {
    let mut store = AnnotationStore::new(schema(), 200);
    store.set_range(10..=40, "see").unwrap();
    store.set_range(41..=41, "no").unwrap();
    store.set_range(120..=199, "video_L").unwrap();
    store
}

#[test]
fn test_frame_table_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clip_labels.csv");
    let store = labeled_store();

    let saved = FrameTableFormat.save(&store, &path).unwrap();
    assert_eq!(saved.rows_written, 200);
    assert_eq!(saved.labeled_rows, store.labeled_count());
    assert!(!dir.path().join("clip_labels.csv.tmp").exists());

    let loaded = FrameTableFormat
        .load(&path, &schema(), 200, &LoadOptions::default())
        .unwrap();
    assert!(loaded.warnings.is_empty());
    assert_eq!(loaded.store.spans(), store.spans());
}

#[test]
fn test_save_replaces_previous_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clip_labels.csv");

    FrameTableFormat.save(&labeled_store(), &path).unwrap();

    let mut store = AnnotationStore::new(schema(), 3);
    store.set_label(0, "no").unwrap();
    FrameTableFormat.save(&store, &path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text, "frame_index,label\n0,no\n1,\n2,\n");
}

#[test]
fn test_load_rejects_record_for_other_video() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clip_labels.csv");
    FrameTableFormat.save(&labeled_store(), &path).unwrap();

    let err = FrameTableFormat
        .load(&path, &schema(), 150, &LoadOptions::default())
        .unwrap_err();
    assert!(matches!(
        err,
        FormatError::FrameCountMismatch {
            expected: 150,
            found: 200
        }
    ));
}

#[test]
fn test_load_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = FrameTableFormat
        .load(
            &dir.path().join("absent_labels.csv"),
            &schema(),
            10,
            &LoadOptions::default(),
        )
        .unwrap_err();
    assert!(matches!(err, FormatError::Io(_)));
}

#[test]
fn test_legacy_import_then_native_save() {
    let legacy = "frame,mode,group\n1,see,gaze\n2,see,gaze\n4,no,gaze\n";
    let registry = FormatRegistry::new();
    let format = registry.detect(legacy).unwrap();
    assert_eq!(format.id(), LegacySparseFormat.id());

    let imported = format
        .decode(legacy, &schema(), 6, &LoadOptions::default())
        .unwrap();
    let text = registry.native().encode(&imported.store).unwrap();
    assert_eq!(text, "frame_index,label\n0,\n1,see\n2,see\n3,\n4,no\n5,\n");

    let reloaded = registry
        .native()
        .decode(&text, &schema(), 6, &LoadOptions::default())
        .unwrap();
    assert_eq!(reloaded.store.spans(), imported.store.spans());
}
