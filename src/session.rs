//! One open video: its labels, position, history, and record file.
//!
//! Exactly one [`AnnotationStore`] is live per session. Switching videos
//! saves the outgoing store before the incoming one is built, and closing
//! the session saves as well.
//!
//! A record that exists but cannot be loaded is never overwritten by an
//! unedited store. Once the user edits, the unreadable file is moved to
//! `<stem>_labels.csv.bak` before the first save.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::annotation::AnnotationStore;
use crate::config::Config;
use crate::format::{
    AutoSaveManager, FormatError, FormatRegistry, FormatWarning, LoadOptions,
    record_path,
};
use crate::input::{EditContext, InputEvent, InputMachine, Notice};
use crate::model::LabelSchema;
use crate::navigator::FrameNavigator;
use crate::stats::LabelStats;
use crate::timeline::format_frame;
use crate::undo::{UndoConfig, UndoStack};

/// Annotation session for one video.
pub struct Session<N: FrameNavigator> {
    schema: Arc<LabelSchema>,
    timeline_pattern: String,
    load_options: LoadOptions,
    registry: FormatRegistry,
    video_path: PathBuf,
    record_path: PathBuf,
    store: AnnotationStore,
    navigator: N,
    machine: InputMachine,
    history: UndoStack,
    auto_save: AutoSaveManager,
    undo_history: usize,
    /// The record on disk failed to load and has not been moved aside yet
    record_unreadable: bool,
}

impl<N: FrameNavigator> Session<N> {
    /// Open `video_path` and load its record if one exists.
    ///
    /// A missing record starts an empty store. A record that cannot be read
    /// or does not match the video also starts an empty store, and the
    /// problem is returned as an error-level warning. That record is left
    /// untouched until the store is edited.
    pub fn open(
        config: &Config,
        video_path: impl AsRef<Path>,
        navigator: N,
    ) -> (Self, Vec<FormatWarning>) {
        let mut session = Self {
            schema: Arc::clone(&config.schema),
            timeline_pattern: config.timeline.pattern.clone(),
            load_options: LoadOptions::new().unknown_labels(config.unknown_labels),
            registry: FormatRegistry::new(),
            video_path: PathBuf::new(),
            record_path: PathBuf::new(),
            store: AnnotationStore::new(Arc::clone(&config.schema), 0),
            navigator,
            machine: InputMachine::new(config),
            history: UndoStack::with_config(UndoConfig {
                max_history: config.undo_history,
            }),
            auto_save: AutoSaveManager::from_config(&config.autosave),
            undo_history: config.undo_history,
            record_unreadable: false,
        };
        let warnings = session.load_video(video_path.as_ref());
        (session, warnings)
    }

    fn load_video(&mut self, video_path: &Path) -> Vec<FormatWarning> {
        self.video_path = video_path.to_path_buf();
        self.record_path = record_path(video_path);
        let frame_count = self.navigator.frame_count();
        self.record_unreadable = false;

        let (store, warnings) = match self.read_record(frame_count) {
            Ok(Some((store, warnings))) => (store, warnings),
            Ok(None) => {
                log::info!(
                    "No record at {:?}, starting with {} unlabeled frames",
                    self.record_path,
                    frame_count
                );
                (AnnotationStore::new(Arc::clone(&self.schema), frame_count), Vec::new())
            }
            Err(e) => {
                log::warn!("Ignoring record {:?}: {}", self.record_path, e);
                self.record_unreadable = true;
                let warning = FormatWarning::error(format!(
                    "Record {} could not be loaded ({e}), starting empty",
                    self.record_path.display()
                ));
                (
                    AnnotationStore::new(Arc::clone(&self.schema), frame_count),
                    vec![warning],
                )
            }
        };

        self.store = store;
        self.history = UndoStack::with_config(UndoConfig {
            max_history: self.undo_history,
        });
        self.auto_save.reset();
        if self.store.is_dirty() {
            self.auto_save.mark_dirty();
        }
        warnings
    }

    fn read_record(
        &self,
        frame_count: usize,
    ) -> Result<Option<(AnnotationStore, Vec<FormatWarning>)>, FormatError> {
        let text = match std::fs::read_to_string(&self.record_path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let format = self
            .registry
            .detect(&text)
            .ok_or_else(|| FormatError::invalid_format("unrecognized record header"))?;
        log::info!(
            "Loading {} record from {:?}",
            format.display_name(),
            self.record_path
        );
        let result = format.decode(&text, &self.schema, frame_count, &self.load_options)?;
        Ok(Some((result.store, result.warnings)))
    }

    /// Feed one input event through the state machine.
    ///
    /// Save requests are carried out here and reported as
    /// [`Notice::Saved`] or [`Notice::SaveFailed`].
    pub fn handle(&mut self, event: InputEvent) -> Vec<Notice> {
        let mut ctx = EditContext {
            store: &mut self.store,
            navigator: &mut self.navigator,
            history: &mut self.history,
        };
        let mut notices = self.machine.handle(&mut ctx, event);

        if notices.contains(&Notice::SpansChanged) {
            self.auto_save.mark_dirty();
        }
        if notices.contains(&Notice::SaveRequested) {
            notices.push(match self.save() {
                Ok(path) => Notice::Saved { path },
                Err(e) => Notice::SaveFailed {
                    message: e.to_string(),
                },
            });
        }
        notices
    }

    /// Write the record, fully replacing the previous one.
    ///
    /// A record that failed to load is first moved to [`Self::backup_path`].
    pub fn save(&mut self) -> Result<PathBuf, FormatError> {
        if self.record_unreadable {
            self.move_unreadable_record()?;
        }
        match self.registry.native().save(&self.store, &self.record_path) {
            Ok(result) => {
                self.store.clear_dirty();
                self.auto_save.mark_saved();
                Ok(result.path)
            }
            Err(e) => {
                log::error!("Failed to save {:?}: {}", self.record_path, e);
                self.auto_save.mark_save_failed();
                Err(e)
            }
        }
    }

    fn move_unreadable_record(&mut self) -> Result<(), FormatError> {
        let backup = self.backup_path();
        match std::fs::rename(&self.record_path, &backup) {
            Ok(()) => log::warn!("Moved unreadable record to {:?}", backup),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                log::error!("Failed to move {:?} aside: {}", self.record_path, e);
                self.auto_save.mark_save_failed();
                return Err(e.into());
            }
        }
        self.record_unreadable = false;
        Ok(())
    }

    /// Save unless that would replace an unreadable record with an unedited store.
    fn save_if_safe(&mut self) -> Result<PathBuf, FormatError> {
        if self.record_unreadable && !self.store.is_dirty() {
            log::info!("Leaving unreadable record {:?} untouched", self.record_path);
            return Ok(self.record_path.clone());
        }
        self.save()
    }

    /// Save if the auto-save debounce and interval allow it.
    ///
    /// Returns the saved path when a save happened.
    pub fn poll_auto_save(&mut self) -> Result<Option<PathBuf>, FormatError> {
        if !self.auto_save.should_save() {
            return Ok(None);
        }
        if self.record_unreadable && !self.store.is_dirty() {
            return Ok(None);
        }
        log::debug!("💾 Auto-saving {:?}", self.record_path);
        self.save().map(Some)
    }

    /// Save the current video, then open `video_path` with `navigator`.
    ///
    /// If the save fails the session stays on the current video.
    pub fn switch_video(
        &mut self,
        video_path: impl AsRef<Path>,
        navigator: N,
    ) -> Result<Vec<FormatWarning>, FormatError> {
        self.save_if_safe()?;
        self.machine.release_all(&mut self.history);
        self.navigator.set_playing(false);
        self.navigator = navigator;
        log::info!("Switching to {:?}", video_path.as_ref());
        Ok(self.load_video(video_path.as_ref()))
    }

    /// Save and end the session.
    pub fn close(mut self) -> Result<PathBuf, FormatError> {
        self.machine.release_all(&mut self.history);
        self.save_if_safe()
    }

    /// Labels of the open video.
    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    /// Playback position of the open video.
    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    /// Mutable access to the navigator, for hosts that seek directly.
    pub fn navigator_mut(&mut self) -> &mut N {
        &mut self.navigator
    }

    /// Input state machine.
    pub fn machine(&self) -> &InputMachine {
        &self.machine
    }

    /// Undo history of the open video.
    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    /// Path of the open video.
    pub fn video_path(&self) -> &Path {
        &self.video_path
    }

    /// Path of the record file for the open video.
    pub fn record_path(&self) -> &Path {
        &self.record_path
    }

    /// Where an unreadable record is moved before it is replaced.
    pub fn backup_path(&self) -> PathBuf {
        let mut name = self.record_path.clone().into_os_string();
        name.push(".bak");
        PathBuf::from(name)
    }

    /// Whether the record on disk failed to load and is still in place.
    pub fn record_unreadable(&self) -> bool {
        self.record_unreadable
    }

    /// Whether there are unsaved edits.
    pub fn has_unsaved_changes(&self) -> bool {
        self.store.is_dirty()
    }

    /// Per-label counts for the open video.
    pub fn stats(&self) -> LabelStats {
        LabelStats::from_store(&self.store)
    }

    /// Current frame rendered in the active timeline display format.
    pub fn position_label(&self) -> String {
        format_frame(
            self.navigator.current_frame(),
            self.navigator.fps(),
            self.machine.display(),
            &self.timeline_pattern,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::format::UnknownLabelPolicy;
    use crate::keybindings::Key;
    use crate::navigator::VirtualNavigator;

    fn config() -> Config {
        AppConfig::default().build().unwrap()
    }

    #[test]
    fn test_open_without_record() {
        let dir = tempfile::tempdir().unwrap();
        let video = dir.path().join("clip.mp4");
        let (session, warnings) = Session::open(&config(), &video, VirtualNavigator::new(50));

        assert!(warnings.is_empty());
        assert_eq!(session.store().frame_count(), 50);
        assert!(session.store().is_empty());
        assert_eq!(session.record_path(), dir.path().join("clip_labels.csv"));
    }

    #[test]
    fn test_save_key_writes_record() {
        let dir = tempfile::tempdir().unwrap();
        let video = dir.path().join("clip.mp4");
        let (mut session, _) = Session::open(&config(), &video, VirtualNavigator::new(5));

        session.handle(InputEvent::KeyDown(Key::char('2')));
        session.handle(InputEvent::KeyUp {
            key: Key::char('2'),
            held: std::time::Duration::from_millis(40),
        });
        assert!(session.has_unsaved_changes());

        let notices = session.handle(InputEvent::KeyDown(Key::char('w')));
        assert!(notices.iter().any(|n| matches!(n, Notice::Saved { .. })));
        assert!(!session.has_unsaved_changes());

        let text = std::fs::read_to_string(session.record_path()).unwrap();
        assert_eq!(text, "frame_index,label\n0,see\n1,\n2,\n3,\n4,\n");
    }

    #[test]
    fn test_reopen_restores_labels() {
        let dir = tempfile::tempdir().unwrap();
        let video = dir.path().join("clip.mp4");
        let (mut session, _) = Session::open(&config(), &video, VirtualNavigator::new(8));
        session.handle(InputEvent::KeyDown(Key::char('1')));
        session.handle(InputEvent::KeyUp {
            key: Key::char('1'),
            held: std::time::Duration::from_millis(40),
        });
        session.close().unwrap();

        let (session, warnings) = Session::open(&config(), &video, VirtualNavigator::new(8));
        assert!(warnings.is_empty());
        assert_eq!(session.store().get_label(0), Some("no"));
        assert!(!session.has_unsaved_changes());
    }

    #[test]
    fn test_mismatched_record_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let video = dir.path().join("clip.mp4");
        std::fs::write(
            dir.path().join("clip_labels.csv"),
            "frame_index,label\n0,no\n1,no\n",
        )
        .unwrap();

        let (session, warnings) = Session::open(&config(), &video, VirtualNavigator::new(10));
        assert!(session.store().is_empty());
        assert_eq!(session.store().frame_count(), 10);
        assert_eq!(warnings.len(), 1);
        assert_eq!(
            warnings[0].severity,
            crate::format::WarningSeverity::Error
        );
        assert!(session.record_unreadable());
    }

    #[test]
    fn test_mismatched_record_survives_close() {
        let dir = tempfile::tempdir().unwrap();
        let video = dir.path().join("clip.mp4");
        let record = dir.path().join("clip_labels.csv");
        std::fs::write(&record, "frame_index,label\n0,no\n1,see\n").unwrap();

        let (session, _) = Session::open(&config(), &video, VirtualNavigator::new(3));
        session.close().unwrap();

        let text = std::fs::read_to_string(&record).unwrap();
        assert_eq!(text, "frame_index,label\n0,no\n1,see\n");
    }

    #[test]
    fn test_rejected_record_survives_close_and_switch() {
        let dir = tempfile::tempdir().unwrap();
        let video = dir.path().join("clip.mp4");
        let record = dir.path().join("clip_labels.csv");
        let original = "frame_index,label\n0,no\n1,see\n2,retired\n";
        std::fs::write(&record, original).unwrap();

        let mut config = config();
        config.unknown_labels = UnknownLabelPolicy::Reject;

        let (session, warnings) = Session::open(&config, &video, VirtualNavigator::new(3));
        assert_eq!(warnings.len(), 1);
        session.close().unwrap();
        assert_eq!(std::fs::read_to_string(&record).unwrap(), original);

        let (mut session, _) = Session::open(&config, &video, VirtualNavigator::new(3));
        assert_eq!(session.poll_auto_save().unwrap(), None);
        session
            .switch_video(dir.path().join("other.mp4"), VirtualNavigator::new(3))
            .unwrap();
        assert_eq!(std::fs::read_to_string(&record).unwrap(), original);
        assert!(!session.record_unreadable());
    }

    #[test]
    fn test_edit_moves_unreadable_record_aside() {
        let dir = tempfile::tempdir().unwrap();
        let video = dir.path().join("clip.mp4");
        let record = dir.path().join("clip_labels.csv");
        let original = "frame_index,label\n0,no\n1,see\n";
        std::fs::write(&record, original).unwrap();

        let (mut session, _) = Session::open(&config(), &video, VirtualNavigator::new(3));
        session.handle(InputEvent::KeyDown(Key::char('2')));
        session.handle(InputEvent::KeyUp {
            key: Key::char('2'),
            held: std::time::Duration::from_millis(40),
        });
        let backup = session.backup_path();
        assert_eq!(backup, dir.path().join("clip_labels.csv.bak"));
        session.close().unwrap();

        assert_eq!(std::fs::read_to_string(&backup).unwrap(), original);
        assert_eq!(
            std::fs::read_to_string(&record).unwrap(),
            "frame_index,label\n0,see\n1,\n2,\n"
        );
    }

    #[test]
    fn test_legacy_record_is_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let video = dir.path().join("clip.mp4");
        let record = dir.path().join("clip_labels.csv");
        std::fs::write(&record, "frame,mode,group\n1,see,gaze\n").unwrap();

        let (session, _) = Session::open(&config(), &video, VirtualNavigator::new(3));
        assert_eq!(session.store().get_label(1), Some("see"));
        assert!(session.has_unsaved_changes());
        session.close().unwrap();

        let text = std::fs::read_to_string(&record).unwrap();
        assert_eq!(text, "frame_index,label\n0,\n1,see\n2,\n");
    }

    #[test]
    fn test_switch_video_saves_outgoing() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.mp4");
        let second = dir.path().join("b.mp4");
        let (mut session, _) = Session::open(&config(), &first, VirtualNavigator::new(4));
        session.handle(InputEvent::KeyDown(Key::char('3')));
        session.handle(InputEvent::KeyUp {
            key: Key::char('3'),
            held: std::time::Duration::from_millis(40),
        });

        let warnings = session
            .switch_video(&second, VirtualNavigator::new(6))
            .unwrap();
        assert!(warnings.is_empty());
        assert_eq!(session.video_path(), second.as_path());
        assert_eq!(session.store().frame_count(), 6);
        assert!(session.store().is_empty());
        assert!(!session.history().can_undo());

        let text = std::fs::read_to_string(dir.path().join("a_labels.csv")).unwrap();
        assert!(text.starts_with("frame_index,label\n0,video_L\n"));
    }

    #[test]
    fn test_switch_video_aborts_when_save_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing_dir = dir.path().join("gone").join("clip.mp4");
        let (mut session, _) = Session::open(&config(), &missing_dir, VirtualNavigator::new(4));

        let result = session.switch_video(dir.path().join("b.mp4"), VirtualNavigator::new(6));
        assert!(matches!(result, Err(FormatError::Io(_))));
        assert_eq!(session.video_path(), missing_dir.as_path());
        assert_eq!(session.store().frame_count(), 4);
    }

    #[test]
    fn test_poll_auto_save() {
        let dir = tempfile::tempdir().unwrap();
        let video = dir.path().join("clip.mp4");
        let mut app = AppConfig::default();
        app.preferences.autosave.debounce_ms = 0;
        app.preferences.autosave.interval_ms = 0;
        let config = app.build().unwrap();

        let (mut session, _) = Session::open(&config, &video, VirtualNavigator::new(5));
        assert_eq!(session.poll_auto_save().unwrap(), None);

        session.handle(InputEvent::KeyDown(Key::char('1')));
        session.handle(InputEvent::KeyUp {
            key: Key::char('1'),
            held: std::time::Duration::from_millis(40),
        });
        let saved = session.poll_auto_save().unwrap();
        assert_eq!(saved.as_deref(), Some(session.record_path()));
        assert!(!session.has_unsaved_changes());
        assert_eq!(session.poll_auto_save().unwrap(), None);
    }

    #[test]
    fn test_position_label_follows_display_toggle() {
        let dir = tempfile::tempdir().unwrap();
        let video = dir.path().join("clip.mp4");
        let (mut session, _) = Session::open(&config(), &video, VirtualNavigator::new(100));
        session.navigator_mut().seek(45);

        assert_eq!(session.position_label(), "45");
        session.handle(InputEvent::KeyDown(Key::char('t')));
        assert_eq!(session.position_label(), "00:00:01:15");
    }
}
