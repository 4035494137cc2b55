//! Input mode state machine.
//!
//! Turns raw key, scroll, and timer events into label mutations on an
//! [`AnnotationStore`] and commands to a [`FrameNavigator`]. Events are
//! processed one at a time to completion. Hold-to-repeat and playback are
//! driven by [`InputEvent::Tick`], so nothing runs in the background.
//!
//! Two modes exist:
//! - **Default**: a label key tap labels the current frame and advances by
//!   one. Holding past the hold threshold starts auto-advance, labeling one
//!   frame per interval until release or the end of the video.
//! - **Scroll**: scrolling while a label key is held paints every frame
//!   crossed, including the start and destination frames.

use std::sync::Arc;
use std::time::Duration;

use crate::annotation::{AnnotationStore, LabelChange};
use crate::config::{Config, MouseSettings, Timings};
use crate::gap_fill::{GapFillError, fill_gap};
use crate::keybindings::{AppAction, Key, KeyBindings};
use crate::model::LabelSchema;
use crate::navigator::FrameNavigator;
use crate::timeline::TimelineDisplay;
use crate::undo::{Command, UndoStack};

/// Labeling workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Tap to tag and advance, hold to auto-advance
    #[default]
    Default,
    /// Paint labels by scroll distance
    Scroll,
}

impl InputMode {
    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            InputMode::Default => InputMode::Scroll,
            InputMode::Scroll => InputMode::Default,
        }
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            InputMode::Default => "default",
            InputMode::Scroll => "scroll",
        }
    }
}

/// Raw input delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// A key went down. Auto-repeats of a held key are ignored.
    KeyDown(Key),
    /// A key was released after being held for `held`.
    KeyUp {
        /// The released key
        key: Key,
        /// Time between press and release as measured by the host
        held: Duration,
    },
    /// Scroll by `ticks`; positive moves forward in the video.
    Scroll {
        /// Signed tick count
        ticks: i32,
        /// Whether the fast modifier was held
        fast: bool,
    },
    /// Time passed since the previous tick.
    Tick(Duration),
}

/// Outcome reported to the timeline renderer and status display.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// A frame received a label
    LabelSet {
        /// The labeled frame
        frame: usize,
        /// The label written
        token: String,
    },
    /// A frame lost its label
    LabelCleared {
        /// The cleared frame
        frame: usize,
    },
    /// The span sequence changed and should be redrawn
    SpansChanged,
    /// The current frame moved
    FrameChanged(usize),
    /// The input mode flipped
    ModeChanged(InputMode),
    /// Playback started or stopped
    PlaybackChanged {
        /// Whether playback now runs
        playing: bool,
    },
    /// The timeline display format flipped
    DisplayToggled(TimelineDisplay),
    /// Gap-fill labeled a run
    GapFilled {
        /// First filled frame
        start: usize,
        /// Last filled frame (inclusive)
        end: usize,
        /// The label written
        token: String,
    },
    /// Gap-fill did nothing
    GapFillFailed(GapFillError),
    /// An edit was undone
    Undone(String),
    /// An edit was redone
    Redone(String),
    /// Auto-advance or playback reached the last frame
    EndOfVideo,
    /// The save key was pressed
    SaveRequested,
    /// The record was written
    Saved {
        /// Record file
        path: std::path::PathBuf,
    },
    /// Writing the record failed
    SaveFailed {
        /// Error description
        message: String,
    },
}

/// Everything an event may touch, borrowed for the duration of one event.
pub struct EditContext<'a> {
    /// Labels of the open video
    pub store: &'a mut AnnotationStore,
    /// Playback position of the open video
    pub navigator: &'a mut dyn FrameNavigator,
    /// Undo history of the open video
    pub history: &'a mut UndoStack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HoldPhase {
    /// Held, threshold not reached
    Pending,
    /// Labeling one frame per interval
    AutoAdvancing,
    /// Auto-advance hit the last frame
    Exhausted,
}

/// A label key that is currently down.
#[derive(Debug, Clone)]
struct HeldLabel {
    key: Key,
    token: String,
    held_for: Duration,
    since_step: Duration,
    phase: HoldPhase,
    /// A label was already applied during this hold, so release is not a tap
    acted: bool,
    /// Changes made during this hold, committed as one undo step
    changes: Vec<LabelChange>,
}

impl HeldLabel {
    fn new(key: Key, token: &str) -> Self {
        Self {
            key,
            token: token.to_string(),
            held_for: Duration::ZERO,
            since_step: Duration::ZERO,
            phase: HoldPhase::Pending,
            acted: false,
            changes: Vec::new(),
        }
    }
}

/// The input state machine for one session.
#[derive(Debug, Clone)]
pub struct InputMachine {
    bindings: KeyBindings,
    schema: Arc<LabelSchema>,
    timings: Timings,
    mouse: MouseSettings,
    mode: InputMode,
    display: TimelineDisplay,
    held: Option<HeldLabel>,
    playback_elapsed: Duration,
}

impl InputMachine {
    /// Create a machine in default mode with nothing held.
    pub fn new(config: &Config) -> Self {
        Self {
            bindings: config.bindings.clone(),
            schema: Arc::clone(&config.schema),
            timings: config.timings,
            mouse: config.mouse,
            mode: InputMode::Default,
            display: config.timeline.display,
            held: None,
            playback_elapsed: Duration::ZERO,
        }
    }

    /// Current input mode.
    pub fn mode(&self) -> InputMode {
        self.mode
    }

    /// Current timeline display format.
    pub fn display(&self) -> TimelineDisplay {
        self.display
    }

    /// Token of the label key currently held, if any.
    pub fn held_label(&self) -> Option<&str> {
        self.held.as_ref().map(|h| h.token.as_str())
    }

    /// Whether a held key is auto-advancing.
    pub fn is_auto_advancing(&self) -> bool {
        self.held
            .as_ref()
            .is_some_and(|h| h.phase == HoldPhase::AutoAdvancing)
    }

    /// Drop any held key, committing its edits. Used when the video changes.
    pub fn release_all(&mut self, history: &mut UndoStack) {
        if let Some(held) = self.held.take() {
            commit_hold(held, history);
        }
        self.playback_elapsed = Duration::ZERO;
    }

    /// Process one event to completion.
    pub fn handle(&mut self, ctx: &mut EditContext<'_>, event: InputEvent) -> Vec<Notice> {
        let frame_before = ctx.navigator.current_frame();
        let mut notices = Vec::new();

        match event {
            InputEvent::KeyDown(key) => self.key_down(ctx, key, &mut notices),
            InputEvent::KeyUp { key, held } => self.key_up(ctx, key, held, &mut notices),
            InputEvent::Scroll { ticks, fast } => self.scroll(ctx, ticks, fast, &mut notices),
            InputEvent::Tick(dt) => self.tick(ctx, dt, &mut notices),
        }

        let frame_after = ctx.navigator.current_frame();
        if frame_after != frame_before {
            notices.push(Notice::FrameChanged(frame_after));
        }
        if notices.iter().any(changes_spans) {
            notices.push(Notice::SpansChanged);
        }
        notices
    }

    fn key_down(&mut self, ctx: &mut EditContext<'_>, key: Key, notices: &mut Vec<Notice>) {
        if let Some(action) = self.bindings.action_for_key(key) {
            self.action(ctx, action, notices);
            return;
        }

        let Some(def) = self.schema.lookup_by_key(key) else {
            log::trace!("Ignoring unbound key {}", key);
            return;
        };

        if let Some(held) = &self.held {
            if held.key == key {
                return;
            }
        }
        let token = def.token.clone();
        if let Some(previous) = self.held.take() {
            log::debug!("Label key {} pressed over pending '{}'", key, previous.token);
            self.finish_hold(ctx, previous, notices);
        }
        log::debug!("Label key {} ('{}') down", key, token);
        self.held = Some(HeldLabel::new(key, &token));
    }

    fn key_up(
        &mut self,
        ctx: &mut EditContext<'_>,
        key: Key,
        held: Duration,
        notices: &mut Vec<Notice>,
    ) {
        let Some(hold) = self.held.take_if(|h| h.key == key) else {
            return;
        };
        log::debug!(
            "Label key {} ('{}') up after {:?}, phase {:?}",
            key,
            hold.token,
            held,
            hold.phase
        );
        self.finish_hold(ctx, hold, notices);
    }

    /// End a hold. One that never labeled anything counts as a tap.
    fn finish_hold(&self, ctx: &mut EditContext<'_>, mut hold: HeldLabel, notices: &mut Vec<Notice>) {
        if !hold.acted {
            let frame = ctx.navigator.current_frame();
            let token = hold.token.clone();
            apply_label(ctx, &mut hold.changes, frame, &token, notices);
            if self.mode == InputMode::Default {
                ctx.navigator.step(1);
            }
        }

        commit_hold(hold, ctx.history);
    }

    fn scroll(&mut self, ctx: &mut EditContext<'_>, ticks: i32, fast: bool, notices: &mut Vec<Notice>) {
        if ticks == 0 {
            return;
        }
        let multiplier = if fast { self.mouse.fast_multiplier } else { 1 };
        let delta = i64::from(ticks) * i64::from(self.mouse.step) * i64::from(multiplier);

        let from = ctx.navigator.current_frame();
        let to = ctx.navigator.step(delta);

        let Some(hold) = self.held.as_mut() else {
            return;
        };
        let token = hold.token.clone();
        match self.mode {
            InputMode::Scroll => {
                for frame in from.min(to)..=from.max(to) {
                    apply_label(ctx, &mut hold.changes, frame, &token, notices);
                }
            }
            InputMode::Default => {
                apply_label(ctx, &mut hold.changes, to, &token, notices);
            }
        }
        hold.acted = true;
    }

    fn tick(&mut self, ctx: &mut EditContext<'_>, dt: Duration, notices: &mut Vec<Notice>) {
        if let Some(hold) = self.held.as_mut() {
            hold.held_for += dt;
        }
        match self.mode {
            InputMode::Scroll => self.delayed_label(ctx, notices),
            InputMode::Default => self.advance_hold(ctx, dt, notices),
        }

        if ctx.navigator.is_playing() {
            self.advance_playback(ctx, dt, notices);
        }
    }

    fn delayed_label(&mut self, ctx: &mut EditContext<'_>, notices: &mut Vec<Notice>) {
        let Some(hold) = self.held.as_mut() else {
            return;
        };
        if hold.acted || hold.held_for < self.timings.label_delay {
            return;
        }
        let frame = ctx.navigator.current_frame();
        let token = hold.token.clone();
        apply_label(ctx, &mut hold.changes, frame, &token, notices);
        hold.acted = true;
    }

    fn advance_hold(&mut self, ctx: &mut EditContext<'_>, dt: Duration, notices: &mut Vec<Notice>) {
        let Some(hold) = self.held.as_mut() else {
            return;
        };

        match hold.phase {
            HoldPhase::Pending => {
                if hold.held_for < self.timings.hold_threshold {
                    return;
                }
                log::debug!("⏩ Auto-advance started with '{}'", hold.token);
                hold.phase = HoldPhase::AutoAdvancing;
                hold.since_step = hold.held_for - self.timings.hold_threshold;
                hold.acted = true;
            }
            HoldPhase::AutoAdvancing => hold.since_step += dt,
            HoldPhase::Exhausted => return,
        }

        let interval = self.timings.auto_advance_interval;
        let token = hold.token.clone();
        while hold.since_step >= interval {
            hold.since_step -= interval;
            let frame = ctx.navigator.current_frame();
            apply_label(ctx, &mut hold.changes, frame, &token, notices);
            if ctx.navigator.at_last_frame() {
                log::info!("Auto-advance reached the last frame ({})", frame);
                hold.phase = HoldPhase::Exhausted;
                notices.push(Notice::EndOfVideo);
                break;
            }
            ctx.navigator.step(1);
        }
    }

    fn advance_playback(&mut self, ctx: &mut EditContext<'_>, dt: Duration, notices: &mut Vec<Notice>) {
        let interval = self.timings.playback_interval;
        self.playback_elapsed += dt;
        while self.playback_elapsed >= interval {
            self.playback_elapsed -= interval;
            if ctx.navigator.at_last_frame() {
                ctx.navigator.set_playing(false);
                self.playback_elapsed = Duration::ZERO;
                log::info!("Playback reached the end of the video");
                notices.push(Notice::PlaybackChanged { playing: false });
                notices.push(Notice::EndOfVideo);
                break;
            }
            ctx.navigator.step(1);
        }
    }

    fn action(&mut self, ctx: &mut EditContext<'_>, action: AppAction, notices: &mut Vec<Notice>) {
        log::trace!("Action: {}", action.name());
        match action {
            AppAction::PrevFrame => {
                ctx.navigator.step(-1);
            }
            AppAction::NextFrame => {
                ctx.navigator.step(1);
            }
            AppAction::TogglePlay => {
                let playing = !ctx.navigator.is_playing();
                ctx.navigator.set_playing(playing);
                self.playback_elapsed = Duration::ZERO;
                notices.push(Notice::PlaybackChanged {
                    playing: ctx.navigator.is_playing(),
                });
            }
            AppAction::ToggleMode => {
                if let Some(held) = self.held.take() {
                    commit_hold(held, ctx.history);
                }
                self.mode = self.mode.toggled();
                log::info!("Input mode: {}", self.mode.name());
                notices.push(Notice::ModeChanged(self.mode));
            }
            AppAction::Fillin => self.fill(ctx, notices),
            AppAction::ToggleDisplayFormat => {
                self.display = self.display.toggled();
                notices.push(Notice::DisplayToggled(self.display));
            }
            AppAction::ClearLabel => {
                let frame = ctx.navigator.current_frame();
                match ctx.store.clear_label(frame) {
                    Ok(Some(before)) => {
                        self.flush_hold(ctx.history);
                        ctx.history.push(Command::Clear {
                            change: LabelChange {
                                frame,
                                before: Some(before),
                                after: None,
                            },
                        });
                        notices.push(Notice::LabelCleared { frame });
                    }
                    Ok(None) => {}
                    Err(e) => log::error!("Clear label failed: {}", e),
                }
            }
            AppAction::Undo => {
                self.flush_hold(ctx.history);
                let description = ctx.history.undo_description();
                match ctx.history.undo(ctx.store) {
                    Ok(Some(applied)) => {
                        push_applied(&applied, notices);
                        notices.push(Notice::Undone(description.unwrap_or_default()));
                    }
                    Ok(None) => log::debug!("Nothing to undo"),
                    Err(e) => log::error!("Undo failed: {}", e),
                }
            }
            AppAction::Redo => {
                self.flush_hold(ctx.history);
                let description = ctx.history.redo_description();
                match ctx.history.redo(ctx.store) {
                    Ok(Some(applied)) => {
                        push_applied(&applied, notices);
                        notices.push(Notice::Redone(description.unwrap_or_default()));
                    }
                    Ok(None) => log::debug!("Nothing to redo"),
                    Err(e) => log::error!("Redo failed: {}", e),
                }
            }
            AppAction::Save => notices.push(Notice::SaveRequested),
        }
    }

    fn fill(&mut self, ctx: &mut EditContext<'_>, notices: &mut Vec<Notice>) {
        let frame = ctx.navigator.current_frame();
        match fill_gap(ctx.store, frame) {
            Ok(filled) => {
                self.flush_hold(ctx.history);
                notices.push(Notice::GapFilled {
                    start: filled.start,
                    end: filled.end,
                    token: filled.token.clone(),
                });
                ctx.history.push(Command::FillGap {
                    start: filled.start,
                    end: filled.end,
                    token: filled.token,
                    changes: filled.changes,
                });
            }
            Err(e) => notices.push(Notice::GapFillFailed(e)),
        }
    }

    /// Commit edits of the current hold so far, keeping the hold active.
    fn flush_hold(&mut self, history: &mut UndoStack) {
        if let Some(hold) = self.held.as_mut() {
            if !hold.changes.is_empty() {
                history.push(Command::Label {
                    token: hold.token.clone(),
                    changes: std::mem::take(&mut hold.changes),
                });
            }
        }
    }
}

fn commit_hold(hold: HeldLabel, history: &mut UndoStack) {
    if !hold.changes.is_empty() {
        history.push(Command::Label {
            token: hold.token,
            changes: hold.changes,
        });
    }
}

/// Label `frame`, recording the change if the label actually changed.
fn apply_label(
    ctx: &mut EditContext<'_>,
    changes: &mut Vec<LabelChange>,
    frame: usize,
    token: &str,
    notices: &mut Vec<Notice>,
) {
    match ctx.store.set_label(frame, token) {
        Ok(before) => {
            if before.as_deref() != Some(token) {
                changes.push(LabelChange {
                    frame,
                    before,
                    after: Some(token.to_string()),
                });
                notices.push(Notice::LabelSet {
                    frame,
                    token: token.to_string(),
                });
            }
        }
        Err(e) => log::error!("Label at frame {} failed: {}", frame, e),
    }
}

fn push_applied(applied: &[LabelChange], notices: &mut Vec<Notice>) {
    for change in applied {
        notices.push(match &change.after {
            Some(token) => Notice::LabelSet {
                frame: change.frame,
                token: token.clone(),
            },
            None => Notice::LabelCleared {
                frame: change.frame,
            },
        });
    }
}

fn changes_spans(notice: &Notice) -> bool {
    matches!(
        notice,
        Notice::LabelSet { .. } | Notice::LabelCleared { .. } | Notice::GapFilled { .. }
    )
}
