//! Undo/Redo system for label edits.
//!
//! This module implements the Command pattern to enable undo/redo functionality
//! for label operations. Each undoable action is represented as a Command
//! that records the per-frame changes it made, so it can be reverted and
//! reapplied against the annotation store.

use crate::annotation::{AnnotationError, AnnotationStore, LabelChange};
use crate::constants::DEFAULT_UNDO_HISTORY;

// ============================================================================
// Command Types
// ============================================================================

/// A command that can be undone and redone.
/// Each command stores enough information to reverse its effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Frames labeled by a tap, a hold, or a scroll paint
    Label {
        /// The label that was written
        token: String,
        /// Frames whose label changed
        changes: Vec<LabelChange>,
    },
    /// A label removed from one frame
    Clear {
        /// The removed label
        change: LabelChange,
    },
    /// An unlabeled run filled by gap-fill
    FillGap {
        /// First filled frame
        start: usize,
        /// Last filled frame (inclusive)
        end: usize,
        /// The label that was written
        token: String,
        /// Frames whose label changed
        changes: Vec<LabelChange>,
    },
}

impl Command {
    /// Get a human-readable description of this command
    pub fn description(&self) -> String {
        match self {
            Command::Label { token, changes } => match changes.len() {
                1 => format!("Label frame {} as '{}'", changes[0].frame, token),
                n => format!("Label {n} frames as '{token}'"),
            },
            Command::Clear { change } => format!("Clear frame {}", change.frame),
            Command::FillGap {
                start, end, token, ..
            } => format!("Fill frames {start}-{end} with '{token}'"),
        }
    }

    /// All recorded changes, in the order they were made.
    pub fn changes(&self) -> Vec<&LabelChange> {
        match self {
            Command::Label { changes, .. } | Command::FillGap { changes, .. } => {
                changes.iter().collect()
            }
            Command::Clear { change } => vec![change],
        }
    }
}

// ============================================================================
// Undo Stack
// ============================================================================

/// Configuration for the undo stack
#[derive(Debug, Clone)]
pub struct UndoConfig {
    /// Maximum number of commands to keep in history
    pub max_history: usize,
}

impl Default for UndoConfig {
    fn default() -> Self {
        Self {
            max_history: DEFAULT_UNDO_HISTORY,
        }
    }
}

/// The undo/redo history stack.
///
/// Maintains two stacks:
/// - `undo_stack`: Commands that can be undone (most recent at the end)
/// - `redo_stack`: Commands that can be redone (most recent at the end)
///
/// When a new command is executed, it's pushed to undo_stack and redo_stack is cleared.
/// When undo is called, the command is moved from undo_stack to redo_stack.
/// When redo is called, the command is moved from redo_stack to undo_stack.
#[derive(Debug, Clone, Default)]
pub struct UndoStack {
    /// Stack of commands that can be undone
    undo_stack: Vec<Command>,
    /// Stack of commands that can be redone
    redo_stack: Vec<Command>,
    /// Configuration
    config: UndoConfig,
}

impl UndoStack {
    /// Create a new empty undo stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom configuration
    pub fn with_config(config: UndoConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Push a command to the undo stack.
    /// This clears the redo stack (can't redo after a new action).
    pub fn push(&mut self, command: Command) {
        log::debug!("📝 Undo: pushed '{}'", command.description());
        self.undo_stack.push(command);
        self.redo_stack.clear();

        // Limit history size
        if self.undo_stack.len() > self.config.max_history {
            let excess = self.undo_stack.len() - self.config.max_history;
            self.undo_stack.drain(..excess);
        }
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Pop a command from the undo stack for undoing.
    /// The command is moved to the redo stack.
    fn pop_undo(&mut self) -> Option<Command> {
        let cmd = self.undo_stack.pop()?;
        log::debug!("⏪ Undo: '{}'", cmd.description());
        self.redo_stack.push(cmd.clone());
        Some(cmd)
    }

    /// Pop a command from the redo stack for redoing.
    /// The command is moved back to the undo stack.
    fn pop_redo(&mut self) -> Option<Command> {
        let cmd = self.redo_stack.pop()?;
        log::debug!("⏩ Redo: '{}'", cmd.description());
        self.undo_stack.push(cmd.clone());
        Some(cmd)
    }

    /// Get the description of the command that would be undone
    pub fn undo_description(&self) -> Option<String> {
        self.undo_stack.last().map(Command::description)
    }

    /// Get the description of the command that would be redone
    pub fn redo_description(&self) -> Option<String> {
        self.redo_stack.last().map(Command::description)
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        log::debug!("🗑️ Undo history cleared");
    }

    /// Get the number of commands in undo history
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Get the number of commands in redo history
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// Undo the most recent command against `store`.
    ///
    /// Returns the changes that were applied (the inverses of the recorded
    /// ones, newest first), or `None` if there was nothing to undo.
    pub fn undo(
        &mut self,
        store: &mut AnnotationStore,
    ) -> Result<Option<Vec<LabelChange>>, AnnotationError> {
        let Some(cmd) = self.pop_undo() else {
            return Ok(None);
        };

        let applied: Vec<LabelChange> = cmd
            .changes()
            .into_iter()
            .rev()
            .map(LabelChange::inverted)
            .collect();
        apply_all(store, &applied)?;
        Ok(Some(applied))
    }

    /// Redo the most recently undone command against `store`.
    ///
    /// Returns the changes that were applied, or `None` if there was nothing to redo.
    pub fn redo(
        &mut self,
        store: &mut AnnotationStore,
    ) -> Result<Option<Vec<LabelChange>>, AnnotationError> {
        let Some(cmd) = self.pop_redo() else {
            return Ok(None);
        };

        let applied: Vec<LabelChange> = cmd.changes().into_iter().cloned().collect();
        apply_all(store, &applied)?;
        Ok(Some(applied))
    }
}

fn apply_all(store: &mut AnnotationStore, changes: &[LabelChange]) -> Result<(), AnnotationError> {
    for change in changes {
        store.apply_change(change)?;
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
