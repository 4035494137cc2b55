//! Auto-save manager with debouncing.
//!
//! Decides when a dirty annotation store should be written back to its
//! record without waiting for an explicit save or a close.

use std::time::Duration;
use web_time::Instant;

use crate::config::AutoSaveConfig;

/// Tracks unsaved edits and decides when to write them.
///
/// A save is due once edits have been quiet for the debounce delay and the
/// minimum interval has passed since the previous attempt.
#[derive(Debug)]
pub struct AutoSaveManager {
    enabled: bool,
    debounce: Duration,
    min_interval: Duration,
    /// Time of the latest unsaved edit; `None` when everything is saved
    pending_since: Option<Instant>,
    /// Time of the latest save attempt, successful or not
    last_attempt: Option<Instant>,
}

impl AutoSaveManager {
    /// Default minimum interval between saves (60 seconds).
    pub const DEFAULT_SAVE_INTERVAL: Duration = Duration::from_secs(60);

    /// Default debounce delay (5 seconds).
    pub const DEFAULT_DEBOUNCE_DELAY: Duration = Duration::from_secs(5);

    /// Create an enabled manager with default timing.
    pub fn new() -> Self {
        Self {
            enabled: true,
            debounce: Self::DEFAULT_DEBOUNCE_DELAY,
            min_interval: Self::DEFAULT_SAVE_INTERVAL,
            pending_since: None,
            last_attempt: None,
        }
    }

    /// Create a manager from the user's auto-save preferences.
    pub fn from_config(config: &AutoSaveConfig) -> Self {
        Self {
            enabled: config.enabled,
            debounce: Duration::from_millis(config.debounce_ms),
            min_interval: Duration::from_millis(config.interval_ms),
            ..Self::new()
        }
    }

    /// Create a disabled manager.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new()
        }
    }

    /// Set the minimum interval between saves.
    pub fn with_save_interval(mut self, interval: Duration) -> Self {
        self.min_interval = interval;
        self
    }

    /// Set the debounce delay.
    pub fn with_debounce_delay(mut self, delay: Duration) -> Self {
        self.debounce = delay;
        self
    }

    /// Record an edit that needs saving. Restarts the debounce.
    pub fn mark_dirty(&mut self) {
        self.pending_since = Some(Instant::now());
        log::trace!("Auto-save: edit pending");
    }

    /// Whether edits are waiting to be saved.
    pub fn is_dirty(&self) -> bool {
        self.pending_since.is_some()
    }

    /// Whether a save is due now.
    pub fn should_save(&self) -> bool {
        if !self.enabled {
            return false;
        }
        let Some(pending_since) = self.pending_since else {
            return false;
        };
        if pending_since.elapsed() < self.debounce {
            return false;
        }
        self.last_attempt
            .is_none_or(|attempt| attempt.elapsed() >= self.min_interval)
    }

    /// The record was written; nothing is pending any more.
    pub fn mark_saved(&mut self) {
        self.last_attempt = Some(Instant::now());
        self.pending_since = None;
        log::trace!("Auto-save: saved");
    }

    /// The write failed; edits stay pending and are retried after the interval.
    pub fn mark_save_failed(&mut self) {
        self.last_attempt = Some(Instant::now());
        log::trace!("Auto-save: save failed, will retry");
    }

    /// Turn auto-save on or off.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        log::debug!("Auto-save: enabled = {}", enabled);
    }

    /// Whether auto-save is on.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Forget all pending state, e.g. after switching videos.
    pub fn reset(&mut self) {
        self.pending_since = None;
        self.last_attempt = None;
    }
}

impl Default for AutoSaveManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn immediate() -> AutoSaveManager {
        AutoSaveManager::new()
            .with_debounce_delay(Duration::ZERO)
            .with_save_interval(Duration::ZERO)
    }

    #[test]
    fn test_nothing_pending_initially() {
        let manager = AutoSaveManager::new();
        assert!(!manager.is_dirty());
        assert!(!manager.should_save());
        assert!(manager.is_enabled());
    }

    #[test]
    fn test_saved_clears_pending() {
        let mut manager = immediate();
        manager.mark_dirty();
        assert!(manager.should_save());

        manager.mark_saved();
        assert!(!manager.is_dirty());
        assert!(!manager.should_save());
    }

    #[test]
    fn test_disabled_never_saves() {
        let mut manager = AutoSaveManager::disabled()
            .with_debounce_delay(Duration::ZERO)
            .with_save_interval(Duration::ZERO);
        manager.mark_dirty();
        assert!(!manager.should_save());
    }

    #[test]
    fn test_debounce_holds_back_save() {
        let mut manager = AutoSaveManager::new()
            .with_debounce_delay(Duration::from_secs(10))
            .with_save_interval(Duration::ZERO);
        manager.mark_dirty();
        assert!(!manager.should_save());
    }

    #[test]
    fn test_failed_save_stays_pending() {
        let mut manager = immediate();
        manager.mark_dirty();
        manager.mark_save_failed();
        assert!(manager.is_dirty());
        assert!(manager.should_save());

        let mut throttled = AutoSaveManager::new()
            .with_debounce_delay(Duration::ZERO)
            .with_save_interval(Duration::from_secs(60));
        throttled.mark_dirty();
        throttled.mark_save_failed();
        assert!(!throttled.should_save(), "retry waits for the interval");
    }

    #[test]
    fn test_from_config() {
        let config = AutoSaveConfig {
            enabled: false,
            debounce_ms: 0,
            interval_ms: 0,
        };
        let mut manager = AutoSaveManager::from_config(&config);
        manager.mark_dirty();
        assert!(!manager.should_save());

        manager.set_enabled(true);
        assert!(manager.should_save());

        manager.reset();
        assert!(!manager.is_dirty());
    }
}
