//! Session-wide progression
//!
//! Lives for the whole process and outlives every level instance. Nothing here
//! is written to disk; unlocks last for the session only.

use crate::consts::FIRST_LEVEL;
use crate::ui::GameUi;

/// Page index the gameplay HUD lives on
pub const GAMEPLAY_PAGE: usize = 0;

/// Highest unlocked level, monotonic except for an explicit reset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelProgress {
    highest: usize,
}

impl Default for LevelProgress {
    fn default() -> Self {
        Self { highest: FIRST_LEVEL }
    }
}

impl LevelProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unlock `level`; never lowers the counter
    pub fn unlock(&mut self, level: usize) {
        if level > self.highest {
            log::info!("Unlocked level {level}");
            self.highest = level;
        }
    }

    pub fn unlocked(&self) -> usize {
        self.highest
    }

    pub fn is_unlocked(&self, level: usize) -> bool {
        level <= self.highest
    }

    /// Back to the first level
    pub fn reset(&mut self) {
        self.highest = FIRST_LEVEL;
    }
}

/// Everything that survives a scene reload
pub struct Session {
    pub progress: LevelProgress,
    pub ui: Box<dyn GameUi>,
    reload_page: usize,
}

impl Session {
    pub fn new(ui: Box<dyn GameUi>) -> Self {
        Self {
            progress: LevelProgress::new(),
            ui,
            reload_page: GAMEPLAY_PAGE,
        }
    }

    pub fn unlock_level(&mut self, level: usize) {
        self.progress.unlock(level);
    }

    pub fn unlocked_level(&self) -> usize {
        self.progress.unlocked()
    }

    /// Page the next loaded scene should open on
    pub fn set_page_to_show_on_reload(&mut self, page: usize) {
        self.reload_page = page;
    }

    pub fn page_to_show_on_reload(&self) -> usize {
        self.reload_page
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_unlock_is_monotonic() {
        let mut progress = LevelProgress::new();
        assert_eq!(progress.unlocked(), 1);
        progress.unlock(3);
        progress.unlock(2);
        assert_eq!(progress.unlocked(), 3);
        assert!(progress.is_unlocked(2));
        assert!(!progress.is_unlocked(4));
    }

    #[test]
    fn test_reset() {
        let mut progress = LevelProgress::new();
        progress.unlock(5);
        progress.reset();
        assert_eq!(progress.unlocked(), FIRST_LEVEL);
    }

    proptest! {
        #[test]
        fn unlocked_is_running_max(levels in proptest::collection::vec(0usize..50, 0..30)) {
            let mut progress = LevelProgress::new();
            let mut expected = FIRST_LEVEL;
            for level in levels {
                let before = progress.unlocked();
                progress.unlock(level);
                expected = expected.max(level);
                prop_assert!(progress.unlocked() >= before);
            }
            prop_assert_eq!(progress.unlocked(), expected);
        }
    }
}
