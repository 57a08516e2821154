//! UI facade
//!
//! The core only talks to the UI through [`GameUi`]. [`Hud`] is the stock
//! implementation: text fields plus a [`PageManager`] that decides which page is
//! visible.

use std::cell::RefCell;
use std::rc::Rc;

use crate::{format_score, format_time};

/// Display side of the game, created once per session
pub trait GameUi {
    /// Increment and redisplay the score
    fn add_point(&mut self);
    /// Zero score and timer, timer running
    fn reset_game(&mut self);
    /// Refresh the running timer display
    fn update_timer(&mut self, seconds: f32);
    /// Freeze the timer, show the final stats and switch to the victory page
    fn show_victory(&mut self, final_score: &str, final_time: &str);
    /// Jump straight to a page (used at scene start)
    fn show_page(&mut self, page: usize);
}

/// Ordered set of UI pages, exactly one visible
#[derive(Debug, Clone)]
pub struct PageManager {
    page_count: usize,
    current: usize,
}

impl PageManager {
    pub fn new(page_count: usize) -> Self {
        Self {
            page_count: page_count.max(1),
            current: 0,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn show_page(&mut self, index: usize) {
        if index >= self.page_count {
            log::warn!("Invalid page index: {index} (have {})", self.page_count);
            return;
        }
        self.current = index;
    }

    /// Advance one page; stays put on the last page
    pub fn next_page(&mut self) {
        if self.current + 1 < self.page_count {
            self.show_page(self.current + 1);
        }
    }

    /// Go back one page, wrapping to the last
    pub fn previous_page(&mut self) {
        self.show_page((self.current + self.page_count - 1) % self.page_count);
    }
}

/// Text-based heads-up display
#[derive(Debug, Clone)]
pub struct Hud {
    score: u32,
    timer_running: bool,
    pub score_text: String,
    pub time_text: String,
    pub victory_score_text: String,
    pub victory_time_text: String,
    /// Whether the in-game status strip (score/timer) is shown
    pub status_visible: bool,
    pub pages: PageManager,
}

impl Hud {
    pub fn new(page_count: usize) -> Self {
        Self {
            score: 0,
            timer_running: false,
            score_text: format_score(0),
            time_text: format_time(0.0),
            victory_score_text: String::new(),
            victory_time_text: String::new(),
            status_visible: true,
            pages: PageManager::new(page_count),
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn timer_running(&self) -> bool {
        self.timer_running
    }
}

impl GameUi for Hud {
    fn add_point(&mut self) {
        self.score += 1;
        self.score_text = format_score(self.score);
    }

    fn reset_game(&mut self) {
        self.score = 0;
        self.timer_running = true;
        self.score_text = format_score(0);
        self.time_text = format_time(0.0);
        self.status_visible = true;
    }

    fn update_timer(&mut self, seconds: f32) {
        if self.timer_running {
            self.time_text = format_time(seconds);
        }
    }

    fn show_victory(&mut self, final_score: &str, final_time: &str) {
        self.timer_running = false;
        self.victory_score_text = final_score.to_owned();
        self.victory_time_text = final_time.to_owned();
        self.status_visible = false;
        self.pages.next_page();
    }

    fn show_page(&mut self, page: usize) {
        self.pages.show_page(page);
    }
}

/// Lets the host keep a handle on a UI it hands to the session
impl<T: GameUi> GameUi for Rc<RefCell<T>> {
    fn add_point(&mut self) {
        self.borrow_mut().add_point();
    }

    fn reset_game(&mut self) {
        self.borrow_mut().reset_game();
    }

    fn update_timer(&mut self, seconds: f32) {
        self.borrow_mut().update_timer(seconds);
    }

    fn show_victory(&mut self, final_score: &str, final_time: &str) {
        self.borrow_mut().show_victory(final_score, final_time);
    }

    fn show_page(&mut self, page: usize) {
        self.borrow_mut().show_page(page);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_navigation() {
        let mut pages = PageManager::new(3);
        pages.next_page();
        pages.next_page();
        assert_eq!(pages.current(), 2);
        // Last page: no-op
        pages.next_page();
        assert_eq!(pages.current(), 2);

        pages.show_page(0);
        pages.previous_page();
        assert_eq!(pages.current(), 2, "previous wraps to the last page");

        pages.show_page(7);
        assert_eq!(pages.current(), 2, "out-of-range page ignored");
    }

    #[test]
    fn test_hud_score_and_timer() {
        let mut hud = Hud::new(2);
        hud.reset_game();
        hud.add_point();
        hud.add_point();
        assert_eq!(hud.score_text, "Point: 2");

        hud.update_timer(12.3);
        assert_eq!(hud.time_text, "Time: 12.30");

        hud.show_victory("Point: 2", "Time: 12.30");
        assert!(!hud.timer_running());
        assert!(!hud.status_visible);
        assert_eq!(hud.pages.current(), 1);
        assert_eq!(hud.victory_time_text, "Time: 12.30");

        // Frozen after victory
        hud.update_timer(20.0);
        assert_eq!(hud.time_text, "Time: 12.30");
    }
}
