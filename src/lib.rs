//! Roll-a-Ball - a physics-driven sphere platformer
//!
//! Core modules:
//! - `sim`: Player movement, contact tracking and the game-event state machine
//! - `input`: Digital and tilt input sources
//! - `audio`: Reactive audio cues (jump, impact, rolling, completion)
//! - `ui`: Score/timer display and the UI page stack
//! - `progression`: Level unlock counter and the reload page hand-off
//! - `game`: Scene host that loads, restarts and steps levels

pub mod audio;
pub mod error;
pub mod game;
pub mod input;
pub mod progression;
pub mod settings;
pub mod sim;
pub mod ui;

pub use error::{ConfigError, GameError};
pub use game::{Game, GameBuilder};
pub use progression::{LevelProgress, Session};
pub use settings::{Settings, Tuning};

/// Game configuration constants
pub mod consts {
    /// Fixed physics timestep (50 Hz)
    pub const SIM_DT: f32 = 1.0 / 50.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the host will simulate in one go (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Distance within which a solid surface still counts as touching
    pub const CONTACT_SKIN: f32 = 0.02;

    /// First playable level index (index 0 is the menu scene)
    pub const FIRST_LEVEL: usize = 1;
}

/// Format a score the way the HUD shows it
#[inline]
pub fn format_score(score: u32) -> String {
    format!("Point: {score}")
}

/// Format elapsed seconds the way the HUD shows it (two decimals)
#[inline]
pub fn format_time(seconds: f32) -> String {
    format!("Time: {seconds:.2}")
}
