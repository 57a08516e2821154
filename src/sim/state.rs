//! Game state and core simulation types
//!
//! One [`GameState`] exists per loaded level. Restarting builds a new one from
//! the level description; nothing is carried over.

use std::collections::BTreeSet;

use glam::{Vec2, Vec3};

use super::body::RigidBody;
use super::classify::ColliderId;
use super::level::Level;
use crate::settings::Tuning;

/// Where the level run stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Active gameplay, timer running
    Playing,
    /// End zone reached; terminal until restart
    Won,
    /// Reload requested; the host discards this state at end of frame
    Restarting,
}

/// Why a reload was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartReason {
    /// Player asked for it
    Manual,
    /// Fell below the world
    Fell,
}

/// Set of ground colliders currently touching the ball
///
/// Overlapping ground pieces each hold their own entry, so leaving one while
/// still resting on another keeps the ball grounded.
#[derive(Debug, Clone, Default)]
pub struct GroundContacts {
    contacts: BTreeSet<ColliderId>,
}

impl GroundContacts {
    /// Returns true if this made the ball grounded
    pub fn enter(&mut self, id: ColliderId) -> bool {
        let was = self.is_grounded();
        self.contacts.insert(id);
        !was
    }

    /// Returns true if this made the ball airborne
    pub fn exit(&mut self, id: ColliderId) -> bool {
        self.contacts.remove(&id) && self.contacts.is_empty()
    }

    pub fn is_grounded(&self) -> bool {
        !self.contacts.is_empty()
    }
}

/// The ball and its per-level bookkeeping
#[derive(Debug, Clone)]
pub struct PlayerState {
    pub body: RigidBody,
    pub ground: GroundContacts,
    /// Latest movement input, consumed by the physics step
    pub movement: Vec2,
    pub score: u32,
    /// Seconds since level start; only advances while playing
    pub elapsed: f32,
    pub run_state: RunState,
}

impl PlayerState {
    pub fn new(spawn: Vec3, tuning: &Tuning) -> Self {
        Self {
            body: RigidBody::new(spawn, tuning.mass, tuning.ball_radius),
            ground: GroundContacts::default(),
            movement: Vec2::ZERO,
            score: 0,
            elapsed: 0.0,
            run_state: RunState::Playing,
        }
    }

    pub fn is_grounded(&self) -> bool {
        self.ground.is_grounded()
    }

    pub fn is_playing(&self) -> bool {
        self.run_state == RunState::Playing
    }
}

/// Complete state of one level instance
#[derive(Debug, Clone)]
pub struct GameState {
    /// Catalog index of the loaded level
    pub level_index: usize,
    pub level: Level,
    pub player: PlayerState,
    pub tuning: Tuning,
    /// Seconds left before the victory page is shown
    pub victory_countdown: Option<f32>,
    /// Set once when a reload is requested
    pub restart: Option<RestartReason>,
}

impl GameState {
    /// Fresh state for `level`
    pub fn new(level_index: usize, level: Level, tuning: Tuning) -> Self {
        let player = PlayerState::new(level.spawn, &tuning);
        Self {
            level_index,
            level,
            player,
            tuning,
            victory_countdown: None,
            restart: None,
        }
    }

    pub fn restart_requested(&self) -> Option<RestartReason> {
        self.restart
    }
}
