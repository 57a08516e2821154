//! Level simulation module
//!
//! All gameplay logic lives here:
//! - Fixed timestep physics for the ball
//! - Contact tracking and classification
//! - Score, timer, victory and restart state machine
//! - No rendering or platform dependencies

pub mod body;
pub mod classify;
pub mod collision;
pub mod level;
pub mod state;
pub mod tick;

pub use body::RigidBody;
pub use classify::{ColliderId, ColliderKind, Contact, ContactPhase, GameEvent, PickupId, classify};
pub use collision::{Aabb, CollisionResult, sphere_box_collision, sphere_box_overlap};
pub use level::{ColliderDesc, ColliderTag, Level, LevelDesc};
pub use state::{GameState, GroundContacts, PlayerState, RestartReason, RunState};
pub use tick::{TickInput, apply_input, frame_tick, handle_event, jump, physics_tick, request_restart};
