//! Player movement and game-event handling
//!
//! Two cadences drive a level:
//! - [`physics_tick`] runs at the fixed timestep: force, integration, contacts.
//! - [`frame_tick`] runs once per rendered frame: timer, rolling audio,
//!   fall check, victory countdown.
//!
//! Input is applied per frame by [`apply_input`] before the physics substeps.

use glam::{Vec2, Vec3};

use super::classify::{GameEvent, classify};
use super::state::{GameState, RestartReason, RunState};
use crate::audio::AudioReactor;
use crate::consts::CONTACT_SKIN;
use crate::progression::{GAMEPLAY_PAGE, Session};
use crate::{format_score, format_time};

/// Input commands for a single frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Movement in [-1, 1] per axis (x = right, y = forward)
    pub movement: Vec2,
    /// Jump pressed this frame (edge)
    pub jump: bool,
    /// Restart pressed this frame (edge)
    pub restart: bool,
}

/// Take in one frame of input
pub fn apply_input(
    state: &mut GameState,
    input: &TickInput,
    session: &mut Session,
    audio: &mut AudioReactor,
) {
    state.player.movement = input.movement.clamp(Vec2::splat(-1.0), Vec2::splat(1.0));

    if input.jump {
        jump(state, audio);
    }
    if input.restart {
        request_restart(state, RestartReason::Manual, session, audio);
    }
}

/// One upward impulse if grounded; never buffered for later
pub fn jump(state: &mut GameState, audio: &mut AudioReactor) -> bool {
    if state.restart.is_some() || !state.player.is_grounded() {
        return false;
    }
    let impulse = Vec3::Y * state.tuning.jump_force;
    state.player.body.apply_impulse(impulse);
    audio.jump();
    log::debug!("Jump (impulse {:.2})", state.tuning.jump_force);
    true
}

/// Advance physics by one fixed timestep
pub fn physics_tick(
    state: &mut GameState,
    dt: f32,
    session: &mut Session,
    audio: &mut AudioReactor,
) {
    // A reload is pending; this instance must not produce anything further
    if state.restart.is_some() {
        return;
    }

    let tuning = &state.tuning;
    let movement = state.player.movement;
    let force = Vec3::new(movement.x, 0.0, movement.y) * tuning.speed;
    let gravity = Vec3::new(0.0, tuning.gravity, 0.0);

    let body = &mut state.player.body;
    body.add_force(force);
    body.integrate(dt, gravity, tuning.linear_damping);

    let contacts = state
        .level
        .step_contacts(body, CONTACT_SKIN, tuning.restitution);

    for contact in &contacts {
        if let Some(event) = classify(contact) {
            handle_event(state, event, session, audio);
        }
    }
}

/// React to one classified contact
pub fn handle_event(
    state: &mut GameState,
    event: GameEvent,
    session: &mut Session,
    audio: &mut AudioReactor,
) {
    match event {
        // Contact bookkeeping continues regardless of run state
        GameEvent::GroundEnter(id) => {
            if state.player.ground.enter(id) {
                log::debug!("Grounded (collider {id})");
            }
        }
        GameEvent::GroundExit(id) => {
            if state.player.ground.exit(id) {
                log::debug!("Airborne (left collider {id})");
            }
        }
        GameEvent::WallImpact { speed } => {
            if state.restart.is_none() {
                audio.impact(speed, &state.tuning);
            }
        }
        GameEvent::PickupCollected(id) => {
            if state.player.is_playing() && state.level.collect(id) {
                state.player.score += 1;
                session.ui.add_point();
                audio.pickup();
                log::debug!("Pickup {id} collected (score {})", state.player.score);
            }
        }
        GameEvent::EndZoneReached => win(state, session, audio),
        GameEvent::OutOfBounds => {
            if state.player.is_playing() {
                request_restart(state, RestartReason::Fell, session, audio);
            }
        }
    }
}

/// Per-frame work: fall check, timer, rolling audio, victory countdown
pub fn frame_tick(
    state: &mut GameState,
    dt: f32,
    session: &mut Session,
    audio: &mut AudioReactor,
) {
    let player = &state.player;
    if player.is_playing() && player.body.position.y < state.tuning.fall_threshold {
        request_restart(state, RestartReason::Fell, session, audio);
    }

    if state.player.is_playing() {
        state.player.elapsed += dt;
        session.ui.update_timer(state.player.elapsed);
    }

    if state.player.run_state != RunState::Restarting {
        audio.update_rolling(
            state.player.is_grounded(),
            state.player.body.speed(),
            &state.tuning,
        );
    }

    if let Some(remaining) = state.victory_countdown.as_mut() {
        *remaining -= dt;
        if *remaining <= 0.0 {
            state.victory_countdown = None;
            if state.player.run_state == RunState::Won {
                show_victory(state, session);
            }
        }
    }
}

/// Playing -> Won, at most once per level instance
fn win(state: &mut GameState, session: &mut Session, audio: &mut AudioReactor) {
    if !state.player.is_playing() {
        return;
    }
    state.player.run_state = RunState::Won;

    let cue_len = audio.completion();
    session.unlock_level(state.level_index + 1);
    log::info!(
        "Level {} complete: {} in {}",
        state.level_index,
        format_score(state.player.score),
        format_time(state.player.elapsed)
    );

    // An explicit delay wins; otherwise the page waits for the completion cue
    let delay = if state.tuning.victory_delay > 0.0 {
        state.tuning.victory_delay
    } else {
        cue_len
    };
    if delay > 0.0 {
        state.victory_countdown = Some(delay);
    } else {
        show_victory(state, session);
    }
}

fn show_victory(state: &GameState, session: &mut Session) {
    let score = format_score(state.player.score);
    let time = format_time(state.player.elapsed);
    session.ui.show_victory(&score, &time);
}

/// Ask the host to reload this level. Later requests are ignored until the
/// fresh instance exists.
pub fn request_restart(
    state: &mut GameState,
    reason: RestartReason,
    session: &mut Session,
    audio: &mut AudioReactor,
) {
    if state.restart.is_some() {
        return;
    }
    state.restart = Some(reason);
    state.player.run_state = RunState::Restarting;
    state.victory_countdown = None;

    let page = match reason {
        RestartReason::Manual => GAMEPLAY_PAGE,
        RestartReason::Fell => state.tuning.fell_page.unwrap_or(GAMEPLAY_PAGE),
    };
    session.set_page_to_show_on_reload(page);
    audio.stop_all();
    log::info!(
        "Restart requested ({reason:?}) at {}",
        format_time(state.player.elapsed)
    );
}
