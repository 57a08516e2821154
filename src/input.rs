//! Input sources
//!
//! Each frame the host samples exactly one [`InputSource`] into a [`TickInput`].
//! Movement is level-sampled (releasing a key zeroes its axis on the next
//! sample); jump and restart are edge-triggered.

use glam::{Vec2, Vec3};

use crate::settings::{Settings, Tuning};
use crate::sim::TickInput;

/// Anything that can produce per-tick input
pub trait InputSource {
    /// Sample the current input state. Called once per frame.
    fn sample(&mut self) -> TickInput;
}

/// Logical buttons of the digital scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Jump,
    Restart,
}

#[derive(Debug, Clone, Copy, Default)]
struct Edge {
    held: bool,
    pending: bool,
}

impl Edge {
    /// Latch on the rising edge; a release never clears an unsampled press
    fn set(&mut self, pressed: bool) {
        if pressed && !self.held {
            self.pending = true;
        }
        self.held = pressed;
    }

    /// True once per press, on the first sample after it began
    fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}

/// Keyboard/gamepad-button input
#[derive(Debug, Clone, Default)]
pub struct DigitalInput {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
    jump: Edge,
    restart: Edge,
}

impl DigitalInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press or release
    pub fn set_key(&mut self, key: Key, pressed: bool) {
        match key {
            Key::Up => self.up = pressed,
            Key::Down => self.down = pressed,
            Key::Left => self.left = pressed,
            Key::Right => self.right = pressed,
            Key::Jump => self.jump.set(pressed),
            Key::Restart => self.restart.set(pressed),
        }
    }

    /// Direction of the currently held keys, unit length or zero
    pub fn direction(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;
        Vec2::new(axis(self.left, self.right), axis(self.down, self.up)).normalize_or_zero()
    }
}

impl InputSource for DigitalInput {
    fn sample(&mut self) -> TickInput {
        TickInput {
            movement: self.direction(),
            jump: self.jump.take(),
            restart: self.restart.take(),
        }
    }
}

/// Accelerometer-driven input
#[derive(Debug, Clone)]
pub struct TiltInput {
    acceleration: Vec3,
    deadzone: f32,
    sensitivity: f32,
    tap_pending: bool,
}

impl TiltInput {
    pub fn new(deadzone: f32, sensitivity: f32) -> Self {
        Self {
            acceleration: Vec3::ZERO,
            deadzone,
            sensitivity,
            tap_pending: false,
        }
    }

    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self::new(tuning.tilt_deadzone, tuning.tilt_sensitivity)
    }

    /// Latest raw device acceleration (x = roll, y = pitch)
    pub fn set_acceleration(&mut self, raw: Vec3) {
        self.acceleration = raw;
    }

    /// Screen tap; reported as a jump on the next sample
    pub fn tap(&mut self) {
        self.tap_pending = true;
    }

    /// Movement vector after normalization, deadzone and sensitivity
    pub fn movement(&self) -> Vec2 {
        let n = self.acceleration.normalize_or_zero();
        let dz = |c: f32| if c.abs() < self.deadzone { 0.0 } else { c };
        let scaled = Vec2::new(dz(n.x), dz(n.y)) * self.sensitivity;
        scaled.clamp(Vec2::splat(-1.0), Vec2::splat(1.0))
    }
}

impl InputSource for TiltInput {
    fn sample(&mut self) -> TickInput {
        TickInput {
            movement: self.movement(),
            jump: std::mem::take(&mut self.tap_pending),
            restart: false,
        }
    }
}

/// The player's configured scheme: keys always drive jump and restart,
/// movement comes from the keys or from device tilt
#[derive(Debug, Clone)]
pub struct Controls {
    keys: DigitalInput,
    tilt: Option<TiltInput>,
}

impl Controls {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            keys: DigitalInput::new(),
            tilt: settings
                .tilt_controls
                .then(|| TiltInput::from_tuning(&settings.tuning)),
        }
    }

    pub fn uses_tilt(&self) -> bool {
        self.tilt.is_some()
    }

    pub fn set_key(&mut self, key: Key, pressed: bool) {
        self.keys.set_key(key, pressed);
    }

    /// Ignored unless tilt is enabled
    pub fn set_acceleration(&mut self, raw: Vec3) {
        if let Some(tilt) = self.tilt.as_mut() {
            tilt.set_acceleration(raw);
        }
    }

    /// Ignored unless tilt is enabled
    pub fn tap(&mut self) {
        if let Some(tilt) = self.tilt.as_mut() {
            tilt.tap();
        }
    }
}

impl InputSource for Controls {
    fn sample(&mut self) -> TickInput {
        let keys = self.keys.sample();
        match self.tilt.as_mut() {
            Some(tilt) => {
                let tilted = tilt.sample();
                TickInput {
                    movement: tilted.movement,
                    jump: keys.jump || tilted.jump,
                    restart: keys.restart,
                }
            }
            None => keys,
        }
    }
}

/// Replays a fixed movement vector; jump fires once on the first sample
#[derive(Debug, Clone)]
pub struct ScriptedInput {
    pub movement: Vec2,
    jump_pending: bool,
}

impl ScriptedInput {
    pub fn new(movement: Vec2) -> Self {
        Self {
            movement,
            jump_pending: false,
        }
    }

    pub fn with_jump(mut self) -> Self {
        self.jump_pending = true;
        self
    }
}

impl InputSource for ScriptedInput {
    fn sample(&mut self) -> TickInput {
        TickInput {
            movement: self.movement,
            jump: std::mem::take(&mut self.jump_pending),
            restart: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digital_direction_recomputed_per_sample() {
        let mut input = DigitalInput::new();
        input.set_key(Key::Up, true);
        assert_eq!(input.sample().movement, Vec2::new(0.0, 1.0));

        input.set_key(Key::Right, true);
        let m = input.sample().movement;
        assert!((m.length() - 1.0).abs() < 1e-5);
        assert!(m.x > 0.0 && m.y > 0.0);

        input.set_key(Key::Up, false);
        input.set_key(Key::Right, false);
        assert_eq!(input.sample().movement, Vec2::ZERO);
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let mut input = DigitalInput::new();
        input.set_key(Key::Left, true);
        input.set_key(Key::Right, true);
        assert_eq!(input.sample().movement, Vec2::ZERO);
    }

    #[test]
    fn test_jump_is_edge_triggered() {
        let mut input = DigitalInput::new();
        input.set_key(Key::Jump, true);
        assert!(input.sample().jump);
        // Still held: no repeat
        assert!(!input.sample().jump);
        assert!(!input.sample().jump);

        input.set_key(Key::Jump, false);
        assert!(!input.sample().jump);
        input.set_key(Key::Jump, true);
        assert!(input.sample().jump);
    }

    #[test]
    fn test_tap_between_samples_still_jumps() {
        let mut input = DigitalInput::new();
        input.set_key(Key::Jump, true);
        input.set_key(Key::Jump, false);
        assert!(input.sample().jump, "press released before the sample");
        assert!(!input.sample().jump);

        input.set_key(Key::Restart, true);
        input.set_key(Key::Restart, false);
        assert!(input.sample().restart);
    }

    #[test]
    fn test_key_repeat_does_not_retrigger() {
        let mut input = DigitalInput::new();
        input.set_key(Key::Jump, true);
        assert!(input.sample().jump);
        // OS key repeat re-sends the press while held
        input.set_key(Key::Jump, true);
        assert!(!input.sample().jump);
    }

    #[test]
    fn test_tilt_deadzone_zeroes_rest_drift() {
        let mut tilt = TiltInput::new(0.1, 1.0);
        // Device lying flat: gravity on z, tiny drift on x/y
        tilt.set_acceleration(Vec3::new(0.02, -0.03, -1.0));
        assert_eq!(tilt.sample().movement, Vec2::ZERO);
    }

    #[test]
    fn test_tilt_sensitivity_and_clamp() {
        let mut tilt = TiltInput::new(0.1, 2.0);
        tilt.set_acceleration(Vec3::new(0.6, 0.0, -0.8));
        let m = tilt.sample().movement;
        assert!((m.x - 1.0).abs() < 1e-5, "0.6 * 2 clamps to 1, got {}", m.x);
        assert_eq!(m.y, 0.0);

        tilt.set_acceleration(Vec3::new(-0.3, 0.0, -0.954));
        let m = tilt.movement();
        assert!(m.x < -0.5 && m.x > -0.7);
    }

    #[test]
    fn test_tilt_tap_reported_once() {
        let mut tilt = TiltInput::new(0.1, 1.0);
        tilt.tap();
        assert!(tilt.sample().jump);
        assert!(!tilt.sample().jump);
    }

    #[test]
    fn test_controls_follow_tilt_setting() {
        let mut settings = Settings::default();
        let mut keys = Controls::from_settings(&settings);
        assert!(!keys.uses_tilt());
        keys.set_key(Key::Up, true);
        keys.set_acceleration(Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(keys.sample().movement, Vec2::new(0.0, 1.0));

        settings.tilt_controls = true;
        let mut tilt = Controls::from_settings(&settings);
        assert!(tilt.uses_tilt());
        tilt.set_key(Key::Up, true);
        tilt.set_acceleration(Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(tilt.sample().movement, Vec2::new(1.0, 0.0), "keys don't steer in tilt mode");
    }

    #[test]
    fn test_controls_jump_from_key_or_tap() {
        let settings = Settings {
            tilt_controls: true,
            ..Default::default()
        };
        let mut controls = Controls::from_settings(&settings);
        controls.tap();
        assert!(controls.sample().jump);
        controls.set_key(Key::Jump, true);
        assert!(controls.sample().jump);
        controls.set_key(Key::Restart, true);
        let input = controls.sample();
        assert!(input.restart && !input.jump);
    }
}
