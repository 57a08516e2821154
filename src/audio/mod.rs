//! Reactive audio
//!
//! [`AudioReactor`] turns game events and the ball's speed into cue commands on
//! an [`AudioSink`]. The sink is the only place that knows how a cue sounds;
//! the reactor only decides when cues start, stop and how loud they are.
//!
//! A sink that lacks a cue is a cosmetic misconfiguration: the reactor warns
//! once and carries on.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::settings::Tuning;

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(target_arch = "wasm32")]
pub use web::WebAudioSink;

/// Sound cue identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    /// Ball left the ground by jumping
    Jump,
    /// Ball hit a wall hard enough to hear
    Impact,
    /// Looping roll while grounded and moving
    Rolling,
    /// Pickup collected
    Pickup,
    /// End zone reached
    Completion,
}

impl Cue {
    pub const ALL: [Cue; 5] = [Cue::Jump, Cue::Impact, Cue::Rolling, Cue::Pickup, Cue::Completion];

    /// Whether the cue loops until stopped
    pub fn is_looping(self) -> bool {
        matches!(self, Cue::Rolling)
    }
}

/// Backend that actually produces sound
pub trait AudioSink {
    /// Whether this sink has a sound wired for `cue`
    fn has_cue(&self, cue: Cue) -> bool;
    /// Start a cue from the beginning
    fn play(&mut self, cue: Cue, volume: f32, pitch: f32);
    fn stop(&mut self, cue: Cue);
    /// Whether a looping cue is currently sounding
    fn is_playing(&self, cue: Cue) -> bool;
    /// Adjust a sounding cue without restarting it
    fn retune(&mut self, cue: Cue, volume: f32, pitch: f32);
    /// Length of the cue in seconds (0 for loops)
    fn duration(&self, cue: Cue) -> f32;
}

/// Drives an [`AudioSink`] from gameplay
pub struct AudioReactor {
    sink: Box<dyn AudioSink>,
    volume: f32,
    warned: HashSet<Cue>,
}

impl AudioReactor {
    pub fn new(sink: Box<dyn AudioSink>, volume: f32) -> Self {
        Self {
            sink,
            volume: volume.clamp(0.0, 1.0),
            warned: HashSet::new(),
        }
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    fn available(&mut self, cue: Cue) -> bool {
        if self.sink.has_cue(cue) {
            return true;
        }
        if self.warned.insert(cue) {
            log::warn!("No sound wired for {cue:?} cue - skipping");
        }
        false
    }

    fn one_shot(&mut self, cue: Cue, volume: f32) {
        if self.available(cue) {
            self.sink.play(cue, volume * self.volume, 1.0);
        }
    }

    pub fn jump(&mut self) {
        self.one_shot(Cue::Jump, 1.0);
    }

    pub fn pickup(&mut self) {
        self.one_shot(Cue::Pickup, 1.0);
    }

    /// Play the completion cue and return how long it lasts
    pub fn completion(&mut self) -> f32 {
        self.one_shot(Cue::Completion, 1.0);
        if self.sink.has_cue(Cue::Completion) {
            self.sink.duration(Cue::Completion)
        } else {
            0.0
        }
    }

    /// Wall hit; quiet grazes below the threshold are dropped
    pub fn impact(&mut self, speed: f32, tuning: &Tuning) {
        if speed <= tuning.impact_min_speed {
            return;
        }
        let volume = (speed * tuning.impact_volume_scale).clamp(0.0, tuning.impact_max_volume);
        self.one_shot(Cue::Impact, volume);
    }

    /// Re-evaluate the rolling loop. Call once per frame.
    pub fn update_rolling(&mut self, grounded: bool, speed: f32, tuning: &Tuning) {
        let rolling = grounded && speed > tuning.rolling_min_speed;
        if !rolling {
            if self.sink.is_playing(Cue::Rolling) {
                self.sink.stop(Cue::Rolling);
            }
            return;
        }
        if !self.available(Cue::Rolling) {
            return;
        }

        let volume =
            (speed * tuning.rolling_volume_scale).clamp(0.0, tuning.rolling_max_volume) * self.volume;
        let pitch = tuning.rolling_base_pitch + speed * tuning.rolling_pitch_scale;
        if self.sink.is_playing(Cue::Rolling) {
            self.sink.retune(Cue::Rolling, volume, pitch);
        } else {
            self.sink.play(Cue::Rolling, volume, pitch);
        }
    }

    /// Silence everything (scene teardown)
    pub fn stop_all(&mut self) {
        for cue in Cue::ALL {
            if self.sink.is_playing(cue) {
                self.sink.stop(cue);
            }
        }
    }
}

/// What a [`MemoryAudio`] sink has been asked to do
#[derive(Debug, Default)]
pub struct AudioRecord {
    pub playing: HashSet<Cue>,
    pub starts: HashMap<Cue, u32>,
    pub stops: HashMap<Cue, u32>,
    /// Most recent (volume, pitch) per cue
    pub last: HashMap<Cue, (f32, f32)>,
}

impl AudioRecord {
    pub fn starts(&self, cue: Cue) -> u32 {
        self.starts.get(&cue).copied().unwrap_or(0)
    }

    pub fn stops(&self, cue: Cue) -> u32 {
        self.stops.get(&cue).copied().unwrap_or(0)
    }
}

/// Shared view of a [`MemoryAudio`] sink's record
pub type AudioLog = Rc<RefCell<AudioRecord>>;

/// Silent sink that tracks cue state; used natively and in tests
pub struct MemoryAudio {
    record: AudioLog,
    missing: HashSet<Cue>,
    durations: HashMap<Cue, f32>,
}

impl MemoryAudio {
    pub fn new() -> (Self, AudioLog) {
        let record = AudioLog::default();
        let sink = Self {
            record: record.clone(),
            missing: HashSet::new(),
            durations: HashMap::new(),
        };
        (sink, record)
    }

    /// Pretend the sound for `cue` was never assigned
    pub fn without(mut self, cue: Cue) -> Self {
        self.missing.insert(cue);
        self
    }

    pub fn with_duration(mut self, cue: Cue, seconds: f32) -> Self {
        self.durations.insert(cue, seconds);
        self
    }
}

impl AudioSink for MemoryAudio {
    fn has_cue(&self, cue: Cue) -> bool {
        !self.missing.contains(&cue)
    }

    fn play(&mut self, cue: Cue, volume: f32, pitch: f32) {
        let mut record = self.record.borrow_mut();
        *record.starts.entry(cue).or_default() += 1;
        record.last.insert(cue, (volume, pitch));
        if cue.is_looping() {
            record.playing.insert(cue);
        }
        log::debug!("audio: play {cue:?} vol={volume:.2} pitch={pitch:.2}");
    }

    fn stop(&mut self, cue: Cue) {
        let mut record = self.record.borrow_mut();
        if record.playing.remove(&cue) {
            *record.stops.entry(cue).or_default() += 1;
        }
    }

    fn is_playing(&self, cue: Cue) -> bool {
        self.record.borrow().playing.contains(&cue)
    }

    fn retune(&mut self, cue: Cue, volume: f32, pitch: f32) {
        self.record.borrow_mut().last.insert(cue, (volume, pitch));
    }

    fn duration(&self, cue: Cue) -> f32 {
        self.durations.get(&cue).copied().unwrap_or(0.0)
    }
}
