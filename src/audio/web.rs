//! Web Audio sink
//!
//! Procedurally generated cues - no external files needed!

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use super::{AudioSink, Cue};

/// Base frequency of the rolling hum at pitch 1.0
const ROLLING_BASE_HZ: f32 = 90.0;

/// A sounding loop we can retune
struct Voice {
    osc: OscillatorNode,
    gain: GainNode,
}

/// [`AudioSink`] backed by the browser's `AudioContext`
pub struct WebAudioSink {
    ctx: Option<AudioContext>,
    rolling: Option<Voice>,
}

impl Default for WebAudioSink {
    fn default() -> Self {
        Self::new()
    }
}

impl WebAudioSink {
    pub fn new() -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self { ctx, rolling: None }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Create an oscillator with gain envelope
    fn create_osc(
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Jump - quick upward chirp
    fn play_jump(ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = Self::create_osc(ctx, 220.0, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.18)
            .ok();
        osc.frequency().set_value_at_time(220.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(660.0, t + 0.15)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.2).ok();
    }

    /// Wall impact - solid thump
    fn play_impact(ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = Self::create_osc(ctx, 150.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.6, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.1)
            .ok();
        osc.frequency().set_value_at_time(150.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(60.0, t + 0.1)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.15).ok();
    }

    /// Pickup - happy ding
    fn play_pickup(ctx: &AudioContext, vol: f32) {
        for (i, freq) in [600.0, 800.0, 1000.0].iter().enumerate() {
            let delay = i as f64 * 0.08;
            if let Some((osc, gain)) = Self::create_osc(ctx, *freq, OscillatorType::Sine) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.25, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.2).ok();
            }
        }
    }

    /// Completion - triumphant fanfare
    fn play_completion(ctx: &AudioContext, vol: f32) {
        for (i, freq) in [400.0, 500.0, 600.0, 800.0].iter().enumerate() {
            let delay = i as f64 * 0.1;
            if let Some((osc, gain)) = Self::create_osc(ctx, *freq, OscillatorType::Triangle) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.4)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.5).ok();
            }
        }
    }

    /// Rolling - low continuous hum
    fn start_rolling(ctx: &AudioContext, vol: f32, pitch: f32) -> Option<Voice> {
        let (osc, gain) = Self::create_osc(ctx, ROLLING_BASE_HZ * pitch, OscillatorType::Sawtooth)?;
        gain.gain().set_value(vol * 0.2);
        osc.start().ok()?;
        Some(Voice { osc, gain })
    }
}

impl AudioSink for WebAudioSink {
    fn has_cue(&self, _cue: Cue) -> bool {
        self.ctx.is_some()
    }

    fn play(&mut self, cue: Cue, volume: f32, pitch: f32) {
        if volume <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };

        // Browsers keep the context suspended until a user gesture
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match cue {
            Cue::Jump => Self::play_jump(ctx, volume),
            Cue::Impact => Self::play_impact(ctx, volume),
            Cue::Pickup => Self::play_pickup(ctx, volume),
            Cue::Completion => Self::play_completion(ctx, volume),
            Cue::Rolling => {
                if self.rolling.is_none() {
                    self.rolling = Self::start_rolling(ctx, volume, pitch);
                }
            }
        }
    }

    fn stop(&mut self, cue: Cue) {
        if cue == Cue::Rolling {
            if let Some(voice) = self.rolling.take() {
                voice.osc.stop().ok();
                voice.gain.disconnect().ok();
            }
        }
    }

    fn is_playing(&self, cue: Cue) -> bool {
        cue == Cue::Rolling && self.rolling.is_some()
    }

    fn retune(&mut self, cue: Cue, volume: f32, pitch: f32) {
        if cue != Cue::Rolling {
            return;
        }
        if let Some(voice) = &self.rolling {
            voice.gain.gain().set_value(volume * 0.2);
            voice.osc.frequency().set_value(ROLLING_BASE_HZ * pitch);
        }
    }

    fn duration(&self, cue: Cue) -> f32 {
        match cue {
            Cue::Jump => 0.2,
            Cue::Impact => 0.15,
            Cue::Pickup => 0.36,
            Cue::Completion => 0.8,
            Cue::Rolling => 0.0,
        }
    }
}
