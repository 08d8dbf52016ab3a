//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects and background music - no
//! external files needed. The manager is a session-owned value driven
//! by simulation events; it never feeds anything back into the sim.
//! Music start/stop is idempotent so round transitions can call it
//! without tracking whether it is already running.

use crate::sim::GameEvent;

#[cfg(target_arch = "wasm32")]
use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

/// Background melody in Hz (C4 E4 G4 C5 G4 E4 C4 D4 F4 A4 F4 D4)
#[cfg(target_arch = "wasm32")]
const MELODY: [f32; 12] = [
    262.0, 330.0, 392.0, 523.0, 392.0, 330.0, 262.0, 294.0, 349.0, 440.0, 349.0, 294.0,
];
#[cfg(target_arch = "wasm32")]
const NOTE_SECS: f64 = 0.25;
/// Loops scheduled ahead when the music starts
#[cfg(target_arch = "wasm32")]
const MUSIC_LOOPS: u32 = 100;

/// Audio manager for the game
#[cfg(target_arch = "wasm32")]
pub struct AudioManager {
    /// Created lazily on the first cue, which always follows a user
    /// gesture (the round-starting input), so the browser allows it
    ctx: Option<AudioContext>,
    /// Master gain of the running background music, if any
    music: Option<GainNode>,
    master_volume: f32,
    muted: bool,
}

#[cfg(target_arch = "wasm32")]
impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
impl AudioManager {
    pub fn new() -> Self {
        Self {
            ctx: None,
            music: None,
            master_volume: 0.8,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume }
    }

    /// Get or create the audio context
    fn ensure_ctx(&mut self) -> Option<&AudioContext> {
        if self.ctx.is_none() {
            self.ctx = AudioContext::new().ok();
            if self.ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
        }
        let ctx = self.ctx.as_ref()?;
        // Resume if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }
        Some(ctx)
    }

    /// React to one simulation event
    pub fn handle_event(&mut self, event: GameEvent) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        match event {
            GameEvent::RoundStarted => self.start_music(),
            GameEvent::GoodCatch { .. } => {
                if let Some(ctx) = self.ensure_ctx() {
                    play_chomp(ctx, vol);
                }
            }
            GameEvent::BadCatch { .. } => {
                if let Some(ctx) = self.ensure_ctx() {
                    play_yuck(ctx, vol);
                }
            }
            GameEvent::Miss => {
                if let Some(ctx) = self.ensure_ctx() {
                    play_splat(ctx, vol);
                }
            }
            GameEvent::BoostStarted => {
                if let Some(ctx) = self.ensure_ctx() {
                    play_power_up(ctx, vol);
                }
            }
            GameEvent::RoundOver { new_high_score } => {
                self.stop_music();
                if let Some(ctx) = self.ensure_ctx() {
                    if new_high_score {
                        play_high_score(ctx, vol);
                    } else {
                        play_game_over(ctx, vol);
                    }
                }
            }
        }
    }

    /// Start the background melody. A no-op while already playing.
    pub fn start_music(&mut self) {
        if self.music.is_some() {
            return;
        }
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        if self.ensure_ctx().is_none() {
            return;
        }
        let Some(ctx) = self.ctx.as_ref() else { return };

        let Ok(master) = ctx.create_gain() else { return };
        let t = ctx.current_time();
        master.gain().set_value_at_time(vol * 0.075, t).ok();
        if master.connect_with_audio_node(&ctx.destination()).is_err() {
            return;
        }

        // Schedule the whole loop ahead rather than rescheduling from a
        // timer; stopping just silences the master gain
        let loop_len = MELODY.len() as f64 * NOTE_SECS;
        for pass in 0..MUSIC_LOOPS {
            let start = t + pass as f64 * loop_len;
            for (i, freq) in MELODY.iter().enumerate() {
                schedule_note(ctx, &master, *freq, start + i as f64 * NOTE_SECS);
            }
        }

        self.music = Some(master);
    }

    /// Stop the background melody. Double-stop is a no-op.
    pub fn stop_music(&mut self) {
        if let Some(master) = self.music.take() {
            master.disconnect().ok();
        }
    }
}

/// One melody note under the music master gain
#[cfg(target_arch = "wasm32")]
fn schedule_note(ctx: &AudioContext, master: &GainNode, freq: f32, when: f64) {
    let Ok(osc) = ctx.create_oscillator() else {
        return;
    };
    let Ok(gain) = ctx.create_gain() else { return };
    osc.set_type(OscillatorType::Triangle);
    osc.frequency().set_value_at_time(freq, when).ok();
    gain.gain().set_value_at_time(0.8, when).ok();
    gain.gain().set_value_at_time(0.0, when + NOTE_SECS * 0.9).ok();
    if osc.connect_with_audio_node(&gain).is_err() {
        return;
    }
    if gain.connect_with_audio_node(master).is_err() {
        return;
    }
    osc.start_with_when(when).ok();
    osc.stop_with_when(when + NOTE_SECS).ok();
}

/// Create an oscillator with gain envelope wired to the destination
#[cfg(target_arch = "wasm32")]
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

/// Good catch - happy chomp
#[cfg(target_arch = "wasm32")]
fn play_chomp(ctx: &AudioContext, vol: f32) {
    let Some((osc, gain)) = create_osc(ctx, 300.0, OscillatorType::Square) else {
        return;
    };
    let t = ctx.current_time();

    gain.gain().set_value_at_time(vol * 0.2, t).ok();
    gain.gain()
        .exponential_ramp_to_value_at_time(0.01, t + 0.15)
        .ok();
    osc.frequency().set_value_at_time(300.0, t).ok();
    osc.frequency()
        .exponential_ramp_to_value_at_time(600.0, t + 0.08)
        .ok();
    osc.frequency()
        .exponential_ramp_to_value_at_time(800.0, t + 0.12)
        .ok();

    osc.start().ok();
    osc.stop_with_when(t + 0.15).ok();
}

/// Bad catch - descending yuck
#[cfg(target_arch = "wasm32")]
fn play_yuck(ctx: &AudioContext, vol: f32) {
    let Some((osc, gain)) = create_osc(ctx, 400.0, OscillatorType::Sawtooth) else {
        return;
    };
    let t = ctx.current_time();

    gain.gain().set_value_at_time(vol * 0.15, t).ok();
    gain.gain()
        .exponential_ramp_to_value_at_time(0.01, t + 0.25)
        .ok();
    osc.frequency().set_value_at_time(400.0, t).ok();
    osc.frequency()
        .exponential_ramp_to_value_at_time(100.0, t + 0.2)
        .ok();

    osc.start().ok();
    osc.stop_with_when(t + 0.25).ok();
}

/// Miss - low warbling splat with a detuned flutter on top
#[cfg(target_arch = "wasm32")]
fn play_splat(ctx: &AudioContext, vol: f32) {
    let t = ctx.current_time();

    // Low rumbling body
    if let Some((osc, gain)) = create_osc(ctx, 80.0, OscillatorType::Sawtooth) {
        gain.gain().set_value_at_time(vol * 0.25, t).ok();
        gain.gain()
            .linear_ramp_to_value_at_time(vol * 0.3, t + 0.1)
            .ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.45)
            .ok();
        osc.frequency().set_value_at_time(80.0, t).ok();
        osc.frequency()
            .linear_ramp_to_value_at_time(60.0, t + 0.15)
            .ok();
        osc.frequency()
            .linear_ramp_to_value_at_time(90.0, t + 0.25)
            .ok();
        osc.frequency()
            .linear_ramp_to_value_at_time(50.0, t + 0.4)
            .ok();
        osc.start().ok();
        osc.stop_with_when(t + 0.45).ok();
    }

    // Detuned flutter
    if let Some((osc, gain)) = create_osc(ctx, 120.0, OscillatorType::Square) {
        gain.gain().set_value_at_time(vol * 0.1, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.35)
            .ok();
        osc.frequency().set_value_at_time(120.0, t).ok();
        osc.frequency()
            .linear_ramp_to_value_at_time(40.0, t + 0.3)
            .ok();
        osc.start().ok();
        osc.stop_with_when(t + 0.35).ok();
    }
}

/// Power-up - ascending sparkle
#[cfg(target_arch = "wasm32")]
fn play_power_up(ctx: &AudioContext, vol: f32) {
    for (i, freq) in [600.0, 800.0, 1000.0].iter().enumerate() {
        let delay = i as f64 * 0.08;
        if let Some((osc, gain)) = create_osc(ctx, *freq, OscillatorType::Sine) {
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

/// Round over - sad descending
#[cfg(target_arch = "wasm32")]
fn play_game_over(ctx: &AudioContext, vol: f32) {
    for (i, freq) in [400.0, 350.0, 300.0, 200.0].iter().enumerate() {
        let delay = i as f64 * 0.2;
        if let Some((osc, gain)) = create_osc(ctx, *freq, OscillatorType::Sine) {
            let t = ctx.current_time() + delay;
            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                .ok();
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + 0.4).ok();
        }
    }
}

/// Round over with a new high score - celebratory
#[cfg(target_arch = "wasm32")]
fn play_high_score(ctx: &AudioContext, vol: f32) {
    for (i, freq) in [500.0, 600.0, 700.0, 800.0, 1000.0].iter().enumerate() {
        let delay = i as f64 * 0.08;
        if let Some((osc, gain)) = create_osc(ctx, *freq, OscillatorType::Triangle) {
            let t = ctx.current_time() + delay;
            gain.gain().set_value_at_time(vol * 0.25, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                .ok();
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + 0.3).ok();
        }
    }
}

/// Native stub with the same surface, so host code reads the same on
/// both targets
#[cfg(not(target_arch = "wasm32"))]
#[derive(Default)]
pub struct AudioManager;

#[cfg(not(target_arch = "wasm32"))]
impl AudioManager {
    pub fn new() -> Self {
        Self
    }

    pub fn set_master_volume(&mut self, _vol: f32) {}

    pub fn set_muted(&mut self, _muted: bool) {}

    pub fn handle_event(&mut self, _event: GameEvent) {}

    pub fn start_music(&mut self) {}

    pub fn stop_music(&mut self) {}
}
