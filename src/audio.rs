//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects and music tones - no external files.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::Settings;
use crate::sim::SoundEffect;

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let mut audio = Self::new();
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_music_volume(settings.music_volume);
        audio.set_muted(settings.muted);
        audio
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Flip mute; returns the new state
    pub fn toggle_muted(&mut self) -> bool {
        self.muted = !self.muted;
        log::info!("Audio {}", if self.muted { "muted" } else { "unmuted" });
        self.muted
    }

    fn volume(&self, channel: f32) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * channel
        }
    }

    /// Context ready to play, resumed if the browser suspended it
    fn live_context(&self, vol: f32) -> Option<&AudioContext> {
        if vol <= 0.0 {
            return None;
        }
        let ctx = self.ctx.as_ref()?;
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }
        Some(ctx)
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.volume(self.sfx_volume);
        let Some(ctx) = self.live_context(vol) else {
            return;
        };

        match effect {
            SoundEffect::Jump => self.play_jump(ctx, vol),
            SoundEffect::Shoot => self.play_shoot(ctx, vol),
            SoundEffect::Hit => self.play_hit(ctx, vol),
            SoundEffect::BossDeath => self.play_boss_death(ctx, vol),
        }
    }

    /// One square-wave note with an exponential fade
    pub fn play_tone(&self, freq: f32, duration: f32) {
        let vol = self.volume(self.music_volume);
        let Some(ctx) = self.live_context(vol) else {
            return;
        };
        let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();
        let end = t + f64::from(duration);

        gain.gain().set_value_at_time(vol * 0.05, t).ok();
        gain.gain().exponential_ramp_to_value_at_time(0.001, end).ok();

        osc.start().ok();
        osc.stop_with_when(end).ok();
    }

    // === Sound generators ===

    /// Create an oscillator routed through a gain node to the output
    fn create_osc(
        &self,
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

    /// Jump - rising chirp
    fn play_jump(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 300.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        osc.frequency().set_value_at_time(300.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(500.0, t + 0.1)
            .ok();
        gain.gain().set_value_at_time(vol * 0.1, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.1)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.1).ok();
    }

    /// Shoot - falling square zap
    fn play_shoot(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 800.0, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();

        osc.frequency().set_value_at_time(800.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(100.0, t + 0.1)
            .ok();
        gain.gain().set_value_at_time(vol * 0.05, t).ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.1).ok();
    }

    /// Hit - low sawtooth buzz
    fn play_hit(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 100.0, OscillatorType::Sawtooth) else {
            return;
        };
        let t = ctx.current_time();

        osc.frequency().set_value_at_time(100.0, t).ok();
        osc.frequency().linear_ramp_to_value_at_time(50.0, t + 0.2).ok();
        gain.gain().set_value_at_time(vol * 0.2, t).ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.2).ok();
    }

    /// Boss death - long slide down with a square-wave tremolo
    fn play_boss_death(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 150.0, OscillatorType::Sawtooth) else {
            return;
        };
        let t = ctx.current_time();
        let end = t + 1.5;

        osc.frequency().set_value_at_time(150.0, t).ok();
        osc.frequency().exponential_ramp_to_value_at_time(10.0, end).ok();

        // Tremolo LFO modulating the pitch
        if let (Ok(lfo), Ok(lfo_gain)) = (ctx.create_oscillator(), ctx.create_gain()) {
            lfo.set_type(OscillatorType::Square);
            lfo.frequency().set_value(8.0);
            lfo_gain.gain().set_value(500.0);
            if lfo.connect_with_audio_node(&lfo_gain).is_ok()
                && lfo_gain.connect_with_audio_param(&osc.frequency()).is_ok()
            {
                lfo.start().ok();
                lfo.stop_with_when(end).ok();
            }
        }

        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain().linear_ramp_to_value_at_time(0.0, end).ok();

        osc.start().ok();
        osc.stop_with_when(end).ok();
    }
}
