//! Audio playback using the Web Audio API
//!
//! Plays the notes described in `sound` as oscillator + gain pairs.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::settings::Settings;
use crate::sound::{SoundEffect, Tone, Waveform};

/// Gain the envelope decays to (exponential ramps can't reach zero)
const SILENCE: f32 = 0.0001;

impl From<Waveform> for OscillatorType {
    fn from(w: Waveform) -> Self {
        match w {
            Waveform::Sine => OscillatorType::Sine,
            Waveform::Square => OscillatorType::Square,
            Waveform::Sawtooth => OscillatorType::Sawtooth,
            Waveform::Triangle => OscillatorType::Triangle,
        }
    }
}

/// Audio manager for the game
pub struct AudioManager {
    /// Created on first use (browsers want a user gesture first)
    ctx: Option<AudioContext>,
    unavailable: bool,
    settings: Settings,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        Self {
            ctx: None,
            unavailable: false,
            settings: settings.clone(),
        }
    }

    /// Get the audio context, creating or resuming it as needed
    fn context(&mut self) -> Option<&AudioContext> {
        if self.ctx.is_none() && !self.unavailable {
            match AudioContext::new() {
                Ok(ctx) => self.ctx = Some(ctx),
                Err(e) => {
                    log::warn!("Web Audio API unavailable - audio disabled: {:?}", e);
                    self.unavailable = true;
                }
            }
        }

        let ctx = self.ctx.as_ref()?;
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }
        Some(ctx)
    }

    /// Unlock audio from inside a user gesture handler
    pub fn resume(&mut self) {
        let _ = self.context();
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.settings.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.settings.muted
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.settings.effective_sfx_volume();
        self.play_tones(&effect.tones(), vol);
    }

    /// Play background music notes
    pub fn play_music(&mut self, notes: &[Tone]) {
        let vol = self.settings.effective_music_volume();
        self.play_tones(notes, vol);
    }

    fn play_tones(&mut self, tones: &[Tone], vol: f32) {
        if vol <= 0.0 || tones.is_empty() {
            return;
        }
        let Some(ctx) = self.context() else { return };
        for t in tones {
            play_tone(ctx, t, vol);
        }
    }
}

/// Create an oscillator wired through a gain node to the speakers
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

/// Schedule one note with an exponential decay envelope
fn play_tone(ctx: &AudioContext, tone: &Tone, vol: f32) {
    let Some((osc, gain)) = create_osc(ctx, tone.freq, tone.waveform.into()) else {
        return;
    };
    let t = ctx.current_time() + tone.delay as f64;
    let end = t + tone.duration as f64;

    gain.gain().set_value_at_time(tone.volume * vol, t).ok();
    gain.gain().exponential_ramp_to_value_at_time(SILENCE, end).ok();
    osc.frequency().set_value_at_time(tone.freq, t).ok();

    osc.start_with_when(t).ok();
    osc.stop_with_when(end).ok();
}
