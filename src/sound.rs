//! Procedural sound design
//!
//! Every effect is a handful of short oscillator notes - no audio files.
//! This module only describes the notes; `audio` plays them in the browser.

use serde::{Deserialize, Serialize};

use crate::sim::GameEvent;

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// A single note: start `delay` seconds from now, decay over `duration`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tone {
    /// Hz
    pub freq: f32,
    /// Seconds
    pub duration: f32,
    /// Seconds after the effect is triggered
    pub delay: f32,
    pub waveform: Waveform,
    /// Peak gain before volume settings are applied
    pub volume: f32,
}

/// Default peak gain for effects
const SFX_GAIN: f32 = 0.2;

const fn tone(freq: f32, duration: f32, delay: f32, waveform: Waveform) -> Tone {
    Tone {
        freq,
        duration,
        delay,
        waveform,
        volume: SFX_GAIN,
    }
}

// Note frequencies
const E3: f32 = 164.81;
const G3: f32 = 196.00;
const C3: f32 = 130.81;
const C4: f32 = 261.63;
const E4: f32 = 329.63;
const C5: f32 = 523.25;
const E5: f32 = 659.25;
const G5: f32 = 783.99;
const C6: f32 = 1046.50;
const E6: f32 = 1318.51;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Coin picked up
    Coin,
    /// Ran into an obstacle or enemy
    Collision,
    /// Mystery box opened
    MysteryBox,
    CorrectAnswer,
    IncorrectAnswer,
    /// Any overlay button
    ButtonClick,
    /// Level cleared (also used for winning)
    LevelComplete,
    GameOver,
}

impl SoundEffect {
    /// The notes making up this effect
    pub fn tones(self) -> Vec<Tone> {
        use Waveform::*;
        match self {
            SoundEffect::Coin => vec![
                tone(C6, 0.1, 0.0, Triangle),
                tone(E6, 0.1, 0.05, Triangle),
            ],
            SoundEffect::Collision => vec![tone(110.0, 0.3, 0.0, Sawtooth)],
            SoundEffect::MysteryBox => vec![
                tone(C5, 0.1, 0.0, Square),
                tone(E5, 0.1, 0.1, Square),
                tone(G5, 0.1, 0.2, Square),
            ],
            SoundEffect::CorrectAnswer => vec![
                tone(G5, 0.15, 0.0, Sine),
                tone(C6, 0.2, 0.15, Sine),
            ],
            SoundEffect::IncorrectAnswer => vec![
                tone(220.0, 0.15, 0.0, Square),
                tone(E3, 0.2, 0.15, Square),
            ],
            SoundEffect::ButtonClick => vec![Tone {
                volume: 0.1,
                ..tone(440.0, 0.1, 0.0, Sine)
            }],
            SoundEffect::LevelComplete => vec![
                tone(C5, 0.1, 0.0, Sine),
                tone(E5, 0.1, 0.12, Sine),
                tone(G5, 0.1, 0.24, Sine),
                tone(C6, 0.3, 0.36, Sine),
            ],
            SoundEffect::GameOver => vec![
                tone(E4, 0.2, 0.0, Sawtooth),
                tone(C4, 0.2, 0.2, Sawtooth),
                tone(G3, 0.4, 0.4, Sawtooth),
            ],
        }
    }

    /// Sound for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::CoinCollected => Some(SoundEffect::Coin),
            GameEvent::Crash => Some(SoundEffect::Collision),
            GameEvent::MysteryBoxOpened => Some(SoundEffect::MysteryBox),
            GameEvent::AnswerCorrect => Some(SoundEffect::CorrectAnswer),
            GameEvent::AnswerWrong => Some(SoundEffect::IncorrectAnswer),
            GameEvent::LevelComplete(_) | GameEvent::GameWon => Some(SoundEffect::LevelComplete),
            GameEvent::GameOver => Some(SoundEffect::GameOver),
            GameEvent::LevelStarted(_) => None,
        }
    }
}

/// Background arpeggio, played only while driving
#[derive(Debug, Clone)]
pub struct MusicSequencer {
    notes: &'static [f32],
    index: usize,
    elapsed: f32,
    /// Seconds between notes
    pub interval: f32,
}

impl Default for MusicSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl MusicSequencer {
    const ARPEGGIO: [f32; 4] = [C3, E3, G3, E3];
    const NOTE_LENGTH: f32 = 0.18;
    const NOTE_GAIN: f32 = 0.08;

    pub fn new() -> Self {
        Self {
            notes: &Self::ARPEGGIO,
            index: 0,
            elapsed: 0.0,
            interval: 0.2,
        }
    }

    /// Advance by `dt` seconds, returning notes that are now due
    pub fn advance(&mut self, dt: f32) -> Vec<Tone> {
        let mut due = Vec::new();
        self.elapsed += dt;
        while self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            due.push(Tone {
                freq: self.notes[self.index],
                duration: Self::NOTE_LENGTH,
                delay: 0.0,
                waveform: Waveform::Sine,
                volume: Self::NOTE_GAIN,
            });
            self.index = (self.index + 1) % self.notes.len();
        }
        due
    }

    /// Back to the first note (music stopped)
    pub fn reset(&mut self) {
        self.index = 0;
        self.elapsed = 0.0;
    }
}
