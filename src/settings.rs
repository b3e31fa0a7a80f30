//! Game settings
//!
//! Read from the page URL (`?level=3&muted=1`), never stored: a reload with
//! a plain URL always gives the defaults back.

use serde::{Deserialize, Serialize};

use crate::sim::LAST_LEVEL;

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Level that "Start Game" begins at (1 for a normal run)
    pub start_level: u32,
    /// Fixed RNG seed; `None` seeds from the clock
    pub seed: Option<u64>,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Background arpeggio while driving
    pub music: bool,
    /// Silence everything
    pub muted: bool,

    /// Start in demo mode
    pub autopilot: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            start_level: 1,
            seed: None,

            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            music: true,
            muted: false,

            autopilot: false,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "" | "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_volume(value: &str) -> Option<f32> {
    value
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| v.clamp(0.0, 1.0))
}

impl Settings {
    /// Parse settings from a URL query string (leading `?` optional).
    ///
    /// Unknown keys and bad values are logged and skipped.
    pub fn from_query(query: &str) -> Self {
        let mut settings = Self::default();
        let query = query.strip_prefix('?').unwrap_or(query);

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let applied = match key {
                "level" => value
                    .parse::<u32>()
                    .ok()
                    .map(|l| settings.start_level = l.clamp(1, LAST_LEVEL)),
                "seed" => value.parse::<u64>().ok().map(|s| settings.seed = Some(s)),
                "volume" => parse_volume(value).map(|v| settings.master_volume = v),
                "sfx" => parse_volume(value).map(|v| settings.sfx_volume = v),
                "music_volume" => parse_volume(value).map(|v| settings.music_volume = v),
                "music" => parse_flag(value).map(|b| settings.music = b),
                "muted" | "mute" => parse_flag(value).map(|b| settings.muted = b),
                "autopilot" | "demo" => parse_flag(value).map(|b| settings.autopilot = b),
                _ => {
                    log::warn!("Ignoring unknown setting '{}'", key);
                    continue;
                }
            };
            if applied.is_none() {
                log::warn!("Ignoring bad value '{}' for setting '{}'", value, key);
            }
        }

        settings
    }

    /// Load settings from the page URL (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let search = web_sys::window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        let settings = Self::from_query(&search);
        log::info!("Settings: {:?}", settings);
        settings
    }

    /// Native: defaults, optionally overridden by `RACER_SETTINGS` (query syntax)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        match std::env::var("RACER_SETTINGS") {
            Ok(query) => Self::from_query(&query),
            Err(_) => Self::default(),
        }
    }

    /// Effective sound effects volume (respects mute)
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Effective music volume (respects mute and the music toggle)
    pub fn effective_music_volume(&self) -> f32 {
        if self.muted || !self.music {
            0.0
        } else {
            self.master_volume * self.music_volume
        }
    }
}
