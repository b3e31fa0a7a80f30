//! Informatics Racer - a lane-driving arcade game with quiz pickups
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, spawning, collisions, phases)
//! - `renderer`: WebGPU rendering pipeline
//! - `sound`: Procedural sound design shared by all platforms
//! - `audio`: Web Audio playback (browser only)
//! - `ui`: HUD and overlay view-models for the DOM
//! - `settings`: Runtime configuration from the page URL

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod error;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod sound;
pub mod ui;

pub use error::{ContentError, RenderError};
pub use settings::Settings;

/// Game configuration constants
///
/// Play-field coordinates are percentages: 0..100 on both axes, y grows down.
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Canvas size in CSS pixels
    pub const GAME_WIDTH: u32 = 400;
    pub const GAME_HEIGHT: u32 = 700;

    /// Player car size (percent of the play field)
    pub const PLAYER_WIDTH: f32 = 15.0;
    pub const PLAYER_HEIGHT: f32 = 8.0;
    /// Gap between the player car and the bottom edge
    pub const PLAYER_BOTTOM_MARGIN: f32 = 5.0;
    /// Steering speed, percent of width per second
    pub const PLAYER_SPEED: f32 = 50.0;

    pub const INITIAL_LIVES: u32 = 3;
    pub const SCORE_PER_COIN: u32 = 2;
    /// Grace period after a crash
    pub const INVINCIBILITY_SECS: f32 = 2.0;

    /// Objects falling past this line are dropped
    pub const DESPAWN_Y: f32 = 110.0;
    /// Road stripes scroll at this fraction of the level speed
    pub const ROAD_SCROLL_FACTOR: f32 = 0.2;

    /// Enemy sideways speed: base + per-level increment
    pub const ENEMY_BASE_DX: f32 = 15.0;
    pub const ENEMY_DX_PER_LEVEL: f32 = 1.5;
}

/// Top edge of the player car (it never moves vertically)
#[inline]
pub fn player_top() -> f32 {
    100.0 - consts::PLAYER_HEIGHT - consts::PLAYER_BOTTOM_MARGIN
}
