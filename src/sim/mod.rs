//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod level;
pub mod quiz;
pub mod rect;
pub mod state;
pub mod tick;

pub use level::{LAST_LEVEL, LEVELS, Level, ObjectKind, SpawnWeights, level, validate_levels};
pub use quiz::{QuizBank, QuizQuestion};
pub use rect::Rect;
pub use state::{GameEvent, GameObject, GamePhase, GameState, Player};
pub use tick::{TickInput, spawn_random_object, tick};
