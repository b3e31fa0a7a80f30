//! Game state and core simulation types

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::level::{self, Level, ObjectKind};
use super::quiz::{QuizBank, QuizQuestion};
use super::rect::Rect;
use crate::consts::*;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for "Start Game"
    Start,
    /// Active driving
    Playing,
    /// Road frozen while a quiz question is on screen
    Quiz,
    /// Goal score reached, waiting for "Next Level"
    LevelComplete,
    /// Out of lives
    GameOver,
    /// Cleared the final level
    GameWon,
}

/// The player's car. It only ever moves sideways.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Left edge (percent of width)
    pub x: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            x: 50.0 - PLAYER_WIDTH / 2.0,
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
        }
    }
}

impl Player {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, crate::player_top(), self.width, self.height)
    }

    /// Rightmost allowed left edge
    #[inline]
    pub fn max_x(&self) -> f32 {
        100.0 - self.width
    }

    /// Steer by `delta` percent, staying on the road
    pub fn steer(&mut self, delta: f32) {
        self.x = (self.x + delta).clamp(0.0, self.max_x());
    }
}

/// Something falling down the road
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameObject {
    pub id: u32,
    pub kind: ObjectKind,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Sideways velocity (enemies only, percent per second)
    pub dx: f32,
}

impl GameObject {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Fall by `dy` and, for enemies, weave sideways bouncing off the edges
    pub fn advance(&mut self, dy: f32, dt: f32) {
        self.y += dy;

        if self.kind == ObjectKind::Enemy && self.dx != 0.0 {
            let max_x = 100.0 - self.width;
            self.x += self.dx * dt;
            if self.x <= 0.0 || self.x >= max_x {
                self.dx = -self.dx;
                self.x = self.x.clamp(0.0, max_x);
            }
        }
    }
}

/// Things that happened during a tick, for sound and logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    CoinCollected,
    /// Hit an obstacle or enemy while vulnerable
    Crash,
    MysteryBoxOpened,
    AnswerCorrect,
    AnswerWrong,
    LevelStarted(u32),
    LevelComplete(u32),
    GameOver,
    GameWon,
}

/// Complete game state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Current level (1-based)
    pub level: u32,
    /// Level a new run starts from
    pub start_level: u32,
    pub lives: u32,
    pub score: u32,
    pub player: Player,
    /// Falling objects, oldest first
    pub objects: Vec<GameObject>,
    /// Question on screen during `GamePhase::Quiz`
    pub question: Option<QuizQuestion>,
    pub quiz: QuizBank,
    /// Seconds of crash immunity left
    pub invincible_secs: f32,
    /// Seconds since the last spawn roll
    pub spawn_timer: f32,
    /// Road stripe scroll (0..100)
    pub road_offset: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events since the front end last drained them
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new game on the title screen
    pub fn new(seed: u64, quiz: QuizBank) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Start,
            level: 1,
            start_level: 1,
            lives: INITIAL_LIVES,
            score: 0,
            player: Player::default(),
            objects: Vec::new(),
            question: None,
            quiz,
            invincible_secs: 0.0,
            spawn_timer: 0.0,
            road_offset: 0.0,
            time_ticks: 0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Builder: runs begin at `level` instead of 1
    pub fn with_start_level(mut self, level: u32) -> Self {
        self.start_level = level.clamp(1, level::LAST_LEVEL);
        self.level = self.start_level;
        self
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Fresh lives, score and road, starting at `start_level`
    pub fn reset_run(&mut self, start_level: u32) {
        self.level = start_level.clamp(1, level::LAST_LEVEL);
        self.lives = INITIAL_LIVES;
        self.score = 0;
        self.player = Player::default();
        self.objects.clear();
        self.question = None;
        self.invincible_secs = 0.0;
        self.spawn_timer = 0.0;
    }

    pub fn level_config(&self) -> &'static Level {
        level::level(self.level)
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible_secs > 0.0
    }

    pub fn is_last_level(&self) -> bool {
        self.level >= level::LAST_LEVEL
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Drop an object at the top of the road
    pub fn spawn_object(&mut self, kind: ObjectKind, x: f32, dx: f32) -> u32 {
        let (width, height) = kind.size();
        let id = self.next_entity_id();
        self.objects.push(GameObject {
            id,
            kind,
            x: x.clamp(0.0, 100.0 - width),
            y: -height,
            width,
            height,
            dx: if kind == ObjectKind::Enemy { dx } else { 0.0 },
        });
        id
    }
}
