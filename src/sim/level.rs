//! Level progression table
//!
//! Ten levels, each faster, denser and meaner than the last. Goal scores are
//! cumulative: the score carries over between levels.

use serde::{Deserialize, Serialize};

use crate::error::ContentError;

/// Kinds of falling objects, in the order spawn weights are accumulated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Obstacle,
    Enemy,
    Coin,
    MysteryBox,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 4] = [
        ObjectKind::Obstacle,
        ObjectKind::Enemy,
        ObjectKind::Coin,
        ObjectKind::MysteryBox,
    ];

    /// Spawn size (width, height) in play-field percent
    pub fn size(self) -> (f32, f32) {
        use crate::consts::{PLAYER_HEIGHT, PLAYER_WIDTH};
        match self {
            ObjectKind::Coin => (6.0, 3.0),
            ObjectKind::MysteryBox => (10.0, 5.0),
            ObjectKind::Obstacle => (10.0, 5.0),
            // Enemy cars are the same model as the player's
            ObjectKind::Enemy => (PLAYER_WIDTH, PLAYER_HEIGHT),
        }
    }

    /// Hitting this costs a life
    pub fn is_hazard(self) -> bool {
        matches!(self, ObjectKind::Obstacle | ObjectKind::Enemy)
    }
}

/// Spawn probabilities per object kind (sum should be at most 1)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnWeights {
    pub obstacle: f32,
    pub enemy: f32,
    pub coin: f32,
    pub mystery_box: f32,
}

impl SpawnWeights {
    pub fn weight(&self, kind: ObjectKind) -> f32 {
        match kind {
            ObjectKind::Obstacle => self.obstacle,
            ObjectKind::Enemy => self.enemy,
            ObjectKind::Coin => self.coin,
            ObjectKind::MysteryBox => self.mystery_box,
        }
    }

    pub fn total(&self) -> f32 {
        ObjectKind::ALL.iter().map(|k| self.weight(*k)).sum()
    }

    /// Map a roll in [0, 1) to an object kind by walking cumulative weights.
    ///
    /// Kinds with zero weight never win, even on an exact boundary roll.
    /// Returns `None` if the roll lands past the total.
    pub fn pick(&self, roll: f32) -> Option<ObjectKind> {
        let mut cumulative = 0.0;
        for kind in ObjectKind::ALL {
            let weight = self.weight(kind);
            if weight <= 0.0 {
                continue;
            }
            cumulative += weight;
            if roll <= cumulative {
                return Some(kind);
            }
        }
        None
    }
}

/// One row of the level table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// 1-based level number
    pub number: u32,
    /// Fall speed (percent of height per second)
    pub speed: f32,
    /// Seconds between spawn rolls
    pub spawn_interval_secs: f32,
    /// Score needed to clear this level
    pub goal_score: u32,
    pub weights: SpawnWeights,
}

const fn row(
    number: u32,
    speed: f32,
    spawn_interval_secs: f32,
    goal_score: u32,
    obstacle: f32,
    enemy: f32,
    coin: f32,
    mystery_box: f32,
) -> Level {
    Level {
        number,
        speed,
        spawn_interval_secs,
        goal_score,
        weights: SpawnWeights {
            obstacle,
            enemy,
            coin,
            mystery_box,
        },
    }
}

/// Number of the final level
pub const LAST_LEVEL: u32 = 10;

#[rustfmt::skip]
pub static LEVELS: [Level; LAST_LEVEL as usize] = [
    //   lvl speed  every  goal   obst  enemy  coin  mystery
    row(1,  20.0, 1.0,   20,    0.2,  0.0,   0.7,  0.1),
    row(2,  25.0, 0.9,   40,    0.3,  0.1,   0.5,  0.1),
    row(3,  30.0, 0.8,   60,    0.3,  0.2,   0.4,  0.1),
    row(4,  35.0, 0.7,   80,    0.4,  0.2,   0.3,  0.1),
    row(5,  40.0, 0.6,   100,   0.4,  0.3,   0.2,  0.1),
    row(6,  45.0, 0.5,   130,   0.5,  0.3,   0.1,  0.1),
    row(7,  50.0, 0.45,  160,   0.5,  0.35,  0.05, 0.1),
    row(8,  55.0, 0.4,   200,   0.5,  0.4,   0.05, 0.05),
    row(9,  60.0, 0.35,  250,   0.55, 0.4,   0.0,  0.05),
    row(10, 70.0, 0.3,   300,   0.6,  0.4,   0.0,  0.0),
];

/// Look up a level by its 1-based number (clamped into the table)
pub fn level(number: u32) -> &'static Level {
    let idx = number.clamp(1, LAST_LEVEL) as usize - 1;
    &LEVELS[idx]
}

/// Sanity-check a level table
pub fn validate_levels(levels: &[Level]) -> Result<(), ContentError> {
    if levels.is_empty() {
        return Err(ContentError::NoLevels);
    }

    let mut last_goal = 0;
    for lvl in levels {
        let invalid = |reason| ContentError::InvalidLevel {
            level: lvl.number,
            reason,
        };

        if lvl.speed <= 0.0 {
            return Err(invalid("speed must be positive"));
        }
        if lvl.spawn_interval_secs <= 0.0 {
            return Err(invalid("spawn interval must be positive"));
        }
        if ObjectKind::ALL.iter().any(|k| lvl.weights.weight(*k) < 0.0) {
            return Err(invalid("spawn weights must be non-negative"));
        }
        if lvl.weights.total() > 1.0 + 1e-4 {
            return Err(invalid("spawn weights sum past 1"));
        }
        if lvl.goal_score <= last_goal {
            return Err(invalid("goal score must increase"));
        }
        last_goal = lvl.goal_score;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_is_valid() {
        validate_levels(&LEVELS).unwrap();
        assert_eq!(LAST_LEVEL, 10);
        for (i, lvl) in LEVELS.iter().enumerate() {
            assert_eq!(lvl.number as usize, i + 1);
        }
    }

    #[test]
    fn test_level_lookup_clamps() {
        assert_eq!(level(0).number, 1);
        assert_eq!(level(1).number, 1);
        assert_eq!(level(7).goal_score, 160);
        assert_eq!(level(99).number, 10);
    }

    #[test]
    fn test_pick_walks_cumulative_order() {
        let w = level(2).weights; // 0.3 / 0.1 / 0.5 / 0.1
        assert_eq!(w.pick(0.0), Some(ObjectKind::Obstacle));
        assert_eq!(w.pick(0.29), Some(ObjectKind::Obstacle));
        assert_eq!(w.pick(0.35), Some(ObjectKind::Enemy));
        assert_eq!(w.pick(0.6), Some(ObjectKind::Coin));
        assert_eq!(w.pick(0.95), Some(ObjectKind::MysteryBox));
    }

    #[test]
    fn test_pick_skips_zero_weights() {
        let w = level(1).weights; // no enemies on level 1
        assert_eq!(w.pick(0.2), Some(ObjectKind::Obstacle));
        assert_eq!(w.pick(0.2001), Some(ObjectKind::Coin));

        let only_coins = SpawnWeights {
            obstacle: 0.0,
            enemy: 0.0,
            coin: 1.0,
            mystery_box: 0.0,
        };
        assert_eq!(only_coins.pick(0.0), Some(ObjectKind::Coin));
    }

    #[test]
    fn test_pick_past_total_spawns_nothing() {
        let sparse = SpawnWeights {
            obstacle: 0.1,
            enemy: 0.0,
            coin: 0.1,
            mystery_box: 0.0,
        };
        assert_eq!(sparse.pick(0.5), None);
    }

    #[test]
    fn test_late_levels_have_no_coins() {
        assert_eq!(level(9).weights.coin, 0.0);
        assert_eq!(level(10).weights.mystery_box, 0.0);
        for roll in [0.0, 0.3, 0.61, 0.99] {
            let kind = level(10).weights.pick(roll).unwrap();
            assert!(kind.is_hazard());
        }
    }

    #[test]
    fn test_validation_rejects_bad_rows() {
        let mut levels = LEVELS.to_vec();
        levels[3].goal_score = levels[2].goal_score;
        assert!(matches!(
            validate_levels(&levels),
            Err(ContentError::InvalidLevel { level: 4, .. })
        ));

        let mut levels = LEVELS.to_vec();
        levels[0].weights.coin = 0.9;
        assert!(validate_levels(&levels).is_err());

        let mut levels = LEVELS.to_vec();
        levels[5].spawn_interval_secs = 0.0;
        assert!(validate_levels(&levels).is_err());

        assert!(matches!(validate_levels(&[]), Err(ContentError::NoLevels)));
    }

    #[test]
    fn test_enemy_matches_player_size() {
        use crate::consts::{PLAYER_HEIGHT, PLAYER_WIDTH};
        assert_eq!(ObjectKind::Enemy.size(), (PLAYER_WIDTH, PLAYER_HEIGHT));
        assert_eq!(ObjectKind::Coin.size(), (6.0, 3.0));
    }
}
