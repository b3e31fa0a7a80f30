//! Fixed timestep simulation tick
//!
//! Core game loop that advances the road, the player and every falling
//! object, resolves pickups and crashes, and drives phase transitions.

use rand::Rng;

use super::level::ObjectKind;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Steer left (held)
    pub left: bool,
    /// Steer right (held)
    pub right: bool,
    /// Start / next level / play again (one-shot)
    pub confirm: bool,
    /// Chosen quiz option (one-shot)
    pub answer: Option<usize>,
    /// Demo mode - AI drives and answers
    pub autopilot: bool,
}

/// How far above the car the autopilot looks for hazards
const AUTOPILOT_LOOKAHEAD: f32 = 40.0;
/// Extra clearance the autopilot keeps on each side
const AUTOPILOT_MARGIN: f32 = 3.0;

/// Advance the game state by one timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    let input = if input.autopilot {
        autopilot_input(state, input)
    } else {
        input.clone()
    };
    let input = &input;

    state.time_ticks += 1;

    match state.phase {
        GamePhase::Start => {
            if input.confirm {
                state.reset_run(state.start_level);
                start_level(state);
            }
        }

        GamePhase::Playing => drive(state, input, dt),

        GamePhase::Quiz => {
            let Some(answer) = input.answer else { return };
            let Some(correct) = state.question.as_ref().and_then(|q| q.is_correct(answer))
            else {
                // Not one of the buttons on screen
                return;
            };

            if correct {
                state.lives += 1;
                state.events.push(GameEvent::AnswerCorrect);
            } else {
                state.events.push(GameEvent::AnswerWrong);
            }
            log::info!(
                "Quiz answered {} (lives: {})",
                if correct { "correctly" } else { "wrong" },
                state.lives
            );
            state.question = None;
            state.phase = GamePhase::Playing;
        }

        GamePhase::LevelComplete => {
            if input.confirm {
                state.level = (state.level + 1).min(super::level::LAST_LEVEL);
                state.objects.clear();
                state.spawn_timer = 0.0;
                start_level(state);
            }
        }

        GamePhase::GameOver | GamePhase::GameWon => {
            if input.confirm {
                state.reset_run(state.start_level);
                state.phase = GamePhase::Start;
            }
        }
    }
}

fn start_level(state: &mut GameState) {
    state.phase = GamePhase::Playing;
    state.events.push(GameEvent::LevelStarted(state.level));
    log::info!(
        "Level {} started (speed {}, goal {})",
        state.level,
        state.level_config().speed,
        state.level_config().goal_score
    );
}

/// One tick of actual driving
fn drive(state: &mut GameState, input: &TickInput, dt: f32) {
    let cfg = state.level_config();

    // Scroll the road stripes
    state.road_offset = (state.road_offset + cfg.speed * dt * ROAD_SCROLL_FACTOR) % 100.0;

    // Steering
    let mut steer = 0.0;
    if input.left {
        steer -= PLAYER_SPEED * dt;
    }
    if input.right {
        steer += PLAYER_SPEED * dt;
    }
    state.player.steer(steer);

    // Move everything down the road, drop what fell off the bottom
    let dy = cfg.speed * dt;
    for obj in &mut state.objects {
        obj.advance(dy, dt);
    }
    state.objects.retain(|o| o.y < DESPAWN_Y);

    // Crash immunity wears off. Snap the f32 remainder so a full grace
    // period is a whole number of ticks.
    if state.invincible_secs > 0.0 {
        state.invincible_secs -= dt;
        if state.invincible_secs < dt * 0.5 {
            state.invincible_secs = 0.0;
        }
    }

    // Collisions: only the first object touching the car counts this tick
    let player_rect = state.player.rect();
    if let Some(idx) = state
        .objects
        .iter()
        .position(|o| o.rect().intersects(&player_rect))
    {
        let obj = state.objects.remove(idx);
        match obj.kind {
            ObjectKind::Coin => {
                state.score += SCORE_PER_COIN;
                state.events.push(GameEvent::CoinCollected);
            }
            ObjectKind::MysteryBox => {
                let question = state.quiz.pick(&mut state.rng).clone();
                log::info!("Mystery box: {}", question.question);
                state.question = Some(question);
                state.phase = GamePhase::Quiz;
                state.events.push(GameEvent::MysteryBoxOpened);
            }
            ObjectKind::Obstacle | ObjectKind::Enemy => {
                if !state.is_invincible() {
                    state.lives = state.lives.saturating_sub(1);
                    state.invincible_secs = INVINCIBILITY_SECS;
                    state.events.push(GameEvent::Crash);
                    log::debug!("Crashed into {:?}, {} lives left", obj.kind, state.lives);
                }
            }
        }
    }

    // Spawning
    state.spawn_timer += dt;
    if state.spawn_timer > cfg.spawn_interval_secs {
        state.spawn_timer = 0.0;
        spawn_random_object(state);
    }

    if state.phase != GamePhase::Playing {
        return;
    }

    // End of level / end of run
    if state.lives == 0 {
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::GameOver);
        log::info!("Game over at level {} with score {}", state.level, state.score);
    } else if state.score >= cfg.goal_score {
        if state.is_last_level() {
            state.phase = GamePhase::GameWon;
            state.events.push(GameEvent::GameWon);
            log::info!("All levels cleared with score {}", state.score);
        } else {
            state.phase = GamePhase::LevelComplete;
            state.events.push(GameEvent::LevelComplete(state.level));
            log::info!("Level {} complete (score {})", state.level, state.score);
        }
    }
}

/// Roll the level's spawn table and drop whatever comes up
pub fn spawn_random_object(state: &mut GameState) -> Option<u32> {
    let cfg = state.level_config();
    let roll: f32 = state.rng.random();
    let kind = cfg.weights.pick(roll)?;

    let dx = if kind == ObjectKind::Enemy {
        let direction = if state.rng.random_bool(0.5) { 1.0 } else { -1.0 };
        direction * (ENEMY_BASE_DX + state.level as f32 * ENEMY_DX_PER_LEVEL)
    } else {
        0.0
    };

    let (width, _) = kind.size();
    let x = state.rng.random::<f32>() * (100.0 - width);
    Some(state.spawn_object(kind, x, dx))
}

/// Demo-mode driver: dodge what's ahead, grab what's worth grabbing
fn autopilot_input(state: &GameState, input: &TickInput) -> TickInput {
    let mut out = input.clone();

    match state.phase {
        GamePhase::Start | GamePhase::LevelComplete => out.confirm = true,

        GamePhase::Quiz => {
            out.answer = state.question.as_ref().and_then(|q| q.correct_index());
        }

        GamePhase::Playing => {
            let player = state.player.rect();
            let player_center = player.center().x;
            let mut lane = player;
            lane.x -= AUTOPILOT_MARGIN;
            lane.width += AUTOPILOT_MARGIN * 2.0;

            // Closest hazard bearing down on our lane
            let threat = state
                .objects
                .iter()
                .filter(|o| o.kind.is_hazard())
                .filter(|o| o.y < player.bottom() && o.rect().bottom() > player.y - AUTOPILOT_LOOKAHEAD)
                .filter(|o| lane.overlaps_horizontally(&o.rect()))
                .max_by(|a, b| a.y.total_cmp(&b.y));

            out.left = false;
            out.right = false;

            if let Some(threat) = threat {
                let threat_center = threat.rect().center().x;
                let at_left_wall = state.player.x <= 1.0;
                let at_right_wall = state.player.x >= state.player.max_x() - 1.0;
                let go_left = if threat_center >= player_center {
                    !at_left_wall
                } else {
                    at_right_wall
                };
                out.left = go_left;
                out.right = !go_left;
            } else if let Some(target) = state
                .objects
                .iter()
                .filter(|o| !o.kind.is_hazard())
                .filter(|o| o.y < player.bottom())
                .max_by(|a, b| a.y.total_cmp(&b.y))
            {
                let delta = target.rect().center().x - player_center;
                if delta < -1.0 {
                    out.left = true;
                } else if delta > 1.0 {
                    out.right = true;
                }
            }
        }

        GamePhase::GameOver | GamePhase::GameWon => {}
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::QuizBank;
    use proptest::prelude::*;
    use rand::Rng;

    fn new_state(seed: u64) -> GameState {
        GameState::new(seed, QuizBank::builtin().unwrap())
    }

    /// A state already driving on level 1
    fn playing_state() -> GameState {
        let mut state = new_state(12345);
        let input = TickInput {
            confirm: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        state.drain_events();
        state
    }

    /// Put an object right on top of the player car
    fn place_on_player(state: &mut GameState, kind: ObjectKind) -> u32 {
        let id = state.spawn_object(kind, state.player.x, 0.0);
        let obj = state.objects.iter_mut().find(|o| o.id == id).unwrap();
        obj.y = crate::player_top() + 1.0;
        id
    }

    fn idle() -> TickInput {
        TickInput::default()
    }

    #[test]
    fn test_start_to_playing() {
        let mut state = new_state(1);
        tick(&mut state, &idle(), SIM_DT);
        assert_eq!(state.phase, GamePhase::Start);

        let input = TickInput {
            confirm: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.drain_events(), vec![GameEvent::LevelStarted(1)]);
    }

    #[test]
    fn test_steering() {
        let mut state = playing_state();
        let left = TickInput {
            left: true,
            ..Default::default()
        };
        for _ in 0..60 {
            tick(&mut state, &left, SIM_DT);
        }
        assert!((state.player.x - 17.5).abs() < 0.01);

        // Both keys cancel out
        let both = TickInput {
            left: true,
            right: true,
            ..Default::default()
        };
        let before = state.player.x;
        tick(&mut state, &both, SIM_DT);
        assert_eq!(state.player.x, before);

        for _ in 0..120 {
            tick(&mut state, &left, SIM_DT);
        }
        assert_eq!(state.player.x, 0.0);
    }

    #[test]
    fn test_road_scrolls_with_level_speed() {
        let mut state = playing_state();
        for _ in 0..120 {
            tick(&mut state, &idle(), SIM_DT);
        }
        // 20 %/s * 0.2 for one second
        assert!((state.road_offset - 4.0).abs() < 0.01);
    }

    #[test]
    fn test_coin_pickup() {
        let mut state = playing_state();
        place_on_player(&mut state, ObjectKind::Coin);
        tick(&mut state, &idle(), SIM_DT);

        assert_eq!(state.score, SCORE_PER_COIN);
        assert!(state.objects.is_empty());
        assert_eq!(state.drain_events(), vec![GameEvent::CoinCollected]);
    }

    #[test]
    fn test_only_first_collision_per_tick() {
        let mut state = playing_state();
        place_on_player(&mut state, ObjectKind::Coin);
        let second = place_on_player(&mut state, ObjectKind::Coin);

        tick(&mut state, &idle(), SIM_DT);
        assert_eq!(state.score, 2);
        assert_eq!(state.objects.len(), 1);
        assert_eq!(state.objects[0].id, second);

        tick(&mut state, &idle(), SIM_DT);
        assert_eq!(state.score, 4);
        assert!(state.objects.is_empty());
    }

    #[test]
    fn test_crash_then_invincible() {
        let mut state = playing_state();
        place_on_player(&mut state, ObjectKind::Obstacle);
        tick(&mut state, &idle(), SIM_DT);

        assert_eq!(state.lives, 2);
        assert!(state.is_invincible());
        assert_eq!(state.drain_events(), vec![GameEvent::Crash]);

        // A second hit during the grace period is absorbed
        place_on_player(&mut state, ObjectKind::Enemy);
        tick(&mut state, &idle(), SIM_DT);
        assert_eq!(state.lives, 2);
        assert!(state.objects.is_empty());
        assert!(state.drain_events().is_empty());

        // Grace period runs out after two seconds
        for _ in 0..(2 * 120) {
            tick(&mut state, &idle(), SIM_DT);
            state.objects.clear();
        }
        assert!(!state.is_invincible());
        place_on_player(&mut state, ObjectKind::Enemy);
        tick(&mut state, &idle(), SIM_DT);
        assert_eq!(state.lives, 1);
    }

    #[test]
    fn test_last_life_ends_the_run() {
        let mut state = playing_state();
        state.lives = 1;
        place_on_player(&mut state, ObjectKind::Obstacle);
        tick(&mut state, &idle(), SIM_DT);

        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::Crash, GameEvent::GameOver]
        );

        // World is frozen until "Play Again"
        let x = state.player.x;
        let right = TickInput {
            right: true,
            ..Default::default()
        };
        tick(&mut state, &right, SIM_DT);
        assert_eq!(state.player.x, x);

        let confirm = TickInput {
            confirm: true,
            ..Default::default()
        };
        tick(&mut state, &confirm, SIM_DT);
        assert_eq!(state.phase, GamePhase::Start);
        assert_eq!(state.lives, INITIAL_LIVES);
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 1);
    }

    #[test]
    fn test_level_complete_and_next_level() {
        let mut state = playing_state();
        state.score = 18;
        place_on_player(&mut state, ObjectKind::Coin);
        tick(&mut state, &idle(), SIM_DT);

        assert_eq!(state.phase, GamePhase::LevelComplete);
        assert!(state.drain_events().contains(&GameEvent::LevelComplete(1)));

        state.spawn_object(ObjectKind::Obstacle, 10.0, 0.0);
        let confirm = TickInput {
            confirm: true,
            ..Default::default()
        };
        tick(&mut state, &confirm, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.level, 2);
        assert_eq!(state.score, 20);
        assert!(state.objects.is_empty());
        assert_eq!(state.drain_events(), vec![GameEvent::LevelStarted(2)]);
    }

    #[test]
    fn test_last_level_wins_the_game() {
        let mut state = new_state(5).with_start_level(10);
        let confirm = TickInput {
            confirm: true,
            ..Default::default()
        };
        tick(&mut state, &confirm, SIM_DT);
        assert_eq!(state.level, 10);

        state.score = 298;
        place_on_player(&mut state, ObjectKind::Coin);
        tick(&mut state, &idle(), SIM_DT);
        assert_eq!(state.phase, GamePhase::GameWon);
        assert!(state.drain_events().contains(&GameEvent::GameWon));

        tick(&mut state, &confirm, SIM_DT);
        assert_eq!(state.phase, GamePhase::Start);
        assert_eq!(state.level, 10);
    }

    #[test]
    fn test_mystery_box_quiz_flow() {
        let mut state = playing_state();
        place_on_player(&mut state, ObjectKind::MysteryBox);
        tick(&mut state, &idle(), SIM_DT);

        assert_eq!(state.phase, GamePhase::Quiz);
        assert!(state.question.is_some());
        assert_eq!(state.drain_events(), vec![GameEvent::MysteryBoxOpened]);

        // Road is frozen during the quiz
        state.spawn_object(ObjectKind::Coin, 10.0, 0.0);
        let y = state.objects[0].y;
        tick(&mut state, &idle(), SIM_DT);
        assert_eq!(state.objects[0].y, y);

        // Out-of-range answers are ignored
        let bogus = TickInput {
            answer: Some(17),
            ..Default::default()
        };
        tick(&mut state, &bogus, SIM_DT);
        assert_eq!(state.phase, GamePhase::Quiz);

        let correct = state.question.as_ref().unwrap().correct_index().unwrap();
        let answer = TickInput {
            answer: Some(correct),
            ..Default::default()
        };
        tick(&mut state, &answer, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.lives, INITIAL_LIVES + 1);
        assert!(state.question.is_none());
        assert_eq!(state.drain_events(), vec![GameEvent::AnswerCorrect]);
    }

    #[test]
    fn test_wrong_answer_keeps_lives() {
        let mut state = playing_state();
        place_on_player(&mut state, ObjectKind::MysteryBox);
        tick(&mut state, &idle(), SIM_DT);
        state.drain_events();

        let correct = state.question.as_ref().unwrap().correct_index().unwrap();
        let wrong = (correct + 1) % 4;
        let answer = TickInput {
            answer: Some(wrong),
            ..Default::default()
        };
        tick(&mut state, &answer, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.lives, INITIAL_LIVES);
        assert_eq!(state.drain_events(), vec![GameEvent::AnswerWrong]);
    }

    #[test]
    fn test_spawning_follows_interval() {
        let mut state = playing_state();
        // Level 1 spawns once per second
        for _ in 0..100 {
            tick(&mut state, &idle(), SIM_DT);
        }
        assert!(state.objects.is_empty());

        for _ in 0..21 {
            tick(&mut state, &idle(), SIM_DT);
        }
        assert_eq!(state.objects.len(), 1);
        let obj = &state.objects[0];
        assert!(obj.x >= 0.0 && obj.x <= 100.0 - obj.width);
        assert!(obj.y < 0.0);
        assert_ne!(obj.kind, ObjectKind::Enemy);
    }

    #[test]
    fn test_enemy_spawn_speed_scales_with_level() {
        let mut state = playing_state();
        state.level = 10; // hazards only
        let mut saw_enemy = false;
        for _ in 0..50 {
            if let Some(id) = spawn_random_object(&mut state) {
                let obj = state.objects.iter().find(|o| o.id == id).unwrap();
                if obj.kind == ObjectKind::Enemy {
                    assert_eq!(obj.dx.abs(), 15.0 + 10.0 * 1.5);
                    saw_enemy = true;
                } else {
                    assert_eq!(obj.dx, 0.0);
                }
            }
        }
        assert!(saw_enemy);
    }

    #[test]
    fn test_objects_despawn_below_screen() {
        let mut state = playing_state();
        let id = state.spawn_object(ObjectKind::Coin, 0.0, 0.0);
        state.objects[0].y = DESPAWN_Y - 0.01;
        tick(&mut state, &idle(), SIM_DT);
        assert!(state.objects.iter().all(|o| o.id != id));
    }

    #[test]
    fn test_crash_as_immunity_runs_out_hurts() {
        let mut state = playing_state();
        state.invincible_secs = SIM_DT;
        place_on_player(&mut state, ObjectKind::Obstacle);
        tick(&mut state, &idle(), SIM_DT);

        assert_eq!(state.lives, INITIAL_LIVES - 1);
        assert_eq!(state.drain_events(), vec![GameEvent::Crash]);
        assert_eq!(state.invincible_secs, INVINCIBILITY_SECS);
    }

    #[test]
    fn test_grace_period_is_exactly_two_seconds() {
        let mut state = playing_state();
        place_on_player(&mut state, ObjectKind::Obstacle);
        tick(&mut state, &idle(), SIM_DT);
        assert!(state.is_invincible());

        let grace_ticks = (INVINCIBILITY_SECS / SIM_DT).round() as usize;
        for _ in 0..grace_ticks - 1 {
            tick(&mut state, &idle(), SIM_DT);
            state.objects.clear();
            assert!(state.is_invincible());
        }
        tick(&mut state, &idle(), SIM_DT);
        assert!(!state.is_invincible());
        assert_eq!(state.invincible_secs, 0.0);
    }

    #[test]
    fn test_autopilot_collects_coins() {
        let mut state = new_state(2024);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..(60 * 120) {
            tick(&mut state, &input, SIM_DT);
            if matches!(state.phase, GamePhase::GameOver | GamePhase::GameWon) {
                break;
            }
        }
        assert_ne!(state.phase, GamePhase::Start);
        assert!(state.score > 0 || state.level > 1);
    }

    #[test]
    fn test_autopilot_answers_correctly() {
        let mut state = playing_state();
        place_on_player(&mut state, ObjectKind::MysteryBox);
        tick(&mut state, &idle(), SIM_DT);
        assert_eq!(state.phase, GamePhase::Quiz);

        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.lives, INITIAL_LIVES + 1);
    }

    #[test]
    fn test_autopilot_dodges_hazard_ahead() {
        let mut state = playing_state();
        // Cone slightly right of centre, just above the car
        let id = state.spawn_object(ObjectKind::Obstacle, state.player.x + 6.0, 0.0);
        state.objects.iter_mut().find(|o| o.id == id).unwrap().y = 70.0;

        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        let before = state.player.x;
        tick(&mut state, &input, SIM_DT);
        assert!(state.player.x < before);
    }

    proptest! {
        #[test]
        fn prop_same_seed_and_inputs_give_same_state(
            seed in any::<u64>(),
            moves in prop::collection::vec((any::<bool>(), any::<bool>(), any::<bool>(), 0usize..5), 1..120),
        ) {
            let mut state1 = new_state(seed);
            let mut state2 = new_state(seed);

            for (left, right, confirm, answer) in moves {
                let input = TickInput {
                    left,
                    right,
                    confirm,
                    answer: Some(answer),
                    ..Default::default()
                };
                for _ in 0..8 {
                    tick(&mut state1, &input, SIM_DT);
                    tick(&mut state2, &input, SIM_DT);
                }
            }

            prop_assert_eq!(state1.time_ticks, state2.time_ticks);
            prop_assert_eq!(state1.phase, state2.phase);
            prop_assert_eq!(state1.level, state2.level);
            prop_assert_eq!(state1.score, state2.score);
            prop_assert_eq!(state1.lives, state2.lives);
            prop_assert_eq!(state1.player.x, state2.player.x);
            prop_assert_eq!(state1.road_offset, state2.road_offset);
            prop_assert_eq!(state1.invincible_secs, state2.invincible_secs);
            prop_assert_eq!(&state1.question, &state2.question);
            prop_assert_eq!(&state1.objects, &state2.objects);
            prop_assert_eq!(&state1.events, &state2.events);
            prop_assert_eq!(state1.rng.random::<u32>(), state2.rng.random::<u32>());
        }

        #[test]
        fn prop_everything_stays_on_road(
            seed in any::<u64>(),
            moves in prop::collection::vec((any::<bool>(), any::<bool>(), any::<bool>()), 1..400),
        ) {
            let mut state = new_state(seed);
            let start = TickInput { confirm: true, ..Default::default() };
            tick(&mut state, &start, SIM_DT);

            for (left, right, answer) in moves {
                let input = TickInput {
                    left,
                    right,
                    answer: answer.then_some(0),
                    ..Default::default()
                };
                // Several ticks per input so objects actually reach the car
                for _ in 0..6 {
                    tick(&mut state, &input, SIM_DT);
                }

                prop_assert!(state.player.x >= 0.0);
                prop_assert!(state.player.x <= state.player.max_x());
                for obj in &state.objects {
                    prop_assert!(obj.y < DESPAWN_Y);
                    prop_assert!(obj.x >= 0.0 && obj.x <= 100.0 - obj.width);
                }
                prop_assert!(state.phase != GamePhase::Start);
                if state.phase == GamePhase::Quiz {
                    prop_assert!(state.question.is_some());
                }
                if state.lives == 0 {
                    prop_assert_eq!(state.phase, GamePhase::GameOver);
                }
            }
        }

        #[test]
        fn prop_lives_only_change_through_events(seed in any::<u64>()) {
            let mut state = new_state(seed);
            let input = TickInput { autopilot: true, ..Default::default() };
            let mut expected = state.lives as i64;

            for _ in 0..(20 * 120) {
                tick(&mut state, &input, SIM_DT);
                for event in state.drain_events() {
                    match event {
                        GameEvent::Crash => expected -= 1,
                        GameEvent::AnswerCorrect => expected += 1,
                        _ => {}
                    }
                }
                prop_assert_eq!(state.lives as i64, expected);
                if matches!(state.phase, GamePhase::GameOver | GamePhase::GameWon) {
                    break;
                }
            }
        }
    }
}
