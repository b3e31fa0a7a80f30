//! Builds the vertex list for one frame from the game state

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors, with_alpha};
use crate::consts::{GAME_HEIGHT, GAME_WIDTH};
use crate::sim::{GameObject, GameState, ObjectKind, Rect};

/// Lane dash geometry, in percent
const DASH_X: f32 = 49.0;
const DASH_WIDTH: f32 = 2.0;
const DASH_HEIGHT: f32 = 15.0;
const DASH_SPACING: f32 = 25.0;
const DASHES_PER_SET: usize = 5;

/// Outline thickness of coins and mystery boxes
const BORDER_PX: f32 = 4.0;
const CIRCLE_SEGMENTS: u32 = 24;
/// Seconds per invincibility blink
const PULSE_PERIOD: f64 = 2.0;

fn border() -> Vec2 {
    Vec2::new(
        BORDER_PX / GAME_WIDTH as f32 * 100.0,
        BORDER_PX / GAME_HEIGHT as f32 * 100.0,
    )
}

/// Top edges of the lane dashes for a road offset.
///
/// Two sets of five, the first a full road length above the second, so the
/// stripe pattern wraps seamlessly as the offset goes from 0 to 100.
pub fn lane_dash_tops(road_offset: f32) -> impl Iterator<Item = f32> {
    (0..DASHES_PER_SET).flat_map(move |i| {
        let y = i as f32 * DASH_SPACING + road_offset;
        [y - 100.0, y]
    })
}

fn road(state: &GameState, out: &mut Vec<Vertex>) {
    out.extend(shapes::rect(&Rect::new(0.0, 0.0, 100.0, 100.0), colors::ROAD));
    out.extend(shapes::rect(&Rect::new(0.0, 0.0, 1.0, 100.0), colors::ROAD_SHOULDER));
    out.extend(shapes::rect(&Rect::new(99.0, 0.0, 1.0, 100.0), colors::ROAD_SHOULDER));

    for top in lane_dash_tops(state.road_offset) {
        let dash = Rect::new(DASH_X, top, DASH_WIDTH, DASH_HEIGHT);
        out.extend(shapes::rect(&dash, colors::LANE_DASH));
    }
}

fn object(obj: &GameObject, out: &mut Vec<Vertex>) {
    let r = obj.rect();
    match obj.kind {
        ObjectKind::Obstacle => {
            // Yellow cone with two white bands
            out.extend(shapes::triangle_band(&r, 0.0, 1.0, colors::OBSTACLE));
            out.extend(shapes::triangle_band(&r, 0.0, 0.25, colors::OBSTACLE_STRIPE));
            out.extend(shapes::triangle_band(&r, 0.5, 0.75, colors::OBSTACLE_STRIPE));
        }
        ObjectKind::Enemy => out.extend(shapes::car(&r, colors::ENEMY, colors::WINDOW)),
        ObjectKind::Coin => {
            let outer = Vec2::new(r.width, r.height) * 0.5;
            let inner = (outer - border()).max(Vec2::ZERO);
            out.extend(shapes::circle(r.center(), inner, colors::COIN, CIRCLE_SEGMENTS));
            out.extend(shapes::ring(r.center(), inner, outer, colors::COIN_RIM, CIRCLE_SEGMENTS));
        }
        ObjectKind::MysteryBox => {
            let b = border();
            out.extend(shapes::rect(&r, colors::MYSTERY_BOX_RIM));
            out.extend(shapes::rect(
                &Rect::new(r.x + b.x, r.y + b.y, r.width - 2.0 * b.x, r.height - 2.0 * b.y),
                colors::MYSTERY_BOX,
            ));
            // Small white mark in the middle
            let dot = Vec2::new(r.width, r.height) * 0.12;
            out.extend(shapes::circle(r.center(), dot, colors::MARK, 8));
        }
    }
}

/// Player opacity: solid normally, a pulse between 0.25 and 0.5 while invincible
pub fn player_alpha(state: &GameState, time: f64) -> f32 {
    if !state.is_invincible() {
        return 1.0;
    }
    let phase = (time / PULSE_PERIOD * std::f64::consts::TAU).cos() as f32;
    0.5 * (0.75 + 0.25 * phase)
}

/// All vertices for one frame, back to front. `time` is in seconds.
pub fn build(state: &GameState, time: f64) -> Vec<Vertex> {
    let mut out = Vec::with_capacity(1024);

    road(state, &mut out);

    // Falling objects cover the player car
    let alpha = player_alpha(state, time);
    out.extend(shapes::car(
        &state.player.rect(),
        with_alpha(colors::PLAYER, alpha),
        with_alpha(colors::WINDOW, alpha),
    ));

    for obj in &state.objects {
        object(obj, &mut out);
    }

    out
}
