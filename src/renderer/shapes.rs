//! Shape generation for 2D primitives
//!
//! Everything is in play-field percent (x right, y down). A percent of width
//! and a percent of height differ in pixels, so round shapes take per-axis radii.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;
use crate::sim::Rect;

/// Car outline in its 50x100 design box (star-shaped around `CAR_CENTER`)
const CAR_OUTLINE: [Vec2; 12] = [
    Vec2::new(10.0, 0.0),
    Vec2::new(40.0, 0.0),
    Vec2::new(40.0, 10.0),
    Vec2::new(50.0, 20.0),
    Vec2::new(50.0, 80.0),
    Vec2::new(40.0, 90.0),
    Vec2::new(40.0, 100.0),
    Vec2::new(10.0, 100.0),
    Vec2::new(10.0, 90.0),
    Vec2::new(0.0, 80.0),
    Vec2::new(0.0, 20.0),
    Vec2::new(10.0, 10.0),
];
const CAR_CENTER: Vec2 = Vec2::new(25.0, 50.0);
const CAR_BOX: Vec2 = Vec2::new(50.0, 100.0);
/// Windshield and rear window, as (min, max) in the design box
const CAR_WINDOWS: [(Vec2, Vec2); 2] = [
    (Vec2::new(15.0, 20.0), Vec2::new(35.0, 40.0)),
    (Vec2::new(15.0, 50.0), Vec2::new(35.0, 70.0)),
];

/// Two triangles covering `r`
pub fn rect(r: &Rect, color: [f32; 4]) -> Vec<Vertex> {
    let (l, t, rt, b) = (r.x, r.y, r.right(), r.bottom());
    vec![
        Vertex::new(l, t, color),
        Vertex::new(rt, t, color),
        Vertex::new(l, b, color),
        Vertex::new(l, b, color),
        Vertex::new(rt, t, color),
        Vertex::new(rt, b, color),
    ]
}

pub fn triangle(a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    vec![
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
    ]
}

/// Filled polygon fanned out from `center`.
///
/// Correct for any outline every point of which can see `center`.
pub fn polygon_fan(center: Vec2, points: &[Vec2], color: [f32; 4]) -> Vec<Vertex> {
    if points.len() < 2 {
        return Vec::new();
    }
    let mut vertices = Vec::with_capacity(points.len() * 3);
    for (i, p) in points.iter().enumerate() {
        let next = points[(i + 1) % points.len()];
        vertices.extend(triangle(center, *p, next, color));
    }
    vertices
}

fn ellipse_point(center: Vec2, radius: Vec2, theta: f32) -> Vec2 {
    center + Vec2::new(radius.x * theta.cos(), radius.y * theta.sin())
}

/// Filled circle (ellipse in percent space)
pub fn circle(center: Vec2, radius: Vec2, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let points: Vec<Vec2> = (0..segments)
        .map(|i| ellipse_point(center, radius, i as f32 / segments as f32 * 2.0 * PI))
        .collect();
    polygon_fan(center, &points, color)
}

/// Hollow circle between `inner` and `outer` radii
pub fn ring(
    center: Vec2,
    inner: Vec2,
    outer: Vec2,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        let inner1 = ellipse_point(center, inner, theta1);
        let outer1 = ellipse_point(center, outer, theta1);
        let inner2 = ellipse_point(center, inner, theta2);
        let outer2 = ellipse_point(center, outer, theta2);

        vertices.extend(triangle(inner1, outer1, inner2, color));
        vertices.extend(triangle(inner2, outer1, outer2, color));
    }

    vertices
}

/// Horizontal slice `t0..t1` (0 = apex, 1 = base) of an upward-pointing
/// triangle filling `bounds`
pub fn triangle_band(bounds: &Rect, t0: f32, t1: f32, color: [f32; 4]) -> Vec<Vertex> {
    let cx = bounds.center().x;
    let half = |t: f32| bounds.width * 0.5 * t;
    let y = |t: f32| bounds.y + bounds.height * t;

    let (top_l, top_r) = (Vec2::new(cx - half(t0), y(t0)), Vec2::new(cx + half(t0), y(t0)));
    let (bot_l, bot_r) = (Vec2::new(cx - half(t1), y(t1)), Vec2::new(cx + half(t1), y(t1)));

    let mut vertices = triangle(top_l, top_r, bot_l, color);
    vertices.extend(triangle(bot_l, top_r, bot_r, color));
    vertices
}

fn car_to(bounds: &Rect, p: Vec2) -> Vec2 {
    Vec2::new(bounds.x, bounds.y) + p / CAR_BOX * Vec2::new(bounds.width, bounds.height)
}

/// Top-down car filling `bounds`, nose up
pub fn car(bounds: &Rect, body: [f32; 4], window: [f32; 4]) -> Vec<Vertex> {
    let outline: Vec<Vec2> = CAR_OUTLINE.iter().map(|p| car_to(bounds, *p)).collect();
    let mut vertices = polygon_fan(car_to(bounds, CAR_CENTER), &outline, body);

    for (min, max) in CAR_WINDOWS {
        let min = car_to(bounds, min);
        let max = car_to(bounds, max);
        vertices.extend(rect(
            &Rect::new(min.x, min.y, max.x - min.x, max.y - min.y),
            window,
        ));
    }

    vertices
}
