//! Axis-aligned rectangles in play-field space
//!
//! Everything on the road is a box: the car, coins, cones, other cars.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned box, top-left anchored (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Strict overlap test. Boxes that only share an edge do not collide.
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Horizontal overlap only (used for "is it in my lane?")
    #[inline]
    pub fn overlaps_horizontally(&self, other: &Rect) -> bool {
        self.x < other.right() && self.right() > other.x
    }
}
