//! Axis-aligned rectangle collision
//!
//! Basket and falling objects are both boxes, so a catch is a plain
//! interval-intersection test on each axis.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle anchored at its top-left corner (y grows down)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Strict overlap: touching edges do not count
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        aabb_overlap(self, other)
    }
}

/// True when the open intervals of both rectangles intersect on both axes
#[inline]
pub fn aabb_overlap(a: &Rect, b: &Rect) -> bool {
    a.x < b.right() && a.right() > b.x && a.y < b.bottom() && a.bottom() > b.y
}
