//! Plain 2D math: positions, velocities and axis-aligned boxes.
//!
//! World space is screen-like: x grows to the right, y grows downward, so
//! a box's `bottom` is where an actor's feet are.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl std::ops::Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// Axis-aligned box stored as its top-left corner plus extent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Aabb {
    /// Negative extents are clamped to zero.
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Box of the given size centred on `center`.
    pub fn from_center(center: Vec2, width: f32, height: f32) -> Self {
        Self::new(center.x - width / 2.0, center.y - height / 2.0, width, height)
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        intersects(self, other)
    }
}

/// Separating-axis overlap test. Boxes that only share an edge do not
/// overlap.
pub fn intersects(a: &Aabb, b: &Aabb) -> bool {
    a.right() > b.left && a.left < b.right() && a.bottom() > b.top && a.top < b.bottom()
}
