//! Geometry - Small math helpers shared by the controllers and the step
//!
//! Angles are radians in screen space (y grows downward), so a heading
//! of `-PI / 2` points up the screen.

use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

/// A point (or offset) on the track plane
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Bearing from `self` toward `other`
    pub fn bearing_to(self, other: Point) -> f32 {
        (other.y - self.y).atan2(other.x - self.x)
    }
}

/// Restrict `value` to `[min, max]`. Callers guarantee `min <= max`.
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

/// Euclidean distance between two points
pub fn distance(a: Point, b: Point) -> f32 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Signed minimal rotation taking `current` onto `target`, in `(-PI, PI]`.
///
/// Plain subtraction breaks across the ±PI seam (a target of 3.1 and a
/// heading of -3.1 are 0.08 apart, not 6.2), so the delta is folded back
/// through `atan2(sin, cos)`.
pub fn angle_difference(target: f32, current: f32) -> f32 {
    let delta = target - current;
    let folded = delta.sin().atan2(delta.cos());
    if folded <= -PI {
        folded + TAU
    } else {
        folded
    }
}
