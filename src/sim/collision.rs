//! Collision detection for the ball against axis-aligned rectangles
//!
//! One nearest-point circle/rectangle test covers both paddle and block
//! contacts; reflection picks the axis of shallowest penetration.

use glam::Vec2;

/// Circle vs axis-aligned rectangle overlap via closest-point test
#[inline]
pub fn circle_rect_overlap(center: Vec2, radius: f32, rx: f32, ry: f32, rw: f32, rh: f32) -> bool {
    let closest_x = center.x.clamp(rx, rx + rw);
    let closest_y = center.y.clamp(ry, ry + rh);
    let dx = center.x - closest_x;
    let dy = center.y - closest_y;
    dx * dx + dy * dy <= radius * radius
}

/// Which velocity component to flip after striking a rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReflectAxis {
    /// Struck the left or right edge: flip vx
    Horizontal,
    /// Struck the top or bottom edge: flip vy
    Vertical,
}

/// Pick the reflection axis for a ball center against a struck rectangle.
///
/// Compares the distances from the ball center to the four edges; the
/// minimum decides the side of nearest penetration. A left/right minimum
/// flips vx, otherwise vy (ties fall to vertical, matching `min` order).
pub fn reflect_axis(center: Vec2, rx: f32, ry: f32, rw: f32, rh: f32) -> ReflectAxis {
    let left = (rx - center.x).abs();
    let right = (rx + rw - center.x).abs();
    let top = (ry - center.y).abs();
    let bottom = (ry + rh - center.y).abs();
    let m = left.min(right).min(top).min(bottom);

    if m == left || m == right {
        ReflectAxis::Horizontal
    } else {
        ReflectAxis::Vertical
    }
}
