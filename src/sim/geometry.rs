//! Geometry helpers on top of `glam::Vec3`
//!
//! Axes: `x` lateral, `y` up, `z` the travel axis.

use glam::Vec3;

/// Unit vector along the travel axis
pub const TRAVEL_AXIS: Vec3 = Vec3::Z;

/// Overlap test between a sphere's bounding box and an axis-aligned box
///
/// `size` is the box's full extents; the sphere is inflated into a cube of
/// side `2 * radius`, so the test is a strict per-axis interval overlap.
#[inline]
pub fn sphere_box_overlap(center: Vec3, radius: f32, box_center: Vec3, size: Vec3) -> bool {
    let delta = (center - box_center).abs();
    let reach = size * 0.5 + Vec3::splat(radius);
    delta.x < reach.x && delta.y < reach.y && delta.z < reach.z
}

/// Distance between two points ignoring the travel axis
#[inline]
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}

/// Signed separation of two points along the travel axis
#[inline]
pub fn axial_separation(a: Vec3, b: Vec3) -> f32 {
    (a - b).dot(TRAVEL_AXIS)
}

/// Move `value` toward zero by at most `amount`, never crossing it
#[inline]
pub fn decay_toward_zero(value: f32, amount: f32) -> f32 {
    if value > 0.0 {
        (value - amount).max(0.0)
    } else if value < 0.0 {
        (value + amount).min(0.0)
    } else {
        0.0
    }
}
