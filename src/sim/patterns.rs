//! Obstacle patterns and weighted selection
//!
//! A wave is built from patterns drawn out of a weighted table. Each pattern
//! places its boxes at fixed offsets around the wave's travel-axis anchor.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entities::Obstacle;

/// One entry of a weighted table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weighted<T> {
    pub item: T,
    pub weight: f32,
}

impl<T> Weighted<T> {
    pub const fn new(item: T, weight: f32) -> Self {
        Self { item, weight }
    }
}

/// Cumulative-weight lookup for a draw in `[0, total)`
///
/// Walks the buckets and returns the first whose running sum meets or
/// exceeds `draw`. Zero-weight buckets are never chosen.
pub fn pick_weighted<T: Copy>(table: &[Weighted<T>], draw: f32) -> Option<T> {
    let mut cumulative = 0.0;
    let mut last = None;
    for entry in table {
        if entry.weight <= 0.0 {
            continue;
        }
        cumulative += entry.weight;
        last = Some(entry.item);
        if cumulative >= draw {
            return Some(entry.item);
        }
    }
    // Rounding can leave the draw a hair above the final sum
    last
}

/// Draw from a weighted table with the given RNG
pub fn sample_weighted<T: Copy, R: Rng>(table: &[Weighted<T>], rng: &mut R) -> Option<T> {
    let total: f32 = table.iter().map(|w| w.weight.max(0.0)).sum();
    if total <= 0.0 {
        return None;
    }
    let draw = rng.random::<f32>() * total;
    pick_weighted(table, draw)
}

/// Obstacle arrangements the generator knows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatternKind {
    /// One box hugging the left or right side
    Slalom,
    /// A wide box sliding across the lane
    Gate,
    /// Two long boxes leaving a gap in the middle
    Passage,
    /// Low full-width bar that must be jumped
    JumpBar,
    /// A box orbiting a column in the middle of the lane
    Spinner,
    /// Placed from a preset level layout
    Preset,
}

impl PatternKind {
    /// Append this pattern's obstacles anchored at `z`
    ///
    /// `lane_half_width` is the distance from the lane centre to the wall.
    pub fn build<R: Rng>(
        self,
        z: f32,
        lane_half_width: f32,
        rng: &mut R,
        out: &mut Vec<Obstacle>,
    ) {
        match self {
            PatternKind::Slalom => {
                let side = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
                let x = side * (lane_half_width - 1.5);
                out.push(Obstacle::fixed(
                    Vec3::new(x, 1.0, z),
                    Vec3::new(2.0, 2.0, 2.0),
                    self,
                ));
            }
            PatternKind::Gate => {
                let range = lane_half_width * 0.65;
                let speed = rng.random_range(2.0..3.0);
                out.push(Obstacle::oscillating(
                    Vec3::new(0.0, 1.0, z),
                    Vec3::new(4.0, 2.0, 2.0),
                    range,
                    speed,
                    self,
                ));
            }
            PatternKind::Passage => {
                let x = lane_half_width - 0.5;
                let size = Vec3::new(2.0, 2.0, 8.0);
                out.push(Obstacle::fixed(Vec3::new(-x, 1.0, z), size, self));
                out.push(Obstacle::fixed(Vec3::new(x, 1.0, z), size, self));
            }
            PatternKind::JumpBar => {
                out.push(Obstacle::fixed(
                    Vec3::new(0.0, 0.3, z),
                    Vec3::new(lane_half_width * 2.0, 0.6, 1.0),
                    self,
                ));
            }
            PatternKind::Spinner => {
                let direction = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
                let start = rng.random_range(0.0..std::f32::consts::TAU);
                out.push(Obstacle::spinning(
                    Vec3::new(0.0, 1.0, z),
                    Vec3::splat(1.0),
                    lane_half_width * 0.55,
                    2.0 * direction,
                    start,
                    self,
                ));
            }
            PatternKind::Preset => {}
        }
    }
}
