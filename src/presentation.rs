//! Flat instance records for an external renderer
//!
//! Turns a [`Snapshot`] into one `Instance` per drawable: road slabs,
//! obstacles, power-ups, particles and the player. The records are `Pod`, so
//! a renderer can upload them with `bytemuck::cast_slice` as-is.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::sim::{ParticleColor, PatternKind, PowerUpKind, Snapshot};

/// Which mesh an instance uses
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Cube = 0,
    Sphere = 1,
}

/// One drawable
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Instance {
    pub position: [f32; 3],
    /// Full extents for cubes, diameter for spheres
    pub scale: [f32; 3],
    pub color: [f32; 4],
    pub shape: u32,
}

impl Instance {
    pub fn new(shape: Shape, position: Vec3, scale: Vec3, color: [f32; 4]) -> Self {
        Self {
            position: position.to_array(),
            scale: scale.to_array(),
            color,
            shape: shape as u32,
        }
    }

    fn sphere(position: Vec3, diameter: f32, color: [f32; 4]) -> Self {
        Self::new(Shape::Sphere, position, Vec3::splat(diameter), color)
    }
}

/// Colors for game elements
pub mod colors {
    pub const ROAD: [f32; 4] = [0.31, 0.31, 0.31, 1.0];
    pub const PLAYER: [f32; 4] = [0.0, 0.47, 0.95, 1.0];
    pub const PLAYER_BOOSTED: [f32; 4] = [0.0, 0.89, 0.19, 1.0];
    pub const PLAYER_SHIELDED: [f32; 4] = [0.4, 0.75, 1.0, 1.0];
    pub const PLAYER_MAGNET: [f32; 4] = [0.78, 0.48, 1.0, 1.0];
    pub const SHIELD_BUBBLE: [f32; 4] = [0.4, 0.75, 1.0, 0.5];

    pub const SLALOM: [f32; 4] = [0.9, 0.16, 0.22, 1.0];
    pub const GATE: [f32; 4] = [0.75, 0.13, 0.22, 1.0];
    pub const PASSAGE: [f32; 4] = [0.0, 0.32, 0.67, 1.0];
    pub const JUMP_BAR: [f32; 4] = [1.0, 0.63, 0.0, 1.0];
    pub const SPINNER: [f32; 4] = [0.78, 0.48, 1.0, 1.0];
    pub const PRESET: [f32; 4] = [0.9, 0.16, 0.22, 1.0];

    pub const SPEED_BOOST: [f32; 4] = [0.0, 0.89, 0.19, 1.0];
    pub const SHIELD: [f32; 4] = [0.4, 0.75, 1.0, 1.0];
    pub const POINTS: [f32; 4] = [1.0, 0.8, 0.0, 1.0];
    pub const MAGNET: [f32; 4] = [0.78, 0.48, 1.0, 1.0];

    pub const COMBO: [f32; 4] = [1.0, 0.8, 0.0, 1.0];
    pub const DEFLECT: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
}

/// Thickness of a road slab
const ROAD_THICKNESS: f32 = 0.1;

fn pattern_color(pattern: PatternKind) -> [f32; 4] {
    match pattern {
        PatternKind::Slalom => colors::SLALOM,
        PatternKind::Gate => colors::GATE,
        PatternKind::Passage => colors::PASSAGE,
        PatternKind::JumpBar => colors::JUMP_BAR,
        PatternKind::Spinner => colors::SPINNER,
        PatternKind::Preset => colors::PRESET,
    }
}

pub fn power_up_color(kind: PowerUpKind) -> [f32; 4] {
    match kind {
        PowerUpKind::SpeedBoost => colors::SPEED_BOOST,
        PowerUpKind::Shield => colors::SHIELD,
        PowerUpKind::Points => colors::POINTS,
        PowerUpKind::Magnet => colors::MAGNET,
    }
}

fn particle_color(color: ParticleColor) -> [f32; 4] {
    match color {
        ParticleColor::Collect(kind) => power_up_color(kind),
        ParticleColor::Combo => colors::COMBO,
        ParticleColor::Deflect => colors::DEFLECT,
    }
}

/// Build every instance for one frame, back to front
pub fn build_instances(snapshot: &Snapshot<'_>) -> Vec<Instance> {
    let mut out = Vec::with_capacity(
        snapshot.segments.len()
            + snapshot.obstacles.len()
            + snapshot.power_ups.len()
            + snapshot.particles.len()
            + 2,
    );

    let width = snapshot.lane_half_width * 2.0;
    let length = snapshot.segment_length;
    for &z in snapshot.segments {
        out.push(Instance::new(
            Shape::Cube,
            Vec3::new(0.0, -ROAD_THICKNESS * 0.5, z + length * 0.5),
            Vec3::new(width, ROAD_THICKNESS, length),
            colors::ROAD,
        ));
    }

    for obstacle in snapshot.obstacles {
        out.push(Instance::new(
            Shape::Cube,
            obstacle.position,
            obstacle.size,
            pattern_color(obstacle.pattern),
        ));
    }

    for power_up in snapshot.power_ups.iter().filter(|p| p.is_active()) {
        out.push(Instance::sphere(
            power_up.position,
            power_up.radius * 2.0,
            power_up_color(power_up.kind),
        ));
    }

    for particle in snapshot.particles {
        let mut color = particle_color(particle.color);
        color[3] *= particle.fade();
        out.push(Instance::sphere(particle.position, particle.size * 2.0, color));
    }

    let player = snapshot.player;
    let modifiers = &player.modifiers;
    let color = if modifiers.has_speed_boost() {
        colors::PLAYER_BOOSTED
    } else if modifiers.has_shield() {
        colors::PLAYER_SHIELDED
    } else if modifiers.has_magnet() {
        colors::PLAYER_MAGNET
    } else {
        colors::PLAYER
    };
    out.push(Instance::sphere(player.position, player.radius * 2.0, color));
    if modifiers.has_shield() {
        out.push(Instance::sphere(
            player.position,
            player.radius * 2.4,
            colors::SHIELD_BUBBLE,
        ));
    }

    out
}
