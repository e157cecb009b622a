//! Track entities: obstacles, power-ups and particles
//!
//! Passive data plus the per-entity update rule each one runs every tick.

use std::f32::consts::TAU;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::patterns::PatternKind;

/// Obstacle motion, fixed at creation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Does not move
    Static,
    /// Slides side to side: `x = initial_x + range * sin(angular_speed * elapsed)`
    Oscillating {
        initial_x: f32,
        range: f32,
        angular_speed: f32,
        elapsed: f32,
    },
    /// Orbits a vertical column at `center` in the horizontal plane
    Spinning {
        center: Vec3,
        radius: f32,
        angular_speed: f32,
        angle: f32,
    },
}

impl ObstacleKind {
    /// Axis-aligned box contact applies (everything but spinners)
    pub fn is_box(&self) -> bool {
        !matches!(self, ObstacleKind::Spinning { .. })
    }
}

/// A box-shaped obstacle on the track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Current (animated) centre
    pub position: Vec3,
    /// Full extents, all positive
    pub size: Vec3,
    kind: ObstacleKind,
    /// Which pattern produced it (presentation category)
    pub pattern: PatternKind,
}

impl Obstacle {
    /// Box that never moves
    pub fn fixed(position: Vec3, size: Vec3, pattern: PatternKind) -> Self {
        Self {
            position,
            size,
            kind: ObstacleKind::Static,
            pattern,
        }
    }

    /// Box sliding along x as `initial_x + sin(t * angular_speed) * range`
    pub fn oscillating(
        position: Vec3,
        size: Vec3,
        range: f32,
        angular_speed: f32,
        pattern: PatternKind,
    ) -> Self {
        Self {
            position,
            size,
            kind: ObstacleKind::Oscillating {
                initial_x: position.x,
                range,
                angular_speed,
                elapsed: 0.0,
            },
            pattern,
        }
    }

    /// Box orbiting a column at `center` in the x-z plane
    pub fn spinning(
        center: Vec3,
        size: Vec3,
        radius: f32,
        angular_speed: f32,
        start_angle: f32,
        pattern: PatternKind,
    ) -> Self {
        let mut obstacle = Self {
            position: center,
            size,
            kind: ObstacleKind::Spinning {
                center,
                radius,
                angular_speed,
                angle: start_angle,
            },
            pattern,
        };
        obstacle.update(0.0);
        obstacle
    }

    pub fn kind(&self) -> &ObstacleKind {
        &self.kind
    }

    /// Advance this obstacle's animation by `dt` seconds
    pub fn update(&mut self, dt: f32) {
        match &mut self.kind {
            ObstacleKind::Static => {}
            ObstacleKind::Oscillating {
                initial_x,
                range,
                angular_speed,
                elapsed,
            } => {
                *elapsed += dt;
                self.position.x = *initial_x + *range * (*angular_speed * *elapsed).sin();
            }
            ObstacleKind::Spinning {
                center,
                radius,
                angular_speed,
                angle,
            } => {
                *angle = (*angle + *angular_speed * dt).rem_euclid(TAU);
                self.position.x = center.x + *radius * angle.cos();
                self.position.z = center.z + *radius * angle.sin();
            }
        }
    }

    /// Travel-axis coordinate the generator placed this obstacle at
    pub fn anchor_z(&self) -> f32 {
        match self.kind {
            ObstacleKind::Spinning { center, .. } => center.z,
            _ => self.position.z,
        }
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    SpeedBoost,
    Shield,
    Points,
    Magnet,
}

impl PowerUpKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUpKind::SpeedBoost => "speed_boost",
            PowerUpKind::Shield => "shield",
            PowerUpKind::Points => "points",
            PowerUpKind::Magnet => "magnet",
        }
    }
}

/// Hover amplitude and rate for power-ups
const HOVER_AMPLITUDE: f32 = 0.2;
const HOVER_RATE: f32 = 2.0;
/// Spin rate (radians/s)
const SPIN_RATE: f32 = 2.0;

/// A collectible power-up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub position: Vec3,
    pub kind: PowerUpKind,
    pub radius: f32,
    /// Presentation spin angle
    pub spin: f32,
    active: bool,
    base_y: f32,
    hover_time: f32,
}

impl PowerUp {
    pub fn new(kind: PowerUpKind, position: Vec3, radius: f32) -> Self {
        Self {
            position,
            kind,
            radius,
            spin: 0.0,
            active: true,
            base_y: position.y,
            hover_time: 0.0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Deactivate; returns `true` only on the first call
    pub fn collect(&mut self) -> bool {
        std::mem::replace(&mut self.active, false)
    }

    pub fn update(&mut self, dt: f32) {
        self.spin = (self.spin + SPIN_RATE * dt).rem_euclid(TAU);
        self.hover_time += dt;
        self.position.y = self.base_y + (self.hover_time * HOVER_RATE).sin() * HOVER_AMPLITUDE;
    }
}

/// Particle colour categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleColor {
    Collect(PowerUpKind),
    Combo,
    Deflect,
}

/// A short-lived visual particle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    pub color: ParticleColor,
    /// Seconds left
    pub life: f32,
    pub max_life: f32,
    pub size: f32,
}

impl Particle {
    /// Ballistic step under `gravity`
    pub fn update(&mut self, dt: f32, gravity: f32) {
        self.velocity.y -= gravity * dt;
        self.position += self.velocity * dt;
        self.life -= dt;
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    /// Remaining life in `[0, 1]`
    pub fn fade(&self) -> f32 {
        if self.max_life > 0.0 {
            (self.life / self.max_life).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}
