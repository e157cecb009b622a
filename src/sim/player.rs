//! Player body physics
//!
//! The sphere runs forward at a constant speed, steers with smoothed lateral
//! acceleration, jumps off a flat ground plane and bounces off the lane walls.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::entities::PowerUpKind;
use super::geometry::decay_toward_zero;
use super::tick::TickInput;
use crate::config::{PlayerConfig, PowerUpConfig};
use crate::error::ConfigError;

/// Independent countdowns for timed modifiers; `Some` means active
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ModifierTimers {
    pub speed_boost: Option<f32>,
    pub shield: Option<f32>,
    pub magnet: Option<f32>,
}

impl ModifierTimers {
    pub fn has_speed_boost(&self) -> bool {
        self.speed_boost.is_some()
    }

    pub fn has_shield(&self) -> bool {
        self.shield.is_some()
    }

    pub fn has_magnet(&self) -> bool {
        self.magnet.is_some()
    }

    /// Count every modifier down; returns `true` if speed boost ran out
    pub fn tick(&mut self, dt: f32) -> bool {
        countdown(&mut self.shield, dt);
        countdown(&mut self.magnet, dt);
        countdown(&mut self.speed_boost, dt)
    }
}

fn countdown(slot: &mut Option<f32>, dt: f32) -> bool {
    if let Some(remaining) = slot {
        *remaining -= dt;
        if *remaining <= 0.0 {
            *slot = None;
            return true;
        }
    }
    false
}

/// The player-controlled sphere
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    config: PlayerConfig,
    /// Sphere center
    pub position: Vec3,
    /// Units per second; `z` is always the forward speed
    pub velocity: Vec3,
    /// Collision radius, also the resting height above the ground
    pub radius: f32,
    grounded: bool,
    /// Run total: banked levels, current distance score and bonuses
    pub score: u64,
    /// Flat bonuses from points pickups
    pub bonus_score: u64,
    pub modifiers: ModifierTimers,
    /// Speed boosts collected while a boost was running
    pub speed_boost_streak: u32,
    /// Pickups in the current combo chain
    pub consecutive_power_ups: u32,
    pub total_power_ups: u32,
    start_z: f32,
    /// Distance score banked from cleared preset levels
    carried_score: u64,
    /// Distance covered on cleared preset levels
    carried_distance: f32,
}

impl Player {
    /// Validate `config` and place a fresh body at the start line
    pub fn new(config: &PlayerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::spawn(config))
    }

    /// Fresh body at the start line; `config` must already be valid
    pub(crate) fn spawn(config: &PlayerConfig) -> Self {
        Self {
            config: *config,
            position: Vec3::new(0.0, config.radius, 0.0),
            velocity: Vec3::ZERO,
            radius: config.radius,
            grounded: true,
            score: 0,
            bonus_score: 0,
            modifiers: ModifierTimers::default(),
            speed_boost_streak: 0,
            consecutive_power_ups: 0,
            total_power_ups: 0,
            start_z: 0.0,
            carried_score: 0,
            carried_distance: 0.0,
        }
    }

    /// Put the body back on the start line of the next preset layout
    ///
    /// Score, distance, pickup counters and running modifiers carry over.
    pub(crate) fn enter_next_level(&mut self) {
        self.carried_score = self.score.saturating_sub(self.bonus_score);
        self.carried_distance += self.level_distance();
        self.position = Vec3::new(0.0, self.radius, self.start_z);
        self.velocity = Vec3::ZERO;
        self.grounded = true;
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Distance covered along the travel axis over the whole run
    pub fn distance(&self) -> f32 {
        self.carried_distance + self.level_distance()
    }

    /// Distance covered since the current start line
    pub fn level_distance(&self) -> f32 {
        (self.position.z - self.start_z).max(0.0)
    }

    /// Advance the body by `dt` seconds
    pub fn integrate(&mut self, dt: f32, input: &TickInput) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        let cfg = self.config;

        if self.modifiers.tick(dt) {
            self.speed_boost_streak = 0;
        }

        let boost = if self.modifiers.has_speed_boost() {
            cfg.speed_boost_multiplier
        } else {
            1.0
        };
        self.velocity.z = cfg.forward_speed * boost;

        // Lateral steering
        let target = match (input.move_left, input.move_right) {
            (true, false) => -cfg.max_side_speed,
            (false, true) => cfg.max_side_speed,
            _ => 0.0,
        };
        let blend = (cfg.side_accel * dt).min(1.0);
        self.velocity.x += (target - self.velocity.x) * blend;
        if target == 0.0 {
            self.velocity.x = decay_toward_zero(self.velocity.x, cfg.side_drag * dt);
        }

        if input.jump && self.grounded {
            self.velocity.y = cfg.jump_impulse;
            self.grounded = false;
        }

        // Constant gravity integrates exactly
        if !self.grounded {
            self.position.y += self.velocity.y * dt - 0.5 * cfg.gravity * dt * dt;
            self.velocity.y -= cfg.gravity * dt;
        }
        self.position.x += self.velocity.x * dt;
        self.position.z += self.velocity.z * dt;

        if self.position.y <= self.radius {
            self.position.y = self.radius;
            self.velocity.y = 0.0;
            self.grounded = true;
        } else {
            self.grounded = false;
        }

        let limit = cfg.lateral_limit();
        if self.position.x > limit {
            self.position.x = limit;
            if self.velocity.x > 0.0 {
                self.velocity.x = -self.velocity.x * cfg.wall_bounce;
            }
        } else if self.position.x < -limit {
            self.position.x = -limit;
            if self.velocity.x < 0.0 {
                self.velocity.x = -self.velocity.x * cfg.wall_bounce;
            }
        }
    }

    /// Apply a collected power-up's effect
    pub fn apply_power_up(&mut self, kind: PowerUpKind, effects: &PowerUpConfig) {
        self.total_power_ups += 1;
        self.consecutive_power_ups += 1;
        match kind {
            PowerUpKind::SpeedBoost => {
                self.modifiers.speed_boost = Some(effects.speed_boost_secs);
                self.speed_boost_streak += 1;
            }
            PowerUpKind::Shield => self.modifiers.shield = Some(effects.shield_secs),
            PowerUpKind::Points => self.bonus_score += effects.points_bonus,
            PowerUpKind::Magnet => self.modifiers.magnet = Some(effects.magnet_secs),
        }
    }

    /// Spend the shield; returns `false` if there was none
    pub fn consume_shield(&mut self) -> bool {
        self.modifiers.shield.take().is_some()
    }

    /// Recompute the score from distance and the current multipliers
    pub fn refresh_score(&mut self, score_multiplier: f32, combo_multiplier: f32) {
        let distance_score = (self.level_distance() * score_multiplier * combo_multiplier).floor();
        self.score = self.carried_score + distance_score as u64 + self.bonus_score;
    }
}
