//! Procedural track generator
//!
//! Keeps two frontiers ahead of the player on the travel axis: road segments
//! (visual) and obstacle waves (content). Everything far enough behind the
//! player is dropped, so the working set stays bounded however far the run
//! goes.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::combo::Combo;
use super::entities::{Obstacle, Particle, ParticleColor, PowerUp, PowerUpKind};
use super::patterns::sample_weighted;
use crate::config::{GameConfig, TrackConfig};
use crate::consts::{MAX_PARTICLES, PARTICLE_GRAVITY};
use crate::error::ConfigError;
use crate::levels::LevelLayout;

/// Stream id for cosmetic randomness, kept apart from generation
const FX_STREAM: u64 = 0x5eed_f00d;

/// Where obstacles and power-ups come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentSource {
    /// Endless procedural waves
    Procedural,
    /// A fixed preset layout; only road segments are generated
    Preset,
}

/// The active track and everything on it
#[derive(Debug, Clone)]
pub struct Track {
    config: TrackConfig,
    lane_half_width: f32,
    /// Furthest lateral offset a power-up may be placed at
    pickup_lane_limit: f32,
    power_up_radius: f32,
    source: ContentSource,
    rng: Pcg32,
    fx_rng: Pcg32,
    combo: Combo,
    /// Start of each live road slab, ascending
    pub segments: Vec<f32>,
    pub obstacles: Vec<Obstacle>,
    pub power_ups: Vec<PowerUp>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    segment_frontier: f32,
    content_frontier: f32,
    difficulty: f32,
    score_multiplier: f32,
    start_z: f32,
    waves_emitted: u64,
}

impl Track {
    /// Endless procedural track seeded with `seed`
    pub fn new(config: &GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::endless(config, seed))
    }

    /// Track built from a preset layout
    pub fn from_layout(config: &GameConfig, layout: &LevelLayout, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::preset(config, layout, seed))
    }

    pub(crate) fn endless(config: &GameConfig, seed: u64) -> Self {
        let mut track = Self::empty(config, seed, ContentSource::Procedural);
        track.content_frontier = track.start_z + config.track.first_wave_offset;
        track.fill(track.start_z);
        log::info!("Endless track ready (seed {seed})");
        track
    }

    pub(crate) fn preset(config: &GameConfig, layout: &LevelLayout, seed: u64) -> Self {
        let mut track = Self::empty(config, seed, ContentSource::Preset);
        track.obstacles = layout.obstacles();
        track.power_ups = layout.power_ups(config.power_ups.radius);
        track.fill(track.start_z);
        log::info!(
            "Preset track '{}' ready: {} obstacles, {} power-ups",
            layout.name,
            track.obstacles.len(),
            track.power_ups.len()
        );
        track
    }

    fn empty(config: &GameConfig, seed: u64, source: ContentSource) -> Self {
        let track = &config.track;
        let start_z = 0.0;
        // Road already laid behind the start line
        let behind = (track.segment_retention / track.segment_length).ceil() * track.segment_length;
        Self {
            config: track.clone(),
            lane_half_width: config.player.lane_half_width,
            pickup_lane_limit: config.player.lateral_limit(),
            power_up_radius: config.power_ups.radius,
            source,
            rng: Pcg32::seed_from_u64(seed),
            fx_rng: Pcg32::new(seed, FX_STREAM),
            combo: Combo::new(&config.combo),
            segments: Vec::new(),
            obstacles: Vec::new(),
            power_ups: Vec::new(),
            particles: Vec::new(),
            segment_frontier: start_z - behind,
            content_frontier: start_z,
            difficulty: 1.0,
            score_multiplier: 1.0,
            start_z,
            waves_emitted: 0,
        }
    }

    /// Whether content is generated or comes from a preset layout
    pub fn source(&self) -> ContentSource {
        self.source
    }

    /// Next travel-axis coordinate a road segment will start at
    pub fn segment_frontier(&self) -> f32 {
        self.segment_frontier
    }

    /// Next travel-axis coordinate a wave will be anchored at
    pub fn content_frontier(&self) -> f32 {
        self.content_frontier
    }

    /// Difficulty at the player's last known position
    pub fn difficulty(&self) -> f32 {
        self.difficulty
    }

    pub fn score_multiplier(&self) -> f32 {
        self.score_multiplier
    }

    pub fn combo(&self) -> &Combo {
        &self.combo
    }

    /// Procedural waves generated so far
    pub fn waves_emitted(&self) -> u64 {
        self.waves_emitted
    }

    pub fn segment_length(&self) -> f32 {
        self.config.segment_length
    }

    pub fn lane_half_width(&self) -> f32 {
        self.lane_half_width
    }

    /// Difficulty at a given distance from the start line
    pub fn difficulty_at(&self, distance: f32) -> f32 {
        (1.0 + distance.max(0.0) * self.config.difficulty_per_unit).min(self.config.max_difficulty)
    }

    /// Score multiplier at a given distance from the start line
    pub fn score_multiplier_at(&self, distance: f32) -> f32 {
        (1.0 + distance.max(0.0) * self.config.score_multiplier_per_unit)
            .min(self.config.max_score_multiplier)
    }

    /// Patterns a wave may hold at the current difficulty
    pub fn max_patterns(&self) -> u32 {
        let raw = 1.0 + (self.difficulty - 1.0) * self.config.patterns_per_difficulty;
        (raw.floor() as u32).clamp(1, self.config.max_patterns_per_wave)
    }

    /// Gap range after a wave at the current difficulty
    pub fn gap_bounds(&self) -> (f32, f32) {
        let floor = self.config.min_spacing_floor;
        let min = (self.config.min_gap / self.difficulty).max(floor);
        let max = (self.config.max_gap / self.difficulty).max(min);
        (min, max)
    }

    /// Advance the track by `dt` seconds for a player at `player_position`
    pub fn advance(&mut self, dt: f32, player_position: Vec3) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        let player_z = player_position.z;
        let distance = (player_z - self.start_z).max(0.0);
        self.difficulty = self.difficulty_at(distance);
        self.score_multiplier = self.score_multiplier_at(distance);

        if self.combo.tick(dt) {
            log::debug!("Combo expired");
        }

        for obstacle in &mut self.obstacles {
            obstacle.update(dt);
        }
        for power_up in &mut self.power_ups {
            power_up.update(dt);
        }
        for particle in &mut self.particles {
            particle.update(dt, PARTICLE_GRAVITY);
        }
        self.particles.retain(Particle::is_alive);

        self.fill(player_z);
        self.retire(player_z);
    }

    /// Push both frontiers past their look-ahead distances
    fn fill(&mut self, player_z: f32) {
        while self.segment_frontier < player_z + self.config.visual_look_ahead {
            self.segments.push(self.segment_frontier);
            self.segment_frontier += self.config.segment_length;
        }

        if self.source == ContentSource::Procedural {
            while self.content_frontier < player_z + self.config.content_look_ahead {
                self.emit_wave();
            }
        }
    }

    /// One batch of patterns, then maybe a power-up in the following gap
    fn emit_wave(&mut self) {
        let anchor = self.content_frontier;
        let spacing = self.config.pattern_spacing;
        let max_patterns = self.max_patterns();
        let count = self.rng.random_range(1..=max_patterns);

        let before = self.obstacles.len();
        for i in 0..count {
            let Some(pattern) = sample_weighted(&self.config.pattern_weights, &mut self.rng) else {
                break;
            };
            pattern.build(
                anchor + i as f32 * spacing,
                self.lane_half_width,
                &mut self.rng,
                &mut self.obstacles,
            );
        }
        let span = (count - 1) as f32 * spacing;

        let (min_gap, max_gap) = self.gap_bounds();
        let gap = if max_gap > min_gap {
            self.rng.random_range(min_gap..max_gap)
        } else {
            min_gap
        };

        if self.rng.random::<f32>() < self.config.power_up_chance {
            if let Some(kind) = sample_weighted(&self.config.power_up_weights, &mut self.rng) {
                let limit = self.pickup_lane_limit;
                let x = self.rng.random_range(-limit..=limit);
                let position = Vec3::new(x, self.config.power_up_height, anchor + span + gap * 0.5);
                self.power_ups.push(PowerUp::new(kind, position, self.power_up_radius));
            }
        }

        self.content_frontier = anchor + span + gap;
        self.waves_emitted += 1;
        log::debug!(
            "Wave {} at z={anchor:.1}: {} obstacles, next at {:.1} (difficulty {:.2})",
            self.waves_emitted,
            self.obstacles.len() - before,
            self.content_frontier,
            self.difficulty
        );
    }

    /// Drop content that fell behind the player
    fn retire(&mut self, player_z: f32) {
        let before = (self.segments.len(), self.obstacles.len(), self.power_ups.len());

        let segment_cut = player_z - self.config.segment_retention;
        let length = self.config.segment_length;
        self.segments.retain(|&z| z + length >= segment_cut);

        let obstacle_cut = player_z - self.config.obstacle_retention;
        self.obstacles.retain(|o| o.anchor_z() >= obstacle_cut);

        let power_up_cut = player_z - self.config.power_up_retention;
        self.power_ups
            .retain(|p| p.is_active() && p.position.z >= power_up_cut);

        log::trace!(
            "Retired {} segments, {} obstacles, {} power-ups",
            before.0 - self.segments.len(),
            before.1 - self.obstacles.len(),
            before.2 - self.power_ups.len()
        );
    }

    /// Drop collected power-ups right away
    pub fn purge_collected(&mut self) {
        self.power_ups.retain(PowerUp::is_active);
    }

    /// Feed a pickup into the combo chain and spray particles
    ///
    /// Returns `true` when the pickup lands on a combo milestone.
    pub fn register_pickup(&mut self, at: Vec3, kind: PowerUpKind) -> bool {
        self.burst(at, ParticleColor::Collect(kind), 16);
        let milestone = self.combo.register_pickup();
        if milestone {
            self.burst(at, ParticleColor::Combo, 32);
        }
        milestone
    }

    /// Particles for an obstacle hit absorbed by a shield
    pub fn deflect_burst(&mut self, at: Vec3) {
        self.burst(at, ParticleColor::Deflect, 24);
    }

    fn burst(&mut self, at: Vec3, color: ParticleColor, count: usize) {
        for _ in 0..count {
            let velocity = Vec3::new(
                self.fx_rng.random_range(-3.0..3.0),
                self.fx_rng.random_range(2.0..6.0),
                self.fx_rng.random_range(-3.0..3.0),
            );
            let life = self.fx_rng.random_range(0.4..0.9);
            self.particles.push(Particle {
                position: at,
                velocity,
                color,
                life,
                max_life: life,
                size: self.fx_rng.random_range(0.08..0.2),
            });
        }
        // Oldest particles make room
        if self.particles.len() > MAX_PARTICLES {
            let overflow = self.particles.len() - MAX_PARTICLES;
            self.particles.drain(..overflow);
        }
    }
}
