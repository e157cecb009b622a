//! Game state and run lifecycle
//!
//! `GameState` owns the player, the single active track and the progression
//! manager. It decides what a run is (endless or a preset campaign) and
//! rebuilds everything on restart and between levels.

use serde::{Deserialize, Serialize};

use super::achievements::Notification;
use super::entities::{Obstacle, Particle, PowerUp};
use super::player::Player;
use super::progression::{GameEvent, LevelTarget, Progression};
use super::track::Track;
use crate::config::GameConfig;
use crate::error::{ConfigError, SetupError};
use crate::highscores::Leaderboard;
use crate::levels::{LevelLayout, validate_levels};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Between-level rest period
    LevelComplete {
        /// Seconds until the next layout loads
        remaining: f32,
    },
    /// Run ended; waits for a restart
    GameOver,
}

/// Odd constant spreading run counters across the seed space
const RUN_SEED_STEP: u64 = 0x9e37_79b9_7f4a_7c15;

/// Everything one game session needs between ticks
#[derive(Debug, Clone)]
pub struct GameState {
    config: GameConfig,
    /// Base seed; each run derives its own from this and `run`
    pub seed: u64,
    /// Runs started so far, minus one
    pub run: u32,
    pub phase: GamePhase,
    pub player: Player,
    pub track: Track,
    pub progression: Progression,
    /// Preset campaign; empty for endless play
    levels: Vec<LevelLayout>,
    pub current_level: usize,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl GameState {
    /// Endless run
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, Vec::new(), seed))
    }

    /// Campaign over preset layouts, played in order
    pub fn with_levels(config: GameConfig, levels: Vec<LevelLayout>, seed: u64) -> Result<Self, SetupError> {
        config.validate()?;
        validate_levels(&levels)?;
        Ok(Self::build(config, levels, seed))
    }

    fn build(config: GameConfig, levels: Vec<LevelLayout>, seed: u64) -> Self {
        let player = Player::spawn(&config.player);
        let track = match levels.first() {
            Some(layout) => Track::preset(&config, layout, seed),
            None => Track::endless(&config, seed),
        };
        let progression = Progression::new(&config);
        let mut state = Self {
            config,
            seed,
            run: 0,
            phase: GamePhase::Playing,
            player,
            track,
            progression,
            levels,
            current_level: 0,
            time_ticks: 0,
        };
        let target = state.level_target();
        state.progression.begin_run(seed, target);
        log::info!("Run started (seed {seed})");
        state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Whether preset layouts drive this session
    pub fn is_campaign(&self) -> bool {
        !self.levels.is_empty()
    }

    pub fn levels(&self) -> &[LevelLayout] {
        &self.levels
    }

    /// Seed of the run in progress
    pub fn run_seed(&self) -> u64 {
        self.seed
            .wrapping_add(u64::from(self.run).wrapping_mul(RUN_SEED_STEP))
    }

    pub fn high_score(&self) -> u64 {
        self.progression.high_score()
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        self.progression.leaderboard()
    }

    /// Events raised during the last tick
    pub fn events(&self) -> &[GameEvent] {
        self.progression.events()
    }

    fn level_target(&self) -> Option<LevelTarget> {
        let layout = self.levels.get(self.current_level)?;
        Some(LevelTarget {
            index: self.current_level,
            target_score: layout.target_score,
            has_next: self.current_level + 1 < self.levels.len(),
        })
    }

    fn fresh_track(&self) -> Track {
        let seed = self.run_seed();
        match self.levels.get(self.current_level) {
            Some(layout) => Track::preset(&self.config, layout, seed),
            None => Track::endless(&self.config, seed),
        }
    }

    /// Start a new run from the first level with the next derived seed
    pub fn restart(&mut self) {
        self.run += 1;
        self.current_level = 0;
        self.player = Player::spawn(&self.config.player);
        self.track = self.fresh_track();
        self.phase = GamePhase::Playing;
        let seed = self.run_seed();
        let target = self.level_target();
        self.progression.begin_run(seed, target);
        log::info!("Run {} started (seed {seed})", self.run + 1);
    }

    /// Load the layout after the current one
    ///
    /// The run continues: the player goes back to the start line with its
    /// score and distance intact, and level targets count run totals.
    pub(crate) fn next_level(&mut self) {
        self.current_level += 1;
        let Some(target) = self.level_target() else {
            log::warn!("No layout after level {}", self.current_level);
            self.phase = GamePhase::GameOver;
            return;
        };
        self.player.enter_next_level();
        self.track = self.fresh_track();
        self.progression.begin_level(target);
        self.phase = GamePhase::Playing;
        log::info!(
            "Level {} ({}) started, target {}",
            target.index + 1,
            self.levels[target.index].name,
            target.target_score
        );
    }

    /// Read-only view for renderers and HUDs
    pub fn snapshot(&self) -> Snapshot<'_> {
        let combo = self.track.combo();
        Snapshot {
            phase: self.phase,
            player: &self.player,
            distance: self.player.distance(),
            segments: &self.track.segments,
            segment_length: self.track.segment_length(),
            lane_half_width: self.track.lane_half_width(),
            obstacles: &self.track.obstacles,
            power_ups: &self.track.power_ups,
            particles: &self.track.particles,
            combo_count: combo.count(),
            combo_multiplier: combo.multiplier(),
            score_multiplier: self.track.score_multiplier(),
            difficulty: self.track.difficulty(),
            high_score: self.high_score(),
            level: self.level_target(),
            notifications: self.progression.achievements().visible(),
        }
    }
}

/// Everything an external renderer or HUD reads after a tick
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub player: &'a Player,
    pub distance: f32,
    pub segments: &'a [f32],
    pub segment_length: f32,
    pub lane_half_width: f32,
    pub obstacles: &'a [Obstacle],
    pub power_ups: &'a [PowerUp],
    pub particles: &'a [Particle],
    pub combo_count: u32,
    pub combo_multiplier: f32,
    pub score_multiplier: f32,
    pub difficulty: f32,
    pub high_score: u64,
    pub level: Option<LevelTarget>,
    pub notifications: &'a [Notification],
}
