//! Sphere Runner - simulation core for an endless-runner arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player physics, track generation, collisions, scoring)
//! - `config`: Data-driven game tuning
//! - `levels`: Preset level layouts
//! - `highscores`: In-memory run leaderboard
//! - `presentation`: Instance records for an external renderer

pub mod config;
pub mod error;
pub mod highscores;
pub mod levels;
pub mod presentation;
pub mod sim;

pub use config::GameConfig;
pub use error::{ConfigError, LevelError, SetupError};
pub use highscores::Leaderboard;
pub use levels::LevelLayout;

/// Simulation constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the stepper will account for (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Downward acceleration on particles (units/s²)
    pub const PARTICLE_GRAVITY: f32 = 9.8;
    /// Live particle cap; the oldest are evicted first
    pub const MAX_PARTICLES: usize = 256;
}
