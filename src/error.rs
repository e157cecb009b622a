//! Construction-time errors
//!
//! The simulation itself has no failure surface: every tick completes. What
//! can go wrong is building it from bad numbers, and that is rejected here
//! before any state exists.

use thiserror::Error;

/// Invalid tuning values in a [`crate::config::GameConfig`]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be positive (got {value})")]
    NonPositive { field: &'static str, value: f32 },

    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f32 },

    #[error("{field} must be finite")]
    NotFinite { field: &'static str },

    #[error("{field} must lie in [{min}, {max}) (got {value})")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("{table} weight table is empty or sums to zero")]
    EmptyWeights { table: &'static str },

    #[error("{low_field} ({low}) must be below {high_field} ({high})")]
    Inverted {
        low_field: &'static str,
        low: f32,
        high_field: &'static str,
        high: f32,
    },

    #[error("pattern weight table gives weight to the preset pattern, which builds nothing")]
    PresetPatternWeighted,

    #[error("max_patterns_per_wave must be at least 1")]
    NoPatternsPerWave,

    #[error("invalid config JSON: {0}")]
    Json(String),
}

/// Invalid preset level data
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LevelError {
    #[error("level list is empty")]
    NoLevels,

    #[error("level {level}: target score must be positive")]
    ZeroTarget { level: usize },

    #[error("level {level}: obstacle {index} has a non-positive size")]
    BadObstacleSize { level: usize, index: usize },

    #[error("level {level}: spinner {index} needs a positive orbit radius")]
    BadSpinRadius { level: usize, index: usize },

    #[error("invalid level JSON: {0}")]
    Json(String),
}

/// Anything that stops a [`crate::sim::GameState`] from being built
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Level(#[from] LevelError),
}
