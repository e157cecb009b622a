//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied `dt` only, no clocks
//! - Seeded RNG only
//! - Fixed update order: player, track, progression
//! - No rendering or platform dependencies

pub mod achievements;
pub mod collision;
pub mod combo;
pub mod entities;
pub mod geometry;
pub mod patterns;
pub mod player;
pub mod progression;
pub mod state;
pub mod tick;
pub mod track;

pub use achievements::{AchievementId, Achievements, Notification};
pub use collision::{obstacle_contact, power_up_contact};
pub use combo::Combo;
pub use entities::{Obstacle, ObstacleKind, Particle, ParticleColor, PowerUp, PowerUpKind};
pub use patterns::PatternKind;
pub use player::{ModifierTimers, Player};
pub use progression::{GameEvent, LevelTarget, Progression, Transition};
pub use state::{GamePhase, GameState, Snapshot};
pub use tick::{Stepper, TickInput, tick};
pub use track::{ContentSource, Track};
