//! Game tuning configuration
//!
//! One immutable value built at startup and borrowed by every component
//! constructor. Defaults are the shipped arcade tuning; any field may be
//! overridden from JSON.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::entities::PowerUpKind;
use crate::sim::patterns::{PatternKind, Weighted};

/// Player body movement tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Sphere radius (also the resting height above the ground plane)
    pub radius: f32,
    /// Constant forward speed along the travel axis (units/s)
    pub forward_speed: f32,
    /// Lateral target speed while a direction is held
    pub max_side_speed: f32,
    /// Rate at which lateral velocity approaches its target (1/s)
    pub side_accel: f32,
    /// Lateral speed removed per second when no direction is held
    pub side_drag: f32,
    /// Downward acceleration while airborne
    pub gravity: f32,
    /// Vertical velocity set by a jump
    pub jump_impulse: f32,
    /// Half-width of the lane, measured to the lane wall
    pub lane_half_width: f32,
    /// Fraction of lateral speed kept (and reversed) on wall contact
    pub wall_bounce: f32,
    /// Forward speed multiplier while speed boost is active
    pub speed_boost_multiplier: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            radius: 0.5,
            forward_speed: 20.0,
            max_side_speed: 15.0,
            side_accel: 50.0,
            side_drag: 8.0,
            gravity: 35.0,
            jump_impulse: 12.0,
            lane_half_width: 4.5,
            wall_bounce: 0.5,
            speed_boost_multiplier: 1.5,
        }
    }
}

impl PlayerConfig {
    /// Furthest lateral offset the sphere centre may reach
    pub fn lateral_limit(&self) -> f32 {
        self.lane_half_width - self.radius
    }

    /// Reject values that would break the body physics
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("player.radius", self.radius)?;
        positive("player.forward_speed", self.forward_speed)?;
        positive("player.max_side_speed", self.max_side_speed)?;
        positive("player.side_accel", self.side_accel)?;
        non_negative("player.side_drag", self.side_drag)?;
        positive("player.gravity", self.gravity)?;
        positive("player.jump_impulse", self.jump_impulse)?;
        positive("player.speed_boost_multiplier", self.speed_boost_multiplier)?;
        in_range("player.wall_bounce", self.wall_bounce, 0.0, 1.0)?;
        if self.lateral_limit() <= 0.0 {
            return Err(ConfigError::Inverted {
                low_field: "player.radius",
                low: self.radius,
                high_field: "player.lane_half_width",
                high: self.lane_half_width,
            });
        }
        Ok(())
    }
}

/// Procedural track generation tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackConfig {
    /// Length of one road slab
    pub segment_length: f32,
    /// How far ahead of the player road segments exist
    pub visual_look_ahead: f32,
    /// How far ahead of the player obstacles and power-ups exist
    pub content_look_ahead: f32,
    /// Retention distances behind the player, per entity class
    pub segment_retention: f32,
    pub obstacle_retention: f32,
    pub power_up_retention: f32,
    /// Travel-axis offset of the first wave from the start line
    pub first_wave_offset: f32,
    /// Spacing between patterns inside one wave
    pub pattern_spacing: f32,
    /// Gap range after a wave at difficulty 1.0
    pub min_gap: f32,
    pub max_gap: f32,
    /// Gaps never shrink below this
    pub min_spacing_floor: f32,
    /// Patterns per wave is `1 + (difficulty - 1) * patterns_per_difficulty`, capped
    pub patterns_per_difficulty: f32,
    pub max_patterns_per_wave: u32,
    /// Difficulty grows linearly with distance up to `max_difficulty`
    pub difficulty_per_unit: f32,
    pub max_difficulty: f32,
    /// Score multiplier grows linearly with distance up to `max_score_multiplier`
    pub score_multiplier_per_unit: f32,
    pub max_score_multiplier: f32,
    /// Chance that a wave carries a power-up
    pub power_up_chance: f32,
    /// Height power-ups hover around
    pub power_up_height: f32,
    pub pattern_weights: Vec<Weighted<PatternKind>>,
    pub power_up_weights: Vec<Weighted<PowerUpKind>>,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            segment_length: 10.0,
            visual_look_ahead: 200.0,
            content_look_ahead: 100.0,
            segment_retention: 60.0,
            obstacle_retention: 50.0,
            power_up_retention: 30.0,
            first_wave_offset: 40.0,
            pattern_spacing: 15.0,
            min_gap: 30.0,
            max_gap: 50.0,
            min_spacing_floor: 18.0,
            patterns_per_difficulty: 1.0,
            max_patterns_per_wave: 3,
            difficulty_per_unit: 0.002,
            max_difficulty: 4.0,
            score_multiplier_per_unit: 0.001,
            max_score_multiplier: 5.0,
            power_up_chance: 0.6,
            power_up_height: 1.0,
            pattern_weights: vec![
                Weighted::new(PatternKind::Slalom, 30.0),
                Weighted::new(PatternKind::Gate, 25.0),
                Weighted::new(PatternKind::Passage, 20.0),
                Weighted::new(PatternKind::JumpBar, 15.0),
                Weighted::new(PatternKind::Spinner, 10.0),
            ],
            power_up_weights: vec![
                Weighted::new(PowerUpKind::SpeedBoost, 40.0),
                Weighted::new(PowerUpKind::Points, 25.0),
                Weighted::new(PowerUpKind::Shield, 20.0),
                Weighted::new(PowerUpKind::Magnet, 15.0),
            ],
        }
    }
}

impl TrackConfig {
    /// Reject inverted ranges, empty weight tables and bad distances
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("track.segment_length", self.segment_length)?;
        positive("track.visual_look_ahead", self.visual_look_ahead)?;
        positive("track.content_look_ahead", self.content_look_ahead)?;
        if self.content_look_ahead >= self.visual_look_ahead {
            return Err(ConfigError::Inverted {
                low_field: "track.content_look_ahead",
                low: self.content_look_ahead,
                high_field: "track.visual_look_ahead",
                high: self.visual_look_ahead,
            });
        }
        non_negative("track.segment_retention", self.segment_retention)?;
        non_negative("track.obstacle_retention", self.obstacle_retention)?;
        non_negative("track.power_up_retention", self.power_up_retention)?;
        non_negative("track.first_wave_offset", self.first_wave_offset)?;
        positive("track.pattern_spacing", self.pattern_spacing)?;
        positive("track.min_spacing_floor", self.min_spacing_floor)?;
        positive("track.min_gap", self.min_gap)?;
        if self.min_gap >= self.max_gap {
            return Err(ConfigError::Inverted {
                low_field: "track.min_gap",
                low: self.min_gap,
                high_field: "track.max_gap",
                high: self.max_gap,
            });
        }
        non_negative("track.patterns_per_difficulty", self.patterns_per_difficulty)?;
        if self.max_patterns_per_wave == 0 {
            return Err(ConfigError::NoPatternsPerWave);
        }
        non_negative("track.difficulty_per_unit", self.difficulty_per_unit)?;
        non_negative("track.score_multiplier_per_unit", self.score_multiplier_per_unit)?;
        if self.max_difficulty < 1.0 {
            return Err(ConfigError::OutOfRange {
                field: "track.max_difficulty",
                value: self.max_difficulty,
                min: 1.0,
                max: f32::INFINITY,
            });
        }
        if self.max_score_multiplier < 1.0 {
            return Err(ConfigError::OutOfRange {
                field: "track.max_score_multiplier",
                value: self.max_score_multiplier,
                min: 1.0,
                max: f32::INFINITY,
            });
        }
        in_range("track.power_up_chance", self.power_up_chance, 0.0, 1.0 + f32::EPSILON)?;
        // Preset obstacles come from layouts; the builder makes none for it
        if self
            .pattern_weights
            .iter()
            .any(|w| w.item == PatternKind::Preset && w.weight > 0.0)
        {
            return Err(ConfigError::PresetPatternWeighted);
        }
        weights("pattern", &self.pattern_weights)?;
        weights("power-up", &self.power_up_weights)?;
        Ok(())
    }
}

/// Power-up effects and pickup geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpConfig {
    pub radius: f32,
    pub pickup_radius: f32,
    pub magnet_radius: f32,
    pub speed_boost_secs: f32,
    pub shield_secs: f32,
    pub magnet_secs: f32,
    pub points_bonus: u64,
}

impl Default for PowerUpConfig {
    fn default() -> Self {
        Self {
            radius: 0.5,
            pickup_radius: 1.0,
            magnet_radius: 3.0,
            speed_boost_secs: 5.0,
            shield_secs: 10.0,
            magnet_secs: 8.0,
            points_bonus: 1000,
        }
    }
}

impl PowerUpConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("power_ups.radius", self.radius)?;
        positive("power_ups.pickup_radius", self.pickup_radius)?;
        if self.magnet_radius < self.pickup_radius {
            return Err(ConfigError::Inverted {
                low_field: "power_ups.pickup_radius",
                low: self.pickup_radius,
                high_field: "power_ups.magnet_radius",
                high: self.magnet_radius,
            });
        }
        positive("power_ups.speed_boost_secs", self.speed_boost_secs)?;
        positive("power_ups.shield_secs", self.shield_secs)?;
        positive("power_ups.magnet_secs", self.magnet_secs)?;
        Ok(())
    }
}

/// Combo multiplier tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComboConfig {
    /// Seconds a combo survives without another pickup
    pub reset_time: f32,
    /// Multiplier gained per pickup in the chain
    pub step: f32,
    /// Multiplier ceiling
    pub cap: f32,
    /// A milestone burst fires every this many pickups in a chain
    pub milestone_every: u32,
}

impl Default for ComboConfig {
    fn default() -> Self {
        Self {
            reset_time: 3.0,
            step: 0.5,
            cap: 5.0,
            milestone_every: 5,
        }
    }
}

impl ComboConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("combo.reset_time", self.reset_time)?;
        non_negative("combo.step", self.step)?;
        if self.cap < 1.0 {
            return Err(ConfigError::OutOfRange {
                field: "combo.cap",
                value: self.cap,
                min: 1.0,
                max: f32::INFINITY,
            });
        }
        Ok(())
    }
}

/// Preset-level flow
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    /// Intermission between preset levels
    pub level_intermission_secs: f32,
    /// How long an achievement notification stays visible
    pub achievement_display_secs: f32,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            level_intermission_secs: 2.0,
            achievement_display_secs: 3.0,
        }
    }
}

impl ProgressionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("progression.level_intermission_secs", self.level_intermission_secs)?;
        non_negative("progression.achievement_display_secs", self.achievement_display_secs)
    }
}

/// Complete simulation configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub player: PlayerConfig,
    pub track: TrackConfig,
    pub power_ups: PowerUpConfig,
    pub combo: ComboConfig,
    pub progression: ProgressionConfig,
}

impl GameConfig {
    /// Check every section; the first violation wins
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.player.validate()?;
        self.track.validate()?;
        self.power_ups.validate()?;
        self.combo.validate()?;
        self.progression.validate()
    }

    /// Parse and validate a JSON config. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Pretty JSON of every field
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Json(e.to_string()))
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { field })
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

fn in_range(field: &'static str, value: f32, min: f32, max: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value >= min && value < max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

fn weights<T>(table: &'static str, entries: &[Weighted<T>]) -> Result<(), ConfigError> {
    for entry in entries {
        non_negative("weight", entry.weight)?;
    }
    let total: f32 = entries.iter().map(|w| w.weight).sum();
    if total > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::EmptyWeights { table })
    }
}
