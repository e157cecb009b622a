//! Preset level layouts
//!
//! Static obstacle and power-up placements with a target score. The two
//! built-in layouts are the tutorial and the moving-gate level; custom lists
//! can be loaded from JSON.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::LevelError;
use crate::sim::entities::{Obstacle, PowerUp, PowerUpKind};
use crate::sim::patterns::PatternKind;

/// How a preset obstacle moves
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MotionSpec {
    #[default]
    Static,
    Oscillating { range: f32, speed: f32 },
    Spinning { radius: f32, speed: f32 },
}

/// A preset obstacle: box placement plus its motion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSpec {
    pub position: Vec3,
    pub size: Vec3,
    #[serde(default)]
    pub motion: MotionSpec,
}

impl ObstacleSpec {
    /// Box that never moves
    pub fn fixed(position: Vec3, size: Vec3) -> Self {
        Self {
            position,
            size,
            motion: MotionSpec::Static,
        }
    }

    /// Box sliding side to side by `range` around `position.x`
    pub fn oscillating(position: Vec3, size: Vec3, range: f32, speed: f32) -> Self {
        Self {
            position,
            size,
            motion: MotionSpec::Oscillating { range, speed },
        }
    }

    /// Live obstacle at its starting pose
    pub fn build(&self) -> Obstacle {
        match self.motion {
            MotionSpec::Static => Obstacle::fixed(self.position, self.size, PatternKind::Preset),
            MotionSpec::Oscillating { range, speed } => {
                Obstacle::oscillating(self.position, self.size, range, speed, PatternKind::Preset)
            }
            MotionSpec::Spinning { radius, speed } => Obstacle::spinning(
                self.position,
                self.size,
                radius,
                speed,
                0.0,
                PatternKind::Preset,
            ),
        }
    }
}

/// A preset power-up placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUpSpec {
    pub position: Vec3,
    pub kind: PowerUpKind,
}

/// One preset level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelLayout {
    pub name: String,
    /// Score that completes the level
    pub target_score: u64,
    pub obstacles: Vec<ObstacleSpec>,
    #[serde(default)]
    pub power_ups: Vec<PowerUpSpec>,
}

impl LevelLayout {
    /// Live obstacles for a fresh track
    pub fn obstacles(&self) -> Vec<Obstacle> {
        self.obstacles.iter().map(ObstacleSpec::build).collect()
    }

    /// Live power-ups for a fresh track, all with `radius`
    pub fn power_ups(&self, radius: f32) -> Vec<PowerUp> {
        self.power_ups
            .iter()
            .map(|p| PowerUp::new(p.kind, p.position, radius))
            .collect()
    }
}

/// Check a list of layouts before it is used to drive a run
pub fn validate_levels(levels: &[LevelLayout]) -> Result<(), LevelError> {
    if levels.is_empty() {
        return Err(LevelError::NoLevels);
    }
    for (level, layout) in levels.iter().enumerate() {
        if layout.target_score == 0 {
            return Err(LevelError::ZeroTarget { level });
        }
        for (index, obstacle) in layout.obstacles.iter().enumerate() {
            if !(obstacle.size.min_element() > 0.0) || !obstacle.size.is_finite() {
                return Err(LevelError::BadObstacleSize { level, index });
            }
            if let MotionSpec::Spinning { radius, .. } = obstacle.motion {
                if !(radius > 0.0) {
                    return Err(LevelError::BadSpinRadius { level, index });
                }
            }
        }
    }
    Ok(())
}

/// Parse and validate a JSON array of layouts
pub fn levels_from_json(json: &str) -> Result<Vec<LevelLayout>, LevelError> {
    let levels: Vec<LevelLayout> =
        serde_json::from_str(json).map_err(|e| LevelError::Json(e.to_string()))?;
    validate_levels(&levels)?;
    Ok(levels)
}

/// The built-in campaign
///
/// Side obstacles sit close enough to the centre that every one of them
/// reaches into the 4.5 unit lane.
pub fn default_levels() -> Vec<LevelLayout> {
    let tutorial = LevelLayout {
        name: "Tutorial".to_string(),
        target_score: 100,
        obstacles: vec![
            // Slalom
            ObstacleSpec::fixed(Vec3::new(-3.0, 1.0, 20.0), Vec3::new(3.0, 2.0, 2.0)),
            ObstacleSpec::fixed(Vec3::new(3.0, 1.0, 40.0), Vec3::new(3.0, 2.0, 2.0)),
            ObstacleSpec::fixed(Vec3::new(-3.0, 1.0, 60.0), Vec3::new(3.0, 2.0, 2.0)),
            ObstacleSpec::oscillating(Vec3::new(0.0, 1.0, 80.0), Vec3::new(4.0, 2.0, 2.0), 4.0, 2.0),
        ],
        power_ups: vec![
            PowerUpSpec {
                position: Vec3::new(3.0, 1.0, 30.0),
                kind: PowerUpKind::SpeedBoost,
            },
            PowerUpSpec {
                position: Vec3::new(-3.0, 1.0, 50.0),
                kind: PowerUpKind::SpeedBoost,
            },
            PowerUpSpec {
                position: Vec3::new(0.0, 1.0, 70.0),
                kind: PowerUpKind::SpeedBoost,
            },
        ],
    };

    let gates = LevelLayout {
        name: "Moving Gates".to_string(),
        target_score: 200,
        obstacles: vec![
            ObstacleSpec::oscillating(Vec3::new(-2.0, 1.0, 20.0), Vec3::new(3.0, 3.0, 2.0), 3.0, 3.0),
            ObstacleSpec::oscillating(Vec3::new(2.0, 1.0, 40.0), Vec3::new(3.0, 3.0, 2.0), 3.0, 2.0),
            // Narrow passage
            ObstacleSpec::fixed(Vec3::new(-4.0, 1.0, 60.0), Vec3::new(2.0, 4.0, 2.0)),
            ObstacleSpec::fixed(Vec3::new(4.0, 1.0, 60.0), Vec3::new(2.0, 4.0, 2.0)),
            ObstacleSpec::oscillating(Vec3::new(0.0, 1.0, 80.0), Vec3::new(6.0, 2.0, 2.0), 5.0, 4.0),
        ],
        power_ups: vec![
            PowerUpSpec {
                position: Vec3::new(-3.0, 1.0, 30.0),
                kind: PowerUpKind::SpeedBoost,
            },
            PowerUpSpec {
                position: Vec3::new(3.0, 1.0, 50.0),
                kind: PowerUpKind::SpeedBoost,
            },
            PowerUpSpec {
                position: Vec3::new(0.0, 1.0, 70.0),
                kind: PowerUpKind::SpeedBoost,
            },
        ],
    };

    vec![tutorial, gates]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entities::ObstacleKind;

    #[test]
    fn test_default_levels_are_valid() {
        let levels = default_levels();
        assert_eq!(levels.len(), 2);
        assert_eq!(validate_levels(&levels), Ok(()));
        assert!(levels[0].target_score < levels[1].target_score);
    }

    #[test]
    fn test_default_obstacles_reach_into_lane() {
        let half_width = crate::config::PlayerConfig::default().lane_half_width;
        for layout in default_levels() {
            for obstacle in &layout.obstacles {
                let inner = obstacle.position.x.abs() - obstacle.size.x * 0.5;
                assert!(inner < half_width, "{} has an obstacle outside the lane", layout.name);
            }
        }
    }

    #[test]
    fn test_build_preserves_motion() {
        let obstacles = default_levels()[0].obstacles();
        assert_eq!(obstacles.len(), 4);
        assert!(matches!(obstacles[0].kind(), ObstacleKind::Static));
        assert!(matches!(obstacles[3].kind(), ObstacleKind::Oscillating { .. }));
        assert!(obstacles.iter().all(|o| o.pattern == PatternKind::Preset));
    }

    #[test]
    fn test_empty_list_rejected() {
        assert_eq!(validate_levels(&[]), Err(LevelError::NoLevels));
    }

    #[test]
    fn test_json_layout() {
        let json = r#"[{
            "name": "custom",
            "target_score": 50,
            "obstacles": [
                { "position": [0.0, 1.0, 30.0], "size": [2.0, 2.0, 2.0] },
                { "position": [0.0, 1.0, 60.0], "size": [1.0, 1.0, 1.0],
                  "motion": { "type": "spinning", "radius": 2.0, "speed": 1.5 } }
            ]
        }]"#;
        let levels = levels_from_json(json).unwrap();
        assert_eq!(levels[0].obstacles[0].motion, MotionSpec::Static);
        assert!(levels[0].power_ups.is_empty());
        let built = levels[0].obstacles();
        assert!(matches!(built[1].kind(), ObstacleKind::Spinning { .. }));
    }

    #[test]
    fn test_json_bad_size_rejected() {
        let json = r#"[{
            "name": "broken",
            "target_score": 50,
            "obstacles": [{ "position": [0.0, 1.0, 30.0], "size": [0.0, 2.0, 2.0] }]
        }]"#;
        assert_eq!(
            levels_from_json(json),
            Err(LevelError::BadObstacleSize { level: 0, index: 0 })
        );
    }
}
