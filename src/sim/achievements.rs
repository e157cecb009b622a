//! One-shot achievements
//!
//! A fixed table of predicates over the run's counters. Each achievement
//! unlocks at most once per run and stays on screen for a fixed time.

use serde::{Deserialize, Serialize};

/// Every achievement a run can unlock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AchievementId {
    SpeedDemon,
    ComboMaster,
    DistanceRunner,
    PowerCollector,
    ChainMaster,
}

impl AchievementId {
    pub const ALL: [AchievementId; 5] = [
        AchievementId::SpeedDemon,
        AchievementId::ComboMaster,
        AchievementId::DistanceRunner,
        AchievementId::PowerCollector,
        AchievementId::ChainMaster,
    ];

    /// Short name shown in the notification
    pub fn title(&self) -> &'static str {
        match self {
            AchievementId::SpeedDemon => "Speed Demon",
            AchievementId::ComboMaster => "Combo Master",
            AchievementId::DistanceRunner => "Distance Runner",
            AchievementId::PowerCollector => "Power Collector",
            AchievementId::ChainMaster => "Chain Master",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AchievementId::SpeedDemon => "Collect 3 speed boosts in a row",
            AchievementId::ComboMaster => "Reach a 3x combo",
            AchievementId::DistanceRunner => "Travel 1000 units",
            AchievementId::PowerCollector => "Collect 20 power-ups",
            AchievementId::ChainMaster => "Chain 5 power-ups in one combo",
        }
    }

    fn reached(&self, stats: &RunStats) -> bool {
        match self {
            AchievementId::SpeedDemon => stats.speed_boost_streak >= 3,
            AchievementId::ComboMaster => stats.combo_multiplier >= 3.0,
            AchievementId::DistanceRunner => stats.distance >= 1000.0,
            AchievementId::PowerCollector => stats.total_power_ups >= 20,
            AchievementId::ChainMaster => stats.consecutive_power_ups >= 5,
        }
    }
}

/// Counters the predicates look at
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunStats {
    pub distance: f32,
    pub combo_multiplier: f32,
    pub speed_boost_streak: u32,
    pub total_power_ups: u32,
    pub consecutive_power_ups: u32,
}

/// An unlocked achievement still being shown
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: AchievementId,
    /// Seconds left on screen
    pub remaining: f32,
}

/// Unlocked achievements and the notifications still on screen
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Achievements {
    unlocked: Vec<AchievementId>,
    visible: Vec<Notification>,
}

impl Achievements {
    /// Nothing unlocked yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `id` was unlocked this run
    pub fn is_unlocked(&self, id: AchievementId) -> bool {
        self.unlocked.contains(&id)
    }

    /// Unlocked so far, in unlock order
    pub fn unlocked(&self) -> &[AchievementId] {
        &self.unlocked
    }

    /// Notifications still on screen
    pub fn visible(&self) -> &[Notification] {
        &self.visible
    }

    /// Count display timers down and drop expired notifications
    pub fn tick(&mut self, dt: f32) {
        for notification in &mut self.visible {
            notification.remaining -= dt;
        }
        self.visible.retain(|n| n.remaining > 0.0);
    }

    /// Unlock everything newly satisfied by `stats`; returns what unlocked
    pub fn check(&mut self, stats: &RunStats, display_secs: f32) -> Vec<AchievementId> {
        let mut fresh = Vec::new();
        for id in AchievementId::ALL {
            if self.is_unlocked(id) || !id.reached(stats) {
                continue;
            }
            log::info!("Achievement unlocked: {}", id.title());
            self.unlocked.push(id);
            self.visible.push(Notification {
                id,
                remaining: display_secs,
            });
            fresh.push(id);
        }
        fresh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlocks_once() {
        let mut achievements = Achievements::new();
        let stats = RunStats {
            distance: 1200.0,
            ..Default::default()
        };
        assert_eq!(achievements.check(&stats, 3.0), vec![AchievementId::DistanceRunner]);
        assert!(achievements.check(&stats, 3.0).is_empty());
        assert_eq!(achievements.unlocked().len(), 1);
    }

    #[test]
    fn test_display_countdown_is_independent() {
        let mut achievements = Achievements::new();
        achievements.check(
            &RunStats {
                speed_boost_streak: 3,
                ..Default::default()
            },
            3.0,
        );
        achievements.tick(2.0);
        achievements.check(
            &RunStats {
                speed_boost_streak: 3,
                total_power_ups: 20,
                ..Default::default()
            },
            3.0,
        );
        assert_eq!(achievements.visible().len(), 2);
        achievements.tick(1.5);
        assert_eq!(achievements.visible().len(), 1);
        assert_eq!(achievements.visible()[0].id, AchievementId::PowerCollector);
        assert!(achievements.is_unlocked(AchievementId::SpeedDemon));
    }

    #[test]
    fn test_thresholds() {
        let mut achievements = Achievements::new();
        let below = RunStats {
            distance: 999.0,
            combo_multiplier: 2.5,
            speed_boost_streak: 2,
            total_power_ups: 19,
            consecutive_power_ups: 4,
        };
        assert!(achievements.check(&below, 3.0).is_empty());
        let at = RunStats {
            distance: 1000.0,
            combo_multiplier: 3.0,
            speed_boost_streak: 3,
            total_power_ups: 20,
            consecutive_power_ups: 5,
        };
        assert_eq!(achievements.check(&at, 3.0).len(), AchievementId::ALL.len());
    }
}
