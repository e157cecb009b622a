//! Combo multiplier
//!
//! Rapid consecutive pickups grow a scoring multiplier that collapses back to
//! 1.0 once `reset_time` passes without another pickup.

use serde::{Deserialize, Serialize};

use crate::config::ComboConfig;

/// Current pickup chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combo {
    config: ComboConfig,
    count: u32,
    multiplier: f32,
    timer: f32,
}

impl Combo {
    /// Empty chain at multiplier 1.0
    pub fn new(config: &ComboConfig) -> Self {
        Self {
            config: *config,
            count: 0,
            multiplier: 1.0,
            timer: 0.0,
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn multiplier(&self) -> f32 {
        self.multiplier
    }

    /// Seconds left before the chain expires
    pub fn timer(&self) -> f32 {
        self.timer
    }

    /// Extend the chain; returns `true` when this pickup hits a milestone
    pub fn register_pickup(&mut self) -> bool {
        self.timer = self.config.reset_time;
        self.count += 1;
        self.multiplier = (1.0 + self.count as f32 * self.config.step).min(self.config.cap);
        self.config.milestone_every > 0 && self.count % self.config.milestone_every == 0
    }

    /// Count the timer down; returns `true` on the tick the chain expires
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.timer <= 0.0 {
            return false;
        }
        self.timer -= dt;
        if self.timer <= 0.0 {
            self.reset();
            return true;
        }
        false
    }

    /// Drop the chain back to multiplier 1.0
    pub fn reset(&mut self) {
        self.count = 0;
        self.multiplier = 1.0;
        self.timer = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn combo() -> Combo {
        Combo::new(&ComboConfig {
            reset_time: 3.0,
            step: 0.5,
            cap: 3.0,
            milestone_every: 5,
        })
    }

    #[test]
    fn test_multiplier_grows_and_caps() {
        let mut combo = combo();
        combo.register_pickup();
        assert_eq!(combo.multiplier(), 1.5);
        combo.register_pickup();
        assert_eq!(combo.multiplier(), 2.0);
        for _ in 0..10 {
            combo.register_pickup();
        }
        assert_eq!(combo.multiplier(), 3.0);
        assert_eq!(combo.count(), 12);
    }

    #[test]
    fn test_decays_exactly_at_timeout() {
        let mut combo = combo();
        combo.register_pickup();
        combo.register_pickup();
        // 3.0s in 0.5s ticks: alive for five ticks, gone on the sixth
        for _ in 0..5 {
            assert!(!combo.tick(0.5));
            assert_eq!(combo.count(), 2);
            assert_eq!(combo.multiplier(), 2.0);
        }
        assert!(combo.tick(0.5));
        assert_eq!(combo.count(), 0);
        assert_eq!(combo.multiplier(), 1.0);
        assert_eq!(combo.timer(), 0.0);
    }

    #[test]
    fn test_pickup_refreshes_timer() {
        let mut combo = combo();
        combo.register_pickup();
        combo.tick(2.5);
        combo.register_pickup();
        assert_eq!(combo.timer(), 3.0);
        assert!(!combo.tick(2.5));
        assert_eq!(combo.count(), 2);
    }

    #[test]
    fn test_idle_tick_is_noop() {
        let mut combo = combo();
        assert!(!combo.tick(1.0));
        assert_eq!(combo.multiplier(), 1.0);
        assert_eq!(combo.timer(), 0.0);
    }

    #[test]
    fn test_milestones() {
        let mut combo = combo();
        let milestones: Vec<bool> = (0..10).map(|_| combo.register_pickup()).collect();
        assert_eq!(milestones.iter().filter(|&&m| m).count(), 2);
        assert!(milestones[4] && milestones[9]);
    }
}
