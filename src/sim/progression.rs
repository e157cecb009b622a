//! Collision resolution, scoring and run transitions
//!
//! Runs last in every tick, after the player and the track have moved. It
//! turns contacts into consequences: shield hits, game over, pickups, combo
//! bookkeeping, achievements and preset level completion.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::achievements::{AchievementId, Achievements, RunStats};
use super::collision::{first_obstacle_contact, power_up_contact};
use super::entities::PowerUpKind;
use super::player::Player;
use super::track::Track;
use crate::config::{GameConfig, PowerUpConfig, ProgressionConfig};
use crate::highscores::{Leaderboard, RunRecord};

/// Outcome of a tick that ends the current stretch of play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    /// Unshielded obstacle hit
    GameOver,
    /// Preset level target reached and another layout follows
    LevelComplete,
    /// Preset level target reached on the final layout
    ContentExhausted,
}

/// Something that happened during a tick, for audio and visual hooks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RunStarted { seed: u64, level: Option<usize> },
    PowerUpCollected { kind: PowerUpKind, position: Vec3 },
    ComboMilestone { count: u32 },
    ComboExpired,
    ShieldDeflected { position: Vec3 },
    AchievementUnlocked(AchievementId),
    NewHighScore { score: u64 },
    LevelComplete { level: usize },
    GameOver { score: u64, distance: f32 },
}

/// The preset level being played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelTarget {
    pub index: usize,
    pub target_score: u64,
    /// Whether another layout follows this one
    pub has_next: bool,
}

/// Per-run bookkeeping that outlives individual ticks
///
/// Owns achievements, the leaderboard and the current level target, and
/// collects the events each tick raises.
#[derive(Debug, Clone)]
pub struct Progression {
    power_ups: PowerUpConfig,
    config: ProgressionConfig,
    achievements: Achievements,
    leaderboard: Leaderboard,
    seed: u64,
    level: Option<LevelTarget>,
    events: Vec<GameEvent>,
}

impl Progression {
    /// Empty leaderboard, no run started yet
    pub fn new(config: &GameConfig) -> Self {
        Self {
            power_ups: config.power_ups,
            config: config.progression,
            achievements: Achievements::new(),
            leaderboard: Leaderboard::new(),
            seed: 0,
            level: None,
            events: Vec::new(),
        }
    }

    /// Reset per-run state; the leaderboard survives
    pub fn begin_run(&mut self, seed: u64, level: Option<LevelTarget>) {
        self.seed = seed;
        self.level = level;
        self.achievements = Achievements::new();
        self.emit(GameEvent::RunStarted {
            seed,
            level: level.map(|l| l.index),
        });
    }

    /// Switch to the next preset layout without resetting the run
    pub fn begin_level(&mut self, level: LevelTarget) {
        self.level = Some(level);
    }

    /// Target of the preset level in play, if any
    pub fn level(&self) -> Option<LevelTarget> {
        self.level
    }

    pub fn achievements(&self) -> &Achievements {
        &self.achievements
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    /// Best recorded score, or 0
    pub fn high_score(&self) -> u64 {
        self.leaderboard.high_score()
    }

    /// Events raised since the last `clear_events`
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Forget the previous tick's events
    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Resolve contacts and scoring for the tick that just moved everything
    pub fn resolve(&mut self, dt: f32, player: &mut Player, track: &mut Track) -> Option<Transition> {
        if !dt.is_finite() || dt <= 0.0 {
            return None;
        }

        // The chain broke in the track's combo tick
        if track.combo().count() == 0 && player.consecutive_power_ups > 0 {
            player.consecutive_power_ups = 0;
            self.emit(GameEvent::ComboExpired);
        }

        // Only the first contact counts, so one shield at most per tick
        if let Some(contact) = first_obstacle_contact(player.position, player.radius, &track.obstacles) {
            if player.consume_shield() {
                log::debug!("Shield absorbed hit at z={:.1}", contact.point.z);
                track.obstacles.remove(contact.index);
                track.deflect_burst(contact.point);
                self.emit(GameEvent::ShieldDeflected {
                    position: contact.point,
                });
            } else {
                player.refresh_score(track.score_multiplier(), track.combo().multiplier());
                self.finish_run(player);
                return Some(Transition::GameOver);
            }
        }

        self.collect_power_ups(player, track);
        player.refresh_score(track.score_multiplier(), track.combo().multiplier());

        self.achievements.tick(dt);
        let stats = RunStats {
            distance: player.distance(),
            combo_multiplier: track.combo().multiplier(),
            speed_boost_streak: player.speed_boost_streak,
            total_power_ups: player.total_power_ups,
            consecutive_power_ups: player.consecutive_power_ups,
        };
        for id in self.achievements.check(&stats, self.config.achievement_display_secs) {
            self.emit(GameEvent::AchievementUnlocked(id));
        }

        let level = self.level?;
        if player.score < level.target_score {
            return None;
        }
        if level.has_next {
            log::info!("Level {} complete with {} points", level.index + 1, player.score);
            self.emit(GameEvent::LevelComplete { level: level.index });
            Some(Transition::LevelComplete)
        } else {
            log::info!("Final level complete with {} points", player.score);
            self.emit(GameEvent::LevelComplete { level: level.index });
            self.finish_run(player);
            Some(Transition::ContentExhausted)
        }
    }

    fn collect_power_ups(&mut self, player: &mut Player, track: &mut Track) {
        let center = player.position;
        let magnet = player.modifiers.has_magnet();
        let (pickup, reach) = (self.power_ups.pickup_radius, self.power_ups.magnet_radius);

        let mut collected = Vec::new();
        for power_up in &mut track.power_ups {
            if power_up_contact(center, power_up, pickup, reach, magnet) && power_up.collect() {
                collected.push((power_up.kind, power_up.position));
            }
        }
        if collected.is_empty() {
            return;
        }

        for (kind, position) in collected {
            player.apply_power_up(kind, &self.power_ups);
            log::debug!("Collected {} ({} total)", kind.as_str(), player.total_power_ups);
            self.emit(GameEvent::PowerUpCollected { kind, position });
            if track.register_pickup(position, kind) {
                self.emit(GameEvent::ComboMilestone {
                    count: track.combo().count(),
                });
            }
        }
        track.purge_collected();
    }

    fn finish_run(&mut self, player: &Player) {
        let previous = self.leaderboard.high_score();
        let score = player.score;
        let distance = player.distance();
        log::info!("Game over: {score} points over {distance:.0} units");

        let rank = self.leaderboard.record(RunRecord {
            score,
            distance,
            level: self.level.map(|l| l.index),
            seed: self.seed,
        });
        if let Some(rank) = rank {
            log::info!("Run placed #{rank} on the leaderboard");
        }
        if score > previous {
            self.emit(GameEvent::NewHighScore { score });
        }
        self.emit(GameEvent::GameOver { score, distance });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entities::{Obstacle, PowerUp};
    use crate::sim::patterns::PatternKind;

    const DT: f32 = 1.0 / 60.0;

    fn setup() -> (Progression, Player, Track) {
        let config = GameConfig::default();
        let progression = Progression::new(&config);
        let player = Player::new(&config.player).unwrap();
        let track = Track::new(&config, 1).unwrap();
        (progression, player, track)
    }

    fn block_at(position: Vec3) -> Obstacle {
        Obstacle::fixed(position, Vec3::splat(2.0), PatternKind::Slalom)
    }

    fn power_up_at(kind: PowerUpKind, position: Vec3) -> PowerUp {
        PowerUp::new(kind, position, 0.5)
    }

    #[test]
    fn test_unshielded_hit_ends_run() {
        let (mut progression, mut player, mut track) = setup();
        player.position.z = 30.0;
        track.obstacles.push(block_at(player.position));

        assert_eq!(progression.resolve(DT, &mut player, &mut track), Some(Transition::GameOver));
        assert_eq!(player.score, 30);
        assert_eq!(progression.high_score(), 30);
        assert!(progression.events().contains(&GameEvent::NewHighScore { score: 30 }));
        assert!(matches!(progression.events().last(), Some(GameEvent::GameOver { score: 30, .. })));
    }

    #[test]
    fn test_shield_absorbs_one_hit() {
        let (mut progression, mut player, mut track) = setup();
        player.modifiers.shield = Some(5.0);
        let n = track.obstacles.len();
        track.obstacles.push(block_at(player.position));

        assert_eq!(progression.resolve(DT, &mut player, &mut track), None);
        assert!(!player.modifiers.has_shield());
        assert_eq!(track.obstacles.len(), n);
        assert!(!track.particles.is_empty());
        assert!(matches!(progression.events()[0], GameEvent::ShieldDeflected { .. }));
    }

    #[test]
    fn test_one_shield_per_tick() {
        let (mut progression, mut player, mut track) = setup();
        player.modifiers.shield = Some(5.0);
        track.obstacles.push(block_at(player.position));
        track.obstacles.push(block_at(player.position + Vec3::new(0.5, 0.0, 0.0)));

        assert_eq!(progression.resolve(DT, &mut player, &mut track), None);
        assert_eq!(progression.resolve(DT, &mut player, &mut track), Some(Transition::GameOver));
    }

    #[test]
    fn test_power_up_collected_once() {
        let (mut progression, mut player, mut track) = setup();
        player.position.z = 10.0;
        let at = player.position + Vec3::new(0.3, 0.0, 0.0);
        track.power_ups.push(power_up_at(PowerUpKind::Points, at));

        progression.resolve(DT, &mut player, &mut track);
        progression.resolve(DT, &mut player, &mut track);

        assert_eq!(player.total_power_ups, 1);
        assert_eq!(player.bonus_score, 1000);
        assert_eq!(player.score, 10 * 3 / 2 + 1000);
        assert_eq!(track.combo().count(), 1);
        assert!(track.power_ups.iter().all(|p| p.position != at));
    }

    #[test]
    fn test_magnet_widens_reach() {
        let (mut progression, mut player, mut track) = setup();
        let at = player.position + Vec3::new(2.0, 0.0, 0.0);
        track.power_ups.push(power_up_at(PowerUpKind::Shield, at));

        progression.resolve(DT, &mut player, &mut track);
        assert_eq!(player.total_power_ups, 0);

        player.modifiers.magnet = Some(5.0);
        progression.resolve(DT, &mut player, &mut track);
        assert_eq!(player.total_power_ups, 1);
        assert!(player.modifiers.has_shield());
    }

    #[test]
    fn test_chain_resets_when_combo_expires() {
        let (mut progression, mut player, mut track) = setup();
        for i in 0..3 {
            let at = player.position + Vec3::new(0.0, 0.0, i as f32 * 0.1);
            track.power_ups.push(power_up_at(PowerUpKind::SpeedBoost, at));
        }
        progression.resolve(DT, &mut player, &mut track);
        assert_eq!(player.consecutive_power_ups, 3);
        assert_eq!(player.speed_boost_streak, 3);

        // Stand still and let the combo run out
        for _ in 0..200 {
            track.advance(DT, player.position);
            progression.clear_events();
            assert_eq!(progression.resolve(DT, &mut player, &mut track), None);
            if progression.events().contains(&GameEvent::ComboExpired) {
                break;
            }
        }
        assert_eq!(track.combo().count(), 0);
        assert_eq!(player.consecutive_power_ups, 0);
        assert_eq!(player.total_power_ups, 3);
    }

    #[test]
    fn test_speed_demon_unlocks() {
        let (mut progression, mut player, mut track) = setup();
        for _ in 0..3 {
            track.power_ups.push(power_up_at(PowerUpKind::SpeedBoost, player.position));
        }
        progression.resolve(DT, &mut player, &mut track);
        assert!(progression.achievements().is_unlocked(AchievementId::SpeedDemon));
        assert!(progression
            .events()
            .contains(&GameEvent::AchievementUnlocked(AchievementId::SpeedDemon)));
    }

    #[test]
    fn test_level_target_transitions() {
        let (mut progression, mut player, mut track) = setup();
        track.obstacles.clear();
        track.power_ups.clear();
        progression.begin_run(
            1,
            Some(LevelTarget {
                index: 0,
                target_score: 100,
                has_next: true,
            }),
        );
        player.position.z = 50.0;
        assert_eq!(progression.resolve(DT, &mut player, &mut track), None);
        player.position.z = 100.0;
        assert_eq!(
            progression.resolve(DT, &mut player, &mut track),
            Some(Transition::LevelComplete)
        );

        progression.begin_level(LevelTarget {
            index: 1,
            target_score: 200,
            has_next: false,
        });
        player.position.z = 200.0;
        assert_eq!(
            progression.resolve(DT, &mut player, &mut track),
            Some(Transition::ContentExhausted)
        );
        assert_eq!(progression.leaderboard().entries()[0].level, Some(1));
    }

    #[test]
    fn test_invalid_dt_is_noop() {
        let (mut progression, mut player, mut track) = setup();
        track.obstacles.push(block_at(player.position));
        assert_eq!(progression.resolve(0.0, &mut player, &mut track), None);
        assert_eq!(progression.resolve(f32::NAN, &mut player, &mut track), None);
        assert!(progression.events().is_empty());
    }
}
