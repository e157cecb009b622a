//! Simulation tick
//!
//! One tick runs the player body, then the track, then progression, always
//! in that order and always with the same `dt`.

use super::entities::{Obstacle, ObstacleKind};
use super::progression::Transition;
use super::state::{GamePhase, GameState};
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

/// Input commands for a single tick
///
/// `jump` and `restart` are presses, not held state: the driver sets them on
/// the tick the key goes down.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Steer left (held)
    pub move_left: bool,
    /// Steer right (held)
    pub move_right: bool,
    /// Jump press
    pub jump: bool,
    /// Restart press, honoured after game over
    pub restart: bool,
    /// Let the built-in autopilot steer and jump
    pub autopilot: bool,
}

/// Advance the game state by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if !dt.is_finite() || dt <= 0.0 {
        return;
    }
    state.progression.clear_events();

    match state.phase {
        GamePhase::GameOver => {
            if input.restart {
                state.restart();
            }
            return;
        }
        GamePhase::LevelComplete { remaining } => {
            let remaining = remaining - dt;
            if remaining <= 0.0 {
                state.next_level();
            } else {
                state.phase = GamePhase::LevelComplete { remaining };
            }
            return;
        }
        GamePhase::Playing => {}
    }

    let input = if input.autopilot {
        autopilot(state)
    } else {
        input.clone()
    };

    state.time_ticks += 1;
    state.player.integrate(dt, &input);
    state.track.advance(dt, state.player.position);

    match state
        .progression
        .resolve(dt, &mut state.player, &mut state.track)
    {
        Some(Transition::GameOver) | Some(Transition::ContentExhausted) => {
            state.phase = GamePhase::GameOver;
        }
        Some(Transition::LevelComplete) => {
            state.phase = GamePhase::LevelComplete {
                remaining: state.config().progression.level_intermission_secs,
            };
        }
        None => {}
    }
}

/// How far ahead the autopilot looks for obstacles
const AUTOPILOT_LOOK_AHEAD: f32 = 14.0;
/// Obstacles at most this tall are jumped rather than avoided
const JUMPABLE_HEIGHT: f32 = 1.0;
/// Extra lateral clearance the autopilot keeps
const AUTOPILOT_MARGIN: f32 = 0.6;

/// Pick steering and jumps for the current state
///
/// Scans a fixed set of lateral positions, heads for the nearest one no
/// obstacle ahead will block, and jumps low bars.
fn autopilot(state: &GameState) -> TickInput {
    let player = &state.player;
    let p = player.position;
    let r = player.radius;
    let limit = state.config().player.lateral_limit();

    let ahead: Vec<&Obstacle> = state
        .track
        .obstacles
        .iter()
        .filter(|o| {
            let dz = o.anchor_z() - p.z;
            dz > -(o.size.z * 0.5 + r) && dz < AUTOPILOT_LOOK_AHEAD
        })
        .collect();

    let blocks = |o: &Obstacle, x: f32| -> bool {
        match *o.kind() {
            ObstacleKind::Spinning { center, radius, .. } => {
                (x - center.x).abs() < radius + o.size.x * 0.5 + r + AUTOPILOT_MARGIN
            }
            _ if o.size.y <= JUMPABLE_HEIGHT => false,
            _ => (x - o.position.x).abs() < o.size.x * 0.5 + r + AUTOPILOT_MARGIN,
        }
    };

    const LANES: usize = 17;
    let target = (0..LANES)
        .map(|i| -limit + 2.0 * limit * i as f32 / (LANES - 1) as f32)
        .filter(|&x| !ahead.iter().any(|o| blocks(o, x)))
        .min_by(|a, b| (a - p.x).abs().total_cmp(&(b - p.x).abs()))
        .unwrap_or(p.x);

    let jump = player.is_grounded()
        && ahead.iter().any(|o| {
            let dz = o.anchor_z() - p.z;
            o.kind().is_box() && o.size.y <= JUMPABLE_HEIGHT && dz > 1.0 && dz < 5.0
        });

    TickInput {
        move_left: target < p.x - 0.25,
        move_right: target > p.x + 0.25,
        jump,
        ..Default::default()
    }
}

/// Fixed-timestep accumulator for drivers with variable frame times
///
/// Runs whole `SIM_DT` ticks, at most `MAX_SUBSTEPS` per frame. Presses that
/// arrive on a frame too short to tick are held until the next tick runs.
#[derive(Debug, Clone, Default)]
pub struct Stepper {
    accumulator: f32,
    pending_jump: bool,
    pending_restart: bool,
}

impl Stepper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one frame's elapsed time; returns the number of ticks run
    pub fn advance(&mut self, state: &mut GameState, input: &TickInput, frame_dt: f32) -> u32 {
        self.pending_jump |= input.jump;
        self.pending_restart |= input.restart;
        if !frame_dt.is_finite() || frame_dt <= 0.0 {
            return 0;
        }
        self.accumulator += frame_dt.min(MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let step_input = TickInput {
                jump: self.pending_jump,
                restart: self.pending_restart,
                ..input.clone()
            };
            tick(state, &step_input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.pending_jump = false;
            self.pending_restart = false;
        }
        if substeps == MAX_SUBSTEPS {
            // Drop the backlog instead of spiralling
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        substeps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::levels::default_levels;
    use crate::sim::patterns::PatternKind;
    use glam::Vec3;

    fn endless(seed: u64) -> GameState {
        GameState::new(GameConfig::default(), seed).unwrap()
    }

    #[test]
    fn test_tick_moves_player_and_track() {
        let mut state = endless(1);
        let frontier = state.track.segment_frontier();
        for _ in 0..120 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert_eq!(state.time_ticks, 120);
        assert!((state.player.position.z - 20.0).abs() < 1e-3);
        assert!(state.track.segment_frontier() > frontier);
        assert_eq!(state.player.score, 20);
    }

    #[test]
    fn test_invalid_dt_is_noop() {
        let mut state = endless(1);
        let before = state.player.position;
        tick(&mut state, &TickInput::default(), 0.0);
        tick(&mut state, &TickInput::default(), -1.0);
        tick(&mut state, &TickInput::default(), f32::INFINITY);
        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.player.position, before);
    }

    #[test]
    fn test_hit_ends_run_until_restart() {
        let mut state = endless(3);
        state.track.obstacles.push(Obstacle::fixed(
            Vec3::new(0.0, 1.0, 0.5),
            Vec3::splat(2.0),
            PatternKind::Slalom,
        ));
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::GameOver);
        // Nothing scored yet, so nothing recorded
        assert!(state.leaderboard().is_empty());

        // Frozen until restart
        let ticks = state.time_ticks;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.time_ticks, ticks);

        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &restart, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.run, 1);
        assert!(state.track.obstacles.iter().all(|o| o.anchor_z() > 1.0));
    }

    #[test]
    fn test_level_complete_intermission() {
        let mut state = GameState::with_levels(GameConfig::default(), default_levels(), 4).unwrap();
        state.player.position.z = 99.9;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::LevelComplete { remaining: 2.0 });

        tick(&mut state, &TickInput::default(), 1.0);
        assert_eq!(state.phase, GamePhase::LevelComplete { remaining: 1.0 });
        assert_eq!(state.current_level, 0);

        tick(&mut state, &TickInput::default(), 1.0);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.current_level, 1);
        assert_eq!(state.player.level_distance(), 0.0);
        assert!(state.player.distance() > 99.9);
        assert!(state.player.score >= 100);
    }

    #[test]
    fn test_campaign_score_carries_across_levels() {
        let mut state = GameState::with_levels(GameConfig::default(), default_levels(), 4).unwrap();
        state.player.position.z = 109.9;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(matches!(state.phase, GamePhase::LevelComplete { .. }));
        let cleared = state.player.score;
        assert!(cleared >= 110);

        tick(&mut state, &TickInput::default(), 2.0);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.current_level, 1);

        // Run into a wall right off the start line of the second layout
        state.track.obstacles.push(Obstacle::fixed(
            state.player.position + Vec3::new(0.0, 0.5, 0.2),
            Vec3::splat(2.0),
            PatternKind::Preset,
        ));
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.player.score >= cleared);

        let best = &state.leaderboard().entries()[0];
        assert_eq!(best.score, state.player.score);
        assert_eq!(best.level, Some(1));
        assert!(best.distance > 110.0);
        assert_eq!(state.high_score(), state.player.score);
    }

    #[test]
    fn test_final_level_ends_run() {
        let levels = vec![default_levels().remove(0)];
        let mut state = GameState::with_levels(GameConfig::default(), levels, 4).unwrap();
        state.player.position.z = 99.9;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.leaderboard().entries()[0].level, Some(0));
    }

    #[test]
    fn test_determinism() {
        let mut a = endless(99_999);
        let mut b = endless(99_999);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..1200 {
            tick(&mut a, &input, SIM_DT);
            tick(&mut b, &input, SIM_DT);
        }
        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.player.position, b.player.position);
        assert_eq!(a.player.score, b.player.score);
        assert_eq!(a.track.obstacles, b.track.obstacles);
    }

    #[test]
    fn test_stepper_caps_substeps() {
        let mut state = endless(5);
        let mut stepper = Stepper::new();
        assert_eq!(stepper.advance(&mut state, &TickInput::default(), 1.0), MAX_SUBSTEPS);
        assert_eq!(state.time_ticks, MAX_SUBSTEPS as u64);
        assert_eq!(stepper.advance(&mut state, &TickInput::default(), f32::NAN), 0);
    }

    #[test]
    fn test_stepper_accumulates_short_frames() {
        let mut state = endless(5);
        let mut stepper = Stepper::new();
        let half = SIM_DT / 2.0;
        assert_eq!(stepper.advance(&mut state, &TickInput::default(), half), 0);
        assert_eq!(stepper.advance(&mut state, &TickInput::default(), half), 1);
    }

    #[test]
    fn test_stepper_holds_press_until_tick() {
        let mut state = endless(5);
        let mut stepper = Stepper::new();
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        assert_eq!(stepper.advance(&mut state, &jump, SIM_DT / 4.0), 0);
        assert!(state.player.is_grounded());
        stepper.advance(&mut state, &TickInput::default(), SIM_DT);
        assert!(!state.player.is_grounded());
    }
}
