//! Sphere Runner headless driver
//!
//! Plays seeded runs on autopilot at the fixed simulation rate and prints a
//! summary. Useful for tuning configs and level layouts without a renderer.

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use sphere_runner::GameConfig;
use sphere_runner::consts::SIM_DT;
use sphere_runner::levels::{default_levels, levels_from_json};
use sphere_runner::sim::{GameEvent, GamePhase, GameState, TickInput, tick};

#[derive(Parser, Debug)]
#[command(name = "sphere-runner")]
#[command(about = "Headless autopilot runs of the sphere runner simulation")]
struct Cli {
    /// Base seed; restarts derive their own from it
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Simulation ticks to run at most (120 per second)
    #[arg(long = "ticks", default_value_t = 120 * 60 * 5)]
    max_ticks: u64,
    /// Runs to play before stopping
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    runs: u32,
    /// JSON tuning file; missing fields keep their defaults
    #[arg(long = "config")]
    config_path: Option<PathBuf>,
    /// JSON list of level layouts to play as a campaign
    #[arg(long = "levels", conflicts_with = "campaign")]
    levels_path: Option<PathBuf>,
    /// Play the built-in campaign instead of the endless track
    #[arg(long)]
    campaign: bool,
    /// Print the effective config as JSON and exit
    #[arg(long)]
    dump_config: bool,
}

fn load_config(path: Option<&PathBuf>) -> Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let json = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    GameConfig::from_json(&json).with_context(|| format!("loading config {}", path.display()))
}

fn build_state(cli: &Cli, config: GameConfig) -> Result<GameState> {
    if let Some(path) = &cli.levels_path {
        let json = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let levels = levels_from_json(&json).with_context(|| format!("loading levels {}", path.display()))?;
        return Ok(GameState::with_levels(config, levels, cli.seed)?);
    }
    if cli.campaign {
        return Ok(GameState::with_levels(config, default_levels(), cli.seed)?);
    }
    Ok(GameState::new(config, cli.seed)?)
}

fn main() -> Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();
    let cli = Cli::parse();

    let config = load_config(cli.config_path.as_ref())?;
    if cli.dump_config {
        println!("{}", config.to_json()?);
        return Ok(());
    }

    let mut state = build_state(&cli, config)?;
    log::info!("Sphere Runner (headless) starting: {cli:?}");

    let pilot = TickInput {
        autopilot: true,
        ..Default::default()
    };
    let restart = TickInput {
        restart: true,
        ..pilot.clone()
    };

    let mut finished = 0;
    let mut pickups = 0u32;
    let mut deflections = 0u32;
    let mut achievements = Vec::new();

    while state.time_ticks < cli.max_ticks {
        let input = if state.phase == GamePhase::GameOver {
            finished += 1;
            if finished >= cli.runs {
                break;
            }
            &restart
        } else {
            &pilot
        };
        tick(&mut state, input, SIM_DT);

        for event in state.events() {
            match event {
                GameEvent::PowerUpCollected { .. } => pickups += 1,
                GameEvent::ShieldDeflected { .. } => deflections += 1,
                GameEvent::AchievementUnlocked(id) => achievements.push(id.title()),
                _ => {}
            }
        }
    }

    let snapshot = state.snapshot();
    println!("Simulated {:.1}s over {} run(s)", state.time_ticks as f32 * SIM_DT, state.run + 1);
    println!(
        "Last run: {} points, {:.0} units, difficulty {:.2}, phase {:?}",
        snapshot.player.score, snapshot.distance, snapshot.difficulty, snapshot.phase
    );
    println!("Power-ups collected: {pickups}, shield deflections: {deflections}");
    if !achievements.is_empty() {
        println!("Achievements: {}", achievements.join(", "));
    }
    println!("Leaderboard:");
    for (rank, entry) in state.leaderboard().entries().iter().enumerate() {
        let level = entry
            .level
            .map_or_else(|| "endless".to_string(), |l| format!("level {}", l + 1));
        println!(
            "  #{:<2} {:>8} pts  {:>7.0} units  {level}  seed {}",
            rank + 1,
            entry.score,
            entry.distance,
            entry.seed
        );
    }

    Ok(())
}
