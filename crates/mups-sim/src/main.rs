mod autopilot;
mod pacer;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use mups_core::Simulation;
use mups_core::time::tick_duration;
use mups_engine::Game;
use mups_engine::config::EngineConfig;
use mups_engine::physics::ControllerEvent;
use mups_engine::session::GameEvent;

use autopilot::Autopilot;
use pacer::FramePacer;

/// Run M.U.P.S missions headlessly with a scripted pilot.
#[derive(Debug, Parser)]
#[command(name = "mups-sim", version)]
struct Args {
    /// Session seed; contracts and dimensions derive from it.
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Stop after this many finished missions.
    #[arg(long, default_value_t = 3)]
    missions: u32,

    /// Hard cap on simulated ticks.
    #[arg(long, default_value_t = 60 * 60 * 10)]
    max_ticks: u64,

    /// Pace ticks to wall-clock time instead of running flat out.
    #[arg(long)]
    realtime: bool,

    /// Print every generated dimension as JSON.
    #[arg(long)]
    dump_layout: bool,

    /// Config file; defaults to MUPS_CONFIG or config/mups.toml.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Default, Serialize)]
struct RunSummary {
    ticks: u64,
    dimensions: u32,
    successes: u32,
    failures: u32,
    lives_lost: u32,
    beacons: u32,
    credits: u64,
    level: u32,
}

impl RunSummary {
    fn finished(&self) -> u32 {
        self.successes + self.failures
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => EngineConfig::from_path(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => EngineConfig::load(),
    };

    let mut game = Game::new(config, args.seed);
    let dt = tick_duration(game.tick_rate());
    let mut pacer = args.realtime.then(|| FramePacer::new(game.tick_rate()));
    let mut pilot = Autopilot::default();
    let mut summary = RunSummary::default();

    tracing::info!(seed = args.seed, missions = args.missions, "Starting run");

    'run: while summary.ticks < args.max_ticks && summary.finished() < args.missions {
        let due = pacer.as_mut().map_or(1, FramePacer::wait);
        for _ in 0..due {
            let input = pilot.next_input(&game);
            let events = game.update(dt, &input);
            summary.ticks += 1;
            for event in events {
                match event {
                    GameEvent::DimensionBuilt { .. } => {
                        summary.dimensions += 1;
                        if args.dump_layout
                            && let Some(layout) = game.level()
                        {
                            let json = serde_json::to_string_pretty(layout)
                                .context("serializing layout")?;
                            println!("{json}");
                        }
                    },
                    GameEvent::MissionSucceeded { beacons, .. } => {
                        summary.successes += 1;
                        summary.beacons += beacons;
                    },
                    GameEvent::MissionFailed { .. } => summary.failures += 1,
                    GameEvent::Player(ControllerEvent::LifeLost { .. }) => summary.lives_lost += 1,
                    _ => {},
                }
            }
            if summary.finished() >= args.missions || summary.ticks >= args.max_ticks {
                break 'run;
            }
        }
    }

    if summary.finished() < args.missions {
        tracing::warn!(
            ticks = summary.ticks,
            finished = summary.finished(),
            "Tick limit reached before all missions finished"
        );
    }

    let ledger = game.progression();
    summary.credits = ledger.credits;
    summary.level = ledger.level;
    tracing::info!(
        successes = summary.successes,
        failures = summary.failures,
        credits = summary.credits,
        "Run complete"
    );
    println!(
        "{}",
        serde_json::to_string_pretty(&summary).context("serializing summary")?
    );
    Ok(())
}
