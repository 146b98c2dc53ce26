/*
 * Headless Flocking Simulation Runner
 *
 * Command-line driver for the simulation core: spawn a flock, run a fixed
 * number of ticks, and report a summary. All the interesting behavior
 * lives in the library; this binary only wires up configuration, logging
 * and the tick loop.
 */

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use flock3d::{spawn_flock, Config, Simulator, SpatialWorld, UpdateMode};

#[derive(Parser)]
#[command(name = "flock3d", about = "Headless prey/predator flocking simulation")]
struct Cli {
    /// Number of prey agents
    #[arg(long, default_value = "200")]
    prey: usize,

    /// Number of predators
    #[arg(long, default_value = "3")]
    predators: usize,

    /// Number of ticks to simulate
    #[arg(long, default_value = "1000")]
    ticks: u64,

    /// Fixed timestep in seconds
    #[arg(long, default_value = "0.016")]
    dt: f32,

    /// RNG seed for reproducible runs
    #[arg(long, default_value = "42")]
    seed: u64,

    /// YAML file overriding the built-in default config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Use order-dependent sequential updates instead of snapshot semantics
    #[arg(long)]
    sequential: bool,

    /// Use the uniform spatial grid for neighbor queries
    #[arg(long)]
    grid: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    let config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config file {}", path.display()))?;
            serde_yaml::from_str(&text)
                .with_context(|| format!("parsing config file {}", path.display()))?
        }
        None => Config::default(),
    };

    let mut simulator = Simulator::new(config, cli.seed)?;
    if cli.sequential {
        simulator = simulator.with_mode(UpdateMode::Sequential);
    }
    if cli.grid {
        simulator = simulator.with_spatial_grid();
    }

    let mut world = SpatialWorld::new();
    let mut rng = StdRng::seed_from_u64(cli.seed);
    spawn_flock(&mut world, &config, cli.prey, cli.predators, &mut rng);

    for _ in 0..cli.ticks {
        simulator.tick(&mut world, cli.dt);
    }

    let average_speed = world
        .agents()
        .iter()
        .map(|agent| agent.velocity.length())
        .sum::<f32>()
        / world.len().max(1) as f32;

    println!(
        "ticks={} agents={} average_speed={average_speed:.3}",
        simulator.ticks(),
        world.len()
    );
    if let Some(agent) = world.agents().first() {
        println!(
            "agent {}: position=({:.2}, {:.2}, {:.2}) heading=({:.2}, {:.2}, {:.2})",
            agent.id.0,
            agent.position.x,
            agent.position.y,
            agent.position.z,
            agent.heading.x,
            agent.heading.y,
            agent.heading.z,
        );
    }

    Ok(())
}
