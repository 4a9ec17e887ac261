#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that generates Maze Chase levels.

mod config;
mod snapshot;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use maze_chase_core::Grid;
use maze_chase_level::{assemble, LevelBlueprint, LevelConfig, START_CELL};
use maze_chase_system_generation::GridGenerator;

use crate::{config::Overrides, snapshot::GridSnapshot};

/// Command-line arguments for the Maze Chase level generator.
#[derive(Debug, Parser)]
#[command(name = "maze-chase", version, about = "Generates Maze Chase levels")]
struct CliArgs {
    /// TOML file providing the level configuration.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Seed for generation and population. Drawn at random when omitted.
    #[arg(long, global = true)]
    seed: Option<u64>,
    #[command(flatten)]
    overrides: Overrides,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Prints the generated maze followed by a level summary.
    Generate,
    /// Prints a single-line snapshot of the generated maze.
    Export,
    /// Assembles a level from a previously exported snapshot.
    Import {
        /// Snapshot string produced by `export`.
        snapshot: String,
    },
    /// Prints the full level blueprint as JSON.
    Blueprint,
}

/// Entry point for the Maze Chase command-line interface.
fn main() -> Result<()> {
    env_logger::init();

    let args = CliArgs::parse();
    let config = args
        .overrides
        .apply(config::load(args.config.as_deref())?);
    let seed = args.seed.unwrap_or_else(|| {
        let seed = rand::random();
        // Stdout carries only the command output.
        eprintln!("seed: {seed}");
        seed
    });
    info!("running {:?} with seed {seed}", args.command);

    match args.command {
        Command::Generate => {
            let grid = generate_grid(&config, seed)?;
            println!("{grid}");
            let blueprint = assemble(grid, &config, seed)?;
            print_summary(&blueprint);
        }
        Command::Export => {
            let grid = generate_grid(&config, seed)?;
            println!("{}", GridSnapshot::new(grid).encode());
        }
        Command::Import { snapshot } => {
            let grid = GridSnapshot::decode(&snapshot)
                .context("failed to decode maze snapshot")?
                .into_grid();
            println!("{grid}");
            let blueprint = assemble(grid, &config, seed)?;
            print_summary(&blueprint);
        }
        Command::Blueprint => {
            let grid = generate_grid(&config, seed)?;
            let blueprint = assemble(grid, &config, seed)?;
            let json = serde_json::to_string_pretty(&blueprint)
                .context("failed to serialise level blueprint")?;
            println!("{json}");
        }
    }

    Ok(())
}

fn generate_grid(config: &LevelConfig, seed: u64) -> Result<Grid> {
    let growth = config
        .growth_parameters()
        .context("invalid maze configuration")?;
    let mut grid = GridGenerator::new(growth).generate(seed);
    grid.set_wall(START_CELL, false);
    Ok(grid)
}

fn print_summary(blueprint: &LevelBlueprint) {
    let layout = &blueprint.layout;
    println!(
        "level {} (seed {}): {}x{} cells",
        blueprint.level, blueprint.seed, layout.columns, layout.rows
    );
    println!(
        "  wall runs: {}, spawn anchors: {}, enemies: {}",
        layout.wall_runs.len(),
        layout.spawn_anchors.len(),
        blueprint.population.enemies.len()
    );
    println!(
        "  floor: {:.1} x {:.1}, player start: ({:.1}, {:.1}), goal: ({:.1}, {:.1})",
        layout.floor.extent().x,
        layout.floor.extent().y,
        blueprint.player_start.x,
        blueprint.player_start.y,
        blueprint.population.goal.x,
        blueprint.population.goal.y
    );
}
