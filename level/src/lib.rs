#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Level assembly for Maze Chase.
//!
//! A level is built in one synchronous pass: the grid is generated, the
//! player's start cell is forced open, the layout is emitted and the layout is
//! populated. Only the resulting [`LevelBlueprint`] survives; the grid is
//! dropped once emission finishes.

use glam::Vec2;
use log::info;
use maze_chase_core::{
    CellCoord, Grid, GrowthParameters, LayoutDimensions, MazeLayout, ParameterError,
};
use maze_chase_system_generation::GridGenerator;
use maze_chase_system_layout::{
    placement::{floor_placement, wall_placements, BoxPlacement},
    LayoutEmitter,
};
use maze_chase_system_population::{LevelPopulation, Population, PopulationTuning};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Cell the player starts in. It is forced open after generation.
pub const START_CELL: CellCoord = CellCoord::new(1, 1);

/// Seed used when callers do not provide one.
pub const DEFAULT_SEED: u64 = 0x42f0_e1eb_d4a5_3c21;

const DEFAULT_MAZE_WIDTH: u32 = 30;
const DEFAULT_MAZE_HEIGHT: u32 = 30;
const DEFAULT_COMPLEXITY: f64 = 0.75;
const DEFAULT_DENSITY: f64 = 0.75;
const DEFAULT_WALL_THICKNESS: f32 = 1.0;
const DEFAULT_CORRIDOR_THICKNESS: f32 = 3.0;
const DEFAULT_DEPTH: f32 = 1.5;

/// ChaCha stream reserved for population so it never shares draws with generation.
const POPULATION_STREAM: u64 = 1;

/// Designer-facing level configuration.
///
/// Every field has a default, so partial configuration files only override the
/// values they name.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Requested maze width in cells.
    pub width: u32,
    /// Requested maze height in cells.
    pub height: u32,
    /// Growth complexity in `(0, 1]`.
    pub complexity: f64,
    /// Seed density in `(0, 1]`.
    pub density: f64,
    /// World-space thickness of even rows and columns.
    pub wall_thickness: f32,
    /// World-space thickness of odd rows and columns.
    pub corridor_thickness: f32,
    /// Wall extrusion depth and floor thickness.
    pub depth: f32,
    /// One-based level number driving the enemy count.
    pub level: u32,
    /// Enemy count tuning.
    pub population: PopulationTuning,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_MAZE_WIDTH,
            height: DEFAULT_MAZE_HEIGHT,
            complexity: DEFAULT_COMPLEXITY,
            density: DEFAULT_DENSITY,
            wall_thickness: DEFAULT_WALL_THICKNESS,
            corridor_thickness: DEFAULT_CORRIDOR_THICKNESS,
            depth: DEFAULT_DEPTH,
            level: 1,
            population: PopulationTuning::default(),
        }
    }
}

impl LevelConfig {
    /// Validates the growth half of the configuration.
    pub fn growth_parameters(&self) -> Result<GrowthParameters, ParameterError> {
        GrowthParameters::new(self.width, self.height, self.complexity, self.density)
    }

    /// Validates the world-space half of the configuration.
    pub fn layout_dimensions(&self) -> Result<LayoutDimensions, ParameterError> {
        LayoutDimensions::new(self.wall_thickness, self.corridor_thickness, self.depth)
    }
}

/// Everything scene construction needs to instantiate a level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelBlueprint {
    /// Seed the level was generated from.
    pub seed: u64,
    /// Level number used for population.
    pub level: u32,
    /// Emitted layout.
    pub layout: MazeLayout,
    /// Box transforms of the merged wall runs.
    pub walls: Vec<BoxPlacement>,
    /// Box transform of the floor slab.
    pub floor: BoxPlacement,
    /// World-space centre of the start cell.
    pub player_start: Vec2,
    /// Enemies and goal.
    pub population: LevelPopulation,
}

/// Generates a fresh grid from `seed` and assembles it into a blueprint.
pub fn build(config: &LevelConfig, seed: u64) -> Result<LevelBlueprint, ParameterError> {
    let growth = config.growth_parameters()?;
    let grid = GridGenerator::new(growth).generate(seed);
    assemble(grid, config, seed)
}

/// Assembles a blueprint from an existing grid.
///
/// The start cell is forced open before emission. The grid is consumed.
pub fn assemble(
    mut grid: Grid,
    config: &LevelConfig,
    seed: u64,
) -> Result<LevelBlueprint, ParameterError> {
    let dimensions = config.layout_dimensions()?;

    grid.set_wall(START_CELL, false);
    let layout = LayoutEmitter::new(dimensions).emit(&grid);
    drop(grid);

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(POPULATION_STREAM);
    let side = config.width.min(config.height);
    let population =
        Population::new(config.population).populate(&layout, side, config.level, &mut rng);

    info!(
        "level {} ready: {}x{} maze, {} wall runs, {} anchors, {} enemies",
        config.level,
        layout.columns,
        layout.rows,
        layout.wall_runs.len(),
        layout.spawn_anchors.len(),
        population.enemies.len()
    );

    Ok(LevelBlueprint {
        seed,
        level: config.level,
        walls: wall_placements(&layout),
        floor: floor_placement(&layout),
        player_start: dimensions.extents().cell_center(START_CELL),
        layout,
        population,
    })
}
