#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Randomized growth system that produces the maze occupancy grid.
//!
//! Walls grow outward from random lattice points (even row and even column)
//! two cells at a time, filling the connector cell they step over. A step
//! towards a cell that is already a wall is spent without moving, which keeps
//! the wall forest acyclic and therefore leaves the open cells connected.

use log::{debug, trace};
use maze_chase_core::{CellCoord, Grid, GrowthParameters};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Pure system that turns validated growth parameters into a grid.
#[derive(Clone, Copy, Debug)]
pub struct GridGenerator {
    parameters: GrowthParameters,
}

impl GridGenerator {
    /// Creates a generator bound to the provided parameters.
    #[must_use]
    pub const fn new(parameters: GrowthParameters) -> Self {
        Self { parameters }
    }

    /// Parameters the generator was created with.
    #[must_use]
    pub const fn parameters(&self) -> &GrowthParameters {
        &self.parameters
    }

    /// Generates a grid from a deterministic ChaCha stream seeded with `seed`.
    #[must_use]
    pub fn generate(&self, seed: u64) -> Grid {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.generate_with_rng(&mut rng)
    }

    /// Generates a grid drawing every random choice from `rng`.
    pub fn generate_with_rng<R>(&self, rng: &mut R) -> Grid
    where
        R: Rng + ?Sized,
    {
        let columns = self.parameters.columns();
        let rows = self.parameters.rows();
        let seeds = self.parameters.seed_count();
        let steps = self.parameters.growth_steps();

        let mut grid = Grid::enclosed(columns, rows);
        let mut stats = GrowthStats::default();

        for _ in 0..seeds {
            let column = rng.gen_range(0..=columns / 2) * 2;
            let row = rng.gen_range(0..=rows / 2) * 2;
            let origin = CellCoord::new(column, row);
            grid.set_wall(origin, true);
            grow(&mut grid, origin, steps, rng, &mut stats);
        }

        debug!(
            "generated {columns}x{rows} maze: {seeds} seeds, {steps} steps each, \
             {} carved, {} collisions, {} stalled walks",
            stats.carved, stats.collisions, stats.stalled
        );
        grid
    }
}

/// Convenience wrapper around [`GridGenerator::generate`].
#[must_use]
pub fn generate(parameters: &GrowthParameters, seed: u64) -> Grid {
    GridGenerator::new(*parameters).generate(seed)
}

#[derive(Debug, Default)]
struct GrowthStats {
    carved: u64,
    collisions: u64,
    stalled: u64,
}

fn grow<R>(grid: &mut Grid, origin: CellCoord, steps: u32, rng: &mut R, stats: &mut GrowthStats)
where
    R: Rng + ?Sized,
{
    let mut cursor = origin;

    for _ in 0..steps {
        let (candidates, count) = lattice_neighbors(cursor, grid.columns(), grid.rows());
        if count == 0 {
            stats.stalled += 1;
            break;
        }

        let next = candidates[rng.gen_range(0..count)];
        if grid.is_wall(next) {
            stats.collisions += 1;
            continue;
        }

        grid.set_wall(next, true);
        grid.set_wall(connector(cursor, next), true);
        trace!(
            "grew wall from ({}, {}) to ({}, {})",
            cursor.column(),
            cursor.row(),
            next.column(),
            next.row()
        );
        cursor = next;
        stats.carved += 1;
    }
}

/// Lattice points two cells away in the order west, east, north, south.
fn lattice_neighbors(cell: CellCoord, columns: u32, rows: u32) -> ([CellCoord; 4], usize) {
    let mut candidates = [cell; 4];
    let mut count = 0;

    if cell.column() > 1 {
        candidates[count] = CellCoord::new(cell.column() - 2, cell.row());
        count += 1;
    }

    if cell.column() + 2 < columns {
        candidates[count] = CellCoord::new(cell.column() + 2, cell.row());
        count += 1;
    }

    if cell.row() > 1 {
        candidates[count] = CellCoord::new(cell.column(), cell.row() - 2);
        count += 1;
    }

    if cell.row() + 2 < rows {
        candidates[count] = CellCoord::new(cell.column(), cell.row() + 2);
        count += 1;
    }

    (candidates, count)
}

fn connector(from: CellCoord, to: CellCoord) -> CellCoord {
    CellCoord::new(
        (from.column() + to.column()) / 2,
        (from.row() + to.row()) / 2,
    )
}
