#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Layout system that converts an occupancy grid into placement data.
//!
//! The grid is walked once in row-major order. Consecutive wall cells on a
//! row collapse into a single [`WallRun`], so the number of wall entities a
//! scene needs is bounded by the number of runs rather than the number of
//! cells. Open cells on structural rows or columns that do not terminate a run
//! become [`SpawnAnchor`]s. Cells whose row and column are both odd lie inside
//! wide corridors and are skipped to avoid oversampling.

pub mod placement;

use glam::Vec2;
use log::debug;
use maze_chase_core::{
    CellCoord, CellExtents, FloorPlan, Grid, LayoutDimensions, MazeLayout, SpawnAnchor, WallRun,
};

/// Pure system that emits a [`MazeLayout`] for any grid.
#[derive(Clone, Copy, Debug)]
pub struct LayoutEmitter {
    dimensions: LayoutDimensions,
}

impl LayoutEmitter {
    /// Creates an emitter using the provided world-space dimensions.
    #[must_use]
    pub const fn new(dimensions: LayoutDimensions) -> Self {
        Self { dimensions }
    }

    /// World-space dimensions applied during emission.
    #[must_use]
    pub const fn dimensions(&self) -> &LayoutDimensions {
        &self.dimensions
    }

    /// Walks the grid and returns the merged wall runs, floor and anchors.
    ///
    /// An empty grid yields an empty layout.
    #[must_use]
    pub fn emit(&self, grid: &Grid) -> MazeLayout {
        let extents = self.dimensions.extents();
        let mut layout = MazeLayout {
            columns: grid.columns(),
            rows: grid.rows(),
            floor: FloorPlan {
                depth: self.dimensions.depth(),
                ..FloorPlan::default()
            },
            ..MazeLayout::default()
        };

        if grid.is_empty() {
            return layout;
        }

        let mut row_offset = 0.0;
        let mut total_width: f32 = 0.0;
        for (row, cells) in grid.iter_rows().enumerate() {
            let row = row as u32;
            let row_height = extents.extent(row);
            let row_width = emit_row(row, cells, row_offset, row_height, &extents, &mut layout);
            total_width = total_width.max(row_width);
            row_offset += row_height;
        }

        let half_extent = Vec2::new(total_width, row_offset) / 2.0;
        layout.floor.half_extent = half_extent;
        layout.floor.center = half_extent;

        debug!(
            "emitted {}x{} layout: {} wall runs covering {} cells, {} spawn anchors",
            layout.columns,
            layout.rows,
            layout.wall_runs.len(),
            layout.covered_cell_count(),
            layout.spawn_anchors.len()
        );
        layout
    }
}

/// Convenience wrapper around [`LayoutEmitter::emit`].
#[must_use]
pub fn emit(grid: &Grid, dimensions: &LayoutDimensions) -> MazeLayout {
    LayoutEmitter::new(*dimensions).emit(grid)
}

/// Wall run that is still accumulating cells.
#[derive(Debug)]
struct PendingRun {
    start_column: u32,
    start_offset: f32,
    width: f32,
    cells: u32,
}

impl PendingRun {
    fn finish(self, row: u32, row_offset: f32, row_height: f32) -> WallRun {
        WallRun {
            row,
            start_column: self.start_column,
            cell_count: self.cells,
            start_offset: self.start_offset,
            row_offset,
            total_width: self.width,
            row_height,
        }
    }
}

/// Emits the runs and anchors of a single row and returns the row's width.
fn emit_row(
    row: u32,
    cells: &[bool],
    row_offset: f32,
    row_height: f32,
    extents: &CellExtents,
    layout: &mut MazeLayout,
) -> f32 {
    let mut pending: Option<PendingRun> = None;
    let mut x = 0.0;

    for (column, wall) in cells.iter().enumerate() {
        let column = column as u32;
        let width = extents.extent(column);
        let cell = CellCoord::new(column, row);

        if *wall {
            match pending.as_mut() {
                Some(run) => {
                    run.width += width;
                    run.cells += 1;
                }
                None => {
                    pending = Some(PendingRun {
                        start_column: column,
                        start_offset: x,
                        width,
                        cells: 1,
                    });
                }
            }
        } else if let Some(run) = pending.take() {
            // The open cell that closes a run only flushes it.
            layout.wall_runs.push(run.finish(row, row_offset, row_height));
        } else if cell.is_structural() {
            layout.spawn_anchors.push(SpawnAnchor {
                cell,
                position: Vec2::new(x + width / 2.0, row_offset + row_height / 2.0),
            });
        }

        x += width;
    }

    if let Some(run) = pending.take() {
        layout.wall_runs.push(run.finish(row, row_offset, row_height));
    }

    x
}
