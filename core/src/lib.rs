#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Chase workspace.
//!
//! The crate defines the value types that flow between the pure systems. The
//! generation system consumes validated [`GrowthParameters`] and produces a
//! [`Grid`]. The layout system consumes that grid together with
//! [`LayoutDimensions`] and produces a [`MazeLayout`] that scene-construction
//! code owns from then on. Nothing in here performs I/O or holds shared state.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Reports whether both indices are even, which makes the cell eligible as
    /// a growth origin.
    #[must_use]
    pub const fn is_lattice_point(&self) -> bool {
        self.column % 2 == 0 && self.row % 2 == 0
    }

    /// Reports whether the cell lies on a structural row or column, i.e. at
    /// least one of its indices is even.
    #[must_use]
    pub const fn is_structural(&self) -> bool {
        self.column % 2 == 0 || self.row % 2 == 0
    }
}

/// Precondition violations rejected at the API boundary.
///
/// Every variant describes a caller programming error. Values are never
/// clamped into range.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ParameterError {
    /// Width and height must both be at least one cell.
    #[error("maze dimensions must be positive (received {width}x{height})")]
    InvalidDimensions {
        /// Requested maze width.
        width: u32,
        /// Requested maze height.
        height: u32,
    },
    /// Complexity must lie in `(0, 1]`.
    #[error("complexity must lie in (0, 1] (received {0})")]
    ComplexityOutOfRange(f64),
    /// Density must lie in `(0, 1]`.
    #[error("density must lie in (0, 1] (received {0})")]
    DensityOutOfRange(f64),
    /// A world-space thickness was zero, negative or not finite.
    #[error("{name} must be positive and finite (received {value})")]
    NonPositiveThickness {
        /// Name of the offending parameter.
        name: &'static str,
        /// Value that failed validation.
        value: f32,
    },
    /// A row supplied to [`Grid::from_rows`] differs in length from the first row.
    #[error("grid row {row} has {found} cells, expected {expected}")]
    RaggedGrid {
        /// Index of the offending row.
        row: u32,
        /// Number of cells in the first row.
        expected: u32,
        /// Number of cells in the offending row.
        found: u32,
    },
    /// The cell buffer supplied to [`Grid::from_cells`] does not match the dimensions.
    #[error("grid of {columns}x{rows} needs {expected} cells, received {found}")]
    CellCountMismatch {
        /// Declared column count.
        columns: u32,
        /// Declared row count.
        rows: u32,
        /// Number of cells the dimensions require.
        expected: usize,
        /// Number of cells supplied.
        found: usize,
    },
}

/// Validated inputs of the randomized growth algorithm.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GrowthParameters {
    width: u32,
    height: u32,
    complexity: f64,
    density: f64,
}

impl GrowthParameters {
    /// Validates and captures the growth inputs.
    ///
    /// Widths and heights below six are accepted but produce degenerate mazes.
    pub fn new(
        width: u32,
        height: u32,
        complexity: f64,
        density: f64,
    ) -> Result<Self, ParameterError> {
        if width == 0 || height == 0 {
            return Err(ParameterError::InvalidDimensions { width, height });
        }
        if !in_unit_interval(complexity) {
            return Err(ParameterError::ComplexityOutOfRange(complexity));
        }
        if !in_unit_interval(density) {
            return Err(ParameterError::DensityOutOfRange(density));
        }

        Ok(Self {
            width,
            height,
            complexity,
            density,
        })
    }

    /// Requested maze width before rounding to an odd column count.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Requested maze height before rounding to an odd row count.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Growth complexity in `(0, 1]`.
    #[must_use]
    pub const fn complexity(&self) -> f64 {
        self.complexity
    }

    /// Seed density in `(0, 1]`.
    #[must_use]
    pub const fn density(&self) -> f64 {
        self.density
    }

    /// Number of grid columns, always odd.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        odd_extent(self.width)
    }

    /// Number of grid rows, always odd.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        odd_extent(self.height)
    }

    /// Number of independent growth origins.
    #[must_use]
    pub fn seed_count(&self) -> u32 {
        let lattice = f64::from(self.rows() / 2) * f64::from(self.columns() / 2);
        (self.density * lattice) as u32
    }

    /// Number of neighbour-walk iterations granted to each origin.
    #[must_use]
    pub fn growth_steps(&self) -> u32 {
        let perimeter = 5.0 * (f64::from(self.rows()) + f64::from(self.columns()));
        (self.complexity * perimeter) as u32
    }
}

fn in_unit_interval(value: f64) -> bool {
    value > 0.0 && value <= 1.0
}

const fn odd_extent(requested: u32) -> u32 {
    (requested / 2) * 2 + 1
}

/// Dense occupancy grid where `true` marks a wall cell.
///
/// Cells are stored in row-major order.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid {
    columns: u32,
    rows: u32,
    cells: Vec<bool>,
}

impl Grid {
    /// Creates a grid whose cells are all open.
    #[must_use]
    pub fn open(columns: u32, rows: u32) -> Self {
        let count = columns as usize * rows as usize;
        Self {
            columns,
            rows,
            cells: vec![false; count],
        }
    }

    /// Creates an open grid whose border cells are walls.
    #[must_use]
    pub fn enclosed(columns: u32, rows: u32) -> Self {
        let mut grid = Self::open(columns, rows);
        for row in 0..rows {
            for column in 0..columns {
                let cell = CellCoord::new(column, row);
                if grid.is_border(cell) {
                    grid.set_wall(cell, true);
                }
            }
        }
        grid
    }

    /// Builds a grid from explicit rows of wall flags.
    pub fn from_rows<R>(rows: &[R]) -> Result<Self, ParameterError>
    where
        R: AsRef<[bool]>,
    {
        let columns = rows.first().map_or(0, |row| row.as_ref().len());
        let mut cells = Vec::with_capacity(columns * rows.len());
        for (index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != columns {
                return Err(ParameterError::RaggedGrid {
                    row: index as u32,
                    expected: columns as u32,
                    found: row.len() as u32,
                });
            }
            cells.extend_from_slice(row);
        }

        Ok(Self {
            columns: columns as u32,
            rows: rows.len() as u32,
            cells,
        })
    }

    /// Builds a grid from a row-major cell buffer.
    pub fn from_cells(columns: u32, rows: u32, cells: Vec<bool>) -> Result<Self, ParameterError> {
        let expected = columns as usize * rows as usize;
        if cells.len() != expected {
            return Err(ParameterError::CellCountMismatch {
                columns,
                rows,
                expected,
                found: cells.len(),
            });
        }

        Ok(Self {
            columns,
            rows,
            cells,
        })
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Grid dimensions as `(rows, columns)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.rows, self.columns)
    }

    /// Reports whether the grid contains no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Reports whether the cell is a wall. Cells outside the grid are not walls.
    #[must_use]
    pub fn is_wall(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(false)
    }

    /// Marks the cell as a wall or opens it. Out-of-bounds coordinates are ignored.
    pub fn set_wall(&mut self, cell: CellCoord, wall: bool) {
        if let Some(slot) = self.index(cell).and_then(|index| self.cells.get_mut(index)) {
            *slot = wall;
        }
    }

    /// Reports whether the cell lies on the outermost ring of the grid.
    #[must_use]
    pub fn is_border(&self, cell: CellCoord) -> bool {
        if self.columns == 0 || self.rows == 0 {
            return false;
        }
        cell.column() == 0
            || cell.row() == 0
            || cell.column() == self.columns - 1
            || cell.row() == self.rows - 1
    }

    /// Reports whether every border cell is a wall.
    #[must_use]
    pub fn is_enclosed(&self) -> bool {
        self.iter_cells()
            .filter(|(cell, _)| self.is_border(*cell))
            .all(|(_, wall)| wall)
    }

    /// Number of wall cells in the grid.
    #[must_use]
    pub fn wall_count(&self) -> usize {
        self.cells.iter().filter(|wall| **wall).count()
    }

    /// Iterator over the rows of the grid, top to bottom.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[bool]> + '_ {
        self.cells.chunks(self.columns.max(1) as usize)
    }

    /// Iterator over every cell in row-major order together with its wall flag.
    pub fn iter_cells(&self) -> impl Iterator<Item = (CellCoord, bool)> + '_ {
        let columns = self.columns.max(1);
        self.cells.iter().enumerate().map(move |(index, wall)| {
            let index = index as u32;
            (CellCoord::new(index % columns, index / columns), *wall)
        })
    }

    /// Row-major wall flags backing the grid.
    #[must_use]
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.iter_rows() {
            for wall in row {
                f.write_str(if *wall { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Grid {}x{}", self.columns, self.rows)?;
        fmt::Display::fmt(self, f)
    }
}

/// World-space size of grid cells as a function of index parity.
///
/// Even indices are thin wall lines, odd indices are wide corridors. The same
/// rule applies to rows and columns.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellExtents {
    wall_thickness: f32,
    corridor_thickness: f32,
}

impl CellExtents {
    /// Creates the parity sizing rule. Use [`LayoutDimensions::new`] to validate inputs.
    #[must_use]
    pub const fn new(wall_thickness: f32, corridor_thickness: f32) -> Self {
        Self {
            wall_thickness,
            corridor_thickness,
        }
    }

    /// Thickness of even-indexed rows and columns.
    #[must_use]
    pub const fn wall_thickness(&self) -> f32 {
        self.wall_thickness
    }

    /// Thickness of odd-indexed rows and columns.
    #[must_use]
    pub const fn corridor_thickness(&self) -> f32 {
        self.corridor_thickness
    }

    /// Size of the row or column at `index`.
    #[must_use]
    pub const fn extent(&self, index: u32) -> f32 {
        if index % 2 == 0 {
            self.wall_thickness
        } else {
            self.corridor_thickness
        }
    }

    /// Distance from the origin to the leading edge of the row or column at `index`.
    #[must_use]
    pub fn offset(&self, index: u32) -> f32 {
        let thin = (index + 1) / 2;
        let wide = index / 2;
        thin as f32 * self.wall_thickness + wide as f32 * self.corridor_thickness
    }

    /// Total size of `count` consecutive rows or columns starting at index zero.
    #[must_use]
    pub fn span(&self, count: u32) -> f32 {
        self.offset(count)
    }

    /// World-space midpoint of the cell.
    #[must_use]
    pub fn cell_center(&self, cell: CellCoord) -> Vec2 {
        Vec2::new(
            self.offset(cell.column()) + self.extent(cell.column()) / 2.0,
            self.offset(cell.row()) + self.extent(cell.row()) / 2.0,
        )
    }
}

/// Validated world-space dimensions used when emitting a layout.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayoutDimensions {
    extents: CellExtents,
    depth: f32,
}

impl LayoutDimensions {
    /// Validates the wall thickness, corridor thickness and extrusion depth.
    pub fn new(
        wall_thickness: f32,
        corridor_thickness: f32,
        depth: f32,
    ) -> Result<Self, ParameterError> {
        ensure_positive("wall thickness", wall_thickness)?;
        ensure_positive("corridor thickness", corridor_thickness)?;
        ensure_positive("depth", depth)?;

        Ok(Self {
            extents: CellExtents::new(wall_thickness, corridor_thickness),
            depth,
        })
    }

    /// Parity sizing rule for rows and columns.
    #[must_use]
    pub const fn extents(&self) -> CellExtents {
        self.extents
    }

    /// Extrusion depth of walls and thickness of the floor slab.
    #[must_use]
    pub const fn depth(&self) -> f32 {
        self.depth
    }
}

fn ensure_positive(name: &'static str, value: f32) -> Result<(), ParameterError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ParameterError::NonPositiveThickness { name, value })
    }
}

/// Contiguous wall cells along one row merged into a single placement.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WallRun {
    /// Row index the run lies on.
    pub row: u32,
    /// Column index of the first wall cell in the run.
    pub start_column: u32,
    /// Number of grid cells merged into the run.
    pub cell_count: u32,
    /// World-space x coordinate of the run's leading edge.
    pub start_offset: f32,
    /// World-space y coordinate of the row's leading edge.
    pub row_offset: f32,
    /// Combined width of every merged cell.
    pub total_width: f32,
    /// Height of the row, thin on even rows and wide on odd rows.
    pub row_height: f32,
}

impl WallRun {
    /// Reports whether the run covers the provided cell.
    #[must_use]
    pub fn covers(&self, cell: CellCoord) -> bool {
        cell.row() == self.row
            && cell.column() >= self.start_column
            && cell.column() < self.start_column + self.cell_count
    }

    /// Reports whether the world-space point lies strictly inside the run's rectangle.
    #[must_use]
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x > self.start_offset
            && point.x < self.start_offset + self.total_width
            && point.y > self.row_offset
            && point.y < self.row_offset + self.row_height
    }
}

/// Centre of an open cell suitable for placing a discrete object.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnAnchor {
    /// Grid cell the anchor was derived from.
    pub cell: CellCoord,
    /// World-space midpoint of the cell.
    pub position: Vec2,
}

/// Floor slab sized to the whole maze.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FloorPlan {
    /// Half of the floor's width and height.
    pub half_extent: Vec2,
    /// World-space centre of the floor, which is also the maze centre.
    pub center: Vec2,
    /// Thickness of the floor slab.
    pub depth: f32,
}

impl FloorPlan {
    /// Full width and height of the floor.
    #[must_use]
    pub fn extent(&self) -> Vec2 {
        self.half_extent * 2.0
    }
}

/// Placement data derived from a finished grid.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MazeLayout {
    /// Number of columns of the grid the layout was emitted from.
    pub columns: u32,
    /// Number of rows of the grid the layout was emitted from.
    pub rows: u32,
    /// Merged wall placements in row-major emission order.
    pub wall_runs: Vec<WallRun>,
    /// Floor slab dimensions.
    pub floor: FloorPlan,
    /// Free-cell anchors in row-major emission order.
    pub spawn_anchors: Vec<SpawnAnchor>,
}

impl MazeLayout {
    /// Reports whether the layout carries neither walls nor anchors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.wall_runs.is_empty() && self.spawn_anchors.is_empty()
    }

    /// Wall runs that lie on the provided row.
    pub fn runs_on_row(&self, row: u32) -> impl Iterator<Item = &WallRun> + '_ {
        self.wall_runs.iter().filter(move |run| run.row == row)
    }

    /// Total number of grid cells covered by wall runs.
    #[must_use]
    pub fn covered_cell_count(&self) -> usize {
        self.wall_runs
            .iter()
            .map(|run| run.cell_count as usize)
            .sum()
    }
}
