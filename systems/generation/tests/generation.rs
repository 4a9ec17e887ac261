use std::{
    collections::{hash_map::DefaultHasher, HashSet, VecDeque},
    hash::{Hash, Hasher},
};

use maze_chase_core::{CellCoord, Grid, GrowthParameters};
use maze_chase_system_generation::{generate, GridGenerator};
use rand::{rngs::mock::StepRng, RngCore};

fn parameters(width: u32, height: u32, complexity: f64, density: f64) -> GrowthParameters {
    GrowthParameters::new(width, height, complexity, density).expect("valid parameters")
}

#[test]
fn grids_have_odd_dimensions_and_closed_borders() {
    for (width, height) in [(6, 6), (7, 7), (10, 15), (30, 30), (31, 12)] {
        for seed in 0..8 {
            let params = parameters(width, height, 0.75, 0.75);
            let grid = generate(&params, seed);

            assert_eq!(grid.columns() % 2, 1, "{width}x{height} columns");
            assert_eq!(grid.rows() % 2, 1, "{width}x{height} rows");
            assert_eq!(grid.columns(), params.columns());
            assert_eq!(grid.rows(), params.rows());
            assert!(grid.is_enclosed(), "border leaked for seed {seed}");
        }
    }
}

#[test]
fn open_cells_form_a_single_region() {
    for seed in 0..16 {
        let grid = generate(&parameters(21, 21, 1.0, 1.0), seed);
        let open = grid.iter_cells().filter(|(_, wall)| !wall).count();
        let reached = flood_fill_open(&grid);
        assert_eq!(reached, open, "seed {seed} produced disconnected corridors\n{grid}");
    }
}

#[test]
fn connectivity_holds_for_rectangular_sparse_mazes() {
    for seed in 100..110 {
        let grid = generate(&parameters(40, 12, 0.3, 0.4), seed);
        let open = grid.iter_cells().filter(|(_, wall)| !wall).count();
        assert_eq!(flood_fill_open(&grid), open, "seed {seed}\n{grid}");
    }
}

#[test]
fn corridor_centres_are_never_walled() {
    for seed in 0..8 {
        let grid = generate(&parameters(25, 25, 1.0, 1.0), seed);
        for (cell, wall) in grid.iter_cells() {
            if cell.column() % 2 == 1 && cell.row() % 2 == 1 {
                assert!(!wall, "odd cell {cell:?} walled for seed {seed}");
            }
        }
    }
}

#[test]
fn seven_by_seven_seed_forty_two_is_reproducible() {
    let params = parameters(7, 7, 1.0, 1.0);
    let first = generate(&params, 42);
    let second = generate(&params, 42);

    assert_eq!(first, second, "seeded generation diverged");
    assert_eq!(fingerprint(&first), fingerprint(&second));
    assert_eq!(first.dimensions(), (7, 7));
    assert!(first.wall_count() >= 24, "border alone has 24 walls");
}

#[test]
fn distinct_seeds_produce_distinct_mazes() {
    let params = parameters(30, 30, 0.75, 0.75);
    let fingerprints: HashSet<u64> = (0..6)
        .map(|seed| fingerprint(&generate(&params, seed)))
        .collect();

    assert!(fingerprints.len() > 1, "every seed produced the same maze");
}

#[test]
fn zero_seed_count_leaves_only_the_border() {
    let params = parameters(5, 5, 1.0, 0.2);
    assert_eq!(params.seed_count(), 0);

    let grid = generate(&params, 7);
    assert_eq!(grid, Grid::enclosed(5, 5));
}

#[test]
fn single_cell_maze_is_a_lone_wall() {
    let grid = generate(&parameters(1, 1, 1.0, 1.0), 3);
    assert_eq!(grid.dimensions(), (1, 1));
    assert!(grid.is_wall(CellCoord::new(0, 0)));
}

#[test]
fn corner_origin_collides_on_every_step() {
    // A zero stream always picks the corner origin and its first neighbour,
    // which is a border wall.
    let generator = GridGenerator::new(parameters(9, 9, 1.0, 1.0));
    assert_eq!(generator.parameters().columns(), 9);
    let mut rng = StepRng::new(0, 0);
    let grid = generator.generate_with_rng(&mut rng);

    assert_eq!(grid, Grid::enclosed(9, 9));
}

#[test]
fn colliding_step_is_spent_in_place() {
    let params = parameters(7, 7, 0.03, 0.12);
    assert_eq!(params.seed_count(), 1);
    assert_eq!(params.growth_steps(), 2);

    // Origin (2, 2). Its neighbours are west (0, 2), east (4, 2), north (2, 0)
    // and south (2, 4). The first step picks the west border wall, the second
    // picks east.
    let mut rng = ScriptedRng::new(vec![
        draw_u32(1, 4),
        draw_u32(1, 4),
        draw_usize(0, 4),
        draw_usize(1, 4),
    ]);
    let grid = GridGenerator::new(params).generate_with_rng(&mut rng);

    let mut expected = Grid::enclosed(7, 7);
    for column in 2..=4 {
        expected.set_wall(CellCoord::new(column, 2), true);
    }
    assert_eq!(grid, expected, "collision must neither carve nor move\n{grid}");
    assert_eq!(rng.remaining(), 0, "every step draws exactly once");
}

/// Replays fixed words so `gen_range` lands on chosen indices.
struct ScriptedRng {
    words: VecDeque<u64>,
}

impl ScriptedRng {
    fn new(words: Vec<u64>) -> Self {
        Self {
            words: words.into(),
        }
    }

    fn remaining(&self) -> usize {
        self.words.len()
    }
}

impl RngCore for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        self.next_u64() as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.words.pop_front().expect("scripted draws exhausted")
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for byte in dest {
            *byte = self.next_u32() as u8;
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// Word that makes a 32-bit `gen_range` over `len` values return `index`.
fn draw_u32(index: u64, len: u64) -> u64 {
    ((u128::from(index) << 32).div_ceil(u128::from(len))) as u64
}

/// Word that makes a 64-bit `gen_range` over `len` values return `index`.
fn draw_usize(index: u64, len: u64) -> u64 {
    ((u128::from(index) << 64).div_ceil(u128::from(len))) as u64
}

#[test]
fn denser_parameters_grow_more_walls() {
    let sparse = parameters(31, 31, 0.1, 0.1);
    let dense = parameters(31, 31, 1.0, 1.0);
    let sparse_walls: usize = (0..8).map(|seed| generate(&sparse, seed).wall_count()).sum();
    let dense_walls: usize = (0..8).map(|seed| generate(&dense, seed).wall_count()).sum();

    assert!(
        dense_walls > sparse_walls,
        "dense {dense_walls} should exceed sparse {sparse_walls}"
    );
}

fn flood_fill_open(grid: &Grid) -> usize {
    let Some((start, _)) = grid.iter_cells().find(|(_, wall)| !wall) else {
        return 0;
    };

    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();
    let _ = visited.insert(start);
    queue.push_back(start);

    while let Some(cell) = queue.pop_front() {
        let column = i64::from(cell.column());
        let row = i64::from(cell.row());
        for (dc, dr) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
            let (nc, nr) = (column + dc, row + dr);
            if nc < 0 || nr < 0 || nc >= i64::from(grid.columns()) || nr >= i64::from(grid.rows())
            {
                continue;
            }
            let neighbor = CellCoord::new(nc as u32, nr as u32);
            if !grid.is_wall(neighbor) && visited.insert(neighbor) {
                queue.push_back(neighbor);
            }
        }
    }

    visited.len()
}

fn fingerprint(grid: &Grid) -> u64 {
    let mut hasher = DefaultHasher::new();
    grid.hash(&mut hasher);
    hasher.finish()
}
