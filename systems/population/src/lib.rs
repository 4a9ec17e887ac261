#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Population system that places enemies and the goal on an emitted layout.

use glam::Vec2;
use log::debug;
use maze_chase_core::{CellCoord, MazeLayout, SpawnAnchor};
use rand::{seq::index, Rng};
use serde::{Deserialize, Serialize};

/// Tuning knobs controlling how many enemies a level receives.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PopulationTuning {
    /// Enemies granted per level per cell of the maze's shorter side.
    pub enemies_per_level_cell: f32,
    /// Lower bound on the enemy count before capping by available anchors.
    pub minimum_enemies: u32,
}

impl Default for PopulationTuning {
    fn default() -> Self {
        Self {
            enemies_per_level_cell: 0.2,
            minimum_enemies: 5,
        }
    }
}

/// Enemy placed on a spawn anchor.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    /// Grid cell of the anchor the enemy occupies.
    pub cell: CellCoord,
    /// World-space position of the enemy.
    pub position: Vec2,
    /// Initial wandering direction with components in `[-1, 1)`.
    pub heading: Vec2,
}

/// Result of populating a layout.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelPopulation {
    /// Enemies in sampling order, each on a distinct anchor.
    pub enemies: Vec<EnemySpawn>,
    /// World-space position of the collectible goal.
    pub goal: Vec2,
}

/// Pure system that distributes enemies over spawn anchors.
#[derive(Clone, Copy, Debug, Default)]
pub struct Population {
    tuning: PopulationTuning,
}

impl Population {
    /// Creates a population system with the provided tuning.
    #[must_use]
    pub const fn new(tuning: PopulationTuning) -> Self {
        Self { tuning }
    }

    /// Returns a mutable reference to the tuning so designers can adjust it.
    pub fn tuning_mut(&mut self) -> &mut PopulationTuning {
        &mut self.tuning
    }

    /// Number of enemies the layout receives on the provided level.
    ///
    /// `side` is the shorter of the requested maze width and height, before
    /// rounding to odd cell counts. The count grows with the level and `side`,
    /// never drops below the tuned minimum and never exceeds the number of
    /// spawn anchors.
    #[must_use]
    pub fn enemy_count(&self, layout: &MazeLayout, side: u32, level: u32) -> usize {
        let scaled = (level as f32 * side as f32 * self.tuning.enemies_per_level_cell) as usize;
        let requested = scaled.max(self.tuning.minimum_enemies as usize);
        requested.min(layout.spawn_anchors.len())
    }

    /// Places enemies on distinct anchors sampled from `rng` and the goal at the maze centre.
    pub fn populate<R>(
        &self,
        layout: &MazeLayout,
        side: u32,
        level: u32,
        rng: &mut R,
    ) -> LevelPopulation
    where
        R: Rng + ?Sized,
    {
        let count = self.enemy_count(layout, side, level);
        let anchors = &layout.spawn_anchors;

        let enemies: Vec<EnemySpawn> = index::sample(rng, anchors.len(), count)
            .into_iter()
            .map(|slot| spawn_enemy(&anchors[slot], rng))
            .collect();

        debug!(
            "level {level}: placed {} enemies over {} anchors",
            enemies.len(),
            anchors.len()
        );

        LevelPopulation {
            enemies,
            goal: layout.floor.center,
        }
    }
}

fn spawn_enemy<R>(anchor: &SpawnAnchor, rng: &mut R) -> EnemySpawn
where
    R: Rng + ?Sized,
{
    let heading = Vec2::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0));
    EnemySpawn {
        cell: anchor.cell,
        position: anchor.position,
        heading,
    }
}
