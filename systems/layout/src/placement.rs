//! World-space box transforms derived from an emitted layout.
//!
//! Walls are extruded upwards from the floor plane by the layout depth. The
//! floor is a slab of the same depth sitting directly below the plane.

use glam::{Vec2, Vec3};
use maze_chase_core::{MazeLayout, WallRun};
use serde::{Deserialize, Serialize};

/// Axis-aligned box described by its centre and full size.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoxPlacement {
    /// World-space centre of the box.
    pub center: Vec3,
    /// Full size of the box along each axis.
    pub scale: Vec3,
}

impl BoxPlacement {
    /// Footprint of the box on the floor plane.
    #[must_use]
    pub fn footprint(&self) -> Vec2 {
        self.scale.truncate()
    }
}

/// Transform of a single merged wall run extruded by `depth`.
#[must_use]
pub fn wall_placement(run: &WallRun, depth: f32) -> BoxPlacement {
    BoxPlacement {
        center: Vec3::new(
            run.start_offset + run.total_width / 2.0,
            run.row_offset + run.row_height / 2.0,
            depth / 2.0,
        ),
        scale: Vec3::new(run.total_width, run.row_height, depth),
    }
}

/// Transforms of every wall run in emission order.
#[must_use]
pub fn wall_placements(layout: &MazeLayout) -> Vec<BoxPlacement> {
    layout
        .wall_runs
        .iter()
        .map(|run| wall_placement(run, layout.floor.depth))
        .collect()
}

/// Transform of the floor slab spanning the whole maze.
#[must_use]
pub fn floor_placement(layout: &MazeLayout) -> BoxPlacement {
    let floor = &layout.floor;
    BoxPlacement {
        center: floor.center.extend(-floor.depth / 2.0),
        scale: floor.extent().extend(floor.depth),
    }
}
