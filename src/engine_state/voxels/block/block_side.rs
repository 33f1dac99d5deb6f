//! # Block Side Module
//!
//! This module defines the different faces/sides of a voxel block.
//! It provides functionality for face culling and visibility determination.

use cgmath::Vector3;

use crate::engine_state::voxels::coordinate::Direction;

/// Represents the six possible faces of a voxel block.
///
/// Each variant is assigned a unique integer value which doubles as its slot
/// in per-side arrays such as the mesh sides and the texture table.
///
/// The order is: [FRONT, BACK, BOTTOM, TOP, LEFT, RIGHT]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The front face (facing negative X)
    FRONT = 0,

    /// The back face (facing positive X)
    BACK = 1,

    /// The bottom face (facing negative Y)
    BOTTOM = 2,

    /// The top face (facing positive Y)
    TOP = 3,

    /// The left face (facing negative Z)
    LEFT = 4,

    /// The right face (facing positive Z)
    RIGHT = 5,
}

impl BlockSide {
    /// Returns an array containing all six block faces in a consistent order.
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::FRONT,
            BlockSide::BACK,
            BlockSide::BOTTOM,
            BlockSide::TOP,
            BlockSide::LEFT,
            BlockSide::RIGHT,
        ]
    }

    /// The outward unit normal of this face in block steps.
    pub fn normal(self) -> Vector3<i32> {
        match self {
            BlockSide::FRONT => Vector3::new(-1, 0, 0),
            BlockSide::BACK => Vector3::new(1, 0, 0),
            BlockSide::BOTTOM => Vector3::new(0, -1, 0),
            BlockSide::TOP => Vector3::new(0, 1, 0),
            BlockSide::LEFT => Vector3::new(0, 0, -1),
            BlockSide::RIGHT => Vector3::new(0, 0, 1),
        }
    }

    /// The neighboring chunk this face looks into when it sits on a chunk edge.
    ///
    /// `None` for the vertical faces, since chunks are not stacked.
    pub fn lateral_direction(self) -> Option<Direction> {
        match self {
            BlockSide::FRONT => Some(Direction::West),
            BlockSide::BACK => Some(Direction::East),
            BlockSide::LEFT => Some(Direction::North),
            BlockSide::RIGHT => Some(Direction::South),
            BlockSide::TOP | BlockSide::BOTTOM => None,
        }
    }

    /// Determines which block faces are potentially visible from a given view direction.
    ///
    /// A face is kept unless the view direction points more than 45 degrees
    /// along its normal, in which case only its back can be seen.
    ///
    /// # Arguments
    /// * `view_vec` - The normalized view direction vector
    pub fn get_visible_sides(view_vec: Vector3<f32>) -> Vec<BlockSide> {
        const CUTOFF: f32 = std::f32::consts::FRAC_1_SQRT_2;

        BlockSide::all()
            .into_iter()
            .filter(|side| {
                let normal = side.normal().cast::<f32>().unwrap_or(Vector3::new(0.0, 0.0, 0.0));
                let facing = normal.x * view_vec.x + normal.y * view_vec.y + normal.z * view_vec.z;
                facing < CUTOFF
            })
            .collect()
    }
}
