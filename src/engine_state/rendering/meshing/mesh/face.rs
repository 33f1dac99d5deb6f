use cgmath::Point3;

use crate::engine_state::voxels::block::block_side::BlockSide;

/// Represents a single quad face of a voxel in the mesh.
///
/// A face is defined by four corner points (lower-left, lower-right, upper-right, upper-left)
/// in chunk-local block units, plus the block type and the side it belongs to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    /// Lower-right corner of the face in chunk coordinates
    pub lr: Point3<i32>,
    /// Lower-left corner of the face in chunk coordinates
    pub ll: Point3<i32>,
    /// Upper-right corner of the face in chunk coordinates
    pub ur: Point3<i32>,
    /// Upper-left corner of the face in chunk coordinates
    pub ul: Point3<i32>,
    /// The block type as an integer, used for texture mapping
    pub block_type_int: usize,
    /// Which side of the block this face represents
    pub block_side: BlockSide,
}

impl Face {
    /// Creates the face on `block_side` of the voxel at `(i, j, k)`.
    ///
    /// Corners are wound so that the face is front-facing when seen from outside the block.
    pub fn new(i: i32, j: i32, k: i32, block_type_int: usize, block_side: BlockSide) -> Self {
        let (ll, lr, ul, ur) = match block_side {
            BlockSide::FRONT => (
                Point3::new(i, j, k),
                Point3::new(i, j, k + 1),
                Point3::new(i, j + 1, k),
                Point3::new(i, j + 1, k + 1),
            ),
            BlockSide::BACK => (
                Point3::new(i + 1, j, k + 1),
                Point3::new(i + 1, j, k),
                Point3::new(i + 1, j + 1, k + 1),
                Point3::new(i + 1, j + 1, k),
            ),
            BlockSide::BOTTOM => (
                Point3::new(i, j, k + 1),
                Point3::new(i, j, k),
                Point3::new(i + 1, j, k + 1),
                Point3::new(i + 1, j, k),
            ),
            BlockSide::TOP => (
                Point3::new(i, j + 1, k),
                Point3::new(i, j + 1, k + 1),
                Point3::new(i + 1, j + 1, k),
                Point3::new(i + 1, j + 1, k + 1),
            ),
            BlockSide::LEFT => (
                Point3::new(i + 1, j, k),
                Point3::new(i, j, k),
                Point3::new(i + 1, j + 1, k),
                Point3::new(i, j + 1, k),
            ),
            BlockSide::RIGHT => (
                Point3::new(i, j, k + 1),
                Point3::new(i + 1, j, k + 1),
                Point3::new(i, j + 1, k + 1),
                Point3::new(i + 1, j + 1, k + 1),
            ),
        };

        Face {
            ll,
            lr,
            ul,
            ur,
            block_type_int,
            block_side,
        }
    }

    /// Attempts to merge this face with another face that is directly to its right.
    ///
    /// # Returns
    /// `Some(merged_face)` if the faces share a type and an edge, `None` otherwise.
    pub fn merge_right(&self, other: &Face) -> Option<Face> {
        if self.block_type_int == other.block_type_int
            && self.block_side == other.block_side
            && self.lr == other.ll
            && self.ur == other.ul
        {
            return Some(Face {
                ul: self.ul,
                ur: other.ur,
                ll: self.ll,
                lr: other.lr,
                block_side: self.block_side,
                block_type_int: self.block_type_int,
            });
        }

        None
    }
}
