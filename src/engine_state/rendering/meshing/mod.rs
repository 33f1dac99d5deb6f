//! Mesh generation for voxel chunks.
//!
//! This module converts the blocks of one chunk into drawable quads. A face is emitted for
//! every side of a solid block whose adjacent cell is not solid. Adjacent cells past a
//! lateral chunk edge are read from the linked neighbor chunk, so the shared wall between two
//! loaded chunks is culled from both sides.
//!
//! Missing neighbors count as air, as do the cells above and below the chunk column.
//!
//! # Architecture
//! - [`build_chunk_mesh`]: neighbor-aware face culling over a [`ChunkNeighborhood`]
//! - `mesh/`: the [`Mesh`] container and the [`Face`] quad helpers
//!
//! Consecutive faces of the same type along the storage axis are merged into a
//! single quad as they are emitted.

use std::fmt;

use log::trace;
use web_time::Instant;

use crate::engine_state::voxels::{
    block::block_side::BlockSide,
    chunk::BlockGrid,
    coordinate::Direction,
};

mod mesh;

pub use mesh::*;

/// Identity of one built mesh.
///
/// Every rebuild produces a new id, so a renderer can tell a changed mesh from one it has
/// already uploaded.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(pub u64);

impl fmt::Display for MeshId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mesh#{}", self.0)
    }
}

/// A chunk's blocks together with the blocks of its linked lateral neighbors.
pub struct ChunkNeighborhood<'a> {
    /// The chunk being meshed
    pub center: &'a BlockGrid,
    /// Neighbor grids indexed by [`Direction::index`]; `None` reads as air
    pub neighbors: [Option<&'a BlockGrid>; 4],
}

impl<'a> ChunkNeighborhood<'a> {
    /// Solidity of a cell given in the center chunk's local coordinates.
    ///
    /// Cells one step past a lateral edge are looked up in the neighbor on that side.
    pub fn is_solid(&self, x: i32, y: i32, z: i32) -> bool {
        let extents = self.center.extents();

        let (direction, x, z) = if x < 0 {
            (Direction::West, x + extents.x, z)
        } else if x >= extents.x {
            (Direction::East, x - extents.x, z)
        } else if z < 0 {
            (Direction::North, x, z + extents.z)
        } else if z >= extents.z {
            (Direction::South, x, z - extents.z)
        } else {
            return self.center.is_solid(x, y, z);
        };

        self.neighbors[direction.index()]
            .map(|grid| grid.is_solid(x, y, z))
            .unwrap_or(false)
    }
}

/// Builds the mesh of `neighborhood.center`, culling faces hidden by solid blocks.
pub fn build_chunk_mesh(neighborhood: &ChunkNeighborhood<'_>) -> Mesh {
    let start = Instant::now();
    let mut mesh = Mesh::new();

    // One pending quad per side, extended while consecutive faces line up
    let mut pending: [Option<Face>; 6] = [None; 6];

    for (position, block) in neighborhood.center.iter_solid() {
        let (i, j, k) = (position.x as i32, position.y as i32, position.z as i32);

        for side in BlockSide::all() {
            let normal = side.normal();
            if neighborhood.is_solid(i + normal.x, j + normal.y, k + normal.z) {
                continue;
            }

            let face = Face::new(i, j, k, block.block_type as usize, side);
            let slot = &mut pending[side as usize];
            *slot = match slot.take() {
                None => Some(face),
                Some(previous) => match previous
                    .merge_right(&face)
                    .or_else(|| face.merge_right(&previous))
                {
                    Some(merged) => Some(merged),
                    None => {
                        mesh.push_face(&previous);
                        Some(face)
                    }
                },
            };
        }
    }

    for face in pending.into_iter().flatten() {
        mesh.push_face(&face);
    }

    trace!(
        "Meshed {} solid blocks into {} quads in {:?}",
        neighborhood.center.solid_count(),
        mesh.quad_count(),
        start.elapsed()
    );

    mesh
}
