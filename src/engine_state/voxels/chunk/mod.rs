//! # Chunk Module
//!
//! This module provides the `Chunk` struct and its block storage, `BlockGrid`.
//!
//! ## Storage
//!
//! A grid keeps two views of the same cells:
//! - `solid_array`: a bit vector (1 bit per block) indicating which blocks are solid
//! - `blocks`: the full block data, air included, in the same order
//!
//! The bit vector answers the hot question during meshing and collision (is this cell
//! solid?) without decoding blocks; the dense vector keeps edits O(1).
//!
//! ## Neighbors
//!
//! A chunk records its four lateral neighbors as registry keys, never as owned values.
//! The registry alone decides chunk lifetime, so cyclic links between neighbors are
//! plain data.

use bitvec::vec::BitVec;
use cgmath::Point3;

use super::block::{block_type::BlockType, Block};
use super::coordinate::{ChunkCoordinate, ChunkExtents, Direction};
use crate::engine_state::rendering::meshing::{Mesh, MeshId};

mod chunk_creation;
pub mod chunk_iteration;

pub use chunk_creation::{BlockGridBuilder, GridBuildError};
use chunk_iteration::SolidBlocks;

/// Block contents of one chunk.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockGrid {
    /// Size of the grid in blocks
    extents: ChunkExtents,
    /// One bit per cell, set when the cell is solid.
    ///
    /// Stored x-fastest, then y, then z, like `blocks`.
    solid_array: BitVec,
    /// Block data for every cell
    blocks: Vec<Block>,
}

impl BlockGrid {
    /// Creates a grid filled with air.
    pub fn empty(extents: ChunkExtents) -> Self {
        let volume = extents.volume();
        BlockGrid {
            extents,
            solid_array: BitVec::repeat(false, volume),
            blocks: vec![Block::AIR; volume],
        }
    }

    /// The size of this grid.
    pub fn extents(&self) -> ChunkExtents {
        self.extents
    }

    fn index_of(&self, x: i32, y: i32, z: i32) -> Option<usize> {
        if !self.extents.contains(x, y, z) {
            return None;
        }
        let (x, y, z) = (x as usize, y as usize, z as usize);
        let width = self.extents.x as usize;
        let height = self.extents.y as usize;
        Some(x + width * y + width * height * z)
    }

    fn position_of(&self, offset: usize) -> Point3<usize> {
        let width = self.extents.x as usize;
        let plane = width * self.extents.y as usize;
        Point3::new(offset % width, (offset % plane) / width, offset / plane)
    }

    /// The block at the given chunk-local cell, or air when the cell is outside the grid.
    pub fn get(&self, x: i32, y: i32, z: i32) -> Block {
        self.index_of(x, y, z)
            .map(|index| self.blocks[index])
            .unwrap_or(Block::AIR)
    }

    /// Checks if the block at the given chunk-local cell is solid.
    ///
    /// # Returns
    /// `true` if the block is solid, `false` if it's air or out of bounds.
    pub fn is_solid(&self, x: i32, y: i32, z: i32) -> bool {
        self.index_of(x, y, z)
            .map(|index| self.solid_array[index])
            .unwrap_or(false)
    }

    /// Replaces the block at a chunk-local cell, keeping the solidity bits in sync.
    ///
    /// # Returns
    /// `true` if the cell exists and its content changed.
    pub fn set(&mut self, x: i32, y: i32, z: i32, block_type: BlockType) -> bool {
        let Some(index) = self.index_of(x, y, z) else {
            return false;
        };
        let block = Block::new(block_type);
        if self.blocks[index] == block {
            return false;
        }
        self.blocks[index] = block;
        self.solid_array.set(index, block_type.is_solid());
        true
    }

    /// The number of solid cells.
    pub fn solid_count(&self) -> usize {
        self.solid_array.count_ones()
    }

    /// Iterates over the solid cells in storage order.
    pub fn iter_solid(&self) -> SolidBlocks<'_> {
        SolidBlocks::new(self)
    }
}

/// A fixed-size column of the world: its blocks plus the derived, drawable mesh.
///
/// Chunks are created once by the world registry and live until the world is dropped.
/// Activation only toggles whether the chunk takes part in meshing, drawing and collision.
#[derive(Debug)]
pub struct Chunk {
    /// The grid address of this chunk.
    pub coordinate: ChunkCoordinate,
    /// World-space minimum corner.
    pub origin: Point3<f32>,
    /// Block contents produced by the generator.
    pub grid: BlockGrid,
    /// Registry keys of the four lateral neighbors, indexed by [`Direction::index`].
    pub neighbors: [Option<ChunkCoordinate>; 4],
    /// Set when the mesh no longer matches the blocks and must be rebuilt before drawing.
    pub dirty: bool,
    /// The last mesh built for this chunk, if it is still resident.
    pub mesh: Option<Mesh>,
    /// Identity of `mesh`, changed on every rebuild so renderers can cache uploads.
    pub mesh_id: Option<MeshId>,
}

impl Chunk {
    /// Wraps freshly generated blocks into an unlinked, unmeshed chunk.
    pub fn new(coordinate: ChunkCoordinate, origin: Point3<f32>, grid: BlockGrid) -> Self {
        Chunk {
            coordinate,
            origin,
            grid,
            neighbors: [None; 4],
            dirty: true,
            mesh: None,
            mesh_id: None,
        }
    }

    /// The linked neighbor in `direction`, if linking has happened.
    pub fn neighbor(&self, direction: Direction) -> Option<ChunkCoordinate> {
        self.neighbors[direction.index()]
    }

    /// Whether all four lateral neighbors are linked.
    pub fn neighbors_linked(&self) -> bool {
        self.neighbors.iter().all(Option::is_some)
    }

    /// Drops the resident mesh and flags the chunk for a rebuild.
    pub fn release_mesh(&mut self) {
        self.mesh = None;
        self.mesh_id = None;
        self.dirty = true;
    }
}
