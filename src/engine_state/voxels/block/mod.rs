//! # Block Module
//!
//! This module provides the core block-related functionality for the voxel engine.
//! It includes block type definitions, block face handling, and block data structures.

use block_type::BlockType;

pub mod block_side;
pub mod block_type;

/// The underlying integer type used to represent block types in memory.
pub type BlockTypeSize = u8;

/// Maps each block type to its corresponding texture indices for each face.
///
/// The outer array is indexed by `BlockType` as a `usize`.
/// The inner array contains 6 texture indices, one for each face in `BlockSide` order:
/// [Front, Back, Bottom, Top, Left, Right]
pub static BLOCK_TYPE_TO_TEXTURE_INDICES: [[usize; 6]; 5] = [
    [0, 0, 0, 0, 0, 0], // AIR (never meshed)
    [1, 1, 1, 1, 1, 1], // DIRT (all sides use texture 1)
    [2, 2, 1, 3, 2, 2], // GRASS (top: 3, bottom: 1, sides: 2)
    [0, 0, 0, 0, 0, 0], // WOOD (all sides use texture 0)
    [4, 4, 4, 4, 4, 4], // WHITE (all sides use texture 4)
];

/// Represents a single voxel block in the world.
///
/// # Memory Layout
/// The `#[repr(C)]` attribute ensures a consistent memory layout so block data can be
/// handed to a GPU buffer as-is. The block type is stored as a compact `BlockTypeSize`.
#[repr(C)]
#[derive(Copy, Clone, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct Block {
    /// The type of this block, encoded as a `BlockTypeSize` for compact storage.
    pub block_type: BlockTypeSize,
}

impl Block {
    /// An air block.
    pub const AIR: Block = Block { block_type: 0 };

    /// Creates a new block of the specified type.
    pub fn new(block_type: BlockType) -> Self {
        Block {
            block_type: block_type as BlockTypeSize,
        }
    }

    /// The decoded type of this block. Unknown values decode as air.
    pub fn block_type(&self) -> BlockType {
        BlockType::from_int(self.block_type).unwrap_or(BlockType::AIR)
    }

    /// Gets the texture indices for all faces of this block.
    pub fn texture_indices(&self) -> [usize; 6] {
        BLOCK_TYPE_TO_TEXTURE_INDICES[self.block_type() as usize]
    }
}

impl Default for Block {
    fn default() -> Self {
        Block::AIR
    }
}
