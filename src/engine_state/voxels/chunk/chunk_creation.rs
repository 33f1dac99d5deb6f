//! # Chunk Creation Module
//!
//! This module provides a push-order builder for filling a [`BlockGrid`] while keeping
//! the solidity bit vector and the block storage consistent.
//!
//! Blocks are pushed x-fastest, then y, then z, which is the storage order of the grid.
//! Generators push exactly `extents.volume()` blocks; anything else is reported as a
//! [`GridBuildError`] instead of producing a half-filled chunk.

use std::fmt;

use bitvec::vec::BitVec;

use crate::engine_state::voxels::{
    block::{block_type::BlockType, Block},
    coordinate::ChunkExtents,
};

use super::BlockGrid;

/// A generator pushed the wrong number of blocks into a [`BlockGridBuilder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridBuildError {
    /// More blocks were pushed than the grid can hold.
    Overfilled { capacity: usize },
    /// The grid was finished before every cell was written.
    Underfilled { expected: usize, actual: usize },
}

impl fmt::Display for GridBuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overfilled { capacity } => {
                write!(f, "pushed more blocks than the grid capacity of {capacity}")
            }
            Self::Underfilled { expected, actual } => {
                write!(f, "grid finished with {actual} of {expected} blocks written")
            }
        }
    }
}

impl std::error::Error for GridBuildError {}

/// A builder for creating and populating block grids.
///
/// Maintains the relationship between:
/// 1. The bit vector tracking solid blocks (`solid_array`)
/// 2. The vector storing block data (`blocks`)
pub struct BlockGridBuilder {
    /// Size of the grid being built
    extents: ChunkExtents,
    /// One bit per pushed block, set when the block is solid
    solid_array: BitVec,
    /// Every pushed block, air included
    blocks: Vec<Block>,
}

impl BlockGridBuilder {
    /// Creates a new, empty builder for a grid of the given size.
    pub fn new(extents: ChunkExtents) -> Self {
        let capacity = extents.volume();
        BlockGridBuilder {
            extents,
            solid_array: BitVec::with_capacity(capacity),
            blocks: Vec::with_capacity(capacity),
        }
    }

    /// The number of blocks pushed so far.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether nothing has been pushed yet.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Adds a block at the current position and advances the position.
    pub fn push_block_type(&mut self, block_type: BlockType) -> Result<(), GridBuildError> {
        let capacity = self.extents.volume();
        if self.blocks.len() >= capacity {
            return Err(GridBuildError::Overfilled { capacity });
        }

        self.solid_array.push(block_type.is_solid());
        self.blocks.push(Block::new(block_type));
        Ok(())
    }

    /// Finalizes the grid.
    ///
    /// # Errors
    /// Returns [`GridBuildError::Underfilled`] if not every cell was written.
    pub fn finish(self) -> Result<BlockGrid, GridBuildError> {
        let expected = self.extents.volume();
        if self.blocks.len() != expected {
            return Err(GridBuildError::Underfilled {
                expected,
                actual: self.blocks.len(),
            });
        }

        Ok(BlockGrid {
            extents: self.extents,
            solid_array: self.solid_array,
            blocks: self.blocks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_short_and_long_fills() {
        let extents = ChunkExtents::new(2, 2, 2);

        let mut builder = BlockGridBuilder::new(extents);
        for _ in 0..7 {
            builder.push_block_type(BlockType::DIRT).unwrap();
        }
        assert_eq!(
            builder.finish().err(),
            Some(GridBuildError::Underfilled {
                expected: 8,
                actual: 7
            })
        );

        let mut builder = BlockGridBuilder::new(extents);
        for _ in 0..8 {
            builder.push_block_type(BlockType::AIR).unwrap();
        }
        assert_eq!(
            builder.push_block_type(BlockType::AIR),
            Err(GridBuildError::Overfilled { capacity: 8 })
        );
    }

    #[test]
    fn push_order_is_x_then_y_then_z() {
        let extents = ChunkExtents::new(2, 3, 2);
        let mut builder = BlockGridBuilder::new(extents);
        for i in 0..extents.volume() {
            let block_type = if i == 1 || i == 2 || i == 6 {
                BlockType::WOOD
            } else {
                BlockType::AIR
            };
            builder.push_block_type(block_type).unwrap();
        }
        let grid = builder.finish().unwrap();

        assert!(grid.is_solid(1, 0, 0));
        assert!(grid.is_solid(0, 1, 0));
        assert!(grid.is_solid(0, 0, 1));
        assert!(!grid.is_solid(0, 0, 0));
        assert_eq!(grid.solid_count(), 3);
    }
}
