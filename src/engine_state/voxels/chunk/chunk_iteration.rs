//! # Chunk Iteration Module
//!
//! This module provides an iterator over the solid blocks of a [`BlockGrid`].
//!
//! The iterator walks the `solid_array` bit vector to skip air quickly and only
//! touches the block storage for cells whose bit is set.

use cgmath::Point3;

use crate::engine_state::voxels::block::Block;

use super::BlockGrid;

/// An iterator over all non-air blocks in a grid, in storage order.
pub struct SolidBlocks<'a> {
    /// Grid being iterated over
    grid: &'a BlockGrid,
    /// Next storage index to inspect
    current_offset: usize,
}

impl<'a> SolidBlocks<'a> {
    /// Creates a new iterator positioned before the first cell of `grid`.
    pub fn new(grid: &'a BlockGrid) -> Self {
        SolidBlocks {
            grid,
            current_offset: 0,
        }
    }
}

impl<'a> Iterator for SolidBlocks<'a> {
    type Item = (Point3<usize>, Block);

    fn next(&mut self) -> Option<Self::Item> {
        let solid_array = &self.grid.solid_array;

        while self.current_offset < solid_array.len() && !solid_array[self.current_offset] {
            self.current_offset += 1;
        }

        if self.current_offset >= solid_array.len() {
            return None;
        }

        let offset = self.current_offset;
        self.current_offset += 1;

        Some((self.grid.position_of(offset), self.grid.blocks[offset]))
    }
}
