//! # Block Type Module
//!
//! This module defines the different types of blocks in the voxel world
//! and the conversion from their compact storage form.

use num_derive::FromPrimitive;

use super::BlockTypeSize;

/// Enumerates all possible block types in the voxel world.
///
/// The `FromPrimitive` derive allows conversion back from the compact
/// `BlockTypeSize` stored in each [`Block`](super::Block).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockType {
    /// An air block, which is non-solid and transparent.
    AIR,

    /// A basic dirt block, found under the surface layer.
    DIRT,

    /// A grass block with different textures on top and sides.
    GRASS,

    /// A wooden block with a bark texture on all sides.
    WOOD,

    /// A plain white block, used by the test patterns.
    WHITE,
}

impl BlockType {
    /// Converts a `BlockTypeSize` to a `BlockType`.
    ///
    /// # Returns
    /// `None` if the value does not name a block type.
    pub fn from_int(btype: BlockTypeSize) -> Option<Self> {
        num_traits::FromPrimitive::from_u8(btype)
    }

    /// Whether blocks of this type occlude faces and stop movement.
    pub fn is_solid(self) -> bool {
        self != BlockType::AIR
    }
}
