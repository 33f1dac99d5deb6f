//! Mesh data structures for voxel rendering.
//!
//! # Architecture
//! - [`Mesh`]: a complete chunk mesh, split into one [`MeshSide`] per block side
//! - [`Face`]: a single quad with its corners, block type and side

mod face;
#[allow(clippy::module_inception)]
mod mesh;

pub use face::Face;
pub use mesh::{Mesh, MeshSide};
