//! # Voxel World
//!
//! Everything that describes the world independently of how it is drawn.
//!
//! ## Architecture
//!
//! * **Block**: block types, sides and their texture mapping
//! * **Chunk**: fixed-size block grids and the per-chunk mesh state
//! * **Coordinate**: the chunk grid and conversions between world space and chunk space
//! * **Generation**: pluggable terrain generators
//! * **World**: the chunk registry and the active set streamed around the player
//!
//! ## Data Flow
//!
//! 1. The player's position is mapped to its chunk coordinate
//! 2. The world activates the square of chunks around it, generating and linking as needed
//! 3. Newly active or edited chunks are remeshed against their neighbors
//! 4. The meshes of active chunks are handed to the renderer

pub mod block;
pub mod chunk;
pub mod coordinate;
pub mod generation;
pub mod world;
