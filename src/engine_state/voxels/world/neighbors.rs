//! # Neighbor Linking
//!
//! Meshing a chunk needs the edge blocks of its four lateral neighbors, so a chunk must have
//! every neighbor materialized and linked before it is drawn. Linking creates missing
//! neighbors through the registry and records the relation on both sides.
//!
//! Linking is one level deep: a neighbor created here receives only the link back to the
//! chunk that asked for it and is not linked any further.

use log::trace;

use crate::engine_state::voxels::coordinate::{ChunkCoordinate, Direction};

use super::registry::ChunkRegistry;

/// Creates and links the four lateral neighbors of the chunk at `coordinate`.
///
/// The chunk itself is created if it does not exist yet. A neighbor that already has a mesh
/// and only now learns about this chunk is marked dirty, since its edge faces were culled
/// against air.
///
/// # Returns
/// The number of neighbor chunks created.
pub fn link_neighbors(registry: &mut ChunkRegistry, coordinate: ChunkCoordinate) -> usize {
    registry.ensure(coordinate);

    let mut created = 0;
    for direction in Direction::ALL {
        let neighbor_coordinate = coordinate.offset(direction);
        if registry.ensure(neighbor_coordinate) {
            created += 1;
        }

        if let Some(neighbor) = registry.get_mut(neighbor_coordinate) {
            let back_link = &mut neighbor.neighbors[direction.opposite().index()];
            if back_link.is_none() && neighbor.mesh.is_some() {
                neighbor.dirty = true;
            }
            *back_link = Some(coordinate);
        }

        if let Some(chunk) = registry.get_mut(coordinate) {
            chunk.neighbors[direction.index()] = Some(neighbor_coordinate);
        }
    }

    trace!("Linked neighbors of {:?}, {} created", coordinate, created);
    created
}
