//! # Activation
//!
//! Bookkeeping for which chunks currently take part in meshing, drawing and collision.
//!
//! The active set is the square of chunks within the draw distance of the player's chunk.
//! Chunks leaving the square are deactivated (their mesh is released or parked according to
//! [`MeshRetention`]); chunks entering it are linked to their neighbors and queued for meshing.

use std::collections::HashSet;
use std::num::NonZeroUsize;

use serde::Deserialize;

use crate::engine_state::voxels::coordinate::ChunkCoordinate;

/// Ordered set of active chunk coordinates.
///
/// Iteration follows the order of the last activation pass, which is the row-major order of
/// the target square. Membership tests go through a hash set.
#[derive(Debug, Default, Clone)]
pub struct ActivationSet {
    order: Vec<ChunkCoordinate>,
    members: HashSet<ChunkCoordinate>,
}

impl ActivationSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `coordinate` is active.
    pub fn contains(&self, coordinate: ChunkCoordinate) -> bool {
        self.members.contains(&coordinate)
    }

    /// Number of active chunks.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether no chunk is active.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Active coordinates in activation order.
    pub fn as_slice(&self) -> &[ChunkCoordinate] {
        &self.order
    }

    /// Active coordinates in activation order.
    pub fn iter(&self) -> impl Iterator<Item = ChunkCoordinate> + '_ {
        self.order.iter().copied()
    }

    /// Members of this set that are not in `target`, in activation order.
    pub fn leaving(&self, target: &HashSet<ChunkCoordinate>) -> Vec<ChunkCoordinate> {
        self.order
            .iter()
            .filter(|coordinate| !target.contains(coordinate))
            .copied()
            .collect()
    }

    /// Replaces the contents with `order`.
    ///
    /// Duplicates in `order` are kept only at their first position.
    pub fn replace(&mut self, order: Vec<ChunkCoordinate>) {
        self.members.clear();
        self.order.clear();
        for coordinate in order {
            if self.members.insert(coordinate) {
                self.order.push(coordinate);
            }
        }
    }
}

/// What happens to the mesh of a chunk that leaves the active set.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum MeshRetention {
    /// Drop the mesh immediately; the chunk is remeshed if it comes back.
    #[default]
    Release,
    /// Keep the meshes of the `capacity` most recently deactivated chunks.
    RetainRecent {
        /// Maximum number of parked meshes
        capacity: NonZeroUsize,
    },
}

/// Outcome of one [`World::update`](super::World::update) call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationReport {
    /// The chunk the player is in
    pub center: ChunkCoordinate,
    /// Chunks that joined the active set, in activation order
    pub activated: Vec<ChunkCoordinate>,
    /// Chunks that left the active set
    pub deactivated: Vec<ChunkCoordinate>,
    /// Chunks newly created in the registry during this pass
    pub created: usize,
    /// Whether the pass was skipped because the player stayed in the same chunk
    pub skipped: bool,
}

impl ActivationReport {
    /// A report for a pass that did not touch the active set.
    pub fn unchanged(center: ChunkCoordinate, skipped: bool) -> Self {
        ActivationReport {
            center,
            activated: Vec::new(),
            deactivated: Vec::new(),
            created: 0,
            skipped,
        }
    }

    /// Whether the active set changed.
    pub fn changed(&self) -> bool {
        !self.activated.is_empty() || !self.deactivated.is_empty()
    }
}
