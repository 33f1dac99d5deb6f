//! # World Module
//!
//! The `World` ties the chunk registry, neighbor linking and activation together.
//!
//! ## Architecture
//!
//! Chunks live in a [`ChunkRegistry`] keyed by grid coordinate and are never evicted.
//! Around the player the world keeps an [`ActivationSet`]: the square of chunks within the
//! draw distance of the player's chunk. Each frame [`World::update`] reconciles that set with
//! the player's position and [`World::rebuild_dirty_meshes`] remeshes whatever the
//! reconciliation (or a block edit) invalidated.
//!
//! ## Key Components
//! - `registry` - Owning coordinate-to-chunk map with on-demand generation
//! - `neighbors` - Symmetric one-level neighbor linking
//! - `activation` - Active set, retention policy and pass reports

use std::collections::HashSet;
use std::num::NonZeroU32;

use cgmath::Point3;
use log::{debug, trace};
use lru::LruCache;
use web_time::Instant;

use crate::engine_state::rendering::meshing::{build_chunk_mesh, ChunkNeighborhood, Mesh, MeshId};

use super::{
    block::block_type::BlockType,
    chunk::Chunk,
    coordinate::{lying_between, ChunkCoordinate, Direction, WorldLayout, MAX_DRAW_DISTANCE},
    generation::ChunkGenerator,
};

mod activation;
mod neighbors;
mod registry;

pub use activation::{ActivationReport, ActivationSet, MeshRetention};
pub use neighbors::link_neighbors;
pub use registry::ChunkRegistry;

/// An active chunk that has a mesh, as handed to the renderer.
#[derive(Debug, Clone, Copy)]
pub struct ActiveChunk<'a> {
    /// Grid address
    pub coordinate: ChunkCoordinate,
    /// World-space minimum corner
    pub origin: Point3<f32>,
    /// Identity of `mesh`
    pub mesh_id: MeshId,
    /// Current geometry
    pub mesh: &'a Mesh,
}

/// A voxel world streamed around a moving position.
pub struct World {
    registry: ChunkRegistry,
    active: ActivationSet,
    draw_distance: i32,
    retention: MeshRetention,
    /// Deactivated chunks whose meshes are still resident, most recent first
    retained: Option<LruCache<ChunkCoordinate, ()>>,
    recompute_every_frame: bool,
    /// Position and center chunk of the last full activation pass
    last_update: Option<(Point3<f32>, ChunkCoordinate)>,
    next_mesh_id: u64,
}

impl World {
    /// Creates a world with no chunks.
    ///
    /// Nothing is generated until the first [`World::update`] or chunk query. The draw
    /// distance is capped at [`MAX_DRAW_DISTANCE`].
    pub fn new(
        layout: WorldLayout,
        draw_distance: NonZeroU32,
        generator: Box<dyn ChunkGenerator>,
    ) -> Self {
        World {
            registry: ChunkRegistry::new(layout, generator),
            active: ActivationSet::new(),
            draw_distance: draw_distance.get().min(MAX_DRAW_DISTANCE as u32) as i32,
            retention: MeshRetention::Release,
            retained: None,
            recompute_every_frame: false,
            last_update: None,
            next_mesh_id: 0,
        }
    }

    /// Sets what happens to the meshes of deactivated chunks.
    pub fn with_retention(mut self, retention: MeshRetention) -> Self {
        self.retained = match retention {
            MeshRetention::Release => None,
            MeshRetention::RetainRecent { capacity } => Some(LruCache::new(capacity)),
        };
        self.retention = retention;
        self
    }

    /// When set, every [`World::update`] runs a full activation pass.
    pub fn with_recompute_every_frame(mut self, recompute_every_frame: bool) -> Self {
        self.recompute_every_frame = recompute_every_frame;
        self
    }

    /// The grid layout.
    pub fn layout(&self) -> &WorldLayout {
        self.registry.layout()
    }

    /// Radius of the active square, in chunks.
    pub fn draw_distance(&self) -> i32 {
        self.draw_distance
    }

    /// Number of chunks created so far.
    pub fn registry_len(&self) -> usize {
        self.registry.len()
    }

    /// The center chunk of the last activation pass.
    pub fn center(&self) -> Option<ChunkCoordinate> {
        self.last_update.map(|(_, center)| center)
    }

    /// Active coordinates in activation order.
    pub fn active_coordinates(&self) -> &[ChunkCoordinate] {
        self.active.as_slice()
    }

    /// Whether the chunk at `coordinate` is active.
    pub fn is_active(&self, coordinate: ChunkCoordinate) -> bool {
        self.active.contains(coordinate)
    }

    /// The chunk covering `position`, created if it does not exist.
    pub fn get_chunk(&mut self, position: Point3<f32>) -> &Chunk {
        let coordinate = self.layout().coordinate_of(position);
        self.registry.get_or_create(coordinate)
    }

    /// The chunk at `coordinate`, if it exists.
    pub fn chunk_at(&self, coordinate: ChunkCoordinate) -> Option<&Chunk> {
        self.registry.get(coordinate)
    }

    /// Reconciles the active set with `position`.
    ///
    /// Chunks outside the draw distance square around the position's chunk are deactivated.
    /// Chunks inside it that were not active are linked to their four neighbors and marked
    /// for meshing unless they still hold a clean retained mesh.
    pub fn update(&mut self, position: Point3<f32>) -> ActivationReport {
        let layout = *self.layout();
        let center = layout.coordinate_of(position);

        if !self.recompute_every_frame {
            if let Some((last_position, last_center)) = self.last_update {
                if last_center == center && self.stayed_inside(last_position, position, last_center) {
                    self.last_update = Some((position, center));
                    return ActivationReport::unchanged(center, true);
                }
            }
        }

        let start = Instant::now();
        let registry_before = self.registry.len();

        let target = center.square_around(self.draw_distance);
        let target_members: HashSet<ChunkCoordinate> = target.iter().copied().collect();

        let deactivated = self.active.leaving(&target_members);
        for coordinate in &deactivated {
            self.deactivate(*coordinate);
        }

        let mut activated = Vec::new();
        for &coordinate in &target {
            if self.active.contains(coordinate) {
                continue;
            }
            self.activate(coordinate);
            activated.push(coordinate);
        }

        self.active.replace(target);
        self.last_update = Some((position, center));

        let report = ActivationReport {
            center,
            activated,
            deactivated,
            created: self.registry.len() - registry_before,
            skipped: false,
        };

        if report.changed() {
            debug!(
                "Activation around {:?}: +{} -{} active, {} created, {} total chunks in {:?}",
                center,
                report.activated.len(),
                report.deactivated.len(),
                report.created,
                self.registry.len(),
                start.elapsed()
            );
        }

        report
    }

    /// Remeshes every dirty active chunk against its linked neighbors.
    ///
    /// # Returns
    /// The number of meshes built.
    pub fn rebuild_dirty_meshes(&mut self) -> usize {
        let dirty: Vec<ChunkCoordinate> = self
            .active
            .iter()
            .filter(|coordinate| {
                self.registry
                    .get(*coordinate)
                    .map(|chunk| chunk.dirty)
                    .unwrap_or(false)
            })
            .collect();

        if dirty.is_empty() {
            return 0;
        }

        let start = Instant::now();
        for &coordinate in &dirty {
            let Some(mesh) = self.mesh_chunk(coordinate) else {
                continue;
            };
            let mesh_id = MeshId(self.next_mesh_id);
            self.next_mesh_id += 1;

            if let Some(chunk) = self.registry.get_mut(coordinate) {
                chunk.mesh = Some(mesh);
                chunk.mesh_id = Some(mesh_id);
                chunk.dirty = false;
            }
        }

        debug!("Rebuilt {} chunk meshes in {:?}", dirty.len(), start.elapsed());
        dirty.len()
    }

    /// Active chunks that have a mesh, in activation order.
    pub fn active_chunks(&self) -> impl Iterator<Item = ActiveChunk<'_>> + '_ {
        self.active.iter().filter_map(move |coordinate| {
            let chunk = self.registry.get(coordinate)?;
            Some(ActiveChunk {
                coordinate,
                origin: chunk.origin,
                mesh_id: chunk.mesh_id?,
                mesh: chunk.mesh.as_ref()?,
            })
        })
    }

    /// Whether the block cell containing `position` is solid.
    ///
    /// Positions above or below the chunk column are never solid. The owning chunk is created
    /// if needed.
    pub fn is_solid_at(&mut self, position: Point3<f32>) -> bool {
        let Some((coordinate, local)) = self.layout().local_block(position) else {
            return false;
        };
        self.registry
            .get_or_create(coordinate)
            .grid
            .is_solid(local.x as i32, local.y as i32, local.z as i32)
    }

    /// Replaces the block containing `position`.
    ///
    /// The owning chunk is marked dirty, and so is the neighbor across any lateral face the
    /// cell touches.
    ///
    /// # Returns
    /// `true` if a block changed.
    pub fn set_block_at(&mut self, position: Point3<f32>, block_type: BlockType) -> bool {
        let extents = self.layout().extents;
        let Some((coordinate, local)) = self.layout().local_block(position) else {
            return false;
        };
        let (x, y, z) = (local.x as i32, local.y as i32, local.z as i32);

        let chunk = self.registry.get_or_create(coordinate);
        if !chunk.grid.set(x, y, z, block_type) {
            return false;
        }
        chunk.dirty = true;

        let touching = [
            (x == 0, Direction::West),
            (x == extents.x - 1, Direction::East),
            (z == 0, Direction::North),
            (z == extents.z - 1, Direction::South),
        ];
        for (on_edge, direction) in touching {
            if !on_edge {
                continue;
            }
            if let Some(neighbor) = self.registry.get_mut(coordinate.offset(direction)) {
                neighbor.dirty = true;
            }
        }

        trace!("Set block {:?} in chunk {:?} to {:?}", local, coordinate, block_type);
        true
    }

    fn stayed_inside(
        &self,
        last_position: Point3<f32>,
        position: Point3<f32>,
        last_center: ChunkCoordinate,
    ) -> bool {
        let (low_x, high_x) = self.layout().chunk_bounds_x(last_center);
        let (low_z, high_z) = self.layout().chunk_bounds_z(last_center);
        lying_between(last_position.x, position.x - last_position.x, low_x, high_x)
            && lying_between(last_position.z, position.z - last_position.z, low_z, high_z)
    }

    fn activate(&mut self, coordinate: ChunkCoordinate) {
        link_neighbors(&mut self.registry, coordinate);

        if let Some(retained) = self.retained.as_mut() {
            retained.pop(&coordinate);
        }
        if let Some(chunk) = self.registry.get_mut(coordinate) {
            if chunk.mesh.is_none() {
                chunk.dirty = true;
            }
        }
        trace!("Activated chunk {:?}", coordinate);
    }

    fn deactivate(&mut self, coordinate: ChunkCoordinate) {
        match (self.retention, self.retained.as_mut()) {
            (MeshRetention::RetainRecent { .. }, Some(retained)) => {
                if let Some((evicted, ())) = retained.push(coordinate, ()) {
                    if evicted != coordinate {
                        if let Some(chunk) = self.registry.get_mut(evicted) {
                            chunk.release_mesh();
                        }
                    }
                }
            }
            _ => {
                if let Some(chunk) = self.registry.get_mut(coordinate) {
                    chunk.release_mesh();
                }
            }
        }
        trace!("Deactivated chunk {:?}", coordinate);
    }

    fn mesh_chunk(&self, coordinate: ChunkCoordinate) -> Option<Mesh> {
        let chunk = self.registry.get(coordinate)?;
        let mut neighbors = [None; 4];
        for direction in Direction::ALL {
            neighbors[direction.index()] = chunk
                .neighbor(direction)
                .and_then(|neighbor| self.registry.get(neighbor))
                .map(|neighbor| &neighbor.grid);
        }
        Some(build_chunk_mesh(&ChunkNeighborhood {
            center: &chunk.grid,
            neighbors,
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use super::*;
    use crate::engine_state::voxels::{
        coordinate::ChunkExtents,
        generation::{ColumnGenerator, PatternGenerator},
    };

    fn layout() -> WorldLayout {
        WorldLayout::new(Point3::new(0.0, 0.0, 0.0), ChunkExtents::new(16, 32, 16))
    }

    fn world(draw_distance: u32) -> World {
        World::new(
            layout(),
            NonZeroU32::new(draw_distance).unwrap(),
            Box::new(ColumnGenerator::flat(4)),
        )
    }

    fn at(x: f32, z: f32) -> Point3<f32> {
        Point3::new(x, 10.0, z)
    }

    #[test]
    fn first_update_activates_the_full_square() {
        let mut world = world(2);
        let report = world.update(at(0.0, 0.0));

        assert!(!report.skipped);
        assert_eq!(report.center, ChunkCoordinate::new(0, 0));
        assert_eq!(report.activated.len(), 25);
        assert!(report.deactivated.is_empty());
        assert_eq!(world.active_coordinates().len(), 25);
        // 7x7 minus the four corners that no active chunk borders
        assert_eq!(world.registry_len(), 45);
        assert_eq!(report.created, 45);
    }

    #[test]
    fn every_active_chunk_is_fully_linked() {
        let mut world = world(2);
        world.update(at(5.0, -30.0));
        for &coordinate in world.active_coordinates() {
            let chunk = world.chunk_at(coordinate).unwrap();
            assert!(chunk.neighbors_linked(), "{:?} is missing links", coordinate);
            for direction in Direction::ALL {
                let neighbor = world.chunk_at(coordinate.offset(direction)).unwrap();
                assert_eq!(neighbor.neighbor(direction.opposite()), Some(coordinate));
            }
        }
    }

    #[test]
    fn crossing_a_boundary_shifts_the_square() {
        let mut world = world(2);
        world.update(at(0.0, 0.0));
        let report = world.update(at(16.0, 0.0));

        assert_eq!(report.center, ChunkCoordinate::new(1, 0));
        assert_eq!(report.activated.len(), 5);
        assert_eq!(report.deactivated.len(), 5);
        assert!(report.activated.iter().all(|c| c.x == 3));
        assert!(report.deactivated.iter().all(|c| c.x == -2));
        assert_eq!(world.active_coordinates().len(), 25);
        assert!(world
            .active_coordinates()
            .iter()
            .all(|c| c.chebyshev_distance(ChunkCoordinate::new(1, 0)) <= 2));
    }

    #[test]
    fn repeating_a_position_changes_nothing() {
        let mut world = world(2);
        world.update(at(3.0, 3.0));
        let active = world.active_coordinates().to_vec();
        let registry = world.registry_len();

        let report = world.update(at(3.0, 3.0));
        assert!(report.skipped);
        assert!(!report.changed());
        assert_eq!(world.active_coordinates(), active.as_slice());
        assert_eq!(world.registry_len(), registry);
    }

    #[test]
    fn skipping_agrees_with_full_recomputation() {
        let path = [
            at(1.0, 1.0),
            at(8.0, 15.9),
            at(15.99, 2.0),
            at(16.0, 2.0),
            at(-0.01, -0.01),
            at(-40.0, 70.0),
            at(-39.0, 71.0),
        ];

        let mut skipping = world(2);
        let mut recomputing = world(2).with_recompute_every_frame(true);
        for position in path {
            let a = skipping.update(position);
            let b = recomputing.update(position);
            assert_eq!(a.center, b.center);
            assert_eq!(skipping.active_coordinates(), recomputing.active_coordinates());
            assert!(!b.skipped);
        }
        assert_eq!(skipping.registry_len(), recomputing.registry_len());
    }

    #[test]
    fn registry_only_grows() {
        let mut world = world(1);
        let mut previous = 0;
        for step in 0..12 {
            world.update(at(step as f32 * 7.0, -(step as f32) * 5.0));
            assert!(world.registry_len() >= previous);
            previous = world.registry_len();
        }
        world.update(at(0.0, 0.0));
        assert_eq!(world.registry_len(), previous);
    }

    #[test]
    fn links_survive_deactivation() {
        let mut world = world(1);
        world.update(at(0.0, 0.0));
        world.update(at(100.0, 0.0));

        let old = world.chunk_at(ChunkCoordinate::new(0, 0)).unwrap();
        assert!(!world.is_active(ChunkCoordinate::new(0, 0)));
        assert!(old.neighbors_linked());
        assert!(old.mesh.is_none());
    }

    #[test]
    fn rebuild_meshes_every_new_active_chunk_once() {
        let mut world = world(1);
        world.update(at(0.0, 0.0));
        assert_eq!(world.rebuild_dirty_meshes(), 9);
        assert_eq!(world.rebuild_dirty_meshes(), 0);
        assert_eq!(world.active_chunks().count(), 9);

        let ids: HashSet<MeshId> = world.active_chunks().map(|chunk| chunk.mesh_id).collect();
        assert_eq!(ids.len(), 9);
    }

    #[test]
    fn linked_neighbors_hide_shared_walls() {
        let mut world = World::new(
            layout(),
            NonZeroU32::new(1).unwrap(),
            Box::new(PatternGenerator::Solid),
        );
        world.update(at(0.0, 0.0));
        world.rebuild_dirty_meshes();

        let center = world.chunk_at(ChunkCoordinate::new(0, 0)).unwrap();
        let mesh = center.mesh.as_ref().unwrap();
        // A solid chunk surrounded by solid chunks only shows its top and bottom
        assert_eq!(mesh.covered_faces(), 2 * 16 * 16);
    }

    #[test]
    fn release_policy_drops_meshes_of_deactivated_chunks() {
        let mut world = world(1);
        world.update(at(0.0, 0.0));
        world.rebuild_dirty_meshes();
        world.update(at(100.0, 0.0));
        world.rebuild_dirty_meshes();
        world.update(at(0.0, 0.0));

        assert_eq!(world.rebuild_dirty_meshes(), 9);
    }

    #[test]
    fn retained_meshes_skip_the_rebuild() {
        let mut world = world(1).with_retention(MeshRetention::RetainRecent {
            capacity: NonZeroUsize::new(18).unwrap(),
        });
        world.update(at(0.0, 0.0));
        world.rebuild_dirty_meshes();
        let before = world.chunk_at(ChunkCoordinate::new(0, 0)).unwrap().mesh_id;

        world.update(at(100.0, 0.0));
        world.rebuild_dirty_meshes();
        world.update(at(0.0, 0.0));

        assert_eq!(world.rebuild_dirty_meshes(), 0);
        assert_eq!(world.chunk_at(ChunkCoordinate::new(0, 0)).unwrap().mesh_id, before);
    }

    #[test]
    fn retention_evicts_least_recently_deactivated() {
        let mut world = world(1).with_retention(MeshRetention::RetainRecent {
            capacity: NonZeroUsize::new(9).unwrap(),
        });
        world.update(at(0.0, 0.0));
        world.rebuild_dirty_meshes();
        world.update(at(100.0, 0.0));
        world.rebuild_dirty_meshes();
        world.update(at(200.0, 0.0));

        assert!(world.chunk_at(ChunkCoordinate::new(0, 0)).unwrap().mesh.is_none());
        assert!(world.chunk_at(ChunkCoordinate::new(6, 0)).unwrap().mesh.is_some());
    }

    #[test]
    fn collision_queries_follow_the_terrain() {
        let mut world = world(1);
        assert!(world.is_solid_at(Point3::new(3.5, 3.5, -7.5)));
        assert!(!world.is_solid_at(Point3::new(3.5, 4.5, -7.5)));
        assert!(!world.is_solid_at(Point3::new(3.5, -1.0, -7.5)));
        assert!(!world.is_solid_at(Point3::new(3.5, 40.0, -7.5)));
    }

    #[test]
    fn editing_a_boundary_block_dirties_the_neighbor() {
        let mut world = world(1);
        world.update(at(8.0, 8.0));
        world.rebuild_dirty_meshes();

        assert!(world.set_block_at(Point3::new(15.5, 4.5, 8.5), BlockType::WOOD));
        assert!(!world.set_block_at(Point3::new(15.5, 4.5, 8.5), BlockType::WOOD));
        assert!(world.chunk_at(ChunkCoordinate::new(0, 0)).unwrap().dirty);
        assert!(world.chunk_at(ChunkCoordinate::new(1, 0)).unwrap().dirty);
        assert!(!world.chunk_at(ChunkCoordinate::new(0, 1)).unwrap().dirty);
        assert_eq!(world.rebuild_dirty_meshes(), 2);

        assert!(!world.set_block_at(Point3::new(15.5, 99.0, 8.5), BlockType::WOOD));
    }

    #[test]
    fn oversized_draw_distance_is_capped() {
        let mut world = World::new(
            WorldLayout::new(Point3::new(0.0, 0.0, 0.0), ChunkExtents::new(2, 2, 2)),
            NonZeroU32::new(u32::MAX).unwrap(),
            Box::new(PatternGenerator::Empty),
        );
        assert_eq!(world.draw_distance(), MAX_DRAW_DISTANCE);

        let report = world.update(Point3::new(0.0, 0.0, 0.0));
        let side = (2 * MAX_DRAW_DISTANCE + 1) as usize;
        assert_eq!(report.activated.len(), side * side);
    }
}
