//! # Chunk Registry
//!
//! The registry owns every chunk the world has ever created, keyed by grid coordinate.
//! Keying (rather than appending to a list) is what guarantees a single chunk instance per
//! coordinate: a second request for the same key always lands on the existing entry.
//!
//! Chunks are never evicted, so the registry only grows while the world is alive.

use std::collections::HashMap;

use log::{error, trace};

use crate::engine_state::voxels::{
    chunk::{BlockGrid, Chunk},
    coordinate::{ChunkCoordinate, WorldLayout},
    generation::ChunkGenerator,
};

/// Owning map from chunk coordinate to chunk, plus the generator that fills new entries.
pub struct ChunkRegistry {
    /// Grid anchor and chunk size shared by every chunk
    layout: WorldLayout,
    /// Every chunk created so far
    chunks: HashMap<ChunkCoordinate, Chunk>,
    /// Source of block content for newly requested coordinates
    generator: Box<dyn ChunkGenerator>,
}

impl ChunkRegistry {
    /// Creates an empty registry.
    pub fn new(layout: WorldLayout, generator: Box<dyn ChunkGenerator>) -> Self {
        ChunkRegistry {
            layout,
            chunks: HashMap::new(),
            generator,
        }
    }

    /// The layout chunks are created with.
    pub fn layout(&self) -> &WorldLayout {
        &self.layout
    }

    /// Number of chunks created so far.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether no chunk has been created yet.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Whether a chunk exists at `coordinate`.
    pub fn contains(&self, coordinate: ChunkCoordinate) -> bool {
        self.chunks.contains_key(&coordinate)
    }

    /// The chunk at `coordinate`, without creating it.
    pub fn get(&self, coordinate: ChunkCoordinate) -> Option<&Chunk> {
        self.chunks.get(&coordinate)
    }

    /// Mutable access to the chunk at `coordinate`, without creating it.
    pub fn get_mut(&mut self, coordinate: ChunkCoordinate) -> Option<&mut Chunk> {
        self.chunks.get_mut(&coordinate)
    }

    /// The chunk at `coordinate`, generating and inserting it first if needed.
    pub fn get_or_create(&mut self, coordinate: ChunkCoordinate) -> &mut Chunk {
        let layout = &self.layout;
        let generator = self.generator.as_ref();
        self.chunks
            .entry(coordinate)
            .or_insert_with(|| Self::generate_chunk(generator, layout, coordinate))
    }

    /// Makes sure a chunk exists at `coordinate`.
    ///
    /// # Returns
    /// `true` if the chunk was created by this call.
    pub fn ensure(&mut self, coordinate: ChunkCoordinate) -> bool {
        if self.contains(coordinate) {
            return false;
        }
        self.get_or_create(coordinate);
        true
    }

    /// Coordinates of every chunk, in no particular order.
    pub fn coordinates(&self) -> impl Iterator<Item = ChunkCoordinate> + '_ {
        self.chunks.keys().copied()
    }

    fn generate_chunk(
        generator: &dyn ChunkGenerator,
        layout: &WorldLayout,
        coordinate: ChunkCoordinate,
    ) -> Chunk {
        let grid = match generator.generate(coordinate, layout) {
            Ok(grid) if grid.extents() == layout.extents => grid,
            Ok(grid) => {
                error!(
                    "Generator returned a {:?} grid for chunk {:?}, expected {:?}; using an empty chunk",
                    grid.extents(),
                    coordinate,
                    layout.extents
                );
                BlockGrid::empty(layout.extents)
            }
            Err(e) => {
                error!("Failed to generate chunk {:?}: {}; using an empty chunk", coordinate, e);
                BlockGrid::empty(layout.extents)
            }
        };

        trace!("Created chunk {:?} with {} solid blocks", coordinate, grid.solid_count());
        Chunk::new(coordinate, layout.chunk_origin(coordinate), grid)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use cgmath::Point3;

    use super::*;
    use crate::engine_state::voxels::{
        chunk::{BlockGridBuilder, GridBuildError},
        coordinate::ChunkExtents,
        generation::PatternGenerator,
    };

    struct CountingGenerator {
        calls: Rc<Cell<usize>>,
    }

    impl ChunkGenerator for CountingGenerator {
        fn generate(
            &self,
            coordinate: ChunkCoordinate,
            layout: &WorldLayout,
        ) -> Result<BlockGrid, GridBuildError> {
            self.calls.set(self.calls.get() + 1);
            PatternGenerator::Solid.generate(coordinate, layout)
        }
    }

    struct BrokenGenerator;

    impl ChunkGenerator for BrokenGenerator {
        fn generate(
            &self,
            _coordinate: ChunkCoordinate,
            layout: &WorldLayout,
        ) -> Result<BlockGrid, GridBuildError> {
            BlockGridBuilder::new(layout.extents).finish()
        }
    }

    fn layout() -> WorldLayout {
        WorldLayout::new(Point3::new(0.0, 0.0, 0.0), ChunkExtents::new(4, 4, 4))
    }

    #[test]
    fn repeated_requests_generate_once() {
        let calls = Rc::new(Cell::new(0));
        let mut registry = ChunkRegistry::new(
            layout(),
            Box::new(CountingGenerator {
                calls: calls.clone(),
            }),
        );

        registry.get_or_create(ChunkCoordinate::new(2, -1));
        assert!(!registry.ensure(ChunkCoordinate::new(2, -1)));
        registry.get_or_create(ChunkCoordinate::new(2, -1));

        assert_eq!(calls.get(), 1);
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.get(ChunkCoordinate::new(2, -1)).unwrap().origin,
            Point3::new(8.0, 0.0, -4.0)
        );
    }

    #[test]
    fn broken_generator_output_becomes_an_empty_chunk() {
        let mut registry = ChunkRegistry::new(layout(), Box::new(BrokenGenerator));
        let chunk = registry.get_or_create(ChunkCoordinate::new(0, 0));
        assert_eq!(chunk.grid.solid_count(), 0);
        assert_eq!(chunk.grid.extents(), layout().extents);
    }
}
