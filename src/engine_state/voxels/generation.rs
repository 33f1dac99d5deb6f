//! # Chunk Generation
//!
//! Block content for a chunk is produced by a [`ChunkGenerator`], invoked by the world
//! registry the first time a coordinate is requested. The world treats generators as pure:
//! asking twice for the same coordinate must yield the same blocks.
//!
//! Multiple generation strategies are built in, selected through [`GenerationMethod`]:
//! - Perlin noise height map for natural-looking terrain
//! - Flat ground at a fixed height
//! - Checkerboard pattern for testing
//! - Solid chunks (all blocks filled)
//! - Empty chunks (all blocks air)

use noise::{NoiseFn, Perlin};
use serde::Deserialize;

use super::{
    block::block_type::BlockType,
    chunk::{BlockGrid, BlockGridBuilder, GridBuildError},
    coordinate::{ChunkCoordinate, WorldLayout},
};

/// Produces the block content of a chunk.
pub trait ChunkGenerator {
    /// Builds the blocks of the chunk at `coordinate`.
    ///
    /// # Errors
    /// A generator that writes the wrong number of blocks reports a [`GridBuildError`].
    fn generate(
        &self,
        coordinate: ChunkCoordinate,
        layout: &WorldLayout,
    ) -> Result<BlockGrid, GridBuildError>;
}

/// The built-in generation strategies, as named in the configuration file.
#[derive(Copy, Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum GenerationMethod {
    /// Rolling hills from 2D Perlin noise: grass on top, dirt below.
    Perlin {
        /// Noise seed
        #[serde(default)]
        seed: u32,
        /// Scaling applied to world block coordinates before sampling
        #[serde(default = "default_perlin_scale")]
        scale: f64,
        /// Surface height in blocks where the noise is zero
        #[serde(default = "default_perlin_base_height")]
        base_height: i32,
        /// Maximum deviation in blocks from `base_height`
        #[serde(default = "default_perlin_amplitude")]
        amplitude: f64,
    },
    /// Level ground: dirt up to `height`, grass on the top layer.
    Flat {
        /// Number of solid layers
        height: i32,
    },
    /// Alternating solid and air cells in all three axes.
    Checkerboard,
    /// Every cell solid.
    Solid,
    /// Every cell air.
    Empty,
}

fn default_perlin_scale() -> f64 {
    0.02
}

fn default_perlin_base_height() -> i32 {
    8
}

fn default_perlin_amplitude() -> f64 {
    6.0
}

impl Default for GenerationMethod {
    fn default() -> Self {
        GenerationMethod::Perlin {
            seed: 0,
            scale: default_perlin_scale(),
            base_height: default_perlin_base_height(),
            amplitude: default_perlin_amplitude(),
        }
    }
}

impl GenerationMethod {
    /// Builds the generator this method describes.
    pub fn build(self) -> Box<dyn ChunkGenerator> {
        match self {
            GenerationMethod::Perlin {
                seed,
                scale,
                base_height,
                amplitude,
            } => Box::new(PerlinGenerator::new(seed, scale, base_height, amplitude)),
            GenerationMethod::Flat { height } => Box::new(ColumnGenerator::flat(height)),
            GenerationMethod::Checkerboard => Box::new(PatternGenerator::Checkerboard),
            GenerationMethod::Solid => Box::new(PatternGenerator::Solid),
            GenerationMethod::Empty => Box::new(PatternGenerator::Empty),
        }
    }
}

/// Fills a grid column by column from a surface height function.
fn fill_from_heights<F>(
    coordinate: ChunkCoordinate,
    layout: &WorldLayout,
    surface_height: F,
) -> Result<BlockGrid, GridBuildError>
where
    F: Fn(i32, i32) -> i32,
{
    let extents = layout.extents;
    let base_x = coordinate.x.saturating_mul(extents.x);
    let base_z = coordinate.z.saturating_mul(extents.z);

    let heights: Vec<i32> = (0..extents.z)
        .flat_map(|k| (0..extents.x).map(move |i| (i, k)))
        .map(|(i, k)| surface_height(base_x.saturating_add(i), base_z.saturating_add(k)))
        .collect();

    let mut builder = BlockGridBuilder::new(extents);
    for k in 0..extents.z {
        for j in 0..extents.y {
            for i in 0..extents.x {
                let height = heights[(i + k * extents.x) as usize];
                let block_type = if j >= height {
                    BlockType::AIR
                } else if j + 1 == height {
                    BlockType::GRASS
                } else {
                    BlockType::DIRT
                };
                builder.push_block_type(block_type)?;
            }
        }
    }

    builder.finish()
}

/// Largest surface height or terrain amplitude accepted from configuration, in blocks.
pub const MAX_TERRAIN_HEIGHT: i32 = 1 << 16;

/// Height-map terrain sampled from 2D Perlin noise.
pub struct PerlinGenerator {
    perlin: Perlin,
    scale: f64,
    base_height: i32,
    amplitude: f64,
}

impl PerlinGenerator {
    /// Creates a Perlin terrain generator.
    pub fn new(seed: u32, scale: f64, base_height: i32, amplitude: f64) -> Self {
        PerlinGenerator {
            perlin: Perlin::new(seed),
            scale,
            base_height,
            amplitude,
        }
    }

    /// Surface height in blocks at the given world block column.
    pub fn surface_height(&self, x: i32, z: i32) -> i32 {
        let sample = self.perlin.get([x as f64 * self.scale, z as f64 * self.scale]);
        self.base_height.saturating_add((sample * self.amplitude).round() as i32)
    }
}

impl ChunkGenerator for PerlinGenerator {
    fn generate(
        &self,
        coordinate: ChunkCoordinate,
        layout: &WorldLayout,
    ) -> Result<BlockGrid, GridBuildError> {
        fill_from_heights(coordinate, layout, |x, z| self.surface_height(x, z))
    }
}

/// Terrain with the same surface height everywhere.
pub struct ColumnGenerator {
    height: i32,
}

impl ColumnGenerator {
    /// Level ground `height` blocks tall.
    pub fn flat(height: i32) -> Self {
        ColumnGenerator { height }
    }
}

impl ChunkGenerator for ColumnGenerator {
    fn generate(
        &self,
        coordinate: ChunkCoordinate,
        layout: &WorldLayout,
    ) -> Result<BlockGrid, GridBuildError> {
        fill_from_heights(coordinate, layout, |_, _| self.height)
    }
}

/// Content-independent test patterns.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PatternGenerator {
    /// Alternating solid and air cells
    Checkerboard,
    /// Every cell solid
    Solid,
    /// Every cell air
    Empty,
}

impl ChunkGenerator for PatternGenerator {
    fn generate(
        &self,
        _coordinate: ChunkCoordinate,
        layout: &WorldLayout,
    ) -> Result<BlockGrid, GridBuildError> {
        let extents = layout.extents;
        if *self == PatternGenerator::Empty {
            return Ok(BlockGrid::empty(extents));
        }

        let mut builder = BlockGridBuilder::new(extents);
        for k in 0..extents.z {
            for j in 0..extents.y {
                for i in 0..extents.x {
                    let block_type = match self {
                        PatternGenerator::Checkerboard if (i + j + k) % 2 == 0 => BlockType::WHITE,
                        PatternGenerator::Checkerboard => BlockType::AIR,
                        _ => BlockType::DIRT,
                    };
                    builder.push_block_type(block_type)?;
                }
            }
        }

        builder.finish()
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Point3;

    use super::*;
    use crate::engine_state::voxels::coordinate::ChunkExtents;

    fn layout() -> WorldLayout {
        WorldLayout::new(Point3::new(0.0, 0.0, 0.0), ChunkExtents::new(8, 16, 8))
    }

    #[test]
    fn perlin_generation_is_pure() {
        let generator = GenerationMethod::default().build();
        let coordinate = ChunkCoordinate::new(-3, 7);
        let first = generator.generate(coordinate, &layout()).unwrap();
        let second = generator.generate(coordinate, &layout()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn flat_ground_has_grass_on_top() {
        let grid = ColumnGenerator::flat(3)
            .generate(ChunkCoordinate::new(0, 0), &layout())
            .unwrap();
        assert_eq!(grid.get(4, 2, 4).block_type(), BlockType::GRASS);
        assert_eq!(grid.get(4, 0, 4).block_type(), BlockType::DIRT);
        assert!(!grid.is_solid(4, 3, 4));
        assert_eq!(grid.solid_count(), 8 * 8 * 3);
    }

    #[test]
    fn patterns_fill_as_named() {
        let solid = PatternGenerator::Solid
            .generate(ChunkCoordinate::new(0, 0), &layout())
            .unwrap();
        assert_eq!(solid.solid_count(), layout().extents.volume());

        let checkerboard = PatternGenerator::Checkerboard
            .generate(ChunkCoordinate::new(0, 0), &layout())
            .unwrap();
        assert_eq!(checkerboard.solid_count(), layout().extents.volume() / 2);
        assert!(checkerboard.is_solid(0, 0, 0));
        assert!(!checkerboard.is_solid(1, 0, 0));
    }

    #[test]
    fn generation_method_parses_from_tagged_json() {
        let method: GenerationMethod =
            serde_json::from_str(r#"{ "method": "flat", "height": 4 }"#).unwrap();
        assert_eq!(method, GenerationMethod::Flat { height: 4 });

        let method: GenerationMethod = serde_json::from_str(r#"{ "method": "perlin", "seed": 9 }"#).unwrap();
        assert!(matches!(method, GenerationMethod::Perlin { seed: 9, .. }));
    }

    #[test]
    fn extreme_heights_saturate() {
        let towering = PerlinGenerator::new(1, 0.02, i32::MAX, 1e12);
        assert_eq!(towering.surface_height(0, 0), i32::MAX);
        let grid = towering.generate(ChunkCoordinate::new(0, 0), &layout()).unwrap();
        assert_eq!(grid.extents(), layout().extents);

        let sunken = ColumnGenerator::flat(i32::MIN)
            .generate(ChunkCoordinate::new(0, 0), &layout())
            .unwrap();
        assert_eq!(sunken.solid_count(), 0);
    }
}
