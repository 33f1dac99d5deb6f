//! # Rendering Boundary
//!
//! The engine never talks to a graphics API itself. Once per frame it hands the active chunks
//! to a [`ChunkRenderer`]: one [`DrawCall`] per chunk, each carrying the chunk's mesh and the
//! model transform placing it in the world.
//!
//! [`DrawListRenderer`] is the built-in implementation. It records what would have been drawn,
//! which is what the headless demo and the tests use.
//!
//! ## Key Components
//! - `meshing` - Neighbor-aware mesh generation
//! - `vertex` - The vertex format meshes are made of

use cgmath::{Matrix4, Point3, Vector3};
use log::debug;

use crate::engine_state::voxels::{block::block_side::BlockSide, coordinate::ChunkCoordinate};

pub mod meshing;
mod vertex;

pub use meshing::{Mesh, MeshId};
pub use vertex::Vertex;

/// Per-frame camera information handed to the renderer before any draw call.
#[derive(Debug, Clone)]
pub struct FrameView {
    /// World-to-view transform of the camera
    pub view_matrix: Matrix4<f32>,
    /// Block sides that can face the camera this frame
    pub visible_sides: Vec<BlockSide>,
}

/// One chunk to draw this frame.
#[derive(Debug, Clone, Copy)]
pub struct DrawCall<'a> {
    /// The chunk being drawn
    pub coordinate: ChunkCoordinate,
    /// World-space corner of the chunk
    pub origin: Point3<f32>,
    /// Identity of `mesh`, stable until the chunk is remeshed
    pub mesh_id: MeshId,
    /// Translation placing chunk-local vertices in the world
    pub model: Matrix4<f32>,
    /// The geometry itself
    pub mesh: &'a Mesh,
}

impl<'a> DrawCall<'a> {
    /// Creates a draw call whose model transform is derived from `origin`.
    pub fn new(
        coordinate: ChunkCoordinate,
        origin: Point3<f32>,
        mesh_id: MeshId,
        mesh: &'a Mesh,
    ) -> Self {
        DrawCall {
            coordinate,
            origin,
            mesh_id,
            model: Matrix4::from_translation(Vector3::new(origin.x, origin.y, origin.z)),
            mesh,
        }
    }
}

/// Receives the active chunks once per frame.
///
/// Calls arrive in the order `begin_frame`, any number of `draw_chunk`, then `end_frame`.
pub trait ChunkRenderer {
    /// Starts a frame.
    fn begin_frame(&mut self, view: &FrameView);
    /// Submits one chunk.
    fn draw_chunk(&mut self, draw: DrawCall<'_>);
    /// Finishes the frame.
    fn end_frame(&mut self);
}

/// What a [`DrawListRenderer`] remembers about one draw call.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRecord {
    /// The chunk that was drawn
    pub coordinate: ChunkCoordinate,
    /// Its world-space corner
    pub origin: Point3<f32>,
    /// The mesh that was drawn
    pub mesh_id: MeshId,
    /// Indices over the sides visible this frame
    pub index_count: usize,
}

/// A renderer that records draw calls instead of issuing them.
#[derive(Debug, Default)]
pub struct DrawListRenderer {
    visible_sides: Vec<BlockSide>,
    current: Vec<DrawRecord>,
    last_frame: Vec<DrawRecord>,
    frames_completed: u64,
}

impl DrawListRenderer {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw calls of the last completed frame, in submission order.
    pub fn last_frame(&self) -> &[DrawRecord] {
        &self.last_frame
    }

    /// Number of frames that reached `end_frame`.
    pub fn frames_completed(&self) -> u64 {
        self.frames_completed
    }
}

impl ChunkRenderer for DrawListRenderer {
    fn begin_frame(&mut self, view: &FrameView) {
        self.visible_sides.clone_from(&view.visible_sides);
        self.current.clear();
    }

    fn draw_chunk(&mut self, draw: DrawCall<'_>) {
        let index_count = self
            .visible_sides
            .iter()
            .map(|side| draw.mesh.side(*side).indices.len())
            .sum();

        self.current.push(DrawRecord {
            coordinate: draw.coordinate,
            origin: draw.origin,
            mesh_id: draw.mesh_id,
            index_count,
        });
    }

    fn end_frame(&mut self) {
        std::mem::swap(&mut self.current, &mut self.last_frame);
        self.current.clear();
        self.frames_completed += 1;

        debug!(
            "Frame {}: {} draw calls, {} indices",
            self.frames_completed,
            self.last_frame.len(),
            self.last_frame.iter().map(|record| record.index_count).sum::<usize>()
        );
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{SquareMatrix, Transform};

    use super::*;

    #[test]
    fn model_matrix_translates_to_the_chunk_origin() {
        let mesh = Mesh::new();
        let draw = DrawCall::new(
            ChunkCoordinate::new(1, -1),
            Point3::new(16.0, 0.0, -16.0),
            MeshId(3),
            &mesh,
        );
        let placed = draw.model.transform_point(Point3::new(1.0, 2.0, 3.0));
        assert_eq!(placed, Point3::new(17.0, 2.0, -13.0));
    }

    #[test]
    fn records_only_completed_frames() {
        let mesh = Mesh::new();
        let mut renderer = DrawListRenderer::new();
        let view = FrameView {
            view_matrix: Matrix4::identity(),
            visible_sides: BlockSide::all().to_vec(),
        };

        renderer.begin_frame(&view);
        renderer.draw_chunk(DrawCall::new(
            ChunkCoordinate::new(0, 0),
            Point3::new(0.0, 0.0, 0.0),
            MeshId(1),
            &mesh,
        ));
        assert!(renderer.last_frame().is_empty());
        renderer.end_frame();

        assert_eq!(renderer.frames_completed(), 1);
        assert_eq!(renderer.last_frame().len(), 1);
        assert_eq!(renderer.last_frame()[0].mesh_id, MeshId(1));

        renderer.begin_frame(&view);
        renderer.end_frame();
        assert!(renderer.last_frame().is_empty());
    }
}
