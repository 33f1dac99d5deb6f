//! Mesh data structures for voxel rendering.
//!
//! This module provides the per-side vertex and index storage a chunk mesh is made of,
//! and the conversion from [`Face`] quads to GPU-friendly vertex and index data.

use crate::engine_state::rendering::Vertex;
use crate::engine_state::voxels::block::{block_side::BlockSide, Block, BlockTypeSize};

use super::face::Face;

/// Represents a single side of a mesh with its associated vertices and indices.
///
/// Each `MeshSide` corresponds to one of the six possible block faces, so a renderer can
/// skip whole sides that face away from the camera.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshSide {
    /// The vertex data for this mesh side
    pub vertices: Vec<Vertex>,
    /// The index data for this mesh side
    pub indices: Vec<u32>,
    /// Number of block faces covered by the quads of this side
    pub covered_faces: u32,
    /// Which block side this mesh represents
    pub side: BlockSide,
}

impl MeshSide {
    /// Creates a new, empty `MeshSide` for the specified block side.
    pub fn new(side: BlockSide) -> Self {
        MeshSide {
            vertices: Vec::new(),
            indices: Vec::new(),
            covered_faces: 0,
            side,
        }
    }

    /// Appends one quad.
    pub fn push_face(&mut self, face: &Face) {
        let faces_generated = (self.vertices.len() / 4) as u32;
        self.vertices.extend(Mesh::generate_face_vertices(face));
        self.indices.extend(Mesh::generate_face_indices(faces_generated));
        self.covered_faces += Mesh::face_area(face);
    }
}

/// Represents a complete mesh for a voxel chunk with all six possible sides.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Array of mesh sides, indexed by `BlockSide` enum values.
    pub mesh: [MeshSide; 6],
}

impl Mesh {
    /// Creates a new, empty mesh with all sides initialized.
    pub fn new() -> Self {
        Mesh {
            mesh: BlockSide::all().map(MeshSide::new),
        }
    }

    /// The mesh side holding faces of `side`.
    pub fn side(&self, side: BlockSide) -> &MeshSide {
        &self.mesh[side as usize]
    }

    /// Appends a quad to the side it belongs to.
    pub fn push_face(&mut self, face: &Face) {
        self.mesh[face.block_side as usize].push_face(face);
    }

    /// Total number of indices over all sides.
    pub fn index_count(&self) -> usize {
        self.mesh.iter().map(|side| side.indices.len()).sum()
    }

    /// Total number of quads over all sides.
    pub fn quad_count(&self) -> usize {
        self.mesh.iter().map(|side| side.vertices.len() / 4).sum()
    }

    /// Total number of block faces covered, independent of how quads were merged.
    pub fn covered_faces(&self) -> u32 {
        self.mesh.iter().map(|side| side.covered_faces).sum()
    }

    /// Whether the mesh has no geometry at all.
    pub fn is_empty(&self) -> bool {
        self.mesh.iter().all(|side| side.vertices.is_empty())
    }

    /// Number of block faces a (possibly merged) quad spans.
    fn face_area(face: &Face) -> u32 {
        let width = (face.lr - face.ll).map(i32::abs);
        let height = (face.ul - face.ll).map(i32::abs);
        ((width.x + width.y + width.z) * (height.x + height.y + height.z)) as u32
    }

    /// Generates vertex data for a single face.
    ///
    /// # Returns
    /// The four corners of the face, in the order expected by
    /// [`Mesh::generate_face_indices`].
    pub fn generate_face_vertices(face: &Face) -> [Vertex; 4] {
        let texture_indices = Block {
            block_type: face.block_type_int as BlockTypeSize,
        }
        .texture_indices();
        let texture_index = texture_indices[face.block_side as usize];

        let width = (face.lr - face.ll).map(i32::abs);
        let height = (face.ul - face.ll).map(i32::abs);
        let u_offset = (width.x + width.y + width.z) as u32;
        let v_offset = (height.x + height.y + height.z) as u32;

        [
            Vertex::new(face.ll, texture_index, 0, v_offset),
            Vertex::new(face.lr, texture_index, u_offset, v_offset),
            Vertex::new(face.ul, texture_index, 0, 0),
            Vertex::new(face.ur, texture_index, u_offset, 0),
        ]
    }

    /// Generates index data for a face, adjusted by the number of previously generated faces.
    ///
    /// # Returns
    /// Six indices forming the two triangles of the face.
    pub fn generate_face_indices(num_faces_generated: u32) -> [u32; 6] {
        [
            num_faces_generated * 4,
            1 + num_faces_generated * 4,
            3 + num_faces_generated * 4,
            num_faces_generated * 4,
            3 + num_faces_generated * 4,
            2 + num_faces_generated * 4,
        ]
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Mesh::new()
    }
}
