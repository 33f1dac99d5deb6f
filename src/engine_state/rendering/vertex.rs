//! Vertex data structures for voxel rendering.
//!
//! This module defines the vertex format produced by the mesher. Positions are chunk-local;
//! the renderer places a chunk with the model transform carried by its draw call.

use cgmath::Point3;

/// A vertex in the voxel rendering pipeline.
///
/// # Memory Layout
/// - Position: 3x i32 (12 bytes)
/// - Texture Index: u32 (4 bytes)
/// - Texture Coordinates: [f32; 2] (8 bytes)
///
/// Total size: 24 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// X coordinate in chunk space
    pub x: i32,
    /// Y coordinate in chunk space
    pub y: i32,
    /// Z coordinate in chunk space
    pub z: i32,
    /// Index of the texture in the texture array
    pub texture_index: u32,
    /// UV texture coordinates, in blocks (a merged quad repeats its texture)
    pub tex_coords: [f32; 2],
}

impl Vertex {
    /// Creates a new vertex with the given parameters.
    ///
    /// # Arguments
    /// * `pos` - The 3D position of the vertex in chunk space
    /// * `texture_index` - Index of the texture in the texture array
    /// * `u` - U texture coordinate
    /// * `v` - V texture coordinate
    pub fn new(pos: Point3<i32>, texture_index: usize, u: u32, v: u32) -> Self {
        Vertex {
            x: pos.x,
            y: pos.y,
            z: pos.z,
            texture_index: texture_index as u32,
            tex_coords: [u as f32, v as f32],
        }
    }

    /// The vertex position as a point.
    pub fn position(&self) -> Point3<i32> {
        Point3::new(self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
        let vertex = Vertex::new(Point3::new(1, 2, 3), 4, 1, 0);
        let bytes: &[u8] = bytemuck::bytes_of(&vertex);
        assert_eq!(bytes.len(), 24);
        assert_eq!(vertex.position(), Point3::new(1, 2, 3));
    }
}
