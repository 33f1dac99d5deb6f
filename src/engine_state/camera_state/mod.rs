//! # Camera State Management
//!
//! This module keeps the camera attached to the player and derives the per-frame view
//! information the renderer needs:
//! - the view matrix
//! - the block sides that can face the camera, used to skip whole mesh sides
//!
//! ## Core Components
//! - `Camera`: the camera's position and orientation in 3D space
//! - `CameraState`: owns the camera, applies look input and follows the player

use cgmath::Point3;

use super::{rendering::FrameView, voxels::block::block_side::BlockSide};

pub mod camera;

/// The camera together with how it is mounted on the player.
#[derive(Debug, Clone)]
pub struct CameraState {
    /// The current camera position and orientation
    pub camera: camera::Camera,
    /// Height of the eye above the player's feet
    pub eye_height: f32,
}

impl CameraState {
    /// Creates a camera looking down negative Z from `eye_height` above `player_position`.
    pub fn new(player_position: Point3<f32>, eye_height: f32, sensitivity: f32) -> Self {
        let mut camera = camera::Camera::new(
            player_position,
            cgmath::Deg(-90.0),
            cgmath::Deg(0.0),
            sensitivity,
        );
        camera.follow(player_position, eye_height);
        CameraState { camera, eye_height }
    }

    /// Applies a look delta, if any.
    pub fn rotate(&mut self, rotate_view: Option<(f64, f64)>) {
        if let Some((delta_x, delta_y)) = rotate_view {
            self.camera
                .process_mouse_movement(delta_x as f32, delta_y as f32);
        }
    }

    /// Moves the camera to the player's eye.
    pub fn follow(&mut self, player_position: Point3<f32>) {
        self.camera.follow(player_position, self.eye_height);
    }

    /// View information for the current camera pose.
    pub fn frame_view(&self) -> FrameView {
        FrameView {
            view_matrix: self.camera.calc_matrix(),
            visible_sides: BlockSide::get_visible_sides(self.camera.get_view_vec()),
        }
    }

    /// Yaw of the camera, which orients lateral movement.
    pub fn yaw(&self) -> cgmath::Rad<f32> {
        self.camera.yaw
    }
}
