//! # Engine State Module
//!
//! The core engine module that runs one frame of the voxel engine at a time.
//!
//! ## Key Components
//!
//! * `EngineState` - The main state container for the engine
//! * `camera_state` - Handles camera orientation and following the player
//! * `player` - The player body and its collision handling
//! * `rendering` - Meshing and the boundary to whatever draws the chunks
//! * `voxels` - Handles voxel data, chunks, and world streaming
//!
//! ## Frame Order
//!
//! Every frame runs the same fixed sequence:
//!
//! 1. Apply view rotation from input
//! 2. Move the player, resolving collisions against active chunks
//! 3. Reconcile the active chunk set with the player's new position
//! 4. Rebuild dirty meshes
//! 5. Submit one draw call per active chunk

use cgmath::Point3;
use log::info;
use web_time::Duration;

use camera_state::CameraState;
use player::Player;
use rendering::{ChunkRenderer, DrawCall};
use voxels::world::{ActivationReport, World};

pub mod camera_state;
pub mod player;
pub mod rendering;
pub mod voxels;

/// Represents player actions derived from input for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerAction {
    /// Move along the view direction, projected onto the ground plane
    pub move_forward: bool,
    /// Move against the view direction
    pub move_backward: bool,
    /// Strafe left
    pub move_left: bool,
    /// Strafe right
    pub move_right: bool,
    /// Fly up
    pub move_up: bool,
    /// Fly down
    pub move_down: bool,
    /// Look delta for this frame, in mouse units
    pub rotate_view: Option<(f64, f64)>,
}

/// What happened during one [`EngineState::frame`].
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    /// Outcome of the activation pass
    pub activation: ActivationReport,
    /// Number of chunk meshes rebuilt
    pub meshes_rebuilt: usize,
    /// Number of draw calls submitted
    pub draw_calls: usize,
    /// Player position after movement
    pub player_position: Point3<f32>,
}

/// The main state container for the voxel engine
///
/// Owns the world, the player, the camera and the renderer chunks are submitted to.
pub struct EngineState<R: ChunkRenderer> {
    /// The voxel world containing all chunk data
    world: World,
    /// The player body
    player: Player,
    /// Camera state mounted on the player
    camera_state: CameraState,
    /// Receives the active chunks every frame
    renderer: R,
    /// Frames run so far
    frames: u64,
}

impl<R: ChunkRenderer> EngineState<R> {
    /// Creates the engine and activates the chunks around the player.
    ///
    /// # Arguments
    ///
    /// * `world` - The world to stream
    /// * `player` - The player, already placed at its spawn point
    /// * `sensitivity` - Mouse look sensitivity in degrees per unit
    /// * `renderer` - Where draw calls go
    pub fn new(mut world: World, player: Player, sensitivity: f32, renderer: R) -> Self {
        let activation = world.update(player.position);
        info!(
            "World ready around chunk {:?}: {} active, {} created",
            activation.center,
            activation.activated.len(),
            activation.created
        );

        let camera_state = CameraState::new(player.position, player.eye_height(), sensitivity);

        EngineState {
            world,
            player,
            camera_state,
            renderer,
            frames: 0,
        }
    }

    /// Runs one frame.
    ///
    /// # Arguments
    ///
    /// * `dt` - The time elapsed since the last frame
    /// * `actions` - Input for this frame
    pub fn frame(&mut self, dt: Duration, actions: &PlayerAction) -> FrameReport {
        self.camera_state.rotate(actions.rotate_view);

        self.player.process_movement(
            actions,
            self.camera_state.yaw(),
            dt.as_secs_f32(),
            &mut self.world,
        );
        self.camera_state.follow(self.player.position);

        let activation = self.world.update(self.player.position);
        let meshes_rebuilt = self.world.rebuild_dirty_meshes();
        let draw_calls = self.render();

        self.frames += 1;

        FrameReport {
            activation,
            meshes_rebuilt,
            draw_calls,
            player_position: self.player.position,
        }
    }

    /// The world being streamed.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable access to the world, for block edits.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// The player.
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// The camera.
    pub fn camera_state(&self) -> &CameraState {
        &self.camera_state
    }

    /// The renderer draw calls are submitted to.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Frames run so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    fn render(&mut self) -> usize {
        let view = self.camera_state.frame_view();
        self.renderer.begin_frame(&view);

        let mut draw_calls = 0;
        for chunk in self.world.active_chunks() {
            self.renderer.draw_chunk(DrawCall::new(
                chunk.coordinate,
                chunk.origin,
                chunk.mesh_id,
                chunk.mesh,
            ));
            draw_calls += 1;
        }

        self.renderer.end_frame();
        draw_calls
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use super::*;
    use super::rendering::DrawListRenderer;
    use super::voxels::{
        coordinate::{ChunkCoordinate, ChunkExtents, WorldLayout},
        generation::ColumnGenerator,
    };

    fn engine() -> EngineState<DrawListRenderer> {
        let world = World::new(
            WorldLayout::new(Point3::new(0.0, 0.0, 0.0), ChunkExtents::new(16, 32, 16)),
            NonZeroU32::new(2).unwrap(),
            Box::new(ColumnGenerator::flat(4)),
        );
        let player = Player::new(Point3::new(8.0, 6.0, 8.0), 0.6, 1.8, 10.0);
        EngineState::new(world, player, 2.0, DrawListRenderer::new())
    }

    #[test]
    fn first_frame_meshes_and_draws_every_active_chunk() {
        let mut engine = engine();
        let report = engine.frame(Duration::from_millis(16), &PlayerAction::default());

        assert_eq!(report.meshes_rebuilt, 25);
        assert_eq!(report.draw_calls, 25);
        assert!(report.activation.skipped);
        assert_eq!(engine.renderer().last_frame().len(), 25);
        assert_eq!(engine.renderer().frames_completed(), 1);
    }

    #[test]
    fn idle_frames_do_no_work() {
        let mut engine = engine();
        engine.frame(Duration::from_millis(16), &PlayerAction::default());
        let report = engine.frame(Duration::from_millis(16), &PlayerAction::default());

        assert_eq!(report.meshes_rebuilt, 0);
        assert_eq!(report.draw_calls, 25);
        assert!(!report.activation.changed());
    }

    #[test]
    fn crossing_into_the_next_chunk_streams_a_new_column() {
        let mut engine = engine();
        engine.frame(Duration::from_millis(16), &PlayerAction::default());

        // Facing negative Z, so strafing right moves along positive X
        let actions = PlayerAction {
            move_right: true,
            ..PlayerAction::default()
        };
        let report = engine.frame(Duration::from_secs(1), &actions);

        assert_eq!(report.activation.center, ChunkCoordinate::new(1, 0));
        assert_eq!(report.activation.activated.len(), 5);
        assert_eq!(report.meshes_rebuilt, 5);
        assert_eq!(report.draw_calls, 25);
        assert_eq!(engine.camera_state().camera.position.x, report.player_position.x);
    }
}
