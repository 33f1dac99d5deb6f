//! # Player
//!
//! A flying player with an axis-aligned bounding box.
//!
//! Movement is resolved one axis at a time (X, then Y, then Z). A step along an axis is
//! dropped when the box would overlap a solid block, so the player slides along walls instead
//! of sticking to them. There is no gravity.

use cgmath::{InnerSpace, Point3, Rad, Vector3};

use super::{voxels::world::World, PlayerAction};

/// Longest distance moved in one collision step, in blocks
const MAX_STEP: f32 = 0.5;
/// Upper bound on collision steps per frame
const MAX_SUBSTEPS: u32 = 64;
/// Shrinks the box slightly so touching a face does not count as overlapping it
const SKIN: f32 = 1e-4;

/// The controllable body the camera is mounted on.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Center of the bottom face of the bounding box
    pub position: Point3<f32>,
    /// Half the width of the box along X and Z
    pub half_width: f32,
    /// Height of the box
    pub height: f32,
    /// Movement speed in blocks per second
    pub speed: f32,
}

impl Player {
    /// Creates a player standing at `position`.
    pub fn new(position: Point3<f32>, width: f32, height: f32, speed: f32) -> Self {
        Player {
            position,
            half_width: width / 2.0,
            height,
            speed,
        }
    }

    /// Height of the eye above the feet.
    pub fn eye_height(&self) -> f32 {
        self.height / 2.0
    }

    /// Moves the player according to `actions`, facing `yaw`, over `dt` seconds.
    ///
    /// # Returns
    /// `true` if the position changed.
    pub fn process_movement(
        &mut self,
        actions: &PlayerAction,
        yaw: Rad<f32>,
        dt: f32,
        world: &mut World,
    ) -> bool {
        let delta = self.desired_motion(actions, yaw) * (self.speed * dt);
        if !delta.x.is_finite() || !delta.y.is_finite() || !delta.z.is_finite() {
            return false;
        }

        let largest = delta.x.abs().max(delta.y.abs()).max(delta.z.abs());
        if largest == 0.0 {
            return false;
        }
        let substeps = ((largest / MAX_STEP).ceil() as u32).clamp(1, MAX_SUBSTEPS);
        let step = delta / substeps as f32;

        let start = self.position;
        for _ in 0..substeps {
            for axis in 0..3 {
                let mut candidate = self.position;
                candidate[axis] += step[axis];
                if !self.overlaps_solid(candidate, world) {
                    self.position = candidate;
                }
            }
        }

        self.position != start
    }

    /// Whether the box placed at `position` intersects a solid block.
    pub fn overlaps_solid(&self, position: Point3<f32>, world: &mut World) -> bool {
        let origin = world.layout().origin;
        let min = Vector3::new(
            position.x - self.half_width - origin.x,
            position.y - origin.y,
            position.z - self.half_width - origin.z,
        );
        let max = Vector3::new(
            position.x + self.half_width - origin.x,
            position.y + self.height - origin.y,
            position.z + self.half_width - origin.z,
        );

        let first = min.map(|value| (value + SKIN).floor() as i32);
        let last = max.map(|value| (value - SKIN).floor() as i32);

        for y in first.y..=last.y {
            for z in first.z..=last.z {
                for x in first.x..=last.x {
                    let cell_center = Point3::new(
                        origin.x + x as f32 + 0.5,
                        origin.y + y as f32 + 0.5,
                        origin.z + z as f32 + 0.5,
                    );
                    if world.is_solid_at(cell_center) {
                        return true;
                    }
                }
            }
        }
        false
    }

    fn desired_motion(&self, actions: &PlayerAction, yaw: Rad<f32>) -> Vector3<f32> {
        let (yaw_sin, yaw_cos) = yaw.0.sin_cos();
        let forward = Vector3::new(yaw_cos, 0.0, yaw_sin);
        let right = Vector3::new(-yaw_sin, 0.0, yaw_cos);

        let mut lateral = Vector3::new(0.0, 0.0, 0.0);
        if actions.move_forward {
            lateral += forward;
        }
        if actions.move_backward {
            lateral -= forward;
        }
        if actions.move_right {
            lateral += right;
        }
        if actions.move_left {
            lateral -= right;
        }
        if lateral.magnitude2() > 0.0 {
            lateral = lateral.normalize();
        }

        let mut vertical = 0.0;
        if actions.move_up {
            vertical += 1.0;
        }
        if actions.move_down {
            vertical -= 1.0;
        }

        Vector3::new(lateral.x, vertical, lateral.z)
    }
}
