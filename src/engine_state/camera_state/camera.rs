//! # Camera Implementation
//!
//! A first-person camera described by a position and two Euler angles.
//!
//! ## Key Components
//! - `Camera`: position and orientation, view matrix and view direction
//!
//! Angles are stored in radians. Mouse deltas are scaled by the sensitivity and applied as
//! degrees, and the pitch is clamped just short of straight up or down.

use cgmath::*;

/// Largest pitch magnitude, in degrees
const PITCH_LIMIT_DEGREES: f32 = 89.0;

/// Represents a first-person camera in 3D space.
#[derive(Debug, Clone)]
pub struct Camera {
    /// The camera's position in world space
    pub position: Point3<f32>,
    /// Horizontal rotation (around Y axis) in radians
    pub yaw: Rad<f32>,
    /// Vertical rotation (around X axis) in radians
    pub pitch: Rad<f32>,
    /// Degrees of rotation per unit of mouse movement
    pub sensitivity: f32,
    /// Normalized vector pointing where the camera looks
    view_vec: Vector3<f32>,
}

impl Camera {
    /// Creates a new camera with the specified position and orientation.
    ///
    /// # Arguments
    /// * `position` - Initial position of the camera in world space
    /// * `yaw` - Initial yaw. A yaw of -90 degrees looks down negative Z.
    /// * `pitch` - Initial pitch, clamped to the pitch limit
    /// * `sensitivity` - Degrees of rotation per unit of mouse movement
    pub fn new<V: Into<Point3<f32>>, Y: Into<Rad<f32>>, P: Into<Rad<f32>>>(
        position: V,
        yaw: Y,
        pitch: P,
        sensitivity: f32,
    ) -> Self {
        let mut camera = Self {
            position: position.into(),
            yaw: yaw.into(),
            pitch: pitch.into(),
            sensitivity,
            view_vec: Vector3::unit_x(),
        };
        camera.clamp_pitch();
        camera.update_view_vec();
        camera
    }

    /// Gets the camera's forward direction vector.
    ///
    /// # Returns
    /// A normalized 3D vector representing the camera's forward direction
    pub fn get_view_vec(&self) -> Vector3<f32> {
        self.view_vec
    }

    /// Calculates the view matrix for this camera.
    ///
    /// The view matrix transforms world coordinates to view (camera) space.
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_to_rh(self.position, self.view_vec, Vector3::unit_y())
    }

    /// Moves the camera so its eye sits `eye_height` above `anchor`.
    pub fn follow(&mut self, anchor: Point3<f32>, eye_height: f32) {
        self.position = Point3::new(anchor.x, anchor.y + eye_height, anchor.z);
    }

    /// Applies a mouse movement delta.
    ///
    /// Positive `delta_x` turns right and positive `delta_y` looks up.
    pub fn process_mouse_movement(&mut self, delta_x: f32, delta_y: f32) {
        if !delta_x.is_finite() || !delta_y.is_finite() {
            return;
        }
        self.yaw += Rad::from(Deg(delta_x * self.sensitivity));
        self.pitch += Rad::from(Deg(delta_y * self.sensitivity));
        self.clamp_pitch();
        self.update_view_vec();
    }

    fn clamp_pitch(&mut self) {
        let limit: Rad<f32> = Deg(PITCH_LIMIT_DEGREES).into();
        if self.pitch < -limit {
            self.pitch = -limit;
        } else if self.pitch > limit {
            self.pitch = limit;
        }
    }

    fn update_view_vec(&mut self) {
        let (yaw_sin, yaw_cos) = self.yaw.0.sin_cos();
        let (pitch_sin, pitch_cos) = self.pitch.0.sin_cos();
        self.view_vec = Vector3::new(yaw_cos * pitch_cos, pitch_sin, yaw_sin * pitch_cos).normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera::new(Point3::new(0.0, 0.0, 0.0), Deg(-90.0), Deg(0.0), 2.0)
    }

    #[test]
    fn default_orientation_looks_down_negative_z() {
        let view = camera().get_view_vec();
        assert!(view.x.abs() < 1e-6);
        assert!(view.y.abs() < 1e-6);
        assert!((view.z + 1.0).abs() < 1e-6);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut camera = camera();
        camera.process_mouse_movement(0.0, 1000.0);
        let limit: Rad<f32> = Deg(PITCH_LIMIT_DEGREES).into();
        assert!((camera.pitch.0 - limit.0).abs() < 1e-6);
        assert!(camera.get_view_vec().y < 1.0);

        camera.process_mouse_movement(0.0, -5000.0);
        assert!((camera.pitch.0 + limit.0).abs() < 1e-6);
    }

    #[test]
    fn sensitivity_scales_yaw() {
        let mut camera = camera();
        camera.process_mouse_movement(45.0, 0.0);
        let expected: Rad<f32> = Deg(0.0).into();
        assert!((camera.yaw.0 - expected.0).abs() < 1e-5);
        assert!((camera.get_view_vec().x - 1.0).abs() < 1e-5);
    }

    #[test]
    fn non_finite_deltas_are_ignored() {
        let mut camera = camera();
        camera.process_mouse_movement(f32::NAN, f32::INFINITY);
        assert!(camera.get_view_vec().z < -0.99);
    }

    #[test]
    fn follow_places_the_eye_above_the_anchor() {
        let mut camera = camera();
        camera.follow(Point3::new(1.0, 2.0, 3.0), 1.5);
        assert_eq!(camera.position, Point3::new(1.0, 3.5, 3.0));
    }
}
