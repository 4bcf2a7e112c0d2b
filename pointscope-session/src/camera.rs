//! Orbit camera for the canvas

use nalgebra::{Matrix4, Perspective3, Point3, Vector3};

/// A perspective camera orbiting a target point
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// Get the view matrix
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Get the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        Perspective3::new(self.aspect_ratio, self.fov, self.near, self.far).into_inner()
    }

    /// Unit vector from the camera toward its target
    pub fn view_direction(&self) -> Vector3<f32> {
        (self.target - self.position).normalize()
    }

    /// Rotate the camera around the target by yaw and pitch angles (radians)
    ///
    /// Pitch is clamped just short of the poles so the up vector stays valid.
    pub fn orbit(&mut self, yaw: f32, pitch: f32) {
        let offset = self.position - self.target;
        let radius = offset.norm();
        if radius <= 0.0 {
            return;
        }

        let mut cur_yaw = offset.x.atan2(offset.z);
        let mut cur_pitch = (offset.y / radius).clamp(-1.0, 1.0).asin();

        cur_yaw += yaw;
        let limit = std::f32::consts::FRAC_PI_2 - 0.01;
        cur_pitch = (cur_pitch + pitch).clamp(-limit, limit);

        let offset = Vector3::new(
            radius * cur_pitch.cos() * cur_yaw.sin(),
            radius * cur_pitch.sin(),
            radius * cur_pitch.cos() * cur_yaw.cos(),
        );
        self.position = self.target + offset;
    }

    /// Move the camera toward (positive delta) or away from the target
    pub fn zoom(&mut self, delta: f32) {
        let offset = self.position - self.target;
        let radius = (offset.norm() - delta).clamp(self.near * 2.0, self.far);
        self.position = self.target + offset.normalize() * radius;
    }

    /// Translate camera and target in the view plane
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let forward = self.view_direction();
        let right = forward.cross(&self.up).normalize();
        let true_up = right.cross(&forward);
        let shift = right * dx + true_up * dy;
        self.position += shift;
        self.target += shift;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Point3::new(1.0, 1.0, 1.0),
            target: Point3::origin(),
            up: Vector3::new(0.0, 1.0, 0.0),
            fov: std::f32::consts::FRAC_PI_4,
            aspect_ratio: 16.0 / 9.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_orbit_preserves_radius() {
        let mut camera = Camera::default();
        let radius = (camera.position - camera.target).norm();
        camera.orbit(0.7, 0.2);
        assert_relative_eq!(
            (camera.position - camera.target).norm(),
            radius,
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_orbit_pitch_clamped() {
        let mut camera = Camera::default();
        camera.orbit(0.0, 10.0);
        let offset = camera.position - camera.target;
        // never reaches the pole
        assert!(offset.x.abs() + offset.z.abs() > 1e-4);
    }

    #[test]
    fn test_zoom_stops_at_near_plane() {
        let mut camera = Camera::default();
        camera.zoom(1000.0);
        let radius = (camera.position - camera.target).norm();
        assert_relative_eq!(radius, camera.near * 2.0, epsilon = 1e-5);
    }

    #[test]
    fn test_pan_moves_target_with_position() {
        let mut camera = Camera::default();
        let before = camera.target - camera.position;
        camera.pan(0.5, -0.25);
        let after = camera.target - camera.position;
        assert_relative_eq!((before - after).norm(), 0.0, epsilon = 1e-5);
    }
}
