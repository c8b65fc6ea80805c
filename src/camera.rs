//! Viewer position and orientation.
//!
//! # Coordinate System
//!
//! Left-handed: X right, Y up, Z forward (into the screen).
//!
//! # Orientation
//!
//! Stored as yaw/pitch angles and turned into a direction when needed.
//!
//! - **Yaw**: rotation around Y (positive = look right)
//! - **Pitch**: rotation around X (positive = look down)

use crate::math::mat4::Mat4;
use crate::math::vec3::Vec3;
use crate::math::vec4::Vec4;
use crate::projection::Projection;

/// Camera with a position, yaw/pitch orientation and a lens.
///
/// The pipeline only ever sees [`Camera::view_projection`].
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    yaw: f32,
    pitch: f32,
    projection: Projection,
}

impl Camera {
    /// Pitch is kept short of straight up/down so the view basis never
    /// degenerates against the world up vector.
    const PITCH_LIMIT: f32 = 89.0 * std::f32::consts::PI / 180.0;

    /// A camera at `position` looking along +Z.
    pub fn new(position: Vec3, projection: Projection) -> Self {
        Self {
            position,
            yaw: 0.0,
            pitch: 0.0,
            projection,
        }
    }

    pub fn looking_at(position: Vec3, target: Vec3, projection: Projection) -> Self {
        let mut camera = Self::new(position, projection);
        camera.look_at(target);
        camera
    }

    /// Turn to face `target`. Does nothing if `target` is the camera position.
    pub fn look_at(&mut self, target: Vec3) {
        let dir = target - self.position;
        if dir.magnitude() < f32::EPSILON {
            return;
        }
        let dir = dir.normalize();
        self.yaw = dir.x.atan2(dir.z);
        self.pitch = (-dir.y)
            .atan2((dir.x * dir.x + dir.z * dir.z).sqrt())
            .clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT);
    }

    pub fn rotate(&mut self, yaw_delta: f32, pitch_delta: f32) {
        self.yaw += yaw_delta;
        self.pitch = (self.pitch + pitch_delta).clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT);
    }

    pub fn move_forward(&mut self, distance: f32) {
        self.position = self.position + self.forward() * distance;
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Unit view direction.
    pub fn forward(&self) -> Vec3 {
        let rotation = Mat4::rotation_y(self.yaw) * Mat4::rotation_x(self.pitch);
        (rotation * Vec4::direction(0.0, 0.0, 1.0)).to_vec3()
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.projection.set_aspect_ratio(aspect_ratio);
    }

    /// World → view transform.
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_lh(self.position, self.position + self.forward(), Vec3::UP)
    }

    /// World → clip transform handed to the pipeline.
    pub fn view_projection(&self) -> Mat4 {
        self.projection.matrix() * self.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    fn lens() -> Projection {
        Projection::from_degrees(90.0, 1.0, 0.1, 100.0)
    }

    fn assert_vec3_eq(a: Vec3, b: Vec3) {
        assert_relative_eq!(a.x, b.x, epsilon = 1e-5);
        assert_relative_eq!(a.y, b.y, epsilon = 1e-5);
        assert_relative_eq!(a.z, b.z, epsilon = 1e-5);
    }

    #[test]
    fn starts_looking_forward() {
        let camera = Camera::new(Vec3::ZERO, lens());
        assert_vec3_eq(camera.forward(), Vec3::FORWARD);
    }

    #[test]
    fn positive_yaw_looks_right() {
        let mut camera = Camera::new(Vec3::ZERO, lens());
        camera.rotate(FRAC_PI_2, 0.0);
        assert_vec3_eq(camera.forward(), Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn pitch_is_clamped() {
        let mut camera = Camera::new(Vec3::ZERO, lens());
        camera.rotate(0.0, 10.0);
        assert!(camera.pitch() < FRAC_PI_2);
        assert!(camera.forward().y < 0.0);
    }

    #[test]
    fn looking_at_faces_the_target() {
        let camera = Camera::looking_at(Vec3::new(0.0, 2.0, -4.0), Vec3::ZERO, lens());
        let expected = (Vec3::ZERO - Vec3::new(0.0, 2.0, -4.0)).normalize();
        assert_vec3_eq(camera.forward(), expected);
    }

    #[test]
    fn set_position_keeps_orientation() {
        let mut camera = Camera::looking_at(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), lens());
        assert_relative_eq!(camera.yaw(), FRAC_PI_2, epsilon = 1e-6);

        camera.set_position(Vec3::new(0.0, 3.0, -2.0));

        assert_vec3_eq(camera.position(), Vec3::new(0.0, 3.0, -2.0));
        assert_relative_eq!(camera.yaw(), FRAC_PI_2, epsilon = 1e-6);
        assert_relative_eq!(camera.pitch(), 0.0);
    }

    #[test]
    fn move_forward_follows_view_direction() {
        let mut camera = Camera::new(Vec3::new(1.0, 0.0, 0.0), lens());
        camera.move_forward(3.0);
        assert_vec3_eq(camera.position(), Vec3::new(1.0, 0.0, 3.0));
    }

    #[test]
    fn target_lands_at_screen_center() {
        let target = Vec3::new(3.0, -1.0, 7.0);
        let camera = Camera::looking_at(Vec3::new(-2.0, 1.0, 0.0), target, lens());

        let clip = camera.view_projection() * Vec4::from(target);
        assert!(clip.w > 0.0);
        assert_relative_eq!(clip.x / clip.w, 0.0, epsilon = 1e-5);
        assert_relative_eq!(clip.y / clip.w, 0.0, epsilon = 1e-5);
    }
}
