//! Model transform: where a mesh sits in the world.
//!
//! [`Transform`] keeps position, Euler rotation and scale separately and only
//! builds matrices on request, so a frame loop can spin a model by adding to
//! one angle without accumulating matrix drift.

use crate::math::{mat4::Mat4, vec3::Vec3};

/// Position, rotation (Euler angles, radians) and scale of one model.
///
/// Mutating methods return `&mut Self` for chaining:
///
/// ```ignore
/// transform
///     .set_position_xyz(0.0, 0.0, 5.0)
///     .rotate_y(delta)
///     .set_scale_uniform(2.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    position: Vec3,
    rotation: Vec3, // x=pitch, y=yaw, z=roll
    scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) -> &mut Self {
        self.position = position;
        self
    }

    pub fn set_position_xyz(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.position = Vec3::new(x, y, z);
        self
    }

    pub fn translate(&mut self, delta: Vec3) -> &mut Self {
        self.position = self.position + delta;
        self
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn set_rotation_xyz(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.rotation = Vec3::new(x, y, z);
        self
    }

    pub fn rotate_x(&mut self, angle: f32) -> &mut Self {
        self.rotation.x += angle;
        self
    }

    /// Spin about the vertical axis. The frame loop calls this once per frame.
    pub fn rotate_y(&mut self, angle: f32) -> &mut Self {
        self.rotation.y += angle;
        self
    }

    pub fn rotate_z(&mut self, angle: f32) -> &mut Self {
        self.rotation.z += angle;
        self
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: Vec3) -> &mut Self {
        self.scale = scale;
        self
    }

    pub fn set_scale_uniform(&mut self, s: f32) -> &mut Self {
        self.scale = Vec3::new(s, s, s);
        self
    }

    /// Rotation and scale without translation: the part normals care about.
    fn linear_part(&self) -> Mat4 {
        Mat4::rotation_x(self.rotation.x)
            * Mat4::rotation_y(self.rotation.y)
            * Mat4::rotation_z(self.rotation.z)
            * Mat4::scaling(self.scale.x, self.scale.y, self.scale.z)
    }

    /// Model matrix: scale first, then rotate (Z, Y, X), then translate.
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::translation(self.position.x, self.position.y, self.position.z) * self.linear_part()
    }

    /// Inverse transpose of the rotation+scale part.
    ///
    /// Keeps normals perpendicular to surfaces under non-uniform scale. A
    /// zero scale has no inverse; identity is returned in that case.
    pub fn normal_matrix(&self) -> Mat4 {
        self.linear_part()
            .inverse()
            .unwrap_or(Mat4::identity())
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::vec4::Vec4;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position(), Vec3::ZERO);
        assert_eq!(t.rotation(), Vec3::ZERO);
        assert_eq!(t.scale(), Vec3::ONE);
        assert_eq!(t.to_matrix(), Mat4::identity());
    }

    #[test]
    fn setters_chain() {
        let mut t = Transform::new();
        t.set_position_xyz(1.0, 2.0, 3.0)
            .rotate_y(0.5)
            .rotate_y(0.25)
            .set_scale_uniform(2.0);

        assert_eq!(t.position(), Vec3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(t.rotation().y, 0.75);
        assert_eq!(t.scale(), Vec3::new(2.0, 2.0, 2.0));
    }

    #[test]
    fn scale_applies_before_translation() {
        let mut t = Transform::new();
        t.set_scale_uniform(2.0).set_position_xyz(0.0, 0.0, 5.0);

        let p = t.to_matrix() * Vec4::point(1.0, 0.0, 0.0);
        assert_relative_eq!(p, Vec4::point(2.0, 0.0, 5.0), epsilon = 1e-6);
    }

    #[test]
    fn quarter_turn_about_y_moves_forward_to_right() {
        let mut t = Transform::new();
        t.rotate_y(FRAC_PI_2);

        let p = t.to_matrix() * Vec4::point(0.0, 0.0, 1.0);
        assert_relative_eq!(p, Vec4::point(1.0, 0.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn normal_matrix_ignores_translation() {
        let mut t = Transform::new();
        t.set_position_xyz(10.0, -4.0, 3.0);
        assert_relative_eq!(
            t.normal_matrix() * Vec4::direction(0.0, 1.0, 0.0),
            Vec4::direction(0.0, 1.0, 0.0),
            epsilon = 1e-6
        );
    }

    #[test]
    fn normal_matrix_keeps_normals_perpendicular_under_stretch() {
        // A slanted plane x + y = 0 with normal (1, 1, 0), stretched along x.
        let mut t = Transform::new();
        t.set_scale(Vec3::new(4.0, 1.0, 1.0));

        let along_surface = t.to_matrix() * Vec4::direction(1.0, -1.0, 0.0);
        let normal = t.normal_matrix() * Vec4::direction(1.0, 1.0, 0.0);

        assert_relative_eq!(along_surface.dot(normal), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn zero_scale_falls_back_to_identity_normals() {
        let mut t = Transform::new();
        t.set_scale_uniform(0.0);
        assert_eq!(t.normal_matrix(), Mat4::identity());
    }
}
