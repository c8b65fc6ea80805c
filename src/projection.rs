//! Perspective projection parameters.
//!
//! The [`Projection`] struct is the single source of truth for FOV, aspect
//! ratio and near/far distances. The matrix it builds leaves view-space `z` in
//! clip-space `w`, which is what the clipper tests against and what
//! perspective-correct interpolation divides by.

use crate::math::mat4::Mat4;

/// Perspective projection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Vertical field of view in radians.
    fov_y: f32,
    /// Aspect ratio (width / height).
    aspect_ratio: f32,
    z_near: f32,
    z_far: f32,
}

impl Projection {
    /// # Arguments
    /// * `fov_y` - Vertical field of view in radians
    /// * `aspect_ratio` - Width divided by height
    /// * `z_near` - Near clipping plane distance (must be > 0)
    /// * `z_far` - Far clipping plane distance (must be > z_near)
    pub fn new(fov_y: f32, aspect_ratio: f32, z_near: f32, z_far: f32) -> Self {
        Self {
            fov_y,
            aspect_ratio,
            z_near,
            z_far,
        }
    }

    pub fn from_degrees(fov_y_degrees: f32, aspect_ratio: f32, z_near: f32, z_far: f32) -> Self {
        Self::new(fov_y_degrees.to_radians(), aspect_ratio, z_near, z_far)
    }

    /// A projection whose aspect ratio matches a `width` x `height` target.
    pub fn for_viewport(fov_y_degrees: f32, width: u32, height: u32, z_near: f32, z_far: f32) -> Self {
        Self::from_degrees(fov_y_degrees, width as f32 / height as f32, z_near, z_far)
    }

    pub fn fov_y(&self) -> f32 {
        self.fov_y
    }

    /// Horizontal field of view in radians, derived from `fov_y` and aspect.
    pub fn fov_x(&self) -> f32 {
        2.0 * (self.aspect_ratio * (self.fov_y / 2.0).tan()).atan()
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn z_near(&self) -> f32 {
        self.z_near
    }

    pub fn z_far(&self) -> f32 {
        self.z_far
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
    }

    /// Left-handed perspective matrix. Near maps to NDC z = -1, far to +1.
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_lh(self.fov_y, self.aspect_ratio, self.z_near, self.z_far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::vec4::Vec4;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_4;

    fn ndc(m: &Mat4, p: Vec4) -> Vec4 {
        let clip = *m * p;
        Vec4::new(clip.x / clip.w, clip.y / clip.w, clip.z / clip.w, clip.w)
    }

    #[test]
    fn fov_x_matches_fov_y_for_square_viewport() {
        let proj = Projection::new(FRAC_PI_4, 1.0, 0.1, 100.0);
        assert_relative_eq!(proj.fov_x(), proj.fov_y(), epsilon = 1e-6);
    }

    #[test]
    fn fov_x_wider_with_higher_aspect() {
        let proj = Projection::for_viewport(45.0, 1920, 1080, 0.1, 100.0);
        assert_relative_eq!(proj.aspect_ratio(), 16.0 / 9.0, epsilon = 1e-6);
        assert!(proj.fov_x() > proj.fov_y());
    }

    #[test]
    fn from_degrees_converts_correctly() {
        let proj = Projection::from_degrees(45.0, 1.0, 0.1, 100.0);
        assert_relative_eq!(proj.fov_y(), FRAC_PI_4, epsilon = 1e-6);
    }

    #[test]
    fn near_and_far_map_to_ndc_bounds() {
        let m = Projection::from_degrees(60.0, 1.0, 0.5, 50.0).matrix();

        let near = ndc(&m, Vec4::point(0.0, 0.0, 0.5));
        let far = ndc(&m, Vec4::point(0.0, 0.0, 50.0));

        assert_relative_eq!(near.z, -1.0, epsilon = 1e-5);
        assert_relative_eq!(far.z, 1.0, epsilon = 1e-4);
        assert_relative_eq!(far.w, 50.0);
    }

    #[test]
    fn fov_edge_maps_to_ndc_edge() {
        // At 90 degrees, a point as far up as it is deep sits on the top edge.
        let m = Projection::from_degrees(90.0, 1.0, 0.1, 100.0).matrix();
        let p = ndc(&m, Vec4::point(0.0, 3.0, 3.0));
        assert_relative_eq!(p.y, 1.0, epsilon = 1e-5);
    }
}
