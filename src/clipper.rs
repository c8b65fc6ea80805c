//! Clip-space clipping against the homogeneous view volume.
//!
//! Clipping runs after projection and before the perspective divide. The view
//! volume is
//!
//! ```text
//! -w <= x <= w
//! -w <= y <= w
//! -w <= z <= w
//! ```
//!
//! Each plane is a `(axis, sign)` pair: a vertex is inside when
//! `sign * position[axis] <= w`. Polygons are clipped one plane at a time
//! with Sutherland-Hodgman and the survivor is fan-triangulated.
//!
//! A vertex with `w < 0` fails both planes of every axis, so anything that
//! survives has `w >= 0` and is safe to divide.

use crate::math::vec4::Axis;
use crate::vertex::Vertex;

/// One face of the clip cube.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipPlane {
    pub axis: Axis,
    /// `1.0` for the positive face (`x <= w`), `-1.0` for the negative face (`-x <= w`).
    pub sign: f32,
}

impl ClipPlane {
    pub const LEFT: Self = Self::new(Axis::X, -1.0);
    pub const RIGHT: Self = Self::new(Axis::X, 1.0);
    pub const BOTTOM: Self = Self::new(Axis::Y, -1.0);
    pub const TOP: Self = Self::new(Axis::Y, 1.0);
    pub const NEAR: Self = Self::new(Axis::Z, -1.0);
    pub const FAR: Self = Self::new(Axis::Z, 1.0);

    pub const fn new(axis: Axis, sign: f32) -> Self {
        Self { axis, sign }
    }

    /// Distance to the plane in units of `w`. Non-negative means inside.
    #[inline]
    pub fn signed_distance(&self, v: &Vertex) -> f32 {
        v.w() - self.sign * v.axis(self.axis)
    }

    #[inline]
    fn contains(&self, v: &Vertex) -> bool {
        self.signed_distance(v) >= 0.0
    }

    /// Pulls the component along this plane's axis back onto the inside
    /// half-space, bounded by `|w|`.
    #[inline]
    fn clamp(&self, v: &mut Vertex) {
        let bound = v.w().abs();
        let value = v.axis(self.axis);
        let clamped = if self.sign > 0.0 {
            value.min(bound)
        } else {
            value.max(-bound)
        };
        v.position = v.position.with_axis(self.axis, clamped);
    }
}

/// Clips triangles against a fixed set of planes.
#[derive(Clone, Debug)]
pub struct Clipper {
    planes: Vec<ClipPlane>,
}

impl Clipper {
    /// All six faces of the clip cube.
    pub fn new() -> Self {
        Self {
            planes: vec![
                ClipPlane::LEFT,
                ClipPlane::RIGHT,
                ClipPlane::BOTTOM,
                ClipPlane::TOP,
                ClipPlane::NEAR,
                ClipPlane::FAR,
            ],
        }
    }

    /// Only the near plane. Enough to keep `w` positive for the divide;
    /// the rasterizer discards whatever falls off screen.
    pub fn near_only() -> Self {
        Self {
            planes: vec![ClipPlane::NEAR],
        }
    }

    pub fn planes(&self) -> &[ClipPlane] {
        &self.planes
    }

    /// Clips a clip-space triangle and returns the triangles that remain.
    ///
    /// A triangle already inside every plane comes back unchanged; one fully
    /// outside any plane produces nothing.
    pub fn clip_triangle(&self, a: Vertex, b: Vertex, c: Vertex) -> Vec<[Vertex; 3]> {
        if self.planes.iter().all(|p| p.contains(&a) && p.contains(&b) && p.contains(&c)) {
            return vec![[a, b, c]];
        }

        let mut polygon = Vec::with_capacity(9);
        polygon.extend([a, b, c]);
        let mut scratch = Vec::with_capacity(9);

        for plane in &self.planes {
            if polygon.iter().all(|v| plane.contains(v)) {
                continue;
            }
            clip_against_plane(&polygon, *plane, &mut scratch);
            std::mem::swap(&mut polygon, &mut scratch);
            if polygon.len() < 3 {
                return Vec::new();
            }
        }

        // Lerping between vertices snapped by earlier planes can leave a
        // component one ulp past a plane already handled.
        for v in &mut polygon {
            for plane in &self.planes {
                plane.clamp(v);
            }
        }

        triangulate(&polygon)
    }
}

impl Default for Clipper {
    fn default() -> Self {
        Self::new()
    }
}

/// One Sutherland-Hodgman pass. Writes the clipped polygon into `output`.
fn clip_against_plane(input: &[Vertex], plane: ClipPlane, output: &mut Vec<Vertex>) {
    output.clear();
    let Some(mut previous) = input.last() else {
        return;
    };
    let mut previous_distance = plane.signed_distance(previous);

    for current in input {
        let current_distance = plane.signed_distance(current);
        let previous_inside = previous_distance >= 0.0;
        let current_inside = current_distance >= 0.0;

        if previous_inside != current_inside {
            let t = previous_distance / (previous_distance - current_distance);
            let crossing = previous.lerp(current, t);
            // Land exactly on the plane so later tests don't see rounding error.
            let on_plane = crossing
                .position
                .with_axis(plane.axis, plane.sign * crossing.w());
            output.push(Vertex {
                position: on_plane,
                ..crossing
            });
        }
        if current_inside {
            output.push(*current);
        }

        previous = current;
        previous_distance = current_distance;
    }
}

/// Fan triangulation around vertex 0. The input is convex after clipping.
fn triangulate(polygon: &[Vertex]) -> Vec<[Vertex; 3]> {
    (1..polygon.len().saturating_sub(1))
        .map(|i| [polygon[0], polygon[i], polygon[i + 1]])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::vec4::Vec4;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const TOLERANCE: f32 = 1e-5;

    fn vertex(x: f32, y: f32, z: f32, w: f32) -> Vertex {
        Vertex::new(
            Vec4::new(x, y, z, w),
            Vec4::new(x, y, 0.0, 0.0),
            Vec4::direction(0.0, 0.0, -1.0),
        )
    }

    #[test]
    fn fully_inside_triangle_is_returned_unchanged() {
        let a = vertex(0.0, 0.0, 0.0, 1.0);
        let b = vertex(1.0, 0.0, 0.0, 1.0);
        let c = vertex(0.0, 1.0, 0.0, 1.0);

        let out = Clipper::new().clip_triangle(a, b, c);

        assert_eq!(out, vec![[a, b, c]]);
    }

    #[test]
    fn fully_outside_one_plane_is_dropped() {
        let out = Clipper::new().clip_triangle(
            vertex(2.0, 0.0, 0.0, 1.0),
            vertex(3.0, 0.5, 0.0, 1.0),
            vertex(2.5, -0.5, 0.0, 1.0),
        );
        assert!(out.is_empty());
    }

    #[test]
    fn triangle_behind_camera_is_dropped() {
        let out = Clipper::new().clip_triangle(
            vertex(0.0, 0.0, 0.5, -1.0),
            vertex(0.5, 0.0, 0.5, -1.0),
            vertex(0.0, 0.5, 0.5, -1.0),
        );
        assert!(out.is_empty());
    }

    #[test]
    fn straddling_one_plane_yields_quad_as_two_triangles() {
        // One vertex past x = w, two inside: the cut produces a quad.
        let out = Clipper::new().clip_triangle(
            vertex(0.0, -0.5, 0.0, 1.0),
            vertex(2.0, 0.0, 0.0, 1.0),
            vertex(0.0, 0.5, 0.0, 1.0),
        );

        assert_eq!(out.len(), 2);
        for v in out.iter().flatten() {
            assert!(v.is_inside_view_frustum(), "{:?} escaped the frustum", v);
            assert!(v.x() <= 1.0);
        }
    }

    #[test]
    fn intersection_interpolates_attributes() {
        let out = Clipper::new().clip_triangle(
            vertex(0.0, -0.5, 0.0, 1.0),
            vertex(2.0, 0.0, 0.0, 1.0),
            vertex(0.0, 0.5, 0.0, 1.0),
        );

        // Every synthesized vertex sits on x = w and carries the texcoord
        // of the same point along its edge.
        let on_plane: Vec<_> = out
            .iter()
            .flatten()
            .filter(|v| (v.x() - 1.0).abs() < TOLERANCE)
            .collect();
        assert!(!on_plane.is_empty());
        for v in on_plane {
            assert_relative_eq!(v.tex_coords.x, 1.0, epsilon = TOLERANCE);
        }
    }

    #[test]
    fn vertex_behind_camera_is_clipped_to_positive_w() {
        let out = Clipper::new().clip_triangle(
            vertex(0.0, 0.0, 0.5, 1.0),
            vertex(0.2, 0.0, 0.5, 1.0),
            vertex(0.0, 0.0, -3.0, -2.0),
        );

        assert!(!out.is_empty());
        for v in out.iter().flatten() {
            assert!(v.w() > 0.0, "w = {}", v.w());
            assert!(v.is_inside_view_frustum(), "{:?} escaped the frustum", v);
        }
    }

    #[test]
    fn every_output_vertex_is_inside_for_a_large_triangle() {
        let out = Clipper::new().clip_triangle(
            vertex(-5.0, -4.0, 0.2, 1.0),
            vertex(6.0, -3.0, 0.9, 1.5),
            vertex(0.5, 7.0, -2.0, 0.8),
        );

        assert!(!out.is_empty());
        for v in out.iter().flatten() {
            assert!(v.is_inside_view_frustum(), "{:?} escaped the frustum", v);
        }
    }

    #[test]
    fn random_triangles_never_leave_the_frustum() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut coord = || rng.random_range(-3.0_f32..3.0);
        let clipper = Clipper::new();

        for _ in 0..20_000 {
            let mut corner = || vertex(coord(), coord(), coord(), coord());
            let (a, b, c) = (corner(), corner(), corner());
            for v in clipper.clip_triangle(a, b, c).iter().flatten() {
                assert!(v.is_inside_view_frustum(), "{:?} escaped the frustum", v);
                assert!(v.w() >= 0.0, "w = {}", v.w());
            }
        }
    }

    #[test]
    fn near_only_keeps_side_components_after_clipping() {
        // Crosses the near plane while sitting well past x = w.
        let out = Clipper::near_only().clip_triangle(
            vertex(4.0, 0.0, 0.5, 1.0),
            vertex(4.0, 0.5, 0.5, 1.0),
            vertex(4.0, 0.0, -3.0, -2.0),
        );

        assert!(!out.is_empty());
        for v in out.iter().flatten() {
            assert_relative_eq!(v.x(), 4.0);
            assert!(v.position.z >= -v.w());
        }
    }

    #[test]
    fn near_only_ignores_side_planes() {
        let a = vertex(5.0, 0.0, 0.0, 1.0);
        let b = vertex(6.0, 0.0, 0.0, 1.0);
        let c = vertex(5.0, 1.0, 0.0, 1.0);

        assert_eq!(Clipper::near_only().clip_triangle(a, b, c).len(), 1);
        assert!(Clipper::new().clip_triangle(a, b, c).is_empty());
    }

    #[test]
    fn signed_distance_matches_plane_equations() {
        let v = vertex(0.25, -0.5, 0.75, 1.0);
        assert_relative_eq!(ClipPlane::LEFT.signed_distance(&v), 1.25);
        assert_relative_eq!(ClipPlane::RIGHT.signed_distance(&v), 0.75);
        assert_relative_eq!(ClipPlane::BOTTOM.signed_distance(&v), 0.5);
        assert_relative_eq!(ClipPlane::TOP.signed_distance(&v), 1.5);
        assert_relative_eq!(ClipPlane::NEAR.signed_distance(&v), 1.75);
        assert_relative_eq!(ClipPlane::FAR.signed_distance(&v), 0.25);
    }
}
