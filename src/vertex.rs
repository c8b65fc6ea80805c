//! The per-point value carried through every pipeline stage.
//!
//! A [`Vertex`] has no notion of which coordinate space it is in; the stage
//! holding it knows. The flow is model → clip (via [`Vertex::transform`]) →
//! NDC (via [`Vertex::perspective_divide`]) → screen. Every operation returns
//! a new value, nothing is mutated in place.

use crate::error::IndexError;
use crate::math::mat4::Mat4;
use crate::math::vec4::{Axis, Vec4};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    pub position: Vec4,
    pub tex_coords: Vec4,
    pub normal: Vec4,
}

impl Vertex {
    pub fn new(position: Vec4, tex_coords: Vec4, normal: Vec4) -> Self {
        Self {
            position,
            tex_coords,
            normal,
        }
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.position.x
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.position.y
    }

    /// Applies `transform` to the position and `normal_transform` to the
    /// normal. The normal is re-normalized since the matrix may scale.
    pub fn transform(&self, transform: &Mat4, normal_transform: &Mat4) -> Self {
        Self::new(
            *transform * self.position,
            self.tex_coords,
            (*normal_transform * self.normal).normalize(),
        )
    }

    /// Divides x, y, z by w. `w` itself is kept so later stages can recover
    /// depth for perspective-correct interpolation.
    ///
    /// Only valid on clipped vertices, where `w > 0`.
    pub fn perspective_divide(&self) -> Self {
        let p = self.position;
        Self::new(
            Vec4::new(p.x / p.w, p.y / p.w, p.z / p.w, p.w),
            self.tex_coords,
            self.normal,
        )
    }

    /// Twice the signed area of the triangle (self, b, c) in the xy plane.
    ///
    /// The sign encodes winding; zero means the points are collinear.
    pub fn triangle_area_times_two(&self, b: &Vertex, c: &Vertex) -> f32 {
        let x1 = b.x() - self.x();
        let y1 = b.y() - self.y();

        let x2 = c.x() - self.x();
        let y2 = c.y() - self.y();

        x1 * y2 - x2 * y1
    }

    /// Interpolates every attribute toward `other`. `t = 0` yields `self`,
    /// `t = 1` yields `other`.
    pub fn lerp(&self, other: &Vertex, t: f32) -> Self {
        Self::new(
            self.position.lerp(other.position, t),
            self.tex_coords.lerp(other.tex_coords, t),
            self.normal.lerp(other.normal, t),
        )
    }

    /// Homogeneous clip test: `|x|, |y|, |z| <= |w|`.
    pub fn is_inside_view_frustum(&self) -> bool {
        let p = self.position;
        let w = p.w.abs();
        p.x.abs() <= w && p.y.abs() <= w && p.z.abs() <= w
    }

    /// Position component by index (0=x, 1=y, 2=z, 3=w).
    pub fn get(&self, index: usize) -> Result<f32, IndexError> {
        self.position.get(index)
    }

    /// Position component along a spatial axis.
    #[inline]
    pub fn axis(&self, axis: Axis) -> f32 {
        self.position.axis(axis)
    }

    #[inline]
    pub fn w(&self) -> f32 {
        self.position.w
    }
}
