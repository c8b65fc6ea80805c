//! Edge function-based triangle rasterization.
//!
//! # Algorithm Overview
//!
//! 1. Compute the triangle's bounding box, clamped to the target
//! 2. For each pixel in the box, evaluate the three edge functions
//! 3. A pixel is inside when all three agree in sign with the triangle's area
//!
//! # Edge Function
//!
//! For an edge from A to B, the edge function at P is twice the signed area
//! of the triangle (P, A, B):
//!
//! ```text
//! E(P) = (A.x - P.x) * (B.y - P.y) - (B.x - P.x) * (A.y - P.y)
//! ```
//!
//! Divided by the whole triangle's doubled area, the three edge values are
//! the barycentric weights of P. Dividing makes them non-negative inside the
//! triangle for either winding.
//!
//! # Interpolation
//!
//! Barycentric weights are linear in screen space, so `1/w`, `u/w`, `v/w`
//! and NDC depth are interpolated with them directly and `u`, `v` are
//! recovered per pixel by dividing by the interpolated `1/w`.
//!
//! Pixels are sampled at integer coordinates, matching the scanline path.
//!
//! # References
//!
//! - Juan Pineda, "A Parallel Algorithm for Polygon Rasterization" (1988)
//! - Scratchapixel: <https://www.scratchapixel.com/lessons/3d-basic-rendering/rasterization-practical-implementation>

use super::{Rasterizer, DEGENERATE_AREA};
use crate::render::framebuffer::RenderTarget;
use crate::texture::Sampler;
use crate::vertex::Vertex;

/// Triangle rasterizer using the edge function algorithm.
///
/// Tests every pixel in the triangle's bounding box. Simple and independent
/// per pixel, but thin diagonal triangles waste most of the box.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeFunctionRasterizer;

impl EdgeFunctionRasterizer {
    pub fn new() -> Self {
        Self
    }

    /// Twice the signed area of (p, a, b).
    #[inline]
    fn edge_function(a: &Vertex, b: &Vertex, px: f32, py: f32) -> f32 {
        (a.x() - px) * (b.y() - py) - (b.x() - px) * (a.y() - py)
    }

    /// Barycentric weights of (px, py), or `None` outside the triangle.
    #[inline]
    fn barycentric(v: &[Vertex; 3], inv_area: f32, px: f32, py: f32) -> Option<[f32; 3]> {
        let lambda = [
            Self::edge_function(&v[1], &v[2], px, py) * inv_area,
            Self::edge_function(&v[2], &v[0], px, py) * inv_area,
            Self::edge_function(&v[0], &v[1], px, py) * inv_area,
        ];
        lambda.iter().all(|&l| l >= 0.0).then_some(lambda)
    }
}

impl Rasterizer for EdgeFunctionRasterizer {
    fn fill_triangle<T, S>(&self, triangle: &[Vertex; 3], target: &mut T, sampler: &S)
    where
        T: RenderTarget + ?Sized,
        S: Sampler + ?Sized,
    {
        let [v0, v1, v2] = triangle;

        let area = v0.triangle_area_times_two(v1, v2);
        if area.abs() < DEGENERATE_AREA {
            return;
        }
        let inv_area = 1.0 / area;

        let min_x = (v0.x().min(v1.x()).min(v2.x()).floor() as i32).max(0);
        let max_x = (v0.x().max(v1.x()).max(v2.x()).ceil() as i32).min(target.width() as i32 - 1);
        let min_y = (v0.y().min(v1.y()).min(v2.y()).floor() as i32).max(0);
        let max_y = (v0.y().max(v1.y()).max(v2.y()).ceil() as i32).min(target.height() as i32 - 1);

        let one_over_w = triangle.map(|v| 1.0 / v.w());
        let u_over_w = [0, 1, 2].map(|i| triangle[i].tex_coords.x * one_over_w[i]);
        let v_over_w = [0, 1, 2].map(|i| triangle[i].tex_coords.y * one_over_w[i]);
        let depth = triangle.map(|v| v.position.z);

        let weigh = |lambda: &[f32; 3], values: &[f32; 3]| {
            lambda[0] * values[0] + lambda[1] * values[1] + lambda[2] * values[2]
        };

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let Some(lambda) = Self::barycentric(triangle, inv_area, x as f32, y as f32)
                else {
                    continue;
                };

                if !target.test_and_set_depth(x, y, weigh(&lambda, &depth)) {
                    continue;
                }

                let w = 1.0 / weigh(&lambda, &one_over_w);
                let u = weigh(&lambda, &u_over_w) * w;
                let v = weigh(&lambda, &v_over_w) * w;
                target.set_pixel(x, y, sampler.sample(u, v));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::colors;
    use crate::render::RenderContext;
    use crate::texture::SolidColor;
    use approx::assert_relative_eq;

    const FILL: u32 = 0xFF00FF00;

    #[test]
    fn weights_sum_to_one_inside() {
        let tri = [
            screen_vertex(0.0, 0.0, 0.0, 1.0, 0.0, 0.0),
            screen_vertex(8.0, 0.0, 0.0, 1.0, 0.0, 0.0),
            screen_vertex(0.0, 8.0, 0.0, 1.0, 0.0, 0.0),
        ];
        let inv_area = 1.0 / tri[0].triangle_area_times_two(&tri[1], &tri[2]);

        let lambda = EdgeFunctionRasterizer::barycentric(&tri, inv_area, 2.0, 3.0);
        let lambda = lambda.unwrap_or([0.0; 3]);
        assert_relative_eq!(lambda.iter().sum::<f32>(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(lambda[1], 0.25, epsilon = 1e-6);
        assert_relative_eq!(lambda[2], 0.375, epsilon = 1e-6);

        assert!(EdgeFunctionRasterizer::barycentric(&tri, inv_area, 6.0, 6.0).is_none());
    }

    #[test]
    fn winding_does_not_change_coverage() {
        let a = screen_vertex(3.0, 2.0, 0.0, 1.0, 0.0, 0.0);
        let b = screen_vertex(27.0, 9.0, 0.0, 1.0, 0.0, 0.0);
        let c = screen_vertex(11.0, 29.0, 0.0, 1.0, 0.0, 0.0);

        let mut cw = RenderContext::new(32, 32);
        let mut ccw = RenderContext::new(32, 32);
        let rasterizer = EdgeFunctionRasterizer::new();
        rasterizer.fill_triangle(&[a, b, c], &mut cw.as_framebuffer(), &SolidColor(FILL));
        rasterizer.fill_triangle(&[a, c, b], &mut ccw.as_framebuffer(), &SolidColor(FILL));

        let covered = written_pixels(&cw, colors::BACKGROUND);
        assert!(!covered.is_empty());
        assert_eq!(covered, written_pixels(&ccw, colors::BACKGROUND));
    }

    #[test]
    fn depth_is_interpolated_linearly() {
        let tri = [
            screen_vertex(0.0, 0.0, 0.0, 1.0, 0.0, 0.0),
            screen_vertex(20.0, 0.0, 1.0, 1.0, 0.0, 0.0),
            screen_vertex(0.0, 20.0, 0.0, 1.0, 0.0, 0.0),
        ];
        let mut ctx = RenderContext::new(32, 32);
        let mut fb = ctx.as_framebuffer();
        EdgeFunctionRasterizer::new().fill_triangle(&tri, &mut fb, &SolidColor(FILL));

        assert_relative_eq!(fb.get_depth(5, 2).unwrap_or(f32::NAN), 0.25, epsilon = 1e-5);
        assert_relative_eq!(fb.get_depth(10, 0).unwrap_or(f32::NAN), 0.5, epsilon = 1e-5);
    }
}
