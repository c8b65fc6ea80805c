//! Scanline-based triangle rasterization.
//!
//! # Algorithm Overview
//!
//! 1. **Sort vertices** by Y coordinate (top to bottom in screen space)
//! 2. **Build gradients**: every interpolated quantity is a plane over the
//!    screen, so its change per pixel in x and in y is constant for the whole
//!    triangle
//! 3. **Walk edges**: the long edge (top → bottom) runs down one side, the two
//!    short edges (top → middle, middle → bottom) down the other
//! 4. **Fill spans** between the two active edges one scanline at a time
//!
//! ```text
//!        top
//!        /\
//!       /  \  top→middle
//!      /    \
//!     /     middle        long edge on the left,
//!    /    /               short edges on the right
//!   /  /   middle→bottom
//!  //
//! bottom
//! ```
//!
//! # Fill Convention
//!
//! A pixel at integer `(x, y)` is covered when `left <= x < right` on row `y`,
//! and rows run from `ceil(top.y)` up to but excluding `ceil(bottom.y)`.
//! Triangles sharing an edge therefore never draw the same pixel twice.
//!
//! # Perspective Correction
//!
//! `u` and `v` are not linear in screen space, but `u/w`, `v/w` and `1/w`
//! are. Those are what the gradients carry; each pixel divides by the
//! interpolated `1/w` to recover the texture coordinate. NDC depth is
//! already linear in screen space and is interpolated directly.

use super::{Rasterizer, DEGENERATE_AREA};
use crate::render::framebuffer::RenderTarget;
use crate::texture::Sampler;
use crate::vertex::Vertex;

const ONE_OVER_W: usize = 0;
const U_OVER_W: usize = 1;
const V_OVER_W: usize = 2;
const DEPTH: usize = 3;

/// The screen-linear quantities carried per vertex.
type Varyings = [f32; 4];

fn varyings(v: &Vertex) -> Varyings {
    let one_over_w = 1.0 / v.w();
    let mut out = [0.0; 4];
    out[ONE_OVER_W] = one_over_w;
    out[U_OVER_W] = v.tex_coords.x * one_over_w;
    out[V_OVER_W] = v.tex_coords.y * one_over_w;
    out[DEPTH] = v.position.z;
    out
}

#[inline]
fn add_scaled(base: Varyings, step: Varyings, amount: f32) -> Varyings {
    std::array::from_fn(|i| base[i] + step[i] * amount)
}

/// Per-pixel rates of change of every varying across one triangle.
struct Gradients {
    at_vertex: [Varyings; 3],
    x_step: Varyings,
    y_step: Varyings,
}

impl Gradients {
    /// `v` must be sorted by y and have non-zero area.
    fn new(v: &[Vertex; 3]) -> Self {
        let at_vertex = [varyings(&v[0]), varyings(&v[1]), varyings(&v[2])];

        let one_over_dx = 1.0
            / ((v[1].x() - v[2].x()) * (v[0].y() - v[2].y())
                - (v[0].x() - v[2].x()) * (v[1].y() - v[2].y()));
        let one_over_dy = -one_over_dx;

        let x_step = std::array::from_fn(|i| {
            let c = [at_vertex[0][i], at_vertex[1][i], at_vertex[2][i]];
            ((c[1] - c[2]) * (v[0].y() - v[2].y()) - (c[0] - c[2]) * (v[1].y() - v[2].y()))
                * one_over_dx
        });
        let y_step = std::array::from_fn(|i| {
            let c = [at_vertex[0][i], at_vertex[1][i], at_vertex[2][i]];
            ((c[1] - c[2]) * (v[0].x() - v[2].x()) - (c[0] - c[2]) * (v[1].x() - v[2].x()))
                * one_over_dy
        });

        Self {
            at_vertex,
            x_step,
            y_step,
        }
    }
}

/// One triangle edge being walked down the screen.
struct Edge {
    x: f32,
    x_step: f32,
    y_start: i32,
    y_end: i32,
    /// Row that `x` and `varyings` currently describe.
    row: i32,
    varyings: Varyings,
    varying_step: Varyings,
}

impl Edge {
    fn new(gradients: &Gradients, v: &[Vertex; 3], top: usize, bottom: usize) -> Self {
        let (t, b) = (&v[top], &v[bottom]);
        let y_start = t.y().ceil() as i32;
        let y_end = b.y().ceil() as i32;

        let y_dist = b.y() - t.y();
        let x_step = if y_dist > 0.0 {
            (b.x() - t.x()) / y_dist
        } else {
            0.0
        };

        // Move from the vertex to the first pixel row it covers.
        let y_prestep = y_start as f32 - t.y();
        let x = t.x() + y_prestep * x_step;
        let x_prestep = x - t.x();

        let base = gradients.at_vertex[top];
        let varyings = std::array::from_fn(|i| {
            base[i] + gradients.x_step[i] * x_prestep + gradients.y_step[i] * y_prestep
        });
        let varying_step =
            std::array::from_fn(|i| gradients.y_step[i] + gradients.x_step[i] * x_step);

        Self {
            x,
            x_step,
            y_start,
            y_end,
            row: y_start,
            varyings,
            varying_step,
        }
    }

    /// Moves the edge down to `row`.
    #[inline]
    fn advance_to(&mut self, row: i32) {
        let rows = (row - self.row) as f32;
        if rows != 0.0 {
            self.x += self.x_step * rows;
            self.varyings = add_scaled(self.varyings, self.varying_step, rows);
            self.row = row;
        }
    }
}

/// Scanline triangle rasterizer with perspective-correct texturing.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanlineRasterizer;

impl ScanlineRasterizer {
    pub fn new() -> Self {
        Self
    }

    /// Sorts three vertices by Y coordinate (ascending: top to bottom in screen space).
    ///
    /// Three compare-and-swaps suffice for three elements.
    fn sort_vertices(v: &mut [Vertex; 3]) {
        if v[1].y() < v[0].y() {
            v.swap(0, 1);
        }
        if v[2].y() < v[1].y() {
            v.swap(1, 2);
        }
        if v[1].y() < v[0].y() {
            v.swap(0, 1);
        }
    }

    /// Walks rows shared by `long` and `short`, filling the span between them.
    fn scan_edges<T, S>(
        gradients: &Gradients,
        long: &mut Edge,
        short: &mut Edge,
        short_on_left: bool,
        target: &mut T,
        sampler: &S,
    ) where
        T: RenderTarget + ?Sized,
        S: Sampler + ?Sized,
    {
        // Rows above or below the screen are never visited.
        let y_start = short.y_start.max(0);
        let y_end = short.y_end.min(target.height() as i32);

        for y in y_start..y_end {
            long.advance_to(y);
            short.advance_to(y);
            let (left, right) = if short_on_left {
                (&*short, &*long)
            } else {
                (&*long, &*short)
            };
            Self::draw_scanline(gradients, left, right, y, target, sampler);
        }
    }

    fn draw_scanline<T, S>(
        gradients: &Gradients,
        left: &Edge,
        right: &Edge,
        y: i32,
        target: &mut T,
        sampler: &S,
    ) where
        T: RenderTarget + ?Sized,
        S: Sampler + ?Sized,
    {
        let x_min = (left.x.ceil() as i32).max(0);
        let x_max = (right.x.ceil() as i32).min(target.width() as i32);
        if x_min >= x_max {
            return;
        }

        let x_prestep = x_min as f32 - left.x;
        let mut current = add_scaled(left.varyings, gradients.x_step, x_prestep);

        for x in x_min..x_max {
            let w = 1.0 / current[ONE_OVER_W];
            if target.test_and_set_depth(x, y, current[DEPTH]) {
                let u = current[U_OVER_W] * w;
                let v = current[V_OVER_W] * w;
                target.set_pixel(x, y, sampler.sample(u, v));
            }
            current = add_scaled(current, gradients.x_step, 1.0);
        }
    }
}

impl Rasterizer for ScanlineRasterizer {
    fn fill_triangle<T, S>(&self, triangle: &[Vertex; 3], target: &mut T, sampler: &S)
    where
        T: RenderTarget + ?Sized,
        S: Sampler + ?Sized,
    {
        let mut v = *triangle;
        Self::sort_vertices(&mut v);

        let area = v[0].triangle_area_times_two(&v[2], &v[1]);
        if area.abs() < DEGENERATE_AREA {
            return;
        }
        // Positive area: the middle vertex sits left of the long edge.
        let middle_on_left = area >= 0.0;

        let gradients = Gradients::new(&v);
        let mut long = Edge::new(&gradients, &v, 0, 2);
        let mut top_to_middle = Edge::new(&gradients, &v, 0, 1);
        let mut middle_to_bottom = Edge::new(&gradients, &v, 1, 2);

        Self::scan_edges(
            &gradients,
            &mut long,
            &mut top_to_middle,
            middle_on_left,
            target,
            sampler,
        );
        Self::scan_edges(
            &gradients,
            &mut long,
            &mut middle_to_bottom,
            middle_on_left,
            target,
            sampler,
        );
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
    fn sort_orders_by_y() {
        let mut v = [
            screen_vertex(0.0, 30.0, 0.0, 1.0, 0.0, 0.0),
            screen_vertex(0.0, 10.0, 0.0, 1.0, 0.0, 0.0),
            screen_vertex(0.0, 20.0, 0.0, 1.0, 0.0, 0.0),
        ];
        ScanlineRasterizer::sort_vertices(&mut v);
        assert_eq!([v[0].y(), v[1].y(), v[2].y()], [10.0, 20.0, 30.0]);
    }

    #[test]
    fn gradients_reproduce_vertex_values() {
        let v = [
            screen_vertex(5.0, 2.0, 0.1, 1.0, 0.0, 0.0),
            screen_vertex(30.0, 12.0, 0.4, 2.0, 1.0, 0.0),
            screen_vertex(9.0, 40.0, 0.9, 4.0, 0.0, 1.0),
        ];
        let g = Gradients::new(&v);

        // Walking from vertex 0 to vertex 2 along the gradients lands on vertex 2's values.
        let dx = v[2].x() - v[0].x();
        let dy = v[2].y() - v[0].y();
        for i in 0..4 {
            let predicted = g.at_vertex[0][i] + g.x_step[i] * dx + g.y_step[i] * dy;
            assert_relative_eq!(predicted, g.at_vertex[2][i], epsilon = 1e-5);
        }
    }

    /// Accepts every fragment and counts them, so double writes show up.
    struct CountingTarget {
        writes: usize,
    }

    impl RenderTarget for CountingTarget {
        fn width(&self) -> u32 {
            32
        }

        fn height(&self) -> u32 {
            32
        }

        fn test_and_set_depth(&mut self, _x: i32, _y: i32, _depth: f32) -> bool {
            self.writes += 1;
            true
        }

        fn set_pixel(&mut self, _x: i32, _y: i32, _color: u32) {}
    }

    #[test]
    fn shared_edge_is_drawn_once() {
        // Two triangles forming a 24 x 24 quad.
        let a = screen_vertex(4.0, 4.0, 0.5, 1.0, 0.0, 0.0);
        let b = screen_vertex(28.0, 4.0, 0.5, 1.0, 0.0, 0.0);
        let c = screen_vertex(28.0, 28.0, 0.5, 1.0, 0.0, 0.0);
        let d = screen_vertex(4.0, 28.0, 0.5, 1.0, 0.0, 0.0);

        let r = ScanlineRasterizer::new();
        let mut target = CountingTarget { writes: 0 };
        r.fill_triangle(&[a, b, c], &mut target, &SolidColor(FILL));
        r.fill_triangle(&[a, c, d], &mut target, &SolidColor(FILL));
        assert_eq!(target.writes, 24 * 24);

        let mut ctx = RenderContext::new(32, 32);
        r.fill_triangle(&[a, b, c], &mut ctx.as_framebuffer(), &SolidColor(FILL));
        r.fill_triangle(&[a, c, d], &mut ctx.as_framebuffer(), &SolidColor(FILL));
        assert_eq!(written_pixels(&ctx, colors::BACKGROUND).len(), 24 * 24);
    }

    #[test]
    fn vertex_order_does_not_change_coverage() {
        let p = [
            screen_vertex(3.5, 2.2, 0.0, 1.0, 0.0, 0.0),
            screen_vertex(27.1, 9.8, 0.0, 1.0, 0.0, 0.0),
            screen_vertex(12.4, 30.6, 0.0, 1.0, 0.0, 0.0),
        ];
        let coverage = |tri: [Vertex; 3]| {
            let mut ctx = RenderContext::new(32, 32);
            ScanlineRasterizer::new().fill_triangle(&tri, &mut ctx.as_framebuffer(), &SolidColor(FILL));
            written_pixels(&ctx, colors::BACKGROUND)
        };

        let reference = coverage(p);
        assert!(!reference.is_empty());
        assert_eq!(coverage([p[1], p[2], p[0]]), reference);
        assert_eq!(coverage([p[2], p[1], p[0]]), reference);
    }
}
