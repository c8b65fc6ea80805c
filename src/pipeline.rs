//! Per-draw control flow from model-space triangles to pixels.
//!
//! ```text
//! model vertex ──MVP──▶ clip space ──Clipper──▶ clipped triangles
//!      ──÷w──▶ NDC ──viewport──▶ screen ──cull?──▶ Rasterizer ──▶ RenderTarget
//! ```
//!
//! The perspective divide only ever sees clipped vertices, so `w` is
//! positive when it is applied.

use std::ops::AddAssign;

use log::debug;

use crate::clipper::Clipper;
use crate::math::mat4::Mat4;
use crate::math::vec4::Vec4;
use crate::mesh::Mesh;
use crate::render::{RasterizerDispatcher, RenderTarget};
use crate::texture::Sampler;
use crate::transform::Transform;
use crate::vertex::Vertex;

/// What happened to the triangles of one draw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawStats {
    /// Triangles handed to the pipeline.
    pub submitted: usize,
    /// Submitted triangles with nothing left after clipping.
    pub clipped_away: usize,
    /// Post-clip triangles rejected by the cull mode.
    pub culled: usize,
    /// Post-clip triangles sent to the rasterizer.
    pub rasterized: usize,
}

impl AddAssign for DrawStats {
    fn add_assign(&mut self, other: Self) {
        self.submitted += other.submitted;
        self.clipped_away += other.clipped_away;
        self.culled += other.culled;
        self.rasterized += other.rasterized;
    }
}

/// Maps an NDC vertex to pixel coordinates with the origin at the top left.
///
/// `z` and `w` pass through untouched for the depth test and perspective
/// correction.
pub fn ndc_to_screen(v: &Vertex, width: u32, height: u32) -> Vertex {
    let half_width = width as f32 / 2.0;
    let half_height = height as f32 / 2.0;
    let p = v.position;
    Vertex::new(
        Vec4::new(
            (p.x + 1.0) * half_width,
            (1.0 - p.y) * half_height,
            p.z,
            p.w,
        ),
        v.tex_coords,
        v.normal,
    )
}

/// Clipper and rasterizer configured for a run of draws.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    clipper: Clipper,
    rasterizer: RasterizerDispatcher,
}

impl Pipeline {
    pub fn new(clipper: Clipper, rasterizer: RasterizerDispatcher) -> Self {
        Self {
            clipper,
            rasterizer,
        }
    }

    pub fn clipper(&self) -> &Clipper {
        &self.clipper
    }

    pub fn set_clipper(&mut self, clipper: Clipper) {
        self.clipper = clipper;
    }

    pub fn rasterizer(&self) -> &RasterizerDispatcher {
        &self.rasterizer
    }

    pub fn rasterizer_mut(&mut self) -> &mut RasterizerDispatcher {
        &mut self.rasterizer
    }

    /// Clips, projects and fills one clip-space triangle.
    pub fn draw_triangle<T, S>(&self, target: &mut T, triangle: [Vertex; 3], sampler: &S) -> DrawStats
    where
        T: RenderTarget + ?Sized,
        S: Sampler + ?Sized,
    {
        let mut stats = DrawStats {
            submitted: 1,
            ..Default::default()
        };

        let [a, b, c] = triangle;
        let pieces = self.clipper.clip_triangle(a, b, c);
        if pieces.is_empty() {
            stats.clipped_away = 1;
            return stats;
        }

        let (width, height) = (target.width(), target.height());
        for piece in pieces {
            let screen = piece.map(|v| ndc_to_screen(&v.perspective_divide(), width, height));
            if self.rasterizer.is_culled(&screen) {
                stats.culled += 1;
                continue;
            }
            self.rasterizer.fill_unculled(&screen, target, sampler);
            stats.rasterized += 1;
        }

        stats
    }

    /// Draws every triangle of `mesh` placed by `model` and seen through
    /// `view_projection`.
    pub fn draw_mesh<T, S>(
        &self,
        target: &mut T,
        mesh: &Mesh,
        view_projection: &Mat4,
        model: &Transform,
        sampler: &S,
    ) -> DrawStats
    where
        T: RenderTarget + ?Sized,
        S: Sampler + ?Sized,
    {
        let mvp = *view_projection * model.to_matrix();
        let normal_matrix = model.normal_matrix();

        let mut stats = DrawStats::default();
        for triangle in mesh.triangles() {
            let clip = triangle.map(|v| v.transform(&mvp, &normal_matrix));
            stats += self.draw_triangle(target, clip, sampler);
        }

        debug!(
            "Drew '{}': {} submitted, {} clipped away, {} culled, {} rasterized",
            mesh.name(),
            stats.submitted,
            stats.clipped_away,
            stats.culled,
            stats.rasterized
        );
        stats
    }
}
