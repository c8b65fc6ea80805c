//! Triangle rasterization algorithms.
//!
//! Input triangles are in screen space: `x`/`y` in pixels (top-left origin),
//! `z` the NDC depth and `w` the clip-space `w` kept by the perspective
//! divide. Texture coordinates are interpolated perspective-correctly: the
//! rasterizers interpolate `1/w`, `u/w` and `v/w` linearly across the screen
//! and divide back per pixel.
//!
//! Available algorithms:
//! - [`ScanlineRasterizer`]: edge walking with per-attribute gradients
//! - [`EdgeFunctionRasterizer`]: bounding box iteration with area-ratio weights

mod edgefunction;
mod scanline;

pub use edgefunction::EdgeFunctionRasterizer;
pub use scanline::ScanlineRasterizer;

use super::framebuffer::RenderTarget;
use crate::texture::Sampler;
use crate::vertex::Vertex;

/// Triangles with less than this much (doubled) screen area are skipped.
pub(crate) const DEGENERATE_AREA: f32 = 1e-6;

/// Trait for triangle rasterization algorithms.
///
/// Implementors fill every covered pixel whose depth passes the target's
/// depth test with the texel sampled at its interpolated texture coordinate.
pub trait Rasterizer {
    fn fill_triangle<T, S>(&self, triangle: &[Vertex; 3], target: &mut T, sampler: &S)
    where
        T: RenderTarget + ?Sized,
        S: Sampler + ?Sized;
}

/// Which screen-space winding to discard.
///
/// Winding is judged as it appears on screen (y pointing down).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CullMode {
    #[default]
    None,
    Clockwise,
    CounterClockwise,
}

impl CullMode {
    /// Whether a triangle with doubled signed screen area `area` is dropped.
    /// Positive area is clockwise on a y-down screen.
    pub fn culls(self, area: f32) -> bool {
        match self {
            CullMode::None => false,
            CullMode::Clockwise => area > 0.0,
            CullMode::CounterClockwise => area < 0.0,
        }
    }
}

/// Available rasterization algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RasterizerType {
    /// Scanline edge walking. The reference path.
    #[default]
    Scanline,
    /// Bounding-box traversal testing each pixel against the three edges.
    EdgeFunction,
}

impl std::fmt::Display for RasterizerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RasterizerType::Scanline => write!(f, "Scanline"),
            RasterizerType::EdgeFunction => write!(f, "EdgeFunction"),
        }
    }
}

/// Holds both rasterizers and applies the cull policy before filling.
#[derive(Debug, Clone)]
pub struct RasterizerDispatcher {
    scanline: ScanlineRasterizer,
    edge_function: EdgeFunctionRasterizer,
    active: RasterizerType,
    cull_mode: CullMode,
}

impl RasterizerDispatcher {
    pub fn new(rasterizer_type: RasterizerType, cull_mode: CullMode) -> Self {
        Self {
            scanline: ScanlineRasterizer::new(),
            edge_function: EdgeFunctionRasterizer::new(),
            active: rasterizer_type,
            cull_mode,
        }
    }

    pub fn set_type(&mut self, rasterizer_type: RasterizerType) {
        self.active = rasterizer_type;
    }

    pub fn active_type(&self) -> RasterizerType {
        self.active
    }

    pub fn set_cull_mode(&mut self, cull_mode: CullMode) {
        self.cull_mode = cull_mode;
    }

    pub fn cull_mode(&self) -> CullMode {
        self.cull_mode
    }

    /// Whether the configured cull mode rejects this screen-space triangle.
    pub fn is_culled(&self, triangle: &[Vertex; 3]) -> bool {
        let [a, b, c] = triangle;
        self.cull_mode.culls(a.triangle_area_times_two(b, c))
    }

    /// Fills with the active rasterizer, skipping the cull test. For callers
    /// that already ran [`RasterizerDispatcher::is_culled`].
    #[inline]
    pub fn fill_unculled<T, S>(&self, triangle: &[Vertex; 3], target: &mut T, sampler: &S)
    where
        T: RenderTarget + ?Sized,
        S: Sampler + ?Sized,
    {
        match self.active {
            RasterizerType::Scanline => self.scanline.fill_triangle(triangle, target, sampler),
            RasterizerType::EdgeFunction => {
                self.edge_function.fill_triangle(triangle, target, sampler)
            }
        }
    }
}

impl Default for RasterizerDispatcher {
    fn default() -> Self {
        Self::new(RasterizerType::default(), CullMode::default())
    }
}

impl Rasterizer for RasterizerDispatcher {
    #[inline]
    fn fill_triangle<T, S>(&self, triangle: &[Vertex; 3], target: &mut T, sampler: &S)
    where
        T: RenderTarget + ?Sized,
        S: Sampler + ?Sized,
    {
        if self.is_culled(triangle) {
            return;
        }
        self.fill_unculled(triangle, target, sampler);
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Helpers shared by both rasterizers' tests.

    use crate::math::vec4::Vec4;
    use crate::render::RenderContext;
    use crate::texture::Sampler;
    use crate::vertex::Vertex;

    /// Screen-space vertex with texcoord (u, v).
    pub fn screen_vertex(x: f32, y: f32, z: f32, w: f32, u: f32, v: f32) -> Vertex {
        Vertex::new(
            Vec4::new(x, y, z, w),
            Vec4::new(u, v, 0.0, 0.0),
            Vec4::direction(0.0, 0.0, -1.0),
        )
    }

    /// Encodes the sampled `u` as the color so tests can read it back.
    pub struct UProbe;

    impl Sampler for UProbe {
        fn sample(&self, u: f32, _v: f32) -> u32 {
            0xFF000000 | (u * 10_000.0).round() as u32
        }
    }

    pub fn decode_u(color: u32) -> f32 {
        (color & 0x00FF_FFFF) as f32 / 10_000.0
    }

    /// Coordinates of every pixel whose color differs from `background`.
    pub fn written_pixels(ctx: &RenderContext, background: u32) -> Vec<(i32, i32)> {
        let width = ctx.width() as usize;
        ctx.color_buffer()
            .iter()
            .enumerate()
            .filter(|(_, &c)| c != background)
            .map(|(i, _)| ((i % width) as i32, (i / width) as i32))
            .collect()
    }
}
