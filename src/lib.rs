//! A CPU-only 3D rendering pipeline.
//!
//! Meshes are transformed into clip space, clipped against the view volume,
//! divided into NDC, mapped to the screen and filled with perspective-correct
//! texturing and a depth test. Everything runs on the CPU into plain
//! `Vec<u32>` / `Vec<f32>` buffers; nothing here opens a window.
//!
//! # Quick Start
//!
//! ```ignore
//! use softpipe::prelude::*;
//!
//! let mut ctx = RenderContext::new(800, 600);
//! let camera = Camera::looking_at(
//!     Vec3::new(0.0, 1.5, -4.0),
//!     Vec3::ZERO,
//!     Projection::for_viewport(70.0, 800, 600, 0.1, 100.0),
//! );
//! let texture = Texture::checkerboard(256, 8, colors::CHECKER_LIGHT, colors::CHECKER_DARK);
//!
//! let stats = Pipeline::default().draw_mesh(
//!     &mut ctx.as_framebuffer(),
//!     &Mesh::cube(),
//!     &camera.view_projection(),
//!     &Transform::new(),
//!     &texture,
//! );
//! ctx.save("cube.png")?;
//! ```

pub mod camera;
pub mod clipper;
pub mod colors;
pub mod error;
pub mod math;
pub mod mesh;
pub mod pipeline;
pub mod projection;
pub mod render;
pub mod stars;
pub mod texture;
pub mod transform;
pub mod vertex;

pub use camera::Camera;
pub use clipper::Clipper;
pub use error::{IndexError, LoadError};
pub use mesh::Mesh;
pub use pipeline::{DrawStats, Pipeline};
pub use projection::Projection;
pub use render::{CullMode, RasterizerType, RenderContext};
pub use stars::StarField;
pub use texture::{Sampler, Texture};
pub use transform::Transform;
pub use vertex::Vertex;

/// Prelude module for convenient imports.
///
/// # Example
/// ```ignore
/// use softpipe::prelude::*;
/// ```
pub mod prelude {
    // Scene setup
    pub use crate::camera::Camera;
    pub use crate::mesh::Mesh;
    pub use crate::projection::Projection;
    pub use crate::transform::Transform;

    // Pipeline
    pub use crate::clipper::{ClipPlane, Clipper};
    pub use crate::pipeline::{DrawStats, Pipeline};
    pub use crate::vertex::Vertex;

    // Rendering
    pub use crate::colors;
    pub use crate::render::{
        CullMode, FrameBuffer, Rasterizer, RasterizerDispatcher, RasterizerType, RenderContext,
        RenderTarget,
    };
    pub use crate::texture::{Filter, Sampler, SolidColor, Texture};

    // Star field
    pub use crate::stars::StarField;

    // Math
    pub use crate::math::mat4::Mat4;
    pub use crate::math::vec3::Vec3;
    pub use crate::math::vec4::Vec4;

    // Errors
    pub use crate::error::{IndexError, LoadError};
}

/// Module exposing internals for benchmarking. Not part of the stable API.
pub mod bench {
    pub use crate::render::{
        EdgeFunctionRasterizer, FrameBuffer, Rasterizer, RenderContext, ScanlineRasterizer,
    };
    pub use crate::texture::{SolidColor, Texture};
    pub use crate::vertex::Vertex;
}
