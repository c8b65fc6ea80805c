//! Fragment-level rendering: buffers and triangle fill.

mod context;
mod framebuffer;
pub mod rasterizer;

pub use context::RenderContext;
pub use framebuffer::{FrameBuffer, RenderTarget};
pub use rasterizer::{
    CullMode, EdgeFunctionRasterizer, Rasterizer, RasterizerDispatcher, RasterizerType,
    ScanlineRasterizer,
};
