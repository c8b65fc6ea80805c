//! Linear algebra primitives used by the pipeline.

pub mod mat4;
pub mod vec3;
pub mod vec4;
