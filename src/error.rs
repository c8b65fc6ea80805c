//! Error types for the pipeline's fallible edges.
//!
//! The per-frame hot path (clipping and rasterization) never fails; the only
//! errors are contract violations on component access and I/O while loading
//! meshes or textures.

use std::fmt;

/// A homogeneous component index outside `0..=3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexError {
    pub index: usize,
}

impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "component index {} out of range (expected 0..=3)",
            self.index
        )
    }
}

impl std::error::Error for IndexError {}

/// Failure while loading a mesh or a texture from disk.
#[derive(Debug)]
pub enum LoadError {
    Obj(tobj::LoadError),
    Image(image::ImageError),
    /// The file parsed but contained no triangles.
    EmptyMesh(String),
    /// Index count is not a multiple of three.
    PartialTriangle(String),
    /// A triangle index refers past the end of the vertex list.
    DanglingIndex {
        mesh: String,
        index: u32,
        vertex_count: usize,
    },
    /// A texture with zero width or height.
    EmptyTexture,
    /// Pixel count does not match `width * height`.
    TextureSize {
        width: u32,
        height: u32,
        pixels: usize,
    },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Obj(e) => write!(f, "failed to load OBJ: {}", e),
            LoadError::Image(e) => write!(f, "failed to load image: {}", e),
            LoadError::EmptyMesh(path) => write!(f, "mesh '{}' contains no triangles", path),
            LoadError::PartialTriangle(mesh) => {
                write!(f, "mesh '{}' has an index count not divisible by 3", mesh)
            }
            LoadError::DanglingIndex {
                mesh,
                index,
                vertex_count,
            } => write!(
                f,
                "mesh '{}' refers to vertex {} but has only {}",
                mesh, index, vertex_count
            ),
            LoadError::EmptyTexture => write!(f, "texture has zero width or height"),
            LoadError::TextureSize {
                width,
                height,
                pixels,
            } => write!(
                f,
                "{}x{} texture given {} pixels",
                width, height, pixels
            ),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Obj(e) => Some(e),
            LoadError::Image(e) => Some(e),
            _ => None,
        }
    }
}

impl From<tobj::LoadError> for LoadError {
    fn from(e: tobj::LoadError) -> Self {
        LoadError::Obj(e)
    }
}

impl From<image::ImageError> for LoadError {
    fn from(e: image::ImageError) -> Self {
        LoadError::Image(e)
    }
}
