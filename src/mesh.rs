//! Indexed triangle meshes.
//!
//! A [`Mesh`] is what the pipeline draws: model-space vertices plus a flat
//! list of triangle indices, three per triangle.

use std::path::Path;

use log::{info, warn};

use crate::error::LoadError;
use crate::math::vec3::Vec3;
use crate::math::vec4::Vec4;
use crate::vertex::Vertex;

#[derive(Debug, Clone)]
pub struct Mesh {
    name: String,
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

/// Corners of the unit cube, shared by [`Mesh::cube`].
const CUBE_CORNERS: [Vec3; 8] = [
    Vec3::new(-1.0, -1.0, -1.0),
    Vec3::new(-1.0, 1.0, -1.0),
    Vec3::new(1.0, 1.0, -1.0),
    Vec3::new(1.0, -1.0, -1.0),
    Vec3::new(1.0, 1.0, 1.0),
    Vec3::new(1.0, -1.0, 1.0),
    Vec3::new(-1.0, 1.0, 1.0),
    Vec3::new(-1.0, -1.0, 1.0),
];

/// Each face as bottom-left, top-left, top-right, bottom-right seen from outside.
const CUBE_FACES: [[usize; 4]; 6] = [
    [0, 1, 2, 3], // front (-z)
    [3, 2, 4, 5], // right (+x)
    [5, 4, 6, 7], // back (+z)
    [7, 6, 1, 0], // left (-x)
    [1, 6, 4, 2], // top (+y)
    [5, 7, 0, 3], // bottom (-y)
];

const QUAD_UVS: [(f32, f32); 4] = [(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)];

impl Mesh {
    /// Builds a mesh from raw vertices and triangle indices.
    ///
    /// Fails if `indices` is not a whole number of triangles or refers past
    /// the end of `vertices`.
    pub fn new(
        name: impl Into<String>,
        vertices: Vec<Vertex>,
        indices: Vec<u32>,
    ) -> Result<Self, LoadError> {
        let name = name.into();
        if indices.len() % 3 != 0 {
            return Err(LoadError::PartialTriangle(name));
        }
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(LoadError::DanglingIndex {
                mesh: name,
                index,
                vertex_count: vertices.len(),
            });
        }
        Ok(Self {
            name,
            vertices,
            indices,
        })
    }

    /// Load every object in an OBJ file and merge them into one mesh.
    ///
    /// Faces are triangulated and positions, normals and texture coordinates
    /// are unified under a single index. Missing normals default to +Y and
    /// missing texture coordinates to (0, 0).
    pub fn from_obj<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        info!("Loading OBJ file: {:?}", path);

        let load_options = tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        };
        let (models, _materials) = tobj::load_obj(path, &load_options)?;

        let mut vertices = Vec::new();
        let mut indices = Vec::new();

        for model in models {
            let mesh = &model.mesh;
            let offset = vertices.len() as u32;
            let has_normals = !mesh.normals.is_empty();
            let has_texcoords = !mesh.texcoords.is_empty();

            if !has_normals {
                warn!("Mesh '{}' has no normals, using +Y", model.name);
            }

            for i in 0..mesh.positions.len() / 3 {
                let position = Vec4::point(
                    mesh.positions[i * 3],
                    mesh.positions[i * 3 + 1],
                    mesh.positions[i * 3 + 2],
                );
                let normal = if has_normals {
                    Vec4::direction(
                        mesh.normals[i * 3],
                        mesh.normals[i * 3 + 1],
                        mesh.normals[i * 3 + 2],
                    )
                } else {
                    Vec4::direction(0.0, 1.0, 0.0)
                };
                let tex_coords = if has_texcoords {
                    Vec4::new(mesh.texcoords[i * 2], mesh.texcoords[i * 2 + 1], 0.0, 0.0)
                } else {
                    Vec4::ZERO
                };
                vertices.push(Vertex::new(position, tex_coords, normal));
            }

            indices.extend(mesh.indices.iter().map(|&i| i + offset));
        }

        if indices.len() < 3 {
            return Err(LoadError::EmptyMesh(path.display().to_string()));
        }

        info!(
            "OBJ loaded: {} vertices, {} triangles",
            vertices.len(),
            indices.len() / 3
        );

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::new(name, vertices, indices)
    }

    /// A 2x2x2 cube centered on the origin with one full texture per face.
    ///
    /// Front faces wind clockwise on screen.
    pub fn cube() -> Self {
        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);

        for face in CUBE_FACES {
            let [bl, tl, _, br] = face.map(|i| CUBE_CORNERS[i]);
            let normal = (tl - bl).cross(br - bl).normalize();
            let base = vertices.len() as u32;

            for (&corner, &(u, v)) in face.iter().zip(QUAD_UVS.iter()) {
                let p = CUBE_CORNERS[corner];
                vertices.push(Vertex::new(
                    Vec4::from(p),
                    Vec4::new(u, v, 0.0, 0.0),
                    Vec4::direction(normal.x, normal.y, normal.z),
                ));
            }

            indices.extend([base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self {
            name: "cube".to_string(),
            vertices,
            indices,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Each triangle's three vertices, in index order.
    pub fn triangles(&self) -> impl Iterator<Item = [Vertex; 3]> + '_ {
        // Indices were checked against `vertices` on construction.
        self.indices
            .chunks_exact(3)
            .map(|tri| {
                [
                    self.vertices[tri[0] as usize],
                    self.vertices[tri[1] as usize],
                    self.vertices[tri[2] as usize],
                ]
            })
    }
}
