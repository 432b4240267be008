//! Mesh buffers exchanged with the codecs.

use crate::core::{Face, Vertex};
use nalgebra::{Vector2, Vector3};
use std::path::PathBuf;

/// The parallel sequences every codec reads into or writes from.
///
/// Readers clear and refill the buffers; writers only borrow them. A failed
/// read leaves the buffers partially populated and they should be discarded.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,

    /// Texture coordinates `(u, v)`, referenced by face corners
    pub tex_coords: Vec<Vector2<f32>>,

    /// Normals, referenced by face corners or matched to vertices by position
    pub normals: Vec<Vector3<f32>>,

    pub faces: Vec<Face>,

    /// Material files, already resolved against the source file's directory
    pub materials: Vec<PathBuf>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a point cloud (no faces) from vertices.
    pub fn from_vertices(vertices: Vec<Vertex>) -> Self {
        Self {
            vertices,
            ..Self::default()
        }
    }

    pub fn has_faces(&self) -> bool {
        !self.faces.is_empty()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.tex_coords.clear();
        self.normals.clear();
        self.faces.clear();
        self.materials.clear();
    }

    /// Number of vertices passing [`Vertex::has_color`].
    pub fn colored_vertex_count(&self) -> usize {
        self.vertices.iter().filter(|v| v.has_color()).count()
    }
}
