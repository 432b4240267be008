//! Geometry file I/O.
//!
//! This module handles reading and writing meshes and point clouds:
//! - OBJ (vertices, texture coordinates, normals, triangulated faces)
//! - PLY (point clouds, via `ply-rs`)
//! - PTX (Leica scanner grids, read only)
//! - MTL diffuse textures used to colorize OBJ vertices

mod config;
mod error;
mod format;
mod material;
mod obj;
mod ply;
mod ptx;
mod reconcile;

// Re-export public types and functions
pub use config::{IoConfig, PlyEncoding, PLY_ATTRIBUTION};
pub use error::{AttributeKind, MeshIoError, Result, TextureError};
pub use format::{
    load_object, output_path, read_object, read_object_with, write_object, write_object_with,
    MeshFormat, ReadReport,
};
pub use material::{colorize_faces, colorize_from_material, find_diffuse_map, Texture};
pub use obj::{parse_obj, read_obj, write_obj, write_obj_to, FaceGrammar};
pub use ply::{read_ply, write_ply};
pub use ptx::{parse_ptx, read_ptx};
pub use reconcile::{
    apply_face_normals, assign_normals_by_position, collect_vertex_normals,
    expand_vertex_normals, reconcile_normals, NormalReconciliation,
};
