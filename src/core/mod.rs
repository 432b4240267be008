//! Core data structures.
//!
//! This module contains the in-memory geometry shared by every codec:
//! - `Vertex`: position, optional normal, sentinel-encoded color
//! - `Face`: triangle with per-corner normal/texture references
//! - `Mesh`: the parallel buffers a read fills and a write drains
//!
//! All types here are "pure data" - no file I/O.

mod face;
mod mesh;
mod vertex;

// Re-export public types
pub use face::Face;
pub use mesh::Mesh;
pub use vertex::{Vertex, UNSET_RGB};
