//! # scanmesh: point-cloud and mesh file I/O
//!
//! Reads and writes the geometry produced by 3D scanners and reconstruction
//! pipelines: OBJ meshes (optionally colorized from their diffuse texture),
//! PLY point clouds and PTX scanner grids.
//!
//! ## Architecture
//!
//! - `core`: In-memory geometry (vertices, triangles, mesh buffers)
//! - `io`: Codecs and the extension-based dispatcher
//!
//! ```no_run
//! use scanmesh::io::{read_object, write_object};
//! use scanmesh::Mesh;
//! use std::path::Path;
//!
//! let mut mesh = Mesh::new();
//! let report = read_object(Path::new("scan.ptx"), &mut mesh)?;
//! println!("{} points ({})", mesh.vertices.len(), report.format);
//! let written = write_object(Path::new("scan.ptx"), &mesh)?; // scan.ply
//! # Ok::<(), scanmesh::MeshIoError>(())
//! ```

// Core data structures
pub mod core;

// File formats
pub mod io;

// Re-export commonly used types at crate root for convenience
pub use core::{Face, Mesh, Vertex};
pub use io::{IoConfig, MeshFormat, MeshIoError, ReadReport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
