//! Codec configuration.

use crate::io::{MeshIoError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Attribution comment stored in every PLY file we write.
pub const PLY_ATTRIBUTION: &str = "Written by scanmesh (https://crates.io/crates/scanmesh)";

/// Encoding of PLY output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlyEncoding {
    #[default]
    BinaryLittleEndian,
    BinaryBigEndian,
    Ascii,
}

impl PlyEncoding {
    pub(crate) fn to_ply(self) -> ply_rs::ply::Encoding {
        match self {
            PlyEncoding::BinaryLittleEndian => ply_rs::ply::Encoding::BinaryLittleEndian,
            PlyEncoding::BinaryBigEndian => ply_rs::ply::Encoding::BinaryBigEndian,
            PlyEncoding::Ascii => ply_rs::ply::Encoding::Ascii,
        }
    }
}

/// Options shared by the readers and writers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IoConfig {
    /// Colorize OBJ vertices from the first material's diffuse texture
    pub sample_textures: bool,

    pub ply_encoding: PlyEncoding,

    /// Comment written into the PLY header
    pub ply_comment: String,

    /// Reject inputs declaring or containing more vertices than this
    pub max_vertices: Option<usize>,
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            sample_textures: true,
            ply_encoding: PlyEncoding::default(),
            ply_comment: PLY_ATTRIBUTION.to_string(),
            max_vertices: None,
        }
    }
}

impl IoConfig {
    /// Load a configuration from a JSON file. Missing keys take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| MeshIoError::io(path, e))?;
        serde_json::from_str(&text)
            .map_err(|e| MeshIoError::format(path, Some(e.line()), e.to_string()))
    }

    pub(crate) fn check_vertex_budget(
        &self,
        path: &Path,
        line: Option<usize>,
        count: usize,
    ) -> Result<()> {
        match self.max_vertices {
            Some(max) if count > max => Err(MeshIoError::format(
                path,
                line,
                format!("{} vertices exceed the configured limit of {}", count, max),
            )),
            _ => Ok(()),
        }
    }
}
