//! Extension-based dispatch between the codecs.
//!
//! Reads pick a codec from the lowercase file extension. Writes pick one from
//! the mesh itself: a mesh with faces is written as OBJ, a point cloud as PLY,
//! and the requested file name is rewritten to match.

use crate::core::Mesh;
use crate::io::obj::{read_obj, write_obj, FaceGrammar};
use crate::io::ply::{read_ply, write_ply};
use crate::io::ptx::read_ptx;
use crate::io::{IoConfig, MeshIoError, Result, TextureError};
use std::fmt;
use std::path::{Path, PathBuf};

/// Supported geometry file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshFormat {
    Ply,
    Obj,
    Ptx,
}

impl MeshFormat {
    /// Lowercase file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            MeshFormat::Ply => "ply",
            MeshFormat::Obj => "obj",
            MeshFormat::Ptx => "ptx",
        }
    }

    /// Match an extension exactly (after lowercasing).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "ply" => Some(MeshFormat::Ply),
            "obj" => Some(MeshFormat::Obj),
            "ptx" => Some(MeshFormat::Ptx),
            _ => None,
        }
    }

    /// Format named by the text after the last `.` of the file name.
    ///
    /// Unlike [`Path::extension`], a leading dot counts: `.PLY` is a PLY file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        let ext = name.rsplit_once('.').map(|(_, ext)| ext).unwrap_or_default();
        Self::from_extension(ext).ok_or_else(|| MeshIoError::UnsupportedFormat(ext.to_string()))
    }

    /// Format a mesh is written in: OBJ when it has faces, PLY otherwise.
    pub fn for_mesh(mesh: &Mesh) -> Self {
        if mesh.has_faces() {
            MeshFormat::Obj
        } else {
            MeshFormat::Ply
        }
    }
}

impl fmt::Display for MeshFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Outcome of a successful read.
#[derive(Debug)]
pub struct ReadReport {
    pub format: MeshFormat,

    /// Face grammar in effect when the last OBJ face was parsed
    pub grammar: Option<FaceGrammar>,

    /// Faces whose vertices were painted from a texture
    pub colorized_faces: usize,

    /// Why texture colorization was skipped, if it was attempted and failed
    pub texture_error: Option<TextureError>,
}

impl ReadReport {
    pub(crate) fn new(format: MeshFormat) -> Self {
        Self {
            format,
            grammar: None,
            colorized_faces: 0,
            texture_error: None,
        }
    }
}

/// Read any supported file into `mesh` with the default configuration.
///
/// The mesh buffers are cleared first. On error they are left in an
/// unspecified, partially filled state.
pub fn read_object(path: &Path, mesh: &mut Mesh) -> Result<ReadReport> {
    read_object_with(path, mesh, &IoConfig::default())
}

pub fn read_object_with(path: &Path, mesh: &mut Mesh, config: &IoConfig) -> Result<ReadReport> {
    let format = MeshFormat::from_path(path)?;
    let report = match format {
        MeshFormat::Ply => read_ply(path, mesh, config)?,
        MeshFormat::Obj => read_obj(path, mesh, config)?,
        MeshFormat::Ptx => read_ptx(path, mesh, config)?,
    };

    log::info!(
        "Read {:?} as {}: {} vertices, {} faces",
        path,
        format,
        mesh.vertices.len(),
        mesh.faces.len()
    );
    Ok(report)
}

/// Read a file into a fresh [`Mesh`].
pub fn load_object(path: &Path) -> Result<(Mesh, ReadReport)> {
    let mut mesh = Mesh::new();
    let report = read_object(path, &mut mesh)?;
    Ok((mesh, report))
}

/// Write `mesh` next to `path`, choosing the format from the mesh.
///
/// Returns the path actually written (see [`output_path`]).
pub fn write_object(path: &Path, mesh: &Mesh) -> Result<PathBuf> {
    write_object_with(path, mesh, &IoConfig::default())
}

pub fn write_object_with(path: &Path, mesh: &Mesh, config: &IoConfig) -> Result<PathBuf> {
    let format = MeshFormat::for_mesh(mesh);
    let out = output_path(path, format);

    match format {
        MeshFormat::Obj => write_obj(&out, mesh)?,
        _ => write_ply(&out, mesh, config)?,
    }

    log::info!(
        "Wrote {} vertices, {} faces to {:?}",
        mesh.vertices.len(),
        mesh.faces.len(),
        out
    );
    Ok(out)
}

/// File name a mesh of `format` is written to when `path` was requested.
///
/// A name whose fourth-to-last character is a dot has its last three
/// characters replaced by the format extension; any other name gets
/// `.<ext>` appended. Paths that are not valid UTF-8 are never re-encoded:
/// a three-byte extension is replaced, anything else is appended to.
pub fn output_path(path: &Path, format: MeshFormat) -> PathBuf {
    let Some(name) = path.to_str() else {
        return match path.extension() {
            Some(ext) if ext.len() == 3 => path.with_extension(format.extension()),
            _ => {
                let mut out = path.as_os_str().to_owned();
                out.push(".");
                out.push(format.extension());
                PathBuf::from(out)
            }
        };
    };

    let chars: Vec<char> = name.chars().collect();
    let mut out: String = if chars.len() >= 4 && chars[chars.len() - 4] == '.' {
        chars[..chars.len() - 3].iter().collect()
    } else {
        format!("{}.", name)
    };
    out.push_str(format.extension());
    PathBuf::from(out)
}
