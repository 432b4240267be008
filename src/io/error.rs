//! Error types for mesh I/O.

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Which attribute sequence a face corner points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    Vertex,
    Normal,
    TexCoord,
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AttributeKind::Vertex => "vertex",
            AttributeKind::Normal => "normal",
            AttributeKind::TexCoord => "texture coordinate",
        };
        f.write_str(name)
    }
}

/// Errors that abort a read or write call.
#[derive(Debug, Error)]
pub enum MeshIoError {
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid format in {}: {reason}", location(.path, .line))]
    Format {
        path: PathBuf,
        line: Option<usize>,
        reason: String,
    },

    #[error("{kind} reference {index} out of range (have {len}){}", line_suffix(.line))]
    OutOfRangeReference {
        kind: AttributeKind,
        /// The reference as written in the file (1-based, or negative-relative)
        index: i64,
        len: usize,
        line: Option<usize>,
    },

    #[error("No vertices parsed from {0:?}")]
    EmptyMesh(PathBuf),
}

impl MeshIoError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        MeshIoError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn format(path: &Path, line: Option<usize>, reason: impl Into<String>) -> Self {
        MeshIoError::Format {
            path: path.to_path_buf(),
            line,
            reason: reason.into(),
        }
    }
}

fn location(path: &Path, line: &Option<usize>) -> String {
    match line {
        Some(line) => format!("{}:{}", path.display(), line),
        None => path.display().to_string(),
    }
}

fn line_suffix(line: &Option<usize>) -> String {
    line.map(|l| format!(" at line {}", l)).unwrap_or_default()
}

/// Failures of the texture colorization pass.
///
/// These never abort a read: the mesh is returned with its colors unset and
/// the error is reported as a warning.
#[derive(Debug, Error)]
pub enum TextureError {
    #[error("Cannot open material file {path:?}: {source}")]
    MaterialOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Material file {0:?} has no map_Kd entry")]
    NoDiffuseMap(PathBuf),

    #[error("Image loading failed: {reason}\nPath: {}", .path.display())]
    ImageDecode { path: PathBuf, reason: String },

    #[error("Texture image {0:?} is empty")]
    EmptyImage(PathBuf),
}

pub type Result<T> = std::result::Result<T, MeshIoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_mentions_line() {
        let err = MeshIoError::format(Path::new("cloud.ptx"), Some(3), "bad row");
        assert_eq!(err.to_string(), "Invalid format in cloud.ptx:3: bad row");
    }

    #[test]
    fn test_out_of_range_display() {
        let err = MeshIoError::OutOfRangeReference {
            kind: AttributeKind::Normal,
            index: 7,
            len: 2,
            line: Some(12),
        };
        assert_eq!(
            err.to_string(),
            "normal reference 7 out of range (have 2) at line 12"
        );
    }
}
