//! PTX (Leica scanner grid) reader.
//!
//! Layout:
//! ```text
//! <columns>
//! <rows>
//! 8 lines: scanner position, scanner axes, 4x4 transform (ignored)
//! x y z intensity [r g b]      # columns * rows lines
//! ```
//! The transform block is skipped: points are returned in the coordinates
//! stored in the file. Intensity is parsed and discarded.

use crate::core::{Mesh, Vertex};
use crate::io::{IoConfig, MeshFormat, MeshIoError, ReadReport, Result};
use nalgebra::Vector3;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Lines between the grid dimensions and the first point.
const POSE_BLOCK_LINES: usize = 8;

/// Upper bound on the capacity reserved from the header alone.
const MAX_PREALLOC: usize = 1 << 20;

/// Read a PTX scan into `mesh.vertices`.
pub fn read_ptx(path: &Path, mesh: &mut Mesh, config: &IoConfig) -> Result<ReadReport> {
    let file = File::open(path).map_err(|e| MeshIoError::io(path, e))?;
    parse_ptx(BufReader::new(file), path, mesh, config)?;
    Ok(ReadReport::new(MeshFormat::Ptx))
}

/// Parse PTX text from `reader`. Fails unless exactly `columns * rows` points
/// are present.
pub fn parse_ptx<R: BufRead>(
    reader: R,
    path: &Path,
    mesh: &mut Mesh,
    config: &IoConfig,
) -> Result<()> {
    mesh.clear();
    let mut lines = reader.lines().enumerate().map(|(i, line)| (i + 1, line));

    let columns = header_value(&mut lines, path, "column count")?;
    let rows = header_value(&mut lines, path, "row count")?;
    let declared = columns.checked_mul(rows).ok_or_else(|| {
        MeshIoError::format(
            path,
            Some(2),
            format!("grid of {} x {} points is too large", columns, rows),
        )
    })?;
    config.check_vertex_budget(path, Some(2), declared)?;

    for _ in 0..POSE_BLOCK_LINES {
        match lines.next() {
            Some((_, Ok(_))) => {}
            Some((_, Err(e))) => return Err(MeshIoError::io(path, e)),
            None => {
                return Err(MeshIoError::format(
                    path,
                    None,
                    "file ends inside the sensor pose block",
                ))
            }
        }
    }

    mesh.vertices.reserve(declared.min(MAX_PREALLOC));
    while mesh.vertices.len() < declared {
        let Some((line_no, line)) = lines.next() else {
            break;
        };
        let line = line.map_err(|e| MeshIoError::io(path, e))?;
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        mesh.vertices.push(parse_point(&fields, path, line_no)?);
    }

    log::debug!(
        "PTX {:?}: {} x {} grid, {} points read",
        path,
        columns,
        rows,
        mesh.vertices.len()
    );

    if mesh.vertices.len() != declared {
        return Err(MeshIoError::format(
            path,
            None,
            format!(
                "short read: header declares {} points ({} x {}), found {}",
                declared,
                columns,
                rows,
                mesh.vertices.len()
            ),
        ));
    }

    Ok(())
}

fn header_value<I>(lines: &mut I, path: &Path, what: &str) -> Result<usize>
where
    I: Iterator<Item = (usize, std::io::Result<String>)>,
{
    let (line_no, line) = lines
        .next()
        .ok_or_else(|| MeshIoError::format(path, None, format!("missing {}", what)))?;
    let line = line.map_err(|e| MeshIoError::io(path, e))?;

    line.split_whitespace()
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| {
            MeshIoError::format(
                path,
                Some(line_no),
                format!("invalid {} '{}'", what, line.trim()),
            )
        })
}

fn parse_point(fields: &[&str], path: &Path, line: usize) -> Result<Vertex> {
    if fields.len() != 4 && fields.len() < 7 {
        return Err(MeshIoError::format(
            path,
            Some(line),
            format!(
                "expected 'x y z intensity [r g b]', found {} fields",
                fields.len()
            ),
        ));
    }

    let mut values = [0.0f32; 7];
    for (slot, field) in values.iter_mut().zip(fields) {
        *slot = field.parse().map_err(|_| {
            MeshIoError::format(path, Some(line), format!("invalid number '{}'", field))
        })?;
    }

    let vertex = Vertex::new(values[0], values[1], values[2]);
    if fields.len() >= 7 {
        Ok(vertex.with_color(Vector3::new(values[4], values[5], values[6])))
    } else {
        Ok(vertex)
    }
}
