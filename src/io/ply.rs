//! PLY (Polygon File Format) I/O for point clouds.
//!
//! Only the `vertex` element is read and written: positions (`x y z`),
//! optional normals (`nx ny nz`) and optional 8-bit colors
//! (`red green blue`). Faces stored in a PLY file are ignored; meshes with
//! faces are written as OBJ instead.

use crate::core::{Mesh, Vertex};
use crate::io::{IoConfig, MeshFormat, MeshIoError, ReadReport, Result};
use nalgebra::Vector3;
use ply_rs::parser::Parser;
use ply_rs::ply::{
    Addable, DefaultElement, ElementDef, Ply, Property, PropertyDef, PropertyType, ScalarType,
};
use ply_rs::writer::Writer;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

const VERTEX_ELEMENT: &str = "vertex";
const POSITION: [&str; 3] = ["x", "y", "z"];
const NORMAL: [&str; 3] = ["nx", "ny", "nz"];
const COLOR: [&str; 3] = ["red", "green", "blue"];

/// Read the vertices of a PLY file (ASCII or binary) into `mesh`.
///
/// Normals, when present, are stored both on the vertices and, one per
/// vertex, in `mesh.normals`.
pub fn read_ply(path: &Path, mesh: &mut Mesh, config: &IoConfig) -> Result<ReadReport> {
    let file = File::open(path).map_err(|e| MeshIoError::io(path, e))?;
    let mut reader = BufReader::new(file);

    let parser = Parser::<DefaultElement>::new();
    let ply = parser
        .read_ply(&mut reader)
        .map_err(|e| MeshIoError::format(path, None, format!("PLY parse error: {}", e)))?;

    read_vertex_element(&ply, path, mesh, config)?;
    log::debug!(
        "PLY {:?}: {} vertices, {} normals, {} colored",
        path,
        mesh.vertices.len(),
        mesh.normals.len(),
        mesh.colored_vertex_count()
    );

    Ok(ReadReport::new(MeshFormat::Ply))
}

pub(crate) fn read_vertex_element(
    ply: &Ply<DefaultElement>,
    path: &Path,
    mesh: &mut Mesh,
    config: &IoConfig,
) -> Result<()> {
    mesh.clear();

    let def = ply
        .header
        .elements
        .get(VERTEX_ELEMENT)
        .ok_or_else(|| MeshIoError::format(path, None, "no \"vertex\" element"))?;
    let has = |names: [&str; 3]| names.iter().all(|n| def.properties.contains_key(*n));

    if !has(POSITION) {
        return Err(MeshIoError::format(
            path,
            None,
            "\"vertex\" element lacks x, y or z",
        ));
    }
    let has_normals = has(NORMAL);
    let has_colors = has(COLOR);

    let rows = ply
        .payload
        .get(VERTEX_ELEMENT)
        .map(Vec::as_slice)
        .unwrap_or(&[]);
    config.check_vertex_budget(path, None, rows.len())?;

    mesh.vertices.reserve(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let mut vertex = Vertex::from_position(vector_property(row, POSITION, i, path)?);

        if has_normals {
            let normal = vector_property(row, NORMAL, i, path)?;
            vertex.normal = Some(normal);
            mesh.normals.push(normal);
        }

        if has_colors {
            let mut rgb = [0.0f32; 3];
            for (slot, name) in rgb.iter_mut().zip(COLOR) {
                *slot = color_channel(row.get(name)).ok_or_else(|| {
                    MeshIoError::format(
                        path,
                        None,
                        format!("vertex {}: '{}' is missing or not an integer", i, name),
                    )
                })? as f32;
            }
            vertex.rgb = Vector3::from(rgb);
        }

        mesh.vertices.push(vertex);
    }

    Ok(())
}

fn vector_property(
    row: &DefaultElement,
    names: [&str; 3],
    index: usize,
    path: &Path,
) -> Result<Vector3<f32>> {
    let mut out = [0.0f32; 3];
    for (slot, name) in out.iter_mut().zip(names) {
        *slot = scalar(row.get(name)).ok_or_else(|| {
            MeshIoError::format(
                path,
                None,
                format!("vertex {}: '{}' is missing or not a scalar", index, name),
            )
        })?;
    }
    Ok(Vector3::from(out))
}

fn scalar(prop: Option<&Property>) -> Option<f32> {
    match prop? {
        Property::Float(v) => Some(*v),
        Property::Double(v) => Some(*v as f32),
        Property::Int(v) => Some(*v as f32),
        Property::UInt(v) => Some(*v as f32),
        Property::Short(v) => Some(*v as f32),
        Property::UShort(v) => Some(*v as f32),
        Property::Char(v) => Some(*v as f32),
        Property::UChar(v) => Some(*v as f32),
        _ => None,
    }
}

fn color_channel(prop: Option<&Property>) -> Option<u8> {
    match prop? {
        Property::UChar(v) => Some(*v),
        Property::Char(v) => Some((*v).max(0) as u8),
        Property::UShort(v) => Some((*v).min(255) as u8),
        Property::Short(v) => Some((*v).clamp(0, 255) as u8),
        Property::UInt(v) => Some((*v).min(255) as u8),
        Property::Int(v) => Some((*v).clamp(0, 255) as u8),
        _ => None,
    }
}

/// Write the vertices of `mesh` as a PLY point cloud.
///
/// Normal columns are emitted when there is exactly one normal per vertex,
/// color columns when at least one vertex passes [`Vertex::has_color`].
pub fn write_ply(path: &Path, mesh: &Mesh, config: &IoConfig) -> Result<()> {
    let mut ply = build_ply(mesh, config);

    let file = File::create(path).map_err(|e| MeshIoError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    let written = Writer::new()
        .write_ply(&mut writer, &mut ply)
        .map_err(|e| MeshIoError::io(path, e))?;
    writer.flush().map_err(|e| MeshIoError::io(path, e))?;

    log::debug!("PLY {:?}: wrote {} bytes", path, written);
    Ok(())
}

pub(crate) fn build_ply(mesh: &Mesh, config: &IoConfig) -> Ply<DefaultElement> {
    let use_normals = mesh.normals.len() == mesh.vertices.len();
    let use_colors = mesh.vertices.iter().any(Vertex::has_color);

    let mut ply = Ply::<DefaultElement>::new();
    ply.header.encoding = config.ply_encoding.to_ply();
    ply.header.comments.push(config.ply_comment.clone());

    let mut element = ElementDef::new(VERTEX_ELEMENT.to_string());
    let mut add_columns = |names: [&str; 3], scalar: ScalarType| {
        for name in names {
            element.properties.add(PropertyDef::new(
                name.to_string(),
                PropertyType::Scalar(scalar.clone()),
            ));
        }
    };
    add_columns(POSITION, ScalarType::Float);
    if use_normals {
        add_columns(NORMAL, ScalarType::Float);
    }
    if use_colors {
        add_columns(COLOR, ScalarType::UChar);
    }
    element.count = mesh.vertices.len();
    ply.header.elements.add(element);

    let mut rows = Vec::with_capacity(mesh.vertices.len());
    for (i, v) in mesh.vertices.iter().enumerate() {
        let mut row = DefaultElement::new();
        insert_floats(&mut row, POSITION, &v.position);
        if use_normals {
            insert_floats(&mut row, NORMAL, &mesh.normals[i]);
        }
        if use_colors {
            // Float-to-int `as` saturates, so unset sentinels become 0.
            for (name, channel) in COLOR.into_iter().zip(v.rgb.iter()) {
                row.insert(name.to_string(), Property::UChar(*channel as u8));
            }
        }
        rows.push(row);
    }
    ply.payload.insert(VERTEX_ELEMENT.to_string(), rows);

    ply
}

fn insert_floats(row: &mut DefaultElement, names: [&str; 3], values: &Vector3<f32>) {
    for (name, value) in names.into_iter().zip(values.iter()) {
        row.insert(name.to_string(), Property::Float(*value));
    }
}
