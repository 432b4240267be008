//! Conversion between face-corner normals and per-vertex normals.
//!
//! OBJ files reference normals per face corner, so one vertex may be given
//! several different normals. The rest of the pipeline wants exactly one
//! normal per vertex. Reading resolves this with "last writer wins": each
//! parsed face overwrites the normals of its three vertices, and the normal
//! buffer is then rebuilt in vertex order.

use crate::core::{Face, Mesh, Vertex};
use crate::io::{AttributeKind, MeshIoError, Result};
use nalgebra::Vector3;

/// What [`reconcile_normals`] did to the normal buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalReconciliation {
    /// No faces, and the normal count matched the vertex count
    ByPosition,
    /// Rebuilt from the normals faces assigned to their vertices
    FromFaces,
    /// Nothing to reconcile
    Unchanged,
}

/// Copy the normals referenced by `face` onto its three vertices.
///
/// Corners without a normal reference are skipped. References are expected
/// to have been range-checked by the parser.
pub fn apply_face_normals(vertices: &mut [Vertex], normals: &[Vector3<f32>], face: &Face) {
    for (vertex, corner) in face.vertices().into_iter().zip(face.normal_corners()) {
        let Some(n) = corner else { continue };
        if let (Some(v), Some(normal)) = (vertices.get_mut(vertex), normals.get(n)) {
            v.normal = Some(*normal);
        }
    }
}

/// Assign `normals[i]` to `vertices[i]` when both sequences have equal length.
pub fn assign_normals_by_position(vertices: &mut [Vertex], normals: &[Vector3<f32>]) -> bool {
    if vertices.len() != normals.len() {
        return false;
    }
    for (v, n) in vertices.iter_mut().zip(normals) {
        v.normal = Some(*n);
    }
    true
}

/// One normal per vertex, in vertex order. Vertices without a normal get zero.
pub fn collect_vertex_normals(vertices: &[Vertex]) -> Vec<Vector3<f32>> {
    vertices
        .iter()
        .map(|v| v.normal.unwrap_or_else(Vector3::zeros))
        .collect()
}

/// Post-read pass turning whatever normals were parsed into per-vertex form.
///
/// With faces, the normal buffer is replaced by the per-vertex normals the
/// faces assigned (discarding genuine per-corner divergence) and every face
/// corner that carried a normal reference is re-pointed at its own vertex, so
/// the buffers stay consistent.
pub fn reconcile_normals(mesh: &mut Mesh) -> NormalReconciliation {
    if mesh.faces.is_empty() {
        if !mesh.normals.is_empty() && assign_normals_by_position(&mut mesh.vertices, &mesh.normals)
        {
            return NormalReconciliation::ByPosition;
        }
        return NormalReconciliation::Unchanged;
    }

    if mesh.normals.is_empty() {
        return NormalReconciliation::Unchanged;
    }

    mesh.normals = collect_vertex_normals(&mesh.vertices);
    for face in &mut mesh.faces {
        let vertices = face.vertices();
        let mut corners = face.normal_corners();
        for (corner, vertex) in corners.iter_mut().zip(vertices) {
            if corner.is_some() {
                *corner = Some(vertex);
            }
        }
        face.set_normal_corners(corners);
    }
    NormalReconciliation::FromFaces
}

/// Inverse of reconciliation: lay per-vertex normals out per face corner.
///
/// Returns a flat, face-ordered normal list (three entries per face) together
/// with copies of the faces whose normal corners point into that list.
pub fn expand_vertex_normals(
    normals: &[Vector3<f32>],
    faces: &[Face],
) -> Result<(Vec<Vector3<f32>>, Vec<Face>)> {
    let mut expanded = Vec::with_capacity(faces.len() * 3);
    let mut remapped = Vec::with_capacity(faces.len());

    for face in faces {
        let mut corners = [None; 3];
        for (corner, vertex) in corners.iter_mut().zip(face.vertices()) {
            let normal = normals
                .get(vertex)
                .ok_or_else(|| MeshIoError::OutOfRangeReference {
                    kind: AttributeKind::Normal,
                    index: vertex as i64 + 1,
                    len: normals.len(),
                    line: None,
                })?;
            *corner = Some(expanded.len());
            expanded.push(*normal);
        }
        let mut face = *face;
        face.set_normal_corners(corners);
        remapped.push(face);
    }

    Ok((expanded, remapped))
}
