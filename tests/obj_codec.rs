//! OBJ codec tests
//!
//! End-to-end reads and writes through the file system.

use approx::assert_relative_eq;
use nalgebra::Vector3;
use scanmesh::io::{
    read_obj, read_object, write_obj, write_object, FaceGrammar, IoConfig, MeshFormat,
};
use scanmesh::{Face, Mesh, MeshIoError, Vertex};
use std::fs;

const TWO_TRIANGLES: &str = "\
mtllib mat.obj.mtl
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
f 1 2 3
f 1 3 4
";

#[test]
fn test_missing_material_does_not_fail_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quad.obj");
    fs::write(&path, TWO_TRIANGLES).unwrap();

    let mut mesh = Mesh::new();
    let report = read_object(&path, &mut mesh).expect("read should succeed");

    assert_eq!(report.format, MeshFormat::Obj);
    assert_eq!(mesh.vertices.len(), 4);
    assert_eq!(mesh.faces.len(), 2);
    assert_eq!(mesh.faces[1], Face::new(0, 2, 3));
    assert_eq!(mesh.materials, vec![dir.path().join("mat.obj.mtl")]);
    assert_eq!(report.colorized_faces, 0);
    assert_eq!(mesh.colored_vertex_count(), 0);
}

#[test]
fn test_missing_material_with_tex_coords_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("textured.obj");
    fs::write(
        &path,
        "mtllib nowhere.mtl\nv 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nf 1/1 2/1 3/1\n",
    )
    .unwrap();

    let mut mesh = Mesh::new();
    let report = read_obj(&path, &mut mesh, &IoConfig::default()).unwrap();

    assert_eq!(report.grammar, Some(FaceGrammar::TexCoord));
    assert!(report.texture_error.is_some());
    assert!(mesh.vertices.iter().all(|v| !v.has_color()));
}

#[test]
fn test_normal_grammar_applies_to_every_later_face() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("normals.obj");
    fs::write(
        &path,
        "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3//1\nf 3 2 1\n",
    )
    .unwrap();

    let mut mesh = Mesh::new();
    let report = read_object(&path, &mut mesh).unwrap();

    assert_eq!(report.grammar, Some(FaceGrammar::Normal));
    assert_eq!(mesh.faces.len(), 2);
    // The second face has no `//n` part, so it carries no normal references.
    assert_eq!(mesh.faces[1].normal_corners(), [None, None, None]);
    assert_eq!(mesh.normals.len(), 3);
    assert_eq!(mesh.vertices[2].normal, Some(Vector3::z()));
}

#[test]
fn test_write_and_read_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tri.obj");

    let mut mesh = Mesh::from_vertices(vec![
        Vertex::new(0.0, 0.0, 0.0).with_color(Vector3::new(200.0, 100.0, 50.0)),
        Vertex::new(0.5, 0.0, 0.25),
        Vertex::new(0.0, 2.0, -1.0),
    ]);
    mesh.normals = vec![Vector3::x(), Vector3::y(), Vector3::z()];
    mesh.faces.push(Face::new(0, 1, 2));

    write_obj(&path, &mesh).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("v 0 0 0 200 100 50\n"));
    assert!(text.contains("f 1//1 2//2 3//3\n"));

    let mut back = Mesh::new();
    read_obj(&path, &mut back, &IoConfig::default()).unwrap();

    assert_eq!(back.vertices.len(), 3);
    assert_relative_eq!(back.vertices[1].position, mesh.vertices[1].position);
    assert_relative_eq!(back.vertices[0].rgb, mesh.vertices[0].rgb);
    assert_eq!(back.vertices[1].normal, Some(Vector3::y()));
    assert_eq!(back.normals, mesh.normals);
}

#[test]
fn test_reader_clears_previous_contents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quad.obj");
    fs::write(&path, TWO_TRIANGLES).unwrap();

    let mut mesh = Mesh::from_vertices(vec![Vertex::new(9.0, 9.0, 9.0); 10]);
    mesh.normals.push(Vector3::x());
    read_object(&path, &mut mesh).unwrap();

    assert_eq!(mesh.vertices.len(), 4);
    assert!(mesh.normals.is_empty());
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut mesh = Mesh::new();
    let err = read_object(&dir.path().join("absent.obj"), &mut mesh).unwrap_err();
    assert!(matches!(err, MeshIoError::Io { .. }));
}

#[test]
fn test_out_of_range_face_fails_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.obj");
    fs::write(&path, "v 0 0 0\nv 1 0 0\nf 1 2 3\n").unwrap();

    let mut mesh = Mesh::new();
    let err = read_object(&path, &mut mesh).unwrap_err();
    assert!(matches!(
        err,
        MeshIoError::OutOfRangeReference { len: 2, line: Some(3), .. }
    ));
}

#[test]
fn test_faces_missing_grammar_references_write_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("untextured_faces.obj");
    fs::write(&path, "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nf 1 2 3\n").unwrap();

    let mut mesh = Mesh::new();
    read_object(&path, &mut mesh).unwrap();
    assert_eq!(mesh.faces[0].tex_corners(), [None, None, None]);

    let written = write_object(&dir.path().join("copy.obj"), &mesh).unwrap();
    let text = fs::read_to_string(&written).unwrap();
    assert!(text.ends_with("vt 0 0\nf 1 2 3\n"), "{text}");

    let mut back = Mesh::new();
    read_object(&written, &mut back).unwrap();
    assert_eq!(back.faces, mesh.faces);
    assert_eq!(back.tex_coords, mesh.tex_coords);
}

#[test]
fn test_dangling_reference_leaves_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dangling.obj");

    let mut mesh = Mesh::from_vertices(vec![Vertex::new(0.0, 0.0, 0.0); 3]);
    mesh.faces.push(Face::new(0, 1, 5));

    let err = write_obj(&path, &mesh).unwrap_err();
    assert!(matches!(err, MeshIoError::OutOfRangeReference { .. }));
    assert!(!path.exists());
}
