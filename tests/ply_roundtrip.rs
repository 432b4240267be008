//! PLY round-trip tests
//!
//! Point clouds written to disk and read back, in every encoding.

use approx::assert_relative_eq;
use nalgebra::Vector3;
use scanmesh::io::{read_ply, write_ply, IoConfig, PlyEncoding, PLY_ATTRIBUTION};
use scanmesh::{Mesh, MeshIoError, Vertex};
use std::fs;

fn sample_cloud() -> Mesh {
    let mut mesh = Mesh::from_vertices(vec![
        Vertex::new(1.0, 2.0, 3.0).with_color(Vector3::new(255.0, 128.0, 64.0)),
        Vertex::new(-1.0, -2.0, -3.0).with_color(Vector3::new(12.7, 255.0, 0.0)),
        Vertex::new(0.125, 0.0, 1e-3),
    ]);
    mesh.normals = vec![Vector3::x(), -Vector3::y(), Vector3::new(0.0, 0.6, 0.8)];
    mesh
}

#[test]
fn test_round_trip_all_encodings() {
    let dir = tempfile::tempdir().unwrap();
    let mesh = sample_cloud();

    for encoding in [
        PlyEncoding::BinaryLittleEndian,
        PlyEncoding::BinaryBigEndian,
        PlyEncoding::Ascii,
    ] {
        let config = IoConfig {
            ply_encoding: encoding,
            ..IoConfig::default()
        };
        let path = dir.path().join(format!("cloud_{:?}.ply", encoding));
        write_ply(&path, &mesh, &config).unwrap();

        let mut back = Mesh::new();
        read_ply(&path, &mut back, &config).unwrap();

        assert_eq!(back.vertices.len(), 3, "{:?}", encoding);
        assert!(back.faces.is_empty());
        assert_eq!(back.normals.len(), 3);
        for (i, (a, b)) in mesh.vertices.iter().zip(&back.vertices).enumerate() {
            assert_relative_eq!(a.position, b.position);
            assert_relative_eq!(b.normal.unwrap(), mesh.normals[i]);
            assert_eq!(b.normal, Some(back.normals[i]));
        }

        // Colors survive up to 8-bit quantization.
        assert_eq!(back.vertices[0].rgb, Vector3::new(255.0, 128.0, 64.0));
        assert_eq!(back.vertices[1].rgb, Vector3::new(12.0, 255.0, 0.0));
        assert_eq!(back.vertices[2].rgb, Vector3::zeros());
    }
}

#[test]
fn test_binary_is_default_and_header_is_attributed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cloud.ply");
    write_ply(&path, &sample_cloud(), &IoConfig::default()).unwrap();

    let bytes = fs::read(&path).unwrap();
    let header_end = bytes
        .windows(b"end_header".len())
        .position(|w| w == b"end_header")
        .expect("header terminator");
    let header = String::from_utf8_lossy(&bytes[..header_end]);

    assert!(header.starts_with("ply"));
    assert!(header.contains("format binary_little_endian 1.0"));
    assert!(header.contains(&format!("comment {}", PLY_ATTRIBUTION)));
    assert!(header.contains("element vertex 3"));
    assert!(header.contains("property float nx"));
    assert!(header.contains("property uchar red"));
}

#[test]
fn test_colorless_cloud_has_no_color_columns() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plain.ply");
    let mesh = Mesh::from_vertices(vec![
        Vertex::new(0.0, 0.0, 0.0),
        // Visually non-black, but red is not positive, so it counts as unset.
        Vertex::new(1.0, 0.0, 0.0).with_color(Vector3::new(0.0, 128.0, 64.0)),
    ]);
    let config = IoConfig {
        ply_encoding: PlyEncoding::Ascii,
        ..IoConfig::default()
    };
    write_ply(&path, &mesh, &config).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(!text.contains("red"));
    assert!(!text.contains("property float nx"));

    let mut back = Mesh::new();
    read_ply(&path, &mut back, &config).unwrap();
    assert_eq!(back.colored_vertex_count(), 0);
    assert!(back.normals.is_empty());
    assert!(back.vertices.iter().all(|v| v.normal.is_none()));
}

#[test]
fn test_file_without_vertex_element_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("edges.ply");
    fs::write(
        &path,
        "ply\nformat ascii 1.0\nelement edge 1\nproperty int a\nproperty int b\nend_header\n0 1\n",
    )
    .unwrap();

    let mut mesh = Mesh::new();
    let err = read_ply(&path, &mut mesh, &IoConfig::default()).unwrap_err();
    assert!(matches!(err, MeshIoError::Format { .. }), "{err}");
}

#[test]
fn test_unreadable_path() {
    let dir = tempfile::tempdir().unwrap();
    let err = write_ply(
        &dir.path().join("missing_dir").join("cloud.ply"),
        &sample_cloud(),
        &IoConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, MeshIoError::Io { .. }));
}
