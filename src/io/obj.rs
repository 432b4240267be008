//! OBJ (Wavefront) mesh reading and writing.
//!
//! Supported records:
//! ```text
//! v x y z [r g b]   # Vertex position, optional color
//! vt u v            # Texture coordinate
//! vn nx ny nz       # Normal
//! f a b c ...       # Face, corner grammar depends on what was seen before
//! mtllib file.mtl   # Material library, resolved against the OBJ's directory
//! ```
//!
//! The face corner grammar is not inferred per line. Each `f` line is read
//! with the grammar implied by the `vn`/`vt` records seen so far, so a file
//! that mixes `f 1 2 3` and `f 1//1 2//2 3//3` lines after its first `vn`
//! yields faces without normal references for the former.

use crate::core::{Face, Mesh, Vertex};
use crate::io::material::colorize_from_material;
use crate::io::reconcile::{apply_face_normals, reconcile_normals};
use crate::io::{AttributeKind, IoConfig, MeshFormat, MeshIoError, ReadReport, Result};
use nalgebra::{Vector2, Vector3};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Layout of a face corner token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceGrammar {
    /// `a`
    Plain,
    /// `a/t`
    TexCoord,
    /// `a//n`
    Normal,
    /// `a/t/n`
    TexCoordNormal,
}

impl FaceGrammar {
    /// Grammar implied by whether any normals / texture coordinates exist.
    pub fn select(has_normals: bool, has_tex_coords: bool) -> Self {
        match (has_normals, has_tex_coords) {
            (false, false) => FaceGrammar::Plain,
            (false, true) => FaceGrammar::TexCoord,
            (true, false) => FaceGrammar::Normal,
            (true, true) => FaceGrammar::TexCoordNormal,
        }
    }

    pub fn uses_normals(self) -> bool {
        matches!(self, FaceGrammar::Normal | FaceGrammar::TexCoordNormal)
    }

    pub fn uses_tex_coords(self) -> bool {
        matches!(self, FaceGrammar::TexCoord | FaceGrammar::TexCoordNormal)
    }

    /// Split a corner token the way a fixed `scanf` pattern would: the vertex
    /// reference is mandatory, the others are dropped when they do not match.
    fn parse_corner(self, token: &str) -> Option<RawCorner> {
        let mut parts = token.split('/');
        let vertex = parse_reference(parts.next()?)?;
        let second = parts.next();
        let third = parts.next();

        let (tex, normal) = match self {
            FaceGrammar::Plain => (None, None),
            FaceGrammar::TexCoord => (second.and_then(parse_reference), None),
            FaceGrammar::Normal => match (second, third) {
                (Some(""), Some(n)) => (None, parse_reference(n)),
                _ => (None, None),
            },
            FaceGrammar::TexCoordNormal => {
                let tex = second.and_then(parse_reference);
                (tex, tex.and(third.and_then(parse_reference)))
            }
        };

        Some(RawCorner {
            vertex,
            tex,
            normal,
        })
    }
}

/// Corner references exactly as written in the file (1-based or negative).
#[derive(Debug, Clone, Copy)]
struct RawCorner {
    vertex: i64,
    tex: Option<i64>,
    normal: Option<i64>,
}

/// Corner references resolved to 0-based indices.
#[derive(Debug, Clone, Copy)]
struct Corner {
    vertex: usize,
    tex: Option<usize>,
    normal: Option<usize>,
}

impl Corner {
    /// `a`, `a/t`, `a//n` or `a/t/n`, depending on which references are set.
    fn to_obj(self) -> String {
        let a = self.vertex + 1;
        match (self.tex, self.normal) {
            (None, None) => format!("{}", a),
            (Some(t), None) => format!("{}/{}", a, t + 1),
            (None, Some(n)) => format!("{}//{}", a, n + 1),
            (Some(t), Some(n)) => format!("{}/{}/{}", a, t + 1, n + 1),
        }
    }
}

fn parse_reference(s: &str) -> Option<i64> {
    s.parse().ok()
}

/// Turn a file reference into a 0-based index into a sequence of `len` items.
///
/// Positive references are 1-based; negative ones count back from the end of
/// what has been read so far.
fn resolve(raw: i64, len: usize, kind: AttributeKind, line: usize) -> Result<usize> {
    let index = if raw > 0 {
        Some((raw - 1) as usize)
    } else if raw < 0 {
        len.checked_sub(raw.unsigned_abs() as usize)
    } else {
        None
    };

    match index {
        Some(i) if i < len => Ok(i),
        _ => Err(MeshIoError::OutOfRangeReference {
            kind,
            index: raw,
            len,
            line: Some(line),
        }),
    }
}

fn parse_components<const N: usize>(
    fields: &[&str],
    record: &str,
    path: &Path,
    line: usize,
) -> Result<[f32; N]> {
    if fields.len() < N {
        return Err(MeshIoError::format(
            path,
            Some(line),
            format!(
                "'{}' record needs {} components, found {}",
                record,
                N,
                fields.len()
            ),
        ));
    }

    let mut out = [0.0f32; N];
    for (slot, field) in out.iter_mut().zip(fields) {
        *slot = field.parse().map_err(|_| {
            MeshIoError::format(
                path,
                Some(line),
                format!("invalid number '{}' in '{}' record", field, record),
            )
        })?;
    }
    Ok(out)
}

/// Read an OBJ file into `mesh`, then colorize it from its first material's
/// diffuse texture when possible.
///
/// Texture problems are not errors: they are logged and returned in the
/// report, and the mesh keeps its unset colors.
pub fn read_obj(path: &Path, mesh: &mut Mesh, config: &IoConfig) -> Result<ReadReport> {
    let file = File::open(path).map_err(|e| MeshIoError::io(path, e))?;
    let grammar = parse_obj(BufReader::new(file), path, mesh, config)?;

    let mut report = ReadReport::new(MeshFormat::Obj);
    report.grammar = grammar;

    if config.sample_textures && !mesh.materials.is_empty() && !mesh.tex_coords.is_empty() {
        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        match colorize_from_material(mesh, base_dir) {
            Ok(faces) => report.colorized_faces = faces,
            Err(e) => {
                log::warn!("Skipping texture colorization of {:?}: {}", path, e);
                report.texture_error = Some(e);
            }
        }
    }

    Ok(report)
}

/// Parse OBJ records from `reader` into `mesh`.
///
/// `path` is used to resolve `mtllib` names and to label errors. Returns the
/// grammar used for the last face, if any face was read.
pub fn parse_obj<R: BufRead>(
    reader: R,
    path: &Path,
    mesh: &mut Mesh,
    config: &IoConfig,
) -> Result<Option<FaceGrammar>> {
    mesh.clear();
    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
    let mut grammar: Option<FaceGrammar> = None;

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|e| MeshIoError::io(path, e))?;
        let line = line.trim();

        let mut fields = line.split_whitespace();
        let Some(keyword) = fields.next() else {
            continue;
        };
        let fields: Vec<&str> = fields.collect();

        match keyword {
            "v" => {
                config.check_vertex_budget(path, Some(line_no), mesh.vertices.len() + 1)?;
                let [x, y, z] = parse_components::<3>(&fields, "v", path, line_no)?;
                let mut vertex = Vertex::new(x, y, z);
                if fields.len() >= 6 {
                    let [r, g, b] = parse_components::<3>(&fields[3..], "v", path, line_no)?;
                    vertex.rgb = Vector3::new(r, g, b);
                }
                mesh.vertices.push(vertex);
            }
            "vt" => {
                let [u, v] = parse_components::<2>(&fields, "vt", path, line_no)?;
                mesh.tex_coords.push(Vector2::new(u, v));
            }
            "vn" => {
                let [x, y, z] = parse_components::<3>(&fields, "vn", path, line_no)?;
                mesh.normals.push(Vector3::new(x, y, z));
            }
            "f" => {
                let current =
                    FaceGrammar::select(!mesh.normals.is_empty(), !mesh.tex_coords.is_empty());
                if let Some(previous) = grammar.filter(|g| *g != current) {
                    log::warn!(
                        "{:?}:{}: face grammar changes from {:?} to {:?}",
                        path,
                        line_no,
                        previous,
                        current
                    );
                }
                grammar = Some(current);
                parse_face(&fields, current, mesh, path, line_no)?;
            }
            "mtllib" => {
                let name = line[keyword.len()..].trim();
                if name.is_empty() {
                    return Err(MeshIoError::format(
                        path,
                        Some(line_no),
                        "mtllib without a file name",
                    ));
                }
                mesh.materials.push(base_dir.join(name));
            }
            _ => {}
        }
    }

    let normals = reconcile_normals(mesh);
    log::debug!(
        "OBJ {:?}: {} vertices, {} faces, {} normals ({:?}), {} texture coordinates",
        path,
        mesh.vertices.len(),
        mesh.faces.len(),
        mesh.normals.len(),
        normals,
        mesh.tex_coords.len()
    );

    if mesh.vertices.is_empty() {
        return Err(MeshIoError::EmptyMesh(path.to_path_buf()));
    }

    Ok(grammar)
}

fn parse_face(
    fields: &[&str],
    grammar: FaceGrammar,
    mesh: &mut Mesh,
    path: &Path,
    line: usize,
) -> Result<()> {
    if fields.len() < 3 {
        return Err(MeshIoError::format(
            path,
            Some(line),
            format!("face needs at least 3 corners, found {}", fields.len()),
        ));
    }

    let mut corners = Vec::with_capacity(fields.len());
    for token in fields {
        let raw = grammar.parse_corner(token).ok_or_else(|| {
            MeshIoError::format(path, Some(line), format!("invalid face corner '{}'", token))
        })?;
        corners.push(Corner {
            vertex: resolve(raw.vertex, mesh.vertices.len(), AttributeKind::Vertex, line)?,
            tex: raw
                .tex
                .map(|t| resolve(t, mesh.tex_coords.len(), AttributeKind::TexCoord, line))
                .transpose()?,
            normal: raw
                .normal
                .map(|n| resolve(n, mesh.normals.len(), AttributeKind::Normal, line))
                .transpose()?,
        });
    }

    if corners.len() > 3 {
        log::debug!(
            "{:?}:{}: fan-triangulating {}-corner polygon",
            path,
            line,
            corners.len()
        );
    }

    for i in 1..corners.len() - 1 {
        let tri = [corners[0], corners[i], corners[i + 1]];
        let mut face = Face::new(tri[0].vertex, tri[1].vertex, tri[2].vertex);
        face.set_normal_corners(tri.map(|c| c.normal));
        face.set_tex_corners(tri.map(|c| c.tex));

        if !mesh.normals.is_empty() {
            apply_face_normals(&mut mesh.vertices, &mesh.normals, &face);
        }
        mesh.faces.push(face);
    }

    Ok(())
}

/// Write `mesh` as an OBJ file.
///
/// Face references are checked before the file is created, so a mesh with
/// dangling references leaves no partial output behind.
pub fn write_obj(path: &Path, mesh: &Mesh) -> Result<()> {
    let faces = face_corners(mesh)?;
    let file = File::create(path).map_err(|e| MeshIoError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    emit_obj(&mut writer, mesh, &faces, path)?;
    writer.flush().map_err(|e| MeshIoError::io(path, e))
}

/// Write `mesh` as OBJ text to any writer.
pub fn write_obj_to<W: Write>(writer: &mut W, mesh: &Mesh) -> Result<()> {
    let faces = face_corners(mesh)?;
    emit_obj(writer, mesh, &faces, Path::new("<stream>"))
}

fn emit_obj<W: Write>(w: &mut W, mesh: &Mesh, faces: &[[Corner; 3]], path: &Path) -> Result<()> {
    let io = |e| MeshIoError::io(path, e);

    for material in &mesh.materials {
        writeln!(w, "mtllib {}", material.display()).map_err(io)?;
    }

    for v in &mesh.vertices {
        let p = v.position;
        write!(w, "v {} {} {}", p.x, p.y, p.z).map_err(io)?;
        if v.red_is_nonzero() {
            write!(w, " {} {} {}", v.rgb.x, v.rgb.y, v.rgb.z).map_err(io)?;
        }
        writeln!(w).map_err(io)?;
    }

    for n in &mesh.normals {
        writeln!(w, "vn {} {} {}", n.x, n.y, n.z).map_err(io)?;
    }

    for t in &mesh.tex_coords {
        writeln!(w, "vt {} {}", t.x, t.y).map_err(io)?;
    }

    for &corners in faces {
        let [c1, c2, c3] = corners.map(Corner::to_obj);
        writeln!(w, "f {} {} {}", c1, c2, c3).map_err(io)?;
    }

    Ok(())
}

/// Resolve the corner references every face is written with.
///
/// The grammar follows the buffers: texture references are written when
/// texture coordinates exist, normal references when normals exist. A corner
/// missing a normal reference falls back to its vertex index when the normals
/// are laid out one per vertex. Any other missing reference is left out of
/// that corner, which the reader parses back as the same missing reference.
fn face_corners(mesh: &Mesh) -> Result<Vec<[Corner; 3]>> {
    let grammar = FaceGrammar::select(!mesh.normals.is_empty(), !mesh.tex_coords.is_empty());
    let per_vertex_normals = mesh.normals.len() == mesh.vertices.len();

    let mut out = Vec::with_capacity(mesh.faces.len());
    for face in &mesh.faces {
        let mut corners = [Corner {
            vertex: 0,
            tex: None,
            normal: None,
        }; 3];

        let references = face
            .vertices()
            .into_iter()
            .zip(face.tex_corners())
            .zip(face.normal_corners());

        for (slot, ((vertex, tex), normal)) in corners.iter_mut().zip(references) {
            check_range(vertex, mesh.vertices.len(), AttributeKind::Vertex)?;
            slot.vertex = vertex;

            if grammar.uses_tex_coords() {
                if let Some(tex) = tex {
                    check_range(tex, mesh.tex_coords.len(), AttributeKind::TexCoord)?;
                    slot.tex = Some(tex);
                }
            }

            if grammar.uses_normals() {
                if let Some(normal) = normal.or_else(|| per_vertex_normals.then_some(vertex)) {
                    check_range(normal, mesh.normals.len(), AttributeKind::Normal)?;
                    slot.normal = Some(normal);
                }
            }
        }
        out.push(corners);
    }

    Ok(out)
}

fn check_range(index: usize, len: usize, kind: AttributeKind) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(MeshIoError::OutOfRangeReference {
            kind,
            index: index as i64 + 1,
            len,
            line: None,
        })
    }
}
