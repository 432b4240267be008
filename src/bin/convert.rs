//! scanmesh-convert: inspect a geometry file and optionally re-write it
//!
//! Usage:
//!   scanmesh-convert scan.ptx
//!   scanmesh-convert model.obj --out model_copy.obj --per-corner-normals
//!   scanmesh-convert cloud.ply --out cloud.ply --config io.json
//!
//! Meshes with faces are written as OBJ, point clouds as PLY; the output
//! extension is adjusted to match.

use anyhow::{bail, Context, Result};
use scanmesh::io::{expand_vertex_normals, read_object_with, write_object_with, IoConfig};
use scanmesh::Mesh;
use std::path::PathBuf;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let mut input: Option<PathBuf> = None;
    let mut out_path: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut per_corner_normals = false;
    let mut sample_textures = true;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--out" => {
                out_path = Some(PathBuf::from(
                    args.next().context("Missing --out argument")?,
                ));
            }
            "--config" => {
                config_path = Some(PathBuf::from(
                    args.next().context("Missing --config argument")?,
                ));
            }
            "--per-corner-normals" => per_corner_normals = true,
            "--no-textures" => sample_textures = false,
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            other if other.starts_with("--") => {
                print_help();
                bail!("Unknown argument: {}", other);
            }
            other => {
                if input.is_some() {
                    bail!("Only one input file may be given (extra: {})", other);
                }
                input = Some(PathBuf::from(other));
            }
        }
    }

    let Some(input) = input else {
        print_help();
        bail!("Missing input file");
    };

    let mut config = match &config_path {
        Some(path) => IoConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config {:?}", path))?,
        None => IoConfig::default(),
    };
    if !sample_textures {
        config.sample_textures = false;
    }

    let mut mesh = Mesh::new();
    let report = read_object_with(&input, &mut mesh, &config)
        .with_context(|| format!("Failed to read {:?}", input))?;

    println!("scanmesh-convert v{}", scanmesh::VERSION);
    println!("  format:          {}", report.format);
    println!("  vertices:        {}", mesh.vertices.len());
    println!("  colored:         {}", mesh.colored_vertex_count());
    println!("  normals:         {}", mesh.normals.len());
    println!("  tex coords:      {}", mesh.tex_coords.len());
    println!("  faces:           {}", mesh.faces.len());
    if let Some(grammar) = report.grammar {
        println!("  face grammar:    {:?}", grammar);
    }
    if !mesh.materials.is_empty() {
        println!("  materials:       {:?}", mesh.materials);
        println!("  colorized faces: {}", report.colorized_faces);
    }
    if let Some(err) = &report.texture_error {
        println!("  texture skipped: {}", err);
    }

    let Some(out_path) = out_path else {
        return Ok(());
    };

    if per_corner_normals && mesh.has_faces() && !mesh.normals.is_empty() {
        let (normals, faces) = expand_vertex_normals(&mesh.normals, &mesh.faces)
            .context("Failed to expand per-vertex normals")?;
        mesh.normals = normals;
        mesh.faces = faces;
    }

    let written = write_object_with(&out_path, &mesh, &config)
        .with_context(|| format!("Failed to write {:?}", out_path))?;
    println!("Wrote {:?}", written);

    Ok(())
}

fn print_help() {
    println!("scanmesh-convert: inspect and convert OBJ / PLY / PTX files");
    println!();
    println!("USAGE:");
    println!("  scanmesh-convert <input> [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("  --out <path>            Write the mesh (OBJ if it has faces, PLY otherwise)");
    println!("  --config <file.json>    Codec options (see IoConfig)");
    println!("  --per-corner-normals    Write one normal per face corner instead of per vertex");
    println!("  --no-textures           Skip colorizing OBJ vertices from their texture");
    println!("  -h, --help              Show this help");
}
