//! Vertex colorization from a material's diffuse texture.
//!
//! Only the first `mtllib` of a mesh is consulted, and only its first
//! `map_Kd` entry. The image is resolved against the OBJ file's directory.
//! Each face with three texture-coordinate references samples the image at
//! its corners and paints the corresponding vertices; when faces share a
//! vertex, the last face wins.

use crate::core::Mesh;
use crate::io::TextureError;
use nalgebra::{Vector2, Vector3};
use std::path::{Path, PathBuf};

/// Channels per pixel of a decoded texture (always RGB).
pub const RGB_CHANNELS: usize = 3;

/// An RGB8 image kept as a flat, row-major, interleaved pixel buffer.
#[derive(Debug, Clone)]
pub struct Texture {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Texture {
    /// Decode an image file, converting it to RGB.
    pub fn open(path: &Path) -> Result<Self, TextureError> {
        let image = image::open(path)
            .map_err(|e| TextureError::ImageDecode {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?
            .to_rgb8();

        let (width, height) = image.dimensions();
        Self::from_rgb8(width, height, image.into_raw())
            .ok_or_else(|| TextureError::EmptyImage(path.to_path_buf()))
    }

    /// Wrap raw RGB8 data. Returns `None` for an empty image or a buffer whose
    /// length does not match the dimensions.
    pub fn from_rgb8(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        let expected = width as usize * height as usize * RGB_CHANNELS;
        if expected == 0 || pixels.len() != expected {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Color at texture coordinate `uv`, as 0-255 channel values.
    ///
    /// `u` selects the column (`u * width`) and `v` the row (`v * height`),
    /// with row 0 at the top of the image. Coordinates outside `[0, 1)` are
    /// clamped to the border pixels.
    pub fn sample(&self, uv: &Vector2<f32>) -> Vector3<f32> {
        let col = pixel_coordinate(uv.x, self.width);
        let row = pixel_coordinate(uv.y, self.height);
        let offset = RGB_CHANNELS * (row * self.width as usize + col);
        let px = &self.pixels[offset..offset + RGB_CHANNELS];
        Vector3::new(px[0] as f32, px[1] as f32, px[2] as f32)
    }
}

fn pixel_coordinate(t: f32, extent: u32) -> usize {
    // `as` saturates: negative and NaN map to 0.
    let scaled = (t * extent as f32) as usize;
    scaled.min(extent as usize - 1)
}

/// Name of the diffuse texture (`map_Kd`) declared by a material file.
///
/// The image name is the last token of the line, so options such as
/// `map_Kd -s 1 1 1 wood.png` are skipped.
pub fn find_diffuse_map(mtl_path: &Path) -> Result<String, TextureError> {
    let text = std::fs::read_to_string(mtl_path).map_err(|source| TextureError::MaterialOpen {
        path: mtl_path.to_path_buf(),
        source,
    })?;

    text.lines()
        .find_map(|line| {
            let mut tokens = line.split_whitespace();
            if tokens.next() != Some("map_Kd") {
                return None;
            }
            tokens.last().map(str::to_string)
        })
        .ok_or_else(|| TextureError::NoDiffuseMap(mtl_path.to_path_buf()))
}

/// Paint vertices from `texture`. Returns the number of faces sampled.
///
/// Faces missing any of their three texture-coordinate references are
/// skipped.
pub fn colorize_faces(mesh: &mut Mesh, texture: &Texture) -> usize {
    let mut sampled = 0;

    for face in &mesh.faces {
        let Some(tex_corners) = face.resolved_tex_corners() else {
            continue;
        };

        for (vertex, t) in face.vertices().into_iter().zip(tex_corners) {
            if let (Some(uv), Some(v)) = (mesh.tex_coords.get(t), mesh.vertices.get_mut(vertex)) {
                v.rgb = texture.sample(uv);
            }
        }
        sampled += 1;
    }

    sampled
}

/// Resolve the mesh's first material to a texture and colorize from it.
pub fn colorize_from_material(mesh: &mut Mesh, base_dir: &Path) -> Result<usize, TextureError> {
    let Some(mtl_path) = mesh.materials.first() else {
        return Ok(0);
    };

    let image_path: PathBuf = base_dir.join(find_diffuse_map(mtl_path)?);
    let texture = Texture::open(&image_path)?;
    log::debug!(
        "Sampling {}x{} texture {:?}",
        texture.width(),
        texture.height(),
        image_path
    );

    Ok(colorize_faces(mesh, &texture))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Face, Vertex};

    /// 2x2 texture: red, green / blue, white
    fn checker() -> Texture {
        Texture::from_rgb8(
            2,
            2,
            vec![255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255],
        )
        .unwrap()
    }

    #[test]
    fn test_sample_maps_u_to_columns_and_v_to_rows() {
        let tex = checker();
        assert_eq!(tex.sample(&Vector2::new(0.1, 0.1)), Vector3::new(255.0, 0.0, 0.0));
        assert_eq!(tex.sample(&Vector2::new(0.6, 0.1)), Vector3::new(0.0, 255.0, 0.0));
        assert_eq!(tex.sample(&Vector2::new(0.1, 0.6)), Vector3::new(0.0, 0.0, 255.0));
        assert_eq!(
            tex.sample(&Vector2::new(0.6, 0.6)),
            Vector3::new(255.0, 255.0, 255.0)
        );
    }

    #[test]
    fn test_sample_clamps_out_of_range_coordinates() {
        let tex = checker();
        assert_eq!(
            tex.sample(&Vector2::new(1.0, 1.0)),
            Vector3::new(255.0, 255.0, 255.0)
        );
        assert_eq!(tex.sample(&Vector2::new(-0.5, -3.0)), Vector3::new(255.0, 0.0, 0.0));
    }

    #[test]
    fn test_from_rgb8_rejects_bad_buffers() {
        assert!(Texture::from_rgb8(0, 0, vec![]).is_none());
        assert!(Texture::from_rgb8(2, 2, vec![0; 5]).is_none());
    }

    #[test]
    fn test_colorize_skips_faces_without_tex_coords() {
        let mut mesh = Mesh::from_vertices(vec![Vertex::new(0.0, 0.0, 0.0); 4]);
        mesh.tex_coords = vec![Vector2::new(0.6, 0.1), Vector2::new(0.1, 0.6)];
        mesh.faces = vec![
            Face::new(0, 1, 2).with_tex_coords(0, 0, 1),
            Face::new(1, 2, 3),
        ];

        assert_eq!(colorize_faces(&mut mesh, &checker()), 1);
        assert_eq!(mesh.vertices[0].rgb, Vector3::new(0.0, 255.0, 0.0));
        assert_eq!(mesh.vertices[2].rgb, Vector3::new(0.0, 0.0, 255.0));
        assert!(!mesh.vertices[3].has_color());
    }

    #[test]
    fn test_shared_vertex_takes_last_face_color() {
        let mut mesh = Mesh::from_vertices(vec![Vertex::new(0.0, 0.0, 0.0); 3]);
        mesh.tex_coords = vec![Vector2::new(0.1, 0.1), Vector2::new(0.6, 0.6)];
        mesh.faces = vec![
            Face::new(0, 1, 2).with_tex_coords(0, 0, 0),
            Face::new(2, 1, 0).with_tex_coords(1, 1, 1),
        ];

        colorize_faces(&mut mesh, &checker());
        assert!(mesh
            .vertices
            .iter()
            .all(|v| v.rgb == Vector3::new(255.0, 255.0, 255.0)));
    }

    #[test]
    fn test_find_diffuse_map_takes_last_token() {
        let dir = tempfile::tempdir().unwrap();
        let mtl = dir.path().join("wood.mtl");
        std::fs::write(
            &mtl,
            "newmtl wood\nKd 1 1 1\nmap_Kd -s 2 2 1 wood.png\nmap_Kd other.png\n",
        )
        .unwrap();

        assert_eq!(find_diffuse_map(&mtl).unwrap(), "wood.png");
    }

    #[test]
    fn test_find_diffuse_map_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.mtl");
        assert!(matches!(
            find_diffuse_map(&missing),
            Err(TextureError::MaterialOpen { .. })
        ));

        let plain = dir.path().join("plain.mtl");
        std::fs::write(&plain, "newmtl plain\nKd 0.5 0.5 0.5\n").unwrap();
        assert!(matches!(
            find_diffuse_map(&plain),
            Err(TextureError::NoDiffuseMap(_))
        ));
    }
}
