//! Vertex representation shared by every codec.
//!
//! A vertex always has a position. The normal is optional. The color uses a
//! sentinel instead of an `Option`: readers that have no color information
//! leave the channels at zero, and any channel that is not strictly positive
//! means "no color".

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Color value used by readers for vertices without color information.
pub const UNSET_RGB: [f32; 3] = [0.0, 0.0, 0.0];

/// A single mesh vertex.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    /// Position in model space
    pub position: Vector3<f32>,

    /// Unit normal, if the source file provided one
    pub normal: Option<Vector3<f32>>,

    /// RGB color in the 0-255 range, or the unset sentinel
    pub rgb: Vector3<f32>,
}

impl Vertex {
    /// Create a vertex with no normal and an unset color.
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self::from_position(Vector3::new(x, y, z))
    }

    pub fn from_position(position: Vector3<f32>) -> Self {
        Self {
            position,
            normal: None,
            rgb: Vector3::from(UNSET_RGB),
        }
    }

    pub fn with_normal(mut self, normal: Vector3<f32>) -> Self {
        self.normal = Some(normal);
        self
    }

    pub fn with_color(mut self, rgb: Vector3<f32>) -> Self {
        self.rgb = rgb;
        self
    }

    /// Whether the vertex carries a usable color.
    ///
    /// Every channel must be strictly positive: `(0, 128, 64)` and
    /// `(255, -1, -1)` both count as colorless. PLY output decides whether to
    /// emit color columns with this test.
    pub fn has_color(&self) -> bool {
        self.rgb.iter().all(|c| *c > 0.0)
    }

    /// Whether the red channel differs from zero.
    ///
    /// OBJ output appends the color triple to a `v` line with this test, which
    /// is weaker than [`Vertex::has_color`]: a `(-1, -1, -1)` color passes it.
    pub fn red_is_nonzero(&self) -> bool {
        self.rgb.x != 0.0
    }
}

impl Default for Vertex {
    fn default() -> Self {
        Self::from_position(Vector3::zeros())
    }
}
