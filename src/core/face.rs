//! Triangle faces with per-corner attribute references.

use serde::{Deserialize, Serialize};

/// A triangle referencing three vertices, plus optional per-corner references
/// into the normal and texture-coordinate sequences.
///
/// All indices are 0-based. `None` marks a corner reference the source file
/// did not provide. Two faces are equal only if all nine fields match.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Face {
    pub a: usize,
    pub b: usize,
    pub c: usize,
    pub n1: Option<usize>,
    pub n2: Option<usize>,
    pub n3: Option<usize>,
    pub t1: Option<usize>,
    pub t2: Option<usize>,
    pub t3: Option<usize>,
}

impl Face {
    /// Create a face without normal or texture-coordinate references.
    pub fn new(a: usize, b: usize, c: usize) -> Self {
        Self {
            a,
            b,
            c,
            ..Self::default()
        }
    }

    pub fn with_normals(mut self, n1: usize, n2: usize, n3: usize) -> Self {
        self.set_normal_corners([Some(n1), Some(n2), Some(n3)]);
        self
    }

    pub fn with_tex_coords(mut self, t1: usize, t2: usize, t3: usize) -> Self {
        self.set_tex_corners([Some(t1), Some(t2), Some(t3)]);
        self
    }

    pub fn vertices(&self) -> [usize; 3] {
        [self.a, self.b, self.c]
    }

    pub fn normal_corners(&self) -> [Option<usize>; 3] {
        [self.n1, self.n2, self.n3]
    }

    pub fn tex_corners(&self) -> [Option<usize>; 3] {
        [self.t1, self.t2, self.t3]
    }

    pub fn set_normal_corners(&mut self, corners: [Option<usize>; 3]) {
        [self.n1, self.n2, self.n3] = corners;
    }

    pub fn set_tex_corners(&mut self, corners: [Option<usize>; 3]) {
        [self.t1, self.t2, self.t3] = corners;
    }

    /// All three texture-coordinate references, if every corner has one.
    pub fn resolved_tex_corners(&self) -> Option<[usize; 3]> {
        match self.tex_corners() {
            [Some(t1), Some(t2), Some(t3)] => Some([t1, t2, t3]),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_covers_all_fields() {
        let plain = Face::new(0, 1, 2);
        assert_eq!(plain, Face::new(0, 1, 2));
        assert_ne!(plain, plain.with_normals(0, 1, 2));
        assert_ne!(plain, plain.with_tex_coords(0, 1, 2));
        assert_ne!(
            plain.with_normals(0, 1, 2),
            plain.with_normals(0, 1, 3)
        );
    }

    #[test]
    fn test_resolved_tex_corners_requires_all_three() {
        let mut face = Face::new(0, 1, 2).with_tex_coords(3, 4, 5);
        assert_eq!(face.resolved_tex_corners(), Some([3, 4, 5]));

        face.t2 = None;
        assert_eq!(face.resolved_tex_corners(), None);
    }
}
