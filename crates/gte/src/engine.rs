use glam::{IVec2, IVec3};

use crate::matrix::FixedMatrix;

/// Screen-space result of projecting one primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Projection {
    points: [IVec2; 4],
    sides: usize,
    /// Average view-space depth, already scaled into ordering-table units.
    pub depth: i32,
}

impl Projection {
    pub fn new(points: [IVec2; 4], sides: usize, depth: i32) -> Self {
        Self {
            points,
            sides: sides.min(4),
            depth,
        }
    }

    /// Screen points in submission order (3 or 4 of them).
    pub fn points(&self) -> &[IVec2] {
        &self.points[..self.sides]
    }

    pub fn sides(&self) -> usize {
        self.sides
    }
}

/// Contract of the geometry transformation engine.
///
/// Matrix construction has default implementations over [`FixedMatrix`];
/// a hardware-backed engine can override any of them. Only [`project`] has
/// no default because its clipping and depth scaling are engine-specific.
///
/// [`project`]: GeometryEngine::project
pub trait GeometryEngine {
    /// Build a rotation matrix from per-axis angles. Translation is zero.
    fn rotation_matrix(&self, rotation: IVec3) -> FixedMatrix {
        FixedMatrix::from_rotation(rotation)
    }

    /// Write `translation` into the matrix, replacing the previous one.
    fn translate(&self, matrix: &mut FixedMatrix, translation: IVec3) {
        matrix.t = translation;
    }

    /// Compose two matrices so the result applies `b` first, then `a`.
    fn compose(&self, a: &FixedMatrix, b: &FixedMatrix) -> FixedMatrix {
        a.compose(b)
    }

    /// Multiply a vector by the rotation block.
    fn apply(&self, matrix: &FixedMatrix, v: IVec3) -> IVec3 {
        matrix.rotate(v)
    }

    /// Rotation followed by translation to a grid-space position.
    fn local_matrix(&self, rotation: IVec3, grid_position: IVec3) -> FixedMatrix {
        let mut m = self.rotation_matrix(rotation);
        self.translate(&mut m, grid_position);
        m
    }

    /// Rotate, translate, perspective-project, back-face clip and average the
    /// depth of one 3- or 4-vertex primitive. `None` means rejected.
    fn project(&self, vertices: &[IVec3], matrix: &FixedMatrix) -> Option<Projection>;
}
