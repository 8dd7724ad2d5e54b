use glam::IVec3;
use lowpoly_gte::{FixedMatrix, GeometryEngine, grid_vec, wrap_angle};
use serde::{Deserialize, Serialize};

/// Index of an entity in the world arena. Ids are handed out in creation
/// order, so ordering by id is ordering by creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Spatial transform: Q12 position, per-axis angles, and the derived matrix.
///
/// Position and rotation changes mark the transform stale; [`Transform::refresh`]
/// rebuilds the matrix from rotation and `position >> 12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transform {
    position: IVec3,
    rotation: IVec3,
    matrix: FixedMatrix,
    #[serde(skip)]
    stale: bool,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: IVec3::ZERO,
            rotation: IVec3::ZERO,
            matrix: FixedMatrix::IDENTITY,
            stale: false,
        }
    }
}

impl Transform {
    /// Build a transform and its matrix in one go.
    pub fn new(position: IVec3, rotation: IVec3, gte: &impl GeometryEngine) -> Self {
        let mut t = Self {
            position,
            rotation: wrap_rotation(rotation),
            matrix: FixedMatrix::IDENTITY,
            stale: true,
        };
        t.refresh(gte);
        t
    }

    /// Q12 position.
    pub fn position(&self) -> IVec3 {
        self.position
    }

    /// Position shifted into grid space (floor).
    pub fn grid_position(&self) -> IVec3 {
        grid_vec(self.position)
    }

    pub fn rotation(&self) -> IVec3 {
        self.rotation
    }

    pub fn matrix(&self) -> &FixedMatrix {
        &self.matrix
    }

    /// True when position or rotation changed since the last refresh.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn set_position(&mut self, position: IVec3) {
        self.position = position;
        self.stale = true;
    }

    pub fn translate_by(&mut self, delta: IVec3) {
        self.set_position(self.position + delta);
    }

    pub fn set_rotation(&mut self, rotation: IVec3) {
        self.rotation = wrap_rotation(rotation);
        self.stale = true;
    }

    /// Add `delta` to each angle; each axis wraps on its own.
    pub fn rotate_by(&mut self, delta: IVec3) {
        self.set_rotation(self.rotation + delta);
    }

    /// Rebuild the matrix from rotation and grid-space position.
    pub fn refresh(&mut self, gte: &impl GeometryEngine) {
        self.matrix = gte.local_matrix(self.rotation, self.grid_position());
        self.stale = false;
    }
}

fn wrap_rotation(r: IVec3) -> IVec3 {
    IVec3::new(wrap_angle(r.x), wrap_angle(r.y), wrap_angle(r.z))
}

/// Coarse draw-order class of a renderable, independent of true depth.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrawPriority {
    #[default]
    Neutral,
    /// Pushed toward the far end of the ordering table (drawn earlier, behind).
    Low,
    /// Pushed toward the near end (drawn later, in front).
    High,
}

impl DrawPriority {
    /// Signed bucket offset for a given bias magnitude.
    pub fn offset(self, bias: i32) -> i32 {
        match self {
            Self::Neutral => 0,
            Self::Low => bias,
            Self::High => -bias,
        }
    }
}

/// 8-bit colour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const NEUTRAL: Self = Self::new(128, 128, 128);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}
