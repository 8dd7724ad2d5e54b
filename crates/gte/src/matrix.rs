//! 3x4 fixed-point matrices: a Q12 rotation block plus an integer translation.

use glam::IVec3;
use serde::{Deserialize, Serialize};

use crate::fixed::{FIXED_SHIFT, ONE};
use crate::trig::{icos, isin};

/// Rotation (Q12, row-major) and translation (grid units).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedMatrix {
    pub m: [[i32; 3]; 3],
    pub t: IVec3,
}

impl Default for FixedMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl FixedMatrix {
    pub const IDENTITY: Self = Self {
        m: [[ONE, 0, 0], [0, ONE, 0], [0, 0, ONE]],
        t: IVec3::ZERO,
    };

    /// Rotation matrix for per-axis angles, composed as `Rx * Ry * Rz`.
    pub fn from_rotation(rotation: IVec3) -> Self {
        let (sx, cx) = (isin(rotation.x), icos(rotation.x));
        let (sy, cy) = (isin(rotation.y), icos(rotation.y));
        let (sz, cz) = (isin(rotation.z), icos(rotation.z));

        let rx = [[ONE, 0, 0], [0, cx, -sx], [0, sx, cx]];
        let ry = [[cy, 0, sy], [0, ONE, 0], [-sy, 0, cy]];
        let rz = [[cz, -sz, 0], [sz, cz, 0], [0, 0, ONE]];

        Self {
            m: mul_rot(&mul_rot(&rx, &ry), &rz),
            t: IVec3::ZERO,
        }
    }

    /// Rotate `v` by the rotation block only.
    pub fn rotate(&self, v: IVec3) -> IVec3 {
        let row = |r: &[i32; 3]| -> i32 {
            let sum = i64::from(r[0]) * i64::from(v.x)
                + i64::from(r[1]) * i64::from(v.y)
                + i64::from(r[2]) * i64::from(v.z);
            (sum >> FIXED_SHIFT) as i32
        };
        IVec3::new(row(&self.m[0]), row(&self.m[1]), row(&self.m[2]))
    }

    /// Rotate then translate `v`.
    pub fn transform_point(&self, v: IVec3) -> IVec3 {
        self.rotate(v) + self.t
    }

    /// `self ∘ other`: applying the result equals applying `other`, then `self`.
    pub fn compose(&self, other: &Self) -> Self {
        Self {
            m: mul_rot(&self.m, &other.m),
            t: self.rotate(other.t) + self.t,
        }
    }
}

fn mul_rot(a: &[[i32; 3]; 3], b: &[[i32; 3]; 3]) -> [[i32; 3]; 3] {
    let mut out = [[0; 3]; 3];
    for (r, row) in out.iter_mut().enumerate() {
        for (c, cell) in row.iter_mut().enumerate() {
            let sum: i64 = (0..3)
                .map(|k| i64::from(a[r][k]) * i64::from(b[k][c]))
                .sum();
            *cell = (sum >> FIXED_SHIFT) as i32;
        }
    }
    out
}
