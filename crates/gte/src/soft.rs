use glam::{IVec2, IVec3};
use serde::{Deserialize, Serialize};

use crate::engine::{GeometryEngine, Projection};
use crate::matrix::FixedMatrix;

/// Nearest view-space depth that still projects.
const NEAR_Z: i32 = 1;

/// Screen coordinate saturation range of the rasteriser.
const SCREEN_MIN: i64 = -1024;
const SCREEN_MAX: i64 = 1023;

/// Integer software implementation of [`GeometryEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoftGte {
    /// Screen position of the optical axis.
    pub offset: IVec2,
    /// Projection plane distance (focal length in pixels).
    pub screen_distance: i32,
    /// Right shift applied to the averaged view depth.
    pub depth_shift: u32,
}

impl Default for SoftGte {
    fn default() -> Self {
        Self {
            offset: IVec2::new(160, 120),
            screen_distance: 160,
            depth_shift: 2,
        }
    }
}

impl SoftGte {
    pub fn new(offset: IVec2, screen_distance: i32, depth_shift: u32) -> Self {
        Self {
            offset,
            screen_distance,
            depth_shift,
        }
    }

    fn to_screen(&self, view: IVec3) -> IVec2 {
        let h = i64::from(self.screen_distance);
        let z = i64::from(view.z);
        let sx = i64::from(self.offset.x) + i64::from(view.x) * h / z;
        let sy = i64::from(self.offset.y) + i64::from(view.y) * h / z;
        IVec2::new(
            sx.clamp(SCREEN_MIN, SCREEN_MAX) as i32,
            sy.clamp(SCREEN_MIN, SCREEN_MAX) as i32,
        )
    }
}

/// Signed doubled area of the first three screen points. Positive means
/// clockwise on a Y-down screen, i.e. front facing.
fn winding(p: &[IVec2]) -> i64 {
    let (x0, y0) = (i64::from(p[0].x), i64::from(p[0].y));
    let (x1, y1) = (i64::from(p[1].x), i64::from(p[1].y));
    let (x2, y2) = (i64::from(p[2].x), i64::from(p[2].y));
    (x1 - x0) * (y2 - y0) - (x2 - x0) * (y1 - y0)
}

impl GeometryEngine for SoftGte {
    fn project(&self, vertices: &[IVec3], matrix: &FixedMatrix) -> Option<Projection> {
        let sides = vertices.len();
        if !(3..=4).contains(&sides) {
            return None;
        }

        let mut points = [IVec2::ZERO; 4];
        let mut z_sum: i64 = 0;
        for (slot, v) in points.iter_mut().zip(vertices) {
            let view = matrix.transform_point(*v);
            if view.z < NEAR_Z {
                tracing::trace!(z = view.z, "rejected: behind near plane");
                return None;
            }
            *slot = self.to_screen(view);
            z_sum += i64::from(view.z);
        }

        if winding(&points[..sides]) <= 0 {
            return None;
        }

        let depth = (z_sum / sides as i64) >> self.depth_shift;
        Some(Projection::new(
            points,
            sides,
            i32::try_from(depth).unwrap_or(i32::MAX),
        ))
    }
}
