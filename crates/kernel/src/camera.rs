use glam::IVec3;
use lowpoly_gte::{
    FIXED_SHIFT, FULL_TURN, FixedMatrix, GeometryEngine, ONE, fixed_mul, grid_vec, icos, isin,
    to_grid, wrap_angle,
};
use lowpoly_input::Intent;
use serde::{Deserialize, Serialize};

use crate::config::CameraConfig;

/// Rotation is kept with 12 extra fractional bits, so it wraps at this mask.
const ROTATION_MASK: i32 = (FULL_TURN << FIXED_SHIFT) - 1;

/// Follow camera. Holds its own absolute rotation; the matrix is rebuilt
/// from scratch on every [`Camera::follow`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Camera {
    position: IVec3,
    rotation: IVec3,
    #[serde(skip)]
    matrix: FixedMatrix,
}

impl Camera {
    /// Q12 world position.
    pub fn position(&self) -> IVec3 {
        self.position
    }

    /// Rotation in Q12 angle units.
    pub fn rotation(&self) -> IVec3 {
        self.rotation
    }

    /// Whole angles (0..4096) used to build the matrix.
    pub fn angles(&self) -> IVec3 {
        IVec3::new(
            wrap_angle(to_grid(self.rotation.x)),
            wrap_angle(to_grid(self.rotation.y)),
            wrap_angle(to_grid(self.rotation.z)),
        )
    }

    /// World-to-view matrix from the last [`Camera::follow`].
    pub fn matrix(&self) -> &FixedMatrix {
        &self.matrix
    }

    pub fn set_rotation(&mut self, rotation: IVec3) {
        self.rotation = rotation & IVec3::splat(ROTATION_MASK);
    }

    /// Apply one tick of look input.
    pub fn look(&mut self, intent: &Intent, look_speed: i32) {
        let delta = IVec3::new(
            intent.look_pitch.sign() * look_speed,
            intent.look_yaw.sign() * look_speed,
            0,
        );
        self.set_rotation(self.rotation + delta);
    }

    /// Place the camera above and behind the actor and rebuild the matrix.
    pub fn follow(
        &mut self,
        actor_position: IVec3,
        actor_yaw: i32,
        config: &CameraConfig,
        gte: &impl GeometryEngine,
    ) {
        let back = config.follow_distance * ONE;
        let mut position = actor_position;
        position.y -= config.height_offset * ONE;
        position.x += fixed_mul(isin(actor_yaw), back);
        position.z -= fixed_mul(icos(actor_yaw), back);
        self.position = position;

        let mut matrix = gte.rotation_matrix(self.angles());
        let eye = gte.apply(&matrix, grid_vec(-position));
        gte.translate(&mut matrix, eye);
        self.matrix = matrix;
    }

    /// Render transform for an entity: this camera composed with `local`.
    pub fn view_of(&self, local: &FixedMatrix, gte: &impl GeometryEngine) -> FixedMatrix {
        gte.compose(&self.matrix, local)
    }
}
