use glam::IVec3;
use lowpoly_common::Transform;
use lowpoly_gte::{GeometryEngine, fixed_mul, horizontal_length, icos, isin};
use lowpoly_input::Intent;

/// Displacement for one tick. With `clamp` set and a max speed given, a
/// horizontal speed above the limit is scaled back onto it; Y is untouched.
pub fn displacement(velocity: IVec3, max_speed: Option<i32>, clamp: bool) -> IVec3 {
    let Some(limit) = max_speed.filter(|_| clamp) else {
        return velocity;
    };
    let speed = horizontal_length(velocity);
    if speed <= limit || speed == 0 {
        return velocity;
    }
    let scale = |c: i32| (i64::from(c) * i64::from(limit) / i64::from(speed)) as i32;
    IVec3::new(scale(velocity.x), velocity.y, scale(velocity.z))
}

/// Advance a dynamic entity by its velocity and rebuild its matrix.
pub fn integrate(
    transform: &mut Transform,
    velocity: IVec3,
    max_speed: Option<i32>,
    clamp: bool,
    gte: &impl GeometryEngine,
) {
    transform.translate_by(displacement(velocity, max_speed, clamp));
    transform.refresh(gte);
}

/// Horizontal velocity requested by `intent`, oriented by the look angles
/// (`look.x` pitch, `look.y` yaw). Returns `(vx, vz)`.
pub fn steer(intent: &Intent, look: IVec3, move_scale: i32) -> (i32, i32) {
    let (sin_yaw, cos_yaw) = (isin(look.y), icos(look.y));
    let cos_pitch = icos(look.x);

    let fwd = intent.forward.sign();
    let side = intent.strafe.sign();

    let vx = -fwd * fixed_mul(sin_yaw, cos_pitch) * move_scale + side * cos_yaw * move_scale;
    let vz = fwd * fixed_mul(cos_yaw, cos_pitch) * move_scale + side * sin_yaw * move_scale;
    (vx, vz)
}

/// Vertical outcome after collision resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grounding {
    pub grounded: bool,
    pub position_y: i32,
    pub velocity_y: i32,
    pub jumped: bool,
}

/// Decide whether the actor stands on something and apply jump or gravity.
///
/// Standing means the resolver reported contact, the actor sits exactly on
/// the floor, or this tick's fall would cross it (then Y snaps to the floor).
pub fn settle(
    position_y: i32,
    velocity_y: i32,
    on_collision: bool,
    jump: bool,
    physics: &crate::config::PhysicsConfig,
) -> Grounding {
    let floor = physics.world_floor;
    let mut out = Grounding {
        grounded: true,
        position_y,
        velocity_y,
        jumped: false,
    };

    if !on_collision && position_y != floor {
        if position_y + velocity_y > floor {
            out.position_y = floor;
        } else {
            out.grounded = false;
        }
    }

    if out.grounded {
        out.velocity_y = 0;
        if jump {
            out.velocity_y -= physics.jump_impulse;
            out.jumped = true;
        }
    } else {
        out.velocity_y += physics.gravity;
    }
    out
}
