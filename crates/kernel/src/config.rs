use lowpoly_gte::ONE;
use serde::{Deserialize, Serialize};

/// Simulation tunables. Distances are grid units unless noted as Q12.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub physics: PhysicsConfig,
    pub actor: ActorConfig,
    pub camera: CameraConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Added to vertical velocity each airborne tick (Q12, positive is down).
    pub gravity: i32,
    /// Subtracted from vertical velocity on jump (Q12).
    pub jump_impulse: i32,
    /// Y of the implicit floor plane (Q12).
    pub world_floor: i32,
    /// Tallest ledge the actor climbs without jumping.
    pub step_limit: i32,
    /// Limit horizontal displacement to each entity's max speed.
    pub speed_clamp: bool,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: ONE / 2,
            jump_impulse: 8 * ONE,
            world_floor: 0,
            step_limit: 32,
            speed_clamp: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorConfig {
    pub half_width: i32,
    pub height: i32,
    /// Q12 units per tick.
    pub max_speed: i32,
    /// Multiplier applied to the unit move direction (Q12) to get velocity.
    pub move_scale: i32,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            half_width: 20,
            height: 48,
            max_speed: 5 * ONE,
            move_scale: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// How far above the actor's reference point the camera sits.
    pub height_offset: i32,
    /// How far behind the actor the camera sits.
    pub follow_distance: i32,
    /// Look rotation per tick while a stick is held (Q12 angle units).
    pub look_speed: i32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            height_offset: 96,
            follow_distance: 160,
            look_speed: 8 * ONE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let cfg: SimConfig = serde_yaml::from_str("physics:\n  step_limit: 16\n").unwrap();
        assert_eq!(cfg.physics.step_limit, 16);
        assert_eq!(cfg.physics.gravity, ONE / 2);
        assert_eq!(cfg.actor, ActorConfig::default());
    }
}
