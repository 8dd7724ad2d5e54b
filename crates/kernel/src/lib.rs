//! World kernel: entity arena and the per-tick simulation.
//!
//! # Invariants
//! - Tick order: intent, actor collision, grounding, integration, camera.
//! - Static entities never integrate and never rebuild their matrix.
//! - Solids are resolved in creation order; verdicts are only ever set.
//! - At most one ledge step per tick.

pub mod camera;
pub mod collision;
pub mod config;
pub mod error;
pub mod motion;
pub mod world;

pub use camera::Camera;
pub use collision::{Body, Resolution, SolidBox};
pub use config::{ActorConfig, CameraConfig, PhysicsConfig, SimConfig};
pub use error::SetupError;
pub use world::{Actor, Entity, EntityKind, Motion, TickReport, World, WorldEvent};

pub fn crate_info() -> &'static str {
    "lowpoly-kernel v0.1.0"
}
