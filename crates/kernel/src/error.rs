use lowpoly_common::EntityId;
use lowpoly_ecs::RenderableError;
use std::collections::TryReserveError;

/// Failures while building the world. Any of these aborts startup.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("entity arena allocation failed: {0}")]
    Alloc(#[from] TryReserveError),
    #[error("entity id space exhausted")]
    TooManyEntities,
    #[error("invalid renderable: {0}")]
    Renderable(#[from] RenderableError),
    #[error("collider extents must be non-negative, got {0}")]
    NegativeExtents(glam::IVec3),
    #[error("max speed must be non-negative, got {0}")]
    NegativeMaxSpeed(i32),
    #[error("an actor already exists ({0})")]
    ActorExists(EntityId),
    #[error("unknown entity {0}")]
    UnknownEntity(EntityId),
}
