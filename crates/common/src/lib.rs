//! Shared data model for the lowpoly engine.
//!
//! # Invariants
//! - A transform's matrix is only ever derived from its rotation and grid-space
//!   position; there is no setter for the matrix itself.
//! - Entity ids are dense and assigned in creation order.

pub mod types;

pub use types::{DrawPriority, EntityId, Rgb, Transform};
