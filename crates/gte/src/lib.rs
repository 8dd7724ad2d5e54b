//! Geometry Engine: Q12 fixed-point math and the rotate / translate / compose /
//! project contract consumed by the simulation and the renderer.
//!
//! # Invariants
//! - All spatial values are integers; nothing in the hot path touches floats.
//! - Angles use 4096 units per full turn and wrap per axis.
//! - Positions are Q12 (`ONE` = 4096); matrices are built from grid space
//!   (Q12 shifted right by 12).

pub mod engine;
pub mod fixed;
pub mod matrix;
mod soft;
pub mod trig;

pub use engine::{GeometryEngine, Projection};
pub use fixed::{
    FIXED_SHIFT, FULL_TURN, ONE, fixed_mul, fixed_vec, from_grid, grid_vec, horizontal_length,
    to_grid, wrap_angle,
};
pub use matrix::FixedMatrix;
pub use soft::SoftGte;
pub use trig::{icos, isin};

pub fn crate_info() -> &'static str {
    "lowpoly-gte v0.1.0"
}
