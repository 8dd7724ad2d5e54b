//! Pad input mapped to per-tick intent.
//!
//! # Invariants
//! - A report with nonzero status contributes nothing: no intent, no latch change.
//! - Stick axes inside the dead zone read as neutral.

pub mod action;
pub mod pad;
pub mod source;

pub use action::{InputConfig, InputMapper, Intent};
pub use pad::{AxisDir, Buttons, PadReport, Stick};
pub use source::{InputSource, ScriptedInput};

pub fn crate_info() -> &'static str {
    "lowpoly-input v0.1.0"
}
