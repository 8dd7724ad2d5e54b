//! Ordering-table renderer.
//!
//! # Invariants
//! - The renderer reads the world and never mutates it.
//! - Primitives whose depth is outside `(0, table_size)` never reach a bucket.
//! - Buckets are drawn from the highest index to the lowest; within a bucket,
//!   in insertion order.

pub mod config;
pub mod frame;
pub mod ordering;
pub mod present;
pub mod primitive;
pub mod renderer;
pub mod submit;

pub use config::{BiasPolicy, RenderConfig};
pub use frame::{overlay_text, render_frame};
pub use ordering::{OrderingTable, RenderError, place};
pub use present::{HeadlessPresenter, PresentCall, Presenter};
pub use primitive::{DrawPrimitive, Paint};
pub use renderer::{DebugTextRenderer, DrawRecorder, Rasterizer};
pub use submit::{FrameStats, submit};

pub fn crate_info() -> &'static str {
    "lowpoly-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
