use std::fmt::Write as _;

use crate::primitive::{DrawPrimitive, Paint};

/// Receives primitives in draw order. Implementations never reorder.
pub trait Rasterizer {
    fn draw(&mut self, prim: &DrawPrimitive);
}

/// Records every primitive it is given; the headless stand-in for a GPU.
#[derive(Debug, Default)]
pub struct DrawRecorder {
    frame: Vec<DrawPrimitive>,
}

impl DrawRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Primitives drawn since the last [`DrawRecorder::begin_frame`].
    pub fn frame(&self) -> &[DrawPrimitive] {
        &self.frame
    }

    pub fn begin_frame(&mut self) {
        self.frame.clear();
    }
}

impl Rasterizer for DrawRecorder {
    fn draw(&mut self, prim: &DrawPrimitive) {
        self.frame.push(*prim);
    }
}

/// Writes one line per primitive: bucket, owner, paint and screen points.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    out: String,
    lines: usize,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> usize {
        self.lines
    }

    /// Take the accumulated text, leaving the renderer empty.
    pub fn take(&mut self) -> String {
        self.lines = 0;
        std::mem::take(&mut self.out)
    }
}

impl Rasterizer for DebugTextRenderer {
    fn draw(&mut self, prim: &DrawPrimitive) {
        let _ = write!(self.out, "[{:04}] {} ", prim.bucket, prim.entity);
        let _ = match prim.paint {
            Paint::Flat(c) => write!(self.out, "flat({},{},{})", c.r, c.g, c.b),
            Paint::Textured { texture, uv, .. } => write!(
                self.out,
                "tex(page={:#06x} clut={:#06x} uv={},{} {}x{})",
                texture.tpage, texture.clut, uv.u, uv.v, uv.w, uv.h
            ),
        };
        for p in prim.points() {
            let _ = write!(self.out, " ({}, {})", p.x, p.y);
        }
        self.out.push('\n');
        self.lines += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;
    use lowpoly_assets::{TextureHandle, UvRect};
    use lowpoly_common::{EntityId, Rgb};

    fn quad(paint: Paint) -> DrawPrimitive {
        DrawPrimitive::new(
            EntityId(7),
            &[
                IVec2::new(1, 2),
                IVec2::new(3, 4),
                IVec2::new(5, 6),
                IVec2::new(7, 8),
            ],
            42,
            paint,
        )
    }

    #[test]
    fn recorder_keeps_draw_order() {
        let mut r = DrawRecorder::new();
        r.draw(&quad(Paint::Flat(Rgb::new(1, 2, 3))));
        r.draw(&quad(Paint::Flat(Rgb::new(4, 5, 6))));
        assert_eq!(r.frame().len(), 2);
        assert_eq!(r.frame()[1].paint, Paint::Flat(Rgb::new(4, 5, 6)));
        r.begin_frame();
        assert!(r.frame().is_empty());
    }

    #[test]
    fn debug_text_lists_each_primitive() {
        let mut r = DebugTextRenderer::new();
        r.draw(&quad(Paint::Flat(Rgb::new(255, 0, 0))));
        r.draw(&quad(Paint::Textured {
            texture: TextureHandle { tpage: 0x8a, clut: 0 },
            uv: UvRect::new(0, 127, 128, 128),
            window: None,
        }));
        assert_eq!(r.lines(), 2);
        let text = r.take();
        assert!(text.starts_with("[0042] #7 flat(255,0,0) (1, 2) (3, 4) (5, 6) (7, 8)\n"));
        assert!(text.contains("tex(page=0x008a"));
        assert!(text.contains("uv=0,127 128x128"));
        assert_eq!(r.lines(), 0);
    }
}
