use glam::IVec2;
use lowpoly_assets::{TextureHandle, TextureWindow, UvRect};
use lowpoly_common::{EntityId, Rgb};

/// How a primitive is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
    Flat(Rgb),
    Textured {
        texture: TextureHandle,
        uv: UvRect,
        window: Option<TextureWindow>,
    },
}

/// One projected primitive ready for the rasterizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawPrimitive {
    pub entity: EntityId,
    points: [IVec2; 4],
    sides: u8,
    /// Bucket the primitive was filed under.
    pub bucket: usize,
    pub paint: Paint,
}

impl DrawPrimitive {
    pub fn new(entity: EntityId, points: &[IVec2], bucket: usize, paint: Paint) -> Self {
        let mut buf = [IVec2::ZERO; 4];
        let sides = points.len().min(4);
        buf[..sides].copy_from_slice(&points[..sides]);
        Self {
            entity,
            points: buf,
            sides: sides as u8,
            bucket,
            paint,
        }
    }

    pub fn points(&self) -> &[IVec2] {
        &self.points[..usize::from(self.sides)]
    }

    pub fn sides(&self) -> usize {
        usize::from(self.sides)
    }
}
