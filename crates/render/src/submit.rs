use lowpoly_ecs::Surface;
use lowpoly_gte::GeometryEngine;
use lowpoly_kernel::World;
use serde::Serialize;

use crate::config::RenderConfig;
use crate::ordering::{OrderingTable, place};
use crate::primitive::{DrawPrimitive, Paint};

/// Per-frame primitive counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FrameStats {
    /// Filed into a bucket.
    pub submitted: u32,
    /// Rejected by projection (behind the eye or back-facing).
    pub culled: u32,
    /// Projected, but depth fell outside the table.
    pub out_of_range: u32,
    /// Issued to the rasterizer.
    pub drawn: u32,
}

impl std::ops::AddAssign for FrameStats {
    fn add_assign(&mut self, rhs: Self) {
        self.submitted += rhs.submitted;
        self.culled += rhs.culled;
        self.out_of_range += rhs.out_of_range;
        self.drawn += rhs.drawn;
    }
}

/// Project every renderable primitive in the world through the camera and
/// file it into `table`.
pub fn submit(
    world: &World,
    gte: &impl GeometryEngine,
    config: &RenderConfig,
    table: &mut OrderingTable,
) -> FrameStats {
    let mut stats = FrameStats::default();
    let camera = world.camera();

    for (entity, local, renderable) in world.drawables() {
        let view = camera.view_of(local, gte);
        for i in 0..renderable.primitive_count() {
            let paint = match renderable.surface() {
                Surface::Flat(colors) => Paint::Flat(colors[i]),
                Surface::Textured(faces) => match faces[i] {
                    Some(face) => Paint::Textured {
                        texture: face.texture,
                        uv: face.uv,
                        window: face.window,
                    },
                    None => continue,
                },
                Surface::TiledTextured { face, .. } => Paint::Textured {
                    texture: face.texture,
                    uv: face.uv,
                    window: face.window,
                },
                Surface::Subdivided { face, .. } => Paint::Textured {
                    texture: face.texture,
                    uv: renderable.cell_uv(i).unwrap_or(face.uv),
                    window: face.window,
                },
            };
            let Some(vertices) = renderable.primitive_vertices(i) else {
                continue;
            };
            let Some(projection) = gte.project(vertices.as_slice(), &view) else {
                stats.culled += 1;
                continue;
            };
            let Some(bucket) = place(projection.depth, renderable.priority, config) else {
                stats.out_of_range += 1;
                continue;
            };
            let prim = DrawPrimitive::new(entity, projection.points(), bucket, paint);
            if table.insert(prim) {
                stats.submitted += 1;
            } else {
                stats.out_of_range += 1;
            }
        }
    }

    tracing::trace!(
        submitted = stats.submitted,
        culled = stats.culled,
        out_of_range = stats.out_of_range,
        buckets = table.occupied_buckets(),
        "submission done"
    );
    stats
}
