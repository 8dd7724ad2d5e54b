use lowpoly_gte::{GeometryEngine, to_grid};
use lowpoly_kernel::World;
use std::fmt::Write as _;

use crate::config::RenderConfig;
use crate::ordering::OrderingTable;
use crate::present::Presenter;
use crate::renderer::Rasterizer;
use crate::submit::{FrameStats, submit};

/// Render one frame: clear the table, submit the world, wait for the display,
/// swap, draw far to near, flush the overlay.
pub fn render_frame(
    world: &World,
    gte: &impl GeometryEngine,
    config: &RenderConfig,
    table: &mut OrderingTable,
    rasterizer: &mut impl Rasterizer,
    presenter: &mut impl Presenter,
    overlay: &str,
) -> FrameStats {
    let _span = tracing::info_span!("frame", tick = world.tick()).entered();

    table.clear();
    let mut stats = submit(world, gte, config, table);

    presenter.wait_draw_complete();
    presenter.wait_vsync();
    let buffer = presenter.swap_buffers();

    for prim in table.iter_far_to_near() {
        rasterizer.draw(prim);
        stats.drawn += 1;
    }
    presenter.flush_overlay(overlay);

    tracing::debug!(buffer, drawn = stats.drawn, culled = stats.culled, "frame presented");
    stats
}

/// Status text for the overlay: tick, actor position and velocity, frame counts.
pub fn overlay_text(world: &World, stats: &FrameStats) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "tick={} entities={}",
        world.tick(),
        world.entity_count()
    );
    if let Some((actor, e)) = world
        .actor()
        .and_then(|a| world.entity(a.entity()).map(|e| (a, e)))
    {
        let p = e.transform.position();
        let v = e.velocity();
        let _ = writeln!(
            out,
            "PP: {}, {}, {}",
            to_grid(p.x),
            to_grid(p.y),
            to_grid(p.z)
        );
        let _ = writeln!(out, "PV: {}, {}, {}", v.x, v.y, v.z);
        let _ = writeln!(
            out,
            "grounded={} contact={}",
            actor.is_grounded(),
            actor.on_collision()
        );
    }
    let _ = writeln!(
        out,
        "drawn={} culled={} out_of_range={}",
        stats.drawn, stats.culled, stats.out_of_range
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::present::{HeadlessPresenter, PresentCall};
    use crate::primitive::Paint;
    use crate::renderer::DrawRecorder;
    use glam::IVec3;
    use lowpoly_assets::{TextureHandle, UvRect};
    use lowpoly_common::{DrawPriority, Rgb};
    use lowpoly_ecs::{Mesh, PolySides, Renderable, Surface, TexturedFace};
    use lowpoly_gte::SoftGte;
    use lowpoly_input::Intent;

    fn facing_quad() -> Mesh {
        Mesh::new(
            vec![
                IVec3::new(-10, -10, 0),
                IVec3::new(10, -10, 0),
                IVec3::new(10, 10, 0),
                IVec3::new(-10, 10, 0),
            ],
            vec![0, 1, 2, 3],
        )
    }

    fn flat(priority: DrawPriority, color: Rgb) -> Renderable {
        Renderable::new(
            facing_quad(),
            PolySides::Quad,
            1,
            priority,
            Surface::Flat(vec![color]),
        )
        .unwrap()
    }

    fn face() -> TexturedFace {
        TexturedFace::new(TextureHandle::default(), UvRect::new(0, 0, 64, 128))
    }

    struct Rig {
        world: World,
        gte: SoftGte,
        table: OrderingTable,
        recorder: DrawRecorder,
        presenter: HeadlessPresenter,
    }

    impl Rig {
        fn new() -> Self {
            let gte = SoftGte::default();
            let mut world = World::default();
            world.spawn_actor(IVec3::ZERO, None, &gte).unwrap();
            Self {
                world,
                gte,
                table: OrderingTable::new(4096).unwrap(),
                recorder: DrawRecorder::new(),
                presenter: HeadlessPresenter::new(),
            }
        }

        fn frame(&mut self) -> FrameStats {
            self.world.step(Some(Intent::default()), &self.gte);
            self.recorder.begin_frame();
            render_frame(
                &self.world,
                &self.gte,
                &RenderConfig::default(),
                &mut self.table,
                &mut self.recorder,
                &mut self.presenter,
                "",
            )
        }
    }

    #[test]
    fn quad_in_front_is_drawn() {
        let mut rig = Rig::new();
        rig.world
            .spawn_static(
                IVec3::new(0, -48, 100),
                IVec3::ZERO,
                Some(flat(DrawPriority::Neutral, Rgb::NEUTRAL)),
                &rig.gte,
            )
            .unwrap();
        let stats = rig.frame();
        assert_eq!(stats.submitted, 1);
        assert_eq!(stats.drawn, 1);
        // View depth 260, quartered.
        assert_eq!(rig.recorder.frame()[0].bucket, 65);
    }

    #[test]
    fn priority_classes_order_the_draws() {
        let mut rig = Rig::new();
        let colors = [Rgb::new(1, 0, 0), Rgb::new(0, 1, 0), Rgb::new(0, 0, 1)];
        let prios = [DrawPriority::High, DrawPriority::Neutral, DrawPriority::Low];
        for (i, (p, c)) in prios.into_iter().zip(colors).enumerate() {
            rig.world
                .spawn_static(
                    IVec3::new(30 * i as i32 - 30, -48, 1200),
                    IVec3::ZERO,
                    Some(flat(p, c)),
                    &rig.gte,
                )
                .unwrap();
        }
        rig.frame();
        // View depth 1360 puts the neutral quad in bucket 340.
        let buckets: Vec<usize> = rig.recorder.frame().iter().map(|p| p.bucket).collect();
        assert_eq!(buckets, vec![596, 340, 84]);
        let drawn: Vec<Paint> = rig.recorder.frame().iter().map(|p| p.paint).collect();
        assert_eq!(
            drawn,
            vec![
                Paint::Flat(colors[2]),
                Paint::Flat(colors[1]),
                Paint::Flat(colors[0])
            ]
        );
    }

    #[test]
    fn behind_camera_is_culled() {
        let mut rig = Rig::new();
        rig.world
            .spawn_static(
                IVec3::new(0, -48, -400),
                IVec3::ZERO,
                Some(flat(DrawPriority::Neutral, Rgb::NEUTRAL)),
                &rig.gte,
            )
            .unwrap();
        let stats = rig.frame();
        assert_eq!(stats.culled, 1);
        assert_eq!(stats.drawn, 0);
    }

    #[test]
    fn absent_faces_are_skipped() {
        let mut rig = Rig::new();
        let r = Renderable::new(
            facing_quad(),
            PolySides::Quad,
            1,
            DrawPriority::Neutral,
            Surface::Textured(vec![None]),
        )
        .unwrap();
        rig.world
            .spawn_static(IVec3::new(0, -48, 100), IVec3::ZERO, Some(r), &rig.gte)
            .unwrap();
        assert_eq!(rig.frame(), FrameStats::default());
    }

    #[test]
    fn tiled_surface_draws_every_tile() {
        let mut rig = Rig::new();
        let r = Renderable::new(
            facing_quad(),
            PolySides::Quad,
            3,
            DrawPriority::Neutral,
            Surface::TiledTextured {
                face: face(),
                tile_span: 20,
            },
        )
        .unwrap();
        rig.world
            .spawn_static(IVec3::new(-20, -48, 200), IVec3::ZERO, Some(r), &rig.gte)
            .unwrap();
        let stats = rig.frame();
        assert_eq!(stats.submitted, 3);
        let mut xs: Vec<i32> = rig.recorder.frame().iter().map(|p| p.points()[0].x).collect();
        xs.sort_unstable();
        xs.dedup();
        assert_eq!(xs.len(), 3);
    }

    #[test]
    fn subdivided_cells_carry_their_own_uvs() {
        let mut rig = Rig::new();
        let panel = Mesh::new(
            vec![
                IVec3::new(0, -20, 0),
                IVec3::new(20, -20, 0),
                IVec3::new(20, 0, 0),
                IVec3::new(0, 0, 0),
            ],
            vec![0, 1, 2, 3],
        );
        let r = Renderable::new(
            panel,
            PolySides::Quad,
            4,
            DrawPriority::Neutral,
            Surface::Subdivided {
                face: face(),
                repeats: 1,
                subdivs: 2,
            },
        )
        .unwrap();
        rig.world
            .spawn_static(IVec3::new(-10, -38, 200), IVec3::ZERO, Some(r), &rig.gte)
            .unwrap();
        let stats = rig.frame();
        assert_eq!(stats.submitted, 4);
        let mut corners: Vec<(u8, u8)> = rig
            .recorder
            .frame()
            .iter()
            .filter_map(|p| match p.paint {
                Paint::Textured { uv, .. } => Some((uv.u, uv.v)),
                Paint::Flat(_) => None,
            })
            .collect();
        corners.sort_unstable();
        assert_eq!(corners, vec![(0, 0), (0, 64), (32, 0), (32, 64)]);
    }

    #[test]
    fn presenter_calls_follow_frame_order() {
        let mut rig = Rig::new();
        rig.frame();
        assert_eq!(
            rig.presenter.calls(),
            &[
                PresentCall::DrawSync,
                PresentCall::VSync,
                PresentCall::Swap(1),
                PresentCall::Overlay
            ]
        );
    }

    #[test]
    fn table_is_rebuilt_each_frame() {
        let mut rig = Rig::new();
        rig.world
            .spawn_static(
                IVec3::new(0, -48, 100),
                IVec3::ZERO,
                Some(flat(DrawPriority::Neutral, Rgb::NEUTRAL)),
                &rig.gte,
            )
            .unwrap();
        rig.frame();
        rig.frame();
        assert_eq!(rig.table.len(), 1);
    }

    #[test]
    fn overlay_reports_actor_state() {
        let mut rig = Rig::new();
        let stats = rig.frame();
        let text = overlay_text(&rig.world, &stats);
        assert!(text.starts_with("tick=1 entities=1"));
        assert!(text.contains("PP: 0, 0, 0"));
        assert!(text.contains("grounded=true"));
    }
}
