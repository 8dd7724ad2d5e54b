//! Component model for the lowpoly world.
//!
//! Components are stored in BTreeMap keyed by [`EntityId`], so iteration
//! follows creation order.
//!
//! # Invariants
//! - Mesh buffers are immutable once built and shared through `Arc`.
//! - A [`Renderable`] is validated at construction: every primitive it can
//!   produce references vertices that exist.

use glam::IVec3;
use lowpoly_assets::{TextureHandle, TextureWindow, UvRect};
use lowpoly_common::{DrawPriority, EntityId, Rgb};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Shared, read-only vertex and index buffers (grid units).
#[derive(Debug, Clone)]
pub struct Mesh {
    vertices: Arc<[IVec3]>,
    indices: Arc<[u16]>,
}

impl Mesh {
    pub fn new(vertices: impl Into<Arc<[IVec3]>>, indices: impl Into<Arc<[u16]>>) -> Self {
        Self {
            vertices: vertices.into(),
            indices: indices.into(),
        }
    }

    pub fn vertices(&self) -> &[IVec3] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    /// True when both meshes point at the same buffers.
    pub fn shares_buffers(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.vertices, &other.vertices) && Arc::ptr_eq(&self.indices, &other.indices)
    }
}

/// Vertices per primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolySides {
    Tri,
    Quad,
}

impl PolySides {
    pub fn count(self) -> usize {
        match self {
            Self::Tri => 3,
            Self::Quad => 4,
        }
    }
}

/// Texture reference for one textured primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TexturedFace {
    pub texture: TextureHandle,
    pub uv: UvRect,
    pub window: Option<TextureWindow>,
}

impl TexturedFace {
    pub fn new(texture: TextureHandle, uv: UvRect) -> Self {
        Self {
            texture,
            uv,
            window: None,
        }
    }

    /// Repeat `window` across the primitive instead of stretching `uv`.
    pub fn with_window(mut self, window: TextureWindow) -> Self {
        self.window = Some(window);
        self
    }
}

/// How a renderable's primitives are painted.
#[derive(Debug, Clone, PartialEq)]
pub enum Surface {
    /// One flat colour per primitive.
    Flat(Vec<Rgb>),
    /// One optional face per primitive; `None` faces are never drawn.
    Textured(Vec<Option<TexturedFace>>),
    /// The first primitive repeated `count` times, each copy shifted along X
    /// by `tile_span` grid units.
    TiledTextured { face: TexturedFace, tile_span: i32 },
    /// `repeats` copies of the first primitive side by side along X, each cut
    /// into `subdivs` x `subdivs` cells. The first primitive must be a quad
    /// in the XY plane (a wall rising from Y = 0) or the XZ plane (a floor
    /// starting at Z = 0). Cell UVs step across `face.uv` and wrap back to
    /// its origin.
    Subdivided {
        face: TexturedFace,
        repeats: u8,
        subdivs: u8,
    },
}

impl Surface {
    /// Same textured face on every primitive.
    pub fn uniform(face: TexturedFace, count: usize) -> Self {
        Self::Textured(vec![Some(face); count])
    }
}

/// Errors from building a renderable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderableError {
    #[error("index buffer holds {len} indices, {needed} needed")]
    IndexBufferTooShort { needed: usize, len: usize },
    #[error("index {index} is out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u16, vertex_count: usize },
    #[error("surface describes {got} primitives, renderable has {expected}")]
    SurfaceMismatch { expected: usize, got: usize },
    #[error("repeating {count} primitives {span} units apart leaves the coordinate range")]
    SpanOverflow { span: i32, count: usize },
    #[error("subdivided surface needs at least one subdivision")]
    NoSubdivisions,
    #[error("subdivided surface needs an axis-aligned quad in the XY or XZ plane")]
    UnsupportedPanel,
}

/// Vertices of one primitive, gathered from the index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimitiveVertices {
    vertices: [IVec3; 4],
    sides: usize,
}

impl PrimitiveVertices {
    pub fn as_slice(&self) -> &[IVec3] {
        &self.vertices[..self.sides]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PanelPlane {
    Wall,
    Floor,
}

/// Cell layout of a [`Surface::Subdivided`] renderable, fixed at construction.
#[derive(Debug, Clone)]
struct CellGrid {
    plane: PanelPlane,
    columns: usize,
    subdivs: i32,
    /// Extent of one cell on each axis.
    cell: IVec3,
    uvs: Arc<[UvRect]>,
}

impl CellGrid {
    fn new(
        panel: &[IVec3],
        sides: PolySides,
        uv: UvRect,
        repeats: u8,
        subdivs: u8,
    ) -> Result<Self, RenderableError> {
        if subdivs == 0 {
            return Err(RenderableError::NoSubdivisions);
        }
        if sides != PolySides::Quad {
            return Err(RenderableError::UnsupportedPanel);
        }
        let (min, max) = panel
            .iter()
            .fold((IVec3::MAX, IVec3::MIN), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
        let extent = |lo: i32, hi: i32| hi.checked_sub(lo).ok_or(RenderableError::UnsupportedPanel);
        let size = IVec3::new(
            extent(min.x, max.x)?,
            extent(min.y, max.y)?,
            extent(min.z, max.z)?,
        );
        let plane = match (size.x > 0, size.y, size.z) {
            (true, h, 0) if h > 0 => PanelPlane::Wall,
            (true, 0, d) if d > 0 => PanelPlane::Floor,
            _ => return Err(RenderableError::UnsupportedPanel),
        };

        let d = i32::from(subdivs);
        let cell = size / d;
        let columns = usize::from(repeats) * usize::from(subdivs);
        let overflow = RenderableError::SpanOverflow {
            span: cell.x,
            count: columns,
        };
        let last = i32::try_from(columns.saturating_sub(1)).map_err(|_| overflow.clone())?;
        let reach = cell.x.checked_mul(last).ok_or(overflow.clone())?;
        if panel.iter().any(|v| (v.x / d).checked_add(reach).is_none()) {
            return Err(overflow);
        }

        Ok(Self {
            plane,
            columns,
            subdivs: d,
            cell,
            uvs: cell_uvs(uv, columns, subdivs).into(),
        })
    }

    /// Where panel vertex `v` lands for cell `index`. Rows run from the far
    /// edge (top of a wall, back of a floor) toward the origin.
    fn place(&self, v: IVec3, index: usize) -> Option<IVec3> {
        let col = i32::try_from(index % self.columns).ok()?;
        let row = i32::try_from(index / self.columns).ok()?;
        let near = self.subdivs - 1 - row;
        let x = (v.x / self.subdivs).checked_add(self.cell.x.checked_mul(col)?)?;
        Some(match self.plane {
            PanelPlane::Wall => {
                let y = if v.y == 0 { near } else { near + 1 };
                IVec3::new(x, -self.cell.y * y, v.z)
            }
            PanelPlane::Floor => {
                let z = if v.z == 0 { near } else { near + 1 };
                IVec3::new(x, v.y, self.cell.z * z)
            }
        })
    }
}

/// UV rectangle of every cell, row by row.
fn cell_uvs(uv: UvRect, columns: usize, subdivs: u8) -> Vec<UvRect> {
    if subdivs <= 1 {
        return vec![uv; columns];
    }
    let (du, dv) = (uv.w / subdivs, uv.h / subdivs);
    let mut out = Vec::with_capacity(columns * usize::from(subdivs));
    let mut v = uv.v;
    for _ in 0..subdivs {
        let mut u = uv.u;
        for _ in 0..columns {
            out.push(UvRect::new(u, v, du, dv));
            u = step_uv(u, du, uv.u, uv.w);
        }
        v = step_uv(v, dv, uv.v, uv.h);
    }
    out
}

/// Advance one cell, wrapping to `origin` once the step reaches the end of
/// the rectangle or runs off the texture page.
fn step_uv(at: u8, step: u8, origin: u8, extent: u8) -> u8 {
    let next = u16::from(at) + u16::from(step);
    if next - u16::from(origin) >= u16::from(extent) || next > 256 {
        origin
    } else {
        u8::try_from(next).unwrap_or(u8::MAX)
    }
}

/// Renderable component: mesh reference, primitive layout, priority, surface.
#[derive(Debug, Clone)]
pub struct Renderable {
    mesh: Mesh,
    sides: PolySides,
    primitive_count: usize,
    pub priority: DrawPriority,
    surface: Surface,
    grid: Option<CellGrid>,
}

impl Renderable {
    pub fn new(
        mesh: Mesh,
        sides: PolySides,
        primitive_count: usize,
        priority: DrawPriority,
        surface: Surface,
    ) -> Result<Self, RenderableError> {
        let n = sides.count();
        let needed = match surface {
            Surface::TiledTextured { .. } | Surface::Subdivided { .. } => n,
            _ => n * primitive_count,
        };
        let indices = mesh.indices();
        if indices.len() < needed {
            return Err(RenderableError::IndexBufferTooShort {
                needed,
                len: indices.len(),
            });
        }
        let vertex_count = mesh.vertices().len();
        if let Some(&index) = indices[..needed]
            .iter()
            .find(|&&i| usize::from(i) >= vertex_count)
        {
            return Err(RenderableError::IndexOutOfRange {
                index,
                vertex_count,
            });
        }
        let described = match &surface {
            Surface::Flat(colors) => colors.len(),
            Surface::Textured(faces) => faces.len(),
            Surface::TiledTextured { .. } => primitive_count,
            Surface::Subdivided {
                repeats, subdivs, ..
            } => usize::from(*repeats) * usize::from(*subdivs) * usize::from(*subdivs),
        };
        if described != primitive_count {
            return Err(RenderableError::SurfaceMismatch {
                expected: primitive_count,
                got: described,
            });
        }

        let panel: Vec<IVec3> = indices[..n.min(needed)]
            .iter()
            .map(|&i| mesh.vertices()[usize::from(i)])
            .collect();
        let grid = match &surface {
            Surface::TiledTextured { tile_span, .. } => {
                check_tiles(&panel, *tile_span, primitive_count)?;
                None
            }
            Surface::Subdivided {
                face,
                repeats,
                subdivs,
            } => Some(CellGrid::new(&panel, sides, face.uv, *repeats, *subdivs)?),
            _ => None,
        };

        Ok(Self {
            mesh,
            sides,
            primitive_count,
            priority,
            surface,
            grid,
        })
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn sides(&self) -> PolySides {
        self.sides
    }

    pub fn primitive_count(&self) -> usize {
        self.primitive_count
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Texture rectangle of cell `index` on a subdivided surface.
    pub fn cell_uv(&self, index: usize) -> Option<UvRect> {
        self.grid.as_ref()?.uvs.get(index).copied()
    }

    fn first_primitive(&self) -> impl Iterator<Item = IVec3> + '_ {
        self.mesh.indices()[..self.sides.count()]
            .iter()
            .map(|&i| self.mesh.vertices()[usize::from(i)])
    }

    /// Gather the vertices of primitive `index`.
    pub fn primitive_vertices(&self, index: usize) -> Option<PrimitiveVertices> {
        if index >= self.primitive_count {
            return None;
        }
        let n = self.sides.count();
        let mut vertices = [IVec3::ZERO; 4];
        match (&self.surface, &self.grid) {
            (Surface::TiledTextured { tile_span, .. }, _) => {
                let shift = tile_span.checked_mul(i32::try_from(index).ok()?)?;
                for (slot, v) in vertices.iter_mut().zip(self.first_primitive()) {
                    *slot = IVec3::new(v.x.checked_add(shift)?, v.y, v.z);
                }
            }
            (Surface::Subdivided { .. }, Some(grid)) => {
                for (slot, v) in vertices.iter_mut().zip(self.first_primitive()) {
                    *slot = grid.place(v, index)?;
                }
            }
            _ => {
                let start = index * n;
                let corners = self.mesh.indices().get(start..start + n)?;
                for (slot, &i) in vertices.iter_mut().zip(corners) {
                    *slot = self.mesh.vertices()[usize::from(i)];
                }
            }
        }
        Some(PrimitiveVertices { vertices, sides: n })
    }
}

/// Reject tile spans whose last copy would leave the `i32` range.
fn check_tiles(panel: &[IVec3], tile_span: i32, count: usize) -> Result<(), RenderableError> {
    let overflow = RenderableError::SpanOverflow {
        span: tile_span,
        count,
    };
    let last = i32::try_from(count.saturating_sub(1)).map_err(|_| overflow.clone())?;
    let reach = tile_span.checked_mul(last).ok_or(overflow.clone())?;
    if panel.iter().any(|v| v.x.checked_add(reach).is_none()) {
        return Err(overflow);
    }
    Ok(())
}

/// Collision volume attached to an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Collider {
    /// Moving body: centred on X/Z, hanging `height` units above the
    /// reference point (smaller Y is higher).
    Body { half_width: i32, height: i32 },
    /// Static solid spanning `[t.x, t.x + size.x]`, `[t.y - size.y, t.y]` and
    /// `[t.z, t.z + size.z]` around its grid translation `t`.
    Solid { size: IVec3 },
}

impl Collider {
    /// Solid sized by the far corner of a box mesh whose origin sits at the
    /// near bottom corner (the corner's Y is negative, pointing up).
    pub fn solid_from_corner(corner: IVec3) -> Self {
        Self::Solid {
            size: IVec3::new(corner.x, -corner.y, corner.z),
        }
    }
}

/// Component storage for all component types, keyed by entity.
#[derive(Debug, Clone, Default)]
pub struct ComponentStore {
    renderables: BTreeMap<EntityId, Renderable>,
    colliders: BTreeMap<EntityId, Collider>,
}

impl ComponentStore {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Renderable ---
    pub fn set_renderable(&mut self, entity: EntityId, renderable: Renderable) {
        tracing::trace!(%entity, primitives = renderable.primitive_count(), "renderable attached");
        self.renderables.insert(entity, renderable);
    }

    pub fn get_renderable(&self, entity: EntityId) -> Option<&Renderable> {
        self.renderables.get(&entity)
    }

    pub fn renderables(&self) -> &BTreeMap<EntityId, Renderable> {
        &self.renderables
    }

    // --- Collider ---
    pub fn set_collider(&mut self, entity: EntityId, collider: Collider) {
        self.colliders.insert(entity, collider);
    }

    pub fn get_collider(&self, entity: EntityId) -> Option<&Collider> {
        self.colliders.get(&entity)
    }

    /// Static solids in creation order.
    pub fn solids(&self) -> impl Iterator<Item = (EntityId, IVec3)> + '_ {
        self.colliders.iter().filter_map(|(id, c)| match c {
            Collider::Solid { size } => Some((*id, *size)),
            Collider::Body { .. } => None,
        })
    }
}

pub fn crate_info() -> &'static str {
    "lowpoly-ecs v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_mesh() -> Mesh {
        Mesh::new(
            vec![
                IVec3::new(0, -128, 0),
                IVec3::new(64, -128, 0),
                IVec3::new(64, 0, 0),
                IVec3::new(0, 0, 0),
            ],
            vec![0, 1, 2, 3],
        )
    }

    fn face() -> TexturedFace {
        TexturedFace::new(TextureHandle::default(), UvRect::new(0, 0, 64, 128))
    }

    #[test]
    fn meshes_share_buffers_when_cloned() {
        let a = quad_mesh();
        let b = a.clone();
        assert!(a.shares_buffers(&b));
        assert!(!a.shares_buffers(&quad_mesh()));
    }

    #[test]
    fn flat_renderable_gathers_vertices() {
        let r = Renderable::new(
            quad_mesh(),
            PolySides::Quad,
            1,
            DrawPriority::Neutral,
            Surface::Flat(vec![Rgb::NEUTRAL]),
        )
        .unwrap();
        let v = r.primitive_vertices(0).unwrap();
        assert_eq!(v.as_slice().len(), 4);
        assert_eq!(v.as_slice()[1], IVec3::new(64, -128, 0));
        assert!(r.primitive_vertices(1).is_none());
    }

    #[test]
    fn tiled_surface_shifts_each_copy() {
        let r = Renderable::new(
            quad_mesh(),
            PolySides::Quad,
            5,
            DrawPriority::Neutral,
            Surface::TiledTextured {
                face: face(),
                tile_span: 64,
            },
        )
        .unwrap();
        let third = r.primitive_vertices(2).unwrap();
        assert_eq!(third.as_slice()[0], IVec3::new(128, -128, 0));
        assert_eq!(third.as_slice()[2], IVec3::new(192, 0, 0));
    }

    #[test]
    fn tile_span_past_the_coordinate_range_is_rejected() {
        let tiled = |count| {
            Renderable::new(
                quad_mesh(),
                PolySides::Quad,
                count,
                DrawPriority::Neutral,
                Surface::TiledTextured {
                    face: face(),
                    tile_span: 1 << 20,
                },
            )
        };
        assert_eq!(
            tiled(4096).unwrap_err(),
            RenderableError::SpanOverflow {
                span: 1 << 20,
                count: 4096
            }
        );

        let r = tiled(2000).unwrap();
        let last = r.primitive_vertices(1999).unwrap();
        assert_eq!(last.as_slice()[1].x, 64 + 1999 * (1 << 20));
    }

    fn subdivided(mesh: Mesh, face: TexturedFace, repeats: u8, subdivs: u8) -> Renderable {
        Renderable::new(
            mesh,
            PolySides::Quad,
            usize::from(repeats) * usize::from(subdivs).pow(2),
            DrawPriority::Neutral,
            Surface::Subdivided {
                face,
                repeats,
                subdivs,
            },
        )
        .unwrap()
    }

    fn floor_mesh() -> Mesh {
        Mesh::new(
            vec![
                IVec3::new(0, 0, 128),
                IVec3::new(128, 0, 128),
                IVec3::new(128, 0, 0),
                IVec3::new(0, 0, 0),
            ],
            vec![0, 1, 2, 3],
        )
    }

    #[test]
    fn subdivided_wall_cells_start_at_the_top_row() {
        let r = subdivided(quad_mesh(), face(), 6, 2);
        assert_eq!(r.primitive_count(), 24);

        let top_left = r.primitive_vertices(0).unwrap();
        assert_eq!(
            top_left.as_slice(),
            &[
                IVec3::new(0, -128, 0),
                IVec3::new(32, -128, 0),
                IVec3::new(32, -64, 0),
                IVec3::new(0, -64, 0),
            ]
        );

        let bottom = r.primitive_vertices(13).unwrap();
        assert_eq!(bottom.as_slice()[0], IVec3::new(32, -64, 0));
        assert_eq!(bottom.as_slice()[2], IVec3::new(64, 0, 0));

        let last = r.primitive_vertices(23).unwrap();
        assert_eq!(last.as_slice()[2], IVec3::new(384, 0, 0));
        assert!(r.primitive_vertices(24).is_none());
    }

    #[test]
    fn subdivided_cell_uvs_wrap_to_the_rect_origin() {
        let wall = subdivided(quad_mesh(), face(), 6, 2);
        assert_eq!(wall.cell_uv(0), Some(UvRect::new(0, 0, 32, 64)));
        assert_eq!(wall.cell_uv(1), Some(UvRect::new(32, 0, 32, 64)));
        assert_eq!(wall.cell_uv(2), Some(UvRect::new(0, 0, 32, 64)));
        assert_eq!(wall.cell_uv(12), Some(UvRect::new(0, 64, 32, 64)));

        let cobble = TexturedFace::new(TextureHandle::default(), UvRect::new(0, 127, 128, 128));
        let floor = subdivided(floor_mesh(), cobble, 3, 2);
        let row: Vec<u8> = (0..6).filter_map(|i| floor.cell_uv(i)).map(|uv| uv.u).collect();
        assert_eq!(row, vec![0, 64, 0, 64, 0, 64]);
        assert_eq!(floor.cell_uv(0).map(|uv| uv.v), Some(127));
        assert_eq!(floor.cell_uv(6).map(|uv| uv.v), Some(191));

        let cell = floor.primitive_vertices(0).unwrap();
        assert_eq!(cell.as_slice()[0], IVec3::new(0, 0, 128));
        assert_eq!(cell.as_slice()[2], IVec3::new(64, 0, 64));
    }

    #[test]
    fn single_subdivision_keeps_the_whole_rect() {
        let r = subdivided(quad_mesh(), face(), 3, 1);
        assert_eq!(r.cell_uv(2), Some(face().uv));
        assert_eq!(r.primitive_vertices(1).unwrap().as_slice()[0], IVec3::new(64, -128, 0));
    }

    #[test]
    fn subdivided_panel_must_be_a_flat_quad() {
        let tilted = Mesh::new(
            vec![
                IVec3::new(0, 0, 0),
                IVec3::new(10, 0, 0),
                IVec3::new(10, 10, 10),
                IVec3::new(0, 10, 10),
            ],
            vec![0, 1, 2, 3],
        );
        let surface = Surface::Subdivided {
            face: face(),
            repeats: 1,
            subdivs: 2,
        };
        let err = Renderable::new(tilted, PolySides::Quad, 4, DrawPriority::Neutral, surface)
            .unwrap_err();
        assert_eq!(err, RenderableError::UnsupportedPanel);

        let none = Surface::Subdivided {
            face: face(),
            repeats: 4,
            subdivs: 0,
        };
        let err = Renderable::new(quad_mesh(), PolySides::Quad, 0, DrawPriority::Neutral, none)
            .unwrap_err();
        assert_eq!(err, RenderableError::NoSubdivisions);
    }

    #[test]
    fn short_index_buffer_is_rejected() {
        let err = Renderable::new(
            quad_mesh(),
            PolySides::Quad,
            2,
            DrawPriority::Neutral,
            Surface::uniform(face(), 2),
        )
        .unwrap_err();
        assert_eq!(err, RenderableError::IndexBufferTooShort { needed: 8, len: 4 });
    }

    #[test]
    fn dangling_index_is_rejected() {
        let mesh = Mesh::new(vec![IVec3::ZERO; 3], vec![0, 1, 7]);
        let err = Renderable::new(
            mesh,
            PolySides::Tri,
            1,
            DrawPriority::Neutral,
            Surface::Flat(vec![Rgb::NEUTRAL]),
        )
        .unwrap_err();
        assert!(matches!(err, RenderableError::IndexOutOfRange { index: 7, .. }));
    }

    #[test]
    fn surface_must_cover_every_primitive() {
        let err = Renderable::new(
            quad_mesh(),
            PolySides::Quad,
            1,
            DrawPriority::Low,
            Surface::Flat(vec![]),
        )
        .unwrap_err();
        assert_eq!(err, RenderableError::SurfaceMismatch { expected: 1, got: 0 });
    }

    #[test]
    fn solid_from_corner_flips_height() {
        assert_eq!(
            Collider::solid_from_corner(IVec3::new(64, -128, 128)),
            Collider::Solid {
                size: IVec3::new(64, 128, 128)
            }
        );
    }

    #[test]
    fn solids_iterate_in_creation_order() {
        let mut store = ComponentStore::new();
        store.set_collider(EntityId(4), Collider::Solid { size: IVec3::ONE });
        store.set_collider(
            EntityId(0),
            Collider::Body {
                half_width: 20,
                height: 48,
            },
        );
        store.set_collider(EntityId(2), Collider::Solid { size: IVec3::splat(2) });
        let ids: Vec<EntityId> = store.solids().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![EntityId(2), EntityId(4)]);
    }
}
