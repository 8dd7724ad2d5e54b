//! The demo scene: player, spinning cube, platform, textured floors and
//! walls, tiled and subdivided panels, and six collision boxes to climb.

use glam::IVec3;
use lowpoly_assets::{AssetError, TextureResolver, UvRect};
use lowpoly_common::{DrawPriority, EntityId, Rgb};
use lowpoly_ecs::{Collider, Mesh, PolySides, Renderable, RenderableError, Surface, TexturedFace};
use lowpoly_gte::GeometryEngine;
use lowpoly_input::{Buttons, PadReport, ScriptedInput, Stick};
use lowpoly_kernel::{SetupError, World};

/// Built-in texture placement, used when no manifest is given.
pub const DEFAULT_TEXTURES: &str = r#"{ "textures": [
    { "name": "cobble", "depth": "indexed8", "pixels": [640, 0], "clut": [0, 480] },
    { "name": "wood_panel", "depth": "indexed8", "pixels": [704, 0], "clut": [0, 481] },
    { "name": "wood_door", "depth": "indexed8", "pixels": [768, 0], "clut": [0, 482] }
] }"#;

const DEPTH: i32 = 512;
const CUBE_HALF: i32 = 40;
const FLOOR_HALF: i32 = 64;
const FLOOR_SIZE: i32 = 128;
const LONG_FLOOR_LENGTH: i32 = 320;
const COL_BOX_HEIGHT: i32 = 12;
const COL_BOX_HALF_WIDTH: i32 = 32;
const WALL_HEIGHT: i32 = 128;
const WALL_HALF: i32 = 64;
const DOOR_HALF: i32 = 32;
const PLATFORM_HEIGHT: i32 = 16;
const SUBDIVS: u8 = 2;

/// Six faces of a box built by [`box_vertices`]: back, right, front, left, top, bottom.
const BOX_INDICES: [u16; 24] = [
    0, 1, 2, 3, 1, 5, 6, 2, 5, 4, 7, 6, 4, 0, 3, 7, 4, 5, 1, 0, 6, 7, 3, 2,
];
const BOTTOM_FACE: usize = 5;
/// The four side faces only.
const TUBE_FACES: usize = 4;
const FLOOR_INDICES: [u16; 4] = [0, 3, 2, 1];
const PANEL_INDICES: [u16; 4] = [0, 1, 2, 3];

const COBBLE_UV: UvRect = UvRect::new(0, 127, 128, 128);
const PANEL_UV: UvRect = UvRect::new(0, 0, 64, 128);
const DOOR_UV: UvRect = UvRect::new(63, 0, 64, 128);

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error(transparent)]
    Setup(#[from] SetupError),
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error(transparent)]
    Renderable(#[from] RenderableError),
}

/// Handles to the scene's notable entities.
#[derive(Debug, Clone)]
pub struct DemoScene {
    pub player: EntityId,
    pub cube: EntityId,
    pub solids: Vec<EntityId>,
}

/// Eight corners of an axis-aligned box, top face first (smaller Y is up).
fn box_vertices(min: IVec3, max: IVec3) -> Vec<IVec3> {
    vec![
        IVec3::new(min.x, min.y, min.z),
        IVec3::new(max.x, min.y, min.z),
        IVec3::new(max.x, max.y, min.z),
        IVec3::new(min.x, max.y, min.z),
        IVec3::new(min.x, min.y, max.z),
        IVec3::new(max.x, min.y, max.z),
        IVec3::new(max.x, max.y, max.z),
        IVec3::new(min.x, max.y, max.z),
    ]
}

fn box_mesh(min: IVec3, max: IVec3) -> Mesh {
    Mesh::new(box_vertices(min, max), BOX_INDICES.to_vec())
}

fn splitmix64(mut state: u64) -> u64 {
    state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Deterministic face colours for the flat-shaded boxes.
pub fn palette(seed: u64) -> [Rgb; 6] {
    let mut state = seed;
    std::array::from_fn(|_| {
        state = splitmix64(state);
        let [r, g, b, ..] = state.to_le_bytes();
        Rgb::new(r, g, b)
    })
}

struct Faces<'a, R: TextureResolver> {
    textures: &'a R,
}

impl<R: TextureResolver> Faces<'_, R> {
    fn face(&self, name: &str, uv: UvRect) -> Result<TexturedFace, AssetError> {
        Ok(TexturedFace::new(self.textures.resolve(name)?, uv))
    }

    fn repeating(&self, name: &str, uv: UvRect) -> Result<TexturedFace, AssetError> {
        Ok(self.face(name, uv)?.with_window(uv))
    }
}

/// Populate `world` with the demo scene.
pub fn build_demo(
    world: &mut World,
    textures: &impl TextureResolver,
    seed: u64,
    gte: &impl GeometryEngine,
) -> Result<DemoScene, SceneError> {
    let _span = tracing::info_span!("build_demo").entered();
    let colors = palette(seed).to_vec();
    let faces = Faces { textures };
    let actor = world.config().actor.clone();

    let player_mesh = box_mesh(
        IVec3::new(-actor.half_width, -actor.height, -actor.half_width),
        IVec3::new(actor.half_width, 0, actor.half_width),
    );
    let player = world.spawn_actor(
        IVec3::ZERO,
        Some(Renderable::new(
            player_mesh,
            PolySides::Quad,
            6,
            DrawPriority::Neutral,
            Surface::Flat(colors.clone()),
        )?),
        gte,
    )?;

    let col_platform = box_mesh(
        IVec3::new(-COL_BOX_HALF_WIDTH, -COL_BOX_HEIGHT, -COL_BOX_HALF_WIDTH),
        IVec3::new(COL_BOX_HALF_WIDTH, 0, COL_BOX_HALF_WIDTH),
    );
    world.spawn_static(
        IVec3::new(0, -24, DEPTH / 2),
        IVec3::ZERO,
        Some(Renderable::new(
            col_platform,
            PolySides::Quad,
            6,
            DrawPriority::Neutral,
            Surface::Flat(colors.clone()),
        )?),
        gte,
    )?;

    let cube_mesh = box_mesh(IVec3::splat(-CUBE_HALF), IVec3::splat(CUBE_HALF));
    let cube = world.spawn_dynamic(
        IVec3::new(0, -CUBE_HALF - 32, DEPTH),
        IVec3::ZERO,
        None,
        Some(Renderable::new(
            cube_mesh,
            PolySides::Quad,
            6,
            DrawPriority::Neutral,
            Surface::Flat(colors),
        )?),
        gte,
    )?;
    world.attach_spinner(cube, IVec3::new(0, 16, 16), true)?;

    let floor = Mesh::new(
        vec![
            IVec3::new(-FLOOR_HALF, 0, -FLOOR_HALF),
            IVec3::new(FLOOR_HALF, 0, -FLOOR_HALF),
            IVec3::new(FLOOR_HALF, 0, FLOOR_HALF),
            IVec3::new(-FLOOR_HALF, 0, FLOOR_HALF),
        ],
        FLOOR_INDICES.to_vec(),
    );
    world.spawn_static(
        IVec3::new(0, 0, DEPTH),
        IVec3::ZERO,
        Some(Renderable::new(
            floor,
            PolySides::Quad,
            1,
            DrawPriority::Low,
            Surface::uniform(faces.face("cobble", COBBLE_UV)?, 1),
        )?),
        gte,
    )?;

    let wall = box_mesh(
        IVec3::new(0, -WALL_HEIGHT, 0),
        IVec3::new(WALL_HALF * 2, 0, WALL_HALF),
    );
    let panel = faces.repeating("wood_panel", PANEL_UV)?;
    let door_mesh = box_mesh(
        IVec3::new(0, -WALL_HEIGHT, 0),
        IVec3::new(WALL_HALF, 0, WALL_HALF),
    );
    let walls = [
        (192, wall.clone(), TUBE_FACES, panel),
        (
            192 + WALL_HALF * 2,
            door_mesh,
            6,
            faces.face("wood_door", DOOR_UV)?,
        ),
        (192 + WALL_HALF * 2 + DOOR_HALF * 2, wall, TUBE_FACES, panel),
    ];
    for (x, mesh, count, face) in walls {
        world.spawn_static(
            IVec3::new(x, 0, 96),
            IVec3::ZERO,
            Some(Renderable::new(
                mesh,
                PolySides::Quad,
                count,
                DrawPriority::Neutral,
                Surface::uniform(face, count),
            )?),
            gte,
        )?;
    }

    let long_floor = Mesh::new(
        vec![
            IVec3::new(0, 0, 0),
            IVec3::new(LONG_FLOOR_LENGTH, 0, 0),
            IVec3::new(LONG_FLOOR_LENGTH, 0, FLOOR_SIZE),
            IVec3::new(0, 0, FLOOR_SIZE),
        ],
        FLOOR_INDICES.to_vec(),
    );
    world.spawn_static(
        IVec3::new(192, 0, -32),
        IVec3::ZERO,
        Some(Renderable::new(
            long_floor,
            PolySides::Quad,
            1,
            DrawPriority::Low,
            Surface::uniform(faces.repeating("cobble", COBBLE_UV)?, 1),
        )?),
        gte,
    )?;

    let tile = Mesh::new(
        vec![
            IVec3::new(0, -WALL_HEIGHT, 0),
            IVec3::new(WALL_HALF, -WALL_HEIGHT, 0),
            IVec3::new(WALL_HALF, 0, 0),
            IVec3::new(0, 0, 0),
        ],
        PANEL_INDICES.to_vec(),
    );
    world.spawn_static(
        IVec3::new(192 + WALL_HALF * 4 + DOOR_HALF * 3, 0, 96),
        IVec3::ZERO,
        Some(Renderable::new(
            tile,
            PolySides::Quad,
            5,
            DrawPriority::Neutral,
            Surface::TiledTextured {
                face: faces.face("wood_panel", PANEL_UV)?,
                tile_span: WALL_HALF,
            },
        )?),
        gte,
    )?;

    // Wall and floor panels cut into cells.
    let wall_panel = Mesh::new(
        vec![
            IVec3::new(0, -WALL_HEIGHT, 0),
            IVec3::new(WALL_HALF, -WALL_HEIGHT, 0),
            IVec3::new(WALL_HALF, 0, 0),
            IVec3::new(0, 0, 0),
        ],
        PANEL_INDICES.to_vec(),
    );
    let floor_panel = Mesh::new(
        vec![
            IVec3::new(0, 0, FLOOR_SIZE),
            IVec3::new(FLOOR_SIZE, 0, FLOOR_SIZE),
            IVec3::new(FLOOR_SIZE, 0, 0),
            IVec3::new(0, 0, 0),
        ],
        PANEL_INDICES.to_vec(),
    );
    let subdivided = [
        (IVec3::new(-320, 0, 96), wall_panel, "wood_panel", PANEL_UV, 6, DrawPriority::Neutral),
        (IVec3::new(-320, 0, -32), floor_panel, "cobble", COBBLE_UV, 3, DrawPriority::Low),
    ];
    for (position, mesh, texture, uv, repeats, priority) in subdivided {
        let count = usize::from(repeats) * usize::from(SUBDIVS) * usize::from(SUBDIVS);
        world.spawn_static(
            position,
            IVec3::ZERO,
            Some(Renderable::new(
                mesh,
                PolySides::Quad,
                count,
                priority,
                Surface::Subdivided {
                    face: faces.face(texture, uv)?,
                    repeats,
                    subdivs: SUBDIVS,
                },
            )?),
            gte,
        )?;
    }

    let cobble = faces.face("cobble", COBBLE_UV)?;
    let platform = box_mesh(
        IVec3::new(0, -PLATFORM_HEIGHT, 0),
        IVec3::new(WALL_HALF, 0, WALL_HALF),
    );
    let mut house_faces = vec![Some(panel); 6];
    house_faces[0] = Some(faces.face("wood_door", DOOR_UV)?);
    let boxes = [
        (
            IVec3::new(640, 0, -64),
            box_mesh(
                IVec3::new(0, -WALL_HEIGHT, 0),
                IVec3::new(WALL_HALF, 0, WALL_HALF * 2),
            ),
            house_faces,
        ),
        (
            IVec3::new(544, 0, -64),
            box_mesh(IVec3::new(0, -DOOR_HALF, 0), IVec3::new(DOOR_HALF, 0, DOOR_HALF)),
            vec![Some(cobble); 6],
        ),
        (
            IVec3::new(576, 0, -64),
            box_mesh(IVec3::new(0, -WALL_HALF, 0), IVec3::new(WALL_HALF, 0, WALL_HALF)),
            vec![Some(cobble); 6],
        ),
        (IVec3::new(784, -112, -64), platform.clone(), vec![Some(cobble); 6]),
        (IVec3::new(784, -72, -96), platform.clone(), vec![Some(cobble); 6]),
        (IVec3::new(784, -32, -128), platform, vec![Some(cobble); 6]),
    ];

    let mut solids = Vec::with_capacity(boxes.len());
    for (position, mesh, mut box_faces) in boxes {
        // Boxes standing on the floor never show their underside.
        if position.y == 0 {
            box_faces[BOTTOM_FACE] = None;
        }
        let Collider::Solid { size } = Collider::solid_from_corner(mesh.vertices()[5]) else {
            continue;
        };
        let renderable = Renderable::new(
            mesh,
            PolySides::Quad,
            6,
            DrawPriority::Neutral,
            Surface::Textured(box_faces),
        )?;
        solids.push(world.spawn_solid(position, size, Some(renderable), gte)?);
    }

    tracing::info!(
        entities = world.entity_count(),
        solids = solids.len(),
        "demo scene built"
    );
    Ok(DemoScene {
        player,
        cube,
        solids,
    })
}

/// Pad script for unattended runs: optionally hold the left stick forward,
/// and press jump on the last tick of every `jump_every` ticks.
pub fn demo_script(walk: bool, jump_every: Option<u32>) -> ScriptedInput {
    let period = jump_every.unwrap_or(1).max(1);
    let reports = (0..period)
        .map(|i| {
            let mut report = PadReport::idle();
            if walk {
                report = report.with_left(Stick::CENTRE, 0);
            }
            if jump_every.is_some() && i + 1 == period {
                report = report.with_buttons(Buttons::CROSS);
            }
            report
        })
        .collect();
    ScriptedInput::new(reports)
}
