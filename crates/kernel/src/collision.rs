//! Actor versus static solid resolution.
//!
//! All overlap tests run in grid space; corrections are computed and applied
//! in Q12. Smaller Y is higher: a box's top face has the smaller Y.

use glam::IVec3;
use lowpoly_common::EntityId;
use lowpoly_gte::{ONE, to_grid};

/// Static solid as seen by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolidBox {
    pub entity: EntityId,
    /// Q12 position of the solid's reference corner.
    pub position: IVec3,
    /// Extents in grid units. The box rises `size.y` above the corner.
    pub size: IVec3,
}

impl SolidBox {
    fn grid_origin(&self) -> IVec3 {
        lowpoly_gte::grid_vec(self.position)
    }

    /// Grid Y of the top face.
    pub fn top(&self) -> i32 {
        self.grid_origin().y - self.size.y
    }

    fn is_degenerate(&self) -> bool {
        self.size.cmple(IVec3::ZERO).any()
    }
}

/// Actor collision body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Body {
    pub half_width: i32,
    pub height: i32,
}

/// Grid-space actor box. `bottom` is the reference Y, `top` is `height` above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ActorBox {
    min_x: i32,
    max_x: i32,
    bottom: i32,
    top: i32,
    min_z: i32,
    max_z: i32,
}

impl ActorBox {
    fn at(body: &Body, position: IVec3) -> Self {
        let x = to_grid(position.x);
        let y = to_grid(position.y);
        let z = to_grid(position.z);
        Self {
            min_x: x - body.half_width,
            max_x: x + body.half_width,
            bottom: y,
            top: y - body.height,
            min_z: z - body.half_width,
            max_z: z + body.half_width,
        }
    }
}

/// Per-axis open-interval overlap of an actor box against one solid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Overlap {
    pub x: bool,
    pub y: bool,
    pub z: bool,
}

impl Overlap {
    pub fn full(self) -> bool {
        self.x && self.y && self.z
    }

    pub fn footprint(self) -> bool {
        self.x && self.z
    }
}

fn overlap(actor: &ActorBox, solid: &SolidBox) -> Overlap {
    if solid.is_degenerate() {
        return Overlap::default();
    }
    let t = solid.grid_origin();
    Overlap {
        x: actor.min_x < t.x + solid.size.x && actor.max_x > t.x,
        y: actor.bottom > t.y - solid.size.y && actor.top < t.y,
        z: actor.min_z < t.z + solid.size.z && actor.max_z > t.z,
    }
}

/// True when an actor at `position` would not be inside any solid.
pub fn is_unobstructed(body: &Body, position: IVec3, solids: &[SolidBox]) -> bool {
    let actor_box = ActorBox::at(body, position);
    !solids.iter().any(|s| overlap(&actor_box, s).full())
}

/// Actor state entering the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Motion {
    /// Q12 position before this tick's move.
    pub position: IVec3,
    /// Q12 displacement for this tick.
    pub velocity: IVec3,
    /// Grounded verdict from the previous tick.
    pub grounded: bool,
}

/// Outcome of one resolver pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub position: IVec3,
    pub velocity: IVec3,
    pub on_collision: bool,
    pub stepped: bool,
    /// Number of bleed corrections applied.
    pub corrections: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
    Z,
}

/// Signed correction: the near-face candidate is negated, the far-face
/// candidate kept. Equal candidates resolve toward the near face.
fn pick(near: i32, far: i32) -> i32 {
    if near <= far { -near } else { far }
}

fn bleed(body: &Body, at: IVec3, solid: &SolidBox) -> (Axis, i32) {
    let hw = body.half_width * ONE;
    let s = solid.position;
    let size = solid.size * ONE;

    let x = pick(((at.x + hw) - s.x).abs(), ((at.x - hw) - (s.x + size.x)).abs());
    let y = pick(((s.y - size.y) - at.y).abs(), (s.y - (at.y - body.height * ONE)).abs());
    let z = pick(((at.z + hw) - s.z).abs(), ((at.z - hw) - (s.z + size.z)).abs());

    let mut best = (Axis::X, x);
    for candidate in [(Axis::Y, y), (Axis::Z, z)] {
        if candidate.1.abs() < best.1.abs() {
            best = candidate;
        }
    }
    best
}

/// Move the actor by its velocity and push it out of every solid it enters.
///
/// Solids are visited in slice order. The overlap box is taken once from the
/// tentative position; corrections accumulate into the committed position.
/// At most one ledge step happens per call.
pub fn resolve(body: &Body, motion: Motion, solids: &[SolidBox], step_limit: i32) -> Resolution {
    let tentative = motion.position + motion.velocity;
    let actor_box = ActorBox::at(body, tentative);

    let mut out = Resolution {
        position: tentative,
        velocity: motion.velocity,
        on_collision: false,
        stepped: false,
        corrections: 0,
    };

    for solid in solids {
        let hit = overlap(&actor_box, solid);
        if !hit.footprint() {
            continue;
        }

        if !hit.y {
            if actor_box.bottom == solid.top() && out.velocity.y == 0 {
                out.on_collision = true;
            }
            continue;
        }

        if out.velocity.y == 0 && motion.grounded && !out.stepped {
            let step_height = actor_box.bottom - solid.top();
            if step_height > 0 && step_height <= step_limit {
                let snapped = solid.position.y - solid.size.y * ONE;
                let candidate = IVec3::new(out.position.x, snapped, out.position.z);
                if is_unobstructed(body, candidate, solids) {
                    tracing::trace!(solid = %solid.entity, step_height, "ledge step");
                    out.position.y = snapped;
                    out.on_collision = true;
                    out.stepped = true;
                    continue;
                }
            }
        }

        let (axis, amount) = bleed(body, out.position, solid);
        tracing::trace!(solid = %solid.entity, ?axis, amount, "bleed correction");
        out.corrections += 1;
        match axis {
            Axis::X => {
                out.position.x += amount;
                out.velocity.x = 0;
            }
            Axis::Y => {
                out.position.y += amount;
                out.velocity.y = 0;
                if amount < 0 {
                    out.on_collision = true;
                }
            }
            Axis::Z => {
                out.position.z += amount;
                out.velocity.z = 0;
            }
        }
    }

    out
}
