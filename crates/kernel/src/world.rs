use glam::IVec3;
use lowpoly_common::{EntityId, Transform};
use lowpoly_ecs::{Collider, ComponentStore, Renderable};
use lowpoly_gte::{FixedMatrix, GeometryEngine, fixed_vec};
use lowpoly_input::Intent;
use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::collision::{self, Body, SolidBox};
use crate::config::SimConfig;
use crate::error::SetupError;
use crate::motion;

/// What an entity was spawned as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Static,
    Dynamic,
    Solid,
    Actor,
}

/// A record of something notable the world did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorldEvent {
    Spawned { id: EntityId, kind: EntityKind },
    /// Simulation advanced one tick.
    Stepped { tick: u64, grounded: bool },
    /// The actor climbed a ledge, landing at this Q12 height.
    LedgeStep { tick: u64, y: i32 },
    Jumped { tick: u64 },
    SpinToggled { tick: u64, active: bool },
    SpinnerReset { tick: u64 },
}

/// How an entity moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Motion {
    /// Never integrates and never rebuilds its matrix after creation.
    Static,
    Dynamic {
        /// Q12 units per tick.
        velocity: IVec3,
        max_speed: Option<i32>,
    },
}

/// Per-entity data stored in the world arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub transform: Transform,
    pub motion: Motion,
}

impl Entity {
    pub fn is_static(&self) -> bool {
        matches!(self.motion, Motion::Static)
    }

    pub fn velocity(&self) -> IVec3 {
        match self.motion {
            Motion::Static => IVec3::ZERO,
            Motion::Dynamic { velocity, .. } => velocity,
        }
    }
}

/// The player-controlled entity and its per-tick contact state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    entity: EntityId,
    grounded: bool,
    on_collision: bool,
    stepped: bool,
}

impl Actor {
    pub fn entity(&self) -> EntityId {
        self.entity
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn on_collision(&self) -> bool {
        self.on_collision
    }

    pub fn has_stepped(&self) -> bool {
        self.stepped
    }
}

/// Entity rotated every tick while active, with a pose it can snap back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Spinner {
    entity: EntityId,
    spin: IVec3,
    active: bool,
    home_position: IVec3,
    home_rotation: IVec3,
}

/// Summary of one simulation tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TickReport {
    pub tick: u64,
    pub grounded: bool,
    pub on_collision: bool,
    pub stepped: bool,
    pub jumped: bool,
    pub corrections: u32,
    /// Q12 actor position after the tick.
    pub actor_position: IVec3,
}

/// The world: entity arena, components, actor, camera.
///
/// Entities live for the life of the world and are indexed by [`EntityId`];
/// ids follow creation order, which is also collider iteration order.
#[derive(Debug, Clone)]
pub struct World {
    config: SimConfig,
    entities: Vec<Entity>,
    components: ComponentStore,
    /// Solid boxes gathered from the collider store at the start of each
    /// actor pass. Capacity is reserved at spawn.
    solid_boxes: Vec<SolidBox>,
    actor: Option<Actor>,
    camera: Camera,
    spinner: Option<Spinner>,
    tick: u64,
    event_log: Vec<WorldEvent>,
}

impl Default for World {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}

impl World {
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            entities: Vec::new(),
            components: ComponentStore::new(),
            solid_boxes: Vec::new(),
            actor: None,
            camera: Camera::default(),
            spinner: None,
            tick: 0,
            event_log: Vec::new(),
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.index())
    }

    pub fn components(&self) -> &ComponentStore {
        &self.components
    }

    pub fn actor(&self) -> Option<&Actor> {
        self.actor.as_ref()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[WorldEvent] {
        &self.event_log
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Every entity with a renderable, in creation order, with its local matrix.
    pub fn drawables(&self) -> impl Iterator<Item = (EntityId, &FixedMatrix, &Renderable)> + '_ {
        self.components.renderables().iter().filter_map(|(id, r)| {
            self.entities
                .get(id.index())
                .map(|e| (*id, e.transform.matrix(), r))
        })
    }

    fn push_entity(
        &mut self,
        entity: Entity,
        kind: EntityKind,
        renderable: Option<Renderable>,
    ) -> Result<EntityId, SetupError> {
        let raw = u32::try_from(self.entities.len()).map_err(|_| SetupError::TooManyEntities)?;
        self.entities.try_reserve(1)?;
        let id = EntityId(raw);
        self.entities.push(entity);
        if let Some(r) = renderable {
            self.components.set_renderable(id, r);
        }
        tracing::debug!(%id, ?kind, position = ?entity.transform.grid_position(), "spawned");
        self.event_log.push(WorldEvent::Spawned { id, kind });
        Ok(id)
    }

    /// Spawn an entity that never moves. `position` is in grid units.
    pub fn spawn_static(
        &mut self,
        position: IVec3,
        rotation: IVec3,
        renderable: Option<Renderable>,
        gte: &impl GeometryEngine,
    ) -> Result<EntityId, SetupError> {
        let entity = Entity {
            transform: Transform::new(fixed_vec(position), rotation, gte),
            motion: Motion::Static,
        };
        self.push_entity(entity, EntityKind::Static, renderable)
    }

    /// Spawn an entity that integrates its velocity every tick.
    pub fn spawn_dynamic(
        &mut self,
        position: IVec3,
        rotation: IVec3,
        max_speed: Option<i32>,
        renderable: Option<Renderable>,
        gte: &impl GeometryEngine,
    ) -> Result<EntityId, SetupError> {
        if let Some(limit) = max_speed.filter(|s| *s < 0) {
            return Err(SetupError::NegativeMaxSpeed(limit));
        }
        let entity = Entity {
            transform: Transform::new(fixed_vec(position), rotation, gte),
            motion: Motion::Dynamic {
                velocity: IVec3::ZERO,
                max_speed,
            },
        };
        self.push_entity(entity, EntityKind::Dynamic, renderable)
    }

    /// Spawn an axis-aligned static solid whose near bottom corner sits at
    /// `position` and which extends by `size` (Y extends upward).
    pub fn spawn_solid(
        &mut self,
        position: IVec3,
        size: IVec3,
        renderable: Option<Renderable>,
        gte: &impl GeometryEngine,
    ) -> Result<EntityId, SetupError> {
        if size.cmplt(IVec3::ZERO).any() {
            return Err(SetupError::NegativeExtents(size));
        }
        let wanted = self.components.solids().count() + 1;
        self.solid_boxes
            .try_reserve(wanted.saturating_sub(self.solid_boxes.len()))?;
        let entity = Entity {
            transform: Transform::new(fixed_vec(position), IVec3::ZERO, gte),
            motion: Motion::Static,
        };
        let id = self.push_entity(entity, EntityKind::Solid, renderable)?;
        self.components.set_collider(id, Collider::Solid { size });
        Ok(id)
    }

    /// Spawn the player actor with the configured body. Only one is allowed.
    pub fn spawn_actor(
        &mut self,
        position: IVec3,
        renderable: Option<Renderable>,
        gte: &impl GeometryEngine,
    ) -> Result<EntityId, SetupError> {
        if let Some(actor) = &self.actor {
            return Err(SetupError::ActorExists(actor.entity));
        }
        let cfg = &self.config.actor;
        if cfg.max_speed < 0 {
            return Err(SetupError::NegativeMaxSpeed(cfg.max_speed));
        }
        let body = Collider::Body {
            half_width: cfg.half_width,
            height: cfg.height,
        };
        let entity = Entity {
            transform: Transform::new(fixed_vec(position), IVec3::ZERO, gte),
            motion: Motion::Dynamic {
                velocity: IVec3::ZERO,
                max_speed: Some(cfg.max_speed),
            },
        };
        let id = self.push_entity(entity, EntityKind::Actor, renderable)?;
        self.components.set_collider(id, body);
        self.actor = Some(Actor {
            entity: id,
            grounded: true,
            on_collision: false,
            stepped: false,
        });
        self.camera.follow(entity.transform.position(), 0, &self.config.camera, gte);
        Ok(id)
    }

    /// Rotate `entity` by `spin` every tick while the spin toggle is on.
    /// Its current pose becomes the reset pose.
    pub fn attach_spinner(
        &mut self,
        entity: EntityId,
        spin: IVec3,
        active: bool,
    ) -> Result<(), SetupError> {
        let e = self
            .dynamic(entity)
            .ok_or(SetupError::UnknownEntity(entity))?;
        self.spinner = Some(Spinner {
            entity,
            spin,
            active,
            home_position: e.transform.position(),
            home_rotation: e.transform.rotation(),
        });
        Ok(())
    }

    pub fn is_spinning(&self) -> bool {
        self.spinner.is_some_and(|s| s.active)
    }

    fn dynamic(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.index()).filter(|e| !e.is_static())
    }

    fn dynamic_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id.index()).filter(|e| !e.is_static())
    }

    /// Move a dynamic entity (Q12). Static entities are left alone.
    pub fn set_position(&mut self, id: EntityId, position: IVec3) -> bool {
        self.dynamic_mut(id)
            .map(|e| e.transform.set_position(position))
            .is_some()
    }

    pub fn set_rotation(&mut self, id: EntityId, rotation: IVec3) -> bool {
        self.dynamic_mut(id)
            .map(|e| e.transform.set_rotation(rotation))
            .is_some()
    }

    /// Add to a dynamic entity's rotation; each axis wraps independently.
    pub fn rotate_by(&mut self, id: EntityId, delta: IVec3) -> bool {
        self.dynamic_mut(id)
            .map(|e| e.transform.rotate_by(delta))
            .is_some()
    }

    pub fn set_velocity(&mut self, id: EntityId, velocity: IVec3) -> bool {
        match self.dynamic_mut(id) {
            Some(Entity {
                motion: Motion::Dynamic { velocity: v, .. },
                ..
            }) => {
                *v = velocity;
                true
            }
            _ => false,
        }
    }

    /// Advance the simulation by one tick.
    ///
    /// `intent` is `None` when the input device had nothing valid this tick;
    /// the actor then keeps its velocity and the camera its rotation.
    pub fn step(&mut self, intent: Option<Intent>, gte: &impl GeometryEngine) -> TickReport {
        self.tick += 1;
        let _span = tracing::info_span!("tick", tick = self.tick).entered();

        if let Some(intent) = &intent {
            self.apply_intent(intent);
        }
        let jump = intent.is_some_and(|i| i.jump);
        self.gather_solids();
        let mut report = self.simulate_actor(jump);
        self.advance_spinner();
        self.integrate(gte);

        let followed = self
            .actor
            .and_then(|a| self.entities.get(a.entity.index()))
            .map(|e| e.transform);
        if let Some(t) = followed {
            self.camera
                .follow(t.position(), t.rotation().y, &self.config.camera, gte);
        }

        report.tick = self.tick;
        self.event_log.push(WorldEvent::Stepped {
            tick: self.tick,
            grounded: report.grounded,
        });
        tracing::trace!(?report, "tick done");
        report
    }

    fn apply_intent(&mut self, intent: &Intent) {
        if let Some(spinner) = self.spinner.as_mut() {
            if intent.reset {
                if let Some(e) = self.entities.get_mut(spinner.entity.index()) {
                    e.transform.set_position(spinner.home_position);
                    e.transform.set_rotation(spinner.home_rotation);
                }
                self.event_log
                    .push(WorldEvent::SpinnerReset { tick: self.tick });
            }
            if intent.toggle_spin {
                spinner.active = !spinner.active;
                tracing::debug!(active = spinner.active, "spin toggled");
                self.event_log.push(WorldEvent::SpinToggled {
                    tick: self.tick,
                    active: spinner.active,
                });
            }
        }

        if let Some(actor) = self.actor {
            let (vx, vz) = motion::steer(intent, self.camera.angles(), self.config.actor.move_scale);
            if let Some(Entity {
                motion: Motion::Dynamic { velocity, .. },
                ..
            }) = self.entities.get_mut(actor.entity.index())
            {
                velocity.x = vx;
                velocity.z = vz;
            }
        }
        self.camera.look(intent, self.config.camera.look_speed);
    }

    /// Rebuild the resolver's solid list from the collider store, in
    /// creation order.
    fn gather_solids(&mut self) {
        self.solid_boxes.clear();
        for (entity, size) in self.components.solids() {
            if let Some(e) = self.entities.get(entity.index()) {
                self.solid_boxes.push(SolidBox {
                    entity,
                    position: e.transform.position(),
                    size,
                });
            }
        }
    }

    fn simulate_actor(&mut self, jump: bool) -> TickReport {
        let Some(actor) = self.actor.as_mut() else {
            return TickReport::default();
        };
        let Some(&Collider::Body {
            half_width,
            height,
        }) = self.components.get_collider(actor.entity)
        else {
            return TickReport::default();
        };
        let body = Body { half_width, height };
        let Some(entity) = self.entities.get_mut(actor.entity.index()) else {
            return TickReport::default();
        };
        let Motion::Dynamic {
            velocity,
            max_speed,
        } = &mut entity.motion
        else {
            return TickReport::default();
        };

        let physics = &self.config.physics;
        let start = collision::Motion {
            position: entity.transform.position(),
            velocity: motion::displacement(*velocity, *max_speed, physics.speed_clamp),
            grounded: actor.grounded,
        };
        let resolved = collision::resolve(&body, start, &self.solid_boxes, physics.step_limit);

        let ground = motion::settle(
            resolved.position.y,
            resolved.velocity.y,
            resolved.on_collision,
            jump,
            physics,
        );
        let mut position = resolved.position;
        position.y = ground.position_y;
        entity.transform.set_position(position);
        *velocity = IVec3::new(resolved.velocity.x, ground.velocity_y, resolved.velocity.z);

        actor.on_collision = resolved.on_collision;
        actor.stepped = resolved.stepped;
        actor.grounded = ground.grounded;

        if resolved.stepped {
            self.event_log.push(WorldEvent::LedgeStep {
                tick: self.tick,
                y: resolved.position.y,
            });
        }
        if ground.jumped {
            self.event_log.push(WorldEvent::Jumped { tick: self.tick });
        }

        TickReport {
            tick: self.tick,
            grounded: ground.grounded,
            on_collision: resolved.on_collision,
            stepped: resolved.stepped,
            jumped: ground.jumped,
            corrections: resolved.corrections,
            actor_position: position,
        }
    }

    fn advance_spinner(&mut self) {
        let Some(spinner) = self.spinner.filter(|s| s.active) else {
            return;
        };
        if let Some(e) = self.entities.get_mut(spinner.entity.index()) {
            e.transform.rotate_by(spinner.spin);
        }
    }

    fn integrate(&mut self, gte: &impl GeometryEngine) {
        let actor = self.actor.map(|a| a.entity);
        let clamp = self.config.physics.speed_clamp;
        for (i, e) in self.entities.iter_mut().enumerate() {
            let Motion::Dynamic {
                velocity,
                max_speed,
            } = e.motion
            else {
                continue;
            };
            if actor.is_some_and(|a| a.index() == i) {
                e.transform.refresh(gte);
            } else {
                motion::integrate(&mut e.transform, velocity, max_speed, clamp, gte);
            }
        }
    }

    /// Deterministic hash of positions, rotations, velocities and the camera.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325; // FNV offset basis
        let mut mix = |v: IVec3| {
            for c in v.to_array() {
                for b in c.to_le_bytes() {
                    h ^= u64::from(b);
                    h = h.wrapping_mul(0x0100_0000_01b3);
                }
            }
        };
        mix(IVec3::new(self.tick as i32, (self.tick >> 32) as i32, 0));
        for e in &self.entities {
            mix(e.transform.position());
            mix(e.transform.rotation());
            mix(e.velocity());
        }
        mix(self.camera.position());
        mix(self.camera.rotation());
        h
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lowpoly_common::{DrawPriority, Rgb};
    use lowpoly_ecs::{Mesh, PolySides, Surface};
    use lowpoly_gte::{ONE, SoftGte};
    use lowpoly_input::AxisDir;

    fn tri() -> Renderable {
        Renderable::new(
            Mesh::new(vec![IVec3::ZERO, IVec3::X, IVec3::Y], vec![0, 1, 2]),
            PolySides::Tri,
            1,
            DrawPriority::Neutral,
            Surface::Flat(vec![Rgb::NEUTRAL]),
        )
        .unwrap()
    }

    #[test]
    fn world_starts_empty() {
        let w = World::default();
        assert_eq!(w.tick(), 0);
        assert_eq!(w.entity_count(), 0);
        assert!(w.actor().is_none());
    }

    #[test]
    fn ids_follow_creation_order() {
        let gte = SoftGte::default();
        let mut w = World::default();
        let a = w.spawn_static(IVec3::ZERO, IVec3::ZERO, None, &gte).unwrap();
        let b = w
            .spawn_solid(IVec3::new(10, 0, 0), IVec3::splat(8), Some(tri()), &gte)
            .unwrap();
        assert_eq!((a, b), (EntityId(0), EntityId(1)));
        assert_eq!(w.drawables().count(), 1);
        assert_eq!(w.events().len(), 2);
    }

    #[test]
    fn drained_events_leave_the_log_empty() {
        let gte = SoftGte::default();
        let mut w = World::default();
        let id = w.spawn_static(IVec3::ZERO, IVec3::ZERO, None, &gte).unwrap();
        w.step(None, &gte);
        let drained = w.drain_events();
        assert_eq!(drained.len(), 2);
        assert!(matches!(drained[0], WorldEvent::Spawned { id: got, .. } if got == id));
        assert!(matches!(drained[1], WorldEvent::Stepped { tick: 1, .. }));
        assert!(w.events().is_empty());

        w.step(None, &gte);
        assert_eq!(w.drain_events().len(), 1);
    }

    #[test]
    fn negative_extents_are_rejected() {
        let gte = SoftGte::default();
        let mut w = World::default();
        let err = w
            .spawn_solid(IVec3::ZERO, IVec3::new(4, -1, 4), None, &gte)
            .unwrap_err();
        assert!(matches!(err, SetupError::NegativeExtents(_)));
        assert_eq!(w.entity_count(), 0);
    }

    #[test]
    fn negative_max_speed_is_rejected() {
        let gte = SoftGte::default();
        let mut w = World::default();
        let err = w
            .spawn_dynamic(IVec3::ZERO, IVec3::ZERO, Some(-ONE), None, &gte)
            .unwrap_err();
        assert!(matches!(err, SetupError::NegativeMaxSpeed(v) if v == -ONE));

        let mut config = SimConfig::default();
        config.actor.max_speed = -5;
        let mut w = World::new(config);
        let err = w.spawn_actor(IVec3::ZERO, None, &gte).unwrap_err();
        assert!(matches!(err, SetupError::NegativeMaxSpeed(-5)));
        assert_eq!(w.entity_count(), 0);
    }

    #[test]
    fn resolver_reads_solids_from_the_collider_store() {
        let gte = SoftGte::default();
        let mut w = World::default();
        let actor = w.spawn_actor(IVec3::ZERO, None, &gte).unwrap();
        let wall = w
            .spawn_solid(IVec3::new(-50, 0, 24), IVec3::new(100, 128, 100), None, &gte)
            .unwrap();
        assert_eq!(
            w.components().get_collider(wall),
            Some(&Collider::Solid {
                size: IVec3::new(100, 128, 100)
            })
        );
        let walk = Intent {
            forward: AxisDir::Positive,
            ..Intent::default()
        };
        for _ in 0..4 {
            w.step(Some(walk), &gte);
        }
        // Face at z = 24, half width 20.
        assert_eq!(w.entity(actor).unwrap().transform.position().z, 4 * ONE);
        assert!(w.solid_boxes.iter().all(|b| b.entity == wall));
    }

    #[test]
    fn second_actor_is_rejected() {
        let gte = SoftGte::default();
        let mut w = World::default();
        let id = w.spawn_actor(IVec3::ZERO, None, &gte).unwrap();
        let err = w.spawn_actor(IVec3::ZERO, None, &gte).unwrap_err();
        assert!(matches!(err, SetupError::ActorExists(a) if a == id));
    }

    #[test]
    fn static_entities_ignore_scripted_moves() {
        let gte = SoftGte::default();
        let mut w = World::default();
        let id = w.spawn_static(IVec3::ZERO, IVec3::ZERO, None, &gte).unwrap();
        assert!(!w.set_position(id, IVec3::splat(ONE)));
        assert!(!w.set_velocity(id, IVec3::splat(ONE)));
        assert_eq!(w.entity(id).unwrap().transform.position(), IVec3::ZERO);
    }

    #[test]
    fn dynamic_entities_integrate_velocity() {
        let gte = SoftGte::default();
        let mut w = World::default();
        let id = w
            .spawn_dynamic(IVec3::new(0, -10, 0), IVec3::ZERO, None, None, &gte)
            .unwrap();
        w.set_velocity(id, IVec3::new(ONE, 0, -2 * ONE));
        w.step(None, &gte);
        w.step(None, &gte);
        let t = w.entity(id).unwrap().transform;
        assert_eq!(t.grid_position(), IVec3::new(2, -10, -4));
        assert_eq!(t.matrix().t, IVec3::new(2, -10, -4));
    }

    #[test]
    fn spinner_toggles_and_resets() {
        let gte = SoftGte::default();
        let mut w = World::default();
        let cube = w
            .spawn_dynamic(IVec3::new(0, -72, 512), IVec3::ZERO, None, None, &gte)
            .unwrap();
        w.attach_spinner(cube, IVec3::new(0, 16, 16), false).unwrap();

        let toggle = Intent {
            toggle_spin: true,
            ..Intent::default()
        };
        w.step(Some(toggle), &gte);
        w.step(Some(Intent::default()), &gte);
        assert!(w.is_spinning());
        assert_eq!(w.entity(cube).unwrap().transform.rotation(), IVec3::new(0, 32, 32));

        let reset = Intent {
            reset: true,
            ..Intent::default()
        };
        w.step(Some(reset), &gte);
        // Reset happens before this tick's spin.
        assert_eq!(w.entity(cube).unwrap().transform.rotation(), IVec3::new(0, 16, 16));
        assert_eq!(
            w.entity(cube).unwrap().transform.grid_position(),
            IVec3::new(0, -72, 512)
        );
    }

    #[test]
    fn spinner_needs_dynamic_entity() {
        let gte = SoftGte::default();
        let mut w = World::default();
        let id = w.spawn_static(IVec3::ZERO, IVec3::ZERO, None, &gte).unwrap();
        assert!(matches!(
            w.attach_spinner(id, IVec3::ONE, true),
            Err(SetupError::UnknownEntity(_))
        ));
    }

    #[test]
    fn missing_intent_keeps_velocity() {
        let gte = SoftGte::default();
        let mut w = World::default();
        let id = w.spawn_actor(IVec3::ZERO, None, &gte).unwrap();
        let walk = Intent {
            forward: AxisDir::Positive,
            ..Intent::default()
        };
        w.step(Some(walk), &gte);
        let before = w.entity(id).unwrap().velocity();
        assert_eq!(before, IVec3::new(0, 0, 4 * ONE));
        w.step(None, &gte);
        assert_eq!(w.entity(id).unwrap().velocity(), before);
        assert_eq!(w.entity(id).unwrap().transform.position().z, 8 * ONE);
    }

    #[test]
    fn camera_tracks_actor() {
        let gte = SoftGte::default();
        let mut w = World::default();
        w.spawn_actor(IVec3::new(100, 0, 0), None, &gte).unwrap();
        w.step(Some(Intent::default()), &gte);
        assert_eq!(
            w.camera().position(),
            IVec3::new(100 * ONE, -96 * ONE, -160 * ONE)
        );
    }

    #[test]
    fn hash_is_deterministic() {
        let gte = SoftGte::default();
        let build = || {
            let mut w = World::default();
            w.spawn_actor(IVec3::ZERO, None, &gte).unwrap();
            w.spawn_solid(IVec3::new(-50, 0, 40), IVec3::new(100, 16, 100), None, &gte)
                .unwrap();
            w
        };
        let (mut a, mut b) = (build(), build());
        let walk = Intent {
            forward: AxisDir::Positive,
            ..Intent::default()
        };
        for _ in 0..30 {
            a.step(Some(walk), &gte);
            b.step(Some(walk), &gte);
        }
        assert_eq!(a.state_hash(), b.state_hash());
        assert_ne!(a.state_hash(), build().state_hash());
    }
}
