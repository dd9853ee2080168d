#![allow(dead_code)]

pub mod components;
pub mod resources;
pub mod systems;

use bracket_geometry::prelude::PointF;
use bracket_terminal::prelude::{RGB, WHITE};
use specs::prelude::{
    Builder, Dispatcher, DispatcherBuilder, Entity, Join, World as SpecsWorld, WorldExt,
};

use crate::{
    config::Tunables,
    engine::{BodyKind, EntityId, EntitySpec, PhysicsHost, Tag},
    world::{GROUND_THICKNESS, PlatformPlan, ground_top},
};

use self::{
    components::{
        BodyRef, ChaseIntent, Chest, Extent, PlatformTag, PlayerTag, Position, Pursuer, Renderable,
    },
    resources::PursuitContext,
    systems::ChaseSystem,
};

const PLAYER_SIZE: PointF = PointF { x: 40.0, y: 60.0 };
const MONSTER_SIZE: PointF = PointF { x: 32.0, y: 32.0 };
const CHEST_SIZE: PointF = PointF { x: 24.0, y: 24.0 };

/// What the player's body ran into, resolved from a host contact.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchTarget {
    Monster(Entity),
    Chest(Entity),
}

/// Facade over the specs world: owns the dispatcher, links every game
/// entity to its physics body, and is the only place that talks to the
/// host on behalf of generated content.
pub struct EcsWorld {
    specs_world: SpecsWorld,
    dispatcher: Dispatcher<'static, 'static>,
    player: Entity,
    player_body: EntityId,
}

impl EcsWorld {
    pub fn new(host: &mut dyn PhysicsHost, cfg: &Tunables) -> Self {
        let mut specs_world = SpecsWorld::new();
        Self::register_components(&mut specs_world);
        specs_world.insert(PursuitContext::default());

        let spawn = PointF::new(cfg.view_width * 0.1, ground_top(cfg) - 200.0);
        let player_body = host.spawn(EntitySpec {
            pos: spawn,
            size: PLAYER_SIZE,
            kind: BodyKind::Dynamic,
            tag: Tag::Player,
        });
        let player = specs_world
            .create_entity()
            .with(BodyRef(player_body))
            .with(Position { point: spawn })
            .with(Renderable {
                glyph: b'@' as u16,
                color: RGB::named(WHITE),
                order: 2,
            })
            .with(PlayerTag)
            .build();

        let dispatcher = DispatcherBuilder::new()
            .with(ChaseSystem::default(), "chase", &[])
            .build();

        Self {
            specs_world,
            dispatcher,
            player,
            player_body,
        }
    }

    fn register_components(world: &mut SpecsWorld) {
        world.register::<BodyRef>();
        world.register::<Position>();
        world.register::<Renderable>();
        world.register::<Extent>();
        world.register::<PlayerTag>();
        world.register::<PlatformTag>();
        world.register::<Pursuer>();
        world.register::<Chest>();
        world.register::<ChaseIntent>();
    }

    pub fn player_entity(&self) -> Entity {
        self.player
    }

    pub fn player_body(&self) -> EntityId {
        self.player_body
    }

    pub fn player_point(&self) -> PointF {
        let positions = self.specs_world.read_component::<Position>();
        positions
            .get(self.player)
            .map(|pos| pos.point)
            .unwrap_or(PointF::new(0.0, 0.0))
    }

    pub fn spawn_ground(&mut self, host: &mut dyn PhysicsHost, cfg: &Tunables) {
        let pos = PointF::new(cfg.view_width / 2.0, ground_top(cfg) + GROUND_THICKNESS / 2.0);
        let body = host.spawn(EntitySpec {
            pos,
            size: PointF::new(cfg.view_width, GROUND_THICKNESS),
            kind: BodyKind::Static,
            tag: Tag::Ground,
        });
        self.specs_world
            .create_entity()
            .with(BodyRef(body))
            .with(Position { point: pos })
            .with(Extent {
                width: cfg.view_width,
                height: GROUND_THICKNESS,
            })
            .with(Renderable {
                glyph: b'#' as u16,
                color: RGB::from_u8(80, 60, 40),
                order: 0,
            })
            .build();
    }

    /// Applies one generation plan: the platform itself plus any monster or
    /// chest it rolled. Returns true when a chest was placed so the caller
    /// can mark it pending.
    pub fn apply_plan(
        &mut self,
        host: &mut dyn PhysicsHost,
        plan: &PlatformPlan,
        cfg: &Tunables,
    ) -> bool {
        let pos = PointF::new(plan.x, plan.y);
        let body = host.spawn(EntitySpec {
            pos,
            size: PointF::new(plan.width, cfg.platform_height),
            kind: BodyKind::Static,
            tag: Tag::Platform,
        });
        self.specs_world
            .create_entity()
            .with(BodyRef(body))
            .with(Position { point: pos })
            .with(Extent {
                width: plan.width,
                height: cfg.platform_height,
            })
            .with(Renderable {
                glyph: b'=' as u16,
                color: RGB::from_u8(100, 200, 100),
                order: 0,
            })
            .with(PlatformTag)
            .build();

        let surface = plan.y - cfg.platform_height / 2.0;
        if plan.monster {
            self.spawn_monster(host, PointF::new(plan.x, surface - MONSTER_SIZE.y / 2.0));
        }
        if plan.chest {
            self.spawn_chest(host, PointF::new(plan.x, surface - CHEST_SIZE.y / 2.0));
        }
        plan.chest
    }

    fn spawn_monster(&mut self, host: &mut dyn PhysicsHost, pos: PointF) {
        let body = host.spawn(EntitySpec {
            pos,
            size: MONSTER_SIZE,
            kind: BodyKind::Static,
            tag: Tag::Monster,
        });
        self.specs_world
            .create_entity()
            .with(BodyRef(body))
            .with(Position { point: pos })
            .with(Renderable {
                glyph: b'M' as u16,
                color: RGB::from_u8(220, 90, 90),
                order: 1,
            })
            .with(Pursuer {
                initial_y: pos.y,
                alive: true,
            })
            .build();
    }

    fn spawn_chest(&mut self, host: &mut dyn PhysicsHost, pos: PointF) {
        let body = host.spawn(EntitySpec {
            pos,
            size: CHEST_SIZE,
            kind: BodyKind::Static,
            tag: Tag::Chest,
        });
        self.specs_world
            .create_entity()
            .with(BodyRef(body))
            .with(Position { point: pos })
            .with(Renderable {
                glyph: b'$' as u16,
                color: RGB::from_u8(240, 200, 60),
                order: 1,
            })
            .with(Chest { collected: false })
            .build();
    }

    /// Pulls current body positions into the mirror components and flags
    /// pursuers whose body no longer exists.
    pub fn sync_positions(&mut self, host: &dyn PhysicsHost) {
        let bodies = self.specs_world.read_component::<BodyRef>();
        let mut positions = self.specs_world.write_component::<Position>();
        let mut pursuers = self.specs_world.write_component::<Pursuer>();
        let entities = self.specs_world.entities();
        for (entity, body) in (&entities, &bodies).join() {
            match host.position(body.0) {
                Some(point) => {
                    if let Some(pos) = positions.get_mut(entity) {
                        pos.point = point;
                    }
                }
                None => {
                    if let Some(pursuer) = pursuers.get_mut(entity) {
                        pursuer.alive = false;
                    }
                }
            }
        }
    }

    /// Runs the pursuit decision pass, then applies the intents: each living
    /// pursuer is placed at its stepped x with y pinned to its platform.
    pub fn advance(&mut self, host: &mut dyn PhysicsHost, player_x: f32, step: f32) {
        self.specs_world.insert(PursuitContext {
            player_x,
            step,
            ..PursuitContext::default()
        });
        self.dispatcher.dispatch(&mut self.specs_world);
        self.specs_world.maintain();

        let entities = self.specs_world.entities();
        let bodies = self.specs_world.read_component::<BodyRef>();
        let pursuers = self.specs_world.read_component::<Pursuer>();
        let mut intents = self.specs_world.write_component::<ChaseIntent>();
        let mut moved = Vec::new();
        for (entity, body, pursuer) in (&entities, &bodies, &pursuers).join() {
            if !pursuer.alive || !host.exists(body.0) {
                continue;
            }
            let Some(pos) = host.position(body.0) else {
                continue;
            };
            let dx = intents.get(entity).map(|intent| intent.dx).unwrap_or(0.0);
            host.set_position(body.0, PointF::new(pos.x + dx, pursuer.initial_y));
            moved.push(entity);
        }
        for entity in moved {
            intents.remove(entity);
        }
    }

    /// Resolves a host body id to the game entity the player touched.
    pub fn target_of(&self, id: EntityId) -> Option<TouchTarget> {
        let entities = self.specs_world.entities();
        let bodies = self.specs_world.read_component::<BodyRef>();
        let pursuers = self.specs_world.read_component::<Pursuer>();
        let chests = self.specs_world.read_component::<Chest>();
        for (entity, body) in (&entities, &bodies).join() {
            if body.0 != id {
                continue;
            }
            if let Some(pursuer) = pursuers.get(entity) {
                return pursuer.alive.then_some(TouchTarget::Monster(entity));
            }
            if chests.get(entity).is_some() {
                return Some(TouchTarget::Chest(entity));
            }
        }
        None
    }

    /// Collects a chest: guards against double-collection within the same
    /// frame, then removes body and entity. Returns false if it was already
    /// gone.
    pub fn collect_chest(&mut self, host: &mut dyn PhysicsHost, entity: Entity) -> bool {
        {
            let mut chests = self.specs_world.write_component::<Chest>();
            match chests.get_mut(entity) {
                Some(chest) if !chest.collected => chest.collected = true,
                _ => return false,
            }
        }
        let body = {
            let bodies = self.specs_world.read_component::<BodyRef>();
            bodies.get(entity).map(|body| body.0)
        };
        if let Some(body) = body {
            if host.exists(body) {
                host.destroy(body);
            }
        }
        let _ = self.specs_world.entities().delete(entity);
        self.specs_world.maintain();
        true
    }

    /// Bounded retention: generated content far enough below the camera is
    /// destroyed, host body first. The player and the ground stay.
    pub fn cull_below(&mut self, host: &mut dyn PhysicsHost, cutoff_y: f32) {
        let victims: Vec<(Entity, EntityId)> = {
            let entities = self.specs_world.entities();
            let bodies = self.specs_world.read_component::<BodyRef>();
            let positions = self.specs_world.read_component::<Position>();
            let platforms = self.specs_world.read_component::<PlatformTag>();
            let pursuers = self.specs_world.read_component::<Pursuer>();
            let chests = self.specs_world.read_component::<Chest>();
            (&entities, &bodies, &positions)
                .join()
                .filter(|(entity, _, pos)| {
                    pos.point.y > cutoff_y
                        && (platforms.contains(*entity)
                            || pursuers.contains(*entity)
                            || chests.contains(*entity))
                })
                .map(|(entity, body, _)| (entity, body.0))
                .collect()
        };
        for (entity, body) in victims {
            if host.exists(body) {
                host.destroy(body);
            }
            let _ = self.specs_world.entities().delete(entity);
        }
        self.specs_world.maintain();
    }

    pub fn each_renderable<F>(&self, mut f: F)
    where
        F: FnMut(PointF, &Renderable),
    {
        let positions = self.specs_world.read_component::<Position>();
        let renderables = self.specs_world.read_component::<Renderable>();
        let extents = self.specs_world.read_component::<Extent>();
        let entities = self.specs_world.entities();
        for (entity, pos, renderable) in (&entities, &positions, &renderables).join() {
            if extents.contains(entity) {
                continue;
            }
            f(pos.point, renderable);
        }
    }

    pub fn each_surface<F>(&self, mut f: F)
    where
        F: FnMut(PointF, &Extent, &Renderable),
    {
        let positions = self.specs_world.read_component::<Position>();
        let renderables = self.specs_world.read_component::<Renderable>();
        let extents = self.specs_world.read_component::<Extent>();
        for (pos, extent, renderable) in (&positions, &extents, &renderables).join() {
            f(pos.point, extent, renderable);
        }
    }

    pub fn pursuer_count(&self) -> usize {
        let pursuers = self.specs_world.read_component::<Pursuer>();
        (&pursuers).join().filter(|pursuer| pursuer.alive).count()
    }

    pub fn chest_count(&self) -> usize {
        let chests = self.specs_world.read_component::<Chest>();
        (&chests).join().filter(|chest| !chest.collected).count()
    }

    pub fn platform_count(&self) -> usize {
        let platforms = self.specs_world.read_component::<PlatformTag>();
        (&platforms).join().count()
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::sim::SimHost;

    use super::*;

    fn plan(x: f32, y: f32, monster: bool, chest: bool) -> PlatformPlan {
        PlatformPlan {
            x,
            y,
            width: 120.0,
            monster,
            chest,
        }
    }

    fn setup() -> (SimHost, EcsWorld, Tunables) {
        let cfg = Tunables::default();
        let mut host = SimHost::new(cfg.gravity);
        let mut ecs = EcsWorld::new(&mut host, &cfg);
        ecs.spawn_ground(&mut host, &cfg);
        (host, ecs, cfg)
    }

    #[test]
    fn applying_a_plan_creates_platform_monster_and_chest() {
        let (mut host, mut ecs, cfg) = setup();
        let spawned_chest = ecs.apply_plan(&mut host, &plan(400.0, 300.0, true, true), &cfg);
        assert!(spawned_chest);
        assert_eq!(ecs.platform_count(), 1);
        assert_eq!(ecs.pursuer_count(), 1);
        assert_eq!(ecs.chest_count(), 1);
    }

    #[test]
    fn pursuit_steps_and_pins_to_platform_height() {
        let (mut host, mut ecs, cfg) = setup();
        ecs.apply_plan(&mut host, &plan(100.0, 300.0, true, false), &cfg);
        let monster_y = 300.0 - cfg.platform_height / 2.0 - 16.0;
        // Knock the monster off its anchor; the apply step must re-pin it.
        let monster_body = {
            let mut found = None;
            let bodies = ecs.specs_world.read_component::<BodyRef>();
            let pursuers = ecs.specs_world.read_component::<Pursuer>();
            for (body, _) in (&bodies, &pursuers).join() {
                found = Some(body.0);
            }
            found.unwrap()
        };
        host.set_position(monster_body, PointF::new(100.0, monster_y + 9.0));
        ecs.sync_positions(&host);
        ecs.advance(&mut host, 500.0, 2.0);
        ecs.sync_positions(&host);
        let mut seen = None;
        ecs.each_renderable(|point, renderable| {
            if renderable.glyph == b'M' as u16 {
                seen = Some(point);
            }
        });
        let point = seen.expect("monster should render");
        assert_eq!(point.x, 102.0);
        assert_eq!(point.y, monster_y);
    }

    #[test]
    fn chest_collection_is_single_shot() {
        let (mut host, mut ecs, cfg) = setup();
        ecs.apply_plan(&mut host, &plan(400.0, 300.0, false, true), &cfg);
        let chest_body = {
            let mut found = None;
            let bodies = ecs.specs_world.read_component::<BodyRef>();
            let chests = ecs.specs_world.read_component::<Chest>();
            for (body, _) in (&bodies, &chests).join() {
                found = Some(body.0);
            }
            found.unwrap()
        };
        let target = ecs.target_of(chest_body);
        let Some(TouchTarget::Chest(entity)) = target else {
            panic!("expected chest target");
        };
        assert!(ecs.collect_chest(&mut host, entity));
        assert!(!host.exists(chest_body));
        assert_eq!(ecs.chest_count(), 0);
        assert!(!ecs.collect_chest(&mut host, entity));
    }

    #[test]
    fn culling_drops_entities_below_the_cutoff() {
        let (mut host, mut ecs, cfg) = setup();
        ecs.apply_plan(&mut host, &plan(400.0, 900.0, true, false), &cfg);
        ecs.apply_plan(&mut host, &plan(400.0, 100.0, false, false), &cfg);
        ecs.sync_positions(&host);
        ecs.cull_below(&mut host, 500.0);
        assert_eq!(ecs.platform_count(), 1);
        assert_eq!(ecs.pursuer_count(), 0);
    }
}
