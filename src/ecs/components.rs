use bracket_geometry::prelude::PointF;
use bracket_terminal::prelude::RGB;
use specs::prelude::{Component, NullStorage, VecStorage};

use crate::engine::EntityId;

/// Link from a game entity to its physics body.
#[derive(Clone, Copy, Debug)]
pub struct BodyRef(pub EntityId);

impl Component for BodyRef {
    type Storage = VecStorage<Self>;
}

/// Frame-local mirror of the body's position, synced from the host before
/// systems run so pure decision code never touches the physics seam.
#[derive(Clone, Copy, Debug)]
pub struct Position {
    pub point: PointF,
}

impl Component for Position {
    type Storage = VecStorage<Self>;
}

#[derive(Clone, Debug)]
pub struct Renderable {
    pub glyph: u16,
    pub color: RGB,
    pub order: i32,
}

impl Component for Renderable {
    type Storage = VecStorage<Self>;
}

/// Body extents, for entities drawn wider than one glyph.
#[derive(Clone, Copy, Debug)]
pub struct Extent {
    pub width: f32,
    pub height: f32,
}

impl Component for Extent {
    type Storage = VecStorage<Self>;
}

#[derive(Default)]
pub struct PlayerTag;

impl Component for PlayerTag {
    type Storage = NullStorage<Self>;
}

#[derive(Default)]
pub struct PlatformTag;

impl Component for PlatformTag {
    type Storage = NullStorage<Self>;
}

/// A monster bound to its platform: pursues on x, pinned to `initial_y`.
#[derive(Clone, Copy, Debug)]
pub struct Pursuer {
    pub initial_y: f32,
    pub alive: bool,
}

impl Component for Pursuer {
    type Storage = VecStorage<Self>;
}

#[derive(Clone, Copy, Debug)]
pub struct Chest {
    pub collected: bool,
}

impl Component for Chest {
    type Storage = VecStorage<Self>;
}

/// Horizontal step a pursuer decided on this frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct ChaseIntent {
    pub dx: f32,
}

impl Component for ChaseIntent {
    type Storage = VecStorage<Self>;
}
