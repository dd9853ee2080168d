pub mod sim;

use bracket_geometry::prelude::PointF;

/// Handle to a body owned by the physics host. Generational so that a stale
/// handle to a destroyed body can never address a recycled slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntityId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyKind {
    Static,
    Dynamic,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tag {
    Player,
    Ground,
    Platform,
    Monster,
    Chest,
}

impl Tag {
    /// Solid tags support a falling body; the rest only report overlaps.
    pub fn is_surface(self) -> bool {
        matches!(self, Tag::Ground | Tag::Platform)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct EntitySpec {
    pub pos: PointF,
    pub size: PointF,
    pub kind: BodyKind,
    pub tag: Tag,
}

/// One overlap-begin between two tagged bodies, reported exactly once per
/// overlap episode.
#[derive(Clone, Copy, Debug)]
pub struct Contact {
    pub a: EntityId,
    pub a_tag: Tag,
    pub b: EntityId,
    pub b_tag: Tag,
}

impl Contact {
    /// Orients the pair so callers can match on (player, other).
    pub fn involving(&self, tag: Tag) -> Option<(EntityId, EntityId, Tag)> {
        if self.a_tag == tag {
            Some((self.a, self.b, self.b_tag))
        } else if self.b_tag == tag {
            Some((self.b, self.a, self.a_tag))
        } else {
            None
        }
    }
}

/// The physics/camera collaborator the game core is built on. Everything the
/// core needs from the host environment goes through this seam; the core
/// never assumes a particular integrator or renderer behind it.
pub trait PhysicsHost {
    fn spawn(&mut self, spec: EntitySpec) -> EntityId;
    fn exists(&self, id: EntityId) -> bool;
    fn destroy(&mut self, id: EntityId);

    fn position(&self, id: EntityId) -> Option<PointF>;
    fn set_position(&mut self, id: EntityId, pos: PointF);
    /// Queue a relative displacement, applied during the next `step`.
    fn move_by(&mut self, id: EntityId, dx: f32, dy: f32);
    /// Apply an upward impulse. Unconditional; jump policy lives in the core.
    fn jump(&mut self, id: EntityId, impulse: f32);
    fn grounded(&self, id: EntityId) -> bool;
    /// Convert a dynamic body into an immovable one (terminal-phase freeze).
    fn freeze(&mut self, id: EntityId);

    fn set_camera(&mut self, focus: PointF);
    fn camera(&self) -> PointF;

    /// Advance the simulation one frame and report fresh overlap-begins.
    fn step(&mut self, dt: f32) -> Vec<Contact>;
}
