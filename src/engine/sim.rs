use std::collections::HashSet;

use bracket_geometry::prelude::PointF;
use smallvec::SmallVec;

use super::{BodyKind, Contact, EntitySpec, EntityId, PhysicsHost, Tag};

// Falling bodies land when their bottom edge crosses a surface top between
// two steps; the tolerance absorbs float drift when resting.
const LAND_TOLERANCE: f32 = 0.1;

struct Body {
    pos: PointF,
    half: PointF,
    vel_y: f32,
    pending: PointF,
    kind: BodyKind,
    tag: Tag,
    grounded: bool,
}

struct Slot {
    generation: u32,
    body: Option<Body>,
}

/// Reference implementation of the physics collaborator: fixed-step gravity,
/// one-way axis-aligned platform landing, overlap-begin reporting, camera
/// focus. The game core only ever sees it as a `PhysicsHost`.
pub struct SimHost {
    slots: Vec<Slot>,
    gravity: f32,
    camera: PointF,
    overlaps: HashSet<(EntityId, EntityId)>,
}

impl SimHost {
    pub fn new(gravity: f32) -> Self {
        Self {
            slots: Vec::new(),
            gravity,
            camera: PointF::new(0.0, 0.0),
            overlaps: HashSet::new(),
        }
    }

    fn body(&self, id: EntityId) -> Option<&Body> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.body.as_ref())
    }

    fn body_mut(&mut self, id: EntityId) -> Option<&mut Body> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.body.as_mut())
    }

    fn pair_key(a: EntityId, b: EntityId) -> (EntityId, EntityId) {
        if a.index <= b.index { (a, b) } else { (b, a) }
    }

    fn overlapping(a: &Body, b: &Body) -> bool {
        (a.pos.x - b.pos.x).abs() < a.half.x + b.half.x
            && (a.pos.y - b.pos.y).abs() < a.half.y + b.half.y
    }
}

impl PhysicsHost for SimHost {
    fn spawn(&mut self, spec: EntitySpec) -> EntityId {
        let body = Body {
            pos: spec.pos,
            half: PointF::new(spec.size.x / 2.0, spec.size.y / 2.0),
            vel_y: 0.0,
            pending: PointF::new(0.0, 0.0),
            kind: spec.kind,
            tag: spec.tag,
            grounded: false,
        };
        if let Some(index) = self.slots.iter().position(|slot| slot.body.is_none()) {
            let slot = &mut self.slots[index];
            slot.generation = slot.generation.wrapping_add(1);
            slot.body = Some(body);
            EntityId {
                index: index as u32,
                generation: slot.generation,
            }
        } else {
            self.slots.push(Slot {
                generation: 0,
                body: Some(body),
            });
            EntityId {
                index: (self.slots.len() - 1) as u32,
                generation: 0,
            }
        }
    }

    fn exists(&self, id: EntityId) -> bool {
        self.body(id).is_some()
    }

    fn destroy(&mut self, id: EntityId) {
        if let Some(slot) = self
            .slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
        {
            slot.body = None;
        }
        self.overlaps.retain(|(a, b)| *a != id && *b != id);
    }

    fn position(&self, id: EntityId) -> Option<PointF> {
        self.body(id).map(|body| body.pos)
    }

    fn set_position(&mut self, id: EntityId, pos: PointF) {
        if let Some(body) = self.body_mut(id) {
            body.pos = pos;
        }
    }

    fn move_by(&mut self, id: EntityId, dx: f32, dy: f32) {
        if let Some(body) = self.body_mut(id) {
            body.pending.x += dx;
            body.pending.y += dy;
        }
    }

    fn jump(&mut self, id: EntityId, impulse: f32) {
        if let Some(body) = self.body_mut(id) {
            body.vel_y = -impulse;
            body.grounded = false;
        }
    }

    fn grounded(&self, id: EntityId) -> bool {
        self.body(id).map(|body| body.grounded).unwrap_or(false)
    }

    fn freeze(&mut self, id: EntityId) {
        if let Some(body) = self.body_mut(id) {
            body.kind = BodyKind::Static;
            body.vel_y = 0.0;
            body.pending = PointF::new(0.0, 0.0);
        }
    }

    fn set_camera(&mut self, focus: PointF) {
        self.camera = focus;
    }

    fn camera(&self) -> PointF {
        self.camera
    }

    fn step(&mut self, dt: f32) -> Vec<Contact> {
        // Surface snapshot: (center x, half width, top edge).
        let surfaces: Vec<(f32, f32, f32)> = self
            .slots
            .iter()
            .filter_map(|slot| slot.body.as_ref())
            .filter(|body| body.tag.is_surface())
            .map(|body| (body.pos.x, body.half.x, body.pos.y - body.half.y))
            .collect();

        let movers: SmallVec<[usize; 8]> = self
            .slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| {
                slot.body
                    .as_ref()
                    .map(|body| body.kind == BodyKind::Dynamic)
                    .unwrap_or(false)
            })
            .map(|(index, _)| index)
            .collect();

        for index in movers {
            let Some(body) = self.slots[index].body.as_mut() else {
                continue;
            };
            body.vel_y += self.gravity * dt;
            let prev_bottom = body.pos.y + body.half.y;
            body.pos.x += body.pending.x;
            body.pos.y += body.pending.y;
            body.pending = PointF::new(0.0, 0.0);
            body.pos.y += body.vel_y * dt;
            body.grounded = false;

            if body.vel_y >= 0.0 {
                let bottom = body.pos.y + body.half.y;
                for &(sx, shalf, top) in &surfaces {
                    let x_overlap = (body.pos.x - sx).abs() < body.half.x + shalf;
                    if x_overlap && prev_bottom <= top + LAND_TOLERANCE && bottom >= top {
                        body.pos.y = top - body.half.y;
                        body.vel_y = 0.0;
                        body.grounded = true;
                        break;
                    }
                }
            }
        }

        // Overlap-begin detection between non-surface bodies.
        let mut current = HashSet::new();
        let mut contacts = Vec::new();
        for (ai, a_slot) in self.slots.iter().enumerate() {
            let Some(a) = a_slot.body.as_ref() else {
                continue;
            };
            if a.kind != BodyKind::Dynamic || a.tag.is_surface() {
                continue;
            }
            let a_id = EntityId {
                index: ai as u32,
                generation: a_slot.generation,
            };
            for (bi, b_slot) in self.slots.iter().enumerate() {
                if bi == ai {
                    continue;
                }
                let Some(b) = b_slot.body.as_ref() else {
                    continue;
                };
                if b.tag.is_surface() || !Self::overlapping(a, b) {
                    continue;
                }
                let b_id = EntityId {
                    index: bi as u32,
                    generation: b_slot.generation,
                };
                let key = Self::pair_key(a_id, b_id);
                if current.insert(key) && !self.overlaps.contains(&key) {
                    contacts.push(Contact {
                        a: key.0,
                        a_tag: if key.0 == a_id { a.tag } else { b.tag },
                        b: key.1,
                        b_tag: if key.1 == b_id { b.tag } else { a.tag },
                    });
                }
            }
        }
        self.overlaps = current;
        contacts
    }
}
