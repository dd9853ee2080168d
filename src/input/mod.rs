use std::collections::{HashMap, HashSet};

use bracket_geometry::prelude::PointF;
use smallvec::SmallVec;

/// Frame-local control vector. Recomputed from scratch every frame; nothing
/// here survives the tick that produced it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ControlState {
    pub move_left: bool,
    pub move_right: bool,
    pub jump_requested: bool,
}

/// Normalized touch-contact identifier, resolved once at the input boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ContactId(pub u32);

#[derive(Clone, Copy, Debug)]
pub struct TouchZone {
    pub center: PointF,
    pub radius: f32,
}

impl TouchZone {
    pub fn contains(&self, pos: PointF) -> bool {
        let dx = pos.x - self.center.x;
        let dy = pos.y - self.center.y;
        dx * dx + dy * dy <= self.radius * self.radius
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ZoneKind {
    Left,
    Right,
    Jump,
}

/// The three fixed circular hit-zones, in screen coordinates.
#[derive(Clone, Copy, Debug)]
pub struct ZoneLayout {
    pub left: TouchZone,
    pub right: TouchZone,
    pub jump: TouchZone,
}

impl Default for ZoneLayout {
    fn default() -> Self {
        Self {
            left: TouchZone {
                center: PointF::new(80.0, 520.0),
                radius: 60.0,
            },
            right: TouchZone {
                center: PointF::new(220.0, 520.0),
                radius: 60.0,
            },
            jump: TouchZone {
                center: PointF::new(700.0, 520.0),
                radius: 80.0,
            },
        }
    }
}

impl ZoneLayout {
    fn hits(&self, pos: PointF) -> SmallVec<[ZoneKind; 3]> {
        let mut hit = SmallVec::new();
        if self.left.contains(pos) {
            hit.push(ZoneKind::Left);
        }
        if self.right.contains(pos) {
            hit.push(ZoneKind::Right);
        }
        if self.jump.contains(pos) {
            hit.push(ZoneKind::Jump);
        }
        hit
    }
}

/// Folds keyboard state and live touch contacts into one `ControlState` per
/// frame. Movement zones are level-triggered from current contact positions;
/// the jump zone is edge-triggered once per contact lifecycle.
pub struct InputAggregator {
    zones: ZoneLayout,
    contacts: HashMap<ContactId, PointF>,
    jump_claimed: HashSet<ContactId>,
}

impl InputAggregator {
    pub fn new(zones: ZoneLayout) -> Self {
        Self {
            zones,
            contacts: HashMap::new(),
            jump_claimed: HashSet::new(),
        }
    }

    pub fn touch_started(&mut self, id: ContactId, pos: PointF) {
        self.contacts.insert(id, pos);
    }

    pub fn touch_moved(&mut self, id: ContactId, pos: PointF) {
        if let Some(entry) = self.contacts.get_mut(&id) {
            *entry = pos;
        }
    }

    pub fn touch_ended(&mut self, id: ContactId) {
        self.contacts.remove(&id);
        self.jump_claimed.remove(&id);
    }

    /// Keyboard flags come in already resolved (held left/right, a discrete
    /// jump edge); touch contributions are re-derived from current contact
    /// positions and ORed in. Each contact is independent, so iteration
    /// order over the map cannot change the result.
    pub fn resolve(&mut self, held_left: bool, held_right: bool, jump_edge: bool) -> ControlState {
        let mut control = ControlState {
            move_left: held_left,
            move_right: held_right,
            jump_requested: jump_edge,
        };
        for (&id, &pos) in &self.contacts {
            for kind in self.zones.hits(pos) {
                match kind {
                    ZoneKind::Left => control.move_left = true,
                    ZoneKind::Right => control.move_right = true,
                    ZoneKind::Jump => {
                        if self.jump_claimed.insert(id) {
                            control.jump_requested = true;
                        }
                    }
                }
            }
        }
        control
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aggregator() -> InputAggregator {
        InputAggregator::new(ZoneLayout::default())
    }

    fn jump_center() -> PointF {
        ZoneLayout::default().jump.center
    }

    #[test]
    fn keyboard_flags_pass_through() {
        let mut input = aggregator();
        let control = input.resolve(true, false, true);
        assert!(control.move_left);
        assert!(!control.move_right);
        assert!(control.jump_requested);
        // Nothing carries over to the next frame.
        assert_eq!(input.resolve(false, false, false), ControlState::default());
    }

    #[test]
    fn held_jump_contact_triggers_exactly_once() {
        let mut input = aggregator();
        input.touch_started(ContactId(7), jump_center());
        assert!(input.resolve(false, false, false).jump_requested);
        for _ in 0..30 {
            assert!(!input.resolve(false, false, false).jump_requested);
        }
        // Lifting and touching again re-arms the edge.
        input.touch_ended(ContactId(7));
        input.touch_started(ContactId(7), jump_center());
        assert!(input.resolve(false, false, false).jump_requested);
    }

    #[test]
    fn movement_zone_retracts_when_contact_exits() {
        let zones = ZoneLayout::default();
        let mut input = aggregator();
        input.touch_started(ContactId(1), zones.left.center);
        assert!(input.resolve(false, false, false).move_left);
        input.touch_moved(ContactId(1), PointF::new(400.0, 100.0));
        assert!(!input.resolve(false, false, false).move_left);
    }

    #[test]
    fn zone_boundary_is_inclusive() {
        let zone = TouchZone {
            center: PointF::new(100.0, 100.0),
            radius: 50.0,
        };
        assert!(zone.contains(PointF::new(150.0, 100.0)));
        assert!(!zone.contains(PointF::new(150.5, 100.0)));
    }

    #[test]
    fn touch_and_keyboard_are_ored() {
        let zones = ZoneLayout::default();
        let mut input = aggregator();
        input.touch_started(ContactId(2), zones.right.center);
        let control = input.resolve(true, false, false);
        assert!(control.move_left);
        assert!(control.move_right);
    }

    #[test]
    fn contacts_are_independent() {
        let zones = ZoneLayout::default();
        let mut input = aggregator();
        input.touch_started(ContactId(1), zones.jump.center);
        input.touch_started(ContactId(2), zones.left.center);
        let control = input.resolve(false, false, false);
        assert!(control.jump_requested);
        assert!(control.move_left);
        // Second contact entering the jump zone later fires its own edge.
        input.touch_moved(ContactId(2), zones.jump.center);
        assert!(input.resolve(false, false, false).jump_requested);
    }
}
