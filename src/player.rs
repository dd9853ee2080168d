#![allow(dead_code)]

use crate::input::ControlState;

/// What the player wants the host to do this frame. `dir` is the net
/// horizontal sign; both movement flags held cancel out.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FramePlan {
    pub dir: f32,
    pub jump: bool,
}

/// Per-frame jump and movement bookkeeping. Pure: consumes the resolved
/// control vector plus the host-reported grounded flag, and the tick applies
/// the returned plan through the physics seam.
pub struct PlayerController {
    jump_count: u8,
    was_grounded: bool,
}

impl PlayerController {
    pub fn new() -> Self {
        Self {
            jump_count: 0,
            was_grounded: false,
        }
    }

    pub fn jump_count(&self) -> u8 {
        self.jump_count
    }

    pub fn plan(&mut self, control: &ControlState, grounded: bool) -> FramePlan {
        let mut dir = 0.0;
        if control.move_left {
            dir -= 1.0;
        }
        if control.move_right {
            dir += 1.0;
        }

        let mut jump = false;
        if control.jump_requested && (grounded || self.jump_count < 2) {
            // A ground jump counts as "landed, then jumped"; an air jump
            // spends one of the two airborne charges.
            self.jump_count = if grounded {
                1
            } else {
                (self.jump_count + 1).min(2)
            };
            jump = true;
        }

        // Landing clears accumulated air-jumps, after any same-frame grant.
        if !self.was_grounded && grounded {
            self.jump_count = 0;
        }
        self.was_grounded = grounded;

        FramePlan { dir, jump }
    }
}
