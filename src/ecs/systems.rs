use specs::prelude::*;

use super::{
    components::{ChaseIntent, Position, Pursuer},
    resources::PursuitContext,
};

/// One-axis pursuit: each living pursuer steps a fixed increment toward the
/// player's x whenever the gap exceeds the hold band. Vertical pinning
/// happens when intents are applied through the physics seam.
#[derive(Default)]
pub struct ChaseSystem;

impl<'a> System<'a> for ChaseSystem {
    type SystemData = (
        Entities<'a>,
        WriteStorage<'a, ChaseIntent>,
        ReadStorage<'a, Position>,
        ReadStorage<'a, Pursuer>,
        ReadExpect<'a, PursuitContext>,
    );

    fn run(&mut self, (entities, mut intents, positions, pursuers, ctx): Self::SystemData) {
        for (entity, pos, pursuer) in (&entities, &positions, &pursuers).join() {
            if !pursuer.alive {
                intents.remove(entity);
                continue;
            }
            let delta = ctx.player_x - pos.point.x;
            if delta.abs() > ctx.hold_band {
                let _ = intents.insert(
                    entity,
                    ChaseIntent {
                        dx: delta.signum() * ctx.step,
                    },
                );
            } else {
                intents.remove(entity);
            }
        }
    }
}
