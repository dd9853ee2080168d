use bracket_random::prelude::RandomNumberGenerator;

use crate::config::Tunables;

pub const GROUND_THICKNESS: f32 = 48.0;
pub const INITIAL_ROWS: usize = 8;

/// World-space y of the ground's top surface (y grows downward).
pub fn ground_top(cfg: &Tunables) -> f32 {
    cfg.view_height - GROUND_THICKNESS
}

/// One platform's worth of generation decisions: geometry plus the spawn
/// rolls that go with it. Pure data so the decision step stays testable
/// with a seeded random source; applying it (creating bodies and entities)
/// happens elsewhere.
#[derive(Clone, Copy, Debug)]
pub struct PlatformPlan {
    /// Center of the platform body.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub monster: bool,
    pub chest: bool,
}

/// Samples one platform at altitude `y`. Width is uniform in the configured
/// range; the horizontal range is clamped so a wide platform on a narrow
/// view can never invert the sampling bounds.
pub fn plan_platform(
    rng: &mut RandomNumberGenerator,
    y: f32,
    chest_allowed: bool,
    cfg: &Tunables,
) -> PlatformPlan {
    let span = (cfg.max_platform_width - cfg.min_platform_width).max(0.0);
    let width = cfg.min_platform_width + rng.rand::<f32>() * span;

    let lo = cfg.side_margin + width / 2.0;
    let hi = cfg.view_width - cfg.side_margin - width / 2.0;
    let x = if hi > lo {
        lo + rng.rand::<f32>() * (hi - lo)
    } else {
        cfg.view_width / 2.0
    };

    let above_ground = ground_top(cfg) - y;
    let monster = above_ground > cfg.ground_exclusion && rng.rand::<f32>() < cfg.monster_chance;
    let chest = chest_allowed && rng.rand::<f32>() < cfg.chest_chance;

    PlatformPlan {
        x,
        y,
        width,
        monster,
        chest,
    }
}

/// Emits platform plans ahead of the ascending player. Tracks only the
/// generation frontier; the chest-pending flag belongs to the session and
/// is passed in per call.
pub struct WorldGenerator {
    top_y: f32,
    last_chest_y: f32,
}

impl WorldGenerator {
    pub fn new(cfg: &Tunables) -> Self {
        let base = ground_top(cfg);
        Self {
            top_y: base,
            last_chest_y: base,
        }
    }

    /// Altitude of the topmost generated platform so far.
    pub fn top_y(&self) -> f32 {
        self.top_y
    }

    /// The fixed starting ladder above the ground.
    pub fn initial_ladder(
        &mut self,
        rng: &mut RandomNumberGenerator,
        chest_pending: bool,
        cfg: &Tunables,
    ) -> Vec<PlatformPlan> {
        let mut pending = chest_pending;
        let mut plans = Vec::with_capacity(INITIAL_ROWS);
        for _ in 0..INITIAL_ROWS {
            let plan = self.next(rng, pending, cfg);
            pending |= plan.chest;
            plans.push(plan);
        }
        plans
    }

    /// Keeps generating one row at a time until the frontier is at least a
    /// lookahead above the player, so generation never lags a fast ascent.
    pub fn extend(
        &mut self,
        rng: &mut RandomNumberGenerator,
        player_y: f32,
        chest_pending: bool,
        cfg: &Tunables,
    ) -> Vec<PlatformPlan> {
        let mut pending = chest_pending;
        let mut plans = Vec::new();
        while self.top_y > player_y - cfg.lookahead {
            let plan = self.next(rng, pending, cfg);
            pending |= plan.chest;
            plans.push(plan);
        }
        plans
    }

    fn next(
        &mut self,
        rng: &mut RandomNumberGenerator,
        chest_pending: bool,
        cfg: &Tunables,
    ) -> PlatformPlan {
        let y = self.top_y - cfg.platform_spacing;
        let chest_allowed = !chest_pending && (self.last_chest_y - y) > cfg.chest_gap;
        let plan = plan_platform(rng, y, chest_allowed, cfg);
        self.top_y = y;
        if plan.chest {
            self.last_chest_y = y;
        }
        plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rng() -> RandomNumberGenerator {
        RandomNumberGenerator::seeded(0x5caf_f01d)
    }

    #[test]
    fn widths_and_positions_stay_in_bounds() {
        let cfg = Tunables::default();
        let mut rng = rng();
        for i in 0..500 {
            let y = ground_top(&cfg) - 200.0 - i as f32;
            let plan = plan_platform(&mut rng, y, true, &cfg);
            assert!(plan.width >= cfg.min_platform_width);
            assert!(plan.width <= cfg.max_platform_width);
            assert!(plan.x - plan.width / 2.0 >= cfg.side_margin);
            assert!(plan.x + plan.width / 2.0 <= cfg.view_width - cfg.side_margin);
        }
    }

    #[test]
    fn degenerate_width_range_is_clamped() {
        let mut cfg = Tunables::default();
        cfg.min_platform_width = 900.0;
        cfg.max_platform_width = 900.0;
        let mut rng = rng();
        // Wider than the view: the position range inverts and must clamp.
        let plan = plan_platform(&mut rng, 100.0, false, &cfg);
        assert_eq!(plan.x, cfg.view_width / 2.0);
        assert_eq!(plan.width, 900.0);
    }

    #[test]
    fn generation_keeps_pace_with_ascent() {
        let cfg = Tunables::default();
        let mut rng = rng();
        let mut generator = WorldGenerator::new(&cfg);
        generator.initial_ladder(&mut rng, false, &cfg);
        let mut player_y = ground_top(&cfg);
        for _ in 0..50 {
            player_y -= 333.0;
            generator.extend(&mut rng, player_y, false, &cfg);
            assert!(generator.top_y() <= player_y - cfg.lookahead);
        }
    }

    #[test]
    fn extend_is_idle_when_frontier_is_ahead() {
        let cfg = Tunables::default();
        let mut rng = rng();
        let mut generator = WorldGenerator::new(&cfg);
        let player_y = ground_top(&cfg);
        assert!(!generator.extend(&mut rng, player_y, false, &cfg).is_empty());
        assert!(generator.extend(&mut rng, player_y, false, &cfg).is_empty());
    }

    #[test]
    fn no_monsters_near_the_ground_line() {
        let cfg = Tunables::default();
        let mut rng = rng();
        for _ in 0..500 {
            let plan = plan_platform(&mut rng, ground_top(&cfg) - 50.0, false, &cfg);
            assert!(!plan.monster);
        }
    }

    #[test]
    fn monsters_do_appear_higher_up() {
        let cfg = Tunables::default();
        let mut rng = rng();
        let spawned = (0..500)
            .filter(|_| plan_platform(&mut rng, 0.0, false, &cfg).monster)
            .count();
        assert!(spawned > 0);
    }

    #[test]
    fn at_most_one_chest_pending_per_batch() {
        let cfg = Tunables::default();
        let mut rng = rng();
        let mut generator = WorldGenerator::new(&cfg);
        // A long ascent in one call: chests may appear, but once one is
        // planned the rest of the batch holds off.
        let plans = generator.extend(&mut rng, -50_000.0, false, &cfg);
        let chests = plans.iter().filter(|plan| plan.chest).count();
        assert!(chests <= 1);
    }

    #[test]
    fn pending_chest_blocks_new_ones() {
        let cfg = Tunables::default();
        let mut rng = rng();
        let mut generator = WorldGenerator::new(&cfg);
        let plans = generator.extend(&mut rng, -50_000.0, true, &cfg);
        assert!(plans.iter().all(|plan| !plan.chest));
    }

    #[test]
    fn chest_respects_distance_gate_after_collection() {
        let cfg = Tunables::default();
        let mut rng = rng();
        let mut generator = WorldGenerator::new(&cfg);
        // Walk the frontier up one row at a time with pending always false,
        // as if every chest were collected instantly. Spawned chests must
        // still sit more than the gap apart.
        let mut chest_ys = Vec::new();
        let mut player_y = ground_top(&cfg);
        for _ in 0..2000 {
            player_y -= cfg.platform_spacing;
            for plan in generator.extend(&mut rng, player_y, false, &cfg) {
                if plan.chest {
                    chest_ys.push(plan.y);
                }
            }
        }
        assert!(chest_ys.len() > 1);
        for pair in chest_ys.windows(2) {
            assert!(pair[0] - pair[1] > cfg.chest_gap);
        }
    }
}
