mod config;
mod ecs;
mod engine;
mod game;
mod input;
mod player;
mod render;
mod world;

use bracket_geometry::prelude::PointF;
use bracket_random::prelude::RandomNumberGenerator;
use bracket_terminal::prelude::*;

use config::Tunables;
use ecs::{EcsWorld, TouchTarget};
use engine::{PhysicsHost, Tag, sim::SimHost};
use game::GameSession;
use input::{ContactId, ControlState, InputAggregator, ZoneLayout};
use player::PlayerController;
use world::WorldGenerator;

const LOG_MAX_ENTRIES: usize = 5;
const MOUSE_CONTACT: ContactId = ContactId(0);

struct SkyClimbState {
    cfg: Tunables,
    host: SimHost,
    ecs: EcsWorld,
    generator: WorldGenerator,
    input: InputAggregator,
    controller: PlayerController,
    session: GameSession,
    rng: RandomNumberGenerator,
    message_log: Vec<String>,
    mouse_contact_down: bool,
    frozen: bool,
}

impl SkyClimbState {
    fn new(cfg: Tunables) -> Self {
        let mut host = SimHost::new(cfg.gravity);
        let mut ecs = EcsWorld::new(&mut host, &cfg);
        ecs.spawn_ground(&mut host, &cfg);
        host.set_camera(PointF::new(cfg.view_width / 2.0, cfg.view_height / 2.0));

        let mut generator = WorldGenerator::new(&cfg);
        let mut rng = RandomNumberGenerator::new();
        let mut session = GameSession::new(cfg.start_lives, cfg.height_scale, cfg.win_height);
        for plan in generator.initial_ladder(&mut rng, session.chest_pending(), &cfg) {
            if ecs.apply_plan(&mut host, &plan, &cfg) {
                session.mark_chest_pending();
            }
        }

        Self {
            cfg,
            host,
            ecs,
            generator,
            input: InputAggregator::new(ZoneLayout::default()),
            controller: PlayerController::new(),
            session,
            rng,
            message_log: vec!["Climb!".to_string()],
            mouse_contact_down: false,
            frozen: false,
        }
    }

    fn push_log_entry<S: Into<String>>(&mut self, entry: S) {
        self.message_log.insert(0, entry.into());
        self.message_log.truncate(LOG_MAX_ENTRIES);
    }

    /// Keyboard edges and held keys, plus the mouse standing in for a single
    /// touch contact, all funneled through the aggregator.
    fn gather_control(&mut self, ctx: &BTerm) -> ControlState {
        let jump_edge = matches!(
            ctx.key,
            Some(VirtualKeyCode::Space | VirtualKeyCode::Up | VirtualKeyCode::W)
        );
        let (held_left, held_right, mouse_down) = {
            let input = INPUT.lock();
            let keys = input.key_pressed_set();
            (
                keys.contains(&VirtualKeyCode::Left) || keys.contains(&VirtualKeyCode::A),
                keys.contains(&VirtualKeyCode::Right) || keys.contains(&VirtualKeyCode::D),
                input.mouse_button_pressed_set().contains(&0),
            )
        };

        let (mx, my) = ctx.mouse_pos();
        let pos = PointF::new(mx as f32 * render::CELL_W, my as f32 * render::CELL_H);
        if mouse_down {
            if self.mouse_contact_down {
                self.input.touch_moved(MOUSE_CONTACT, pos);
            } else {
                self.input.touch_started(MOUSE_CONTACT, pos);
                self.mouse_contact_down = true;
            }
        } else if self.mouse_contact_down {
            self.input.touch_ended(MOUSE_CONTACT);
            self.mouse_contact_down = false;
        }

        self.input.resolve(held_left, held_right, jump_edge)
    }

    fn freeze_player(&mut self) {
        if !self.frozen {
            self.host.freeze(self.ecs.player_body());
            self.frozen = true;
        }
    }

    fn route_contacts(&mut self, contacts: Vec<engine::Contact>) {
        for contact in contacts {
            let Some((_, other, _)) = contact.involving(Tag::Player) else {
                continue;
            };
            match self.ecs.target_of(other) {
                Some(TouchTarget::Monster(_)) => {
                    if let Some(line) = self.session.monster_hit() {
                        self.push_log_entry(line);
                    }
                }
                Some(TouchTarget::Chest(entity)) => {
                    if self.ecs.collect_chest(&mut self.host, entity) {
                        if let Some(line) = self.session.bonus_collected() {
                            self.push_log_entry(line);
                        }
                    }
                }
                None => {}
            }
        }
    }

    fn draw(&mut self, ctx: &mut BTerm) {
        ctx.cls();
        render::draw_scene(
            ctx,
            &self.ecs,
            &self.session,
            self.host.camera(),
            &self.message_log,
            &self.cfg,
        );
    }
}

impl GameState for SkyClimbState {
    fn tick(&mut self, ctx: &mut BTerm) {
        if let Some(VirtualKeyCode::Escape) = ctx.key {
            ctx.quitting = true;
            return;
        }

        // Terminal phases: the world is frozen, input is detached from the
        // player, and after a short arm delay any edge restarts the run.
        if self.session.phase().is_terminal() {
            self.session.tick_timers();
            if self.session.restart_armed() && (ctx.key.is_some() || ctx.left_click) {
                *self = SkyClimbState::new(self.cfg.clone());
                return;
            }
            self.draw(ctx);
            return;
        }

        let control = self.gather_control(ctx);
        let player_body = self.ecs.player_body();
        let grounded = self.host.grounded(player_body);
        let plan = self.controller.plan(&control, grounded);
        let dt = self.cfg.frame_dt();
        if plan.dir != 0.0 {
            self.host
                .move_by(player_body, plan.dir * self.cfg.player_speed * dt, 0.0);
        }
        if plan.jump {
            self.host.jump(player_body, self.cfg.jump_force);
        }

        let contacts = self.host.step(dt);
        self.ecs.sync_positions(&self.host);
        self.route_contacts(contacts);

        let player_pos = self.ecs.player_point();

        // The camera only ever climbs; backing down never scrolls it.
        let cam_y = self.host.camera().y.min(player_pos.y);
        self.host
            .set_camera(PointF::new(self.cfg.view_width / 2.0, cam_y));

        if player_pos.y > cam_y + self.cfg.view_height / 2.0 {
            if let Some(line) = self.session.fall_out() {
                self.push_log_entry(line);
            }
        }

        let altitude = (world::ground_top(&self.cfg) - player_pos.y).max(0.0);
        if let Some(line) = self.session.record_altitude(altitude) {
            self.push_log_entry(line);
        }

        if self.session.phase().is_terminal() {
            self.freeze_player();
            self.session.tick_timers();
            self.draw(ctx);
            return;
        }

        let plans = self.generator.extend(
            &mut self.rng,
            player_pos.y,
            self.session.chest_pending(),
            &self.cfg,
        );
        for plan in plans {
            if self.ecs.apply_plan(&mut self.host, &plan, &self.cfg) {
                self.session.mark_chest_pending();
            }
        }

        let step = self.cfg.monster_speed / self.cfg.frame_rate;
        self.ecs.advance(&mut self.host, player_pos.x, step);

        let cutoff = cam_y + self.cfg.view_height / 2.0 + self.cfg.cull_margin;
        self.ecs.cull_below(&mut self.host, cutoff);

        self.session.tick_timers();
        self.draw(ctx);
    }
}

fn main() -> BError {
    let cfg = Tunables::load_or_default("skyclimb.json");
    let context = BTermBuilder::simple80x50()
        .with_title("SkyClimb")
        .with_fps_cap(cfg.frame_rate)
        .build()?;
    main_loop(context, SkyClimbState::new(cfg))
}
