use bracket_geometry::prelude::PointF;
use bracket_terminal::prelude::*;

use crate::{
    config::Tunables,
    ecs::EcsWorld,
    game::{GameSession, MAX_LIVES, Phase},
};

// World units per terminal cell (800x600 world onto an 80x50 console).
pub const CELL_W: f32 = 10.0;
pub const CELL_H: f32 = 12.0;

struct Viewport {
    left: f32,
    top: f32,
    cells_w: i32,
    cells_h: i32,
}

impl Viewport {
    fn new(ctx: &BTerm, camera: PointF, cfg: &Tunables) -> Self {
        let (w, h) = ctx.get_char_size();
        Self {
            left: camera.x - cfg.view_width / 2.0,
            top: camera.y - cfg.view_height / 2.0,
            cells_w: w as i32,
            cells_h: h as i32,
        }
    }

    fn cell(&self, point: PointF) -> (i32, i32) {
        (
            ((point.x - self.left) / CELL_W).round() as i32,
            ((point.y - self.top) / CELL_H).round() as i32,
        )
    }

    fn on_screen(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.cells_w && y >= 0 && y < self.cells_h
    }
}

pub fn draw_scene(
    ctx: &mut BTerm,
    ecs: &EcsWorld,
    session: &GameSession,
    camera: PointF,
    log: &[String],
    cfg: &Tunables,
) {
    let view = Viewport::new(ctx, camera, cfg);

    // Platforms and the ground: one row of glyphs per surface.
    ecs.each_surface(|point, extent, renderable| {
        let (cx, cy) = view.cell(point);
        let span = ((extent.width / CELL_W) / 2.0).round() as i32;
        for dx in -span..=span {
            if view.on_screen(cx + dx, cy) {
                ctx.set(
                    cx + dx,
                    cy,
                    renderable.color,
                    RGB::named(BLACK),
                    renderable.glyph,
                );
            }
        }
    });

    ecs.each_renderable(|point, renderable| {
        let (cx, cy) = view.cell(point);
        if view.on_screen(cx, cy) {
            ctx.set(cx, cy, renderable.color, RGB::named(BLACK), renderable.glyph);
        }
    });

    draw_hud(ctx, session);
    draw_log(ctx, log, view.cells_h - 1 - log.len().min(5) as i32);
}

/// Lives/height readout anchored to the top of the screen, which is itself
/// camera-relative; the text rides along with the view.
fn draw_hud(ctx: &mut BTerm, session: &GameSession) {
    let (width, _) = ctx.get_char_size();
    ctx.print_color(
        1,
        0,
        RGB::from_u8(255, 120, 120),
        RGB::named(BLACK),
        format!("LIVES {:2}/{}", session.lives(), MAX_LIVES),
    );
    let height_text = format!("HEIGHT {:5}", session.height_display());
    ctx.print_color(
        width as i32 - height_text.len() as i32 - 1,
        0,
        RGB::named(LIGHT_CYAN),
        RGB::named(BLACK),
        &height_text,
    );

    if session.notice_active() {
        ctx.print_color_centered(2, RGB::named(LIGHT_GREEN), RGB::named(BLACK), "+1 LIFE");
    }
    if session.in_cooldown() {
        ctx.print_color_centered(3, RGB::named(ORANGE), RGB::named(BLACK), "* * *");
    }

    match session.phase() {
        Phase::Won => {
            ctx.print_color_centered(20, RGB::named(YELLOW), RGB::named(BLACK), "YOU WIN!");
            if session.restart_armed() {
                ctx.print_color_centered(
                    22,
                    RGB::named(WHITE),
                    RGB::named(BLACK),
                    "Press any key to climb again",
                );
            }
        }
        Phase::Lost => {
            ctx.print_color_centered(20, RGB::named(RED), RGB::named(BLACK), "YOU LOSE");
            if session.restart_armed() {
                ctx.print_color_centered(
                    22,
                    RGB::named(WHITE),
                    RGB::named(BLACK),
                    "Press any key to climb again",
                );
            }
        }
        Phase::Playing => {}
    }
}

fn draw_log(ctx: &mut BTerm, log: &[String], start_y: i32) {
    for (row, entry) in log.iter().take(5).enumerate() {
        ctx.print_color(
            1,
            start_y + row as i32,
            RGB::named(GRAY),
            RGB::named(BLACK),
            entry,
        );
    }
}
