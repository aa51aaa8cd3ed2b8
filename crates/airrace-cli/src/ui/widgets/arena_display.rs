use std::iter;

use airrace_engine::{Arena, DogfightSession, Missile, Plane};
use glam::DVec2;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Color,
    symbols::Marker,
    widgets::{
        Block as BlockWidget, Widget,
        canvas::{Canvas, Circle, Context, Line as CanvasLine},
    },
};

use crate::ui::widgets::color;

/// Plane outline in body coordinates (nose along +x).
const PLANE_GLYPH: [DVec2; 4] = [
    DVec2::new(16.0, 0.0),
    DVec2::new(-10.0, -6.0),
    DVec2::new(-6.0, 0.0),
    DVec2::new(-10.0, 6.0),
];

const MISSILE_GLYPH: [DVec2; 3] = [
    DVec2::new(10.0, 0.0),
    DVec2::new(-6.0, -3.0),
    DVec2::new(-6.0, 3.0),
];

const HALO_RADIUS: f64 = 20.0;

/// Braille rendering of the arena: trails, planes, missiles and guides.
#[derive(Debug)]
pub struct ArenaDisplay<'a> {
    session: &'a DogfightSession,
    show_guides: bool,
    block: Option<BlockWidget<'a>>,
}

impl<'a> ArenaDisplay<'a> {
    pub fn new(session: &'a DogfightSession) -> Self {
        Self {
            session,
            show_guides: false,
            block: None,
        }
    }

    pub fn guides(self, show_guides: bool) -> Self {
        Self {
            show_guides,
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    fn paint(&self, ctx: &mut Context) {
        let arena = self.session.arena();
        let player = self.session.player();
        let ai = self.session.ai();

        draw_trail(ctx, arena, player, color::PLAYER_TRAIL);
        draw_trail(ctx, arena, ai, color::AI_TRAIL);
        ctx.layer();

        if self.show_guides {
            let from = to_canvas(arena, player.pos());
            let to = to_canvas(arena, ai.pos());
            ctx.draw(&CanvasLine::new(from.x, from.y, to.x, to.y, color::DARK_GRAY));
        }

        draw_plane(ctx, arena, player, color::PLAYER);
        draw_plane(ctx, arena, ai, color::AI);
        for missile in self.session.missiles() {
            draw_missile(ctx, arena, missile);
        }
    }
}

impl Widget for ArenaDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &ArenaDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let arena = self.session.arena();
        let mut canvas = Canvas::default()
            .marker(Marker::Braille)
            .background_color(color::BLACK)
            .x_bounds([0.0, arena.width()])
            .y_bounds([0.0, arena.height()])
            .paint(|ctx| self.paint(ctx));
        if let Some(block) = &self.block {
            canvas = canvas.block(block.clone());
        }
        canvas.render(area, buf);
    }
}

/// Maps an arena position (y down) to canvas coordinates (y up).
pub fn to_canvas(arena: &Arena, pos: DVec2) -> DVec2 {
    DVec2::new(pos.x, arena.height() - pos.y)
}

/// Places a body-frame outline at `pos`, rotated to `heading`, in canvas coordinates.
pub fn glyph_outline<const N: usize>(
    arena: &Arena,
    glyph: [DVec2; N],
    pos: DVec2,
    heading: f64,
) -> [DVec2; N] {
    let rotation = DVec2::from_angle(heading);
    glyph.map(|p| to_canvas(arena, pos + rotation.rotate(p)))
}

fn draw_polygon(ctx: &mut Context, points: &[DVec2], color: Color) {
    let next = points.iter().cycle().skip(1);
    for (a, b) in iter::zip(points, next) {
        ctx.draw(&CanvasLine::new(a.x, a.y, b.x, b.y, color));
    }
}

fn draw_trail(ctx: &mut Context, arena: &Arena, plane: &Plane, color: Color) {
    for (a, b) in iter::zip(plane.trail(), plane.trail().skip(1)) {
        let a = to_canvas(arena, a);
        let b = to_canvas(arena, b);
        ctx.draw(&CanvasLine::new(a.x, a.y, b.x, b.y, color));
    }
}

fn draw_plane(ctx: &mut Context, arena: &Arena, plane: &Plane, color: Color) {
    let outline = glyph_outline(arena, PLANE_GLYPH, plane.pos(), plane.heading());
    draw_polygon(ctx, &outline, color);
    if !plane.is_alive() {
        let center = to_canvas(arena, plane.pos());
        ctx.draw(&Circle {
            x: center.x,
            y: center.y,
            radius: HALO_RADIUS,
            color: color::GRAY,
        });
    }
}

fn draw_missile(ctx: &mut Context, arena: &Arena, missile: &Missile) {
    let color = if missile.owner().is_player() {
        color::PLAYER
    } else {
        color::AI
    };
    let outline = glyph_outline(arena, MISSILE_GLYPH, missile.pos(), missile.heading());
    draw_polygon(ctx, &outline, color);
}
