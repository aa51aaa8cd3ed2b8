use ratatui::{layout::Rect, widgets::Block as BlockWidget};

pub use self::{arena_display::*, highscore_popup::*, progress_display::*, strategy_display::*};

pub mod hud;

mod arena_display;
mod highscore_popup;
mod progress_display;
mod strategy_display;

pub mod color {
    use ratatui::style::Color;

    pub const PLAYER: Color = Color::Rgb(56, 189, 248);
    pub const PLAYER_TRAIL: Color = Color::Rgb(20, 70, 95);
    pub const AI: Color = Color::Rgb(248, 113, 113);
    pub const AI_TRAIL: Color = Color::Rgb(95, 40, 40);
    pub const ACCENT: Color = Color::Rgb(110, 231, 183);
    pub const YELLOW: Color = Color::Rgb(255, 255, 0);
    pub const RED: Color = Color::Rgb(255, 0, 0);
    pub const GRAY: Color = Color::Rgb(127, 127, 127);
    pub const DARK_GRAY: Color = Color::Rgb(60, 60, 60);
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);
}

pub mod style {
    use ratatui::style::{Color, Style};

    use crate::ui::widgets::color;

    const fn fg_bg(fg: Color, bg: Color) -> Style {
        Style::new().fg(fg).bg(bg)
    }

    pub const DEFAULT: Style = fg_bg(color::WHITE, color::BLACK);
    pub const LABEL: Style = fg_bg(color::GRAY, color::BLACK);
    pub const PLAYER: Style = fg_bg(color::PLAYER, color::BLACK);
    pub const AI: Style = fg_bg(color::AI, color::BLACK);
    pub const ACCENT: Style = fg_bg(color::ACCENT, color::BLACK);
    pub const PAUSED: Style = fg_bg(color::BLACK, color::YELLOW);
    pub const ROUND_OVER: Style = fg_bg(color::WHITE, color::RED);
}

fn block_vertical_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.height - inner_rect.height
}
