use airrace_engine::Highscores;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};

use crate::ui::widgets::{color, style};

const WIDTH: u16 = 36;
/// Five score rows, a spacer and the footer inside the borders.
const HEIGHT: u16 = 9;

/// Top-5 list shown over the arena after the player died.
#[derive(Debug)]
pub struct HighscorePopup<'a> {
    highscores: &'a Highscores,
}

impl<'a> HighscorePopup<'a> {
    pub fn new(highscores: &'a Highscores) -> Self {
        Self { highscores }
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let mut lines: Vec<Line> = self
            .highscores
            .as_slice()
            .iter()
            .enumerate()
            .map(|(i, score)| {
                let style = if i == 0 { style::ACCENT } else { style::DEFAULT };
                Line::styled(format!("{}. {score}", i + 1), style)
            })
            .collect();
        lines.resize(airrace_engine::constants::HIGHSCORE_LEN, Line::default());
        lines.push(Line::default());
        lines.push(Line::styled("Player died - resetting round", style::LABEL).centered());
        lines
    }
}

impl Widget for HighscorePopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = area.centered(Constraint::Length(WIDTH), Constraint::Length(HEIGHT));
        let block = Block::bordered()
            .title(Line::from("Highscore (Top 5)").centered())
            .border_style(color::GRAY)
            .padding(Padding::horizontal(2))
            .style(style::DEFAULT);
        let inner = block.inner(area);
        Clear.render(area, buf);
        block.render(area, buf);
        Text::from(self.lines()).render(inner, buf);
    }
}
