use std::time::Duration;

use crossterm::event::{Event, KeyCode};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::{Line, Text},
    widgets::{Block, Padding, Paragraph, Wrap},
};

use crate::{
    tui::{RenderMode, Runtime, Screen, ScreenTransition},
    ui::widgets::style,
};

const RULES: &[&str] = &[
    "1. Steer with ← →, throttle with ↑ ↓, fire with Space.",
    "2. Missiles fly straight and disappear off the field.",
    "3. Edge = death. Plane-plane collision = both die.",
    "4. Score shown top-right. AI learns continuously.",
];

/// Rules shown over the game until a key is pressed.
#[derive(Debug, Default)]
pub struct RulesScreen;

impl RulesScreen {
    pub fn new() -> Self {
        Self
    }
}

impl Screen for RulesScreen {
    fn on_active(&mut self, runtime: &mut Runtime) {
        runtime.set_tick_rate(None);
        runtime.set_render_mode(RenderMode::OnDirty);
    }

    fn handle_event(&mut self, _runtime: &mut Runtime, event: &Event) -> ScreenTransition {
        let Some(key) = event.as_key_press_event() else {
            return ScreenTransition::Stay;
        };
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => ScreenTransition::Exit,
            _ => ScreenTransition::Pop,
        }
    }

    fn update(&mut self, _runtime: &mut Runtime, _elapsed: Duration) {}

    fn draw(&self, frame: &mut Frame) {
        let mut lines: Vec<Line> = RULES.iter().map(|rule| Line::from(*rule)).collect();
        lines.push(Line::default());
        lines.push(Line::styled("Press any key to start, q to quit", style::ACCENT).centered());

        let block = Block::bordered()
            .title(Line::from("AI Dogfight simulator").centered())
            .title_bottom(Line::from("Rules").centered())
            .padding(Padding::horizontal(2))
            .style(style::DEFAULT);
        let rules = Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: false })
            .block(block);

        let help_text = Text::from("Controls: any key (Start) | Q (Quit)")
            .style(Style::default().fg(Color::DarkGray))
            .centered();

        let [main_area, help_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());
        let rules_area = main_area.centered(Constraint::Length(64), Constraint::Length(10));
        frame.render_widget(rules, rules_area);
        frame.render_widget(help_text, help_area);
    }
}
