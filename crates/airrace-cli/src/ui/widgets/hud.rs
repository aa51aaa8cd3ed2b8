use airrace_engine::{DogfightSession, Plane, Scoreboard};
use ratatui::{
    style::Modifier,
    text::{Line, Span},
};

use crate::ui::widgets::style;

fn status(plane: &Plane) -> &'static str {
    if plane.is_alive() { "ALIVE" } else { "HIT" }
}

/// `Player: ALIVE   AI: HIT`
pub fn status_line(session: &DogfightSession) -> Line<'static> {
    Line::from(vec![
        Span::styled("Player: ", style::LABEL),
        Span::styled(status(session.player()), style::PLAYER),
        Span::styled("   AI: ", style::LABEL),
        Span::styled(status(session.ai()), style::AI),
    ])
}

/// `P : A`, player score first.
pub fn score_line(scoreboard: &Scoreboard) -> Line<'static> {
    Line::from(vec![
        Span::styled(scoreboard.player().to_string(), style::PLAYER.add_modifier(Modifier::BOLD)),
        Span::styled(" : ", style::LABEL),
        Span::styled(scoreboard.ai().to_string(), style::AI.add_modifier(Modifier::BOLD)),
    ])
}
