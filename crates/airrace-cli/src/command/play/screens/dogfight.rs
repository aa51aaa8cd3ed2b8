use std::time::{Duration, Instant};

use airrace_engine::{DogfightSession, RoundState};
use airrace_evaluator::pilot::PolicyPilot;
use airrace_training::{learner::LearnerHandle, strategy::GenerationReport};
use crossterm::event::{Event, KeyCode, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Paragraph, Wrap},
};

use crate::{
    command::play::screens::RulesScreen,
    input::KeyTracker,
    tui::{RenderMode, Runtime, Screen, ScreenTransition},
    ui::widgets::{
        ArenaDisplay, HighscorePopup, LearningStatus, ProgressDisplay, StrategyDisplay, color,
        hud, style,
    },
};

const FPS: f64 = 60.0;

pub const DELAY_STEP: Duration = Duration::from_millis(100);
pub const MAX_DELAY: Duration = Duration::from_millis(5000);

/// Smallest improvement (seconds) worth announcing.
const EXPLAIN_THRESHOLD: f64 = 0.05;
const EXPLAIN_DURATION: Duration = Duration::from_secs(3);

const SIDE_PANEL_WIDTH: u16 = 38;

const SIDEBAR_NOTES: &[&str] = &[
    "Missiles fly straight; disappear when off screen.",
    "Edge = death. Plane-plane collision = both die.",
    "ES-learning runs in the background; the panel above shows progress.",
];

#[derive(Debug)]
struct Explanation {
    text: String,
    expires_at: Instant,
}

/// The live game: player vs AI, with the learner running in the background.
#[derive(Debug)]
pub struct DogfightScreen {
    session: DogfightSession,
    pilot: PolicyPilot,
    learner: LearnerHandle,
    keys: KeyTracker,
    show_guides: bool,
    show_explain: bool,
    explanation: Option<Explanation>,
}

impl DogfightScreen {
    pub fn new(session: DogfightSession, pilot: PolicyPilot, learner: LearnerHandle) -> Self {
        Self {
            session,
            pilot,
            learner,
            keys: KeyTracker::new(false),
            show_guides: false,
            show_explain: true,
            explanation: None,
        }
    }

    fn change_delay(&mut self, faster: bool) {
        let delay = self.learner.delay();
        let delay = if faster {
            delay.saturating_sub(DELAY_STEP)
        } else {
            (delay + DELAY_STEP).min(MAX_DELAY)
        };
        self.learner.set_delay(delay);
    }

    fn toggle_explain(&mut self) {
        self.show_explain = !self.show_explain;
        if !self.show_explain {
            self.explanation = None;
        }
    }

    fn observe_report(&mut self, report: &GenerationReport, now: Instant) {
        tracing::debug!(
            generation = report.generation,
            best = report.best_fitness,
            "generation finished"
        );
        if self.show_explain
            && let Some(delta) = report.improvement
            && delta > EXPLAIN_THRESHOLD
        {
            self.explanation = Some(Explanation {
                text: format!(
                    "AI improved: -{delta:.1}s (best {:.1}s)",
                    report.best_fitness
                ),
                expires_at: now + EXPLAIN_DURATION,
            });
        }
    }

    fn expire_explanation(&mut self, now: Instant) {
        if let Some(explanation) = &self.explanation
            && explanation.expires_at <= now
        {
            self.explanation = None;
        }
    }

    fn step(&mut self, elapsed: Duration, now: Instant) {
        for report in self.learner.poll() {
            self.observe_report(&report, now);
        }
        self.expire_explanation(now);
        self.pilot.set_policy(self.learner.current_mean());

        let controls = self.keys.controls(now);
        self.session
            .tick(elapsed.as_secs_f64(), &controls, &mut self.pilot);
    }

    fn help_text(&self) -> &'static str {
        if self.session.is_paused() {
            "Controls: P (Resume) | L (Learning) | +/- (Delay) | R (Reset) | G (Guides) | E (Explain) | Q (Quit)"
        } else {
            "Controls: ← → (Turn) | ↑ ↓ (Throttle) | Space (Fire) | P (Pause) | L (Learning) | +/- (Delay) | R (Reset) | G (Guides) | E (Explain) | ? (Rules) | Q (Quit)"
        }
    }

    fn draw_arena(&self, frame: &mut Frame, area: Rect) {
        let border_style = match self.session.round_state() {
            _ if self.session.is_paused() => color::YELLOW,
            RoundState::Running => color::WHITE,
            RoundState::RoundOver { .. } => color::RED,
        };
        let block = Block::bordered()
            .title(hud::status_line(&self.session).left_aligned())
            .title(hud::score_line(self.session.scoreboard()).right_aligned())
            .title_bottom(Line::from(format!(" Round {} ", self.session.round())).centered())
            .border_style(border_style)
            .style(style::DEFAULT);
        let arena = ArenaDisplay::new(&self.session)
            .guides(self.show_guides)
            .block(block);
        frame.render_widget(&arena, area);

        if self.session.show_highscores() {
            frame.render_widget(HighscorePopup::new(self.session.highscores()), area);
            return;
        }

        let banner = if self.session.is_paused() {
            Some(("PAUSED", style::PAUSED))
        } else if self.session.round_state().is_round_over() {
            Some(("ROUND OVER", style::ROUND_OVER))
        } else {
            None
        };
        if let Some((text, style)) = banner {
            let block = Block::new().style(style);
            let text = Text::styled(text, style).centered();
            let area = area.centered(Constraint::Length(24), Constraint::Length(3));
            let inner = block.inner(area);
            frame.render_widget(Clear, area);
            frame.render_widget(block, area);
            frame.render_widget(text, inner.centered_vertically(Constraint::Length(1)));
        }
    }

    fn draw_side_panel(&self, frame: &mut Frame, area: Rect) {
        let panel_block = |title: &'static str| {
            Block::bordered()
                .title(Line::from(title).centered())
                .padding(Padding::horizontal(1))
                .style(style::DEFAULT)
        };

        let progress = ProgressDisplay::new(LearningStatus {
            latest: self.learner.latest(),
            enabled: self.learner.is_enabled(),
            delay: self.learner.delay(),
        })
        .block(panel_block("AI progress"));
        let strategy = StrategyDisplay::new(self.pilot.policy().summary())
            .block(panel_block("AI strategy (simplified)"));
        let notes = Paragraph::new(Text::from_iter(
            SIDEBAR_NOTES.iter().map(|note| Line::from(format!("- {note}"))),
        ))
        .wrap(Wrap { trim: true })
        .block(panel_block("What's happening?"));

        if !self.show_explain {
            let [progress_area, notes_area] = Layout::vertical([
                Constraint::Length(progress.height()),
                Constraint::Fill(1),
            ])
            .areas(area);
            frame.render_widget(progress, progress_area);
            frame.render_widget(notes, notes_area);
            return;
        }

        let explanation = Paragraph::new(
            self.explanation
                .as_ref()
                .map_or("", |explanation| explanation.text.as_str()),
        )
        .style(style::ACCENT)
        .wrap(Wrap { trim: true });

        let [progress_area, strategy_area, explain_area, notes_area] = Layout::vertical([
            Constraint::Length(progress.height()),
            Constraint::Length(strategy.height()),
            Constraint::Length(2),
            Constraint::Fill(1),
        ])
        .areas(area);
        frame.render_widget(progress, progress_area);
        frame.render_widget(strategy, strategy_area);
        frame.render_widget(explanation, explain_area);
        frame.render_widget(notes, notes_area);
    }
}

impl Screen for DogfightScreen {
    fn on_active(&mut self, runtime: &mut Runtime) {
        runtime.set_tick_rate(Some(FPS));
        runtime.set_render_mode(RenderMode::throttled_from_rate(FPS));
        self.keys.set_release_events(runtime.reports_key_release());
        self.keys.clear();
    }

    fn on_close(&mut self, _runtime: &mut Runtime) {
        self.learner.set_enabled(false);
    }

    fn handle_event(&mut self, _runtime: &mut Runtime, event: &Event) -> ScreenTransition {
        if let Event::FocusLost = event {
            self.keys.clear();
            return ScreenTransition::Stay;
        }
        let Some(key) = event.as_key_event() else {
            return ScreenTransition::Stay;
        };
        if self.keys.handle(&key, Instant::now()) || !key.is_press() {
            return ScreenTransition::Stay;
        }

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return ScreenTransition::Exit;
            }
            KeyCode::Char('q') | KeyCode::Esc => return ScreenTransition::Exit,
            KeyCode::Char('?') => return ScreenTransition::Push(Box::new(RulesScreen::new())),
            KeyCode::Char('p') => self.session.toggle_pause(),
            KeyCode::Char('l') => self.learner.toggle_enabled(),
            KeyCode::Char('+' | '=') => self.change_delay(false),
            KeyCode::Char('-') => self.change_delay(true),
            KeyCode::Char('r') => self.session.reset(),
            KeyCode::Char('g') => self.show_guides = !self.show_guides,
            KeyCode::Char('e') => self.toggle_explain(),
            _ => {}
        }
        ScreenTransition::Stay
    }

    fn update(&mut self, _runtime: &mut Runtime, elapsed: Duration) {
        self.step(elapsed, Instant::now());
    }

    fn draw(&self, frame: &mut Frame) {
        let help_text = Text::from(self.help_text())
            .style(Style::default().fg(Color::DarkGray))
            .centered();

        let [main_area, help_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());
        let [arena_area, side_area] = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Length(SIDE_PANEL_WIDTH),
        ])
        .areas(main_area);

        self.draw_arena(frame, arena_area);
        self.draw_side_panel(frame, side_area);
        frame.render_widget(help_text, help_area);
    }
}
