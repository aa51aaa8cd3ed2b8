use std::time::Duration;

use crossterm::event::Event;
use ratatui::Frame;

use crate::tui::Runtime;

/// Something [`Runtime::run`] can drive.
pub trait App {
    /// Called once before the first event. Configure tick and render rates here.
    fn init(&mut self, runtime: &mut Runtime);

    fn should_exit(&self) -> bool;

    fn handle_event(&mut self, runtime: &mut Runtime, event: Event);

    fn draw(&self, frame: &mut Frame);

    /// Advances the application by `elapsed` wall time.
    fn update(&mut self, runtime: &mut Runtime, elapsed: Duration);
}
