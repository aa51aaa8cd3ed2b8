use std::time::Duration;

use crossterm::event::Event as CrosstermEvent;

/// Events processed by TUI applications.
#[derive(Debug, Clone, derive_more::From)]
pub(super) enum TuiEvent {
    /// Simulation step, carrying the wall time since the previous tick.
    #[from(ignore)]
    Tick(Duration),
    Render,
    /// Key input, resize and other terminal events.
    Crossterm(CrosstermEvent),
}
