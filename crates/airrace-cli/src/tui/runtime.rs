use std::{
    io::{self, Write as _},
    time::Duration,
};

use crossterm::{
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute, terminal,
};

use crate::tui::{
    App,
    event::TuiEvent,
    event_loop::{EventLoop, RenderMode},
};

/// Terminal event loop driving an [`App`].
#[derive(Default, Debug)]
pub struct Runtime {
    events: EventLoop,
    key_release: bool,
}

impl Runtime {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tick rate in Hz. `None` stops ticking.
    pub fn set_tick_rate(&mut self, rate: Option<f64>) {
        self.events
            .set_tick_interval(rate.map(|rate| Duration::from_secs_f64(1.0 / rate)));
    }

    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.events.set_render_mode(mode);
    }

    /// Whether the terminal reports key releases for this run.
    #[must_use]
    pub fn reports_key_release(&self) -> bool {
        self.key_release
    }

    /// Runs `app` until it asks to exit.
    ///
    /// Key release reporting is requested from terminals that support the
    /// keyboard enhancement protocol and is switched off again on exit.
    pub fn run<A>(mut self, app: &mut A) -> io::Result<()>
    where
        A: App,
    {
        ratatui::run(|terminal| {
            self.key_release = terminal::supports_keyboard_enhancement().unwrap_or(false);
            if self.key_release {
                execute!(
                    terminal.backend_mut(),
                    PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
                )?;
            }
            tracing::debug!(key_release = self.key_release, "terminal ready");

            app.init(&mut self);
            let result = self.event_loop(terminal, app);

            if self.key_release {
                execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
                terminal.backend_mut().flush()?;
            }
            result
        })
    }

    fn event_loop<A>(&mut self, terminal: &mut ratatui::DefaultTerminal, app: &mut A) -> io::Result<()>
    where
        A: App,
    {
        while !app.should_exit() {
            match self.events.next()? {
                TuiEvent::Tick(elapsed) => app.update(self, elapsed),
                TuiEvent::Render => {
                    terminal.draw(|f| app.draw(f))?;
                }
                TuiEvent::Crossterm(event) => app.handle_event(self, event),
            }
        }
        Ok(())
    }
}
