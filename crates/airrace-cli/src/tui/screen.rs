use std::{fmt, time::Duration};

use crossterm::event::Event;
use ratatui::Frame;

use crate::tui::{App, Runtime};

/// One screen of the application.
///
/// ```text
/// create ─▶ on_active ◀──── child screen popped
///              │                  ▲
///              ▼                  │
///          (foreground) ── push ──┘
///              │
///            pop / exit
///              ▼
///           on_close ─▶ drop
/// ```
///
/// Screens configure the [`Runtime`] (tick rate, render mode) in
/// [`on_active`](Self::on_active) so the settings follow whichever screen is
/// in front.
pub trait Screen: fmt::Debug {
    fn on_active(&mut self, runtime: &mut Runtime);

    /// Called once when the screen leaves the stack.
    fn on_close(&mut self, _runtime: &mut Runtime) {}

    fn handle_event(&mut self, runtime: &mut Runtime, event: &Event) -> ScreenTransition;

    /// Called on every tick while the screen is in front.
    fn update(&mut self, runtime: &mut Runtime, elapsed: Duration);

    fn draw(&self, frame: &mut Frame);
}

/// What the stack should do after an event.
#[derive(Debug)]
pub enum ScreenTransition {
    Stay,
    /// Put a screen in front of the current one.
    Push(Box<dyn Screen>),
    /// Close the current screen and return to the one below.
    Pop,
    /// Close every screen and leave the application.
    Exit,
}

/// Stack of screens; only the top one receives events.
#[derive(Debug)]
pub struct ScreenStack {
    screens: Vec<Box<dyn Screen>>,
    should_exit: bool,
}

impl ScreenStack {
    pub fn new(initial: Box<dyn Screen>) -> Self {
        Self {
            screens: vec![initial],
            should_exit: false,
        }
    }

    /// Pushes a screen before the application starts. It is activated
    /// by [`App::init`] together with the rest of the stack.
    pub fn with(mut self, screen: Box<dyn Screen>) -> Self {
        self.screens.push(screen);
        self
    }

    fn apply_transition(&mut self, runtime: &mut Runtime, transition: ScreenTransition) {
        match transition {
            ScreenTransition::Stay => {}
            ScreenTransition::Push(mut screen) => {
                screen.on_active(runtime);
                self.screens.push(screen);
            }
            ScreenTransition::Pop => {
                if let Some(mut screen) = self.screens.pop() {
                    screen.on_close(runtime);
                }
                if let Some(screen) = self.screens.last_mut() {
                    screen.on_active(runtime);
                }
            }
            ScreenTransition::Exit => {
                while let Some(mut screen) = self.screens.pop() {
                    screen.on_close(runtime);
                }
                self.should_exit = true;
            }
        }
    }
}

impl App for ScreenStack {
    fn init(&mut self, runtime: &mut Runtime) {
        if let Some(screen) = self.screens.last_mut() {
            screen.on_active(runtime);
        }
    }

    fn should_exit(&self) -> bool {
        self.should_exit || self.screens.is_empty()
    }

    fn handle_event(&mut self, runtime: &mut Runtime, event: Event) {
        if let Some(current) = self.screens.last_mut() {
            let transition = current.handle_event(runtime, &event);
            self.apply_transition(runtime, transition);
        }
    }

    fn draw(&self, frame: &mut Frame) {
        if let Some(current) = self.screens.last() {
            current.draw(frame);
        }
    }

    fn update(&mut self, runtime: &mut Runtime, elapsed: Duration) {
        if let Some(current) = self.screens.last_mut() {
            current.update(runtime, elapsed);
        }
    }
}
