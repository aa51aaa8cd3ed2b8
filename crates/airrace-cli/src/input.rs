//! Held-key tracking for the flight controls.
//!
//! Most terminals only report key presses (and auto-repeats), never
//! releases. When the terminal cannot report releases, a key counts as held
//! for [`FIRST_HOLD_WINDOW`] after the initial press, which covers the OS
//! delay before auto-repeat starts, and for [`HOLD_WINDOW`] after each
//! repeat.

use std::time::{Duration, Instant};

use airrace_engine::Controls;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

pub const FIRST_HOLD_WINDOW: Duration = Duration::from_millis(500);
pub const HOLD_WINDOW: Duration = Duration::from_millis(150);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlightKey {
    Left,
    Right,
    Up,
    Down,
    Fire,
}

impl FlightKey {
    const COUNT: usize = 5;

    fn from_code(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Left => Some(Self::Left),
            KeyCode::Right => Some(Self::Right),
            KeyCode::Up => Some(Self::Up),
            KeyCode::Down => Some(Self::Down),
            KeyCode::Char(' ') => Some(Self::Fire),
            _ => None,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy)]
struct Held {
    at: Instant,
    repeated: bool,
}

impl Held {
    fn window(self) -> Duration {
        if self.repeated {
            HOLD_WINDOW
        } else {
            FIRST_HOLD_WINDOW
        }
    }
}

/// Turns key events into the per-frame [`Controls`] state.
#[derive(Debug, Clone)]
pub struct KeyTracker {
    release_events: bool,
    held: [Option<Held>; FlightKey::COUNT],
}

impl KeyTracker {
    /// `release_events` tells whether the terminal reports key releases.
    pub fn new(release_events: bool) -> Self {
        Self {
            release_events,
            held: [None; FlightKey::COUNT],
        }
    }

    pub fn set_release_events(&mut self, release_events: bool) {
        self.release_events = release_events;
    }

    /// Records a key event. Returns `true` if it was a flight key.
    pub fn handle(&mut self, event: &KeyEvent, now: Instant) -> bool {
        let Some(key) = FlightKey::from_code(event.code) else {
            return false;
        };
        // Without release events, auto-repeats arrive as presses.
        let repeated = match event.kind {
            KeyEventKind::Press => self.is_held(key, now),
            KeyEventKind::Repeat => true,
            KeyEventKind::Release => {
                self.held[key.index()] = None;
                return true;
            }
        };
        self.held[key.index()] = Some(Held { at: now, repeated });
        true
    }

    /// Releases every key, e.g. when the game loses focus.
    pub fn clear(&mut self) {
        self.held = [None; FlightKey::COUNT];
    }

    fn is_held(&self, key: FlightKey, now: Instant) -> bool {
        match self.held[key.index()] {
            None => false,
            Some(_) if self.release_events => true,
            Some(held) => now.saturating_duration_since(held.at) < held.window(),
        }
    }

    pub fn controls(&self, now: Instant) -> Controls {
        Controls {
            left: self.is_held(FlightKey::Left, now),
            right: self.is_held(FlightKey::Right, now),
            up: self.is_held(FlightKey::Up, now),
            down: self.is_held(FlightKey::Down, now),
            fire: self.is_held(FlightKey::Fire, now),
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyEventState, KeyModifiers};

    use super::*;

    fn event(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_hold_window_without_release_events() {
        let mut keys = KeyTracker::new(false);
        let t0 = Instant::now();
        assert!(keys.handle(&event(KeyCode::Left, KeyEventKind::Press), t0));

        // survives the usual delay before auto-repeat starts
        assert!(keys.controls(t0 + Duration::from_millis(400)).left);
        assert!(!keys.controls(t0 + Duration::from_millis(600)).left);

        // auto-repeat keeps it alive
        keys.handle(&event(KeyCode::Left, KeyEventKind::Press), t0 + Duration::from_millis(450));
        assert!(keys.controls(t0 + Duration::from_millis(580)).left);
        assert!(!keys.controls(t0 + Duration::from_millis(620)).left);
    }

    #[test]
    fn test_repeat_uses_short_window() {
        let mut keys = KeyTracker::new(false);
        let t0 = Instant::now();
        keys.handle(&event(KeyCode::Up, KeyEventKind::Press), t0);
        let t1 = t0 + Duration::from_millis(300);
        keys.handle(&event(KeyCode::Up, KeyEventKind::Repeat), t1);
        assert!(keys.controls(t1 + Duration::from_millis(100)).up);
        assert!(!keys.controls(t1 + Duration::from_millis(200)).up);

        // a fresh press after the key went idle gets the long window again
        let t2 = t1 + Duration::from_secs(2);
        keys.handle(&event(KeyCode::Up, KeyEventKind::Press), t2);
        assert!(keys.controls(t2 + Duration::from_millis(400)).up);
    }

    #[test]
    fn test_release_events_hold_until_released() {
        let mut keys = KeyTracker::new(true);
        let t0 = Instant::now();
        keys.handle(&event(KeyCode::Char(' '), KeyEventKind::Press), t0);
        keys.handle(&event(KeyCode::Up, KeyEventKind::Press), t0);
        let later = t0 + Duration::from_secs(5);
        let controls = keys.controls(later);
        assert!(controls.fire);
        assert!(controls.up);

        keys.handle(&event(KeyCode::Char(' '), KeyEventKind::Release), later);
        let controls = keys.controls(later);
        assert!(!controls.fire);
        assert!(controls.up);
    }

    #[test]
    fn test_other_keys_are_ignored() {
        let mut keys = KeyTracker::new(true);
        let t0 = Instant::now();
        assert!(!keys.handle(&event(KeyCode::Char('p'), KeyEventKind::Press), t0));
        assert_eq!(keys.controls(t0), Controls::default());
    }

    #[test]
    fn test_clear() {
        let mut keys = KeyTracker::new(true);
        let t0 = Instant::now();
        keys.handle(&event(KeyCode::Right, KeyEventKind::Press), t0);
        keys.handle(&event(KeyCode::Down, KeyEventKind::Press), t0);
        keys.clear();
        assert_eq!(keys.controls(t0), Controls::default());
    }
}
