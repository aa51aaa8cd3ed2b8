use glam::DVec2;

use crate::core::constants::{ARENA_HEIGHT, ARENA_WIDTH};

/// The rectangular flying area `[0, width] × [0, height]`.
///
/// There is no wrap-around and no bouncing: leaving the rectangle on any
/// axis is fatal for planes and ends the flight of missiles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arena {
    width: f64,
    height: f64,
}

impl Default for Arena {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl Arena {
    pub const STANDARD: Self = Self {
        width: ARENA_WIDTH,
        height: ARENA_HEIGHT,
    };

    #[must_use]
    pub const fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> f64 {
        self.height
    }

    /// Returns the point at the given fraction of the arena size.
    #[must_use]
    pub fn at(&self, fx: f64, fy: f64) -> DVec2 {
        DVec2::new(self.width * fx, self.height * fy)
    }

    /// Returns `true` if `pos` lies inside the arena, edges included.
    #[must_use]
    pub fn contains(&self, pos: DVec2) -> bool {
        (0.0..=self.width).contains(&pos.x) && (0.0..=self.height).contains(&pos.y)
    }
}
