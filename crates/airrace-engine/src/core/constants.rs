//! Tuning constants of the flight, missile and round model.
//!
//! Distances are in arena units, times in seconds, angles in radians.

use std::f64::consts::PI;

/// Arena width.
pub const ARENA_WIDTH: f64 = 980.0;
/// Arena height.
pub const ARENA_HEIGHT: f64 = 560.0;

/// Largest simulation step accepted from a single rendered frame.
pub const DT_CAP: f64 = 1.0 / 30.0;

pub const MAX_SPEED: f64 = 220.0;
pub const MIN_SPEED: f64 = 28.0;
/// Speed gained per second at full throttle.
pub const ACCEL: f64 = 120.0;
/// Fraction of speed lost per second.
pub const DRAG: f64 = 0.02;
/// Heading change per second at full stick.
pub const TURN_RATE: f64 = PI;

pub const MISSILE_SPEED: f64 = 320.0;
/// Failsafe lifetime; missiles normally leave the arena first.
pub const MISSILE_TTL: f64 = 7.0;
pub const MISSILE_BLAST_RADIUS: f64 = 22.0;
/// A shot may only be taken when the target is at most this far away.
pub const MISSILE_LOCK_RANGE: f64 = 260.0;
pub const MISSILE_COOLDOWN: f64 = 1.4;
/// Missiles appear this far ahead of the shooter's nose.
pub const MISSILE_SPAWN_OFFSET: f64 = 14.0;

/// Roughly half a plane's length; two planes closer than twice this collide.
pub const PLANE_COLLIDE_RADIUS: f64 = 18.0;

/// Number of past positions kept for drawing trails.
pub const TRAIL_LEN: usize = 120;

/// Pause before a new round when the human player was shot down.
pub const PLAYER_DEATH_RESET_DELAY: f64 = 2.2;
/// Pause before a new round for every other round ending.
pub const ROUND_RESET_DELAY: f64 = 0.6;

/// Maximum number of highscores kept.
pub const HIGHSCORE_LEN: usize = 5;
