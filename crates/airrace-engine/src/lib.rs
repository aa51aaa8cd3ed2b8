//! Dogfight physics and game-state core.
//!
//! Everything in this crate is deterministic given its inputs. Numeric values
//! that would leave their valid range are clamped rather than rejected, so
//! the simulation API has no error cases; the only fallible operation is
//! highscore storage, whose failures are swallowed.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;
