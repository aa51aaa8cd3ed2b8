//! Flight model, missiles, collisions and the live session.
//!
//! - [`Plane`] - Kinematics of a flying entity (heading, speed, trail, death at the edge)
//! - [`Missile`] - Straight-flying projectile with a time to live
//! - [`collision`] - Missile hits, mid-air collisions and the [`Scoreboard`]
//! - [`Highscores`] - Persisted top-5 list of player round scores
//! - [`DogfightSession`] - One live player-vs-AI session, advanced once per frame
//!
//! The AI itself is not part of this crate. A session asks a [`Pilot`] for
//! the AI's stick inputs and fire decisions every tick.

pub use self::{
    collision::{CollisionOutcome, Hit, Scoreboard},
    controls::*,
    highscore::*,
    missile::*,
    plane::*,
    session::*,
};

pub mod collision;
mod controls;
mod highscore;
mod missile;
mod plane;
mod session;
