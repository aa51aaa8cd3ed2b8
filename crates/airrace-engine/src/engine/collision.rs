//! Hit detection and scoring.
//!
//! Two kinds of collisions are resolved every tick:
//!
//! - **Missile hits**: an active missile within [`MISSILE_BLAST_RADIUS`] of the
//!   living plane of the other side destroys it and detonates. The shooter's
//!   side scores, but only once per round.
//! - **Mid-air collisions**: two living planes closer than twice
//!   [`PLANE_COLLIDE_RADIUS`] are both destroyed and nobody scores.
//!
//! The "already awarded" guard lives in [`Scoreboard`], so a second hit in the
//! same tick (or any later tick of the round) cannot score again.

use crate::{
    core::constants::{MISSILE_BLAST_RADIUS, PLANE_COLLIDE_RADIUS},
    engine::{
        missile::{Missile, Side},
        plane::Plane,
    },
};

/// Kill counts for the current round series plus the once-per-round guard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scoreboard {
    player: u32,
    ai: u32,
    awarded: bool,
}

impl Scoreboard {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            player: 0,
            ai: 0,
            awarded: false,
        }
    }

    #[must_use]
    pub const fn player(&self) -> u32 {
        self.player
    }

    #[must_use]
    pub const fn ai(&self) -> u32 {
        self.ai
    }

    #[must_use]
    pub const fn get(&self, side: Side) -> u32 {
        match side {
            Side::Player => self.player,
            Side::Ai => self.ai,
        }
    }

    /// Returns `true` once something has been decided this round.
    #[must_use]
    pub const fn is_awarded(&self) -> bool {
        self.awarded
    }

    /// Gives `side` a point unless this round has already been decided.
    ///
    /// Returns whether the point was given.
    pub fn award(&mut self, side: Side) -> bool {
        if self.awarded {
            return false;
        }
        match side {
            Side::Player => self.player += 1,
            Side::Ai => self.ai += 1,
        }
        self.awarded = true;
        true
    }

    /// Closes the round without giving anyone a point.
    pub fn close_round(&mut self) {
        self.awarded = true;
    }

    /// Re-arms the guard for a new round. Scores are kept.
    pub fn start_round(&mut self) {
        self.awarded = false;
    }

    /// Zeroes both scores. The guard is left untouched.
    pub fn clear_scores(&mut self) {
        self.player = 0;
        self.ai = 0;
    }
}

/// A missile that found its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub shooter: Side,
    /// Whether this hit earned the shooter a point.
    pub scored: bool,
}

/// Everything that was destroyed during one resolver pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionOutcome {
    pub hits: Vec<Hit>,
    pub mid_air: bool,
}

impl CollisionOutcome {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty() && !self.mid_air
    }
}

/// Runs both collision checks, missile hits first.
pub fn resolve(
    player: &mut Plane,
    ai: &mut Plane,
    missiles: &mut [Missile],
    scoreboard: &mut Scoreboard,
) -> CollisionOutcome {
    let hits = resolve_missile_hits(player, ai, missiles, scoreboard);
    let mid_air = resolve_mid_air(player, ai, scoreboard);
    CollisionOutcome { hits, mid_air }
}

/// Detonates every active missile that is within blast radius of the living
/// plane of the opposing side.
pub fn resolve_missile_hits(
    player: &mut Plane,
    ai: &mut Plane,
    missiles: &mut [Missile],
    scoreboard: &mut Scoreboard,
) -> Vec<Hit> {
    let mut hits = vec![];
    for missile in missiles.iter_mut().filter(|m| m.is_active()) {
        let target = match missile.owner() {
            Side::Player => &mut *ai,
            Side::Ai => &mut *player,
        };
        if !target.is_alive() || target.distance_to(missile.pos()) > MISSILE_BLAST_RADIUS {
            continue;
        }
        target.destroy();
        missile.detonate();
        let scored = scoreboard.award(missile.owner());
        hits.push(Hit {
            shooter: missile.owner(),
            scored,
        });
    }
    hits
}

/// Destroys both planes if they are alive and touching. Nobody scores.
///
/// Returns `true` if the collision happened.
pub fn resolve_mid_air(player: &mut Plane, ai: &mut Plane, scoreboard: &mut Scoreboard) -> bool {
    if !player.is_alive() || !ai.is_alive() {
        return false;
    }
    if player.distance_to(ai.pos()) > PLANE_COLLIDE_RADIUS * 2.0 {
        return false;
    }
    player.destroy();
    ai.destroy();
    scoreboard.close_round();
    true
}
