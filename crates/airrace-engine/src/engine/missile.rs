use glam::DVec2;

use crate::{
    core::{
        Arena,
        constants::{MISSILE_SPAWN_OFFSET, MISSILE_SPEED, MISSILE_TTL},
        heading_vector,
    },
    engine::plane::Plane,
};

/// The two sides of a dogfight.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display, derive_more::IsVariant,
)]
pub enum Side {
    #[display("player")]
    Player,
    #[display("ai")]
    Ai,
}

impl Side {
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Side::Player => Side::Ai,
            Side::Ai => Side::Player,
        }
    }
}

/// A straight-flying missile.
///
/// Heading and speed are fixed at launch. The missile deactivates exactly
/// once, when it leaves the arena, runs out of time to live, or detonates;
/// an inactive missile never moves again.
#[derive(Debug, Clone)]
pub struct Missile {
    pos: DVec2,
    heading: f64,
    speed: f64,
    owner: Side,
    ttl: f64,
    active: bool,
}

impl Missile {
    #[must_use]
    pub fn new(owner: Side, pos: DVec2, heading: f64, speed: f64, ttl: f64) -> Self {
        Self {
            pos,
            heading,
            speed,
            owner,
            ttl,
            active: true,
        }
    }

    /// Fires a missile from the nose of `shooter` and starts its cooldown.
    ///
    /// Callers decide whether the shot is allowed; this does not check the
    /// cooldown or the lock range.
    pub fn launch(owner: Side, shooter: &mut Plane) -> Self {
        let pos = shooter.pos() + heading_vector(shooter.heading()) * MISSILE_SPAWN_OFFSET;
        shooter.start_cooldown();
        Self::new(owner, pos, shooter.heading(), MISSILE_SPEED, MISSILE_TTL)
    }

    #[must_use]
    pub fn pos(&self) -> DVec2 {
        self.pos
    }

    #[must_use]
    pub fn heading(&self) -> f64 {
        self.heading
    }

    #[must_use]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    #[must_use]
    pub fn owner(&self) -> Side {
        self.owner
    }

    #[must_use]
    pub fn ttl(&self) -> f64 {
        self.ttl
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Deactivates the missile after it hit something.
    pub fn detonate(&mut self) {
        self.active = false;
    }

    /// Advances the missile by `dt` seconds along its launch heading.
    ///
    /// Does nothing once the missile is inactive.
    pub fn step(&mut self, arena: &Arena, dt: f64) {
        if !self.active {
            return;
        }
        self.pos += heading_vector(self.heading) * self.speed * dt;
        self.ttl -= dt;
        if !arena.contains(self.pos) || self.ttl <= 0.0 {
            self.active = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use crate::core::constants::{ARENA_HEIGHT, ARENA_WIDTH, MISSILE_COOLDOWN};

    use super::*;

    #[test]
    fn test_flies_straight() {
        let mut missile = Missile::new(Side::Ai, DVec2::new(100.0, 100.0), 0.0, 100.0, 1.0);
        missile.step(&Arena::STANDARD, 0.5);
        assert!(missile.pos().x > 100.0);
        assert!((missile.pos().y - 100.0).abs() < 1e-6);
        assert!(missile.is_active());
    }

    #[test]
    fn test_heading_never_changes() {
        let heading = 0.731_f64;
        let mut missile = Missile::new(Side::Player, DVec2::new(10.0, 10.0), heading, 50.0, 7.0);
        for _ in 0..200 {
            missile.step(&Arena::STANDARD, 1.0 / 60.0);
        }
        assert_eq!(missile.heading().to_bits(), heading.to_bits());
    }

    #[test]
    fn test_deactivates_out_of_bounds() {
        let mut missile = Missile::new(
            Side::Ai,
            DVec2::new(ARENA_WIDTH - 1.0, ARENA_HEIGHT / 2.0),
            0.0,
            MISSILE_SPEED,
            100.0,
        );
        missile.step(&Arena::STANDARD, 0.1);
        assert!(!missile.is_active());
    }

    #[test]
    fn test_deactivates_on_ttl() {
        let mut missile = Missile::new(Side::Ai, DVec2::new(100.0, 100.0), 0.0, 1.0, 0.05);
        missile.step(&Arena::STANDARD, 0.05);
        assert!(!missile.is_active());
    }

    #[test]
    fn test_inactive_is_inert() {
        let mut missile = Missile::new(Side::Ai, DVec2::new(100.0, 100.0), PI, 100.0, 5.0);
        missile.detonate();
        missile.step(&Arena::STANDARD, 0.5);
        assert_eq!(missile.pos(), DVec2::new(100.0, 100.0));
        assert!(!missile.is_active());
    }

    #[test]
    fn test_launch_from_nose() {
        let mut shooter = Plane::new(DVec2::new(200.0, 200.0), PI / 2.0, 100.0);
        let missile = Missile::launch(Side::Player, &mut shooter);
        assert!((missile.pos().x - 200.0).abs() < 1e-9);
        assert!((missile.pos().y - (200.0 + MISSILE_SPAWN_OFFSET)).abs() < 1e-9);
        assert_eq!(missile.owner(), Side::Player);
        assert!((shooter.cooldown() - MISSILE_COOLDOWN).abs() < f64::EPSILON);
    }
}
