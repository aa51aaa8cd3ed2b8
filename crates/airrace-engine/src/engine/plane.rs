use std::collections::VecDeque;

use glam::DVec2;

use crate::core::{
    Arena,
    constants::{ACCEL, DRAG, MAX_SPEED, MIN_SPEED, MISSILE_COOLDOWN, TRAIL_LEN, TURN_RATE},
    heading_vector,
};

/// A flying entity: the human's plane or the AI's.
///
/// Invariants:
///
/// - `MIN_SPEED <= speed <= MAX_SPEED` after construction and after every step.
/// - Once `alive` is `false` it stays `false` for the rest of the round.
/// - The trail never holds more than [`TRAIL_LEN`] points; the oldest point is
///   evicted first.
#[derive(Debug, Clone)]
pub struct Plane {
    pos: DVec2,
    heading: f64,
    speed: f64,
    trail: VecDeque<DVec2>,
    alive: bool,
    cooldown: f64,
}

impl Plane {
    /// Creates a live plane with an empty trail and no fire cooldown.
    ///
    /// `speed` is clamped into `[MIN_SPEED, MAX_SPEED]`.
    #[must_use]
    pub fn new(pos: DVec2, heading: f64, speed: f64) -> Self {
        Self {
            pos,
            heading,
            speed: speed.clamp(MIN_SPEED, MAX_SPEED),
            trail: VecDeque::with_capacity(TRAIL_LEN + 1),
            alive: true,
            cooldown: 0.0,
        }
    }

    #[must_use]
    pub fn pos(&self) -> DVec2 {
        self.pos
    }

    /// Heading in radians. Not normalized.
    #[must_use]
    pub fn heading(&self) -> f64 {
        self.heading
    }

    #[must_use]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Past positions, oldest first.
    pub fn trail(&self) -> impl ExactSizeIterator<Item = DVec2> + '_ {
        self.trail.iter().copied()
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Seconds left before this plane may launch another missile.
    #[must_use]
    pub fn cooldown(&self) -> f64 {
        self.cooldown
    }

    #[must_use]
    pub fn can_fire(&self) -> bool {
        self.alive && self.cooldown <= 0.0
    }

    /// Unit vector along the current heading.
    #[must_use]
    pub fn forward(&self) -> DVec2 {
        heading_vector(self.heading)
    }

    #[must_use]
    pub fn distance_to(&self, other: DVec2) -> f64 {
        self.pos.distance(other)
    }

    /// Marks the plane as destroyed. Irreversible.
    pub fn destroy(&mut self) {
        self.alive = false;
    }

    /// Starts the post-launch cooldown.
    pub fn start_cooldown(&mut self) {
        self.cooldown = MISSILE_COOLDOWN;
    }

    /// Overrides heading and speed directly.
    ///
    /// Used by scripted flight paths that do not go through the stick.
    pub fn set_course(&mut self, heading: f64, speed: f64) {
        self.heading = heading;
        self.speed = speed.clamp(MIN_SPEED, MAX_SPEED);
    }

    /// Advances the plane by `dt` seconds.
    ///
    /// `turn` and `throttle` are stick inputs in `[-1, 1]` (values outside are
    /// clamped). Drag is applied multiplicatively to the current speed, then
    /// throttle adds its contribution, then the result is clamped. A plane
    /// whose new position lies outside `arena` is destroyed; it is not moved
    /// back inside.
    pub fn step(&mut self, arena: &Arena, turn: f64, throttle: f64, dt: f64) {
        let turn = turn.clamp(-1.0, 1.0);
        let throttle = throttle.clamp(-1.0, 1.0);

        self.heading += turn * TURN_RATE * dt;
        self.speed =
            (self.speed * (1.0 - DRAG * dt) + throttle * ACCEL * dt).clamp(MIN_SPEED, MAX_SPEED);
        self.pos += heading_vector(self.heading) * self.speed * dt;

        if !arena.contains(self.pos) {
            self.alive = false;
        }

        self.trail.push_back(self.pos);
        while self.trail.len() > TRAIL_LEN {
            self.trail.pop_front();
        }

        if self.cooldown > 0.0 {
            self.cooldown = f64::max(0.0, self.cooldown - dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::*;

    fn plane_at(x: f64, y: f64, heading: f64, speed: f64) -> Plane {
        Plane::new(DVec2::new(x, y), heading, speed)
    }

    #[test]
    fn test_speed_stays_in_range() {
        let arena = Arena::STANDARD;
        for &speed in &[MIN_SPEED, 50.0, 171.6, MAX_SPEED] {
            for &throttle in &[-1.0, -0.3, 0.0, 0.5, 1.0] {
                for &dt in &[0.0, 1.0 / 120.0, 1.0 / 30.0, 0.5, 3.0] {
                    let mut plane = plane_at(490.0, 280.0, 0.0, speed);
                    plane.step(&arena, 0.0, throttle, dt);
                    assert!(
                        (MIN_SPEED..=MAX_SPEED).contains(&plane.speed()),
                        "speed {} out of range (start {speed}, throttle {throttle}, dt {dt})",
                        plane.speed()
                    );
                }
            }
        }
    }

    #[test]
    fn test_straight_flight() {
        let mut plane = plane_at(100.0, 100.0, 0.0, 100.0);
        plane.step(&Arena::STANDARD, 0.0, 0.0, 0.5);
        let expected_speed = 100.0 * (1.0 - DRAG * 0.5);
        assert!((plane.speed() - expected_speed).abs() < 1e-12);
        assert!((plane.pos().x - (100.0 + expected_speed * 0.5)).abs() < 1e-9);
        assert!((plane.pos().y - 100.0).abs() < 1e-9);
        assert!(plane.is_alive());
    }

    #[test]
    fn test_turn_changes_heading() {
        let mut plane = plane_at(400.0, 300.0, 0.0, 100.0);
        plane.step(&Arena::STANDARD, 1.0, 0.0, 0.25);
        assert!((plane.heading() - TURN_RATE * 0.25).abs() < 1e-12);
        plane.step(&Arena::STANDARD, -3.0, 0.0, 0.25);
        assert!(plane.heading().abs() < 1e-12, "turn input is clamped");
    }

    #[test]
    fn test_dies_at_edge() {
        let mut plane = plane_at(0.5, 10.0, PI, 50.0);
        plane.step(&Arena::STANDARD, 0.0, 0.0, 1.0);
        assert!(!plane.is_alive());
        assert!(plane.pos().x < 0.0, "no wrap or bounce");
    }

    #[test]
    fn test_inside_keeps_alive_flag() {
        let mut plane = plane_at(400.0, 300.0, 0.0, 50.0);
        plane.destroy();
        plane.step(&Arena::STANDARD, 0.0, 0.0, 0.1);
        assert!(!plane.is_alive(), "death is permanent");
    }

    #[test]
    fn test_trail_is_bounded() {
        let mut plane = plane_at(100.0, 280.0, 0.0, MIN_SPEED);
        for _ in 0..(TRAIL_LEN + 30) {
            plane.step(&Arena::STANDARD, 0.0, -1.0, 0.01);
        }
        assert_eq!(plane.trail().len(), TRAIL_LEN);
        assert_eq!(plane.trail().last(), Some(plane.pos()));
    }

    #[test]
    fn test_cooldown_floors_at_zero() {
        let mut plane = plane_at(400.0, 300.0, 0.0, 50.0);
        plane.start_cooldown();
        assert!(!plane.can_fire());
        plane.step(&Arena::STANDARD, 0.0, 0.0, 1.0);
        assert!((plane.cooldown() - (MISSILE_COOLDOWN - 1.0)).abs() < 1e-12);
        plane.step(&Arena::STANDARD, 0.0, 0.0, 1.0);
        assert!(plane.cooldown().abs() < f64::EPSILON);
        assert!(plane.can_fire());
    }
}
