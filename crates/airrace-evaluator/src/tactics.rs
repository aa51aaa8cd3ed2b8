//! Stateless control laws parameterized by a [`Policy`].
//!
//! Each function maps (policy, own plane, foe or threat, time) to a decision.
//! The only randomness is the break side picked by [`evasion`]; pass it
//! explicitly through [`evasion_toward`] to get a fully deterministic result.

use std::f64::consts::{FRAC_PI_2, TAU};

use airrace_engine::{
    Missile, Plane, Steering, ang_wrap, bearing,
    constants::{MAX_SPEED, MISSILE_LOCK_RANGE},
    lerp,
};
use glam::DVec2;
use rand::Rng;

use crate::policy::Policy;

/// Weight of the bearing error in the pursuit turn command.
const BEARING_GAIN: f64 = 1.2;
/// Weight of the orbit bias in the pursuit turn command.
const ORBIT_GAIN: f64 = 0.8;
/// Half-width of the dead zone around the engagement radius, as a fraction.
const ORBIT_DEAD_ZONE: f64 = 0.15;
/// Cruise speed the pursuit throttle aims for, as a fraction of `MAX_SPEED`.
const CRUISE_FRACTION: f64 = 0.78;
/// Facing threshold at `fire_bias == 0`.
const CAUTIOUS_FACING: f64 = 0.92;
/// Facing threshold at `fire_bias == 1`.
const AGGRESSIVE_FACING: f64 = 0.65;
/// Threats farther than this fraction of the lock range are ignored.
const EVASION_RANGE_FRACTION: f64 = 0.9;
const EVASION_THROTTLE: f64 = 0.3;

/// Chases `foe` while keeping to the policy's engagement radius.
#[must_use]
pub fn pursuit(policy: &Policy, own: &Plane, foe: &Plane, t: f64) -> Steering {
    let distance = own.distance_to(foe.pos());
    let error = ang_wrap(bearing(own.pos(), foe.pos()) - own.heading());
    let orbit = if distance < policy.engagement_radius * (1.0 - ORBIT_DEAD_ZONE) {
        -1.0
    } else if distance > policy.engagement_radius * (1.0 + ORBIT_DEAD_ZONE) {
        1.0
    } else {
        0.0
    };
    let base = (error * BEARING_GAIN + orbit * ORBIT_GAIN).clamp(-1.0, 1.0);
    let weave = policy.weave_amplitude * (TAU * policy.weave_frequency * t).sin();
    let turn = (base + weave).clamp(-1.0, 1.0);
    let throttle = ((MAX_SPEED * CRUISE_FRACTION - own.speed()) / MAX_SPEED).clamp(-1.0, 1.0);
    Steering { turn, throttle }
}

/// Returns whether `own` is ready, in range and pointed closely enough at
/// `foe` to launch.
///
/// The required facing (cosine between heading and line of sight) slides
/// from 0.92 at `fire_bias == 0` to 0.65 at `fire_bias == 1`.
#[must_use]
pub fn should_fire(policy: &Policy, own: &Plane, foe: &Plane) -> bool {
    if own.cooldown() > 0.0 {
        return false;
    }
    let rel = foe.pos() - own.pos();
    let distance = rel.length();
    if distance > MISSILE_LOCK_RANGE {
        return false;
    }
    let line_of_sight = if distance > 0.0 {
        rel / distance
    } else {
        DVec2::ZERO
    };
    let facing = own.forward().dot(line_of_sight);
    facing >= lerp(CAUTIOUS_FACING, AGGRESSIVE_FACING, policy.fire_bias)
}

/// Side of the threat's line of sight to break towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum BreakSide {
    #[display("left")]
    Left,
    #[display("right")]
    Right,
}

impl BreakSide {
    /// Picks a side with equal probability.
    pub fn random<R>(rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        if rng.random_bool(0.5) {
            Self::Left
        } else {
            Self::Right
        }
    }

    fn offset(self) -> f64 {
        match self {
            Self::Left => FRAC_PI_2,
            Self::Right => -FRAC_PI_2,
        }
    }
}

/// Corrective inputs added on top of [`pursuit`] while a missile is close.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EvasionCommand {
    pub evading: bool,
    pub turn_bias: f64,
    pub throttle_bias: f64,
}

impl EvasionCommand {
    pub const NONE: Self = Self {
        evading: false,
        turn_bias: 0.0,
        throttle_bias: 0.0,
    };
}

/// Breaks perpendicular to an incoming missile, picking the side at random.
pub fn evasion<R>(
    policy: &Policy,
    own: &Plane,
    threat: Option<&Missile>,
    t: f64,
    rng: &mut R,
) -> EvasionCommand
where
    R: Rng + ?Sized,
{
    match threat {
        Some(missile) if is_close_threat(own, missile) => {
            evasion_toward(policy, own, missile, t, BreakSide::random(rng))
        }
        _ => EvasionCommand::NONE,
    }
}

/// Deterministic form of [`evasion`] with the break side fixed by the caller.
#[must_use]
pub fn evasion_toward(
    policy: &Policy,
    own: &Plane,
    threat: &Missile,
    t: f64,
    side: BreakSide,
) -> EvasionCommand {
    if !is_close_threat(own, threat) {
        return EvasionCommand::NONE;
    }
    let line_of_sight = bearing(own.pos(), threat.pos());
    let target_heading = ang_wrap(line_of_sight + side.offset());
    let error = ang_wrap(target_heading - own.heading());
    let gain = BEARING_GAIN + BEARING_GAIN * policy.break_aggression;
    let break_turn = (error * gain).clamp(-1.0, 1.0);
    let jink = policy.weave_amplitude * 1.2 * (TAU * (policy.weave_frequency * 1.3) * t + 1.7).sin();
    EvasionCommand {
        evading: true,
        turn_bias: (break_turn + jink).clamp(-1.0, 1.0),
        throttle_bias: EVASION_THROTTLE,
    }
}

fn is_close_threat(own: &Plane, threat: &Missile) -> bool {
    own.distance_to(threat.pos()) <= MISSILE_LOCK_RANGE * EVASION_RANGE_FRACTION
}

/// Pursuit plus evasion, summed and clamped to the stick range.
#[must_use]
pub fn combine(pursuit: Steering, evasion: EvasionCommand) -> Steering {
    if !evasion.evading {
        return pursuit;
    }
    Steering {
        turn: (pursuit.turn + evasion.turn_bias).clamp(-1.0, 1.0),
        throttle: (pursuit.throttle + evasion.throttle_bias).clamp(-1.0, 1.0),
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use airrace_engine::{Side, constants::MIN_SPEED};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use super::*;

    fn calm() -> Policy {
        Policy {
            weave_amplitude: 0.0,
            ..Policy::INITIAL_MEAN
        }
    }

    fn plane(x: f64, y: f64, heading: f64) -> Plane {
        Plane::new(DVec2::new(x, y), heading, MIN_SPEED)
    }

    fn missile(x: f64, y: f64) -> Missile {
        Missile::new(Side::Player, DVec2::new(x, y), 0.0, 320.0, 7.0)
    }

    #[test]
    fn test_pursuit_turns_toward_foe() {
        let policy = Policy {
            engagement_radius: 200.0,
            ..calm()
        };
        let own = plane(100.0, 100.0, 0.0);
        let foe = plane(300.0, 300.0, 0.0);
        let steering = pursuit(&policy, &own, &foe, 0.0);
        assert!(steering.turn > 0.0, "foe is at +y, turn positive");

        let foe = plane(300.0, -100.0, 0.0);
        let steering = pursuit(&policy, &own, &foe, 0.0);
        assert!(steering.turn < 0.0);
    }

    #[test]
    fn test_pursuit_orbits_out_when_too_close() {
        let policy = Policy {
            engagement_radius: 300.0,
            ..calm()
        };
        let own = plane(100.0, 100.0, 0.0);
        let foe = plane(150.0, 100.0, 0.0);
        let steering = pursuit(&policy, &own, &foe, 0.0);
        assert!((steering.turn + ORBIT_GAIN).abs() < 1e-12);
    }

    #[test]
    fn test_pursuit_dead_zone() {
        let policy = Policy {
            engagement_radius: 200.0,
            ..calm()
        };
        let own = plane(100.0, 100.0, 0.0);
        let foe = plane(300.0, 100.0, 0.0);
        let steering = pursuit(&policy, &own, &foe, 0.0);
        assert!(steering.turn.abs() < 1e-12, "on radius, dead ahead");
    }

    #[test]
    fn test_pursuit_throttle_targets_cruise_speed() {
        let own = plane(100.0, 100.0, 0.0);
        let foe = plane(300.0, 100.0, 0.0);
        let steering = pursuit(&calm(), &own, &foe, 0.0);
        let expected = (MAX_SPEED * 0.78 - MIN_SPEED) / MAX_SPEED;
        assert!((steering.throttle - expected).abs() < 1e-12);

        let fast = Plane::new(DVec2::new(100.0, 100.0), 0.0, MAX_SPEED);
        assert!(pursuit(&calm(), &fast, &foe, 0.0).throttle < 0.0);
    }

    #[test]
    fn test_pursuit_weave_stays_clamped() {
        let policy = Policy {
            weave_amplitude: 1.8,
            weave_frequency: 0.25,
            ..Policy::INITIAL_MEAN
        };
        let own = plane(100.0, 100.0, 0.0);
        let foe = plane(100.0, 400.0, 0.0);
        let steering = pursuit(&policy, &own, &foe, 1.0);
        assert!((steering.turn - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_should_fire_needs_aim_and_range() {
        let policy = Policy {
            fire_bias: 0.0,
            ..calm()
        };
        let own = plane(100.0, 100.0, 0.0);
        assert!(should_fire(&policy, &own, &plane(300.0, 100.0, 0.0)));
        assert!(!should_fire(&policy, &own, &plane(400.0, 100.0, 0.0)), "out of lock range");
        assert!(!should_fire(&policy, &own, &plane(200.0, 150.0, 0.0)), "not facing");
    }

    #[test]
    fn test_should_fire_bias_loosens_facing() {
        // facing = cos(atan(0.75)) = 0.8
        let own = plane(100.0, 100.0, 0.0);
        let foe = plane(200.0, 175.0, 0.0);
        let cautious = Policy {
            fire_bias: 0.0,
            ..calm()
        };
        let aggressive = Policy {
            fire_bias: 1.0,
            ..calm()
        };
        assert!(!should_fire(&cautious, &own, &foe));
        assert!(should_fire(&aggressive, &own, &foe));
    }

    #[test]
    fn test_should_fire_respects_cooldown() {
        let mut own = plane(100.0, 100.0, 0.0);
        let foe = plane(200.0, 100.0, 0.0);
        own.start_cooldown();
        assert!(!should_fire(&calm(), &own, &foe));
    }

    #[test]
    fn test_should_fire_is_deterministic() {
        let own = plane(100.0, 100.0, 0.3);
        let foe = plane(250.0, 160.0, 0.0);
        let first = should_fire(&calm(), &own, &foe);
        for _ in 0..10 {
            assert_eq!(should_fire(&calm(), &own, &foe), first);
        }
    }

    #[test]
    fn test_evasion_ignores_far_or_missing_threat() {
        let own = plane(100.0, 100.0, 0.0);
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(evasion(&calm(), &own, None, 0.0, &mut rng), EvasionCommand::NONE);
        let far = missile(100.0 + MISSILE_LOCK_RANGE * 0.95, 100.0);
        assert_eq!(
            evasion(&calm(), &own, Some(&far), 0.0, &mut rng),
            EvasionCommand::NONE
        );
    }

    #[test]
    fn test_evasion_breaks_perpendicular() {
        let policy = Policy {
            break_aggression: 1.0,
            ..calm()
        };
        // missile dead ahead; breaking left means turning to +y
        let own = plane(100.0, 100.0, 0.0);
        let threat = missile(200.0, 100.0);
        let left = evasion_toward(&policy, &own, &threat, 0.0, BreakSide::Left);
        assert!(left.evading);
        assert!((left.turn_bias - 1.0).abs() < 1e-12);
        assert!((left.throttle_bias - 0.3).abs() < 1e-12);
        let right = evasion_toward(&policy, &own, &threat, 0.0, BreakSide::Right);
        assert!((right.turn_bias + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_evasion_same_draws_same_result() {
        let own = plane(100.0, 100.0, PI / 3.0);
        let threat = missile(180.0, 40.0);
        let a = evasion(&Policy::INITIAL_MEAN, &own, Some(&threat), 1.3, &mut Pcg32::seed_from_u64(9));
        let b = evasion(&Policy::INITIAL_MEAN, &own, Some(&threat), 1.3, &mut Pcg32::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn test_combine_adds_and_clamps() {
        let pursuit = Steering {
            turn: 0.8,
            throttle: 0.9,
        };
        let evade = EvasionCommand {
            evading: true,
            turn_bias: 0.5,
            throttle_bias: 0.3,
        };
        let sum = combine(pursuit, evade);
        assert!((sum.turn - 1.0).abs() < f64::EPSILON);
        assert!((sum.throttle - 1.0).abs() < f64::EPSILON);
        assert_eq!(combine(pursuit, EvasionCommand::NONE), pursuit);
    }
}
