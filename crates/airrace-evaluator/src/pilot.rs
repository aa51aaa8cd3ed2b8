use airrace_engine::{Missile, Pilot, Plane, Steering};
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::{policy::Policy, tactics};

/// Flies the AI plane of a live session from a [`Policy`].
///
/// The policy is swapped whenever the learner publishes a new mean. The
/// pilot owns the generator used for break-side choices.
#[derive(Debug, Clone)]
pub struct PolicyPilot {
    policy: Policy,
    rng: Pcg32,
}

impl PolicyPilot {
    #[must_use]
    pub fn new(policy: Policy) -> Self {
        Self::with_rng(policy, Pcg32::from_rng(&mut rand::rng()))
    }

    #[must_use]
    pub fn with_rng(policy: Policy, rng: Pcg32) -> Self {
        Self { policy, rng }
    }

    #[must_use]
    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn set_policy(&mut self, policy: Policy) {
        self.policy = policy;
    }
}

impl Pilot for PolicyPilot {
    fn steer(&mut self, own: &Plane, foe: &Plane, threat: Option<&Missile>, clock: f64) -> Steering {
        let pursuit = tactics::pursuit(&self.policy, own, foe, clock);
        let evasion = tactics::evasion(&self.policy, own, threat, clock, &mut self.rng);
        tactics::combine(pursuit, evasion)
    }

    fn should_fire(&self, own: &Plane, foe: &Plane) -> bool {
        tactics::should_fire(&self.policy, own, foe)
    }
}

#[cfg(test)]
mod tests {
    use airrace_engine::{Side, constants::MIN_SPEED};
    use glam::DVec2;

    use super::*;

    #[test]
    fn test_steer_without_threat_is_pursuit() {
        let mut pilot = PolicyPilot::with_rng(Policy::INITIAL_MEAN, Pcg32::seed_from_u64(3));
        let own = Plane::new(DVec2::new(600.0, 280.0), 0.0, MIN_SPEED);
        let foe = Plane::new(DVec2::new(300.0, 200.0), 0.0, MIN_SPEED);
        let steering = pilot.steer(&own, &foe, None, 0.7);
        assert_eq!(
            steering,
            tactics::pursuit(&Policy::INITIAL_MEAN, &own, &foe, 0.7)
        );
    }

    #[test]
    fn test_steer_adds_evasion_throttle() {
        let mut pilot = PolicyPilot::with_rng(Policy::INITIAL_MEAN, Pcg32::seed_from_u64(3));
        let own = Plane::new(DVec2::new(600.0, 280.0), 0.0, MIN_SPEED);
        let foe = Plane::new(DVec2::new(300.0, 280.0), 0.0, MIN_SPEED);
        let threat = Missile::new(Side::Player, DVec2::new(500.0, 280.0), 0.0, 320.0, 7.0);
        let plain = tactics::pursuit(&Policy::INITIAL_MEAN, &own, &foe, 0.0);
        let steering = pilot.steer(&own, &foe, Some(&threat), 0.0);
        assert!((steering.throttle - (plain.throttle + 0.3).min(1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_set_policy_changes_fire_decision() {
        let own = Plane::new(DVec2::new(100.0, 100.0), 0.0, MIN_SPEED);
        let foe = Plane::new(DVec2::new(200.0, 175.0), 0.0, MIN_SPEED);
        let mut pilot = PolicyPilot::new(Policy {
            fire_bias: 0.0,
            ..Policy::INITIAL_MEAN
        });
        assert!(!pilot.should_fire(&own, &foe));
        pilot.set_policy(Policy {
            fire_bias: 1.0,
            ..Policy::INITIAL_MEAN
        });
        assert!(pilot.should_fire(&own, &foe));
        assert!((pilot.policy().fire_bias - 1.0).abs() < f64::EPSILON);
    }
}
