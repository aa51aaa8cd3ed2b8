//! Headless fitness scoring of a policy.
//!
//! The AI flies against a scripted target that circles gently at a fixed
//! speed and never shoots back. Fitness is the simulated time until the AI's
//! missile reaches the target, so lower is better:
//!
//! ```text
//! missile hits target            -> time of the hit
//! target leaves the arena        -> time it left (counts as a kill)
//! AI leaves the arena            -> penalty (cap + 2)
//! nothing happens before the cap -> cap
//! ```
//!
//! Only one missile may be in flight at a time.

use std::fmt;

use airrace_engine::{
    Arena, Missile, Plane, Side,
    constants::{MIN_SPEED, MISSILE_BLAST_RADIUS},
};

use crate::{policy::Policy, tactics};

/// Fixed simulation step in seconds.
pub const SCENARIO_STEP: f64 = 1.0 / 120.0;
/// Simulated time limit in seconds.
pub const SCENARIO_CAP: f64 = 20.0;
/// Fitness of a policy that flies its own plane out of the arena.
pub const SCENARIO_PENALTY: f64 = SCENARIO_CAP + 2.0;

/// Turn rate of the scripted target, in rad/s.
const TARGET_TURN_RATE: f64 = 0.4;

/// Scores a policy. Lower is better.
pub trait FitnessEvaluator: fmt::Debug + Send + Sync {
    fn evaluate(&self, policy: &Policy) -> f64;
}

/// How a scenario run ended.
#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display)]
pub enum ScenarioOutcome {
    #[display("hit after {time:.2}s")]
    Hit { time: f64 },
    #[display("target left the arena after {time:.2}s")]
    TargetCrashed { time: f64 },
    #[display("AI left the arena after {time:.2}s")]
    Crashed { time: f64 },
    #[display("no kill before the time limit")]
    Timeout,
}

/// The scripted single-target scenario.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenarioEvaluator {
    arena: Arena,
    step: f64,
    cap: f64,
    penalty: f64,
}

impl Default for ScenarioEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl ScenarioEvaluator {
    #[must_use]
    pub fn new() -> Self {
        Self::with_limits(SCENARIO_CAP, SCENARIO_PENALTY)
    }

    /// Creates an evaluator with a custom time cap and crash penalty.
    ///
    /// `penalty` should exceed `cap` so that a crash always scores worse
    /// than a timeout.
    #[must_use]
    pub fn with_limits(cap: f64, penalty: f64) -> Self {
        Self {
            arena: Arena::STANDARD,
            step: SCENARIO_STEP,
            cap,
            penalty,
        }
    }

    #[must_use]
    pub fn cap(&self) -> f64 {
        self.cap
    }

    #[must_use]
    pub fn penalty(&self) -> f64 {
        self.penalty
    }

    /// Flies the scenario once.
    #[must_use]
    pub fn run(&self, policy: &Policy) -> ScenarioOutcome {
        let arena = &self.arena;
        let mut ai = attacker_start(arena);
        let mut target = Plane::new(arena.at(0.7, 0.5), std::f64::consts::PI, MIN_SPEED + 30.0);
        let mut missile: Option<Missile> = None;

        let mut t = 0.0;
        while t < self.cap {
            target.set_course(
                target.heading() + TARGET_TURN_RATE * self.step,
                MIN_SPEED + 40.0,
            );
            target.step(arena, 0.0, 0.0, self.step);
            if !target.is_alive() {
                return ScenarioOutcome::TargetCrashed { time: t };
            }

            let steering = tactics::pursuit(policy, &ai, &target, t);
            if missile.is_none() && tactics::should_fire(policy, &ai, &target) {
                missile = Some(Missile::launch(Side::Ai, &mut ai));
            }
            ai.step(arena, steering.turn, steering.throttle, self.step);
            if !ai.is_alive() {
                return ScenarioOutcome::Crashed { time: t };
            }

            if let Some(m) = &mut missile {
                m.step(arena, self.step);
                if !m.is_active() {
                    missile = None;
                } else if m.pos().distance(target.pos()) <= MISSILE_BLAST_RADIUS {
                    return ScenarioOutcome::Hit { time: t };
                }
            }
            t += self.step;
        }
        ScenarioOutcome::Timeout
    }

    /// Converts an outcome into a fitness value.
    #[must_use]
    pub fn fitness(&self, outcome: ScenarioOutcome) -> f64 {
        match outcome {
            ScenarioOutcome::Hit { time } | ScenarioOutcome::TargetCrashed { time } => time,
            ScenarioOutcome::Crashed { .. } => self.penalty,
            ScenarioOutcome::Timeout => self.cap,
        }
    }
}

impl FitnessEvaluator for ScenarioEvaluator {
    fn evaluate(&self, policy: &Policy) -> f64 {
        self.fitness(self.run(policy))
    }
}

/// The scenario's AI plane starts on the left, heading east.
fn attacker_start(arena: &Arena) -> Plane {
    Plane::new(arena.at(0.3, 0.5), 0.0, MIN_SPEED + 10.0)
}
