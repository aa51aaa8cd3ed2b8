//! Policy-driven AI for the dogfight.
//!
//! # Layers
//!
//! ```text
//! scenario (fitness of a policy, used for training)
//!     ↓ uses
//! tactics  (pursuit / fire / evasion control laws)
//!     ↓ uses
//! policy   (the six tunable parameters)
//! ```
//!
//! [`pilot::PolicyPilot`] plugs the same tactics into a live
//! [`airrace_engine::DogfightSession`].
//!
//! # Example
//!
//! ```rust
//! use airrace_evaluator::{
//!     policy::Policy,
//!     scenario::{FitnessEvaluator, SCENARIO_PENALTY, ScenarioEvaluator},
//! };
//!
//! let fitness = ScenarioEvaluator::new().evaluate(&Policy::INITIAL_MEAN);
//! assert!(fitness.is_finite() && fitness <= SCENARIO_PENALTY);
//! ```

pub mod pilot;
pub mod policy;
pub mod scenario;
pub mod tactics;
