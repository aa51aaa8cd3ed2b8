//! Evolution strategy that tunes the AI policy, and the background thread that
//! runs it during play.
//!
//! - [`noise`] - candidate sampling around the mean
//! - [`strategy`] - one generation: sample, evaluate, select, recombine, anneal
//! - [`learner`] - runs generations on a worker thread with a configurable
//!   delay, controlled by messages
//!
//! # Example
//!
//! ```rust,no_run
//! use airrace_evaluator::scenario::ScenarioEvaluator;
//! use airrace_training::strategy::{EsParams, EvolutionStrategy};
//!
//! let mut es = EvolutionStrategy::with_seed(EsParams::default(), 42);
//! let evaluator = ScenarioEvaluator::new();
//! for _ in 0..10 {
//!     let report = es.step(&evaluator);
//!     println!("gen {}: best {:.2}s", report.generation, report.best_fitness);
//! }
//! ```

pub mod learner;
pub mod noise;
pub mod strategy;
