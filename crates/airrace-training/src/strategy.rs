//! Elite-average evolution strategy over [`Policy`] vectors.
//!
//! The optimizer keeps two vectors across generations: a mean policy and a
//! per-field sampling spread (sigma). One generation:
//!
//! 1. **Sample** `population_size` candidates around the mean ([`mutate`]).
//! 2. **Evaluate** every candidate in parallel; lower fitness is better.
//! 3. **Select** the `elite_count` fastest candidates.
//! 4. **Recombine**: the new mean is the plain average of the elite. The old
//!    mean does not take part.
//! 5. **Anneal**: every sigma field is multiplied by `sigma_decay`, optionally
//!    held at `sigma_floor`.
//!
//! Sigma never grows. With `sigma_floor` set, fields stop decaying at the
//! floor, and a field that already starts below it is held where it is.

use std::thread;

use airrace_evaluator::{
    policy::{FIELD_COUNT, Policy},
    scenario::FitnessEvaluator,
};
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::noise::{Noise, mutate};

/// Tuning knobs of the optimizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EsParams {
    /// Candidates sampled per generation.
    pub population_size: usize,
    /// Best candidates averaged into the next mean.
    pub elite_count: usize,
    /// Multiplicative sigma decay applied once per generation.
    pub sigma_decay: f64,
    /// Lower bound that decaying sigma fields stop at, if any.
    pub sigma_floor: Option<f64>,
    pub noise: Noise,
}

impl Default for EsParams {
    fn default() -> Self {
        Self {
            population_size: 24,
            elite_count: 5,
            sigma_decay: 0.996,
            sigma_floor: None,
            noise: Noise::Triangular,
        }
    }
}

/// A sampled policy and its fitness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    policy: Policy,
    fitness: f64,
}

impl Candidate {
    #[must_use]
    pub fn new(policy: Policy, fitness: f64) -> Self {
        Self { policy, fitness }
    }

    #[must_use]
    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Seconds to kill; lower is better.
    #[must_use]
    pub fn fitness(&self) -> f64 {
        self.fitness
    }
}

/// Summary of one finished generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationReport {
    /// 1-based index of the generation.
    pub generation: u64,
    pub best_fitness: f64,
    pub elite_mean_fitness: f64,
    /// `previous best - best`: positive means the AI got faster. `None` for
    /// the first generation.
    pub improvement: Option<f64>,
    /// Mean after recombination.
    pub mean: Policy,
    /// Sigma after decay.
    pub sigma: Policy,
}

/// The optimizer state.
#[derive(Debug, Clone)]
pub struct EvolutionStrategy {
    params: EsParams,
    mean: Policy,
    sigma: Policy,
    generation: u64,
    previous_best: Option<f64>,
    rng: Pcg32,
}

impl EvolutionStrategy {
    /// Starts from [`Policy::INITIAL_MEAN`] and [`Policy::INITIAL_SIGMA`].
    #[must_use]
    pub fn new(params: EsParams, rng: Pcg32) -> Self {
        Self::from_state(params, Policy::INITIAL_MEAN, Policy::INITIAL_SIGMA, rng)
    }

    /// Seeded, reproducible optimizer.
    #[must_use]
    pub fn with_seed(params: EsParams, seed: u64) -> Self {
        Self::new(params, Pcg32::seed_from_u64(seed))
    }

    #[must_use]
    pub fn from_entropy(params: EsParams) -> Self {
        Self::new(params, Pcg32::from_rng(&mut rand::rng()))
    }

    /// Resumes from an explicit mean and sigma. The mean is clamped.
    #[must_use]
    pub fn from_state(params: EsParams, mean: Policy, sigma: Policy, rng: Pcg32) -> Self {
        assert!(params.population_size > 0);
        assert!((1..=params.population_size).contains(&params.elite_count));
        Self {
            params,
            mean: mean.clamped(),
            sigma,
            generation: 0,
            previous_best: None,
            rng,
        }
    }

    #[must_use]
    pub fn params(&self) -> &EsParams {
        &self.params
    }

    #[must_use]
    pub fn mean(&self) -> &Policy {
        &self.mean
    }

    #[must_use]
    pub fn sigma(&self) -> &Policy {
        &self.sigma
    }

    /// Number of completed generations.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Draws a fresh population around the current mean.
    pub fn sample_population(&mut self) -> Vec<Policy> {
        (0..self.params.population_size)
            .map(|_| mutate(&self.mean, &self.sigma, self.params.noise, &mut self.rng))
            .collect()
    }

    /// Runs one full generation.
    pub fn step<E>(&mut self, evaluator: &E) -> GenerationReport
    where
        E: FitnessEvaluator + ?Sized,
    {
        let population = self.sample_population();
        let ranked = evaluate_population(&population, evaluator);
        self.advance(&ranked)
    }

    /// Applies selection, recombination and annealing to candidates that are
    /// already sorted by ascending fitness.
    pub fn advance(&mut self, ranked: &[Candidate]) -> GenerationReport {
        assert!(!ranked.is_empty());
        assert!(ranked.is_sorted_by(|a, b| a.fitness <= b.fitness));

        let elite = &ranked[..self.params.elite_count.min(ranked.len())];
        self.mean = elite_average(elite);
        self.decay_sigma();
        self.generation += 1;

        let best_fitness = elite[0].fitness;
        #[expect(clippy::cast_precision_loss)]
        let elite_mean_fitness = elite.iter().map(|c| c.fitness).sum::<f64>() / elite.len() as f64;
        let improvement = self.previous_best.map(|prev| prev - best_fitness);
        self.previous_best = Some(best_fitness);

        GenerationReport {
            generation: self.generation,
            best_fitness,
            elite_mean_fitness,
            improvement,
            mean: self.mean,
            sigma: self.sigma,
        }
    }

    fn decay_sigma(&mut self) {
        let decay = self.params.sigma_decay;
        let floor = self.params.sigma_floor;
        let mut sigma = self.sigma.to_array();
        for s in &mut sigma {
            let decayed = *s * decay;
            *s = match floor {
                Some(floor) => decayed.max(floor.min(*s)),
                None => decayed,
            };
        }
        self.sigma = Policy::from_array(sigma);
    }
}

/// Scores every policy on its own thread and returns the candidates sorted by
/// ascending fitness.
pub fn evaluate_population<E>(population: &[Policy], evaluator: &E) -> Vec<Candidate>
where
    E: FitnessEvaluator + ?Sized,
{
    let mut candidates: Vec<Candidate> = population
        .iter()
        .map(|policy| Candidate::new(*policy, f64::INFINITY))
        .collect();
    thread::scope(|s| {
        for candidate in &mut candidates {
            s.spawn(move || {
                candidate.fitness = evaluator.evaluate(&candidate.policy);
            });
        }
    });
    candidates.sort_by(|a, b| a.fitness.total_cmp(&b.fitness));
    candidates
}

fn elite_average(elite: &[Candidate]) -> Policy {
    let mut sum = [0.0; FIELD_COUNT];
    for candidate in elite {
        for (acc, value) in sum.iter_mut().zip(candidate.policy.to_array()) {
            *acc += value;
        }
    }
    #[expect(clippy::cast_precision_loss)]
    let n = elite.len() as f64;
    Policy::from_array(sum.map(|acc| acc / n))
}
