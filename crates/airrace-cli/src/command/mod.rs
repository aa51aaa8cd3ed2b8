use airrace_evaluator::policy::Policy;
use airrace_training::{
    noise::Noise,
    strategy::{EsParams, EvolutionStrategy},
};
use clap::{Parser, Subcommand};
use rand::SeedableRng as _;
use rand_pcg::Pcg32;

use self::{eval::EvalArg, play::PlayArg, train::TrainArg};

mod eval;
mod play;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Fly against the AI while it keeps learning in the background
    Play(#[clap(flatten)] PlayArg),
    /// Run the optimizer headless and save the resulting policy
    Train(#[clap(flatten)] TrainArg),
    /// Score a saved policy in the offline scenario
    Eval(#[clap(flatten)] EvalArg),
}

/// Optimizer flags shared by `play` and `train`.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct StrategyArg {
    /// Perturbation noise shape (triangular or gaussian)
    #[arg(long, default_value = "triangular")]
    noise: Noise,
    /// Lower bound for decaying sigma fields
    #[arg(long)]
    sigma_floor: Option<f64>,
    /// Seed for a reproducible optimizer
    #[arg(long)]
    seed: Option<u64>,
}

impl StrategyArg {
    fn params(&self) -> EsParams {
        EsParams {
            sigma_floor: self.sigma_floor,
            noise: self.noise,
            ..EsParams::default()
        }
    }

    /// Builds the optimizer, starting from `mean` when given.
    fn build(&self, mean: Option<Policy>) -> EvolutionStrategy {
        let params = self.params();
        let rng = match self.seed {
            Some(seed) => Pcg32::seed_from_u64(seed),
            None => Pcg32::from_rng(&mut rand::rng()),
        };
        EvolutionStrategy::from_state(
            params,
            mean.unwrap_or(Policy::INITIAL_MEAN),
            Policy::INITIAL_SIGMA,
            rng,
        )
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::Train(arg) => train::run(&arg)?,
        Mode::Eval(arg) => eval::run(&arg)?,
    }
    Ok(())
}
