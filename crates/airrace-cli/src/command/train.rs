use std::path::PathBuf;

use airrace_evaluator::scenario::{FitnessEvaluator as _, ScenarioEvaluator};
use airrace_training::strategy::GenerationReport;
use chrono::Utc;

use crate::{command::StrategyArg, model::policy_model::PolicyModel, util::Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Number of generations to run
    #[arg(long, default_value_t = 200)]
    generations: u64,
    /// Name stored in the model file
    #[arg(long, default_value = "airrace-es")]
    name: String,
    /// Start from the mean of an existing model file
    #[arg(long)]
    policy: Option<PathBuf>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
    #[clap(flatten)]
    strategy: StrategyArg,
}

fn print_report(report: &GenerationReport) {
    let GenerationReport {
        generation,
        best_fitness,
        elite_mean_fitness,
        improvement,
        mean,
        sigma: _,
    } = report;
    let improvement = improvement.map_or_else(|| "-".to_owned(), |d| format!("{d:+.3}s"));
    eprintln!(
        "Generation #{generation}: best {best_fitness:.3}s, elite mean {elite_mean_fitness:.3}s, improvement {improvement}"
    );
    eprintln!("  {}", mean.summary());
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    crate::logging::init_stderr();

    let TrainArg {
        generations,
        name,
        policy,
        output,
        strategy,
    } = arg;

    let mean = policy
        .as_ref()
        .map(|path| PolicyModel::open(path).map(|model| model.policy))
        .transpose()?;
    let mut strategy = strategy.build(mean);
    let evaluator = ScenarioEvaluator::new();

    tracing::info!(generations, params = ?strategy.params(), "training started");
    for _ in 0..*generations {
        let report = strategy.step(&evaluator);
        print_report(&report);
    }

    let policy = *strategy.mean();
    let model = PolicyModel {
        name: name.clone(),
        trained_at: Utc::now(),
        final_fitness: evaluator.evaluate(&policy),
        generations: strategy.generation(),
        policy,
    };
    eprintln!("Final mean fitness: {:.3}s", model.final_fitness);

    Output::save_json(&model, output.clone())?;
    if let Some(path) = output {
        tracing::info!(path = %path.display(), "policy model saved");
    }
    Ok(())
}
