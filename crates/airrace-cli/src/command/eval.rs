use std::path::PathBuf;

use airrace_evaluator::scenario::ScenarioEvaluator;

use crate::model::policy_model::PolicyModel;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct EvalArg {
    /// Path to the policy model file (JSON format)
    policy: PathBuf,
}

pub(crate) fn run(arg: &EvalArg) -> anyhow::Result<()> {
    crate::logging::init_stderr();

    let EvalArg { policy } = arg;
    let model = PolicyModel::open(policy)?;
    tracing::info!(name = %model.name, trained_at = %model.trained_at, "policy model loaded");

    let evaluator = ScenarioEvaluator::new();
    let outcome = evaluator.run(&model.policy);
    let fitness = evaluator.fitness(outcome);

    println!("Model:    {} ({} generations)", model.name, model.generations);
    println!("Outcome:  {outcome}");
    println!("Fitness:  {fitness:.3}s");
    println!("Strategy: {}", model.policy.summary());
    Ok(())
}
