use std::{path::PathBuf, time::Duration};

use airrace_engine::{DogfightSession, HighscoreStore, JsonFileStore, MemoryStore};
use airrace_evaluator::{pilot::PolicyPilot, scenario::ScenarioEvaluator};
use airrace_training::learner::{DEFAULT_DELAY, Learner, LearnerConfig};

use crate::{
    command::StrategyArg,
    model::policy_model::PolicyModel,
    tui::{Runtime, ScreenStack},
};

use self::screens::{DogfightScreen, RulesScreen};

mod screens;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Pause between two learning generations, in milliseconds
    #[clap(long, default_value_t = 900)]
    learn_delay_ms: u64,
    /// Start with background learning switched off
    #[clap(long)]
    no_learning: bool,
    /// Start the AI from the mean of a policy model file
    #[clap(long)]
    policy: Option<PathBuf>,
    /// Directory for highscores and the log file
    #[clap(long, default_value = "./data")]
    data_dir: PathBuf,
    /// Keep highscores in memory only
    #[clap(long)]
    no_persist: bool,
    #[clap(flatten)]
    strategy: StrategyArg,
}

impl Default for PlayArg {
    fn default() -> Self {
        #[expect(clippy::cast_possible_truncation)]
        let learn_delay_ms = DEFAULT_DELAY.as_millis() as u64;
        Self {
            learn_delay_ms,
            no_learning: false,
            policy: None,
            data_dir: PathBuf::from("./data"),
            no_persist: false,
            strategy: StrategyArg::default(),
        }
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        learn_delay_ms,
        no_learning,
        policy,
        data_dir,
        no_persist,
        strategy,
    } = arg;

    crate::logging::init_file(data_dir);

    let mean = policy
        .as_ref()
        .map(|path| PolicyModel::open(path).map(|model| model.policy))
        .transpose()?;
    let strategy = strategy.build(mean);
    let pilot = PolicyPilot::new(*strategy.mean());

    let store: Box<dyn HighscoreStore> = if *no_persist {
        Box::new(MemoryStore::new())
    } else {
        Box::new(JsonFileStore::in_dir(data_dir))
    };
    let session = DogfightSession::new(store);

    let config = LearnerConfig {
        enabled: !no_learning,
        delay: Duration::from_millis(*learn_delay_ms),
    };
    let learner = Learner::spawn(strategy, ScenarioEvaluator::new(), config);
    tracing::info!(?config, "session started");

    let game = DogfightScreen::new(session, pilot, learner);
    let mut app = ScreenStack::new(Box::new(game)).with(Box::new(RulesScreen::new()));
    Runtime::new().run(&mut app)?;

    tracing::info!("session ended");
    Ok(())
}
