//! Background learning loop.
//!
//! The optimizer runs on its own thread so a generation never stalls the
//! render loop. The game side talks to it through a [`LearnerHandle`]:
//!
//! ```text
//! LearnerHandle ──LearnerCommand──▶ worker thread
//!       ▲                                │ EvolutionStrategy::step
//!       └──────GenerationReport──────────┘ (then waits `delay`)
//! ```
//!
//! Only reports cross back, so the game reads the mean policy and never the
//! sigma or the candidates.

use std::{
    ops::ControlFlow,
    sync::mpsc::{self, RecvTimeoutError, TryRecvError},
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use airrace_evaluator::{policy::Policy, scenario::FitnessEvaluator};

use crate::strategy::{EvolutionStrategy, GenerationReport};

/// Default pause between two generations.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(900);

/// Start-up settings of the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LearnerConfig {
    pub enabled: bool,
    pub delay: Duration,
}

impl Default for LearnerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            delay: DEFAULT_DELAY,
        }
    }
}

/// Message from the handle to the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LearnerCommand {
    SetEnabled(bool),
    SetDelay(Duration),
    Shutdown,
}

/// The worker side: owns the optimizer and the evaluator.
#[derive(Debug)]
pub struct Learner<E> {
    strategy: EvolutionStrategy,
    evaluator: E,
    enabled: bool,
    delay: Duration,
    commands: mpsc::Receiver<LearnerCommand>,
    reports: mpsc::Sender<GenerationReport>,
    /// When the last generation finished. The next one starts `delay` later.
    last_finished: Option<Instant>,
}

impl<E> Learner<E>
where
    E: FitnessEvaluator + 'static,
{
    /// Moves the optimizer onto a new thread and returns the game-side handle.
    #[must_use]
    pub fn spawn(strategy: EvolutionStrategy, evaluator: E, config: LearnerConfig) -> LearnerHandle {
        let (tx_command, rx_command) = mpsc::channel();
        let (tx_report, rx_report) = mpsc::channel();
        let mean = *strategy.mean();
        let learner = Self {
            strategy,
            evaluator,
            enabled: config.enabled,
            delay: config.delay,
            commands: rx_command,
            reports: tx_report,
            last_finished: None,
        };
        let worker = thread::Builder::new()
            .name("airrace-learner".to_owned())
            .spawn(move || learner.run());
        let worker = match worker {
            Ok(worker) => Some(worker),
            Err(err) => {
                tracing::error!(%err, "failed to start learner thread; learning is disabled");
                None
            }
        };
        LearnerHandle {
            tx: tx_command,
            rx: rx_report,
            worker,
            enabled: config.enabled,
            delay: config.delay,
            mean,
            latest: None,
        }
    }

    fn run(mut self) {
        tracing::debug!(enabled = self.enabled, delay = ?self.delay, "learner started");
        loop {
            if !self.enabled {
                let Ok(command) = self.commands.recv() else {
                    break;
                };
                if self.apply(command).is_break() {
                    break;
                }
                continue;
            }

            // Pausing and resuming during the delay must not skip it.
            if let Some(finished) = self.last_finished
                && self.wait(finished).is_break()
            {
                break;
            }
            if !self.enabled {
                continue;
            }

            let started = Instant::now();
            let report = self.strategy.step(&self.evaluator);
            tracing::debug!(
                generation = report.generation,
                best = report.best_fitness,
                elite_mean = report.elite_mean_fitness,
                elapsed = ?started.elapsed(),
                "generation finished"
            );
            if self.reports.send(report).is_err() {
                break;
            }
            self.last_finished = Some(Instant::now());
        }
        tracing::debug!(
            generation = self.strategy.generation(),
            "learner stopped"
        );
    }

    /// Sleeps until `delay` has passed since `since`, handling commands as
    /// they arrive. Returns early when learning gets disabled.
    fn wait(&mut self, since: Instant) -> ControlFlow<()> {
        loop {
            if !self.enabled {
                return ControlFlow::Continue(());
            }
            let Some(remaining) = (since + self.delay).checked_duration_since(Instant::now())
            else {
                return ControlFlow::Continue(());
            };
            match self.commands.recv_timeout(remaining) {
                Ok(command) => self.apply(command)?,
                Err(RecvTimeoutError::Timeout) => return ControlFlow::Continue(()),
                Err(RecvTimeoutError::Disconnected) => return ControlFlow::Break(()),
            }
        }
    }

    fn apply(&mut self, command: LearnerCommand) -> ControlFlow<()> {
        match command {
            LearnerCommand::SetEnabled(enabled) => self.enabled = enabled,
            LearnerCommand::SetDelay(delay) => self.delay = delay,
            LearnerCommand::Shutdown => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }
}

/// Game-side end of the learner. Dropping it stops and joins the worker.
#[derive(Debug)]
pub struct LearnerHandle {
    tx: mpsc::Sender<LearnerCommand>,
    rx: mpsc::Receiver<GenerationReport>,
    worker: Option<JoinHandle<()>>,
    enabled: bool,
    delay: Duration,
    mean: Policy,
    latest: Option<GenerationReport>,
}

impl LearnerHandle {
    /// Drains every report that has arrived, without blocking.
    ///
    /// Returns the new reports, oldest first. The latest one is also kept and
    /// its mean becomes [`current_mean`](Self::current_mean).
    pub fn poll(&mut self) -> Vec<GenerationReport> {
        let mut reports = vec![];
        loop {
            match self.rx.try_recv() {
                Ok(report) => reports.push(report),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        if let Some(last) = reports.last() {
            self.record(*last);
        }
        reports
    }

    /// Blocks up to `timeout` for the next report.
    pub fn wait_report(&mut self, timeout: Duration) -> Option<GenerationReport> {
        let report = self.rx.recv_timeout(timeout).ok()?;
        self.record(report);
        Some(report)
    }

    fn record(&mut self, report: GenerationReport) {
        self.mean = report.mean;
        self.latest = Some(report);
    }

    /// The mean policy of the most recent generation seen by [`poll`](Self::poll).
    #[must_use]
    pub fn current_mean(&self) -> Policy {
        self.mean
    }

    #[must_use]
    pub fn latest(&self) -> Option<&GenerationReport> {
        self.latest.as_ref()
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Returns `false` if the worker is gone.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.worker.as_ref().is_some_and(|w| !w.is_finished())
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.send(LearnerCommand::SetEnabled(enabled));
    }

    pub fn toggle_enabled(&mut self) {
        self.set_enabled(!self.enabled);
    }

    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
        self.send(LearnerCommand::SetDelay(delay));
    }

    fn send(&self, command: LearnerCommand) {
        if self.tx.send(command).is_err() {
            tracing::warn!(?command, "learner thread is gone");
        }
    }
}

impl Drop for LearnerHandle {
    fn drop(&mut self) {
        let _ = self.tx.send(LearnerCommand::Shutdown);
        if let Some(worker) = self.worker.take()
            && worker.join().is_err()
        {
            tracing::error!("learner thread panicked");
        }
    }
}
