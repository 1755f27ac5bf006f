//! Stress Trial Runner
//!
//! Repeatedly executes one action body's `run()`:
//!
//! - bounded by an optional run budget (`RunnerConfig::max_runs`),
//! - aborted once more than one trial failed when `stop_on_error` is set,
//! - stopped by a `ShutdownSignal`, which also interrupts an in-flight trial.
//!
//! Shutdown and abort exits tear the action down exactly once before
//! returning. Budget exhaustion returns `Completed` without teardown unless
//! `teardown_on_completion` is set; the caller then owns teardown and can use
//! [`StressRunner::tear_down`].
//!
//! The runner never installs signal handlers and never exits the process.
//! The returned [`RunOutcome`] carries the exit status the host should use.

use serde::{Deserialize, Serialize};
use stress_shared::{WorkerId, worker_debug, worker_error, worker_info, worker_warn};
use tokio::sync::watch;
use tracing::Instrument;

use crate::config::{ActionParams, RunnerConfig};
use crate::error::{StressError, StressResult};
use crate::runtime::counters::RunCounters;
use crate::runtime::shutdown::ShutdownSignal;
use crate::traits::StressAction;

/// Abort fires once `fails` exceeds this count
pub const STOP_ON_ERROR_THRESHOLD: u64 = 1;

/// Exit status after a shutdown-requested teardown
pub const EXIT_GRACEFUL: i32 = 0;

/// Exit status after a stop-on-error abort
pub const EXIT_ABORT: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunnerState {
    Idle,
    Running,
    TearingDown,
    Terminated,
}

/// How an `execute` call ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    /// Run budget exhausted
    Completed,
    /// Stop-on-error threshold exceeded; action torn down
    Aborted,
    /// Shutdown requested; action torn down
    Interrupted,
}

impl RunOutcome {
    /// Process exit status for this outcome; `None` leaves it to the caller
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            RunOutcome::Completed => None,
            RunOutcome::Aborted => Some(EXIT_ABORT),
            RunOutcome::Interrupted => Some(EXIT_GRACEFUL),
        }
    }
}

pub struct StressRunner {
    worker: WorkerId,
    action: Box<dyn StressAction>,
    config: RunnerConfig,
    counters: RunCounters,
    progress: watch::Sender<RunCounters>,
    state: RunnerState,
    torn_down: bool,
}

impl StressRunner {
    pub fn new(action: Box<dyn StressAction>, config: RunnerConfig) -> Self {
        let worker = WorkerId::action(action.name(), 0);
        let (progress, _) = watch::channel(RunCounters::default());

        Self {
            worker,
            action,
            config,
            counters: RunCounters::default(),
            progress,
            state: RunnerState::Idle,
            torn_down: false,
        }
    }

    /// Distinguish this runner from others running the same action
    pub fn with_worker_index(mut self, index: usize) -> Self {
        self.worker = WorkerId::action(self.action.name(), index);
        self
    }

    pub fn worker(&self) -> &WorkerId {
        &self.worker
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub fn state(&self) -> RunnerState {
        self.state
    }

    pub fn counters(&self) -> RunCounters {
        self.counters
    }

    /// Live counter snapshots, updated after every trial
    pub fn subscribe(&self) -> watch::Receiver<RunCounters> {
        self.progress.subscribe()
    }

    /// Prepare the action body; does not count against the run budget
    pub async fn set_up(&mut self, params: &ActionParams) -> StressResult<()> {
        worker_debug!(self.worker, "setUp");
        self.action
            .set_up(params)
            .instrument(tracing::info_span!("set_up", worker = %self.worker))
            .await
    }

    /// Run trials until the budget is exhausted, the stop-on-error threshold
    /// is exceeded, or shutdown is requested
    ///
    /// Trial failures are logged and counted, never returned. The only error
    /// is calling this on a runner that has already executed.
    pub async fn execute(&mut self, mut shutdown: ShutdownSignal) -> StressResult<RunOutcome> {
        if self.state != RunnerState::Idle {
            return Err(StressError::RunnerReused {
                worker: self.worker.to_string(),
            });
        }
        self.state = RunnerState::Running;

        loop {
            if let Some(max_runs) = self.config.max_runs {
                if self.counters.runs >= max_runs {
                    break;
                }
            }

            if shutdown.is_triggered() {
                return Ok(self.interrupt().await);
            }

            worker_debug!(self.worker, "Trigger new run (run {})", self.counters.runs);

            let trial = tokio::select! {
                biased;
                _ = shutdown.triggered() => None,
                result = self.action.run().instrument(tracing::info_span!(
                    "trial",
                    worker = %self.worker,
                    run = self.counters.runs + 1
                )) => Some(result),
            };

            let Some(result) = trial else {
                worker_info!(self.worker, "🛑 Trial interrupted by shutdown request");
                return Ok(self.interrupt().await);
            };

            if let Err(e) = result {
                self.counters.record_failure();
                worker_error!(self.worker, error = %e, "❌ Failure in run: {}", e);
            }
            self.counters.record_run();
            self.progress.send_replace(self.counters);

            if self.config.stop_on_error && self.counters.fails > STOP_ON_ERROR_THRESHOLD {
                worker_warn!(
                    self.worker,
                    "⚠️ Stop process due to \"stop-on-error\" argument ({})",
                    self.counters
                );
                self.tear_down_logged().await;
                self.state = RunnerState::Terminated;
                return Ok(RunOutcome::Aborted);
            }
        }

        worker_info!(self.worker, "✅ Run budget exhausted: {}", self.counters);
        if self.config.teardown_on_completion {
            self.tear_down_logged().await;
        }
        self.state = RunnerState::Terminated;
        Ok(RunOutcome::Completed)
    }

    /// Tear the action down unless that already happened
    ///
    /// For callers that own teardown after a `Completed` outcome.
    pub async fn tear_down(&mut self) -> StressResult<()> {
        if self.torn_down {
            return Ok(());
        }
        self.torn_down = true;

        let previous = self.state;
        self.state = RunnerState::TearingDown;
        worker_debug!(self.worker, "tearDown");
        let result = self
            .action
            .tear_down()
            .instrument(tracing::info_span!("tear_down", worker = %self.worker))
            .await;
        self.state = match previous {
            RunnerState::Idle => RunnerState::Idle,
            _ => RunnerState::Terminated,
        };
        result
    }

    async fn tear_down_logged(&mut self) {
        if let Err(e) = self.tear_down().await {
            worker_error!(self.worker, error = %e, "❌ Error while tearDown: {}", e);
        }
    }

    async fn interrupt(&mut self) -> RunOutcome {
        self.tear_down_logged().await;
        self.state = RunnerState::Terminated;
        RunOutcome::Interrupted
    }
}
