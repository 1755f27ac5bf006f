//! Stress Driver
//!
//! Turns an action list into running trial runners and supervises them:
//! builds `threads` runners per action, prepares all of them before any
//! trial starts, runs each on its own task, and stops the batch on duration,
//! external shutdown, or a stop-on-error abort.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;
use stress_shared::{WorkerId, logging, worker_error, worker_info, worker_warn};
use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio::time::{Instant, MissedTickBehavior, interval_at, sleep_until};

use crate::config::{ActionSpec, RunnerConfig};
use crate::error::{StressError, StressResult};
use crate::runtime::counters::RunCounters;
use crate::runtime::runner::{EXIT_ABORT, EXIT_GRACEFUL, RunOutcome, StressRunner};
use crate::runtime::shutdown::{ShutdownSignal, shutdown_channel};
use crate::traits::ActionFactory;

/// Exit status when at least one trial failed
pub const EXIT_TRIAL_FAILURES: i32 = 1;

/// Exit status when a later batch could not be set up
pub const EXIT_SETUP_FAILURE: i32 = 1;

#[derive(Debug, Clone)]
pub struct DriverOptions {
    /// Wall-clock bound per batch; `None` runs until every runner completes
    pub duration: Option<Duration>,
    /// Applied to every runner
    pub runner: RunnerConfig,
    /// Run one action at a time instead of all at once
    pub serial: bool,
    /// Cadence of the aggregated progress log
    pub progress_interval: Duration,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            duration: None,
            runner: RunnerConfig::default(),
            serial: false,
            progress_interval: Duration::from_secs(10),
        }
    }
}

/// Why a session (or batch) stopped
///
/// Variants are ordered by precedence: a session reports the highest reason
/// seen across its batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum StopReason {
    /// Every runner exhausted its run budget
    Completed,
    DurationElapsed,
    /// A batch after the first failed set-up; earlier batches are kept
    SetupFailed,
    /// External termination signal
    ShutdownRequested,
    /// A runner exceeded the stop-on-error threshold
    Aborted,
}

impl StopReason {
    /// Whether no further batch should start
    pub fn ends_session(self) -> bool {
        matches!(
            self,
            StopReason::SetupFailed | StopReason::ShutdownRequested | StopReason::Aborted
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkerReport {
    pub worker: WorkerId,
    pub action: String,
    pub counters: RunCounters,
    /// `None` when the runner task died without reporting
    pub outcome: Option<RunOutcome>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StressReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub stop_reason: StopReason,
    pub workers: Vec<WorkerReport>,
}

impl StressReport {
    pub fn totals(&self) -> RunCounters {
        self.workers.iter().map(|w| w.counters).sum()
    }

    pub fn per_action(&self) -> BTreeMap<String, RunCounters> {
        let mut per_action = BTreeMap::new();
        for worker in &self.workers {
            *per_action
                .entry(worker.action.clone())
                .or_insert_with(RunCounters::default) += worker.counters;
        }
        per_action
    }

    pub fn had_errors(&self) -> bool {
        self.totals().fails > 0 || self.workers.iter().any(|w| w.outcome.is_none())
    }

    /// Process exit status for this session
    pub fn exit_code(&self) -> i32 {
        match self.stop_reason {
            StopReason::ShutdownRequested => EXIT_GRACEFUL,
            StopReason::Aborted => EXIT_ABORT,
            StopReason::SetupFailed => EXIT_SETUP_FAILURE,
            StopReason::Completed | StopReason::DurationElapsed => {
                if self.had_errors() {
                    EXIT_TRIAL_FAILURES
                } else {
                    EXIT_GRACEFUL
                }
            }
        }
    }

    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

type TaskResult = (WorkerId, String, RunCounters, StressResult<RunOutcome>);

pub struct StressDriver<F: ActionFactory> {
    factory: F,
    worker: WorkerId,
}

impl<F: ActionFactory> StressDriver<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            worker: WorkerId::Driver,
        }
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Run the whole action list and report per-worker counters
    ///
    /// Trial failures end up in the report. A set-up failure is returned as
    /// an error only while nothing has run yet; after that the session stops
    /// with `SetupFailed` and keeps the workers already reported.
    pub async fn run(
        &self,
        specs: &[ActionSpec],
        options: &DriverOptions,
        shutdown: ShutdownSignal,
    ) -> StressResult<StressReport> {
        let started_at = Utc::now();
        logging::log_startup(
            &self.worker,
            &format!(
                "{} actions ({} mode, duration {:?})",
                specs.len(),
                if options.serial { "serial" } else { "parallel" },
                options.duration
            ),
        );

        let batches: Vec<&[ActionSpec]> = if options.serial {
            specs.chunks(1).collect()
        } else {
            vec![specs]
        };

        let mut workers = Vec::new();
        let mut stop_reason = StopReason::Completed;

        for batch in batches {
            if shutdown.is_triggered() {
                stop_reason = stop_reason.max(StopReason::ShutdownRequested);
                break;
            }

            let result = self.run_batch(batch, options, &shutdown, &mut workers).await;
            let batch_reason = match result {
                Ok(reason) => reason,
                Err(e) if workers.is_empty() => return Err(e),
                Err(_) => StopReason::SetupFailed,
            };
            stop_reason = stop_reason.max(batch_reason);
            if batch_reason.ends_session() {
                break;
            }
        }

        let report = StressReport {
            started_at,
            finished_at: Utc::now(),
            stop_reason,
            workers,
        };
        self.log_summary(&report);
        Ok(report)
    }

    async fn prepare(
        &self,
        batch: &[ActionSpec],
        runner_config: &RunnerConfig,
        runners: &mut Vec<(String, StressRunner)>,
    ) -> StressResult<()> {
        for spec in batch {
            for index in 0..spec.threads {
                let action = self.factory.create(spec)?;
                let mut runner =
                    StressRunner::new(action, runner_config.clone()).with_worker_index(index);
                runner.set_up(&spec.kwargs).await?;
                runners.push((spec.action.clone(), runner));
            }
        }
        Ok(())
    }

    async fn run_batch(
        &self,
        batch: &[ActionSpec],
        options: &DriverOptions,
        external: &ShutdownSignal,
        reports: &mut Vec<WorkerReport>,
    ) -> StressResult<StopReason> {
        let mut runners = Vec::new();
        if let Err(e) = self.prepare(batch, &options.runner, &mut runners).await {
            logging::log_error(&self.worker, "Action set-up", &e);
            for (_, runner) in runners.iter_mut() {
                if let Err(e) = runner.tear_down().await {
                    worker_error!(runner.worker(), error = %e, "❌ Error while tearDown: {}", e);
                }
            }
            return Err(e);
        }

        let (local_trigger, local_signal) = shutdown_channel();
        let mut progress: Vec<(WorkerId, String, watch::Receiver<RunCounters>)> = Vec::new();
        let mut tasks: JoinSet<TaskResult> = JoinSet::new();

        for (action, mut runner) in runners {
            progress.push((runner.worker().clone(), action.clone(), runner.subscribe()));
            let signal = local_signal.clone();
            tasks.spawn(async move {
                let outcome = runner.execute(signal).await;
                if let Ok(RunOutcome::Completed) = outcome {
                    if let Err(e) = runner.tear_down().await {
                        worker_error!(
                            runner.worker(),
                            error = %e,
                            "❌ Error while tearDown: {}",
                            e
                        );
                    }
                }
                (runner.worker().clone(), action, runner.counters(), outcome)
            });
        }
        worker_info!(self.worker, "▶️ Started {} runners", progress.len());

        let deadline = options.duration.map(|d| Instant::now() + d);
        let deadline_reached = async move {
            match deadline {
                Some(deadline) => sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };
        tokio::pin!(deadline_reached);

        let period = options.progress_interval.max(Duration::from_millis(1));
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut external = external.clone();
        let mut stop: Option<StopReason> = None;
        let mut finished: Vec<WorkerId> = Vec::new();

        loop {
            tokio::select! {
                joined = tasks.join_next() => {
                    let Some(joined) = joined else { break };
                    match joined {
                        Ok((worker, action, counters, outcome)) => {
                            let outcome = match outcome {
                                Ok(outcome) => Some(outcome),
                                Err(e) => {
                                    logging::log_error(&worker, "Runner", &e);
                                    None
                                }
                            };
                            if outcome == Some(RunOutcome::Aborted) && stop.is_none() {
                                worker_warn!(
                                    self.worker,
                                    "⚠️ {} aborted, stopping remaining runners",
                                    worker
                                );
                                stop = Some(StopReason::Aborted);
                                local_trigger.trigger();
                            }
                            finished.push(worker.clone());
                            reports.push(WorkerReport { worker, action, counters, outcome });
                        }
                        Err(e) => {
                            let e = StressError::Join { message: e.to_string() };
                            logging::log_error(&self.worker, "Runner task", &e);
                        }
                    }
                }
                _ = &mut deadline_reached, if stop.is_none() => {
                    logging::log_shutdown(&self.worker, "duration elapsed");
                    stop = Some(StopReason::DurationElapsed);
                    local_trigger.trigger();
                }
                _ = external.triggered(), if stop.is_none() => {
                    stop = Some(StopReason::ShutdownRequested);
                    local_trigger.trigger();
                }
                _ = ticker.tick() => {
                    let total: RunCounters = progress.iter().map(|(_, _, rx)| *rx.borrow()).sum();
                    logging::log_progress(
                        &self.worker,
                        "Progress",
                        &format!("{} across {} runners", total, progress.len()),
                    );
                }
            }
        }

        // Runners whose task died still have their last published counters
        for (worker, action, rx) in progress {
            if !finished.contains(&worker) {
                let counters = *rx.borrow();
                reports.push(WorkerReport {
                    worker,
                    action,
                    counters,
                    outcome: None,
                });
            }
        }

        Ok(stop.unwrap_or(StopReason::Completed))
    }

    fn log_summary(&self, report: &StressReport) {
        for (action, counters) in report.per_action() {
            worker_info!(self.worker, "📊 {}: {}", action, counters);
        }
        let summary = format!(
            "{} in {}s, stop reason {:?}",
            report.totals(),
            report.elapsed().num_seconds(),
            report.stop_reason
        );
        if report.had_errors() {
            worker_warn!(self.worker, "⚠️ Finished with failures: {}", summary);
        } else {
            logging::log_success(&self.worker, &format!("Finished: {summary}"));
        }
    }
}
