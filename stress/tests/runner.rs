//! Trial runner behaviour
//!
//! Run budgets, stop-on-error aborts, shutdown handling and teardown counts,
//! exercised with both mockall mocks and scripted action bodies.

mod common;

use assert_matches::assert_matches;
use common::{ActionProbe, Failure, ScriptedAction};
use mockall::Sequence;
use share_stress::runtime::runner::{EXIT_ABORT, EXIT_GRACEFUL, RunnerState};
use share_stress::traits::MockStressAction;
use share_stress::{
    RunCounters, RunOutcome, RunnerConfig, ShutdownSignal, StressError, StressRunner,
    shutdown_channel,
};
use std::time::Duration;
use tokio::time::timeout;

fn named_mock() -> MockStressAction {
    let mut action = MockStressAction::new();
    action.expect_name().return_const("mocked".to_string());
    action
}

#[tokio::test]
async fn test_budget_of_n_successful_trials() {
    for n in [1u64, 2, 7, 25] {
        let mut action = named_mock();
        action.expect_run().times(n as usize).returning(|| Ok(()));
        action.expect_tear_down().never();

        let mut runner = StressRunner::new(Box::new(action), RunnerConfig::new().max_runs(Some(n)));
        let outcome = runner.execute(ShutdownSignal::never()).await.unwrap();

        assert_eq!(outcome, RunOutcome::Completed);
        assert_eq!(runner.counters(), RunCounters { runs: n, fails: 0 });
    }
}

#[tokio::test]
async fn test_stop_on_error_aborts_on_second_failure() {
    let mut action = named_mock();
    action
        .expect_run()
        .times(2)
        .returning(|| Err(StressError::Api { status: 500, body: "boom".to_string() }));
    action.expect_tear_down().times(1).returning(|| Ok(()));

    let mut runner = StressRunner::new(Box::new(action), RunnerConfig::new().stop_on_error(true));
    let outcome = runner.execute(ShutdownSignal::never()).await.unwrap();

    assert_eq!(outcome, RunOutcome::Aborted);
    assert_eq!(outcome.exit_code(), Some(EXIT_ABORT));
    assert_eq!(runner.counters(), RunCounters { runs: 2, fails: 2 });
    assert_eq!(runner.state(), RunnerState::Terminated);
}

#[tokio::test]
async fn test_single_failure_within_budget_does_not_abort() {
    let mut action = named_mock();
    let mut seq = Sequence::new();
    action.expect_run().times(1).in_sequence(&mut seq).returning(|| Ok(()));
    action
        .expect_run()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| Err(StressError::Api { status: 500, body: "once".to_string() }));
    action.expect_run().times(1).in_sequence(&mut seq).returning(|| Ok(()));
    action.expect_tear_down().never();

    let mut runner = StressRunner::new(Box::new(action), RunnerConfig::new().max_runs(Some(3)));
    let outcome = runner.execute(ShutdownSignal::never()).await.unwrap();

    assert_eq!(outcome, RunOutcome::Completed);
    assert_eq!(runner.counters(), RunCounters { runs: 3, fails: 1 });
}

#[tokio::test]
async fn test_single_failure_with_stop_on_error_keeps_running() {
    let probe = ActionProbe::new();
    let action = ScriptedAction::new("flaky", probe.clone()).failing(Failure::on(&[2]));

    let config = RunnerConfig::new().max_runs(Some(4)).stop_on_error(true);
    let mut runner = StressRunner::new(action.boxed(), config);
    let outcome = runner.execute(ShutdownSignal::never()).await.unwrap();

    assert_eq!(outcome, RunOutcome::Completed);
    assert_eq!(runner.counters(), RunCounters { runs: 4, fails: 1 });
    assert_eq!(probe.tear_downs(), 0);
}

#[tokio::test]
async fn test_teardown_on_completion_flag() {
    let probe = ActionProbe::new();
    let action = ScriptedAction::new("steady", probe.clone());

    let config = RunnerConfig::new().max_runs(Some(2)).teardown_on_completion(true);
    let mut runner = StressRunner::new(action.boxed(), config);
    runner.execute(ShutdownSignal::never()).await.unwrap();

    assert_eq!(probe.tear_downs(), 1);
    // Already torn down: a caller-driven teardown is a no-op
    runner.tear_down().await.unwrap();
    assert_eq!(probe.tear_downs(), 1);
}

#[tokio::test]
async fn test_signal_after_fifth_trial_stops_loop() {
    let probe = ActionProbe::new();
    let (trigger, signal) = shutdown_channel();
    let action = ScriptedAction::new("endless", probe.clone()).trigger_after(5, trigger);

    let mut runner = StressRunner::new(action.boxed(), RunnerConfig::default());
    let outcome = timeout(Duration::from_secs(5), runner.execute(signal))
        .await
        .expect("runner did not stop after shutdown")
        .unwrap();

    assert_eq!(outcome, RunOutcome::Interrupted);
    assert_eq!(outcome.exit_code(), Some(EXIT_GRACEFUL));
    assert_eq!(runner.counters(), RunCounters { runs: 5, fails: 0 });
    assert_eq!(probe.runs(), 5);
    assert_eq!(probe.tear_downs(), 1);
}

#[tokio::test]
async fn test_unbounded_loop_ends_on_signal() {
    let probe = ActionProbe::new();
    let (trigger, signal) = shutdown_channel();
    let action = ScriptedAction::new("endless", probe.clone()).with_delay(Duration::from_millis(2));

    let mut runner = StressRunner::new(action.boxed(), RunnerConfig::default());
    let progress = runner.subscribe();

    let handle = tokio::spawn(async move {
        let outcome = runner.execute(signal).await;
        (runner, outcome)
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    trigger.trigger();

    let (runner, outcome) = timeout(Duration::from_secs(5), handle)
        .await
        .expect("runner did not stop after shutdown")
        .unwrap();

    assert_matches!(outcome, Ok(RunOutcome::Interrupted));
    assert!(runner.counters().runs > 0);
    assert_eq!(*progress.borrow(), runner.counters());
    assert_eq!(probe.tear_downs(), 1);
}

#[tokio::test]
async fn test_in_flight_trial_is_interrupted_and_not_counted() {
    let probe = ActionProbe::new();
    let (trigger, signal) = shutdown_channel();
    let action = ScriptedAction::new("slow", probe.clone()).with_delay(Duration::from_secs(60));

    let mut runner = StressRunner::new(action.boxed(), RunnerConfig::default());
    let stopper = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.trigger();
    });

    let outcome = timeout(Duration::from_secs(5), runner.execute(signal))
        .await
        .expect("in-flight trial was not interrupted")
        .unwrap();
    stopper.await.unwrap();

    assert_eq!(outcome, RunOutcome::Interrupted);
    assert_eq!(probe.runs(), 1);
    assert_eq!(runner.counters(), RunCounters::default());
    assert_eq!(probe.tear_downs(), 1);
}

#[tokio::test]
async fn test_teardown_error_on_abort_is_swallowed() {
    let mut action = named_mock();
    action
        .expect_run()
        .times(2)
        .returning(|| Err(StressError::Api { status: 503, body: "down".to_string() }));
    action
        .expect_tear_down()
        .times(1)
        .returning(|| Err(StressError::Api { status: 500, body: "teardown".to_string() }));

    let mut runner = StressRunner::new(Box::new(action), RunnerConfig::new().stop_on_error(true));
    let outcome = runner.execute(ShutdownSignal::never()).await.unwrap();

    assert_eq!(outcome, RunOutcome::Aborted);
}

#[tokio::test]
async fn test_progress_published_after_each_trial() {
    let probe = ActionProbe::new();
    let action = ScriptedAction::new("counted", probe).failing(Failure::on(&[1]));

    let mut runner = StressRunner::new(action.boxed(), RunnerConfig::new().max_runs(Some(3)));
    let mut progress = runner.subscribe();
    assert_eq!(*progress.borrow_and_update(), RunCounters::default());

    runner.execute(ShutdownSignal::never()).await.unwrap();

    assert!(progress.has_changed().unwrap());
    assert_eq!(*progress.borrow_and_update(), RunCounters { runs: 3, fails: 1 });
}

#[tokio::test]
async fn test_set_up_passes_params() {
    let mut action = named_mock();
    action
        .expect_set_up()
        .withf(|params| params.get_str("access_to").unwrap() == Some("10.0.0.1"))
        .times(1)
        .returning(|_| Ok(()));

    let mut runner = StressRunner::new(Box::new(action), RunnerConfig::default());
    let params = share_stress::ActionParams::new().with("access_to", "10.0.0.1");
    runner.set_up(&params).await.unwrap();
    assert_eq!(runner.state(), RunnerState::Idle);
}
