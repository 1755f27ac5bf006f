//! Scripted action bodies for runner and driver tests
//!
//! `ScriptedAction` records every lifecycle call in a shared `ActionProbe`
//! so tests can assert how often and in which order hooks ran.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use share_stress::{
    ActionFactory, ActionParams, ActionSpec, ShutdownTrigger, StressAction, StressError,
    StressResult,
};

/// Which trials fail (1-based)
#[derive(Debug, Clone, Default)]
pub enum Failure {
    #[default]
    Never,
    Always,
    Trials(HashSet<u64>),
}

impl Failure {
    pub fn on(trials: &[u64]) -> Self {
        Failure::Trials(trials.iter().copied().collect())
    }

    fn fails(&self, trial: u64) -> bool {
        match self {
            Failure::Never => false,
            Failure::Always => true,
            Failure::Trials(trials) => trials.contains(&trial),
        }
    }
}

/// Shared record of lifecycle calls
#[derive(Debug, Default)]
pub struct ActionProbe {
    pub set_ups: AtomicU64,
    pub runs: AtomicU64,
    pub tear_downs: AtomicU64,
    pub events: Mutex<Vec<String>>,
}

impl ActionProbe {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_ups(&self) -> u64 {
        self.set_ups.load(Ordering::SeqCst)
    }

    pub fn runs(&self) -> u64 {
        self.runs.load(Ordering::SeqCst)
    }

    pub fn tear_downs(&self) -> u64 {
        self.tear_downs.load(Ordering::SeqCst)
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn record(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

pub struct ScriptedAction {
    name: String,
    probe: Arc<ActionProbe>,
    trials: u64,
    failure: Failure,
    delay: Option<Duration>,
    trigger_after: Option<(u64, ShutdownTrigger)>,
}

impl ScriptedAction {
    pub fn new(name: &str, probe: Arc<ActionProbe>) -> Self {
        Self {
            name: name.to_string(),
            probe,
            trials: 0,
            failure: Failure::Never,
            delay: None,
            trigger_after: None,
        }
    }

    pub fn failing(mut self, failure: Failure) -> Self {
        self.failure = failure;
        self
    }

    /// Sleep this long inside every trial
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Fire `trigger` at the end of trial `trial`
    pub fn trigger_after(mut self, trial: u64, trigger: ShutdownTrigger) -> Self {
        self.trigger_after = Some((trial, trigger));
        self
    }

    pub fn boxed(self) -> Box<dyn StressAction> {
        Box::new(self)
    }
}

#[async_trait]
impl StressAction for ScriptedAction {
    fn name(&self) -> String {
        self.name.clone()
    }

    async fn set_up(&mut self, _params: &ActionParams) -> StressResult<()> {
        self.probe.set_ups.fetch_add(1, Ordering::SeqCst);
        self.probe.record(format!("{}:set_up", self.name));
        Ok(())
    }

    async fn run(&mut self) -> StressResult<()> {
        self.trials += 1;
        self.probe.runs.fetch_add(1, Ordering::SeqCst);
        self.probe.record(format!("{}:run", self.name));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some((trial, trigger)) = &self.trigger_after {
            if *trial == self.trials {
                trigger.trigger();
            }
        }

        if self.failure.fails(self.trials) {
            Err(StressError::Api {
                status: 500,
                body: format!("{} trial {} failed", self.name, self.trials),
            })
        } else {
            Ok(())
        }
    }

    async fn tear_down(&mut self) -> StressResult<()> {
        self.probe.tear_downs.fetch_add(1, Ordering::SeqCst);
        self.probe.record(format!("{}:tear_down", self.name));
        Ok(())
    }
}

/// Factory handing out scripted actions that share one probe
pub struct ScriptedFactory {
    pub probe: Arc<ActionProbe>,
    failures: Vec<(String, Failure)>,
    delay: Option<Duration>,
    slow: Vec<(String, Duration)>,
    broken: Option<String>,
}

impl ScriptedFactory {
    pub fn new() -> Self {
        Self {
            probe: ActionProbe::new(),
            failures: Vec::new(),
            delay: None,
            slow: Vec::new(),
            broken: None,
        }
    }

    pub fn failing(mut self, action: &str, failure: Failure) -> Self {
        self.failures.push((action.to_string(), failure));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Delay only the trials of `action`; overrides `with_delay`
    pub fn slow(mut self, action: &str, delay: Duration) -> Self {
        self.slow.push((action.to_string(), delay));
        self
    }

    /// Actions with this name fail in `set_up`
    pub fn broken(mut self, action: &str) -> Self {
        self.broken = Some(action.to_string());
        self
    }
}

impl ActionFactory for ScriptedFactory {
    fn create(&self, spec: &ActionSpec) -> StressResult<Box<dyn StressAction>> {
        if self.broken.as_deref() == Some(spec.action.as_str()) {
            return Ok(Box::new(BrokenSetUp));
        }

        let mut action = ScriptedAction::new(&spec.action, self.probe.clone());
        if let Some((_, failure)) = self.failures.iter().find(|(name, _)| *name == spec.action) {
            action = action.failing(failure.clone());
        }
        let delay = self
            .slow
            .iter()
            .find(|(name, _)| *name == spec.action)
            .map(|(_, delay)| *delay)
            .or(self.delay);
        if let Some(delay) = delay {
            action = action.with_delay(delay);
        }
        Ok(action.boxed())
    }
}

struct BrokenSetUp;

#[async_trait]
impl StressAction for BrokenSetUp {
    fn name(&self) -> String {
        "broken".to_string()
    }

    async fn set_up(&mut self, _params: &ActionParams) -> StressResult<()> {
        Err(StressError::config("extra_specs", "volume type rejected"))
    }

    async fn run(&mut self) -> StressResult<()> {
        Ok(())
    }

    async fn tear_down(&mut self) -> StressResult<()> {
        Ok(())
    }
}
