//! Trial Runner Configuration

/// Trial loop bounds and abort policy for one runner
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Total trials before normal completion; `None` runs until stopped
    pub max_runs: Option<u64>,
    /// Abort once more than one trial has failed
    pub stop_on_error: bool,
    /// Let the runner tear the action down itself when the run budget is
    /// exhausted. Off by default: on that path teardown belongs to the caller.
    pub teardown_on_completion: bool,
}

impl RunnerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_runs(mut self, max_runs: Option<u64>) -> Self {
        self.max_runs = max_runs;
        self
    }

    pub fn stop_on_error(mut self, stop_on_error: bool) -> Self {
        self.stop_on_error = stop_on_error;
        self
    }

    pub fn teardown_on_completion(mut self, enabled: bool) -> Self {
        self.teardown_on_completion = enabled;
        self
    }
}
