//! Share service stress testing
//!
//! Runs pluggable stress actions against a share service. Each action body
//! is executed repeatedly by a [`StressRunner`] that counts runs and
//! failures, honours a run budget and a stop-on-error policy, and tears the
//! action down when asked to stop. The [`StressDriver`] runs many runners
//! concurrently from an action file and reports aggregated counters.

pub mod actions;
pub mod client;
pub mod config;
pub mod error;
pub mod runtime;
pub mod traits;

// Re-export commonly used types
pub use actions::{ActionKind, ShareActionFactory};
pub use client::{RestSharesClient, WaitPolicy};
pub use config::{ActionParams, ActionSpec, RunnerConfig, StressConfig};
pub use error::{StressError, StressResult};
pub use runtime::{
    CleanupManager, DriverOptions, RunCounters, RunOutcome, ShutdownSignal, ShutdownTrigger,
    StopReason, StressDriver, StressReport, StressRunner, shutdown_channel,
};
pub use traits::{ActionFactory, SharesApi, StressAction};
