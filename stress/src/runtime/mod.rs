//! Stress runtime
//!
//! Trial runners, the driver that supervises them, shutdown plumbing, and
//! post-session cleanup.

pub mod cleanup;
pub mod counters;
pub mod driver;
pub mod runner;
pub mod shutdown;
pub mod signals;

pub use cleanup::{CleanupManager, CleanupSummary};
pub use counters::RunCounters;
pub use driver::{DriverOptions, StopReason, StressDriver, StressReport, WorkerReport};
pub use runner::{RunOutcome, RunnerState, StressRunner};
pub use shutdown::{ShutdownSignal, ShutdownTrigger, shutdown_channel};
pub use signals::{spawn_signal_listener, spawn_signal_listener_with};
