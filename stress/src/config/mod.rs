//! Configuration Management
//!
//! This module provides configuration structures and builders for stress sessions.

pub mod actions;
pub mod builder;
pub mod runner;
pub mod stress;

// Re-export main types
pub use actions::{ActionParams, ActionSpec, load_action_file, parse_action_specs};
pub use builder::StressConfigBuilder;
pub use runner::RunnerConfig;
pub use stress::{ServiceConfig, ShareStressConfig, StressConfig};
