//! Common test utilities and infrastructure
//!
//! Scripted action bodies and factories shared by the runner and driver
//! suites, plus resource fixtures for the REST client suite.

#![allow(dead_code)]

pub mod fixtures;
pub mod helpers;

pub use fixtures::TestFixtures;
pub use helpers::{ActionProbe, Failure, ScriptedAction, ScriptedFactory};
