//! Shared types for the share stress tooling
//!
//! Contains the resource models returned by the share service, worker
//! identities used in log output, and the logging setup common to every
//! binary in the workspace.

pub mod errors;
pub mod logging;
pub mod resources;
pub mod types;

pub use errors::*;
pub use types::*;

pub use resources::{
    AccessRule, CreateShareRequest, CreateSnapshotRequest, Share, ShareServer, Snapshot,
    VolumeType, is_error_status,
};
