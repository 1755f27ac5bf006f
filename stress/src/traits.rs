//! Trait definitions with mockall annotations for testing
//!
//! These traits are the seams between the trial runner, the concrete stress
//! actions, and the share service. Each one gets a generated mock so the
//! runner and driver can be exercised without a live service.

use std::collections::HashMap;

use stress_shared::{
    AccessRule, CreateShareRequest, CreateSnapshotRequest, Share, ShareServer, Snapshot,
    VolumeType,
};

use crate::config::{ActionParams, ActionSpec};
use crate::error::StressResult;

/// Pluggable unit of work a trial runner executes repeatedly
///
/// `set_up` runs once before the first trial, `run` once per trial, and
/// `tear_down` at most once when the runner stops.
#[mockall::automock]
#[async_trait::async_trait]
pub trait StressAction: Send {
    /// Action name used in log output and aggregated statistics
    fn name(&self) -> String;

    /// Prepare any structures the trials need
    ///
    /// `params` holds the free-form keyword arguments from the action file.
    async fn set_up(&mut self, params: &ActionParams) -> StressResult<()>;

    /// Execute one trial
    async fn run(&mut self) -> StressResult<()>;

    /// Release whatever `set_up` created
    async fn tear_down(&mut self) -> StressResult<()>;
}

/// Builds action bodies for the driver, one per runner
#[mockall::automock]
pub trait ActionFactory: Send + Sync {
    fn create(&self, spec: &ActionSpec) -> StressResult<Box<dyn StressAction>>;
}

/// Share service REST surface used by the stress actions and cleanup
#[mockall::automock]
#[async_trait::async_trait]
pub trait SharesApi: Send + Sync {
    async fn create_share(&self, request: &CreateShareRequest) -> StressResult<Share>;

    async fn get_share(&self, share_id: &str) -> StressResult<Share>;

    async fn delete_share(&self, share_id: &str) -> StressResult<()>;

    /// List shares with details; `all_tenants` requires admin credentials
    async fn list_shares(&self, all_tenants: bool) -> StressResult<Vec<Share>>;

    async fn create_snapshot(&self, request: &CreateSnapshotRequest) -> StressResult<Snapshot>;

    async fn get_snapshot(&self, snapshot_id: &str) -> StressResult<Snapshot>;

    async fn delete_snapshot(&self, snapshot_id: &str) -> StressResult<()>;

    async fn list_snapshots(&self, all_tenants: bool) -> StressResult<Vec<Snapshot>>;

    async fn create_access_rule(
        &self,
        share_id: &str,
        access_type: &str,
        access_to: &str,
    ) -> StressResult<AccessRule>;

    async fn list_access_rules(&self, share_id: &str) -> StressResult<Vec<AccessRule>>;

    async fn delete_access_rule(&self, share_id: &str, rule_id: &str) -> StressResult<()>;

    async fn create_volume_type(
        &self,
        name: &str,
        extra_specs: &HashMap<String, String>,
    ) -> StressResult<VolumeType>;

    async fn get_volume_type(&self, volume_type_id: &str) -> StressResult<VolumeType>;

    async fn delete_volume_type(&self, volume_type_id: &str) -> StressResult<()>;

    async fn list_volume_types(&self) -> StressResult<Vec<VolumeType>>;

    async fn list_share_servers(&self) -> StressResult<Vec<ShareServer>>;

    async fn delete_share_server(&self, server_id: &str) -> StressResult<()>;
}
