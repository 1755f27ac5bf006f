//! Leftover resource cleanup
//!
//! Removes everything a stress session may have left behind: interrupted
//! trials and failed waits leave `stress-tests-*` resources on the service.
//! Snapshots go first since shares with snapshots cannot be deleted.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use stress_shared::{STRESS_PREFIX, WorkerId, logging, worker_info, worker_warn};

use crate::client::{
    WaitPolicy, wait_for_share_deletion, wait_for_snapshot_deletion,
    wait_for_volume_type_deletion,
};
use crate::error::StressResult;
use crate::traits::SharesApi;

/// What one cleanup pass removed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanupSummary {
    pub snapshots: usize,
    pub shares: usize,
    pub share_servers: usize,
    pub volume_types: usize,
    /// Calls that failed and were skipped
    pub errors: usize,
}

impl CleanupSummary {
    pub fn removed(&self) -> usize {
        self.snapshots + self.shares + self.share_servers + self.volume_types
    }
}

impl fmt::Display for CleanupSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} snapshots, {} shares, {} share servers, {} volume types removed ({} errors)",
            self.snapshots, self.shares, self.share_servers, self.volume_types, self.errors
        )
    }
}

pub struct CleanupManager {
    client: Arc<dyn SharesApi>,
    share_network_id: Option<String>,
    prefix: String,
    wait: WaitPolicy,
    worker: WorkerId,
}

impl CleanupManager {
    pub fn new(
        client: Arc<dyn SharesApi>,
        share_network_id: Option<String>,
        wait: WaitPolicy,
    ) -> Self {
        Self {
            client,
            share_network_id,
            prefix: STRESS_PREFIX.to_string(),
            wait,
            worker: WorkerId::Driver,
        }
    }

    /// Match a different name prefix
    pub fn with_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Delete every prefixed resource; individual failures are logged and skipped
    pub async fn cleanup(&self) -> CleanupSummary {
        logging::log_startup(&self.worker, &format!("cleanup of '{}*' resources", self.prefix));
        let mut summary = CleanupSummary::default();

        self.cleanup_snapshots(&mut summary).await;
        self.cleanup_shares(&mut summary).await;
        self.cleanup_share_servers(&mut summary).await;
        self.cleanup_volume_types(&mut summary).await;

        logging::log_success(&self.worker, &format!("Cleanup finished: {summary}"));
        summary
    }

    fn skip(&self, summary: &mut CleanupSummary, context: &str, result: StressResult<()>) -> bool {
        match result {
            Ok(()) => true,
            Err(e) => {
                summary.errors += 1;
                worker_warn!(self.worker, error = %e, "⚠️ {} failed, skipping: {}", context, e);
                false
            }
        }
    }

    async fn cleanup_snapshots(&self, summary: &mut CleanupSummary) {
        let snapshots = match self.client.list_snapshots(true).await {
            Ok(snapshots) => snapshots,
            Err(e) => {
                self.skip(summary, "Listing snapshots", Err(e));
                return;
            }
        };

        let targets: Vec<_> = snapshots
            .into_iter()
            .filter(|snapshot| snapshot.has_name_prefix(&self.prefix))
            .collect();
        worker_info!(self.worker, "🧹 Removing {} snapshots", targets.len());

        let mut pending = Vec::new();
        for snapshot in targets {
            let result = self.client.delete_snapshot(&snapshot.id).await;
            if self.skip(summary, &format!("Deleting snapshot {}", snapshot.id), result) {
                pending.push(snapshot.id);
            }
        }
        for id in pending {
            let result = wait_for_snapshot_deletion(self.client.as_ref(), &id, self.wait).await;
            if self.skip(summary, &format!("Waiting for snapshot {id}"), result) {
                summary.snapshots += 1;
            }
        }
    }

    async fn cleanup_shares(&self, summary: &mut CleanupSummary) {
        let shares = match self.client.list_shares(true).await {
            Ok(shares) => shares,
            Err(e) => {
                self.skip(summary, "Listing shares", Err(e));
                return;
            }
        };

        let targets: Vec<_> = shares
            .into_iter()
            .filter(|share| share.has_name_prefix(&self.prefix))
            .collect();
        worker_info!(self.worker, "🧹 Removing {} shares", targets.len());

        let mut pending = Vec::new();
        for share in targets {
            let result = self.client.delete_share(&share.id).await;
            if self.skip(summary, &format!("Deleting share {}", share.id), result) {
                pending.push(share.id);
            }
        }
        for id in pending {
            let result = wait_for_share_deletion(self.client.as_ref(), &id, self.wait).await;
            if self.skip(summary, &format!("Waiting for share {id}"), result) {
                summary.shares += 1;
            }
        }
    }

    async fn cleanup_share_servers(&self, summary: &mut CleanupSummary) {
        let Some(network) = self.share_network_id.as_deref() else {
            return;
        };

        let servers = match self.client.list_share_servers().await {
            Ok(servers) => servers,
            Err(e) => {
                self.skip(summary, "Listing share servers", Err(e));
                return;
            }
        };

        for server in servers
            .into_iter()
            .filter(|server| server.share_network_id.as_deref() == Some(network))
        {
            let result = self.client.delete_share_server(&server.id).await;
            if self.skip(summary, &format!("Deleting share server {}", server.id), result) {
                summary.share_servers += 1;
            }
        }
    }

    async fn cleanup_volume_types(&self, summary: &mut CleanupSummary) {
        let volume_types = match self.client.list_volume_types().await {
            Ok(volume_types) => volume_types,
            Err(e) => {
                self.skip(summary, "Listing volume types", Err(e));
                return;
            }
        };

        for volume_type in volume_types
            .into_iter()
            .filter(|volume_type| volume_type.name.starts_with(&self.prefix))
        {
            let result = match self.client.delete_volume_type(&volume_type.id).await {
                Ok(()) => {
                    wait_for_volume_type_deletion(self.client.as_ref(), &volume_type.id, self.wait)
                        .await
                }
                Err(e) => Err(e),
            };
            if self.skip(summary, &format!("Deleting volume type {}", volume_type.id), result) {
                summary.volume_types += 1;
            }
        }
    }
}
