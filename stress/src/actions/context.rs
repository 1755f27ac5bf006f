//! Share action context
//!
//! State every share action carries between trials: the client, the share
//! shape, and an optional volume type the action created for itself.

use std::sync::Arc;
use stress_shared::{
    CreateShareRequest, CreateSnapshotRequest, STRESS_PREFIX, Share, Snapshot, rand_name,
};

use crate::client::{
    WaitPolicy, wait_for_share_deletion, wait_for_share_status, wait_for_snapshot_deletion,
    wait_for_snapshot_status, wait_for_volume_type_deletion,
};
use crate::config::{ActionParams, ShareStressConfig};
use crate::error::{StressError, StressResult};
use crate::traits::SharesApi;

pub const AVAILABLE: &str = "available";
pub const ACTIVE: &str = "active";

/// Resource name carrying the stress prefix, e.g. `stress-tests-share-name-42`
pub fn stress_name(kind: &str) -> String {
    rand_name(&format!("{STRESS_PREFIX}{kind}"))
}

pub struct ShareActionContext {
    client: Arc<dyn SharesApi>,
    protocol: String,
    share_size: u32,
    share_network_id: Option<String>,
    volume_type_id: Option<String>,
    owned_volume_type: Option<String>,
    wait: WaitPolicy,
}

impl ShareActionContext {
    /// Draw the share size and pick the protocol for one action instance
    pub fn new(
        client: Arc<dyn SharesApi>,
        config: &ShareStressConfig,
        wait: WaitPolicy,
    ) -> StressResult<Self> {
        Ok(Self {
            client,
            protocol: config.protocol()?.to_string(),
            share_size: config.sizes_range.pick(),
            share_network_id: config.share_network_id.clone(),
            volume_type_id: None,
            owned_volume_type: None,
            wait,
        })
    }

    pub fn client(&self) -> &dyn SharesApi {
        self.client.as_ref()
    }

    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    pub fn share_size(&self) -> u32 {
        self.share_size
    }

    pub fn share_network_id(&self) -> Option<&str> {
        self.share_network_id.as_deref()
    }

    pub fn volume_type_id(&self) -> Option<&str> {
        self.volume_type_id.as_deref()
    }

    pub fn wait_policy(&self) -> WaitPolicy {
        self.wait
    }

    /// Apply the common keyword arguments
    ///
    /// - `share_network_id` (or `shared_network_id`) overrides the configured network
    /// - `volume_type_id` selects an existing volume type
    /// - `extra_specs` creates a volume type owned by this action
    pub async fn apply_params(&mut self, params: &ActionParams) -> StressResult<()> {
        let network = match params.get_str("share_network_id")? {
            Some(id) => Some(id),
            None => params.get_str("shared_network_id")?,
        };
        if let Some(id) = network {
            self.share_network_id = Some(id.to_string());
        }

        let volume_type_id = params.get_str("volume_type_id")?;
        let extra_specs = params.get_string_map("extra_specs")?;

        match (volume_type_id, extra_specs) {
            (Some(_), Some(_)) => Err(StressError::InvalidParams {
                key: "extra_specs".to_string(),
                message: "cannot be combined with volume_type_id".to_string(),
            }),
            (Some(id), None) => {
                self.volume_type_id = Some(id.to_string());
                Ok(())
            }
            (None, Some(extra_specs)) => {
                let name = stress_name("volume-type");
                let volume_type = self.client.create_volume_type(&name, &extra_specs).await?;
                tracing::info!("📋 Created volume type {} ({})", name, volume_type.id);
                self.volume_type_id = Some(volume_type.id.clone());
                self.owned_volume_type = Some(volume_type.id);
                Ok(())
            }
            (None, None) => Ok(()),
        }
    }

    /// Delete the volume type `apply_params` created, if any
    pub async fn release(&mut self) -> StressResult<()> {
        let Some(id) = self.owned_volume_type.take() else {
            return Ok(());
        };

        self.volume_type_id = None;
        self.client.delete_volume_type(&id).await?;
        wait_for_volume_type_deletion(self.client(), &id, self.wait).await?;
        tracing::info!("🗑️ Deleted volume type {}", id);
        Ok(())
    }

    /// Create a share (optionally from a snapshot) and wait until it is available
    pub async fn create_share(&self, name: &str, snapshot_id: Option<&str>) -> StressResult<Share> {
        let request = CreateShareRequest {
            share_proto: self.protocol.clone(),
            size: self.share_size,
            name: name.to_string(),
            description: Some(rand_name("share-description")),
            share_network_id: self.share_network_id.clone(),
            snapshot_id: snapshot_id.map(str::to_string),
            volume_type_id: self.volume_type_id.clone(),
        };

        let share = self.client.create_share(&request).await?;
        wait_for_share_status(self.client(), &share.id, AVAILABLE, self.wait).await?;
        Ok(share)
    }

    pub async fn delete_share(&self, share_id: &str) -> StressResult<()> {
        self.client.delete_share(share_id).await?;
        wait_for_share_deletion(self.client(), share_id, self.wait).await
    }

    /// Snapshot a share and wait until the snapshot is available
    pub async fn create_snapshot(&self, share_id: &str, name: &str) -> StressResult<Snapshot> {
        let request = CreateSnapshotRequest {
            share_id: share_id.to_string(),
            name: name.to_string(),
            description: Some(rand_name("snapshot-description")),
            force: false,
        };

        let snapshot = self.client.create_snapshot(&request).await?;
        wait_for_snapshot_status(self.client(), &snapshot.id, AVAILABLE, self.wait).await?;
        Ok(snapshot)
    }

    pub async fn delete_snapshot(&self, snapshot_id: &str) -> StressResult<()> {
        self.client.delete_snapshot(snapshot_id).await?;
        wait_for_snapshot_deletion(self.client(), snapshot_id, self.wait).await
    }
}
