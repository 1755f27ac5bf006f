//! Resource models exchanged with the share service
//!
//! Only the fields the stress tooling reads are modelled; everything else in
//! the service's JSON is ignored on deserialization.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Status every waiter treats as terminal failure (`error`, `error_deleting`, ...)
pub fn is_error_status(status: &str) -> bool {
    status.starts_with("error")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Share {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub status: String,
    #[serde(default)]
    pub size: Option<u32>,
    #[serde(default)]
    pub share_proto: Option<String>,
    #[serde(default)]
    pub share_network_id: Option<String>,
    #[serde(default)]
    pub snapshot_id: Option<String>,
    #[serde(default)]
    pub volume_type: Option<String>,
}

impl Share {
    pub fn has_name_prefix(&self, prefix: &str) -> bool {
        self.name.as_deref().is_some_and(|n| n.starts_with(prefix))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub status: String,
    #[serde(default)]
    pub share_id: Option<String>,
    #[serde(default)]
    pub size: Option<u32>,
}

impl Snapshot {
    pub fn has_name_prefix(&self, prefix: &str) -> bool {
        self.name.as_deref().is_some_and(|n| n.starts_with(prefix))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessRule {
    pub id: String,
    pub access_type: String,
    pub access_to: String,
    /// Older service versions report `state`, newer ones `access_state`
    #[serde(alias = "access_state")]
    pub state: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeType {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub extra_specs: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareServer {
    pub id: String,
    #[serde(default)]
    pub share_network_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Body of a share create call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateShareRequest {
    pub share_proto: String,
    pub size: u32,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_network_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_id: Option<String>,
    #[serde(rename = "volume_type", skip_serializing_if = "Option::is_none")]
    pub volume_type_id: Option<String>,
}

/// Body of a snapshot create call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateSnapshotRequest {
    pub share_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub force: bool,
}
