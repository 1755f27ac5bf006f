//! Share Stress Actions
//!
//! Concrete [`StressAction`] bodies that exercise the share service, and the
//! factory the driver uses to build them from action file entries.
//!
//! Action names are accepted in three forms so existing action files keep
//! working: the snake-case name (`share_create_delete`), a dotted module path
//! ending in either form, or the class-style name (`ShareCreateDeleteTest`).

pub mod access_rules;
pub mod context;
pub mod share_create_delete;
pub mod share_from_snapshot;
pub mod snapshot_create_delete;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::client::WaitPolicy;
use crate::config::{ActionSpec, ShareStressConfig};
use crate::error::{StressError, StressResult};
use crate::traits::{ActionFactory, SharesApi, StressAction};

pub use access_rules::ShareAccessRulesCreateDelete;
pub use context::ShareActionContext;
pub use share_create_delete::ShareCreateDelete;
pub use share_from_snapshot::ShareFromSnapshotCreateDelete;
pub use snapshot_create_delete::SnapshotCreateDelete;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    ShareCreateDelete,
    SnapshotCreateDelete,
    ShareFromSnapshotCreateDelete,
    ShareAccessRulesCreateDelete,
}

impl ActionKind {
    pub const ALL: [ActionKind; 4] = [
        ActionKind::ShareCreateDelete,
        ActionKind::SnapshotCreateDelete,
        ActionKind::ShareFromSnapshotCreateDelete,
        ActionKind::ShareAccessRulesCreateDelete,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ActionKind::ShareCreateDelete => share_create_delete::NAME,
            ActionKind::SnapshotCreateDelete => snapshot_create_delete::NAME,
            ActionKind::ShareFromSnapshotCreateDelete => share_from_snapshot::NAME,
            ActionKind::ShareAccessRulesCreateDelete => access_rules::NAME,
        }
    }

    fn class_name(&self) -> &'static str {
        match self {
            ActionKind::ShareCreateDelete => "ShareCreateDeleteTest",
            ActionKind::SnapshotCreateDelete => "SnapshotCreateDeleteTest",
            ActionKind::ShareFromSnapshotCreateDelete => "ShareFromSnapshotCreateDeleteTest",
            ActionKind::ShareAccessRulesCreateDelete => "ShareAccessRulesCreateDeleteTest",
        }
    }

    pub fn from_name(name: &str) -> StressResult<Self> {
        let trimmed = name.trim();
        let last = trimmed.rsplit(['.', ':']).next().unwrap_or(trimmed);

        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == last || kind.class_name() == last)
            .ok_or_else(|| StressError::UnknownAction {
                name: name.to_string(),
            })
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ActionKind {
    type Err = StressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

/// Builds share actions against one share service
pub struct ShareActionFactory {
    client: Arc<dyn SharesApi>,
    config: ShareStressConfig,
    wait: WaitPolicy,
}

impl ShareActionFactory {
    pub fn new(client: Arc<dyn SharesApi>, config: ShareStressConfig, wait: WaitPolicy) -> Self {
        Self {
            client,
            config,
            wait,
        }
    }

    pub fn config(&self) -> &ShareStressConfig {
        &self.config
    }
}

impl ActionFactory for ShareActionFactory {
    fn create(&self, spec: &ActionSpec) -> StressResult<Box<dyn StressAction>> {
        let kind = ActionKind::from_name(&spec.action)?;
        let ctx = ShareActionContext::new(self.client.clone(), &self.config, self.wait)?;

        Ok(match kind {
            ActionKind::ShareCreateDelete => Box::new(ShareCreateDelete::new(ctx)),
            ActionKind::SnapshotCreateDelete => Box::new(SnapshotCreateDelete::new(ctx)),
            ActionKind::ShareFromSnapshotCreateDelete => {
                Box::new(ShareFromSnapshotCreateDelete::new(ctx))
            }
            ActionKind::ShareAccessRulesCreateDelete => {
                Box::new(ShareAccessRulesCreateDelete::new(ctx))
            }
        })
    }
}
