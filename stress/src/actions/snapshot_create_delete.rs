//! Snapshot lifecycle on a freshly created share

use async_trait::async_trait;

use crate::actions::context::{ShareActionContext, stress_name};
use crate::config::ActionParams;
use crate::error::StressResult;
use crate::traits::StressAction;

pub const NAME: &str = "snapshot_create_delete";

pub struct SnapshotCreateDelete {
    ctx: ShareActionContext,
}

impl SnapshotCreateDelete {
    pub fn new(ctx: ShareActionContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl StressAction for SnapshotCreateDelete {
    fn name(&self) -> String {
        NAME.to_string()
    }

    async fn set_up(&mut self, params: &ActionParams) -> StressResult<()> {
        self.ctx.apply_params(params).await
    }

    async fn run(&mut self) -> StressResult<()> {
        let share_name = stress_name("share-name");
        tracing::info!("creating {}", share_name);
        let share = self.ctx.create_share(&share_name, None).await?;
        tracing::info!("created {}", share_name);

        let snapshot_name = stress_name("snapshot-name");
        tracing::info!("creating {}", snapshot_name);
        let snapshot = self.ctx.create_snapshot(&share.id, &snapshot_name).await?;
        tracing::info!("created {}", snapshot_name);

        tracing::info!("deleting {}", snapshot_name);
        self.ctx.delete_snapshot(&snapshot.id).await?;
        tracing::info!("deleted {}", snapshot_name);

        tracing::info!("deleting {}", share_name);
        self.ctx.delete_share(&share.id).await?;
        tracing::info!("deleted {}", share_name);

        Ok(())
    }

    async fn tear_down(&mut self) -> StressResult<()> {
        self.ctx.release().await
    }
}
