//! Share cloned from a snapshot
//!
//! Builds share -> snapshot -> share-from-snapshot, then removes them in
//! reverse order, waiting for each deletion before the next.

use async_trait::async_trait;

use crate::actions::context::{ShareActionContext, stress_name};
use crate::config::ActionParams;
use crate::error::StressResult;
use crate::traits::StressAction;

pub const NAME: &str = "share_from_snapshot_create_delete";

pub struct ShareFromSnapshotCreateDelete {
    ctx: ShareActionContext,
}

impl ShareFromSnapshotCreateDelete {
    pub fn new(ctx: ShareActionContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl StressAction for ShareFromSnapshotCreateDelete {
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
        tracing::info!("created {}", share.id);

        let snapshot_name = stress_name("snapshot-name");
        tracing::info!("creating {}", snapshot_name);
        let snapshot = self.ctx.create_snapshot(&share.id, &snapshot_name).await?;
        tracing::info!("created {}", snapshot_name);

        let clone_name = stress_name("share-from-snapshot");
        tracing::info!("creating {}", clone_name);
        let clone = self.ctx.create_share(&clone_name, Some(&snapshot.id)).await?;
        tracing::info!("created {}", clone_name);

        tracing::info!("deleting {}", clone_name);
        self.ctx.delete_share(&clone.id).await?;
        tracing::info!("deleted {}", clone_name);

        tracing::info!("deleting {}", snapshot_name);
        self.ctx.delete_snapshot(&snapshot.id).await?;
        tracing::info!("deleted {}", snapshot_name);

        tracing::info!("deleting {}", share_name);
        self.ctx.delete_share(&share.id).await?;
        tracing::info!("deleted {}", share.id);

        Ok(())
    }

    async fn tear_down(&mut self) -> StressResult<()> {
        self.ctx.release().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::testing::{context, share, snapshot};
    use crate::error::StressError;
    use crate::traits::MockSharesApi;
    use std::sync::{Arc, Mutex};

    #[tokio::test]
    async fn test_clone_removed_before_snapshot_and_origin() {
        let deleted = Arc::new(Mutex::new(Vec::<String>::new()));
        let mut api = MockSharesApi::new();

        api.expect_create_share().times(2).returning(|req| {
            let id = if req.snapshot_id.is_some() { "clone-1" } else { "share-1" };
            Ok(share(id, "creating", Some(&req.name)))
        });
        api.expect_create_snapshot()
            .times(1)
            .returning(|req| Ok(snapshot("snap-1", "creating", &req.share_id)));

        let share_log = deleted.clone();
        api.expect_delete_share().times(2).returning(move |id| {
            share_log.lock().unwrap().push(id.to_string());
            Ok(())
        });
        let snap_log = deleted.clone();
        api.expect_delete_snapshot().times(1).returning(move |id| {
            snap_log.lock().unwrap().push(id.to_string());
            Ok(())
        });

        let get_log = deleted.clone();
        api.expect_get_share().returning(move |id| {
            if get_log.lock().unwrap().iter().any(|d| d == id) {
                Err(StressError::not_found("share", id))
            } else {
                Ok(share(id, "available", None))
            }
        });
        let snap_get_log = deleted.clone();
        api.expect_get_snapshot().returning(move |id| {
            if snap_get_log.lock().unwrap().iter().any(|d| d == id) {
                Err(StressError::not_found("snapshot", id))
            } else {
                Ok(snapshot(id, "available", "share-1"))
            }
        });

        let mut action = ShareFromSnapshotCreateDelete::new(context(api));
        action.run().await.unwrap();

        assert_eq!(*deleted.lock().unwrap(), vec!["clone-1", "snap-1", "share-1"]);
    }
}
