//! Create a share, wait for it, delete it, wait for it to go away

use async_trait::async_trait;

use crate::actions::context::{ShareActionContext, stress_name};
use crate::config::ActionParams;
use crate::error::StressResult;
use crate::traits::StressAction;

pub const NAME: &str = "share_create_delete";

pub struct ShareCreateDelete {
    ctx: ShareActionContext,
}

impl ShareCreateDelete {
    pub fn new(ctx: ShareActionContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl StressAction for ShareCreateDelete {
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

        tracing::info!("deleting {}", share_name);
        self.ctx.delete_share(&share.id).await?;
        tracing::info!("deleted {}", share_name);

        Ok(())
    }

    async fn tear_down(&mut self) -> StressResult<()> {
        self.ctx.release().await
    }
}
