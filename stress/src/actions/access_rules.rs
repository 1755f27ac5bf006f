//! Access rule lifecycle on a freshly created share

use async_trait::async_trait;

use crate::actions::context::{ACTIVE, ShareActionContext, stress_name};
use crate::client::{wait_for_access_rule_deletion, wait_for_access_rule_status};
use crate::config::ActionParams;
use crate::error::StressResult;
use crate::traits::StressAction;

pub const NAME: &str = "share_access_rules_create_delete";

pub const DEFAULT_ACCESS_TYPE: &str = "ip";
pub const DEFAULT_ACCESS_TO: &str = "1.1.1.1";

pub struct ShareAccessRulesCreateDelete {
    ctx: ShareActionContext,
    access_type: String,
    access_to: String,
}

impl ShareAccessRulesCreateDelete {
    pub fn new(ctx: ShareActionContext) -> Self {
        Self {
            ctx,
            access_type: DEFAULT_ACCESS_TYPE.to_string(),
            access_to: DEFAULT_ACCESS_TO.to_string(),
        }
    }
}

#[async_trait]
impl StressAction for ShareAccessRulesCreateDelete {
    fn name(&self) -> String {
        NAME.to_string()
    }

    async fn set_up(&mut self, params: &ActionParams) -> StressResult<()> {
        self.ctx.apply_params(params).await?;
        if let Some(access_type) = params.get_str("access_type")? {
            self.access_type = access_type.to_string();
        }
        if let Some(access_to) = params.get_str("access_to")? {
            self.access_to = access_to.to_string();
        }
        Ok(())
    }

    async fn run(&mut self) -> StressResult<()> {
        let share_name = stress_name("share-name");
        tracing::info!("creating {}", share_name);
        let share = self.ctx.create_share(&share_name, None).await?;
        tracing::info!("created {}", share_name);

        let client = self.ctx.client();
        let wait = self.ctx.wait_policy();

        tracing::info!("creating rule for {}", share_name);
        let rule = client
            .create_access_rule(&share.id, &self.access_type, &self.access_to)
            .await?;
        wait_for_access_rule_status(client, &share.id, &rule.id, ACTIVE, wait).await?;
        tracing::info!("created rule for {}", share_name);

        tracing::info!("deleting rule {}", rule.id);
        client.delete_access_rule(&share.id, &rule.id).await?;
        wait_for_access_rule_deletion(client, &share.id, &rule.id, wait).await?;
        tracing::info!("deleted rule {}", rule.id);

        tracing::info!("deleting {}", share_name);
        self.ctx.delete_share(&share.id).await?;
        tracing::info!("deleted {}", share_name);

        Ok(())
    }

    async fn tear_down(&mut self) -> StressResult<()> {
        self.ctx.release().await
    }
}
