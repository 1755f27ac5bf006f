//! Status waiters
//!
//! Poll the share service until a resource reaches a status or disappears.
//! Any `error*` status ends the wait immediately; otherwise the wait gives
//! up after `WaitPolicy::timeout`.

use std::future::Future;
use std::time::Duration;
use stress_shared::is_error_status;
use tokio::time::{Instant, sleep};

use crate::error::{StressError, StressResult};
use crate::traits::SharesApi;

/// Poll cadence and bound for status waits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub interval: Duration,
    pub timeout: Duration,
}

impl WaitPolicy {
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }
}

enum Probe {
    Reached,
    Pending(String),
}

async fn poll_until<F, Fut>(
    resource: &str,
    id: &str,
    expected: &str,
    policy: WaitPolicy,
    mut probe: F,
) -> StressResult<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = StressResult<Probe>>,
{
    let deadline = Instant::now() + policy.timeout;

    loop {
        let last_status = match probe().await? {
            Probe::Reached => return Ok(()),
            Probe::Pending(status) => status,
        };

        if is_error_status(&last_status) {
            return Err(StressError::ResourceError {
                resource: resource.to_string(),
                id: id.to_string(),
                status: last_status,
            });
        }

        if Instant::now() >= deadline {
            return Err(StressError::Timeout {
                resource: resource.to_string(),
                id: id.to_string(),
                expected: expected.to_string(),
                last_status,
                timeout: policy.timeout,
            });
        }

        sleep(policy.interval).await;
    }
}

pub async fn wait_for_share_status(
    api: &dyn SharesApi,
    share_id: &str,
    status: &str,
    policy: WaitPolicy,
) -> StressResult<()> {
    poll_until("share", share_id, status, policy, || async move {
        let share = api.get_share(share_id).await?;
        Ok::<_, StressError>(if share.status == status {
            Probe::Reached
        } else {
            Probe::Pending(share.status)
        })
    })
    .await
}

pub async fn wait_for_snapshot_status(
    api: &dyn SharesApi,
    snapshot_id: &str,
    status: &str,
    policy: WaitPolicy,
) -> StressResult<()> {
    poll_until("snapshot", snapshot_id, status, policy, || async move {
        let snapshot = api.get_snapshot(snapshot_id).await?;
        Ok::<_, StressError>(if snapshot.status == status {
            Probe::Reached
        } else {
            Probe::Pending(snapshot.status)
        })
    })
    .await
}

pub async fn wait_for_access_rule_status(
    api: &dyn SharesApi,
    share_id: &str,
    rule_id: &str,
    status: &str,
    policy: WaitPolicy,
) -> StressResult<()> {
    poll_until("access rule", rule_id, status, policy, || async move {
        let rules = api.list_access_rules(share_id).await?;
        let rule = rules
            .into_iter()
            .find(|rule| rule.id == rule_id)
            .ok_or_else(|| StressError::not_found("access rule", rule_id))?;
        Ok::<_, StressError>(if rule.state == status {
            Probe::Reached
        } else {
            Probe::Pending(rule.state)
        })
    })
    .await
}

pub async fn wait_for_share_deletion(
    api: &dyn SharesApi,
    share_id: &str,
    policy: WaitPolicy,
) -> StressResult<()> {
    poll_until("share", share_id, "deleted", policy, || async move {
        match api.get_share(share_id).await {
            Ok(share) => Ok(Probe::Pending(share.status)),
            Err(e) if e.is_not_found() => Ok(Probe::Reached),
            Err(e) => Err(e),
        }
    })
    .await
}

pub async fn wait_for_snapshot_deletion(
    api: &dyn SharesApi,
    snapshot_id: &str,
    policy: WaitPolicy,
) -> StressResult<()> {
    poll_until("snapshot", snapshot_id, "deleted", policy, || async move {
        match api.get_snapshot(snapshot_id).await {
            Ok(snapshot) => Ok(Probe::Pending(snapshot.status)),
            Err(e) if e.is_not_found() => Ok(Probe::Reached),
            Err(e) => Err(e),
        }
    })
    .await
}

pub async fn wait_for_access_rule_deletion(
    api: &dyn SharesApi,
    share_id: &str,
    rule_id: &str,
    policy: WaitPolicy,
) -> StressResult<()> {
    poll_until("access rule", rule_id, "deleted", policy, || async move {
        let rules = api.list_access_rules(share_id).await?;
        Ok::<_, StressError>(match rules.into_iter().find(|rule| rule.id == rule_id) {
            Some(rule) => Probe::Pending(rule.state),
            None => Probe::Reached,
        })
    })
    .await
}

pub async fn wait_for_volume_type_deletion(
    api: &dyn SharesApi,
    volume_type_id: &str,
    policy: WaitPolicy,
) -> StressResult<()> {
    poll_until("volume type", volume_type_id, "deleted", policy, || async move {
        match api.get_volume_type(volume_type_id).await {
            Ok(_) => Ok(Probe::Pending("present".to_string())),
            Err(e) if e.is_not_found() => Ok(Probe::Reached),
            Err(e) => Err(e),
        }
    })
    .await
}
