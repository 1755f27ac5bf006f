//! Service and Share Stress Configuration
//!
//! Settings for reaching the share service and shaping the resources the
//! stress actions create.

use std::time::Duration;
use stress_shared::SizeRange;
use url::Url;

use crate::client::WaitPolicy;
use crate::error::{StressError, StressResult};

/// How to reach the share service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Share API endpoint including the tenant path, e.g. `http://host:8786/v2/<tenant>`
    pub endpoint: String,
    /// Token sent as `X-Auth-Token`
    pub auth_token: Option<String>,
    /// Microversion sent as `X-OpenStack-Manila-API-Version`
    pub api_version: Option<String>,
    /// Per-request HTTP timeout
    pub request_timeout: Duration,
    /// Delay between status polls
    pub build_interval: Duration,
    /// Upper bound on any single status wait
    pub build_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8786/v2".to_string(),
            auth_token: None,
            api_version: None,
            request_timeout: Duration::from_secs(30),
            build_interval: Duration::from_secs(3),
            build_timeout: Duration::from_secs(500),
        }
    }
}

impl ServiceConfig {
    pub fn wait_policy(&self) -> WaitPolicy {
        WaitPolicy::new(self.build_interval, self.build_timeout)
    }
}

/// Shape of the resources the share actions create
#[derive(Debug, Clone)]
pub struct ShareStressConfig {
    /// Default run budget for share actions
    pub count_recreations: Option<u64>,
    /// Share sizes are drawn from this range once per action
    pub sizes_range: SizeRange,
    /// Share network new shares attach to
    pub share_network_id: Option<String>,
    /// Enabled share protocols; actions use the first one
    pub enable_protocols: Vec<String>,
}

impl Default for ShareStressConfig {
    fn default() -> Self {
        Self {
            count_recreations: None,
            sizes_range: SizeRange::default(),
            share_network_id: None,
            enable_protocols: vec!["nfs".to_string(), "cifs".to_string()],
        }
    }
}

impl ShareStressConfig {
    pub fn protocol(&self) -> StressResult<&str> {
        self.enable_protocols
            .first()
            .map(String::as_str)
            .ok_or_else(|| StressError::config("enable_protocols", "no share protocol enabled"))
    }
}

#[derive(Debug, Clone, Default)]
pub struct StressConfig {
    pub service: ServiceConfig,
    pub share_stress: ShareStressConfig,
}

impl StressConfig {
    /// Create a new builder
    pub fn builder() -> crate::config::builder::StressConfigBuilder {
        crate::config::builder::StressConfigBuilder::new()
    }

    /// Check that this configuration can drive a session
    pub fn validate(&self) -> StressResult<()> {
        let url = Url::parse(&self.service.endpoint)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(StressError::config(
                "endpoint",
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }

        if self.service.build_interval.is_zero() {
            return Err(StressError::config("build_interval", "must be greater than zero"));
        }
        if self.service.build_timeout < self.service.build_interval {
            return Err(StressError::config(
                "build_timeout",
                "must not be shorter than build_interval",
            ));
        }

        self.share_stress.protocol()?;

        if self.share_stress.count_recreations == Some(0) {
            return Err(StressError::config("count_recreations", "must be at least 1"));
        }

        Ok(())
    }
}
