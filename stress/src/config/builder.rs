//! Stress Configuration Builder
//!
//! Provides a flexible builder pattern for constructing stress configurations

use super::StressConfig;
use std::time::Duration;
use stress_shared::SizeRange;

pub struct StressConfigBuilder {
    config: StressConfig,
}

impl StressConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: StressConfig::default(),
        }
    }

    /// Set the share API endpoint
    pub fn endpoint<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.config.service.endpoint = endpoint.into();
        self
    }

    /// Set the auth token sent with every request
    pub fn auth_token<S: Into<String>>(mut self, token: S) -> Self {
        self.config.service.auth_token = Some(token.into());
        self
    }

    /// Set the API microversion header
    pub fn api_version<S: Into<String>>(mut self, version: S) -> Self {
        self.config.service.api_version = Some(version.into());
        self
    }

    /// Set the per-request HTTP timeout
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.service.request_timeout = timeout;
        self
    }

    /// Set the delay between status polls
    pub fn build_interval(mut self, interval: Duration) -> Self {
        self.config.service.build_interval = interval;
        self
    }

    /// Set the maximum time to wait for a status transition
    pub fn build_timeout(mut self, timeout: Duration) -> Self {
        self.config.service.build_timeout = timeout;
        self
    }

    /// Set the default run budget for share actions (None for unlimited)
    pub fn count_recreations(mut self, count: Option<u64>) -> Self {
        self.config.share_stress.count_recreations = count;
        self
    }

    /// Set the share size range
    pub fn sizes_range(mut self, range: SizeRange) -> Self {
        self.config.share_stress.sizes_range = range;
        self
    }

    /// Set the share network new shares attach to
    pub fn share_network_id<S: Into<String>>(mut self, id: S) -> Self {
        self.config.share_stress.share_network_id = Some(id.into());
        self
    }

    /// Set the enabled share protocols
    pub fn protocols<I, S>(mut self, protocols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.share_stress.enable_protocols =
            protocols.into_iter().map(Into::into).collect();
        self
    }

    /// Build the configuration
    pub fn build(self) -> StressConfig {
        self.config
    }
}

impl Default for StressConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
