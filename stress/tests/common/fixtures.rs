//! Test fixtures providing consistent test data

use serde_json::{Value, json};
use share_stress::config::ServiceConfig;
use std::time::Duration;

pub struct TestFixtures;

impl TestFixtures {
    pub const TENANT_PATH: &'static str = "/v2/tenant-1";
    pub const AUTH_TOKEN: &'static str = "stress-token";
    pub const API_VERSION: &'static str = "2.7";

    /// Service config pointing at a wiremock server
    pub fn service_config(server_uri: &str) -> ServiceConfig {
        ServiceConfig {
            endpoint: format!("{}{}", server_uri, Self::TENANT_PATH),
            auth_token: Some(Self::AUTH_TOKEN.to_string()),
            api_version: Some(Self::API_VERSION.to_string()),
            request_timeout: Duration::from_secs(5),
            build_interval: Duration::from_millis(10),
            build_timeout: Duration::from_secs(1),
        }
    }

    pub fn path(suffix: &str) -> String {
        format!("{}/{}", Self::TENANT_PATH, suffix)
    }

    pub fn share_json(id: &str, name: &str, status: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "status": status,
            "size": 1,
            "share_proto": "NFS",
            "share_network_id": null,
            "export_location": null,
            "links": []
        })
    }

    pub fn snapshot_json(id: &str, name: &str, status: &str, share_id: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "status": status,
            "share_id": share_id,
            "size": 1
        })
    }

    pub fn access_json(id: &str, state: &str) -> Value {
        json!({
            "id": id,
            "access_type": "ip",
            "access_to": "1.1.1.1",
            "state": state
        })
    }
}
