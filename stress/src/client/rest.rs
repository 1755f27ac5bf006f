//! REST API Client for the share service
//!
//! Provides HTTP client functionality to create, inspect and delete shares,
//! snapshots, access rules, volume types and share servers.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode, header};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use stress_shared::{
    AccessRule, CreateShareRequest, CreateSnapshotRequest, Share, ShareServer, Snapshot,
    VolumeType,
};
use url::Url;

use crate::config::ServiceConfig;
use crate::error::{StressError, StressResult};
use crate::traits::SharesApi;

pub const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";
pub const API_VERSION_HEADER: &str = "X-OpenStack-Manila-API-Version";

#[derive(Serialize)]
struct ShareEnvelope<'a> {
    share: &'a CreateShareRequest,
}

#[derive(Deserialize)]
struct ShareBody {
    share: Share,
}

#[derive(Deserialize)]
struct SharesBody {
    shares: Vec<Share>,
}

#[derive(Serialize)]
struct SnapshotEnvelope<'a> {
    snapshot: &'a CreateSnapshotRequest,
}

#[derive(Deserialize)]
struct SnapshotBody {
    snapshot: Snapshot,
}

#[derive(Deserialize)]
struct SnapshotsBody {
    snapshots: Vec<Snapshot>,
}

#[derive(Deserialize)]
struct AccessBody {
    access: AccessRule,
}

#[derive(Deserialize)]
struct AccessListBody {
    access_list: Vec<AccessRule>,
}

#[derive(Deserialize)]
struct VolumeTypeBody {
    #[serde(alias = "share_type")]
    volume_type: VolumeType,
}

#[derive(Deserialize)]
struct VolumeTypesBody {
    #[serde(alias = "share_types")]
    volume_types: Vec<VolumeType>,
}

#[derive(Deserialize)]
struct ShareServersBody {
    share_servers: Vec<ShareServer>,
}

/// reqwest-backed implementation of [`SharesApi`]
#[derive(Clone)]
pub struct RestSharesClient {
    base_url: Url,
    auth_token: Option<String>,
    api_version: Option<String>,
    client: reqwest::Client,
}

impl RestSharesClient {
    pub fn new(config: &ServiceConfig) -> StressResult<Self> {
        let mut base_url = Url::parse(&config.endpoint)?;
        // Url::join replaces the last segment unless the base ends in '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            base_url,
            auth_token: config.auth_token.clone(),
            api_version: config.api_version.clone(),
            client,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> StressResult<RequestBuilder> {
        let url = self.base_url.join(path)?;
        let mut builder = self
            .client
            .request(method, url)
            .header(header::ACCEPT, "application/json");

        if let Some(token) = &self.auth_token {
            builder = builder.header(AUTH_TOKEN_HEADER, token);
        }
        if let Some(version) = &self.api_version {
            builder = builder.header(API_VERSION_HEADER, version);
        }

        Ok(builder)
    }

    async fn send(
        &self,
        builder: RequestBuilder,
        resource: &str,
        id: &str,
    ) -> StressResult<Response> {
        let response = builder.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(StressError::not_found(resource, id));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!("Share API {} {} failed: HTTP {}", resource, id, status);
            return Err(StressError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        resource: &str,
        id: &str,
    ) -> StressResult<T> {
        let response = self.send(builder, resource, id).await?;
        Ok(response.json::<T>().await?)
    }

    async fn send_empty(
        &self,
        builder: RequestBuilder,
        resource: &str,
        id: &str,
    ) -> StressResult<()> {
        self.send(builder, resource, id).await?;
        Ok(())
    }

    fn share_action(
        &self,
        share_id: &str,
        body: serde_json::Value,
    ) -> StressResult<RequestBuilder> {
        Ok(self
            .request(Method::POST, &format!("shares/{share_id}/action"))?
            .json(&body))
    }
}

fn all_tenants_query(all_tenants: bool) -> Vec<(&'static str, &'static str)> {
    if all_tenants {
        vec![("all_tenants", "1")]
    } else {
        Vec::new()
    }
}

#[async_trait]
impl SharesApi for RestSharesClient {
    async fn create_share(&self, request: &CreateShareRequest) -> StressResult<Share> {
        let builder = self
            .request(Method::POST, "shares")?
            .json(&ShareEnvelope { share: request });
        let body: ShareBody = self.send_json(builder, "share", &request.name).await?;
        Ok(body.share)
    }

    async fn get_share(&self, share_id: &str) -> StressResult<Share> {
        let builder = self.request(Method::GET, &format!("shares/{share_id}"))?;
        let body: ShareBody = self.send_json(builder, "share", share_id).await?;
        Ok(body.share)
    }

    async fn delete_share(&self, share_id: &str) -> StressResult<()> {
        let builder = self.request(Method::DELETE, &format!("shares/{share_id}"))?;
        self.send_empty(builder, "share", share_id).await
    }

    async fn list_shares(&self, all_tenants: bool) -> StressResult<Vec<Share>> {
        let builder = self
            .request(Method::GET, "shares/detail")?
            .query(&all_tenants_query(all_tenants));
        let body: SharesBody = self.send_json(builder, "shares", "detail").await?;
        Ok(body.shares)
    }

    async fn create_snapshot(&self, request: &CreateSnapshotRequest) -> StressResult<Snapshot> {
        let builder = self
            .request(Method::POST, "snapshots")?
            .json(&SnapshotEnvelope { snapshot: request });
        let body: SnapshotBody = self.send_json(builder, "share", &request.share_id).await?;
        Ok(body.snapshot)
    }

    async fn get_snapshot(&self, snapshot_id: &str) -> StressResult<Snapshot> {
        let builder = self.request(Method::GET, &format!("snapshots/{snapshot_id}"))?;
        let body: SnapshotBody = self.send_json(builder, "snapshot", snapshot_id).await?;
        Ok(body.snapshot)
    }

    async fn delete_snapshot(&self, snapshot_id: &str) -> StressResult<()> {
        let builder = self.request(Method::DELETE, &format!("snapshots/{snapshot_id}"))?;
        self.send_empty(builder, "snapshot", snapshot_id).await
    }

    async fn list_snapshots(&self, all_tenants: bool) -> StressResult<Vec<Snapshot>> {
        let builder = self
            .request(Method::GET, "snapshots/detail")?
            .query(&all_tenants_query(all_tenants));
        let body: SnapshotsBody = self.send_json(builder, "snapshots", "detail").await?;
        Ok(body.snapshots)
    }

    async fn create_access_rule(
        &self,
        share_id: &str,
        access_type: &str,
        access_to: &str,
    ) -> StressResult<AccessRule> {
        let builder = self.share_action(
            share_id,
            json!({"os-allow_access": {"access_type": access_type, "access_to": access_to}}),
        )?;
        let body: AccessBody = self.send_json(builder, "share", share_id).await?;
        Ok(body.access)
    }

    async fn list_access_rules(&self, share_id: &str) -> StressResult<Vec<AccessRule>> {
        let builder = self.share_action(share_id, json!({"os-access_list": null}))?;
        let body: AccessListBody = self.send_json(builder, "share", share_id).await?;
        Ok(body.access_list)
    }

    async fn delete_access_rule(&self, share_id: &str, rule_id: &str) -> StressResult<()> {
        let builder =
            self.share_action(share_id, json!({"os-deny_access": {"access_id": rule_id}}))?;
        self.send_empty(builder, "share", share_id).await
    }

    async fn create_volume_type(
        &self,
        name: &str,
        extra_specs: &HashMap<String, String>,
    ) -> StressResult<VolumeType> {
        let builder = self
            .request(Method::POST, "types")?
            .json(&json!({"volume_type": {"name": name, "extra_specs": extra_specs}}));
        let body: VolumeTypeBody = self.send_json(builder, "volume type", name).await?;
        Ok(body.volume_type)
    }

    async fn get_volume_type(&self, volume_type_id: &str) -> StressResult<VolumeType> {
        let builder = self.request(Method::GET, &format!("types/{volume_type_id}"))?;
        let body: VolumeTypeBody = self.send_json(builder, "volume type", volume_type_id).await?;
        Ok(body.volume_type)
    }

    async fn delete_volume_type(&self, volume_type_id: &str) -> StressResult<()> {
        let builder = self.request(Method::DELETE, &format!("types/{volume_type_id}"))?;
        self.send_empty(builder, "volume type", volume_type_id).await
    }

    async fn list_volume_types(&self) -> StressResult<Vec<VolumeType>> {
        let builder = self.request(Method::GET, "types")?;
        let body: VolumeTypesBody = self.send_json(builder, "volume types", "list").await?;
        Ok(body.volume_types)
    }

    async fn list_share_servers(&self) -> StressResult<Vec<ShareServer>> {
        let builder = self.request(Method::GET, "share-servers")?;
        let body: ShareServersBody = self.send_json(builder, "share servers", "list").await?;
        Ok(body.share_servers)
    }

    async fn delete_share_server(&self, server_id: &str) -> StressResult<()> {
        let builder = self.request(Method::DELETE, &format!("share-servers/{server_id}"))?;
        self.send_empty(builder, "share server", server_id).await
    }
}
