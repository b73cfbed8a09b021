//! HTTP client for the SkySQL REST API
//!
//! A client is built per tool invocation from [`ApiConfig`]. Building fails
//! with [`ApiError::MissingApiKey`] before any network I/O when the key is not
//! in the environment. Dropping the client closes its connections.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, error, instrument};

use super::error::{ApiError, ApiResult};
use super::types::{
    Agent, AllowlistRequest, ChatRequest, ChatResponse, CredentialsPayload, LaunchRequest,
    LaunchedService, Service,
};
use crate::config::ApiConfig;

const API_KEY_HEADER: &str = "X-API-Key";

/// Short-lived SkySQL API client
pub struct SkySqlClient {
    http: Client,
    /// Client without the API key, for third-party hosts
    plain: Client,
    base_url: String,
    ip_echo_url: String,
}

impl SkySqlClient {
    /// Build a client, reading the API key from the configured env var
    pub fn from_config(config: &ApiConfig) -> ApiResult<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty());
        tracing::info!("API key is configured: {}", api_key.is_some());

        let api_key = api_key.ok_or_else(|| ApiError::MissingApiKey(config.api_key_env.clone()))?;

        let mut key_value = HeaderValue::from_str(api_key.trim())
            .map_err(|_| ApiError::InvalidApiKey(config.api_key_env.clone()))?;
        key_value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, key_value);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let timeout = Duration::from_secs(config.timeout_secs);

        let http = Client::builder()
            .default_headers(headers)
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()?;

        let plain = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            plain,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            ip_echo_url: config.ip_echo_url.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and turn non-2xx answers into [`ApiError::Status`]
    async fn send(request: RequestBuilder) -> ApiResult<Response> {
        let response = request.send().await?;
        let status = response.status();
        debug!(%status, "response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(%status, body = %body, "upstream request failed");
            return Err(ApiError::Status { status, body });
        }

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let response = Self::send(self.http.get(self.url(path))).await?;
        Ok(response.json().await?)
    }

    /// List all copilot agents
    #[instrument(skip(self))]
    pub async fn list_agents(&self) -> ApiResult<Vec<Agent>> {
        self.get_json("/copilot/v1/agent/").await
    }

    /// Ask an agent a question
    #[instrument(skip(self, request), fields(agent_id = %request.agent_id))]
    pub async fn chat(&self, request: &ChatRequest) -> ApiResult<ChatResponse> {
        debug!(
            datasource = request.datasource_id.as_deref().unwrap_or("none"),
            "sending chat request"
        );
        let response = Self::send(self.http.post(self.url("/copilot/v1/chat/")).json(request)).await?;
        Ok(response.json().await?)
    }

    /// Provision a new service
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn launch_service(&self, request: &LaunchRequest) -> ApiResult<LaunchedService> {
        debug!(
            provider = %request.provider,
            region = %request.region,
            topology = %request.topology,
            "launching service"
        );
        let response =
            Self::send(self.http.post(self.url("/provisioning/v1/services")).json(request)).await?;
        Ok(response.json().await?)
    }

    /// Delete a service
    #[instrument(skip(self))]
    pub async fn delete_service(&self, service_id: &str) -> ApiResult<()> {
        let path = format!("/provisioning/v1/services/{}", service_id);
        let response = Self::send(self.http.delete(self.url(&path))).await?;
        let body = response.text().await.unwrap_or_default();
        debug!(body = %body, "delete acknowledged");
        Ok(())
    }

    /// List all services visible to the API key
    #[instrument(skip(self))]
    pub async fn list_services(&self) -> ApiResult<Vec<Service>> {
        self.get_json("/provisioning/v1/services").await
    }

    /// Fetch the default credentials of a service
    #[instrument(skip(self))]
    pub async fn service_credentials(&self, service_id: &str) -> ApiResult<CredentialsPayload> {
        let path = format!("/provisioning/v1/services/{}/security/credentials", service_id);
        self.get_json(&path).await
    }

    /// Add an entry to a service's IP allowlist
    #[instrument(skip(self, request), fields(ip = %request.ip_address))]
    pub async fn add_allowlist_entry(
        &self,
        service_id: &str,
        request: &AllowlistRequest,
    ) -> ApiResult<()> {
        let path = format!("/provisioning/v1/services/{}/security/allowlist", service_id);
        Self::send(self.http.post(self.url(&path)).json(request)).await?;
        Ok(())
    }

    /// Public IP address of this process, as seen by the echo service
    #[instrument(skip(self))]
    pub async fn public_ip(&self) -> ApiResult<String> {
        let response = Self::send(self.plain.get(&self.ip_echo_url)).await?;
        let ip = response.text().await?.trim().to_string();
        if ip.is_empty() {
            return Err(ApiError::Decode("IP echo service returned an empty body".to_string()));
        }
        debug!(ip = %ip, "current public IP");
        Ok(ip)
    }
}
