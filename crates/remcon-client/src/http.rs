//! `reqwest`-backed implementations of the collaborator seams.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::RequestBuilder;

use remcon_core::{ConnectionPayload, RemediationId, SystemId};

use crate::api::{
    EntityConfig, EntityResponse, ExecuteRequest, InventoryApi, PlaybookApi, SystemsApi,
    SystemsQuery, SystemsResponse,
};
use crate::error::{ClientError, ClientResult};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Validate and canonicalize a service base URL.
fn normalize_base_url(base_url: &str) -> ClientResult<String> {
    let trimmed = base_url.trim();
    if trimmed.is_empty() {
        return Err(ClientError::BaseUrl("base URL cannot be empty".to_string()));
    }

    let parsed =
        url::Url::parse(trimmed).map_err(|e| ClientError::BaseUrl(format!("{trimmed}: {e}")))?;

    if !matches!(parsed.scheme(), "https" | "http") {
        return Err(ClientError::BaseUrl(format!(
            "{trimmed}: must be http or https"
        )));
    }
    if parsed.host_str().is_none() {
        return Err(ClientError::BaseUrl(format!(
            "{trimmed}: must include a host"
        )));
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}

fn build_client() -> ClientResult<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()?)
}

fn authorize(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => request.header("Authorization", format!("Bearer {token}")),
        None => request,
    }
}

async fn check_status(response: reqwest::Response, endpoint: &str) -> ClientResult<reqwest::Response> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(ClientError::Api {
            status: response.status().as_u16(),
            endpoint: endpoint.to_string(),
        })
    }
}

/// Client of the remediations service: system listings, playbook runs,
/// playbook downloads.
#[derive(Debug, Clone)]
pub struct RemediationsHttpClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl RemediationsHttpClient {
    /// Create a client against a base URL.
    pub fn new(base_url: &str) -> ClientResult<Self> {
        Ok(Self {
            client: build_client()?,
            base_url: normalize_base_url(base_url)?,
            token: None,
        })
    }

    /// Attach a bearer token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn systems_url(&self, id: RemediationId) -> String {
        format!("{}/remediations/{id}/systems", self.base_url)
    }

    /// Fetch executor reachability for a plan.
    ///
    /// A 403 means the caller lacks the grant for connection status and is
    /// reported as [`ConnectionPayload::Forbidden`], not as an error.
    pub async fn connection_status(&self, id: RemediationId) -> ClientResult<ConnectionPayload> {
        let url = format!("{}/remediations/{id}/connection_status", self.base_url);
        let response = authorize(self.client.get(&url), self.token.as_deref())
            .send()
            .await?;
        if response.status().as_u16() == 403 {
            return Ok(ConnectionPayload::Forbidden);
        }
        let response = check_status(response, &url).await?;
        let body: serde_json::Value = response.json().await?;
        Ok(ConnectionPayload::from_value(body.get("data")))
    }
}

#[async_trait]
impl SystemsApi for RemediationsHttpClient {
    async fn fetch_systems(&self, query: &SystemsQuery) -> ClientResult<SystemsResponse> {
        let url = self.systems_url(query.id);
        let mut request = self.client.get(&url).query(&[
            ("limit", query.limit.to_string()),
            ("offset", query.offset.to_string()),
            ("sort", query.sort.clone()),
        ]);
        if let Some(display_name) = &query.filter.display_name {
            request = request.query(&[("filter[display_name]", display_name.as_str())]);
        }

        let response = authorize(request, self.token.as_deref()).send().await?;
        let response = check_status(response, &url).await?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl PlaybookApi for RemediationsHttpClient {
    async fn execute_run(&self, request: &ExecuteRequest) -> ClientResult<()> {
        let url = format!("{}/remediations/{}/playbook_runs", self.base_url, request.id);
        let response = authorize(self.client.post(&url), self.token.as_deref())
            .header("If-Match", &request.etag)
            .json(&serde_json::json!({ "exclude": request.exclude }))
            .send()
            .await?;
        check_status(response, &url).await?;
        Ok(())
    }

    async fn download(&self, id: &RemediationId) -> ClientResult<Vec<u8>> {
        let url = format!("{}/remediations/{id}/playbook", self.base_url);
        let response = authorize(self.client.get(&url), self.token.as_deref())
            .send()
            .await?;
        let response = check_status(response, &url).await?;
        Ok(response.bytes().await?.to_vec())
    }
}

/// Client of the inventory service: per-host detail lookups.
#[derive(Debug, Clone)]
pub struct InventoryHttpClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl InventoryHttpClient {
    /// Create a client against a base URL.
    pub fn new(base_url: &str) -> ClientResult<Self> {
        Ok(Self {
            client: build_client()?,
            base_url: normalize_base_url(base_url)?,
            token: None,
        })
    }

    /// Attach a bearer token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

#[async_trait]
impl InventoryApi for InventoryHttpClient {
    async fn get_entities(
        &self,
        ids: &[SystemId],
        config: &EntityConfig,
        show_tags: bool,
    ) -> ClientResult<EntityResponse> {
        let id_list = ids
            .iter()
            .map(SystemId::as_str)
            .collect::<Vec<_>>()
            .join(",");
        let url = format!("{}/hosts/{id_list}", self.base_url);

        let mut request = self.client.get(&url).query(&[
            ("per_page", config.per_page.to_string()),
            ("page", config.page.to_string()),
        ]);
        if show_tags {
            request = request.query(&[("with_tags", "true")]);
        }
        if let Some(hostname_or_id) = &config.filter.hostname_or_id {
            request = request.query(&[("hostname_or_id", hostname_or_id.as_str())]);
        }

        let response = authorize(request, self.token.as_deref()).send().await?;
        let response = check_status(response, &url).await?;
        Ok(response.json().await?)
    }
}
