//! Submission gateway: turns a validated draft into one call of the backend
//! insert procedure.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use shared::{
    domain::BusinessListingDraft,
    error::{RpcErrorBody, SubmissionError},
    protocol::{InsertLocationParams, INSERT_LOCATION_RPC},
};
use tracing::{debug, info, warn};
use url::Url;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[async_trait]
pub trait ListingGateway: Send + Sync {
    /// Sends the draft to the backend. Never retries; the draft is read only.
    async fn submit(&self, draft: &BusinessListingDraft) -> Result<(), SubmissionError>;
}

/// Stands in when no backend is configured. Every submission fails.
pub struct MissingListingGateway;

#[async_trait]
impl ListingGateway for MissingListingGateway {
    async fn submit(&self, _draft: &BusinessListingDraft) -> Result<(), SubmissionError> {
        Err(SubmissionError::unavailable(
            "listing backend is not configured; set SUPABASE_URL or backend_url",
        ))
    }
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub backend_url: Url,
    pub anon_key: String,
    pub rpc_name: String,
    pub request_timeout: Duration,
}

impl GatewayConfig {
    pub fn new(backend_url: Url, anon_key: impl Into<String>) -> Self {
        Self {
            backend_url,
            anon_key: anon_key.into(),
            rpc_name: INSERT_LOCATION_RPC.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Calls the insert procedure over the backend's REST RPC endpoint
/// (`POST {backend}/rest/v1/rpc/{name}`).
pub struct RpcListingGateway {
    http: Client,
    endpoint: Url,
    anon_key: String,
}

impl RpcListingGateway {
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let endpoint = rpc_endpoint(&config.backend_url, &config.rpc_name)?;
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("failed to build listing backend http client")?;
        Ok(Self {
            http,
            endpoint,
            anon_key: config.anon_key,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ListingGateway for RpcListingGateway {
    async fn submit(&self, draft: &BusinessListingDraft) -> Result<(), SubmissionError> {
        let params = InsertLocationParams::from_draft(draft);
        debug!(
            endpoint = %self.endpoint,
            tags = params.tags_input.len(),
            "calling listing insert procedure"
        );

        let response = self
            .http
            .post(self.endpoint.clone())
            .header("apikey", self.anon_key.as_str())
            .bearer_auth(&self.anon_key)
            .json(&params)
            .send()
            .await
            .map_err(|err| {
                warn!(endpoint = %self.endpoint, "listing backend unreachable: {err}");
                SubmissionError::transport(err.to_string())
            })?;

        let status = response.status();
        if status.is_success() {
            info!(status = status.as_u16(), "listing insert procedure succeeded");
            return Ok(());
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => {
                warn!(
                    status = status.as_u16(),
                    "failed to read listing backend error body: {err}"
                );
                String::new()
            }
        };
        let message = server_message(status, &body);
        warn!(status = status.as_u16(), "listing insert procedure failed: {message}");
        Err(SubmissionError::server(status.as_u16(), message))
    }
}

fn rpc_endpoint(backend_url: &Url, rpc_name: &str) -> Result<Url> {
    let mut base = backend_url.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(&format!("rest/v1/rpc/{rpc_name}"))
        .with_context(|| format!("invalid procedure endpoint for backend '{backend_url}'"))
}

/// Prefers the backend's `message` field, then the raw body, then the HTTP
/// reason phrase.
pub(crate) fn server_message(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<RpcErrorBody>(body) {
        let message = parsed.message.trim();
        if !message.is_empty() {
            return message.to_string();
        }
    }

    let body = body.trim();
    if !body.is_empty() {
        return body.to_string();
    }

    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}
