//! HTTP transport to the query proxy.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use super::{Transport, TransportResponse};
use crate::error::{FramesError, Result};
use crate::query::QueryRequest;

/// Default timeout for proxy requests.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Path of the query endpoint below the base URL.
pub const QUERY_PATH: &str = "/api/tsdb/query";

/// HTTP transport configuration.
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    /// Base URL of the proxy (e.g. "http://localhost:3000").
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl HttpTransportConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// Posts query requests as JSON with reqwest.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    config: HttpTransportConfig,
    client: Client,
}

impl HttpTransport {
    pub fn new(config: HttpTransportConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FramesError::transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Returns the query endpoint URL.
    fn query_url(&self) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), QUERY_PATH)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &QueryRequest) -> Result<TransportResponse> {
        let url = self.query_url();
        debug!(url = %url, queries = request.queries.len(), "Posting query request");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FramesError::transport("Request timed out")
                } else if e.is_connect() {
                    FramesError::transport(format!("Failed to connect to {}", url))
                } else {
                    FramesError::transport(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| FramesError::transport(format!("Failed to read response: {}", e)))?;

        debug!(status, bytes = body.len(), "Received query response");
        Ok(TransportResponse { status, body })
    }
}
