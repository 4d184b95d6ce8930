//! Transport to the query proxy.
//!
//! Provides a trait-based seam so the dispatcher can run against the real
//! HTTP proxy or an in-memory mock.

mod http;
mod mock;

pub use http::{HttpTransport, HttpTransportConfig, QUERY_PATH};
pub use mock::{FailingTransport, MockTransport};

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::Result;
use crate::query::QueryRequest;

/// Generic message the proxy uses when the real cause is in `error`.
const GENERIC_PROXY_MESSAGE: &str = "Metric request error";

/// Trait for sending one batched query request.
///
/// A returned `Err` means the call itself failed (connect, timeout).
/// Any HTTP status, success or not, comes back as a [`TransportResponse`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &QueryRequest) -> Result<TransportResponse>;
}

/// Raw reply from the proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns true for a 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Human-readable error text for a non-success reply.
    pub fn error_message(&self) -> String {
        #[derive(Deserialize)]
        struct ProxyError {
            #[serde(default)]
            message: String,
            #[serde(default)]
            error: String,
        }

        match serde_json::from_str::<ProxyError>(&self.body) {
            Ok(err) if err.message == GENERIC_PROXY_MESSAGE && !err.error.is_empty() => {
                format!("{} ({})", err.error, self.status)
            }
            Ok(err) if !err.message.is_empty() => format!("{} ({})", err.message, self.status),
            _ if self.body.trim().is_empty() => format!("request failed with status {}", self.status),
            _ => format!("{} ({})", self.body.trim(), self.status),
        }
    }
}
