//! Mock transports for testing.
//!
//! Provides canned proxy replies so dispatch can be exercised without a
//! running proxy.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Mutex;
use std::time::Duration;

use super::{Transport, TransportResponse};
use crate::error::{FramesError, Result};
use crate::query::QueryRequest;

/// A transport that answers every request with the same reply and records
/// what it was sent.
pub struct MockTransport {
    response: TransportResponse,
    delay: Option<Duration>,
    requests: Mutex<Vec<QueryRequest>>,
}

impl MockTransport {
    /// Replies `200` with `body` serialized as JSON.
    pub fn with_json(body: Value) -> Self {
        Self::with_status(200, body)
    }

    /// Replies with `status` and `body` serialized as JSON.
    pub fn with_status(status: u16, body: Value) -> Self {
        Self::with_response(TransportResponse::new(status, body.to_string()))
    }

    pub fn with_response(response: TransportResponse) -> Self {
        Self {
            response,
            delay: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Waits `delay` before replying.
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Returns every request received so far.
    pub fn requests(&self) -> Vec<QueryRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::with_json(serde_json::json!({ "results": {} }))
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: &QueryRequest) -> Result<TransportResponse> {
        self.requests
            .lock()
            .map_err(|_| FramesError::internal("mock transport lock poisoned"))?
            .push(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.response.clone())
    }
}

/// A transport whose every call fails.
pub struct FailingTransport {
    message: String,
}

impl FailingTransport {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl Transport for FailingTransport {
    async fn send(&self, _request: &QueryRequest) -> Result<TransportResponse> {
        Err(FramesError::transport(self.message.clone()))
    }
}
