//! Network client boundary
//!
//! The core never talks to a socket: it needs one function from a request to
//! a response, expressed as an async trait. Concrete HTTP/WebSocket
//! transports implement it elsewhere; the mock here serves tests and local
//! development, in the same shape as a real transport.

use crate::{ClientError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use tx_models::{Request, Response, ResponseStatus};

/// A transport that can carry one request to a server and return its reply.
#[async_trait]
pub trait NetworkClient: Send + Sync {
    /// Issue a request and await the server's response.
    async fn request(&self, request: Request) -> Result<Response>;
}

/// Canned-response client for tests and local development.
pub struct MockNetworkClient {
    latency_ms: u64,
    responses: RwLock<HashMap<String, Value>>,
    failures: RwLock<HashMap<String, Value>>,
    history: Arc<RwLock<Vec<Request>>>,
}

impl MockNetworkClient {
    /// Create a mock with no latency and no canned responses.
    pub fn new() -> Self {
        Self {
            latency_ms: 0,
            responses: RwLock::new(HashMap::new()),
            failures: RwLock::new(HashMap::new()),
            history: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Simulate transport latency.
    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    /// Can a successful result payload for a method.
    pub async fn respond_to(&self, method: &str, result: Value) {
        self.responses.write().await.insert(method.to_string(), result);
    }

    /// Can an error result payload for a method.
    pub async fn fail_on(&self, method: &str, result: Value) {
        self.failures.write().await.insert(method.to_string(), result);
    }

    /// The requests this mock has seen, in order.
    pub async fn requests_seen(&self) -> Vec<Request> {
        self.history.read().await.clone()
    }
}

impl Default for MockNetworkClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NetworkClient for MockNetworkClient {
    async fn request(&self, request: Request) -> Result<Response> {
        if self.latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.latency_ms)).await;
        }
        let method = request.method().to_string();
        debug!(method = %method, "mock network request");
        self.history.write().await.push(request);

        if let Some(result) = self.failures.read().await.get(&method) {
            warn!(method = %method, "mock network canned failure");
            return Ok(Response {
                status: ResponseStatus::Error,
                result: result.clone(),
                id: None,
                response_type: None,
            });
        }

        match self.responses.read().await.get(&method) {
            Some(result) => Ok(Response {
                status: ResponseStatus::Success,
                result: result.clone(),
                id: None,
                response_type: None,
            }),
            None => Err(ClientError::Network(format!(
                "no canned response for method: {}",
                method
            ))),
        }
    }
}
