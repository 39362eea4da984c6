//! Executes built requests against the network.
//!
//! # Design
//! `Transport` is the seam between the pure `EventClient` and real I/O.
//! Non-2xx statuses come back as data so the client alone decides what
//! counts as delivered. `UreqTransport` keeps ureq's blocking call on
//! tokio's blocking pool, so awaiting it never stalls a runtime worker.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::SubmitError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Performs exactly one HTTP round-trip per call. Implementations must not
/// retry.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, SubmitError>;
}

/// Production transport backed by a shared `ureq::Agent`.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    /// `timeout` bounds the whole request. `None` keeps ureq's defaults.
    pub fn new(timeout: Option<Duration>) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.timeout())
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl Transport for UreqTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, SubmitError> {
        let agent = self.agent.clone();
        tokio::task::spawn_blocking(move || execute_blocking(&agent, request))
            .await
            .map_err(|e| SubmitError::TransportError(format!("transport task failed: {e}")))?
    }
}

fn execute_blocking(agent: &ureq::Agent, request: HttpRequest) -> Result<HttpResponse, SubmitError> {
    let start = Instant::now();
    debug!(method = request.method.as_str(), url = %request.url, bytes = request.body.len(), "sending request");

    let mut builder = match request.method {
        HttpMethod::Post => agent.post(request.url.as_str()),
    };
    for (key, value) in &request.headers {
        builder = builder.header(key.as_str(), value.as_str());
    }

    let mut response = builder
        .send(request.body.as_bytes())
        .map_err(|e| SubmitError::TransportError(e.to_string()))?;

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .map(|(k, v)| (k.as_str().to_string(), v.to_str().unwrap_or_default().to_string()))
        .collect();
    let body = response.body_mut().read_to_string().unwrap_or_default();

    debug!(status, elapsed_ms = start.elapsed().as_millis() as u64, "response received");
    Ok(HttpResponse { status, headers, body })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_to(url: String) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Post,
            url,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: "{}".to_string(),
        }
    }

    #[tokio::test]
    async fn refused_connection_is_transport_error() {
        // Grab a free port, then release it so nothing is listening.
        let addr = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();

        let transport = UreqTransport::new(Some(Duration::from_secs(5)));
        let err = transport
            .execute(post_to(format!("http://{addr}/data/")))
            .await
            .unwrap_err();
        assert!(matches!(err, SubmitError::TransportError(_)), "{err}");
    }

    #[test]
    fn from_config_builds_transport() {
        let config = ClientConfig {
            timeout_secs: Some(3),
            ..ClientConfig::default()
        };
        let _transport = UreqTransport::from_config(&config);
    }
}
