//! Stateless request builder and response classifier for the event webhook.
//!
//! # Design
//! `EventClient` holds only the endpoint and the timestamp format. Submitting
//! an event is split into `build_submission`, which produces an
//! `HttpRequest`, and `parse_submission`, which classifies the
//! `HttpResponse`. Whoever sits in between executes the round-trip, keeping
//! this half deterministic and free of I/O.

use ureq::http::Uri;

use crate::config::ClientConfig;
use crate::error::SubmitError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::payload::TimestampFormat;
use crate::types::Event;

/// Outcome of a submission the server accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    pub status: u16,
}

#[derive(Debug, Clone)]
pub struct EventClient {
    endpoint: String,
    timestamp_format: TimestampFormat,
}

impl EventClient {
    /// The endpoint is used verbatim, trailing slash included.
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            timestamp_format: TimestampFormat::default(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            timestamp_format: config.timestamp_format,
        }
    }

    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn timestamp_format(&self) -> TimestampFormat {
        self.timestamp_format
    }

    pub fn build_submission(&self, event: &Event) -> Result<HttpRequest, SubmitError> {
        check_endpoint(&self.endpoint)?;
        let payload = event.to_payload(self.timestamp_format);
        let body = serde_json::to_string(&payload).map_err(|e| SubmitError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: self.endpoint.clone(),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body,
        })
    }

    /// Only 200 counts as delivered. The body is kept for diagnostics only.
    pub fn parse_submission(&self, response: HttpResponse) -> Result<Delivery, SubmitError> {
        if response.status == 200 {
            return Ok(Delivery { status: response.status });
        }
        Err(SubmitError::NonSuccessStatus {
            status: response.status,
            body: response.body,
        })
    }
}

/// Accept only absolute http(s) URLs with a host.
fn check_endpoint(endpoint: &str) -> Result<(), SubmitError> {
    let uri: Uri = endpoint
        .parse()
        .map_err(|e: ureq::http::uri::InvalidUri| SubmitError::InvalidEndpoint(format!("{endpoint}: {e}")))?;
    match uri.scheme_str() {
        Some("http") | Some("https") => {}
        _ => {
            return Err(SubmitError::InvalidEndpoint(format!(
                "{endpoint}: scheme must be http or https"
            )))
        }
    }
    if uri.host().map_or(true, str::is_empty) {
        return Err(SubmitError::InvalidEndpoint(format!("{endpoint}: missing host")));
    }
    Ok(())
}
