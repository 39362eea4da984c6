//! Fake transport for testing
//!
//! Records every request and answers with a scripted outcome. Compiled for
//! this crate's unit tests, and for dependents that enable `test-support`.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::SubmitError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;

/// What every call to a `FakeTransport` returns.
#[derive(Debug, Clone)]
pub enum FakeOutcome {
    Respond { status: u16, body: String },
    Fail(String),
}

#[derive(Clone)]
pub struct FakeTransport {
    calls: Arc<Mutex<Vec<HttpRequest>>>,
    outcome: FakeOutcome,
}

impl FakeTransport {
    pub fn responding(status: u16) -> Self {
        Self::with_outcome(FakeOutcome::Respond {
            status,
            body: String::new(),
        })
    }

    pub fn failing(message: &str) -> Self {
        Self::with_outcome(FakeOutcome::Fail(message.to_string()))
    }

    pub fn with_outcome(outcome: FakeOutcome) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            outcome,
        }
    }

    /// All requests received so far, in call order.
    pub fn calls(&self) -> Vec<HttpRequest> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl Default for FakeTransport {
    fn default() -> Self {
        Self::responding(200)
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, SubmitError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request);
        match &self.outcome {
            FakeOutcome::Respond { status, body } => Ok(HttpResponse {
                status: *status,
                headers: Vec::new(),
                body: body.clone(),
            }),
            FakeOutcome::Fail(message) => Err(SubmitError::TransportError(message.clone())),
        }
    }
}
