//! One-shot, best-effort event submission.
//!
//! # Design
//! `Submitter` pairs an `EventClient` with a `Transport` and runs each
//! submission straight through: build, send once, classify, log. There is
//! no retry, no queue, and no cancellation. Every outcome is logged here and
//! also returned, so callers that only fire and forget lose nothing, and
//! tests can still observe the result.
//!
//! Submitters are cheap to clone and share nothing mutable, so concurrent
//! submissions are fully independent.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use crate::client::{Delivery, EventClient};
use crate::error::SubmitError;
use crate::transport::Transport;
use crate::types::{Event, ToiletAction};

pub type SubmitHandle = JoinHandle<Result<Delivery, SubmitError>>;

pub struct Submitter<T> {
    inner: Arc<Inner<T>>,
}

struct Inner<T> {
    client: EventClient,
    transport: T,
}

impl<T> Clone for Submitter<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Transport + 'static> Submitter<T> {
    pub fn new(client: EventClient, transport: T) -> Self {
        Self {
            inner: Arc::new(Inner { client, transport }),
        }
    }

    pub fn client(&self) -> &EventClient {
        &self.inner.client
    }

    /// Submit `event` once and log the outcome.
    #[instrument(skip(self, event), fields(kind = %event.kind()))]
    pub async fn submit(&self, event: Event) -> Result<Delivery, SubmitError> {
        let start = Instant::now();
        let result = self.deliver(&event).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match &result {
            Ok(delivery) => info!(status = delivery.status, elapsed_ms, "event delivered"),
            Err(e @ SubmitError::NonSuccessStatus { status, .. }) => warn!(
                error_kind = e.kind(),
                status = *status,
                elapsed_ms,
                error = %e,
                "event rejected by server"
            ),
            Err(e) => error!(error_kind = e.kind(), elapsed_ms, error = %e, "event submission failed"),
        }

        result
    }

    async fn deliver(&self, event: &Event) -> Result<Delivery, SubmitError> {
        let request = self.inner.client.build_submission(event)?;
        debug!(bytes = request.body.len(), "payload serialized");
        let response = self.inner.transport.execute(request).await?;
        self.inner.client.parse_submission(response)
    }

    /// Spawn `submit` on the current tokio runtime and return at once.
    ///
    /// Panics if called outside a runtime, like `tokio::spawn`.
    pub fn spawn_submit(&self, event: Event) -> SubmitHandle {
        let submitter = self.clone();
        tokio::spawn(async move { submitter.submit(event).await })
    }

    pub fn submit_food_event(
        &self,
        item: impl Into<String>,
        amount: impl Into<String>,
        eaten_at: DateTime<Utc>,
    ) -> SubmitHandle {
        self.spawn_submit(Event::food(item, amount, eaten_at))
    }

    pub fn submit_drink_event(
        &self,
        item: impl Into<String>,
        amount: impl Into<String>,
        drunk_at: DateTime<Utc>,
    ) -> SubmitHandle {
        self.spawn_submit(Event::drink(item, amount, drunk_at))
    }

    pub fn submit_toilet_event(&self, action: ToiletAction, time: DateTime<Utc>) -> SubmitHandle {
        self.spawn_submit(Event::toilet(action, time))
    }
}
