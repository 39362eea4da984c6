//! Event submission core for the Healthy Habits logger.
//!
//! # Overview
//! Turns a logged food, drink, or toilet event into a JSON POST against the
//! habits webhook. Request building and response classification are pure
//! (`EventClient`); the round-trip itself goes through a `Transport`, either
//! in Rust via `Submitter` or in the mobile host through the C ABI.
//!
//! # Design
//! - `Event` is a tagged variant; `Payload` is its exhaustive wire shape.
//! - `EventClient` is stateless: it holds only the endpoint and timestamp
//!   format, split into `build_submission` / `parse_submission`.
//! - `Submitter` sends each event exactly once, logs the outcome through
//!   `tracing`, and returns it. Nothing is retried or queued.
//! - Payload shapes are defined independently from the mock-server crate;
//!   integration tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
#[cfg(any(test, feature = "test-support"))]
pub mod fake;
pub mod http;
pub mod payload;
pub mod remembered;
pub mod submitter;
pub mod transport;
pub mod types;

pub use client::{Delivery, EventClient};
pub use config::{ClientConfig, DEFAULT_ENDPOINT};
pub use error::{ConfigError, SubmitError};
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeOutcome, FakeTransport};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use payload::{Payload, TimestampFormat};
pub use remembered::RememberedValues;
pub use submitter::{SubmitHandle, Submitter};
pub use transport::{Transport, UreqTransport};
pub use types::{Event, EventKind, Intake, ToiletAction, ToiletVisit};
