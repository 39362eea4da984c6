//! C-ABI wrapper around `habits-core`.
//!
//! # Overview
//! Lets the mobile host submit logged events either way:
//! - host-does-IO: `habits_build_*` returns a request the host sends with
//!   its own HTTP stack, and `habits_parse_submission` classifies the reply;
//! - fire-and-forget: `habits_submit_*` sends on the client's private
//!   runtime and returns immediately. The outcome is only logged.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Timestamps cross as Unix seconds; toilet actions as `"Poop"` / `"Pee"`.
//! - The caller owns all returned pointers and must call the matching
//!   `habits_free_*` function to release them.

pub mod types;

use std::ffi::CString;
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use chrono::{DateTime, Utc};
use habits_core::{ClientConfig, Event, EventClient, HttpResponse, Submitter, ToiletAction, UreqTransport};
use tracing_subscriber::EnvFilter;

use types::*;

/// Environment variable holding the log filter for `habits_init_logging`.
pub const LOG_FILTER_VAR: &str = "HABITS_LOG";

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Install a fmt tracing subscriber filtered by `HABITS_LOG` (default
/// `info`). Returns false if a global subscriber was already installed.
#[unsafe(no_mangle)]
pub extern "C" fn habits_init_logging() -> bool {
    catch_unwind(|| {
        let filter = EnvFilter::try_from_env(LOG_FILTER_VAR).unwrap_or_else(|_| EnvFilter::new("info"));
        tracing_subscriber::fmt().with_env_filter(filter).try_init().is_ok()
    })
    .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a new client configured from the `HABITS_*` environment variables.
/// A non-null `endpoint` overrides `HABITS_ENDPOINT`; with neither, the
/// client targets the production webhook.
///
/// Returns null if a `HABITS_*` variable is invalid, `endpoint` is not valid
/// UTF-8, the submission runtime cannot be started, or on panic.
/// The caller must free the returned pointer with `habits_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn habits_client_new(endpoint: *const c_char) -> *mut FfiEventClient {
    catch_unwind(|| {
        let mut config = match ClientConfig::from_env() {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(error = %e, "invalid client configuration");
                return std::ptr::null_mut();
            }
        };
        if !endpoint.is_null() {
            let Some(endpoint) = read_c_str(endpoint) else {
                tracing::error!("endpoint is not valid UTF-8");
                return std::ptr::null_mut();
            };
            config.endpoint = endpoint;
        }

        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("habits-submit")
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(e) => {
                tracing::error!(error = %e, "failed to start submission runtime");
                return std::ptr::null_mut();
            }
        };

        let client = EventClient::from_config(&config);
        let submitter = Submitter::new(client, UreqTransport::from_config(&config));
        Box::into_raw(Box::new(FfiEventClient {
            submitter,
            runtime,
        }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `habits_client_new`. Safe to call with null.
///
/// Submissions still in flight are abandoned.
#[unsafe(no_mangle)]
pub extern "C" fn habits_client_free(client: *mut FfiEventClient) {
    if !client.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            let client = unsafe { *Box::from_raw(client) };
            client.runtime.shutdown_background();
        }));
    }
}

// ---------------------------------------------------------------------------
// Argument helpers
// ---------------------------------------------------------------------------

fn timestamp(occurred_at_unix: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(occurred_at_unix, 0)
}

fn food_event(item: *const c_char, amount: *const c_char, occurred_at_unix: i64) -> Option<Event> {
    Some(Event::food(read_c_str(item)?, read_c_str(amount)?, timestamp(occurred_at_unix)?))
}

fn drink_event(item: *const c_char, amount: *const c_char, occurred_at_unix: i64) -> Option<Event> {
    Some(Event::drink(read_c_str(item)?, read_c_str(amount)?, timestamp(occurred_at_unix)?))
}

fn toilet_event(action: *const c_char, occurred_at_unix: i64) -> Option<Event> {
    let action: ToiletAction = read_c_str(action)?.parse().ok()?;
    Some(Event::toilet(action, timestamp(occurred_at_unix)?))
}

/// Build a request for `event`, or null if it is missing or cannot be built.
fn build(client: *const FfiEventClient, event: Option<Event>) -> *mut FfiHttpRequest {
    if client.is_null() {
        return std::ptr::null_mut();
    }
    let Some(event) = event else {
        return std::ptr::null_mut();
    };
    let client = unsafe { &*client };
    match client.submitter.client().build_submission(&event) {
        Ok(req) => FfiHttpRequest::from_core(req),
        Err(e) => {
            tracing::warn!(error = %e, kind = %event.kind(), "failed to build submission");
            std::ptr::null_mut()
        }
    }
}

/// Spawn `event` on the client's runtime. False if nothing was spawned.
fn spawn(client: *const FfiEventClient, event: Option<Event>) -> bool {
    if client.is_null() {
        return false;
    }
    let Some(event) = event else {
        return false;
    };
    let client = unsafe { &*client };
    let _guard = client.runtime.enter();
    // Detached: the submitter logs the outcome.
    drop(client.submitter.spawn_submit(event));
    true
}

// ---------------------------------------------------------------------------
// Build request functions
// ---------------------------------------------------------------------------

/// Build the request for a food event eaten at `eaten_at_unix` (seconds).
///
/// Returns null if `client`, `item` or `amount` is null or not valid UTF-8,
/// the timestamp is out of range, or the configured endpoint is invalid.
/// The caller must free the returned pointer with `habits_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn habits_build_food_event(
    client: *const FfiEventClient,
    item: *const c_char,
    amount: *const c_char,
    eaten_at_unix: i64,
) -> *mut FfiHttpRequest {
    catch_unwind(AssertUnwindSafe(|| build(client, food_event(item, amount, eaten_at_unix))))
        .unwrap_or(std::ptr::null_mut())
}

/// Build the request for a drink event drunk at `drunk_at_unix` (seconds).
///
/// Returns null under the same conditions as `habits_build_food_event`.
#[unsafe(no_mangle)]
pub extern "C" fn habits_build_drink_event(
    client: *const FfiEventClient,
    item: *const c_char,
    amount: *const c_char,
    drunk_at_unix: i64,
) -> *mut FfiHttpRequest {
    catch_unwind(AssertUnwindSafe(|| build(client, drink_event(item, amount, drunk_at_unix))))
        .unwrap_or(std::ptr::null_mut())
}

/// Build the request for a toilet visit. `action` is `"Poop"` or `"Pee"`
/// (case-insensitive).
///
/// Returns null if an argument is null, the action is unknown, the timestamp
/// is out of range, or the configured endpoint is invalid.
#[unsafe(no_mangle)]
pub extern "C" fn habits_build_toilet_event(
    client: *const FfiEventClient,
    action: *const c_char,
    time_unix: i64,
) -> *mut FfiHttpRequest {
    catch_unwind(AssertUnwindSafe(|| build(client, toilet_event(action, time_unix))))
        .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Parse response
// ---------------------------------------------------------------------------

fn ffi_response_to_core(resp: &FfiHttpResponse) -> HttpResponse {
    HttpResponse {
        status: resp.status,
        headers: Vec::new(),
        body: read_c_str_lossy(resp.body).unwrap_or_default(),
    }
}

/// Classify the response to a submission the host executed itself.
///
/// `error_code = Ok` only for status 200. The outcome is also logged.
#[unsafe(no_mangle)]
pub extern "C" fn habits_parse_submission(
    client: *const FfiEventClient,
    response: *const FfiHttpResponse,
) -> *mut FfiSubmitResult {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return FfiSubmitResult::null_arg("client");
        }
        if response.is_null() {
            return FfiSubmitResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let resp = unsafe { &*response };
        match client.submitter.client().parse_submission(ffi_response_to_core(resp)) {
            Ok(delivery) => {
                tracing::info!(status = delivery.status, "event delivered");
                FfiSubmitResult::ok(delivery)
            }
            Err(e) => {
                tracing::warn!(error_kind = e.kind(), error = %e, "event submission failed");
                FfiSubmitResult::from_error(e)
            }
        }
    }))
    .unwrap_or_else(|_| FfiSubmitResult::panic("panic in habits_parse_submission"))
}

// ---------------------------------------------------------------------------
// Fire-and-forget submission
// ---------------------------------------------------------------------------

/// Submit a food event in the background and return immediately.
///
/// Returns true once the submission is enqueued, false on bad arguments
/// (null, invalid UTF-8 or an out-of-range timestamp).
/// Delivery success or failure is only logged.
#[unsafe(no_mangle)]
pub extern "C" fn habits_submit_food_event(
    client: *const FfiEventClient,
    item: *const c_char,
    amount: *const c_char,
    eaten_at_unix: i64,
) -> bool {
    catch_unwind(AssertUnwindSafe(|| spawn(client, food_event(item, amount, eaten_at_unix)))).unwrap_or(false)
}

/// Submit a drink event in the background and return immediately.
#[unsafe(no_mangle)]
pub extern "C" fn habits_submit_drink_event(
    client: *const FfiEventClient,
    item: *const c_char,
    amount: *const c_char,
    drunk_at_unix: i64,
) -> bool {
    catch_unwind(AssertUnwindSafe(|| spawn(client, drink_event(item, amount, drunk_at_unix)))).unwrap_or(false)
}

/// Submit a toilet visit in the background and return immediately.
#[unsafe(no_mangle)]
pub extern "C" fn habits_submit_toilet_event(
    client: *const FfiEventClient,
    action: *const c_char,
    time_unix: i64,
) -> bool {
    catch_unwind(AssertUnwindSafe(|| spawn(client, toilet_event(action, time_unix)))).unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by any `habits_build_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn habits_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| {
        let req = unsafe { Box::from_raw(req) };
        habits_free_string(req.url);
        habits_free_string(req.body);
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(req.headers, req.headers_len as usize))
            };
            for h in headers.iter() {
                habits_free_string(h.key);
                habits_free_string(h.value);
            }
        }
    }));
}

/// Free an `FfiSubmitResult` returned by `habits_parse_submission`.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn habits_free_result(result: *mut FfiSubmitResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| {
        let result = unsafe { Box::from_raw(result) };
        habits_free_string(result.error_message);
    }));
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn habits_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { CString::from_raw(s) });
        }));
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::{CStr, CString};

    /// 2024-01-15 08:30:00 UTC
    const AT: i64 = 1_705_307_400;

    fn new_client() -> *mut FfiEventClient {
        let url = CString::new("http://localhost:3000/data/").unwrap();
        let client = habits_client_new(url.as_ptr());
        assert!(!client.is_null());
        client
    }

    fn body_of(req: *mut FfiHttpRequest) -> serde_json::Value {
        let req_ref = unsafe { &*req };
        let body = unsafe { CStr::from_ptr(req_ref.body) }.to_str().unwrap();
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn client_new_and_free() {
        let client = new_client();
        habits_client_free(client);
    }

    #[test]
    fn client_new_null_uses_default_endpoint() {
        let client = habits_client_new(std::ptr::null());
        assert!(!client.is_null());
        let endpoint = unsafe { &*client }.submitter.client().endpoint().to_string();
        assert_eq!(endpoint, habits_core::DEFAULT_ENDPOINT);
        habits_client_free(client);
    }

    #[test]
    fn client_free_null_is_safe() {
        habits_client_free(std::ptr::null_mut());
    }

    #[test]
    fn build_food_event_returns_post_with_json_body() {
        let client = new_client();
        let item = CString::new("Apple").unwrap();
        let amount = CString::new("1").unwrap();
        let req = habits_build_food_event(client, item.as_ptr(), amount.as_ptr(), AT);
        assert!(!req.is_null());

        let req_ref = unsafe { &*req };
        assert!(matches!(req_ref.method, FfiHttpMethod::Post));
        let url = unsafe { CStr::from_ptr(req_ref.url) }.to_str().unwrap();
        assert_eq!(url, "http://localhost:3000/data/");
        assert_eq!(req_ref.headers_len, 1);
        let headers = unsafe { std::slice::from_raw_parts(req_ref.headers, 1) };
        let key = unsafe { CStr::from_ptr(headers[0].key) }.to_str().unwrap();
        assert_eq!(key, "content-type");

        assert_eq!(
            body_of(req),
            serde_json::json!({
                "food": "Apple",
                "food_amount": "1",
                "eatenAt": "2024-01-15 08:30:00 +0000",
                "type": "food",
            })
        );

        habits_free_request(req);
        habits_client_free(client);
    }

    #[test]
    fn build_drink_event_accepts_empty_strings() {
        let client = new_client();
        let empty = CString::new("").unwrap();
        let req = habits_build_drink_event(client, empty.as_ptr(), empty.as_ptr(), AT);
        assert!(!req.is_null());

        let body = body_of(req);
        assert_eq!(body["type"], "drink");
        assert_eq!(body["drink"], "");
        assert_eq!(body["amount"], "");

        habits_free_request(req);
        habits_client_free(client);
    }

    #[test]
    fn build_toilet_event_parses_action() {
        let client = new_client();
        let action = CString::new("pee").unwrap();
        let req = habits_build_toilet_event(client, action.as_ptr(), AT);
        assert!(!req.is_null());

        assert_eq!(
            body_of(req),
            serde_json::json!({"action": "Pee", "time": "2024-01-15 08:30:00 +0000", "type": "toilet"})
        );

        habits_free_request(req);
        habits_client_free(client);
    }

    #[test]
    fn build_toilet_event_unknown_action_returns_null() {
        let client = new_client();
        let action = CString::new("sneeze").unwrap();
        assert!(habits_build_toilet_event(client, action.as_ptr(), AT).is_null());
        habits_client_free(client);
    }

    #[test]
    fn build_with_null_arguments_returns_null() {
        let client = new_client();
        let item = CString::new("Apple").unwrap();
        assert!(habits_build_food_event(std::ptr::null(), item.as_ptr(), item.as_ptr(), AT).is_null());
        assert!(habits_build_food_event(client, std::ptr::null(), item.as_ptr(), AT).is_null());
        assert!(habits_build_drink_event(client, item.as_ptr(), std::ptr::null(), AT).is_null());
        assert!(habits_build_toilet_event(client, std::ptr::null(), AT).is_null());
        habits_client_free(client);
    }

    #[test]
    fn invalid_utf8_text_is_rejected_not_replaced() {
        let client = new_client();
        let bad = CStr::from_bytes_with_nul(b"App\xffle\0").unwrap();
        let ok = CString::new("1").unwrap();
        assert!(habits_build_food_event(client, bad.as_ptr(), ok.as_ptr(), AT).is_null());
        assert!(habits_build_drink_event(client, ok.as_ptr(), bad.as_ptr(), AT).is_null());
        assert!(habits_build_toilet_event(client, bad.as_ptr(), AT).is_null());
        assert!(!habits_submit_food_event(client, bad.as_ptr(), ok.as_ptr(), AT));
        assert!(!habits_submit_drink_event(client, ok.as_ptr(), bad.as_ptr(), AT));
        habits_client_free(client);
    }

    #[test]
    fn client_new_rejects_invalid_utf8_endpoint() {
        let bad = CStr::from_bytes_with_nul(b"http://\xff/data/\0").unwrap();
        assert!(habits_client_new(bad.as_ptr()).is_null());
    }

    #[test]
    fn parse_submission_keeps_invalid_utf8_body_in_message() {
        let client = new_client();
        let body = CStr::from_bytes_with_nul(b"bad \xff gateway\0").unwrap();
        let resp = FfiHttpResponse {
            status: 502,
            body: body.as_ptr(),
        };
        let result = habits_parse_submission(client, &resp);
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::NonSuccessStatus);
        let msg = unsafe { CStr::from_ptr(r.error_message) }.to_str().unwrap();
        assert!(msg.contains("gateway"), "{msg}");

        habits_free_result(result);
        habits_client_free(client);
    }

    #[test]
    fn build_with_out_of_range_timestamp_returns_null() {
        let client = new_client();
        let item = CString::new("Apple").unwrap();
        assert!(habits_build_food_event(client, item.as_ptr(), item.as_ptr(), i64::MAX).is_null());
        habits_client_free(client);
    }

    #[test]
    fn build_with_invalid_endpoint_returns_null() {
        let url = CString::new("not a url").unwrap();
        let client = habits_client_new(url.as_ptr());
        let item = CString::new("Apple").unwrap();
        assert!(habits_build_food_event(client, item.as_ptr(), item.as_ptr(), AT).is_null());
        habits_client_free(client);
    }

    #[test]
    fn parse_submission_200_is_ok() {
        let client = new_client();
        let body = CString::new("").unwrap();
        let resp = FfiHttpResponse {
            status: 200,
            body: body.as_ptr(),
        };
        let result = habits_parse_submission(client, &resp);
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Ok);
        assert!(r.error_message.is_null());
        assert_eq!(r.http_status, 200);

        habits_free_result(result);
        habits_client_free(client);
    }

    #[test]
    fn parse_submission_500_is_non_success() {
        let client = new_client();
        let body = CString::new("internal error").unwrap();
        let resp = FfiHttpResponse {
            status: 500,
            body: body.as_ptr(),
        };
        let result = habits_parse_submission(client, &resp);
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::NonSuccessStatus);
        assert_eq!(r.http_status, 500);
        let msg = unsafe { CStr::from_ptr(r.error_message) }.to_str().unwrap();
        assert!(msg.contains("internal error"));

        habits_free_result(result);
        habits_client_free(client);
    }

    #[test]
    fn parse_submission_null_body_is_empty() {
        let client = new_client();
        let resp = FfiHttpResponse {
            status: 200,
            body: std::ptr::null(),
        };
        let result = habits_parse_submission(client, &resp);
        assert_eq!(unsafe { &*result }.error_code, FfiErrorCode::Ok);

        habits_free_result(result);
        habits_client_free(client);
    }

    #[test]
    fn parse_null_client_returns_null_arg() {
        let resp = FfiHttpResponse {
            status: 200,
            body: std::ptr::null(),
        };
        let result = habits_parse_submission(std::ptr::null(), &resp);
        assert_eq!(unsafe { &*result }.error_code, FfiErrorCode::NullArg);
        habits_free_result(result);
    }

    #[test]
    fn parse_null_response_returns_null_arg() {
        let client = new_client();
        let result = habits_parse_submission(client, std::ptr::null());
        assert_eq!(unsafe { &*result }.error_code, FfiErrorCode::NullArg);
        habits_free_result(result);
        habits_client_free(client);
    }

    #[test]
    fn submit_with_null_arguments_is_rejected() {
        let client = new_client();
        let item = CString::new("Apple").unwrap();
        assert!(!habits_submit_food_event(std::ptr::null(), item.as_ptr(), item.as_ptr(), AT));
        assert!(!habits_submit_drink_event(client, std::ptr::null(), item.as_ptr(), AT));
        assert!(!habits_submit_toilet_event(client, std::ptr::null(), AT));
        habits_client_free(client);
    }

    #[test]
    fn submit_returns_immediately_even_if_unreachable() {
        let addr = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();
        let url = CString::new(format!("http://{addr}/data/")).unwrap();
        let client = habits_client_new(url.as_ptr());
        let action = CString::new("Poop").unwrap();

        assert!(habits_submit_toilet_event(client, action.as_ptr(), AT));

        habits_client_free(client);
    }

    #[test]
    fn init_logging_twice_is_harmless() {
        habits_init_logging();
        assert!(!habits_init_logging());
    }

    #[test]
    fn free_request_null_is_safe() {
        habits_free_request(std::ptr::null_mut());
    }

    #[test]
    fn free_result_null_is_safe() {
        habits_free_result(std::ptr::null_mut());
    }

    #[test]
    fn free_string_null_is_safe() {
        habits_free_string(std::ptr::null_mut());
    }
}
