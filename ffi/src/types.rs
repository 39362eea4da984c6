//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type with C-compatible representations:
//! `*mut c_char` instead of `String`, a pointer plus length instead of `Vec`,
//! and enums with explicit discriminants. Conversions live here to keep
//! `lib.rs` focused on the `extern "C"` surface.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use habits_core::{Delivery, HttpMethod, SubmitError, Submitter, UreqTransport};

/// Opaque handle to a client. C callers receive a pointer to this and pass
/// it back into every FFI function.
pub struct FfiEventClient {
    pub(crate) submitter: Submitter<UreqTransport>,
    /// Runs fire-and-forget submissions; dropped with the handle.
    pub(crate) runtime: tokio::runtime::Runtime,
}

/// Copy `s` into a heap C string. Interior NULs cannot occur in the strings
/// produced here (JSON escapes them), so the fallback is an empty string.
pub(crate) fn into_c_string(s: String) -> *mut c_char {
    CString::new(s).unwrap_or_default().into_raw()
}

/// Read a borrowed C string. Returns `None` for null or invalid UTF-8, so
/// user text is never altered on its way into a payload.
pub(crate) fn read_c_str(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().ok().map(str::to_owned)
}

/// Read a borrowed C string for diagnostics only, replacing invalid UTF-8.
pub(crate) fn read_c_str_lossy(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    Some(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
pub enum FfiHttpMethod {
    Post = 0,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Post => FfiHttpMethod::Post,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// Built by `habits_build_*` functions. The host executes the request and
/// passes the response back through `habits_parse_submission`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: habits_core::HttpRequest) -> *mut Self {
        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Box<[FfiHeader]> = req
                .headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: into_c_string(k),
                    value: into_c_string(v),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            url: into_c_string(req.url),
            headers,
            headers_len,
            body: into_c_string(req.body),
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The host constructs this after executing a request and passes a pointer
/// to `habits_parse_submission`. The FFI layer reads but does not free it.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiSubmitResult`.
#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    InvalidEndpoint = 1,
    Serialization = 2,
    Transport = 3,
    NonSuccessStatus = 4,
    Panic = 5,
    NullArg = 6,
}

/// Result envelope for `habits_parse_submission`.
///
/// On success `error_code` is `Ok` and `error_message` is null. On failure
/// `error_message` is a human-readable C string. `http_status` is set
/// whenever a status was observed.
#[repr(C)]
pub struct FfiSubmitResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
}

impl FfiSubmitResult {
    fn boxed(error_code: FfiErrorCode, error_message: *mut c_char, http_status: u16) -> *mut Self {
        Box::into_raw(Box::new(FfiSubmitResult {
            error_code,
            error_message,
            http_status,
        }))
    }

    pub(crate) fn ok(delivery: Delivery) -> *mut Self {
        Self::boxed(FfiErrorCode::Ok, std::ptr::null_mut(), delivery.status)
    }

    pub(crate) fn from_error(err: SubmitError) -> *mut Self {
        let (error_code, http_status) = match &err {
            SubmitError::InvalidEndpoint(_) => (FfiErrorCode::InvalidEndpoint, 0),
            SubmitError::SerializationError(_) => (FfiErrorCode::Serialization, 0),
            SubmitError::TransportError(_) => (FfiErrorCode::Transport, 0),
            SubmitError::NonSuccessStatus { status, .. } => (FfiErrorCode::NonSuccessStatus, *status),
        };
        Self::boxed(error_code, into_c_string(err.to_string()), http_status)
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::boxed(FfiErrorCode::NullArg, into_c_string(format!("null argument: {name}")), 0)
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::boxed(FfiErrorCode::Panic, into_c_string(msg.to_string()), 0)
    }
}
