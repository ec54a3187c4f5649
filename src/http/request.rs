//! Request handling.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) and echo it on the response
//! - Extract routing-relevant information (path, request URI, host)
//! - Read the `x-original-uri` header set by the front proxy
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - An existing `x-request-id` from the front proxy is kept

use axum::http::{header, HeaderName, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use uuid::Uuid;

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Page the visitor is actually looking at, forwarded by the front proxy.
pub const X_ORIGINAL_URI: HeaderName = HeaderName::from_static("x-original-uri");

/// Generates UUID v4 request ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Layer assigning `x-request-id` to requests that lack one.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid)
}

/// Layer copying `x-request-id` onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(X_REQUEST_ID)
}

/// Request id of `request`, or `"unknown"`.
pub fn request_id<B>(request: &Request<B>) -> String {
    header_str(request, &X_REQUEST_ID)
        .unwrap_or("unknown")
        .to_string()
}

fn header_str<'r, B>(request: &'r Request<B>, name: &HeaderName) -> Option<&'r str> {
    request.headers().get(name).and_then(|v| v.to_str().ok())
}

/// The parts of a request the handlers work with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// Request path, e.g. `/en/documentation/v1/`.
    pub path: String,
    /// Path plus query string.
    pub request_uri: String,
    /// `x-original-uri` header value, empty when absent.
    pub original_uri: String,
    pub host: String,
    pub request_id: String,
}

impl RequestContext {
    pub fn from_request<B>(request: &Request<B>) -> Self {
        let uri = request.uri();
        let path = uri.path().to_string();
        let request_uri = uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| path.clone());
        let host = header_str(request, &header::HOST)
            .map(str::to_string)
            .or_else(|| uri.authority().map(|a| a.to_string()))
            .unwrap_or_default();

        Self {
            path,
            request_uri,
            original_uri: header_str(request, &X_ORIGINAL_URI).unwrap_or_default().to_string(),
            host,
            request_id: request_id(request),
        }
    }
}
