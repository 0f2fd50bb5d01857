//! Request handling and transformation.
//!
//! # Responsibilities
//! - Extract routing-relevant information (scheme, host, path)
//! - Provide request ID layers for tracing
//!
//! # Design Decisions
//! - Host comes from the `Host` header, falling back to the URI authority
//! - Scheme honours `x-forwarded-proto` (TLS usually ends at a proxy)
//! - The path is the raw, still percent-encoded URI path

use axum::http::{header, HeaderName, Request};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

use crate::routing::RequestContext;

pub const REQUEST_ID_HEADER: &str = "x-request-id";
const FORWARDED_PROTO_HEADER: &str = "x-forwarded-proto";

/// Build the routing context of a request; `None` when no host is known.
pub fn request_context<B>(request: &Request<B>) -> Option<RequestContext> {
    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string)
        .or_else(|| request.uri().authority().map(|a| a.as_str().to_string()))
        .filter(|h| !h.is_empty())?;

    let scheme = request
        .headers()
        .get(FORWARDED_PROTO_HEADER)
        .and_then(|h| h.to_str().ok())
        .or_else(|| request.uri().scheme_str())
        .unwrap_or("http")
        .to_ascii_lowercase();

    Some(RequestContext::new(scheme, host, request.uri().path()))
}

/// Assigns a UUID request ID when the client did not send one.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(HeaderName::from_static(REQUEST_ID_HEADER), MakeRequestUuid)
}

/// Copies the request ID onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(HeaderName::from_static(REQUEST_ID_HEADER))
}
