// ABOUTME: Request tracing helpers for per-request spans and completion logging
// ABOUTME: Spans carry method, matched route and the x-request-id set at the edge
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use std::time::Duration;

use axum::extract::MatchedPath;
use http::{Request, StatusCode};
use tower_http::classify::ServerErrorsFailureClass;
use tracing::Span;

/// Header carrying the request id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Build the span wrapping one HTTP request
///
/// The path is the matched route template when available, so ids do not
/// explode span cardinality.
pub fn make_request_span<B>(request: &Request<B>) -> Span {
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-");

    tracing::info_span!(
        "http_request",
        method = %request.method(),
        path = %path,
        request_id = %request_id,
    )
}

/// Log request completion; 5xx responses are logged as errors
pub fn log_response(status: StatusCode, latency: Duration) {
    if status.is_server_error() {
        tracing::error!(
            status = status.as_u16(),
            latency_ms = %latency.as_millis(),
            "request failed with server error"
        );
    } else {
        tracing::info!(
            status = status.as_u16(),
            latency_ms = %latency.as_millis(),
            "request completed"
        );
    }
}

/// Log a failure classified by the trace layer
pub fn log_failure(error: &ServerErrorsFailureClass, latency: Duration) {
    tracing::error!(
        error = %error,
        latency_ms = %latency.as_millis(),
        "request failed"
    );
}
