//! Request logging middleware.
//!
//! Emits one `tracing` line per request in the shape
//! `METHOD URI STATUS CONTENT-LENGTH - ELAPSED ms [BODY]`. The phonebook server
//! uses [`log_requests_with_body`], which buffers the request body so it can be
//! printed and then hands an identical body to the handler. The bloglist server
//! uses [`log_requests`] so login passwords never reach the logs.

use std::time::Instant;

use axum::{
    body::{Body, HttpBody},
    extract::Request,
    http::header::CONTENT_LENGTH,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::info;

use crate::error::ApiError;

/// Largest request body that is buffered for logging.
const BODY_LOG_LIMIT: usize = 64 * 1024;

pub async fn log_requests(request: Request, next: Next) -> Response {
    log(request, next, false).await
}

pub async fn log_requests_with_body(request: Request, next: Next) -> Response {
    log(request, next, true).await
}

async fn log(request: Request, next: Next, include_body: bool) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let (request, body) = if include_body {
        match buffer_body(request).await {
            Ok(pair) => pair,
            Err(err) => return err.into_response(),
        }
    } else {
        (request, String::new())
    };

    let started = Instant::now();
    let response = next.run(request).await;
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

    let length = response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok().map(str::to_string))
        .or_else(|| response.body().size_hint().exact().map(|n| n.to_string()))
        .unwrap_or_else(|| "-".to_string());

    info!(
        "{method} {uri} {} {length} - {elapsed_ms:.3} ms {body}",
        response.status().as_u16()
    );

    response
}

async fn buffer_body(request: Request) -> Result<(Request, String), ApiError> {
    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, BODY_LOG_LIMIT)
        .await
        .map_err(|e| ApiError::Validation(format!("Unreadable request body: {e}")))?;

    let text = if bytes.is_empty() {
        "{}".to_string()
    } else {
        String::from_utf8_lossy(&bytes).into_owned()
    };

    Ok((Request::from_parts(parts, Body::from(bytes)), text))
}
