//! Rate limit gateway filter - second stage of the request pipeline.
//!
//! Consumes the resolved identity (tenant filter has already run), checks the
//! quota, stamps the rate-limit headers, and short-circuits with 429 when the
//! window is exhausted. A store failure lets the request through without
//! headers.

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use gateway_error::AppError;
use std::net::SocketAddr;

use crate::auth;
use crate::metrics;
use crate::rate_limit::RateLimitOutcome;
use crate::utils::extract_client_ip;
use crate::GatewayContext;

const HEADER_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
const HEADER_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
const HEADER_RESET: HeaderName = HeaderName::from_static("x-ratelimit-reset");
const HEADER_RETRY_AFTER: HeaderName = HeaderName::from_static("retry-after");

pub async fn rate_limiting(
    State(ctx): State<GatewayContext>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path().to_string();

    if ctx.config.tenant.is_excluded_path(&path) {
        return Ok(next.run(request).await);
    }

    let privileged = auth::is_privileged(request.extensions());
    let peer_ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip());
    let client_ip = extract_client_ip(request.headers(), peer_ip);

    match ctx.limiter.check(&client_ip, &path, privileged).await {
        RateLimitOutcome::Denied {
            limit,
            retry_after_secs,
            reset_at,
        } => {
            tracing::warn!(
                client_ip = %client_ip,
                path = %path,
                limit = limit,
                "Rate limit exceeded"
            );
            metrics::RATE_LIMIT_DENIALS_TOTAL.inc();

            let mut response = AppError::TooManyRequests {
                limit,
                retry_after_secs,
            }
            .into_response();
            set_limit_headers(&mut response, limit, 0, reset_at);
            if let Ok(value) = HeaderValue::from_str(&retry_after_secs.to_string()) {
                response.headers_mut().insert(HEADER_RETRY_AFTER, value);
            }
            Ok(response)
        }
        RateLimitOutcome::Allowed {
            limit,
            remaining,
            reset_at,
        } => {
            let mut response = next.run(request).await;
            set_limit_headers(&mut response, limit, remaining, reset_at);
            Ok(response)
        }
        // Disabled, privileged, or fail-open: continue without headers
        RateLimitOutcome::Skipped | RateLimitOutcome::FailedOpen => Ok(next.run(request).await),
    }
}

fn set_limit_headers(response: &mut Response, limit: u32, remaining: u32, reset_at: i64) {
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&limit.to_string()) {
        headers.insert(HEADER_LIMIT, value);
    }
    if let Ok(value) = HeaderValue::from_str(&remaining.to_string()) {
        headers.insert(HEADER_REMAINING, value);
    }
    if let Ok(value) = HeaderValue::from_str(&reset_at.to_string()) {
        headers.insert(HEADER_RESET, value);
    }
}
