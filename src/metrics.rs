use anyhow::Result;
use once_cell::sync::Lazy;
use prometheus::{
    opts, register_int_counter, register_int_counter_vec, Encoder, IntCounter, IntCounterVec,
    TextEncoder,
};

pub static TENANTS_RESOLVED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(opts!(
        "gateway_tenants_resolved_total",
        "Requests for which a tenant was successfully resolved"
    ))
    .expect("Failed to register TENANTS_RESOLVED_TOTAL metric")
});

pub static TENANT_REJECTIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        opts!(
            "gateway_tenant_rejections_total",
            "Requests rejected during tenant resolution, by reason"
        ),
        &["reason"]
    )
    .expect("Failed to register TENANT_REJECTIONS_TOTAL metric")
});

pub static RATE_LIMIT_DENIALS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(opts!(
        "gateway_rate_limit_denials_total",
        "Requests denied with 429 by the rate limiter"
    ))
    .expect("Failed to register RATE_LIMIT_DENIALS_TOTAL metric")
});

pub static RATE_LIMIT_STORE_FAILURES: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(opts!(
        "gateway_rate_limit_store_failures_total",
        "Counter-store errors or timeouts that caused a fail-open allow"
    ))
    .expect("Failed to register RATE_LIMIT_STORE_FAILURES metric")
});

pub fn gather_metrics() -> Result<String> {
    let mut buffer = vec![];
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder.encode(&metric_families, &mut buffer)?;

    Ok(String::from_utf8(buffer)?)
}

/// `/metrics` endpoint handler
pub async fn metrics_handler() -> axum::response::Response {
    use axum::response::IntoResponse;

    match gather_metrics() {
        Ok(body) => (axum::http::StatusCode::OK, body).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to gather metrics");
            axum::http::StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
