// ============================================================================
// Storefront Gateway
// ============================================================================
//
// Request gateway for the whitelabel storefront platform. Every API call
// passes through two pipeline stages before reaching business handlers:
//
// 1. Tenant resolution - identify the storefront from the request, look it
//    up in the directory, and bind the identity to the request's async scope
//    (or reject with 404/500).
// 2. Rate limiting - enforce per-client fixed-window quotas against a shared
//    Redis counter store, failing open on store trouble.
//
// Downstream handlers only ever run inside a fully resolved tenant scope.
//
// ============================================================================

pub mod auth;
pub mod health;
pub mod metrics;
pub mod middleware;
pub mod rate_limit;
pub mod routes;
pub mod tenant;
pub mod utils;

use axum::{routing::get, routing::post, Router};
use gateway_config::Config;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use rate_limit::RateLimiter;
use tenant::{TenantDirectory, TenantResolver};

/// Shared gateway dependencies, cloned into every middleware invocation
#[derive(Clone)]
pub struct GatewayContext {
    pub config: Arc<Config>,
    pub resolver: Arc<TenantResolver>,
    pub directory: Arc<dyn TenantDirectory>,
    pub limiter: RateLimiter,
}

impl GatewayContext {
    pub fn new(
        config: Arc<Config>,
        directory: Arc<dyn TenantDirectory>,
        limiter: RateLimiter,
    ) -> Self {
        let resolver = Arc::new(TenantResolver::from_config(&config.tenant));
        Self {
            config,
            resolver,
            directory,
            limiter,
        }
    }
}

/// Build the gateway router: infrastructure endpoints, stand-in downstream
/// routes, and the two-stage pipeline in front of them.
///
/// Layer order matters: tenant resolution must complete before rate limiting
/// runs, and both sit under the trace layer.
pub fn build_router(context: GatewayContext) -> Router {
    Router::new()
        // Infrastructure endpoints (excluded from the pipeline by path)
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::health_check))
        .route("/health/live", get(health::health_check))
        .route("/actuator/prometheus", get(metrics::metrics_handler))
        // Stand-in downstream routes
        .route("/api/v1/products", get(routes::list_products))
        .route("/api/v1/auth/login", post(routes::login))
        .route("/api/v1/auth/register", post(routes::register))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum::middleware::from_fn_with_state(
                    context.clone(),
                    middleware::tenant_resolution,
                ))
                .layer(axum::middleware::from_fn_with_state(
                    context,
                    middleware::rate_limiting,
                ))
                .into_inner(),
        )
}
