// ============================================================================
// Storefront Gateway Service
// ============================================================================

use anyhow::{Context, Result};
use gateway_config::Config;
use gateway_redis::RedisClient;
use std::net::SocketAddr;
use std::sync::Arc;
use storefront_gateway::rate_limit::{RateLimiter, RedisRateLimitStore};
use storefront_gateway::tenant::PgTenantDirectory;
use storefront_gateway::{build_router, GatewayContext};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::from_env()?;
    let config = Arc::new(config);

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.rust_log.clone()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("=== Storefront Gateway Starting ===");
    info!("Port: {}", config.port);
    info!(
        "Tenant resolution strategy: {:?}",
        config.tenant.resolution
    );
    info!(
        "Rate limiting: enabled={}, default={}/{}s",
        config.rate_limit.enabled, config.rate_limit.default_limit, config.rate_limit.window_seconds
    );

    // Tenant directory (Postgres)
    info!("Connecting to tenant directory...");
    let directory = Arc::new(
        PgTenantDirectory::connect(&config.database_url)
            .await
            .context("Failed to connect to tenant directory")?,
    );
    info!("Connected to tenant directory");

    // Counter store (Redis)
    info!("Connecting to counter store...");
    let redis = RedisClient::connect(&config.redis_url)
        .await
        .context("Failed to connect to Redis")?;
    info!("Connected to counter store");

    let limiter = RateLimiter::new(
        Arc::new(RedisRateLimitStore::new(redis)),
        config.rate_limit.clone(),
    );

    let context = GatewayContext::new(config.clone(), directory, limiter);
    let app = build_router(context);

    // Start server
    let addr: SocketAddr = config
        .bind_address
        .parse()
        .context("Failed to parse bind address")?;

    info!("Storefront Gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("Failed to start server")?;

    Ok(())
}
