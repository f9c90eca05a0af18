// ============================================================================
// Gateway Config - Centralized configuration management
// ============================================================================
//
// This crate provides centralized configuration for the storefront gateway.
// Supports loading from environment variables with sensible defaults.
//
// ============================================================================

pub mod constants;
mod rate_limit;
mod tenant;

pub use constants::{RATE_LIMIT_KEY_PREFIX, RESERVED_SUBDOMAINS};
pub use rate_limit::RateLimitConfig;
pub use tenant::{TenantConfig, TenantResolutionKind};

use anyhow::{Context as _, Result};
use constants::DEFAULT_PORT;

/// Main configuration structure for the gateway service
#[derive(Clone, Debug)]
pub struct Config {
    /// Postgres connection string for the tenant directory
    pub database_url: String,
    /// Redis connection string for the shared counter store
    pub redis_url: String,

    pub port: u16,
    pub bind_address: String,
    pub rust_log: String,

    // Sub-configurations
    pub tenant: TenantConfig,
    pub rate_limit: RateLimitConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Ok(Self {
            database_url: std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            redis_url: std::env::var("REDIS_URL").context("REDIS_URL must be set")?,

            port,
            bind_address: std::env::var("BIND_ADDRESS")
                .unwrap_or_else(|_| format!("0.0.0.0:{}", port)),

            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),

            tenant: TenantConfig::from_env()?,
            rate_limit: RateLimitConfig::from_env(),
        })
    }
}
