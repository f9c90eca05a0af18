//! Counter-store seam for the rate limiter.
//!
//! The store is shared and externally visible to every gateway instance; the
//! only mutation the limiter performs is one atomic increment-that-returns,
//! so all instances agree on the count a given request observed.

use async_trait::async_trait;
use gateway_error::AppError;
use gateway_redis::RedisClient;

/// State of one fixed window, as returned by the store's atomic increment
#[derive(Debug, Clone, Copy)]
pub struct WindowState {
    /// Post-increment request count for the window
    pub count: i64,
    /// Seconds until the window key expires
    pub ttl_secs: i64,
}

/// Shared counter store for fixed-window rate limiting
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// Atomically increment the window counter for `key`, creating it with a
    /// TTL of `window_secs` if absent. The TTL is set only at creation and
    /// never refreshed; both fields of the result come from the same
    /// store-side operation.
    async fn increment_fixed_window(
        &self,
        key: &str,
        window_secs: u64,
    ) -> Result<WindowState, AppError>;
}

/// Redis-backed counter store
pub struct RedisRateLimitStore {
    client: RedisClient,
}

impl RedisRateLimitStore {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RateLimitStore for RedisRateLimitStore {
    async fn increment_fixed_window(
        &self,
        key: &str,
        window_secs: u64,
    ) -> Result<WindowState, AppError> {
        // ConnectionManager is a cheap handle; clone per call so the trait
        // can take &self.
        let mut client = self.client.clone();
        let (count, ttl_secs) = client.increment_fixed_window(key, window_secs).await?;
        Ok(WindowState { count, ttl_secs })
    }
}
