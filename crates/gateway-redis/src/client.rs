//! Redis client implementation with connection management

use crate::Result;
use redis::{aio::ConnectionManager, AsyncCommands, Script};

/// Lua script for one atomic fixed-window increment.
///
/// INCRs the key, sets the TTL only when this increment created the key
/// (the window TTL is never refreshed afterwards), and returns the
/// post-increment count together with the key's remaining TTL.
const FIXED_WINDOW_SCRIPT: &str = r#"
local count = redis.call('INCR', KEYS[1])
if count == 1 then
    redis.call('EXPIRE', KEYS[1], ARGV[1])
end
local ttl = redis.call('TTL', KEYS[1])
return {count, ttl}
"#;

/// Redis client with automatic reconnection
#[derive(Clone)]
pub struct RedisClient {
    conn: ConnectionManager,
}

impl RedisClient {
    /// Connect to Redis server
    ///
    /// Supports both redis:// and rediss:// (TLS) URLs
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self { conn })
    }

    // ============================================================================
    // Key-Value Operations
    // ============================================================================

    /// GET - Get value by key
    pub async fn get<T: redis::FromRedisValue>(&mut self, key: &str) -> Result<Option<T>> {
        self.conn.get(key).await
    }

    /// SETEX - Set key with expiry in seconds
    pub async fn set_ex(&mut self, key: &str, value: &str, seconds: u64) -> Result<()> {
        self.conn.set_ex(key, value, seconds).await
    }

    /// DEL - Delete one or more keys
    pub async fn del(&mut self, key: &str) -> Result<i64> {
        self.conn.del(key).await
    }

    /// EXPIRE - Set expiry time in seconds
    pub async fn expire(&mut self, key: &str, seconds: i64) -> Result<bool> {
        self.conn.expire(key, seconds).await
    }

    /// TTL - Get time to live in seconds
    pub async fn ttl(&mut self, key: &str) -> Result<i64> {
        self.conn.ttl(key).await
    }

    // ============================================================================
    // Atomic Operations
    // ============================================================================

    /// INCR - Increment integer value
    pub async fn incr(&mut self, key: &str) -> Result<i64> {
        self.conn.incr(key, 1).await
    }

    /// Atomic fixed-window increment.
    ///
    /// Returns `(post_increment_count, remaining_ttl_secs)` from a single
    /// round-trip. The TTL is set exactly once, when the increment creates
    /// the key; later increments within the window leave it untouched.
    pub async fn increment_fixed_window(
        &mut self,
        key: &str,
        window_secs: u64,
    ) -> Result<(i64, i64)> {
        Script::new(FIXED_WINDOW_SCRIPT)
            .key(key)
            .arg(window_secs)
            .invoke_async(&mut self.conn)
            .await
    }
}
