//! # Gateway Redis
//!
//! Low-level Redis client for the storefront gateway.
//!
//! ## Design Principles
//!
//! - **No business logic** - Pure infrastructure layer
//! - **No dependencies** on other gateway-* crates
//! - **Atomic where it matters** - the fixed-window increment is a single
//!   Lua round-trip, so the decision and the reported remaining count come
//!   from one consistent reply
//!
//! ## Example
//!
//! ```rust,no_run
//! use gateway_redis::RedisClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = RedisClient::connect("redis://localhost:6379").await?;
//!
//!     let (count, ttl) = client.increment_fixed_window("ratelimit:key", 60).await?;
//!     assert!(count >= 1 && ttl <= 60);
//!
//!     Ok(())
//! }
//! ```

mod client;

pub use client::RedisClient;

// Re-export commonly used types
pub use redis::RedisError;

/// Result type for Redis operations
pub type Result<T> = std::result::Result<T, RedisError>;
