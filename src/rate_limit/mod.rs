//! Distributed fixed-window rate limiting.
//!
//! Counters live in the shared store, so every gateway instance enforces the
//! same quota. One atomic increment per decision: the allow/deny verdict and
//! the reported remaining count both come from that single reply, never from
//! a separate follow-up read. On any store failure the limiter fails open --
//! availability is preferred over strict enforcement.

pub mod store;

pub use store::{RateLimitStore, RedisRateLimitStore, WindowState};

use crate::metrics;
use gateway_config::{RateLimitConfig, RATE_LIMIT_KEY_PREFIX};
use std::sync::Arc;
use std::time::Duration;

/// Per-request rate limit key: client plus path bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitKey {
    pub client_ip: String,
    pub path_bucket: String,
}

impl RateLimitKey {
    pub fn new(client_ip: impl Into<String>, path_bucket: impl Into<String>) -> Self {
        Self {
            client_ip: client_ip.into(),
            path_bucket: path_bucket.into(),
        }
    }

    /// Key under which this window lives in the counter store
    pub fn storage_key(&self) -> String {
        format!(
            "{}:{}:{}",
            RATE_LIMIT_KEY_PREFIX, self.client_ip, self.path_bucket
        )
    }
}

/// Outcome of one rate limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitOutcome {
    /// Within quota; includes header values for the response
    Allowed {
        limit: u32,
        remaining: u32,
        /// Unix timestamp at which the window expires
        reset_at: i64,
    },
    /// Over quota for this window
    Denied {
        limit: u32,
        retry_after_secs: i64,
        reset_at: i64,
    },
    /// Limiting disabled or caller privileged; the store was never touched
    Skipped,
    /// Store error or timeout; the request proceeds without headers
    FailedOpen,
}

/// Fixed-window rate limiter over a shared counter store
#[derive(Clone)]
pub struct RateLimiter {
    store: Arc<dyn RateLimitStore>,
    policy: Arc<RateLimitConfig>,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn RateLimitStore>, policy: RateLimitConfig) -> Self {
        Self {
            store,
            policy: Arc::new(policy),
        }
    }

    pub fn policy(&self) -> &RateLimitConfig {
        &self.policy
    }

    /// Check the quota for one request.
    ///
    /// `path` is the request path used for override matching; `privileged`
    /// callers bypass the quota entirely.
    pub async fn check(&self, client_ip: &str, path: &str, privileged: bool) -> RateLimitOutcome {
        if !self.policy.enabled || privileged {
            return RateLimitOutcome::Skipped;
        }

        let limit = self.policy.effective_limit(path);
        let key = RateLimitKey::new(client_ip, self.policy.path_bucket(path)).storage_key();
        let window_secs = self.policy.window_seconds;

        // The increment runs in its own task so a client disconnect cannot
        // cancel it mid-flight and leave the counter short. The timeout only
        // stops us waiting, not the increment itself.
        let store = Arc::clone(&self.store);
        let increment = tokio::spawn(async move {
            let key = key;
            store.increment_fixed_window(&key, window_secs).await
        });

        let window = match tokio::time::timeout(
            Duration::from_millis(self.policy.store_timeout_ms),
            increment,
        )
        .await
        {
            Ok(Ok(Ok(window))) => window,
            Ok(Ok(Err(e))) => {
                tracing::warn!(error = %e, "Counter store error, failing open");
                metrics::RATE_LIMIT_STORE_FAILURES.inc();
                return RateLimitOutcome::FailedOpen;
            }
            Ok(Err(join_error)) => {
                tracing::warn!(error = %join_error, "Counter store task failed, failing open");
                metrics::RATE_LIMIT_STORE_FAILURES.inc();
                return RateLimitOutcome::FailedOpen;
            }
            Err(_) => {
                tracing::warn!(
                    timeout_ms = self.policy.store_timeout_ms,
                    "Counter store timed out, failing open"
                );
                metrics::RATE_LIMIT_STORE_FAILURES.inc();
                return RateLimitOutcome::FailedOpen;
            }
        };

        let ttl_secs = window.ttl_secs.max(0);
        let reset_at = chrono::Utc::now().timestamp() + ttl_secs;

        // Inclusive boundary: the request that lands exactly on the limit is
        // still allowed.
        if window.count <= i64::from(limit) {
            RateLimitOutcome::Allowed {
                limit,
                remaining: (i64::from(limit) - window.count).max(0) as u32,
                reset_at,
            }
        } else {
            RateLimitOutcome::Denied {
                limit,
                retry_after_secs: ttl_secs,
                reset_at,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use gateway_error::AppError;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// In-memory stand-in for the shared counter store
    struct MockStore {
        windows: Mutex<HashMap<String, i64>>,
        calls: AtomicUsize,
        failing: AtomicBool,
    }

    impl MockStore {
        fn new() -> Self {
            Self {
                windows: Mutex::new(HashMap::new()),
                calls: AtomicUsize::new(0),
                failing: AtomicBool::new(false),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RateLimitStore for MockStore {
        async fn increment_fixed_window(
            &self,
            key: &str,
            window_secs: u64,
        ) -> Result<WindowState, AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing.load(Ordering::SeqCst) {
                return Err(AppError::internal("simulated store outage"));
            }
            let mut windows = self.windows.lock().unwrap();
            let count = windows.entry(key.to_string()).or_insert(0);
            *count += 1;
            Ok(WindowState {
                count: *count,
                ttl_secs: window_secs as i64,
            })
        }
    }

    fn policy(default_limit: u32, overrides: &[(&str, u32)]) -> RateLimitConfig {
        RateLimitConfig {
            enabled: true,
            default_limit,
            window_seconds: 60,
            path_overrides: overrides
                .iter()
                .map(|(p, l)| (p.to_string(), *l))
                .collect(),
            store_timeout_ms: 500,
        }
    }

    fn limiter_with(store: Arc<MockStore>, config: RateLimitConfig) -> RateLimiter {
        RateLimiter::new(store, config)
    }

    #[tokio::test]
    async fn test_remaining_decreases_and_boundary_is_inclusive() {
        let store = Arc::new(MockStore::new());
        let limiter = limiter_with(store.clone(), policy(3, &[]));

        for expected_remaining in [2u32, 1, 0] {
            match limiter.check("203.0.113.1", "/api/v1/products", false).await {
                RateLimitOutcome::Allowed { limit, remaining, .. } => {
                    assert_eq!(limit, 3);
                    assert_eq!(remaining, expected_remaining);
                }
                other => panic!("expected Allowed, got {:?}", other),
            }
        }

        // Request 4 exceeds the window
        match limiter.check("203.0.113.1", "/api/v1/products", false).await {
            RateLimitOutcome::Denied {
                limit,
                retry_after_secs,
                ..
            } => {
                assert_eq!(limit, 3);
                assert_eq!(retry_after_secs, 60);
            }
            other => panic!("expected Denied, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_privileged_caller_never_touches_store() {
        let store = Arc::new(MockStore::new());
        let limiter = limiter_with(store.clone(), policy(1, &[]));

        for _ in 0..5 {
            let outcome = limiter.check("203.0.113.1", "/api/v1/products", true).await;
            assert_eq!(outcome, RateLimitOutcome::Skipped);
        }
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_disabled_policy_never_touches_store() {
        let store = Arc::new(MockStore::new());
        let mut config = policy(1, &[]);
        config.enabled = false;
        let limiter = limiter_with(store.clone(), config);

        let outcome = limiter.check("203.0.113.1", "/api/v1/products", false).await;
        assert_eq!(outcome, RateLimitOutcome::Skipped);
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_store_error_fails_open() {
        let store = Arc::new(MockStore::new());
        store.failing.store(true, Ordering::SeqCst);
        let limiter = limiter_with(store.clone(), policy(1, &[]));

        let outcome = limiter.check("203.0.113.1", "/api/v1/products", false).await;
        assert_eq!(outcome, RateLimitOutcome::FailedOpen);
    }

    #[tokio::test]
    async fn test_override_path_limited_independently() {
        let store = Arc::new(MockStore::new());
        let limiter = limiter_with(
            store.clone(),
            policy(100, &[("/api/v1/auth/register", 2)]),
        );

        // Exhaust the override bucket
        for _ in 0..2 {
            assert!(matches!(
                limiter
                    .check("203.0.113.1", "/api/v1/auth/register", false)
                    .await,
                RateLimitOutcome::Allowed { limit: 2, .. }
            ));
        }
        assert!(matches!(
            limiter
                .check("203.0.113.1", "/api/v1/auth/register", false)
                .await,
            RateLimitOutcome::Denied { limit: 2, .. }
        ));

        // The default bucket for the same client is untouched
        assert!(matches!(
            limiter.check("203.0.113.1", "/api/v1/products", false).await,
            RateLimitOutcome::Allowed {
                limit: 100,
                remaining: 99,
                ..
            }
        ));
    }

    #[test]
    fn test_storage_key_shape() {
        let key = RateLimitKey::new("203.0.113.1", "default");
        assert_eq!(key.storage_key(), "ratelimit:203.0.113.1:default");

        let key = RateLimitKey::new("203.0.113.1", "/api/v1/auth/login");
        assert_eq!(
            key.storage_key(),
            "ratelimit:203.0.113.1:/api/v1/auth/login"
        );
    }
}
