// ============================================================================
// Rate Limiting Configuration
// ============================================================================

use std::collections::HashMap;

use crate::constants::{
    DEFAULT_PATH_OVERRIDES, DEFAULT_RATE_LIMIT, DEFAULT_STORE_TIMEOUT_MS, DEFAULT_WINDOW_SECS,
};

/// Fixed-window rate limiting policy, loaded once at startup and shared
/// read-only across all requests.
#[derive(Clone, Debug)]
pub struct RateLimitConfig {
    /// Global kill switch; when false the counter store is never touched
    pub enabled: bool,
    /// Requests per window when no per-path override matches
    pub default_limit: u32,
    /// Window length in seconds; a window's TTL is set once at creation
    pub window_seconds: u64,
    /// Exact-path limit overrides (e.g. `/api/v1/auth/login` -> 10)
    pub path_overrides: HashMap<String, u32>,
    /// Upper bound on a single counter-store round-trip; a timeout is
    /// treated like a store error (fail-open)
    pub store_timeout_ms: u64,
}

impl RateLimitConfig {
    pub(crate) fn from_env() -> Self {
        let overrides = std::env::var("RATE_LIMIT_PATH_OVERRIDES")
            .unwrap_or_else(|_| DEFAULT_PATH_OVERRIDES.to_string());

        Self {
            enabled: std::env::var("RATE_LIMIT_ENABLED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            default_limit: std::env::var("RATE_LIMIT_DEFAULT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_RATE_LIMIT),
            window_seconds: std::env::var("RATE_LIMIT_WINDOW_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_WINDOW_SECS),
            path_overrides: parse_path_overrides(&overrides),
            store_timeout_ms: std::env::var("RATE_LIMIT_STORE_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_STORE_TIMEOUT_MS),
        }
    }

    /// Limit for this path: exact-match override if present, else the default
    pub fn effective_limit(&self, path: &str) -> u32 {
        self.path_overrides
            .get(path)
            .copied()
            .unwrap_or(self.default_limit)
    }

    /// Bucket name used in the counter key: the matched override path, or
    /// `default` so non-override paths share one bucket per client
    pub fn path_bucket<'a>(&self, path: &'a str) -> &'a str {
        if self.path_overrides.contains_key(path) {
            path
        } else {
            "default"
        }
    }
}

/// Parse `path=limit` pairs, comma-separated. Malformed entries are skipped
/// with a warning rather than failing startup.
fn parse_path_overrides(raw: &str) -> HashMap<String, u32> {
    let mut overrides = HashMap::new();
    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        match entry.split_once('=') {
            Some((path, limit)) => match limit.trim().parse::<u32>() {
                Ok(limit) if !path.trim().is_empty() => {
                    overrides.insert(path.trim().to_string(), limit);
                }
                _ => {
                    tracing::warn!(entry = %entry, "Skipping malformed rate limit override");
                }
            },
            None => {
                tracing::warn!(entry = %entry, "Skipping malformed rate limit override");
            }
        }
    }
    overrides
}
