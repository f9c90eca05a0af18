// ============================================================================
// Configuration Constants
// ============================================================================

/// Default HTTP port for the gateway
pub const DEFAULT_PORT: u16 = 8080;

/// Default requests-per-window limit when no per-path override matches
pub const DEFAULT_RATE_LIMIT: u32 = 100;

/// Default fixed-window length in seconds
pub const DEFAULT_WINDOW_SECS: u64 = 60;

/// Default upper bound on a single counter-store round-trip
pub const DEFAULT_STORE_TIMEOUT_MS: u64 = 500;

/// Default per-path limit overrides (comma-separated `path=limit` pairs)
pub const DEFAULT_PATH_OVERRIDES: &str = "/api/v1/auth/login=10,/api/v1/auth/register=5";

/// Default tenant identification header (header resolution strategy)
pub const DEFAULT_TENANT_HEADER: &str = "X-Tenant-ID";

/// Path prefixes that bypass tenant resolution and rate limiting.
/// `/` matches only the exact root path; the rest match as prefixes.
pub const DEFAULT_EXCLUDED_PATHS: &str = "/actuator,/health,/,/swagger-ui,/v3/api-docs,/webjars";

/// Infrastructure subdomains that can never identify a tenant
pub const RESERVED_SUBDOMAINS: [&str; 5] = ["www", "api", "admin", "static", "cdn"];

/// Prefix for rate-limit window keys in the counter store
pub const RATE_LIMIT_KEY_PREFIX: &str = "ratelimit";
