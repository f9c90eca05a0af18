//! Gateway pipeline stages.
//!
//! Ordering is fixed: tenant resolution always completes (success or
//! rejection) before rate limiting runs, and both run before any downstream
//! handler.

pub mod rate_limit;
pub mod tenant;

pub use rate_limit::rate_limiting;
pub use tenant::tenant_resolution;
