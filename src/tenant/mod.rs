//! Tenant identity: resolution strategies, directory lookup, and the
//! per-request context that carries the resolved tenant through the
//! asynchronous pipeline.

pub mod context;
pub mod directory;
pub mod resolver;

pub use context::{current_tenant, try_current_tenant, with_tenant};
pub use directory::{PgTenantDirectory, TenantDirectory, TenantRecord};
pub use resolver::TenantResolver;

use uuid::Uuid;

/// Identity attached to one request by the tenant gateway filter.
///
/// Created once after a successful directory lookup, never mutated, and
/// dropped when the request completes. Also inserted as a request extension
/// so downstream extractors can read it without the task-local.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestIdentity {
    pub tenant_id: Uuid,
}
