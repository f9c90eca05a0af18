//! Tenant directory lookup.
//!
//! The directory is backed by the platform's Postgres instance. A miss is an
//! empty result, not an error; the gateway filter converts it into the typed
//! 404 rejection. Every request pays one lookup round-trip; there is no
//! in-process cache.

use async_trait::async_trait;
use gateway_error::AppError;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub type DbPool = Pool<Postgres>;

/// One whitelabel storefront owner, as onboarded by the platform.
///
/// Read-only to the gateway and immutable for the lifetime of a request.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TenantRecord {
    pub id: Uuid,
    pub subdomain: String,
    pub custom_domain: Option<String>,
    pub active: bool,
}

/// Async lookup: identifier -> active tenant record or empty
#[async_trait]
pub trait TenantDirectory: Send + Sync {
    async fn find_by_subdomain(&self, identifier: &str)
        -> Result<Option<TenantRecord>, AppError>;
}

/// Directory backed by the platform's `tenants` table
pub struct PgTenantDirectory {
    pool: DbPool,
}

impl PgTenantDirectory {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Connect a dedicated pool for the gateway
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl TenantDirectory for PgTenantDirectory {
    async fn find_by_subdomain(
        &self,
        identifier: &str,
    ) -> Result<Option<TenantRecord>, AppError> {
        let record = sqlx::query_as::<_, TenantRecord>(
            r#"
            SELECT id, subdomain, custom_domain, active
            FROM tenants
            WHERE subdomain = $1 AND active = TRUE
            "#,
        )
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }
}
