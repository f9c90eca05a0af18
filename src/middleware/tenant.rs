//! Tenant gateway filter - first stage of the request pipeline.
//!
//! Runs before anything that might read the tenant context. Excluded paths
//! pass through untouched; everything else either completes the chain inside
//! a resolved tenant scope or is rejected here with a generic 404/500.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use gateway_error::AppError;

use crate::metrics;
use crate::tenant::{self, RequestIdentity};
use crate::GatewayContext;

pub async fn tenant_resolution(
    State(ctx): State<GatewayContext>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path().to_string();

    // Infrastructure endpoints are served without tenant identity
    if ctx.config.tenant.is_excluded_path(&path) {
        return Ok(next.run(request).await);
    }

    let identifier = ctx
        .resolver
        .extract_identifier(request.headers())
        .map_err(|e| {
            // Full context stays server-side; the client sees a generic 404
            tracing::debug!(path = %path, "No tenant identifier in request");
            metrics::TENANT_REJECTIONS_TOTAL
                .with_label_values(&["identifier_missing"])
                .inc();
            e
        })?;

    let record = match ctx.directory.find_by_subdomain(&identifier).await {
        Ok(Some(record)) => record,
        Ok(None) => {
            tracing::warn!(path = %path, identifier = %identifier, "Unknown tenant identifier");
            metrics::TENANT_REJECTIONS_TOTAL
                .with_label_values(&["tenant_not_found"])
                .inc();
            return Err(AppError::TenantNotFound(identifier));
        }
        Err(e) => {
            // Unexpected resolution error -> 500, chain does not continue
            tracing::error!(path = %path, identifier = %identifier, error = %e, "Tenant directory lookup failed");
            metrics::TENANT_REJECTIONS_TOTAL
                .with_label_values(&["directory_error"])
                .inc();
            return Err(e);
        }
    };

    tracing::debug!(
        tenant_id = %record.id,
        identifier = %identifier,
        path = %path,
        "Tenant resolved"
    );
    metrics::TENANTS_RESOLVED_TOTAL.inc();

    let identity = RequestIdentity {
        tenant_id: record.id,
    };
    request.extensions_mut().insert(identity);

    // The rest of the chain, including every awaited continuation, runs
    // inside this request's tenant scope.
    Ok(tenant::with_tenant(record.id, next.run(request)).await)
}
