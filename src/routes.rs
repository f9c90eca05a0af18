//! Stand-in downstream handlers.
//!
//! The real platform forwards resolved requests to the business services;
//! these handlers mark that boundary and show what downstream code sees: a
//! fully resolved tenant scope, or nothing at all (the gateway rejected the
//! request before it got here).

use axum::{http::StatusCode, response::IntoResponse, Json};
use gateway_error::AppError;
use serde_json::json;

use crate::tenant;

/// Tenant-scoped product listing placeholder
pub async fn list_products() -> Result<impl IntoResponse, AppError> {
    let tenant_id = tenant::current_tenant()?;

    Ok(Json(json!({
        "tenant_id": tenant_id,
        "products": [],
    })))
}

/// Login placeholder; the path carries a strict per-path rate limit override
pub async fn login() -> Result<impl IntoResponse, AppError> {
    let tenant_id = tenant::current_tenant()?;

    Ok((
        StatusCode::OK,
        Json(json!({"tenant_id": tenant_id, "status": "ok"})),
    ))
}

/// Registration placeholder; also carries a per-path override
pub async fn register() -> Result<impl IntoResponse, AppError> {
    let tenant_id = tenant::current_tenant()?;

    Ok((
        StatusCode::OK,
        Json(json!({"tenant_id": tenant_id, "status": "ok"})),
    ))
}
