use axum::{http::StatusCode, response::IntoResponse};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

/// Application error type for the gateway pipeline.
///
/// Covers the resolution and quota failure taxonomy handled at the gateway
/// boundary, plus the infrastructure errors behind it. Rejections carry enough
/// context for server-side logging while the client-facing body stays generic.
#[derive(Error, Debug)]
pub enum AppError {
    // ===== Tenant Resolution Errors =====
    /// No usable tenant identifier in the request (absent/blank Host or
    /// header, too few host labels, or a reserved infrastructure subdomain).
    #[error("tenant identifier missing or malformed")]
    TenantIdentifierMissing,

    /// The extracted identifier has no active tenant record.
    #[error("tenant not found: {0}")]
    TenantNotFound(String),

    /// Tenant identity was read outside a resolved request scope.
    /// This is a pipeline wiring defect, not a client error.
    #[error("tenant context accessed outside a resolved request scope")]
    TenantContextMissing,

    // ===== Rate Limiting Errors =====
    #[error("rate limit exceeded: {limit} requests per window, retry in {retry_after_secs}s")]
    TooManyRequests { limit: u32, retry_after_secs: i64 },

    // ===== Infrastructure Errors =====
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ===== Configuration Errors =====
    #[error("Configuration error: {0}")]
    Config(String),

    // ===== Internal Server Errors =====
    #[error("Internal server error: {0}")]
    Internal(String),

    // ===== Unknown/Generic Errors =====
    #[error("Unknown error: {0}")]
    Unknown(#[from] anyhow::Error),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::TenantIdentifierMissing | AppError::TenantNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            AppError::TooManyRequests { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::TenantContextMissing
            | AppError::Redis(_)
            | AppError::Database(_)
            | AppError::Io(_)
            | AppError::Json(_)
            | AppError::Config(_)
            | AppError::Internal(_)
            | AppError::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get a user-friendly error message (without internal details)
    pub fn user_message(&self) -> String {
        match self {
            AppError::TenantIdentifierMissing | AppError::TenantNotFound(_) => {
                "Tenant not found".to_string()
            }
            AppError::TooManyRequests { .. } => "Too many requests".to_string(),
            _ => "Internal server error".to_string(),
        }
    }

    /// Get error code for programmatic error handling
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::TenantIdentifierMissing => "TENANT_IDENTIFIER_MISSING",
            AppError::TenantNotFound(_) => "TENANT_NOT_FOUND",
            AppError::TenantContextMissing => "TENANT_CONTEXT_MISSING",
            AppError::TooManyRequests { .. } => "RATE_LIMIT_EXCEEDED",
            AppError::Redis(_) => "REDIS_ERROR",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Io(_) => "IO_ERROR",
            AppError::Json(_) => "JSON_ERROR",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
            AppError::Unknown(_) => "UNKNOWN_ERROR",
        }
    }

    /// Log this error with appropriate level and context
    pub fn log(&self) {
        let status = self.status_code();
        let code = self.error_code();

        if status.is_server_error() {
            tracing::error!(
                error = %self,
                error_code = %code,
                status = %status.as_u16(),
                "Server error occurred"
            );
        } else if status == StatusCode::TOO_MANY_REQUESTS {
            tracing::warn!(
                error = %self,
                error_code = %code,
                "Rate limit exceeded"
            );
        } else {
            tracing::debug!(
                error = %self,
                error_code = %code,
                "Client error occurred"
            );
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        self.log();

        let status = self.status_code();
        let error_code = self.error_code();

        // Server errors never expose internal details to the client
        let message = if status.is_server_error() {
            "Internal server error".to_string()
        } else {
            self.user_message()
        };

        let body = json!({
            "error": message,
            "error_code": error_code,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}

// ============================================================================
// Helper constructors
// ============================================================================

impl AppError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        AppError::Config(msg.into())
    }

    /// Create an internal server error
    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
