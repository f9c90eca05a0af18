//! Tenant identifier extraction from inbound requests.
//!
//! Exactly one strategy variant is active per deployment, selected once at
//! startup from configuration. The resolver never performs I/O; it only
//! parses headers.

use axum::http::{header, HeaderMap};
use gateway_config::{TenantConfig, TenantResolutionKind, RESERVED_SUBDOMAINS};
use gateway_error::AppError;
use std::collections::HashSet;

/// Strategy for extracting a raw tenant identifier from a request
#[derive(Debug, Clone)]
pub enum TenantResolver {
    /// First label of the Host header identifies the tenant
    Subdomain {
        /// Infrastructure subdomains that can never identify a tenant
        reserved: HashSet<String>,
    },
    /// A dedicated header carries the identifier verbatim
    Header { name: String },
}

impl TenantResolver {
    /// Build the resolver selected by deployment configuration
    pub fn from_config(config: &TenantConfig) -> Self {
        match config.resolution {
            TenantResolutionKind::Subdomain => Self::Subdomain {
                reserved: RESERVED_SUBDOMAINS.iter().map(|s| s.to_string()).collect(),
            },
            TenantResolutionKind::Header => Self::Header {
                name: config.header_name.clone(),
            },
        }
    }

    /// Extract the raw tenant identifier, or fail with
    /// [`AppError::TenantIdentifierMissing`].
    ///
    /// Identifiers are lowercased: hostnames are case-insensitive and the
    /// directory stores subdomains in lowercase.
    pub fn extract_identifier(&self, headers: &HeaderMap) -> Result<String, AppError> {
        match self {
            Self::Subdomain { reserved } => extract_from_host(headers, reserved),
            Self::Header { name } => extract_from_header(headers, name),
        }
    }
}

fn extract_from_host(headers: &HeaderMap, reserved: &HashSet<String>) -> Result<String, AppError> {
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .ok_or(AppError::TenantIdentifierMissing)?;

    // Strip a :port suffix if present
    let host = host.split(':').next().unwrap_or(host);

    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() < 2 {
        // Bare hostname, no subdomain to extract
        return Err(AppError::TenantIdentifierMissing);
    }

    let candidate = labels[0].trim();
    if candidate.is_empty() {
        return Err(AppError::TenantIdentifierMissing);
    }

    let candidate = candidate.to_ascii_lowercase();
    if reserved.contains(&candidate) {
        tracing::debug!(subdomain = %candidate, "Reserved infrastructure subdomain, not a tenant");
        return Err(AppError::TenantIdentifierMissing);
    }

    Ok(candidate)
}

fn extract_from_header(headers: &HeaderMap, name: &str) -> Result<String, AppError> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| v.to_ascii_lowercase())
        .ok_or(AppError::TenantIdentifierMissing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn subdomain_resolver() -> TenantResolver {
        TenantResolver::Subdomain {
            reserved: RESERVED_SUBDOMAINS.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn headers_with_host(host: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_str(host).unwrap());
        headers
    }

    #[test]
    fn test_subdomain_extracted_from_host() {
        let resolver = subdomain_resolver();
        let headers = headers_with_host("store1.retail.example.com");
        assert_eq!(resolver.extract_identifier(&headers).unwrap(), "store1");
    }

    #[test]
    fn test_port_suffix_stripped() {
        let resolver = subdomain_resolver();
        let headers = headers_with_host("store1.example.com:8443");
        assert_eq!(resolver.extract_identifier(&headers).unwrap(), "store1");
    }

    #[test]
    fn test_identifier_lowercased() {
        let resolver = subdomain_resolver();
        let headers = headers_with_host("Store1.Example.COM");
        assert_eq!(resolver.extract_identifier(&headers).unwrap(), "store1");
    }

    #[test]
    fn test_missing_host_fails() {
        let resolver = subdomain_resolver();
        let result = resolver.extract_identifier(&HeaderMap::new());
        assert!(matches!(result, Err(AppError::TenantIdentifierMissing)));
    }

    #[test]
    fn test_bare_hostname_fails() {
        let resolver = subdomain_resolver();
        let result = resolver.extract_identifier(&headers_with_host("localhost"));
        assert!(matches!(result, Err(AppError::TenantIdentifierMissing)));

        let result = resolver.extract_identifier(&headers_with_host("localhost:8080"));
        assert!(matches!(result, Err(AppError::TenantIdentifierMissing)));
    }

    #[test]
    fn test_reserved_subdomains_rejected_case_insensitively() {
        let resolver = subdomain_resolver();
        for host in [
            "www.example.com",
            "WWW.example.com",
            "api.retail.example.com",
            "Admin.example.com",
            "static.example.com",
            "CDN.example.com:443",
        ] {
            let result = resolver.extract_identifier(&headers_with_host(host));
            assert!(
                matches!(result, Err(AppError::TenantIdentifierMissing)),
                "expected rejection for {}",
                host
            );
        }
    }

    #[test]
    fn test_header_strategy_reads_configured_header() {
        let resolver = TenantResolver::Header {
            name: "X-Tenant-ID".to_string(),
        };

        let mut headers = HeaderMap::new();
        headers.insert("X-Tenant-ID", HeaderValue::from_static("store1"));
        assert_eq!(resolver.extract_identifier(&headers).unwrap(), "store1");
    }

    #[test]
    fn test_header_strategy_blank_value_fails() {
        let resolver = TenantResolver::Header {
            name: "X-Tenant-ID".to_string(),
        };

        let mut headers = HeaderMap::new();
        headers.insert("X-Tenant-ID", HeaderValue::from_static("   "));
        let result = resolver.extract_identifier(&headers);
        assert!(matches!(result, Err(AppError::TenantIdentifierMissing)));

        let result = resolver.extract_identifier(&HeaderMap::new());
        assert!(matches!(result, Err(AppError::TenantIdentifierMissing)));
    }
}
