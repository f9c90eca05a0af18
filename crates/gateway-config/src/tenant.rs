// ============================================================================
// Tenant Resolution Configuration
// ============================================================================

use crate::constants::{DEFAULT_EXCLUDED_PATHS, DEFAULT_TENANT_HEADER};

/// Which resolution strategy the deployment runs.
///
/// Exactly one strategy is active per deployment; it is selected here once at
/// startup and never switched per request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TenantResolutionKind {
    /// Identifier is the first label of the Host header
    Subdomain,
    /// Identifier is carried in a dedicated header
    Header,
}

impl std::str::FromStr for TenantResolutionKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "subdomain" => Ok(Self::Subdomain),
            "header" => Ok(Self::Header),
            other => anyhow::bail!(
                "invalid TENANT_RESOLUTION_STRATEGY '{}' (expected 'subdomain' or 'header')",
                other
            ),
        }
    }
}

/// Tenant identification policy, loaded once at startup
#[derive(Clone, Debug)]
pub struct TenantConfig {
    pub resolution: TenantResolutionKind,
    /// Header carrying the tenant identifier (header strategy only)
    pub header_name: String,
    /// Path prefixes for which tenant resolution and rate limiting are skipped
    pub excluded_path_prefixes: Vec<String>,
}

impl TenantConfig {
    pub(crate) fn from_env() -> anyhow::Result<Self> {
        let resolution = std::env::var("TENANT_RESOLUTION_STRATEGY")
            .unwrap_or_else(|_| "subdomain".to_string())
            .parse()?;

        let header_name = std::env::var("TENANT_HEADER_NAME")
            .unwrap_or_else(|_| DEFAULT_TENANT_HEADER.to_string());

        let excluded = std::env::var("GATEWAY_EXCLUDED_PATHS")
            .unwrap_or_else(|_| DEFAULT_EXCLUDED_PATHS.to_string());

        Ok(Self {
            resolution,
            header_name,
            excluded_path_prefixes: parse_excluded_paths(&excluded),
        })
    }

    /// Whether the gateway pipeline skips this path entirely.
    ///
    /// The root entry `/` matches only the exact root path; every other entry
    /// matches as a prefix.
    pub fn is_excluded_path(&self, path: &str) -> bool {
        self.excluded_path_prefixes.iter().any(|prefix| {
            if prefix == "/" {
                path == "/"
            } else {
                path.starts_with(prefix.as_str())
            }
        })
    }
}

fn parse_excluded_paths(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(prefixes: &str) -> TenantConfig {
        TenantConfig {
            resolution: TenantResolutionKind::Subdomain,
            header_name: DEFAULT_TENANT_HEADER.to_string(),
            excluded_path_prefixes: parse_excluded_paths(prefixes),
        }
    }

    #[test]
    fn test_excluded_prefixes_match() {
        let config = config_with(DEFAULT_EXCLUDED_PATHS);

        assert!(config.is_excluded_path("/health"));
        assert!(config.is_excluded_path("/health/ready"));
        assert!(config.is_excluded_path("/actuator/info"));
        assert!(config.is_excluded_path("/swagger-ui/index.html"));
        assert!(config.is_excluded_path("/v3/api-docs"));
        assert!(config.is_excluded_path("/webjars/app.js"));
    }

    #[test]
    fn test_root_is_exact_match_only() {
        let config = config_with(DEFAULT_EXCLUDED_PATHS);

        assert!(config.is_excluded_path("/"));
        assert!(!config.is_excluded_path("/api/v1/products"));
        assert!(!config.is_excluded_path("/api"));
    }

    #[test]
    fn test_parse_excluded_paths_trims_and_skips_empty() {
        let parsed = parse_excluded_paths(" /health , , /actuator ");
        assert_eq!(parsed, vec!["/health".to_string(), "/actuator".to_string()]);
    }

    #[test]
    fn test_resolution_kind_parsing() {
        assert_eq!(
            "subdomain".parse::<TenantResolutionKind>().unwrap(),
            TenantResolutionKind::Subdomain
        );
        assert_eq!(
            "Header".parse::<TenantResolutionKind>().unwrap(),
            TenantResolutionKind::Header
        );
        assert!("cookie".parse::<TenantResolutionKind>().is_err());
    }
}
