use axum::http::HeaderMap;
use std::net::IpAddr;

/// Extracts the real client IP from request headers or connection info.
///
/// Priority: X-Forwarded-For first hop, X-Real-IP, then the transport peer
/// address. Proxies append to X-Forwarded-For, so the first entry is the
/// original client.
pub fn extract_client_ip(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> String {
    if let Some(forwarded_for) = headers.get("x-forwarded-for") {
        if let Ok(forwarded_str) = forwarded_for.to_str() {
            let first_ip = forwarded_str.split(',').next().unwrap_or("").trim();
            if let Ok(ip) = first_ip.parse::<IpAddr>() {
                return normalize_ip(ip);
            }
        }
    }

    if let Some(real_ip) = headers.get("x-real-ip") {
        if let Ok(real_ip_str) = real_ip.to_str() {
            if let Ok(ip) = real_ip_str.trim().parse::<IpAddr>() {
                return normalize_ip(ip);
            }
        }
    }

    if let Some(ip) = direct_ip {
        return normalize_ip(ip);
    }

    // Last resort: shouldn't happen behind a real listener
    "unknown".to_string()
}

/// Normalizes IP address to string format (removes brackets for IPv6)
fn normalize_ip(ip: IpAddr) -> String {
    ip.to_string()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .to_string()
}
