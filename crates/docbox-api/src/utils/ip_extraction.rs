//! Client IP extraction.
//!
//! Rate limiting keys on the client address. Behind a load balancer the
//! socket peer is the proxy, so X-Forwarded-For is consulted with a
//! trusted-proxy hop count to avoid header spoofing.

use axum::http::HeaderMap;
use std::net::{IpAddr, SocketAddr};

/// Extract and validate the client IP from request headers.
///
/// Returns the validated client address, or "unknown" when nothing usable is
/// available. With `trusted_proxy_count` N, the last N entries of the
/// X-Forwarded-For chain are treated as proxies and the entry before them as
/// the client.
pub fn extract_client_ip(
    headers: &HeaderMap,
    socket_addr: Option<&SocketAddr>,
    trusted_proxy_count: usize,
) -> String {
    if let Some(forwarded_for) = headers.get("x-forwarded-for") {
        if let Ok(header_value) = forwarded_for.to_str() {
            if let Some(ip) = extract_from_forwarded_for(header_value, trusted_proxy_count) {
                return ip;
            }
        }
    }

    if let Some(real_ip) = headers.get("x-real-ip") {
        if let Ok(header_value) = real_ip.to_str() {
            let trimmed = header_value.trim();
            if is_valid_ip(trimmed) {
                return trimmed.to_string();
            }
        }
    }

    if let Some(addr) = socket_addr {
        return addr.ip().to_string();
    }

    "unknown".to_string()
}

/// Pick the client entry from an X-Forwarded-For chain (`client, proxy1, ...`).
fn extract_from_forwarded_for(header_value: &str, trusted_proxy_count: usize) -> Option<String> {
    let ips: Vec<&str> = header_value
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();

    if ips.is_empty() {
        return None;
    }

    // Without trusted proxies the header could be spoofed entirely; use the
    // last entry (closest to us) after validation.
    let candidate = if trusted_proxy_count == 0 || ips.len() <= trusted_proxy_count {
        *ips.last()?
    } else {
        ips[ips.len() - trusted_proxy_count - 1]
    };

    if is_valid_ip(candidate) {
        Some(candidate.to_string())
    } else {
        None
    }
}

fn is_valid_ip(value: &str) -> bool {
    value.parse::<IpAddr>().is_ok()
}
