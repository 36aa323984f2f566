//! Rate limiting for the login endpoint using governor and `tower_governor`.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use axum::extract::ConnectInfo;
use axum::http::Request;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{GovernorError, GovernorLayer, governor::GovernorConfigBuilder};

/// Key extractor that trusts edge-set headers (`CF-Connecting-IP`,
/// `Fly-Client-IP`) before client-controlled ones, then the peer address.
///
/// Requests with neither (in-process tests) share one bucket keyed by the
/// unspecified address.
#[derive(Clone, Copy)]
pub struct ClientIpKeyExtractor;

/// Set by Cloudflare and Fly; a client cannot override them through the edge.
const EDGE_IP_HEADERS: [&str; 2] = ["cf-connecting-ip", "fly-client-ip"];

/// Client-controlled; only trusted when no edge header is present.
const PROXY_IP_HEADERS: [&str; 2] = ["x-forwarded-for", "x-real-ip"];

fn header_ip<T>(req: &Request<T>, name: &str) -> Option<IpAddr> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .and_then(|s| s.trim().parse::<IpAddr>().ok())
}

impl tower_governor::key_extractor::KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        if let Some(ip) = EDGE_IP_HEADERS
            .iter()
            .chain(&PROXY_IP_HEADERS)
            .find_map(|name| header_ip(req, name))
        {
            return Ok(ip);
        }

        if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
            return Ok(addr.ip());
        }

        Ok(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
    }
}

/// Rate limiter layer type for Axum.
pub type RateLimiterLayer =
    GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Rate limiter for password attempts: ~10 requests per minute per IP.
///
/// One token every 6 seconds, burst of 5. Returns `None` only if governor
/// rejects the quota.
#[must_use]
pub fn login_rate_limiter() -> Option<RateLimiterLayer> {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ClientIpKeyExtractor)
        .per_second(6)
        .burst_size(5)
        .finish()?;
    Some(GovernorLayer::new(Arc::new(config)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tower_governor::key_extractor::KeyExtractor;

    use super::*;

    fn request(headers: &[(&str, &str)]) -> Request<()> {
        let mut builder = Request::builder().uri("/auth/login");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap()
    }

    #[test]
    fn test_spoofed_forwarded_for_loses_to_cloudflare() {
        let first = request(&[
            ("cf-connecting-ip", "198.51.100.2"),
            ("x-forwarded-for", "203.0.113.7"),
        ]);
        let second = request(&[
            ("cf-connecting-ip", "198.51.100.2"),
            ("x-forwarded-for", "203.0.113.8"),
        ]);
        let first = ClientIpKeyExtractor.extract(&first).unwrap();
        assert_eq!(first.to_string(), "198.51.100.2");
        assert_eq!(ClientIpKeyExtractor.extract(&second).unwrap(), first);
    }

    #[test]
    fn test_fly_client_ip_beats_forwarded_for() {
        let req = request(&[
            ("x-forwarded-for", "203.0.113.7, 10.0.0.1"),
            ("fly-client-ip", "192.0.2.44"),
        ]);
        let ip = ClientIpKeyExtractor.extract(&req).unwrap();
        assert_eq!(ip.to_string(), "192.0.2.44");
    }

    #[test]
    fn test_forwarded_for_without_edge_headers() {
        let req = request(&[
            ("x-forwarded-for", "203.0.113.7, 10.0.0.1"),
            ("x-real-ip", "198.51.100.2"),
        ]);
        let ip = ClientIpKeyExtractor.extract(&req).unwrap();
        assert_eq!(ip.to_string(), "203.0.113.7");
    }

    #[test]
    fn test_falls_back_to_connect_info() {
        let mut req = request(&[]);
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([192, 0, 2, 10], 51000))));
        let ip = ClientIpKeyExtractor.extract(&req).unwrap();
        assert_eq!(ip.to_string(), "192.0.2.10");
    }

    #[test]
    fn test_unknown_client_shares_bucket() {
        let ip = ClientIpKeyExtractor.extract(&request(&[])).unwrap();
        assert!(ip.is_unspecified());
    }

    #[test]
    fn test_login_rate_limiter_builds() {
        assert!(login_rate_limiter().is_some());
    }
}
