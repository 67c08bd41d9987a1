//! Request inspection.
//!
//! # Responsibilities
//! - Generate unique request ID (UUID v4)
//! - Determine the client address (X-Forwarded-For, then peer address)
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - X-Forwarded-For is trusted as set by upstream proxies; its first
//!   entry is not validated here, the lookup rejects unparseable text

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderName, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

pub const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Generates a v4 UUID for requests arriving without an `x-request-id`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

/// Request id as a string, or "unknown" when absent.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Peer address recorded by `into_make_service_with_connect_info`.
pub async fn peer_addr<S>(parts: &mut Parts, state: &S) -> Option<SocketAddr>
where
    S: Send + Sync,
{
    ConnectInfo::<SocketAddr>::from_request_parts(parts, state)
        .await
        .ok()
        .map(|ConnectInfo(addr)| addr)
}

/// Client address as text.
///
/// When `X-Forwarded-For` carries a value its first entry, trimmed, is
/// returned as-is, even when empty or not an address. Only a missing or
/// blank header falls back to the peer address without its port.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> Option<String> {
    let forwarded = headers
        .get(&X_FORWARDED_FOR)
        .map(|v| String::from_utf8_lossy(v.as_bytes()))
        .filter(|v| !v.trim().is_empty());

    match forwarded {
        Some(value) => value.split(',').next().map(|ip| ip.trim().to_string()),
        None => peer.map(|addr| addr.ip().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::HeaderValue;

    fn headers(xff: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(xff) = xff {
            headers.insert(X_FORWARDED_FOR, HeaderValue::from_str(xff).unwrap());
        }
        headers
    }

    fn peer() -> Option<SocketAddr> {
        Some("198.51.100.20:51234".parse().unwrap())
    }

    #[test]
    fn test_forwarded_for_takes_precedence() {
        let ip = client_ip(&headers(Some("203.0.113.5, 70.41.3.18")), peer());
        assert_eq!(ip.as_deref(), Some("203.0.113.5"));
    }

    #[test]
    fn test_forwarded_for_single_entry_is_trimmed() {
        let ip = client_ip(&headers(Some("  2001:db8::7  ")), None);
        assert_eq!(ip.as_deref(), Some("2001:db8::7"));
    }

    #[test]
    fn test_forwarded_for_is_not_validated() {
        let ip = client_ip(&headers(Some("unknown, 70.41.3.18")), peer());
        assert_eq!(ip.as_deref(), Some("unknown"));
    }

    #[test]
    fn test_falls_back_to_peer_without_port() {
        assert_eq!(client_ip(&headers(None), peer()).as_deref(), Some("198.51.100.20"));

        let v6: SocketAddr = "[2001:db8::1]:443".parse().unwrap();
        assert_eq!(client_ip(&headers(None), Some(v6)).as_deref(), Some("2001:db8::1"));
    }

    #[test]
    fn test_blank_forwarded_header_falls_back() {
        assert_eq!(client_ip(&headers(Some("")), peer()).as_deref(), Some("198.51.100.20"));
        assert_eq!(client_ip(&headers(Some("   ")), peer()).as_deref(), Some("198.51.100.20"));
    }

    #[test]
    fn test_empty_first_entry_is_kept() {
        let ip = client_ip(&headers(Some(" , 70.41.3.18")), peer());
        assert_eq!(ip.as_deref(), Some(""));
    }

    #[test]
    fn test_non_ascii_forwarded_for_is_kept() {
        let mut headers = HeaderMap::new();
        headers.insert(X_FORWARDED_FOR, HeaderValue::from_bytes(b"\xe9t\xe9").unwrap());

        let ip = client_ip(&headers, peer()).unwrap();
        assert_eq!(ip, "\u{FFFD}t\u{FFFD}");
    }

    #[test]
    fn test_no_source() {
        assert_eq!(client_ip(&headers(None), None), None);
    }

    #[tokio::test]
    async fn test_peer_addr_from_extensions() {
        let (mut parts, _) = Request::builder().body(Body::empty()).unwrap().into_parts();
        assert_eq!(peer_addr(&mut parts, &()).await, None);

        let addr: SocketAddr = "192.0.2.9:4000".parse().unwrap();
        parts.extensions.insert(ConnectInfo(addr));
        assert_eq!(peer_addr(&mut parts, &()).await, Some(addr));
    }

    #[test]
    fn test_uuid_request_id() {
        let request = Request::builder().body(()).unwrap();
        let id = UuidRequestId.make_request_id(&request).unwrap();
        let text = id.header_value().to_str().unwrap();
        assert!(Uuid::parse_str(text).is_ok());
    }
}
