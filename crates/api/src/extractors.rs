//! Request extractors.

use std::net::SocketAddr;

use axum::{
    async_trait,
    extract::{ConnectInfo, FromRef, FromRequestParts},
    http::request::Parts,
};

use crate::middleware::SharedGate;

/// Key used when no address can be determined.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Client network address, used as the submission gate key.
///
/// The TCP peer is used unless the gate is configured to trust proxy
/// headers. Those headers are written by the client otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

impl ClientIp {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn from_proxy_headers(parts: &Parts) -> Option<Self> {
        // Right-most entry is the one appended by the trusted proxy
        if let Some(xff) = parts.headers.get("X-Forwarded-For") {
            if let Ok(xff_str) = xff.to_str() {
                if let Some(ip) = xff_str.rsplit(',').map(str::trim).find(|s| !s.is_empty()) {
                    return Some(ClientIp(ip.to_string()));
                }
            }
        }

        if let Some(real_ip) = parts.headers.get("X-Real-IP") {
            if let Ok(ip) = real_ip.to_str() {
                let ip = ip.trim();
                if !ip.is_empty() {
                    return Some(ClientIp(ip.to_string()));
                }
            }
        }

        None
    }

    fn from_peer(parts: &Parts) -> Self {
        match parts.extensions.get::<ConnectInfo<SocketAddr>>() {
            Some(ConnectInfo(addr)) => ClientIp(addr.ip().to_string()),
            None => ClientIp(UNKNOWN_CLIENT.to_string()),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ClientIp
where
    SharedGate: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let gate = SharedGate::from_ref(state);

        if gate.config().trust_proxy_headers {
            if let Some(ip) = Self::from_proxy_headers(parts) {
                return Ok(ip);
            }
        }

        Ok(Self::from_peer(parts))
    }
}
