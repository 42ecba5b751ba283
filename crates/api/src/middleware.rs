use axum::{
    extract::{ConnectInfo, FromRequestParts, Request, State},
    http::{header::USER_AGENT, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::{error::ApiError, AppState};
use auth::{AuthIdentity, ClientMeta};

/// Extract the bearer token from the Authorization header
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Middleware to require a valid access token.
///
/// Only the token signature and expiry are checked; no store is read.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers()).ok_or_else(|| {
        ApiError::Unauthorized("Missing or invalid Authorization header".to_string())
    })?;

    let identity = state.auth_service.authenticate(token)?;

    // Store identity in request extensions for handlers to access
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

/// Extractor for the authenticated identity.
/// Use this in handlers that are protected by `require_auth`
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub AuthIdentity);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthIdentity>()
            .copied()
            .map(AuthUser)
            .ok_or_else(|| ApiError::Unauthorized("User not authenticated".to_string()))
    }
}

/// Caller user agent and IP, recorded on new sessions
#[derive(Debug, Clone)]
pub struct ClientInfo(pub ClientMeta);

impl<S> FromRequestParts<S> for ClientInfo
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_agent = parts
            .headers
            .get(USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        let forwarded = parts
            .headers
            .get("X-Forwarded-For")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
            .map(str::to_string);

        let client_ip = forwarded
            .or_else(|| {
                parts
                    .extensions
                    .get::<ConnectInfo<SocketAddr>>()
                    .map(|ConnectInfo(addr)| addr.ip().to_string())
            })
            .unwrap_or_default();

        Ok(ClientInfo(ClientMeta::new(user_agent, client_ip)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, Request as HttpRequest};

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert("Authorization", HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert("Authorization", HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));
    }

    #[tokio::test]
    async fn test_client_info_prefers_forwarded_header() {
        let request = HttpRequest::builder()
            .header(USER_AGENT, "orderin-test/1.0")
            .header("X-Forwarded-For", "203.0.113.7, 10.0.0.1")
            .extension(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 4000))))
            .body(())
            .unwrap();
        let (mut parts, _) = request.into_parts();

        let ClientInfo(meta) = ClientInfo::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(meta.user_agent, "orderin-test/1.0");
        assert_eq!(meta.client_ip, "203.0.113.7");
    }

    #[tokio::test]
    async fn test_client_info_falls_back_to_peer_address() {
        let request = HttpRequest::builder()
            .extension(ConnectInfo(SocketAddr::from(([192, 168, 0, 5], 4000))))
            .body(())
            .unwrap();
        let (mut parts, _) = request.into_parts();

        let ClientInfo(meta) = ClientInfo::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(meta.user_agent, "");
        assert_eq!(meta.client_ip, "192.168.0.5");
    }
}
