// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Token authentication middleware.
//!
//! For every non-public request the middleware:
//!
//! 1. reads the token from the configured header (or `Authorization: Bearer`),
//! 2. verifies signature and algorithm,
//! 3. checks expiry,
//! 4. resolves the subject in the user store,
//! 5. attaches the user to the [`RequestContext`].
//!
//! Any failure ends the request with 401 and a generic message; the typed
//! reason only goes to the debug log.

use std::collections::HashSet;
use std::future::Future;
use std::net::{IpAddr, SocketAddr};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{header, HeaderMap, Request},
    response::{IntoResponse, Response},
};
use tower::{Layer, Service};
use uuid::Uuid;

use innkeep_core::{Store, User};

use crate::auth::{AuthError, AuthResult, JwtManager, RequestContext};
use crate::config::DEFAULT_TOKEN_HEADER;
use crate::error::ApiError;

/// Header carrying the request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

// =============================================================================
// AuthLayer
// =============================================================================

/// Layer for token authentication.
#[derive(Clone)]
pub struct AuthLayer {
    jwt_manager: Arc<JwtManager>,
    store: Store,
    token_header: Arc<str>,
    public_paths: Arc<HashSet<String>>,
}

impl AuthLayer {
    /// Creates a new auth layer reading tokens from the default header.
    pub fn new(jwt_manager: Arc<JwtManager>, store: Store) -> Self {
        Self {
            jwt_manager,
            store,
            token_header: Arc::from(DEFAULT_TOKEN_HEADER),
            public_paths: Arc::new(HashSet::new()),
        }
    }

    /// Sets the header the token is read from.
    pub fn with_token_header(mut self, header: impl AsRef<str>) -> Self {
        self.token_header = Arc::from(header.as_ref());
        self
    }

    /// Adds public paths that don't require authentication.
    pub fn with_public_paths(mut self, paths: Vec<String>) -> Self {
        self.public_paths = Arc::new(paths.into_iter().collect());
        self
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthMiddleware {
            inner,
            jwt_manager: self.jwt_manager.clone(),
            store: self.store.clone(),
            token_header: self.token_header.clone(),
            public_paths: self.public_paths.clone(),
        }
    }
}

// =============================================================================
// AuthMiddleware
// =============================================================================

/// Middleware for token authentication.
#[derive(Clone)]
pub struct AuthMiddleware<S> {
    inner: S,
    jwt_manager: Arc<JwtManager>,
    store: Store,
    token_header: Arc<str>,
    public_paths: Arc<HashSet<String>>,
}

impl<S> AuthMiddleware<S> {
    /// Checks if a path is public.
    fn is_public_path(&self, path: &str) -> bool {
        if self.public_paths.contains(path) {
            return true;
        }

        self.public_paths.iter().any(|public_path| {
            public_path
                .strip_suffix('*')
                .is_some_and(|prefix| path.starts_with(prefix))
        })
    }
}

impl<S> Service<Request<Body>> for AuthMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let jwt_manager = self.jwt_manager.clone();
        let store = self.store.clone();
        let token_header = self.token_header.clone();
        let is_public = self.is_public_path(req.uri().path());
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let request_id = request_id(req.headers());
            let client_ip = client_ip(&req);

            let ctx = RequestContext::anonymous()
                .with_request_id(request_id)
                .with_client_ip(client_ip);

            if is_public {
                req.extensions_mut().insert(ctx);
                return inner.call(req).await;
            }

            match authenticate(&jwt_manager, &store, req.headers(), &token_header).await {
                Ok(user) => {
                    tracing::trace!(
                        user_id = %user.id,
                        request_id = %request_id,
                        "request authenticated"
                    );
                    let ctx = RequestContext {
                        identity: Some(user),
                        ..ctx
                    };
                    req.extensions_mut().insert(ctx);
                    inner.call(req).await
                }
                Err(e) => {
                    tracing::debug!(
                        reason = e.reason(),
                        request_id = %request_id,
                        path = %req.uri().path(),
                        "authentication failed"
                    );
                    Ok(ApiError::from(e).into_response())
                }
            }
        })
    }
}

// =============================================================================
// Authentication Pipeline
// =============================================================================

/// Runs extract, verify, expiry and identity resolution for one request.
pub async fn authenticate(
    jwt_manager: &JwtManager,
    store: &Store,
    headers: &HeaderMap,
    token_header: &str,
) -> AuthResult<User> {
    let token = extract_token(headers, token_header).ok_or(AuthError::MissingCredential)?;
    let claims = jwt_manager.validate(&token)?;

    match store.users.find_user_by_id(claims.id).await {
        Ok(user) => Ok(user),
        Err(e) if e.is_not_found() => Err(AuthError::UnknownIdentity),
        Err(e) => {
            tracing::warn!(error = %e, user_id = %claims.id, "identity lookup failed");
            Err(AuthError::UnknownIdentity)
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Reads the token from `token_header`, falling back to a bearer token.
pub fn extract_token(headers: &HeaderMap, token_header: &str) -> Option<String> {
    let direct = headers
        .get(token_header)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty());

    if let Some(token) = direct {
        return Some(token.to_string());
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// The caller's address: the first `X-Forwarded-For` hop, then `X-Real-IP`,
/// then the socket peer.
fn client_ip(req: &Request<Body>) -> Option<IpAddr> {
    let header_ip = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .and_then(|value| value.trim().parse().ok())
    };

    header_ip("x-forwarded-for")
        .or_else(|| header_ip("x-real-ip"))
        .or_else(|| {
            req.extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ci| ci.0.ip())
        })
}

fn request_id(headers: &HeaderMap) -> Uuid {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| Uuid::parse_str(value).ok())
        .unwrap_or_else(Uuid::now_v7)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::JwtConfig;
    use axum::http::{HeaderName, HeaderValue, StatusCode};
    use innkeep_core::{Page, Paged, StoreError, StoreResult, UserId, UserStore};
    use std::convert::Infallible;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::util::BoxCloneService;
    use tower::ServiceExt;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn jwt() -> Arc<JwtManager> {
        Arc::new(JwtManager::new(JwtConfig::new(SECRET)).unwrap())
    }

    fn user() -> User {
        User {
            id: UserId::new(),
            first_name: "Barbara".to_string(),
            last_name: "Liskov".to_string(),
            email: "barbara@example.com".to_string(),
            is_admin: false,
            password_hash: String::new(),
        }
    }

    fn echo_identity() -> BoxCloneService<Request<Body>, Response, Infallible> {
        BoxCloneService::new(tower::service_fn(|req: Request<Body>| async move {
            let body = req
                .extensions()
                .get::<RequestContext>()
                .and_then(|ctx| ctx.identity.as_ref())
                .map(|u| u.email.clone())
                .unwrap_or_else(|| "anonymous".to_string());
            Ok::<_, Infallible>(Response::new(Body::from(body)))
        }))
    }

    /// A user collection whose backend is down.
    #[derive(Default)]
    struct UnavailableUsers {
        lookups: AtomicUsize,
    }

    impl UnavailableUsers {
        fn down<T>(&self) -> StoreResult<T> {
            Err(StoreError::backend("connection refused"))
        }
    }

    #[async_trait::async_trait]
    impl UserStore for UnavailableUsers {
        async fn find_user_by_id(&self, _id: UserId) -> StoreResult<User> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.down()
        }

        async fn find_user_by_email(&self, _email: &str) -> StoreResult<User> {
            self.down()
        }

        async fn insert_user(&self, _user: User) -> StoreResult<User> {
            self.down()
        }

        async fn update_user(&self, _user: User) -> StoreResult<User> {
            self.down()
        }

        async fn delete_user(&self, _id: UserId) -> StoreResult<()> {
            self.down()
        }

        async fn list_users(&self, _page: Page) -> StoreResult<Paged<User>> {
            self.down()
        }
    }

    fn token_header() -> HeaderName {
        HeaderName::from_static("x-access-token")
    }

    fn request(path: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(path);
        if let Some(token) = token {
            builder = builder.header(DEFAULT_TOKEN_HEADER, token);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_extract_token() {
        let mut headers = HeaderMap::new();
        assert!(extract_token(&headers, DEFAULT_TOKEN_HEADER).is_none());

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(extract_token(&headers, DEFAULT_TOKEN_HEADER).is_none());

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer fallback"));
        assert_eq!(
            extract_token(&headers, DEFAULT_TOKEN_HEADER),
            Some("fallback".to_string())
        );

        headers.insert(token_header(), HeaderValue::from_static("primary"));
        assert_eq!(
            extract_token(&headers, DEFAULT_TOKEN_HEADER),
            Some("primary".to_string())
        );
    }

    #[test]
    fn test_client_ip_resolution() {
        let forwarded = Request::builder()
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .header("x-real-ip", "198.51.100.2")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_ip(&forwarded), Some("203.0.113.7".parse().unwrap()));

        let real = Request::builder()
            .header("x-real-ip", "198.51.100.2")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_ip(&real), Some("198.51.100.2".parse().unwrap()));

        let mut peer = Request::builder().body(Body::empty()).unwrap();
        peer.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 4000))));
        assert_eq!(client_ip(&peer), Some("127.0.0.1".parse().unwrap()));

        assert_eq!(client_ip(&request("/health", None)), None);
    }

    #[test]
    fn test_public_paths() {
        let layer = AuthLayer::new(jwt(), Store::in_memory())
            .with_public_paths(vec!["/health".to_string(), "/api/auth*".to_string()]);
        let middleware = layer.layer(echo_identity());

        assert!(middleware.is_public_path("/health"));
        assert!(middleware.is_public_path("/api/auth/register"));
        assert!(!middleware.is_public_path("/api/v1/me"));
    }

    #[tokio::test]
    async fn test_authenticate_pipeline() {
        let jwt = jwt();
        let store = Store::in_memory();
        let user = store.users.insert_user(user()).await.unwrap();
        let token = jwt.issue(&user).unwrap();

        let mut headers = HeaderMap::new();
        assert_eq!(
            authenticate(&jwt, &store, &headers, DEFAULT_TOKEN_HEADER).await,
            Err(AuthError::MissingCredential)
        );

        headers.insert(token_header(), HeaderValue::from_static("garbage"));
        assert_eq!(
            authenticate(&jwt, &store, &headers, DEFAULT_TOKEN_HEADER).await,
            Err(AuthError::InvalidCredential)
        );

        headers.insert(token_header(), token.parse().unwrap());
        let resolved = authenticate(&jwt, &store, &headers, DEFAULT_TOKEN_HEADER)
            .await
            .unwrap();
        assert_eq!(resolved.id, user.id);

        store.users.delete_user(user.id).await.unwrap();
        assert_eq!(
            authenticate(&jwt, &store, &headers, DEFAULT_TOKEN_HEADER).await,
            Err(AuthError::UnknownIdentity)
        );
    }

    #[tokio::test]
    async fn test_middleware_attaches_identity() {
        let jwt = jwt();
        let store = Store::in_memory();
        let user = store.users.insert_user(user()).await.unwrap();
        let token = jwt.issue(&user).unwrap();

        let service = AuthLayer::new(jwt, store).layer(echo_identity());

        let response = service
            .clone()
            .oneshot(request("/api/v1/me", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], user.email.as_bytes());

        let response = service
            .oneshot(request("/api/v1/me", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_middleware_generic_message() {
        let service = AuthLayer::new(jwt(), Store::in_memory()).layer(echo_identity());

        let response = service
            .oneshot(request("/api/v1/me", Some("not.a.token")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = axum::body::to_bytes(response.into_body(), 4096).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["message"], crate::auth::INVALID_CREDENTIALS);
    }

    #[tokio::test]
    async fn test_public_path_is_anonymous() {
        let service = AuthLayer::new(jwt(), Store::in_memory())
            .with_public_paths(vec!["/health".to_string()])
            .layer(echo_identity());

        let response = service.oneshot(request("/health", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"anonymous");
    }

    #[tokio::test]
    async fn test_store_failure_is_unauthorized_without_retry() {
        let jwt = jwt();
        let users = Arc::new(UnavailableUsers::default());
        let store = Store {
            users: users.clone(),
            ..Store::in_memory()
        };
        let token = jwt.issue(&user()).unwrap();

        let service = AuthLayer::new(jwt, store).layer(echo_identity());
        let response = service
            .oneshot(request("/api/v1/me", Some(&token)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = axum::body::to_bytes(response.into_body(), 4096).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["code"], "UNAUTHORIZED");
        assert_eq!(json["error"]["message"], crate::auth::INVALID_CREDENTIALS);
        assert_eq!(users.lookups.load(Ordering::SeqCst), 1);
    }
}
