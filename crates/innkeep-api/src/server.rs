// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API server implementation.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{HeaderName, HeaderValue, Method, StatusCode},
    routing::{delete, get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

use innkeep_core::Store;

use crate::auth::JwtManager;
use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use crate::handlers;
use crate::middleware::{AuthLayer, RequireAdminLayer, REQUEST_ID_HEADER};
use crate::state::AppState;

// =============================================================================
// ApiServer
// =============================================================================

/// The API server.
pub struct ApiServer {
    state: AppState,
    config: Arc<ApiConfig>,
}

impl ApiServer {
    /// Creates a new API server with the given state.
    pub fn new(state: AppState) -> Self {
        let config = state.config.clone();
        Self { state, config }
    }

    /// Returns the shared state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Creates the router with all routes and middleware.
    pub fn router(&self) -> Router {
        let cors = create_cors_layer(&self.config);
        let auth = AuthLayer::new(self.state.jwt_manager.clone(), self.state.store.clone())
            .with_token_header(&self.config.token_header)
            .with_public_paths(self.config.public_paths.clone());
        let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

        let middleware_stack = ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::new(request_id))
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                self.config.request_timeout,
            ))
            .layer(cors)
            .layer(auth);

        Router::new()
            // Health endpoints (public)
            .route("/health", get(handlers::health))
            .route("/ready", get(handlers::ready))
            // Auth endpoints (public)
            .route("/api/auth", post(handlers::login))
            .route("/api/auth/register", post(handlers::register))
            // Authenticated API
            .nest("/api/v1", api_routes())
            .layer(middleware_stack)
            .with_state(self.state.clone())
    }

    /// Runs the server until `shutdown_signal` resolves.
    pub async fn run_with_shutdown(
        self,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> ApiResult<()> {
        let addr = self.config.socket_addr();
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ApiError::internal(format!("Failed to bind {}: {}", addr, e)))?;

        self.serve(listener, shutdown_signal).await
    }

    /// Serves on an already bound listener until `shutdown_signal` resolves.
    pub async fn serve(
        self,
        listener: tokio::net::TcpListener,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> ApiResult<()> {
        let router = self.router();
        let local = listener.local_addr().ok();

        info!(addr = ?local, "Starting API server");

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal)
        .await
        .map_err(|e| ApiError::internal(format!("Server error: {}", e)))?;

        info!("API server shutdown complete");

        Ok(())
    }

    /// Returns the configured server address.
    pub fn addr(&self) -> SocketAddr {
        self.config.socket_addr()
    }
}

/// Routes under `/api/v1`. All of them need a token.
fn api_routes() -> Router<AppState> {
    let admin = Router::new()
        .route("/users", get(handlers::list_users))
        .route("/bookings", get(handlers::list_all_bookings))
        .route("/hotels", post(handlers::create_hotel))
        .route("/hotels/{id}", delete(handlers::delete_hotel))
        .route("/hotels/{id}/rooms", post(handlers::create_room))
        .route_layer(RequireAdminLayer::new());

    Router::new()
        .route("/me", get(handlers::me))
        .route(
            "/user/{id}",
            get(handlers::get_user)
                .put(handlers::update_user)
                .delete(handlers::delete_user),
        )
        .route("/hotels", get(handlers::list_hotels))
        .route("/hotels/{id}", get(handlers::get_hotel))
        .route("/hotels/{id}/rooms", get(handlers::list_hotel_rooms))
        .route("/rooms", get(handlers::list_rooms))
        .route("/rooms/{id}/book", post(handlers::book_room))
        .route("/bookings", get(handlers::list_my_bookings))
        .route("/bookings/{id}", get(handlers::get_booking))
        .route("/bookings/{id}/cancel", put(handlers::cancel_booking))
        .nest("/admin", admin)
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Creates the CORS layer from configuration.
fn create_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = &config.cors;
    let wildcard_origin = cors.allowed_origins.iter().any(|o| o == "*");
    let wildcard_headers = cors.allowed_headers.iter().any(|h| h == "*");

    let mut layer = CorsLayer::new().max_age(Duration::from_secs(cors.max_age));

    if wildcard_origin {
        layer = layer.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = cors
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        layer = layer.allow_origin(AllowOrigin::list(origins));
    }

    let methods: Vec<Method> = cors
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();
    layer = layer.allow_methods(methods);

    if wildcard_headers {
        layer = layer.allow_headers(Any);
    } else {
        let headers: Vec<HeaderName> = cors
            .allowed_headers
            .iter()
            .filter_map(|h| h.parse().ok())
            .collect();
        layer = layer.allow_headers(headers);
    }

    // Credentials cannot be combined with wildcards.
    if cors.allow_credentials && !wildcard_origin && !wildcard_headers {
        layer = layer.allow_credentials(true);
    }

    layer
}

// =============================================================================
// Server Builder
// =============================================================================

/// Builder for creating the API server.
#[derive(Default)]
pub struct ApiServerBuilder {
    state_builder: crate::state::AppStateBuilder,
}

impl ApiServerBuilder {
    /// Creates a new server builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration.
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.state_builder = self.state_builder.config(config);
        self
    }

    /// Sets the JWT manager.
    pub fn jwt_manager(mut self, manager: Arc<JwtManager>) -> Self {
        self.state_builder = self.state_builder.jwt_manager(manager);
        self
    }

    /// Sets the record store.
    pub fn store(mut self, store: Store) -> Self {
        self.state_builder = self.state_builder.store(store);
        self
    }

    /// Builds the server.
    pub fn build(self) -> ApiResult<ApiServer> {
        let state = self.state_builder.build()?;
        Ok(ApiServer::new(state))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::JwtConfig;
    use crate::config::CorsConfig;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn test_config() -> ApiConfig {
        ApiConfig::default().with_jwt(JwtConfig::new("test-secret-key-that-is-long-enough"))
    }

    #[test]
    fn test_server_builder() {
        let server = ApiServerBuilder::new()
            .config(test_config().with_port(8081))
            .build()
            .unwrap();

        assert_eq!(server.addr().port(), 8081);
    }

    #[test]
    fn test_server_builder_rejects_missing_secret() {
        assert!(ApiServerBuilder::new().build().is_err());
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let server = ApiServerBuilder::new().config(test_config()).build().unwrap();

        let response = server
            .router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    }

    #[tokio::test]
    async fn test_api_requires_token() {
        let server = ApiServerBuilder::new().config(test_config()).build().unwrap();

        let response = server
            .router()
            .oneshot(Request::get("/api/v1/hotels").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_cors_layer_with_explicit_origins() {
        let config = test_config().with_cors(CorsConfig {
            allowed_origins: vec!["https://innkeep.example".to_string()],
            allow_credentials: true,
            ..CorsConfig::default()
        });
        let _layer = create_cors_layer(&config);
    }
}
