// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Harness
//!
//! `TestApp` wires an in-memory store, a token manager and the full router,
//! then drives requests through it with `tower::ServiceExt::oneshot`. No
//! socket is opened, so tests run in parallel without port juggling.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, HeaderName, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use innkeep_api::{
    auth::hash_password, ApiConfig, ApiServer, AppState, JwtConfig, JwtManager,
};
use innkeep_core::{Booking, Hotel, Room, Store, User};

use super::fixtures::{CatalogueFixtures, Stay, UserFixture, TEST_SECRET};
use super::init_test_logging;

/// Lowercase form of the default token header.
pub const TOKEN_HEADER: &str = "x-access-token";

/// Largest response body a test will read.
const MAX_BODY_BYTES: usize = 1024 * 1024;

// =============================================================================
// TestApp
// =============================================================================

/// An in-process application instance.
pub struct TestApp {
    state: AppState,
    router: Router,
}

impl TestApp {
    /// Builds an app with [`TEST_SECRET`] and an empty store.
    pub fn new() -> Self {
        Self::with_config(ApiConfig::default().with_jwt(JwtConfig::new(TEST_SECRET)))
    }

    /// Builds an app from a custom configuration.
    pub fn with_config(config: ApiConfig) -> Self {
        init_test_logging();

        let jwt = JwtManager::new(config.jwt.clone()).expect("test secret is valid");
        let state = AppState::builder()
            .config(config)
            .jwt_manager(Arc::new(jwt))
            .store(Store::in_memory())
            .build()
            .expect("test state builds");
        let router = ApiServer::new(state.clone()).router();

        Self { state, router }
    }

    /// The shared store.
    pub fn store(&self) -> &Store {
        self.state.store()
    }

    /// The token manager the router validates against.
    pub fn jwt(&self) -> &JwtManager {
        self.state.jwt()
    }

    // -------------------------------------------------------------------------
    // Seeding
    // -------------------------------------------------------------------------

    /// Inserts a user straight into the store, hashing the fixture password.
    pub async fn seed_user(&self, fixture: &UserFixture) -> User {
        let hash = hash_password(fixture.password).expect("hashing succeeds");
        let user = User::new(&fixture.params(), hash).with_admin(fixture.is_admin);
        self.store()
            .users
            .insert_user(user)
            .await
            .expect("user inserts")
    }

    /// Issues a token for `user`.
    pub fn token_for(&self, user: &User) -> String {
        self.jwt().issue(user).expect("token issues")
    }

    /// Seeds a user and returns it with a fresh token.
    pub async fn seed_with_token(&self, fixture: &UserFixture) -> (User, String) {
        let user = self.seed_user(fixture).await;
        let token = self.token_for(&user);
        (user, token)
    }

    /// Inserts the seaside hotel with one kingsize room.
    pub async fn seed_hotel_with_room(&self) -> (Hotel, Room) {
        let hotel = self
            .store()
            .hotels
            .insert_hotel(CatalogueFixtures::seaside_resort().into_hotel())
            .await
            .expect("hotel inserts");
        let room = self
            .store()
            .rooms
            .insert_room(CatalogueFixtures::kingsize_seaside().into_room(hotel.id))
            .await
            .expect("room inserts");
        (hotel, room)
    }

    /// Inserts a booking for `user` directly.
    pub async fn seed_booking(&self, user: &User, room: &Room, stay: Stay) -> Booking {
        self.store()
            .bookings
            .insert_booking(Booking::new(user.id, room.id, &stay.params()))
            .await
            .expect("booking inserts")
    }

    // -------------------------------------------------------------------------
    // Requests
    // -------------------------------------------------------------------------

    /// Sends a request through the router.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(HeaderName::from_static(TOKEN_HEADER), token);
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request builds");

        self.send(request).await
    }

    /// Sends a prepared request through the router.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), MAX_BODY_BYTES)
            .await
            .expect("body reads");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, headers, body }
    }

    /// GET `uri`.
    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::GET, uri, token, None).await
    }

    /// POST `body` to `uri`.
    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    /// PUT `body` to `uri`.
    pub async fn put(&self, uri: &str, token: Option<&str>, body: Option<Value>) -> TestResponse {
        self.request(Method::PUT, uri, token, body).await
    }

    /// DELETE `uri`.
    pub async fn delete(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::DELETE, uri, token, None).await
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TestResponse
// =============================================================================

/// A fully read response.
#[derive(Debug)]
pub struct TestResponse {
    /// Status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Parsed JSON body, `Null` when empty or not JSON.
    pub body: Value,
}

impl TestResponse {
    /// The `error.code` field of an error body.
    pub fn error_code(&self) -> Option<&str> {
        self.body["error"]["code"].as_str()
    }

    /// The `error.message` field of an error body.
    pub fn error_message(&self) -> Option<&str> {
        self.body["error"]["message"].as_str()
    }

    /// Asserts the status, printing the body on mismatch.
    #[track_caller]
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status, expected,
            "unexpected status, body: {}",
            self.body
        );
        self
    }

    /// Asserts a 401 with the generic message.
    #[track_caller]
    pub fn assert_unauthenticated(&self) {
        self.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(self.error_code(), Some("UNAUTHORIZED"));
        assert_eq!(self.error_message(), Some(innkeep_api::auth::INVALID_CREDENTIALS));
    }

    /// Asserts a 403.
    #[track_caller]
    pub fn assert_forbidden(&self) {
        self.assert_status(StatusCode::FORBIDDEN);
        assert_eq!(self.error_code(), Some("FORBIDDEN"));
    }
}
