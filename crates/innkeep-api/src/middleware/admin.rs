// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Admin role gate for whole route groups.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
};
use tower::{Layer, Service};

use crate::auth::{role_check, AuthError, RequestContext};
use crate::error::ApiError;

// =============================================================================
// RequireAdminLayer
// =============================================================================

/// Layer that applies the role check to every request it wraps.
///
/// Must sit inside the auth middleware so the identity is already resolved.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequireAdminLayer;

impl RequireAdminLayer {
    /// Creates the layer.
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for RequireAdminLayer {
    type Service = RequireAdmin<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequireAdmin { inner }
    }
}

// =============================================================================
// RequireAdmin
// =============================================================================

/// Middleware produced by [`RequireAdminLayer`].
#[derive(Debug, Clone)]
pub struct RequireAdmin<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for RequireAdmin<S>
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

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let identity = req
                .extensions()
                .get::<RequestContext>()
                .and_then(|ctx| ctx.identity.as_ref());

            let Some(user) = identity else {
                tracing::warn!("admin route reached without identity");
                return Ok(ApiError::from(AuthError::MissingCredential).into_response());
            };

            if let Err(e) = role_check(user).into_result() {
                tracing::warn!(user_id = %user.id, path = %req.uri().path(), "admin access denied");
                return Ok(ApiError::from(e).into_response());
            }

            inner.call(req).await
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
