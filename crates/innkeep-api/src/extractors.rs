// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Custom extractors for API handlers.

use std::str::FromStr;

use axum::{
    extract::{FromRequestParts, Path, Query},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use innkeep_core::{CoreError, Page, User};

use crate::auth::{AuthError, RequestContext};
use crate::error::ApiError;

/// Largest accepted page size.
pub const MAX_PER_PAGE: u32 = 100;

/// Page size used when the query omits one.
pub const DEFAULT_PER_PAGE: u32 = 20;

// =============================================================================
// Auth Extractor
// =============================================================================

/// Extractor for the authenticated user.
///
/// Reads the identity the auth middleware attached to the [`RequestContext`].
/// Rejects with 401 when no identity is present.
///
/// # Example
///
/// ```rust,ignore
/// async fn me(Auth(user): Auth) -> Json<User> {
///     Json(user)
/// }
/// ```
pub struct Auth(pub User);

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ctx = parts
            .extensions
            .get::<RequestContext>()
            .ok_or(AuthError::MissingCredential)?;
        Ok(Auth(ctx.require_identity()?.clone()))
    }
}

// =============================================================================
// Context Extractor
// =============================================================================

/// Extractor for the full request context.
///
/// Never rejects; requests that bypassed the middleware get an anonymous
/// context.
pub struct Ctx(pub RequestContext);

impl<S> FromRequestParts<S> for Ctx
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ctx = parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .unwrap_or_default();
        Ok(Ctx(ctx))
    }
}

// =============================================================================
// Validated JSON Extractor
// =============================================================================

/// Extractor for JSON payloads.
///
/// Malformed bodies are rejected with 400 and the deserializer's message.
pub struct ValidatedJson<T>(pub T);

impl<S, T> axum::extract::FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(
        req: axum::http::Request<axum::body::Body>,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid JSON: {}", e)))?;

        Ok(ValidatedJson(value))
    }
}

// =============================================================================
// Pagination Extractor
// =============================================================================

/// Query parameters for pagination.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationParams {
    /// Page number (1-indexed).
    #[serde(default = "default_page")]
    pub page: u32,
    /// Items per page.
    #[serde(default = "default_per_page", alias = "per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}

impl PaginationParams {
    /// Validates the pagination parameters.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.page == 0 {
            return Err(ApiError::validation("page must be greater than 0"));
        }
        if self.per_page == 0 || self.per_page > MAX_PER_PAGE {
            return Err(ApiError::validation(format!(
                "perPage must be between 1 and {}",
                MAX_PER_PAGE
            )));
        }
        Ok(())
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

/// Validated pagination for list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Page number (1-indexed).
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
}

impl Pagination {
    /// The store window for this page.
    pub fn to_page(&self) -> Page {
        Page::new(self.page, self.per_page)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        PaginationParams::default().into()
    }
}

impl From<PaginationParams> for Pagination {
    fn from(params: PaginationParams) -> Self {
        Self {
            page: params.page.max(1),
            per_page: params.per_page.clamp(1, MAX_PER_PAGE),
        }
    }
}

impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<PaginationParams>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid pagination parameters: {}", e)))?;

        params.validate()?;
        Ok(params.into())
    }
}

// =============================================================================
// Id Path Extractor
// =============================================================================

/// Extractor for a typed record id in the path.
///
/// Malformed ids are rejected with 400.
pub struct IdPath<T>(pub T);

impl<S, T> FromRequestParts<S> for IdPath<T>
where
    S: Send + Sync,
    T: FromStr<Err = CoreError> + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid path: {}", e)))?;

        let id = raw.parse::<T>()?;
        Ok(IdPath(id))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use innkeep_core::{BookingId, UserId};

    fn parts(uri: &str) -> Parts {
        Request::builder()
            .uri(uri)
            .body(())
            .unwrap()
            .into_parts()
            .0
    }

    #[test]
    fn test_pagination_validation() {
        let valid = PaginationParams {
            page: 1,
            per_page: 20,
        };
        assert!(valid.validate().is_ok());

        let invalid_page = PaginationParams {
            page: 0,
            per_page: 20,
        };
        assert!(invalid_page.validate().is_err());

        let invalid_per_page = PaginationParams {
            page: 1,
            per_page: 200,
        };
        assert!(invalid_per_page.validate().is_err());
    }

    #[test]
    fn test_pagination_to_page() {
        let pagination = Pagination {
            page: 3,
            per_page: 10,
        };
        let page = pagination.to_page();
        assert_eq!(page.offset, 20);
        assert_eq!(page.limit, 10);
    }

    #[tokio::test]
    async fn test_pagination_from_query() {
        let mut p = parts("/api/v1/hotels?page=2&perPage=5&rating=4");
        let pagination = Pagination::from_request_parts(&mut p, &()).await.unwrap();
        assert_eq!(pagination, Pagination { page: 2, per_page: 5 });

        let mut p = parts("/api/v1/hotels");
        let pagination = Pagination::from_request_parts(&mut p, &()).await.unwrap();
        assert_eq!(pagination, Pagination::default());

        let mut p = parts("/api/v1/hotels?page=0");
        assert!(Pagination::from_request_parts(&mut p, &()).await.is_err());
    }

    #[tokio::test]
    async fn test_auth_requires_identity() {
        let mut p = parts("/api/v1/me");
        let err = match Auth::from_request_parts(&mut p, &()).await {
            Ok(_) => panic!("anonymous request accepted"),
            Err(e) => e,
        };
        assert_eq!(err.status_code(), axum::http::StatusCode::UNAUTHORIZED);

        let user = User {
            id: UserId::new(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            is_admin: false,
            password_hash: String::new(),
        };
        let mut p = parts("/api/v1/me");
        p.extensions.insert(RequestContext::authenticated(user.clone()));
        let Auth(resolved) = Auth::from_request_parts(&mut p, &()).await.unwrap();
        assert_eq!(resolved.id, user.id);
    }

    #[tokio::test]
    async fn test_ctx_reads_middleware_context() {
        let request_id = uuid::Uuid::now_v7();
        let mut p = parts("/api/auth");
        p.extensions.insert(
            RequestContext::anonymous()
                .with_request_id(request_id)
                .with_client_ip(Some("203.0.113.7".parse().unwrap())),
        );

        let Ctx(ctx) = Ctx::from_request_parts(&mut p, &()).await.unwrap();
        assert_eq!(ctx.request_id, request_id);
        assert_eq!(ctx.client_ip.unwrap().to_string(), "203.0.113.7");

        let mut bare = parts("/api/auth");
        let Ctx(ctx) = Ctx::from_request_parts(&mut bare, &()).await.unwrap();
        assert!(ctx.identity.is_none());
        assert!(ctx.client_ip.is_none());
    }

    #[test]
    fn test_id_parse_error_maps_to_bad_request() {
        let err: ApiError = "nope".parse::<BookingId>().unwrap_err().into();
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }
}
