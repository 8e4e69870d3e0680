// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication handlers.

use axum::{extract::State, response::IntoResponse, Json};
use serde::Deserialize;

use innkeep_core::{CreateUserParams, User};

use crate::auth::password::{
    hash_password_blocking, verify_decoy_blocking, verify_password_blocking,
};
use crate::auth::AuthError;
use crate::error::ApiResult;
use crate::extractors::{Ctx, ValidatedJson};
use crate::response::{AuthResponse, Created};
use crate::state::AppState;

// =============================================================================
// Login
// =============================================================================

/// Login request body.
#[derive(Deserialize)]
pub struct LoginRequest {
    /// Login email.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// POST /api/auth
///
/// Verifies email and password and returns the user with a fresh token.
/// Unknown emails and wrong passwords fail identically, and both pay for one
/// Argon2 verification.
pub async fn login(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = match state.store().users.find_user_by_email(&request.email).await {
        Ok(user) => user,
        Err(e) if e.is_not_found() => {
            verify_decoy_blocking(request.password).await;
            tracing::debug!(
                reason = "unknown_email",
                request_id = %ctx.request_id,
                client_ip = ?ctx.client_ip,
                "login rejected"
            );
            return Err(AuthError::BadCredentials.into());
        }
        Err(e) => return Err(e.into()),
    };

    let verified = verify_password_blocking(user.password_hash.clone(), request.password).await;
    if !verified {
        tracing::debug!(
            reason = "wrong_password",
            user_id = %user.id,
            request_id = %ctx.request_id,
            client_ip = ?ctx.client_ip,
            "login rejected"
        );
        return Err(AuthError::BadCredentials.into());
    }

    let token = state.jwt().issue(&user)?;
    tracing::info!(
        user_id = %user.id,
        request_id = %ctx.request_id,
        client_ip = ?ctx.client_ip,
        "user logged in"
    );

    Ok(Json(AuthResponse { user, token }))
}

// =============================================================================
// Register
// =============================================================================

/// POST /api/auth/register
///
/// Creates a regular user. Every invalid field is reported at once.
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(params): ValidatedJson<CreateUserParams>,
) -> ApiResult<impl IntoResponse> {
    params.validate()?;

    let hash = hash_password_blocking(params.password.clone()).await?;
    let user = state.store().users.insert_user(User::new(&params, hash)).await?;

    tracing::info!(user_id = %user.id, "user registered");
    Ok(Created(user))
}
