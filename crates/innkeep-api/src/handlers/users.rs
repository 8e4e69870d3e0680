// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! User profile handlers.

use axum::{extract::State, response::IntoResponse, Json};

use innkeep_core::{UpdateUserParams, UserId};

use crate::auth::{owner_or_admin, ownership_check};
use crate::error::ApiResult;
use crate::extractors::{Auth, IdPath, Pagination, ValidatedJson};
use crate::response::{ApiResponse, DeletedResponse};
use crate::state::AppState;

/// GET /api/v1/me
pub async fn me(Auth(user): Auth) -> impl IntoResponse {
    Json(user)
}

/// GET /api/v1/user/{id}
///
/// Readable by the user themself or by an admin. Other callers get 403
/// whether or not the id exists.
pub async fn get_user(
    State(state): State<AppState>,
    Auth(caller): Auth,
    IdPath(id): IdPath<UserId>,
) -> ApiResult<impl IntoResponse> {
    owner_or_admin(&caller, &id).into_result()?;
    let user = state.store().users.find_user_by_id(id).await?;
    Ok(Json(user))
}

/// PUT /api/v1/user/{id}
///
/// Owner only. Names of three or more characters are applied; shorter
/// values are ignored.
pub async fn update_user(
    State(state): State<AppState>,
    Auth(caller): Auth,
    IdPath(id): IdPath<UserId>,
    ValidatedJson(params): ValidatedJson<UpdateUserParams>,
) -> ApiResult<impl IntoResponse> {
    ownership_check(&caller, &id).into_result()?;
    let mut user = state.store().users.find_user_by_id(id).await?;

    if params.apply(&mut user) {
        user = state.store().users.update_user(user).await?;
        tracing::info!(user_id = %user.id, "profile updated");
    }

    Ok(Json(user))
}

/// DELETE /api/v1/user/{id}
///
/// Owner, or an admin.
pub async fn delete_user(
    State(state): State<AppState>,
    Auth(caller): Auth,
    IdPath(id): IdPath<UserId>,
) -> ApiResult<impl IntoResponse> {
    owner_or_admin(&caller, &id).into_result()?;
    state.store().users.delete_user(id).await?;
    tracing::info!(user_id = %id, deleted_by = %caller.id, "user deleted");

    Ok(Json(DeletedResponse::new(id)))
}

/// GET /api/v1/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    pagination: Pagination,
) -> ApiResult<impl IntoResponse> {
    let page = state.store().users.list_users(pagination.to_page()).await?;
    Ok(ApiResponse::paged(page, &pagination))
}
