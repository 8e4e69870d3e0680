// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Booking handlers.

use axum::{extract::State, response::IntoResponse, Json};

use innkeep_core::{BookRoomParams, Booking, BookingFilter, BookingId, RoomId};

use crate::auth::{owner_or_admin, ownership_check};
use crate::error::ApiResult;
use crate::extractors::{Auth, IdPath, Pagination, ValidatedJson};
use crate::response::{ApiResponse, Created};
use crate::state::AppState;

/// POST /api/v1/rooms/{id}/book
///
/// The availability check and the insert happen atomically in the store;
/// an overlapping stay is rejected with 409.
pub async fn book_room(
    State(state): State<AppState>,
    Auth(user): Auth,
    IdPath(room_id): IdPath<RoomId>,
    ValidatedJson(params): ValidatedJson<BookRoomParams>,
) -> ApiResult<impl IntoResponse> {
    params.validate()?;

    let room = state.store().rooms.find_room(room_id).await?;
    let booking = state
        .store()
        .bookings
        .insert_booking(Booking::new(user.id, room.id, &params))
        .await?;

    tracing::info!(
        booking_id = %booking.id,
        user_id = %user.id,
        room_id = %room.id,
        "room booked"
    );
    Ok(Created(booking))
}

/// GET /api/v1/bookings
///
/// The caller's own bookings.
pub async fn list_my_bookings(
    State(state): State<AppState>,
    Auth(user): Auth,
    pagination: Pagination,
) -> ApiResult<impl IntoResponse> {
    let page = state
        .store()
        .bookings
        .list_bookings(BookingFilter::owned_by(user.id), pagination.to_page())
        .await?;
    Ok(ApiResponse::paged(page, &pagination))
}

/// GET /api/v1/bookings/{id}
///
/// Readable by the owner or an admin.
pub async fn get_booking(
    State(state): State<AppState>,
    Auth(user): Auth,
    IdPath(id): IdPath<BookingId>,
) -> ApiResult<impl IntoResponse> {
    let booking = state.store().bookings.find_booking(id).await?;
    owner_or_admin(&user, &booking).into_result()?;
    Ok(Json(booking))
}

/// PUT /api/v1/bookings/{id}/cancel
///
/// Owner only; admins get no override here. Canceling twice is a no-op.
pub async fn cancel_booking(
    State(state): State<AppState>,
    Auth(user): Auth,
    IdPath(id): IdPath<BookingId>,
) -> ApiResult<impl IntoResponse> {
    let booking = state.store().bookings.find_booking(id).await?;

    if let Err(e) = ownership_check(&user, &booking).into_result() {
        tracing::warn!(booking_id = %id, user_id = %user.id, "cancel denied");
        return Err(e.into());
    }

    let booking = state.store().bookings.cancel_booking(id).await?;
    tracing::info!(booking_id = %id, user_id = %user.id, "booking canceled");
    Ok(Json(booking))
}

/// GET /api/v1/admin/bookings
pub async fn list_all_bookings(
    State(state): State<AppState>,
    pagination: Pagination,
) -> ApiResult<impl IntoResponse> {
    let page = state
        .store()
        .bookings
        .list_bookings(BookingFilter::default(), pagination.to_page())
        .await?;
    Ok(ApiResponse::paged(page, &pagination))
}
