// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Hotel and room catalogue handlers.

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use innkeep_core::{HotelFilter, HotelId, NewHotel, NewRoom, RoomFilter, RoomSize};

use crate::error::{ApiError, ApiResult};
use crate::extractors::{IdPath, Pagination, ValidatedJson};
use crate::response::{ApiResponse, Created, DeletedResponse};
use crate::state::AppState;

// =============================================================================
// Query Filters
// =============================================================================

/// Filters accepted by `GET /api/v1/hotels`.
#[derive(Debug, Default, Deserialize)]
pub struct HotelQuery {
    /// Exact rating match.
    pub rating: Option<f64>,
}

impl From<HotelQuery> for HotelFilter {
    fn from(query: HotelQuery) -> Self {
        HotelFilter {
            rating: query.rating,
        }
    }
}

/// Filters accepted by `GET /api/v1/rooms`.
#[derive(Debug, Default, Deserialize)]
pub struct RoomQuery {
    /// Seaside flag.
    pub seaside: Option<bool>,
    /// Size category.
    pub size: Option<String>,
}

impl RoomQuery {
    fn into_filter(self) -> ApiResult<RoomFilter> {
        let size = self
            .size
            .map(|s| s.parse::<RoomSize>())
            .transpose()?;
        Ok(RoomFilter {
            hotel_id: None,
            seaside: self.seaside,
            size,
        })
    }
}

fn bad_query(e: impl std::fmt::Display) -> ApiError {
    ApiError::bad_request(format!("Invalid query: {}", e))
}

// =============================================================================
// Hotels
// =============================================================================

/// GET /api/v1/hotels
pub async fn list_hotels(
    State(state): State<AppState>,
    pagination: Pagination,
    query: Result<Query<HotelQuery>, axum::extract::rejection::QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(query) = query.map_err(bad_query)?;
    let page = state
        .store()
        .hotels
        .list_hotels(query.into(), pagination.to_page())
        .await?;
    Ok(ApiResponse::paged(page, &pagination))
}

/// GET /api/v1/hotels/{id}
pub async fn get_hotel(
    State(state): State<AppState>,
    IdPath(id): IdPath<HotelId>,
) -> ApiResult<impl IntoResponse> {
    let hotel = state.store().hotels.find_hotel(id).await?;
    Ok(Json(hotel))
}

/// GET /api/v1/hotels/{id}/rooms
pub async fn list_hotel_rooms(
    State(state): State<AppState>,
    IdPath(id): IdPath<HotelId>,
    pagination: Pagination,
) -> ApiResult<impl IntoResponse> {
    // 404 for an unknown hotel rather than an empty list.
    state.store().hotels.find_hotel(id).await?;

    let filter = RoomFilter {
        hotel_id: Some(id),
        ..RoomFilter::default()
    };
    let page = state
        .store()
        .rooms
        .list_rooms(filter, pagination.to_page())
        .await?;
    Ok(ApiResponse::paged(page, &pagination))
}

/// POST /api/v1/admin/hotels
pub async fn create_hotel(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<NewHotel>,
) -> ApiResult<impl IntoResponse> {
    input.validate()?;
    let hotel = state.store().hotels.insert_hotel(input.into_hotel()).await?;
    tracing::info!(hotel_id = %hotel.id, "hotel created");
    Ok(Created(hotel))
}

/// DELETE /api/v1/admin/hotels/{id}
///
/// Removes the hotel together with its rooms.
pub async fn delete_hotel(
    State(state): State<AppState>,
    IdPath(id): IdPath<HotelId>,
) -> ApiResult<impl IntoResponse> {
    state.store().hotels.delete_hotel(id).await?;
    tracing::info!(hotel_id = %id, "hotel deleted");
    Ok(Json(DeletedResponse::new(id)))
}

// =============================================================================
// Rooms
// =============================================================================

/// GET /api/v1/rooms
pub async fn list_rooms(
    State(state): State<AppState>,
    pagination: Pagination,
    query: Result<Query<RoomQuery>, axum::extract::rejection::QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(query) = query.map_err(bad_query)?;
    let page = state
        .store()
        .rooms
        .list_rooms(query.into_filter()?, pagination.to_page())
        .await?;
    Ok(ApiResponse::paged(page, &pagination))
}

/// POST /api/v1/admin/hotels/{id}/rooms
pub async fn create_room(
    State(state): State<AppState>,
    IdPath(hotel_id): IdPath<HotelId>,
    ValidatedJson(input): ValidatedJson<NewRoom>,
) -> ApiResult<impl IntoResponse> {
    input.validate()?;
    let room = state.store().rooms.insert_room(input.into_room(hotel_id)).await?;
    tracing::info!(room_id = %room.id, hotel_id = %hotel_id, "room created");
    Ok(Created(room))
}
