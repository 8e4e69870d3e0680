// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API handlers for all endpoints.
//!
//! - [`health`]: liveness and readiness
//! - [`auth`]: login and registration
//! - [`users`]: profile read, update, delete
//! - [`hotels`]: hotel and room catalogue, admin catalogue writes
//! - [`bookings`]: booking, listing, cancellation

pub mod auth;
pub mod bookings;
pub mod health;
pub mod hotels;
pub mod users;

pub use auth::{login, register, LoginRequest};
pub use bookings::{book_room, cancel_booking, get_booking, list_all_bookings, list_my_bookings};
pub use health::{health, ready};
pub use hotels::{
    create_hotel, create_room, delete_hotel, get_hotel, list_hotel_rooms, list_hotels, list_rooms,
    HotelQuery, RoomQuery,
};
pub use users::{delete_user, get_user, list_users, me, update_user};
