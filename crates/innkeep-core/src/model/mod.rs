// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Domain records.
//!
//! - [`user`]: identities and the registration/update parameters
//! - [`hotel`]: hotels, rooms and their list filters
//! - [`booking`]: room bookings and availability rules

pub mod booking;
pub mod hotel;
pub mod user;

pub use booking::{BookRoomParams, Booking, BookingFilter};
pub use hotel::{Hotel, HotelFilter, NewHotel, NewRoom, Room, RoomFilter, RoomSize};
pub use user::{CreateUserParams, UpdateUserParams, User, is_valid_email};

use crate::types::UserId;

/// A record that belongs to exactly one identity.
///
/// Ownership guards compare the caller's id against [`Owned::owner_id`].
pub trait Owned {
    /// Returns the id of the owning identity.
    fn owner_id(&self) -> UserId;
}
