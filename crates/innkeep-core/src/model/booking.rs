// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Room bookings.
//!
//! A booking occupies its room over the half-open interval
//! `[from_date, till_date)`. Canceled bookings never block a room.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::model::Owned;
use crate::types::{BookingId, RoomId, UserId};

// =============================================================================
// Booking
// =============================================================================

/// A reservation of one room by one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    /// Unique identifier.
    pub id: BookingId,
    /// The user who owns this booking.
    pub user_id: UserId,
    /// The booked room.
    pub room_id: RoomId,
    /// Number of guests.
    pub num_persons: i32,
    /// Start of the stay (inclusive).
    pub from_date: DateTime<Utc>,
    /// End of the stay (exclusive).
    pub till_date: DateTime<Utc>,
    /// Whether the booking was canceled.
    #[serde(default)]
    pub canceled: bool,
}

impl Booking {
    /// Creates a booking of `room_id` for `user_id`.
    pub fn new(user_id: UserId, room_id: RoomId, params: &BookRoomParams) -> Self {
        Self {
            id: BookingId::new(),
            user_id,
            room_id,
            num_persons: params.num_persons,
            from_date: params.from_date,
            till_date: params.till_date,
            canceled: false,
        }
    }

    /// Returns `true` if this booking blocks `room_id` somewhere in `[from, till)`.
    pub fn overlaps(&self, room_id: RoomId, from: DateTime<Utc>, till: DateTime<Utc>) -> bool {
        !self.canceled && self.room_id == room_id && self.from_date < till && from < self.till_date
    }

    /// Returns `true` if this booking blocks the same room as `other`.
    pub fn conflicts_with(&self, other: &Booking) -> bool {
        self.id != other.id && self.overlaps(other.room_id, other.from_date, other.till_date)
    }
}

impl Owned for Booking {
    fn owner_id(&self) -> UserId {
        self.user_id
    }
}

// =============================================================================
// BookRoomParams
// =============================================================================

/// Booking request body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRoomParams {
    /// Start of the stay.
    pub from_date: DateTime<Utc>,
    /// End of the stay.
    pub till_date: DateTime<Utc>,
    /// Number of guests.
    pub num_persons: i32,
}

impl BookRoomParams {
    /// Validates the request against the current time.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.validate_at(Utc::now())
    }

    /// Validates the request against `now`.
    pub fn validate_at(&self, now: DateTime<Utc>) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();

        if self.from_date <= now {
            errors.add("fromDate", "fromDate must be in the future");
        }
        if self.till_date <= now {
            errors.add("tillDate", "tillDate must be in the future");
        }
        if self.till_date <= self.from_date {
            errors.add("tillDate", "tillDate must be after fromDate");
        }
        if self.num_persons <= 0 {
            errors.add("numPersons", "numPersons must be greater than zero");
        }

        errors.into_result(())
    }
}

/// Booking list filter.
#[derive(Debug, Clone, Copy, Default)]
pub struct BookingFilter {
    /// Only bookings owned by this user.
    pub user_id: Option<UserId>,
    /// Only bookings of this room.
    pub room_id: Option<RoomId>,
}

impl BookingFilter {
    /// Filter for the bookings owned by `user_id`.
    pub fn owned_by(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
            room_id: None,
        }
    }

    /// Returns `true` if `booking` passes the filter.
    pub fn matches(&self, booking: &Booking) -> bool {
        self.user_id.is_none_or(|u| booking.user_id == u)
            && self.room_id.is_none_or(|r| booking.room_id == r)
    }
}

// =============================================================================
// Tests
// =============================================================================
