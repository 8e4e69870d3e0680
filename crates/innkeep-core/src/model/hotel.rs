// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Hotels and rooms.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::types::{HotelId, RoomId};

/// Highest allowed hotel rating.
pub const MAX_RATING: f64 = 5.0;

// =============================================================================
// Hotel
// =============================================================================

/// A hotel and the ids of its rooms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    /// Unique identifier.
    pub id: HotelId,
    /// Display name.
    pub name: String,
    /// Free-form location.
    pub location: String,
    /// Rooms belonging to this hotel, in insertion order.
    #[serde(default)]
    pub rooms: Vec<RoomId>,
    /// Rating between 0.0 and 5.0.
    pub rating: f64,
}

/// Input for creating a hotel.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHotel {
    /// Display name.
    pub name: String,
    /// Free-form location.
    pub location: String,
    /// Rating between 0.0 and 5.0.
    #[serde(default)]
    pub rating: f64,
}

impl NewHotel {
    /// Validates the input.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();

        if self.name.trim().is_empty() {
            errors.add("name", "name must not be empty");
        }
        if self.location.trim().is_empty() {
            errors.add("location", "location must not be empty");
        }
        if !(0.0..=MAX_RATING).contains(&self.rating) {
            errors.add("rating", format!("rating must be between 0 and {}", MAX_RATING));
        }

        errors.into_result(())
    }

    /// Builds the hotel record with a fresh id and no rooms.
    pub fn into_hotel(self) -> Hotel {
        Hotel {
            id: HotelId::new(),
            name: self.name,
            location: self.location,
            rooms: Vec::new(),
            rating: self.rating,
        }
    }
}

/// Hotel list filter.
#[derive(Debug, Clone, Copy, Default)]
pub struct HotelFilter {
    /// Only hotels with exactly this rating.
    pub rating: Option<f64>,
}

impl HotelFilter {
    /// Returns `true` if `hotel` passes the filter.
    pub fn matches(&self, hotel: &Hotel) -> bool {
        self.rating.is_none_or(|r| hotel.rating == r)
    }
}

// =============================================================================
// Room
// =============================================================================

/// Room size category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomSize {
    /// Single occupancy.
    Small,
    /// Standard double.
    Normal,
    /// King-size bed.
    Kingsize,
}

impl RoomSize {
    /// Returns the wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomSize::Small => "small",
            RoomSize::Normal => "normal",
            RoomSize::Kingsize => "kingsize",
        }
    }
}

impl fmt::Display for RoomSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoomSize {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "small" => Ok(RoomSize::Small),
            "normal" => Ok(RoomSize::Normal),
            "kingsize" => Ok(RoomSize::Kingsize),
            _ => Err(ValidationError::single(
                "size",
                "size must be one of small, normal, kingsize",
            )),
        }
    }
}

/// A bookable room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    /// Unique identifier.
    pub id: RoomId,
    /// Size category.
    pub size: RoomSize,
    /// Whether the room faces the sea.
    pub seaside: bool,
    /// Price per night.
    pub price: f64,
    /// Owning hotel.
    pub hotel_id: HotelId,
}

/// Input for adding a room to a hotel.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRoom {
    /// Size category.
    pub size: RoomSize,
    /// Whether the room faces the sea.
    #[serde(default)]
    pub seaside: bool,
    /// Price per night.
    pub price: f64,
}

impl NewRoom {
    /// Validates the input.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.price.is_finite() && self.price >= 0.0 {
            Ok(())
        } else {
            Err(ValidationError::single("price", "price must be a non-negative number"))
        }
    }

    /// Builds the room record for `hotel_id`.
    pub fn into_room(self, hotel_id: HotelId) -> Room {
        Room {
            id: RoomId::new(),
            size: self.size,
            seaside: self.seaside,
            price: self.price,
            hotel_id,
        }
    }
}

/// Room list filter.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoomFilter {
    /// Only rooms of this hotel.
    pub hotel_id: Option<HotelId>,
    /// Only rooms with this seaside flag.
    pub seaside: Option<bool>,
    /// Only rooms of this size.
    pub size: Option<RoomSize>,
}

impl RoomFilter {
    /// Returns `true` if `room` passes the filter.
    pub fn matches(&self, room: &Room) -> bool {
        self.hotel_id.is_none_or(|h| room.hotel_id == h)
            && self.seaside.is_none_or(|s| room.seaside == s)
            && self.size.is_none_or(|s| room.size == s)
    }
}

// =============================================================================
// Tests
// =============================================================================
