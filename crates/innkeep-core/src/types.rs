// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Core identifier types.
//!
//! Every record in the store is keyed by a UUIDv7 newtype. UUIDv7 values are
//! time-ordered, so ordered maps keyed by these ids iterate in insertion
//! order.
//!
//! # Examples
//!
//! ```
//! use innkeep_core::types::UserId;
//!
//! let id = UserId::new();
//! let parsed: UserId = id.to_string().parse().unwrap();
//! assert_eq!(id, parsed);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generates a fresh, time-ordered identifier.
            #[inline]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Wraps an existing UUID.
            #[inline]
            pub fn from_uuid(id: Uuid) -> Self {
                Self(id)
            }

            /// Returns the underlying UUID.
            #[inline]
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Parses an identifier from its string form.
            pub fn parse(value: &str) -> Result<Self, CoreError> {
                Uuid::parse_str(value.trim())
                    .map(Self)
                    .map_err(|_| CoreError::invalid_id($kind, value))
            }

            /// Returns the kind of record this identifier refers to.
            pub const fn kind() -> &'static str {
                $kind
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }
    };
}

define_id!(
    /// Identifier of a user (an authenticated identity).
    UserId,
    "user"
);

define_id!(
    /// Identifier of a hotel.
    HotelId,
    "hotel"
);

define_id!(
    /// Identifier of a room.
    RoomId,
    "room"
);

define_id!(
    /// Identifier of a booking.
    BookingId,
    "booking"
);

// =============================================================================
// Tests
// =============================================================================
