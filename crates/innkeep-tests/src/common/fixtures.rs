// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Fixtures
//!
//! Fixed test data. Every call returns fresh values, so fixtures can be
//! shared between tests running in parallel.

use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};

use innkeep_core::{BookRoomParams, CreateUserParams, NewHotel, NewRoom, RoomSize};

/// Signing secret used by every harness instance.
pub const TEST_SECRET: &str = "integration-test-secret-that-is-long-enough";

/// A different secret, for cross-key checks.
pub const OTHER_SECRET: &str = "another-integration-secret-of-enough-length";

// =============================================================================
// User Fixtures
// =============================================================================

/// Registration data plus the role a seeded user should carry.
#[derive(Debug, Clone)]
pub struct UserFixture {
    /// Given name.
    pub first_name: &'static str,
    /// Family name.
    pub last_name: &'static str,
    /// Login email.
    pub email: &'static str,
    /// Plaintext password.
    pub password: &'static str,
    /// Admin role.
    pub is_admin: bool,
}

impl UserFixture {
    /// Registration parameters for this user.
    pub fn params(&self) -> CreateUserParams {
        CreateUserParams {
            first_name: self.first_name.to_string(),
            last_name: self.last_name.to_string(),
            email: self.email.to_string(),
            password: self.password.to_string(),
        }
    }

    /// `POST /api/auth/register` body.
    pub fn register_body(&self) -> Value {
        json!({
            "firstName": self.first_name,
            "lastName": self.last_name,
            "email": self.email,
            "password": self.password,
        })
    }

    /// `POST /api/auth` body with the correct password.
    pub fn login_body(&self) -> Value {
        json!({ "email": self.email, "password": self.password })
    }
}

/// Fixture providing standard users.
pub struct UserFixtures;

impl UserFixtures {
    /// A regular guest.
    pub fn alice() -> UserFixture {
        UserFixture {
            first_name: "Alice",
            last_name: "Liddell",
            email: "alice@innkeep.test",
            password: "wonderland1",
            is_admin: false,
        }
    }

    /// Another regular guest.
    pub fn bob() -> UserFixture {
        UserFixture {
            first_name: "Bob",
            last_name: "Builder",
            email: "bob@innkeep.test",
            password: "canwefixit",
            is_admin: false,
        }
    }

    /// An administrator.
    pub fn admin() -> UserFixture {
        UserFixture {
            first_name: "Ada",
            last_name: "Admin",
            email: "admin@innkeep.test",
            password: "supersecret",
            is_admin: true,
        }
    }
}

// =============================================================================
// Catalogue Fixtures
// =============================================================================

/// Fixture providing hotels and rooms.
pub struct CatalogueFixtures;

impl CatalogueFixtures {
    /// A four-star seaside hotel.
    pub fn seaside_resort() -> NewHotel {
        NewHotel {
            name: "Seaside Resort".to_string(),
            location: "Lisbon".to_string(),
            rating: 4.0,
        }
    }

    /// A three-star city hotel.
    pub fn city_inn() -> NewHotel {
        NewHotel {
            name: "City Inn".to_string(),
            location: "Berlin".to_string(),
            rating: 3.0,
        }
    }

    /// A kingsize room with a sea view.
    pub fn kingsize_seaside() -> NewRoom {
        NewRoom {
            size: RoomSize::Kingsize,
            seaside: true,
            price: 240.0,
        }
    }

    /// A small inland room.
    pub fn small_inland() -> NewRoom {
        NewRoom {
            size: RoomSize::Small,
            seaside: false,
            price: 80.0,
        }
    }
}

// =============================================================================
// Stay Fixtures
// =============================================================================

/// A booking window.
#[derive(Debug, Clone, Copy)]
pub struct Stay {
    /// Check-in.
    pub from: DateTime<Utc>,
    /// Check-out.
    pub till: DateTime<Utc>,
    /// Guests.
    pub num_persons: i32,
}

impl Stay {
    /// `POST /api/v1/rooms/{id}/book` body.
    pub fn body(&self) -> Value {
        json!({
            "fromDate": self.from.to_rfc3339(),
            "tillDate": self.till.to_rfc3339(),
            "numPersons": self.num_persons,
        })
    }

    /// Booking parameters for direct store access.
    pub fn params(&self) -> BookRoomParams {
        BookRoomParams {
            from_date: self.from,
            till_date: self.till,
            num_persons: self.num_persons,
        }
    }
}

/// Fixture providing booking windows relative to now.
pub struct StayFixtures;

impl StayFixtures {
    /// Three nights starting in a week.
    pub fn next_week() -> Stay {
        let from = Utc::now() + Duration::days(7);
        Stay {
            from,
            till: from + Duration::days(3),
            num_persons: 2,
        }
    }

    /// Overlaps the second night of [`StayFixtures::next_week`].
    pub fn overlapping_next_week() -> Stay {
        let base = Self::next_week();
        Stay {
            from: base.from + Duration::days(1),
            till: base.till + Duration::days(2),
            num_persons: 1,
        }
    }

    /// Starts the day [`StayFixtures::next_week`] ends.
    pub fn after_next_week() -> Stay {
        let base = Self::next_week();
        Stay {
            from: base.till,
            till: base.till + Duration::days(2),
            num_persons: 1,
        }
    }

    /// Check-out before check-in.
    pub fn reversed() -> Stay {
        let base = Self::next_week();
        Stay {
            from: base.till,
            till: base.from,
            num_persons: 2,
        }
    }

    /// Starts yesterday.
    pub fn in_the_past() -> Stay {
        let from = Utc::now() - Duration::days(1);
        Stay {
            from,
            till: from + Duration::days(2),
            num_persons: 1,
        }
    }
}
