// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! In-memory storage backend.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use super::{BookingStore, HotelStore, Page, Paged, RoomStore, UserStore};
use crate::error::{StoreError, StoreResult};
use crate::model::{Booking, BookingFilter, Hotel, HotelFilter, Room, RoomFilter, User};
use crate::types::{BookingId, HotelId, RoomId, UserId};

// =============================================================================
// MemoryStore
// =============================================================================

/// Storage backend holding every collection in process memory.
///
/// All collections sit behind one `RwLock`, so writes that touch several
/// collections (room insert, hotel cascade delete, booking availability
/// check) are atomic.
///
/// # Example
///
/// ```rust,ignore
/// use innkeep_core::store::{MemoryStore, UserStore};
///
/// let store = MemoryStore::new();
/// store.insert_user(user).await?;
/// let found = store.find_user_by_email("ADA@example.com").await?;
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

#[derive(Debug, Default)]
struct Collections {
    users: BTreeMap<UserId, User>,
    /// Lowercased email to user id.
    emails: HashMap<String, UserId>,
    hotels: BTreeMap<HotelId, Hotel>,
    rooms: BTreeMap<RoomId, Room>,
    bookings: BTreeMap<BookingId, Booking>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored users.
    pub fn user_count(&self) -> usize {
        self.inner.read().users.len()
    }

    /// Returns the number of stored bookings.
    pub fn booking_count(&self) -> usize {
        self.inner.read().bookings.len()
    }
}

fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

// =============================================================================
// Users
// =============================================================================

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user_by_id(&self, id: UserId) -> StoreResult<User> {
        self.inner
            .read()
            .users
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("user", id))
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<User> {
        let inner = self.inner.read();
        inner
            .emails
            .get(&email_key(email))
            .and_then(|id| inner.users.get(id))
            .cloned()
            .ok_or_else(|| StoreError::not_found("user", email))
    }

    async fn insert_user(&self, user: User) -> StoreResult<User> {
        let mut inner = self.inner.write();
        let key = email_key(&user.email);

        if inner.emails.contains_key(&key) {
            return Err(StoreError::duplicate("user", "email", user.email));
        }
        if inner.users.contains_key(&user.id) {
            return Err(StoreError::duplicate("user", "id", user.id.to_string()));
        }

        inner.emails.insert(key, user.id);
        inner.users.insert(user.id, user.clone());
        debug!(user_id = %user.id, "User inserted");
        Ok(user)
    }

    async fn update_user(&self, user: User) -> StoreResult<User> {
        let mut inner = self.inner.write();

        let Some(existing) = inner.users.get(&user.id) else {
            return Err(StoreError::not_found("user", user.id));
        };

        let old_key = email_key(&existing.email);
        let new_key = email_key(&user.email);
        if old_key != new_key {
            if inner.emails.contains_key(&new_key) {
                return Err(StoreError::duplicate("user", "email", user.email));
            }
            inner.emails.remove(&old_key);
            inner.emails.insert(new_key, user.id);
        }

        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete_user(&self, id: UserId) -> StoreResult<()> {
        let mut inner = self.inner.write();
        let user = inner
            .users
            .remove(&id)
            .ok_or_else(|| StoreError::not_found("user", id))?;
        inner.emails.remove(&email_key(&user.email));
        debug!(user_id = %id, "User deleted");
        Ok(())
    }

    async fn list_users(&self, page: Page) -> StoreResult<Paged<User>> {
        Ok(page.slice(self.inner.read().users.values().cloned()))
    }
}

// =============================================================================
// Hotels
// =============================================================================

#[async_trait]
impl HotelStore for MemoryStore {
    async fn insert_hotel(&self, hotel: Hotel) -> StoreResult<Hotel> {
        let mut inner = self.inner.write();
        if inner.hotels.contains_key(&hotel.id) {
            return Err(StoreError::duplicate("hotel", "id", hotel.id.to_string()));
        }
        inner.hotels.insert(hotel.id, hotel.clone());
        Ok(hotel)
    }

    async fn find_hotel(&self, id: HotelId) -> StoreResult<Hotel> {
        self.inner
            .read()
            .hotels
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("hotel", id))
    }

    async fn list_hotels(&self, filter: HotelFilter, page: Page) -> StoreResult<Paged<Hotel>> {
        let inner = self.inner.read();
        Ok(page.slice(inner.hotels.values().filter(|h| filter.matches(h)).cloned()))
    }

    async fn delete_hotel(&self, id: HotelId) -> StoreResult<()> {
        let mut inner = self.inner.write();
        let hotel = inner
            .hotels
            .remove(&id)
            .ok_or_else(|| StoreError::not_found("hotel", id))?;

        for room_id in &hotel.rooms {
            inner.rooms.remove(room_id);
        }
        debug!(hotel_id = %id, rooms = hotel.rooms.len(), "Hotel deleted");
        Ok(())
    }
}

// =============================================================================
// Rooms
// =============================================================================

#[async_trait]
impl RoomStore for MemoryStore {
    async fn insert_room(&self, room: Room) -> StoreResult<Room> {
        let mut inner = self.inner.write();
        if inner.rooms.contains_key(&room.id) {
            return Err(StoreError::duplicate("room", "id", room.id.to_string()));
        }

        let hotel = inner
            .hotels
            .get_mut(&room.hotel_id)
            .ok_or_else(|| StoreError::not_found("hotel", room.hotel_id))?;
        hotel.rooms.push(room.id);

        inner.rooms.insert(room.id, room.clone());
        Ok(room)
    }

    async fn find_room(&self, id: RoomId) -> StoreResult<Room> {
        self.inner
            .read()
            .rooms
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("room", id))
    }

    async fn list_rooms(&self, filter: RoomFilter, page: Page) -> StoreResult<Paged<Room>> {
        let inner = self.inner.read();
        Ok(page.slice(inner.rooms.values().filter(|r| filter.matches(r)).cloned()))
    }
}

// =============================================================================
// Bookings
// =============================================================================

#[async_trait]
impl BookingStore for MemoryStore {
    async fn insert_booking(&self, booking: Booking) -> StoreResult<Booking> {
        let mut inner = self.inner.write();

        if !inner.rooms.contains_key(&booking.room_id) {
            return Err(StoreError::not_found("room", booking.room_id));
        }
        if inner.bookings.values().any(|b| b.conflicts_with(&booking)) {
            debug!(room_id = %booking.room_id, "Room already booked for the requested dates");
            return Err(StoreError::conflict("room is not available for the requested dates"));
        }

        inner.bookings.insert(booking.id, booking.clone());
        debug!(booking_id = %booking.id, user_id = %booking.user_id, "Booking inserted");
        Ok(booking)
    }

    async fn find_booking(&self, id: BookingId) -> StoreResult<Booking> {
        self.inner
            .read()
            .bookings
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("booking", id))
    }

    async fn list_bookings(&self, filter: BookingFilter, page: Page) -> StoreResult<Paged<Booking>> {
        let inner = self.inner.read();
        Ok(page.slice(inner.bookings.values().filter(|b| filter.matches(b)).cloned()))
    }

    async fn cancel_booking(&self, id: BookingId) -> StoreResult<Booking> {
        let mut inner = self.inner.write();
        let booking = inner
            .bookings
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("booking", id))?;
        booking.canceled = true;
        debug!(booking_id = %id, "Booking canceled");
        Ok(booking.clone())
    }
}

// =============================================================================
// Tests
// =============================================================================
