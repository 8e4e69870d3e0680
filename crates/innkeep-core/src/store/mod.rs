// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Storage port.
//!
//! The service talks to persistence only through the traits in this module.
//! Each collection has its own trait so handlers and middleware depend on the
//! narrowest surface they need; [`Store`] bundles one implementation of each.
//!
//! # Examples
//!
//! ```
//! use innkeep_core::store::{Page, Store};
//!
//! let _store = Store::in_memory();
//! let page = Page::new(2, 10);
//! assert_eq!(page.offset, 10);
//! ```

mod memory;

pub use memory::MemoryStore;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::StoreResult;
use crate::model::{Booking, BookingFilter, Hotel, HotelFilter, Room, RoomFilter, User};
use crate::types::{BookingId, HotelId, RoomId, UserId};

// =============================================================================
// Paging
// =============================================================================

/// A window into an ordered collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// Number of items to skip.
    pub offset: usize,
    /// Maximum number of items to return.
    pub limit: usize,
}

impl Page {
    /// Creates a window for a 1-based page number.
    pub fn new(page: u32, per_page: u32) -> Self {
        let page = page.max(1) as usize;
        let limit = per_page.max(1) as usize;
        Self {
            offset: (page - 1) * limit,
            limit,
        }
    }

    /// A window covering everything.
    pub fn all() -> Self {
        Self {
            offset: 0,
            limit: usize::MAX,
        }
    }

    /// Applies the window to an iterator and counts the full set.
    pub fn slice<T, I>(&self, items: I) -> Paged<T>
    where
        I: IntoIterator<Item = T>,
    {
        let all: Vec<T> = items.into_iter().collect();
        let total = all.len();
        let items = all.into_iter().skip(self.offset).take(self.limit).collect();
        Paged { items, total }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::all()
    }
}

/// One page of results plus the size of the full result set.
#[derive(Debug, Clone, Serialize)]
pub struct Paged<T> {
    /// Items in this page.
    pub items: Vec<T>,
    /// Number of items across all pages.
    pub total: usize,
}

// =============================================================================
// Collection Ports
// =============================================================================

/// Identity storage.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Finds a user by id.
    async fn find_user_by_id(&self, id: UserId) -> StoreResult<User>;

    /// Finds a user by email, case-insensitively.
    async fn find_user_by_email(&self, email: &str) -> StoreResult<User>;

    /// Inserts a user. Fails with `Duplicate` if the email is taken.
    async fn insert_user(&self, user: User) -> StoreResult<User>;

    /// Replaces a stored user.
    async fn update_user(&self, user: User) -> StoreResult<User>;

    /// Deletes a user.
    async fn delete_user(&self, id: UserId) -> StoreResult<()>;

    /// Lists users in creation order.
    async fn list_users(&self, page: Page) -> StoreResult<Paged<User>>;
}

/// Hotel storage.
#[async_trait]
pub trait HotelStore: Send + Sync {
    /// Inserts a hotel.
    async fn insert_hotel(&self, hotel: Hotel) -> StoreResult<Hotel>;

    /// Finds a hotel by id.
    async fn find_hotel(&self, id: HotelId) -> StoreResult<Hotel>;

    /// Lists hotels matching `filter`.
    async fn list_hotels(&self, filter: HotelFilter, page: Page) -> StoreResult<Paged<Hotel>>;

    /// Deletes a hotel together with its rooms.
    async fn delete_hotel(&self, id: HotelId) -> StoreResult<()>;
}

/// Room storage.
#[async_trait]
pub trait RoomStore: Send + Sync {
    /// Inserts a room and appends it to its hotel.
    async fn insert_room(&self, room: Room) -> StoreResult<Room>;

    /// Finds a room by id.
    async fn find_room(&self, id: RoomId) -> StoreResult<Room>;

    /// Lists rooms matching `filter`.
    async fn list_rooms(&self, filter: RoomFilter, page: Page) -> StoreResult<Paged<Room>>;
}

/// Booking storage.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Inserts a booking if its room is free for the whole stay.
    ///
    /// The availability check and the insert are atomic. Fails with
    /// `Conflict` if a non-canceled booking of the same room overlaps.
    async fn insert_booking(&self, booking: Booking) -> StoreResult<Booking>;

    /// Finds a booking by id.
    async fn find_booking(&self, id: BookingId) -> StoreResult<Booking>;

    /// Lists bookings matching `filter`.
    async fn list_bookings(&self, filter: BookingFilter, page: Page) -> StoreResult<Paged<Booking>>;

    /// Marks a booking canceled and returns the updated record.
    async fn cancel_booking(&self, id: BookingId) -> StoreResult<Booking>;
}

// =============================================================================
// Store
// =============================================================================

/// The full set of collection ports.
#[derive(Clone)]
pub struct Store {
    /// Users.
    pub users: Arc<dyn UserStore>,
    /// Hotels.
    pub hotels: Arc<dyn HotelStore>,
    /// Rooms.
    pub rooms: Arc<dyn RoomStore>,
    /// Bookings.
    pub bookings: Arc<dyn BookingStore>,
}

impl Store {
    /// Creates a store backed by one shared [`MemoryStore`].
    pub fn in_memory() -> Self {
        Self::from_backend(Arc::new(MemoryStore::new()))
    }

    /// Creates a store whose ports all share `backend`.
    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: UserStore + HotelStore + RoomStore + BookingStore + 'static,
    {
        Self {
            users: backend.clone(),
            hotels: backend.clone(),
            rooms: backend.clone(),
            bookings: backend,
        }
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}
