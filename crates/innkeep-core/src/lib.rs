// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # innkeep-core
//!
//! Domain model and storage port for the innkeep hotel reservation service.
//!
//! - **Types**: UUIDv7 record identifiers (`UserId`, `HotelId`, `RoomId`, `BookingId`)
//! - **Model**: users, hotels, rooms, bookings and their input validation
//! - **Store**: async collection traits plus an in-memory backend
//! - **Error**: unified error hierarchy
//!
//! ## Example
//!
//! ```rust,ignore
//! use innkeep_core::model::{CreateUserParams, User};
//! use innkeep_core::store::Store;
//!
//! let store = Store::in_memory();
//! params.validate()?;
//! let user = store.users.insert_user(User::new(&params, hash)).await?;
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod error;
pub mod model;
pub mod store;
pub mod types;

// =============================================================================
// Re-exports for convenience
// =============================================================================

pub use error::{
    CoreError, CoreResult, FieldViolation, StoreError, StoreResult, ValidationError,
};
pub use model::{
    BookRoomParams, Booking, BookingFilter, CreateUserParams, Hotel, HotelFilter, NewHotel,
    NewRoom, Owned, Room, RoomFilter, RoomSize, UpdateUserParams, User,
};
pub use store::{
    BookingStore, HotelStore, MemoryStore, Page, Paged, RoomStore, Store, UserStore,
};
pub use types::{BookingId, HotelId, RoomId, UserId};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
