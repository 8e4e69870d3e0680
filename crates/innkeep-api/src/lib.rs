// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # innkeep-api
//!
//! Authentication core and REST API for the innkeep hotel reservation
//! service.
//!
//! - **auth**: Argon2id credentials, HS256 tokens, request context, guards
//! - **middleware**: token authentication and admin gate as tower layers
//! - **handlers**: users, hotels, rooms, bookings
//! - **server**: router assembly and graceful serving
//!
//! ## Request Flow
//!
//! ```text
//! client ──► AuthLayer ──► RequireAdminLayer (admin group) ──► handler ──► guard
//!             │ token → claims → user                           │ owner / admin
//!             └─ 401 "invalid credentials"                      └─ 403
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod server;
pub mod state;

pub use auth::{AuthError, JwtConfig, JwtManager, RequestContext};
pub use config::{ApiConfig, CorsConfig};
pub use error::{ApiError, ApiResult};
pub use server::{ApiServer, ApiServerBuilder};
pub use state::{AppState, AppStateBuilder};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
