// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Middleware implementations for the API server.
//!
//! - [`AuthMiddleware`]: token authentication and identity resolution
//! - [`RequireAdmin`]: admin role gate for route groups

mod admin;
mod auth;

pub use admin::{RequireAdmin, RequireAdminLayer};
pub use auth::{authenticate, extract_token, AuthLayer, AuthMiddleware, REQUEST_ID_HEADER};
