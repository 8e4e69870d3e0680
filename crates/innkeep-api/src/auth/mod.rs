// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication and authorization module.
//!
//! This module provides:
//! - Argon2id password hashing and verification
//! - JWT token issuance and validation
//! - The per-request context carrying the resolved identity
//! - Role and ownership guards

mod claims;
mod context;
mod error;
pub mod guard;
mod jwt;
pub mod password;

pub use claims::Claims;
pub use context::RequestContext;
pub use error::{AuthError, AuthResult, INVALID_CREDENTIALS};
pub use guard::{owner_or_admin, ownership_check, role_check, Decision};
pub use jwt::{JwtConfig, JwtManager, ALGORITHM, DEFAULT_TOKEN_TTL_SECS};
pub use password::{hash_password, verify_password};
