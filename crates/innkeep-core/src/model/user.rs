// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! User identities.
//!
//! A [`User`] is both the profile record and the authenticated identity. The
//! stored password hash never leaves the process: it is skipped on
//! serialization and masked in `Debug` output of the input parameters.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::model::Owned;
use crate::types::UserId;

/// Minimum first name length, in characters.
pub const MIN_FIRST_NAME_LEN: usize = 2;

/// Minimum last name length, in characters.
pub const MIN_LAST_NAME_LEN: usize = 2;

/// Minimum password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 7;

/// Profile update fields must be longer than this to be applied.
pub const MIN_UPDATE_NAME_LEN: usize = 2;

// =============================================================================
// User
// =============================================================================

/// A registered user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier.
    pub id: UserId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Login email, unique across users.
    pub email: String,
    /// Whether the user holds the admin role.
    #[serde(default)]
    pub is_admin: bool,
    /// Argon2 PHC string. Never serialized.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
}

impl User {
    /// Creates a regular (non-admin) user from validated registration input.
    pub fn new(params: &CreateUserParams, password_hash: String) -> Self {
        Self {
            id: UserId::new(),
            first_name: params.first_name.clone(),
            last_name: params.last_name.clone(),
            email: params.email.clone(),
            is_admin: false,
            password_hash,
        }
    }

    /// Grants or revokes the admin role.
    pub fn with_admin(mut self, is_admin: bool) -> Self {
        self.is_admin = is_admin;
        self
    }
}

impl Owned for User {
    fn owner_id(&self) -> UserId {
        self.id
    }
}

/// A profile is owned by the user it names, so guards can run on the id
/// before the record is loaded.
impl Owned for UserId {
    fn owner_id(&self) -> UserId {
        *self
    }
}

// =============================================================================
// Registration
// =============================================================================

/// Registration input.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserParams {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Login email.
    pub email: String,
    /// Plaintext password, hashed before storage.
    pub password: String,
}

impl CreateUserParams {
    /// Checks every field and reports all violations together.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();

        if self.first_name.chars().count() < MIN_FIRST_NAME_LEN {
            errors.add(
                "firstName",
                format!("firstName length should be at least {} characters", MIN_FIRST_NAME_LEN),
            );
        }
        if self.last_name.chars().count() < MIN_LAST_NAME_LEN {
            errors.add(
                "lastName",
                format!("lastName length should be at least {} characters", MIN_LAST_NAME_LEN),
            );
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.add(
                "password",
                format!("password length should be at least {} characters", MIN_PASSWORD_LEN),
            );
        }
        if !is_valid_email(&self.email) {
            errors.add("email", "invalid email address, expected local@domain.tld");
        }

        errors.into_result(())
    }
}

impl fmt::Debug for CreateUserParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateUserParams")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

// =============================================================================
// Profile Update
// =============================================================================

/// Profile update input. Fields too short to be applied are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserParams {
    /// New given name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// New family name.
    #[serde(default)]
    pub last_name: Option<String>,
}

impl UpdateUserParams {
    /// Applies the accepted fields to `user`. Returns `true` if anything changed.
    pub fn apply(&self, user: &mut User) -> bool {
        let mut changed = false;

        if let Some(name) = accepted(&self.first_name) {
            user.first_name = name.to_string();
            changed = true;
        }
        if let Some(name) = accepted(&self.last_name) {
            user.last_name = name.to_string();
            changed = true;
        }

        changed
    }
}

fn accepted(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .filter(|v| v.chars().count() > MIN_UPDATE_NAME_LEN)
}

// =============================================================================
// Email
// =============================================================================

/// Returns `true` if `email` has the shape `local@domain.tld`.
pub fn is_valid_email(email: &str) -> bool {
    if email.is_empty() || email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}

// =============================================================================
// Tests
// =============================================================================
