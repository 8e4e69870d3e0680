// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authorization guards.
//!
//! Guards are pure predicates over an authenticated user and, for ownership,
//! a resource. They return a [`Decision`] that composes with [`Decision::and`]
//! and [`Decision::or`]; handlers turn the final decision into a result.
//!
//! ```rust,ignore
//! // Owner, or an admin where the endpoint opts in.
//! ownership_check(&user, &booking)
//!     .or(role_check(&user))
//!     .into_result()?;
//! ```

use innkeep_core::{Owned, User};

use super::{AuthError, AuthResult};

/// Outcome of an authorization check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Access granted.
    Allow,
    /// Access denied, with the reason that is logged and returned.
    Deny(&'static str),
}

impl Decision {
    /// Returns `true` if access is granted.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// Both checks must allow. The first denial wins.
    pub fn and(self, other: Decision) -> Decision {
        match self {
            Decision::Allow => other,
            deny => deny,
        }
    }

    /// Either check may allow. If both deny, the first reason is kept.
    pub fn or(self, other: Decision) -> Decision {
        match (self, other) {
            (Decision::Allow, _) | (_, Decision::Allow) => Decision::Allow,
            (deny, _) => deny,
        }
    }

    /// Maps a denial to [`AuthError::Forbidden`].
    pub fn into_result(self) -> AuthResult<()> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => Err(AuthError::forbidden(reason)),
        }
    }
}

/// Allows admins only.
pub fn role_check(user: &User) -> Decision {
    if user.is_admin {
        Decision::Allow
    } else {
        Decision::Deny("admin role required")
    }
}

/// Allows the owner of `resource` only.
pub fn ownership_check<R: Owned + ?Sized>(user: &User, resource: &R) -> Decision {
    if resource.owner_id() == user.id {
        Decision::Allow
    } else {
        Decision::Deny("not the owner of this resource")
    }
}

/// Owner, or admin as an explicit override.
pub fn owner_or_admin<R: Owned + ?Sized>(user: &User, resource: &R) -> Decision {
    ownership_check(user, resource).or(role_check(user))
}
