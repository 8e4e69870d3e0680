// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! JWT claims structure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use innkeep_core::{User, UserId};

/// Claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject user id.
    pub id: UserId,

    /// Subject email at issue time.
    pub email: String,

    /// Issued at (Unix timestamp, seconds).
    pub iat: i64,

    /// Expires at (Unix timestamp, seconds).
    pub exp: i64,
}

impl Claims {
    /// Creates claims for `user`, valid for `ttl_secs` from `now`.
    pub fn for_user(user: &User, now: DateTime<Utc>, ttl_secs: i64) -> Self {
        let iat = now.timestamp();
        Self {
            id: user.id,
            email: user.email.clone(),
            iat,
            exp: iat.saturating_add(ttl_secs),
        }
    }

    /// Returns `true` once `now` has reached the expiry.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}
