// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Per-request context.

use std::net::IpAddr;

use uuid::Uuid;

use innkeep_core::User;

use super::{AuthError, AuthResult};

/// Context attached to every request by the auth middleware.
///
/// Public routes get a context without an identity; protected routes only
/// reach their handler once `identity` holds the resolved user.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Request ID for tracing.
    pub request_id: Uuid,
    /// Client IP address, when known.
    pub client_ip: Option<IpAddr>,
    /// The authenticated user.
    pub identity: Option<User>,
}

impl RequestContext {
    /// Creates an anonymous context.
    pub fn anonymous() -> Self {
        Self {
            request_id: Uuid::now_v7(),
            client_ip: None,
            identity: None,
        }
    }

    /// Creates a context for an authenticated user.
    pub fn authenticated(user: User) -> Self {
        Self {
            identity: Some(user),
            ..Self::anonymous()
        }
    }

    /// Sets the client IP address.
    pub fn with_client_ip(mut self, ip: Option<IpAddr>) -> Self {
        self.client_ip = ip;
        self
    }

    /// Sets the request ID.
    pub fn with_request_id(mut self, request_id: Uuid) -> Self {
        self.request_id = request_id;
        self
    }

    /// Returns the identity or [`AuthError::MissingCredential`].
    pub fn require_identity(&self) -> AuthResult<&User> {
        self.identity.as_ref().ok_or(AuthError::MissingCredential)
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::anonymous()
    }
}
