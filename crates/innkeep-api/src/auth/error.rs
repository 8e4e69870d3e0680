// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication and authorization failures.

use thiserror::Error;

use crate::error::ApiError;

/// Message returned to callers for every authentication failure.
pub const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Result type alias for auth operations.
pub type AuthResult<T> = Result<T, AuthError>;

/// A typed authentication or authorization failure.
///
/// The credential variants carry the exact reason a request was rejected so
/// it can be logged. Callers only ever see [`INVALID_CREDENTIALS`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No token on the request.
    #[error("missing credential")]
    MissingCredential,

    /// Malformed token, bad signature or wrong algorithm.
    #[error("invalid credential")]
    InvalidCredential,

    /// Token past its expiry.
    #[error("expired credential")]
    ExpiredCredential,

    /// Token subject no longer resolves to a stored identity.
    #[error("unknown identity")]
    UnknownIdentity,

    /// Login with an unknown email or a wrong password.
    #[error("bad credentials")]
    BadCredentials,

    /// Authenticated, but a guard denied the operation.
    #[error("forbidden: {reason}")]
    Forbidden {
        /// Which check failed.
        reason: String,
    },

    /// Signing secret absent or unusable.
    #[error("auth configuration error: {message}")]
    Configuration {
        /// Error message.
        message: String,
    },
}

impl AuthError {
    /// Creates a forbidden error.
    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden {
            reason: reason.into(),
        }
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Returns `true` for the variants that mean "not authenticated".
    pub fn is_unauthenticated(&self) -> bool {
        matches!(
            self,
            AuthError::MissingCredential
                | AuthError::InvalidCredential
                | AuthError::ExpiredCredential
                | AuthError::UnknownIdentity
                | AuthError::BadCredentials
        )
    }

    /// Short reason tag for structured logs.
    pub fn reason(&self) -> &'static str {
        match self {
            AuthError::MissingCredential => "missing_credential",
            AuthError::InvalidCredential => "invalid_credential",
            AuthError::ExpiredCredential => "expired_credential",
            AuthError::UnknownIdentity => "unknown_identity",
            AuthError::BadCredentials => "bad_credentials",
            AuthError::Forbidden { .. } => "forbidden",
            AuthError::Configuration { .. } => "configuration",
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Forbidden { reason } => ApiError::forbidden(reason),
            AuthError::Configuration { message } => ApiError::internal(message),
            _ => ApiError::unauthorized(INVALID_CREDENTIALS),
        }
    }
}
