// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Error hierarchy for the domain and storage layers.
//!
//! # Error Hierarchy
//!
//! ```text
//! CoreError (root)
//! ├── StoreError       - Storage port failures (not found, duplicate, conflict)
//! ├── ValidationError  - Field-level input violations
//! └── InvalidId        - Malformed record identifier
//! ```
//!
//! # Examples
//!
//! ```
//! use innkeep_core::error::{CoreError, StoreError};
//!
//! let err = StoreError::not_found("booking", "0192");
//! assert!(err.is_not_found());
//!
//! let core: CoreError = err.into();
//! assert_eq!(core.status_code(), 404);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result alias for domain operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Result alias for storage port operations.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// CoreError - Root Error Type
// =============================================================================

/// The root error type for the domain layer.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Storage error.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Input validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A record identifier could not be parsed.
    #[error("Invalid {kind} id: '{value}'")]
    InvalidId {
        /// Record kind (user, hotel, room, booking).
        kind: &'static str,
        /// The rejected input.
        value: String,
    },
}

impl CoreError {
    /// Creates an invalid id error.
    pub fn invalid_id(kind: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidId {
            kind,
            value: value.into(),
        }
    }

    /// Returns the HTTP status code this error maps to.
    pub fn status_code(&self) -> u16 {
        match self {
            CoreError::Store(e) => e.status_code(),
            CoreError::Validation(_) => 422,
            CoreError::InvalidId { .. } => 400,
        }
    }

    /// Returns a message safe to show to callers.
    pub fn user_message(&self) -> String {
        match self {
            CoreError::Store(e) => e.user_message(),
            CoreError::Validation(e) => e.to_string(),
            CoreError::InvalidId { kind, .. } => format!("Invalid {} id", kind),
        }
    }
}

// =============================================================================
// StoreError
// =============================================================================

/// Errors raised by storage port implementations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The requested record does not exist.
    #[error("{collection} '{id}' not found")]
    NotFound {
        /// Collection name.
        collection: &'static str,
        /// Identifier or key that was looked up.
        id: String,
    },

    /// A uniqueness constraint was violated.
    #[error("{collection} with {field} '{value}' already exists")]
    Duplicate {
        /// Collection name.
        collection: &'static str,
        /// Field carrying the unique constraint.
        field: &'static str,
        /// The conflicting value.
        value: String,
    },

    /// The write conflicts with existing state.
    #[error("Conflict: {message}")]
    Conflict {
        /// Description of the conflict.
        message: String,
    },

    /// The backend failed.
    #[error("Storage backend failure: {message}")]
    Backend {
        /// Backend error message.
        message: String,
    },
}

impl StoreError {
    /// Creates a not found error.
    pub fn not_found(collection: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            collection,
            id: id.to_string(),
        }
    }

    /// Creates a duplicate key error.
    pub fn duplicate(collection: &'static str, field: &'static str, value: impl Into<String>) -> Self {
        Self::Duplicate {
            collection,
            field,
            value: value.into(),
        }
    }

    /// Creates a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Creates a backend error.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    /// Returns `true` if the record was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    /// Returns the HTTP status code this error maps to.
    pub fn status_code(&self) -> u16 {
        match self {
            StoreError::NotFound { .. } => 404,
            StoreError::Duplicate { .. } | StoreError::Conflict { .. } => 409,
            StoreError::Backend { .. } => 503,
        }
    }

    /// Returns a message safe to show to callers.
    pub fn user_message(&self) -> String {
        match self {
            StoreError::NotFound { collection, .. } => format!("{} not found", collection),
            StoreError::Duplicate { field, .. } => format!("{} is already taken", field),
            StoreError::Conflict { message } => message.clone(),
            StoreError::Backend { .. } => "Storage is temporarily unavailable".to_string(),
        }
    }
}

// =============================================================================
// ValidationError
// =============================================================================

/// A single field violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    /// Field name as it appears on the wire.
    pub field: String,
    /// Human-readable reason.
    pub message: String,
}

/// A collection of field violations found while validating input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Every violation found, in check order.
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a collection holding one violation.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Records a violation.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.violations.push(FieldViolation {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Returns `true` if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns `true` if the given field has a violation.
    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }

    /// Returns `Ok(value)` when empty, otherwise the collected violations.
    pub fn into_result<T>(self, value: T) -> Result<T, ValidationError> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl std::error::Error for ValidationError {}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.violations.as_slice() {
            [] => write!(f, "no violations"),
            [only] => write!(f, "{}: {}", only.field, only.message),
            many => write!(f, "{} invalid fields", many.len()),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
