// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Errors surfaced by the `innkeep` binary.
//!
//! Every error maps to one process exit code, so scripts can tell a rejected
//! configuration from a server that failed after it started.

use innkeep_api::{ApiError, AuthError};
use innkeep_config::ConfigError;
use thiserror::Error;

/// Result type alias for innkeep-bin operations.
pub type BinResult<T> = Result<T, BinError>;

/// Process exit codes.
pub mod exit {
    /// The configuration is missing, unreadable or invalid.
    pub const CONFIG: i32 = 1;
    /// Logging or token signing could not be set up.
    pub const STARTUP: i32 = 2;
    /// A command could not render its output.
    pub const OUTPUT: i32 = 3;
    /// The server failed to bind or stopped with an error.
    pub const SERVER: i32 = 4;
}

/// Errors that end a command.
#[derive(Debug, Error)]
pub enum BinError {
    /// A setting is missing or unusable.
    #[error("invalid configuration: {0}")]
    Settings(String),

    /// The configuration could not be loaded or failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Token signing or password hashing could not be set up.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The log subscriber could not be installed.
    #[error("failed to install log subscriber: {0}")]
    Logging(String),

    /// Command output could not be rendered.
    #[error("failed to render output: {0}")]
    Output(#[from] serde_json::Error),

    /// The API server failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// An error annotated with what the binary was doing.
    #[error("{context}")]
    Context {
        /// What was being attempted.
        context: String,
        /// The underlying error.
        #[source]
        source: Box<BinError>,
    },
}

impl BinError {
    /// Creates a configuration error.
    pub fn settings(msg: impl Into<String>) -> Self {
        Self::Settings(msg.into())
    }

    /// Creates a logging setup error.
    pub fn logging(msg: impl Into<String>) -> Self {
        Self::Logging(msg.into())
    }

    /// Wraps the error with a description of the failed step.
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Settings(_) | Self::Config(_) => exit::CONFIG,
            Self::Auth(AuthError::Configuration { .. }) => exit::CONFIG,
            Self::Auth(_) | Self::Logging(_) => exit::STARTUP,
            Self::Output(_) => exit::OUTPUT,
            Self::Api(_) => exit::SERVER,
            Self::Context { source, .. } => source.exit_code(),
        }
    }
}

// =============================================================================
// Error Reporting
// =============================================================================

/// Prints the error and its cause chain to stderr.
pub fn report_error(error: &BinError) {
    eprintln!("Error: {}", error);

    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        eprintln!("  Caused by: {}", cause);
        source = cause.source();
    }
}

/// Reports an error and exits with its code.
pub fn report_error_and_exit(error: BinError) -> ! {
    report_error(&error);
    std::process::exit(error.exit_code())
}

// =============================================================================
// Tests
// =============================================================================
