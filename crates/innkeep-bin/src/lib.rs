// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # innkeep-bin
//!
//! Command-line entry point for the innkeep hotel reservation service.
//!
//! ## Architecture
//!
//! ```text
//!            main.rs
//!               │
//!            cli.rs ──► logging.rs
//!               │
//!          commands/
//!     ┌─────────┼──────────────┐
//!     ▼         ▼              ▼
//!    run     validate    version / hash-password
//!     │
//!  runtime.rs ──► innkeep-config (load) ──► innkeep-api (serve)
//!     │
//!  shutdown.rs (SIGINT / SIGTERM)
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the server (default command)
//! INNKEEP_AUTH_SECRET=change-me innkeep
//!
//! # Custom config and port
//! innkeep -c /etc/innkeep/innkeep.toml run --port 8080
//!
//! # Validate configuration
//! innkeep validate --show-config
//!
//! # Hash a password for a hand-made user record
//! innkeep hash-password 's3cret!'
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod runtime;
pub mod shutdown;

// =============================================================================
// Re-exports
// =============================================================================

pub use cli::{Cli, Commands};
pub use error::{BinError, BinResult};
pub use logging::init_logging;
pub use runtime::{Runtime, RuntimeBuilder};
pub use shutdown::ShutdownCoordinator;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
