// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # innkeep-config
//!
//! Configuration management for the innkeep hotel reservation service.
//!
//! ## Features
//!
//! - **Schema Definition**: server, auth and logging sections with validation
//! - **Multi-Format Support**: YAML, TOML, and JSON configuration files
//! - **Environment Overrides**: override values via `INNKEEP_*` variables
//! - **Secret Masking**: the signing secret never prints in logs
//!
//! ## Quick Start
//!
//! ```no_run
//! use innkeep_config::loader::load_config;
//!
//! let config = load_config("innkeep.yaml").unwrap();
//! println!("Listening on {}", config.server.socket_addr());
//! ```
//!
//! ## Environment Variables
//!
//! ```text
//! INNKEEP_SERVER_PORT=9090
//! INNKEEP_AUTH_SECRET=change-me
//! INNKEEP_LOG_LEVEL=debug
//! ```
//!
//! Values in config files can reference environment variables:
//!
//! ```yaml
//! auth:
//!   secret: "${JWT_SECRET}"
//! server:
//!   port: ${PORT:5000}
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod error;
pub mod loader;
pub mod schema;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigFormat, ConfigLoader, ConfigLoaderBuilder, load_config, load_config_str};
pub use schema::{
    AuthConfig, CorsConfig, InnkeepConfig, LogFormat, LogLevel, LoggingConfig, SecretValue,
    ServerConfig,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
