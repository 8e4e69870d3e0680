// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI command implementations.
//!
//! - `run`: Start the API server
//! - `validate`: Validate the configuration file
//! - `version`: Show version information
//! - `hash-password`: Print an Argon2id PHC string

mod hash_password;
mod run;
mod validate;
mod version;

pub use hash_password::hash_password;
pub use run::run;
pub use validate::validate;
pub use version::version;

use crate::cli::{Cli, Commands, LogFormat};
use crate::error::BinResult;
use crate::logging::init_logging;

/// Executes the appropriate command based on CLI arguments.
///
/// `run` installs logging itself once the config file has been read; the
/// other commands log with the CLI settings only.
pub async fn execute(cli: Cli) -> BinResult<()> {
    match cli.effective_command() {
        Commands::Run(args) => run::run(&cli, args).await,
        command => {
            init_logging(cli.effective_log_level("warn"), cli.effective_log_format(LogFormat::Text))?;
            match command {
                Commands::Validate(args) => validate::validate(&cli, args),
                Commands::Version => version::version(&cli),
                Commands::HashPassword(args) => hash_password::hash_password(&cli, args),
                Commands::Run(_) => Ok(()),
            }
        }
    }
}
