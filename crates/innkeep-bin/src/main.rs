// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! innkeep - hotel reservation service
//!
//! Main binary entry point.

use innkeep_bin::cli::Cli;
use innkeep_bin::commands;
use innkeep_bin::error::report_error_and_exit;

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    if let Err(error) = commands::execute(cli).await {
        tracing::error!(exit_code = error.exit_code(), "{}", error);
        report_error_and_exit(error);
    }
}
