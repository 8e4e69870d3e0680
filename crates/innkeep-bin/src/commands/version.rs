// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `version` command.

use crate::cli::Cli;
use crate::error::BinResult;

/// Prints component versions and build details.
pub fn version(cli: &Cli) -> BinResult<()> {
    println!("innkeep - hotel reservation service");
    println!();
    println!("Version Information:");
    println!("  innkeep-bin:    {}", env!("CARGO_PKG_VERSION"));
    println!("  innkeep-core:   {}", innkeep_core::VERSION);
    println!("  innkeep-api:    {}", innkeep_api::VERSION);
    println!("  innkeep-config: {}", innkeep_config::VERSION);

    if cli.is_verbose() {
        println!();
        println!("Auth:");
        println!("  Token algorithm: {:?}", innkeep_api::auth::ALGORITHM);
        println!(
            "  Default token validity: {}s",
            innkeep_api::auth::DEFAULT_TOKEN_TTL_SECS
        );
        println!("  Password hashing: Argon2id");
        println!();
        println!("Build Information:");
        println!("  Rust Edition: 2024");
        println!("  Target:       {}", std::env::consts::ARCH);
        println!("  OS:           {}", std::env::consts::OS);
    }

    println!();
    println!("License: PolyForm Noncommercial License 1.0.0");
    println!("Copyright (c) 2025 Sylvex. All rights reserved.");

    Ok(())
}
