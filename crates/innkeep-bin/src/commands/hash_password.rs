// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `hash-password` command.

use crate::cli::{Cli, HashPasswordArgs};
use crate::error::{BinError, BinResult};

/// Prints the Argon2id PHC string for the given password.
pub fn hash_password(_cli: &Cli, args: HashPasswordArgs) -> BinResult<()> {
    if args.password.is_empty() {
        return Err(BinError::settings("password cannot be empty"));
    }

    let hash = innkeep_api::auth::hash_password(&args.password)?;
    println!("{}", hash);
    Ok(())
}
