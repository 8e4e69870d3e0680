// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `validate` command.

use innkeep_config::{ConfigLoader, InnkeepConfig};

use crate::cli::{Cli, OutputFormat, ValidateArgs};
use crate::error::{BinError, BinResult};
use crate::runtime::api_config;

/// Secrets shorter than this draw a warning.
const RECOMMENDED_SECRET_LEN: usize = 32;

/// Token validity above this draws a warning.
const LONG_TOKEN_TTL_SECS: u64 = 24 * 60 * 60;

/// Loads and validates the configuration file, then prints a summary.
pub fn validate(cli: &Cli, args: ValidateArgs) -> BinResult<()> {
    let config_path = &cli.config;

    if !config_path.exists() {
        return Err(BinError::settings(format!(
            "Configuration file not found: {}",
            config_path.display()
        )));
    }

    let config = ConfigLoader::new()
        .load(config_path)
        .map_err(|e| BinError::from(e).context("Configuration validation failed"))?;

    // The server must be constructible from it, not only parseable.
    api_config(&config)?;

    let warnings = collect_warnings(&config);

    match args.format {
        OutputFormat::Text => {
            println!("Configuration is valid: {}", config_path.display());
            println!();
            println!("Summary:");
            println!("  Listen:        {}", config.server.socket_addr());
            println!("  Token header:  {}", config.auth.token_header);
            println!("  Token TTL:     {}s", config.auth.token_ttl_secs);
            println!("  Public paths:  {}", config.auth.public_paths.join(", "));
            println!("  Log level:     {}", config.logging.level.as_str());

            if !warnings.is_empty() {
                println!();
                println!("Warnings:");
                for warning in &warnings {
                    println!("  - {}", warning);
                }
            }

            if args.show_config {
                println!();
                println!("Parsed configuration:");
                println!("{}", render_masked(&config)?);
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "valid": true,
                "config_path": config_path.display().to_string(),
                "summary": {
                    "listen": config.server.socket_addr().to_string(),
                    "token_header": config.auth.token_header,
                    "token_ttl_secs": config.auth.token_ttl_secs,
                    "public_paths": config.auth.public_paths,
                },
                "warnings": warnings,
                "config": if args.show_config { Some(masked_value(&config)?) } else { None },
            });
            let rendered = serde_json::to_string_pretty(&output)?;
            println!("{}", rendered);
        }
    }

    Ok(())
}

/// Non-fatal findings worth surfacing before deployment.
fn collect_warnings(config: &InnkeepConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if let Some(secret) = &config.auth.secret {
        if secret.expose().len() < RECOMMENDED_SECRET_LEN {
            warnings.push(format!(
                "auth.secret is shorter than {} bytes",
                RECOMMENDED_SECRET_LEN
            ));
        }
    }
    if config.auth.token_ttl_secs > LONG_TOKEN_TTL_SECS {
        warnings.push("auth.token_ttl_secs exceeds 24 hours".to_string());
    }
    if config.server.cors.allowed_origins.iter().any(|o| o == "*") {
        warnings.push("CORS allows any origin".to_string());
    }

    warnings
}

/// Serializes the configuration with the signing secret replaced.
fn masked_value(config: &InnkeepConfig) -> BinResult<serde_json::Value> {
    let mut value = serde_json::to_value(config)?;

    if let Some(secret) = value.pointer_mut("/auth/secret") {
        if !secret.is_null() {
            *secret = serde_json::Value::String("***".to_string());
        }
    }
    Ok(value)
}

fn render_masked(config: &InnkeepConfig) -> BinResult<String> {
    let value = masked_value(config)?;
    Ok(serde_json::to_string_pretty(&value)?)
}

// =============================================================================
// Tests
// =============================================================================
