// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Service runtime orchestration.
//!
//! Loads configuration, builds the token manager, store and API server, then
//! serves until a shutdown signal arrives.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use innkeep_api::{ApiConfig, ApiServer, AppState, CorsConfig, JwtConfig, JwtManager};
use innkeep_config::{ConfigLoader, InnkeepConfig};
use innkeep_core::Store;

use crate::error::{BinError, BinResult};
use crate::shutdown::ShutdownCoordinator;

// =============================================================================
// Runtime
// =============================================================================

/// Owns the loaded configuration and the shutdown coordinator.
pub struct Runtime {
    config: Arc<InnkeepConfig>,
    shutdown: ShutdownCoordinator,
}

impl Runtime {
    /// Creates a runtime for an already validated configuration.
    pub fn new(config: InnkeepConfig) -> Self {
        Self {
            config: Arc::new(config),
            shutdown: ShutdownCoordinator::new(),
        }
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &InnkeepConfig {
        &self.config
    }

    /// Returns a handle that can stop the runtime.
    pub fn shutdown_handle(&self) -> ShutdownCoordinator {
        self.shutdown.clone()
    }

    /// Builds the API server with a fresh in-memory store.
    pub fn build_server(&self) -> BinResult<ApiServer> {
        let api_config = api_config(&self.config)?;
        let jwt_manager = JwtManager::new(api_config.jwt.clone())?;

        let state = AppState::builder()
            .config(api_config)
            .jwt_manager(Arc::new(jwt_manager))
            .store(Store::in_memory())
            .build()?;

        Ok(ApiServer::new(state))
    }

    /// Serves until SIGINT/SIGTERM or a manual shutdown.
    ///
    /// In-flight requests get `server.shutdown_timeout_secs` to finish.
    pub async fn run(self) -> BinResult<()> {
        info!(version = innkeep_core::VERSION, "Starting innkeep");

        let server = self.build_server()?;
        let addr = server.addr();
        let grace = self.config.server.shutdown_timeout();

        let signals = self.shutdown.clone();
        tokio::spawn(async move { signals.wait_for_shutdown().await });

        info!(%addr, token_header = %self.config.auth.token_header, "innkeep is ready");

        let serve = server.run_with_shutdown(self.shutdown.shutdown_signal());
        tokio::pin!(serve);

        let deadline = grace_deadline(self.shutdown.shutdown_signal(), grace);
        tokio::pin!(deadline);

        tokio::select! {
            result = &mut serve => result?,
            _ = &mut deadline => {
                warn!(grace_secs = grace.as_secs(), "Graceful shutdown timed out, dropping open connections");
            }
        }

        info!("innkeep shutdown complete");
        Ok(())
    }
}

/// Resolves `grace` after the shutdown signal fires.
async fn grace_deadline(signal: impl std::future::Future<Output = ()>, grace: Duration) {
    signal.await;
    tokio::time::sleep(grace).await;
}

// =============================================================================
// Config Mapping
// =============================================================================

/// Maps the file configuration onto the server's runtime configuration.
///
/// Fails when the signing secret is absent or blank.
pub fn api_config(config: &InnkeepConfig) -> BinResult<ApiConfig> {
    let secret = config
        .auth
        .secret
        .as_ref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| BinError::settings("auth.secret is not set (INNKEEP_AUTH_SECRET or JWT_SECRET)"))?;

    let jwt = JwtConfig::new(secret.expose()).with_ttl(config.auth.token_ttl());
    jwt.validate()?;

    let cors = &config.server.cors;
    let mut api = ApiConfig::new()
        .with_host(config.server.bind_address)
        .with_port(config.server.port)
        .with_jwt(jwt)
        .with_token_header(config.auth.token_header.clone())
        .with_public_paths(config.auth.public_paths.iter().cloned())
        .with_cors(CorsConfig {
            allowed_origins: cors.allowed_origins.clone(),
            allowed_methods: cors.allowed_methods.clone(),
            allowed_headers: cors.allowed_headers.clone(),
            allow_credentials: cors.allow_credentials,
            max_age: cors.max_age_secs,
        });
    api.request_timeout = config.server.request_timeout();
    api.shutdown_timeout = config.server.shutdown_timeout();

    Ok(api)
}

// =============================================================================
// RuntimeBuilder
// =============================================================================

/// Builder for constructing the runtime.
#[derive(Default)]
pub struct RuntimeBuilder {
    config_path: Option<PathBuf>,
    config: Option<InnkeepConfig>,
    loader: Option<ConfigLoader>,
    port: Option<u16>,
}

impl RuntimeBuilder {
    /// Creates a new runtime builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration file path.
    ///
    /// A missing file falls back to defaults plus environment overrides.
    pub fn config_path(mut self, path: impl AsRef<Path>) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the configuration directly.
    pub fn config(mut self, config: InnkeepConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Replaces the loader, e.g. to inject a fixed environment.
    pub fn loader(mut self, loader: ConfigLoader) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Overrides the listening port.
    pub fn port(mut self, port: Option<u16>) -> Self {
        self.port = port;
        self
    }

    /// Builds the runtime.
    pub fn build(self) -> BinResult<Runtime> {
        let mut config = match self.config {
            Some(config) => {
                config.validate()?;
                config
            }
            None => {
                let path = self
                    .config_path
                    .ok_or_else(|| BinError::settings("No configuration provided"))?;
                let loader = self.loader.unwrap_or_default();
                loader
                    .load_or_default(&path)
                    .map_err(|e| BinError::from(e).context(format!("loading {}", path.display())))?
            }
        };

        if let Some(port) = self.port {
            config.server.port = port;
        }

        Ok(Runtime::new(config))
    }
}

// =============================================================================
// Tests
// =============================================================================
