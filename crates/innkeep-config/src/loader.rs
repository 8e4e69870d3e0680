// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration loading and processing for innkeep.
//!
//! # Loading Pipeline
//!
//! 1. Read the file (or start from defaults when it is absent and allowed)
//! 2. Resolve `${VAR}` / `${VAR:default}` placeholders in the raw text
//! 3. Parse YAML/TOML/JSON into [`InnkeepConfig`]
//! 4. Apply `INNKEEP_*` environment overrides
//! 5. Validate
//!
//! # Environment Variable Override
//!
//! ```text
//! INNKEEP_SERVER_PORT=8080
//! INNKEEP_BIND_ADDRESS=127.0.0.1
//! INNKEEP_AUTH_SECRET=change-me        (JWT_SECRET is also accepted)
//! INNKEEP_TOKEN_TTL_SECS=3600
//! INNKEEP_LOG_LEVEL=debug
//! INNKEEP_LOG_FORMAT=json
//! ```

use crate::error::{ConfigError, ConfigResult};
use crate::schema::{InnkeepConfig, LogFormat, LogLevel, SecretValue};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Fallback variable for the signing secret.
pub const LEGACY_SECRET_VAR: &str = "JWT_SECRET";

/// Looks up an environment variable by name.
pub type EnvSource = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

// =============================================================================
// ConfigLoader
// =============================================================================

/// Configuration loader for innkeep.
///
/// # Examples
///
/// ```no_run
/// use innkeep_config::loader::ConfigLoader;
///
/// let loader = ConfigLoader::new();
/// let config = loader.load("innkeep.yaml").unwrap();
/// ```
#[derive(Clone)]
pub struct ConfigLoader {
    /// Environment variable prefix.
    env_prefix: String,

    /// Whether to resolve placeholders and apply overrides.
    resolve_env_vars: bool,

    /// Where environment variables are read from.
    env: EnvSource,
}

impl ConfigLoader {
    /// Creates a loader reading the process environment.
    pub fn new() -> Self {
        Self {
            env_prefix: "INNKEEP".to_string(),
            resolve_env_vars: true,
            env: Arc::new(|name: &str| std::env::var(name).ok()),
        }
    }

    /// Creates a builder for configuring the loader.
    pub fn builder() -> ConfigLoaderBuilder {
        ConfigLoaderBuilder::new()
    }

    /// Sets the environment variable prefix.
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Enables or disables environment variable resolution.
    pub fn with_env_vars(mut self, enabled: bool) -> Self {
        self.resolve_env_vars = enabled;
        self
    }

    /// Replaces the environment with a custom lookup.
    pub fn with_env_source<F>(mut self, source: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.env = Arc::new(source);
        self
    }

    /// Replaces the environment with a fixed map.
    pub fn with_env_map(self, vars: HashMap<String, String>) -> Self {
        self.with_env_source(move |name| vars.get(name).cloned())
    }

    /// Loads configuration from a file.
    ///
    /// The file format is determined by the file extension:
    /// - `.yaml` or `.yml` - YAML format
    /// - `.toml` - TOML format
    /// - `.json` - JSON format
    pub fn load(&self, path: impl AsRef<Path>) -> ConfigResult<InnkeepConfig> {
        let path = path.as_ref();
        info!(path = %path.display(), "Loading configuration");

        let content = self.read_file(path)?;
        let format = ConfigFormat::from_path(path)?;
        let mut config = self.parse_content(&content, format, path)?;

        self.finish(&mut config)?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Loads from `path` if it exists, otherwise from defaults.
    ///
    /// Environment overrides and validation apply either way.
    pub fn load_or_default(&self, path: impl AsRef<Path>) -> ConfigResult<InnkeepConfig> {
        let path = path.as_ref();
        if path.exists() {
            return self.load(path);
        }

        warn!(path = %path.display(), "Config file not found, using defaults and environment");
        self.load_defaults()
    }

    /// Builds configuration from defaults plus environment overrides.
    pub fn load_defaults(&self) -> ConfigResult<InnkeepConfig> {
        let mut config = InnkeepConfig::default();
        self.finish(&mut config)?;
        Ok(config)
    }

    /// Loads configuration from a string.
    pub fn load_from_str(&self, content: &str, format: ConfigFormat) -> ConfigResult<InnkeepConfig> {
        let content = self.maybe_resolve_placeholders(content);
        let mut config = parse_str(&content, format)?;
        self.finish(&mut config)?;
        Ok(config)
    }

    fn finish(&self, config: &mut InnkeepConfig) -> ConfigResult<()> {
        if self.resolve_env_vars {
            self.apply_env_overrides(config)?;
        }
        config.validate()?;
        debug!(
            port = config.server.port,
            token_ttl_secs = config.auth.token_ttl_secs,
            "Configuration validated"
        );
        Ok(())
    }

    fn read_file(&self, path: &Path) -> ConfigResult<String> {
        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }
        fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))
    }

    fn parse_content(
        &self,
        content: &str,
        format: ConfigFormat,
        path: &Path,
    ) -> ConfigResult<InnkeepConfig> {
        let content = self.maybe_resolve_placeholders(content);
        parse_str(&content, format).map_err(|e| match e {
            ConfigError::Serialization { message } => ConfigError::parse(path, message),
            other => other,
        })
    }

    fn maybe_resolve_placeholders(&self, content: &str) -> String {
        if self.resolve_env_vars {
            self.resolve_env_placeholders(content)
        } else {
            content.to_string()
        }
    }

    /// Resolves `${VAR_NAME}` and `${VAR_NAME:default}` placeholders.
    ///
    /// An unset variable without a default keeps its placeholder text.
    fn resolve_env_placeholders(&self, content: &str) -> String {
        let mut result = String::with_capacity(content.len());
        let mut chars = content.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '$' || chars.peek() != Some(&'{') {
                result.push(c);
                continue;
            }
            chars.next();

            let mut body = String::new();
            let mut closed = false;
            for c in chars.by_ref() {
                if c == '}' {
                    closed = true;
                    break;
                }
                body.push(c);
            }

            if !closed {
                result.push_str("${");
                result.push_str(&body);
                continue;
            }

            let (name, default) = match body.split_once(':') {
                Some((name, default)) => (name, Some(default)),
                None => (body.as_str(), None),
            };

            match ((self.env)(name), default) {
                (Some(value), _) => result.push_str(&value),
                (None, Some(default)) => result.push_str(default),
                (None, None) => {
                    warn!(variable = name, "Environment variable not found");
                    result.push_str("${");
                    result.push_str(name);
                    result.push('}');
                }
            }
        }

        result
    }

    fn var(&self, suffix: &str) -> (String, Option<String>) {
        let name = format!("{}_{}", self.env_prefix, suffix);
        let value = (self.env)(&name);
        (name, value)
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&self, config: &mut InnkeepConfig) -> ConfigResult<()> {
        if let (name, Some(value)) = self.var("SERVER_PORT") {
            config.server.port = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid_env_var(name, "expected valid port number"))?;
        }
        if let (name, Some(value)) = self.var("BIND_ADDRESS") {
            config.server.bind_address = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid_env_var(name, "expected IP address"))?;
        }

        match self.var("AUTH_SECRET") {
            (_, Some(value)) => config.auth.secret = Some(SecretValue::new(value)),
            (_, None) => {
                if let Some(value) = (self.env)(LEGACY_SECRET_VAR) {
                    config.auth.secret = Some(SecretValue::new(value));
                }
            }
        }

        if let (name, Some(value)) = self.var("TOKEN_TTL_SECS") {
            config.auth.token_ttl_secs = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid_env_var(name, "expected number of seconds"))?;
        }
        if let (name, Some(value)) = self.var("LOG_LEVEL") {
            config.logging.level = value
                .parse::<LogLevel>()
                .map_err(|_| ConfigError::invalid_env_var(name, "expected trace|debug|info|warn|error"))?;
        }
        if let (name, Some(value)) = self.var("LOG_FORMAT") {
            config.logging.format = parse_log_format(&value)
                .ok_or_else(|| ConfigError::invalid_env_var(name, "expected text|compact|json"))?;
        }

        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ConfigLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigLoader")
            .field("env_prefix", &self.env_prefix)
            .field("resolve_env_vars", &self.resolve_env_vars)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// ConfigLoaderBuilder
// =============================================================================

/// Builder for ConfigLoader.
#[derive(Default)]
pub struct ConfigLoaderBuilder {
    env_prefix: Option<String>,
    resolve_env_vars: Option<bool>,
    env: Option<EnvSource>,
}

impl ConfigLoaderBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the environment prefix.
    pub fn env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// Enables or disables environment variable resolution.
    pub fn resolve_env_vars(mut self, enabled: bool) -> Self {
        self.resolve_env_vars = Some(enabled);
        self
    }

    /// Reads variables from a fixed map instead of the process environment.
    pub fn env_vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: HashMap<String, String> =
            vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self.env = Some(Arc::new(move |name: &str| vars.get(name).cloned()));
        self
    }

    /// Builds the ConfigLoader.
    pub fn build(self) -> ConfigLoader {
        let mut loader = ConfigLoader::new();

        if let Some(prefix) = self.env_prefix {
            loader.env_prefix = prefix;
        }
        if let Some(resolve_env_vars) = self.resolve_env_vars {
            loader.resolve_env_vars = resolve_env_vars;
        }
        if let Some(env) = self.env {
            loader.env = env;
        }

        loader
    }
}

// =============================================================================
// ConfigFormat
// =============================================================================

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format.
    Yaml,
    /// TOML format.
    Toml,
    /// JSON format.
    Json,
}

impl ConfigFormat {
    /// Determines the format from a file path.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            Some("toml") => Ok(ConfigFormat::Toml),
            Some("json") => Ok(ConfigFormat::Json),
            Some(other) => Err(ConfigError::unsupported_format(other)),
            None => Err(ConfigError::unsupported_format("(no extension)")),
        }
    }

    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Yaml => "yaml",
            ConfigFormat::Toml => "toml",
            ConfigFormat::Json => "json",
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn parse_str(content: &str, format: ConfigFormat) -> ConfigResult<InnkeepConfig> {
    match format {
        ConfigFormat::Yaml => yaml_parse(content),
        ConfigFormat::Toml => {
            toml::from_str(content).map_err(|e| ConfigError::serialization(e.to_string()))
        }
        ConfigFormat::Json => {
            serde_json::from_str(content).map_err(|e| ConfigError::serialization(e.to_string()))
        }
    }
}

fn parse_log_format(value: &str) -> Option<LogFormat> {
    match value.trim().to_lowercase().as_str() {
        "text" | "pretty" => Some(LogFormat::Text),
        "compact" => Some(LogFormat::Compact),
        "json" => Some(LogFormat::Json),
        _ => None,
    }
}

/// YAML parsing through the `config` crate.
fn yaml_parse<T: DeserializeOwned>(content: &str) -> ConfigResult<T> {
    let config = config::Config::builder()
        .add_source(config::File::from_str(content, config::FileFormat::Yaml))
        .build()
        .map_err(|e| ConfigError::serialization(e.to_string()))?;

    config
        .try_deserialize()
        .map_err(|e| ConfigError::serialization(e.to_string()))
}

// =============================================================================
// Convenience Functions
// =============================================================================

/// Loads configuration from a file with default settings.
///
/// # Examples
///
/// ```no_run
/// use innkeep_config::loader::load_config;
///
/// let config = load_config("innkeep.yaml").unwrap();
/// ```
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<InnkeepConfig> {
    ConfigLoader::new().load(path)
}

/// Loads configuration from a string with the specified format.
pub fn load_config_str(content: &str, format: ConfigFormat) -> ConfigResult<InnkeepConfig> {
    ConfigLoader::new().load_from_str(content, format)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn hermetic(vars: &[(&str, &str)]) -> ConfigLoader {
        ConfigLoader::builder()
            .env_vars(vars.iter().map(|(k, v)| (k.to_string(), v.to_string())))
            .build()
    }

    const YAML: &str = r#"
server:
  port: 8081
auth:
  secret: file-secret
  token_ttl_secs: 600
logging:
  level: debug
"#;

    #[test]
    fn test_load_yaml() {
        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        file.write_all(YAML.as_bytes()).unwrap();

        let config = hermetic(&[]).load(file.path()).unwrap();

        assert_eq!(config.server.port, 8081);
        assert_eq!(config.auth.token_ttl_secs, 600);
        assert_eq!(config.auth.secret.as_ref().unwrap().expose(), "file-secret");
        assert_eq!(config.logging.level, LogLevel::Debug);
    }

    #[test]
    fn test_config_format_from_path() {
        assert_eq!(ConfigFormat::from_path(Path::new("a.yml")).unwrap(), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("a.TOML")).unwrap(), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(Path::new("a.json")).unwrap(), ConfigFormat::Json);
        assert!(ConfigFormat::from_path(Path::new("a.ini")).is_err());
        assert!(ConfigFormat::from_path(Path::new("innkeep")).is_err());
    }

    #[test]
    fn test_env_placeholder_resolution() {
        let loader = hermetic(&[("HOTEL_SECRET", "from-env")]);
        assert_eq!(loader.resolve_env_placeholders("secret: ${HOTEL_SECRET}"), "secret: from-env");
    }

    #[test]
    fn test_env_placeholder_with_default() {
        let loader = hermetic(&[]);
        assert_eq!(
            loader.resolve_env_placeholders("port: ${NONEXISTENT_PORT:5001}"),
            "port: 5001"
        );
    }

    #[test]
    fn test_unresolved_placeholder_kept() {
        let loader = hermetic(&[]);
        assert_eq!(loader.resolve_env_placeholders("a: ${MISSING}"), "a: ${MISSING}");
        assert_eq!(loader.resolve_env_placeholders("a: ${OPEN"), "a: ${OPEN");
    }

    #[test]
    fn test_env_overrides_file_values() {
        let loader = hermetic(&[
            ("INNKEEP_SERVER_PORT", "9000"),
            ("INNKEEP_AUTH_SECRET", "env-secret"),
            ("INNKEEP_TOKEN_TTL_SECS", "120"),
        ]);
        let config = loader.load_from_str(YAML, ConfigFormat::Yaml).unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.auth.secret.as_ref().unwrap().expose(), "env-secret");
        assert_eq!(config.auth.token_ttl_secs, 120);
    }

    #[test]
    fn test_legacy_secret_variable() {
        let config = hermetic(&[("JWT_SECRET", "legacy")]).load_defaults().unwrap();
        assert_eq!(config.auth.secret.as_ref().unwrap().expose(), "legacy");
    }

    #[test]
    fn test_prefixed_secret_wins_over_legacy() {
        let config = hermetic(&[("JWT_SECRET", "legacy"), ("INNKEEP_AUTH_SECRET", "current")])
            .load_defaults()
            .unwrap();
        assert_eq!(config.auth.secret.as_ref().unwrap().expose(), "current");
    }

    #[test]
    fn test_invalid_port_override() {
        let err = hermetic(&[("INNKEEP_SERVER_PORT", "eighty"), ("JWT_SECRET", "s")])
            .load_defaults()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar { .. }));
    }

    #[test]
    fn test_defaults_without_secret_fail() {
        let err = hermetic(&[]).load_defaults().unwrap_err();
        assert!(matches!(err, ConfigError::MissingField { .. }));
    }

    #[test]
    fn test_empty_env_secret_fails() {
        let err = hermetic(&[("INNKEEP_AUTH_SECRET", "")]).load_defaults().unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = hermetic(&[("JWT_SECRET", "s3cr3t")])
            .load_or_default("/nonexistent/innkeep.yaml")
            .unwrap();
        assert_eq!(config.server.port, crate::schema::DEFAULT_PORT);
    }

    #[test]
    fn test_file_not_found() {
        let result = hermetic(&[]).load("/nonexistent/path/innkeep.yaml");
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }

    #[test]
    fn test_unknown_field_is_parse_error() {
        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        file.write_all(br#"{"auth": {"secret": "x", "bogus": 1}}"#).unwrap();

        let err = hermetic(&[]).load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_loader_builder() {
        let loader = ConfigLoader::builder()
            .env_prefix("HOTEL")
            .resolve_env_vars(false)
            .build();

        assert_eq!(loader.env_prefix, "HOTEL");
        assert!(!loader.resolve_env_vars);
    }
}
