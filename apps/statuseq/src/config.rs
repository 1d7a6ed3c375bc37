//! # Configuration
//!
//! Loads the effective statuseq configuration from a TOML file.
//!
//! ## File Layout
//!
//! ```toml
//! [compare]
//! conditions_key = "conditions"
//! retained_condition_fields = []
//! render_diff = true
//!
//! [server]
//! host = "127.0.0.1"
//! port = 8080
//! rate_limit = 100
//! cors_origins = []
//! ```
//!
//! ## Resolution Order
//!
//! 1. `--config <path>` on the command line
//! 2. `STATUSEQ_CONFIG` environment variable
//! 3. `statuseq.toml` in the working directory, if present
//! 4. Built-in defaults
//!
//! An explicitly named file that does not exist is an error. A missing
//! default file is not.

use serde::{Deserialize, Serialize};
use statuseq_core::{CompareOptions, StatusEqError};
use std::path::{Path, PathBuf};

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "statuseq.toml";

/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "STATUSEQ_CONFIG";

/// Maximum configuration file size (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

// =============================================================================
// CONFIGURATION TYPES
// =============================================================================

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Requests per second. 0 disables rate limiting.
    pub rate_limit: u32,
    /// Browser origins allowed to call the API, as `scheme://host[:port]`.
    /// Empty allows none; a lone `"*"` allows any.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            rate_limit: 100,
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Check that every CORS entry is either `"*"` on its own or a bare origin.
    pub fn validate(&self) -> Result<(), StatusEqError> {
        let wildcard = self.cors_origins.iter().any(|origin| origin == "*");
        if wildcard && self.cors_origins.len() > 1 {
            return Err(StatusEqError::Config(
                "server.cors_origins: \"*\" cannot be combined with explicit origins".to_string(),
            ));
        }
        for origin in self.cors_origins.iter().filter(|origin| *origin != "*") {
            if !is_bare_origin(origin) {
                return Err(StatusEqError::Config(format!(
                    "server.cors_origins: '{}' is not of the form scheme://host[:port]",
                    origin
                )));
            }
        }
        Ok(())
    }
}

fn is_bare_origin(origin: &str) -> bool {
    let authority = origin
        .strip_prefix("https://")
        .or_else(|| origin.strip_prefix("http://"));
    match authority {
        Some(rest) => {
            !rest.is_empty()
                && rest
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | ':' | '[' | ']'))
        }
        None => false,
    }
}

/// The complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub compare: CompareOptions,
    pub server: ServerConfig,
}

impl AppConfig {
    /// Parse and validate a configuration document.
    pub fn from_toml_str(source: &str) -> Result<Self, StatusEqError> {
        let config: Self =
            toml::from_str(source).map_err(|e| StatusEqError::Config(e.to_string()))?;
        config.compare.validate()?;
        config.server.validate()?;
        Ok(config)
    }

    /// Render the configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String, StatusEqError> {
        toml::to_string_pretty(self).map_err(|e| StatusEqError::SerializationError(e.to_string()))
    }

    /// Load the effective configuration.
    ///
    /// `explicit` takes precedence over `STATUSEQ_CONFIG`; both must point at
    /// an existing file. Without either, `statuseq.toml` is read if present
    /// and defaults are used otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self, StatusEqError> {
        let from_env = std::env::var(CONFIG_ENV_VAR)
            .ok()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);

        if let Some(path) = explicit.map(Path::to_path_buf).or(from_env) {
            tracing::debug!(path = %path.display(), "Loading configuration");
            return Self::read_file(&path);
        }

        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        if default_path.is_file() {
            tracing::debug!(path = DEFAULT_CONFIG_FILE, "Loading default configuration file");
            Self::read_file(default_path)
        } else {
            tracing::debug!("No configuration file found, using defaults");
            Ok(Self::default())
        }
    }

    fn read_file(path: &Path) -> Result<Self, StatusEqError> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            StatusEqError::Config(format!("Cannot read '{}': {}", path.display(), e))
        })?;

        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(StatusEqError::Config(format!(
                "Configuration file {} bytes exceeds maximum allowed {} bytes",
                metadata.len(),
                MAX_CONFIG_FILE_SIZE
            )));
        }

        let source = std::fs::read_to_string(path).map_err(|e| {
            StatusEqError::Config(format!("Cannot read '{}': {}", path.display(), e))
        })?;

        Self::from_toml_str(&source)
    }
}

// =============================================================================
// TESTS
// =============================================================================
