//! Generator configuration
//!
//! Settings can live in an `apigen.toml` next to the input file (or any path
//! passed with `--config`). Every key is optional:
//!
//! ```toml
//! marker = "apigen:api"
//! validator_attr = "apivalidator"
//! runtime_path = "::apigen::runtime"
//!
//! [auth]
//! header = "Authorization"
//! token = "100500"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{GenerateError, Result};

/// File name looked up next to the input when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = "apigen.toml";

/// Credential check emitted into handlers whose endpoint requires auth.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AuthConfig {
    /// Request header carrying the credential
    pub header: String,
    /// Expected credential value
    pub token: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            header: "Authorization".to_string(),
            token: "100500".to_string(),
        }
    }
}

/// Generator configuration loaded from `apigen.toml`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Prefix that marks a doc comment as an annotation payload
    pub marker: String,
    /// Field attribute holding the raw constraint string
    pub validator_attr: String,
    /// Path the generated code uses to reach the runtime support library
    pub runtime_path: String,
    /// Credential check settings
    pub auth: AuthConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            marker: "apigen:api".to_string(),
            validator_attr: "apivalidator".to_string(),
            runtime_path: "::apigen::runtime".to_string(),
            auth: AuthConfig::default(),
        }
    }
}

impl GeneratorConfig {
    /// Override the auth settings with values given on the command line.
    pub fn with_auth_overrides(mut self, header: Option<&str>, token: Option<&str>) -> Self {
        if let Some(header) = header {
            self.auth.header = header.to_string();
        }
        if let Some(token) = token {
            self.auth.token = token.to_string();
        }
        self
    }
}

/// Load a configuration file
///
/// Returns `Ok(None)` if the file does not exist (not an error) and `Err`
/// if it exists but cannot be read or parsed.
pub fn load_config(config_path: &Path) -> Result<Option<GeneratorConfig>> {
    if !config_path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(config_path).map_err(|e| GenerateError::Config {
        path: config_path.to_path_buf(),
        message: e.to_string(),
    })?;
    let config: GeneratorConfig = toml::from_str(&contents).map_err(|e| GenerateError::Config {
        path: config_path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(Some(config))
}

/// Look for `apigen.toml` in the same directory as the input file.
pub fn auto_detect_config_path(input_path: &Path) -> Option<PathBuf> {
    let dir = match input_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let config_path = dir.join(CONFIG_FILE_NAME);
    config_path.exists().then_some(config_path)
}

/// Resolve and load the configuration for a run
///
/// Priority:
/// 1. Explicitly provided path (must exist)
/// 2. `apigen.toml` auto-detected alongside the input
/// 3. Defaults
pub fn resolve_config(explicit_path: Option<&Path>, input_path: &Path) -> Result<GeneratorConfig> {
    if let Some(path) = explicit_path {
        return load_config(path)?.ok_or_else(|| GenerateError::Config {
            path: path.to_path_buf(),
            message: "file does not exist".to_string(),
        });
    }
    match auto_detect_config_path(input_path) {
        Some(path) => {
            tracing::debug!(config = %path.display(), "Using auto-detected config");
            Ok(load_config(&path)?.unwrap_or_default())
        }
        None => Ok(GeneratorConfig::default()),
    }
}
