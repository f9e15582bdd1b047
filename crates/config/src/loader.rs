//! Configuration loading with precedence: defaults < config file < environment

use crate::config::{CleanupConfig, CleanupConfigOverrides};
use scopekit_core::{
    Error, FailurePolicy, Result, ResultExt, CONFIG_DIR_NAME, CONFIG_FILE_NAME,
    SCOPEKIT_AUTO_CLEANUP_VAR, SCOPEKIT_FAILURE_POLICY_VAR, SCOPEKIT_LOG_CALLBACKS_VAR,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Source of configuration for debugging and precedence tracking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default configuration
    Default,
    /// Configuration file
    ConfigFile(PathBuf),
    /// Environment variable
    EnvironmentVariable(String),
}

/// A resolved configuration together with the highest-precedence source that
/// contributed to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub config: CleanupConfig,
    pub source: ConfigSource,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            config: CleanupConfig::default(),
            source: ConfigSource::Default,
        }
    }
}

/// On-disk layout: cleanup settings live under a `cleanup` key so the file can
/// be shared with other tools
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    cleanup: Option<CleanupConfigOverrides>,
}

/// Configuration loader that handles precedence
pub struct CleanupConfigLoader;

impl CleanupConfigLoader {
    /// Load configuration from the default file location and the environment
    pub fn load() -> Result<ResolvedConfig> {
        let path = Self::default_config_path();
        Self::load_from(path.as_deref())
    }

    /// Load configuration from an explicit file (if any) and the environment
    pub fn load_from(path: Option<&Path>) -> Result<ResolvedConfig> {
        Self::resolve(path, |name| std::env::var(name).ok())
    }

    /// Resolve configuration using `lookup` in place of the process environment
    pub fn resolve<F>(path: Option<&Path>, lookup: F) -> Result<ResolvedConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut resolved = ResolvedConfig::default();

        if let Some(path) = path {
            if let Some(overrides) = Self::load_from_file(path)? {
                resolved.config.apply(&overrides);
                resolved.source = ConfigSource::ConfigFile(path.to_path_buf());
            }
        }

        let env_overrides = Self::overrides_from(lookup)?;
        if !env_overrides.is_empty() {
            resolved.config.apply(&env_overrides);
            resolved.source = ConfigSource::EnvironmentVariable("SCOPEKIT_*".to_string());
        }

        tracing::debug!(
            source = ?resolved.source,
            policy = %resolved.config.failure_policy,
            "Resolved cleanup configuration"
        );

        Ok(resolved)
    }

    /// Read the `cleanup` section of a JSON config file.
    ///
    /// A missing file, or a file without a `cleanup` section, yields `None`.
    pub fn load_from_file(path: &Path) -> Result<Option<CleanupConfigOverrides>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::file_system(path, "read config file", e))?;

        let file: ConfigFile = serde_json::from_str(&content)
            .with_context(|| format!("invalid config file '{}'", path.display()))?;

        Ok(file.cleanup.filter(|overrides| !overrides.is_empty()))
    }

    /// Read overrides from the `SCOPEKIT_*` environment variables
    pub fn load_from_env() -> Result<CleanupConfigOverrides> {
        Self::overrides_from(|name| std::env::var(name).ok())
    }

    fn overrides_from<F>(lookup: F) -> Result<CleanupConfigOverrides>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut overrides = CleanupConfigOverrides::default();

        if let Some(value) = lookup(SCOPEKIT_FAILURE_POLICY_VAR) {
            let policy = value
                .parse::<FailurePolicy>()
                .context(SCOPEKIT_FAILURE_POLICY_VAR)?;
            overrides.failure_policy = Some(policy);
        }

        if let Some(value) = lookup(SCOPEKIT_AUTO_CLEANUP_VAR) {
            overrides.automatic_cleanup = Some(parse_flag(SCOPEKIT_AUTO_CLEANUP_VAR, &value)?);
        }

        if let Some(value) = lookup(SCOPEKIT_LOG_CALLBACKS_VAR) {
            overrides.log_each_callback = Some(parse_flag(SCOPEKIT_LOG_CALLBACKS_VAR, &value)?);
        }

        Ok(overrides)
    }

    /// `$XDG_CONFIG_HOME/scopekit/config.json`, falling back to the platform
    /// config directory
    pub fn default_config_path() -> Option<PathBuf> {
        let config_dir = match std::env::var("XDG_CONFIG_HOME") {
            Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => dirs::config_dir()?,
        };
        Some(config_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }
}

fn parse_flag(variable: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::configuration(format!(
            "{variable}: expected a boolean, got '{value}'"
        ))),
    }
}
