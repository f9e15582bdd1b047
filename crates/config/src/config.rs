//! Cleanup configuration values and their builder

use scopekit_core::FailurePolicy;
use serde::{Deserialize, Serialize};

/// Settings applied to a cleanup manager at construction.
///
/// Immutable once handed to a manager; managers copy the fields they need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanupConfig {
    /// Behaviour when a callback fails during a pass
    pub failure_policy: FailurePolicy,
    /// Run pending callbacks when a manager is dropped
    pub automatic_cleanup: bool,
    /// Emit a trace event for every callback as it runs
    pub log_each_callback: bool,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            failure_policy: FailurePolicy::ContinueAndAggregate,
            automatic_cleanup: true,
            log_each_callback: false,
        }
    }
}

impl CleanupConfig {
    /// Start building a configuration from the defaults
    pub fn builder() -> CleanupConfigBuilder {
        CleanupConfigBuilder::new()
    }

    /// Apply every override that is set, leaving the rest untouched
    pub fn apply(&mut self, overrides: &CleanupConfigOverrides) {
        if let Some(policy) = overrides.failure_policy {
            self.failure_policy = policy;
        }
        if let Some(automatic) = overrides.automatic_cleanup {
            self.automatic_cleanup = automatic;
        }
        if let Some(log_each) = overrides.log_each_callback {
            self.log_each_callback = log_each;
        }
    }
}

/// Partial configuration as read from a file or the environment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanupConfigOverrides {
    pub failure_policy: Option<FailurePolicy>,
    pub automatic_cleanup: Option<bool>,
    pub log_each_callback: Option<bool>,
}

impl CleanupConfigOverrides {
    pub fn is_empty(&self) -> bool {
        self.failure_policy.is_none()
            && self.automatic_cleanup.is_none()
            && self.log_each_callback.is_none()
    }
}

/// Builder for creating cleanup configurations
#[derive(Debug, Default)]
pub struct CleanupConfigBuilder {
    config: CleanupConfig,
}

impl CleanupConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: CleanupConfig::default(),
        }
    }

    /// Set the failure policy
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.config.failure_policy = policy;
        self
    }

    /// Enable or disable cleanup on drop
    pub fn with_automatic_cleanup(mut self, enabled: bool) -> Self {
        self.config.automatic_cleanup = enabled;
        self
    }

    /// Enable or disable per-callback trace events
    pub fn with_callback_logging(mut self, enabled: bool) -> Self {
        self.config.log_each_callback = enabled;
        self
    }

    /// Build the configuration
    pub fn build(self) -> CleanupConfig {
        self.config
    }
}
