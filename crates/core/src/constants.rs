/// Constants used throughout the scopekit codebase
// Environment variable names
pub const SCOPEKIT_FAILURE_POLICY_VAR: &str = "SCOPEKIT_FAILURE_POLICY";
pub const SCOPEKIT_AUTO_CLEANUP_VAR: &str = "SCOPEKIT_AUTO_CLEANUP";
pub const SCOPEKIT_LOG_CALLBACKS_VAR: &str = "SCOPEKIT_LOG_CALLBACKS";

// Configuration file
pub const CONFIG_DIR_NAME: &str = "scopekit";
pub const CONFIG_FILE_NAME: &str = "config.json";

// Default tracing filter when RUST_LOG is unset
pub const DEFAULT_LOG_FILTER: &str = "info";
