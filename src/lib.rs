//! Scope-based resource cleanup.
//!
//! This crate re-exports the workspace crates under one name:
//!
//! - **`core`**: errors, failure reports, the failure policy, and constants.
//! - **`config`**: `CleanupConfig` and its file/environment loader.
//! - **`memory`**: the cleanup managers and the RAII resource holders.
//! - **`utils`**: tracing setup and panic helpers.

pub use scopekit_config as config;
pub use scopekit_core as core;
pub use scopekit_memory as memory;
pub use scopekit_utils as utils;

// Re-export commonly used items at the top level
pub use scopekit_config::{CleanupConfig, CleanupConfigLoader};
pub use scopekit_core::{constants, Error, FailurePolicy, Result};
pub use scopekit_memory::{
    scoped_resource, with_resources, ResourceManager, ScopeError, ScopedCleanup, ScopedResource,
    SharedResourceManager, UniqueResource, WeakSharedResourceManager,
};
