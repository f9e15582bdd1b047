//! Configuration for scopekit cleanup managers
//!
//! A `CleanupConfig` decides the failure policy of cleanup passes, whether a
//! dropped manager runs its pending callbacks, and how chatty passes are in
//! the logs. `CleanupConfigLoader` resolves it from defaults, an optional JSON
//! file, and `SCOPEKIT_*` environment variables, in that order of precedence.

pub mod config;
pub mod loader;

#[cfg(test)]
mod config_tests;

pub use config::*;
pub use loader::*;
