//! Builder methods for creating errors with context

use super::types::Error;
use crate::types::CleanupFailure;
use std::path::PathBuf;

impl Error {
    /// Create an aggregated cleanup error
    #[must_use]
    pub fn cleanup_failed(attempted: usize, failures: Vec<CleanupFailure>) -> Self {
        Error::CleanupFailed {
            attempted,
            failures,
        }
    }

    /// Create a fail-fast cleanup error
    #[must_use]
    pub fn cleanup_aborted(failure: CleanupFailure, skipped: usize) -> Self {
        Error::CleanupAborted { failure, skipped }
    }

    /// Wrap `source` with a description of what was being attempted
    #[must_use]
    pub fn context(message: impl Into<String>, source: Error) -> Self {
        Error::Context {
            message: message.into(),
            source: Box::new(source),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Create an invalid failure policy error
    #[must_use]
    pub fn invalid_policy(value: impl Into<String>) -> Self {
        Error::InvalidPolicy {
            value: value.into(),
        }
    }

    /// Create a file system error with context
    #[must_use]
    pub fn file_system(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Error::FileSystem {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }
}
