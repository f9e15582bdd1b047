//! Core error type definitions

use crate::types::CleanupFailure;
use std::path::PathBuf;

/// Result type alias for scopekit operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for scopekit operations using thiserror
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// One or more callbacks failed during a continue-and-aggregate pass.
    /// Every pending callback was attempted.
    CleanupFailed {
        attempted: usize,
        failures: Vec<CleanupFailure>,
    },

    /// A fail-fast pass stopped at its first failure; `skipped` callbacks
    /// were discarded without running.
    CleanupAborted {
        #[source]
        failure: CleanupFailure,
        skipped: usize,
    },

    /// Another error with a description of what was being attempted
    Context {
        message: String,
        #[source]
        source: Box<Error>,
    },

    /// Configuration errors
    Configuration { message: String },

    /// Unrecognised failure policy name
    InvalidPolicy { value: String },

    /// File system operations
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization errors
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// Failures recorded by a cleanup pass, in execution order.
    ///
    /// Empty for errors that did not come from a cleanup pass.
    pub fn failures(&self) -> &[CleanupFailure] {
        match self {
            Error::CleanupFailed { failures, .. } => failures,
            Error::CleanupAborted { failure, .. } => std::slice::from_ref(failure),
            Error::Context { source, .. } => source.failures(),
            _ => &[],
        }
    }

    /// Whether this error was produced by a cleanup pass
    pub fn is_cleanup_error(&self) -> bool {
        matches!(
            self.root(),
            Error::CleanupFailed { .. } | Error::CleanupAborted { .. }
        )
    }

    /// The innermost error beneath any context layers
    pub fn root(&self) -> &Error {
        let mut current = self;
        while let Error::Context { source, .. } = current {
            current = &**source;
        }
        current
    }
}
