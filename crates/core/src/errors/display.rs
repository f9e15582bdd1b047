//! Display implementations for error types

use super::types::Error;
use std::fmt;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::CleanupFailed {
                attempted,
                failures,
            } => {
                write!(
                    f,
                    "{} of {} cleanup callbacks failed",
                    failures.len(),
                    attempted
                )?;
                for failure in failures {
                    write!(f, "; {failure}")?;
                }
                Ok(())
            }
            Error::CleanupAborted { failure, skipped } => {
                write!(
                    f,
                    "cleanup aborted after failure ({failure}); {skipped} callbacks skipped"
                )
            }
            Error::Context { message, source } => write!(f, "{message}: {source}"),
            Error::Configuration { message } => {
                write!(f, "configuration error: {message}")
            }
            Error::InvalidPolicy { value } => {
                write!(
                    f,
                    "unknown failure policy '{value}' (expected 'continue' or 'fail-fast')"
                )
            }
            Error::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "file system {} operation failed for '{}': {}",
                    operation,
                    path.display(),
                    source
                )
            }
            Error::Json { message, .. } => {
                write!(f, "JSON error: {message}")
            }
        }
    }
}
