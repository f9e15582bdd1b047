//! Extension traits for error handling

use super::types::{Error, Result};

/// Extension trait for adding context to Results.
///
/// The original error is kept as the source of an [`Error::Context`], so its
/// variant survives and can be recovered with [`Error::root`].
pub trait ResultExt<T> {
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Like [`context`](ResultExt::context), building the message only on error
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<Error>,
{
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::context(message, e.into()))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| Error::context(f(), e.into()))
    }
}
