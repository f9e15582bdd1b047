//! Running a block of work with guaranteed cleanup

use crate::manager::ResourceManager;
use scopekit_core::{Error, Result};
use std::fmt;
use std::panic;
use std::thread;

/// Failure of a managed session.
///
/// When the body fails its error is kept as-is; a cleanup failure that
/// happened afterwards travels with it instead of replacing it.
#[derive(Debug)]
pub enum ScopeError<E> {
    /// The body returned an error. Cleanup still ran.
    Body { error: E, cleanup: Option<Error> },
    /// The body succeeded but the cleanup pass failed.
    Cleanup(Error),
}

impl<E> ScopeError<E> {
    /// The body's error, if the body failed
    pub fn body_error(&self) -> Option<&E> {
        match self {
            ScopeError::Body { error, .. } => Some(error),
            ScopeError::Cleanup(_) => None,
        }
    }

    /// The cleanup failure, whether or not the body also failed
    pub fn cleanup_error(&self) -> Option<&Error> {
        match self {
            ScopeError::Body { cleanup, .. } => cleanup.as_ref(),
            ScopeError::Cleanup(err) => Some(err),
        }
    }

    pub fn into_body_error(self) -> Option<E> {
        match self {
            ScopeError::Body { error, .. } => Some(error),
            ScopeError::Cleanup(_) => None,
        }
    }
}

impl<E: fmt::Display> fmt::Display for ScopeError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeError::Body {
                error,
                cleanup: None,
            } => write!(f, "{error}"),
            ScopeError::Body {
                error,
                cleanup: Some(cleanup),
            } => write!(f, "{error} (cleanup also failed: {cleanup})"),
            ScopeError::Cleanup(err) => write!(f, "{err}"),
        }
    }
}

impl<E> std::error::Error for ScopeError<E>
where
    E: std::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScopeError::Body { error, .. } => Some(error),
            ScopeError::Cleanup(err) => Some(err),
        }
    }
}

/// Combine a session body's outcome with its cleanup result.
///
/// A panicking body is resumed here, after cleanup has already run.
pub(crate) fn finish_session<T, E>(
    outcome: thread::Result<std::result::Result<T, E>>,
    cleanup: Result<()>,
) -> std::result::Result<T, ScopeError<E>> {
    match outcome {
        Ok(Ok(value)) => cleanup.map(|()| value).map_err(ScopeError::Cleanup),
        Ok(Err(error)) => Err(ScopeError::Body {
            error,
            cleanup: cleanup.err(),
        }),
        Err(payload) => {
            if let Err(err) = cleanup {
                tracing::warn!("Cleanup after panic failed: {err}");
            }
            panic::resume_unwind(payload)
        }
    }
}

/// Run `body` with a fresh [`ResourceManager`] and clean up when it returns.
///
/// ```
/// use std::cell::RefCell;
/// use scopekit_memory::with_resources;
///
/// let log = RefCell::new(Vec::new());
/// let result = with_resources(|manager| {
///     manager.register_cleanup(|| log.borrow_mut().push("closed"));
///     Err::<(), _>("query failed")
/// });
///
/// assert_eq!(result.unwrap_err().into_body_error(), Some("query failed"));
/// assert_eq!(*log.borrow(), ["closed"]);
/// ```
pub fn with_resources<'a, T, E, F>(body: F) -> std::result::Result<T, ScopeError<E>>
where
    F: FnOnce(&mut ResourceManager<'a>) -> std::result::Result<T, E>,
{
    ResourceManager::new().session(body)
}
