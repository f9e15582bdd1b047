//! Helpers for running code that may panic and rendering what it panicked with.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Render a panic payload as text.
///
/// `panic!` with a literal produces `&'static str`, with format arguments a
/// `String`; anything else is reported opaquely.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Run `f`, turning a panic into `Err(message)`.
///
/// The closure is asserted unwind-safe: callers only use this for cleanup
/// callbacks whose captured state is never observed again after a panic.
pub fn catch_panic<T>(f: impl FnOnce() -> T) -> Result<T, String> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| panic_message(payload.as_ref()))
}
