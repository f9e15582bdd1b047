//! Core domain types, errors, and constants for `scopekit`.
//!
//! ## Key Components
//!
//! - **`errors`**: Defines the primary `Error` enum and `Result` type alias,
//!   centralizing every way a cleanup pass or configuration load can fail.
//! - **`types`**: `FailurePolicy`, which decides what a cleanup pass does when a
//!   callback fails, and `CleanupFailure`, the record of one such failure.
//! - **`constants`**: Environment variable names and configuration defaults.

pub mod constants;
pub mod errors;
pub mod types;

pub use self::{
    constants::*,
    errors::{Error, Result, ResultExt},
    types::*,
};
