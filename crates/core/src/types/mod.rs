//! Domain types shared by every scopekit crate

mod failure;
mod policy;

pub use failure::{BoxError, CleanupFailure, FailureCause};
pub use policy::FailurePolicy;
