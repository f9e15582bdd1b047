//! Scope-based resource cleanup.
//!
//! ## Key Components
//!
//! - **`manager`**: `ResourceManager`, which collects cleanup callbacks during a
//!   session and runs them last-registered-first when the session ends.
//! - **`shared`**: `SharedResourceManager`, the same discipline behind a lock
//!   for callbacks registered from several threads.
//! - **`scoped`**: `ScopedResource` and `ScopedCleanup`, single-callback guards
//!   that fire when they go out of scope.
//! - **`unique`**: `UniqueResource`, an owned value with a custom deleter.
//! - **`session`**: `ScopeError` and `with_resources`, for running a block of
//!   work with guaranteed cleanup and keeping both the block's error and any
//!   cleanup failure.
//!
//! ```
//! use std::cell::RefCell;
//! use scopekit_memory::ResourceManager;
//!
//! let log = RefCell::new(Vec::new());
//! let mut manager = ResourceManager::new();
//! manager.register_cleanup(|| log.borrow_mut().push("connection"));
//! manager.register_cleanup(|| log.borrow_mut().push("transaction"));
//! manager.execute_cleanup().unwrap();
//! assert_eq!(*log.borrow(), ["transaction", "connection"]);
//! ```

mod pass;

pub mod manager;
pub mod scoped;
pub mod session;
pub mod shared;
pub mod unique;

pub use manager::ResourceManager;
pub use scoped::{scoped_resource, ScopedCleanup, ScopedResource};
pub use session::{with_resources, ScopeError};
pub use shared::{SharedResourceManager, WeakSharedResourceManager};
pub use unique::UniqueResource;

pub use scopekit_config::CleanupConfig;
pub use scopekit_core::{BoxError, CleanupFailure, Error, FailureCause, FailurePolicy, Result};
