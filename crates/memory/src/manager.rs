//! Single-threaded LIFO cleanup manager

use crate::pass::{run_pass, run_pass_logged, CleanupRegistry, CleanupResult, PassOptions};
use crate::session::{finish_session, ScopeError};
use scopekit_config::CleanupConfig;
use scopekit_core::{BoxError, FailurePolicy, Result};
use std::borrow::Cow;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

type LocalAction<'a> = Box<dyn FnOnce() -> CleanupResult + 'a>;

/// Collects cleanup callbacks and runs them in reverse registration order.
///
/// Callbacks may borrow from the enclosing scope for `'a`. The manager is
/// neither `Send` nor `Sync`; use [`SharedResourceManager`] when callbacks
/// are registered from several threads.
///
/// A pass (`execute_cleanup`, `execute_cleanup_logged`, or the end of a
/// [`session`]) always leaves the manager empty, so it can be reused for the
/// next batch. If the manager is dropped with callbacks still pending they
/// are run as by `execute_cleanup_logged`, unless
/// [`disable_automatic_cleanup`] was called.
///
/// [`SharedResourceManager`]: crate::SharedResourceManager
/// [`session`]: ResourceManager::session
/// [`disable_automatic_cleanup`]: ResourceManager::disable_automatic_cleanup
pub struct ResourceManager<'a> {
    registry: CleanupRegistry<LocalAction<'a>>,
    policy: FailurePolicy,
    automatic_cleanup: bool,
    log_each_callback: bool,
}

impl<'a> ResourceManager<'a> {
    /// Create an empty manager with the default configuration
    pub fn new() -> Self {
        Self::with_config(&CleanupConfig::default())
    }

    pub fn with_config(config: &CleanupConfig) -> Self {
        Self {
            registry: CleanupRegistry::new(),
            policy: config.failure_policy,
            automatic_cleanup: config.automatic_cleanup,
            log_each_callback: config.log_each_callback,
        }
    }

    pub fn with_policy(policy: FailurePolicy) -> Self {
        Self::with_config(&CleanupConfig {
            failure_policy: policy,
            ..CleanupConfig::default()
        })
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Register a cleanup callback. It is stored, not invoked.
    pub fn register_cleanup<F>(&mut self, cleanup: F)
    where
        F: FnOnce() + 'a,
    {
        self.registry.register(None, infallible(cleanup));
    }

    /// Register a callback whose error is reported by the pass that runs it
    pub fn register_fallible_cleanup<F, E>(&mut self, cleanup: F)
    where
        F: FnOnce() -> std::result::Result<(), E> + 'a,
        E: Into<BoxError>,
    {
        self.registry.register(None, fallible(cleanup));
    }

    /// Register a callback with a label used in logs and failure reports
    pub fn register_named_cleanup<F>(&mut self, label: impl Into<Cow<'static, str>>, cleanup: F)
    where
        F: FnOnce() + 'a,
    {
        self.registry
            .register(Some(label.into()), infallible(cleanup));
    }

    /// Run every pending callback, last registered first, and clear the list.
    ///
    /// With nothing pending this is a no-op. Failures (returned errors or
    /// panics) are handled according to the manager's [`FailurePolicy`].
    pub fn execute_cleanup(&mut self) -> Result<()> {
        run_pass(self.registry.take(), self.pass_options())
    }

    /// Run every pending callback regardless of failures and return how many
    /// failed. Each failure is logged as a warning.
    pub fn execute_cleanup_logged(&mut self) -> usize {
        run_pass_logged(self.registry.take(), self.log_each_callback)
    }

    /// Number of callbacks registered since the last pass
    pub fn pending(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Leave pending callbacks unrun when the manager is dropped
    pub fn disable_automatic_cleanup(&mut self) {
        self.automatic_cleanup = false;
    }

    pub fn automatic_cleanup(&self) -> bool {
        self.automatic_cleanup
    }

    pub fn create_unique<T>(&self, value: T) -> Box<T> {
        Box::new(value)
    }

    pub fn create_shared<T>(&self, value: T) -> Rc<T> {
        Rc::new(value)
    }

    /// Share `value` and register `release` to be called with it during the
    /// next pass. The manager holds its own reference until then.
    pub fn create_managed<T, F>(&mut self, value: T, release: F) -> Rc<T>
    where
        T: 'a,
        F: FnOnce(&T) + 'a,
    {
        let shared = Rc::new(value);
        let held = Rc::clone(&shared);
        self.register_cleanup(move || release(&held));
        shared
    }

    /// Run `body` as one session of this manager, then run exactly one
    /// cleanup pass however `body` exits.
    ///
    /// An error from `body` is kept and any cleanup failure is attached to
    /// it. A panic in `body` propagates unchanged after cleanup has run.
    pub fn session<T, E, F>(&mut self, body: F) -> std::result::Result<T, ScopeError<E>>
    where
        F: FnOnce(&mut Self) -> std::result::Result<T, E>,
    {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| body(self)));
        let cleanup = self.execute_cleanup();
        finish_session(outcome, cleanup)
    }

    fn pass_options(&self) -> PassOptions {
        PassOptions {
            policy: self.policy,
            log_each_callback: self.log_each_callback,
        }
    }
}

fn infallible<'a, F>(cleanup: F) -> LocalAction<'a>
where
    F: FnOnce() + 'a,
{
    Box::new(move || -> CleanupResult {
        cleanup();
        Ok(())
    })
}

fn fallible<'a, F, E>(cleanup: F) -> LocalAction<'a>
where
    F: FnOnce() -> std::result::Result<(), E> + 'a,
    E: Into<BoxError>,
{
    Box::new(move || -> CleanupResult { cleanup().map_err(Into::into) })
}

impl Default for ResourceManager<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ResourceManager<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceManager")
            .field("pending", &self.registry.len())
            .field("policy", &self.policy)
            .field("automatic_cleanup", &self.automatic_cleanup)
            .finish()
    }
}

impl Drop for ResourceManager<'_> {
    fn drop(&mut self) {
        if self.registry.is_empty() {
            return;
        }
        if self.automatic_cleanup {
            self.execute_cleanup_logged();
        } else {
            tracing::debug!(
                "Discarding {} cleanup functions without running them",
                self.registry.len()
            );
        }
    }
}
