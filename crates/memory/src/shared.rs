//! Thread-safe LIFO cleanup manager

use crate::pass::{run_pass, run_pass_logged, CleanupRegistry, CleanupResult, PassOptions};
use crate::session::{finish_session, ScopeError};
use parking_lot::Mutex;
use scopekit_config::CleanupConfig;
use scopekit_core::{BoxError, FailurePolicy, Result};
use std::borrow::Cow;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Weak};

type SharedAction = Box<dyn FnOnce() -> CleanupResult + Send + 'static>;

struct Inner {
    registry: CleanupRegistry<SharedAction>,
    policy: FailurePolicy,
    automatic_cleanup: bool,
    log_each_callback: bool,
}

impl Inner {
    fn pass_options(&self) -> PassOptions {
        PassOptions {
            policy: self.policy,
            log_each_callback: self.log_each_callback,
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        if self.registry.is_empty() {
            return;
        }
        if self.automatic_cleanup {
            run_pass_logged(self.registry.take(), self.log_each_callback);
        } else {
            tracing::debug!(
                "Discarding {} shared cleanup functions without running them",
                self.registry.len()
            );
        }
    }
}

/// A cleanup manager whose handles can be cloned and sent across threads.
///
/// All handles share one callback list. Callbacks must be `Send + 'static`.
/// The lock is released before a pass starts running callbacks, so a
/// callback may register further cleanup on the same manager; that
/// registration belongs to the next pass.
///
/// Pending callbacks run automatically when the last handle is dropped,
/// unless [`disable_automatic_cleanup`] was called on any handle.
///
/// A pending callback that captures a cloned `SharedResourceManager` holds
/// one of those handles itself, so the manager can never see its last handle
/// go and the callback is leaked. Callbacks that need to register further
/// cleanup should capture a [`WeakSharedResourceManager`] from [`downgrade`]
/// instead.
///
/// [`disable_automatic_cleanup`]: SharedResourceManager::disable_automatic_cleanup
/// [`downgrade`]: SharedResourceManager::downgrade
#[derive(Clone)]
pub struct SharedResourceManager {
    inner: Arc<Mutex<Inner>>,
}

impl SharedResourceManager {
    pub fn new() -> Self {
        Self::with_config(&CleanupConfig::default())
    }

    pub fn with_config(config: &CleanupConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                registry: CleanupRegistry::new(),
                policy: config.failure_policy,
                automatic_cleanup: config.automatic_cleanup,
                log_each_callback: config.log_each_callback,
            })),
        }
    }

    pub fn with_policy(policy: FailurePolicy) -> Self {
        Self::with_config(&CleanupConfig {
            failure_policy: policy,
            ..CleanupConfig::default()
        })
    }

    pub fn policy(&self) -> FailurePolicy {
        self.inner.lock().policy
    }

    pub fn set_policy(&self, policy: FailurePolicy) {
        self.inner.lock().policy = policy;
    }

    pub fn register_cleanup<F>(&self, cleanup: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.register_action(None, infallible(cleanup));
    }

    pub fn register_fallible_cleanup<F, E>(&self, cleanup: F)
    where
        F: FnOnce() -> std::result::Result<(), E> + Send + 'static,
        E: Into<BoxError>,
    {
        self.register_action(None, fallible(cleanup));
    }

    pub fn register_named_cleanup<F>(&self, label: impl Into<Cow<'static, str>>, cleanup: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.register_action(Some(label.into()), infallible(cleanup));
    }

    /// A handle that does not keep the manager alive
    pub fn downgrade(&self) -> WeakSharedResourceManager {
        WeakSharedResourceManager {
            inner: Arc::downgrade(&self.inner),
        }
    }

    fn register_action(&self, label: Option<Cow<'static, str>>, action: SharedAction) {
        self.inner.lock().registry.register(label, action);
    }

    /// Run every pending callback, last registered first, and clear the list
    pub fn execute_cleanup(&self) -> Result<()> {
        let (entries, options) = {
            let mut inner = self.inner.lock();
            (inner.registry.take(), inner.pass_options())
        };
        run_pass(entries, options)
    }

    /// Run every pending callback regardless of failures and return how many
    /// failed
    pub fn execute_cleanup_logged(&self) -> usize {
        let (entries, log_each_callback) = {
            let mut inner = self.inner.lock();
            (inner.registry.take(), inner.log_each_callback)
        };
        run_pass_logged(entries, log_each_callback)
    }

    pub fn pending(&self) -> usize {
        self.inner.lock().registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().registry.is_empty()
    }

    pub fn disable_automatic_cleanup(&self) {
        self.inner.lock().automatic_cleanup = false;
    }

    pub fn automatic_cleanup(&self) -> bool {
        self.inner.lock().automatic_cleanup
    }

    pub fn create_unique<T>(&self, value: T) -> Box<T> {
        Box::new(value)
    }

    pub fn create_shared<T>(&self, value: T) -> Arc<T> {
        Arc::new(value)
    }

    /// Run `body` and then one cleanup pass, however `body` exits.
    ///
    /// Only callbacks pending when the pass starts are run, including any
    /// registered from other threads during `body`.
    pub fn session<T, E, F>(&self, body: F) -> std::result::Result<T, ScopeError<E>>
    where
        F: FnOnce(&Self) -> std::result::Result<T, E>,
    {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| body(self)));
        let cleanup = self.execute_cleanup();
        finish_session(outcome, cleanup)
    }
}

fn infallible<F>(cleanup: F) -> SharedAction
where
    F: FnOnce() + Send + 'static,
{
    Box::new(move || -> CleanupResult {
        cleanup();
        Ok(())
    })
}

fn fallible<F, E>(cleanup: F) -> SharedAction
where
    F: FnOnce() -> std::result::Result<(), E> + Send + 'static,
    E: Into<BoxError>,
{
    Box::new(move || -> CleanupResult { cleanup().map_err(Into::into) })
}

/// Non-owning handle to a [`SharedResourceManager`].
///
/// Registering through it forwards to the manager while any strong handle is
/// alive. Once the last strong handle is gone (including while the manager's
/// final pass is running) there is no later pass to defer to, so the
/// callback runs immediately instead.
#[derive(Clone)]
pub struct WeakSharedResourceManager {
    inner: Weak<Mutex<Inner>>,
}

impl WeakSharedResourceManager {
    pub fn upgrade(&self) -> Option<SharedResourceManager> {
        self.inner
            .upgrade()
            .map(|inner| SharedResourceManager { inner })
    }

    pub fn register_cleanup<F>(&self, cleanup: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.register_action(None, infallible(cleanup));
    }

    pub fn register_fallible_cleanup<F, E>(&self, cleanup: F)
    where
        F: FnOnce() -> std::result::Result<(), E> + Send + 'static,
        E: Into<BoxError>,
    {
        self.register_action(None, fallible(cleanup));
    }

    pub fn register_named_cleanup<F>(&self, label: impl Into<Cow<'static, str>>, cleanup: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.register_action(Some(label.into()), infallible(cleanup));
    }

    fn register_action(&self, label: Option<Cow<'static, str>>, action: SharedAction) {
        match self.upgrade() {
            Some(manager) => manager.register_action(label, action),
            None => {
                tracing::debug!("Shared manager already released, running cleanup now");
                let mut orphaned = CleanupRegistry::new();
                orphaned.register(label, action);
                run_pass_logged(orphaned.take(), false);
            }
        }
    }
}

impl fmt::Debug for WeakSharedResourceManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakSharedResourceManager")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

impl Default for SharedResourceManager {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SharedResourceManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("SharedResourceManager")
            .field("pending", &inner.registry.len())
            .field("policy", &inner.policy)
            .field("automatic_cleanup", &inner.automatic_cleanup)
            .field("handles", &Arc::strong_count(&self.inner))
            .finish()
    }
}
