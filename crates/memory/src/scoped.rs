//! Single-resource scope guards

use scopekit_utils::catch_panic;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::thread;

/// Scoped cleanup guard that runs a function on drop
pub struct ScopedCleanup<F: FnOnce()> {
    cleanup_fn: Option<F>,
}

impl<F: FnOnce()> ScopedCleanup<F> {
    /// Create a new scoped cleanup guard
    pub fn new(cleanup_fn: F) -> Self {
        Self {
            cleanup_fn: Some(cleanup_fn),
        }
    }

    /// Cancel the cleanup
    pub fn cancel(mut self) {
        self.cleanup_fn = None;
    }

    pub fn is_armed(&self) -> bool {
        self.cleanup_fn.is_some()
    }
}

impl<F: FnOnce()> Drop for ScopedCleanup<F> {
    fn drop(&mut self) {
        let Some(cleanup_fn) = self.cleanup_fn.take() else {
            return;
        };

        if thread::panicking() {
            // a second panic while unwinding would abort the process
            if let Err(message) = catch_panic(cleanup_fn) {
                tracing::error!("Cleanup panicked during unwind: {message}");
            }
        } else {
            cleanup_fn();
        }
    }
}

impl<F: FnOnce()> fmt::Debug for ScopedCleanup<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedCleanup")
            .field("armed", &self.is_armed())
            .finish()
    }
}

type BoxedCleanup<'a> = Box<dyn FnOnce() + 'a>;

/// Holds one resource and an optional cleanup callback.
///
/// The callback runs exactly once, when the holder goes out of scope, before
/// the resource itself is dropped. Dereferences to the resource.
///
/// Nesting holders releases them innermost first, from ordinary drop order:
///
/// ```
/// use std::cell::RefCell;
/// use scopekit_memory::ScopedResource;
///
/// let log = RefCell::new(Vec::new());
/// {
///     let _outer = ScopedResource::with_cleanup("outer", || log.borrow_mut().push("outer"));
///     let _inner = ScopedResource::with_cleanup("inner", || log.borrow_mut().push("inner"));
/// }
/// assert_eq!(*log.borrow(), ["inner", "outer"]);
/// ```
pub struct ScopedResource<'a, R> {
    // declared first so it drops before `resource`
    cleanup: Option<ScopedCleanup<BoxedCleanup<'a>>>,
    resource: R,
}

impl<'a, R> ScopedResource<'a, R> {
    /// Hold `resource` with nothing to run on exit
    pub fn new(resource: R) -> Self {
        Self {
            cleanup: None,
            resource,
        }
    }

    /// Hold `resource` and run `cleanup` when the holder goes out of scope
    pub fn with_cleanup<F>(resource: R, cleanup: F) -> Self
    where
        F: FnOnce() + 'a,
    {
        let boxed: BoxedCleanup<'a> = Box::new(cleanup);
        Self {
            cleanup: Some(ScopedCleanup::new(boxed)),
            resource,
        }
    }

    pub fn resource(&self) -> &R {
        &self.resource
    }

    pub fn resource_mut(&mut self) -> &mut R {
        &mut self.resource
    }

    pub fn has_cleanup(&self) -> bool {
        self.cleanup.as_ref().is_some_and(ScopedCleanup::is_armed)
    }

    /// Give the resource back without running the cleanup
    pub fn dismiss(self) -> R {
        let ScopedResource { cleanup, resource } = self;
        if let Some(guard) = cleanup {
            guard.cancel();
        }
        resource
    }
}

/// Wrap `resource` with an optional cleanup callback
pub fn scoped_resource<'a, R, F>(resource: R, cleanup: Option<F>) -> ScopedResource<'a, R>
where
    F: FnOnce() + 'a,
{
    match cleanup {
        Some(cleanup) => ScopedResource::with_cleanup(resource, cleanup),
        None => ScopedResource::new(resource),
    }
}

impl<R> Deref for ScopedResource<'_, R> {
    type Target = R;

    fn deref(&self) -> &R {
        &self.resource
    }
}

impl<R> DerefMut for ScopedResource<'_, R> {
    fn deref_mut(&mut self) -> &mut R {
        &mut self.resource
    }
}

impl<R: fmt::Debug> fmt::Debug for ScopedResource<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedResource")
            .field("resource", &self.resource)
            .field("has_cleanup", &self.has_cleanup())
            .finish()
    }
}
