//! Exclusively owned values with a custom deleter

use scopekit_utils::catch_panic;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::thread;

/// Owns a value and hands it to a deleter when dropped.
///
/// With the default deleter this behaves like the value itself; a custom
/// deleter is for handles that need an explicit close call.
///
/// ```
/// use std::cell::Cell;
/// use scopekit_memory::UniqueResource;
///
/// let closed = Cell::new(None);
/// {
///     let fd = UniqueResource::with_deleter(3, |fd| closed.set(Some(fd)));
///     assert_eq!(*fd, 3);
/// }
/// assert_eq!(closed.get(), Some(3));
/// ```
pub struct UniqueResource<T, D = fn(T)>
where
    D: FnOnce(T),
{
    // `None` only once `release` or `drop` has taken the parts
    parts: Option<(T, D)>,
}

impl<T> UniqueResource<T> {
    /// Own `value`, dropping it normally
    pub fn new(value: T) -> Self {
        Self::with_deleter(value, drop::<T> as fn(T))
    }
}

impl<T, D> UniqueResource<T, D>
where
    D: FnOnce(T),
{
    pub fn with_deleter(value: T, deleter: D) -> Self {
        Self {
            parts: Some((value, deleter)),
        }
    }

    pub fn get(&self) -> &T {
        match &self.parts {
            Some((value, _)) => value,
            None => unreachable!("value is present until released"),
        }
    }

    pub fn get_mut(&mut self) -> &mut T {
        match &mut self.parts {
            Some((value, _)) => value,
            None => unreachable!("value is present until released"),
        }
    }

    /// Take the value back; the deleter is dropped without being called
    pub fn release(mut self) -> T {
        match self.parts.take() {
            Some((value, _deleter)) => value,
            None => unreachable!("value is present until released"),
        }
    }
}

impl<T, D> Drop for UniqueResource<T, D>
where
    D: FnOnce(T),
{
    fn drop(&mut self) {
        let Some((value, deleter)) = self.parts.take() else {
            return;
        };

        if thread::panicking() {
            if let Err(message) = catch_panic(|| deleter(value)) {
                tracing::error!("Deleter panicked during unwind: {message}");
            }
        } else {
            deleter(value);
        }
    }
}

impl<T, D> Deref for UniqueResource<T, D>
where
    D: FnOnce(T),
{
    type Target = T;

    fn deref(&self) -> &T {
        self.get()
    }
}

impl<T, D> DerefMut for UniqueResource<T, D>
where
    D: FnOnce(T),
{
    fn deref_mut(&mut self) -> &mut T {
        self.get_mut()
    }
}

impl<T: fmt::Debug, D> fmt::Debug for UniqueResource<T, D>
where
    D: FnOnce(T),
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UniqueResource").field(self.get()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[test]
    fn test_deleter_runs_once_on_drop() {
        let calls = Cell::new(0);
        {
            let resource = UniqueResource::with_deleter("socket", |_| calls.set(calls.get() + 1));
            assert_eq!(*resource.get(), "socket");
            assert_eq!(calls.get(), 0);
        }
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_default_deleter_drops_value() {
        let value = Rc::new(());
        {
            let _owned = UniqueResource::new(Rc::clone(&value));
            assert_eq!(Rc::strong_count(&value), 2);
        }
        assert_eq!(Rc::strong_count(&value), 1);
    }

    #[test]
    fn test_release_skips_deleter() {
        let deleted = RefCell::new(Vec::new());
        let resource =
            UniqueResource::with_deleter(String::from("buffer"), |s| deleted.borrow_mut().push(s));

        let value = resource.release();
        assert_eq!(value, "buffer");
        assert!(deleted.borrow().is_empty());
    }

    #[test]
    fn test_release_drops_deleter_captures_once() {
        let captured = Rc::new(());
        let held = Rc::clone(&captured);
        let resource = UniqueResource::with_deleter(7, move |_| drop(held));
        assert_eq!(Rc::strong_count(&captured), 2);

        assert_eq!(resource.release(), 7);
        assert_eq!(Rc::strong_count(&captured), 1);
    }

    #[test]
    fn test_get_mut_and_deref_mut() {
        let deleted = RefCell::new(Vec::new());
        {
            let mut resource =
                UniqueResource::with_deleter(vec![1], |v| deleted.borrow_mut().push(v));
            resource.get_mut().push(2);
            resource.push(3);
            assert_eq!(resource.len(), 3);
        }
        assert_eq!(*deleted.borrow(), vec![vec![1, 2, 3]]);
    }

    #[test]
    fn test_deleter_runs_on_panic() {
        let calls = Cell::new(0);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _resource = UniqueResource::with_deleter(1, |_| calls.set(calls.get() + 1));
            panic!("work failed");
        }));
        assert!(result.is_err());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_debug_shows_value() {
        let resource = UniqueResource::new(5);
        assert_eq!(format!("{resource:?}"), "UniqueResource(5)");
    }
}
