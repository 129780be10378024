//! Observable single value.
//!
//! [`ValueNotifier`] is the listenable the paging layer is driven by: every
//! successful [`set`](ValueNotifier::set) notifies all listeners synchronously
//! on the calling thread.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::listeners::{ListenerId, ListenerRegistry};

struct NotifierInner<T: 'static> {
    value: T,
    listeners: ListenerRegistry<T>,
    disposed: bool,
}

/// Shared, observable value.
///
/// Cloning the notifier clones the handle, not the value. Listeners receive a
/// clone of the value taken right after the update, so `T` should be cheap to
/// clone (wrap large payloads in `Rc`).
///
/// Listeners may add or remove listeners while being notified. Calling
/// [`set`](Self::set) from inside a listener is allowed but the nested
/// notification runs before the outer one finishes.
pub struct ValueNotifier<T: 'static> {
    inner: Rc<RefCell<NotifierInner<T>>>,
}

impl<T: 'static> Clone for ValueNotifier<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone + 'static> ValueNotifier<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(NotifierInner {
                value,
                listeners: ListenerRegistry::new(),
                disposed: false,
            })),
        }
    }

    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Replaces the value and notifies listeners.
    ///
    /// Returns `false` without touching the value once the notifier is disposed.
    pub fn set(&self, value: T) -> bool {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.disposed {
                return false;
            }
            inner.value = value;
        }
        self.notify();
        true
    }

    /// Mutates the value in place and notifies listeners.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let result = {
            let mut inner = self.inner.borrow_mut();
            if inner.disposed {
                return None;
            }
            f(&mut inner.value)
        };
        self.notify();
        Some(result)
    }

    /// Invokes every listener with the current value.
    pub fn notify(&self) {
        let (value, listeners) = {
            let inner = self.inner.borrow();
            if inner.disposed {
                return;
            }
            (inner.value.clone(), inner.listeners.snapshot())
        };
        for listener in listeners {
            listener(&value);
        }
    }

    pub fn add_listener(&self, listener: impl Fn(&T) + 'static) -> ListenerId {
        self.inner.borrow_mut().listeners.add(Rc::new(listener))
    }
}

// Registration bookkeeping needs no `Clone`, so teardown paths can use it.
impl<T: 'static> ValueNotifier<T> {
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.inner.borrow_mut().listeners.remove(id)
    }

    pub fn has_listeners(&self) -> bool {
        !self.inner.borrow().listeners.is_empty()
    }

    /// Drops every listener; later updates are ignored.
    pub fn dispose(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.disposed = true;
        inner.listeners.clear();
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.borrow().disposed
    }

    pub fn downgrade(&self) -> WeakValueNotifier<T> {
        WeakValueNotifier {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for ValueNotifier<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ValueNotifier")
            .field("value", &inner.value)
            .field("listeners", &inner.listeners.len())
            .field("disposed", &inner.disposed)
            .finish()
    }
}

/// Non-owning handle to a [`ValueNotifier`].
pub struct WeakValueNotifier<T: 'static> {
    inner: Weak<RefCell<NotifierInner<T>>>,
}

impl<T: 'static> Clone for WeakValueNotifier<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<T: 'static> WeakValueNotifier<T> {
    pub fn upgrade(&self) -> Option<ValueNotifier<T>> {
        self.inner.upgrade().map(|inner| ValueNotifier { inner })
    }
}
