//! Paging controller.
//!
//! [`PagingController`] owns the loaded items, the next page key and the last
//! error. Fetch code mutates it as pages arrive; views observe it.
//!
//! Design follows the observable-state-holder pattern:
//! - The current [`PagingState`] lives in a [`ValueNotifier`], so every
//!   mutation notifies value listeners synchronously.
//! - Page requests travel the other way, from the view to fetch code, through
//!   a separate listener registry keyed by [`ListenerId`].
//! - Status listeners fire only when the derived status changes.
//!
//! Everything runs on the UI thread. Value listeners must not mutate the
//! controller from inside their callback; nested notifications would reach
//! later listeners out of order.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use pagewise_core::{ListenerId, ListenerRegistry, ValueNotifier};

use crate::error::{PageError, PagingError};
use crate::state::{PagingState, PagingStatus};

/// Items from the end of the list that stay unseen before the next page is requested.
pub const DEFAULT_INVISIBLE_ITEMS_THRESHOLD: usize = 3;

struct ControllerInner<K: 'static, I: 'static> {
    value: ValueNotifier<PagingState<K, I>>,
    first_page_key: K,
    invisible_items_threshold: Cell<usize>,
    requests: RefCell<RequestState<K>>,
}

/// Non-reactive bookkeeping next to the observable value.
struct RequestState<K: 'static> {
    page_request_listeners: ListenerRegistry<K>,
    status_listeners: ListenerRegistry<PagingStatus>,
    last_status: PagingStatus,
    last_requested_key: Option<K>,
    /// Page requests emitted so far, refresh included.
    request_count: u64,
    /// Whether the first-page key was emitted for the current loading cycle.
    first_page_requested: bool,
    disposed: bool,
}

/// Shared handle to the pagination state of one paged view.
///
/// Cloning the controller clones the handle. Views that only observe should
/// hold a [`WeakPagingController`].
pub struct PagingController<K: 'static, I: 'static> {
    inner: Rc<ControllerInner<K, I>>,
}

impl<K: 'static, I: 'static> Clone for PagingController<K, I> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

// Identity comparison, so controllers can be compared as view parameters.
impl<K: 'static, I: 'static> PartialEq for PagingController<K, I> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<K: 'static, I: 'static> PagingController<K, I> {
    pub fn is_disposed(&self) -> bool {
        self.inner.requests.borrow().disposed
    }

    pub fn remove_page_request_listener(&self, id: ListenerId) -> bool {
        self.inner
            .requests
            .borrow_mut()
            .page_request_listeners
            .remove(id)
    }

    /// Number of page requests emitted since construction.
    ///
    /// Observers compare two readings to tell whether anything was requested
    /// in between.
    pub fn request_count(&self) -> u64 {
        self.inner.requests.borrow().request_count
    }

    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.inner.value.remove_listener(id)
    }

    pub fn remove_status_listener(&self, id: ListenerId) -> bool {
        self.inner.requests.borrow_mut().status_listeners.remove(id)
    }

    pub fn downgrade(&self) -> WeakPagingController<K, I> {
        WeakPagingController {
            inner: Rc::downgrade(&self.inner),
        }
    }
}

impl<K: Clone + 'static, I: Clone + 'static> PagingController<K, I> {
    pub fn new(first_page_key: K) -> Self {
        let value = ValueNotifier::new(PagingState::initial(first_page_key.clone()));
        Self {
            inner: Rc::new(ControllerInner {
                value,
                first_page_key,
                invisible_items_threshold: Cell::new(DEFAULT_INVISIBLE_ITEMS_THRESHOLD),
                requests: RefCell::new(RequestState {
                    page_request_listeners: ListenerRegistry::new(),
                    status_listeners: ListenerRegistry::new(),
                    last_status: PagingStatus::LoadingFirstPage,
                    last_requested_key: None,
                    request_count: 0,
                    first_page_requested: false,
                    disposed: false,
                }),
            }),
        }
    }

    /// Sets how many items from the end may remain unseen before the next page is requested.
    pub fn with_invisible_items_threshold(self, threshold: usize) -> Self {
        self.inner.invisible_items_threshold.set(threshold);
        self
    }

    // ─────────────────────────────────────────────────────────────────────
    // Reads
    // ─────────────────────────────────────────────────────────────────────

    pub fn value(&self) -> PagingState<K, I> {
        self.inner.value.get()
    }

    pub fn with_value<R>(&self, f: impl FnOnce(&PagingState<K, I>) -> R) -> R {
        self.inner.value.with(f)
    }

    pub fn status(&self) -> PagingStatus {
        self.with_value(PagingState::status)
    }

    pub fn items(&self) -> Option<Vec<I>> {
        self.with_value(|state| state.items().map(<[I]>::to_vec))
    }

    pub fn item_count(&self) -> usize {
        self.with_value(PagingState::item_count)
    }

    pub fn item_at(&self, index: usize) -> Option<I> {
        self.with_value(|state| state.item_at(index).cloned())
    }

    pub fn error(&self) -> Option<PageError> {
        self.with_value(|state| state.error().cloned())
    }

    pub fn next_page_key(&self) -> Option<K> {
        self.with_value(|state| state.next_key().cloned())
    }

    pub fn first_page_key(&self) -> &K {
        &self.inner.first_page_key
    }

    pub fn invisible_items_threshold(&self) -> usize {
        self.inner.invisible_items_threshold.get()
    }

    pub fn last_requested_key(&self) -> Option<K> {
        self.inner.requests.borrow().last_requested_key.clone()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────

    /// Appends a fetched page and records where the following page starts.
    ///
    /// Clears any error. `next_key == None` marks the end of pagination.
    pub fn append_page(&self, new_items: Vec<I>, next_key: Option<K>) -> Result<(), PagingError> {
        self.mutate("append_page", move |state| {
            state.append_items(new_items);
            state.set_next_key(next_key);
            state.set_error(None);
        })
    }

    /// Appends the final page.
    pub fn append_last_page(&self, new_items: Vec<I>) -> Result<(), PagingError> {
        self.append_page(new_items, None)
    }

    /// Records a failed fetch. Loaded items and the next key stay as they are.
    pub fn report_error(&self, error: impl Into<PageError>) -> Result<(), PagingError> {
        self.set_error(Some(error.into()))
    }

    pub fn set_error(&self, error: Option<PageError>) -> Result<(), PagingError> {
        self.mutate("set_error", move |state| state.set_error(error))
    }

    pub fn set_items(&self, items: Option<Vec<I>>) -> Result<(), PagingError> {
        self.mutate("set_items", move |state| state.set_items(items))
    }

    pub fn set_next_page_key(&self, next_key: Option<K>) -> Result<(), PagingError> {
        self.mutate("set_next_page_key", move |state| state.set_next_key(next_key))
    }

    /// Replaces the whole state.
    pub fn set_value(&self, value: PagingState<K, I>) -> Result<(), PagingError> {
        self.mutate("set_value", move |state| *state = value)
    }

    /// Clears the error and asks listeners for the failed page again.
    ///
    /// The key re-emitted is the last one requested; without one it falls back
    /// to the pending next key. Does nothing when no error is recorded.
    pub fn retry_last_failed_request(&self) -> Result<(), PagingError> {
        self.ensure_active("retry_last_failed_request")?;
        if self.error().is_none() {
            log::debug!("retry requested without a recorded error; ignoring");
            return Ok(());
        }
        let key = self
            .last_requested_key()
            .or_else(|| self.next_page_key())
            .unwrap_or_else(|| self.inner.first_page_key.clone());
        self.set_error(None)?;
        self.notify_page_request_listeners(key)
    }

    /// Drops everything loaded and requests the first page again.
    ///
    /// Without page request listeners the request is held back until the next
    /// listener subscribes.
    pub fn refresh(&self) -> Result<(), PagingError> {
        self.ensure_active("refresh")?;
        {
            let mut requests = self.inner.requests.borrow_mut();
            requests.last_requested_key = None;
            requests.first_page_requested = false;
        }
        let initial = PagingState::initial(self.inner.first_page_key.clone());
        self.mutate("refresh", move |state| *state = initial)?;
        self.request_first_page_if_needed();
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Page requests
    // ─────────────────────────────────────────────────────────────────────

    /// Invokes every page request listener with `key`.
    pub fn notify_page_request_listeners(&self, key: K) -> Result<(), PagingError> {
        self.ensure_active("notify_page_request_listeners")?;
        let listeners = {
            let mut requests = self.inner.requests.borrow_mut();
            requests.last_requested_key = Some(key.clone());
            requests.request_count += 1;
            requests.page_request_listeners.snapshot()
        };
        log::debug!("notifying {} page request listener(s)", listeners.len());
        for listener in listeners {
            listener(&key);
        }
        Ok(())
    }

    /// Subscribes fetch code to page requests.
    ///
    /// The first subscription while the first page is still loading receives
    /// the first-page key immediately.
    pub fn add_page_request_listener(&self, listener: impl Fn(&K) + 'static) -> ListenerId {
        let id = {
            let mut requests = self.inner.requests.borrow_mut();
            let id = requests.page_request_listeners.add(Rc::new(listener));
            if requests.disposed {
                log::warn!("page request listener added to a disposed paging controller");
                requests.page_request_listeners.remove(id);
                return id;
            }
            id
        };
        self.request_first_page_if_needed();
        id
    }

    // ─────────────────────────────────────────────────────────────────────
    // Observation
    // ─────────────────────────────────────────────────────────────────────

    /// Subscribes to every state change.
    pub fn add_listener(&self, listener: impl Fn(&PagingState<K, I>) + 'static) -> ListenerId {
        self.inner.value.add_listener(listener)
    }

    /// Subscribes to status changes only.
    pub fn add_status_listener(&self, listener: impl Fn(&PagingStatus) + 'static) -> ListenerId {
        self.inner
            .requests
            .borrow_mut()
            .status_listeners
            .add(Rc::new(listener))
    }

    /// Tears the controller down: listeners are dropped and later mutations
    /// return [`PagingError::Disposed`]. Calling it twice is harmless.
    pub fn dispose(&self) {
        {
            let mut requests = self.inner.requests.borrow_mut();
            if requests.disposed {
                return;
            }
            requests.disposed = true;
            requests.page_request_listeners.clear();
            requests.status_listeners.clear();
        }
        self.inner.value.dispose();
        log::debug!("paging controller disposed");
    }

    fn ensure_active(&self, operation: &str) -> Result<(), PagingError> {
        if self.is_disposed() {
            log::warn!("{operation} called on a disposed paging controller");
            return Err(PagingError::Disposed);
        }
        Ok(())
    }

    fn mutate(
        &self,
        operation: &str,
        f: impl FnOnce(&mut PagingState<K, I>),
    ) -> Result<(), PagingError> {
        self.ensure_active(operation)?;
        if self.inner.value.update(f).is_none() {
            return Err(PagingError::Disposed);
        }
        self.notify_status_if_changed();
        Ok(())
    }

    fn notify_status_if_changed(&self) {
        let status = self.status();
        let listeners = {
            let mut requests = self.inner.requests.borrow_mut();
            if requests.disposed || requests.last_status == status {
                return;
            }
            requests.last_status = status;
            requests.status_listeners.snapshot()
        };
        for listener in listeners {
            listener(&status);
        }
    }

    fn request_first_page_if_needed(&self) {
        let should_request = {
            let mut requests = self.inner.requests.borrow_mut();
            let ready = !requests.disposed
                && !requests.first_page_requested
                && !requests.page_request_listeners.is_empty();
            if ready && self.status() == PagingStatus::LoadingFirstPage {
                requests.first_page_requested = true;
                true
            } else {
                false
            }
        };
        if should_request {
            let key = self.inner.first_page_key.clone();
            if let Err(err) = self.notify_page_request_listeners(key) {
                log::warn!("first page request dropped: {err}");
            }
        }
    }
}

impl<K: fmt::Debug + Clone + 'static, I: fmt::Debug + Clone + 'static> fmt::Debug
    for PagingController<K, I>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let requests = self.inner.requests.borrow();
        f.debug_struct("PagingController")
            .field("value", &self.inner.value.get())
            .field("first_page_key", &self.inner.first_page_key)
            .field(
                "invisible_items_threshold",
                &self.inner.invisible_items_threshold.get(),
            )
            .field(
                "page_request_listeners",
                &requests.page_request_listeners.len(),
            )
            .field("disposed", &requests.disposed)
            .finish()
    }
}

/// Non-owning handle to a [`PagingController`].
pub struct WeakPagingController<K: 'static, I: 'static> {
    inner: Weak<ControllerInner<K, I>>,
}

impl<K: 'static, I: 'static> Clone for WeakPagingController<K, I> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<K: 'static, I: 'static> WeakPagingController<K, I> {
    pub fn upgrade(&self) -> Option<PagingController<K, I>> {
        self.inner.upgrade().map(|inner| PagingController { inner })
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
