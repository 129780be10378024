//! Async page fetching on the UI runtime.
//!
//! [`PageFetcher`] subscribes to a controller's page requests, runs the user's
//! fetch future as a UI task and applies the outcome back to the controller.
//! Results that arrive after the controller moved on (refresh, dispose, or a
//! newer request) are dropped instead of corrupting the item list.

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::{Rc, Weak};

use pagewise_core::collections::IdMap;
use pagewise_core::{ListenerId, RuntimeHandle, TaskHandle};

use crate::controller::{PagingController, WeakPagingController};
use crate::error::{PageError, PagingError};

/// One fetched page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Page<K, I> {
    /// More pages follow, starting at `next_key`.
    Next { items: Vec<I>, next_key: K },
    /// The final page.
    Last { items: Vec<I> },
}

impl<K, I> Page<K, I> {
    pub fn next(items: Vec<I>, next_key: K) -> Self {
        Page::Next { items, next_key }
    }

    pub fn last(items: Vec<I>) -> Self {
        Page::Last { items }
    }

    pub fn items(&self) -> &[I] {
        match self {
            Page::Next { items, .. } | Page::Last { items } => items,
        }
    }

    pub fn next_key(&self) -> Option<&K> {
        match self {
            Page::Next { next_key, .. } => Some(next_key),
            Page::Last { .. } => None,
        }
    }
}

struct FetcherInner<K: 'static, I: 'static> {
    controller: WeakPagingController<K, I>,
    runtime: RuntimeHandle,
    listener: Cell<Option<ListenerId>>,
    active: Cell<bool>,
    tasks: RefCell<IdMap<TaskHandle>>,
}

/// Binds an async fetch function to a [`PagingController`].
///
/// Dropping the fetcher unsubscribes it and cancels fetches still in flight.
pub struct PageFetcher<K: 'static, I: 'static> {
    inner: Rc<FetcherInner<K, I>>,
}

impl<K, I> PageFetcher<K, I>
where
    K: Clone + PartialEq + 'static,
    I: Clone + 'static,
{
    /// Subscribes `fetch` to the controller's page requests.
    ///
    /// If the first page is still pending the first fetch starts right away.
    pub fn bind<F, Fut>(
        controller: &PagingController<K, I>,
        runtime: RuntimeHandle,
        fetch: F,
    ) -> Result<Self, PagingError>
    where
        F: Fn(K) -> Fut + 'static,
        Fut: Future<Output = Result<Page<K, I>, PageError>> + 'static,
    {
        if !runtime.is_alive() {
            return Err(PagingError::RuntimeDropped);
        }
        if controller.is_disposed() {
            return Err(PagingError::Disposed);
        }
        let inner = Rc::new(FetcherInner {
            controller: controller.downgrade(),
            runtime,
            listener: Cell::new(None),
            active: Cell::new(true),
            tasks: RefCell::new(IdMap::default()),
        });

        let weak = Rc::downgrade(&inner);
        let listener = controller.add_page_request_listener(move |key: &K| {
            if let Some(inner) = weak.upgrade() {
                FetcherInner::start(&inner, key.clone(), fetch(key.clone()));
            }
        });
        inner.listener.set(Some(listener));
        Ok(Self { inner })
    }

    /// Number of fetches started and not yet finished or cancelled.
    pub fn in_flight(&self) -> usize {
        self.inner.prune();
        self.inner.tasks.borrow().len()
    }

    /// Unsubscribes and cancels every fetch in flight.
    pub fn dispose(&self) {
        self.inner.dispose();
    }
}

impl<K, I> FetcherInner<K, I>
where
    K: Clone + PartialEq + 'static,
    I: Clone + 'static,
{
    fn start<Fut>(this: &Rc<Self>, key: K, fetch: Fut)
    where
        Fut: Future<Output = Result<Page<K, I>, PageError>> + 'static,
    {
        this.prune();
        let controller = this.controller.clone();
        let owner: Weak<Self> = Rc::downgrade(this);
        let task = this.runtime.spawn_ui(async move {
            let result = fetch.await;
            match owner.upgrade() {
                Some(owner) if owner.active.get() => {}
                _ => return,
            }
            if let Some(controller) = controller.upgrade() {
                apply_result(&controller, key, result);
            }
        });
        match task {
            Some(task) => {
                this.tasks.borrow_mut().insert(task.id(), task);
            }
            None => log::warn!("page fetch dropped: runtime is gone"),
        }
    }
}

impl<K: 'static, I: 'static> FetcherInner<K, I> {
    fn prune(&self) {
        self.tasks.borrow_mut().retain(|_, task| task.is_active());
    }

    fn dispose(&self) {
        self.active.set(false);
        if let Some(listener) = self.listener.take() {
            if let Some(controller) = self.controller.upgrade() {
                controller.remove_page_request_listener(listener);
            }
        }
        let tasks: Vec<TaskHandle> = self.tasks.borrow_mut().drain().map(|(_, t)| t).collect();
        for task in tasks {
            task.cancel();
        }
    }
}

impl<K: 'static, I: 'static> Drop for FetcherInner<K, I> {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn apply_result<K, I>(
    controller: &PagingController<K, I>,
    key: K,
    result: Result<Page<K, I>, PageError>,
) where
    K: Clone + PartialEq + 'static,
    I: Clone + 'static,
{
    if controller.is_disposed() {
        log::debug!("discarding page result for a disposed controller");
        return;
    }
    if controller.next_page_key().as_ref() != Some(&key) {
        log::warn!("discarding stale page result");
        return;
    }
    let applied = match result {
        Ok(Page::Next { items, next_key }) => {
            log::debug!("applying page with {} item(s)", items.len());
            controller.append_page(items, Some(next_key))
        }
        Ok(Page::Last { items }) => {
            log::debug!("applying last page with {} item(s)", items.len());
            controller.append_last_page(items)
        }
        Err(error) => {
            log::debug!("page fetch failed: {error}");
            controller.report_error(error)
        }
    };
    if let Err(err) = applied {
        log::warn!("page result not applied: {err}");
    }
}

#[cfg(test)]
#[path = "tests/fetcher_tests.rs"]
mod tests;
