use super::*;
use crate::state::PagingStatus;
use pagewise_core::{DefaultScheduler, Runtime};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, Waker};

type Controller = PagingController<u32, String>;
type FetchResult = Result<Page<u32, String>, PageError>;

/// Future resolved by hand from the test body.
struct Pending {
    slot: Rc<RefCell<Slot>>,
}

#[derive(Default)]
struct Slot {
    value: Option<FetchResult>,
    waker: Option<Waker>,
}

impl Future for Pending {
    type Output = FetchResult;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut slot = self.slot.borrow_mut();
        match slot.value.take() {
            Some(value) => Poll::Ready(value),
            None => {
                slot.waker = Some(cx.waker().clone());
                Poll::Pending
            }
        }
    }
}

/// Records every requested key and hands back a resolvable future for it.
#[derive(Default)]
struct ManualBackend {
    requests: RefCell<Vec<(u32, Rc<RefCell<Slot>>)>>,
}

impl ManualBackend {
    fn fetch(&self, key: u32) -> Pending {
        let slot = Rc::new(RefCell::new(Slot::default()));
        self.requests.borrow_mut().push((key, Rc::clone(&slot)));
        Pending { slot }
    }

    fn keys(&self) -> Vec<u32> {
        self.requests.borrow().iter().map(|(key, _)| *key).collect()
    }

    fn resolve(&self, index: usize, value: FetchResult) {
        let slot = Rc::clone(&self.requests.borrow()[index].1);
        let mut slot = slot.borrow_mut();
        slot.value = Some(value);
        if let Some(waker) = slot.waker.take() {
            waker.wake();
        }
    }
}

fn page(items: &[&str], next_key: Option<u32>) -> FetchResult {
    let items = items.iter().map(|item| item.to_string()).collect();
    Ok(match next_key {
        Some(key) => Page::next(items, key),
        None => Page::last(items),
    })
}

fn setup() -> (Runtime, Controller, Rc<ManualBackend>, PageFetcher<u32, String>) {
    let runtime = Runtime::new(Arc::new(DefaultScheduler));
    let controller = Controller::new(1);
    let backend = Rc::new(ManualBackend::default());
    let fetch_backend = Rc::clone(&backend);
    let fetcher = PageFetcher::bind(&controller, runtime.handle(), move |key| {
        fetch_backend.fetch(key)
    })
    .expect("bind fetcher");
    (runtime, controller, backend, fetcher)
}

#[test]
fn binding_starts_first_page_fetch() {
    let (runtime, controller, backend, fetcher) = setup();
    assert_eq!(backend.keys(), vec![1]);
    assert_eq!(fetcher.in_flight(), 1);

    backend.resolve(0, page(&["a", "b"], Some(2)));
    runtime.drain_ui();

    assert_eq!(controller.items(), Some(vec!["a".to_string(), "b".to_string()]));
    assert_eq!(controller.next_page_key(), Some(2));
    assert_eq!(fetcher.in_flight(), 0);
}

#[test]
fn failed_fetch_reports_error() {
    let (runtime, controller, backend, _fetcher) = setup();

    backend.resolve(0, Err(PageError::msg("offline")));
    runtime.drain_ui();

    assert_eq!(controller.status(), PagingStatus::FirstPageError);
}

#[test]
fn last_page_completes_pagination() {
    let (runtime, controller, backend, _fetcher) = setup();
    backend.resolve(0, page(&["a"], Some(2)));
    runtime.drain_ui();

    controller.notify_page_request_listeners(2).unwrap();
    backend.resolve(1, page(&["b"], None));
    runtime.drain_ui();

    assert_eq!(backend.keys(), vec![1, 2]);
    assert_eq!(controller.status(), PagingStatus::Completed);
    assert_eq!(controller.item_count(), 2);
}

#[test]
fn stale_result_after_refresh_is_discarded() {
    let (runtime, controller, backend, _fetcher) = setup();
    backend.resolve(0, page(&["a"], Some(2)));
    runtime.drain_ui();
    controller.notify_page_request_listeners(2).unwrap();

    controller.refresh().unwrap();
    backend.resolve(1, page(&["stale"], Some(3)));
    runtime.drain_ui();

    assert_eq!(backend.keys(), vec![1, 2, 1]);
    assert_eq!(controller.status(), PagingStatus::LoadingFirstPage);

    backend.resolve(2, page(&["fresh"], None));
    runtime.drain_ui();
    assert_eq!(controller.items(), Some(vec!["fresh".to_string()]));
}

#[test]
fn disposing_fetcher_cancels_in_flight_requests() {
    let (runtime, controller, backend, fetcher) = setup();

    fetcher.dispose();
    backend.resolve(0, page(&["late"], None));
    runtime.drain_ui();

    assert_eq!(fetcher.in_flight(), 0);
    assert_eq!(controller.status(), PagingStatus::LoadingFirstPage);

    controller.notify_page_request_listeners(1).unwrap();
    assert_eq!(backend.keys(), vec![1]);
}

#[test]
fn result_for_disposed_controller_is_ignored() {
    let (runtime, controller, backend, _fetcher) = setup();

    controller.dispose();
    backend.resolve(0, page(&["late"], None));
    runtime.drain_ui();

    assert_eq!(controller.items(), None);
}

#[test]
fn bind_rejects_dead_collaborators() {
    let runtime = Runtime::new(Arc::new(DefaultScheduler));
    let controller = Controller::new(1);
    controller.dispose();
    let bound = PageFetcher::bind(&controller, runtime.handle(), |_key: u32| {
        std::future::ready(page(&[], None))
    });
    assert_eq!(bound.err(), Some(PagingError::Disposed));

    let handle = runtime.handle();
    drop(runtime);
    let bound = PageFetcher::bind(&Controller::new(1), handle, |_key: u32| {
        std::future::ready(page(&[], None))
    });
    assert_eq!(bound.err(), Some(PagingError::RuntimeDropped));
}
