//! The paged layout: render dispatch and next-page requests.
//!
//! [`PagedLayoutBuilder`] listens to a [`PagingController`], keeps the latest
//! [`PagingState`] and, on every build, picks the [`RenderBranch`] for its
//! status. While the listing builds its items, the builder watches for the
//! trigger index and schedules the next page request on the post-frame queue,
//! so the request never runs inside the render pass that discovered it.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use pagewise_core::{ListenerId, PostFrameRegistration, RuntimeHandle};
use pagewise_foundation::{PagingController, PagingState, PagingStatus, WeakPagingController};

use crate::branch::{BranchShape, RenderBranch};
use crate::delegate::PagedChildBuilderDelegate;
use crate::layout_spec::PagedLayoutSpec;
use crate::listing::{GridIndicatorPlacement, ListingBuilders};
use crate::renderer::{IndicatorContext, ListingRenderer, PagingRenderer, RetryAction};
use crate::trigger::NextPageTrigger;

/// Whether `new` brings other items or another next key than `old`.
fn page_changed<K: PartialEq, I>(old: &PagingState<K, I>, new: &PagingState<K, I>) -> bool {
    !new.shares_items_with(old)
        || new.item_count() != old.item_count()
        || new.next_key() != old.next_key()
}

struct BuilderState<K, I> {
    snapshot: PagingState<K, I>,
    trigger: NextPageTrigger,
    pending_request: Option<PostFrameRegistration>,
    needs_rebuild: bool,
    requests_scheduled: usize,
}

/// Paged list or grid driven by a [`PagingController`].
///
/// Holds the controller weakly: the owning view keeps the controller alive
/// and disposes it. Dropping the builder unsubscribes from the controller
/// and cancels a next page request that has not run yet.
pub struct PagedLayoutBuilder<K: 'static, I: 'static, R: PagingRenderer> {
    controller: WeakPagingController<K, I>,
    runtime: RuntimeHandle,
    delegate: PagedChildBuilderDelegate<R, I>,
    listings: ListingBuilders<R>,
    spec: PagedLayoutSpec,
    state: Rc<RefCell<BuilderState<K, I>>>,
    listener: Cell<Option<ListenerId>>,
}

impl<K, I, R> PagedLayoutBuilder<K, I, R>
where
    K: Clone + PartialEq + 'static,
    I: Clone + 'static,
    R: PagingRenderer,
{
    pub fn new(
        controller: &PagingController<K, I>,
        runtime: RuntimeHandle,
        delegate: PagedChildBuilderDelegate<R, I>,
        listings: ListingBuilders<R>,
        spec: PagedLayoutSpec,
    ) -> Self {
        let snapshot = controller.value();
        let mut trigger = NextPageTrigger::new(controller.invisible_items_threshold());
        trigger.observe(snapshot.status(), false, controller.request_count());
        let state = Rc::new(RefCell::new(BuilderState {
            snapshot,
            trigger,
            pending_request: None,
            needs_rebuild: true,
            requests_scheduled: 0,
        }));

        let weak_state = Rc::downgrade(&state);
        let weak_controller = controller.downgrade();
        let frame_runtime = runtime.clone();
        let listener = controller.add_listener(move |value: &PagingState<K, I>| {
            let Some(state) = weak_state.upgrade() else {
                return;
            };
            let request_count = weak_controller
                .upgrade()
                .map_or(0, |controller| controller.request_count());
            {
                let mut state = state.borrow_mut();
                let changed = page_changed(&state.snapshot, value);
                state.trigger.observe(value.status(), changed, request_count);
                state.snapshot = value.clone();
                state.needs_rebuild = true;
            }
            frame_runtime.schedule();
        });

        Self {
            controller: controller.downgrade(),
            runtime,
            delegate,
            listings,
            spec,
            state,
            listener: Cell::new(Some(listener)),
        }
    }

    /// Last state received from the controller.
    pub fn value(&self) -> PagingState<K, I> {
        self.state.borrow().snapshot.clone()
    }

    pub fn status(&self) -> PagingStatus {
        self.state.borrow().snapshot.status()
    }

    pub fn branch(&self) -> RenderBranch {
        RenderBranch::for_status(self.status())
    }

    pub fn spec(&self) -> &PagedLayoutSpec {
        &self.spec
    }

    pub fn delegate(&self) -> &PagedChildBuilderDelegate<R, I> {
        &self.delegate
    }

    /// Whether the controller changed since the last [`build`](Self::build).
    pub fn needs_rebuild(&self) -> bool {
        self.state.borrow().needs_rebuild
    }

    /// Whether a next page request waits for the post-frame queue.
    pub fn has_pending_request(&self) -> bool {
        self.state
            .borrow()
            .pending_request
            .as_ref()
            .is_some_and(PostFrameRegistration::is_pending)
    }

    /// Number of next page requests scheduled so far.
    pub fn requests_scheduled(&self) -> usize {
        self.state.borrow().requests_scheduled
    }

    /// Builds the node tree for the current state.
    pub fn build(&self, renderer: &R) -> R::Node {
        self.runtime.assert_ui_thread();
        let request_count = self
            .controller
            .upgrade()
            .map_or(0, |controller| controller.request_count());
        let snapshot = {
            let mut state = self.state.borrow_mut();
            state.needs_rebuild = false;
            state.trigger.begin_build(request_count);
            state.snapshot.clone()
        };
        let branch = RenderBranch::for_status(snapshot.status());
        log::trace!("building paged layout branch {branch:?}");

        let child = match branch.shape() {
            BranchShape::SingleIndicator => {
                // A fetched but empty page with a next key has no item to
                // carry the trigger; the indicator stands in for index 0.
                if branch == RenderBranch::FirstPageProgress
                    && snapshot.items().is_some_and(<[I]>::is_empty)
                {
                    self.on_item_built(0, &snapshot);
                }
                let indicator = self.single_indicator(renderer, branch, &snapshot);
                if self.spec.is_sliver {
                    renderer.fill_remaining(indicator, self.spec.shrink_wrap_first_page_indicators)
                } else {
                    renderer.centered(indicator, self.spec.shrink_wrap_first_page_indicators)
                }
            }
            BranchShape::Listing => self.listing(renderer, branch, &snapshot),
        };

        if self.spec.is_sliver && self.delegate.animate_transitions {
            renderer.animated_switcher(branch, child, self.delegate.transition_duration)
        } else {
            child
        }
    }

    fn single_indicator(
        &self,
        renderer: &R,
        branch: RenderBranch,
        snapshot: &PagingState<K, I>,
    ) -> R::Node {
        match branch {
            RenderBranch::FirstPageError => {
                let cx = self.indicator_context(snapshot);
                self.delegate.first_page_error_indicator(renderer, &cx)
            }
            RenderBranch::NoItemsFound => self.delegate.no_items_found_indicator(renderer),
            _ => self.delegate.first_page_progress_indicator(renderer),
        }
    }

    fn listing(&self, renderer: &R, branch: RenderBranch, snapshot: &PagingState<K, I>) -> R::Node {
        let items = snapshot.items().unwrap_or_default();
        let item_count = items.len();
        // Panics on an index past `item_count`, like slice indexing.
        let item = |index: usize| -> R::Node {
            self.on_item_built(index, snapshot);
            self.delegate.build_item(renderer, &items[index], index)
        };

        match branch {
            RenderBranch::ErrorListing => {
                let cx = self.indicator_context(snapshot);
                let indicator = || self.delegate.new_page_error_indicator(renderer, &cx);
                (self.listings.error)(renderer, &item, item_count, &indicator)
            }
            RenderBranch::CompletedListing => match self.delegate.no_more_items_builder() {
                Some(builder) => {
                    let indicator = || builder(renderer);
                    (self.listings.completed)(renderer, &item, item_count, Some(&indicator))
                }
                None => (self.listings.completed)(renderer, &item, item_count, None),
            },
            _ => {
                let indicator = || self.delegate.new_page_progress_indicator(renderer);
                (self.listings.loading)(renderer, &item, item_count, &indicator)
            }
        }
    }

    fn on_item_built(&self, index: usize, snapshot: &PagingState<K, I>) {
        let mut state = self.state.borrow_mut();
        let fire = state.trigger.on_item_built(
            index,
            snapshot.item_count(),
            snapshot.status(),
            snapshot.has_next_page(),
        );
        if !fire {
            return;
        }
        let Some(key) = snapshot.next_key().cloned() else {
            return;
        };
        log::debug!("scheduling next page request at item {index}");
        let controller = self.controller.clone();
        let registration = self.runtime.post_frame(move || {
            let Some(controller) = controller.upgrade() else {
                return;
            };
            if controller.is_disposed() {
                return;
            }
            if let Err(err) = controller.notify_page_request_listeners(key) {
                log::warn!("next page request failed: {err}");
            }
        });
        if !registration.is_pending() {
            log::warn!("next page request dropped: runtime is gone");
        }
        state.pending_request = Some(registration);
        state.requests_scheduled += 1;
    }

    fn indicator_context(&self, snapshot: &PagingState<K, I>) -> IndicatorContext {
        let controller = self.controller.clone();
        IndicatorContext {
            error: snapshot.error().cloned(),
            retry: RetryAction::new(move || {
                if let Some(controller) = controller.upgrade() {
                    if let Err(err) = controller.retry_last_failed_request() {
                        log::warn!("retry failed: {err}");
                    }
                }
            }),
        }
    }
}

impl<K, I, R> PagedLayoutBuilder<K, I, R>
where
    K: Clone + PartialEq + 'static,
    I: Clone + 'static,
    R: ListingRenderer,
{
    /// Items in a lazy list.
    pub fn list(
        controller: &PagingController<K, I>,
        runtime: RuntimeHandle,
        delegate: PagedChildBuilderDelegate<R, I>,
        spec: PagedLayoutSpec,
    ) -> Self {
        Self::new(controller, runtime, delegate, ListingBuilders::list(), spec)
    }

    /// Items in a lazy list with a separator between consecutive items.
    pub fn separated(
        controller: &PagingController<K, I>,
        runtime: RuntimeHandle,
        delegate: PagedChildBuilderDelegate<R, I>,
        separator_builder: impl Fn(&R, usize) -> R::Node + 'static,
        spec: PagedLayoutSpec,
    ) -> Self {
        let listings = ListingBuilders::separated(separator_builder);
        Self::new(controller, runtime, delegate, listings, spec)
    }

    /// Items in a lazy grid.
    pub fn grid(
        controller: &PagingController<K, I>,
        runtime: RuntimeHandle,
        delegate: PagedChildBuilderDelegate<R, I>,
        placement: GridIndicatorPlacement,
        spec: PagedLayoutSpec,
    ) -> Self {
        let listings = ListingBuilders::grid(placement);
        Self::new(controller, runtime, delegate, listings, spec)
    }
}

impl<K: 'static, I: 'static, R: PagingRenderer> PagedLayoutBuilder<K, I, R> {
    /// Unsubscribes from the controller and cancels a pending next page
    /// request. Calling it twice is harmless.
    pub fn dispose(&self) {
        if let Some(listener) = self.listener.take() {
            if let Some(controller) = self.controller.upgrade() {
                controller.remove_listener(listener);
            }
        }
        let pending = self.state.borrow_mut().pending_request.take();
        if let Some(pending) = pending {
            pending.cancel();
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.listener.get().is_none()
    }
}

impl<K: 'static, I: 'static, R: PagingRenderer> Drop for PagedLayoutBuilder<K, I, R> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<K: 'static, I: 'static, R: PagingRenderer> fmt::Debug for PagedLayoutBuilder<K, I, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("PagedLayoutBuilder")
            .field("spec", &self.spec)
            .field("trigger", &state.trigger)
            .field("needs_rebuild", &state.needs_rebuild)
            .field("requests_scheduled", &state.requests_scheduled)
            .finish_non_exhaustive()
    }
}
