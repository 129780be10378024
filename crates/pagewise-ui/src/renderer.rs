//! Seam to the rendering toolkit.
//!
//! The paged layout never draws anything itself. It asks a [`PagingRenderer`]
//! for default indicators and for the wrappers around single-indicator
//! branches, and a [`ListingRenderer`] for the lazy list or grid that hosts
//! the items.

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use pagewise_foundation::PageError;

use crate::branch::RenderBranch;

/// Retry hook handed to error indicators.
#[derive(Clone)]
pub struct RetryAction {
    action: Rc<dyn Fn()>,
}

impl RetryAction {
    pub fn new(action: impl Fn() + 'static) -> Self {
        Self {
            action: Rc::new(action),
        }
    }

    pub fn retry(&self) {
        (self.action)();
    }
}

impl fmt::Debug for RetryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryAction").finish_non_exhaustive()
    }
}

/// What an indicator builder gets to work with.
#[derive(Clone, Debug)]
pub struct IndicatorContext {
    /// The recorded fetch error, for error indicators.
    pub error: Option<PageError>,
    /// Re-requests the failed page.
    pub retry: RetryAction,
}

/// Default indicators and single-indicator wrappers supplied by the toolkit.
pub trait PagingRenderer: 'static {
    type Node;

    fn first_page_error_indicator(&self, cx: &IndicatorContext) -> Self::Node;

    fn new_page_error_indicator(&self, cx: &IndicatorContext) -> Self::Node;

    fn first_page_progress_indicator(&self) -> Self::Node;

    fn new_page_progress_indicator(&self) -> Self::Node;

    fn no_items_found_indicator(&self) -> Self::Node;

    /// Hosts a first-page indicator inside a sliver scroll view, filling the
    /// remaining viewport.
    fn fill_remaining(&self, indicator: Self::Node, shrink_wrap: bool) -> Self::Node;

    /// Hosts a first-page indicator in a plain box layout.
    fn centered(&self, indicator: Self::Node, shrink_wrap: bool) -> Self::Node;

    /// Cross-fades between branches. `branch` identifies the child so the
    /// toolkit knows when it changed.
    fn animated_switcher(
        &self,
        branch: RenderBranch,
        child: Self::Node,
        duration: Duration,
    ) -> Self::Node;
}

/// Lazy containers used by the ready-made listing builders.
///
/// `child` is only called for the indices the toolkit actually lays out.
pub trait ListingRenderer: PagingRenderer {
    fn lazy_list(&self, child_count: usize, child: &dyn Fn(usize) -> Self::Node) -> Self::Node;

    /// `footer` spans the full cross axis below the grid.
    fn lazy_grid(
        &self,
        child_count: usize,
        child: &dyn Fn(usize) -> Self::Node,
        footer: Option<Self::Node>,
    ) -> Self::Node;
}
