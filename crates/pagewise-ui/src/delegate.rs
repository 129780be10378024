//! Per-item and per-indicator builders for paged layouts.

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use crate::renderer::{IndicatorContext, PagingRenderer};

pub const DEFAULT_TRANSITION_DURATION: Duration = Duration::from_millis(250);

pub type ItemBuilder<R, I> = Rc<dyn Fn(&R, &I, usize) -> <R as PagingRenderer>::Node>;
pub type IndicatorBuilder<R> = Rc<dyn Fn(&R) -> <R as PagingRenderer>::Node>;
pub type ErrorIndicatorBuilder<R> =
    Rc<dyn Fn(&R, &IndicatorContext) -> <R as PagingRenderer>::Node>;

/// Builds items and overrides the renderer's default indicators.
///
/// Unset indicator builders fall back to the [`PagingRenderer`] defaults,
/// except the no-more-items indicator which is simply omitted.
pub struct PagedChildBuilderDelegate<R: PagingRenderer, I: 'static> {
    item_builder: ItemBuilder<R, I>,
    first_page_error_indicator_builder: Option<ErrorIndicatorBuilder<R>>,
    new_page_error_indicator_builder: Option<ErrorIndicatorBuilder<R>>,
    first_page_progress_indicator_builder: Option<IndicatorBuilder<R>>,
    new_page_progress_indicator_builder: Option<IndicatorBuilder<R>>,
    no_items_found_indicator_builder: Option<IndicatorBuilder<R>>,
    no_more_items_indicator_builder: Option<IndicatorBuilder<R>>,
    pub animate_transitions: bool,
    pub transition_duration: Duration,
}

impl<R: PagingRenderer, I: 'static> Clone for PagedChildBuilderDelegate<R, I> {
    fn clone(&self) -> Self {
        Self {
            item_builder: Rc::clone(&self.item_builder),
            first_page_error_indicator_builder: self.first_page_error_indicator_builder.clone(),
            new_page_error_indicator_builder: self.new_page_error_indicator_builder.clone(),
            first_page_progress_indicator_builder: self
                .first_page_progress_indicator_builder
                .clone(),
            new_page_progress_indicator_builder: self.new_page_progress_indicator_builder.clone(),
            no_items_found_indicator_builder: self.no_items_found_indicator_builder.clone(),
            no_more_items_indicator_builder: self.no_more_items_indicator_builder.clone(),
            animate_transitions: self.animate_transitions,
            transition_duration: self.transition_duration,
        }
    }
}

impl<R: PagingRenderer, I: 'static> PagedChildBuilderDelegate<R, I> {
    pub fn new(item_builder: impl Fn(&R, &I, usize) -> R::Node + 'static) -> Self {
        Self {
            item_builder: Rc::new(item_builder),
            first_page_error_indicator_builder: None,
            new_page_error_indicator_builder: None,
            first_page_progress_indicator_builder: None,
            new_page_progress_indicator_builder: None,
            no_items_found_indicator_builder: None,
            no_more_items_indicator_builder: None,
            animate_transitions: false,
            transition_duration: DEFAULT_TRANSITION_DURATION,
        }
    }

    pub fn first_page_error_indicator_builder(
        mut self,
        builder: impl Fn(&R, &IndicatorContext) -> R::Node + 'static,
    ) -> Self {
        self.first_page_error_indicator_builder = Some(Rc::new(builder));
        self
    }

    pub fn new_page_error_indicator_builder(
        mut self,
        builder: impl Fn(&R, &IndicatorContext) -> R::Node + 'static,
    ) -> Self {
        self.new_page_error_indicator_builder = Some(Rc::new(builder));
        self
    }

    pub fn first_page_progress_indicator_builder(
        mut self,
        builder: impl Fn(&R) -> R::Node + 'static,
    ) -> Self {
        self.first_page_progress_indicator_builder = Some(Rc::new(builder));
        self
    }

    pub fn new_page_progress_indicator_builder(
        mut self,
        builder: impl Fn(&R) -> R::Node + 'static,
    ) -> Self {
        self.new_page_progress_indicator_builder = Some(Rc::new(builder));
        self
    }

    pub fn no_items_found_indicator_builder(
        mut self,
        builder: impl Fn(&R) -> R::Node + 'static,
    ) -> Self {
        self.no_items_found_indicator_builder = Some(Rc::new(builder));
        self
    }

    pub fn no_more_items_indicator_builder(
        mut self,
        builder: impl Fn(&R) -> R::Node + 'static,
    ) -> Self {
        self.no_more_items_indicator_builder = Some(Rc::new(builder));
        self
    }

    pub fn animate_transitions(mut self, animate: bool) -> Self {
        self.animate_transitions = animate;
        self
    }

    pub fn transition_duration(mut self, duration: Duration) -> Self {
        self.transition_duration = duration;
        self
    }

    pub fn build_item(&self, renderer: &R, item: &I, index: usize) -> R::Node {
        (self.item_builder)(renderer, item, index)
    }

    pub fn first_page_error_indicator(&self, renderer: &R, cx: &IndicatorContext) -> R::Node {
        match &self.first_page_error_indicator_builder {
            Some(builder) => builder(renderer, cx),
            None => renderer.first_page_error_indicator(cx),
        }
    }

    pub fn new_page_error_indicator(&self, renderer: &R, cx: &IndicatorContext) -> R::Node {
        match &self.new_page_error_indicator_builder {
            Some(builder) => builder(renderer, cx),
            None => renderer.new_page_error_indicator(cx),
        }
    }

    pub fn first_page_progress_indicator(&self, renderer: &R) -> R::Node {
        match &self.first_page_progress_indicator_builder {
            Some(builder) => builder(renderer),
            None => renderer.first_page_progress_indicator(),
        }
    }

    pub fn new_page_progress_indicator(&self, renderer: &R) -> R::Node {
        match &self.new_page_progress_indicator_builder {
            Some(builder) => builder(renderer),
            None => renderer.new_page_progress_indicator(),
        }
    }

    pub fn no_items_found_indicator(&self, renderer: &R) -> R::Node {
        match &self.no_items_found_indicator_builder {
            Some(builder) => builder(renderer),
            None => renderer.no_items_found_indicator(),
        }
    }

    /// `None` when no builder was set; completed listings then end with the
    /// last item.
    pub fn no_more_items_builder(&self) -> Option<&IndicatorBuilder<R>> {
        self.no_more_items_indicator_builder.as_ref()
    }
}

impl<R: PagingRenderer, I: 'static> fmt::Debug for PagedChildBuilderDelegate<R, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PagedChildBuilderDelegate")
            .field("animate_transitions", &self.animate_transitions)
            .field("transition_duration", &self.transition_duration)
            .field(
                "no_more_items_indicator",
                &self.no_more_items_indicator_builder.is_some(),
            )
            .finish_non_exhaustive()
    }
}
