//! Listing builders: how the items and the trailing indicator are laid out.
//!
//! A listing builder receives the renderer, an item accessor, the item count
//! and the builder for the trailing indicator of its status. The ready-made
//! presets host everything in the renderer's lazy list or grid.

use std::fmt;
use std::rc::Rc;

use crate::renderer::{ListingRenderer, PagingRenderer};
use crate::separated::{separated_child, separated_child_count, SeparatedChild};

type Node<R> = <R as PagingRenderer>::Node;

/// Builds the loading or error listing. The indicator is mandatory.
pub type ListingBuilder<R> =
    Rc<dyn Fn(&R, &dyn Fn(usize) -> Node<R>, usize, &dyn Fn() -> Node<R>) -> Node<R>>;

/// Builds the completed listing, whose trailing indicator is optional.
pub type CompletedListingBuilder<R> =
    Rc<dyn Fn(&R, &dyn Fn(usize) -> Node<R>, usize, Option<&dyn Fn() -> Node<R>>) -> Node<R>>;

/// Where a grid places its trailing indicator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GridIndicatorPlacement {
    /// As one more grid cell after the last item.
    AsGridChild,
    /// Below the grid, spanning the full cross axis.
    #[default]
    Footer,
}

/// The three listing builders of a paged layout.
pub struct ListingBuilders<R: PagingRenderer> {
    pub loading: ListingBuilder<R>,
    pub error: ListingBuilder<R>,
    pub completed: CompletedListingBuilder<R>,
}

impl<R: PagingRenderer> Clone for ListingBuilders<R> {
    fn clone(&self) -> Self {
        Self {
            loading: Rc::clone(&self.loading),
            error: Rc::clone(&self.error),
            completed: Rc::clone(&self.completed),
        }
    }
}

impl<R: PagingRenderer> fmt::Debug for ListingBuilders<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListingBuilders").finish_non_exhaustive()
    }
}

impl<R: PagingRenderer> ListingBuilders<R> {
    pub fn new(
        loading: impl Fn(&R, &dyn Fn(usize) -> Node<R>, usize, &dyn Fn() -> Node<R>) -> Node<R>
            + 'static,
        error: impl Fn(&R, &dyn Fn(usize) -> Node<R>, usize, &dyn Fn() -> Node<R>) -> Node<R>
            + 'static,
        completed: impl Fn(&R, &dyn Fn(usize) -> Node<R>, usize, Option<&dyn Fn() -> Node<R>>) -> Node<R>
            + 'static,
    ) -> Self {
        Self {
            loading: Rc::new(loading),
            error: Rc::new(error),
            completed: Rc::new(completed),
        }
    }
}

impl<R: ListingRenderer> ListingBuilders<R> {
    /// Items in a lazy list, the indicator as its last child.
    pub fn list() -> Self {
        let with_indicator = |renderer: &R,
                              item: &dyn Fn(usize) -> Node<R>,
                              count: usize,
                              indicator: &dyn Fn() -> Node<R>| {
            renderer.lazy_list(count + 1, &|index| {
                if index == count {
                    indicator()
                } else {
                    item(index)
                }
            })
        };
        Self::new(
            with_indicator,
            with_indicator,
            move |renderer: &R,
                  item: &dyn Fn(usize) -> Node<R>,
                  count: usize,
                  indicator: Option<&dyn Fn() -> Node<R>>| match indicator {
                Some(indicator) => with_indicator(renderer, item, count, indicator),
                None => renderer.lazy_list(count, item),
            },
        )
    }

    /// Items interleaved with separators in a lazy list. The indicator
    /// follows the last item without a separator in between.
    pub fn separated(separator_builder: impl Fn(&R, usize) -> Node<R> + 'static) -> Self {
        let separator_builder = Rc::new(separator_builder);
        let build = move |renderer: &R,
                          item: &dyn Fn(usize) -> Node<R>,
                          count: usize,
                          indicator: Option<&dyn Fn() -> Node<R>>| {
            let children = separated_child_count(count);
            let child = |index: usize| match separated_child(index) {
                SeparatedChild::Item(item_index) => item(item_index),
                SeparatedChild::Separator(after) => separator_builder(renderer, after),
            };
            match indicator {
                Some(indicator) => renderer.lazy_list(children + 1, &|index| {
                    if index == children {
                        indicator()
                    } else {
                        child(index)
                    }
                }),
                None => renderer.lazy_list(children, &child),
            }
        };
        let build = Rc::new(build);
        let loading = Rc::clone(&build);
        let error = Rc::clone(&build);
        Self::new(
            move |renderer: &R,
                  item: &dyn Fn(usize) -> Node<R>,
                  count: usize,
                  indicator: &dyn Fn() -> Node<R>| {
                loading(renderer, item, count, Some(indicator))
            },
            move |renderer: &R,
                  item: &dyn Fn(usize) -> Node<R>,
                  count: usize,
                  indicator: &dyn Fn() -> Node<R>| {
                error(renderer, item, count, Some(indicator))
            },
            move |renderer: &R,
                  item: &dyn Fn(usize) -> Node<R>,
                  count: usize,
                  indicator: Option<&dyn Fn() -> Node<R>>| {
                build(renderer, item, count, indicator)
            },
        )
    }

    /// Items in a lazy grid.
    pub fn grid(placement: GridIndicatorPlacement) -> Self {
        let build = move |renderer: &R,
                          item: &dyn Fn(usize) -> Node<R>,
                          count: usize,
                          indicator: Option<&dyn Fn() -> Node<R>>| {
            match (indicator, placement) {
                (None, _) => renderer.lazy_grid(count, item, None),
                (Some(indicator), GridIndicatorPlacement::Footer) => {
                    renderer.lazy_grid(count, item, Some(indicator()))
                }
                (Some(indicator), GridIndicatorPlacement::AsGridChild) => renderer.lazy_grid(
                    count + 1,
                    &|index| {
                        if index == count {
                            indicator()
                        } else {
                            item(index)
                        }
                    },
                    None,
                ),
            }
        };
        Self::new(
            move |renderer: &R,
                  item: &dyn Fn(usize) -> Node<R>,
                  count: usize,
                  indicator: &dyn Fn() -> Node<R>| {
                build(renderer, item, count, Some(indicator))
            },
            move |renderer: &R,
                  item: &dyn Fn(usize) -> Node<R>,
                  count: usize,
                  indicator: &dyn Fn() -> Node<R>| {
                build(renderer, item, count, Some(indicator))
            },
            build,
        )
    }
}
