//! Paged layouts for Pagewise.
//!
//! Maps a [`PagingController`](pagewise_foundation::PagingController)'s status
//! to a render branch and requests the next page as the user scrolls toward
//! the end of the loaded items.

pub mod branch;
pub mod delegate;
pub mod layout_builder;
pub mod layout_spec;
pub mod listing;
pub mod renderer;
pub mod separated;
pub mod trigger;

pub use branch::{BranchShape, RenderBranch};
pub use delegate::{PagedChildBuilderDelegate, DEFAULT_TRANSITION_DURATION};
pub use layout_builder::PagedLayoutBuilder;
pub use layout_spec::PagedLayoutSpec;
pub use listing::{GridIndicatorPlacement, ListingBuilders};
pub use renderer::{IndicatorContext, ListingRenderer, PagingRenderer, RetryAction};
pub use separated::{separated_child, separated_child_count, SeparatedChild};
pub use trigger::{next_page_trigger_index, NextPageTrigger};

pub mod prelude {
    pub use crate::delegate::PagedChildBuilderDelegate;
    pub use crate::layout_builder::PagedLayoutBuilder;
    pub use crate::layout_spec::PagedLayoutSpec;
    pub use crate::listing::GridIndicatorPlacement;
    pub use crate::renderer::{IndicatorContext, ListingRenderer, PagingRenderer};
    pub use pagewise_foundation::prelude::*;
}
