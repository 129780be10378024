//! Paging foundation for Pagewise: the paging snapshot, the controller that
//! owns it, and the adapter that feeds it from async fetches.

pub mod controller;
pub mod error;
pub mod fetcher;
pub mod state;

pub use controller::{PagingController, WeakPagingController, DEFAULT_INVISIBLE_ITEMS_THRESHOLD};
pub use error::{PageError, PagingError};
pub use fetcher::{Page, PageFetcher};
pub use state::{PagingState, PagingStatus};

pub mod prelude {
    pub use crate::controller::{PagingController, WeakPagingController};
    pub use crate::error::{PageError, PagingError};
    pub use crate::fetcher::{Page, PageFetcher};
    pub use crate::state::{PagingState, PagingStatus};
}
