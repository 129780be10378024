//! Paging snapshot and its derived status.

use std::fmt;
use std::rc::Rc;

use crate::error::PageError;

/// Where pagination currently stands.
///
/// Never stored: always derived from a [`PagingState`] by
/// [`PagingStatus::classify`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PagingStatus {
    /// Nothing loaded yet and no failure.
    LoadingFirstPage,
    /// The very first fetch failed.
    FirstPageError,
    /// The first page came back empty and there is nothing more.
    NoItemsFound,
    /// Items are loaded and another page exists.
    Ongoing,
    /// Items are loaded but fetching the next page failed.
    SubsequentPageError,
    /// Items are loaded and there are no more pages.
    Completed,
}

impl PagingStatus {
    /// Every status, in declaration order.
    pub const ALL: [PagingStatus; 6] = [
        PagingStatus::LoadingFirstPage,
        PagingStatus::FirstPageError,
        PagingStatus::NoItemsFound,
        PagingStatus::Ongoing,
        PagingStatus::SubsequentPageError,
        PagingStatus::Completed,
    ];

    /// Classifies a paging triple.
    ///
    /// `item_count` is `None` while no page has been applied. Empty item lists
    /// carrying an error fall back to [`FirstPageError`](Self::FirstPageError);
    /// empty item lists that still have a next key count as
    /// [`LoadingFirstPage`](Self::LoadingFirstPage).
    pub fn classify(item_count: Option<usize>, has_error: bool, has_next_page: bool) -> Self {
        match (item_count, has_error, has_next_page) {
            (None, false, _) => PagingStatus::LoadingFirstPage,
            (None, true, _) => PagingStatus::FirstPageError,
            (Some(0), true, _) => PagingStatus::FirstPageError,
            (Some(0), false, false) => PagingStatus::NoItemsFound,
            (Some(0), false, true) => PagingStatus::LoadingFirstPage,
            (Some(_), true, _) => PagingStatus::SubsequentPageError,
            (Some(_), false, true) => PagingStatus::Ongoing,
            (Some(_), false, false) => PagingStatus::Completed,
        }
    }

    /// Whether this status renders the item listing rather than a single
    /// first-page indicator.
    pub fn has_listing(self) -> bool {
        matches!(
            self,
            PagingStatus::Ongoing | PagingStatus::SubsequentPageError | PagingStatus::Completed
        )
    }

    pub fn is_error(self) -> bool {
        matches!(
            self,
            PagingStatus::FirstPageError | PagingStatus::SubsequentPageError
        )
    }
}

impl fmt::Display for PagingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PagingStatus::LoadingFirstPage => "loading first page",
            PagingStatus::FirstPageError => "first page error",
            PagingStatus::NoItemsFound => "no items found",
            PagingStatus::Ongoing => "ongoing",
            PagingStatus::SubsequentPageError => "subsequent page error",
            PagingStatus::Completed => "completed",
        };
        f.write_str(name)
    }
}

/// Immutable snapshot of pagination.
///
/// Items are shared behind an `Rc`, so cloning a state is cheap and the
/// controller only copies the item list when someone still holds an older
/// snapshot.
pub struct PagingState<K, I> {
    items: Option<Rc<Vec<I>>>,
    error: Option<PageError>,
    next_key: Option<K>,
}

impl<K, I> PagingState<K, I> {
    pub fn new(items: Option<Vec<I>>, error: Option<PageError>, next_key: Option<K>) -> Self {
        Self {
            items: items.map(Rc::new),
            error,
            next_key,
        }
    }

    /// State before anything was fetched: the first page is pending under `first_page_key`.
    pub fn initial(first_page_key: K) -> Self {
        Self {
            items: None,
            error: None,
            next_key: Some(first_page_key),
        }
    }

    pub fn items(&self) -> Option<&[I]> {
        self.items.as_deref().map(Vec::as_slice)
    }

    pub fn error(&self) -> Option<&PageError> {
        self.error.as_ref()
    }

    pub fn next_key(&self) -> Option<&K> {
        self.next_key.as_ref()
    }

    pub fn item_count(&self) -> usize {
        self.items.as_ref().map_or(0, |items| items.len())
    }

    pub fn item_at(&self, index: usize) -> Option<&I> {
        self.items.as_ref().and_then(|items| items.get(index))
    }

    pub fn has_next_page(&self) -> bool {
        self.next_key.is_some()
    }

    pub fn status(&self) -> PagingStatus {
        PagingStatus::classify(
            self.items.as_ref().map(|items| items.len()),
            self.error.is_some(),
            self.next_key.is_some(),
        )
    }

    /// Whether both snapshots share the same item allocation.
    pub fn shares_items_with(&self, other: &Self) -> bool {
        match (&self.items, &other.items) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    pub(crate) fn set_error(&mut self, error: Option<PageError>) {
        self.error = error;
    }

    pub(crate) fn set_next_key(&mut self, next_key: Option<K>) {
        self.next_key = next_key;
    }

    pub(crate) fn set_items(&mut self, items: Option<Vec<I>>) {
        self.items = items.map(Rc::new);
    }
}

impl<K, I: Clone> PagingState<K, I> {
    /// Appends a page, starting the item list if none was loaded.
    pub(crate) fn append_items(&mut self, new_items: Vec<I>) {
        match &mut self.items {
            Some(items) => Rc::make_mut(items).extend(new_items),
            None => self.items = Some(Rc::new(new_items)),
        }
    }
}

impl<K: Clone, I> Clone for PagingState<K, I> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            error: self.error.clone(),
            next_key: self.next_key.clone(),
        }
    }
}

impl<K: PartialEq, I: PartialEq> PartialEq for PagingState<K, I> {
    fn eq(&self, other: &Self) -> bool {
        self.items() == other.items()
            && self.error == other.error
            && self.next_key == other.next_key
    }
}

impl<K: fmt::Debug, I: fmt::Debug> fmt::Debug for PagingState<K, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PagingState")
            .field("status", &self.status())
            .field("items", &self.items())
            .field("error", &self.error)
            .field("next_key", &self.next_key)
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod tests;
