//! Next-page request triggering.
//!
//! Decides, item by item, when a paged layout should ask for the next page.
//! The request fires while the item `threshold` positions from the end is
//! being built, and at most once until a new page or next key lands.

use pagewise_foundation::PagingStatus;

/// Index whose build triggers the next page request.
///
/// Saturates at zero, so a threshold at or above the item count fires on the
/// first item.
pub fn next_page_trigger_index(item_count: usize, invisible_items_threshold: usize) -> usize {
    item_count.saturating_sub(invisible_items_threshold)
}

/// Duplicate-request suppression for one paged layout.
#[derive(Clone, Debug)]
pub struct NextPageTrigger {
    invisible_items_threshold: usize,
    has_requested_next_page: bool,
    last_status: Option<PagingStatus>,
    /// Controller request count seen when an error cleared on an unchanged
    /// page. Resolved on the next build.
    cleared_error_at: Option<u64>,
}

impl NextPageTrigger {
    pub fn new(invisible_items_threshold: usize) -> Self {
        Self {
            invisible_items_threshold,
            has_requested_next_page: false,
            last_status: None,
            cleared_error_at: None,
        }
    }

    pub fn invisible_items_threshold(&self) -> usize {
        self.invisible_items_threshold
    }

    pub fn has_requested_next_page(&self) -> bool {
        self.has_requested_next_page
    }

    /// Feeds a newly observed paging value.
    ///
    /// `page_changed` is set when the items or the next key differ from the
    /// previous value; any such change re-arms the trigger. An `Ongoing`
    /// value on an unchanged page re-arms it too, unless it only clears a
    /// `SubsequentPageError`. In that case the decision waits for
    /// [`begin_build`](Self::begin_build): a retry re-requests the page
    /// itself, a bare error clear does not.
    pub fn observe(&mut self, status: PagingStatus, page_changed: bool, request_count: u64) {
        let after_error = self.last_status == Some(PagingStatus::SubsequentPageError);
        self.last_status = Some(status);
        self.cleared_error_at = None;
        if page_changed {
            self.has_requested_next_page = false;
        } else if status == PagingStatus::Ongoing {
            if after_error {
                self.cleared_error_at = Some(request_count);
            } else {
                self.has_requested_next_page = false;
            }
        }
    }

    /// Called before the items of a build. `request_count` is the
    /// controller's current page request count.
    pub fn begin_build(&mut self, request_count: u64) {
        if let Some(seen) = self.cleared_error_at.take() {
            if seen == request_count {
                self.has_requested_next_page = false;
            }
        }
    }

    /// Called while building item `index`. Returns `true` exactly when the
    /// caller must schedule a next page request, and marks it as requested.
    pub fn on_item_built(
        &mut self,
        index: usize,
        item_count: usize,
        status: PagingStatus,
        has_next_page: bool,
    ) -> bool {
        if self.has_requested_next_page || !has_next_page {
            return false;
        }
        // Error listings wait for an explicit retry.
        if status == PagingStatus::SubsequentPageError {
            return false;
        }
        if index != next_page_trigger_index(item_count, self.invisible_items_threshold) {
            return false;
        }
        self.has_requested_next_page = true;
        true
    }
}

#[cfg(test)]
#[path = "tests/trigger_tests.rs"]
mod tests;
