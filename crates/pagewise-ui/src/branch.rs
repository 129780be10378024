//! Status to render-branch mapping.

use pagewise_foundation::PagingStatus;

/// What a paged layout renders for a given status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RenderBranch {
    FirstPageProgress,
    FirstPageError,
    NoItemsFound,
    /// Items followed by the new-page progress indicator.
    LoadingListing,
    /// Items followed by the new-page error indicator.
    ErrorListing,
    /// Items followed by the optional no-more-items indicator.
    CompletedListing,
}

/// Coarse shape of a branch, as seen by the layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BranchShape {
    /// A single indicator filling (or centered in) the viewport.
    SingleIndicator,
    /// The item listing with a trailing indicator slot.
    Listing,
}

impl RenderBranch {
    pub fn for_status(status: PagingStatus) -> Self {
        match status {
            PagingStatus::Ongoing => RenderBranch::LoadingListing,
            PagingStatus::Completed => RenderBranch::CompletedListing,
            PagingStatus::LoadingFirstPage => RenderBranch::FirstPageProgress,
            PagingStatus::SubsequentPageError => RenderBranch::ErrorListing,
            PagingStatus::NoItemsFound => RenderBranch::NoItemsFound,
            PagingStatus::FirstPageError => RenderBranch::FirstPageError,
        }
    }

    pub fn shape(self) -> BranchShape {
        match self {
            RenderBranch::FirstPageProgress
            | RenderBranch::FirstPageError
            | RenderBranch::NoItemsFound => BranchShape::SingleIndicator,
            RenderBranch::LoadingListing
            | RenderBranch::ErrorListing
            | RenderBranch::CompletedListing => BranchShape::Listing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_status_has_its_own_branch() {
        let mut branches: Vec<_> = PagingStatus::ALL
            .into_iter()
            .map(RenderBranch::for_status)
            .collect();
        branches.dedup();
        assert_eq!(branches.len(), PagingStatus::ALL.len());
    }

    #[test]
    fn listing_shape_matches_status_listing() {
        for status in PagingStatus::ALL {
            let shape = RenderBranch::for_status(status).shape();
            assert_eq!(shape == BranchShape::Listing, status.has_listing(), "{status}");
        }
    }
}
