//! Layout configuration for paged layouts.

/// How a paged layout hosts its single-indicator branches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PagedLayoutSpec {
    /// Size first-page indicators to their content instead of the viewport.
    pub shrink_wrap_first_page_indicators: bool,
    /// Whether the layout lives inside a sliver scroll view.
    ///
    /// Sliver layouts wrap single indicators with fill-remaining and may
    /// animate branch transitions. Box layouts center them and never animate.
    pub is_sliver: bool,
}

impl Default for PagedLayoutSpec {
    fn default() -> Self {
        Self {
            shrink_wrap_first_page_indicators: false,
            is_sliver: true,
        }
    }
}

impl PagedLayoutSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// A plain box layout, outside any sliver scroll view.
    pub fn boxed() -> Self {
        Self {
            is_sliver: false,
            ..Self::default()
        }
    }

    pub fn shrink_wrap_first_page_indicators(mut self, shrink_wrap: bool) -> Self {
        self.shrink_wrap_first_page_indicators = shrink_wrap;
        self
    }

    pub fn is_sliver(mut self, is_sliver: bool) -> Self {
        self.is_sliver = is_sliver;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_sliver_without_shrink_wrap() {
        let spec = PagedLayoutSpec::default();
        assert!(spec.is_sliver);
        assert!(!spec.shrink_wrap_first_page_indicators);
        assert!(!PagedLayoutSpec::boxed().is_sliver);
    }
}
