use std::cell::{Cell, RefCell};
use std::time::Duration;

use pagewise_foundation::PageError;
use pagewise_ui::{IndicatorContext, ListingRenderer, PagingRenderer, RenderBranch, RetryAction};

/// Which indicator a [`TestNode::Indicator`] stands for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IndicatorKind {
    FirstPageError,
    NewPageError,
    FirstPageProgress,
    NewPageProgress,
    NoItemsFound,
    NoMoreItems,
    Custom(&'static str),
}

/// Node tree produced by [`RecordingRenderer`].
#[derive(Clone, Debug, PartialEq)]
pub enum TestNode {
    Item {
        index: usize,
        label: String,
    },
    /// Separator following the item at this index.
    Separator(usize),
    Indicator(IndicatorKind),
    FillRemaining {
        child: Box<TestNode>,
        shrink_wrap: bool,
    },
    Centered {
        child: Box<TestNode>,
        shrink_wrap: bool,
    },
    Animated {
        branch: RenderBranch,
        child: Box<TestNode>,
        duration: Duration,
    },
    /// Lazy list. `children` holds only the children that were laid out.
    List {
        child_count: usize,
        children: Vec<TestNode>,
    },
    Grid {
        child_count: usize,
        children: Vec<TestNode>,
        footer: Option<Box<TestNode>>,
    },
}

impl TestNode {
    pub fn item(index: usize, label: impl Into<String>) -> Self {
        TestNode::Item {
            index,
            label: label.into(),
        }
    }

    /// Strips single-child wrappers (fill-remaining, centered, animated).
    pub fn unwrapped(&self) -> &TestNode {
        match self {
            TestNode::FillRemaining { child, .. }
            | TestNode::Centered { child, .. }
            | TestNode::Animated { child, .. } => child.unwrapped(),
            other => other,
        }
    }

    /// Laid-out children of a list or grid, empty for anything else.
    pub fn children(&self) -> &[TestNode] {
        match self.unwrapped() {
            TestNode::List { children, .. } | TestNode::Grid { children, .. } => children,
            _ => &[],
        }
    }

    /// Child count reported to the lazy container, `None` for anything else.
    pub fn child_count(&self) -> Option<usize> {
        match self.unwrapped() {
            TestNode::List { child_count, .. } | TestNode::Grid { child_count, .. } => {
                Some(*child_count)
            }
            _ => None,
        }
    }

    /// Labels of the item children, in order.
    pub fn item_labels(&self) -> Vec<String> {
        self.children()
            .iter()
            .filter_map(|child| match child {
                TestNode::Item { label, .. } => Some(label.clone()),
                _ => None,
            })
            .collect()
    }

    /// Last laid-out child, or the footer of a grid.
    pub fn trailing(&self) -> Option<&TestNode> {
        match self.unwrapped() {
            TestNode::Grid {
                footer: Some(footer),
                ..
            } => Some(footer),
            _ => self.children().last(),
        }
    }
}

/// Renderer that records what the paged layout asked for.
///
/// Lazy containers lay out every child unless [`visible_children`] limits
/// them, which simulates a viewport showing only the first few children.
///
/// [`visible_children`]: RecordingRenderer::set_visible_children
#[derive(Default)]
pub struct RecordingRenderer {
    visible_children: Cell<Option<usize>>,
    last_retry: RefCell<Option<RetryAction>>,
    last_error: RefCell<Option<PageError>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lays out at most `count` children per container, or all with `None`.
    pub fn set_visible_children(&self, count: Option<usize>) {
        self.visible_children.set(count);
    }

    /// Invokes the retry action of the last error indicator built.
    /// Returns `false` when no error indicator was built yet.
    pub fn retry(&self) -> bool {
        let retry = self.last_retry.borrow().clone();
        match retry {
            Some(retry) => {
                retry.retry();
                true
            }
            None => false,
        }
    }

    pub fn last_error(&self) -> Option<PageError> {
        self.last_error.borrow().clone()
    }

    fn record_error(&self, cx: &IndicatorContext) {
        *self.last_retry.borrow_mut() = Some(cx.retry.clone());
        *self.last_error.borrow_mut() = cx.error.clone();
    }

    fn lay_out(&self, child_count: usize, child: &dyn Fn(usize) -> TestNode) -> Vec<TestNode> {
        let visible = self
            .visible_children
            .get()
            .map_or(child_count, |limit| limit.min(child_count));
        (0..visible).map(child).collect()
    }
}

impl PagingRenderer for RecordingRenderer {
    type Node = TestNode;

    fn first_page_error_indicator(&self, cx: &IndicatorContext) -> TestNode {
        self.record_error(cx);
        TestNode::Indicator(IndicatorKind::FirstPageError)
    }

    fn new_page_error_indicator(&self, cx: &IndicatorContext) -> TestNode {
        self.record_error(cx);
        TestNode::Indicator(IndicatorKind::NewPageError)
    }

    fn first_page_progress_indicator(&self) -> TestNode {
        TestNode::Indicator(IndicatorKind::FirstPageProgress)
    }

    fn new_page_progress_indicator(&self) -> TestNode {
        TestNode::Indicator(IndicatorKind::NewPageProgress)
    }

    fn no_items_found_indicator(&self) -> TestNode {
        TestNode::Indicator(IndicatorKind::NoItemsFound)
    }

    fn fill_remaining(&self, indicator: TestNode, shrink_wrap: bool) -> TestNode {
        TestNode::FillRemaining {
            child: Box::new(indicator),
            shrink_wrap,
        }
    }

    fn centered(&self, indicator: TestNode, shrink_wrap: bool) -> TestNode {
        TestNode::Centered {
            child: Box::new(indicator),
            shrink_wrap,
        }
    }

    fn animated_switcher(
        &self,
        branch: RenderBranch,
        child: TestNode,
        duration: Duration,
    ) -> TestNode {
        TestNode::Animated {
            branch,
            child: Box::new(child),
            duration,
        }
    }
}

impl ListingRenderer for RecordingRenderer {
    fn lazy_list(&self, child_count: usize, child: &dyn Fn(usize) -> TestNode) -> TestNode {
        TestNode::List {
            child_count,
            children: self.lay_out(child_count, child),
        }
    }

    fn lazy_grid(
        &self,
        child_count: usize,
        child: &dyn Fn(usize) -> TestNode,
        footer: Option<TestNode>,
    ) -> TestNode {
        TestNode::Grid {
            child_count,
            children: self.lay_out(child_count, child),
            footer: footer.map(Box::new),
        }
    }
}
