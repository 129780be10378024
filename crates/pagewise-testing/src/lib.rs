//! Testing utilities and harness for Pagewise.

mod test_renderer;
mod testing;

pub use test_renderer::{IndicatorKind, RecordingRenderer, TestNode};
pub use testing::{item_delegate, labels, CountingScheduler, TestHost};

#[cfg(test)]
mod tests {
    use super::*;
    use pagewise_foundation::PagingController;

    #[test]
    fn pump_builds_first_page_progress() {
        let host = TestHost::new();
        let controller = PagingController::<u32, String>::new(1);
        let layout = host.list(&controller);

        let node = host.pump(&layout);

        assert_eq!(
            node.unwrapped(),
            &TestNode::Indicator(IndicatorKind::FirstPageProgress)
        );
    }

    #[test]
    fn visible_children_limit_lazy_layout() {
        let host = TestHost::new();
        let controller = PagingController::<u32, String>::new(1);
        controller.append_last_page(labels("item", 0, 10)).unwrap();
        host.renderer().set_visible_children(Some(4));

        let node = host.pump(&host.list(&controller));

        assert_eq!(node.child_count(), Some(10));
        assert_eq!(node.item_labels(), labels("item", 0, 4));
    }

    #[test]
    fn labels_are_numbered_from_start() {
        assert_eq!(labels("p", 3, 2), vec!["p3".to_string(), "p4".to_string()]);
    }
}
