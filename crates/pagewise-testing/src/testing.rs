use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use pagewise_core::{Runtime, RuntimeHandle, RuntimeScheduler};
use pagewise_foundation::PagingController;
use pagewise_ui::{PagedChildBuilderDelegate, PagedLayoutBuilder};

use crate::test_renderer::{RecordingRenderer, TestNode};

/// Scheduler that counts frame requests instead of driving a display.
#[derive(Debug, Default)]
pub struct CountingScheduler {
    frames: AtomicUsize,
}

impl CountingScheduler {
    pub fn frames_requested(&self) -> usize {
        self.frames.load(Ordering::SeqCst)
    }
}

impl RuntimeScheduler for CountingScheduler {
    fn schedule_frame(&self) {
        self.frames.fetch_add(1, Ordering::SeqCst);
    }
}

/// Headless host that owns a runtime and pumps frames by hand.
///
/// A frame builds the layout, then flushes post-frame callbacks and queued
/// UI work, the way a real host drives its render loop.
pub struct TestHost {
    runtime: Runtime,
    scheduler: Arc<CountingScheduler>,
    renderer: RecordingRenderer,
}

impl Default for TestHost {
    fn default() -> Self {
        Self::new()
    }
}

impl TestHost {
    pub fn new() -> Self {
        let scheduler = Arc::new(CountingScheduler::default());
        let runtime = Runtime::new(Arc::clone(&scheduler) as Arc<dyn RuntimeScheduler>);
        Self {
            runtime,
            scheduler,
            renderer: RecordingRenderer::new(),
        }
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub fn handle(&self) -> RuntimeHandle {
        self.runtime.handle()
    }

    pub fn renderer(&self) -> &RecordingRenderer {
        &self.renderer
    }

    /// Frames requested from the host so far.
    pub fn frames_requested(&self) -> usize {
        self.scheduler.frames_requested()
    }

    /// Builds `layout` inside a frame and flushes everything queued after it.
    pub fn pump<K, I>(&self, layout: &PagedLayoutBuilder<K, I, RecordingRenderer>) -> TestNode
    where
        K: Clone + PartialEq + 'static,
        I: Clone + 'static,
    {
        self.runtime.run_frame(|| layout.build(&self.renderer))
    }

    /// Builds `layout` without running the post-frame queue.
    pub fn build_only<K, I>(&self, layout: &PagedLayoutBuilder<K, I, RecordingRenderer>) -> TestNode
    where
        K: Clone + PartialEq + 'static,
        I: Clone + 'static,
    {
        layout.build(&self.renderer)
    }

    /// Flushes post-frame callbacks and UI work without building.
    pub fn flush(&self) {
        self.runtime.drain_post_frame_callbacks();
        self.runtime.drain_ui();
    }

    /// A list layout over `controller` with the labelled item delegate.
    pub fn list(
        &self,
        controller: &PagingController<u32, String>,
    ) -> PagedLayoutBuilder<u32, String, RecordingRenderer> {
        PagedLayoutBuilder::list(
            controller,
            self.handle(),
            item_delegate(),
            Default::default(),
        )
    }
}

/// Delegate that renders each item as [`TestNode::Item`] with its label.
pub fn item_delegate() -> PagedChildBuilderDelegate<RecordingRenderer, String> {
    PagedChildBuilderDelegate::new(|_renderer: &RecordingRenderer, item: &String, index| {
        TestNode::item(index, item.as_str())
    })
}

/// `count` labels `"{prefix}{n}"`, numbered from `start`.
pub fn labels(prefix: &str, start: usize, count: usize) -> Vec<String> {
    (start..start + count)
        .map(|n| format!("{prefix}{n}"))
        .collect()
}
