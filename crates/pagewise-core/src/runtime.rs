use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::rc::{Rc, Weak};
use std::sync::Arc;
use std::task::{Context, Poll, Waker};
use std::thread::ThreadId;

use crate::platform::RuntimeScheduler;
use crate::post_frame::PostFrameRegistration;

pub type PostFrameCallbackId = u64;
pub type TaskId = u64;

struct TaskEntry {
    id: TaskId,
    future: Pin<Box<dyn Future<Output = ()> + 'static>>,
}

struct PostFrameEntry {
    id: PostFrameCallbackId,
    callback: Option<Box<dyn FnOnce() + 'static>>,
}

struct RuntimeInner {
    scheduler: Arc<dyn RuntimeScheduler>,
    needs_frame: Cell<bool>,
    frame_count: Cell<u64>,
    in_frame: Cell<bool>,
    post_frame_callbacks: RefCell<VecDeque<PostFrameEntry>>,
    next_post_frame_id: Cell<PostFrameCallbackId>,
    local_tasks: RefCell<VecDeque<Box<dyn FnOnce() + 'static>>>,
    tasks: RefCell<Vec<TaskEntry>>,
    next_task_id: Cell<TaskId>,
    task_waker: RefCell<Option<Waker>>,
    ui_thread_id: ThreadId,
}

impl RuntimeInner {
    fn new(scheduler: Arc<dyn RuntimeScheduler>) -> Self {
        Self {
            scheduler,
            needs_frame: Cell::new(false),
            frame_count: Cell::new(0),
            in_frame: Cell::new(false),
            post_frame_callbacks: RefCell::new(VecDeque::new()),
            next_post_frame_id: Cell::new(1),
            local_tasks: RefCell::new(VecDeque::new()),
            tasks: RefCell::new(Vec::new()),
            next_task_id: Cell::new(1),
            task_waker: RefCell::new(None),
            ui_thread_id: std::thread::current().id(),
        }
    }

    fn init_task_waker(&self) {
        let waker = RuntimeTaskWaker::new(Arc::clone(&self.scheduler)).into_waker();
        *self.task_waker.borrow_mut() = Some(waker);
    }

    fn schedule(&self) {
        self.needs_frame.set(true);
        self.scheduler.schedule_frame();
    }

    /// Queues a closure on the UI thread's local queue.
    ///
    /// The closure may capture `Rc`/`RefCell` values because it never leaves
    /// the runtime thread.
    fn enqueue_ui_task(&self, task: Box<dyn FnOnce() + 'static>) {
        self.local_tasks.borrow_mut().push_back(task);
        self.schedule();
    }

    fn spawn_ui_task(&self, future: Pin<Box<dyn Future<Output = ()> + 'static>>) -> TaskId {
        let id = self.next_task_id.get();
        self.next_task_id.set(id + 1);
        self.tasks.borrow_mut().push(TaskEntry { id, future });
        self.schedule();
        id
    }

    fn cancel_task(&self, id: TaskId) {
        self.tasks.borrow_mut().retain(|entry| entry.id != id);
    }

    fn has_task(&self, id: TaskId) -> bool {
        self.tasks
            .try_borrow()
            .map(|tasks| tasks.iter().any(|entry| entry.id == id))
            .unwrap_or(true)
    }

    fn poll_async_tasks(&self) -> bool {
        let waker = match self.task_waker.borrow().as_ref() {
            Some(waker) => waker.clone(),
            None => return false,
        };
        let mut cx = Context::from_waker(&waker);
        let tasks = std::mem::take(&mut *self.tasks.borrow_mut());
        let mut pending = Vec::with_capacity(tasks.len());
        let mut made_progress = false;
        for mut entry in tasks {
            match entry.future.as_mut().poll(&mut cx) {
                Poll::Ready(()) => made_progress = true,
                Poll::Pending => pending.push(entry),
            }
        }
        if !pending.is_empty() {
            // Tasks spawned while polling were pushed into the emptied vec.
            let mut tasks = self.tasks.borrow_mut();
            let spawned = std::mem::take(&mut *tasks);
            tasks.extend(pending);
            tasks.extend(spawned);
        }
        made_progress
    }

    fn drain_ui(&self) {
        loop {
            let mut executed = false;

            loop {
                let task = self.local_tasks.borrow_mut().pop_front();
                match task {
                    Some(task) => {
                        executed = true;
                        task();
                    }
                    None => break,
                }
            }

            if self.poll_async_tasks() {
                executed = true;
            }

            if !executed {
                break;
            }
        }
    }

    fn has_pending_ui(&self) -> bool {
        let local_pending = self
            .local_tasks
            .try_borrow()
            .map(|tasks| !tasks.is_empty())
            .unwrap_or(true);
        let async_pending = self
            .tasks
            .try_borrow()
            .map(|tasks| !tasks.is_empty())
            .unwrap_or(true);
        local_pending || async_pending
    }

    fn has_post_frame_callbacks(&self) -> bool {
        !self.post_frame_callbacks.borrow().is_empty()
    }

    fn add_post_frame_callback(
        &self,
        callback: Box<dyn FnOnce() + 'static>,
    ) -> PostFrameCallbackId {
        debug_assert_eq!(
            std::thread::current().id(),
            self.ui_thread_id,
            "post-frame callback registered off the runtime thread",
        );
        let id = self.next_post_frame_id.get();
        self.next_post_frame_id.set(id + 1);
        self.post_frame_callbacks
            .borrow_mut()
            .push_back(PostFrameEntry {
                id,
                callback: Some(callback),
            });
        if !self.in_frame.get() {
            self.schedule();
        }
        id
    }

    fn cancel_post_frame_callback(&self, id: PostFrameCallbackId) {
        let mut callbacks = self.post_frame_callbacks.borrow_mut();
        if let Some(index) = callbacks.iter().position(|entry| entry.id == id) {
            callbacks.remove(index);
        }
    }

    fn drain_post_frame_callbacks(&self) {
        // Callbacks registered while draining belong to the next frame.
        let entries: Vec<PostFrameEntry> =
            self.post_frame_callbacks.borrow_mut().drain(..).collect();
        for mut entry in entries {
            if let Some(callback) = entry.callback.take() {
                callback();
            }
        }
    }

    fn settle_needs_frame(&self) {
        if !self.has_post_frame_callbacks() && !self.has_pending_ui() {
            self.needs_frame.set(false);
        }
    }
}

/// Owning handle to the UI-thread runtime.
///
/// The runtime does not run an event loop. The host calls
/// [`Runtime::run_frame`] (or the individual drain methods) whenever its
/// [`RuntimeScheduler`] asked for a frame.
#[derive(Clone)]
pub struct Runtime {
    inner: Rc<RuntimeInner>,
}

impl Runtime {
    pub fn new(scheduler: Arc<dyn RuntimeScheduler>) -> Self {
        let inner = Rc::new(RuntimeInner::new(scheduler));
        inner.init_task_waker();
        Self { inner }
    }

    pub fn handle(&self) -> RuntimeHandle {
        RuntimeHandle {
            inner: Rc::downgrade(&self.inner),
            ui_thread_id: self.inner.ui_thread_id,
        }
    }

    pub fn needs_frame(&self) -> bool {
        self.inner.needs_frame.get()
    }

    pub fn frame_count(&self) -> u64 {
        self.inner.frame_count.get()
    }

    /// Runs one render pass.
    ///
    /// `render` executes first; post-frame callbacks registered during it run
    /// once it returns, followed by any UI work they queued.
    pub fn run_frame<R>(&self, render: impl FnOnce() -> R) -> R {
        let inner = &self.inner;
        inner.frame_count.set(inner.frame_count.get() + 1);
        inner.in_frame.set(true);
        let result = render();
        inner.in_frame.set(false);
        inner.drain_post_frame_callbacks();
        inner.drain_ui();
        inner.settle_needs_frame();
        result
    }

    pub fn drain_ui(&self) {
        self.inner.drain_ui();
        self.inner.settle_needs_frame();
    }

    pub fn drain_post_frame_callbacks(&self) {
        self.inner.drain_post_frame_callbacks();
        self.inner.settle_needs_frame();
    }

    pub fn has_pending_ui(&self) -> bool {
        self.inner.has_pending_ui()
    }

    pub fn has_post_frame_callbacks(&self) -> bool {
        self.inner.has_post_frame_callbacks()
    }
}

#[derive(Default)]
pub struct DefaultScheduler;

impl RuntimeScheduler for DefaultScheduler {
    fn schedule_frame(&self) {}
}

/// Non-owning handle to a [`Runtime`].
///
/// Every operation silently does nothing once the runtime has been dropped.
#[derive(Clone)]
pub struct RuntimeHandle {
    inner: Weak<RuntimeInner>,
    ui_thread_id: ThreadId,
}

#[must_use = "dropping a TaskHandle does not cancel the task; call cancel()"]
pub struct TaskHandle {
    id: TaskId,
    runtime: RuntimeHandle,
}

impl RuntimeHandle {
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    pub fn schedule(&self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.schedule();
        }
    }

    /// Schedules work that must run on the runtime thread.
    ///
    /// The closure runs the next time the runtime drains its local queue.
    /// If the runtime is gone the closure runs immediately.
    pub fn enqueue_ui_task(&self, task: Box<dyn FnOnce() + 'static>) {
        if let Some(inner) = self.inner.upgrade() {
            inner.enqueue_ui_task(task);
        } else {
            task();
        }
    }

    pub fn spawn_ui<F>(&self, fut: F) -> Option<TaskHandle>
    where
        F: Future<Output = ()> + 'static,
    {
        self.inner.upgrade().map(|inner| {
            let id = inner.spawn_ui_task(Box::pin(fut));
            TaskHandle {
                id,
                runtime: self.clone(),
            }
        })
    }

    pub fn cancel_task(&self, id: TaskId) {
        if let Some(inner) = self.inner.upgrade() {
            inner.cancel_task(id);
        }
    }

    pub fn drain_ui(&self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.drain_ui();
            inner.settle_needs_frame();
        }
    }

    pub fn has_pending_ui(&self) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.has_pending_ui())
            .unwrap_or(false)
    }

    /// Registers `callback` to run once after the current render pass.
    ///
    /// Returns `None` when the runtime has been dropped.
    pub fn add_post_frame_callback(
        &self,
        callback: impl FnOnce() + 'static,
    ) -> Option<PostFrameCallbackId> {
        self.inner
            .upgrade()
            .map(|inner| inner.add_post_frame_callback(Box::new(callback)))
    }

    /// Like [`add_post_frame_callback`](Self::add_post_frame_callback), but the
    /// callback is cancelled when the returned registration is dropped.
    pub fn post_frame(&self, callback: impl FnOnce() + 'static) -> PostFrameRegistration {
        match self.add_post_frame_callback(callback) {
            Some(id) => PostFrameRegistration::new(self.clone(), id),
            None => PostFrameRegistration::inactive(self.clone()),
        }
    }

    pub fn cancel_post_frame_callback(&self, id: PostFrameCallbackId) {
        if let Some(inner) = self.inner.upgrade() {
            inner.cancel_post_frame_callback(id);
        }
    }

    pub fn has_post_frame_callbacks(&self) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.has_post_frame_callbacks())
            .unwrap_or(false)
    }

    pub fn is_post_frame_callback_pending(&self, id: PostFrameCallbackId) -> bool {
        self.inner
            .upgrade()
            .map(|inner| {
                inner
                    .post_frame_callbacks
                    .borrow()
                    .iter()
                    .any(|entry| entry.id == id)
            })
            .unwrap_or(false)
    }

    pub fn assert_ui_thread(&self) {
        debug_assert_eq!(
            std::thread::current().id(),
            self.ui_thread_id,
            "paging state touched off the runtime's UI thread"
        );
    }
}

impl TaskHandle {
    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn is_active(&self) -> bool {
        self.runtime
            .inner
            .upgrade()
            .map(|inner| inner.has_task(self.id))
            .unwrap_or(false)
    }

    pub fn cancel(self) {
        self.runtime.cancel_task(self.id);
    }
}

struct RuntimeTaskWaker {
    scheduler: Arc<dyn RuntimeScheduler>,
}

impl RuntimeTaskWaker {
    fn new(scheduler: Arc<dyn RuntimeScheduler>) -> Self {
        Self { scheduler }
    }

    fn into_waker(self) -> Waker {
        futures_task::waker(Arc::new(self))
    }
}

impl futures_task::ArcWake for RuntimeTaskWaker {
    fn wake_by_ref(arc_self: &Arc<Self>) {
        arc_self.scheduler.schedule_frame();
    }
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
