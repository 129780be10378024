//! Platform abstraction traits for the Pagewise runtime.
//!
//! The host toolkit owns the real event loop. These traits let the runtime
//! ask it for another frame without depending on any windowing API.

/// Schedules work for the Pagewise runtime.
///
/// Implementations are responsible for getting the host to run another
/// frame (and therefore drain the runtime's queues). They must be safe to
/// call from a task waker, which may live on another thread.
pub trait RuntimeScheduler: Send + Sync {
    /// Request that the host schedule a new frame.
    fn schedule_frame(&self);
}
