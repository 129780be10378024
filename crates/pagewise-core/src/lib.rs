#![doc = r"Core runtime pieces for Pagewise: the UI-thread task and post-frame queues, listener registries and observable values the paging layer is built on."]

pub mod collections;
pub mod listeners;
pub mod platform;
pub mod post_frame;
pub mod runtime;
pub mod value_notifier;

pub use listeners::{Listener, ListenerId, ListenerRegistry, ListenerSnapshot};
pub use platform::RuntimeScheduler;
pub use post_frame::PostFrameRegistration;
pub use runtime::{
    DefaultScheduler, PostFrameCallbackId, Runtime, RuntimeHandle, TaskHandle, TaskId,
};
pub use value_notifier::{ValueNotifier, WeakValueNotifier};
