use crate::runtime::{PostFrameCallbackId, RuntimeHandle};

/// Keeps a post-frame callback alive.
///
/// Dropping the registration before the frame ends cancels the callback, so
/// owners that go away mid-frame never get called back.
pub struct PostFrameRegistration {
    runtime: RuntimeHandle,
    id: Option<PostFrameCallbackId>,
}

impl PostFrameRegistration {
    pub(crate) fn new(runtime: RuntimeHandle, id: PostFrameCallbackId) -> Self {
        Self {
            runtime,
            id: Some(id),
        }
    }

    pub(crate) fn inactive(runtime: RuntimeHandle) -> Self {
        Self { runtime, id: None }
    }

    /// Whether the callback is still queued.
    pub fn is_pending(&self) -> bool {
        match self.id {
            Some(id) => self.runtime.is_post_frame_callback_pending(id),
            None => false,
        }
    }

    pub fn cancel(mut self) {
        if let Some(id) = self.id.take() {
            self.runtime.cancel_post_frame_callback(id);
        }
    }
}

impl Drop for PostFrameRegistration {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            self.runtime.cancel_post_frame_callback(id);
        }
    }
}

impl std::fmt::Debug for PostFrameRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostFrameRegistration")
            .field("id", &self.id)
            .finish()
    }
}
