//! Animation-frame scheduling capability

use std::cell::RefCell;
use std::rc::Rc;

/// Token identifying one requested frame callback
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(pub u64);

/// "Run this callback before the next paint", with cancellation.
///
/// The callback itself is delivered by the host calling back into the
/// requester with the returned handle, so a requester can always tell a
/// current frame from a stale one.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

#[derive(Default)]
struct ManualSchedulerInner {
    next_id: u64,
    pending: Vec<FrameHandle>,
    requested: u64,
    cancelled: u64,
}

/// Scheduler whose frames are fired by hand. Clones share the same queue.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    inner: Rc<RefCell<ManualSchedulerInner>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain every pending frame, in request order
    pub fn take_pending(&self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.inner.borrow_mut().pending)
    }

    /// Look at the pending frames without consuming them
    pub fn peek_pending(&self) -> Vec<FrameHandle> {
        self.inner.borrow().pending.clone()
    }

    pub fn pending_count(&self) -> usize {
        self.inner.borrow().pending.len()
    }

    /// Total frames ever requested
    pub fn requested_count(&self) -> u64 {
        self.inner.borrow().requested
    }

    /// Total frames cancelled while still pending
    pub fn cancelled_count(&self) -> u64 {
        self.inner.borrow().cancelled
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        inner.requested += 1;
        let handle = FrameHandle(inner.next_id);
        inner.pending.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let mut inner = self.inner.borrow_mut();
        let before = inner.pending.len();
        inner.pending.retain(|h| *h != handle);
        if inner.pending.len() != before {
            inner.cancelled += 1;
        }
    }
}
