//! Viewport size and resize subscription

use std::cell::RefCell;
use std::rc::Rc;

use haze_core::Extent;

/// Extra surface height below the viewport, so drifting smoke never shows a hard bottom edge
pub const SURFACE_OVERSCAN: f32 = 100.0;

/// Identifies one resize subscription
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Source of viewport-resize notifications.
///
/// Delivery is the host's job: it calls the subscriber's resize handler while
/// the subscription is active. Unsubscribing an unknown id is a no-op.
pub trait ViewportEvents {
    fn subscribe_resize(&mut self) -> ListenerId;
    fn unsubscribe_resize(&mut self, id: ListenerId);
}

/// Visible viewport dimensions
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Size of the background surface that covers this viewport
    pub fn surface_extent(&self) -> Extent {
        Extent::new(self.width, self.height + SURFACE_OVERSCAN)
    }
}

#[derive(Default)]
struct ManualViewportInner {
    next_id: u64,
    listeners: Vec<ListenerId>,
}

/// Resize source driven by hand. Clones share the same listener list.
#[derive(Clone, Default)]
pub struct ManualViewport {
    inner: Rc<RefCell<ManualViewportInner>>,
}

impl ManualViewport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listeners(&self) -> Vec<ListenerId> {
        self.inner.borrow().listeners.clone()
    }

    pub fn is_subscribed(&self, id: ListenerId) -> bool {
        self.inner.borrow().listeners.contains(&id)
    }
}

impl ViewportEvents for ManualViewport {
    fn subscribe_resize(&mut self) -> ListenerId {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        let id = ListenerId(inner.next_id);
        inner.listeners.push(id);
        id
    }

    fn unsubscribe_resize(&mut self, id: ListenerId) {
        self.inner.borrow_mut().listeners.retain(|l| *l != id);
    }
}
