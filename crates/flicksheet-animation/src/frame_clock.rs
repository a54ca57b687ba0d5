//! Host-pumped frame callback clock.
//!
//! The embedding UI layer calls [`FrameClock::drain_frame_callbacks`] once per
//! rendered frame with the current frame time. Everything scheduled since the
//! previous pump runs exactly once; a callback that wants to keep animating
//! re-registers itself and advances on the next pump.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

pub type FrameCallbackId = u64;

struct FrameClockInner {
    next_id: FrameCallbackId,
    pending: Vec<(FrameCallbackId, Box<dyn FnOnce(u64)>)>,
}

impl FrameClockInner {
    fn new() -> Self {
        Self {
            next_id: 1,
            pending: Vec::new(),
        }
    }
}

/// Shared registry of one-shot frame callbacks.
///
/// Cloning is cheap and shares the registry, so the same clock instance can be
/// handed to every animation that needs driving.
#[derive(Clone)]
pub struct FrameClock {
    inner: Rc<RefCell<FrameClockInner>>,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(FrameClockInner::new())),
        }
    }

    /// Schedules `callback` to run on the next pump with the frame time in
    /// nanoseconds.
    pub fn with_frame_nanos(
        &self,
        callback: impl FnOnce(u64) + 'static,
    ) -> FrameCallbackRegistration {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.pending.push((id, Box::new(callback)));
            id
        };
        FrameCallbackRegistration {
            clock: Rc::downgrade(&self.inner),
            id: Some(id),
        }
    }

    /// Schedules `callback` to run on the next pump with the frame time in
    /// milliseconds.
    pub fn with_frame_millis(
        &self,
        callback: impl FnOnce(u64) + 'static,
    ) -> FrameCallbackRegistration {
        self.with_frame_nanos(move |nanos| callback(nanos / 1_000_000))
    }

    /// Runs every callback scheduled before this pump.
    ///
    /// Callbacks registered while draining are deferred to the next pump, so a
    /// self-rescheduling animation advances one step per call.
    pub fn drain_frame_callbacks(&self, frame_time_nanos: u64) {
        let batch = std::mem::take(&mut self.inner.borrow_mut().pending);
        for (_, callback) in batch {
            callback(frame_time_nanos);
        }
    }

    /// True while at least one callback is waiting for the next pump.
    pub fn has_pending_callbacks(&self) -> bool {
        !self.inner.borrow().pending.is_empty()
    }
}

/// Handle for a scheduled frame callback.
///
/// Dropping the registration cancels the callback if it has not fired yet;
/// cancelling after the callback ran is a no-op.
pub struct FrameCallbackRegistration {
    clock: Weak<RefCell<FrameClockInner>>,
    id: Option<FrameCallbackId>,
}

impl FrameCallbackRegistration {
    pub fn cancel(mut self) {
        self.remove();
    }

    fn remove(&mut self) {
        let Some(id) = self.id.take() else {
            return;
        };
        if let Some(inner) = self.clock.upgrade() {
            inner.borrow_mut().pending.retain(|(entry, _)| *entry != id);
        }
    }
}

impl Drop for FrameCallbackRegistration {
    fn drop(&mut self) {
        self.remove();
    }
}
