//! Animation host boundary.
//!
//! The controller never animates anything itself; it asks a host to move the
//! sheet and finalizes state from the host's completion callback. The host
//! must accept a new request while a previous one is still in flight and
//! redirect without ever firing the superseded completion.

use std::rc::Rc;

use flicksheet_animation::{AnimationSpec, Easing, FrameClock, TweenAnimation};

/// Drives the sheet's visual offset on behalf of the controller.
pub trait AnimationHost {
    /// Animates the sheet's offset to `target_y` over `duration_ms`.
    ///
    /// Re-issuing before completion redirects the motion from its current
    /// value; the replaced `on_complete` must never fire.
    fn animate_to(&self, target_y: f32, duration_ms: u64, on_complete: Box<dyn FnOnce()>);

    /// Halts any in-flight animation and pins the offset at `y`.
    fn snap_to(&self, y: f32);

    /// The current (possibly mid-flight) offset.
    fn value(&self) -> f32;
}

/// Default host backed by the frame-clock tween.
///
/// Every interpolated offset is forwarded to `sink`, which the embedding
/// layer uses to place the sheet. The host itself has no opinion about
/// rendering.
pub struct FrameClockAnimationHost {
    tween: TweenAnimation,
    sink: Rc<dyn Fn(f32)>,
}

impl FrameClockAnimationHost {
    pub fn new(initial_y: f32, clock: FrameClock, sink: Rc<dyn Fn(f32)>) -> Self {
        Self {
            tween: TweenAnimation::new(initial_y, clock),
            sink,
        }
    }
}

impl AnimationHost for FrameClockAnimationHost {
    fn animate_to(&self, target_y: f32, duration_ms: u64, on_complete: Box<dyn FnOnce()>) {
        self.tween.animate_to(
            target_y,
            AnimationSpec::tween(duration_ms, Easing::EaseInOut),
            self.sink.clone(),
            on_complete,
        );
    }

    fn snap_to(&self, y: f32) {
        let was_running = self.tween.is_running();
        self.tween.snap_to(y);
        if !was_running {
            // The tween only notifies a sink it took from an active run.
            (self.sink)(y);
        }
    }

    fn value(&self) -> f32 {
        self.tween.value()
    }
}
