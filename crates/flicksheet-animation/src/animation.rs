//! Tween animation for the sheet offset.
//!
//! Provides time-based float animations with easing curves, driven by the
//! [`FrameClock`]. Re-targeting a running animation redirects it mid-flight:
//! the superseded run is cancelled without firing its completion and the new
//! run starts from the current interpolated value.

use std::cell::RefCell;
use std::rc::Rc;

use crate::frame_clock::{FrameCallbackRegistration, FrameClock};

/// Easing functions for settle animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    /// Linear interpolation (no easing).
    Linear,
    /// Ease in and out using a cubic curve.
    EaseInOut,
}

impl Easing {
    /// Apply the easing function to a linear fraction [0, 1].
    pub fn transform(&self, fraction: f32) -> f32 {
        match self {
            Easing::Linear => fraction.clamp(0.0, 1.0),
            Easing::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, fraction),
        }
    }
}

/// Cubic bezier curve approximation for easing.
fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, fraction: f32) -> f32 {
    if fraction <= 0.0 {
        return 0.0;
    }
    if fraction >= 1.0 {
        return 1.0;
    }

    let cx = 3.0 * x1;
    let bx = 3.0 * (x2 - x1) - cx;
    let ax = 1.0 - cx - bx;

    let cy = 3.0 * y1;
    let by = 3.0 * (y2 - y1) - cy;
    let ay = 1.0 - cy - by;

    fn sample_curve(a: f32, b: f32, c: f32, t: f32) -> f32 {
        ((a * t + b) * t + c) * t
    }

    fn sample_derivative(a: f32, b: f32, c: f32, t: f32) -> f32 {
        (3.0 * a * t + 2.0 * b) * t + c
    }

    // Newton-Raphson for the parametric value `t` matching the x fraction,
    // clamped to [0, 1] to keep the solution in bounds.
    let mut t = fraction;
    let mut newton_success = false;
    for _ in 0..8 {
        let x = sample_curve(ax, bx, cx, t) - fraction;
        if x.abs() < 1e-6 {
            newton_success = true;
            break;
        }
        let dx = sample_derivative(ax, bx, cx, t);
        if dx.abs() < 1e-6 {
            break;
        }
        t = (t - x / dx).clamp(0.0, 1.0);
    }

    if !newton_success {
        // Binary subdivision fallback when Newton-Raphson did not converge.
        let mut t0 = 0.0;
        let mut t1 = 1.0;
        t = fraction;
        for _ in 0..16 {
            let x = sample_curve(ax, bx, cx, t);
            let delta = x - fraction;
            if delta.abs() < 1e-6 {
                break;
            }
            if delta > 0.0 {
                t1 = t;
            } else {
                t0 = t;
            }
            t = 0.5 * (t0 + t1);
        }
    }

    sample_curve(ay, by, cy, t)
}

/// Animation specification combining duration and easing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationSpec {
    /// Duration in milliseconds.
    pub duration_millis: u64,
    /// Easing function to apply.
    pub easing: Easing,
}

impl AnimationSpec {
    /// Create a tween animation with duration and easing.
    pub fn tween(duration_millis: u64, easing: Easing) -> Self {
        Self {
            duration_millis,
            easing,
        }
    }

    /// Create a linear tween animation.
    pub fn linear(duration_millis: u64) -> Self {
        Self::tween(duration_millis, Easing::Linear)
    }
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self::tween(250, Easing::EaseInOut)
    }
}

fn lerp(start: f32, target: f32, fraction: f32) -> f32 {
    start + (target - start) * fraction
}

struct TweenInner {
    current: f32,
    start: f32,
    target: f32,
    spec: AnimationSpec,
    start_time_nanos: Option<u64>,
    registration: Option<FrameCallbackRegistration>,
    on_frame: Option<Rc<dyn Fn(f32)>>,
    on_end: Option<Box<dyn FnOnce()>>,
}

/// Frame-clock-driven float tween.
///
/// Holds the animated value between runs, so a redirect picks up exactly
/// where the previous run left off.
pub struct TweenAnimation {
    inner: Rc<RefCell<TweenInner>>,
    clock: FrameClock,
}

impl TweenAnimation {
    /// Create a new tween resting at `initial`.
    pub fn new(initial: f32, clock: FrameClock) -> Self {
        let inner = TweenInner {
            current: initial,
            start: initial,
            target: initial,
            spec: AnimationSpec::default(),
            start_time_nanos: None,
            registration: None,
            on_frame: None,
            on_end: None,
        };
        Self {
            inner: Rc::new(RefCell::new(inner)),
            clock,
        }
    }

    /// Animate from the current value to `target`.
    ///
    /// `on_frame` receives every interpolated value including the final one;
    /// `on_end` fires once when the run completes. If a run is already in
    /// flight it is cancelled first and its completion is never invoked.
    pub fn animate_to(
        &self,
        target: f32,
        spec: AnimationSpec,
        on_frame: Rc<dyn Fn(f32)>,
        on_end: Box<dyn FnOnce()>,
    ) {
        if !target.is_finite() {
            log::warn!("ignoring tween to non-finite target {target}");
            return;
        }
        {
            let mut inner = self.inner.borrow_mut();
            if let Some(registration) = inner.registration.take() {
                registration.cancel();
            }
            // Superseded completion is dropped, not fired.
            inner.on_end = Some(on_end);
            inner.on_frame = Some(on_frame);
            inner.start = inner.current;
            inner.target = target;
            inner.spec = spec;
            inner.start_time_nanos = None;
        }
        Self::schedule_frame(&self.inner, &self.clock);
    }

    /// Jump to `value` immediately, cancelling any in-flight run.
    ///
    /// The frame sink of the cancelled run (if any) observes the snapped
    /// value; the cancelled completion is dropped.
    pub fn snap_to(&self, value: f32) {
        let on_frame = {
            let mut inner = self.inner.borrow_mut();
            if let Some(registration) = inner.registration.take() {
                registration.cancel();
            }
            inner.current = value;
            inner.start = value;
            inner.target = value;
            inner.start_time_nanos = None;
            inner.on_end = None;
            inner.on_frame.take()
        };
        if let Some(on_frame) = on_frame {
            on_frame(value);
        }
    }

    /// The current (possibly mid-flight) value.
    pub fn value(&self) -> f32 {
        self.inner.borrow().current
    }

    /// The target of the current or most recent run.
    pub fn target(&self) -> f32 {
        self.inner.borrow().target
    }

    /// True while a run is waiting on the next frame.
    pub fn is_running(&self) -> bool {
        self.inner.borrow().registration.is_some()
    }

    fn schedule_frame(this: &Rc<RefCell<TweenInner>>, clock: &FrameClock) {
        if this.borrow().registration.is_some() {
            return;
        }
        let weak = Rc::downgrade(this);
        let clock_for_next = clock.clone();
        let registration = clock.with_frame_nanos(move |time| {
            if let Some(strong) = weak.upgrade() {
                Self::on_frame(&strong, &clock_for_next, time);
            }
        });
        this.borrow_mut().registration = Some(registration);
    }

    fn on_frame(this: &Rc<RefCell<TweenInner>>, clock: &FrameClock, frame_time_nanos: u64) {
        let (value, on_frame, on_end, finished) = {
            let mut inner = this.borrow_mut();
            inner.registration = None;

            let start_time = inner.start_time_nanos.get_or_insert(frame_time_nanos);
            let elapsed_nanos = frame_time_nanos.saturating_sub(*start_time);
            let duration_nanos = inner.spec.duration_millis * 1_000_000;
            let linear_progress = if duration_nanos == 0 {
                1.0
            } else {
                (elapsed_nanos as f32 / duration_nanos as f32).clamp(0.0, 1.0)
            };
            let progress = inner.spec.easing.transform(linear_progress);

            let finished = linear_progress >= 1.0;
            let value = if finished {
                inner.target
            } else {
                lerp(inner.start, inner.target, progress)
            };
            inner.current = value;

            if finished {
                inner.start = inner.target;
                inner.start_time_nanos = None;
                (value, inner.on_frame.take(), inner.on_end.take(), true)
            } else {
                (value, inner.on_frame.clone(), None, false)
            }
        };

        // Callbacks run outside the borrow so sinks may call back into the
        // tween (e.g. a completion that snaps or re-targets).
        if let Some(on_frame) = on_frame {
            on_frame(value);
        }
        if finished {
            if let Some(on_end) = on_end {
                on_end();
            }
        } else {
            Self::schedule_frame(this, clock);
        }
    }
}

impl Clone for TweenAnimation {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            clock: self.clock.clone(),
        }
    }
}

#[cfg(test)]
#[path = "tests/animation_tests.rs"]
mod tests;
