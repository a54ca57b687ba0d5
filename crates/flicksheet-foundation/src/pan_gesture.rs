//! Vertical pan recognition.
//!
//! Turns raw pointer samples into the drag stream the sheet controller
//! consumes: a touch-slop gate so taps never move the sheet, per-move deltas
//! with a running velocity estimate, and a capped release velocity for the
//! snap decision.

use web_time::Instant;

use crate::gesture_constants::{MAX_FLING_VELOCITY, TOUCH_SLOP};
use crate::pointer::{PointerEventKind, PointerSample};
use crate::velocity_tracker::VelocityTracker;

/// Output of the recognizer, one event per recognized pointer sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragEvent {
    /// The pointer moved past the touch slop; a pan is now in progress.
    Started { y: f32 },
    /// The pointer moved while panning.
    Moved { delta_y: f32, velocity_y: f32 },
    /// The pointer lifted while panning. `velocity_y` is capped to
    /// [`MAX_FLING_VELOCITY`]; positive means moving down-screen.
    Released { velocity_y: f32 },
    /// The pan was interrupted by the host (e.g. an incoming call sheet).
    Cancelled,
}

/// Recognizes a single-pointer vertical pan.
///
/// Feed every pointer sample; the recognizer answers with at most one
/// [`DragEvent`]. Samples before the slop is passed produce no events, so a
/// tap on the sheet never counts as a drag.
pub struct PanGestureRecognizer {
    tracker: VelocityTracker,
    last_y: Option<f32>,
    started: bool,
    accumulated: f32,
    epoch: Instant,
}

impl Default for PanGestureRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl PanGestureRecognizer {
    pub fn new() -> Self {
        Self {
            tracker: VelocityTracker::new(),
            last_y: None,
            started: false,
            accumulated: 0.0,
            epoch: Instant::now(),
        }
    }

    /// True between the slop being passed and the pointer lifting.
    pub fn is_panning(&self) -> bool {
        self.started
    }

    /// Feeds a pointer sample stamped with the wall clock.
    ///
    /// Convenience for hosts whose events carry no usable timestamp; tests
    /// and replay should prefer [`PanGestureRecognizer::feed_at`].
    pub fn feed(&mut self, kind: PointerEventKind, y: f32) -> Option<DragEvent> {
        let time_ms = self.epoch.elapsed().as_millis() as i64;
        self.feed_at(PointerSample::new(kind, y, time_ms))
    }

    /// Feeds a pointer sample with an explicit timestamp.
    pub fn feed_at(&mut self, sample: PointerSample) -> Option<DragEvent> {
        match sample.kind {
            PointerEventKind::Down => {
                self.reset();
                self.tracker.add_sample(sample.time_ms, sample.y);
                self.last_y = Some(sample.y);
                None
            }
            PointerEventKind::Move => {
                let last_y = self.last_y?;
                self.tracker.add_sample(sample.time_ms, sample.y);
                let delta_y = sample.y - last_y;
                self.last_y = Some(sample.y);

                if self.started {
                    let velocity_y = self.tracker.velocity_capped(MAX_FLING_VELOCITY);
                    return Some(DragEvent::Moved {
                        delta_y,
                        velocity_y,
                    });
                }

                self.accumulated += delta_y.abs();
                if self.accumulated > TOUCH_SLOP {
                    // The move that crosses the slop starts the pan; its
                    // delta is swallowed rather than applied retroactively.
                    self.started = true;
                    log::trace!("pan started at y={}", sample.y);
                    return Some(DragEvent::Started { y: sample.y });
                }
                None
            }
            PointerEventKind::Up => {
                let was_panning = self.started;
                let velocity_y = self.tracker.velocity_capped(MAX_FLING_VELOCITY);
                self.reset();
                if was_panning {
                    Some(DragEvent::Released { velocity_y })
                } else {
                    None
                }
            }
            PointerEventKind::Cancel => {
                let was_panning = self.started;
                self.reset();
                was_panning.then_some(DragEvent::Cancelled)
            }
        }
    }

    fn reset(&mut self) {
        self.tracker.reset();
        self.last_y = None;
        self.started = false;
        self.accumulated = 0.0;
    }
}

#[cfg(test)]
#[path = "tests/pan_gesture_tests.rs"]
mod tests;
