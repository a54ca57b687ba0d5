//! The sheet controller.
//!
//! Owns the sheet's settled position and drag state, clamps the offset while
//! a pan is active, decides where to settle on release, and coordinates the
//! embedded list's scrolling with the pan gesture. Everything visual happens
//! in external collaborators: the animation host moves the sheet, the scroll
//! surface gates the list, the auxiliary view fades, observers relayout.

use std::cell::RefCell;
use std::rc::Rc;

use smallvec::SmallVec;

use flicksheet_foundation::{DragEvent, ScrollSurface};

use crate::host::AnimationHost;
use crate::position::{floating_alpha, resolve, SheetMetrics, SnapPosition};

/// Duration of a settle animation after a release or programmatic move.
pub const SETTLE_DURATION_MS: u64 = 250;

/// Duration of the initial appearance animation to the Bottom stop.
pub const PRESENT_DURATION_MS: u64 = 600;

/// The floating view whose opacity tracks the drag.
pub trait AuxiliaryView {
    fn set_opacity(&self, opacity: f32);
}

/// A text input (the search field) whose focus the sheet may relinquish when
/// the pan takes over.
pub trait FocusTarget {
    fn has_focus(&self) -> bool;
    fn resign_focus(&self);
}

/// Receives position notifications from the controller.
///
/// Any number of listeners may be registered; a hosting screen typically uses
/// them to adjust its own layout.
pub trait SheetObserver {
    /// The sheet finished settling at `position`.
    fn on_position_settled(&self, position: SnapPosition);
    /// The sheet's top edge moved to `offset_y` during a drag.
    fn on_position_changing(&self, offset_y: f32);
}

struct SheetState {
    metrics: SheetMetrics,
    position: SnapPosition,
    offset: f32,
    dragging: bool,
    animating: bool,
    /// Bumped on every new move or preempting drag; a settle completion
    /// carrying a stale epoch is ignored.
    move_epoch: u64,
}

struct Collaborators {
    scroll: Rc<dyn ScrollSurface>,
    host: Rc<dyn AnimationHost>,
    auxiliary: RefCell<Option<Rc<dyn AuxiliaryView>>>,
    focus: RefCell<Option<Rc<dyn FocusTarget>>>,
    observers: RefCell<SmallVec<[Rc<dyn SheetObserver>; 2]>>,
}

/// Stateful coordinator for one sheet instance.
///
/// Cloning shares the same sheet; the controller lives for the owning
/// screen's lifetime and needs no teardown beyond dropping it.
pub struct SheetController {
    state: Rc<RefCell<SheetState>>,
    shared: Rc<Collaborators>,
}

impl Clone for SheetController {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            shared: self.shared.clone(),
        }
    }
}

impl SheetController {
    /// Creates a controller settled at the Bottom stop.
    ///
    /// List scrolling starts disabled, matching the derived rule that it is
    /// only available while the sheet sits at Top.
    pub fn new(
        metrics: SheetMetrics,
        scroll: Rc<dyn ScrollSurface>,
        host: Rc<dyn AnimationHost>,
    ) -> Self {
        let offset = SnapPosition::Bottom.y_pos(&metrics);
        scroll.set_scroll_enabled(false);
        Self {
            state: Rc::new(RefCell::new(SheetState {
                metrics,
                position: SnapPosition::Bottom,
                offset,
                dragging: false,
                animating: false,
                move_epoch: 0,
            })),
            shared: Rc::new(Collaborators {
                scroll,
                host,
                auxiliary: RefCell::new(None),
                focus: RefCell::new(None),
                observers: RefCell::new(SmallVec::new()),
            }),
        }
    }

    pub fn set_auxiliary_view(&self, view: Rc<dyn AuxiliaryView>) {
        *self.shared.auxiliary.borrow_mut() = Some(view);
    }

    pub fn set_focus_target(&self, target: Rc<dyn FocusTarget>) {
        *self.shared.focus.borrow_mut() = Some(target);
    }

    pub fn add_observer(&self, observer: Rc<dyn SheetObserver>) {
        self.shared.observers.borrow_mut().push(observer);
    }

    pub fn current_position(&self) -> SnapPosition {
        self.state.borrow().position
    }

    /// The sheet's current top-edge offset.
    pub fn offset(&self) -> f32 {
        self.state.borrow().offset
    }

    pub fn is_dragging(&self) -> bool {
        self.state.borrow().dragging
    }

    pub fn is_animating(&self) -> bool {
        self.state.borrow().animating
    }

    /// Whether list scrolling is currently gated off.
    pub fn scroll_locked(&self) -> bool {
        !self.shared.scroll.is_scroll_enabled()
    }

    pub fn metrics(&self) -> SheetMetrics {
        self.state.borrow().metrics
    }

    /// Starts a drag. Idempotent while a drag is active; always accepted,
    /// including mid-settle, in which case the in-flight animation is
    /// interrupted and its offset becomes the drag origin.
    pub fn begin_drag(&self) {
        let preempted = {
            let mut state = self.state.borrow_mut();
            if state.dragging {
                return;
            }
            state.dragging = true;
            if state.animating {
                state.animating = false;
                state.move_epoch = state.move_epoch.wrapping_add(1);
                true
            } else {
                false
            }
        };
        if preempted {
            let current = self.shared.host.value();
            self.shared.host.snap_to(current);
            let mut state = self.state.borrow_mut();
            let (lo, hi) = state.metrics.drag_bounds();
            state.offset = current.clamp(lo, hi);
        }
    }

    /// Applies a drag delta: clamps the offset to the stop range, updates the
    /// auxiliary opacity, and notifies observers of the movement.
    pub fn drag_by(&self, delta_y: f32) {
        if !delta_y.is_finite() {
            log::warn!("dropping non-finite drag delta {delta_y}");
            return;
        }
        let (offset, alpha) = {
            let mut state = self.state.borrow_mut();
            if !state.dragging {
                return;
            }
            let (lo, hi) = state.metrics.drag_bounds();
            state.offset = (state.offset + delta_y).clamp(lo, hi);
            (state.offset, floating_alpha(state.offset, &state.metrics))
        };
        self.shared.host.snap_to(offset);
        let aux = self.shared.auxiliary.borrow().clone();
        if let Some(aux) = aux {
            aux.set_opacity(alpha);
        }
        self.notify_changing(offset);
    }

    /// Ends the drag: resolves the snap target from the release offset and
    /// velocity, then settles there.
    pub fn end_drag(&self, velocity_y: f32) {
        let target = {
            let mut state = self.state.borrow_mut();
            if !state.dragging {
                return;
            }
            state.dragging = false;
            resolve(state.offset, velocity_y, &state.metrics)
        };
        self.animate_to(target, SETTLE_DURATION_MS);
    }

    /// Host-interrupted drag: settles as if released with zero velocity.
    pub fn cancel_drag(&self) {
        self.end_drag(0.0);
    }

    /// Programmatic move to a stop. Ignored while dragging; a no-op when
    /// already settled at `position` with nothing in flight.
    pub fn request_move(&self, position: SnapPosition) {
        {
            let state = self.state.borrow();
            if state.dragging {
                log::warn!("ignoring move to {position:?} while a drag is active");
                return;
            }
            if state.position == position && !state.animating {
                return;
            }
        }
        self.animate_to(position, SETTLE_DURATION_MS);
    }

    /// Plays the initial appearance animation down to the Bottom stop.
    pub fn present(&self) {
        self.animate_to(SnapPosition::Bottom, PRESENT_DURATION_MS);
    }

    /// Arbitrates between the pan gesture and list scrolling.
    ///
    /// The pan may recognize simultaneously with the list only when the user
    /// pulls down at the very top of a fully open sheet; scrolling is then
    /// disabled so the sheet follows the finger, and any focused search input
    /// is relinquished unless the pointer is still. In every other case the
    /// list keeps (or regains) scrolling exactly while the sheet is at Top.
    pub fn should_begin_simultaneously(&self, velocity_y: f32) -> bool {
        let at_top = self.state.borrow().position == SnapPosition::Top;
        if at_top && self.shared.scroll.content_offset_y() <= 0.0 && velocity_y >= 0.0 {
            self.shared.scroll.set_scroll_enabled(false);
            if velocity_y != 0.0 {
                self.resign_focus();
            }
            true
        } else {
            self.shared.scroll.set_scroll_enabled(at_top);
            false
        }
    }

    /// The search input gained focus: open the sheet fully.
    pub fn search_began(&self) {
        if self.current_position() != SnapPosition::Top {
            self.request_move(SnapPosition::Top);
        }
    }

    /// The search was cancelled: drop focus and tuck the sheet away.
    pub fn search_cancelled(&self) {
        self.resign_focus();
        if self.current_position() == SnapPosition::Top {
            self.request_move(SnapPosition::Bottom);
        }
    }

    /// Tracks a viewport size change: stop offsets are recomputed, a settled
    /// sheet re-pins to its stop, an in-flight settle re-targets.
    pub fn set_screen_height(&self, screen_height: f32) {
        enum Followup {
            None,
            Snap(f32),
            Reanimate(SnapPosition),
        }
        let followup = {
            let mut state = self.state.borrow_mut();
            state.metrics = SheetMetrics::with_insets(
                screen_height,
                state.metrics.top_inset,
                state.metrics.bottom_inset,
                state.metrics.drag_offset,
            );
            let (lo, hi) = state.metrics.drag_bounds();
            if state.dragging {
                state.offset = state.offset.clamp(lo, hi);
                Followup::None
            } else if state.animating {
                Followup::Reanimate(state.position)
            } else {
                state.offset = state.position.y_pos(&state.metrics);
                Followup::Snap(state.offset)
            }
        };
        match followup {
            Followup::None => {}
            Followup::Snap(offset) => self.shared.host.snap_to(offset),
            Followup::Reanimate(position) => self.animate_to(position, SETTLE_DURATION_MS),
        }
    }

    /// Routes a recognizer event to the matching transition.
    pub fn handle_drag_event(&self, event: DragEvent) {
        match event {
            DragEvent::Started { .. } => self.begin_drag(),
            DragEvent::Moved { delta_y, .. } => self.drag_by(delta_y),
            DragEvent::Released { velocity_y } => self.end_drag(velocity_y),
            DragEvent::Cancelled => self.cancel_drag(),
        }
    }

    fn animate_to(&self, target: SnapPosition, duration_ms: u64) {
        let (target_y, epoch) = {
            let mut state = self.state.borrow_mut();
            state.position = target;
            state.animating = true;
            state.move_epoch = state.move_epoch.wrapping_add(1);
            (target.y_pos(&state.metrics), state.move_epoch)
        };
        let aux = self.shared.auxiliary.borrow().clone();
        if let Some(aux) = aux {
            aux.set_opacity(if target == SnapPosition::Top { 0.0 } else { 1.0 });
        }
        let controller = self.clone();
        self.shared.host.animate_to(
            target_y,
            duration_ms,
            Box::new(move || controller.finish_move(epoch, target, target_y)),
        );
    }

    fn finish_move(&self, epoch: u64, target: SnapPosition, target_y: f32) {
        {
            let mut state = self.state.borrow_mut();
            if state.move_epoch != epoch {
                // A newer drag or move superseded this settle.
                return;
            }
            state.animating = false;
            state.offset = target_y;
        }
        self.shared
            .scroll
            .set_scroll_enabled(target == SnapPosition::Top);
        let observers: SmallVec<[Rc<dyn SheetObserver>; 2]> =
            self.shared.observers.borrow().clone();
        for observer in observers {
            observer.on_position_settled(target);
        }
    }

    fn notify_changing(&self, offset: f32) {
        let observers: SmallVec<[Rc<dyn SheetObserver>; 2]> =
            self.shared.observers.borrow().clone();
        for observer in observers {
            observer.on_position_changing(offset);
        }
    }

    fn resign_focus(&self) {
        let focus = self.shared.focus.borrow().clone();
        if let Some(focus) = focus {
            if focus.has_focus() {
                focus.resign_focus();
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
