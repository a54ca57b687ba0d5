use super::*;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use flicksheet_foundation::ScrollSurface;

use crate::host::AnimationHost;
use crate::position::{SheetMetrics, SnapPosition};

struct MockScroll {
    offset: Cell<f32>,
    enabled: Cell<bool>,
}

impl MockScroll {
    fn new() -> Rc<Self> {
        Rc::new(Self {
            offset: Cell::new(0.0),
            enabled: Cell::new(true),
        })
    }
}

impl ScrollSurface for MockScroll {
    fn content_offset_y(&self) -> f32 {
        self.offset.get()
    }

    fn set_scroll_enabled(&self, enabled: bool) {
        self.enabled.set(enabled);
    }

    fn is_scroll_enabled(&self) -> bool {
        self.enabled.get()
    }
}

struct PendingMove {
    target: f32,
    duration_ms: u64,
    on_complete: Box<dyn FnOnce()>,
}

/// Host the tests drive by hand: records requests, completes on demand.
struct ManualHost {
    value: Cell<f32>,
    pending: RefCell<Option<PendingMove>>,
    animate_calls: Cell<u32>,
    /// A well-behaved host drops a redirected request; the "stale" variant
    /// keeps it so the epoch guard can be exercised.
    clear_pending_on_snap: bool,
}

impl ManualHost {
    fn new(initial: f32) -> Rc<Self> {
        Rc::new(Self {
            value: Cell::new(initial),
            pending: RefCell::new(None),
            animate_calls: Cell::new(0),
            clear_pending_on_snap: true,
        })
    }

    fn stale(initial: f32) -> Rc<Self> {
        Rc::new(Self {
            value: Cell::new(initial),
            pending: RefCell::new(None),
            animate_calls: Cell::new(0),
            clear_pending_on_snap: false,
        })
    }

    fn complete(&self) {
        if let Some(pending) = self.pending.borrow_mut().take() {
            self.value.set(pending.target);
            (pending.on_complete)();
        }
    }

    fn pending_target(&self) -> Option<f32> {
        self.pending.borrow().as_ref().map(|p| p.target)
    }

    fn pending_duration(&self) -> Option<u64> {
        self.pending.borrow().as_ref().map(|p| p.duration_ms)
    }
}

impl AnimationHost for ManualHost {
    fn animate_to(&self, target_y: f32, duration_ms: u64, on_complete: Box<dyn FnOnce()>) {
        self.animate_calls.set(self.animate_calls.get() + 1);
        *self.pending.borrow_mut() = Some(PendingMove {
            target: target_y,
            duration_ms,
            on_complete,
        });
    }

    fn snap_to(&self, y: f32) {
        self.value.set(y);
        if self.clear_pending_on_snap {
            self.pending.borrow_mut().take();
        }
    }

    fn value(&self) -> f32 {
        self.value.get()
    }
}

#[derive(Default)]
struct RecordingObserver {
    settled: RefCell<Vec<SnapPosition>>,
    changing: RefCell<Vec<f32>>,
}

impl SheetObserver for RecordingObserver {
    fn on_position_settled(&self, position: SnapPosition) {
        self.settled.borrow_mut().push(position);
    }

    fn on_position_changing(&self, offset_y: f32) {
        self.changing.borrow_mut().push(offset_y);
    }
}

struct MockAux {
    opacity: Cell<f32>,
}

impl AuxiliaryView for MockAux {
    fn set_opacity(&self, opacity: f32) {
        self.opacity.set(opacity);
    }
}

struct MockFocus {
    focused: Cell<bool>,
    resign_count: Cell<u32>,
}

impl FocusTarget for MockFocus {
    fn has_focus(&self) -> bool {
        self.focused.get()
    }

    fn resign_focus(&self) {
        self.focused.set(false);
        self.resign_count.set(self.resign_count.get() + 1);
    }
}

struct Fixture {
    controller: SheetController,
    scroll: Rc<MockScroll>,
    host: Rc<ManualHost>,
    observer: Rc<RecordingObserver>,
    aux: Rc<MockAux>,
    focus: Rc<MockFocus>,
}

fn fixture_with_host(host: Rc<ManualHost>) -> Fixture {
    let scroll = MockScroll::new();
    let controller = SheetController::new(
        SheetMetrics::new(800.0),
        scroll.clone(),
        host.clone(),
    );
    let observer = Rc::new(RecordingObserver::default());
    controller.add_observer(observer.clone());
    let aux = Rc::new(MockAux {
        opacity: Cell::new(1.0),
    });
    controller.set_auxiliary_view(aux.clone());
    let focus = Rc::new(MockFocus {
        focused: Cell::new(false),
        resign_count: Cell::new(0),
    });
    controller.set_focus_target(focus.clone());
    Fixture {
        controller,
        scroll,
        host,
        observer,
        aux,
        focus,
    }
}

fn fixture() -> Fixture {
    fixture_with_host(ManualHost::new(700.0))
}

/// Settles the fixture's sheet at `position` through the normal move path.
fn settle_at(f: &Fixture, position: SnapPosition) {
    f.controller.request_move(position);
    f.host.complete();
}

#[test]
fn starts_settled_at_bottom_with_scrolling_locked() {
    let f = fixture();
    assert_eq!(f.controller.current_position(), SnapPosition::Bottom);
    assert_eq!(f.controller.offset(), 700.0);
    assert!(f.controller.scroll_locked());
    assert!(!f.controller.is_dragging());
}

#[test]
fn drag_to_top_edge_settles_at_top_and_unlocks_scroll() {
    let f = fixture();
    f.controller.begin_drag();
    f.controller.drag_by(-685.0);
    // 700 - 685 = 15, clamped to the 20px top inset.
    assert_eq!(f.controller.offset(), 20.0);

    f.controller.end_drag(0.0);
    assert_eq!(f.controller.current_position(), SnapPosition::Top);
    assert_eq!(f.host.pending_target(), Some(20.0));
    assert_eq!(f.host.pending_duration(), Some(SETTLE_DURATION_MS));
    // Scroll stays locked until the settle completes.
    assert!(f.controller.scroll_locked());

    f.host.complete();
    assert!(!f.controller.scroll_locked());
    assert_eq!(*f.observer.settled.borrow(), vec![SnapPosition::Top]);
}

#[test]
fn offset_never_leaves_the_stop_range() {
    let f = fixture();
    f.controller.begin_drag();
    for delta in [-10_000.0, 300.0, -55.5, 9_999.0, -1.0, f32::NAN, 40.0] {
        f.controller.drag_by(delta);
        let offset = f.controller.offset();
        assert!((20.0..=700.0).contains(&offset), "offset {offset} escaped");
    }
    for reported in f.observer.changing.borrow().iter() {
        assert!((20.0..=700.0).contains(reported));
    }
}

#[test]
fn drag_keeps_host_and_observers_in_sync() {
    let f = fixture();
    f.controller.begin_drag();
    f.controller.drag_by(-100.0);

    assert_eq!(f.controller.offset(), 600.0);
    assert_eq!(f.host.value(), 600.0);
    assert_eq!(*f.observer.changing.borrow(), vec![600.0]);
}

#[test]
fn auxiliary_opacity_follows_the_curve_during_drag() {
    let f = fixture();
    f.controller.begin_drag();

    // Below the middle the view stays opaque.
    f.controller.drag_by(-100.0);
    assert_eq!(f.aux.opacity.get(), 1.0);

    // 700 - 350 = 350: fifty above the middle -> 0.3 - 50/400.
    f.controller.drag_by(-250.0);
    assert!((f.aux.opacity.get() - 0.175).abs() < 1e-6);

    // Near the top the view is gone.
    f.controller.drag_by(-330.0);
    assert_eq!(f.aux.opacity.get(), 0.0);
}

#[test]
fn settle_toward_top_hides_the_auxiliary_view() {
    let f = fixture();
    f.controller.begin_drag();
    f.controller.drag_by(-680.0);
    f.controller.end_drag(0.0);
    assert_eq!(f.aux.opacity.get(), 0.0);

    f.host.complete();
    f.controller.begin_drag();
    f.controller.drag_by(100.0);
    f.controller.end_drag(900.0);
    assert_eq!(f.aux.opacity.get(), 1.0);
}

#[test]
fn flick_down_from_middle_settles_at_bottom() {
    let f = fixture();
    settle_at(&f, SnapPosition::Middle);

    f.controller.begin_drag();
    f.controller.drag_by(80.0);
    f.controller.end_drag(500.0);
    f.host.complete();

    assert_eq!(f.controller.current_position(), SnapPosition::Bottom);
    assert!(f.controller.scroll_locked());
}

#[test]
fn scroll_lock_tracks_the_settle_target() {
    let cases = [
        (-685.0, 0.0, SnapPosition::Top, false),
        (-320.0, 0.0, SnapPosition::Middle, true),
        (-50.0, 0.0, SnapPosition::Bottom, true),
    ];
    for (delta, velocity, expected, locked) in cases {
        let f = fixture();
        f.controller.begin_drag();
        f.controller.drag_by(delta);
        f.controller.end_drag(velocity);
        f.host.complete();
        assert_eq!(f.controller.current_position(), expected);
        assert_eq!(f.controller.scroll_locked(), locked);
    }
}

#[test]
fn end_drag_without_begin_is_a_noop() {
    let f = fixture();
    f.controller.end_drag(500.0);
    assert_eq!(f.host.animate_calls.get(), 0);
    assert_eq!(f.controller.current_position(), SnapPosition::Bottom);
}

#[test]
fn begin_drag_is_idempotent() {
    let f = fixture();
    f.controller.begin_drag();
    f.controller.drag_by(-100.0);
    f.controller.begin_drag();
    assert_eq!(f.controller.offset(), 600.0);
    assert!(f.controller.is_dragging());
}

#[test]
fn request_move_is_idempotent_once_settled() {
    let f = fixture();
    settle_at(&f, SnapPosition::Top);
    assert_eq!(f.host.animate_calls.get(), 1);

    f.controller.request_move(SnapPosition::Top);
    assert_eq!(f.host.animate_calls.get(), 1, "no duplicate animation");
    assert_eq!(f.observer.settled.borrow().len(), 1, "no duplicate notification");
}

#[test]
fn request_move_is_ignored_mid_drag() {
    let f = fixture();
    f.controller.begin_drag();
    f.controller.request_move(SnapPosition::Top);
    assert_eq!(f.host.animate_calls.get(), 0);
    assert!(f.controller.is_dragging());
}

#[test]
fn new_drag_preempts_an_inflight_settle() {
    let f = fixture();
    f.controller.request_move(SnapPosition::Top);
    assert!(f.controller.is_animating());

    // The host has interpolated partway when the finger comes back down.
    f.host.value.set(340.0);
    f.controller.begin_drag();

    assert!(f.controller.is_dragging());
    assert!(!f.controller.is_animating());
    assert_eq!(f.controller.offset(), 340.0);
    // The redirected settle never reported.
    assert!(f.observer.settled.borrow().is_empty());
}

#[test]
fn stale_completion_from_a_sloppy_host_is_ignored() {
    let f = fixture_with_host(ManualHost::stale(700.0));
    f.controller.request_move(SnapPosition::Top);
    f.controller.begin_drag();

    // The host fires the superseded completion anyway.
    f.host.complete();

    assert!(f.observer.settled.borrow().is_empty());
    assert!(f.controller.scroll_locked(), "stale settle must not unlock scroll");
    assert!(f.controller.is_dragging());
}

#[test]
fn pull_down_at_top_of_open_sheet_takes_over_scrolling() {
    let f = fixture();
    settle_at(&f, SnapPosition::Top);
    assert!(!f.controller.scroll_locked());
    f.focus.focused.set(true);

    assert!(f.controller.should_begin_simultaneously(5.0));
    assert!(f.controller.scroll_locked());
    assert!(!f.focus.has_focus(), "search focus is relinquished");
}

#[test]
fn motionless_takeover_keeps_search_focus() {
    let f = fixture();
    settle_at(&f, SnapPosition::Top);
    f.focus.focused.set(true);

    assert!(f.controller.should_begin_simultaneously(0.0));
    assert!(f.focus.has_focus());
}

#[test]
fn scrolled_list_keeps_the_gesture() {
    let f = fixture();
    settle_at(&f, SnapPosition::Top);
    f.scroll.offset.set(50.0);

    assert!(!f.controller.should_begin_simultaneously(5.0));
    // Still at Top, so the list keeps scrolling.
    assert!(!f.controller.scroll_locked());
}

#[test]
fn upward_pull_at_top_stays_with_the_list() {
    let f = fixture();
    settle_at(&f, SnapPosition::Top);

    assert!(!f.controller.should_begin_simultaneously(-5.0));
    assert!(!f.controller.scroll_locked());
}

#[test]
fn away_from_top_the_list_never_scrolls() {
    let f = fixture();
    assert!(!f.controller.should_begin_simultaneously(5.0));
    assert!(f.controller.scroll_locked());
}

#[test]
fn search_focus_opens_the_sheet() {
    let f = fixture();
    f.controller.search_began();
    assert_eq!(f.host.pending_target(), Some(20.0));

    f.host.complete();
    assert_eq!(f.controller.current_position(), SnapPosition::Top);

    // Already open: focusing again does nothing.
    f.controller.search_began();
    assert_eq!(f.host.animate_calls.get(), 1);
}

#[test]
fn search_cancel_tucks_the_sheet_away_and_relocks() {
    let f = fixture();
    settle_at(&f, SnapPosition::Top);
    f.focus.focused.set(true);

    f.controller.search_cancelled();
    assert!(!f.focus.has_focus());
    assert_eq!(f.host.pending_target(), Some(700.0));

    f.host.complete();
    assert_eq!(f.controller.current_position(), SnapPosition::Bottom);
    assert!(f.controller.scroll_locked());
}

#[test]
fn search_cancel_below_top_only_drops_focus() {
    let f = fixture();
    settle_at(&f, SnapPosition::Middle);
    f.focus.focused.set(true);
    let calls = f.host.animate_calls.get();

    f.controller.search_cancelled();
    assert!(!f.focus.has_focus());
    assert_eq!(f.host.animate_calls.get(), calls);
}

#[test]
fn present_plays_the_long_appearance_animation() {
    let f = fixture();
    f.controller.present();
    assert_eq!(f.host.pending_target(), Some(700.0));
    assert_eq!(f.host.pending_duration(), Some(PRESENT_DURATION_MS));

    f.host.complete();
    assert_eq!(*f.observer.settled.borrow(), vec![SnapPosition::Bottom]);
}

#[test]
fn cancelled_drag_settles_like_a_still_release() {
    let f = fixture();
    f.controller.begin_drag();
    f.controller.drag_by(-350.0);
    // 350: upper half, zero velocity, past the top dead zone -> Middle.
    f.controller.cancel_drag();
    f.host.complete();
    assert_eq!(f.controller.current_position(), SnapPosition::Middle);
}

#[test]
fn resize_repins_a_settled_sheet() {
    let f = fixture();
    f.controller.set_screen_height(1000.0);
    assert_eq!(f.controller.offset(), 900.0);
    assert_eq!(f.host.value(), 900.0);
    assert_eq!(f.controller.metrics().screen_height, 1000.0);
}

#[test]
fn resize_mid_drag_clamps_to_the_new_range() {
    let f = fixture();
    f.controller.begin_drag();
    f.controller.drag_by(-100.0);
    assert_eq!(f.controller.offset(), 600.0);

    f.controller.set_screen_height(500.0);
    assert_eq!(f.controller.offset(), 400.0);
    assert!(f.controller.is_dragging());
}

#[test]
fn resize_mid_settle_retargets_the_animation() {
    let f = fixture();
    f.controller.request_move(SnapPosition::Middle);
    f.controller.set_screen_height(600.0);

    assert_eq!(f.host.pending_target(), Some(300.0));
    f.host.complete();
    assert_eq!(f.controller.offset(), 300.0);
}
