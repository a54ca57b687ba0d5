//! Snap positions and the velocity-aware snap classifier.
//!
//! The sheet rests at one of three vertical stops. Where it settles after a
//! drag depends on both where it was released and how fast it was moving: a
//! flick is evidence of intent to continue past the nearest stop, while a
//! slow release snaps to the nearest one, with a fixed dead zone around each
//! boundary to prevent jitter.

use self::SnapPosition::{Bottom, Middle, Top};

/// One of the sheet's three resting states.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SnapPosition {
    Top,
    Middle,
    Bottom,
}

/// Geometry the snap computations run against.
///
/// Threaded explicitly into every computation rather than read from ambient
/// screen state, so stop offsets track live size changes and the resolver
/// stays testable without a UI runtime. All values are logical pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SheetMetrics {
    /// Viewport height.
    pub screen_height: f32,
    /// Distance from the screen top to the Top stop.
    pub top_inset: f32,
    /// Distance from the screen bottom to the Bottom stop.
    pub bottom_inset: f32,
    /// Dead zone around each stop boundary.
    pub drag_offset: f32,
}

impl SheetMetrics {
    pub const DEFAULT_TOP_INSET: f32 = 20.0;
    pub const DEFAULT_BOTTOM_INSET: f32 = 100.0;
    pub const DEFAULT_DRAG_OFFSET: f32 = 40.0;

    /// Metrics with the default insets for the given viewport height.
    ///
    /// A non-finite or negative height is sanitized to zero so downstream
    /// computations stay total.
    pub fn new(screen_height: f32) -> Self {
        Self::with_insets(
            screen_height,
            Self::DEFAULT_TOP_INSET,
            Self::DEFAULT_BOTTOM_INSET,
            Self::DEFAULT_DRAG_OFFSET,
        )
    }

    /// Metrics with custom insets and dead zone.
    pub fn with_insets(screen_height: f32, top_inset: f32, bottom_inset: f32, drag_offset: f32) -> Self {
        let screen_height = if screen_height.is_finite() && screen_height > 0.0 {
            screen_height
        } else {
            log::error!("degenerate screen height {screen_height}; sheet geometry collapsed to zero");
            0.0
        };
        Self {
            screen_height,
            top_inset,
            bottom_inset,
            drag_offset,
        }
    }

    /// The Middle stop's offset, half the viewport height.
    pub fn middle_y(&self) -> f32 {
        self.screen_height / 2.0
    }

    /// The range the sheet's top edge may occupy during a drag.
    ///
    /// Degenerate geometry collapses the range to a point instead of
    /// producing an inverted interval.
    pub fn drag_bounds(&self) -> (f32, f32) {
        let lo = self.top_inset;
        let hi = (self.screen_height - self.bottom_inset).max(lo);
        (lo, hi)
    }
}

impl SnapPosition {
    /// The top-edge offset of this stop, recomputed from live geometry.
    pub fn y_pos(&self, metrics: &SheetMetrics) -> f32 {
        match self {
            Top => metrics.top_inset,
            Middle => metrics.middle_y(),
            Bottom => metrics.screen_height - metrics.bottom_inset,
        }
    }
}

/// Picks the stop a released sheet should settle at.
///
/// `offset` is the sheet's top-edge Y (0 = screen top); `velocity_y` is the
/// release velocity, positive moving down-screen. Total over all real inputs:
/// offsets outside `[0, screen_height]` (including NaN) fall back to Bottom.
/// That fallback is the documented policy for out-of-range input, not a
/// nearest-stop guarantee.
pub fn resolve(offset: f32, velocity_y: f32, metrics: &SheetMetrics) -> SnapPosition {
    let half = metrics.middle_y();
    let dead_zone = metrics.drag_offset;

    if offset >= 0.0 && offset <= half {
        // Between the Top and Middle stops.
        if velocity_y >= 0.0 {
            if offset <= dead_zone {
                Top
            } else {
                Middle
            }
        } else if (offset - half).abs() <= dead_zone {
            Middle
        } else {
            Top
        }
    } else if offset > half && offset <= metrics.screen_height {
        // Between the Middle and Bottom stops.
        if velocity_y >= 0.0 {
            if (offset - half).abs() <= dead_zone {
                Middle
            } else {
                Bottom
            }
        } else if (offset - (metrics.screen_height - metrics.bottom_inset)).abs() <= dead_zone {
            Bottom
        } else {
            Middle
        }
    } else {
        Bottom
    }
}

/// Opacity for the auxiliary (floating) view at the given sheet offset.
///
/// Fully opaque once the sheet sits below the Middle stop; above it the view
/// fades toward transparent as the sheet approaches Top. Degenerate geometry
/// yields full opacity instead of a non-finite value.
pub fn floating_alpha(offset: f32, metrics: &SheetMetrics) -> f32 {
    let middle = metrics.middle_y();
    if middle <= f32::EPSILON {
        return 1.0;
    }
    if offset > middle {
        1.0
    } else {
        (0.3 - (middle - offset).abs() / middle).max(0.0)
    }
}
