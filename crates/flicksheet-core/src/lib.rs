//! Flicksheet: a framework-agnostic bottom-sheet interaction controller.
//!
//! The sheet snaps to one of three vertical stops based on where a drag ends
//! and how fast it was moving. [`position::resolve`] makes that decision;
//! [`controller::SheetController`] owns the drag state machine, the scroll
//! arbitration with the embedded list, and the settle animations requested
//! from an [`host::AnimationHost`].

pub mod controller;
pub mod host;
pub mod position;

pub use controller::{
    AuxiliaryView, FocusTarget, SheetController, SheetObserver, PRESENT_DURATION_MS,
    SETTLE_DURATION_MS,
};
pub use host::{AnimationHost, FrameClockAnimationHost};
pub use position::{floating_alpha, resolve, SheetMetrics, SnapPosition};

pub mod prelude {
    pub use crate::controller::{AuxiliaryView, FocusTarget, SheetController, SheetObserver};
    pub use crate::host::{AnimationHost, FrameClockAnimationHost};
    pub use crate::position::{resolve, SheetMetrics, SnapPosition};
}
