//! Foundation elements for Flicksheet: pointer input, the vertical pan
//! recognizer that feeds the sheet controller, and the scroll contract the
//! embedded list implements.

pub mod gesture_constants;
pub mod pan_gesture;
pub mod pointer;
pub mod scroll_surface;
pub mod velocity_tracker;

pub use gesture_constants::{MAX_FLING_VELOCITY, TOUCH_SLOP};
pub use pan_gesture::{DragEvent, PanGestureRecognizer};
pub use pointer::{PointerEventKind, PointerSample};
pub use scroll_surface::{ListScrollState, ScrollSurface};
pub use velocity_tracker::VelocityTracker;

pub mod prelude {
    pub use crate::gesture_constants::{MAX_FLING_VELOCITY, TOUCH_SLOP};
    pub use crate::pan_gesture::{DragEvent, PanGestureRecognizer};
    pub use crate::pointer::{PointerEventKind, PointerSample};
    pub use crate::scroll_surface::{ListScrollState, ScrollSurface};
    pub use crate::velocity_tracker::VelocityTracker;
}
