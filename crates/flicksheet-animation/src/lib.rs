//! Animation support for Flicksheet
//!
//! This crate provides the frame clock that drives settle animations and the
//! tween primitive that interpolates the sheet's offset between snap points.

pub mod animation;
pub mod frame_clock;

pub use animation::{AnimationSpec, Easing, TweenAnimation};
pub use frame_clock::{FrameCallbackId, FrameCallbackRegistration, FrameClock};

pub mod prelude {
    pub use crate::animation::{AnimationSpec, Easing, TweenAnimation};
    pub use crate::frame_clock::{FrameCallbackRegistration, FrameClock};
}
