//! Shared gesture constants for consistent touch/pointer handling.
//!
//! Values are in logical pixels. For very high-density touch screens,
//! consider scaling by the device's DPI factor.

/// Drag threshold in logical pixels.
///
/// The pointer must move more than this distance from the initial press
/// before a pan is recognized. Large enough to ignore finger jitter on touch
/// screens, small enough to feel responsive for intentional drags; matches
/// common platform conventions (Android uses ~8dp for
/// ViewConfiguration.TOUCH_SLOP).
pub const TOUCH_SLOP: f32 = 8.0;

/// Maximum release velocity in logical pixels per second.
///
/// Release velocities are capped here before the snap decision so a single
/// noisy sample cannot register as an extreme flick.
pub const MAX_FLING_VELOCITY: f32 = 8_000.0;
