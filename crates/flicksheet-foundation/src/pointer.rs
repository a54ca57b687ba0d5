//! Pointer input types for the sheet's vertical axis.

/// What happened to the pointer in a given sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEventKind {
    Down,
    Move,
    Up,
    Cancel,
}

/// One observed pointer state, reduced to the axis the sheet cares about.
///
/// `y` is the pointer's screen-space vertical coordinate (0 = screen top,
/// growing downward); `time_ms` is the host's event timestamp.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    pub kind: PointerEventKind,
    pub y: f32,
    pub time_ms: i64,
}

impl PointerSample {
    pub fn new(kind: PointerEventKind, y: f32, time_ms: i64) -> Self {
        Self { kind, y, time_ms }
    }
}
