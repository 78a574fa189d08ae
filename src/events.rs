use crate::geometry::Point;

/// Logical controller buttons the album reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PadButton {
    A,
    B,
    X,
    Y,
    Start,
    DPadUp,
    DPadDown,
    DPadLeft,
    DPadRight,
}

/// Input after translation from winit/gilrs. Pointer coordinates are in
/// logical screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    PointerDown(Point),
    PointerUp(Point),
    PointerMotion(Point),
    ButtonDown(PadButton),
    ButtonUp(PadButton),
}

impl InputEvent {
    pub const fn pointer(&self) -> Option<Point> {
        match *self {
            Self::PointerDown(p) | Self::PointerUp(p) | Self::PointerMotion(p) => Some(p),
            Self::ButtonDown(_) | Self::ButtonUp(_) => None,
        }
    }
}

/// Side effects the album asks its host to perform on GPU-owned resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppRequest {
    /// Decode the full-size image for the single view.
    LoadFull(std::path::PathBuf),
    /// The single view closed; its full-size texture is no longer needed.
    UnloadFull(std::path::PathBuf),
    /// Drop every texture derived from this file.
    Release(std::path::PathBuf),
}
