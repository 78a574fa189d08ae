//! Translation of raw winit and gilrs input into [`InputEvent`]s.

use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::keyboard::{Key, NamedKey};

use crate::events::PadButton;
use crate::geometry::Point;

/// Keyboard stand-ins for the controller on desktop.
pub fn map_key(key: &Key) -> Option<PadButton> {
    match key {
        Key::Named(named) => match named {
            NamedKey::ArrowUp => Some(PadButton::DPadUp),
            NamedKey::ArrowDown => Some(PadButton::DPadDown),
            NamedKey::ArrowLeft => Some(PadButton::DPadLeft),
            NamedKey::ArrowRight => Some(PadButton::DPadRight),
            NamedKey::Enter | NamedKey::Space => Some(PadButton::A),
            NamedKey::Escape | NamedKey::Backspace => Some(PadButton::B),
            NamedKey::Delete => Some(PadButton::X),
            _ => None,
        },
        Key::Character(s) if s.eq_ignore_ascii_case("x") => Some(PadButton::X),
        Key::Character(s) if s.eq_ignore_ascii_case("y") => Some(PadButton::Y),
        _ => None,
    }
}

pub const fn map_gamepad(button: gilrs::Button) -> Option<PadButton> {
    match button {
        gilrs::Button::South => Some(PadButton::A),
        gilrs::Button::East => Some(PadButton::B),
        gilrs::Button::West => Some(PadButton::X),
        gilrs::Button::North => Some(PadButton::Y),
        gilrs::Button::Start => Some(PadButton::Start),
        gilrs::Button::DPadUp => Some(PadButton::DPadUp),
        gilrs::Button::DPadDown => Some(PadButton::DPadDown),
        gilrs::Button::DPadLeft => Some(PadButton::DPadLeft),
        gilrs::Button::DPadRight => Some(PadButton::DPadRight),
        _ => None,
    }
}

/// Maps window pixels onto the fixed logical canvas the UI is laid out on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    window: PhysicalSize<u32>,
    logical: PhysicalSize<u32>,
}

impl CoordinateMapper {
    pub const fn new(window: PhysicalSize<u32>, logical: PhysicalSize<u32>) -> Self {
        Self { window, logical }
    }

    pub fn resize(&mut self, window: PhysicalSize<u32>) {
        self.window = window;
    }

    #[allow(clippy::cast_possible_truncation)]
    pub fn to_logical(&self, pos: PhysicalPosition<f64>) -> Point {
        let sx = f64::from(self.logical.width) / f64::from(self.window.width.max(1));
        let sy = f64::from(self.logical.height) / f64::from(self.window.height.max(1));
        Point::new((pos.x * sx).round() as i32, (pos.y * sy).round() as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyboard_mapping() {
        assert_eq!(
            map_key(&Key::Named(NamedKey::ArrowLeft)),
            Some(PadButton::DPadLeft)
        );
        assert_eq!(map_key(&Key::Named(NamedKey::Space)), Some(PadButton::A));
        assert_eq!(map_key(&Key::Named(NamedKey::Backspace)), Some(PadButton::B));
        assert_eq!(map_key(&Key::Character("X".into())), Some(PadButton::X));
        assert_eq!(map_key(&Key::Named(NamedKey::Tab)), None);
    }

    #[test]
    fn gamepad_mapping() {
        assert_eq!(map_gamepad(gilrs::Button::South), Some(PadButton::A));
        assert_eq!(map_gamepad(gilrs::Button::West), Some(PadButton::X));
        assert_eq!(map_gamepad(gilrs::Button::LeftTrigger), None);
    }

    #[test]
    fn coordinates_scale_to_logical_canvas() {
        let m = CoordinateMapper::new(
            PhysicalSize::new(3840, 2160),
            PhysicalSize::new(1920, 1080),
        );
        assert_eq!(m.to_logical(PhysicalPosition::new(100.0, 200.0)), Point::new(50, 100));
    }
}
