//! Modal yes/no prompt shown before deleting screenshots.

use tracing::debug;

use crate::config::Configuration;
use crate::events::{InputEvent, PadButton};
use crate::geometry::{Point, Rect, Rgba};
use crate::scene::{Anchor, Frame};
use crate::widgets::{Animation, Button, ButtonVisual};

pub const DELETE_PROMPT: &str = "Are you sure you want to delete the selected images?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogChoice {
    Cancel,
    Confirm,
}

#[derive(Debug)]
pub struct ConfirmDialog {
    open: bool,
    panel: Rect,
    screen: Rect,
    message: String,
    cancel: Button<DialogChoice>,
    confirm: Button<DialogChoice>,
}

impl ConfirmDialog {
    pub fn new(cfg: &Configuration, message: impl Into<String>) -> Self {
        let (w, h) = (cfg.screen_width(), cfg.screen_height());
        let screen = Rect::new(0, 0, w, h);
        let panel = Rect::new(w / 4, h / 3, w / 2, h / 3);
        let button_w = panel.w / 3;
        let button_h = panel.h / 4;
        let button_y = panel.bottom() - button_h - button_h / 2;
        let animation = Animation::from_config(&cfg.button, screen);
        let cancel = Button::new(
            Rect::new(panel.x + button_w / 3, button_y, button_w, button_h),
            ButtonVisual::Solid(Rgba::GRAY),
            animation,
            cfg.button.steps,
            DialogChoice::Cancel,
        )
        .with_pad(PadButton::B)
        .with_label("Cancel", Rgba::WHITE, 40.0);
        let confirm = Button::new(
            Rect::new(
                panel.right() - button_w - button_w / 3,
                button_y,
                button_w,
                button_h,
            ),
            ButtonVisual::Solid(Rgba::DARK_RED),
            animation,
            cfg.button.steps,
            DialogChoice::Confirm,
        )
        .with_pad(PadButton::A)
        .with_label("Delete", Rgba::WHITE, 40.0);
        Self {
            open: false,
            panel,
            screen,
            message: message.into(),
            cancel,
            confirm,
        }
    }

    pub const fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
        self.cancel.set_enabled(true);
        self.confirm.set_enabled(true);
    }

    pub fn close(&mut self) {
        self.open = false;
        self.cancel.set_enabled(false);
        self.confirm.set_enabled(false);
    }

    /// While open, every event is swallowed. Returns whether the dialog is open.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        if !self.open {
            return false;
        }
        if !self.cancel.handle_input(event) {
            self.confirm.handle_input(event);
        }
        true
    }

    /// Animate both buttons; the first finished click closes the dialog.
    ///
    /// Clicks finishing on the same frame resolve to [`DialogChoice::Cancel`]:
    /// nothing is deleted unless confirm alone fired.
    pub fn update(&mut self) -> Option<DialogChoice> {
        if !self.open {
            return None;
        }
        let cancel = self.cancel.update();
        let confirm = self.confirm.update();
        let choice = match (cancel, confirm) {
            (Some(cancel), Some(_)) => {
                debug!("cancel and confirm fired together; cancelling");
                Some(cancel)
            }
            (Some(only), None) | (None, Some(only)) => Some(only),
            (None, None) => None,
        };
        if choice.is_some() {
            self.close();
        }
        choice
    }

    pub fn compose(&self, frame: &mut Frame) {
        if !self.open {
            return;
        }
        frame.fill_rect(self.screen, Rgba::BLACK.with_alpha(160));
        frame.fill_rect(self.panel, Rgba::rgb(0x20, 0x20, 0x20));
        frame.outline_rect(self.panel, 4.0, Rgba::WHITE);
        let c = self.panel.center();
        frame.text(
            self.message.clone(),
            Point::new(c.x, self.panel.y + self.panel.h / 3),
            40.0,
            Rgba::WHITE,
            Anchor::Center,
        );
        self.cancel.compose(frame);
        self.confirm.compose(frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dialog() -> ConfirmDialog {
        let mut d = ConfirmDialog::new(&Configuration::default(), DELETE_PROMPT);
        d.open();
        d
    }

    fn settle(d: &mut ConfirmDialog) -> Option<DialogChoice> {
        (0..20).find_map(|_| d.update())
    }

    #[test]
    fn pad_a_confirms() {
        let mut d = dialog();
        d.handle_input(&InputEvent::ButtonDown(PadButton::A));
        d.handle_input(&InputEvent::ButtonUp(PadButton::A));
        assert_eq!(settle(&mut d), Some(DialogChoice::Confirm));
        assert!(!d.is_open());
    }

    #[test]
    fn tap_cancel() {
        let mut d = dialog();
        let p = d.cancel.rect().center();
        d.handle_input(&InputEvent::PointerDown(p));
        d.handle_input(&InputEvent::PointerUp(p));
        assert_eq!(settle(&mut d), Some(DialogChoice::Cancel));
    }

    #[test]
    fn simultaneous_clicks_cancel() {
        let mut d = dialog();
        for button in [PadButton::B, PadButton::A] {
            d.handle_input(&InputEvent::ButtonDown(button));
        }
        for button in [PadButton::B, PadButton::A] {
            d.handle_input(&InputEvent::ButtonUp(button));
        }
        assert_eq!(settle(&mut d), Some(DialogChoice::Cancel));
        assert!(!d.is_open());
        assert_eq!(settle(&mut d), None);
    }

    #[test]
    fn swallows_everything_while_open() {
        let mut d = dialog();
        assert!(d.handle_input(&InputEvent::ButtonDown(PadButton::X)));
        assert!(d.handle_input(&InputEvent::PointerDown(Point::new(1, 1))));
        assert_eq!(settle(&mut d), None);
        d.close();
        assert!(!d.handle_input(&InputEvent::ButtonDown(PadButton::A)));
    }
}
