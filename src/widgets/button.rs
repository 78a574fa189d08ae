//! Push button with a press/release animation, driven once per frame.
//!
//! Input only records intent (`held`, `click_latched`); `update` advances the
//! animation and emits the bound command at the end of the inflate phase
//! after a genuine click.

use crate::config::{ButtonConfig, ButtonStyle};
use crate::events::{InputEvent, PadButton};
use crate::geometry::{Flip, Point, Rect, Rgba};
use crate::scene::{Anchor, Frame, TextureKey};

#[derive(Debug, Clone, PartialEq)]
pub enum ButtonVisual {
    Texture {
        key: TextureKey,
        flip: Flip,
        tint: Rgba,
    },
    /// Fallback when no texture exists; outlined while pressed.
    Solid(Rgba),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Animation {
    /// Grow each edge by up to `max_expansion` px, never past `screen`.
    Grow { max_expansion: i32, screen: Rect },
    /// Scale around the centre toward `pressed_scale`.
    Scale { pressed_scale: f32 },
}

impl Animation {
    pub fn from_config(cfg: &ButtonConfig, screen: Rect) -> Self {
        match cfg.style {
            ButtonStyle::Grow => Self::Grow {
                max_expansion: cfg.max_expansion,
                screen,
            },
            ButtonStyle::Scale => Self::Scale {
                pressed_scale: cfg.pressed_scale,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Inflating(u32),
    Inflated,
    Deflating(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PressSource {
    Pointer,
    Pad,
}

/// Callbacks fired from [`Button::update_with`]; all default to no-ops.
pub trait ButtonHooks {
    fn on_start(&mut self) {}
    fn on_inflate(&mut self, _progress: f32) {}
    fn on_release(&mut self) {}
    fn on_deflate(&mut self, _progress: f32) {}
}

pub struct NoHooks;

impl ButtonHooks for NoHooks {}

#[derive(Debug, Clone)]
pub struct Button<C> {
    bounds: Rect,
    current: Rect,
    visual: ButtonVisual,
    label: Option<String>,
    label_color: Rgba,
    label_size: f32,
    pad: Option<PadButton>,
    animation: Animation,
    steps: u32,
    phase: Phase,
    held: Option<PressSource>,
    click_latched: bool,
    enabled: bool,
    command: C,
}

impl<C: Copy> Button<C> {
    pub fn new(bounds: Rect, visual: ButtonVisual, animation: Animation, steps: u32, command: C) -> Self {
        Self {
            bounds,
            current: bounds,
            visual,
            label: None,
            label_color: Rgba::WHITE,
            label_size: 48.0,
            pad: None,
            animation,
            steps: steps.max(1),
            phase: Phase::Idle,
            held: None,
            click_latched: false,
            enabled: true,
            command,
        }
    }

    #[must_use]
    pub fn with_pad(mut self, pad: PadButton) -> Self {
        self.pad = Some(pad);
        self
    }

    #[must_use]
    pub fn with_label(mut self, text: impl Into<String>, color: Rgba, size: f32) -> Self {
        self.label = Some(text.into());
        self.label_color = color;
        self.label_size = size;
        self
    }

    pub const fn rect(&self) -> Rect {
        self.current
    }

    pub const fn bounds(&self) -> Rect {
        self.bounds
    }

    pub const fn phase(&self) -> Phase {
        self.phase
    }

    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub const fn is_held(&self) -> bool {
        self.held.is_some()
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn set_label(&mut self, text: impl Into<String>) {
        self.label = Some(text.into());
    }

    pub fn set_visual(&mut self, visual: ButtonVisual) {
        self.visual = visual;
    }

    pub fn set_pad(&mut self, pad: Option<PadButton>) {
        self.pad = pad;
    }

    /// Move the button; any running animation is dropped.
    pub fn set_rect(&mut self, bounds: Rect) {
        self.bounds = bounds;
        self.reset();
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.reset();
        }
    }

    fn reset(&mut self) {
        self.current = self.bounds;
        self.phase = Phase::Idle;
        self.held = None;
        self.click_latched = false;
    }

    /// Feed one input event. Returns `true` when the event landed on this
    /// button and should not reach widgets underneath.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        if !self.enabled {
            return false;
        }
        match *event {
            InputEvent::PointerDown(p) if self.current.contains(p) => {
                self.press(PressSource::Pointer);
                true
            }
            InputEvent::PointerUp(p) if self.held == Some(PressSource::Pointer) => {
                if self.current.contains(p) {
                    self.release();
                } else {
                    self.cancel();
                }
                true
            }
            InputEvent::PointerMotion(p) => {
                if self.held == Some(PressSource::Pointer) && !self.current.contains(p) {
                    self.cancel();
                }
                false
            }
            InputEvent::ButtonDown(b) if Some(b) == self.pad => {
                self.press(PressSource::Pad);
                true
            }
            InputEvent::ButtonUp(b) if Some(b) == self.pad && self.held == Some(PressSource::Pad) => {
                self.release();
                true
            }
            _ => false,
        }
    }

    fn press(&mut self, source: PressSource) {
        self.held = Some(source);
        self.click_latched = false;
        self.phase = match self.phase {
            Phase::Idle => Phase::Inflating(0),
            // Re-pressed mid-deflate: inflate again from the current size.
            Phase::Deflating(step) => Phase::Inflating(step),
            other => other,
        };
    }

    fn release(&mut self) {
        self.held = None;
        self.click_latched = true;
    }

    fn cancel(&mut self) {
        self.held = None;
        self.click_latched = false;
    }

    pub fn update(&mut self) -> Option<C> {
        self.update_with(&mut NoHooks)
    }

    /// Advance the animation one frame. Returns the bound command exactly
    /// once per completed click.
    pub fn update_with<H: ButtonHooks>(&mut self, hooks: &mut H) -> Option<C> {
        let mut fired = None;
        self.phase = match self.phase {
            Phase::Idle => Phase::Idle,
            Phase::Inflating(step) => {
                if step == 0 {
                    hooks.on_start();
                }
                let next = step + 1;
                hooks.on_inflate(self.progress(next));
                if next >= self.steps {
                    Phase::Inflated
                } else {
                    Phase::Inflating(next)
                }
            }
            Phase::Inflated if self.held.is_some() => Phase::Inflated,
            Phase::Inflated => {
                if std::mem::take(&mut self.click_latched) {
                    hooks.on_release();
                    fired = Some(self.command);
                }
                Phase::Deflating(self.steps)
            }
            Phase::Deflating(step) => {
                let next = step.saturating_sub(1);
                hooks.on_deflate(self.progress(next));
                if next == 0 {
                    Phase::Idle
                } else {
                    Phase::Deflating(next)
                }
            }
        };
        self.current = self.animated_rect();
        fired
    }

    #[allow(clippy::cast_precision_loss)]
    fn progress(&self, step: u32) -> f32 {
        (step as f32 / self.steps as f32).clamp(0.0, 1.0)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn animated_rect(&self) -> Rect {
        let p = match self.phase {
            Phase::Idle => return self.bounds,
            Phase::Inflating(step) | Phase::Deflating(step) => self.progress(step),
            Phase::Inflated => 1.0,
        };
        match self.animation {
            Animation::Scale { pressed_scale } => {
                self.bounds.scaled(1.0 + (pressed_scale - 1.0) * p)
            }
            Animation::Grow {
                max_expansion,
                screen,
            } => {
                let e = (max_expansion as f32 * p) as i32;
                let b = self.bounds;
                let left = (b.x - e).max(screen.x.min(b.x));
                let top = (b.y - e).max(screen.y.min(b.y));
                let right = (b.right() + e).min(screen.right().max(b.right()));
                let bottom = (b.bottom() + e).min(screen.bottom().max(b.bottom()));
                Rect::new(left, top, right - left, bottom - top)
            }
        }
    }

    pub fn compose(&self, frame: &mut Frame) {
        let r = self.current;
        match &self.visual {
            ButtonVisual::Texture { key, flip, tint } => {
                frame.textured(key.clone(), r, *flip, *tint);
            }
            ButtonVisual::Solid(color) => {
                frame.fill_rect(r, *color);
                if self.phase != Phase::Idle {
                    frame.outline_rect(r, 4.0, Rgba::WHITE);
                }
            }
        }
        if let Some(label) = &self.label {
            let c = r.center();
            frame.text(
                label.clone(),
                Point::new(c.x, c.y),
                self.label_size,
                self.label_color,
                Anchor::Center,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::DrawCommand;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Go;

    fn scale_button() -> Button<Go> {
        Button::new(
            Rect::new(100, 100, 100, 50),
            ButtonVisual::Solid(Rgba::GRAY),
            Animation::Scale { pressed_scale: 1.1 },
            3,
            Go,
        )
        .with_pad(PadButton::A)
    }

    fn run(b: &mut Button<Go>, frames: usize) -> Vec<Go> {
        (0..frames).filter_map(|_| b.update()).collect()
    }

    #[test]
    fn click_inside_fires_once() {
        let mut b = scale_button();
        assert!(b.handle_input(&InputEvent::PointerDown(Point::new(150, 120))));
        assert!(b.handle_input(&InputEvent::PointerUp(Point::new(150, 120))));
        assert_eq!(run(&mut b, 20), vec![Go]);
        assert_eq!(b.phase(), Phase::Idle);
        assert_eq!(b.rect(), b.bounds());
    }

    #[test]
    fn release_outside_cancels() {
        let mut b = scale_button();
        b.handle_input(&InputEvent::PointerDown(Point::new(150, 120)));
        b.handle_input(&InputEvent::PointerUp(Point::new(10, 10)));
        assert!(run(&mut b, 20).is_empty());
    }

    #[test]
    fn moving_off_while_held_cancels() {
        let mut b = scale_button();
        b.handle_input(&InputEvent::PointerDown(Point::new(150, 120)));
        b.handle_input(&InputEvent::PointerMotion(Point::new(500, 500)));
        b.handle_input(&InputEvent::PointerUp(Point::new(150, 120)));
        assert!(run(&mut b, 20).is_empty());
    }

    #[test]
    fn pad_press_and_release() {
        let mut b = scale_button();
        assert!(!b.handle_input(&InputEvent::ButtonDown(PadButton::B)));
        assert!(b.handle_input(&InputEvent::ButtonDown(PadButton::A)));
        // Held: the animation parks at full size and does not fire.
        assert!(run(&mut b, 10).is_empty());
        assert_eq!(b.phase(), Phase::Inflated);
        assert_eq!(b.rect(), b.bounds().scaled(1.1));
        b.handle_input(&InputEvent::ButtonUp(PadButton::A));
        assert_eq!(run(&mut b, 10), vec![Go]);
    }

    #[test]
    fn idle_update_is_noop() {
        let mut b = scale_button();
        assert_eq!(b.update(), None);
        assert_eq!(b.phase(), Phase::Idle);
        assert_eq!(b.rect(), b.bounds());
    }

    #[test]
    fn disabled_ignores_input() {
        let mut b = scale_button();
        b.set_enabled(false);
        assert!(!b.handle_input(&InputEvent::PointerDown(Point::new(150, 120))));
        assert!(!b.handle_input(&InputEvent::ButtonDown(PadButton::A)));
        assert!(run(&mut b, 10).is_empty());
    }

    #[test]
    fn grow_stays_on_screen_and_reverts() {
        let screen = Rect::new(0, 0, 400, 300);
        let mut b = Button::new(
            Rect::new(0, 250, 50, 50),
            ButtonVisual::Solid(Rgba::GRAY),
            Animation::Grow {
                max_expansion: 10,
                screen,
            },
            2,
            Go,
        );
        b.handle_input(&InputEvent::PointerDown(Point::new(10, 260)));
        b.update();
        b.update();
        assert_eq!(b.rect(), Rect::new(0, 240, 60, 60));
        b.handle_input(&InputEvent::PointerUp(Point::new(10, 260)));
        assert_eq!(run(&mut b, 5), vec![Go]);
        assert_eq!(b.rect(), b.bounds());
    }

    #[derive(Default)]
    struct Recorder(Vec<&'static str>);

    impl ButtonHooks for Recorder {
        fn on_start(&mut self) {
            self.0.push("start");
        }
        fn on_release(&mut self) {
            self.0.push("release");
        }
    }

    #[test]
    fn hooks_fire_in_order() {
        let mut b = scale_button();
        let mut rec = Recorder::default();
        b.handle_input(&InputEvent::ButtonDown(PadButton::A));
        b.handle_input(&InputEvent::ButtonUp(PadButton::A));
        for _ in 0..10 {
            b.update_with(&mut rec);
        }
        assert_eq!(rec.0, vec!["start", "release"]);
    }

    #[test]
    fn solid_button_outlined_while_pressed() {
        let mut b = scale_button();
        let mut frame = Frame::new();
        b.compose(&mut frame);
        assert_eq!(frame.commands().len(), 1);
        b.handle_input(&InputEvent::ButtonDown(PadButton::A));
        b.update();
        let mut frame = Frame::new();
        b.compose(&mut frame);
        assert!(
            frame
                .commands()
                .iter()
                .any(|c| matches!(c, DrawCommand::OutlineRect { .. }))
        );
    }
}
