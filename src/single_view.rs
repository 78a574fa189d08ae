//! Fullscreen view of one pair with a sliding switch between its halves.

use crate::album::{ImagePairEntry, Variant};
use crate::assets::Asset;
use crate::config::Configuration;
use crate::events::{InputEvent, PadButton};
use crate::geometry::{Flip, Rect, Rgba};
use crate::scene::{Frame, TextureKey};
use crate::widgets::{Animation, Button, ButtonVisual};

const ARROW_SIZE: i32 = 290;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowCommand {
    Toggle,
}

#[derive(Debug)]
pub struct SingleImageView {
    screen_width: i32,
    screen_height: i32,
    steps: u32,
    variant: Variant,
    /// 0 when at rest, otherwise the next transition move (1..=steps).
    step: u32,
    tv_x: i32,
    drc_x: i32,
    index: Option<usize>,
    arrow: Button<ArrowCommand>,
}

impl SingleImageView {
    pub fn new(cfg: &Configuration) -> Self {
        let (w, h) = (cfg.screen_width(), cfg.screen_height());
        let screen = Rect::new(0, 0, w, h);
        let arrow = Button::new(
            Rect::default(),
            ButtonVisual::Texture {
                key: TextureKey::Asset(Asset::Arrow),
                flip: Flip::NONE,
                tint: Rgba::WHITE,
            },
            Animation::from_config(&cfg.button, screen),
            cfg.button.steps,
            ArrowCommand::Toggle,
        );
        let mut view = Self {
            screen_width: w,
            screen_height: h,
            steps: cfg.transition_steps.max(1),
            variant: Variant::Tv,
            step: 0,
            tv_x: 0,
            drc_x: w,
            index: None,
            arrow,
        };
        view.rest();
        view
    }

    pub const fn variant(&self) -> Variant {
        self.variant
    }

    pub const fn index(&self) -> Option<usize> {
        self.index
    }

    pub const fn is_transitioning(&self) -> bool {
        self.step != 0
    }

    pub const fn positions(&self) -> (i32, i32) {
        (self.tv_x, self.drc_x)
    }

    pub const fn arrow(&self) -> &Button<ArrowCommand> {
        &self.arrow
    }

    /// Show entry `index`, TV half first.
    pub fn open(&mut self, index: usize) {
        self.index = Some(index);
        self.variant = Variant::Tv;
        self.rest();
    }

    pub fn close(&mut self) {
        self.index = None;
        self.variant = Variant::Tv;
        self.rest();
    }

    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        self.arrow.handle_input(event)
    }

    /// Per-frame tick: slide if moving, otherwise let the arrow animate.
    pub fn update(&mut self) {
        if self.is_transitioning() {
            self.advance();
        } else if let Some(ArrowCommand::Toggle) = self.arrow.update() {
            self.toggle();
        }
    }

    /// Switch to the other half and start the slide.
    pub fn toggle(&mut self) {
        if self.is_transitioning() {
            return;
        }
        self.variant = self.variant.other();
        self.step = 1;
        self.arrow.set_enabled(false);
    }

    /// One slide move. After `steps` moves the layout snaps to rest.
    pub fn advance(&mut self) {
        if !self.is_transitioning() {
            return;
        }
        #[allow(clippy::cast_possible_wrap)]
        let dx = self.screen_width / self.steps as i32;
        let dx = match self.variant {
            Variant::Drc => -dx,
            Variant::Tv => dx,
        };
        self.tv_x += dx;
        self.drc_x += dx;
        if self.step >= self.steps {
            self.rest();
        } else {
            self.step += 1;
        }
    }

    fn rest(&mut self) {
        let w = self.screen_width;
        let y = self.screen_height / 2 - ARROW_SIZE / 2;
        self.step = 0;
        match self.variant {
            Variant::Tv => {
                self.tv_x = 0;
                self.drc_x = w;
                self.arrow
                    .set_rect(Rect::new(w - w / 3 / 2, y, ARROW_SIZE, ARROW_SIZE));
                self.arrow.set_pad(Some(PadButton::DPadRight));
                self.set_arrow_flip(Flip::NONE);
            }
            Variant::Drc => {
                self.tv_x = -w;
                self.drc_x = 0;
                self.arrow.set_rect(Rect::new(0, y, ARROW_SIZE, ARROW_SIZE));
                self.arrow.set_pad(Some(PadButton::DPadLeft));
                self.set_arrow_flip(Flip::HORIZONTAL);
            }
        }
        self.arrow.set_enabled(true);
    }

    fn set_arrow_flip(&mut self, flip: Flip) {
        self.arrow.set_visual(ButtonVisual::Texture {
            key: TextureKey::Asset(Asset::Arrow),
            flip,
            tint: Rgba::WHITE,
        });
    }

    pub fn compose(&self, entry: &ImagePairEntry, frame: &mut Frame) {
        let (w, h) = (self.screen_width, self.screen_height);
        for (variant, x) in [(Variant::Tv, self.tv_x), (Variant::Drc, self.drc_x)] {
            let key = entry
                .path(variant)
                .map_or(TextureKey::Black, |p| TextureKey::Full(p.to_path_buf()));
            frame.texture(key, Rect::new(x, 0, w, h));
        }
        if !self.is_transitioning() {
            self.arrow.compose(frame);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    fn view() -> SingleImageView {
        let mut view = SingleImageView::new(&Configuration::default());
        view.open(0);
        view
    }

    #[test]
    fn opens_on_tv_with_right_arrow() {
        let v = view();
        assert_eq!(v.variant(), Variant::Tv);
        assert_eq!(v.positions(), (0, 1920));
        assert_eq!(v.arrow().bounds(), Rect::new(1600, 395, 290, 290));
        assert!(v.arrow().is_enabled());
    }

    #[test]
    fn transition_reaches_rest_after_n_moves() {
        let mut v = view();
        v.toggle();
        assert!(v.is_transitioning());
        assert!(!v.arrow().is_enabled());
        for _ in 0..49 {
            v.advance();
        }
        assert!(v.is_transitioning());
        v.advance();
        assert!(!v.is_transitioning());
        assert_eq!(v.variant(), Variant::Drc);
        assert_eq!(v.positions(), (-1920, 0));
        assert!(v.arrow().is_enabled());
        assert_eq!(v.arrow().bounds(), Rect::new(0, 395, 290, 290));
    }

    #[test]
    fn slide_moves_by_width_over_steps() {
        let mut v = view();
        v.toggle();
        v.advance();
        assert_eq!(v.positions(), (-38, 1882));
    }

    #[test]
    fn arrow_click_toggles_back() {
        let mut v = view();
        v.toggle();
        for _ in 0..50 {
            v.advance();
        }
        v.handle_input(&InputEvent::ButtonDown(PadButton::DPadLeft));
        v.handle_input(&InputEvent::ButtonUp(PadButton::DPadLeft));
        for _ in 0..120 {
            v.update();
        }
        assert_eq!(v.variant(), Variant::Tv);
        assert_eq!(v.positions(), (0, 1920));
        // The old binding no longer applies.
        assert!(!v.handle_input(&InputEvent::ButtonDown(PadButton::DPadLeft)));
        assert!(!v.handle_input(&InputEvent::PointerDown(Point::new(10, 500))));
    }
}
