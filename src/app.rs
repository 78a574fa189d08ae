//! All UI state of the album, independent of the window and GPU.
//!
//! The viewer task feeds [`InputEvent`]s in, calls [`AlbumApp::update`] once
//! per frame, asks for a [`Frame`] via [`AlbumApp::compose`] and services the
//! [`AppRequest`]s it drains afterwards.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::album::{Album, GridLayout, ImagePairEntry, Variant};
use crate::assets::Asset;
use crate::config::{CancelBehavior, Configuration, Theme};
use crate::dialog::{ConfirmDialog, DELETE_PROMPT, DialogChoice};
use crate::effects::{ParticleField, PointerTrail};
use crate::error::Result;
use crate::events::{AppRequest, InputEvent, PadButton};
use crate::geometry::{Flip, Point, Rect, Rgba};
use crate::navigation::{Activation, Direction, MenuState, Navigator, SelectOutcome};
use crate::scene::{Anchor, Frame, TextureKey};
use crate::single_view::SingleImageView;
use crate::widgets::{Animation, Button, ButtonVisual};

const HEADER_CAPTION: &str = "Album";
const EMPTY_MESSAGE: &str = "No images found";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HudCommand {
    Back,
    SelectOrDelete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Background scan still running; `found` entries so far.
    Scanning { found: usize },
    Ready,
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    origin: Point,
    last: Point,
    pressed_cell: Option<usize>,
    scrolling: bool,
}

pub struct AlbumApp {
    screen: Rect,
    theme: Theme,
    cancel_behavior: CancelBehavior,
    drag_threshold: i32,
    phase: Phase,
    album: Album,
    nav: Navigator,
    back_button: Button<HudCommand>,
    select_button: Button<HudCommand>,
    single: SingleImageView,
    dialog: ConfirmDialog,
    particles: ParticleField,
    trail: PointerTrail,
    rng: StdRng,
    drag: Option<Drag>,
    focus_visible: bool,
    requests: Vec<AppRequest>,
}

impl AlbumApp {
    pub fn new(cfg: &Configuration) -> Result<Self> {
        let theme = cfg.theme.resolve()?;
        let (w, h) = (cfg.screen_width(), cfg.screen_height());
        let screen = Rect::new(0, 0, w, h);
        let animation = Animation::from_config(&cfg.button, screen);

        let back_button = Button::new(
            Rect::new(0, h - 137, 185, 137),
            ButtonVisual::Texture {
                key: TextureKey::Asset(Asset::CornerButton),
                flip: Flip::NONE,
                tint: Rgba::WHITE,
            },
            animation,
            cfg.button.steps,
            HudCommand::Back,
        )
        .with_pad(PadButton::B);
        let select_button = Button::new(
            Rect::new(w - 470, 0, 470, 160),
            ButtonVisual::Texture {
                key: TextureKey::Asset(Asset::LargeCornerButton),
                flip: Flip::BOTH,
                tint: Rgba::WHITE,
            },
            animation,
            cfg.button.steps,
            HudCommand::SelectOrDelete,
        )
        .with_pad(PadButton::X)
        .with_label("Select", Rgba::WHITE, 56.0);

        let rng = match cfg.particles.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Ok(Self {
            screen,
            theme,
            cancel_behavior: cfg.cancel_behavior,
            drag_threshold: cfg.drag_threshold,
            phase: if cfg.background_scan {
                Phase::Scanning { found: 0 }
            } else {
                Phase::Ready
            },
            album: Album::new(GridLayout::from_config(cfg)),
            nav: Navigator::new(),
            back_button,
            select_button,
            single: SingleImageView::new(cfg),
            dialog: ConfirmDialog::new(cfg, DELETE_PROMPT),
            particles: ParticleField::new(screen, cfg.particles.spawn_chance),
            trail: PointerTrail::new(cfg.trail_length, theme.trail),
            rng,
            drag: None,
            focus_visible: true,
            requests: Vec::new(),
        })
    }

    pub const fn phase(&self) -> Phase {
        self.phase
    }

    pub const fn album(&self) -> &Album {
        &self.album
    }

    pub const fn navigator(&self) -> &Navigator {
        &self.nav
    }

    pub const fn menu_state(&self) -> MenuState {
        self.nav.state()
    }

    pub const fn single_view(&self) -> &SingleImageView {
        &self.single
    }

    pub const fn dialog_open(&self) -> bool {
        self.dialog.is_open()
    }

    pub fn set_scan_progress(&mut self, found: usize) {
        if let Phase::Scanning { .. } = self.phase {
            self.phase = Phase::Scanning { found };
        }
    }

    /// Install the scanned collection and leave the scanning phase.
    pub fn finish_scan(&mut self, entries: Vec<ImagePairEntry>) {
        info!(count = entries.len(), "album ready");
        self.album.replace(entries);
        self.nav.reset();
        self.single.close();
        self.phase = Phase::Ready;
    }

    /// Hand pending texture work to the host.
    pub fn drain_requests(&mut self) -> Vec<AppRequest> {
        std::mem::take(&mut self.requests)
    }

    pub fn handle_input(&mut self, event: &InputEvent) {
        if let InputEvent::ButtonDown(_) = event {
            self.focus_visible = true;
        }
        if self.dialog.handle_input(event) {
            return;
        }
        if self.back_button.handle_input(event) {
            return;
        }
        let viewing = self.nav.state() == MenuState::ViewingSingle;
        if !viewing && self.select_button.handle_input(event) {
            return;
        }
        if viewing {
            self.single.handle_input(event);
            return;
        }
        if self.phase != Phase::Ready {
            return;
        }
        match *event {
            InputEvent::ButtonDown(button) => self.grid_button(button),
            InputEvent::PointerDown(p) => self.pointer_down(p),
            InputEvent::PointerMotion(p) => self.pointer_motion(p),
            InputEvent::PointerUp(p) => self.pointer_up(p),
            InputEvent::ButtonUp(_) => {}
        }
    }

    fn grid_button(&mut self, button: PadButton) {
        let dir = match button {
            PadButton::DPadUp => Direction::Up,
            PadButton::DPadDown => Direction::Down,
            PadButton::DPadLeft => Direction::Left,
            PadButton::DPadRight => Direction::Right,
            PadButton::A => {
                self.activate();
                return;
            }
            _ => return,
        };
        self.nav.move_cursor(dir, &self.album);
    }

    fn pointer_down(&mut self, p: Point) {
        let layout = *self.album.layout();
        let hit = layout.hit_test(p, self.nav.scroll(), self.album.len());
        if let Some(index) = hit {
            self.nav.focus(index, &self.album);
        }
        self.drag = Some(Drag {
            origin: p,
            last: p,
            pressed_cell: hit,
            scrolling: false,
        });
    }

    fn pointer_motion(&mut self, p: Point) {
        let Some(mut drag) = self.drag else {
            return;
        };
        if !drag.scrolling && (p.y - drag.origin.y).abs() > self.drag_threshold {
            drag.scrolling = true;
            self.focus_visible = false;
            debug!("drag scroll started");
        }
        if drag.scrolling {
            self.nav.scroll_by(p.y - drag.last.y, &self.album);
            self.trail.push(p);
        }
        drag.last = p;
        self.drag = Some(drag);
    }

    fn pointer_up(&mut self, p: Point) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        self.trail.clear();
        if drag.scrolling {
            return;
        }
        let layout = *self.album.layout();
        let hit = layout.hit_test(p, self.nav.scroll(), self.album.len());
        if hit.is_some() && hit == drag.pressed_cell && hit == Some(self.nav.cursor()) {
            self.activate();
        }
    }

    fn activate(&mut self) {
        match self.nav.activate(&mut self.album) {
            Activation::OpenSingle(index) => self.open_single(index),
            Activation::Toggled(index) => debug!(index, "selection toggled"),
            Activation::Ignored => {}
        }
    }

    fn open_single(&mut self, index: usize) {
        self.single.open(index);
        if let Some(entry) = self.album.get(index) {
            for path in entry.paths() {
                self.requests.push(AppRequest::LoadFull(path.to_path_buf()));
            }
        }
    }

    fn close_single(&mut self) {
        if let Some(entry) = self.single.index().and_then(|i| self.album.get(i)) {
            self.requests
                .extend(entry.paths().map(|p| AppRequest::UnloadFull(p.to_path_buf())));
        }
        self.nav.close_single();
        self.single.close();
    }

    /// Advance every animation one frame and act on finished clicks.
    pub fn update(&mut self) {
        self.particles.update(&mut self.rng);

        if let Some(choice) = self.dialog.update() {
            self.on_dialog(choice);
        }
        if let Some(cmd) = self.back_button.update() {
            self.on_hud(cmd);
        }
        if let Some(cmd) = self.select_button.update() {
            self.on_hud(cmd);
        }
        if self.nav.state() == MenuState::ViewingSingle {
            self.single.update();
        }
        self.sync_select_button();
    }

    fn on_hud(&mut self, cmd: HudCommand) {
        match cmd {
            HudCommand::Back if self.nav.state() == MenuState::ViewingSingle => {
                self.close_single();
            }
            HudCommand::Back => {
                self.nav.back(&mut self.album);
            }
            HudCommand::SelectOrDelete => match self.nav.select_action(&self.album) {
                SelectOutcome::ConfirmDelete => self.dialog.open(),
                SelectOutcome::EnteredSelection | SelectOutcome::Ignored => {}
            },
        }
    }

    fn on_dialog(&mut self, choice: DialogChoice) {
        match choice {
            DialogChoice::Confirm => {
                let released = self.album.delete_selected();
                self.requests
                    .extend(released.into_iter().map(AppRequest::Release));
                self.nav.after_delete(&self.album);
            }
            DialogChoice::Cancel => {
                self.nav.cancel_delete(self.cancel_behavior, &mut self.album);
            }
        }
    }

    fn sync_select_button(&mut self) {
        let deleting = self.nav.state() == MenuState::SelectingForDelete;
        let (label, tint) = if deleting {
            ("Delete", self.theme.delete_tint)
        } else {
            ("Select", Rgba::WHITE)
        };
        if self.select_button.label() != Some(label) {
            self.select_button.set_label(label);
            self.select_button.set_visual(ButtonVisual::Texture {
                key: TextureKey::Asset(Asset::LargeCornerButton),
                flip: Flip::BOTH,
                tint,
            });
        }
    }

    pub fn compose(&self, frame: &mut Frame) {
        frame.reset();
        frame.texture(TextureKey::Asset(Asset::Backdrop), self.screen);
        self.particles.compose(frame);

        if self.nav.state() == MenuState::ViewingSingle {
            if let Some(entry) = self.single.index().and_then(|i| self.album.get(i)) {
                self.single.compose(entry, frame);
            }
        } else {
            self.compose_grid(frame);
            self.compose_header(frame);
            self.select_button.compose(frame);
        }

        self.back_button.compose(frame);
        let b = self.back_button.bounds();
        frame.texture(
            TextureKey::Asset(Asset::BackGraphic),
            Rect::new(b.x, self.screen.bottom() - 128, 128, 128),
        );

        self.dialog.compose(frame);

        if self.drag.is_some_and(|d| d.scrolling) {
            self.trail.compose(frame);
        }
    }

    fn compose_header(&self, frame: &mut Frame) {
        let layout = self.album.layout();
        let header = Rect::new(0, 0, self.screen.w, layout.header_height);
        frame.textured(
            TextureKey::Asset(Asset::Header),
            header,
            Flip::NONE,
            self.theme.header_tint,
        );
        frame.text(
            HEADER_CAPTION,
            Point::new(header.w / 4, header.h / 2),
            96.0,
            Rgba::WHITE,
            Anchor::Center,
        );
    }

    fn compose_grid(&self, frame: &mut Frame) {
        let layout = self.album.layout();
        let scroll = self.nav.scroll();
        let top = layout.header_height;
        let bottom = self.screen.bottom();

        match self.phase {
            Phase::Scanning { found } => {
                for i in 0..found {
                    let cell = layout.cell_rect(layout.position_for(i), 0);
                    if cell.intersects_rows(top, bottom) {
                        frame.texture(TextureKey::Placeholder, cell);
                    }
                }
                return;
            }
            Phase::Ready if self.album.is_empty() => {
                let c = Rect::new(0, top, self.screen.w, bottom - top).center();
                frame.text(EMPTY_MESSAGE, c, 64.0, Rgba::WHITE, Anchor::Center);
                return;
            }
            Phase::Ready => {}
        }

        let selecting = self.nav.state() == MenuState::SelectingForDelete;
        for (i, entry) in self.album.entries().iter().enumerate() {
            let cell = layout.cell_rect(entry.position, scroll);
            let inset = layout.inset_rect(entry.position, scroll);
            if !cell.intersects_rows(top, bottom) && !inset.intersects_rows(top, bottom) {
                continue;
            }
            let tint = if entry.selected {
                self.theme.selected_tint
            } else {
                Rgba::WHITE
            };
            for (variant, dst) in [(Variant::Tv, cell), (Variant::Drc, inset)] {
                let key = entry
                    .path(variant)
                    .map_or(TextureKey::Black, |p| TextureKey::Thumb(p.to_path_buf()));
                frame.textured(key, dst, Flip::NONE, tint);
            }
            if selecting {
                compose_orb(frame, Point::new(cell.x - 10, cell.y - 10), entry.selected);
            }
            if self.focus_visible && i == self.nav.cursor() {
                compose_focus(frame, cell, self.theme.highlight);
            }
        }
    }
}

fn compose_orb(frame: &mut Frame, at: Point, selected: bool) {
    let orb = Rect::new(at.x, at.y, 60, 60);
    let tint = if selected { Rgba::DARK_RED } else { Rgba::WHITE };
    frame.textured(TextureKey::Asset(Asset::Orb), orb, Flip::NONE, tint);
    if selected {
        let pad = 16;
        frame.line(
            Point::new(orb.x + pad, orb.y + pad),
            Point::new(orb.right() - pad, orb.bottom() - pad),
            6.0,
            Rgba::WHITE,
        );
        frame.line(
            Point::new(orb.right() - pad, orb.y + pad),
            Point::new(orb.x + pad, orb.bottom() - pad),
            6.0,
            Rgba::WHITE,
        );
    }
}

/// Yellow frame around the focused cell, tall enough to wrap the inset.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn compose_focus(frame: &mut Frame, cell: Rect, color: Rgba) {
    let w = cell.w as f32;
    let h = cell.h as f32;
    let rect = Rect::new(
        cell.x - (w * 0.05) as i32,
        cell.y - (h * 0.05) as i32,
        (w * 1.1) as i32,
        (h * 1.5) as i32,
    );
    frame.outline_rect(rect, 7.0, color);
}
