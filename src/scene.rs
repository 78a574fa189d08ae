//! Backend-neutral draw list built once per frame.

use std::path::PathBuf;

use crate::assets::Asset;
use crate::geometry::{Flip, Point, Rect, Rgba};

/// Identifies a GPU texture. Keys without an uploaded texture draw black.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TextureKey {
    Asset(Asset),
    Thumb(PathBuf),
    Full(PathBuf),
    /// Grey cell shown while the scan is still running.
    Placeholder,
    Black,
    White,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    TopLeft,
    Center,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Texture {
        key: TextureKey,
        dst: Rect,
        flip: Flip,
        tint: Rgba,
    },
    FillRect {
        rect: Rect,
        color: Rgba,
    },
    OutlineRect {
        rect: Rect,
        thickness: f32,
        color: Rgba,
    },
    Line {
        from: Point,
        to: Point,
        width: f32,
        color: Rgba,
    },
    Circle {
        center: Point,
        radius: f32,
        color: Rgba,
    },
    Text {
        text: String,
        at: Point,
        size: f32,
        color: Rgba,
        anchor: Anchor,
    },
}

#[derive(Debug, Clone)]
pub struct Frame {
    pub clear: Rgba,
    commands: Vec<DrawCommand>,
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

impl Frame {
    pub const fn new() -> Self {
        Self {
            clear: Rgba::BLACK,
            commands: Vec::new(),
        }
    }

    /// Empty the list for reuse, keeping its allocation.
    pub fn reset(&mut self) {
        self.clear = Rgba::BLACK;
        self.commands.clear();
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn push(&mut self, cmd: DrawCommand) {
        self.commands.push(cmd);
    }

    pub fn texture(&mut self, key: TextureKey, dst: Rect) {
        self.textured(key, dst, Flip::NONE, Rgba::WHITE);
    }

    pub fn textured(&mut self, key: TextureKey, dst: Rect, flip: Flip, tint: Rgba) {
        self.push(DrawCommand::Texture {
            key,
            dst,
            flip,
            tint,
        });
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        self.push(DrawCommand::FillRect { rect, color });
    }

    pub fn outline_rect(&mut self, rect: Rect, thickness: f32, color: Rgba) {
        self.push(DrawCommand::OutlineRect {
            rect,
            thickness,
            color,
        });
    }

    pub fn line(&mut self, from: Point, to: Point, width: f32, color: Rgba) {
        self.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
        });
    }

    pub fn circle(&mut self, center: Point, radius: f32, color: Rgba) {
        self.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    pub fn text(&mut self, text: impl Into<String>, at: Point, size: f32, color: Rgba, anchor: Anchor) {
        self.push(DrawCommand::Text {
            text: text.into(),
            at,
            size,
            color,
            anchor,
        });
    }

    /// Texts in draw order; handy for assertions.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}
