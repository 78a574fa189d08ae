//! Integer screen geometry shared by layout, widgets and the draw list.

use std::str::FromStr;

use palette::{Srgb, Srgba};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in logical screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub const fn right(&self) -> i32 {
        self.x + self.w
    }

    pub const fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub const fn center(&self) -> Point {
        Point::new(self.x + self.w / 2, self.y + self.h / 2)
    }

    /// Half-open hit test: the right and bottom edges are outside.
    pub const fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.w && p.y >= self.y && p.y < self.y + self.h
    }

    /// Closed hit test used for grid cells, where touching an edge counts.
    pub const fn contains_inclusive(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.w && p.y >= self.y && p.y <= self.y + self.h
    }

    pub const fn intersects_rows(&self, top: i32, bottom: i32) -> bool {
        self.bottom() >= top && self.y <= bottom
    }

    /// Scale around the centre, keeping the result centred on the same point.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn scaled(&self, factor: f32) -> Self {
        let w = (self.w as f32 * factor) as i32;
        let h = (self.h as f32 * factor) as i32;
        Self::new(self.x + (self.w - w) / 2, self.y + (self.h - h) / 2, w, h)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Flip {
    pub horizontal: bool,
    pub vertical: bool,
}

impl Flip {
    pub const NONE: Self = Self {
        horizontal: false,
        vertical: false,
    };
    pub const HORIZONTAL: Self = Self {
        horizontal: true,
        vertical: false,
    };
    pub const BOTH: Self = Self {
        horizontal: true,
        vertical: true,
    };
}

/// 8-bit sRGBA colour, the unit the draw list speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Self = Self::rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK: Self = Self::rgb(0x00, 0x00, 0x00);
    pub const YELLOW: Self = Self::rgb(0xFF, 0xFF, 0x00);
    pub const DARK_RED: Self = Self::rgb(0x7F, 0x00, 0x00);
    pub const GRAY: Self = Self::rgb(0x6A, 0x6A, 0x6A);
    pub const RED: Self = Self::rgb(0xFF, 0x00, 0x00);
    pub const GREEN: Self = Self::rgb(0x00, 0xFF, 0x00);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xFF }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Parse `#rrggbb` or `#rrggbbaa`.
    pub fn parse_hex(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }
        if trimmed.len() > 7 {
            if let Ok(c) = Srgba::<u8>::from_str(trimmed) {
                return Some(Self::rgba(c.red, c.green, c.blue, c.alpha));
            }
        }
        let c = Srgb::<u8>::from_str(trimmed).ok()?;
        Some(Self::rgb(c.red, c.green, c.blue))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_half_open() {
        let r = Rect::new(10, 10, 5, 5);
        assert!(r.contains(Point::new(10, 10)));
        assert!(r.contains(Point::new(14, 14)));
        assert!(!r.contains(Point::new(15, 14)));
        assert!(r.contains_inclusive(Point::new(15, 15)));
    }

    #[test]
    fn scaled_stays_centred() {
        let r = Rect::new(0, 0, 100, 50);
        let s = r.scaled(1.1);
        assert_eq!(s, Rect::new(-5, -2, 110, 55));
        assert_eq!(r.scaled(1.0), r);
    }

    #[test]
    fn parse_hex_colours() {
        assert_eq!(Rgba::parse_hex("#ffff00"), Some(Rgba::YELLOW));
        assert_eq!(
            Rgba::parse_hex("#90ee9064"),
            Some(Rgba::rgba(0x90, 0xEE, 0x90, 0x64))
        );
        assert_eq!(Rgba::parse_hex("nope"), None);
        assert_eq!(Rgba::parse_hex(""), None);
    }
}
