use std::path::{Path, PathBuf};

use crate::geometry::Point;

/// Which half of a screenshot pair a file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// The television output.
    Tv,
    /// The handheld (gamepad) screen.
    Drc,
}

impl Variant {
    pub const fn other(self) -> Self {
        match self {
            Self::Tv => Self::Drc,
            Self::Drc => Self::Tv,
        }
    }

    /// Filename marker that precedes the extension, e.g. `_TV` in `shot_TV.png`.
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Tv => "_TV",
            Self::Drc => "_DRC",
        }
    }
}

/// One grid cell: up to two screenshots taken at the same moment.
#[derive(Debug, Clone)]
pub struct ImagePairEntry {
    tv: Option<PathBuf>,
    drc: Option<PathBuf>,
    /// Layout position, before the header and scroll offsets are applied.
    pub position: Point,
    pub selected: bool,
}

impl ImagePairEntry {
    /// Returns `None` when both halves are missing.
    pub fn new(tv: Option<PathBuf>, drc: Option<PathBuf>) -> Option<Self> {
        if tv.is_none() && drc.is_none() {
            return None;
        }
        Some(Self {
            tv,
            drc,
            position: Point::default(),
            selected: false,
        })
    }

    pub fn tv(&self) -> Option<&Path> {
        self.tv.as_deref()
    }

    pub fn drc(&self) -> Option<&Path> {
        self.drc.as_deref()
    }

    pub fn path(&self, variant: Variant) -> Option<&Path> {
        match variant {
            Variant::Tv => self.tv(),
            Variant::Drc => self.drc(),
        }
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.tv().into_iter().chain(self.drc())
    }

    pub const fn is_pair(&self) -> bool {
        self.tv.is_some() && self.drc.is_some()
    }
}

impl PartialEq for ImagePairEntry {
    fn eq(&self, other: &Self) -> bool {
        self.tv == other.tv && self.drc == other.drc
    }
}

impl Eq for ImagePairEntry {}
