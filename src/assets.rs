//! Fixed UI textures shipped next to the binary.

use std::path::Path;

use image::RgbaImage;
use tracing::debug;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Asset {
    Arrow,
    Backdrop,
    CornerButton,
    LargeCornerButton,
    BackGraphic,
    Header,
    /// Also used for particles and the selection markers.
    Orb,
}

impl Asset {
    pub const ALL: [Self; 7] = [
        Self::Arrow,
        Self::Backdrop,
        Self::CornerButton,
        Self::LargeCornerButton,
        Self::BackGraphic,
        Self::Header,
        Self::Orb,
    ];

    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Arrow => "arrow_image.png",
            Self::Backdrop => "backdrop.png",
            Self::CornerButton => "corner-button.png",
            Self::LargeCornerButton => "large-corner-button.png",
            Self::BackGraphic => "back_graphic.png",
            Self::Header => "header.png",
            Self::Orb => "orb.png",
        }
    }
}

/// Decode every UI asset. Any failure is fatal for the caller.
pub fn load_all(dir: &Path) -> Result<Vec<(Asset, RgbaImage)>> {
    Asset::ALL
        .iter()
        .map(|&asset| {
            let path = dir.join(asset.file_name());
            let img = image::open(&path)
                .map_err(|source| Error::Asset {
                    path: path.clone(),
                    source,
                })?
                .to_rgba8();
            debug!(asset = ?asset, width = img.width(), height = img.height(), "asset loaded");
            Ok((asset, img))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_asset_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_all(dir.path()).unwrap_err();
        assert!(matches!(err, Error::Asset { .. }));
        assert!(err.to_string().contains("arrow_image.png"));
    }

    #[test]
    fn loads_all_when_present() {
        let dir = tempfile::tempdir().unwrap();
        for asset in Asset::ALL {
            RgbaImage::new(2, 2).save(dir.path().join(asset.file_name())).unwrap();
        }
        let loaded = load_all(dir.path()).unwrap();
        assert_eq!(loaded.len(), Asset::ALL.len());
    }
}
