use std::path::PathBuf;

use thiserror::Error;

/// Library error type for album operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A fixed UI asset could not be read or decoded; the UI cannot render without it.
    #[error("failed to load asset {path}: {source}")]
    Asset {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Configuration values parsed but are out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// YAML/serde configuration error.
    #[error(transparent)]
    Config(#[from] serde_yaml::Error),

    /// Background music could not be decoded or played.
    #[error("audio: {0}")]
    Audio(String),

    /// Underlying IO error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
