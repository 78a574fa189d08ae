//! Fullscreen album for paired TV / gamepad screenshots.
//!
//! Everything above [`render`] and [`tasks::viewer`] is plain state and can be
//! driven headless; the viewer owns the window, GPU and background workers.

pub mod album;
pub mod app;
pub mod assets;
pub mod audio;
pub mod config;
pub mod dialog;
pub mod effects;
pub mod error;
pub mod events;
pub mod geometry;
pub mod input;
pub mod navigation;
pub mod render;
pub mod scene;
pub mod single_view;
pub mod widgets;
pub mod tasks {
    pub mod loader;
    pub mod scan;
    pub mod viewer;
}

pub use error::{Error, Result};
