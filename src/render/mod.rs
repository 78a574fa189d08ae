//! GPU backend for the draw list.

pub mod batch;
pub mod gpu;
pub mod text;
pub mod textures;

pub use gpu::Renderer;
