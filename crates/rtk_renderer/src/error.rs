//! Error types for rendering and image export.

use thiserror::Error;

/// Reasons a render pass could not run or finish.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("no scene attached to the renderer")]
    NoScene,

    #[error("scene has no world geometry")]
    NoWorld,

    #[error("scene has no lights")]
    NoLights,

    #[error("failed to spawn render thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("render worker {thread} panicked")]
    WorkerPanicked { thread: String },
}

pub type Result<T> = std::result::Result<T, RenderError>;

/// Errors that can occur while exporting the framebuffer.
#[derive(Error, Debug)]
pub enum BitmapError {
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("buffer holds {actual} values, {width}x{height} needs {expected}")]
    SizeMismatch {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },

    #[error("{width}x{height} does not fit a bitmap header")]
    TooLarge { width: usize, height: usize },
}
