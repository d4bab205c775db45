//! Error types for frame loading.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading a frame from disk.
#[derive(Debug, Error)]
pub enum FrameLoadError {
    #[error("Failed to read frame '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to decode frame '{path}': {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Unsupported raster format '.{extension}'")]
    UnsupportedFormat { extension: String },
}
