//! Frame loading and the core grayscale raster type.
//!
//! A [`Frame`] is one captured image of the observation sequence, reduced to
//! 8-bit luminance. The loader reads every recognized raster file in a
//! directory in lexicographic filename order, so a sequence is deterministic
//! and reproducible across runs.

pub mod error;

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

pub use error::FrameLoadError;

/// Raster file extensions recognized by the loader, matched case-insensitively.
pub const RASTER_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Width and height of a frame in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSize {
    pub width: usize,
    pub height: usize,
}

impl FrameSize {
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "frame dimensions must be nonzero");
        Self { width, height }
    }

    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }
}

impl std::fmt::Display for FrameSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A single-channel 8-bit raster. Immutable once loaded.
///
/// Pixels are stored row-major with origin at the top-left, x growing right
/// and y growing down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    size: FrameSize,
    pixels: Vec<u8>,
}

impl Frame {
    pub fn new(size: FrameSize, pixels: Vec<u8>) -> Self {
        assert_eq!(
            pixels.len(),
            size.pixel_count(),
            "pixels length must equal width * height"
        );
        Self { size, pixels }
    }

    /// Decode a raster file as 8-bit grayscale.
    ///
    /// Color inputs are reduced to luminance; EXIF and other metadata are
    /// ignored.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, FrameLoadError> {
        let path = path.as_ref();

        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();
        if !RASTER_EXTENSIONS.contains(&extension.as_str()) {
            return Err(FrameLoadError::UnsupportedFormat { extension });
        }

        let decoded = image::open(path).map_err(|err| match err {
            image::ImageError::IoError(source) => FrameLoadError::Io {
                path: path.to_path_buf(),
                source,
            },
            other => FrameLoadError::Decode {
                path: path.to_path_buf(),
                source: other,
            },
        })?;

        let gray = decoded.to_luma8();
        let size = FrameSize::new(gray.width() as usize, gray.height() as usize);
        Ok(Self::new(size, gray.into_raw()))
    }

    #[inline]
    pub fn size(&self) -> FrameSize {
        self.size
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.size.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.size.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        debug_assert!(x < self.size.width && y < self.size.height);
        self.pixels[y * self.size.width + x]
    }

    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

/// Paths of all recognized raster files in a directory, sorted
/// lexicographically.
///
/// A missing or unreadable directory yields an empty list; the pipeline maps
/// that to its `NoFrames` outcome.
pub fn frame_paths_in_dir(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|path| {
            if !path.is_file() {
                return false;
            }
            let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
            RASTER_EXTENSIONS.contains(&ext.to_lowercase().as_str())
        })
        .collect();

    paths.sort();
    paths
}

/// Decode every recognized raster in the directory, in filename order.
///
/// Decoding runs in parallel; the output preserves path order. Zero
/// qualifying files is not an error here.
pub fn load_frames_from_dir(dir: &Path) -> Result<Vec<Frame>, FrameLoadError> {
    frame_paths_in_dir(dir)
        .par_iter()
        .map(Frame::from_file)
        .collect()
}
