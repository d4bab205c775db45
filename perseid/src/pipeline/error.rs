//! Error taxonomy of a detection run.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::frame::FrameLoadError;
use crate::stacking::StackError;

/// Failures that abort a detection run.
///
/// Empty input and zero detections are not failures; they surface as the
/// `NoFrames` / `NoLines` outcomes instead, so a caller can render "nothing
/// found" rather than "something broke".
#[derive(Debug, Error)]
pub enum DetectionError {
    #[error("Failed to load frames: {0}")]
    Load(#[from] FrameLoadError),

    #[error("Failed to stack frames: {0}")]
    Stack(#[from] StackError),

    #[error("Failed to create output directory '{path}': {source}")]
    CreateOutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to save image '{path}': {source}")]
    SaveImage {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameSize;

    #[test]
    fn test_stack_error_conversion_and_message() {
        let err: DetectionError = StackError::SizeMismatch {
            index: 1,
            expected: FrameSize::new(10, 10),
            actual: FrameSize::new(8, 10),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Failed to stack frames: Size mismatch for frame 1: expected 10x10, got 8x10"
        );
    }

    #[test]
    fn test_create_output_dir_message() {
        let err = DetectionError::CreateOutputDir {
            path: PathBuf::from("/readonly/out"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        };
        assert_eq!(
            err.to_string(),
            "Failed to create output directory '/readonly/out': permission denied"
        );
    }
}
