//! Error types for frame stacking.

use thiserror::Error;

use crate::frame::FrameSize;

/// Errors that can occur while merging a frame sequence.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StackError {
    #[error("No frames provided for stacking")]
    NoFrames,

    #[error("Size mismatch for frame {index}: expected {expected}, got {actual}")]
    SizeMismatch {
        index: usize,
        expected: FrameSize,
        actual: FrameSize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_frames_message() {
        assert_eq!(
            StackError::NoFrames.to_string(),
            "No frames provided for stacking"
        );
    }

    #[test]
    fn test_size_mismatch_message() {
        let err = StackError::SizeMismatch {
            index: 2,
            expected: FrameSize::new(100, 100),
            actual: FrameSize::new(100, 80),
        };
        assert_eq!(
            err.to_string(),
            "Size mismatch for frame 2: expected 100x100, got 100x80"
        );
    }
}
