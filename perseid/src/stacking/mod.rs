//! Max-intensity stacking of a preprocessed frame sequence.
//!
//! A moving object occupies a different pixel in every frame while the
//! suppressed static background stays dim everywhere, so the per-pixel
//! maximum across the sequence renders the full trajectory as one bright
//! streak. Averaging would dilute a transient toward the background level;
//! the maximum preserves each frame's peak contribution.

mod error;

pub use error::StackError;

use crate::common::parallel::parallel_fill;
use crate::frame::Frame;

/// Merge a sequence into one raster via the per-pixel maximum.
///
/// All frames must share the dimensions of the first; a mismatch is fatal to
/// the run and never silently cropped. A singleton sequence stacks to itself.
///
/// The maximum is commutative and associative, so the chunked parallel
/// reduction yields the same raster for any frame order.
pub fn stack_max(frames: &[Frame]) -> Result<Frame, StackError> {
    let first = frames.first().ok_or(StackError::NoFrames)?;
    let expected = first.size();

    for (index, frame) in frames.iter().enumerate() {
        if frame.size() != expected {
            return Err(StackError::SizeMismatch {
                index,
                expected,
                actual: frame.size(),
            });
        }
    }

    if frames.len() == 1 {
        return Ok(first.clone());
    }

    let mut pixels = vec![0u8; expected.pixel_count()];
    parallel_fill(&mut pixels, |i| {
        frames.iter().map(|frame| frame.pixels()[i]).fold(0, u8::max)
    });

    Ok(Frame::new(expected, pixels))
}
