//! Per-frame denoising and background suppression.
//!
//! Each frame is processed independently:
//!
//! 1. **Bilateral smoothing** removes sensor noise while preserving edges.
//! 2. **Median background estimate** over a large window of the smoothed
//!    frame captures stars-free sky structure.
//! 3. **Saturating subtraction** of the background leaves transient features
//!    relatively brightened on a near-zero floor.
//!
//! The per-frame transform is pure and deterministic, so the batch variant is
//! a straightforward parallel map with output identical to a sequential loop.

mod bilateral;
mod median;

use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;

pub use bilateral::bilateral_filter;
pub use median::median_background;

use crate::config::DetectionConfig;
use crate::frame::Frame;
use crate::pipeline::progress::{report_progress, DetectionStage, ProgressCallback};

/// Denoise one frame and subtract its estimated background.
///
/// Output dimensions equal input dimensions. Subtraction saturates at zero;
/// a pixel darker than its own background estimate clamps rather than wraps.
pub fn preprocess_frame(frame: &Frame, config: &DetectionConfig) -> Frame {
    let smoothed = bilateral_filter(
        frame,
        config.denoise_radius,
        config.denoise_color_sigma,
        config.denoise_space_sigma,
    );
    let background = median_background(&smoothed, config.background_window);

    let pixels = smoothed
        .pixels()
        .iter()
        .zip(background.pixels())
        .map(|(&value, &floor)| value.saturating_sub(floor))
        .collect();

    Frame::new(frame.size(), pixels)
}

/// Preprocess a whole sequence as a parallel map over frames.
///
/// Frame order is preserved; the progress callback observes completion counts,
/// not ordering.
pub fn preprocess_frames(
    frames: &[Frame],
    config: &DetectionConfig,
    progress: &ProgressCallback,
) -> Vec<Frame> {
    let completed = AtomicUsize::new(0);
    frames
        .par_iter()
        .map(|frame| {
            let result = preprocess_frame(frame, config);
            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            report_progress(progress, DetectionStage::Preprocessing, done, frames.len());
            result
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::frame::FrameSize;
    use crate::testing::{frame_with_dots, solid_frame};

    fn no_smoothing_config() -> DetectionConfig {
        DetectionConfig {
            denoise_radius: 0,
            background_window: 5,
            ..Default::default()
        }
    }

    #[test]
    fn test_transient_survives_background_subtraction() {
        let frame = frame_with_dots(30, 30, &[(15, 15, 200)]);
        let preprocessed = preprocess_frame(&frame, &no_smoothing_config());
        assert_eq!(preprocessed.get(15, 15), 200);
        assert_eq!(preprocessed.get(0, 0), 0);
    }

    #[test]
    fn test_flat_background_suppressed_to_zero() {
        let frame = solid_frame(30, 30, 120);
        let preprocessed = preprocess_frame(&frame, &no_smoothing_config());
        assert!(preprocessed.pixels().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_subtraction_saturates_for_dark_pixels() {
        // A pixel darker than its own background estimate clamps to zero
        // instead of wrapping around.
        let mut pixels = vec![180u8; 30 * 30];
        pixels[15 * 30 + 15] = 5;
        let frame = Frame::new(FrameSize::new(30, 30), pixels);

        let preprocessed = preprocess_frame(&frame, &no_smoothing_config());
        assert_eq!(preprocessed.get(15, 15), 0);
    }

    #[test]
    fn test_parallel_map_matches_sequential() {
        let frames: Vec<Frame> = (0..6)
            .map(|i| frame_with_dots(20, 20, &[(i + 2, i + 2, 150)]))
            .collect();
        let config = no_smoothing_config();

        let parallel = preprocess_frames(&frames, &config, &None);
        let sequential: Vec<Frame> = frames
            .iter()
            .map(|f| preprocess_frame(f, &config))
            .collect();
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_progress_reports_every_frame() {
        let frames: Vec<Frame> = (0..4).map(|_| solid_frame(10, 10, 0)).collect();
        let calls = Arc::new(AtomicUsize::new(0));
        let callback: ProgressCallback = Some(Arc::new({
            let calls = Arc::clone(&calls);
            move |p| {
                assert_eq!(p.stage, DetectionStage::Preprocessing);
                assert_eq!(p.total, 4);
                calls.fetch_add(1, Ordering::Relaxed);
            }
        }));

        let _ = preprocess_frames(&frames, &no_smoothing_config(), &callback);
        assert_eq!(calls.load(Ordering::Relaxed), 4);
    }
}
