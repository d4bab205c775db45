//! Perseid - linear streak detection for astronomical image stacks.
//!
//! Detects candidate asteroid/comet trajectories across a time-ordered
//! sequence of grayscale frames:
//! - Per-frame denoising and background suppression
//! - Max-intensity stacking of the sequence
//! - Gradient-based line segment detection on the merged raster
//! - False-positive filtering and annotated output
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use perseid::{run_detection, DetectionConfig, DetectionOutcome};
//!
//! let config = DetectionConfig::default();
//! match run_detection("captures/2026-08-12".as_ref(), &config)? {
//!     DetectionOutcome::Success(report) => {
//!         println!("{} trajectories -> {}", report.segments.len(), report.annotated_path.display());
//!     }
//!     DetectionOutcome::NoFrames => println!("no frames found"),
//!     DetectionOutcome::NoLines => println!("no lines detected"),
//! }
//! ```

mod annotate;
pub(crate) mod common;
mod config;
mod frame;
mod output;
mod pipeline;
mod preprocess;
mod stacking;
mod streak_detection;

#[cfg(test)]
pub mod testing;

pub mod prelude;

// ============================================================================
// Core raster types
// ============================================================================

pub use annotate::RgbRaster;
pub use frame::{
    frame_paths_in_dir, load_frames_from_dir, Frame, FrameLoadError, FrameSize, RASTER_EXTENSIONS,
};

// ============================================================================
// Configuration
// ============================================================================

pub use config::DetectionConfig;

// ============================================================================
// Pipeline stages (for custom pipelines)
// ============================================================================

pub use annotate::{annotate, draw_segment};
pub use preprocess::{bilateral_filter, median_background, preprocess_frame, preprocess_frames};
pub use stacking::{stack_max, StackError};
pub use streak_detection::{
    validate_segments, LineSegment, StreakDetectionResult, StreakDetector, StreakDiagnostics,
    ValidationStats,
};

// ============================================================================
// Output
// ============================================================================

pub use output::{
    ensure_output_dir, merged_path, result_path, save_grayscale, save_rgb, OutputFormat,
    MERGED_FILE_STEM, RESULT_FILE_STEM,
};

// ============================================================================
// Pipeline entry points
// ============================================================================

pub use pipeline::{
    run_detection, run_detection_with_progress, DetectionDiagnostics, DetectionError,
    DetectionOutcome, DetectionProgress, DetectionReport, DetectionStage, DetectionWorker,
    ProgressCallback, WorkerMessage,
};
