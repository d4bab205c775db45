//! The end-to-end detection pipeline.
//!
//! One run is strictly linear and batch-oriented:
//!
//! ```text
//! Idle -> Loaded -> Preprocessed -> Merged -> Detected -> Validated -> Annotated -> Saved
//!          \-> NoFrames                        \-> NoLines
//! ```
//!
//! No stage begins before its predecessor's output is fully materialized, and
//! no stage swallows an error or substitutes a default image. Rasters are
//! written only on the success path, after annotation. Validating every
//! segment away still succeeds (with an annotation containing no streaks);
//! the `NoLines` exit belongs to the detector, before validation.

mod error;
pub mod progress;
mod worker;

use std::path::{Path, PathBuf};
use std::time::Instant;

pub use error::DetectionError;
pub use progress::{DetectionProgress, DetectionStage, ProgressCallback};
pub use worker::{DetectionWorker, WorkerMessage};

use crate::annotate::{annotate, RgbRaster};
use crate::config::DetectionConfig;
use crate::frame::{load_frames_from_dir, Frame};
use crate::output;
use crate::preprocess::preprocess_frames;
use crate::stacking::stack_max;
use crate::streak_detection::{validate_segments, LineSegment, StreakDetector};

use self::progress::report_progress;

/// Terminal state of a detection run that did not fail.
#[derive(Debug)]
pub enum DetectionOutcome {
    /// The directory held no qualifying frames; nothing was written.
    NoFrames,
    /// The detector returned zero segments; nothing was written.
    NoLines,
    Success(DetectionReport),
}

/// Everything a successful run hands back to the caller.
#[derive(Debug)]
pub struct DetectionReport {
    pub merged: Frame,
    pub annotated: RgbRaster,
    pub merged_path: PathBuf,
    pub annotated_path: PathBuf,
    /// Validated segments in annotation draw order.
    pub segments: Vec<LineSegment>,
    pub diagnostics: DetectionDiagnostics,
}

/// Per-stage counts of one run.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetectionDiagnostics {
    pub frame_count: usize,
    pub edge_pixels: usize,
    pub blob_count: usize,
    pub detected_segments: usize,
    pub validated_segments: usize,
    pub rejected_dim: usize,
    pub rejected_short: usize,
}

/// Run the whole pipeline over one directory of frames.
pub fn run_detection(
    directory: &Path,
    config: &DetectionConfig,
) -> Result<DetectionOutcome, DetectionError> {
    run_detection_with_progress(directory, config, &None)
}

/// [`run_detection`] with per-stage progress reporting.
pub fn run_detection_with_progress(
    directory: &Path,
    config: &DetectionConfig,
    progress: &ProgressCallback,
) -> Result<DetectionOutcome, DetectionError> {
    config.validate();
    let run_start = Instant::now();

    report_progress(progress, DetectionStage::Loading, 0, 1);
    let started = Instant::now();
    let frames = load_frames_from_dir(directory)?;
    report_progress(progress, DetectionStage::Loading, 1, 1);
    if frames.is_empty() {
        tracing::info!(directory = %directory.display(), "no qualifying frames found");
        return Ok(DetectionOutcome::NoFrames);
    }
    tracing::debug!(
        frames = frames.len(),
        size = %frames[0].size(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "frame sequence loaded"
    );

    let started = Instant::now();
    let preprocessed = preprocess_frames(&frames, config, progress);
    tracing::debug!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        "frames preprocessed"
    );

    report_progress(progress, DetectionStage::Stacking, 0, 1);
    let started = Instant::now();
    let merged = stack_max(&preprocessed)?;
    report_progress(progress, DetectionStage::Stacking, 1, 1);
    tracing::debug!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        "sequence merged"
    );

    report_progress(progress, DetectionStage::DetectingLines, 0, 1);
    let started = Instant::now();
    let detection = StreakDetector::from_config(config.clone()).detect(&merged);
    report_progress(progress, DetectionStage::DetectingLines, 1, 1);
    tracing::debug!(
        segments = detection.segments.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "line detection complete"
    );
    if detection.segments.is_empty() {
        tracing::info!(directory = %directory.display(), "no lines detected");
        return Ok(DetectionOutcome::NoLines);
    }

    report_progress(progress, DetectionStage::Validating, 0, 1);
    let (validated, stats) = validate_segments(&detection.segments, &merged, config);
    report_progress(progress, DetectionStage::Validating, 1, 1);
    tracing::debug!(
        accepted = stats.accepted,
        rejected_dim = stats.rejected_dim,
        rejected_short = stats.rejected_short,
        "segments validated"
    );

    report_progress(progress, DetectionStage::Annotating, 0, 1);
    let annotated = annotate(&merged, &validated, config);
    report_progress(progress, DetectionStage::Annotating, 1, 1);

    report_progress(progress, DetectionStage::Saving, 0, 2);
    output::ensure_output_dir(&config.output_dir)?;
    let merged_path = output::merged_path(&config.output_dir, config.output_format);
    output::save_grayscale(&merged_path, &merged, config.output_format)?;
    report_progress(progress, DetectionStage::Saving, 1, 2);
    let annotated_path = output::result_path(&config.output_dir, config.output_format);
    output::save_rgb(&annotated_path, &annotated, config.output_format)?;
    report_progress(progress, DetectionStage::Saving, 2, 2);

    let diagnostics = DetectionDiagnostics {
        frame_count: frames.len(),
        edge_pixels: detection.diagnostics.edge_pixels,
        blob_count: detection.diagnostics.blob_count,
        detected_segments: detection.segments.len(),
        validated_segments: validated.len(),
        rejected_dim: stats.rejected_dim,
        rejected_short: stats.rejected_short,
    };
    tracing::info!(
        frames = diagnostics.frame_count,
        detected = diagnostics.detected_segments,
        validated = diagnostics.validated_segments,
        merged_path = %merged_path.display(),
        annotated_path = %annotated_path.display(),
        elapsed_ms = run_start.elapsed().as_millis() as u64,
        "detection run complete"
    );

    Ok(DetectionOutcome::Success(DetectionReport {
        merged,
        annotated,
        merged_path,
        annotated_path,
        segments: validated,
        diagnostics,
    }))
}
