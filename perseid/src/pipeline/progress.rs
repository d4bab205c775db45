//! Stage and progress reporting for a detection run.

use std::sync::Arc;

/// Stage of a detection run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum DetectionStage {
    Loading,
    Preprocessing,
    Stacking,
    DetectingLines,
    Validating,
    Annotating,
    Saving,
}

/// Progress information reported between stages and per frame during
/// preprocessing.
#[derive(Debug, Clone)]
pub struct DetectionProgress {
    pub stage: DetectionStage,
    /// Completed steps within the stage: 0 on entry, equal to `total` once
    /// the stage finishes.
    pub current: usize,
    /// Total steps within the stage.
    pub total: usize,
}

/// Callback type for progress reporting.
pub type ProgressCallback = Option<Arc<dyn Fn(DetectionProgress) + Send + Sync>>;

/// Report progress through the callback if one is set.
pub fn report_progress(
    callback: &ProgressCallback,
    stage: DetectionStage,
    current: usize,
    total: usize,
) {
    if let Some(f) = callback.as_ref() {
        f(DetectionProgress {
            stage,
            current,
            total,
        });
    }
}
