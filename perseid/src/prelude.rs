//! Prelude module for convenient imports.
//!
//! Re-exports the types most callers need.
//!
//! # Usage
//!
//! ```rust,ignore
//! use perseid::prelude::*;
//! ```

// Core raster types
pub use crate::{Frame, FrameSize, RgbRaster};

// Configuration and entry points
pub use crate::{
    run_detection, run_detection_with_progress, DetectionConfig, DetectionError,
    DetectionOutcome, DetectionReport,
};

// Detection results
pub use crate::{LineSegment, StreakDetectionResult, StreakDetector};

// Async execution
pub use crate::{DetectionProgress, DetectionStage, DetectionWorker, ProgressCallback};
