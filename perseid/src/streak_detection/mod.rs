//! Line detection on the merged raster.
//!
//! The detector reduces the max-stacked raster to a discrete set of candidate
//! trajectory segments:
//!
//! 1. **Edge map**: two-threshold gradient edge detection (Sobel gradients,
//!    non-maximum suppression, hysteresis).
//! 2. **Blobs**: 8-connected components of the edge map with
//!    magnitude-weighted moments.
//! 3. **Segments**: elongated blobs become segments directly; compact blobs
//!    are linked along collinear runs; near-duplicate segments merge.
//!
//! There is no voting accumulator anywhere; endpoints come sub-pixel from
//! edge-gradient support. Zero segments is a valid outcome, which the
//! pipeline reports as its `NoLines` terminal state.

mod blob;
mod edges;
mod extract;
mod segment;
mod validate;

pub use segment::LineSegment;
pub use validate::{validate_segments, ValidationStats};

use crate::config::DetectionConfig;
use crate::frame::Frame;

/// Streak detector wrapping a [`DetectionConfig`].
#[derive(Debug, Default)]
pub struct StreakDetector {
    config: DetectionConfig,
}

/// Detected segments plus per-stage diagnostics.
#[derive(Debug, Clone)]
pub struct StreakDetectionResult {
    /// Candidate segments, longest first, order fully deterministic.
    pub segments: Vec<LineSegment>,
    pub diagnostics: StreakDiagnostics,
}

/// Counts collected along the detection stages.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreakDiagnostics {
    /// Pixels surviving the two-threshold edge detector.
    pub edge_pixels: usize,
    /// 8-connected components of the edge map.
    pub blob_count: usize,
    /// Blobs promoted to segments on elongation alone.
    pub direct_segments: usize,
    /// Compact blobs offered to the trajectory linker.
    pub link_candidates: usize,
    /// Segments produced by collinear linking.
    pub linked_segments: usize,
}

impl StreakDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: DetectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Detect candidate trajectory segments in a merged raster.
    pub fn detect(&self, merged: &Frame) -> StreakDetectionResult {
        self.config.validate();

        let map = edges::detect_edges(
            merged,
            self.config.edge_low_threshold,
            self.config.edge_high_threshold,
        );
        tracing::debug!(edge_pixels = map.edge_count, "edge detection complete");

        let blobs = blob::find_blobs(&map);
        tracing::debug!(blobs = blobs.len(), "edge map labeled");

        let extracted = extract::extract_segments(&blobs);
        tracing::debug!(
            segments = extracted.segments.len(),
            direct = extracted.direct,
            linked = extracted.linked,
            "segment extraction complete"
        );

        StreakDetectionResult {
            diagnostics: StreakDiagnostics {
                edge_pixels: map.edge_count,
                blob_count: blobs.len(),
                direct_segments: extracted.direct,
                link_candidates: extracted.link_candidates,
                linked_segments: extracted.linked,
            },
            segments: extracted.segments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{frame_with_dots, solid_frame};

    #[test]
    fn test_uniform_raster_yields_no_segments() {
        let detector = StreakDetector::new();
        let result = detector.detect(&solid_frame(100, 100, 0));
        assert!(result.segments.is_empty());
        assert_eq!(result.diagnostics.edge_pixels, 0);
        assert_eq!(result.diagnostics.blob_count, 0);
    }

    #[test]
    fn test_diagonal_dot_trail_detected() {
        let merged = frame_with_dots(100, 100, &[(10, 10, 200), (50, 50, 200), (90, 90, 200)]);
        let detector = StreakDetector::new();
        let result = detector.detect(&merged);

        assert_eq!(result.segments.len(), 1);
        assert_eq!(result.diagnostics.blob_count, 3);
        assert_eq!(result.diagnostics.link_candidates, 3);
        assert_eq!(result.diagnostics.linked_segments, 1);

        let segment = result.segments[0];
        assert!((segment.length() - 113.1).abs() < 2.0);
    }

    #[test]
    fn test_detect_is_deterministic() {
        let merged = frame_with_dots(
            120,
            120,
            &[(10, 10, 200), (40, 40, 210), (70, 70, 220), (30, 90, 180)],
        );
        let detector = StreakDetector::new();
        let first = detector.detect(&merged);
        let second = detector.detect(&merged);
        assert_eq!(first.segments, second.segments);
    }

    #[test]
    #[should_panic(expected = "edge thresholds")]
    fn test_invalid_config_panics_on_detect() {
        let detector = StreakDetector::from_config(DetectionConfig {
            edge_low_threshold: 300.0,
            ..Default::default()
        });
        let _ = detector.detect(&solid_frame(10, 10, 0));
    }
}
