//! Configuration for a detection run.
//!
//! All parameters are plain public fields with defaults taken from the
//! reference tuning. The numeric defaults are empirical; treat them as a
//! starting point, not as domain-general truth.

use std::path::PathBuf;

use crate::output::OutputFormat;

/// Flat configuration for the whole pipeline, grouped by stage.
#[derive(Debug, Clone)]
pub struct DetectionConfig {
    // ------------------------------------------------------------------
    // Preprocessing
    // ------------------------------------------------------------------
    /// Radius of the bilateral smoothing neighborhood in pixels.
    /// 0 disables smoothing entirely.
    pub denoise_radius: usize,
    /// Range (intensity) sigma of the bilateral filter.
    pub denoise_color_sigma: f32,
    /// Spatial sigma of the bilateral filter.
    pub denoise_space_sigma: f32,
    /// Side of the square median window used for the background estimate.
    /// Must be odd and at least 3.
    pub background_window: usize,

    // ------------------------------------------------------------------
    // Line detection
    // ------------------------------------------------------------------
    /// Weak-edge gradient threshold of the two-threshold edge detector.
    pub edge_low_threshold: f32,
    /// Strong-edge gradient threshold of the two-threshold edge detector.
    pub edge_high_threshold: f32,

    // ------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------
    /// Minimum mean endpoint intensity on the merged raster for a segment
    /// to survive; segments at or below are rejected as dim.
    pub intensity_threshold: f32,
    /// Minimum Euclidean endpoint distance in pixels; segments at or below
    /// are rejected as short.
    pub length_threshold: f32,

    // ------------------------------------------------------------------
    // Annotation
    // ------------------------------------------------------------------
    /// RGB stroke color for drawn segments.
    pub line_color: (u8, u8, u8),
    /// Stroke width in pixels.
    pub line_width: u32,

    // ------------------------------------------------------------------
    // Output
    // ------------------------------------------------------------------
    /// Directory the merged and annotated rasters are written to.
    /// Created (with parents) if absent.
    pub output_dir: PathBuf,
    /// Encoding of the written rasters.
    pub output_format: OutputFormat,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            denoise_radius: 9,
            denoise_color_sigma: 75.0,
            denoise_space_sigma: 75.0,
            background_window: 21,
            edge_low_threshold: 100.0,
            edge_high_threshold: 200.0,
            intensity_threshold: 50.0,
            length_threshold: 10.0,
            line_color: (0, 255, 0),
            line_width: 2,
            output_dir: PathBuf::from("output"),
            output_format: OutputFormat::Png,
        }
    }
}

impl DetectionConfig {
    /// Validate the configuration, panicking on contract violations.
    pub fn validate(&self) {
        assert!(
            self.background_window >= 3 && self.background_window % 2 == 1,
            "background_window must be odd and >= 3, got {}",
            self.background_window
        );
        if self.denoise_radius > 0 {
            assert!(
                self.denoise_color_sigma > 0.0,
                "denoise_color_sigma must be positive, got {}",
                self.denoise_color_sigma
            );
            assert!(
                self.denoise_space_sigma > 0.0,
                "denoise_space_sigma must be positive, got {}",
                self.denoise_space_sigma
            );
        }
        assert!(
            self.edge_low_threshold > 0.0 && self.edge_low_threshold < self.edge_high_threshold,
            "edge thresholds must satisfy 0 < low < high, got low={} high={}",
            self.edge_low_threshold,
            self.edge_high_threshold
        );
        assert!(
            self.intensity_threshold >= 0.0,
            "intensity_threshold must be non-negative, got {}",
            self.intensity_threshold
        );
        assert!(
            self.length_threshold >= 0.0,
            "length_threshold must be non-negative, got {}",
            self.length_threshold
        );
        assert!(
            self.line_width >= 1,
            "line_width must be at least 1, got {}",
            self.line_width
        );
    }

    /// Preset tuned toward faint, slow-moving candidates: lower edge and
    /// intensity thresholds at the cost of more false positives.
    pub fn faint_streaks() -> Self {
        Self {
            edge_low_threshold: 50.0,
            edge_high_threshold: 120.0,
            intensity_threshold: 25.0,
            ..Self::default()
        }
    }

    /// Preset tuned toward low false-positive output: higher thresholds and
    /// a longer minimum trajectory.
    pub fn strict() -> Self {
        Self {
            edge_low_threshold: 150.0,
            edge_high_threshold: 250.0,
            intensity_threshold: 80.0,
            length_threshold: 25.0,
            ..Self::default()
        }
    }
}
