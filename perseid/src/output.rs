//! Output directory handling and raster encoding.
//!
//! A run persists exactly two files into the configured output directory:
//! the merged raster as `merged_image.<ext>` and the annotated raster as
//! `result_image.<ext>`.

use std::fs;
use std::path::{Path, PathBuf};

use image::{ExtendedColorType, ImageFormat};

use crate::annotate::RgbRaster;
use crate::frame::Frame;
use crate::pipeline::DetectionError;

/// File stem of the persisted merged raster.
pub const MERGED_FILE_STEM: &str = "merged_image";
/// File stem of the persisted annotated raster.
pub const RESULT_FILE_STEM: &str = "result_image";

/// Encoding used for the persisted rasters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum_macros::Display)]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
        }
    }

    fn image_format(&self) -> ImageFormat {
        match self {
            OutputFormat::Png => ImageFormat::Png,
            OutputFormat::Jpeg => ImageFormat::Jpeg,
        }
    }
}

/// Path the merged raster is written to for a given output directory.
pub fn merged_path(output_dir: &Path, format: OutputFormat) -> PathBuf {
    output_dir.join(format!("{}.{}", MERGED_FILE_STEM, format.extension()))
}

/// Path the annotated raster is written to for a given output directory.
pub fn result_path(output_dir: &Path, format: OutputFormat) -> PathBuf {
    output_dir.join(format!("{}.{}", RESULT_FILE_STEM, format.extension()))
}

/// Create the output directory (and parents) if absent.
pub fn ensure_output_dir(output_dir: &Path) -> Result<(), DetectionError> {
    fs::create_dir_all(output_dir).map_err(|source| DetectionError::CreateOutputDir {
        path: output_dir.to_path_buf(),
        source,
    })
}

/// Encode a grayscale frame to disk.
pub fn save_grayscale(path: &Path, frame: &Frame, format: OutputFormat) -> Result<(), DetectionError> {
    image::save_buffer_with_format(
        path,
        frame.pixels(),
        frame.width() as u32,
        frame.height() as u32,
        ExtendedColorType::L8,
        format.image_format(),
    )
    .map_err(|source| DetectionError::SaveImage {
        path: path.to_path_buf(),
        source,
    })
}

/// Encode an RGB raster to disk.
pub fn save_rgb(path: &Path, raster: &RgbRaster, format: OutputFormat) -> Result<(), DetectionError> {
    image::save_buffer_with_format(
        path,
        raster.pixels(),
        raster.width() as u32,
        raster.height() as u32,
        ExtendedColorType::Rgb8,
        format.image_format(),
    )
    .map_err(|source| DetectionError::SaveImage {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::frame_with_dots;

    #[test]
    fn test_format_extensions_and_display() {
        assert_eq!(OutputFormat::Png.extension(), "png");
        assert_eq!(OutputFormat::Jpeg.extension(), "jpg");
        assert_eq!(OutputFormat::Png.to_string(), "Png");
        assert_eq!(OutputFormat::default(), OutputFormat::Png);
    }

    #[test]
    fn test_fixed_output_paths() {
        let dir = Path::new("/tmp/out");
        assert_eq!(
            merged_path(dir, OutputFormat::Png),
            Path::new("/tmp/out/merged_image.png")
        );
        assert_eq!(
            result_path(dir, OutputFormat::Jpeg),
            Path::new("/tmp/out/result_image.jpg")
        );
    }

    #[test]
    fn test_ensure_output_dir_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b/out");
        ensure_output_dir(&nested).unwrap();
        assert!(nested.is_dir());
        // Idempotent on an existing directory.
        ensure_output_dir(&nested).unwrap();
    }

    #[test]
    fn test_grayscale_png_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let frame = frame_with_dots(12, 9, &[(3, 4, 210)]);
        let path = merged_path(dir.path(), OutputFormat::Png);
        save_grayscale(&path, &frame, OutputFormat::Png).unwrap();

        let loaded = Frame::from_file(&path).unwrap();
        assert_eq!(loaded, frame);
    }

    #[test]
    fn test_rgb_png_preserves_line_color() {
        let dir = tempfile::tempdir().unwrap();
        let mut raster = RgbRaster::from_gray(&frame_with_dots(10, 10, &[]));
        crate::annotate::draw_segment(
            &mut raster,
            &crate::streak_detection::LineSegment::new(1.0, 5.0, 8.0, 5.0),
            (0, 255, 0),
            1,
        );
        let path = result_path(dir.path(), OutputFormat::Png);
        save_rgb(&path, &raster, OutputFormat::Png).unwrap();

        let decoded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(decoded.get_pixel(4, 5).0, [0, 255, 0]);
    }

    #[test]
    fn test_save_to_missing_directory_fails_with_path() {
        let frame = frame_with_dots(4, 4, &[]);
        let path = Path::new("/nonexistent/out/merged_image.png");
        let err = save_grayscale(path, &frame, OutputFormat::Png).unwrap_err();
        match err {
            DetectionError::SaveImage { path: failing, .. } => {
                assert_eq!(failing, path);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
