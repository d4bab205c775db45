//! Annotation of validated segments onto a color copy of the merged raster.

use crate::config::DetectionConfig;
use crate::frame::{Frame, FrameSize};
use crate::streak_detection::LineSegment;

/// 3-channel interleaved RGB raster, row-major, origin top-left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbRaster {
    size: FrameSize,
    pixels: Vec<u8>,
}

impl RgbRaster {
    /// Convert a grayscale frame by replicating its value across the three
    /// channels. No false-color mapping.
    pub fn from_gray(frame: &Frame) -> Self {
        let mut pixels = Vec::with_capacity(frame.pixels().len() * 3);
        for &value in frame.pixels() {
            pixels.extend_from_slice(&[value, value, value]);
        }
        Self {
            size: frame.size(),
            pixels,
        }
    }

    #[inline]
    pub fn size(&self) -> FrameSize {
        self.size
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.size.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.size.height
    }

    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> (u8, u8, u8) {
        debug_assert!(x < self.size.width && y < self.size.height);
        let i = (y * self.size.width + x) * 3;
        (self.pixels[i], self.pixels[i + 1], self.pixels[i + 2])
    }

    /// Set one pixel; out-of-bounds coordinates are clipped away.
    #[inline]
    fn plot(&mut self, x: i64, y: i64, color: (u8, u8, u8)) {
        if x < 0 || y < 0 || x >= self.size.width as i64 || y >= self.size.height as i64 {
            return;
        }
        let i = (y as usize * self.size.width + x as usize) * 3;
        self.pixels[i] = color.0;
        self.pixels[i + 1] = color.1;
        self.pixels[i + 2] = color.2;
    }
}

/// Color copy of the merged raster with every surviving segment overdrawn.
///
/// Draw order follows the input slice so output bytes are reproducible.
pub fn annotate(merged: &Frame, segments: &[LineSegment], config: &DetectionConfig) -> RgbRaster {
    let mut raster = RgbRaster::from_gray(merged);
    for segment in segments {
        draw_segment(&mut raster, segment, config.line_color, config.line_width);
    }
    raster
}

/// Draw one segment as `width` parallel Bresenham strokes offset across the
/// line's minor axis. Endpoints are rounded to integer pixels.
pub fn draw_segment(
    raster: &mut RgbRaster,
    segment: &LineSegment,
    color: (u8, u8, u8),
    width: u32,
) {
    debug_assert!(width >= 1);
    let x1 = segment.x1.round() as i64;
    let y1 = segment.y1.round() as i64;
    let x2 = segment.x2.round() as i64;
    let y2 = segment.y2.round() as i64;

    // Offset across y for horizontal-ish lines, across x for vertical-ish.
    let horizontal = (x2 - x1).abs() >= (y2 - y1).abs();
    for stroke in 0..width as i64 {
        let offset = stroke - (width as i64 - 1) / 2;
        let (ox, oy) = if horizontal { (0, offset) } else { (offset, 0) };
        bresenham(raster, x1 + ox, y1 + oy, x2 + ox, y2 + oy, color);
    }
}

fn bresenham(raster: &mut RgbRaster, x1: i64, y1: i64, x2: i64, y2: i64, color: (u8, u8, u8)) {
    let dx = (x2 - x1).abs();
    let dy = -(y2 - y1).abs();
    let sx = if x1 < x2 { 1 } else { -1 };
    let sy = if y1 < y2 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (x1, y1);

    loop {
        raster.plot(x, y, color);
        if x == x2 && y == y2 {
            return;
        }
        let doubled = 2 * err;
        if doubled >= dy {
            err += dy;
            x += sx;
        }
        if doubled <= dx {
            err += dx;
            y += sy;
        }
    }
}
