//! Testing utilities for perseid.

#![allow(dead_code)]

use std::path::Path;

use crate::frame::{Frame, FrameSize};

/// Initialize tracing subscriber for tests.
/// Safe to call multiple times - will only initialize once.
/// Respects RUST_LOG env var, defaults to "info".
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Frame filled with a single intensity.
pub fn solid_frame(width: usize, height: usize, value: u8) -> Frame {
    Frame::new(FrameSize::new(width, height), vec![value; width * height])
}

/// Black frame with individual bright pixels set.
pub fn frame_with_dots(width: usize, height: usize, dots: &[(usize, usize, u8)]) -> Frame {
    let mut pixels = vec![0u8; width * height];
    for &(x, y, value) in dots {
        pixels[y * width + x] = value;
    }
    Frame::new(FrameSize::new(width, height), pixels)
}

/// Black frame with a one-pixel-wide bright line between two points.
pub fn streak_frame(
    width: usize,
    height: usize,
    from: (f32, f32),
    to: (f32, f32),
    value: u8,
) -> Frame {
    let mut pixels = vec![0u8; width * height];
    let (mut x, mut y) = (from.0.round() as i64, from.1.round() as i64);
    let (x2, y2) = (to.0.round() as i64, to.1.round() as i64);
    let dx = (x2 - x).abs();
    let dy = -(y2 - y).abs();
    let sx = if x < x2 { 1 } else { -1 };
    let sy = if y < y2 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        if x >= 0 && y >= 0 && (x as usize) < width && (y as usize) < height {
            pixels[y as usize * width + x as usize] = value;
        }
        if x == x2 && y == y2 {
            break;
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
    Frame::new(FrameSize::new(width, height), pixels)
}

/// Write frames as `frame_000.png`, `frame_001.png`, ... into a directory.
pub fn write_frame_sequence(dir: &Path, frames: &[Frame]) -> anyhow::Result<()> {
    for (i, frame) in frames.iter().enumerate() {
        let path = dir.join(format!("frame_{i:03}.png"));
        image::save_buffer_with_format(
            &path,
            frame.pixels(),
            frame.width() as u32,
            frame.height() as u32,
            image::ExtendedColorType::L8,
            image::ImageFormat::Png,
        )?;
    }
    Ok(())
}
