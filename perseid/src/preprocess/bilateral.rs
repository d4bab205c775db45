//! Edge-preserving bilateral smoothing.
//!
//! Smooths flat regions while keeping strong intensity edges, so sensor noise
//! is suppressed without blurring a streak into the background. Each output
//! pixel is a normalized weighted mean over a square neighborhood, weighted by
//! a spatial Gaussian times a range (intensity difference) Gaussian.

use rayon::prelude::*;

use crate::frame::Frame;

/// Apply a bilateral filter with the given neighborhood radius and sigmas.
///
/// `radius == 0` disables smoothing and returns the input unchanged. Border
/// pixels use a coordinate-clamped (replicated) neighborhood.
pub fn bilateral_filter(frame: &Frame, radius: usize, color_sigma: f32, space_sigma: f32) -> Frame {
    if radius == 0 {
        return frame.clone();
    }
    assert!(color_sigma > 0.0, "color_sigma must be positive");
    assert!(space_sigma > 0.0, "space_sigma must be positive");

    let width = frame.width();
    let height = frame.height();
    let input = frame.pixels();
    let window = 2 * radius + 1;

    // Spatial weights depend only on the offset, range weights only on the
    // intensity difference; precompute both.
    let space_norm = -1.0 / (2.0 * space_sigma * space_sigma);
    let spatial: Vec<f32> = (0..window * window)
        .map(|i| {
            let dx = (i % window) as f32 - radius as f32;
            let dy = (i / window) as f32 - radius as f32;
            ((dx * dx + dy * dy) * space_norm).exp()
        })
        .collect();

    let color_norm = -1.0 / (2.0 * color_sigma * color_sigma);
    let range: Vec<f32> = (0..256)
        .map(|delta| ((delta * delta) as f32 * color_norm).exp())
        .collect();

    let mut output = vec![0u8; input.len()];
    output
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, out_row)| {
            for (x, out) in out_row.iter_mut().enumerate() {
                let center = input[y * width + x] as i32;
                let mut sum = 0.0f32;
                let mut total_weight = 0.0f32;

                for ky in 0..window {
                    let sy = (y + ky).saturating_sub(radius).min(height - 1);
                    for kx in 0..window {
                        let sx = (x + kx).saturating_sub(radius).min(width - 1);
                        let sample = input[sy * width + sx] as i32;
                        let weight =
                            spatial[ky * window + kx] * range[(sample - center).unsigned_abs() as usize];
                        sum += weight * sample as f32;
                        total_weight += weight;
                    }
                }

                // The center tap always contributes, so total_weight > 0.
                *out = (sum / total_weight).round() as u8;
            }
        });

    Frame::new(frame.size(), output)
}
