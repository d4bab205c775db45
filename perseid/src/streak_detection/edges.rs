//! Two-threshold gradient edge detection.
//!
//! Classic Canny-style stages on the merged raster: 3x3 Sobel gradients, L2
//! magnitude, non-maximum suppression along the rounded gradient direction,
//! then double thresholding with 8-connected hysteresis from strong to weak
//! edges. The gradient magnitude field is kept alongside the binary map; blob
//! extraction uses it to weight centroids.

use rayon::prelude::*;

use crate::common::Buffer2;
use crate::frame::Frame;

/// Binary edge map plus the gradient field it was thresholded from.
#[derive(Debug, Clone)]
pub(crate) struct EdgeMap {
    pub edges: Buffer2<bool>,
    pub magnitude: Buffer2<f32>,
    pub edge_count: usize,
}

/// Run the edge detector with the given weak/strong gradient thresholds.
pub(crate) fn detect_edges(frame: &Frame, low_threshold: f32, high_threshold: f32) -> EdgeMap {
    debug_assert!(0.0 < low_threshold && low_threshold < high_threshold);

    let width = frame.width();
    let height = frame.height();

    let (gx, gy, magnitude) = sobel_gradients(frame);
    let ridges = non_maximum_suppression(&gx, &gy, &magnitude);
    let (edges, edge_count) = hysteresis(&ridges, &magnitude, low_threshold, high_threshold);

    debug_assert_eq!(edges.width(), width);
    debug_assert_eq!(edges.height(), height);
    EdgeMap {
        edges,
        magnitude,
        edge_count,
    }
}

/// 3x3 Sobel gradients and their L2 magnitude. The one-pixel border has no
/// full neighborhood and is left at zero.
fn sobel_gradients(frame: &Frame) -> (Buffer2<f32>, Buffer2<f32>, Buffer2<f32>) {
    let width = frame.width();
    let height = frame.height();
    let input = frame.pixels();

    let mut gx: Buffer2<f32> = Buffer2::new_default(width, height);
    let mut gy: Buffer2<f32> = Buffer2::new_default(width, height);
    let mut magnitude: Buffer2<f32> = Buffer2::new_default(width, height);

    if width < 3 || height < 3 {
        return (gx, gy, magnitude);
    }

    gx.values_mut()
        .par_chunks_mut(width)
        .zip(gy.values_mut().par_chunks_mut(width))
        .zip(magnitude.values_mut().par_chunks_mut(width))
        .enumerate()
        .for_each(|(y, ((gx_row, gy_row), mag_row))| {
            if y == 0 || y == height - 1 {
                return;
            }
            let above = &input[(y - 1) * width..y * width];
            let center = &input[y * width..(y + 1) * width];
            let below = &input[(y + 1) * width..(y + 2) * width];

            for x in 1..width - 1 {
                let (l, r) = (x - 1, x + 1);
                let dx = (above[r] as f32 + 2.0 * center[r] as f32 + below[r] as f32)
                    - (above[l] as f32 + 2.0 * center[l] as f32 + below[l] as f32);
                let dy = (below[l] as f32 + 2.0 * below[x] as f32 + below[r] as f32)
                    - (above[l] as f32 + 2.0 * above[x] as f32 + above[r] as f32);
                gx_row[x] = dx;
                gy_row[x] = dy;
                mag_row[x] = (dx * dx + dy * dy).sqrt();
            }
        });

    (gx, gy, magnitude)
}

/// Keep only pixels whose magnitude is a local maximum along the gradient
/// direction, rounded to the nearest of the 8 neighbor directions.
fn non_maximum_suppression(
    gx: &Buffer2<f32>,
    gy: &Buffer2<f32>,
    magnitude: &Buffer2<f32>,
) -> Buffer2<bool> {
    let width = magnitude.width();
    let height = magnitude.height();
    let mut ridges: Buffer2<bool> = Buffer2::new_default(width, height);

    let sample = |x: isize, y: isize| -> f32 {
        if x < 0 || y < 0 || x >= width as isize || y >= height as isize {
            return 0.0;
        }
        magnitude[(x as usize, y as usize)]
    };

    ridges
        .values_mut()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, keep) in row.iter_mut().enumerate() {
                let mag = magnitude[(x, y)];
                if mag <= 0.0 {
                    continue;
                }
                let ux = (gx[(x, y)] / mag).round() as isize;
                let uy = (gy[(x, y)] / mag).round() as isize;
                let forward = sample(x as isize + ux, y as isize + uy);
                let backward = sample(x as isize - ux, y as isize - uy);
                *keep = mag >= forward && mag >= backward;
            }
        });

    ridges
}

/// Double threshold with 8-connected hysteresis: strong pixels seed the edge
/// map, weak pixels join only when connected to a strong one.
fn hysteresis(
    ridges: &Buffer2<bool>,
    magnitude: &Buffer2<f32>,
    low_threshold: f32,
    high_threshold: f32,
) -> (Buffer2<bool>, usize) {
    let width = magnitude.width();
    let height = magnitude.height();
    let mut edges: Buffer2<bool> = Buffer2::new_default(width, height);
    let mut edge_count = 0usize;
    let mut stack: Vec<(usize, usize)> = Vec::new();

    // Row-major seeding keeps the traversal, and thus the output, fully
    // deterministic.
    for y in 0..height {
        for x in 0..width {
            if !ridges[(x, y)] || magnitude[(x, y)] < high_threshold || edges[(x, y)] {
                continue;
            }
            edges[(x, y)] = true;
            edge_count += 1;
            stack.push((x, y));

            while let Some((cx, cy)) = stack.pop() {
                for dy in -1isize..=1 {
                    for dx in -1isize..=1 {
                        if dx == 0 && dy == 0 {
                            continue;
                        }
                        let nx = cx as isize + dx;
                        let ny = cy as isize + dy;
                        if nx < 0 || ny < 0 || nx >= width as isize || ny >= height as isize {
                            continue;
                        }
                        let (nx, ny) = (nx as usize, ny as usize);
                        if edges[(nx, ny)]
                            || !ridges[(nx, ny)]
                            || magnitude[(nx, ny)] < low_threshold
                        {
                            continue;
                        }
                        edges[(nx, ny)] = true;
                        edge_count += 1;
                        stack.push((nx, ny));
                    }
                }
            }
        }
    }

    (edges, edge_count)
}
