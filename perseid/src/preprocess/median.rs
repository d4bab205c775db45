//! Large-window median background estimation.
//!
//! The per-pixel median over a window much larger than any transient feature
//! tracks the smooth sky background (glow, vignetting) while ignoring stars
//! and streaks. Subtracting it leaves transients standing on a near-zero
//! floor.

use rayon::prelude::*;

use crate::frame::Frame;

/// Per-pixel median over a `window`x`window` square, truncated at the image
/// borders. `window` must be odd and at least 3.
///
/// Uses a sliding 256-bin histogram per row; rows are processed in parallel.
pub fn median_background(frame: &Frame, window: usize) -> Frame {
    assert!(
        window >= 3 && window % 2 == 1,
        "median window must be odd and >= 3, got {}",
        window
    );

    let width = frame.width();
    let height = frame.height();
    let input = frame.pixels();
    let radius = window / 2;

    let mut output = vec![0u8; input.len()];
    output
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, out_row)| {
            let y0 = y.saturating_sub(radius);
            let y1 = (y + radius).min(height - 1);

            let mut hist = [0u32; 256];
            let mut count = 0u32;

            let add_column = |hist: &mut [u32; 256], count: &mut u32, x: usize| {
                for row in y0..=y1 {
                    hist[input[row * width + x] as usize] += 1;
                    *count += 1;
                }
            };
            let remove_column = |hist: &mut [u32; 256], count: &mut u32, x: usize| {
                for row in y0..=y1 {
                    hist[input[row * width + x] as usize] -= 1;
                    *count -= 1;
                }
            };

            for x in 0..=radius.min(width - 1) {
                add_column(&mut hist, &mut count, x);
            }

            for (x, out) in out_row.iter_mut().enumerate() {
                *out = histogram_median(&hist, count);

                let incoming = x + radius + 1;
                if incoming < width {
                    add_column(&mut hist, &mut count, incoming);
                }
                if x >= radius {
                    remove_column(&mut hist, &mut count, x - radius);
                }
            }
        });

    Frame::new(frame.size(), output)
}

/// Median of a 256-bin histogram holding `count` samples.
///
/// For even counts this selects the upper of the two middle samples, which
/// keeps the result an observed u8 value and the selection deterministic.
#[inline]
fn histogram_median(hist: &[u32; 256], count: u32) -> u8 {
    debug_assert!(count > 0);
    let target = count / 2;
    let mut cumulative = 0u32;
    for (value, &bin) in hist.iter().enumerate() {
        cumulative += bin;
        if cumulative > target {
            return value as u8;
        }
    }
    255
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{frame_with_dots, solid_frame};

    #[test]
    fn test_constant_frame_unchanged() {
        let frame = solid_frame(30, 30, 42);
        let background = median_background(&frame, 21);
        assert_eq!(background, frame);
    }

    #[test]
    fn test_isolated_bright_pixel_removed() {
        let frame = frame_with_dots(40, 40, &[(20, 20, 250)]);
        let background = median_background(&frame, 21);
        assert!(background.pixels().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_window_larger_than_image() {
        // The truncated window degenerates to the whole image.
        let frame = frame_with_dots(5, 5, &[(2, 2, 100)]);
        let background = median_background(&frame, 21);
        assert!(background.pixels().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_majority_value_wins() {
        // Two of three distinct values dominate every window; the median
        // never invents an unobserved intensity.
        let frame = frame_with_dots(25, 25, &[(0, 0, 9), (12, 12, 200)]);
        let background = median_background(&frame, 5);
        for &v in background.pixels() {
            assert_eq!(v, 0);
        }
    }

    #[test]
    #[should_panic(expected = "median window must be odd")]
    fn test_even_window_panics() {
        let frame = solid_frame(10, 10, 0);
        let _ = median_background(&frame, 4);
    }
}
