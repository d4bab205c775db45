//! Connected components over the edge map.
//!
//! Groups edge pixels into 8-connected blobs and measures each one:
//! gradient-magnitude-weighted centroid, central second moments, principal
//! axis, elongation, and the extent of member pixels along that axis. The
//! extractor decides from these whether a blob is itself a streak or merely a
//! support point for trajectory linking.

use super::edges::EdgeMap;
use crate::common::Buffer2;

/// One 8-connected component of the edge map with its shape statistics.
#[derive(Debug, Clone)]
pub(crate) struct Blob {
    /// Magnitude-weighted centroid, sub-pixel.
    pub centroid: (f32, f32),
    /// Member pixel coordinates in discovery (row-major flood) order.
    pub pixels: Vec<(usize, usize)>,
    /// Unit principal axis of the weighted second moments.
    pub axis: (f32, f32),
    /// sqrt of the major/minor eigenvalue ratio; 1.0 is isotropic.
    pub elongation: f32,
    /// Span of member pixels projected onto the principal axis.
    pub extent: f32,
}

impl Blob {
    /// Extreme projections of member pixels onto the principal axis through
    /// the centroid; the blob's own endpoints when treated as a streak.
    pub fn axis_endpoints(&self) -> ((f32, f32), (f32, f32)) {
        let (cx, cy) = self.centroid;
        let (ax, ay) = self.axis;
        let mut t_min = f32::MAX;
        let mut t_max = f32::MIN;
        for &(x, y) in &self.pixels {
            let t = (x as f32 - cx) * ax + (y as f32 - cy) * ay;
            t_min = t_min.min(t);
            t_max = t_max.max(t);
        }
        (
            (cx + ax * t_min, cy + ay * t_min),
            (cx + ax * t_max, cy + ay * t_max),
        )
    }
}

/// Label the edge map into blobs via row-major flood fill.
///
/// Scan order makes blob order, and member pixel order within a blob,
/// deterministic.
pub(crate) fn find_blobs(map: &EdgeMap) -> Vec<Blob> {
    let width = map.edges.width();
    let height = map.edges.height();
    let mut visited: Buffer2<bool> = Buffer2::new_default(width, height);
    let mut blobs = Vec::new();
    let mut stack: Vec<(usize, usize)> = Vec::new();
    let mut members: Vec<(usize, usize)> = Vec::new();

    for y in 0..height {
        for x in 0..width {
            if !map.edges[(x, y)] || visited[(x, y)] {
                continue;
            }

            members.clear();
            visited[(x, y)] = true;
            stack.push((x, y));
            while let Some((cx, cy)) = stack.pop() {
                members.push((cx, cy));
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
                        if map.edges[(nx, ny)] && !visited[(nx, ny)] {
                            visited[(nx, ny)] = true;
                            stack.push((nx, ny));
                        }
                    }
                }
            }

            blobs.push(measure_blob(&members, &map.magnitude));
        }
    }

    blobs
}

/// Weighted first and second moments of one component.
fn measure_blob(members: &[(usize, usize)], magnitude: &Buffer2<f32>) -> Blob {
    debug_assert!(!members.is_empty());

    let mut weight_sum = 0.0f32;
    let mut cx = 0.0f32;
    let mut cy = 0.0f32;
    for &(x, y) in members {
        let w = magnitude[(x, y)].max(f32::EPSILON);
        weight_sum += w;
        cx += w * x as f32;
        cy += w * y as f32;
    }
    cx /= weight_sum;
    cy /= weight_sum;

    let mut mxx = 0.0f32;
    let mut myy = 0.0f32;
    let mut mxy = 0.0f32;
    for &(x, y) in members {
        let w = magnitude[(x, y)].max(f32::EPSILON);
        let dx = x as f32 - cx;
        let dy = y as f32 - cy;
        mxx += w * dx * dx;
        myy += w * dy * dy;
        mxy += w * dx * dy;
    }
    mxx /= weight_sum;
    myy /= weight_sum;
    mxy /= weight_sum;

    // Eigen-decomposition of the 2x2 moment matrix.
    let trace_half = (mxx + myy) * 0.5;
    let delta = ((mxx - myy) * 0.5).hypot(mxy);
    let lambda_major = trace_half + delta;
    let lambda_minor = (trace_half - delta).max(0.0);

    let axis = principal_axis(mxx, myy, mxy, lambda_major);
    let elongation = (lambda_major / lambda_minor.max(1e-6)).sqrt();

    let mut blob = Blob {
        centroid: (cx, cy),
        pixels: members.to_vec(),
        axis,
        elongation,
        extent: 0.0,
    };
    let ((x1, y1), (x2, y2)) = blob.axis_endpoints();
    blob.extent = (x2 - x1).hypot(y2 - y1);
    blob
}

/// Unit eigenvector for the major eigenvalue, with a deterministic sign
/// (positive x, or positive y when vertical).
fn principal_axis(mxx: f32, myy: f32, mxy: f32, lambda_major: f32) -> (f32, f32) {
    let (mut ax, mut ay) = if mxy.abs() > 1e-6 {
        (lambda_major - myy, mxy)
    } else if mxx >= myy {
        (1.0, 0.0)
    } else {
        (0.0, 1.0)
    };

    let norm = ax.hypot(ay);
    if norm > f32::EPSILON {
        ax /= norm;
        ay /= norm;
    } else {
        (ax, ay) = (1.0, 0.0);
    }
    if ax < 0.0 || (ax == 0.0 && ay < 0.0) {
        ax = -ax;
        ay = -ay;
    }
    (ax, ay)
}
