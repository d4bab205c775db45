//! False-positive filtering of detected segments.
//!
//! Real streaks are bright in the max-stack by construction, and detector
//! artifacts are overwhelmingly short. Each segment is therefore checked
//! against the *merged* raster (not the edge map): mean endpoint intensity
//! must exceed the intensity threshold, and endpoint distance must exceed the
//! length threshold. Both checks must pass.
//!
//! The checks are stateless and per-segment, so they run as a parallel map;
//! the surviving set preserves input order.

use rayon::prelude::*;

use super::segment::LineSegment;
use crate::config::DetectionConfig;
use crate::frame::Frame;

/// Per-reason rejection counts of one validation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationStats {
    pub input: usize,
    pub accepted: usize,
    pub rejected_dim: usize,
    pub rejected_short: usize,
}

#[derive(Clone, Copy)]
enum Verdict {
    Accept,
    Dim,
    Short,
}

/// Filter segments against the merged raster, returning survivors in input
/// order plus rejection statistics.
pub fn validate_segments(
    segments: &[LineSegment],
    merged: &Frame,
    config: &DetectionConfig,
) -> (Vec<LineSegment>, ValidationStats) {
    let verdicts: Vec<Verdict> = segments
        .par_iter()
        .map(|segment| judge(segment, merged, config))
        .collect();

    let mut stats = ValidationStats {
        input: segments.len(),
        ..Default::default()
    };
    let mut accepted = Vec::new();
    for (segment, verdict) in segments.iter().zip(verdicts) {
        match verdict {
            Verdict::Accept => {
                stats.accepted += 1;
                accepted.push(*segment);
            }
            Verdict::Dim => stats.rejected_dim += 1,
            Verdict::Short => stats.rejected_short += 1,
        }
    }
    (accepted, stats)
}

fn judge(segment: &LineSegment, merged: &Frame, config: &DetectionConfig) -> Verdict {
    let intensity = (sample(merged, segment.x1, segment.y1) as f32
        + sample(merged, segment.x2, segment.y2) as f32)
        * 0.5;
    if intensity <= config.intensity_threshold {
        return Verdict::Dim;
    }
    if segment.length() <= config.length_threshold {
        return Verdict::Short;
    }
    Verdict::Accept
}

/// Sample the raster at a sub-pixel endpoint by coordinate truncation,
/// clamped into bounds.
#[inline]
fn sample(frame: &Frame, x: f32, y: f32) -> u8 {
    let xi = (x.max(0.0) as usize).min(frame.width() - 1);
    let yi = (y.max(0.0) as usize).min(frame.height() - 1);
    frame.get(xi, yi)
}
